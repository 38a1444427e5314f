use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::error::{ClientError, js_reason};

/// Lifecycle of the stats socket as shown in the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
	Connecting,
	Open,
	Closed,
	Failed,
}

impl fmt::Display for ConnectionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Connecting => "connecting",
			Self::Open => "live",
			Self::Closed => "disconnected",
			Self::Failed => "connection error",
		})
	}
}

/// Browser WebSocket delivering text frames from the router.
///
/// The callbacks stay registered until this is dropped. There is no reconnect.
pub struct StatsSocket {
	socket: WebSocket,
	_on_open: Closure<dyn FnMut(Event)>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_close: Closure<dyn FnMut(CloseEvent)>,
	_on_error: Closure<dyn FnMut(Event)>,
}

impl StatsSocket {
	pub fn connect(
		url: &str,
		mut on_frame: impl FnMut(&str) + 'static,
		on_state: impl Fn(ConnectionState) + 'static,
	) -> Result<Self, ClientError> {
		let socket = WebSocket::new(url).map_err(|e| ClientError::Socket {
			url: url.to_owned(),
			reason: js_reason(&e),
		})?;
		info!("connecting to {url}");
		let on_state: Rc<dyn Fn(ConnectionState)> = Rc::new(on_state);
		on_state(ConnectionState::Connecting);

		let on_open = Closure::<dyn FnMut(_)>::new({
			let on_state = on_state.clone();
			let url = url.to_owned();
			move |_: Event| {
				info!("stats stream {url} open");
				on_state(ConnectionState::Open);
			}
		});
		socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));

		let on_message = Closure::<dyn FnMut(_)>::new(move |e: MessageEvent| {
			match e.data().as_string() {
				Some(text) => on_frame(&text),
				None => debug!("ignoring non-text stats frame"),
			}
		});
		socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

		let on_close = Closure::<dyn FnMut(_)>::new({
			let on_state = on_state.clone();
			move |e: CloseEvent| {
				info!("stats stream closed (code {}, {:?})", e.code(), e.reason());
				on_state(ConnectionState::Closed);
			}
		});
		socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

		let on_error = Closure::<dyn FnMut(_)>::new(move |_: Event| {
			warn!("stats stream error");
			on_state(ConnectionState::Failed);
		});
		socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));

		Ok(Self {
			socket,
			_on_open: on_open,
			_on_message: on_message,
			_on_close: on_close,
			_on_error: on_error,
		})
	}
}

impl Drop for StatsSocket {
	fn drop(&mut self) {
		self.socket.set_onopen(None);
		self.socket.set_onmessage(None);
		self.socket.set_onclose(None);
		self.socket.set_onerror(None);
		if let Err(e) = self.socket.close() {
			debug!("closing stats socket: {}", js_reason(&e));
		}
	}
}
