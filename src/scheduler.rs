use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::error::{ClientError, js_reason};

/// Browser interval driving the decay tick. Cleared on drop.
pub struct DecayScheduler {
	window: Window,
	handle: i32,
	_on_tick: Closure<dyn FnMut()>,
}

impl DecayScheduler {
	pub fn start(interval_ms: u32, on_tick: impl FnMut() + 'static) -> Result<Self, ClientError> {
		let window = web_sys::window().ok_or(ClientError::NoWindow)?;
		let on_tick = Closure::<dyn FnMut()>::new(on_tick);
		let timeout = i32::try_from(interval_ms).unwrap_or(i32::MAX);
		let handle = window
			.set_interval_with_callback_and_timeout_and_arguments_0(
				on_tick.as_ref().unchecked_ref(),
				timeout,
			)
			.map_err(|e| ClientError::Timer(js_reason(&e)))?;

		Ok(Self {
			window,
			handle,
			_on_tick: on_tick,
		})
	}
}

impl Drop for DecayScheduler {
	fn drop(&mut self) {
		self.window.clear_interval_with_handle(self.handle);
	}
}
