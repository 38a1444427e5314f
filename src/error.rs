use wasm_bindgen::JsValue;

/// Failure while bringing up the stats client.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
	/// Not running in a browser window.
	#[error("no browser window available")]
	NoWindow,
	/// The page location could not be read.
	#[error("cannot read page location: {0}")]
	Location(String),
	/// The WebSocket constructor threw.
	#[error("cannot open stats socket {url}: {reason}")]
	Socket {
		/// Endpoint that was tried.
		url: String,
		/// What the browser reported.
		reason: String,
	},
	/// `setInterval` was refused.
	#[error("cannot schedule decay timer: {0}")]
	Timer(String),
}

/// Readable form of a thrown JS value.
pub(crate) fn js_reason(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
