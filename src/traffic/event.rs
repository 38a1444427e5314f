use std::fmt;

use serde::Deserialize;

/// Failure to turn a stats frame into a [`TrafficEvent`].
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
	/// Not a JSON array of `[type, source, dest, timestamp]`.
	#[error("malformed stats frame: {0}")]
	Malformed(#[from] serde_json::Error),
	/// The type field was a string but not an I2NP type code.
	#[error("invalid message type {0:?}")]
	MessageType(String),
}

/// I2NP message type carried by an event. Only used for display.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
	DatabaseStore,
	DatabaseLookup,
	DatabaseSearchReply,
	DeliveryStatus,
	Garlic,
	TunnelData,
	TunnelGateway,
	Data,
	TunnelBuild,
	TunnelBuildReply,
	VariableTunnelBuild,
	VariableTunnelBuildReply,
	/// A code this client has no name for.
	Other(u8),
}

impl MessageKind {
	/// The wire code.
	pub fn code(self) -> u8 {
		match self {
			Self::DatabaseStore => 1,
			Self::DatabaseLookup => 2,
			Self::DatabaseSearchReply => 3,
			Self::DeliveryStatus => 10,
			Self::Garlic => 11,
			Self::TunnelData => 18,
			Self::TunnelGateway => 19,
			Self::Data => 20,
			Self::TunnelBuild => 21,
			Self::TunnelBuildReply => 22,
			Self::VariableTunnelBuild => 23,
			Self::VariableTunnelBuildReply => 24,
			Self::Other(code) => code,
		}
	}
}

impl From<u8> for MessageKind {
	fn from(code: u8) -> Self {
		match code {
			1 => Self::DatabaseStore,
			2 => Self::DatabaseLookup,
			3 => Self::DatabaseSearchReply,
			10 => Self::DeliveryStatus,
			11 => Self::Garlic,
			18 => Self::TunnelData,
			19 => Self::TunnelGateway,
			20 => Self::Data,
			21 => Self::TunnelBuild,
			22 => Self::TunnelBuildReply,
			23 => Self::VariableTunnelBuild,
			24 => Self::VariableTunnelBuildReply,
			other => Self::Other(other),
		}
	}
}

impl fmt::Display for MessageKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Other(code) => write!(f, "type {code}"),
			named => fmt::Debug::fmt(named, f),
		}
	}
}

/// One observed message between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct TrafficEvent {
	/// Message type, diagnostic only.
	pub kind: MessageKind,
	/// Sending node.
	pub source: String,
	/// Receiving node.
	pub dest: String,
	/// Router clock in milliseconds, display only.
	pub timestamp: f64,
}

// The router quotes every field but the timestamp, so the type may arrive as "11".
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeField {
	Code(u8),
	Text(String),
}

#[derive(Deserialize)]
struct Frame(TypeField, String, String, f64);

impl TrafficEvent {
	/// Decode a `[type, source, dest, timestamp]` JSON frame.
	pub fn decode(raw: &str) -> Result<Self, DecodeError> {
		let Frame(kind, source, dest, timestamp) = serde_json::from_str(raw)?;
		let code = match kind {
			TypeField::Code(code) => code,
			TypeField::Text(text) => text
				.trim()
				.parse()
				.map_err(|_| DecodeError::MessageType(text))?,
		};
		Ok(Self {
			kind: code.into(),
			source,
			dest,
			timestamp,
		})
	}
}

impl fmt::Display for TrafficEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} {} {} -> {}",
			self.timestamp, self.kind, self.source, self.dest
		)
	}
}
