use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Final VM state reported for an invocation or an executed transaction.
#[derive(
	Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum VMState {
	/// Script has not run.
	#[default]
	#[serde(rename = "NONE")]
	#[strum(serialize = "NONE")]
	None,
	/// Script finished successfully.
	#[serde(rename = "HALT")]
	#[strum(serialize = "HALT")]
	Halt,
	/// Script aborted with an exception.
	#[serde(rename = "FAULT")]
	#[strum(serialize = "FAULT")]
	Fault,
	/// Script is suspended at a breakpoint.
	#[serde(rename = "BREAK")]
	#[strum(serialize = "BREAK")]
	Break,
}

impl VMState {
	pub fn as_byte(&self) -> u8 {
		match self {
			VMState::None => 0x00,
			VMState::Halt => 0x01,
			VMState::Fault => 0x02,
			VMState::Break => 0x04,
		}
	}
}
