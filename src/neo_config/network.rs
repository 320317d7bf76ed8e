use serde::{Deserialize, Serialize};

/// Well-known Neo N3 networks, identified by their 32-bit magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeoNetwork {
	/// Neo N3 MainNet.
	MainNet,
	/// Neo N3 TestNet.
	TestNet,
}

impl NeoNetwork {
	/// Returns the network magic used in handshake and signing contexts.
	pub fn magic(&self) -> u32 {
		match self {
			NeoNetwork::MainNet => 0x334F_454E,
			NeoNetwork::TestNet => 0x3454_354E,
		}
	}

	/// Resolves a magic number back to a known network.
	pub fn from_magic(magic: u32) -> Option<NeoNetwork> {
		match magic {
			0x334F_454E => Some(NeoNetwork::MainNet),
			0x3454_354E => Some(NeoNetwork::TestNet),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn magic_round_trip() {
		for network in [NeoNetwork::MainNet, NeoNetwork::TestNet] {
			assert_eq!(NeoNetwork::from_magic(network.magic()), Some(network));
		}
		assert_eq!(NeoNetwork::from_magic(0), None);
	}
}
