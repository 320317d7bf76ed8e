use serde::{Deserialize, Serialize};

/// A witness as nodes render it: both scripts base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoWitness {
	pub invocation: String,
	pub verification: String,
}
