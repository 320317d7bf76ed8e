use serde::{Deserialize, Serialize};

/// Result of `getversion`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoVersion {
	#[serde(rename = "tcpport", default)]
	pub tcp_port: Option<u16>,
	#[serde(rename = "wsport", default)]
	pub ws_port: Option<u16>,
	#[serde(default)]
	pub nonce: u32,
	#[serde(rename = "useragent", default)]
	pub user_agent: String,
	#[serde(default)]
	pub protocol: Option<NeoProtocol>,
}

/// Protocol settings advertised by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeoProtocol {
	pub network: u32,
	#[serde(rename = "validatorscount", default)]
	pub validators_count: Option<u32>,
	#[serde(rename = "msperblock", default = "default_ms_per_block")]
	pub ms_per_block: u32,
	#[serde(rename = "maxvaliduntilblockincrement", default)]
	pub max_valid_until_block_increment: u32,
	#[serde(rename = "maxtraceableblocks", default)]
	pub max_traceable_blocks: u32,
	#[serde(rename = "addressversion", default = "default_address_version")]
	pub address_version: u32,
	#[serde(rename = "maxtransactionsperblock", default)]
	pub max_transactions_per_block: u32,
	#[serde(rename = "memorypoolmaxtransactions", default)]
	pub memory_pool_max_transactions: u32,
	#[serde(rename = "initialgasdistribution", default)]
	pub initial_gas_distribution: u64,
}

fn default_ms_per_block() -> u32 {
	15_000
}

fn default_address_version() -> u32 {
	0x35
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_node_shape() {
		let json = serde_json::json!({
			"tcpport": 10333,
			"nonce": 1234567890u32,
			"useragent": "/Neo:3.6.0/",
			"protocol": {
				"network": 860833102u32,
				"validatorscount": 7,
				"msperblock": 15000,
				"maxvaliduntilblockincrement": 5760,
				"maxtraceableblocks": 2102400,
				"addressversion": 53,
				"maxtransactionsperblock": 512,
				"memorypoolmaxtransactions": 50000,
				"initialgasdistribution": 5200000000000000u64,
			}
		});
		let version: NeoVersion = serde_json::from_value(json).unwrap();
		assert_eq!(version.user_agent, "/Neo:3.6.0/");
		let protocol = version.protocol.unwrap();
		assert_eq!(protocol.ms_per_block, 15_000);
		assert_eq!(protocol.address_version, 53);
	}
}
