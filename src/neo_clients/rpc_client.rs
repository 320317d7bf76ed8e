//! The JSON-RPC 2.0 client and its typed method surface.
//!
//! Request ids are generated monotonically per client instance and each
//! response is matched by id. The client does not pipeline: a call issues
//! exactly one `post` and blocks until it returns.

use std::sync::atomic::{AtomicU64, Ordering};

use primitive_types::{H160, H256};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::neo_builder::Signer;
use crate::neo_clients::{JsonRpcTransport, ProviderError};
use crate::neo_protocol::responses::{
	ApplicationLog, ContractState, FoundStorage, InvocationResult, NeoBlock, NeoVersion,
	Nep17Balances, Nep17Transfers, Peers, RTransaction, RawTransaction, StateHeight, StateRoot,
	UnclaimedGas, ValidateAddress, Validator, WalletBalance,
};
use crate::neo_types::{Hash256Extension, ScriptHashExtension, StackItem};

/// A JSON-RPC client over a blocking transport.
#[derive(Debug)]
pub struct RpcClient<T: JsonRpcTransport> {
	transport: T,
	request_id: AtomicU64,
}

impl<T: JsonRpcTransport> RpcClient<T> {
	pub fn new(transport: T) -> Self {
		Self { transport, request_id: AtomicU64::new(1) }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	fn next_id(&self) -> u64 {
		self.request_id.fetch_add(1, Ordering::SeqCst)
	}

	fn request_body(&self, method: &str, params: Value) -> (u64, Value) {
		let id = self.next_id();
		let body = json!({
			"jsonrpc": "2.0",
			"method": method,
			"params": params,
			"id": id,
		});
		(id, body)
	}

	fn unwrap_response(response: Value, id: u64) -> Result<Value, ProviderError> {
		let envelope = response
			.as_object()
			.ok_or_else(|| ProviderError::ProtocolError("response is not an object".to_string()))?;
		if let Some(error) = envelope.get("error") {
			return Err(ProviderError::NodeError {
				code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
				message: error
					.get("message")
					.and_then(Value::as_str)
					.unwrap_or_default()
					.to_string(),
				data: error.get("data").cloned(),
			});
		}
		if let Some(response_id) = envelope.get("id").and_then(Value::as_u64) {
			if response_id != id {
				return Err(ProviderError::ProtocolError(format!(
					"response id {response_id} does not match request id {id}"
				)));
			}
		}
		envelope
			.get("result")
			.cloned()
			.ok_or_else(|| ProviderError::ProtocolError("response carries no result".to_string()))
	}

	/// Issues one request and decodes the result.
	pub fn request<R: DeserializeOwned>(
		&self,
		method: &str,
		params: Value,
	) -> Result<R, ProviderError> {
		let (id, body) = self.request_body(method, params);
		let response = self.transport.post(&body)?;
		let result = Self::unwrap_response(response, id)?;
		Ok(serde_json::from_value(result)?)
	}

	/// Sends a batch as a JSON array. Results come back in request order,
	/// each entry carrying its own result or node error.
	pub fn batch(
		&self,
		requests: &[(&str, Value)],
	) -> Result<Vec<Result<Value, ProviderError>>, ProviderError> {
		let mut bodies = Vec::with_capacity(requests.len());
		let mut ids = Vec::with_capacity(requests.len());
		for (method, params) in requests {
			let (id, body) = self.request_body(method, params.clone());
			ids.push(id);
			bodies.push(body);
		}
		let response = self.transport.post(&Value::Array(bodies))?;
		let entries = response
			.as_array()
			.ok_or_else(|| ProviderError::ProtocolError("batch response is not an array".to_string()))?
			.clone();

		// Responses may arrive out of order; pair them back up by id.
		let mut results: Vec<Result<Value, ProviderError>> = ids
			.iter()
			.map(|_| Err(ProviderError::ProtocolError("missing batch entry".to_string())))
			.collect();
		for entry in entries {
			let entry_id = entry.get("id").and_then(Value::as_u64);
			let position = match entry_id.and_then(|id| ids.iter().position(|x| *x == id)) {
				Some(position) => position,
				None => continue,
			};
			results[position] = Self::unwrap_response(entry, ids[position]);
		}
		Ok(results)
	}

	// Node & network

	pub fn get_version(&self) -> Result<NeoVersion, ProviderError> {
		self.request("getversion", json!([]))
	}

	pub fn get_connection_count(&self) -> Result<u32, ProviderError> {
		self.request("getconnectioncount", json!([]))
	}

	pub fn get_peers(&self) -> Result<Peers, ProviderError> {
		self.request("getpeers", json!([]))
	}

	pub fn validate_address(&self, address: &str) -> Result<ValidateAddress, ProviderError> {
		self.request("validateaddress", json!([address]))
	}

	// Blocks

	pub fn get_best_block_hash(&self) -> Result<H256, ProviderError> {
		let hash: String = self.request("getbestblockhash", json!([]))?;
		H256::from_hex(&hash).map_err(|e| ProviderError::shape(e.to_string()))
	}

	pub fn get_block(&self, hash: &H256, full_transactions: bool) -> Result<NeoBlock, ProviderError> {
		self.request("getblock", json!([Hash256Extension::to_hex(hash), full_transactions]))
	}

	pub fn get_block_by_index(
		&self,
		index: u32,
		full_transactions: bool,
	) -> Result<NeoBlock, ProviderError> {
		self.request("getblock", json!([index, full_transactions]))
	}

	/// The raw block as base64.
	pub fn get_raw_block(&self, hash: &H256) -> Result<String, ProviderError> {
		self.request("getblock", json!([Hash256Extension::to_hex(hash), false]))
	}

	pub fn get_block_count(&self) -> Result<u32, ProviderError> {
		self.request("getblockcount", json!([]))
	}

	pub fn get_block_hash(&self, index: u32) -> Result<H256, ProviderError> {
		let hash: String = self.request("getblockhash", json!([index]))?;
		H256::from_hex(&hash).map_err(|e| ProviderError::shape(e.to_string()))
	}

	pub fn get_block_header(&self, hash: &H256) -> Result<NeoBlock, ProviderError> {
		self.request("getblockheader", json!([Hash256Extension::to_hex(hash), true]))
	}

	pub fn get_block_header_by_index(&self, index: u32) -> Result<NeoBlock, ProviderError> {
		self.request("getblockheader", json!([index, true]))
	}

	/// Committee member public keys as compressed hex.
	pub fn get_committee(&self) -> Result<Vec<String>, ProviderError> {
		self.request("getcommittee", json!([]))
	}

	pub fn get_next_block_validators(&self) -> Result<Vec<Validator>, ProviderError> {
		self.request("getnextblockvalidators", json!([]))
	}

	// Contracts & storage

	pub fn get_contract_state(&self, hash: &H160) -> Result<ContractState, ProviderError> {
		self.request("getcontractstate", json!([ScriptHashExtension::to_hex(hash)]))
	}

	/// Reads one storage value; `key` is raw bytes, the value comes back
	/// base64-encoded.
	pub fn get_storage(&self, contract: &H160, key: &[u8]) -> Result<String, ProviderError> {
		use crate::neo_types::Base64Encode;
		self.request(
			"getstorage",
			json!([ScriptHashExtension::to_hex(contract), key.to_base64()]),
		)
	}

	pub fn find_storage(
		&self,
		contract: &H160,
		prefix: &[u8],
	) -> Result<FoundStorage, ProviderError> {
		use crate::neo_types::Base64Encode;
		self.request(
			"findstorage",
			json!([ScriptHashExtension::to_hex(contract), prefix.to_base64()]),
		)
	}

	// Transactions

	pub fn get_raw_transaction(&self, tx_id: &H256) -> Result<RTransaction, ProviderError> {
		self.request("getrawtransaction", json!([Hash256Extension::to_hex(tx_id), true]))
	}

	/// The raw transaction as base64.
	pub fn get_raw_transaction_hex(&self, tx_id: &H256) -> Result<String, ProviderError> {
		self.request("getrawtransaction", json!([Hash256Extension::to_hex(tx_id), false]))
	}

	pub fn get_transaction_height(&self, tx_id: &H256) -> Result<u32, ProviderError> {
		self.request("gettransactionheight", json!([Hash256Extension::to_hex(tx_id)]))
	}

	pub fn get_application_log(&self, tx_id: &H256) -> Result<ApplicationLog, ProviderError> {
		self.request("getapplicationlog", json!([Hash256Extension::to_hex(tx_id)]))
	}

	// Invocation

	pub fn invoke_function(
		&self,
		contract: &H160,
		method: &str,
		params: &[crate::neo_types::ContractParameter],
		signers: Option<&[Signer]>,
	) -> Result<InvocationResult, ProviderError> {
		let mut request_params = vec![
			json!(ScriptHashExtension::to_hex(contract)),
			json!(method),
			serde_json::to_value(params)?,
		];
		if let Some(signers) = signers {
			request_params.push(serde_json::to_value(signers)?);
		}
		self.request("invokefunction", Value::Array(request_params))
	}

	/// Invokes a base64-encoded script.
	pub fn invoke_script(
		&self,
		script_base64: &str,
		signers: &[Signer],
	) -> Result<InvocationResult, ProviderError> {
		if signers.is_empty() {
			self.request("invokescript", json!([script_base64]))
		} else {
			self.request("invokescript", json!([script_base64, signers]))
		}
	}

	/// Fetches up to `count` items from a server-side iterator.
	pub fn traverse_iterator(
		&self,
		session: &str,
		iterator: &str,
		count: u32,
	) -> Result<Vec<StackItem>, ProviderError> {
		self.request("traverseiterator", json!([session, iterator, count]))
	}

	pub fn terminate_session(&self, session: &str) -> Result<bool, ProviderError> {
		self.request("terminatesession", json!([session]))
	}

	// Submission & fees

	pub fn send_raw_transaction(&self, tx_base64: &str) -> Result<RawTransaction, ProviderError> {
		self.request("sendrawtransaction", json!([tx_base64]))
	}

	pub fn calculate_network_fee(&self, tx_base64: &str) -> Result<i64, ProviderError> {
		let result: Value = self.request("calculatenetworkfee", json!([tx_base64]))?;
		let fee = result
			.get("networkfee")
			.ok_or_else(|| ProviderError::shape("calculatenetworkfee without networkfee"))?;
		match fee {
			Value::String(s) => s
				.parse::<i64>()
				.map_err(|e| ProviderError::shape(format!("networkfee: {e}"))),
			Value::Number(n) => n
				.as_i64()
				.ok_or_else(|| ProviderError::shape("networkfee out of range")),
			_ => Err(ProviderError::shape("networkfee is neither string nor number")),
		}
	}

	// Token & state queries

	pub fn get_nep17_balances(&self, address: &str) -> Result<Nep17Balances, ProviderError> {
		self.request("getnep17balances", json!([address]))
	}

	pub fn get_nep17_transfers(
		&self,
		address: &str,
		from: Option<u64>,
		to: Option<u64>,
	) -> Result<Nep17Transfers, ProviderError> {
		let params = match (from, to) {
			(Some(from), Some(to)) => json!([address, from, to]),
			(Some(from), None) => json!([address, from]),
			_ => json!([address]),
		};
		self.request("getnep17transfers", params)
	}

	pub fn get_state_root(&self, index: u32) -> Result<StateRoot, ProviderError> {
		self.request("getstateroot", json!([index]))
	}

	/// The serialized proof as base64.
	pub fn get_proof(
		&self,
		root_hash: &H256,
		contract: &H160,
		key: &[u8],
	) -> Result<String, ProviderError> {
		use crate::neo_types::Base64Encode;
		self.request(
			"getproof",
			json!([
				Hash256Extension::to_hex(root_hash),
				ScriptHashExtension::to_hex(contract),
				key.to_base64()
			]),
		)
	}

	pub fn verify_proof(&self, root_hash: &H256, proof: &str) -> Result<String, ProviderError> {
		self.request("verifyproof", json!([Hash256Extension::to_hex(root_hash), proof]))
	}

	pub fn get_state_height(&self) -> Result<StateHeight, ProviderError> {
		self.request("getstateheight", json!([]))
	}

	pub fn get_unclaimed_gas(&self, address: &str) -> Result<UnclaimedGas, ProviderError> {
		self.request("getunclaimedgas", json!([address]))
	}

	pub fn get_wallet_balance(
		&self,
		asset: &H160,
		address: &str,
	) -> Result<WalletBalance, ProviderError> {
		self.request("getwalletbalance", json!([ScriptHashExtension::to_hex(asset), address]))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::neo_clients::mock::MockTransport;

	#[test]
	fn request_ids_are_monotonic() {
		let mock = MockTransport::new();
		mock.respond_with("getblockcount", json!(1));
		mock.respond_with("getblockcount", json!(2));
		let client = RpcClient::new(mock);

		assert_eq!(client.get_block_count().unwrap(), 1);
		assert_eq!(client.get_block_count().unwrap(), 2);

		let requests = client.transport().requests();
		assert_eq!(requests[0]["id"], 1);
		assert_eq!(requests[1]["id"], 2);
		assert_eq!(requests[0]["jsonrpc"], "2.0");
		assert_eq!(requests[0]["method"], "getblockcount");
	}

	#[test]
	fn node_errors_surface_code_and_message() {
		let mock = MockTransport::new();
		mock.fail_with("sendrawtransaction", -500, "InsufficientFunds");
		let client = RpcClient::new(mock);

		let err = client.send_raw_transaction("AAAA").unwrap_err();
		match err {
			ProviderError::NodeError { code, message, .. } => {
				assert_eq!(code, -500);
				assert_eq!(message, "InsufficientFunds");
			},
			other => panic!("unexpected error {other:?}"),
		}
	}

	#[test]
	fn mismatched_response_id_is_rejected() {
		let mock = MockTransport::new();
		mock.respond_raw("getblockcount", |_| json!({"jsonrpc": "2.0", "id": 999, "result": 5}));
		let client = RpcClient::new(mock);
		assert!(matches!(
			client.get_block_count().unwrap_err(),
			ProviderError::ProtocolError(_)
		));
	}

	#[test]
	fn batch_preserves_request_order() {
		let mock = MockTransport::new();
		mock.respond_batch(|requests| {
			// Answer in reverse order to prove re-pairing by id.
			let mut entries: Vec<_> = requests
				.iter()
				.map(|r| json!({"jsonrpc": "2.0", "id": r["id"], "result": r["method"]}))
				.collect();
			entries.reverse();
			json!(entries)
		});
		let client = RpcClient::new(mock);

		let results = client
			.batch(&[("getblockcount", json!([])), ("getversion", json!([]))])
			.unwrap();
		assert_eq!(results[0].as_ref().unwrap(), "getblockcount");
		assert_eq!(results[1].as_ref().unwrap(), "getversion");
	}

	#[test]
	fn network_fee_parses_string_form() {
		let mock = MockTransport::new();
		mock.respond_with("calculatenetworkfee", json!({"networkfee": "1230610"}));
		let client = RpcClient::new(mock);
		assert_eq!(client.calculate_network_fee("AAAA").unwrap(), 1_230_610);
	}
}
