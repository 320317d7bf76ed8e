//! The JSON-RPC client layer: a blocking transport, the typed request
//! engine and the polling block subscription.

pub use block_polling::{BlockPolling, DEFAULT_POLL_INTERVAL};
pub use errors::ProviderError;
pub use http_provider::{HttpProvider, JsonRpcTransport, DEFAULT_TIMEOUT};
pub use rpc_client::RpcClient;

mod block_polling;
mod errors;
mod http_provider;
mod rpc_client;

#[cfg(test)]
pub(crate) mod mock;
