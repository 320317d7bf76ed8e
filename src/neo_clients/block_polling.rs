//! Block subscription by polling.
//!
//! One dedicated OS thread per subscription polls `getblockcount` on a
//! fixed interval and notifies subscribers with the latest confirmed
//! index (`count - 1`) whenever it grows. Emitted indices are
//! monotonically non-decreasing and delivered in registration order.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, warn};

use crate::neo_clients::{JsonRpcTransport, RpcClient};

/// Default poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

type BlockCallback = Box<dyn Fn(u32) + Send + Sync>;

/// A polling block subscription.
pub struct BlockPolling<T: JsonRpcTransport + Send + Sync + 'static> {
	client: Arc<RpcClient<T>>,
	interval: Duration,
	callbacks: Arc<Mutex<Vec<BlockCallback>>>,
	running: Arc<AtomicBool>,
	worker: Option<JoinHandle<()>>,
}

impl<T: JsonRpcTransport + Send + Sync + 'static> BlockPolling<T> {
	pub fn new(client: Arc<RpcClient<T>>) -> Self {
		Self::with_interval(client, DEFAULT_POLL_INTERVAL)
	}

	pub fn with_interval(client: Arc<RpcClient<T>>, interval: Duration) -> Self {
		Self {
			client,
			interval,
			callbacks: Arc::new(Mutex::new(Vec::new())),
			running: Arc::new(AtomicBool::new(false)),
			worker: None,
		}
	}

	/// Registers a callback. Callbacks run on the worker thread and must
	/// not block.
	pub fn subscribe<F>(&self, callback: F)
	where
		F: Fn(u32) + Send + Sync + 'static,
	{
		self.callbacks.lock().unwrap().push(Box::new(callback));
	}

	pub fn clear_subscriptions(&self) {
		self.callbacks.lock().unwrap().clear();
	}

	/// Starts the worker thread. A second call is a no-op while running.
	pub fn start(&mut self) {
		if self.running.swap(true, Ordering::SeqCst) {
			return;
		}
		let client = Arc::clone(&self.client);
		let callbacks = Arc::clone(&self.callbacks);
		let running = Arc::clone(&self.running);
		let interval = self.interval;

		self.worker = Some(std::thread::spawn(move || {
			let mut last_index: Option<u32> = None;
			while running.load(Ordering::SeqCst) {
				match client.get_block_count() {
					Ok(count) if count > 0 => {
						let current = count - 1;
						if last_index.map_or(true, |last| current > last) {
							last_index = Some(current);
							notify(&callbacks, current);
						}
					},
					Ok(_) => {},
					Err(e) => debug!("block polling error: {e}"),
				}
				// Sleep in short slices so stop() is honored promptly.
				let mut remaining = interval;
				while running.load(Ordering::SeqCst) && !remaining.is_zero() {
					let slice = remaining.min(Duration::from_millis(50));
					std::thread::sleep(slice);
					remaining = remaining.saturating_sub(slice);
				}
			}
		}));
	}

	/// Signals the worker to stop at the next poll boundary and joins it.
	pub fn stop(&mut self) {
		self.running.store(false, Ordering::SeqCst);
		if let Some(worker) = self.worker.take() {
			let _ = worker.join();
		}
	}

	pub fn is_running(&self) -> bool {
		self.running.load(Ordering::SeqCst)
	}
}

fn notify(callbacks: &Mutex<Vec<BlockCallback>>, block_index: u32) {
	let callbacks = callbacks.lock().unwrap();
	for callback in callbacks.iter() {
		// One faulty subscriber must not halt the worker.
		if catch_unwind(AssertUnwindSafe(|| callback(block_index))).is_err() {
			warn!("block subscriber panicked at index {block_index}");
		}
	}
}

impl<T: JsonRpcTransport + Send + Sync + 'static> Drop for BlockPolling<T> {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use serde_json::json;

	use super::*;
	use crate::neo_clients::mock::MockTransport;

	fn polling_client(counts: &[u32]) -> Arc<RpcClient<MockTransport>> {
		let mock = MockTransport::new();
		for count in counts {
			mock.respond_with("getblockcount", json!(count));
		}
		Arc::new(RpcClient::new(mock))
	}

	#[test]
	fn notifies_latest_confirmed_block_once() {
		let client = polling_client(&[5, 5, 7]);
		let mut polling = BlockPolling::with_interval(Arc::clone(&client), Duration::from_millis(5));

		let seen = Arc::new(Mutex::new(Vec::new()));
		let seen_clone = Arc::clone(&seen);
		polling.subscribe(move |index| seen_clone.lock().unwrap().push(index));

		polling.start();
		// Let the worker take several polls.
		std::thread::sleep(Duration::from_millis(80));
		polling.stop();

		let seen = seen.lock().unwrap();
		// 5 -> index 4 once, then 7 -> index 6 once; duplicates suppressed.
		assert!(seen.starts_with(&[4]));
		assert!(seen.contains(&6));
		let fours = seen.iter().filter(|i| **i == 4).count();
		assert_eq!(fours, 1);
		// Monotonically non-decreasing.
		assert!(seen.windows(2).all(|w| w[0] <= w[1]));
	}

	#[test]
	fn subscriber_panic_does_not_halt_worker() {
		let client = polling_client(&[3, 9]);
		let mut polling = BlockPolling::with_interval(Arc::clone(&client), Duration::from_millis(5));

		let calls = Arc::new(AtomicUsize::new(0));
		polling.subscribe(|_| panic!("faulty subscriber"));
		let calls_clone = Arc::clone(&calls);
		polling.subscribe(move |_| {
			calls_clone.fetch_add(1, Ordering::SeqCst);
		});

		polling.start();
		std::thread::sleep(Duration::from_millis(60));
		polling.stop();

		// The healthy subscriber heard both heights despite its peer.
		assert!(calls.load(Ordering::SeqCst) >= 2);
	}

	#[test]
	fn stop_joins_the_worker() {
		let client = polling_client(&[1]);
		let mut polling = BlockPolling::with_interval(client, Duration::from_millis(5));
		polling.start();
		assert!(polling.is_running());
		polling.stop();
		assert!(!polling.is_running());
	}
}
