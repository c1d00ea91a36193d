//! Browser task spawning and timers

use crate::bootstrap::Sleeper;
use async_trait::async_trait;
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use std::time::Duration;

/// Spawns onto the browser microtask queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
	fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
		wasm_bindgen_futures::spawn_local(future);
		Ok(())
	}
}

/// Sleeps with `setTimeout`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutSleeper;

#[async_trait(?Send)]
impl Sleeper for TimeoutSleeper {
	async fn sleep(&self, duration: Duration) {
		gloo_timers::future::sleep(duration).await;
	}
}
