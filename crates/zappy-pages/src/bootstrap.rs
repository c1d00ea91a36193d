//! Waiting for third-party globals
//!
//! Widget scripts load asynchronously, so their globals may not exist yet
//! when the page script runs. [`acquire`] polls for one a bounded number of
//! times and then gives up with [`CapabilityError::Unavailable`].

use async_trait::async_trait;
use std::time::Duration;
use zappy_conf::BootstrapSettings;

/// Default number of probes.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Default pause between probes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
	#[error("Capability unavailable after {attempts} attempts")]
	Unavailable { attempts: u32 },
}

/// How often and how long to probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
	pub max_attempts: u32,
	pub interval: Duration,
}

impl Default for PollPolicy {
	fn default() -> Self {
		Self {
			max_attempts: DEFAULT_MAX_ATTEMPTS,
			interval: DEFAULT_INTERVAL,
		}
	}
}

impl From<&BootstrapSettings> for PollPolicy {
	fn from(settings: &BootstrapSettings) -> Self {
		Self {
			max_attempts: settings.max_attempts,
			interval: settings.interval(),
		}
	}
}

/// Suspends the current task for a while.
#[async_trait(?Send)]
pub trait Sleeper {
	async fn sleep(&self, duration: Duration);
}

/// A handle obtained by [`acquire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired<H> {
	pub handle: H,
	/// Probes made, including the successful one.
	pub attempts: u32,
}

/// Calls `probe` until it yields a handle or `policy.max_attempts` probes
/// have missed, sleeping `policy.interval` between misses.
pub async fn acquire<H, P, S>(
	mut probe: P,
	policy: PollPolicy,
	sleeper: &S,
) -> Result<Acquired<H>, CapabilityError>
where
	P: FnMut() -> Option<H>,
	S: Sleeper + ?Sized,
{
	for attempt in 1..=policy.max_attempts {
		if let Some(handle) = probe() {
			tracing::debug!(attempt, "capability acquired");
			return Ok(Acquired {
				handle,
				attempts: attempt,
			});
		}
		if attempt < policy.max_attempts {
			sleeper.sleep(policy.interval).await;
		}
	}

	tracing::debug!(attempts = policy.max_attempts, "capability unavailable");
	Err(CapabilityError::Unavailable {
		attempts: policy.max_attempts,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockSleeper;
	use futures::executor::block_on;
	use rstest::rstest;

	#[rstest]
	fn test_immediate_hit_never_sleeps() {
		let sleeper = MockSleeper::new();
		let acquired = block_on(acquire(|| Some("cc"), PollPolicy::default(), &sleeper)).unwrap();

		assert_eq!(acquired.handle, "cc");
		assert_eq!(acquired.attempts, 1);
		assert!(sleeper.sleeps().is_empty());
	}

	#[rstest]
	fn test_hit_after_misses() {
		let sleeper = MockSleeper::new();
		let mut calls = 0;
		let probe = || {
			calls += 1;
			(calls == 3).then_some(42)
		};

		let acquired = block_on(acquire(probe, PollPolicy::default(), &sleeper)).unwrap();

		assert_eq!(acquired.attempts, 3);
		assert_eq!(sleeper.sleeps(), vec![DEFAULT_INTERVAL; 2]);
	}

	#[rstest]
	#[case(1)]
	#[case(5)]
	#[case(50)]
	fn test_gives_up_after_bound(#[case] max_attempts: u32) {
		let sleeper = MockSleeper::new();
		let mut calls = 0;
		let policy = PollPolicy {
			max_attempts,
			interval: Duration::from_millis(10),
		};

		let result = block_on(acquire(
			|| {
				calls += 1;
				None::<()>
			},
			policy,
			&sleeper,
		));

		assert_eq!(result, Err(CapabilityError::Unavailable { attempts: max_attempts }));
		assert_eq!(calls, max_attempts);
		assert_eq!(sleeper.sleeps().len() as u32, max_attempts - 1);
	}

	#[rstest]
	fn test_policy_from_settings() {
		let settings = BootstrapSettings {
			max_attempts: 10,
			interval_ms: 250,
		};
		let policy = PollPolicy::from(&settings);
		assert_eq!(policy.max_attempts, 10);
		assert_eq!(policy.interval, Duration::from_millis(250));
	}
}
