use super::connection_probe::BackendProbe;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Initial probe plus three retries.
pub const MAX_PROBE_ATTEMPTS: u32 = 4;
pub const BASE_RETRY_DELAY: Duration = Duration::from_millis(1000);
pub const EXHAUSTION_COOLDOWN: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total probes issued before giving up.
    pub max_attempts: u32,
    /// Wait before retry `n` is `base_delay * n`.
    pub base_delay: Duration,
    /// How long an exhausted manager refuses to probe again.
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_PROBE_ATTEMPTS,
            base_delay: BASE_RETRY_DELAY,
            cooldown: EXHAUSTION_COOLDOWN,
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPhase {
    Uninitialized,
    Ready,
    Exhausted,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionState {
    pub phase: ConnectionPhase,
    pub is_ready: bool,
    pub attempt_count: u32,
    pub max_attempts: u32,
}

struct ProbeLedger {
    attempt_count: u32,
    exhausted_at: Option<Instant>,
}

/// Gate that confirms the data-layer backend answers before the app trusts it.
///
/// `Ready` is latched for the lifetime of the manager. Exhaustion is sticky until
/// the policy's cooldown has passed since the last failed probe, after which the
/// next call starts a fresh round of attempts.
pub struct ConnectionManager {
    probe: Arc<dyn BackendProbe>,
    policy: RetryPolicy,
    ready: AtomicBool,
    ledger: Mutex<ProbeLedger>,
}

impl ConnectionManager {
    pub fn new(probe: Arc<dyn BackendProbe>, policy: RetryPolicy) -> Self {
        Self {
            probe,
            policy,
            ready: AtomicBool::new(false),
            ledger: Mutex::new(ProbeLedger {
                attempt_count: 0,
                exhausted_at: None,
            }),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> ConnectionState {
        let ledger = self.ledger.lock().await;
        let is_ready = self.is_ready();
        let phase = if is_ready {
            ConnectionPhase::Ready
        } else if ledger.exhausted_at.is_some() {
            ConnectionPhase::Exhausted
        } else {
            ConnectionPhase::Uninitialized
        };

        ConnectionState {
            phase,
            is_ready,
            attempt_count: ledger.attempt_count,
            max_attempts: self.policy.max_attempts,
        }
    }

    /// Returns true once the backend has answered a probe. Never errors.
    pub async fn ensure_ready(&self) -> bool {
        if self.is_ready() {
            return true;
        }

        // Concurrent callers queue here and see the outcome of whoever probed first.
        let mut ledger = self.ledger.lock().await;
        if self.is_ready() {
            return true;
        }

        if let Some(exhausted_at) = ledger.exhausted_at {
            if exhausted_at.elapsed() < self.policy.cooldown {
                warn!(
                    attempts = ledger.attempt_count,
                    "Backend probing exhausted, skipping until cooldown elapses"
                );
                return false;
            }
            info!("Backend probe cooldown elapsed, starting a fresh round");
            ledger.attempt_count = 0;
            ledger.exhausted_at = None;
        }

        while ledger.attempt_count < self.policy.max_attempts {
            ledger.attempt_count += 1;
            let attempt = ledger.attempt_count;

            match self.probe.probe().await {
                Ok(()) => {
                    self.ready.store(true, Ordering::Release);
                    info!(attempt, "Successfully connected to backend");
                    return true;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "Backend connection probe failed"
                    );
                }
            }

            if attempt < self.policy.max_attempts {
                let delay = self.policy.delay_after(attempt);
                info!(attempt, ?delay, "Retrying backend connection");
                tokio::time::sleep(delay).await;
            }
        }

        ledger.exhausted_at = Some(Instant::now());
        error!(
            attempts = ledger.attempt_count,
            "Backend unreachable after all probe attempts"
        );
        false
    }
}
