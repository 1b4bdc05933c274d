//! One-shot readiness gate that resolves after a quiet period.
//!
//! Plugins register their applications in a burst while the host boots.
//! The gate holds back menu queries until that burst has settled: every
//! [`ReadyGate::touch`] pushes the deadline back by the quiet period, and the
//! gate resolves once a deadline passes without being pushed. Only the
//! trailing edge counts. Once resolved, the gate never re-arms.
//!
//! ```text
//! Pending --touch--> Armed --touch--> Armed
//!                      |
//!                      +--deadline elapsed--> Resolved (terminal)
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Pending,
    Armed { deadline: Instant },
    Resolved,
}

#[derive(Debug)]
struct GateShared {
    quiet_period: Duration,
    state: Mutex<GateState>,
    ready: watch::Sender<bool>,
}

/// Debounced, resolve-once readiness signal.
///
/// Cloning yields another handle to the same gate.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    shared: Arc<GateShared>,
}

impl ReadyGate {
    /// Create a pending gate with the given quiet period.
    pub fn new(quiet_period: Duration) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            shared: Arc::new(GateShared {
                quiet_period,
                state: Mutex::new(GateState::Pending),
                ready,
            }),
        }
    }

    /// The configured quiet period.
    pub fn quiet_period(&self) -> Duration {
        self.shared.quiet_period
    }

    /// Record activity: (re)start the countdown unless already resolved.
    ///
    /// The first touch spawns the timer task on the current Tokio runtime.
    /// Outside a runtime the touch is logged and ignored, and the gate stays
    /// pending until a touch happens inside one.
    pub fn touch(&self) {
        let deadline = Instant::now() + self.shared.quiet_period;
        let mut state = self.shared.state.lock();
        match *state {
            GateState::Resolved => {}
            GateState::Armed { .. } => *state = GateState::Armed { deadline },
            GateState::Pending => {
                let runtime = match Handle::try_current() {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        log::error!("Readiness gate not armed, no Tokio runtime: {}", e);
                        return;
                    }
                };
                *state = GateState::Armed { deadline };
                runtime.spawn(run_timer(Arc::clone(&self.shared)));
                log::debug!(
                    "Readiness gate armed ({} ms quiet period)",
                    self.shared.quiet_period.as_millis()
                );
            }
        }
    }

    /// Whether the gate has resolved.
    pub fn is_ready(&self) -> bool {
        *self.shared.ready.borrow()
    }

    /// Wait until the gate resolves. Returns immediately once it has.
    pub async fn wait(&self) {
        let mut rx = self.shared.ready.subscribe();
        // The sender lives as long as `self`, so this only returns on resolve.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

async fn run_timer(shared: Arc<GateShared>) {
    loop {
        let deadline = match *shared.state.lock() {
            GateState::Armed { deadline } => deadline,
            _ => return,
        };
        tokio::time::sleep_until(deadline).await;

        let mut state = shared.state.lock();
        if let GateState::Armed { deadline } = *state {
            if deadline <= Instant::now() {
                *state = GateState::Resolved;
                shared.ready.send_replace(true);
                log::debug!("Readiness gate resolved");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const QUIET: Duration = Duration::from_millis(1000);

    #[tokio::test(start_paused = true)]
    async fn test_untouched_gate_stays_pending() {
        let gate = ReadyGate::new(QUIET);
        sleep(Duration::from_secs(10)).await;
        assert!(!gate.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolves_after_quiet_period() {
        let gate = ReadyGate::new(QUIET);
        let start = Instant::now();

        gate.touch();
        gate.wait().await;

        assert!(gate.is_ready());
        let elapsed = start.elapsed();
        assert!(elapsed >= QUIET, "resolved early: {elapsed:?}");
        assert!(elapsed < QUIET + Duration::from_millis(50), "resolved late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_touch_pushes_deadline_back() {
        let gate = ReadyGate::new(QUIET);
        let start = Instant::now();

        gate.touch();
        sleep(Duration::from_millis(300)).await;
        gate.touch();
        sleep(Duration::from_millis(600)).await;
        gate.touch();

        sleep(Duration::from_millis(150)).await;
        assert!(!gate.is_ready(), "must not resolve one quiet period after the first touch");

        gate.wait().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1900), "resolved early: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(1950), "resolved late: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_after_resolve_is_noop() {
        let gate = ReadyGate::new(QUIET);
        gate.touch();
        gate.wait().await;

        gate.touch();
        assert!(gate.is_ready());
        assert_eq!(*gate.shared.state.lock(), GateState::Resolved);

        // Waiting on a resolved gate returns without advancing time.
        let before = Instant::now();
        gate.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_pending_until_resolved() {
        let gate = ReadyGate::new(QUIET);
        gate.touch();

        let mut waiter = tokio_test::task::spawn(gate.wait());
        tokio_test::assert_pending!(waiter.poll());

        sleep(QUIET + Duration::from_millis(10)).await;
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }

    #[test]
    fn test_touch_outside_runtime_leaves_gate_pending() {
        let gate = ReadyGate::new(Duration::from_millis(50));

        gate.touch();
        assert_eq!(*gate.shared.state.lock(), GateState::Pending);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        runtime.block_on(async {
            gate.touch();
            tokio::time::timeout(Duration::from_secs(2), gate.wait())
                .await
                .expect("gate resolves once touched inside a runtime");
        });
        assert!(gate.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_waiters_released_together() {
        let gate = ReadyGate::new(QUIET);
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let gate = gate.clone();
                tokio::spawn(async move { gate.wait().await })
            })
            .collect();

        gate.touch();
        for waiter in waiters {
            waiter.await.unwrap();
        }
        assert!(gate.is_ready());
    }
}
