use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use log::warn;
use tokio::time::Instant;

use crate::config::CircuitBreakerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// One breaker per vendor. In `Open`, calls are rejected immediately.
/// After `recovery_timeout`, the breaker moves to `HalfOpen` and admits up
/// to `half_open_probes` calls; any failure there re-opens it, a success
/// closes it.
pub struct CircuitBreaker {
    name: &'static str,
    config: CircuitBreakerConfig,
    state: Mutex<CircuitState>,
    opened_at: Mutex<Option<Instant>>,
    consecutive_failures: AtomicU32,
    half_open_probes_issued: AtomicU32,
}

impl CircuitBreaker {
    pub fn new(name: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            name,
            config,
            state: Mutex::new(CircuitState::Closed),
            opened_at: Mutex::new(None),
            consecutive_failures: AtomicU32::new(0),
            half_open_probes_issued: AtomicU32::new(0),
        }
    }

    /// Returns true if a call is currently allowed through. Also performs
    /// the Open -> HalfOpen auto-transition when the recovery window has
    /// elapsed.
    pub fn allow_call(&self) -> bool {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        match *state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                let issued = self.half_open_probes_issued.fetch_add(1, Ordering::SeqCst);
                issued < self.config.half_open_probes
            }
            CircuitState::Open => {
                let opened_at = *self.opened_at.lock().expect("opened_at mutex poisoned");
                let elapsed = opened_at.map(|t| t.elapsed()).unwrap_or(Duration::ZERO);
                if elapsed >= Duration::from_secs(self.config.recovery_timeout_secs) {
                    *state = CircuitState::HalfOpen;
                    self.half_open_probes_issued.store(1, Ordering::SeqCst);
                    warn!(
                        "circuit breaker {} transitioning open -> half-open after {:?}",
                        self.name, elapsed
                    );
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        self.consecutive_failures.store(0, Ordering::SeqCst);
        if *state == CircuitState::HalfOpen {
            *state = CircuitState::Closed;
            self.half_open_probes_issued.store(0, Ordering::SeqCst);
            warn!("circuit breaker {} closed after successful probe", self.name);
        }
    }

    pub fn record_failure(&self) {
        let mut state = self.state.lock().expect("circuit breaker mutex poisoned");
        match *state {
            CircuitState::HalfOpen => {
                self.trip(&mut state);
            }
            CircuitState::Closed => {
                let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failures_before_open {
                    self.trip(&mut state);
                }
            }
            CircuitState::Open => {}
        }
    }

    fn trip(&self, state: &mut CircuitState) {
        *state = CircuitState::Open;
        *self.opened_at.lock().expect("opened_at mutex poisoned") = Some(Instant::now());
        warn!("circuit breaker {} opened", self.name);
    }

    pub fn state(&self) -> CircuitState {
        *self.state.lock().expect("circuit breaker mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failures_before_open: 3,
            recovery_timeout_secs: 0,
            half_open_probes: 3,
        }
    }

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = CircuitBreaker::new("test", config());
        assert!(breaker.allow_call());
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.allow_call());
    }

    #[test]
    fn half_open_success_closes_breaker() {
        let breaker = CircuitBreaker::new("test", config());
        for _ in 0..3 {
            breaker.record_failure();
        }
        assert_eq!(breaker.state(), CircuitState::Open);
        // recovery_timeout_secs is 0, so the next allow_call transitions.
        assert!(breaker.allow_call());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn half_open_failure_reopens_breaker() {
        let breaker = CircuitBreaker::new("test", config());
        for _ in 0..3 {
            breaker.record_failure();
        }
        assert!(breaker.allow_call());
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
