//! Simulated request outcomes for `GET /api/data`.
//!
//! The handler asks an [`OutcomeGenerator`] how long to "work" and whether
//! to fail. Production uses [`RandomOutcomes`]; tests plug in fixed values.

use std::time::Duration;

use rand::Rng;

use crate::config::OutcomeConfig;

/// Source of per-request processing delay and failure decisions.
///
/// Implementations must be safe to share across request tasks. Each call is
/// an independent draw.
pub trait OutcomeGenerator: Send + Sync {
    /// How long the handler should suspend before answering.
    fn delay(&self) -> Duration;
    /// Whether this request should be answered with a simulated 500.
    fn should_fail(&self) -> bool;
}

/// Uniform random delay in `[min_delay, max_delay]` and Bernoulli failures.
#[derive(Clone, Debug)]
pub struct RandomOutcomes {
    min_delay: Duration,
    max_delay: Duration,
    error_rate: f64,
}

impl RandomOutcomes {
    /// Builds a generator from config. Bounds are swapped if given in the
    /// wrong order and the error rate is clamped into `[0, 1]`.
    pub fn new(cfg: &OutcomeConfig) -> Self {
        let (min_delay, max_delay) = if cfg.min_delay <= cfg.max_delay {
            (cfg.min_delay, cfg.max_delay)
        } else {
            (cfg.max_delay, cfg.min_delay)
        };
        let error_rate = if cfg.error_rate.is_nan() {
            0.0
        } else {
            cfg.error_rate.clamp(0.0, 1.0)
        };

        Self {
            min_delay,
            max_delay,
            error_rate,
        }
    }
}

impl Default for RandomOutcomes {
    fn default() -> Self {
        Self::new(&OutcomeConfig::default())
    }
}

impl OutcomeGenerator for RandomOutcomes {
    fn delay(&self) -> Duration {
        let secs = rand::thread_rng()
            .gen_range(self.min_delay.as_secs_f64()..=self.max_delay.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    fn should_fail(&self) -> bool {
        rand::thread_rng().gen_bool(self.error_rate)
    }
}

/// Deterministic generator for tests: always the same delay and verdict.
#[cfg(test)]
#[derive(Clone, Debug)]
pub(crate) struct FixedOutcomes {
    pub delay: Duration,
    pub fail: bool,
}

#[cfg(test)]
impl OutcomeGenerator for FixedOutcomes {
    fn delay(&self) -> Duration {
        self.delay
    }

    fn should_fail(&self) -> bool {
        self.fail
    }
}
