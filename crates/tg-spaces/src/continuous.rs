//! Continuous spaces: a real interval, optionally sampled in log space.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tg_types::{TgResult, Value};

use crate::space::{expect_value, next_space_id, Candidate, Space, SpaceId};

/// Determinism tolerance used when none is given explicitly.
pub const DEFAULT_EPS: f64 = 1e-9;

/// A space over the real interval `[lower, upper]`.
///
/// With `log_scale` set, sampling is uniform in `[ln(lower), ln(upper)]` and
/// the draw is exponentiated, which is the usual shape for learning rates and
/// other order-of-magnitude parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Continuous {
    #[serde(skip, default = "next_space_id")]
    id: SpaceId,
    lower: f64,
    upper: f64,
    default: Option<f64>,
    log_scale: bool,
    eps: f64,
}

impl Continuous {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            id: next_space_id(),
            lower,
            upper,
            default: None,
            log_scale: false,
            eps: DEFAULT_EPS,
        }
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn log_scale(mut self, on: bool) -> Self {
        self.log_scale = on;
        self
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn default(&self) -> Option<f64> {
        self.default
    }

    pub fn use_log(&self) -> bool {
        self.log_scale
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// An interval is determined once its width collapses below the
    /// tolerance.
    pub fn determined(&self) -> bool {
        (self.upper - self.lower).abs() <= self.eps
    }

    /// Uniform draw over the interval. The recursion flag is irrelevant
    /// here; there is nothing to recurse into.
    ///
    /// Inverted bounds sample from the reversed interval instead of
    /// panicking; the stored bounds are untouched.
    pub fn random(&self, _recursion: bool) -> Candidate {
        let (low, high) = if self.lower <= self.upper {
            (self.lower, self.upper)
        } else {
            (self.upper, self.lower)
        };
        let mut rng = rand::rng();
        let sample = if self.log_scale {
            let draw: f64 = rng.random_range(low.ln()..=high.ln());
            // exp(ln(x)) can land one ulp past the bound.
            draw.exp().clamp(low, high)
        } else {
            rng.random_range(low..=high)
        };
        Candidate::Value(Value::Float(sample))
    }

    /// Continuous ranges are value-level leaves; abstraction yields an
    /// independent copy rather than a virtual tree.
    pub fn abstracted(&self) -> Space {
        Space::Continuous(self.clone())
    }

    /// Inclusive containment after permissive numeric coercion; values that
    /// do not coerce to a float are simply not members.
    pub fn has(&self, x: &Candidate) -> TgResult<bool> {
        let value = expect_value(x)?;
        Ok(match value.as_f64() {
            Some(v) => self.lower <= v && v <= self.upper,
            None => false,
        })
    }

    pub fn xrepr(&self, indent: usize) -> String {
        format!(
            "{pad}Continuous(lower={lower}, upper={upper}, default_value={default}, log_scale={log})",
            pad = " ".repeat(indent),
            lower = self.lower,
            upper = self.upper,
            default = match self.default {
                Some(value) => value.to_string(),
                None => "None".to_string(),
            },
            log = self.log_scale,
        )
    }
}

/// Structural equality on `(lower, upper, default, log flag, eps)`; the
/// stable id is ignored.
impl PartialEq for Continuous {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower
            && self.upper == other.upper
            && self.default == other.default
            && self.log_scale == other.log_scale
            && self.eps == other.eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_types::TgError;

    fn unwrap_float(candidate: Candidate) -> f64 {
        match candidate {
            Candidate::Value(Value::Float(v)) => v,
            other => panic!("expected a float draw, got {other:?}"),
        }
    }

    #[test]
    fn draws_stay_in_bounds() {
        let space = Continuous::new(0.5, 2.5);
        for _ in 0..10_000 {
            let v = unwrap_float(space.random(true));
            assert!((0.5..=2.5).contains(&v), "drew {v}");
        }
    }

    #[test]
    fn log_draws_stay_in_bounds_after_exponentiation() {
        let space = Continuous::new(1e-5, 1e-1).log_scale(true);
        for _ in 0..10_000 {
            let v = unwrap_float(space.random(true));
            assert!((1e-5..=1e-1).contains(&v), "drew {v}");
        }
    }

    #[test]
    fn inverted_bounds_sample_the_reversed_interval() {
        let space = Continuous::new(2.0, 1.0);
        for _ in 0..1000 {
            let v = unwrap_float(space.random(true));
            assert!((1.0..=2.0).contains(&v), "drew {v}");
        }

        let log = Continuous::new(1e-1, 1e-3).log_scale(true);
        for _ in 0..1000 {
            let v = unwrap_float(log.random(true));
            assert!((1e-3..=1e-1).contains(&v), "drew {v}");
        }
    }

    #[test]
    fn zero_width_interval_is_determined() {
        assert!(Continuous::new(0.0, 0.0).determined());
        assert!(!Continuous::new(0.0, 1.0).determined());
        // A wide tolerance collapses a wide interval.
        assert!(Continuous::new(0.0, 1.0).with_eps(2.0).determined());
    }

    #[test]
    fn membership_coerces_numerics() {
        let space = Continuous::new(0.0, 1.0);
        assert!(space.has(&0.5.into()).unwrap());
        assert!(space.has(&0.into()).unwrap());
        assert!(space.has(&1.into()).unwrap());
        assert!(!space.has(&1.5.into()).unwrap());
        // Non-numeric values fail the coercion, not the call.
        assert!(!space.has(&"lr".into()).unwrap());
        assert!(!space.has(&true.into()).unwrap());
    }

    #[test]
    fn membership_rejects_space_arguments() {
        let space = Continuous::new(0.0, 1.0);
        let probe: Candidate = Continuous::new(0.0, 1.0).into();
        match space.has(&probe) {
            Err(TgError::SpaceAsValue) => (),
            other => panic!("expected SpaceAsValue, got {other:?}"),
        }
    }

    #[test]
    fn abstraction_is_an_equal_copy() {
        let space = Continuous::new(1e-4, 1e-1).log_scale(true).with_default(1e-2);
        match space.abstracted() {
            Space::Continuous(copy) => assert_eq!(copy, space),
            other => panic!("expected a Continuous, got {other:?}"),
        }
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(Continuous::new(0.0, 1.0), Continuous::new(0.0, 1.0));
        assert_ne!(
            Continuous::new(0.0, 1.0),
            Continuous::new(0.0, 1.0).log_scale(true)
        );
        assert_ne!(
            Continuous::new(0.0, 1.0),
            Continuous::new(0.0, 1.0).with_default(0.5)
        );
    }

    #[test]
    fn xrepr_shows_interval_and_flags() {
        assert_eq!(
            Continuous::new(0.0, 1.0).xrepr(0),
            "Continuous(lower=0, upper=1, default_value=None, log_scale=false)"
        );
        assert_eq!(
            Continuous::new(0.001, 0.1).with_default(0.01).log_scale(true).xrepr(2),
            "  Continuous(lower=0.001, upper=0.1, default_value=0.01, log_scale=true)"
        );
    }
}
