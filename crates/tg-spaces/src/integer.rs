//! Integer spaces: a contiguous inclusive range, stored as the expansion
//! `[lower, lower+1, ..., upper]` of a categorical space.

use serde::{Deserialize, Serialize};
use tg_types::{ConstructionError, TgResult};

use crate::categorical::Categorical;
use crate::space::{Candidate, Space, SpaceId};

/// Serialized form; only the raw bounds and default are persisted, the
/// expansion is rebuilt (and re-validated) on deserialization.
#[derive(Serialize, Deserialize)]
struct RawInteger {
    lower: i64,
    upper: i64,
    default: Option<i64>,
}

/// A thin specialization of [`Categorical`] over a contiguous integer range.
///
/// The raw bounds and raw default are kept for display; sampling, membership,
/// abstraction and equality all delegate to the expanded candidate list. The
/// raw default is validated against the bounds and then converted to its
/// position in the expansion, so the inner categorical only ever sees an
/// index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawInteger", into = "RawInteger")]
pub struct Integer {
    lower: i64,
    upper: i64,
    default: Option<i64>,
    expanded: Categorical,
}

impl Integer {
    /// Build an integer space over `[lower, upper]` inclusive.
    pub fn new(lower: i64, upper: i64) -> TgResult<Self> {
        Ok(Self::build(lower, upper, None)?)
    }

    /// Build an integer space with a default value, given in value terms
    /// (not as an index).
    pub fn with_default(lower: i64, upper: i64, default: i64) -> TgResult<Self> {
        Ok(Self::build(lower, upper, Some(default))?)
    }

    fn build(lower: i64, upper: i64, default: Option<i64>) -> Result<Self, ConstructionError> {
        if lower > upper {
            return Err(ConstructionError::InvalidIntegerBounds { lower, upper });
        }
        if let Some(value) = default {
            if value < lower || value > upper {
                return Err(ConstructionError::DefaultValueOutOfRange {
                    default: value,
                    lower,
                    upper,
                });
            }
        }
        let candidates: Vec<Candidate> = (lower..=upper).map(Candidate::from).collect();
        // The inner categorical indexes candidates by position, so the raw
        // default converts to its offset from the lower bound before
        // delegation.
        let default_index = default.map(|value| (value - lower) as usize);
        let expanded = Categorical::build(candidates, default_index)?;
        Ok(Self {
            lower,
            upper,
            default,
            expanded,
        })
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    /// The raw default value, if any (value terms, not an index).
    pub fn default(&self) -> Option<i64> {
        self.default
    }

    /// The expanded candidate list this space delegates to.
    pub fn as_categorical(&self) -> &Categorical {
        &self.expanded
    }

    pub fn id(&self) -> SpaceId {
        self.expanded.id()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn determined(&self) -> bool {
        self.expanded.determined()
    }

    pub fn random(&self, recursion: bool) -> TgResult<Candidate> {
        self.expanded.random(recursion)
    }

    pub fn abstracted(&self) -> Space {
        self.expanded.abstracted()
    }

    pub fn has(&self, x: &Candidate) -> TgResult<bool> {
        self.expanded.has(x)
    }

    /// Shows the raw bounds and default, not the expansion, so wide ranges
    /// stay readable.
    pub fn xrepr(&self, indent: usize) -> String {
        format!(
            "{pad}Integer(lower={lower}, upper={upper}, default={default})",
            pad = " ".repeat(indent),
            lower = self.lower,
            upper = self.upper,
            default = match self.default {
                Some(value) => value.to_string(),
                None => "None".to_string(),
            },
        )
    }
}

impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        self.expanded == other.expanded
    }
}

impl TryFrom<RawInteger> for Integer {
    type Error = ConstructionError;

    fn try_from(raw: RawInteger) -> Result<Self, Self::Error> {
        Self::build(raw.lower, raw.upper, raw.default)
    }
}

impl From<Integer> for RawInteger {
    fn from(space: Integer) -> Self {
        Self {
            lower: space.lower,
            upper: space.upper,
            default: space.default,
        }
    }
}
