//! Categorical spaces: an ordered, non-empty set of candidates, each either a
//! concrete value or a nested sub-space.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tg_types::{ConstructionError, TgResult};

use crate::node::VirtualNode;
use crate::space::{expect_value, next_space_id, Candidate, Space, SpaceId};

/// Serialized form; ids are not persisted, fresh ones are assigned on
/// deserialization and the construction invariants are re-checked.
#[derive(Serialize, Deserialize)]
struct RawCategorical {
    candidates: Vec<Candidate>,
    default_index: Option<usize>,
}

/// A space over a finite, ordered candidate list.
///
/// Candidates may themselves be spaces, so categorical spaces nest to
/// arbitrary depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCategorical", into = "RawCategorical")]
pub struct Categorical {
    id: SpaceId,
    candidates: Vec<Candidate>,
    default_index: Option<usize>,
}

impl Categorical {
    /// Build a categorical space with no default. Fails on an empty
    /// candidate list.
    pub fn new(candidates: Vec<Candidate>) -> TgResult<Self> {
        Ok(Self::build(candidates, None)?)
    }

    /// Build a categorical space with a default candidate, given by index
    /// into the candidate list.
    pub fn with_default(candidates: Vec<Candidate>, default_index: usize) -> TgResult<Self> {
        Ok(Self::build(candidates, Some(default_index))?)
    }

    pub(crate) fn build(
        candidates: Vec<Candidate>,
        default_index: Option<usize>,
    ) -> Result<Self, ConstructionError> {
        if candidates.is_empty() {
            return Err(ConstructionError::EmptyCandidateSet);
        }
        if let Some(index) = default_index {
            if index >= candidates.len() {
                return Err(ConstructionError::DefaultIndexOutOfRange {
                    index,
                    len: candidates.len(),
                });
            }
        }
        Ok(Self {
            id: next_space_id(),
            candidates,
            default_index,
        })
    }

    pub fn id(&self) -> SpaceId {
        self.id
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn default_index(&self) -> Option<usize> {
        self.default_index
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        // Construction forbids empty candidate lists.
        false
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    /// A categorical space is determined when it has a single candidate and
    /// that candidate is either concrete or itself determined.
    pub fn determined(&self) -> bool {
        match self.candidates.as_slice() {
            [Candidate::Value(_)] => true,
            [Candidate::Space(space)] => space.determined(),
            _ => false,
        }
    }

    /// Uniform unweighted draw among the candidates. With `recursion`, a
    /// draw that lands on a nested sub-space keeps sampling inside it.
    pub fn random(&self, recursion: bool) -> TgResult<Candidate> {
        let mut rng = rand::rng();
        let pick = &self.candidates[rng.random_range(0..self.candidates.len())];
        match pick {
            Candidate::Space(space) if recursion => space.random(true),
            other => Ok(other.clone()),
        }
    }

    /// Project to the undetermined structure.
    ///
    /// A determined categorical collapses to a [`VirtualNode`] leaf wrapping
    /// it, keyed by this node's stable id. Otherwise each candidate is
    /// projected in place: sub-spaces recursively, raw values as fresh
    /// virtual leaves. The default index carries over unchanged.
    pub fn abstracted(&self) -> Space {
        if self.determined() {
            return Space::Virtual(VirtualNode::leaf(self.id, self.clone().into()));
        }
        tracing::trace!(id = self.id, "projecting undetermined candidates");
        let candidates = self
            .candidates
            .iter()
            .map(|candidate| match candidate {
                Candidate::Space(space) => Candidate::Space(space.abstracted()),
                Candidate::Value(value) => Candidate::Space(Space::Virtual(VirtualNode::leaf(
                    next_space_id(),
                    value.clone().into(),
                ))),
            })
            .collect();
        Space::Categorical(Self {
            id: next_space_id(),
            candidates,
            default_index: self.default_index,
        })
    }

    /// True iff `x` equals some concrete candidate or is contained in some
    /// nested sub-space candidate.
    pub fn has(&self, x: &Candidate) -> TgResult<bool> {
        let value = expect_value(x)?;
        for candidate in &self.candidates {
            match candidate {
                Candidate::Space(space) => {
                    if space.has(x)? {
                        return Ok(true);
                    }
                }
                Candidate::Value(v) => {
                    if v == value {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }

    pub fn xrepr(&self, indent: usize) -> String {
        let candidates = self
            .candidates
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{pad}Categorical(candidates=[{candidates}], default_index={default})",
            pad = " ".repeat(indent),
            default = match self.default_index {
                Some(index) => index.to_string(),
                None => "None".to_string(),
            },
        )
    }
}

/// Equality is structural: same candidate count, same default index, and
/// pairwise-equal candidates. Stable ids are ignored.
impl PartialEq for Categorical {
    fn eq(&self, other: &Self) -> bool {
        self.default_index == other.default_index && self.candidates == other.candidates
    }
}

impl TryFrom<RawCategorical> for Categorical {
    type Error = ConstructionError;

    fn try_from(raw: RawCategorical) -> Result<Self, Self::Error> {
        Self::build(raw.candidates, raw.default_index)
    }
}

impl From<Categorical> for RawCategorical {
    fn from(space: Categorical) -> Self {
        Self {
            candidates: space.candidates,
            default_index: space.default_index,
        }
    }
}
