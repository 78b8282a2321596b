//! The `Space` sum type and the `Candidate` values it ranges over.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tg_types::{TgError, TgResult, Value};

use crate::{Categorical, Continuous, Integer, VirtualNode};

/// Stable identifier for a node in a space tree.
///
/// Ids are handed out by a process-wide monotonic counter at construction
/// time (or at abstraction time for leaves synthesized from raw candidate
/// values) and serve as the keys of [`VirtualNode`] children. They never
/// participate in equality.
pub type SpaceId = u64;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_space_id() -> SpaceId {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// One admissible entry of a categorical space: either a concrete value or a
/// nested sub-space.
///
/// This is also what [`Space::random`] returns — a non-recursive draw that
/// lands on a nested sub-space hands that sub-space back unchanged — and what
/// [`Space::has`] accepts, so that passing a space where a concrete trial
/// value is expected is representable (and rejected).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    Value(Value),
    Space(Space),
}

impl Candidate {
    pub fn is_space(&self) -> bool {
        matches!(self, Self::Space(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Space(_) => None,
        }
    }

    pub fn as_space(&self) -> Option<&Space> {
        match self {
            Self::Space(s) => Some(s),
            Self::Value(_) => None,
        }
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Space(s) => write!(f, "{}", s.xrepr(0)),
        }
    }
}

impl From<Value> for Candidate {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<Space> for Candidate {
    fn from(s: Space) -> Self {
        Self::Space(s)
    }
}

macro_rules! candidate_from_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Candidate {
            fn from(v: $ty) -> Self {
                Self::Value(Value::from(v))
            }
        })*
    };
}

candidate_from_value!(i8, i16, i32, i64, u8, u16, u32, f32, f64, bool, &str, String);

/// Reject a sub-space passed where a concrete trial value is required.
pub(crate) fn expect_value(x: &Candidate) -> TgResult<&Value> {
    match x {
        Candidate::Value(v) => Ok(v),
        Candidate::Space(_) => Err(TgError::SpaceAsValue),
    }
}

/// A search space: the set of values a hyperparameter or architectural choice
/// may take.
///
/// Spaces are immutable after construction; `clone()` is a deep copy that
/// compares equal to the original. The `Virtual` variant is only ever
/// produced by [`Space::abstracted`], never built directly by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Space {
    Categorical(Categorical),
    Integer(Integer),
    Continuous(Continuous),
    Virtual(VirtualNode),
}

impl Space {
    /// Stable id of the root node of this space.
    pub fn id(&self) -> SpaceId {
        match self {
            Self::Categorical(s) => s.id(),
            Self::Integer(s) => s.id(),
            Self::Continuous(s) => s.id(),
            Self::Virtual(s) => s.key(),
        }
    }

    /// Pretty representation at the given indentation, for nested printing.
    pub fn xrepr(&self, indent: usize) -> String {
        match self {
            Self::Categorical(s) => s.xrepr(indent),
            Self::Integer(s) => s.xrepr(indent),
            Self::Continuous(s) => s.xrepr(indent),
            Self::Virtual(s) => s.xrepr(indent),
        }
    }

    /// True iff this space denotes exactly one possible concrete value.
    pub fn determined(&self) -> bool {
        match self {
            Self::Categorical(s) => s.determined(),
            Self::Integer(s) => s.determined(),
            Self::Continuous(s) => s.determined(),
            Self::Virtual(s) => s.determined(),
        }
    }

    /// Draw one sample.
    ///
    /// With `recursion` set, a draw that lands on a nested sub-space keeps
    /// sampling inside it until a concrete leaf value falls out; without it,
    /// the nested sub-space itself is returned.
    pub fn random(&self, recursion: bool) -> TgResult<Candidate> {
        match self {
            Self::Categorical(s) => s.random(recursion),
            Self::Integer(s) => s.random(recursion),
            Self::Continuous(s) => Ok(s.random(recursion)),
            Self::Virtual(s) => s.random(recursion),
        }
    }

    /// Membership test for a concrete trial value.
    ///
    /// Fails with [`TgError::SpaceAsValue`] when `x` is itself a space; the
    /// contract assumes `x` is a concrete trial point.
    pub fn has(&self, x: &Candidate) -> TgResult<bool> {
        match self {
            Self::Categorical(s) => s.has(x),
            Self::Integer(s) => s.has(x),
            Self::Continuous(s) => s.has(x),
            Self::Virtual(s) => s.has(x),
        }
    }

    /// Project this space down to its still-undetermined structure.
    ///
    /// Returns a freshly built tree on every call; the source space is never
    /// mutated or aliased.
    pub fn abstracted(&self) -> Space {
        match self {
            Self::Categorical(s) => s.abstracted(),
            Self::Integer(s) => s.abstracted(),
            Self::Continuous(s) => s.abstracted(),
            Self::Virtual(s) => s.abstracted(),
        }
    }
}

/// Structural equality; stable ids are ignored. An `Integer` compares equal
/// to a `Categorical` that matches its expanded candidate list, mirroring the
/// fact that an integer range is just a synthesized categorical.
impl PartialEq for Space {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Categorical(a), Self::Categorical(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Categorical(a), Self::Integer(b)) | (Self::Integer(b), Self::Categorical(a)) => {
                a == b.as_categorical()
            }
            (Self::Continuous(a), Self::Continuous(b)) => a == b,
            (Self::Virtual(a), Self::Virtual(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.xrepr(0))
    }
}

macro_rules! space_from {
    ($($variant:ident => $ty:ty),*) => {
        $(impl From<$ty> for Space {
            fn from(s: $ty) -> Self {
                Self::$variant(s)
            }
        })*

        $(impl From<$ty> for Candidate {
            fn from(s: $ty) -> Self {
                Self::Space(Space::from(s))
            }
        })*
    };
}

space_from!(
    Categorical => Categorical,
    Integer => Integer,
    Continuous => Continuous,
    Virtual => VirtualNode
);
