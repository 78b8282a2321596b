//! # tg-spaces
//!
//! Search space descriptions for the TuneGrid hyperparameter toolkit.
//!
//! A space is built by nesting [`Categorical`], [`Integer`] and [`Continuous`]
//! values to arbitrary depth; a search algorithm then draws samples with
//! [`Space::random`], projects the still-undetermined structure with
//! [`Space::abstracted`] (which returns a [`VirtualNode`] tree), and validates
//! trial points with [`Space::has`] and structural equality. This crate does
//! no optimization itself; it only describes the domain an external search
//! algorithm works over.

mod categorical;
mod continuous;
mod integer;
mod node;
mod space;

pub use categorical::Categorical;
pub use continuous::{Continuous, DEFAULT_EPS};
pub use integer::Integer;
pub use node::VirtualNode;
pub use space::{Candidate, Space, SpaceId};

pub use tg_types::{ConstructionError, TgError, TgResult, Value};
