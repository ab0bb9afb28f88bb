use thiserror::Error;

use crate::candidate::model::UniqueId;

/// A candidate graph that breaks the arena invariants, typically one read
/// from outside instead of built through [`crate::candidate::arena::CandidateArena::insert`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge of a candidate points past the end of the arena.
    #[error("candidate {owner} has {edge} handle {target} outside an arena of {len}")]
    DanglingEdge { owner: UniqueId, edge: &'static str, target: u32, len: usize },

    /// A named array holds a handle past the end of the arena.
    #[error("array '{array}' holds handle {target} outside an arena of {len}")]
    DanglingArrayEntry { array: String, target: u32, len: usize },

    #[error("unique id {0} is assigned to more than one candidate")]
    DuplicateUniqueId(UniqueId),

    /// The next id to hand out is not above every id already in use.
    #[error("next unique id {next} does not exceed the largest assigned id {max}")]
    StaleIdCounter { next: u32, max: UniqueId },
}

pub type GraphResult<T> = Result<T, GraphError>;
