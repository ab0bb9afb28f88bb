use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::candidate::arena::CandidateArena;
use crate::candidate::error::{GraphError, GraphResult};
use crate::candidate::model::{Candidate, CandidateId};

/// One simulated event: the candidate arena plus the named arrays that
/// upstream modules exported from it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub number: u64,
    pub arena: CandidateArena,
    pub arrays: BTreeMap<String, Vec<CandidateId>>,
}

impl CandidateEvent {
    pub fn new(number: u64) -> Self {
        CandidateEvent { number, arena: CandidateArena::new(), arrays: BTreeMap::new() }
    }

    /// Inserts a candidate and appends its handle to the named array.
    pub fn push(&mut self, array: &str, candidate: Candidate) -> CandidateId {
        let id = self.arena.insert(candidate);
        self.arrays.entry(array.to_string()).or_default().push(id);
        id
    }

    /// Appends an existing candidate to another array (arrays may share candidates).
    pub fn export(&mut self, array: &str, id: CandidateId) {
        self.arrays.entry(array.to_string()).or_default().push(id);
    }

    pub fn array(&self, name: &str) -> Option<&[CandidateId]> {
        self.arrays.get(name).map(|ids| ids.as_slice())
    }

    pub fn array_names(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(|name| name.as_str())
    }

    /// Checks the arena and that every array entry points into it.
    pub fn validate(&self) -> GraphResult<()> {
        self.arena.validate()?;

        for (array, ids) in &self.arrays {
            if let Some(target) = ids.iter().find(|&&id| !self.arena.contains(id)) {
                return Err(GraphError::DanglingArrayEntry {
                    array: array.clone(),
                    target: target.0,
                    len: self.arena.len(),
                });
            }
        }
        Ok(())
    }
}
