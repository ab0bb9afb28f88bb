use std::collections::HashSet;
use std::ops::Index;
use serde::{Serialize, Deserialize};

use crate::candidate::error::{GraphError, GraphResult};
use crate::candidate::model::{Candidate, CandidateId, UniqueId};

/// Dense storage for all candidates of one event.
///
/// Edges between candidates are [`CandidateId`] handles into this arena, so a
/// candidate shared by several parents (a track that is both a particle's
/// descendant and a jet constituent) is simply referenced twice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateArena {
    candidates: Vec<Candidate>,
    next_unique_id: u32,
}

impl CandidateArena {
    /// Creates an empty arena; unique ids start at 1.
    pub fn new() -> Self {
        CandidateArena { candidates: Vec::new(), next_unique_id: 1 }
    }

    /// Stores a candidate, assigns its unique id and returns its handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use hepcore::candidate::arena::CandidateArena;
    /// use hepcore::candidate::model::{Candidate, UniqueId};
    /// use hepcore::kinematics::lorentz::LorentzVector;
    ///
    /// let mut arena = CandidateArena::new();
    /// let particle = arena.insert(Candidate::new(LorentzVector::new(1.0, 0.0, 0.0, 1.0)));
    /// let track = arena.insert(Candidate::new(LorentzVector::new(1.0, 0.0, 0.0, 1.0)).with_children(vec![particle]));
    ///
    /// assert_eq!(arena[particle].unique_id(), UniqueId(1));
    /// assert_eq!(arena[track].unique_id(), UniqueId(2));
    /// assert_eq!(arena.children(track), &[particle]);
    /// ```
    pub fn insert(&mut self, mut candidate: Candidate) -> CandidateId {
        let id = CandidateId(self.candidates.len() as u32);
        candidate.assign_unique_id(UniqueId(self.next_unique_id));
        self.next_unique_id += 1;
        self.candidates.push(candidate);
        id
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(id.index())
    }

    pub fn add_subjet(&mut self, jet: CandidateId, subjet: CandidateId) {
        self.candidates[jet.index()].subjets.push(subjet);
    }

    pub fn add_track(&mut self, jet: CandidateId, track: CandidateId) {
        self.candidates[jet.index()].tracks.push(track);
    }

    pub fn children(&self, id: CandidateId) -> &[CandidateId] {
        &self[id].children
    }

    pub fn unique_id(&self, id: CandidateId) -> UniqueId {
        self[id].unique_id()
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        id.index() < self.candidates.len()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &Candidate)> {
        self.candidates.iter().enumerate().map(|(i, c)| (CandidateId(i as u32), c))
    }

    /// Checks the invariants `insert` maintains, for arenas that were
    /// deserialized rather than built.
    ///
    /// Every edge must point into the arena, unique ids must be distinct and
    /// the id counter must lie above all of them.
    pub fn validate(&self) -> GraphResult<()> {
        let len = self.candidates.len();
        let mut seen = HashSet::with_capacity(len);
        let mut max = None;

        for (_, candidate) in self.iter() {
            let owner = candidate.unique_id();
            let edges = [
                ("children", &candidate.children),
                ("subjets", &candidate.subjets),
                ("tracks", &candidate.tracks),
            ];
            for (edge, targets) in edges {
                if let Some(target) = targets.iter().find(|&&t| !self.contains(t)) {
                    return Err(GraphError::DanglingEdge { owner, edge, target: target.0, len });
                }
            }

            if !seen.insert(owner) {
                return Err(GraphError::DuplicateUniqueId(owner));
            }
            max = max.max(Some(owner.0));
        }

        match max {
            Some(max) if self.next_unique_id <= max => {
                Err(GraphError::StaleIdCounter { next: self.next_unique_id, max: UniqueId(max) })
            }
            _ => Ok(()),
        }
    }
}

impl Default for CandidateArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<CandidateId> for CandidateArena {
    type Output = Candidate;

    fn index(&self, id: CandidateId) -> &Self::Output {
        &self.candidates[id.index()]
    }
}
