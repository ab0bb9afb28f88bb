//! Constituent flattening over the candidate graph.
//!
//! Composite candidates are at most three levels deep:
//! a particle (leaf), a track or tower built from particles, or an
//! aggregate whose children are themselves built from particles.

use crate::candidate::arena::CandidateArena;
use crate::candidate::model::{CandidateId, UniqueId};

/// Collects the leaf particles a composite candidate was built from.
///
/// For each direct child, in order:
/// * a leaf child is taken as is,
/// * otherwise the child's first child is taken if it is a leaf,
/// * otherwise every grandchild contributes its own first child.
///
/// `particles` is cleared first; order of encounter is kept and duplicates
/// are not removed.
///
/// # Panics
///
/// Panics if a grandchild visited in the third case has no children, which
/// means the graph is deeper or shallower than the builder guarantees.
///
/// # Examples
///
/// ```
/// use hepcore::algorithm::constituents::fill_particles;
/// use hepcore::candidate::arena::CandidateArena;
/// use hepcore::candidate::model::Candidate;
///
/// let mut arena = CandidateArena::new();
/// let particle = arena.insert(Candidate::default());
/// let track = arena.insert(Candidate::default().with_children(vec![particle]));
/// let tower = arena.insert(Candidate::default().with_children(vec![track, particle]));
///
/// let mut particles = Vec::new();
/// fill_particles(&arena, tower, &mut particles);
/// assert_eq!(particles, vec![particle, particle]);
/// ```
pub fn fill_particles(arena: &CandidateArena, candidate: CandidateId, particles: &mut Vec<CandidateId>) {
    particles.clear();

    for &child in arena.children(candidate) {
        // particle
        let grandchildren = arena.children(child);
        let first = match grandchildren.first() {
            None => {
                particles.push(child);
                continue;
            }
            Some(&first) => first,
        };

        // track
        if arena[first].is_leaf() {
            particles.push(first);
            continue;
        }

        // tower
        for &grandchild in grandchildren {
            let leaf = arena[grandchild].first_child().unwrap_or_else(|| {
                panic!(
                    "candidate {} has constituent {} without children below {}",
                    arena.unique_id(candidate),
                    arena.unique_id(grandchild),
                    arena.unique_id(child),
                )
            });
            particles.push(leaf);
        }
    }
}

/// Flattened leaf particles of `candidate`, as unique ids.
pub fn particle_refs(arena: &CandidateArena, candidate: CandidateId) -> Vec<UniqueId> {
    let mut particles = Vec::new();
    fill_particles(arena, candidate, &mut particles);
    resolve_refs(arena, &particles)
}

/// Translates arena handles into the unique ids written to records.
pub fn resolve_refs(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<UniqueId> {
    ids.iter().map(|&id| arena.unique_id(id)).collect()
}

/// The candidate a track, lepton or hit was produced from: its first child.
///
/// # Panics
///
/// Panics when the candidate has no children.
pub fn originating_particle(arena: &CandidateArena, candidate: CandidateId) -> CandidateId {
    arena[candidate].first_child().unwrap_or_else(|| {
        panic!("candidate {} has no originating particle", arena.unique_id(candidate))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::model::Candidate;
    use proptest::prelude::*;

    fn leaf(arena: &mut CandidateArena) -> CandidateId {
        arena.insert(Candidate::default())
    }

    fn node(arena: &mut CandidateArena, children: Vec<CandidateId>) -> CandidateId {
        arena.insert(Candidate::default().with_children(children))
    }

    #[test]
    fn test_empty_children_give_empty_list() {
        let mut arena = CandidateArena::new();
        let tower = leaf(&mut arena);
        let mut particles = vec![CandidateId(42)];
        fill_particles(&arena, tower, &mut particles);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_leaf_children_are_taken_directly() {
        let mut arena = CandidateArena::new();
        let p1 = leaf(&mut arena);
        let p2 = leaf(&mut arena);
        let tower = node(&mut arena, vec![p2, p1]);

        let mut particles = Vec::new();
        fill_particles(&arena, tower, &mut particles);
        assert_eq!(particles, vec![p2, p1]);
    }

    #[test]
    fn test_track_layer_takes_only_first_child() {
        let mut arena = CandidateArena::new();
        let p1 = leaf(&mut arena);
        let p2 = leaf(&mut arena);
        let deposit = node(&mut arena, vec![p1, p2]);
        let photon = node(&mut arena, vec![deposit]);

        let mut particles = Vec::new();
        fill_particles(&arena, photon, &mut particles);
        assert_eq!(particles, vec![p1]);
    }

    #[test]
    fn test_tower_layer_walks_grandchildren() {
        let mut arena = CandidateArena::new();
        let p1 = leaf(&mut arena);
        let p2 = leaf(&mut arena);
        let p3 = leaf(&mut arena);
        let t1 = node(&mut arena, vec![p1]);
        let t2 = node(&mut arena, vec![p2, p3]);
        let tower = node(&mut arena, vec![t1, t2]);
        let single = node(&mut arena, vec![p3]);
        let jet = node(&mut arena, vec![tower, single]);

        let mut particles = Vec::new();
        fill_particles(&arena, jet, &mut particles);
        assert_eq!(particles, vec![p1, p2, p3]);
        assert_eq!(
            particle_refs(&arena, jet),
            vec![arena.unique_id(p1), arena.unique_id(p2), arena.unique_id(p3)]
        );
    }

    #[test]
    fn test_no_deduplication() {
        let mut arena = CandidateArena::new();
        let p = leaf(&mut arena);
        let t = node(&mut arena, vec![p]);
        let tower = node(&mut arena, vec![t, t]);
        let jet = node(&mut arena, vec![tower, tower]);

        let mut particles = Vec::new();
        fill_particles(&arena, jet, &mut particles);
        assert_eq!(particles, vec![p, p, p, p]);
    }

    #[test]
    #[should_panic(expected = "without children")]
    fn test_broken_depth_panics() {
        let mut arena = CandidateArena::new();
        let p = leaf(&mut arena);
        let t = node(&mut arena, vec![p]);
        let tower = node(&mut arena, vec![t, p]);
        let jet = node(&mut arena, vec![tower]);

        let mut particles = Vec::new();
        fill_particles(&arena, jet, &mut particles);
    }

    #[test]
    #[should_panic(expected = "no originating particle")]
    fn test_track_without_particle_panics() {
        let mut arena = CandidateArena::new();
        let track = leaf(&mut arena);
        originating_particle(&arena, track);
    }

    proptest! {
        #[test]
        fn prop_tower_shape_length_is_sum_of_grandchildren(
            shape in prop::collection::vec(prop::collection::vec(1usize..4, 1..4), 0..6)
        ) {
            // shape[i][j] = number of particles below grandchild j of child i
            let mut arena = CandidateArena::new();
            let mut children = Vec::new();
            let mut expected = Vec::new();
            for grandchild_sizes in &shape {
                let mut grandchildren = Vec::new();
                for &n in grandchild_sizes {
                    let leaves: Vec<CandidateId> = (0..n).map(|_| leaf(&mut arena)).collect();
                    expected.push(leaves[0]);
                    grandchildren.push(node(&mut arena, leaves));
                }
                children.push(node(&mut arena, grandchildren));
            }
            let jet = node(&mut arena, children);

            let mut particles = Vec::new();
            fill_particles(&arena, jet, &mut particles);
            let total: usize = shape.iter().map(|g| g.len()).sum();
            prop_assert_eq!(particles.len(), total);
            prop_assert_eq!(particles, expected);
        }
    }
}
