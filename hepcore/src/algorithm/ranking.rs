use std::cmp::Reverse;
use ordered_float::OrderedFloat;

use crate::candidate::arena::CandidateArena;
use crate::candidate::model::CandidateId;

/// Orders handles by descending transverse momentum.
///
/// The sort is stable, candidates with equal pt keep their array order.
pub fn sort_by_pt_descending(arena: &CandidateArena, ids: &mut [CandidateId]) {
    ids.sort_by_key(|&id| Reverse(OrderedFloat(arena[id].momentum.pt())));
}

/// Sorted copy of `ids`; the event's own arrays are left untouched.
///
/// # Examples
///
/// ```
/// use hepcore::algorithm::ranking::ranked_by_pt;
/// use hepcore::candidate::arena::CandidateArena;
/// use hepcore::candidate::model::Candidate;
/// use hepcore::kinematics::lorentz::LorentzVector;
///
/// let mut arena = CandidateArena::new();
/// let soft = arena.insert(Candidate::new(LorentzVector::new(1.0, 0.0, 0.0, 1.0)));
/// let hard = arena.insert(Candidate::new(LorentzVector::new(9.0, 0.0, 0.0, 9.0)));
///
/// assert_eq!(ranked_by_pt(&arena, &[soft, hard]), vec![hard, soft]);
/// ```
pub fn ranked_by_pt(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<CandidateId> {
    let mut sorted = ids.to_vec();
    sort_by_pt_descending(arena, &mut sorted);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::model::Candidate;
    use crate::kinematics::lorentz::LorentzVector;

    #[test]
    fn test_ties_keep_array_order() {
        let mut arena = CandidateArena::new();
        let a = arena.insert(Candidate::new(LorentzVector::new(5.0, 0.0, 0.0, 5.0)));
        let b = arena.insert(Candidate::new(LorentzVector::new(0.0, 5.0, 1.0, 6.0)));
        let c = arena.insert(Candidate::new(LorentzVector::new(7.0, 0.0, 0.0, 7.0)));
        let d = arena.insert(Candidate::new(LorentzVector::new(-5.0, 0.0, 0.0, 5.0)));

        assert_eq!(ranked_by_pt(&arena, &[a, b, c, d]), vec![c, a, b, d]);
        assert_eq!(ranked_by_pt(&arena, &[d, b, a]), vec![d, b, a]);
    }

    #[test]
    fn test_input_is_not_modified() {
        let mut arena = CandidateArena::new();
        let a = arena.insert(Candidate::new(LorentzVector::new(1.0, 0.0, 0.0, 1.0)));
        let b = arena.insert(Candidate::new(LorentzVector::new(2.0, 0.0, 0.0, 2.0)));
        let ids = vec![a, b];

        let sorted = ranked_by_pt(&arena, &ids);
        assert_eq!(sorted, vec![b, a]);
        assert_eq!(ids, vec![a, b]);
    }
}
