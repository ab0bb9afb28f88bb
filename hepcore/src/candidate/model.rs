use std::fmt;
use std::fmt::{Display, Formatter};
use bincode::{Decode, Encode};
use itertools::iproduct;
use nalgebra::Matrix5;
use serde::{Serialize, Deserialize};

use crate::candidate::vertexing::JetVertexing;
use crate::kinematics::lorentz::LorentzVector;

/// Handle of a candidate inside its event arena.
///
/// Handles are dense indices and only meaningful together with the arena
/// that issued them; they never appear in output records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl CandidateId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Stable identity of a candidate, the only form a cross reference takes
/// once the graph is flattened into records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode)]
#[serde(transparent)]
pub struct UniqueId(pub u32);

impl Display for UniqueId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Positions of the perigee parameters inside [`TrackState::parameters`].
pub mod track_param {
    pub const D0: usize = 0;
    pub const Z0: usize = 1;
    pub const PHI: usize = 2;
    pub const THETA: usize = 3;
    pub const QOVERP: usize = 4;
}

/// Track fit result at the perigee plus the measured impact parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackState {
    pub dxy: f64,
    pub sdxy: f64,
    pub xd: f64,
    pub yd: f64,
    pub zd: f64,
    pub parameters: [f64; 5],
    /// Upper triangle of the symmetric 5x5 covariance, packed row by row.
    pub covariance: [f64; 15],
}

impl TrackState {
    /// Expands the packed covariance into the full symmetric matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use hepcore::candidate::model::TrackState;
    ///
    /// let mut state = TrackState::default();
    /// state.covariance[1] = 0.5; // (0, 1)
    /// let m = state.covariance_matrix();
    /// assert_eq!(m[(0, 1)], 0.5);
    /// assert_eq!(m[(1, 0)], 0.5);
    /// ```
    pub fn covariance_matrix(&self) -> Matrix5<f64> {
        let mut matrix = Matrix5::zeros();
        let upper = iproduct!(0..5usize, 0..5usize).filter(|(row, col)| row <= col);
        for ((row, col), value) in upper.zip(self.covariance.iter()) {
            matrix[(row, col)] = *value;
            matrix[(col, row)] = *value;
        }
        matrix
    }

    /// Packs a symmetric matrix, reading its upper triangle.
    pub fn pack_covariance(matrix: &Matrix5<f64>) -> [f64; 15] {
        let mut packed = [0.0; 15];
        let upper = iproduct!(0..5usize, 0..5usize).filter(|(row, col)| row <= col);
        for (slot, (row, col)) in packed.iter_mut().zip(upper) {
            *slot = matrix[(row, col)];
        }
        packed
    }
}

/// Isolation sums computed for reconstructed photons and leptons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Isolation {
    pub var: f64,
    pub var_rho_corr: f64,
    pub sum_pt_charged: f64,
    pub sum_pt_neutral: f64,
    pub sum_pt_charged_pu: f64,
    pub sum_pt: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlavorTagging {
    pub flavor: u32,
    pub flavor_algo: u32,
    pub flavor_phys: u32,
    pub btag: u32,
    pub btag_algo: u32,
    pub btag_phys: u32,
    pub tau_tag: u32,
}

/// Pile-up discriminants and substructure observables of a jet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JetSubstructure {
    pub delta_eta: f64,
    pub delta_phi: f64,

    pub n_charged: i32,
    pub n_neutrals: i32,
    pub beta: f64,
    pub beta_star: f64,
    pub mean_sq_delta_r: f64,
    pub ptd: f64,

    pub n_subjets_trimmed: i32,
    pub n_subjets_pruned: i32,
    pub n_subjets_soft_dropped: i32,

    pub frac_pt: [f64; 5],
    pub tau: [f64; 5],
    pub trimmed_p4: [LorentzVector; 5],
    pub pruned_p4: [LorentzVector; 5],
    pub soft_dropped_p4: [LorentzVector; 5],
}

/// A node of the per-event provenance graph.
///
/// One struct serves every class (generated particle, track, tower, lepton,
/// jet, event summary); each class reads the fields that apply to it.
/// The unique id is assigned by [`crate::candidate::arena::CandidateArena::insert`]
/// and cannot be changed afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    unique_id: UniqueId,

    pub momentum: LorentzVector,
    pub position: LorentzVector,
    pub area: LorentzVector,

    // generator record
    pub pid: i32,
    pub status: i32,
    pub is_pu: i32,
    pub m1: i32,
    pub m2: i32,
    pub d1: i32,
    pub d2: i32,
    pub charge: i32,
    pub mass: f64,

    pub track: TrackState,

    // calorimeter deposit
    pub eem: f64,
    pub ehad: f64,
    pub edges: [f64; 4],
    pub n_time_hits: i32,

    pub isolation: Isolation,
    pub tagging: FlavorTagging,
    pub substructure: JetSubstructure,
    pub vertexing: JetVertexing,

    pub children: Vec<CandidateId>,
    pub subjets: Vec<CandidateId>,
    pub tracks: Vec<CandidateId>,
}

impl Candidate {
    /// Creates an empty candidate with the given momentum.
    ///
    /// # Examples
    ///
    /// ```
    /// use hepcore::candidate::model::Candidate;
    /// use hepcore::kinematics::lorentz::LorentzVector;
    ///
    /// let candidate = Candidate::new(LorentzVector::new(1.0, 0.0, 0.0, 1.0))
    ///     .with_position(LorentzVector::new(0.0, 0.0, 0.1, 0.0));
    /// assert!(candidate.is_leaf());
    /// ```
    pub fn new(momentum: LorentzVector) -> Self {
        Candidate { momentum, ..Default::default() }
    }

    pub fn with_position(mut self, position: LorentzVector) -> Self {
        self.position = position;
        self
    }

    pub fn with_pid(mut self, pid: i32) -> Self {
        self.pid = pid;
        self
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_deposits(mut self, eem: f64, ehad: f64) -> Self {
        self.eem = eem;
        self.ehad = ehad;
        self
    }

    pub fn with_children(mut self, children: Vec<CandidateId>) -> Self {
        self.children = children;
        self
    }

    pub fn unique_id(&self) -> UniqueId {
        self.unique_id
    }

    pub(crate) fn assign_unique_id(&mut self, unique_id: UniqueId) {
        self.unique_id = unique_id;
    }

    /// A candidate built from nothing, i.e. a raw generated particle.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn first_child(&self) -> Option<CandidateId> {
        self.children.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covariance_is_symmetric() {
        let mut state = TrackState::default();
        for (i, value) in state.covariance.iter_mut().enumerate() {
            *value = i as f64 + 1.0;
        }
        let matrix = state.covariance_matrix();

        assert_eq!(matrix, matrix.transpose());
        assert_eq!(matrix[(0, 0)], 1.0);
        assert_eq!(matrix[(0, 4)], 5.0);
        assert_eq!(matrix[(1, 1)], 6.0);
        assert_eq!(matrix[(4, 4)], 15.0);
    }

    #[test]
    fn test_covariance_pack_inverts_expand() {
        let mut state = TrackState::default();
        for (i, value) in state.covariance.iter_mut().enumerate() {
            *value = 0.1 * i as f64;
        }
        assert_eq!(TrackState::pack_covariance(&state.covariance_matrix()), state.covariance);
    }

    #[test]
    fn test_builder() {
        let candidate = Candidate::new(LorentzVector::new(1.0, 2.0, 3.0, 4.0))
            .with_pid(11)
            .with_charge(-1)
            .with_children(vec![CandidateId(3)]);

        assert_eq!(candidate.pid, 11);
        assert_eq!(candidate.charge, -1);
        assert!(!candidate.is_leaf());
        assert_eq!(candidate.first_child(), Some(CandidateId(3)));
        assert_eq!(candidate.unique_id(), UniqueId(0));
    }
}
