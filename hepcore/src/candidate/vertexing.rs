//! Jet vertex-finding results carried on jet candidates.
//!
//! These are filled by the b-tagging stage upstream and are only copied
//! field by field into output records.

use serde::{Serialize, Deserialize};

use crate::kinematics::lorentz::LorentzVector;

/// A track as seen by the vertex finder, relative to its jet axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryVertexTrack {
    pub weight: f64,
    pub d0: f64,
    pub z0: f64,
    pub d0err: f64,
    pub z0err: f64,
    pub momentum: f64,
    pub dphi: f64,
    pub deta: f64,
}

/// A reconstructed displaced vertex owning the tracks fitted to it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondaryVertex {
    pub position: LorentzVector,
    pub lxy: f64,
    pub lsig: f64,
    pub decay_length_variance: f64,
    pub n_tracks: i32,
    pub e_frac: f64,
    pub mass: f64,
    pub config: i32,
    pub tracks_along_jet: Vec<SecondaryVertexTrack>,
}

impl SecondaryVertex {
    pub fn x(&self) -> f64 { self.position.x }
    pub fn y(&self) -> f64 { self.position.y }
    pub fn z(&self) -> f64 { self.position.z }
}

// summary of the best vertex candidate in the jet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighLevelSvx {
    pub mass: f64,
    pub lsig: f64,
    pub lxy: f64,
    pub e_frac: f64,
    pub dr_jet: f64,
    pub n_tracks: i32,
    pub n_drjet_tracks: i32,
}

// inclusive vertex summary built from all selected tracks
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediumLevelSvx {
    pub mass: f64,
    pub lsig: f64,
    pub lxy: f64,
    pub e_frac: f64,
    pub n_tracks: i32,
    pub n_vertices: i32,
    pub n_single_tracks: i32,
}

/// Impact-parameter summary over the jet's tracks, ranked by significance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighLevelTracking {
    pub track1_d0sig: f64,
    pub track2_d0sig: f64,
    pub track3_d0sig: f64,
    pub track1_z0sig: f64,
    pub track2_z0sig: f64,
    pub track3_z0sig: f64,
    pub tracks_over_ip_threshold: i32,
    pub jet_prob: f64,
    pub jet_width_eta: f64,
    pub jet_width_phi: f64,
}

/// Generator-level decay vertex matched to the jet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TruthVertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pdg_id: i32,
}

/// All vertex-finding output attached to a single jet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JetVertexing {
    pub primary_vertex_tracks: Vec<SecondaryVertexTrack>,
    pub secondary_vertices: Vec<SecondaryVertex>,
    pub hl_sec_vx_tracks: Vec<SecondaryVertexTrack>,
    pub hl_svx: HighLevelSvx,
    pub ml_svx: MediumLevelSvx,
    pub hl_trk: HighLevelTracking,
    pub truth_vertices: Vec<TruthVertex>,
}
