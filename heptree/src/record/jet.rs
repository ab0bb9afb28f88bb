use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};
use hepcore::candidate::model::UniqueId;
use hepcore::candidate::vertexing::{
    HighLevelSvx, HighLevelTracking, MediumLevelSvx, SecondaryVertex, SecondaryVertexTrack,
    TruthVertex,
};
use hepcore::kinematics::lorentz::LorentzVector;

// ---------------------------------------------------------------------------
// Vertex-finding entries, copied field by field from the jet candidate
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct VertexTrackEntry {
    pub weight: f64,
    pub d0: f64,
    pub z0: f64,
    pub d0err: f64,
    pub z0err: f64,
    pub momentum: f64,
    pub dphi: f64,
    pub deta: f64,
}

impl From<&SecondaryVertexTrack> for VertexTrackEntry {
    fn from(track: &SecondaryVertexTrack) -> Self {
        VertexTrackEntry {
            weight: track.weight,
            d0: track.d0,
            z0: track.z0,
            d0err: track.d0err,
            z0err: track.z0err,
            momentum: track.momentum,
            dphi: track.dphi,
            deta: track.deta,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SecondaryVertexEntry {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub lxy: f64,
    pub lsig: f64,
    pub decay_length_variance: f64,
    pub n_tracks: i32,
    pub e_frac: f64,
    pub mass: f64,
    pub config: i32,
    pub tracks: Vec<VertexTrackEntry>,
}

impl From<&SecondaryVertex> for SecondaryVertexEntry {
    fn from(vertex: &SecondaryVertex) -> Self {
        SecondaryVertexEntry {
            x: vertex.x(),
            y: vertex.y(),
            z: vertex.z(),
            lxy: vertex.lxy,
            lsig: vertex.lsig,
            decay_length_variance: vertex.decay_length_variance,
            n_tracks: vertex.n_tracks,
            e_frac: vertex.e_frac,
            mass: vertex.mass,
            config: vertex.config,
            tracks: vertex.tracks_along_jet.iter().map(VertexTrackEntry::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct HighLevelSvxEntry {
    pub mass: f64,
    pub lsig: f64,
    pub lxy: f64,
    pub e_frac: f64,
    pub dr_jet: f64,
    pub n_tracks: i32,
    pub n_drjet_tracks: i32,
}

impl From<&HighLevelSvx> for HighLevelSvxEntry {
    fn from(svx: &HighLevelSvx) -> Self {
        HighLevelSvxEntry {
            mass: svx.mass,
            lsig: svx.lsig,
            lxy: svx.lxy,
            e_frac: svx.e_frac,
            dr_jet: svx.dr_jet,
            n_tracks: svx.n_tracks,
            n_drjet_tracks: svx.n_drjet_tracks,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MediumLevelSvxEntry {
    pub mass: f64,
    pub lsig: f64,
    pub lxy: f64,
    pub e_frac: f64,
    pub n_tracks: i32,
    pub n_vertices: i32,
    pub n_single_tracks: i32,
}

impl From<&MediumLevelSvx> for MediumLevelSvxEntry {
    fn from(svx: &MediumLevelSvx) -> Self {
        MediumLevelSvxEntry {
            mass: svx.mass,
            lsig: svx.lsig,
            lxy: svx.lxy,
            e_frac: svx.e_frac,
            n_tracks: svx.n_tracks,
            n_vertices: svx.n_vertices,
            n_single_tracks: svx.n_single_tracks,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct HighLevelTrackingEntry {
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

impl From<&HighLevelTracking> for HighLevelTrackingEntry {
    fn from(trk: &HighLevelTracking) -> Self {
        HighLevelTrackingEntry {
            track1_d0sig: trk.track1_d0sig,
            track2_d0sig: trk.track2_d0sig,
            track3_d0sig: trk.track3_d0sig,
            track1_z0sig: trk.track1_z0sig,
            track2_z0sig: trk.track2_z0sig,
            track3_z0sig: trk.track3_z0sig,
            tracks_over_ip_threshold: trk.tracks_over_ip_threshold,
            jet_prob: trk.jet_prob,
            jet_width_eta: trk.jet_width_eta,
            jet_width_phi: trk.jet_width_phi,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TruthVertexEntry {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub pdg_id: i32,
}

impl From<&TruthVertex> for TruthVertexEntry {
    fn from(vertex: &TruthVertex) -> Self {
        TruthVertexEntry { x: vertex.x, y: vertex.y, z: vertex.z, pdg_id: vertex.pdg_id }
    }
}

// ---------------------------------------------------------------------------
// Jet
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Jet {
    pub unique_id: UniqueId,

    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub t: f64,
    pub mass: f64,

    pub delta_eta: f64,
    pub delta_phi: f64,

    pub flavor: u32,
    pub flavor_algo: u32,
    pub flavor_phys: u32,

    pub btag: u32,
    pub btag_algo: u32,
    pub btag_phys: u32,

    pub tau_tag: u32,
    pub charge: i32,

    pub ehad_over_eem: f64,

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

    pub area: LorentzVector,

    pub primary_vertex_tracks: Vec<VertexTrackEntry>,
    pub secondary_vertices: Vec<SecondaryVertexEntry>,
    pub hl_secondary_vertex_tracks: Vec<VertexTrackEntry>,
    pub hl_secondary_vertex: HighLevelSvxEntry,
    pub ml_secondary_vertex: MediumLevelSvxEntry,
    pub hl_tracking: HighLevelTrackingEntry,
    pub truth_vertices: Vec<TruthVertexEntry>,

    pub constituents: Vec<UniqueId>,
    pub subjets: Vec<UniqueId>,
    pub tracks: Vec<UniqueId>,
    pub particles: Vec<UniqueId>,
}
