use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};
use hepcore::candidate::model::UniqueId;

/// Calorimeter cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Tower {
    pub unique_id: UniqueId,

    pub et: f64,
    pub eta: f64,
    pub phi: f64,
    pub e: f64,
    pub t: f64,
    pub n_time_hits: i32,

    pub eem: f64,
    pub ehad: f64,

    /// eta min, eta max, phi min, phi max
    pub edges: [f64; 4],

    pub particles: Vec<UniqueId>,
}
