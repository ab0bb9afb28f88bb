use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};
use hepcore::candidate::model::UniqueId;

/// Generator-level particle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct GenParticle {
    pub unique_id: UniqueId,

    pub pid: i32,
    pub status: i32,
    pub is_pu: i32,

    pub m1: i32,
    pub m2: i32,
    pub d1: i32,
    pub d2: i32,

    pub charge: i32,
    pub mass: f64,

    pub e: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,

    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub rapidity: f64,

    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Production time in seconds.
    pub t: f64,
}

/// Reconstructed or generated interaction vertex.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,
}
