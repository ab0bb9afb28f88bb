use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};
use hepcore::candidate::model::UniqueId;

/// Charged track, described both at its production point and where it
/// leaves the tracker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Track {
    pub unique_id: UniqueId,

    pub pid: i32,
    pub charge: i32,

    // momentum at production
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,

    // direction and position at the outer tracker surface
    pub eta_outer: f64,
    pub phi_outer: f64,
    pub x_outer: f64,
    pub y_outer: f64,
    pub z_outer: f64,
    pub t_outer: f64,

    // production point, taken from the originating particle
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub t: f64,

    pub dxy: f64,
    pub sdxy: f64,
    pub xd: f64,
    pub yd: f64,
    pub zd: f64,

    pub trk_par: [f64; 5],
    pub trk_cov: [f64; 15],

    pub particle: UniqueId,
}

/// Hit in a far-forward (roman pot) detector.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct HectorHit {
    pub e: f64,
    pub tx: f64,
    pub ty: f64,
    pub t: f64,
    pub x: f64,
    pub y: f64,
    /// Distance along the beam line.
    pub s: f64,

    pub particle: UniqueId,
}
