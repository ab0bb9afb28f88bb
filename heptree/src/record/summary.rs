use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};

/// Missing transverse energy; the direction is that of the negated visible sum.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MissingEt {
    pub met: f64,
    pub eta: f64,
    pub phi: f64,
}

/// Scalar sum of transverse momenta.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ScalarHt {
    pub ht: f64,
}

/// Pile-up energy density in an eta range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Rho {
    pub rho: f64,
    pub edges: [f64; 2],
}

/// Generator event weight.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Weight {
    pub weight: f64,
}
