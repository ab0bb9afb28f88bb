use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};
use hepcore::candidate::model::{Isolation, UniqueId};

/// Isolation block shared by photons and leptons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct IsolationVars {
    pub isolation_var: f64,
    pub isolation_var_rho_corr: f64,
    pub sum_pt_charged: f64,
    pub sum_pt_neutral: f64,
    pub sum_pt_charged_pu: f64,
    pub sum_pt: f64,
}

impl From<&Isolation> for IsolationVars {
    fn from(isolation: &Isolation) -> Self {
        IsolationVars {
            isolation_var: isolation.var,
            isolation_var_rho_corr: isolation.var_rho_corr,
            sum_pt_charged: isolation.sum_pt_charged,
            sum_pt_neutral: isolation.sum_pt_neutral,
            sum_pt_charged_pu: isolation.sum_pt_charged_pu,
            sum_pt: isolation.sum_pt,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Photon {
    pub unique_id: UniqueId,

    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub e: f64,
    pub t: f64,

    pub ehad_over_eem: f64,
    pub isolation: IsolationVars,

    pub particles: Vec<UniqueId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Electron {
    pub unique_id: UniqueId,

    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub t: f64,
    pub charge: i32,

    /// Always zero, electrons do not keep a deposit split.
    pub ehad_over_eem: f64,
    pub isolation: IsolationVars,

    pub particle: UniqueId,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Muon {
    pub unique_id: UniqueId,

    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub t: f64,
    pub charge: i32,

    pub isolation: IsolationVars,

    pub particle: UniqueId,
}
