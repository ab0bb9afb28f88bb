pub mod record {
    pub mod generator;
    pub mod tracking;
    pub mod calorimeter;
    pub mod lepton;
    pub mod jet;
    pub mod summary;
    pub mod branch;
}

pub mod writer {
    pub mod error;
    pub mod config;
    pub mod input;
    pub mod projector;
    pub mod registry;
    pub mod sink;
}

pub mod sim {
    pub mod synthetic;
}
