// kinematics module
pub mod kinematics {
    pub mod lorentz;
    pub mod projection;
}

// candidate graph module
pub mod candidate {
    pub mod arena;
    pub mod error;
    pub mod event;
    pub mod model;
    pub mod vertexing;
}

// algorithm module
pub mod algorithm {
    pub mod constituents;
    pub mod ranking;
}
