use std::collections::HashSet;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use bincode::{Decode, Encode};
use serde::{Serialize, Deserialize};
use hepcore::candidate::model::UniqueId;

use crate::record::calorimeter::Tower;
use crate::record::generator::{GenParticle, Vertex};
use crate::record::jet::Jet;
use crate::record::lepton::{Electron, Muon, Photon};
use crate::record::summary::{MissingEt, Rho, ScalarHt, Weight};
use crate::record::tracking::{HectorHit, Track};
use crate::writer::error::TreeWriterError;

/// The closed set of output record classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub enum BranchClass {
    GenParticle,
    Vertex,
    Track,
    Tower,
    Photon,
    Electron,
    Muon,
    Jet,
    MissingEt,
    ScalarHt,
    Rho,
    Weight,
    HectorHit,
}

impl BranchClass {
    pub const ALL: [BranchClass; 13] = [
        BranchClass::GenParticle,
        BranchClass::Vertex,
        BranchClass::Track,
        BranchClass::Tower,
        BranchClass::Photon,
        BranchClass::Electron,
        BranchClass::Muon,
        BranchClass::Jet,
        BranchClass::MissingEt,
        BranchClass::ScalarHt,
        BranchClass::Rho,
        BranchClass::Weight,
        BranchClass::HectorHit,
    ];

    /// Class name as it appears in branch configuration.
    pub fn name(&self) -> &'static str {
        match self {
            BranchClass::GenParticle => "GenParticle",
            BranchClass::Vertex => "Vertex",
            BranchClass::Track => "Track",
            BranchClass::Tower => "Tower",
            BranchClass::Photon => "Photon",
            BranchClass::Electron => "Electron",
            BranchClass::Muon => "Muon",
            BranchClass::Jet => "Jet",
            BranchClass::MissingEt => "MissingET",
            BranchClass::ScalarHt => "ScalarHT",
            BranchClass::Rho => "Rho",
            BranchClass::Weight => "Weight",
            BranchClass::HectorHit => "HectorHit",
        }
    }

    /// Final analysis objects are written in descending pt order.
    pub fn is_ranked(&self) -> bool {
        matches!(self, BranchClass::Photon | BranchClass::Electron | BranchClass::Muon | BranchClass::Jet)
    }
}

impl FromStr for BranchClass {
    type Err = TreeWriterError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        BranchClass::ALL
            .iter()
            .find(|class| class.name() == name)
            .copied()
            .ok_or_else(|| TreeWriterError::UnknownClass(name.to_string()))
    }
}

impl Display for BranchClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Records of one branch for one event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum BranchRecords {
    GenParticle(Vec<GenParticle>),
    Vertex(Vec<Vertex>),
    Track(Vec<Track>),
    Tower(Vec<Tower>),
    Photon(Vec<Photon>),
    Electron(Vec<Electron>),
    Muon(Vec<Muon>),
    Jet(Vec<Jet>),
    MissingEt(Vec<MissingEt>),
    ScalarHt(Vec<ScalarHt>),
    Rho(Vec<Rho>),
    Weight(Vec<Weight>),
    HectorHit(Vec<HectorHit>),
}

impl BranchRecords {
    /// An empty record list of the given class.
    pub fn empty(class: BranchClass) -> Self {
        match class {
            BranchClass::GenParticle => BranchRecords::GenParticle(Vec::new()),
            BranchClass::Vertex => BranchRecords::Vertex(Vec::new()),
            BranchClass::Track => BranchRecords::Track(Vec::new()),
            BranchClass::Tower => BranchRecords::Tower(Vec::new()),
            BranchClass::Photon => BranchRecords::Photon(Vec::new()),
            BranchClass::Electron => BranchRecords::Electron(Vec::new()),
            BranchClass::Muon => BranchRecords::Muon(Vec::new()),
            BranchClass::Jet => BranchRecords::Jet(Vec::new()),
            BranchClass::MissingEt => BranchRecords::MissingEt(Vec::new()),
            BranchClass::ScalarHt => BranchRecords::ScalarHt(Vec::new()),
            BranchClass::Rho => BranchRecords::Rho(Vec::new()),
            BranchClass::Weight => BranchRecords::Weight(Vec::new()),
            BranchClass::HectorHit => BranchRecords::HectorHit(Vec::new()),
        }
    }

    pub fn class(&self) -> BranchClass {
        match self {
            BranchRecords::GenParticle(_) => BranchClass::GenParticle,
            BranchRecords::Vertex(_) => BranchClass::Vertex,
            BranchRecords::Track(_) => BranchClass::Track,
            BranchRecords::Tower(_) => BranchClass::Tower,
            BranchRecords::Photon(_) => BranchClass::Photon,
            BranchRecords::Electron(_) => BranchClass::Electron,
            BranchRecords::Muon(_) => BranchClass::Muon,
            BranchRecords::Jet(_) => BranchClass::Jet,
            BranchRecords::MissingEt(_) => BranchClass::MissingEt,
            BranchRecords::ScalarHt(_) => BranchClass::ScalarHt,
            BranchRecords::Rho(_) => BranchClass::Rho,
            BranchRecords::Weight(_) => BranchClass::Weight,
            BranchRecords::HectorHit(_) => BranchClass::HectorHit,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BranchRecords::GenParticle(r) => r.len(),
            BranchRecords::Vertex(r) => r.len(),
            BranchRecords::Track(r) => r.len(),
            BranchRecords::Tower(r) => r.len(),
            BranchRecords::Photon(r) => r.len(),
            BranchRecords::Electron(r) => r.len(),
            BranchRecords::Muon(r) => r.len(),
            BranchRecords::Jet(r) => r.len(),
            BranchRecords::MissingEt(r) => r.len(),
            BranchRecords::ScalarHt(r) => r.len(),
            BranchRecords::Rho(r) => r.len(),
            BranchRecords::Weight(r) => r.len(),
            BranchRecords::HectorHit(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unique ids of the records that can be the target of a reference.
    pub fn unique_ids(&self) -> Vec<UniqueId> {
        match self {
            BranchRecords::GenParticle(r) => r.iter().map(|e| e.unique_id).collect(),
            BranchRecords::Track(r) => r.iter().map(|e| e.unique_id).collect(),
            BranchRecords::Tower(r) => r.iter().map(|e| e.unique_id).collect(),
            BranchRecords::Photon(r) => r.iter().map(|e| e.unique_id).collect(),
            BranchRecords::Electron(r) => r.iter().map(|e| e.unique_id).collect(),
            BranchRecords::Muon(r) => r.iter().map(|e| e.unique_id).collect(),
            BranchRecords::Jet(r) => r.iter().map(|e| e.unique_id).collect(),
            _ => Vec::new(),
        }
    }

    /// Calls `f(entry, field, target)` for every reference held by the records.
    pub fn for_each_reference(&self, mut f: impl FnMut(usize, &'static str, UniqueId)) {
        match self {
            BranchRecords::Track(r) => {
                for (i, e) in r.iter().enumerate() {
                    f(i, "particle", e.particle);
                }
            }
            BranchRecords::Tower(r) => {
                for (i, e) in r.iter().enumerate() {
                    e.particles.iter().for_each(|&id| f(i, "particles", id));
                }
            }
            BranchRecords::Photon(r) => {
                for (i, e) in r.iter().enumerate() {
                    e.particles.iter().for_each(|&id| f(i, "particles", id));
                }
            }
            BranchRecords::Electron(r) => {
                for (i, e) in r.iter().enumerate() {
                    f(i, "particle", e.particle);
                }
            }
            BranchRecords::Muon(r) => {
                for (i, e) in r.iter().enumerate() {
                    f(i, "particle", e.particle);
                }
            }
            BranchRecords::Jet(r) => {
                for (i, e) in r.iter().enumerate() {
                    e.constituents.iter().for_each(|&id| f(i, "constituents", id));
                    e.subjets.iter().for_each(|&id| f(i, "subjets", id));
                    e.tracks.iter().for_each(|&id| f(i, "tracks", id));
                    e.particles.iter().for_each(|&id| f(i, "particles", id));
                }
            }
            BranchRecords::HectorHit(r) => {
                for (i, e) in r.iter().enumerate() {
                    f(i, "particle", e.particle);
                }
            }
            _ => {}
        }
    }
}

/// A named branch holding one event's records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Branch {
    pub name: String,
    pub records: BranchRecords,
}

/// A reference whose target is not among the event's records.
#[derive(Clone, Debug, PartialEq)]
pub struct DanglingReference {
    pub branch: String,
    pub entry: usize,
    pub field: &'static str,
    pub target: UniqueId,
}

impl Display for DanglingReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{} -> {}", self.branch, self.entry, self.field, self.target)
    }
}

/// Everything written for one event, branches in registry order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct EventRecords {
    pub number: u64,
    pub branches: Vec<Branch>,
}

impl EventRecords {
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    pub fn records(&self, name: &str) -> Option<&BranchRecords> {
        self.branch(name).map(|b| &b.records)
    }

    /// Total number of records over all branches.
    pub fn record_count(&self) -> usize {
        self.branches.iter().map(|b| b.records.len()).sum()
    }

    /// Lists every reference that does not resolve to a record of this event.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let known: HashSet<UniqueId> = self
            .branches
            .iter()
            .flat_map(|b| b.records.unique_ids())
            .collect();

        let mut dangling = Vec::new();
        for branch in &self.branches {
            branch.records.for_each_reference(|entry, field, target| {
                if !known.contains(&target) {
                    dangling.push(DanglingReference {
                        branch: branch.name.clone(),
                        entry,
                        field,
                        target,
                    });
                }
            });
        }
        dangling
    }
}
