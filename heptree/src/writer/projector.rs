//! One projector per output class.
//!
//! Every projector reads a homogeneous candidate array from the arena and
//! returns one record per candidate (one in total for the event summaries).
//! References are written as unique ids, never as arena handles.

use hepcore::algorithm::constituents::{originating_particle, particle_refs, resolve_refs};
use hepcore::algorithm::ranking::ranked_by_pt;
use hepcore::candidate::arena::CandidateArena;
use hepcore::candidate::model::{track_param, CandidateId, TrackState};
use hepcore::kinematics::projection::{physical_time, ratio_or_sentinel, Direction};

use crate::record::branch::{BranchClass, BranchRecords};
use crate::record::calorimeter::Tower;
use crate::record::generator::{GenParticle, Vertex};
use crate::record::jet::{
    HighLevelSvxEntry, HighLevelTrackingEntry, Jet, MediumLevelSvxEntry, SecondaryVertexEntry,
    TruthVertexEntry, VertexTrackEntry,
};
use crate::record::lepton::{Electron, IsolationVars, Muon, Photon};
use crate::record::summary::{MissingEt, Rho, ScalarHt, Weight};
use crate::record::tracking::{HectorHit, Track};

/// Runs the projector of `class` over `ids`.
///
/// # Examples
///
/// ```
/// use hepcore::candidate::event::CandidateEvent;
/// use hepcore::candidate::model::Candidate;
/// use hepcore::kinematics::lorentz::LorentzVector;
/// use heptree::record::branch::{BranchClass, BranchRecords};
/// use heptree::writer::projector::project;
///
/// let mut event = CandidateEvent::new(0);
/// event.push("MissingET/momentum", Candidate::new(LorentzVector::new(3.0, 4.0, 0.0, 5.0)));
///
/// let ids = event.array("MissingET/momentum").unwrap();
/// match project(BranchClass::MissingEt, &event.arena, ids) {
///     BranchRecords::MissingEt(records) => assert_eq!(records[0].met, 5.0),
///     _ => unreachable!(),
/// }
/// ```
pub fn project(class: BranchClass, arena: &CandidateArena, ids: &[CandidateId]) -> BranchRecords {
    match class {
        BranchClass::GenParticle => BranchRecords::GenParticle(project_particles(arena, ids)),
        BranchClass::Vertex => BranchRecords::Vertex(project_vertices(arena, ids)),
        BranchClass::Track => BranchRecords::Track(project_tracks(arena, ids)),
        BranchClass::Tower => BranchRecords::Tower(project_towers(arena, ids)),
        BranchClass::Photon => BranchRecords::Photon(project_photons(arena, ids)),
        BranchClass::Electron => BranchRecords::Electron(project_electrons(arena, ids)),
        BranchClass::Muon => BranchRecords::Muon(project_muons(arena, ids)),
        BranchClass::Jet => BranchRecords::Jet(project_jets(arena, ids)),
        BranchClass::MissingEt => BranchRecords::MissingEt(project_missing_et(arena, ids)),
        BranchClass::ScalarHt => BranchRecords::ScalarHt(project_scalar_ht(arena, ids)),
        BranchClass::Rho => BranchRecords::Rho(project_rho(arena, ids)),
        BranchClass::Weight => BranchRecords::Weight(project_weight(arena, ids)),
        BranchClass::HectorHit => BranchRecords::HectorHit(project_hector_hits(arena, ids)),
    }
}

pub fn project_particles(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<GenParticle> {
    ids.iter()
        .map(|&id| {
            let candidate = &arena[id];
            let momentum = &candidate.momentum;
            let position = &candidate.position;
            let direction = Direction::of(momentum);

            GenParticle {
                unique_id: candidate.unique_id(),
                pid: candidate.pid,
                status: candidate.status,
                is_pu: candidate.is_pu,
                m1: candidate.m1,
                m2: candidate.m2,
                d1: candidate.d1,
                d2: candidate.d2,
                charge: candidate.charge,
                mass: candidate.mass,
                e: momentum.e(),
                px: momentum.px(),
                py: momentum.py(),
                pz: momentum.pz(),
                pt: direction.pt,
                eta: direction.eta,
                phi: direction.phi,
                rapidity: direction.rapidity,
                x: position.x,
                y: position.y,
                z: position.z,
                t: physical_time(position.t),
            }
        })
        .collect()
}

pub fn project_vertices(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Vertex> {
    ids.iter()
        .map(|&id| {
            let position = &arena[id].position;
            Vertex { x: position.x, y: position.y, z: position.z, t: physical_time(position.t) }
        })
        .collect()
}

// relative agreement used to cross-check impact parameters against the fit
fn agrees(measured: f64, fitted: f64) -> bool {
    let diff = measured - fitted;
    if diff.abs() < 1e-15 {
        return true;
    }
    (diff / measured).abs() <= 1e-9
}

/// True when `Zd`/`Dxy` match the fitted `Z0`/`D0` track parameters.
pub fn impact_parameters_agree(track: &TrackState) -> bool {
    agrees(track.zd, track.parameters[track_param::Z0])
        && agrees(track.dxy, track.parameters[track_param::D0])
}

/// Projects tracks.
///
/// # Panics
///
/// Panics when a track has no originating particle. In debug builds also
/// panics when the impact parameters disagree with the fitted parameters.
pub fn project_tracks(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Track> {
    ids.iter()
        .map(|&id| {
            let candidate = &arena[id];
            let outer = &candidate.position;
            let outer_direction = Direction::of(outer);
            let direction = Direction::of(&candidate.momentum);
            let state = &candidate.track;

            debug_assert!(
                impact_parameters_agree(state),
                "track {} impact parameters disagree with its fit",
                candidate.unique_id()
            );

            let particle = originating_particle(arena, id);
            let initial = &arena[particle].position;

            Track {
                unique_id: candidate.unique_id(),
                pid: candidate.pid,
                charge: candidate.charge,
                pt: direction.pt,
                eta: direction.eta,
                phi: direction.phi,
                eta_outer: outer_direction.eta,
                phi_outer: outer_direction.phi,
                x_outer: outer.x,
                y_outer: outer.y,
                z_outer: outer.z,
                t_outer: physical_time(outer.t),
                x: initial.x,
                y: initial.y,
                z: initial.z,
                t: physical_time(initial.t),
                dxy: state.dxy,
                sdxy: state.sdxy,
                xd: state.xd,
                yd: state.yd,
                zd: state.zd,
                trk_par: state.parameters,
                trk_cov: state.covariance,
                particle: arena.unique_id(particle),
            }
        })
        .collect()
}

pub fn project_towers(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Tower> {
    ids.iter()
        .map(|&id| {
            let candidate = &arena[id];
            let direction = Direction::of(&candidate.momentum);

            Tower {
                unique_id: candidate.unique_id(),
                et: direction.pt,
                eta: direction.eta,
                phi: direction.phi,
                e: candidate.momentum.e(),
                t: physical_time(candidate.position.t),
                n_time_hits: candidate.n_time_hits,
                eem: candidate.eem,
                ehad: candidate.ehad,
                edges: candidate.edges,
                particles: particle_refs(arena, id),
            }
        })
        .collect()
}

pub fn project_photons(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Photon> {
    ranked_by_pt(arena, ids)
        .into_iter()
        .map(|id| {
            let candidate = &arena[id];
            let direction = Direction::of(&candidate.momentum);

            Photon {
                unique_id: candidate.unique_id(),
                pt: direction.pt,
                eta: direction.eta,
                phi: direction.phi,
                e: candidate.momentum.e(),
                t: physical_time(candidate.position.t),
                ehad_over_eem: ratio_or_sentinel(candidate.ehad, candidate.eem),
                isolation: IsolationVars::from(&candidate.isolation),
                particles: particle_refs(arena, id),
            }
        })
        .collect()
}

pub fn project_electrons(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Electron> {
    ranked_by_pt(arena, ids)
        .into_iter()
        .map(|id| {
            let candidate = &arena[id];
            let direction = Direction::of(&candidate.momentum);

            Electron {
                unique_id: candidate.unique_id(),
                pt: direction.pt,
                eta: direction.eta,
                phi: direction.phi,
                t: physical_time(candidate.position.t),
                charge: candidate.charge,
                ehad_over_eem: 0.0,
                isolation: IsolationVars::from(&candidate.isolation),
                particle: arena.unique_id(originating_particle(arena, id)),
            }
        })
        .collect()
}

pub fn project_muons(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Muon> {
    ranked_by_pt(arena, ids)
        .into_iter()
        .map(|id| {
            let candidate = &arena[id];
            let direction = Direction::of(&candidate.momentum);

            Muon {
                unique_id: candidate.unique_id(),
                pt: direction.pt,
                eta: direction.eta,
                phi: direction.phi,
                t: physical_time(candidate.position.t),
                charge: candidate.charge,
                isolation: IsolationVars::from(&candidate.isolation),
                particle: arena.unique_id(originating_particle(arena, id)),
            }
        })
        .collect()
}

pub fn project_jets(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Jet> {
    ranked_by_pt(arena, ids)
        .into_iter()
        .map(|id| {
            let candidate = &arena[id];
            let momentum = &candidate.momentum;
            let direction = Direction::of(momentum);
            let tagging = &candidate.tagging;
            let sub = &candidate.substructure;
            let vx = &candidate.vertexing;

            // deposits of the direct constituents, not of the flattened particles
            let (ecal_energy, hcal_energy) = candidate
                .children
                .iter()
                .fold((0.0, 0.0), |(eem, ehad), &c| (eem + arena[c].eem, ehad + arena[c].ehad));

            Jet {
                unique_id: candidate.unique_id(),
                pt: direction.pt,
                eta: direction.eta,
                phi: direction.phi,
                t: physical_time(candidate.position.t),
                mass: momentum.m(),
                delta_eta: sub.delta_eta,
                delta_phi: sub.delta_phi,
                flavor: tagging.flavor,
                flavor_algo: tagging.flavor_algo,
                flavor_phys: tagging.flavor_phys,
                btag: tagging.btag,
                btag_algo: tagging.btag_algo,
                btag_phys: tagging.btag_phys,
                tau_tag: tagging.tau_tag,
                charge: candidate.charge,
                ehad_over_eem: ratio_or_sentinel(hcal_energy, ecal_energy),
                n_charged: sub.n_charged,
                n_neutrals: sub.n_neutrals,
                beta: sub.beta,
                beta_star: sub.beta_star,
                mean_sq_delta_r: sub.mean_sq_delta_r,
                ptd: sub.ptd,
                n_subjets_trimmed: sub.n_subjets_trimmed,
                n_subjets_pruned: sub.n_subjets_pruned,
                n_subjets_soft_dropped: sub.n_subjets_soft_dropped,
                frac_pt: sub.frac_pt,
                tau: sub.tau,
                trimmed_p4: sub.trimmed_p4,
                pruned_p4: sub.pruned_p4,
                soft_dropped_p4: sub.soft_dropped_p4,
                area: candidate.area,
                primary_vertex_tracks: vx.primary_vertex_tracks.iter().map(VertexTrackEntry::from).collect(),
                secondary_vertices: vx.secondary_vertices.iter().map(SecondaryVertexEntry::from).collect(),
                hl_secondary_vertex_tracks: vx.hl_sec_vx_tracks.iter().map(VertexTrackEntry::from).collect(),
                hl_secondary_vertex: HighLevelSvxEntry::from(&vx.hl_svx),
                ml_secondary_vertex: MediumLevelSvxEntry::from(&vx.ml_svx),
                hl_tracking: HighLevelTrackingEntry::from(&vx.hl_trk),
                truth_vertices: vx.truth_vertices.iter().map(TruthVertexEntry::from).collect(),
                constituents: resolve_refs(arena, &candidate.children),
                subjets: resolve_refs(arena, &candidate.subjets),
                tracks: resolve_refs(arena, &candidate.tracks),
                particles: particle_refs(arena, id),
            }
        })
        .collect()
}

pub fn project_missing_et(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<MissingEt> {
    ids.first()
        .map(|&id| {
            let momentum = &arena[id].momentum;
            let opposite = -*momentum;
            MissingEt { met: momentum.pt(), eta: opposite.eta(), phi: opposite.phi() }
        })
        .into_iter()
        .collect()
}

pub fn project_scalar_ht(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<ScalarHt> {
    ids.first()
        .map(|&id| ScalarHt { ht: arena[id].momentum.pt() })
        .into_iter()
        .collect()
}

pub fn project_rho(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Rho> {
    ids.iter()
        .map(|&id| {
            let candidate = &arena[id];
            Rho { rho: candidate.momentum.e(), edges: [candidate.edges[0], candidate.edges[1]] }
        })
        .collect()
}

pub fn project_weight(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<Weight> {
    ids.first()
        .map(|&id| Weight { weight: arena[id].momentum.e() })
        .into_iter()
        .collect()
}

pub fn project_hector_hits(arena: &CandidateArena, ids: &[CandidateId]) -> Vec<HectorHit> {
    ids.iter()
        .map(|&id| {
            let candidate = &arena[id];
            let momentum = &candidate.momentum;
            let position = &candidate.position;

            HectorHit {
                e: momentum.e(),
                tx: momentum.px(),
                ty: momentum.py(),
                t: position.t,
                x: position.x,
                y: position.y,
                s: position.z,
                particle: arena.unique_id(originating_particle(arena, id)),
            }
        })
        .collect()
}
