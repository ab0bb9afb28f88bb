//! Synthetic events with the candidate graph shapes a detector simulation
//! hands to the writer. Used by the command line tool and by tests.

use std::f64::consts::PI;
use hepcore::candidate::event::CandidateEvent;
use hepcore::candidate::model::{track_param, Candidate, CandidateId, Isolation};
use hepcore::candidate::vertexing::{SecondaryVertex, SecondaryVertexTrack, TruthVertex};
use hepcore::kinematics::lorentz::LorentzVector;
use rand::distributions::{Distribution, Uniform};
use rand::prelude::IteratorRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::writer::config::TreeWriterConfig;

pub const PARTICLES: &str = "Delphes/allParticles";
pub const VERTICES: &str = "PileUpMerger/vertices";
pub const TRACKS: &str = "TrackMerger/tracks";
pub const TOWERS: &str = "Calorimeter/towers";
pub const PHOTONS: &str = "PhotonIsolation/photons";
pub const ELECTRONS: &str = "ElectronIsolation/electrons";
pub const MUONS: &str = "MuonIsolation/muons";
pub const JETS: &str = "JetEnergyScale/jets";
pub const SUBJETS: &str = "FastJetFinder/subjets";
pub const MISSING_ET: &str = "MissingET/momentum";
pub const SCALAR_HT: &str = "ScalarHT/energy";
pub const RHO: &str = "Rho/rho";
pub const WEIGHT: &str = "Weight/weight";
pub const HECTOR_HITS: &str = "Hector/hits";

// packed positions of the covariance diagonal
const COVARIANCE_DIAGONAL: [usize; 5] = [0, 5, 9, 12, 14];

/// Branch configuration matching the arrays of [`SyntheticEventGenerator`].
pub fn synthetic_branches() -> TreeWriterConfig {
    TreeWriterConfig::default()
        .add_branch(PARTICLES, "Particle", "GenParticle")
        .add_branch(VERTICES, "Vertex", "Vertex")
        .add_branch(TRACKS, "Track", "Track")
        .add_branch(TOWERS, "Tower", "Tower")
        .add_branch(PHOTONS, "Photon", "Photon")
        .add_branch(ELECTRONS, "Electron", "Electron")
        .add_branch(MUONS, "Muon", "Muon")
        .add_branch(JETS, "Jet", "Jet")
        .add_branch(SUBJETS, "SubJet", "Jet")
        .add_branch(MISSING_ET, "MissingET", "MissingET")
        .add_branch(SCALAR_HT, "ScalarHT", "ScalarHT")
        .add_branch(RHO, "Rho", "Rho")
        .add_branch(WEIGHT, "Weight", "Weight")
        .add_branch(HECTOR_HITS, "HectorHit", "HectorHit")
}

#[derive(Clone, Debug)]
pub struct SyntheticEventOpts {
    pub n_particles: usize,
    pub n_jets: usize,
    pub n_vertices: usize,
    pub max_pt: f64,
    pub max_eta: f64,
}

impl Default for SyntheticEventOpts {
    fn default() -> Self {
        SyntheticEventOpts { n_particles: 40, n_jets: 4, n_vertices: 3, max_pt: 120.0, max_eta: 3.0 }
    }
}

/// Seeded generator; the same seed and options give the same events.
pub struct SyntheticEventGenerator {
    rng: StdRng,
    opts: SyntheticEventOpts,
    next_number: u64,
}

fn charge_of(pid: i32) -> i32 {
    match pid {
        211 | 321 | 2212 | -11 | -13 => 1,
        -211 | -321 | -2212 | 11 | 13 => -1,
        _ => 0,
    }
}

fn mass_of(pid: i32) -> f64 {
    match pid.abs() {
        11 => 0.000511,
        13 => 0.10566,
        211 => 0.13957,
        321 => 0.49368,
        130 => 0.49761,
        2212 => 0.93827,
        _ => 0.0,
    }
}

impl SyntheticEventGenerator {
    /// # Examples
    ///
    /// ```
    /// use heptree::sim::synthetic::{SyntheticEventGenerator, SyntheticEventOpts, PARTICLES};
    ///
    /// let mut generator = SyntheticEventGenerator::new(7, SyntheticEventOpts::default());
    /// let event = generator.next_event();
    /// assert_eq!(event.number, 0);
    /// assert_eq!(event.array(PARTICLES).unwrap().len(), 40);
    /// ```
    pub fn new(seed: u64, opts: SyntheticEventOpts) -> Self {
        SyntheticEventGenerator { rng: StdRng::seed_from_u64(seed), opts, next_number: 0 }
    }

    fn momentum(&mut self, mass: f64) -> LorentzVector {
        let pt = Uniform::new(0.5, self.opts.max_pt).sample(&mut self.rng);
        let eta = Uniform::new_inclusive(-self.opts.max_eta, self.opts.max_eta).sample(&mut self.rng);
        let phi = Uniform::new(-PI, PI).sample(&mut self.rng);

        let (px, py, pz) = (pt * phi.cos(), pt * phi.sin(), pt * eta.sinh());
        let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
        LorentzVector::new(px, py, pz, e)
    }

    fn particle(&mut self, index: usize, vertex: &LorentzVector) -> Candidate {
        const PIDS: [i32; 12] = [211, -211, 321, -321, 2212, 22, 22, 130, 11, -11, 13, -13];
        let pid = PIDS[self.rng.gen_range(0..PIDS.len())];
        let mass = mass_of(pid);

        let mut candidate = Candidate::new(self.momentum(mass))
            .with_position(*vertex)
            .with_pid(pid)
            .with_charge(charge_of(pid));
        candidate.status = 1;
        candidate.mass = mass;
        candidate.is_pu = i32::from(index % 5 == 4);
        candidate.m1 = -1;
        candidate.m2 = -1;
        candidate.d1 = -1;
        candidate.d2 = -1;
        candidate
    }

    fn track(&mut self, event: &CandidateEvent, particle: CandidateId) -> Candidate {
        let source = &event.arena[particle];
        let momentum = source.momentum;
        let radius = self.rng.gen_range(0.5..1.29);
        let outer = LorentzVector::new(
            radius * momentum.px() / momentum.pt(),
            radius * momentum.py() / momentum.pt(),
            radius * momentum.pz() / momentum.pt(),
            source.position.t + self.rng.gen_range(1.0e3..5.0e3),
        );

        let mut track = Candidate::new(momentum)
            .with_position(outer)
            .with_pid(source.pid)
            .with_charge(source.charge)
            .with_children(vec![particle]);

        let d0 = self.rng.gen_range(-0.05..0.05);
        let z0 = source.position.z + self.rng.gen_range(-0.1..0.1);
        let theta = 2.0 * (-momentum.eta()).exp().atan();
        track.track.dxy = d0;
        track.track.sdxy = self.rng.gen_range(0.001..0.02);
        track.track.xd = -d0 * momentum.phi().sin();
        track.track.yd = d0 * momentum.phi().cos();
        track.track.zd = z0;
        track.track.parameters[track_param::D0] = d0;
        track.track.parameters[track_param::Z0] = z0;
        track.track.parameters[track_param::PHI] = momentum.phi();
        track.track.parameters[track_param::THETA] = theta;
        track.track.parameters[track_param::QOVERP] = f64::from(source.charge) / momentum.p();
        for (k, &slot) in COVARIANCE_DIAGONAL.iter().enumerate() {
            track.track.covariance[slot] = 1.0e-4 * (k + 1) as f64;
        }
        track
    }

    fn tower(&mut self, event: &CandidateEvent, children: Vec<CandidateId>, charged: bool) -> Candidate {
        let mut momentum = LorentzVector::default();
        for &child in &children {
            momentum += event.arena[child].momentum;
        }

        let em_share = if charged { self.rng.gen_range(0.0..0.4) } else { self.rng.gen_range(0.3..1.0) };
        let eta = momentum.eta();
        let phi = momentum.phi();

        let mut tower = Candidate::new(momentum)
            .with_position(LorentzVector::new(0.0, 0.0, 0.0, self.rng.gen_range(0.0..3.0e3)))
            .with_deposits(em_share * momentum.e(), (1.0 - em_share) * momentum.e())
            .with_children(children);
        tower.n_time_hits = self.rng.gen_range(1..6);
        tower.edges = [eta - 0.05, eta + 0.05, phi - 0.05, phi + 0.05];
        tower
    }

    fn isolation(&mut self) -> Isolation {
        let charged = self.rng.gen_range(0.0..2.0);
        let neutral = self.rng.gen_range(0.0..2.0);
        let pile_up = self.rng.gen_range(0.0..1.0);
        let sum = charged + neutral;
        Isolation {
            var: sum / 20.0,
            var_rho_corr: (sum - pile_up).max(0.0) / 20.0,
            sum_pt_charged: charged,
            sum_pt_neutral: neutral,
            sum_pt_charged_pu: pile_up,
            sum_pt: sum,
        }
    }

    fn jet(&mut self, event: &CandidateEvent, constituents: Vec<CandidateId>) -> Candidate {
        let mut momentum = LorentzVector::default();
        for &c in &constituents {
            momentum += event.arena[c].momentum;
        }

        let mut jet = Candidate::new(momentum)
            .with_position(LorentzVector::new(0.0, 0.0, 0.0, self.rng.gen_range(0.0..2.0e3)))
            .with_children(constituents);
        jet.area = LorentzVector::new(0.0, 0.0, 0.0, self.rng.gen_range(0.3..0.6));

        let b_tagged = self.rng.gen_bool(0.2);
        jet.tagging.flavor = if b_tagged { 5 } else { 0 };
        jet.tagging.flavor_algo = jet.tagging.flavor;
        jet.tagging.flavor_phys = jet.tagging.flavor;
        jet.tagging.btag = u32::from(b_tagged);
        jet.tagging.btag_algo = jet.tagging.btag;
        jet.tagging.btag_phys = jet.tagging.btag;
        jet.tagging.tau_tag = u32::from(self.rng.gen_bool(0.05));

        let sub = &mut jet.substructure;
        sub.delta_eta = self.rng.gen_range(0.0..0.2);
        sub.delta_phi = self.rng.gen_range(0.0..0.2);
        sub.beta = self.rng.gen_range(0.0..1.0);
        sub.beta_star = 1.0 - sub.beta;
        sub.mean_sq_delta_r = self.rng.gen_range(0.0..0.1);
        sub.ptd = self.rng.gen_range(0.0..1.0);
        let mut tau = 1.0;
        for k in 0..5 {
            tau *= self.rng.gen_range(0.3..1.0);
            sub.tau[k] = tau;
            sub.frac_pt[k] = if k == 0 { 1.0 } else { 0.0 };
        }
        sub.n_subjets_trimmed = 1;
        sub.trimmed_p4[0] = momentum;

        if b_tagged {
            let flight = self.rng.gen_range(0.1..5.0);
            let p = momentum.p().max(f64::MIN_POSITIVE);
            let tracks = vec![
                SecondaryVertexTrack {
                    weight: 1.0,
                    d0: self.rng.gen_range(-0.5..0.5),
                    z0: self.rng.gen_range(-0.5..0.5),
                    d0err: 0.01,
                    z0err: 0.02,
                    momentum: momentum.p() / 2.0,
                    dphi: 0.0,
                    deta: 0.0,
                };
                2
            ];
            jet.vertexing.secondary_vertices.push(SecondaryVertex {
                position: LorentzVector::new(
                    flight * momentum.px() / p,
                    flight * momentum.py() / p,
                    flight * momentum.pz() / p,
                    0.0,
                ),
                lxy: flight * momentum.pt() / p,
                lsig: flight / 0.05,
                decay_length_variance: 0.0025,
                n_tracks: 2,
                e_frac: self.rng.gen_range(0.2..0.8),
                mass: self.rng.gen_range(0.5..4.5),
                config: 0,
                tracks_along_jet: tracks.clone(),
            });
            jet.vertexing.hl_sec_vx_tracks = tracks;
            jet.vertexing.hl_svx.n_tracks = 2;
            jet.vertexing.hl_svx.lxy = flight * momentum.pt() / p;
            jet.vertexing.ml_svx.n_vertices = 1;
            jet.vertexing.truth_vertices.push(TruthVertex { x: 0.0, y: 0.0, z: flight, pdg_id: 511 });
        }
        jet
    }

    /// Builds the next event.
    ///
    /// Graph shapes: tracks and electrons or muons have the particle as first
    /// child, neutral towers hold particles, charged towers hold tracks,
    /// photons hold a neutral tower, jets hold tracks and towers.
    pub fn next_event(&mut self) -> CandidateEvent {
        let mut event = CandidateEvent::new(self.next_number);
        self.next_number += 1;

        // vertices
        let mut vertices = Vec::with_capacity(self.opts.n_vertices.max(1));
        for _ in 0..self.opts.n_vertices.max(1) {
            let position = LorentzVector::new(
                self.rng.gen_range(-0.01..0.01),
                self.rng.gen_range(-0.01..0.01),
                self.rng.gen_range(-50.0..50.0),
                self.rng.gen_range(-300.0..300.0),
            );
            event.push(VERTICES, Candidate::default().with_position(position));
            vertices.push(position);
        }

        // generated particles
        let mut charged = Vec::new();
        let mut neutral = Vec::new();
        let mut visible = LorentzVector::default();
        for index in 0..self.opts.n_particles {
            let vertex = vertices[index % vertices.len()];
            let particle = self.particle(index, &vertex);
            visible += particle.momentum;
            let is_charged = particle.charge != 0;
            let id = event.push(PARTICLES, particle);
            if is_charged {
                charged.push(id);
            } else {
                neutral.push(id);
            }
        }

        // tracks, leptons
        let mut tracks = Vec::with_capacity(charged.len());
        for &particle in &charged {
            let track = self.track(&event, particle);
            tracks.push(event.push(TRACKS, track));

            let source = &event.arena[particle];
            let (pid, momentum, charge, position) = (source.pid, source.momentum, source.charge, source.position);
            let lepton = Candidate::new(momentum)
                .with_position(position)
                .with_pid(pid)
                .with_charge(charge)
                .with_children(vec![particle]);
            match pid.abs() {
                11 => {
                    let mut electron = lepton.with_deposits(0.95 * momentum.e(), 0.05 * momentum.e());
                    electron.isolation = self.isolation();
                    event.push(ELECTRONS, electron);
                }
                13 => {
                    let mut muon = lepton;
                    muon.isolation = self.isolation();
                    event.push(MUONS, muon);
                }
                _ => {}
            }
        }

        // towers, photons
        let mut towers = Vec::new();
        for pair in neutral.chunks(2) {
            let tower = self.tower(&event, pair.to_vec(), false);
            let (eem, ehad, momentum, position) = (tower.eem, tower.ehad, tower.momentum, tower.position);
            let tower_id = event.push(TOWERS, tower);
            towers.push(tower_id);

            if event.arena[pair[0]].pid == 22 {
                let mut photon = Candidate::new(momentum)
                    .with_position(position)
                    .with_deposits(eem, ehad)
                    .with_children(vec![tower_id]);
                photon.isolation = self.isolation();
                event.push(PHOTONS, photon);
            }
        }
        for group in tracks.chunks(3) {
            let tower = self.tower(&event, group.to_vec(), true);
            towers.push(event.push(TOWERS, tower));
        }

        // jets with one subjet per half of their constituents
        let mut scalar_ht = 0.0;
        let pool: Vec<CandidateId> = tracks.iter().chain(towers.iter()).copied().collect();
        for _ in 0..self.opts.n_jets {
            let wanted = self.rng.gen_range(2..6).min(pool.len());
            if wanted == 0 {
                break;
            }
            let constituents: Vec<CandidateId> = pool.iter().copied().choose_multiple(&mut self.rng, wanted);

            let half = (constituents.len() + 1) / 2;
            let mut subjets = Vec::new();
            for part in constituents.chunks(half) {
                let subjet = self.jet(&event, part.to_vec());
                subjets.push(event.push(SUBJETS, subjet));
            }

            let tagging_tracks: Vec<CandidateId> =
                constituents.iter().copied().filter(|c| tracks.contains(c)).collect();

            let mut jet = self.jet(&event, constituents.clone());
            jet.substructure.n_charged = tagging_tracks.len() as i32;
            jet.substructure.n_neutrals = (constituents.len() - tagging_tracks.len()) as i32;
            scalar_ht += jet.momentum.pt();
            let jet = event.push(JETS, jet);

            for subjet in subjets {
                event.arena.add_subjet(jet, subjet);
            }
            for track in tagging_tracks {
                event.arena.add_track(jet, track);
            }
        }

        // event summaries
        let missing = LorentzVector::new(-visible.px(), -visible.py(), 0.0, visible.pt());
        event.push(MISSING_ET, Candidate::new(missing));
        event.push(SCALAR_HT, Candidate::new(LorentzVector::new(scalar_ht, 0.0, 0.0, scalar_ht)));
        for (low, high) in [(0.0, 2.5), (2.5, 5.0)] {
            let mut rho = Candidate::new(LorentzVector::new(0.0, 0.0, 0.0, self.rng.gen_range(5.0..30.0)));
            rho.edges = [low, high, 0.0, 0.0];
            event.push(RHO, rho);
        }
        let weight = self.rng.gen_range(0.5..1.5);
        event.push(WEIGHT, Candidate::new(LorentzVector::new(0.0, 0.0, 0.0, weight)));

        // far-detector hits from the most forward particle
        let forward = event
            .array(PARTICLES)
            .and_then(|ids| ids.iter().copied().max_by(|&a, &b| {
                let (ea, eb) = (event.arena[a].momentum.eta().abs(), event.arena[b].momentum.eta().abs());
                ea.total_cmp(&eb)
            }));
        if let Some(particle) = forward {
            let momentum = event.arena[particle].momentum;
            let position = LorentzVector::new(
                self.rng.gen_range(-0.002..0.002),
                self.rng.gen_range(-0.002..0.002),
                220.0,
                self.rng.gen_range(700.0..800.0),
            );
            let hit = Candidate::new(momentum).with_position(position).with_children(vec![particle]);
            event.push(HECTOR_HITS, hit);
        }

        event
    }
}

impl Iterator for SyntheticEventGenerator {
    type Item = CandidateEvent;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_event())
    }
}
