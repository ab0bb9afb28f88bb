use std::collections::HashSet;
use hepcore::candidate::event::CandidateEvent;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, info, warn};

use crate::record::branch::{Branch, BranchClass, BranchRecords, EventRecords};
use crate::writer::config::TreeWriterConfig;
use crate::writer::error::{TreeWriterError, TreeWriterResult};
use crate::writer::projector::project;
use crate::writer::sink::RecordSink;

/// A resolved configuration triple: where to read, what to write, and how.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchEntry {
    pub branch_name: String,
    pub input_array: String,
    pub class: BranchClass,
}

impl BranchEntry {
    /// Projects this entry's input array of `event` into a branch.
    ///
    /// An input array that the event does not carry yields an empty branch.
    pub fn run(&self, event: &CandidateEvent) -> Branch {
        let records = match event.array(&self.input_array) {
            Some(ids) => project(self.class, &event.arena, ids),
            None => {
                warn!(
                    "event {}: input array '{}' for branch '{}' not found",
                    event.number, self.input_array, self.branch_name
                );
                BranchRecords::empty(self.class)
            }
        };
        Branch { name: self.branch_name.clone(), records }
    }
}

/// The configured set of branches, built once and applied to every event.
#[derive(Debug)]
pub struct BranchRegistry {
    entries: Vec<BranchEntry>,
    parallel: bool,
    pool: Option<ThreadPool>,
}

impl BranchRegistry {
    /// Resolves every configured triple.
    ///
    /// Triples with an unknown class or a branch name already taken are
    /// logged and left out; the remaining ones keep their configured order.
    ///
    /// # Arguments
    ///
    /// * `config` - branch triples and threading options
    ///
    /// # Examples
    ///
    /// ```
    /// use heptree::writer::config::TreeWriterConfig;
    /// use heptree::writer::registry::BranchRegistry;
    ///
    /// let config = TreeWriterConfig::default()
    ///     .add_branch("Delphes/allParticles", "Particle", "GenParticle")
    ///     .add_branch("FatJetFinder/jets", "FatJet", "FatJet");
    /// let registry = BranchRegistry::from_config(&config).unwrap();
    /// assert_eq!(registry.len(), 1);
    /// ```
    pub fn from_config(config: &TreeWriterConfig) -> TreeWriterResult<Self> {
        let mut entries = Vec::with_capacity(config.branches.len());
        let mut names = HashSet::new();

        for branch in &config.branches {
            let class = match branch.class_name.parse::<BranchClass>() {
                Ok(class) => class,
                Err(err) => {
                    error!("** ERROR: {}", err);
                    continue;
                }
            };

            if !names.insert(branch.branch_name.clone()) {
                error!("** ERROR: {}", TreeWriterError::DuplicateBranch(branch.branch_name.clone()));
                continue;
            }

            debug!("branch '{}' <- '{}' as {}", branch.branch_name, branch.input_array, class);
            entries.push(BranchEntry {
                branch_name: branch.branch_name.clone(),
                input_array: branch.input_array.clone(),
                class,
            });
        }

        let pool = match (config.parallel, config.num_threads) {
            (true, n) if n > 0 => Some(ThreadPoolBuilder::new().num_threads(n).build()?),
            _ => None,
        };

        info!(
            "registered {} of {} configured branches (parallel: {})",
            entries.len(),
            config.branches.len(),
            config.parallel
        );

        Ok(BranchRegistry { entries, parallel: config.parallel, pool })
    }

    pub fn entries(&self) -> &[BranchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every registered branch once over `event`.
    ///
    /// Branches come back in registry order whether or not they were
    /// projected concurrently. The event is only read.
    pub fn process(&self, event: &CandidateEvent) -> EventRecords {
        let branches: Vec<Branch> = if self.parallel {
            let run = || self.entries.par_iter().map(|entry| entry.run(event)).collect();
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        } else {
            self.entries.iter().map(|entry| entry.run(event)).collect()
        };

        let records = EventRecords { number: event.number, branches };
        debug!("event {}: {} records", records.number, records.record_count());
        records
    }

    /// Processes `event` and appends the result to `sink`.
    pub fn write_event(&self, event: &CandidateEvent, sink: &mut dyn RecordSink) -> TreeWriterResult<()> {
        sink.append(&self.process(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hepcore::candidate::model::Candidate;
    use hepcore::kinematics::lorentz::LorentzVector;
    use proptest::prelude::*;

    use crate::sim::synthetic::{synthetic_branches, SyntheticEventGenerator, SyntheticEventOpts};
    use crate::writer::sink::MemorySink;

    fn synthetic_event(seed: u64) -> CandidateEvent {
        SyntheticEventGenerator::new(seed, SyntheticEventOpts::default()).next_event()
    }

    #[test]
    fn test_unknown_and_duplicate_are_skipped() {
        let config = TreeWriterConfig::default()
            .add_branch("a", "Particle", "GenParticle")
            .add_branch("b", "Bogus", "NotAClass")
            .add_branch("c", "Particle", "Track")
            .add_branch("d", "Track", "Track");

        let registry = BranchRegistry::from_config(&config).unwrap();
        let names: Vec<&str> = registry.entries().iter().map(|e| e.branch_name.as_str()).collect();
        assert_eq!(names, vec!["Particle", "Track"]);
        assert_eq!(registry.entries()[1].class, BranchClass::Track);
    }

    #[test]
    fn test_empty_config() {
        let registry = BranchRegistry::from_config(&TreeWriterConfig::default()).unwrap();
        assert!(registry.is_empty());
        let records = registry.process(&CandidateEvent::new(3));
        assert_eq!(records.number, 3);
        assert!(records.branches.is_empty());
    }

    #[test]
    fn test_missing_input_array_gives_empty_branch() {
        let config = TreeWriterConfig::default().add_branch("Nowhere/jets", "Jet", "Jet");
        let registry = BranchRegistry::from_config(&config).unwrap();

        let records = registry.process(&CandidateEvent::new(0));
        assert_eq!(records.branches.len(), 1);
        assert_eq!(records.records("Jet"), Some(&BranchRecords::empty(BranchClass::Jet)));
    }

    #[test]
    fn test_branches_follow_configuration_order() {
        let mut event = CandidateEvent::new(1);
        event.push("ScalarHT/energy", Candidate::new(LorentzVector::new(40.0, 0.0, 0.0, 40.0)));
        event.push("Weight/weight", Candidate::new(LorentzVector::new(0.0, 0.0, 0.0, 2.0)));

        let config = TreeWriterConfig::default()
            .add_branch("Weight/weight", "Weight", "Weight")
            .add_branch("ScalarHT/energy", "ScalarHT", "ScalarHT");
        let records = BranchRegistry::from_config(&config).unwrap().process(&event);

        assert_eq!(records.branches[0].name, "Weight");
        assert_eq!(records.branches[1].name, "ScalarHT");
        assert_eq!(records.record_count(), 2);
    }

    #[test]
    fn test_synthetic_event_references_resolve() {
        let registry = BranchRegistry::from_config(&synthetic_branches()).unwrap();
        for seed in 0..5 {
            let records = registry.process(&synthetic_event(seed));
            assert!(records.record_count() > 0);
            let dangling = records.dangling_references();
            assert!(dangling.is_empty(), "seed {}: {:?}", seed, dangling);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let event = synthetic_event(11);
        let sequential = BranchRegistry::from_config(&synthetic_branches().with_threads(false, 0)).unwrap();
        let global = BranchRegistry::from_config(&synthetic_branches().with_threads(true, 0)).unwrap();
        let pooled = BranchRegistry::from_config(&synthetic_branches().with_threads(true, 3)).unwrap();

        let expected = sequential.process(&event);
        assert_eq!(global.process(&event), expected);
        assert_eq!(pooled.process(&event), expected);
    }

    #[test]
    fn test_write_event_appends_to_sink() {
        let registry = BranchRegistry::from_config(&synthetic_branches()).unwrap();
        let mut sink = MemorySink::default();
        registry.write_event(&synthetic_event(1), &mut sink).unwrap();
        registry.write_event(&synthetic_event(2), &mut sink).unwrap();
        assert_eq!(sink.events.len(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn prop_processing_is_idempotent(seed in any::<u64>()) {
            let registry = BranchRegistry::from_config(&synthetic_branches()).unwrap();
            let event = synthetic_event(seed);
            let first = registry.process(&event);
            let second = registry.process(&event);
            prop_assert_eq!(first, second);
        }
    }
}
