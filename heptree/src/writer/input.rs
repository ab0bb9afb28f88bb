use std::io::Read;
use hepcore::candidate::event::CandidateEvent;
use tracing::info;

use crate::writer::error::{TreeWriterError, TreeWriterResult};

/// Reads a JSON array of candidate events and checks each graph.
///
/// Events built elsewhere never went through the arena's insertion, so
/// edges, array entries and unique ids are verified before anything is
/// projected. The first broken event aborts the read.
pub fn read_candidate_events<R: Read>(reader: R) -> TreeWriterResult<Vec<CandidateEvent>> {
    let events: Vec<CandidateEvent> = serde_json::from_reader(reader)?;

    for event in &events {
        event
            .validate()
            .map_err(|source| TreeWriterError::InvalidEvent { number: event.number, source })?;
    }

    info!("read {} events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hepcore::candidate::error::GraphError;
    use hepcore::candidate::model::{Candidate, UniqueId};
    use hepcore::kinematics::lorentz::LorentzVector;
    use serde_json::{json, Value};

    use crate::record::branch::BranchRecords;
    use crate::writer::config::TreeWriterConfig;
    use crate::writer::registry::BranchRegistry;

    fn particle_and_track() -> Value {
        let mut event = CandidateEvent::new(4);
        let particle = event.push(
            "Delphes/allParticles",
            Candidate::new(LorentzVector::new(1.0, 2.0, 0.5, 3.0)).with_position(LorentzVector::new(1.0, 2.0, 3.0, 1000.0)),
        );
        event.push(
            "TrackMerger/tracks",
            Candidate::new(LorentzVector::new(1.0, 2.0, 0.5, 3.0)).with_children(vec![particle]),
        );
        serde_json::to_value(vec![event]).unwrap()
    }

    fn read(value: &Value) -> TreeWriterResult<Vec<CandidateEvent>> {
        read_candidate_events(value.to_string().as_bytes())
    }

    #[test]
    fn test_valid_events_project() {
        let events = read(&particle_and_track()).unwrap();
        let config = TreeWriterConfig::default()
            .add_branch("Delphes/allParticles", "Particle", "GenParticle")
            .add_branch("TrackMerger/tracks", "Track", "Track");
        let records = BranchRegistry::from_config(&config).unwrap().process(&events[0]);

        match records.records("Track") {
            Some(BranchRecords::Track(tracks)) => {
                assert_eq!(tracks[0].unique_id, UniqueId(2));
                assert_eq!(tracks[0].particle, UniqueId(1));
            }
            other => panic!("unexpected track branch {:?}", other),
        }
        assert!(records.dangling_references().is_empty());
    }

    #[test]
    fn test_colliding_unique_id_is_rejected() {
        let mut value = particle_and_track();
        value[0]["arena"]["candidates"][1]["unique_id"] = json!(1);

        match read(&value) {
            Err(TreeWriterError::InvalidEvent { number, source }) => {
                assert_eq!(number, 4);
                assert_eq!(source, GraphError::DuplicateUniqueId(UniqueId(1)));
            }
            other => panic!("expected invalid event, got {:?}", other),
        }
    }

    #[test]
    fn test_child_outside_arena_is_rejected() {
        let mut value = particle_and_track();
        value[0]["arena"]["candidates"][1]["children"] = json!([7]);

        let err = read(&value).unwrap_err();
        assert!(matches!(
            err,
            TreeWriterError::InvalidEvent { source: GraphError::DanglingEdge { target: 7, len: 2, .. }, .. }
        ));
        assert_eq!(err.to_string(), "event 4: candidate #2 has children handle 7 outside an arena of 2");
    }

    #[test]
    fn test_array_entry_outside_arena_is_rejected() {
        let mut value = particle_and_track();
        value[0]["arrays"]["TrackMerger/tracks"] = json!([1, 12]);

        assert!(matches!(
            read(&value),
            Err(TreeWriterError::InvalidEvent { source: GraphError::DanglingArrayEntry { target: 12, .. }, .. })
        ));
    }

    #[test]
    fn test_stale_id_counter_is_rejected() {
        let mut value = particle_and_track();
        value[0]["arena"]["next_unique_id"] = json!(2);

        assert!(matches!(
            read(&value),
            Err(TreeWriterError::InvalidEvent { source: GraphError::StaleIdCounter { next: 2, .. }, .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(read_candidate_events(&b"[{"[..]), Err(TreeWriterError::Json(_))));
    }
}
