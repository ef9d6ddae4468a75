//! Payload inheritance for lineage-tracking runs.
//!
//! When `track_lineage` is on, every agent the engine creates gets a
//! payload derived from its parents. Agents seeded without a payload are
//! treated as having an empty one. Ancestor sets keep only the
//! `ancestor_window` most recent ids, so payload size stays constant no
//! matter how long a run goes.

use nrm_core::agent::{Agent, AgentPayload};

fn payload_of(agent: &Agent) -> AgentPayload {
    agent.payload().cloned().unwrap_or_default()
}

/// Payload for a newborn: the parent's history plus the parent itself.
pub fn offspring_payload(parent: &Agent, ancestor_window: usize) -> AgentPayload {
    let mut payload = payload_of(parent);
    payload.remember_ancestor(parent.id(), ancestor_window);
    payload
}

/// Payload for one of the two children of a decomposition.
///
/// Both children inherit the same payload, so their positions coincide
/// with the parent's.
pub fn split_payload(parent: &Agent, ancestor_window: usize) -> AgentPayload {
    offspring_payload(parent, ancestor_window)
}

/// Payload for the child of a composition.
///
/// Ancestors are the union of both parents' histories and the parents
/// themselves, newest `ancestor_window` kept. The position is the midpoint
/// when both parents have one, otherwise whichever is set. Pattern memory
/// is `a`'s then `b`'s, then the resonance that formed the child, keeping
/// the newest `memory_len`.
pub fn composed_payload(
    a: &Agent,
    b: &Agent,
    similarity: f64,
    memory_len: usize,
    ancestor_window: usize,
) -> AgentPayload {
    let pa = payload_of(a);
    let pb = payload_of(b);

    let position = match (pa.position, pb.position) {
        (Some(x), Some(y)) => Some(x.midpoint(&y)),
        (x, y) => x.or(y),
    };

    let mut child = AgentPayload {
        position,
        ancestors: pa.ancestors,
        pattern_memory: Vec::new(),
    };
    child.ancestors.extend(pb.ancestors);
    child.ancestors.insert(a.id());
    child.ancestors.insert(b.id());
    child.trim_ancestors(ancestor_window);

    for v in pa.pattern_memory.into_iter().chain(pb.pattern_memory) {
        child.remember(v, memory_len);
    }
    child.remember(similarity, memory_len);
    child
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrm_core::types::{AgentId, Position};

    #[test]
    fn offspring_records_parent() {
        let parent = Agent::new(AgentId(4), 0, 1.5);
        let payload = offspring_payload(&parent, 32);
        assert!(payload.ancestors.contains(&AgentId(4)));
        assert_eq!(payload.lineage_depth(), 1);
        assert!(payload.position.is_none());
    }

    #[test]
    fn split_children_keep_grandparents() {
        let mut history = AgentPayload::at(Position::new(3.0, 3.0));
        history.ancestors.insert(AgentId(1));
        let parent = Agent::new(AgentId(2), 1, 2.0).with_payload(history);
        let payload = split_payload(&parent, 32);
        assert_eq!(
            payload.ancestors.iter().copied().collect::<Vec<_>>(),
            vec![AgentId(1), AgentId(2)]
        );
        assert_eq!(payload.position, Some(Position::new(3.0, 3.0)));
    }

    #[test]
    fn composition_unions_lineage_and_averages_position() {
        let mut pa = AgentPayload::at(Position::new(0.0, 0.0));
        pa.ancestors.insert(AgentId(10));
        pa.pattern_memory = vec![0.5];
        let mut pb = AgentPayload::at(Position::new(2.0, 4.0));
        pb.ancestors.insert(AgentId(11));
        pb.pattern_memory = vec![0.6];

        let a = Agent::new(AgentId(1), 0, 1.0).with_payload(pa);
        let b = Agent::new(AgentId(2), 0, 1.0).with_payload(pb);
        let child = composed_payload(&a, &b, 0.995, 16, 32);

        assert_eq!(child.position, Some(Position::new(1.0, 2.0)));
        for id in [1, 2, 10, 11] {
            assert!(child.ancestors.contains(&AgentId(id)));
        }
        assert_eq!(child.pattern_memory, vec![0.5, 0.6, 0.995]);
    }

    #[test]
    fn composition_memory_is_bounded() {
        let mut pa = AgentPayload::new();
        pa.pattern_memory = vec![0.1, 0.2, 0.3];
        let a = Agent::new(AgentId(1), 0, 1.0).with_payload(pa);
        let b = Agent::new(AgentId(2), 0, 1.0);
        let child = composed_payload(&a, &b, 0.9, 2, 32);
        assert_eq!(child.pattern_memory, vec![0.3, 0.9]);
    }

    #[test]
    fn composition_without_payloads_still_tracks_parents() {
        let a = Agent::new(AgentId(1), 2, 1.0);
        let b = Agent::new(AgentId(2), 2, 1.0);
        let child = composed_payload(&a, &b, 1.0, 4, 32);
        assert_eq!(child.lineage_depth(), 2);
        assert!(child.position.is_none());
    }

    #[test]
    fn ancestor_sets_stay_within_window() {
        // A long chain of births must not accumulate unbounded history.
        let mut agent = Agent::new(AgentId(0), 0, 1.5);
        for id in 1..200 {
            let payload = offspring_payload(&agent, 8);
            agent = Agent::new(AgentId(id), 0, 1.5).with_payload(payload);
        }
        let payload = agent.payload().unwrap();
        assert_eq!(payload.lineage_depth(), 8);
        // The newest ancestors survive: ids 191..=198.
        assert!(payload.ancestors.contains(&AgentId(198)));
        assert!(!payload.ancestors.contains(&AgentId(190)));
    }

    #[test]
    fn composition_trims_merged_history() {
        let mut pa = AgentPayload::new();
        pa.ancestors.extend((0..10).map(AgentId));
        let mut pb = AgentPayload::new();
        pb.ancestors.extend((10..20).map(AgentId));
        let a = Agent::new(AgentId(20), 0, 1.0).with_payload(pa);
        let b = Agent::new(AgentId(21), 0, 1.0).with_payload(pb);

        let child = composed_payload(&a, &b, 1.0, 4, 5);
        let kept: Vec<u64> = child.ancestors.iter().map(|id| id.as_u64()).collect();
        assert_eq!(kept, vec![17, 18, 19, 20, 21]);
    }
}
