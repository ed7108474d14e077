//! Candidate ranking (supervisor suggestions and roommate suggestions)

use crate::compatibility::{score_peers, score_supervisor, Compatibility};
use crate::{Person, RecommendationLabel, Supervisor};

/// Default number of supervisor suggestions
pub const DEFAULT_SUPERVISOR_TOP_K: usize = 5;

/// Default number of roommate suggestions
pub const DEFAULT_PEER_LIMIT: usize = 10;

/// A ranked supervisor candidate
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorSuggestion {
    /// The candidate
    pub supervisor: Supervisor,

    /// Supervisor-kind compatibility score
    pub score: f64,

    /// Factor explanations
    pub factors: Vec<String>,

    /// Recommendation tier
    pub label: RecommendationLabel,
}

/// A ranked roommate candidate
#[derive(Debug, Clone, PartialEq)]
pub struct PeerSuggestion {
    /// The candidate
    pub candidate: Person,

    /// Peer-kind compatibility score
    pub score: f64,

    /// Factor explanations
    pub factors: Vec<String>,

    /// Recommendation tier
    pub label: RecommendationLabel,
}

/// Rank a supervisor pool for one person and keep the best `top_k`
///
/// The sort is stable, so equally scored candidates keep their pool order.
/// No minimum score is applied; weak candidates are labeled, not dropped.
/// A pool entry with the same id as `person` is skipped.
pub fn suggest(person: &Person, pool: &[Supervisor], top_k: usize) -> Vec<SupervisorSuggestion> {
    let mut ranked: Vec<SupervisorSuggestion> = pool
        .iter()
        .filter(|s| s.id() != person.id)
        .map(|supervisor| {
            let Compatibility { score, factors } = score_supervisor(person, supervisor);
            SupervisorSuggestion {
                supervisor: supervisor.clone(),
                score,
                factors: factors.into_iter().map(|f| f.explanation).collect(),
                label: RecommendationLabel::for_supervisor(score),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_k);
    ranked
}

/// Rank roommate candidates for one person and keep the best `limit`
///
/// Same ordering rules as [`suggest`], using the peer scorer.
pub fn rank_peers(person: &Person, candidates: &[Person], limit: usize) -> Vec<PeerSuggestion> {
    let mut ranked: Vec<PeerSuggestion> = candidates
        .iter()
        .filter(|c| c.id != person.id)
        .map(|candidate| {
            let compatibility = score_peers(person, candidate);
            PeerSuggestion {
                candidate: candidate.clone(),
                score: compatibility.score,
                factors: compatibility.explanations(),
                label: RecommendationLabel::for_peer(compatibility.score),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BehaviorScore, PersonId, StaffRole};

    fn person(id: u64, behavior: i64) -> Person {
        Person::new(PersonId::new(id), format!("P{}", id), BehaviorScore::new(behavior).unwrap())
    }

    fn staff(id: u64, exp: f64, role: StaffRole, load: u32) -> Supervisor {
        Supervisor::new(person(id, 3), exp, role).unwrap().with_load(load)
    }

    #[test]
    fn test_empty_pool() {
        assert!(suggest(&person(1, 3), &[], 5).is_empty());
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let pool = vec![
            staff(10, 1.0, StaffRole::Other, 4),
            staff(11, 6.0, StaffRole::Mentor, 0),
            staff(12, 3.0, StaffRole::Instructor, 1),
        ];
        let result = suggest(&person(1, 3), &pool, 2);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].supervisor.id(), PersonId::new(11));
        assert_eq!(result[1].supervisor.id(), PersonId::new(12));
        assert!(result[0].score >= result[1].score);
    }

    #[test]
    fn test_equal_scores_keep_pool_order() {
        let pool = vec![
            staff(20, 4.0, StaffRole::Counselor, 1),
            staff(21, 4.0, StaffRole::Mentor, 1),
        ];
        let result = suggest(&person(1, 3), &pool, 5);

        assert_eq!(result[0].score, result[1].score);
        assert_eq!(result[0].supervisor.id(), PersonId::new(20));
        assert_eq!(result[1].supervisor.id(), PersonId::new(21));
    }

    #[test]
    fn test_low_scores_are_labeled_not_dropped() {
        let pool = vec![staff(30, 0.0, StaffRole::Administrator, 7)];
        let result = suggest(&person(1, 5), &pool, 5);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, RecommendationLabel::NotRecommended);
        assert_eq!(result[0].factors.len(), 4);
    }

    #[test]
    fn test_rank_peers_skips_self() {
        let me = person(1, 3).with_age(17);
        let candidates = vec![
            me.clone(),
            person(2, 5).with_age(21),
            person(3, 3).with_age(17),
        ];
        let result = rank_peers(&me, &candidates, DEFAULT_PEER_LIMIT);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].candidate.id, PersonId::new(3));
        assert_eq!(result[1].candidate.id, PersonId::new(2));
    }

    #[test]
    fn test_rank_peers_limit() {
        let me = person(1, 3);
        let candidates: Vec<Person> = (2..=20).map(|i| person(i, 3)).collect();
        assert_eq!(rank_peers(&me, &candidates, 10).len(), 10);
    }
}
