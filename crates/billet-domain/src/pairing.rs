//! Greedy cohort pairing (room assignment)
//!
//! Repeatedly picks the best-scoring pair among the people not yet placed
//! until fewer than two remain. This is a heuristic: it does not guarantee a
//! maximum-weight partition. Each round scores every remaining pair, so a
//! full run is O(n³) in the cohort size.

use crate::compatibility::{peer_score, score_peers, Compatibility};
use crate::{Person, PersonId, RecommendationLabel};

/// Factor note appended to rooms whose best available score is too low
pub const REQUIRES_SUPERVISION: &str = "Low compatibility: requires supervision";

/// One proposed room
#[derive(Debug, Clone, PartialEq)]
pub struct PairProposal {
    /// Room number, sequential from 1 in formation order
    pub room_number: u32,

    /// One or two occupants
    pub members: Vec<Person>,

    /// Compatibility score; `None` for a single occupant
    pub score: Option<f64>,

    /// Factor explanations
    pub factors: Vec<String>,

    /// Recommendation tier
    pub label: RecommendationLabel,
}

impl PairProposal {
    fn pair(room_number: u32, first: Person, second: Person, compatibility: Compatibility) -> Self {
        let label = RecommendationLabel::for_peer(compatibility.score);
        let mut factors = compatibility.explanations();
        if label == RecommendationLabel::NotRecommended {
            factors.push(REQUIRES_SUPERVISION.to_string());
        }
        Self {
            room_number,
            members: vec![first, second],
            score: Some(compatibility.score),
            factors,
            label,
        }
    }

    fn single(room_number: u32, occupant: Person) -> Self {
        Self {
            room_number,
            members: vec![occupant],
            score: None,
            factors: vec!["Odd cohort size: single occupancy".to_string()],
            label: RecommendationLabel::SingleOccupancy,
        }
    }

    /// Rebuild a room from a fixed set of occupants, rescoring them
    ///
    /// Returns `None` unless there are exactly one or two occupants.
    pub fn for_room(room_number: u32, mut members: Vec<Person>) -> Option<Self> {
        match members.len() {
            1 => members.pop().map(|occupant| Self::single(room_number, occupant)),
            2 => {
                let second = members.pop()?;
                let first = members.pop()?;
                let compatibility = score_peers(&first, &second);
                Some(Self::pair(room_number, first, second, compatibility))
            }
            _ => None,
        }
    }

    /// Identifiers of the occupants, in placement order
    pub fn member_ids(&self) -> Vec<PersonId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Whether this room was formed despite a low score
    pub fn requires_supervision(&self) -> bool {
        self.label == RecommendationLabel::NotRecommended
    }
}

/// Aggregate figures for a set of proposals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingSummary {
    /// Number of rooms (including single occupancy)
    pub total_rooms: usize,

    /// Rooms with two occupants
    pub paired_rooms: usize,

    /// Mean score over paired rooms (0.0 when there are none)
    pub average_score: f64,
}

impl PairingSummary {
    /// Summarize proposals
    pub fn from_proposals(proposals: &[PairProposal]) -> Self {
        let scores: Vec<f64> = proposals.iter().filter_map(|p| p.score).collect();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        Self {
            total_rooms: proposals.len(),
            paired_rooms: scores.len(),
            average_score,
        }
    }
}

/// Partition a cohort into rooms of two
///
/// Every input entry appears in exactly one proposal. Ties between equally
/// scored pairs go to the pair found first in input order. An odd cohort
/// leaves one single-occupancy room at the end.
///
/// # Examples
///
/// ```
/// use billet_domain::{optimize, BehaviorScore, Person, PersonId, RecommendationLabel};
///
/// let cohort: Vec<Person> = (1..=3)
///     .map(|i| Person::new(PersonId::new(i), format!("Cadet {}", i), BehaviorScore::default()))
///     .collect();
///
/// let rooms = optimize(&cohort);
/// assert_eq!(rooms.len(), 2);
/// assert_eq!(rooms[1].label, RecommendationLabel::SingleOccupancy);
/// ```
pub fn optimize(cohort: &[Person]) -> Vec<PairProposal> {
    let mut unpaired: Vec<&Person> = cohort.iter().collect();
    let mut proposals = Vec::with_capacity(cohort.len().div_ceil(2));
    let mut room_number = 1;

    while let Some((i, j)) = best_pair(&unpaired) {
        // j > i, so removing j first leaves i in place
        let second = unpaired.remove(j);
        let first = unpaired.remove(i);
        let compatibility = score_peers(first, second);
        proposals.push(PairProposal::pair(
            room_number,
            first.clone(),
            second.clone(),
            compatibility,
        ));
        room_number += 1;
    }

    if let Some(last) = unpaired.pop() {
        proposals.push(PairProposal::single(room_number, last.clone()));
    }

    proposals
}

/// Highest-scoring pair among `unpaired`, first in iteration order on ties
fn best_pair(unpaired: &[&Person]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, f64)> = None;

    for i in 0..unpaired.len() {
        for j in (i + 1)..unpaired.len() {
            let score = peer_score(unpaired[i], unpaired[j]);
            if best.map_or(true, |(_, _, current)| score > current) {
                best = Some((i, j, score));
            }
        }
    }

    best.map(|(i, j, _)| (i, j))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BehaviorScore, BirthDate};

    fn person(id: u64, behavior: i64) -> Person {
        Person::new(PersonId::new(id), format!("P{}", id), BehaviorScore::new(behavior).unwrap())
    }

    fn ids(proposal: &PairProposal) -> Vec<u64> {
        proposal.member_ids().iter().map(|id| id.value()).collect()
    }

    #[test]
    fn test_empty_cohort() {
        assert!(optimize(&[]).is_empty());
    }

    #[test]
    fn test_single_person() {
        let rooms = optimize(&[person(1, 3)]);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_number, 1);
        assert_eq!(rooms[0].score, None);
        assert_eq!(rooms[0].label, RecommendationLabel::SingleOccupancy);
    }

    #[test]
    fn test_ties_follow_input_order() {
        let cohort: Vec<Person> = (1..=4).map(|i| person(i, 3)).collect();
        let rooms = optimize(&cohort);

        assert_eq!(rooms.len(), 2);
        assert_eq!(ids(&rooms[0]), vec![1, 2]);
        assert_eq!(ids(&rooms[1]), vec![3, 4]);
    }

    #[test]
    fn test_best_pair_is_formed_first() {
        let cohort = vec![
            person(1, 5).with_age(15),
            person(2, 3).with_age(17).with_group_tag("Alpha"),
            person(3, 5).with_age(20),
            person(4, 3).with_age(17).with_group_tag("Alpha"),
        ];
        let rooms = optimize(&cohort);

        assert_eq!(ids(&rooms[0]), vec![2, 4]);
        assert_eq!(rooms[0].room_number, 1);
        assert_eq!(ids(&rooms[1]), vec![1, 3]);
        assert_eq!(rooms[1].room_number, 2);
        assert!(rooms[0].score > rooms[1].score);
    }

    #[test]
    fn test_low_score_pair_is_kept_and_flagged() {
        // Leo (fire) and Cancer (water), both high risk, far apart in age
        let a = person(1, 5)
            .with_birth_date(BirthDate::new(2006, 8, 1).unwrap())
            .with_age(14)
            .with_group_tag("Alpha");
        let b = person(2, 4)
            .with_birth_date(BirthDate::new(2006, 7, 1).unwrap())
            .with_age(22)
            .with_group_tag("Bravo");
        let rooms = optimize(&[a, b]);

        assert_eq!(rooms.len(), 1);
        let score = rooms[0].score.unwrap();
        assert!((score - (0.30 * 0.1 + 0.40 * 0.3 + 0.10 * 0.5)).abs() < 1e-9);
        assert_eq!(rooms[0].label, RecommendationLabel::NotRecommended);
        assert!(rooms[0].requires_supervision());
        assert_eq!(rooms[0].factors.last().unwrap(), REQUIRES_SUPERVISION);
    }

    #[test]
    fn test_summary() {
        let cohort: Vec<Person> = (1..=5).map(|i| person(i, 3)).collect();
        let rooms = optimize(&cohort);
        let summary = PairingSummary::from_proposals(&rooms);

        assert_eq!(summary.total_rooms, 3);
        assert_eq!(summary.paired_rooms, 2);
        assert!((summary.average_score - rooms[0].score.unwrap()).abs() < 1e-9);

        let empty = PairingSummary::from_proposals(&[]);
        assert_eq!(empty.average_score, 0.0);
    }

    #[test]
    fn test_winning_pair_carries_explanations() {
        let cohort: Vec<Person> = (1..=120)
            .map(|i| person(i, (i % 5 + 1) as i64).with_age(14 + (i % 6) as u32))
            .collect();
        let rooms = optimize(&cohort);

        assert_eq!(rooms.len(), 60);
        for room in &rooms {
            let explained = score_peers(&room.members[0], &room.members[1]);
            assert_eq!(room.score, Some(explained.score));
            assert!(room.factors.len() >= 4);
        }
    }

    #[test]
    fn test_for_room_rescores() {
        let a = person(1, 5);
        let b = person(2, 5);
        let room = PairProposal::for_room(4, vec![a.clone(), b.clone()]).unwrap();

        assert_eq!(room.room_number, 4);
        assert_eq!(ids(&room), vec![1, 2]);
        assert_eq!(room.score, Some(score_peers(&a, &b).score));

        let single = PairProposal::for_room(5, vec![a.clone()]).unwrap();
        assert_eq!(single.label, RecommendationLabel::SingleOccupancy);

        assert!(PairProposal::for_room(6, vec![]).is_none());
        assert!(PairProposal::for_room(6, vec![a, b, person(3, 1)]).is_none());
    }
}
