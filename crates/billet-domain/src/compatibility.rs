//! Compatibility scoring
//!
//! Computes an explained score in `[0, 1]` for a pair of people. Two
//! relationship kinds are supported, each with its own fixed weight vector
//! and lookup table:
//!
//! - **peer**: two roster members sharing a room (symmetric)
//! - **supervisor**: a staff member supervising a roster member
//!
//! Each factor term is clamped to `[0, 1]` before weighting, and the weighted
//! sum is clamped again. Missing biographical data never fails: the affected
//! factor falls back to [`NEUTRAL`] and says so in its explanation.

use crate::profile::TraitGroup;
use crate::{BehaviorScore, Person, StaffRole, Supervisor};
use crate::person::ExamStatus;

/// Term used whenever the data needed by a factor is missing
pub const NEUTRAL: f64 = 0.5;

/// Peer weight: behavior-risk interaction
pub const PEER_BEHAVIOR_WEIGHT: f64 = 0.30;
/// Peer weight: trait-group interaction
pub const PEER_TRAIT_WEIGHT: f64 = 0.40;
/// Peer weight: age proximity
pub const PEER_AGE_WEIGHT: f64 = 0.20;
/// Peer weight: cohort affinity
pub const PEER_COHORT_WEIGHT: f64 = 0.10;

/// Supervisor weight: experience adequacy
pub const SUPERVISOR_EXPERIENCE_WEIGHT: f64 = 0.40;
/// Supervisor weight: trait-role synergy
pub const SUPERVISOR_TRAIT_WEIGHT: f64 = 0.35;
/// Supervisor weight: workload
pub const SUPERVISOR_WORKLOAD_WEIGHT: f64 = 0.15;
/// Supervisor weight: role fit
pub const SUPERVISOR_ROLE_WEIGHT: f64 = 0.10;

/// Behavior term when both people are high risk
const BOTH_HIGH_RISK: f64 = 0.1;
/// Behavior term for a low-risk/high-risk (mentor/mentee) pairing
const MENTOR_PAIRING: f64 = 0.9;
/// Behavior distance at which the default term reaches zero
const BEHAVIOR_SPAN: f64 = 3.0;
/// Age gap (years) at which the age term reaches zero
const AGE_SPAN: f64 = 4.0;
/// Experience (years) that earns the full experience term
const FULL_EXPERIENCE_YEARS: f64 = 5.0;
/// Experience (years) required to supervise a high-risk person
const HIGH_RISK_EXPERIENCE_YEARS: f64 = 3.0;
/// Experience term for an under-experienced supervisor of a high-risk person
const UNDER_EXPERIENCED: f64 = 0.3;
/// Load at which the workload term reaches zero
const MAX_LOAD: f64 = 5.0;

/// Peer trait-group table, indexed `[a][b]` in Fire, Earth, Air, Water order.
///
/// Symmetric by construction.
pub const PEER_TRAIT_TABLE: [[(f64, &str); 4]; 4] = [
    [(0.8, "same group"), (0.5, "neutral"), (0.7, "complementary"), (0.3, "challenging")],
    [(0.5, "neutral"), (0.8, "same group"), (0.3, "challenging"), (0.7, "complementary")],
    [(0.7, "complementary"), (0.3, "challenging"), (0.8, "same group"), (0.5, "neutral")],
    [(0.3, "challenging"), (0.7, "complementary"), (0.5, "neutral"), (0.8, "same group")],
];

/// Supervisor trait-synergy table, indexed `[staff][supervisee]` in Fire, Earth, Air, Water order.
///
/// Not symmetric: an Earth supervisor gives a flat stability baseline, the
/// other groups favor particular supervisees.
pub const SUPERVISOR_TRAIT_TABLE: [[(f64, &str); 4]; 4] = [
    [
        (0.8, "same group"),
        (0.7, "drive balanced by groundedness"),
        (0.7, "drive matched by curiosity"),
        (0.5, "no particular synergy"),
    ],
    [
        (0.7, "stable baseline"),
        (0.7, "stable baseline"),
        (0.7, "stable baseline"),
        (0.7, "stable baseline"),
    ],
    [
        (0.7, "perspective for an energetic supervisee"),
        (0.5, "no particular synergy"),
        (0.7, "shared perspective"),
        (0.5, "no particular synergy"),
    ],
    [
        (0.8, "emotional support"),
        (0.5, "no particular synergy"),
        (0.5, "no particular synergy"),
        (0.8, "emotional support"),
    ],
];

/// One weighted, explained component of a compatibility score
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityFactor {
    /// Term value in [0.0, 1.0]
    pub score: f64,

    /// Weight of this factor in the final sum
    pub weight: f64,

    /// Human-readable explanation
    pub explanation: String,
}

impl CompatibilityFactor {
    /// Create a factor, clamping the term into [0, 1]
    pub fn new(score: f64, weight: f64, explanation: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            weight,
            explanation: explanation.into(),
        }
    }

    /// Contribution of this factor to the final score
    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }
}

/// A compatibility score with the factors that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Compatibility {
    /// Weighted sum in [0.0, 1.0]
    pub score: f64,

    /// Factors in evaluation order
    pub factors: Vec<CompatibilityFactor>,
}

impl Compatibility {
    /// Combine factors into a clamped weighted sum
    pub fn from_factors(factors: Vec<CompatibilityFactor>) -> Self {
        let score = factors
            .iter()
            .map(CompatibilityFactor::weighted)
            .sum::<f64>()
            .clamp(0.0, 1.0);
        Self { score, factors }
    }

    /// Factor explanations in evaluation order
    pub fn explanations(&self) -> Vec<String> {
        self.factors.iter().map(|f| f.explanation.clone()).collect()
    }
}

/// Score two roster members as roommates
///
/// Symmetric: `score_peers(a, b).score == score_peers(b, a).score`.
///
/// # Examples
///
/// ```
/// use billet_domain::{score_peers, BehaviorScore, Person, PersonId};
///
/// let a = Person::new(PersonId::new(1), "A", BehaviorScore::new(5).unwrap());
/// let b = Person::new(PersonId::new(2), "B", BehaviorScore::new(5).unwrap());
///
/// let result = score_peers(&a, &b);
/// assert!((result.score - 0.38).abs() < 1e-9);
/// assert_eq!(result.factors.len(), 4);
/// ```
pub fn score_peers(a: &Person, b: &Person) -> Compatibility {
    Compatibility::from_factors(vec![
        behavior_factor(a, b),
        peer_trait_factor(a.trait_group(), b.trait_group()),
        age_factor(a.age, b.age),
        cohort_factor(a.group_tag.as_deref(), b.group_tag.as_deref()),
    ])
}

/// Peer score without factor explanations
///
/// Always equal to `score_peers(a, b).score`; used where many pairs are
/// compared and only the winner needs explaining.
pub fn peer_score(a: &Person, b: &Person) -> f64 {
    [
        (behavior_term(a.behavior_score, b.behavior_score), PEER_BEHAVIOR_WEIGHT),
        (peer_trait_term(a.trait_group(), b.trait_group()), PEER_TRAIT_WEIGHT),
        (age_term(a.age, b.age), PEER_AGE_WEIGHT),
        (cohort_term(a.group_tag.as_deref(), b.group_tag.as_deref()), PEER_COHORT_WEIGHT),
    ]
    .iter()
    .map(|(term, weight)| term.clamp(0.0, 1.0) * weight)
    .sum::<f64>()
    .clamp(0.0, 1.0)
}

/// Score a staff member as supervisor of a roster member
pub fn score_supervisor(supervisee: &Person, supervisor: &Supervisor) -> Compatibility {
    Compatibility::from_factors(vec![
        experience_factor(supervisee, supervisor.experience_years),
        supervisor_trait_factor(supervisor.person.trait_group(), supervisee.trait_group()),
        workload_factor(supervisor.current_load),
        role_factor(supervisor.role, supervisee.exam_status),
    ])
}

fn behavior_term(a: BehaviorScore, b: BehaviorScore) -> f64 {
    if a.is_high_risk() && b.is_high_risk() {
        BOTH_HIGH_RISK
    } else if (a.is_low_risk() && b.is_high_risk()) || (b.is_low_risk() && a.is_high_risk()) {
        MENTOR_PAIRING
    } else {
        ((BEHAVIOR_SPAN - a.distance(b) as f64) / BEHAVIOR_SPAN).max(0.0)
    }
}

fn peer_trait_term(a: Option<TraitGroup>, b: Option<TraitGroup>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => PEER_TRAIT_TABLE[a.index()][b.index()].0,
        _ => NEUTRAL,
    }
}

fn age_term(a: Option<u32>, b: Option<u32>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => ((AGE_SPAN - a.abs_diff(b) as f64) / AGE_SPAN).max(0.0),
        _ => NEUTRAL,
    }
}

fn cohort_term(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => NEUTRAL,
    }
}

fn behavior_factor(a: &Person, b: &Person) -> CompatibilityFactor {
    let (sa, sb) = (a.behavior_score, b.behavior_score);
    let term = behavior_term(sa, sb);

    let explanation = if sa.is_high_risk() && sb.is_high_risk() {
        "Both high-risk behavior profiles: pairing discouraged".to_string()
    } else if (sa.is_low_risk() && sb.is_high_risk()) || (sb.is_low_risk() && sa.is_high_risk()) {
        "Low-risk with high-risk behavior profile: mentor/mentee pairing encouraged".to_string()
    } else {
        format!("Behavior scores differ by {}", sa.distance(sb))
    };

    CompatibilityFactor::new(term, PEER_BEHAVIOR_WEIGHT, explanation)
}

fn peer_trait_factor(a: Option<TraitGroup>, b: Option<TraitGroup>) -> CompatibilityFactor {
    let term = peer_trait_term(a, b);
    match (a, b) {
        (Some(a), Some(b)) => {
            let note = PEER_TRAIT_TABLE[a.index()][b.index()].1;
            CompatibilityFactor::new(
                term,
                PEER_TRAIT_WEIGHT,
                format!("Trait groups {} and {}: {}", a.as_str(), b.as_str(), note),
            )
        }
        _ => CompatibilityFactor::new(term, PEER_TRAIT_WEIGHT, "Insufficient data for trait compatibility"),
    }
}

fn age_factor(a: Option<u32>, b: Option<u32>) -> CompatibilityFactor {
    let term = age_term(a, b);
    match (a, b) {
        (Some(a), Some(b)) => CompatibilityFactor::new(
            term,
            PEER_AGE_WEIGHT,
            format!("Age difference of {} years", a.abs_diff(b)),
        ),
        _ => CompatibilityFactor::new(term, PEER_AGE_WEIGHT, "Age unknown: neutral age factor"),
    }
}

fn cohort_factor(a: Option<&str>, b: Option<&str>) -> CompatibilityFactor {
    let term = cohort_term(a, b);
    match (a, b) {
        (Some(a), Some(b)) if a == b => {
            CompatibilityFactor::new(term, PEER_COHORT_WEIGHT, format!("Same group ({})", a))
        }
        _ => CompatibilityFactor::new(term, PEER_COHORT_WEIGHT, "Different or unknown group"),
    }
}

fn experience_factor(supervisee: &Person, years: f64) -> CompatibilityFactor {
    if supervisee.behavior_score.is_high_risk() {
        if years >= HIGH_RISK_EXPERIENCE_YEARS {
            return CompatibilityFactor::new(
                1.0,
                SUPERVISOR_EXPERIENCE_WEIGHT,
                format!("{} years of experience: well-matched for high-risk supervisee", years),
            );
        }
        return CompatibilityFactor::new(
            UNDER_EXPERIENCED,
            SUPERVISOR_EXPERIENCE_WEIGHT,
            format!("{} years of experience: under-experienced for high-risk supervisee (flagged)", years),
        );
    }

    CompatibilityFactor::new(
        (years / FULL_EXPERIENCE_YEARS).min(1.0),
        SUPERVISOR_EXPERIENCE_WEIGHT,
        format!("{} years of experience", years),
    )
}

fn supervisor_trait_factor(staff: Option<TraitGroup>, supervisee: Option<TraitGroup>) -> CompatibilityFactor {
    match (staff, supervisee) {
        (Some(staff), Some(supervisee)) => {
            let (term, note) = SUPERVISOR_TRAIT_TABLE[staff.index()][supervisee.index()];
            CompatibilityFactor::new(
                term,
                SUPERVISOR_TRAIT_WEIGHT,
                format!(
                    "{} supervisor with {} supervisee: {}",
                    staff.as_str(),
                    supervisee.as_str(),
                    note
                ),
            )
        }
        _ => CompatibilityFactor::new(
            NEUTRAL,
            SUPERVISOR_TRAIT_WEIGHT,
            "Insufficient data for trait synergy",
        ),
    }
}

fn workload_factor(current_load: u32) -> CompatibilityFactor {
    CompatibilityFactor::new(
        (1.0 - current_load as f64 / MAX_LOAD).max(0.0),
        SUPERVISOR_WORKLOAD_WEIGHT,
        format!("Current load of {} active assignments", current_load),
    )
}

fn role_factor(role: StaffRole, exam_status: Option<ExamStatus>) -> CompatibilityFactor {
    match role {
        StaffRole::Mentor | StaffRole::Counselor => CompatibilityFactor::new(
            1.0,
            SUPERVISOR_ROLE_WEIGHT,
            format!("{} role suits supervision", role.as_str()),
        ),
        StaffRole::Instructor if exam_status != Some(ExamStatus::Completed) => CompatibilityFactor::new(
            0.8,
            SUPERVISOR_ROLE_WEIGHT,
            "Instructor can support exam preparation",
        ),
        _ => CompatibilityFactor::new(
            NEUTRAL,
            SUPERVISOR_ROLE_WEIGHT,
            format!("{} role: neutral fit", role.as_str()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BehaviorScore, BirthDate, PersonId};

    fn person(id: u64, behavior: i64) -> Person {
        Person::new(PersonId::new(id), format!("P{}", id), BehaviorScore::new(behavior).unwrap())
    }

    fn born(p: Person, month: u32, day: u32) -> Person {
        p.with_birth_date(BirthDate::new(2006, month, day).unwrap())
    }

    fn supervisor(exp: f64, role: StaffRole) -> Supervisor {
        Supervisor::new(person(100, 3), exp, role).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!(approx(
            PEER_BEHAVIOR_WEIGHT + PEER_TRAIT_WEIGHT + PEER_AGE_WEIGHT + PEER_COHORT_WEIGHT,
            1.0
        ));
        assert!(approx(
            SUPERVISOR_EXPERIENCE_WEIGHT
                + SUPERVISOR_TRAIT_WEIGHT
                + SUPERVISOR_WORKLOAD_WEIGHT
                + SUPERVISOR_ROLE_WEIGHT,
            1.0
        ));
    }

    #[test]
    fn test_peer_table_is_symmetric() {
        for (i, row) in PEER_TRAIT_TABLE.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                assert_eq!(cell.0, PEER_TRAIT_TABLE[j][i].0);
            }
        }
    }

    #[test]
    fn test_both_high_risk_formula() {
        let result = score_peers(&person(1, 5), &person(2, 5));
        let expected = 0.30 * 0.1 + 0.40 * 0.5 + 0.20 * 0.5 + 0.10 * 0.5;

        assert!(approx(result.score, expected));
        assert_eq!(result.factors[0].score, 0.1);
        assert!(result.factors[0].explanation.contains("discouraged"));
        assert!(result.factors[1].explanation.contains("Insufficient data"));
    }

    #[test]
    fn test_mentor_pairing_formula() {
        let a = born(person(1, 1), 8, 1).with_age(17).with_group_tag("Alpha");
        let b = born(person(2, 5), 8, 1).with_age(17).with_group_tag("Alpha");
        let result = score_peers(&a, &b);
        let expected = 0.30 * 0.9 + 0.40 * 0.8 + 0.20 * 1.0 + 0.10 * 1.0;

        assert!(approx(result.score, expected));
        assert_eq!(
            crate::RecommendationLabel::for_peer(result.score),
            crate::RecommendationLabel::Excellent
        );
        assert!(result.factors[0].explanation.contains("mentor/mentee"));
    }

    #[test]
    fn test_default_behavior_term() {
        let result = score_peers(&person(1, 3), &person(2, 2));
        assert!(approx(result.factors[0].score, 2.0 / 3.0));

        let same = score_peers(&person(1, 3), &person(2, 3));
        assert_eq!(same.factors[0].score, 1.0);
    }

    #[test]
    fn test_trait_table_lookups() {
        // Aries (fire) with Gemini (air): complementary
        let fire_air = score_peers(&born(person(1, 3), 4, 1), &born(person(2, 3), 6, 1));
        assert_eq!(fire_air.factors[1].score, 0.7);

        // Leo (fire) with Cancer (water): challenging
        let fire_water = score_peers(&born(person(1, 3), 8, 1), &born(person(2, 3), 7, 1));
        assert_eq!(fire_water.factors[1].score, 0.3);

        // Taurus (earth) with Pisces (water): complementary
        let earth_water = score_peers(&born(person(1, 3), 5, 1), &born(person(2, 3), 3, 1));
        assert_eq!(earth_water.factors[1].score, 0.7);
    }

    #[test]
    fn test_age_term() {
        let a = person(1, 3).with_age(16);
        assert!(approx(score_peers(&a, &person(2, 3).with_age(18)).factors[2].score, 0.5));
        assert_eq!(score_peers(&a, &person(2, 3).with_age(25)).factors[2].score, 0.0);
        assert_eq!(score_peers(&a, &person(2, 3)).factors[2].score, NEUTRAL);
    }

    #[test]
    fn test_cohort_requires_both_tags() {
        let tagged = person(1, 3).with_group_tag("Bravo");
        assert_eq!(score_peers(&tagged, &person(2, 3).with_group_tag("Bravo")).factors[3].score, 1.0);
        assert_eq!(score_peers(&tagged, &person(2, 3).with_group_tag("Delta")).factors[3].score, 0.5);
        assert_eq!(score_peers(&person(1, 3), &person(2, 3)).factors[3].score, 0.5);
    }

    #[test]
    fn test_experience_rules() {
        let calm = person(1, 2);
        let risky = person(2, 4);

        assert!(approx(score_supervisor(&calm, &supervisor(2.0, StaffRole::Other)).factors[0].score, 0.4));
        assert_eq!(score_supervisor(&calm, &supervisor(8.0, StaffRole::Other)).factors[0].score, 1.0);
        assert_eq!(score_supervisor(&risky, &supervisor(3.0, StaffRole::Other)).factors[0].score, 1.0);

        let flagged = score_supervisor(&risky, &supervisor(2.5, StaffRole::Other));
        assert_eq!(flagged.factors[0].score, 0.3);
        assert!(flagged.factors[0].explanation.contains("flagged"));
    }

    #[test]
    fn test_supervisor_trait_rules() {
        let staff = |month, day| {
            let mut s = supervisor(5.0, StaffRole::Other);
            s.person = born(s.person, month, day);
            s
        };
        let fire = born(person(1, 3), 4, 1);
        let earth = born(person(2, 3), 5, 1);
        let air = born(person(3, 3), 6, 1);
        let water = born(person(4, 3), 7, 1);

        // Earth staff: flat baseline, even for an Earth supervisee
        assert_eq!(score_supervisor(&earth, &staff(9, 1)).factors[1].score, 0.7);
        // Water staff with Fire or Water
        assert_eq!(score_supervisor(&fire, &staff(7, 1)).factors[1].score, 0.8);
        assert_eq!(score_supervisor(&air, &staff(7, 1)).factors[1].score, 0.5);
        // Fire staff with Earth/Air, and with Fire (identical)
        assert_eq!(score_supervisor(&earth, &staff(4, 1)).factors[1].score, 0.7);
        assert_eq!(score_supervisor(&fire, &staff(4, 1)).factors[1].score, 0.8);
        assert_eq!(score_supervisor(&water, &staff(4, 1)).factors[1].score, 0.5);
        // Air staff with Fire/Air
        assert_eq!(score_supervisor(&air, &staff(6, 1)).factors[1].score, 0.7);
        assert_eq!(score_supervisor(&earth, &staff(6, 1)).factors[1].score, 0.5);
        // Unknown supervisee group
        assert_eq!(score_supervisor(&person(5, 3), &staff(6, 1)).factors[1].score, NEUTRAL);
    }

    #[test]
    fn test_workload_and_role() {
        let p = person(1, 3);
        let busy = supervisor(5.0, StaffRole::Instructor).with_load(2);
        let result = score_supervisor(&p, &busy);
        assert!(approx(result.factors[2].score, 0.6));
        assert_eq!(result.factors[3].score, 0.8);

        let overloaded = supervisor(5.0, StaffRole::Mentor).with_load(9);
        let result = score_supervisor(&p, &overloaded);
        assert_eq!(result.factors[2].score, 0.0);
        assert_eq!(result.factors[3].score, 1.0);

        let passed = p.clone().with_exam_status(ExamStatus::Completed);
        let result = score_supervisor(&passed, &supervisor(5.0, StaffRole::Instructor));
        assert_eq!(result.factors[3].score, 0.5);
    }

    #[test]
    fn test_explanations_keep_factor_order() {
        let result = score_supervisor(&person(1, 3), &supervisor(1.0, StaffRole::Counselor));
        let explanations = result.explanations();
        assert_eq!(explanations.len(), 4);
        assert!(explanations[0].contains("experience"));
        assert!(explanations[1].contains("trait"));
        assert!(explanations[2].contains("load"));
        assert!(explanations[3].contains("counselor"));
    }
}
