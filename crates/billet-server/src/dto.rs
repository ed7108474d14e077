//! JSON request and response bodies.
//!
//! Domain types stay free of serde; these mirror them for the wire.

use billet_domain::{
    Assignment, PairProposal, PeerSuggestion, Person, Supervisor, SupervisorSuggestion,
};
use billet_service::{CohortPlan, PeerSuggestions, RoomPlan, SupervisorSuggestions};
use serde::{Deserialize, Serialize};

/// A roster member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDto {
    /// Roster id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Birth date as `YYYY-MM-DD`
    pub birth_date: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Cohort tag
    pub group_tag: Option<String>,
    /// Behavior score, 1 (low risk) to 5 (high risk)
    pub behavior_score: u8,
    /// Exam progress
    pub exam_status: Option<String>,
    /// Derived trait group, if the birth date is known
    pub trait_group: Option<String>,
}

impl From<&Person> for PersonDto {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.value(),
            name: person.name.clone(),
            birth_date: person.birth_date.map(|d| d.to_string()),
            age: person.age,
            group_tag: person.group_tag.clone(),
            behavior_score: person.behavior_score.value(),
            exam_status: person.exam_status.map(|s| s.as_str().to_string()),
            trait_group: person.trait_group().map(|g| g.as_str().to_string()),
        }
    }
}

/// A staff member with derived workload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorDto {
    /// Underlying roster record
    pub person: PersonDto,
    /// Years of experience
    pub experience_years: f64,
    /// Staff role
    pub role: String,
    /// Active supervisor assignments
    pub current_load: u32,
    /// Mean effectiveness rating
    pub average_effectiveness: f64,
}

impl From<&Supervisor> for SupervisorDto {
    fn from(supervisor: &Supervisor) -> Self {
        Self {
            person: PersonDto::from(&supervisor.person),
            experience_years: supervisor.experience_years,
            role: supervisor.role.as_str().to_string(),
            current_load: supervisor.current_load,
            average_effectiveness: supervisor.average_effectiveness,
        }
    }
}

/// One ranked roommate candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerSuggestionDto {
    /// The candidate
    pub candidate: PersonDto,
    /// Compatibility score
    pub score: f64,
    /// Factor explanations
    pub factors: Vec<String>,
    /// Recommendation tier
    pub recommendation_label: String,
}

impl From<&PeerSuggestion> for PeerSuggestionDto {
    fn from(s: &PeerSuggestion) -> Self {
        Self {
            candidate: PersonDto::from(&s.candidate),
            score: s.score,
            factors: s.factors.clone(),
            recommendation_label: s.label.as_str().to_string(),
        }
    }
}

/// Response for `GET /people/:id/peer-suggestions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerSuggestionsResponse {
    /// The person suggestions were computed for
    pub person: PersonDto,
    /// Candidates, best first
    pub suggestions: Vec<PeerSuggestionDto>,
}

impl From<&PeerSuggestions> for PeerSuggestionsResponse {
    fn from(result: &PeerSuggestions) -> Self {
        Self {
            person: PersonDto::from(&result.person),
            suggestions: result.suggestions.iter().map(PeerSuggestionDto::from).collect(),
        }
    }
}

/// One ranked supervisor candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorSuggestionDto {
    /// The candidate
    pub supervisor: SupervisorDto,
    /// Compatibility score
    pub score: f64,
    /// Factor explanations
    pub factors: Vec<String>,
    /// Recommendation tier
    pub recommendation_label: String,
}

impl From<&SupervisorSuggestion> for SupervisorSuggestionDto {
    fn from(s: &SupervisorSuggestion) -> Self {
        Self {
            supervisor: SupervisorDto::from(&s.supervisor),
            score: s.score,
            factors: s.factors.clone(),
            recommendation_label: s.label.as_str().to_string(),
        }
    }
}

/// Response for `GET /people/:id/supervisor-suggestions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorSuggestionsResponse {
    /// The person suggestions were computed for
    pub person: PersonDto,
    /// Candidates, best first
    pub suggestions: Vec<SupervisorSuggestionDto>,
}

impl From<&SupervisorSuggestions> for SupervisorSuggestionsResponse {
    fn from(result: &SupervisorSuggestions) -> Self {
        Self {
            person: PersonDto::from(&result.person),
            suggestions: result
                .suggestions
                .iter()
                .map(SupervisorSuggestionDto::from)
                .collect(),
        }
    }
}

/// Query string for supervisor suggestions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupervisorPoolParams {
    /// Only staff with this role
    pub role: Option<String>,
    /// Only staff with at most this many active assignments
    pub max_load: Option<u32>,
    /// Number of suggestions to return
    pub top_k: Option<usize>,
}

/// Body for `POST /cohorts/optimize`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// Only members with this group tag
    #[serde(default)]
    pub group_tag: Option<String>,
    /// Maximum cohort size
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One proposed room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalDto {
    /// Room number
    pub room_number: u32,
    /// Occupant ids; posting these back to `/cohorts/apply` accepts the room
    pub member_ids: Vec<u64>,
    /// Occupant records
    #[serde(default)]
    pub members: Vec<PersonDto>,
    /// Compatibility score; absent for a single occupant
    pub score: Option<f64>,
    /// Factor explanations
    #[serde(default)]
    pub factors: Vec<String>,
    /// Recommendation tier
    pub recommendation_label: String,
}

impl From<&PairProposal> for ProposalDto {
    fn from(p: &PairProposal) -> Self {
        Self {
            room_number: p.room_number,
            member_ids: p.member_ids().iter().map(|id| id.value()).collect(),
            members: p.members.iter().map(PersonDto::from).collect(),
            score: p.score,
            factors: p.factors.clone(),
            recommendation_label: p.label.as_str().to_string(),
        }
    }
}

/// Response for `POST /cohorts/optimize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// Rooms in formation order
    pub proposals: Vec<ProposalDto>,
    /// Number of rooms
    pub total_rooms: usize,
    /// Rooms with two occupants
    pub paired_rooms: usize,
    /// Mean score over paired rooms
    pub average_score: f64,
}

impl From<&CohortPlan> for OptimizeResponse {
    fn from(plan: &CohortPlan) -> Self {
        Self {
            proposals: plan.proposals.iter().map(ProposalDto::from).collect(),
            total_rooms: plan.summary.total_rooms,
            paired_rooms: plan.summary.paired_rooms,
            average_score: plan.summary.average_score,
        }
    }
}

/// An accepted room; extra proposal fields are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDto {
    /// Room number
    pub room_number: u32,
    /// Occupant ids
    pub member_ids: Vec<u64>,
}

impl From<&RoomDto> for RoomPlan {
    fn from(room: &RoomDto) -> Self {
        RoomPlan {
            room_number: room.room_number,
            member_ids: room
                .member_ids
                .iter()
                .copied()
                .map(billet_domain::PersonId::new)
                .collect(),
        }
    }
}

/// Body for `POST /cohorts/apply`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    /// Accepted rooms
    pub proposals: Vec<RoomDto>,
}

/// Response for `POST /cohorts/apply`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResponse {
    /// Rooms written
    pub applied: usize,
}

/// Body for `POST /supervisor-assignments`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSupervisorAssignmentRequest {
    /// Supervisee id
    pub person_id: u64,
    /// Staff id
    pub supervisor_id: u64,
}

/// Body for `POST /supervisor-assignments/:id/rating`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    /// Effectiveness, 1 to 5
    pub rating: i64,
    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    /// Always "ok"
    pub status: String,
}

impl AckResponse {
    /// Successful acknowledgement
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// A stored assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDto {
    /// Assignment id (UUID)
    pub id: String,
    /// "peer" or "supervisor"
    pub kind: String,
    /// First roommate, or the supervisee
    pub subject_id: u64,
    /// Second roommate, or the supervisor
    pub counterpart_id: Option<u64>,
    /// Room number for peer assignments
    pub room_number: Option<u32>,
    /// Score at assignment time
    pub score: Option<f64>,
    /// Factor explanations at assignment time
    pub factors: Vec<String>,
    /// Recommendation tier at assignment time
    pub recommendation_label: String,
    /// Effectiveness rating, if rated
    pub effectiveness_rating: Option<u8>,
    /// Notes attached with the rating
    pub notes: Option<String>,
    /// Lifecycle status
    pub status: String,
    /// Seconds since Unix epoch
    pub created_at: u64,
}

impl From<&Assignment> for AssignmentDto {
    fn from(a: &Assignment) -> Self {
        Self {
            id: a.id.to_string(),
            kind: a.kind.as_str().to_string(),
            subject_id: a.subject_id.value(),
            counterpart_id: a.counterpart_id.map(|id| id.value()),
            room_number: a.room_number,
            score: a.score,
            factors: a.factors.clone(),
            recommendation_label: a.label.as_str().to_string(),
            effectiveness_rating: a.effectiveness_rating.map(|r| r.value()),
            notes: a.notes.clone(),
            status: a.status.as_str().to_string(),
            created_at: a.created_at,
        }
    }
}
