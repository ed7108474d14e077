//! Assignment module - accepted proposals as persisted records

use crate::pairing::PairProposal;
use crate::ranking::SupervisorSuggestion;
use crate::{PersonId, RecommendationLabel, ValidationError};
use std::fmt;

/// Unique identifier for an assignment based on UUIDv7
///
/// UUIDv7 identifiers sort by creation time, so listing assignments by id
/// also lists them chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssignmentId(u128);

impl AssignmentId {
    /// Generate a new UUIDv7-based AssignmentId
    ///
    /// # Examples
    ///
    /// ```
    /// use billet_domain::AssignmentId;
    ///
    /// let id = AssignmentId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an AssignmentId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an AssignmentId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid assignment id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Relationship an assignment records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentKind {
    /// Roommates
    Peer,
    /// Supervisor and supervisee
    Supervisor,
}

impl AssignmentKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentKind::Peer => "peer",
            AssignmentKind::Supervisor => "supervisor",
        }
    }

    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "peer" => Some(AssignmentKind::Peer),
            "supervisor" => Some(AssignmentKind::Supervisor),
            _ => None,
        }
    }
}

/// Lifecycle status of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentStatus {
    /// Currently in effect
    Active,
    /// Ended normally
    Completed,
    /// Ended early or superseded
    Terminated,
}

impl AssignmentStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => "active",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Terminated => "terminated",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(AssignmentStatus::Active),
            "completed" => Some(AssignmentStatus::Completed),
            "terminated" => Some(AssignmentStatus::Terminated),
            _ => None,
        }
    }
}

/// Effectiveness feedback on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectivenessRating(u8);

impl EffectivenessRating {
    /// Create a rating
    ///
    /// # Errors
    /// Returns error if the value is outside 1..=5
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::Rating(value))
        }
    }

    /// Get the raw value
    pub fn value(&self) -> u8 {
        self.0
    }
}

/// A persisted assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Unique identifier
    pub id: AssignmentId,

    /// Relationship kind
    pub kind: AssignmentKind,

    /// First roommate, or the supervisee
    pub subject_id: PersonId,

    /// Second roommate, or the supervisor; `None` for single occupancy
    pub counterpart_id: Option<PersonId>,

    /// Room number (peer assignments only)
    pub room_number: Option<u32>,

    /// Compatibility score at assignment time; `None` for single occupancy
    pub score: Option<f64>,

    /// Factor explanations at assignment time
    pub factors: Vec<String>,

    /// Recommendation tier at assignment time
    pub label: RecommendationLabel,

    /// Effectiveness feedback, if rated
    pub effectiveness_rating: Option<EffectivenessRating>,

    /// Free-form notes attached with the rating
    pub notes: Option<String>,

    /// Lifecycle status
    pub status: AssignmentStatus,

    /// Creation timestamp (seconds since Unix epoch)
    pub created_at: u64,
}

impl Assignment {
    /// Build an active peer assignment from an accepted room proposal
    ///
    /// Returns `None` for a proposal with no members.
    pub fn from_proposal(proposal: &PairProposal, created_at: u64) -> Option<Self> {
        let mut ids = proposal.member_ids().into_iter();
        let subject_id = ids.next()?;
        Some(Self {
            id: AssignmentId::new(),
            kind: AssignmentKind::Peer,
            subject_id,
            counterpart_id: ids.next(),
            room_number: Some(proposal.room_number),
            score: proposal.score,
            factors: proposal.factors.clone(),
            label: proposal.label,
            effectiveness_rating: None,
            notes: None,
            status: AssignmentStatus::Active,
            created_at,
        })
    }

    /// Build an active supervisor assignment from a scored suggestion
    pub fn from_suggestion(supervisee: PersonId, suggestion: &SupervisorSuggestion, created_at: u64) -> Self {
        Self {
            id: AssignmentId::new(),
            kind: AssignmentKind::Supervisor,
            subject_id: supervisee,
            counterpart_id: Some(suggestion.supervisor.id()),
            room_number: None,
            score: Some(suggestion.score),
            factors: suggestion.factors.clone(),
            label: suggestion.label,
            effectiveness_rating: None,
            notes: None,
            status: AssignmentStatus::Active,
            created_at,
        }
    }

    /// Whether the assignment is still in effect
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }

    /// Everyone on either side of this assignment; one id for a single room
    pub fn occupants(&self) -> impl Iterator<Item = PersonId> {
        std::iter::once(self.subject_id).chain(self.counterpart_id)
    }
}
