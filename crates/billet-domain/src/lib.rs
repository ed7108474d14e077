//! Billet Domain Layer
//!
//! This crate contains the compatibility-based assignment engine: the pure
//! scoring and matching logic that decides who shares a room and which staff
//! member supervises whom. It performs no I/O and defines the trait interfaces
//! that persistence and transport layers implement.
//!
//! ## Key Concepts
//!
//! - **Person**: a roster entry with optional biographical data
//! - **Trait group**: one of four categories derived from a birth date
//! - **Compatibility**: a weighted, explained score in `[0, 1]` for a pair
//! - **Pair proposal**: one room of a greedy cohort partition
//! - **Supervisor suggestion**: a ranked staff candidate for one person
//! - **Assignment**: an accepted proposal, persisted by the store layer
//!
//! ## Architecture
//!
//! - Pure business logic only, every public operation is deterministic
//! - Calibration (weights, thresholds, lookup tables) is compile-time constant
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assignment;
pub mod compatibility;
pub mod pairing;
pub mod person;
pub mod profile;
pub mod ranking;
pub mod recommendation;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use assignment::{Assignment, AssignmentId, AssignmentKind, AssignmentStatus, EffectivenessRating};
pub use compatibility::{peer_score, score_peers, score_supervisor, Compatibility, CompatibilityFactor};
pub use pairing::{optimize, PairProposal, PairingSummary};
pub use person::{BehaviorScore, BirthDate, ExamStatus, Person, PersonId, StaffRole, Supervisor};
pub use profile::{Sign, TraitGroup};
pub use ranking::{rank_peers, suggest, PeerSuggestion, SupervisorSuggestion};
pub use recommendation::RecommendationLabel;
pub use validation::ValidationError;
