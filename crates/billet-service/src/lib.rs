//! Billet Service
//!
//! The application layer between transports and the store.
//!
//! The service provides:
//! - Roommate and supervisor suggestions for one person
//! - Cohort room optimization and atomic application of accepted rooms
//! - Supervisor assignment creation and effectiveness ratings
//! - Roster import and per-person assignment history
//!
//! It is generic over the store ports in `billet_domain::traits`, so tests
//! and binaries can plug in any backend.

#![warn(missing_docs)]

mod config;
mod error;
mod service;

pub use config::{ServiceConfig, DEFAULT_LARGE_COHORT_WARNING};
pub use error::ServiceError;
pub use service::{
    plan_cohort, AssignmentService, CohortPlan, ImportReport, PeerSuggestions, RoomPlan,
    SupervisorAssignment, SupervisorSuggestions,
};
