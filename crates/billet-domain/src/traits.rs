//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the assignment engine and the
//! records system around it. Infrastructure implementations live in other
//! crates (billet-store).

use crate::{
    Assignment, AssignmentId, AssignmentKind, AssignmentStatus, EffectivenessRating, Person,
    PersonId, StaffRole, Supervisor,
};

/// Read access to roster and staff records
pub trait RosterSource {
    /// Error type for roster operations
    type Error;

    /// Get a roster member by ID
    fn get_person(&self, id: PersonId) -> Result<Option<Person>, Self::Error>;

    /// List roster members matching a cohort filter, in roster order
    fn list_people(&self, query: &CohortQuery) -> Result<Vec<Person>, Self::Error>;

    /// Get a staff member by ID, with current load and effectiveness filled in
    fn get_supervisor(&self, id: PersonId) -> Result<Option<Supervisor>, Self::Error>;

    /// List staff members matching a pool filter, in roster order
    fn list_supervisors(&self, query: &SupervisorQuery) -> Result<Vec<Supervisor>, Self::Error>;
}

/// Write access to roster and staff records (used for imports)
pub trait RosterWriter {
    /// Error type for roster operations
    type Error;

    /// Insert or replace a roster member
    fn upsert_person(&mut self, person: &Person) -> Result<(), Self::Error>;

    /// Insert or replace a staff member
    ///
    /// Load and effectiveness are derived from assignments, not stored.
    fn upsert_supervisor(&mut self, supervisor: &Supervisor) -> Result<(), Self::Error>;
}

/// Persistence for accepted assignments
pub trait AssignmentStore {
    /// Error type for store operations
    type Error;

    /// Replace the active peer assignments of everyone named in `assignments`
    ///
    /// Atomic: either every prior active peer assignment touching those
    /// people is removed and the new set inserted, or nothing changes.
    /// Returns the number of assignments written.
    fn replace_peer_assignments(&mut self, assignments: &[Assignment]) -> Result<usize, Self::Error>;

    /// Record a supervisor assignment
    ///
    /// If an active assignment already links the same supervisee and
    /// supervisor, that record is returned unchanged instead.
    fn create_supervisor_assignment(&mut self, assignment: Assignment) -> Result<Assignment, Self::Error>;

    /// Get an assignment by ID
    fn get_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, Self::Error>;

    /// Set the effectiveness rating and notes of an assignment
    ///
    /// Returns `false` if no assignment has this ID.
    fn rate_assignment(
        &mut self,
        id: AssignmentId,
        rating: EffectivenessRating,
        notes: Option<String>,
    ) -> Result<bool, Self::Error>;

    /// Query assignments matching criteria
    fn query_assignments(&self, query: &AssignmentQuery) -> Result<Vec<Assignment>, Self::Error>;
}

/// Filter for selecting a cohort
#[derive(Debug, Clone, Default)]
pub struct CohortQuery {
    /// Only members with this group tag
    pub group_tag: Option<String>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

/// Filter for selecting a supervisor pool
#[derive(Debug, Clone, Default)]
pub struct SupervisorQuery {
    /// Only staff with this role
    pub role: Option<StaffRole>,

    /// Only staff whose current load is at most this value
    pub max_load: Option<u32>,
}

/// Query criteria for retrieving assignments
#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    /// Only assignments involving this person (either side)
    pub person: Option<PersonId>,

    /// Filter by kind
    pub kind: Option<AssignmentKind>,

    /// Filter by status
    pub status: Option<AssignmentStatus>,
}
