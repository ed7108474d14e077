//! Assignment service: the persistence-aware operations around the scorer

use crate::{ServiceConfig, ServiceError};
use billet_domain::traits::{
    AssignmentQuery, AssignmentStore, CohortQuery, RosterSource, RosterWriter, SupervisorQuery,
};
use billet_domain::{
    optimize, rank_peers, score_supervisor, suggest, Assignment, AssignmentId, AssignmentKind,
    EffectivenessRating, PairProposal, PairingSummary, PeerSuggestion, Person, PersonId,
    RecommendationLabel, Supervisor, SupervisorSuggestion,
};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Ranked roommates for one person
#[derive(Debug, Clone)]
pub struct PeerSuggestions {
    /// The person suggestions were computed for
    pub person: Person,
    /// Candidates, best first
    pub suggestions: Vec<PeerSuggestion>,
}

/// Ranked supervisors for one person
#[derive(Debug, Clone)]
pub struct SupervisorSuggestions {
    /// The person suggestions were computed for
    pub person: Person,
    /// Candidates, best first
    pub suggestions: Vec<SupervisorSuggestion>,
}

/// A proposed room plan for a cohort
#[derive(Debug, Clone)]
pub struct CohortPlan {
    /// Rooms in formation order
    pub proposals: Vec<PairProposal>,
    /// Totals over `proposals`
    pub summary: PairingSummary,
}

/// A room accepted by the caller, identified by its occupants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPlan {
    /// Room number
    pub room_number: u32,
    /// One or two occupant ids
    pub member_ids: Vec<PersonId>,
}

impl From<&PairProposal> for RoomPlan {
    fn from(proposal: &PairProposal) -> Self {
        Self {
            room_number: proposal.room_number,
            member_ids: proposal.member_ids(),
        }
    }
}

/// Outcome of assigning a supervisor
#[derive(Debug, Clone)]
pub struct SupervisorAssignment {
    /// The active assignment for the pair
    pub assignment: Assignment,
    /// False when an existing active assignment was returned
    pub created: bool,
}

/// Counts of records written by a roster import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Roster members written
    pub people: usize,
    /// Staff members written
    pub supervisors: usize,
}

/// Application service over a roster and assignment store
///
/// All scoring happens in `billet-domain`; this layer loads records,
/// validates requests, persists accepted results and logs what it did.
/// Mutating operations take `&mut self`, so callers sharing a service
/// across tasks serialize writers behind a lock.
///
/// # Examples
///
/// ```no_run
/// use billet_service::{AssignmentService, ServiceConfig};
/// use billet_store::SqliteStore;
/// use billet_domain::PersonId;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteStore::new("billet.db")?;
/// let service = AssignmentService::new(store, ServiceConfig::default());
///
/// let result = service.get_peer_suggestions(PersonId::new(1))?;
/// println!("{} candidates", result.suggestions.len());
/// # Ok(())
/// # }
/// ```
pub struct AssignmentService<S> {
    store: S,
    config: ServiceConfig,
}

impl<S> AssignmentService<S>
where
    S: RosterSource + RosterWriter + AssignmentStore,
    <S as RosterSource>::Error: Display,
    <S as RosterWriter>::Error: Display,
    <S as AssignmentStore>::Error: Display,
{
    /// Create a service over `store`
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Get the active configuration
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get a reference to the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn person(&self, id: PersonId) -> Result<Person, ServiceError> {
        self.store
            .get_person(id)
            .map_err(ServiceError::store)?
            .ok_or_else(|| ServiceError::not_found("person", id))
    }

    fn supervisor(&self, id: PersonId) -> Result<Supervisor, ServiceError> {
        self.store
            .get_supervisor(id)
            .map_err(ServiceError::store)?
            .ok_or_else(|| ServiceError::not_found("supervisor", id))
    }

    /// Fail if replacing the rooms of `placed` would leave a current
    /// roommate outside the new plan without a room
    fn reject_split_rooms(&self, placed: &BTreeSet<PersonId>) -> Result<(), ServiceError> {
        for id in placed {
            let current = self
                .store
                .query_assignments(&AssignmentQuery {
                    person: Some(*id),
                    kind: Some(AssignmentKind::Peer),
                    ..Default::default()
                })
                .map_err(ServiceError::store)?;

            for room in current.iter().filter(|a| a.is_active()) {
                if let Some(displaced) = room.occupants().find(|o| !placed.contains(o)) {
                    return Err(ServiceError::InvalidInput(format!(
                        "room {} would be split: person {} shares it with person {} but is not in the plan",
                        room.room_number.unwrap_or_default(),
                        displaced,
                        id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rank the roster for a person's roommate candidates
    pub fn get_peer_suggestions(&self, person_id: PersonId) -> Result<PeerSuggestions, ServiceError> {
        let person = self.person(person_id)?;
        let candidates = self
            .store
            .list_people(&CohortQuery::default())
            .map_err(ServiceError::store)?;

        let suggestions = rank_peers(&person, &candidates, self.config.peer_suggestion_limit);
        tracing::debug!(
            "Ranked {} roommate candidates for person {}",
            suggestions.len(),
            person_id
        );

        Ok(PeerSuggestions { person, suggestions })
    }

    /// Propose rooms for the cohort selected by `filter`
    ///
    /// Read-only: nothing is persisted until [`apply_pairing`](Self::apply_pairing).
    pub fn optimize_cohort(&self, filter: &CohortQuery) -> Result<CohortPlan, ServiceError> {
        let cohort = self.load_cohort(filter)?;
        Ok(plan_cohort(&cohort, &self.config))
    }

    /// Roster members selected by `filter`, staff excluded
    ///
    /// Callers that must not hold the service while optimizing load the
    /// cohort here and hand it to [`plan_cohort`].
    pub fn load_cohort(&self, filter: &CohortQuery) -> Result<Vec<Person>, ServiceError> {
        self.store.list_people(filter).map_err(ServiceError::store)
    }

    /// Persist accepted rooms as the active peer assignments of their occupants
    ///
    /// Occupants are reloaded and each room is rescored, so stored scores
    /// always reflect current records. Any earlier active peer assignment
    /// touching an occupant is replaced in the same transaction. Applying
    /// the same plan twice leaves the same set of rooms.
    ///
    /// The whole request is rejected before anything is written if it
    /// places a staff member, or if it would break up an existing room
    /// whose other occupant is not placed by the request.
    ///
    /// Returns the number of rooms written.
    pub fn apply_pairing(&mut self, rooms: &[RoomPlan]) -> Result<usize, ServiceError> {
        let mut seen_people = BTreeSet::new();
        let mut seen_rooms = BTreeSet::new();

        for room in rooms {
            if room.member_ids.is_empty() || room.member_ids.len() > 2 {
                return Err(ServiceError::InvalidInput(format!(
                    "room {} must have one or two occupants, got {}",
                    room.room_number,
                    room.member_ids.len()
                )));
            }
            if !seen_rooms.insert(room.room_number) {
                return Err(ServiceError::InvalidInput(format!(
                    "room {} appears more than once",
                    room.room_number
                )));
            }
            for id in &room.member_ids {
                if !seen_people.insert(*id) {
                    return Err(ServiceError::InvalidInput(format!(
                        "person {} appears in more than one room",
                        id
                    )));
                }
            }
        }

        for id in &seen_people {
            if self.store.get_supervisor(*id).map_err(ServiceError::store)?.is_some() {
                return Err(ServiceError::InvalidInput(format!(
                    "person {} is staff and cannot be placed in a room",
                    id
                )));
            }
        }
        self.reject_split_rooms(&seen_people)?;

        let created_at = current_timestamp();
        let mut assignments = Vec::with_capacity(rooms.len());
        for room in rooms {
            let members = room
                .member_ids
                .iter()
                .map(|id| self.person(*id))
                .collect::<Result<Vec<_>, _>>()?;

            let proposal = PairProposal::for_room(room.room_number, members).ok_or_else(|| {
                ServiceError::InvalidInput(format!("room {} is malformed", room.room_number))
            })?;

            if proposal.requires_supervision() {
                tracing::warn!(
                    "Room {} applied with low compatibility ({:.2})",
                    proposal.room_number,
                    proposal.score.unwrap_or_default()
                );
            }

            if let Some(assignment) = Assignment::from_proposal(&proposal, created_at) {
                assignments.push(assignment);
            }
        }

        let written = self
            .store
            .replace_peer_assignments(&assignments)
            .map_err(ServiceError::store)?;
        tracing::info!(
            "Applied {} rooms covering {} people",
            written,
            seen_people.len()
        );

        Ok(written)
    }

    /// Rank the supervisor pool selected by `pool` for one person
    ///
    /// `top_k` overrides the configured limit when given.
    pub fn get_supervisor_suggestions(
        &self,
        person_id: PersonId,
        pool: &SupervisorQuery,
        top_k: Option<usize>,
    ) -> Result<SupervisorSuggestions, ServiceError> {
        let person = self.person(person_id)?;
        let supervisors = self
            .store
            .list_supervisors(pool)
            .map_err(ServiceError::store)?;

        let top_k = top_k.unwrap_or(self.config.supervisor_suggestion_limit);
        let suggestions = suggest(&person, &supervisors, top_k);
        tracing::debug!(
            "Ranked {} of {} supervisors for person {}",
            suggestions.len(),
            supervisors.len(),
            person_id
        );

        Ok(SupervisorSuggestions { person, suggestions })
    }

    /// Assign a supervisor to a person
    ///
    /// The pair is scored at creation time. If the pair already has an
    /// active assignment, that assignment is returned with `created` unset.
    pub fn create_supervisor_assignment(
        &mut self,
        person_id: PersonId,
        supervisor_id: PersonId,
    ) -> Result<SupervisorAssignment, ServiceError> {
        if person_id == supervisor_id {
            return Err(ServiceError::InvalidInput(format!(
                "person {} cannot supervise themselves",
                person_id
            )));
        }

        let person = self.person(person_id)?;
        let supervisor = self.supervisor(supervisor_id)?;

        let compatibility = score_supervisor(&person, &supervisor);
        let suggestion = SupervisorSuggestion {
            label: RecommendationLabel::for_supervisor(compatibility.score),
            score: compatibility.score,
            factors: compatibility.explanations(),
            supervisor,
        };

        let assignment = Assignment::from_suggestion(person_id, &suggestion, current_timestamp());
        let proposed_id = assignment.id;
        let stored = self
            .store
            .create_supervisor_assignment(assignment)
            .map_err(ServiceError::store)?;
        let created = stored.id == proposed_id;

        if created {
            tracing::info!(
                "Supervisor {} assigned to person {} (assignment {}, score {:.2})",
                supervisor_id,
                person_id,
                stored.id,
                stored.score.unwrap_or_default()
            );
        } else {
            tracing::debug!(
                "Supervisor {} already assigned to person {} (assignment {})",
                supervisor_id,
                person_id,
                stored.id
            );
        }

        Ok(SupervisorAssignment {
            assignment: stored,
            created,
        })
    }

    /// Record effectiveness feedback on a supervisor assignment
    ///
    /// Only the rating and notes change; score, factors and label keep
    /// their assignment-time values.
    pub fn rate_supervisor_assignment(
        &mut self,
        assignment_id: AssignmentId,
        rating: i64,
        notes: Option<String>,
    ) -> Result<(), ServiceError> {
        let rating = EffectivenessRating::new(rating)?;

        let assignment = self
            .store
            .get_assignment(assignment_id)
            .map_err(ServiceError::store)?
            .ok_or_else(|| ServiceError::not_found("assignment", assignment_id))?;

        if assignment.kind != AssignmentKind::Supervisor {
            return Err(ServiceError::InvalidInput(format!(
                "assignment {} is a {} assignment; only supervisor assignments can be rated",
                assignment_id,
                assignment.kind.as_str()
            )));
        }

        let updated = self
            .store
            .rate_assignment(assignment_id, rating, notes)
            .map_err(ServiceError::store)?;
        if !updated {
            return Err(ServiceError::not_found("assignment", assignment_id));
        }

        tracing::info!("Assignment {} rated {}", assignment_id, rating.value());
        Ok(())
    }

    /// List every assignment touching a person, on either side
    pub fn list_assignments(&self, person_id: PersonId) -> Result<Vec<Assignment>, ServiceError> {
        self.person(person_id)?;
        self.store
            .query_assignments(&AssignmentQuery {
                person: Some(person_id),
                ..Default::default()
            })
            .map_err(ServiceError::store)
    }

    /// Insert or replace roster and staff records
    ///
    /// Records are validated by construction, so this only rejects an id
    /// repeated within one list.
    pub fn import_roster(
        &mut self,
        people: &[Person],
        supervisors: &[Supervisor],
    ) -> Result<ImportReport, ServiceError> {
        reject_repeated_ids("person", people.iter().map(|p| p.id))?;
        reject_repeated_ids("supervisor", supervisors.iter().map(|s| s.id()))?;

        for person in people {
            self.store.upsert_person(person).map_err(ServiceError::store)?;
        }
        for supervisor in supervisors {
            self.store
                .upsert_supervisor(supervisor)
                .map_err(ServiceError::store)?;
        }

        let report = ImportReport {
            people: people.len(),
            supervisors: supervisors.len(),
        };
        tracing::info!(
            "Imported {} people and {} supervisors",
            report.people,
            report.supervisors
        );

        Ok(report)
    }
}

/// Propose rooms for an already loaded cohort
///
/// Pure apart from logging; the greedy optimizer is cubic in the cohort
/// size, so async callers run this on a blocking thread.
pub fn plan_cohort(cohort: &[Person], config: &ServiceConfig) -> CohortPlan {
    if cohort.len() > config.large_cohort_warning {
        tracing::warn!(
            "Cohort of {} people exceeds {}; consider running optimization in the background",
            cohort.len(),
            config.large_cohort_warning
        );
    }

    let proposals = optimize(cohort);
    let summary = PairingSummary::from_proposals(&proposals);
    tracing::info!(
        "Optimized cohort of {} into {} rooms (average score {:.2})",
        cohort.len(),
        summary.total_rooms,
        summary.average_score
    );

    CohortPlan { proposals, summary }
}

fn reject_repeated_ids(
    entity: &str,
    ids: impl Iterator<Item = PersonId>,
) -> Result<(), ServiceError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ServiceError::InvalidInput(format!(
                "{} {} listed more than once",
                entity, id
            )));
        }
    }
    Ok(())
}
