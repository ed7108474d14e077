//! Billet Storage Layer
//!
//! Implements the roster and assignment traits from `billet-domain` on SQLite.
//!
//! # Architecture
//!
//! - `people` holds every roster member, staff included
//! - `supervisors` adds experience and role to staff rows
//! - `assignments` holds peer rooms and supervisions; supervisor workload
//!   and average effectiveness are derived from it on read
//!
//! # Examples
//!
//! ```no_run
//! use billet_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for roster and assignment operations
//! ```

#![warn(missing_docs)]

use billet_domain::traits::{
    AssignmentQuery, AssignmentStore, CohortQuery, RosterSource, RosterWriter, SupervisorQuery,
};
use billet_domain::{
    Assignment, AssignmentId, AssignmentKind, AssignmentStatus, BehaviorScore, BirthDate,
    EffectivenessRating, ExamStatus, Person, PersonId, RecommendationLabel, StaffRole, Supervisor,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

const PERSON_COLUMNS: &str = "p.id, p.name, p.birth_date, p.age, p.group_tag, p.behavior_score, p.exam_status";

const ASSIGNMENT_COLUMNS: &str = "id, kind, subject_id, counterpart_id, room_number, score, factors, label,
     effectiveness_rating, notes, status, created_at";

/// Supervisor rows with workload and effectiveness derived from assignments.
/// Person columns come first, so `row_to_person` reads indices 0..=6.
const SUPERVISOR_SELECT: &str = "SELECT * FROM (
     SELECT p.id, p.name, p.birth_date, p.age, p.group_tag, p.behavior_score, p.exam_status,
            s.experience_years, s.role,
            (SELECT COUNT(*) FROM assignments a
              WHERE a.kind = 'supervisor' AND a.status = 'active' AND a.counterpart_id = p.id) AS current_load,
            (SELECT AVG(a.effectiveness_rating) FROM assignments a
              WHERE a.kind = 'supervisor' AND a.counterpart_id = p.id
                AND a.effectiveness_rating IS NOT NULL) AS effectiveness
       FROM supervisors s JOIN people p ON p.id = s.person_id
   ) WHERE 1=1";

/// SQLite-based implementation of the roster and assignment traits
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// SqliteStore instance, or callers must serialize access.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use billet_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("billet.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert AssignmentId to bytes for storage
    fn assignment_id_to_bytes(id: AssignmentId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to AssignmentId
    fn bytes_to_assignment_id(bytes: &[u8]) -> Result<AssignmentId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for AssignmentId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(AssignmentId::from_value(u128::from_be_bytes(arr)))
    }

    fn person_id_to_sql(id: PersonId) -> i64 {
        id.value() as i64
    }

    fn sql_to_person_id(value: i64) -> PersonId {
        PersonId::new(value as u64)
    }
}

/// Wrap a decoding failure so it surfaces through rusqlite's row mapping
fn conversion_error<E>(column: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(err))
}

fn invalid(column: usize, ty: Type, message: String) -> rusqlite::Error {
    conversion_error(column, ty, StoreError::InvalidData(message))
}

fn row_to_person(row: &Row<'_>) -> rusqlite::Result<Person> {
    let birth_date = row
        .get::<_, Option<String>>(2)?
        .map(|s| BirthDate::parse(&s).map_err(|e| conversion_error(2, Type::Text, e)))
        .transpose()?;
    let behavior_score = BehaviorScore::new(row.get(5)?)
        .map_err(|e| conversion_error(5, Type::Integer, e))?;
    let exam_status = row
        .get::<_, Option<String>>(6)?
        .map(|s| s.parse::<ExamStatus>().map_err(|e| conversion_error(6, Type::Text, e)))
        .transpose()?;

    Ok(Person {
        id: SqliteStore::sql_to_person_id(row.get(0)?),
        name: row.get(1)?,
        birth_date,
        age: row.get::<_, Option<i64>>(3)?.map(|a| a as u32),
        group_tag: row.get(4)?,
        behavior_score,
        exam_status,
    })
}

fn row_to_supervisor(row: &Row<'_>) -> rusqlite::Result<Supervisor> {
    let person = row_to_person(row)?;
    let role = row
        .get::<_, String>(8)?
        .parse::<StaffRole>()
        .map_err(|e| conversion_error(8, Type::Text, e))?;
    let load: i64 = row.get(9)?;
    let effectiveness: Option<f64> = row.get(10)?;

    let supervisor = Supervisor::new(person, row.get(7)?, role)
        .map_err(|e| conversion_error(7, Type::Real, e))?
        .with_load(load as u32);

    match effectiveness {
        Some(avg) => supervisor
            .with_effectiveness(avg)
            .map_err(|e| conversion_error(10, Type::Real, e)),
        None => Ok(supervisor),
    }
}

fn row_to_assignment(row: &Row<'_>) -> rusqlite::Result<Assignment> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let id = SqliteStore::bytes_to_assignment_id(&id_bytes)
        .map_err(|e| conversion_error(0, Type::Blob, e))?;

    let kind_str: String = row.get(1)?;
    let kind = AssignmentKind::parse(&kind_str)
        .ok_or_else(|| invalid(1, Type::Text, format!("Unknown assignment kind: {}", kind_str)))?;

    let factors_json: String = row.get(6)?;
    let factors: Vec<String> = serde_json::from_str(&factors_json)
        .map_err(|e| conversion_error(6, Type::Text, e))?;

    let label_str: String = row.get(7)?;
    let label = RecommendationLabel::parse(&label_str)
        .ok_or_else(|| invalid(7, Type::Text, format!("Unknown label: {}", label_str)))?;

    let effectiveness_rating = row
        .get::<_, Option<i64>>(8)?
        .map(|r| EffectivenessRating::new(r).map_err(|e| conversion_error(8, Type::Integer, e)))
        .transpose()?;

    let status_str: String = row.get(10)?;
    let status = AssignmentStatus::parse(&status_str)
        .ok_or_else(|| invalid(10, Type::Text, format!("Unknown status: {}", status_str)))?;

    Ok(Assignment {
        id,
        kind,
        subject_id: SqliteStore::sql_to_person_id(row.get(2)?),
        counterpart_id: row.get::<_, Option<i64>>(3)?.map(SqliteStore::sql_to_person_id),
        room_number: row.get::<_, Option<i64>>(4)?.map(|r| r as u32),
        score: row.get(5)?,
        factors,
        label,
        effectiveness_rating,
        notes: row.get(9)?,
        status,
        created_at: row.get::<_, i64>(11)? as u64,
    })
}

fn upsert_person_row(conn: &Connection, person: &Person) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO people (id, name, birth_date, age, group_tag, behavior_score, exam_status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
         name = excluded.name, birth_date = excluded.birth_date, age = excluded.age,
         group_tag = excluded.group_tag, behavior_score = excluded.behavior_score,
         exam_status = excluded.exam_status",
        params![
            SqliteStore::person_id_to_sql(person.id),
            &person.name,
            person.birth_date.map(|d| d.to_string()),
            person.age.map(|a| a as i64),
            &person.group_tag,
            person.behavior_score.value() as i64,
            person.exam_status.map(|s| s.as_str()),
        ],
    )?;
    Ok(())
}

fn insert_assignment(conn: &Connection, assignment: &Assignment) -> Result<(), StoreError> {
    let factors = serde_json::to_string(&assignment.factors)
        .map_err(|e| StoreError::InvalidData(e.to_string()))?;

    conn.execute(
        "INSERT INTO assignments (id, kind, subject_id, counterpart_id, room_number, score, factors, label,
                                  effectiveness_rating, notes, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            SqliteStore::assignment_id_to_bytes(assignment.id),
            assignment.kind.as_str(),
            SqliteStore::person_id_to_sql(assignment.subject_id),
            assignment.counterpart_id.map(SqliteStore::person_id_to_sql),
            assignment.room_number.map(|r| r as i64),
            assignment.score,
            factors,
            assignment.label.as_str(),
            assignment.effectiveness_rating.map(|r| r.value() as i64),
            &assignment.notes,
            assignment.status.as_str(),
            assignment.created_at as i64,
        ],
    )?;

    Ok(())
}

impl RosterSource for SqliteStore {
    type Error = StoreError;

    fn get_person(&self, id: PersonId) -> Result<Option<Person>, Self::Error> {
        let sql = format!("SELECT {} FROM people p WHERE p.id = ?1", PERSON_COLUMNS);
        let person = self
            .conn
            .query_row(&sql, params![Self::person_id_to_sql(id)], row_to_person)
            .optional()?;
        Ok(person)
    }

    fn list_people(&self, query: &CohortQuery) -> Result<Vec<Person>, Self::Error> {
        let mut sql = format!(
            "SELECT {} FROM people p
             WHERE p.id NOT IN (SELECT person_id FROM supervisors)",
            PERSON_COLUMNS
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(tag) = &query.group_tag {
            sql.push_str(" AND p.group_tag = ?");
            params.push(Box::new(tag.clone()));
        }

        sql.push_str(" ORDER BY p.id");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let people = stmt
            .query_map(&param_refs[..], row_to_person)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(people)
    }

    fn get_supervisor(&self, id: PersonId) -> Result<Option<Supervisor>, Self::Error> {
        let sql = format!("{} AND id = ?1", SUPERVISOR_SELECT);
        let supervisor = self
            .conn
            .query_row(&sql, params![Self::person_id_to_sql(id)], row_to_supervisor)
            .optional()?;
        Ok(supervisor)
    }

    fn list_supervisors(&self, query: &SupervisorQuery) -> Result<Vec<Supervisor>, Self::Error> {
        let mut sql = String::from(SUPERVISOR_SELECT);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(role) = query.role {
            sql.push_str(" AND role = ?");
            params.push(Box::new(role.as_str()));
        }

        if let Some(max_load) = query.max_load {
            sql.push_str(" AND current_load <= ?");
            params.push(Box::new(max_load as i64));
        }

        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let supervisors = stmt
            .query_map(&param_refs[..], row_to_supervisor)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(supervisors)
    }
}

impl RosterWriter for SqliteStore {
    type Error = StoreError;

    fn upsert_person(&mut self, person: &Person) -> Result<(), Self::Error> {
        upsert_person_row(&self.conn, person)
    }

    fn upsert_supervisor(&mut self, supervisor: &Supervisor) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;
        upsert_person_row(&tx, &supervisor.person)?;
        tx.execute(
            "INSERT INTO supervisors (person_id, experience_years, role)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(person_id) DO UPDATE SET
             experience_years = excluded.experience_years, role = excluded.role",
            params![
                Self::person_id_to_sql(supervisor.id()),
                supervisor.experience_years,
                supervisor.role.as_str(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }
}

impl AssignmentStore for SqliteStore {
    type Error = StoreError;

    fn replace_peer_assignments(&mut self, assignments: &[Assignment]) -> Result<usize, Self::Error> {
        if let Some(bad) = assignments.iter().find(|a| a.kind != AssignmentKind::Peer) {
            return Err(StoreError::InvalidData(format!(
                "Assignment {} is not a peer assignment",
                bad.id
            )));
        }

        let affected: BTreeSet<i64> = assignments
            .iter()
            .flat_map(Assignment::occupants)
            .map(Self::person_id_to_sql)
            .collect();

        let tx = self.conn.transaction()?;
        {
            let mut delete = tx.prepare(
                "DELETE FROM assignments
                 WHERE kind = 'peer' AND status = 'active'
                   AND (subject_id = ?1 OR counterpart_id = ?1)",
            )?;
            for person in &affected {
                delete.execute(params![person])?;
            }
        }
        for assignment in assignments {
            insert_assignment(&tx, assignment)?;
        }
        tx.commit()?;

        Ok(assignments.len())
    }

    fn create_supervisor_assignment(&mut self, assignment: Assignment) -> Result<Assignment, Self::Error> {
        let counterpart = assignment.counterpart_id.ok_or_else(|| {
            StoreError::InvalidData("Supervisor assignment requires a supervisor".to_string())
        })?;

        let tx = self.conn.transaction()?;
        let is_staff = tx
            .query_row(
                "SELECT 1 FROM supervisors WHERE person_id = ?1",
                params![Self::person_id_to_sql(counterpart)],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !is_staff {
            return Err(StoreError::NotFound(format!("supervisor {}", counterpart)));
        }

        let existing = tx
            .query_row(
                &format!(
                    "SELECT {} FROM assignments
                     WHERE kind = 'supervisor' AND status = 'active'
                       AND subject_id = ?1 AND counterpart_id = ?2",
                    ASSIGNMENT_COLUMNS
                ),
                params![
                    Self::person_id_to_sql(assignment.subject_id),
                    Self::person_id_to_sql(counterpart)
                ],
                row_to_assignment,
            )
            .optional()?;

        if let Some(existing) = existing {
            return Ok(existing);
        }

        insert_assignment(&tx, &assignment)?;
        tx.commit()?;

        Ok(assignment)
    }

    fn get_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>, Self::Error> {
        let assignment = self
            .conn
            .query_row(
                &format!("SELECT {} FROM assignments WHERE id = ?1", ASSIGNMENT_COLUMNS),
                params![Self::assignment_id_to_bytes(id)],
                row_to_assignment,
            )
            .optional()?;
        Ok(assignment)
    }

    fn rate_assignment(
        &mut self,
        id: AssignmentId,
        rating: EffectivenessRating,
        notes: Option<String>,
    ) -> Result<bool, Self::Error> {
        let changed = self.conn.execute(
            "UPDATE assignments SET effectiveness_rating = ?1, notes = ?2 WHERE id = ?3",
            params![
                rating.value() as i64,
                notes,
                Self::assignment_id_to_bytes(id)
            ],
        )?;
        Ok(changed > 0)
    }

    fn query_assignments(&self, query: &AssignmentQuery) -> Result<Vec<Assignment>, Self::Error> {
        let mut sql = format!("SELECT {} FROM assignments WHERE 1=1", ASSIGNMENT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(person) = query.person {
            sql.push_str(" AND (subject_id = ? OR counterpart_id = ?)");
            params.push(Box::new(Self::person_id_to_sql(person)));
            params.push(Box::new(Self::person_id_to_sql(person)));
        }

        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            params.push(Box::new(kind.as_str()));
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str()));
        }

        sql.push_str(" ORDER BY room_number, created_at, id");

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let assignments = stmt
            .query_map(&param_refs[..], row_to_assignment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assignments)
    }
}
