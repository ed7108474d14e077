//! Person module - roster entries as seen by the assignment engine

use crate::profile::{self, TraitGroup};
use crate::ValidationError;
use chrono::NaiveDate;
use std::fmt;

/// Roster identifier for a person or staff member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonId(u64);

impl PersonId {
    /// Create an identifier from the roster's numeric key
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar date of birth
///
/// Only month and day feed the trait profile; the year is kept so the
/// value round-trips through storage unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    /// Storage and wire format
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Create a birth date, rejecting days that do not exist
    ///
    /// # Examples
    ///
    /// ```
    /// use billet_domain::BirthDate;
    ///
    /// assert!(BirthDate::new(2004, 2, 29).is_ok());
    /// assert!(BirthDate::new(2005, 2, 29).is_err());
    /// ```
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| ValidationError::Date(format!("{:04}-{:02}-{:02}", year, month, day)))
    }

    /// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
    ///
    /// # Examples
    ///
    /// ```
    /// use billet_domain::BirthDate;
    ///
    /// let date = BirthDate::parse("2006-07-23").unwrap();
    /// assert_eq!(date.to_string(), "2006-07-23");
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(s.trim(), Self::FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::Date(s.to_string()))
    }

    /// The underlying calendar date
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for BirthDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

/// Behavior score on a 1-5 scale
///
/// Higher values mean higher risk. This polarity is applied uniformly by
/// every scoring factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BehaviorScore(u8);

impl BehaviorScore {
    /// Lowest (least concerning) score
    pub const MIN: u8 = 1;
    /// Highest (most concerning) score
    pub const MAX: u8 = 5;

    /// Create a behavior score
    ///
    /// # Errors
    /// Returns error if the value is outside 1..=5
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::BehaviorScore(value))
        }
    }

    /// Get the raw value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Scores of 4 and 5 are treated as high risk
    pub fn is_high_risk(&self) -> bool {
        self.0 >= 4
    }

    /// Scores of 1 and 2 are treated as low risk
    pub fn is_low_risk(&self) -> bool {
        self.0 <= 2
    }

    /// Absolute difference between two scores
    pub fn distance(&self, other: BehaviorScore) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl Default for BehaviorScore {
    fn default() -> Self {
        Self(3)
    }
}

/// Exam-readiness status of a roster member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExamStatus {
    /// Preparation has not begun
    NotStarted,
    /// Preparation under way
    InProgress,
    /// Exam passed
    Completed,
}

impl ExamStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamStatus::NotStarted => "not_started",
            ExamStatus::InProgress => "in_progress",
            ExamStatus::Completed => "completed",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "not_started" => Some(ExamStatus::NotStarted),
            "in_progress" => Some(ExamStatus::InProgress),
            "completed" => Some(ExamStatus::Completed),
            _ => None,
        }
    }
}

impl std::str::FromStr for ExamStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::UnknownLabel {
            field: "exam status",
            value: s.to_string(),
        })
    }
}

/// A roster member
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    /// Roster identifier
    pub id: PersonId,

    /// Display name
    pub name: String,

    /// Date of birth, if on file
    pub birth_date: Option<BirthDate>,

    /// Age in years, if on file
    pub age: Option<u32>,

    /// Platoon or cohort tag
    pub group_tag: Option<String>,

    /// Behavior score (high = high risk)
    pub behavior_score: BehaviorScore,

    /// Exam-readiness status, if tracked
    pub exam_status: Option<ExamStatus>,
}

impl Person {
    /// Create a person with only the mandatory fields
    pub fn new(id: PersonId, name: impl Into<String>, behavior_score: BehaviorScore) -> Self {
        Self {
            id,
            name: name.into(),
            birth_date: None,
            age: None,
            group_tag: None,
            behavior_score,
            exam_status: None,
        }
    }

    /// Attach a birth date
    pub fn with_birth_date(mut self, birth_date: BirthDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Attach an age
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Attach a platoon or cohort tag
    pub fn with_group_tag(mut self, tag: impl Into<String>) -> Self {
        self.group_tag = Some(tag.into());
        self
    }

    /// Attach an exam-readiness status
    pub fn with_exam_status(mut self, status: ExamStatus) -> Self {
        self.exam_status = Some(status);
        self
    }

    /// Derived trait group; `None` when no birth date is on file
    pub fn trait_group(&self) -> Option<TraitGroup> {
        profile::derive_trait_group(self.birth_date)
    }
}

/// Staff role of a supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffRole {
    /// Dedicated mentor
    Mentor,
    /// Counselor
    Counselor,
    /// Classroom instructor
    Instructor,
    /// Administrative staff
    Administrator,
    /// Any other staff role
    Other,
}

impl StaffRole {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Mentor => "mentor",
            StaffRole::Counselor => "counselor",
            StaffRole::Instructor => "instructor",
            StaffRole::Administrator => "administrator",
            StaffRole::Other => "other",
        }
    }

    /// Parse a role from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mentor" => Some(StaffRole::Mentor),
            "counselor" => Some(StaffRole::Counselor),
            "instructor" => Some(StaffRole::Instructor),
            "administrator" => Some(StaffRole::Administrator),
            "other" => Some(StaffRole::Other),
            _ => None,
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::UnknownLabel {
            field: "role",
            value: s.to_string(),
        })
    }
}

/// A staff member who can supervise roster members
#[derive(Debug, Clone, PartialEq)]
pub struct Supervisor {
    /// Biographical data (the trait group comes from here)
    pub person: Person,

    /// Years of experience, never negative
    pub experience_years: f64,

    /// Staff role
    pub role: StaffRole,

    /// Number of active supervisor assignments
    pub current_load: u32,

    /// Mean effectiveness rating (1-5)
    pub average_effectiveness: f64,
}

impl Supervisor {
    /// Effectiveness assumed when no ratings exist
    pub const DEFAULT_EFFECTIVENESS: f64 = 3.0;

    /// Create a supervisor with no load and default effectiveness
    ///
    /// # Errors
    /// Returns error if `experience_years` is negative or not finite
    pub fn new(person: Person, experience_years: f64, role: StaffRole) -> Result<Self, ValidationError> {
        if !experience_years.is_finite() || experience_years < 0.0 {
            return Err(ValidationError::ExperienceYears(experience_years));
        }
        Ok(Self {
            person,
            experience_years,
            role,
            current_load: 0,
            average_effectiveness: Self::DEFAULT_EFFECTIVENESS,
        })
    }

    /// Set the current workload
    pub fn with_load(mut self, current_load: u32) -> Self {
        self.current_load = current_load;
        self
    }

    /// Set the average effectiveness, rejecting values outside 1-5
    pub fn with_effectiveness(mut self, average: f64) -> Result<Self, ValidationError> {
        if !(1.0..=5.0).contains(&average) {
            return Err(ValidationError::AverageEffectiveness(average));
        }
        self.average_effectiveness = average;
        Ok(self)
    }

    /// Roster identifier
    pub fn id(&self) -> PersonId {
        self.person.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_score_range() {
        assert!(BehaviorScore::new(0).is_err());
        assert!(BehaviorScore::new(6).is_err());
        assert!(BehaviorScore::new(-1).is_err());
        for v in 1..=5 {
            assert_eq!(BehaviorScore::new(v).unwrap().value() as i64, v);
        }
    }

    #[test]
    fn test_behavior_risk_bands() {
        let low = BehaviorScore::new(2).unwrap();
        let mid = BehaviorScore::new(3).unwrap();
        let high = BehaviorScore::new(4).unwrap();

        assert!(low.is_low_risk() && !low.is_high_risk());
        assert!(!mid.is_low_risk() && !mid.is_high_risk());
        assert!(high.is_high_risk());
        assert_eq!(low.distance(high), 2);
        assert_eq!(high.distance(low), 2);
    }

    #[test]
    fn test_birth_date_validation() {
        assert!(BirthDate::new(2000, 2, 29).is_ok());
        assert!(BirthDate::new(1900, 2, 29).is_err());
        assert!(BirthDate::new(2001, 4, 31).is_err());
        assert!(BirthDate::new(2001, 13, 1).is_err());
        assert!(BirthDate::new(2001, 1, 0).is_err());
    }

    #[test]
    fn test_birth_date_parse() {
        let date = BirthDate::parse(" 2007-12-22 ").unwrap();
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2007, 12, 22).unwrap());
        assert_eq!(date.to_string(), "2007-12-22");
        assert!(BirthDate::parse("2007-02-29").is_err());
        assert!(BirthDate::parse("2007/12/22").is_err());
        assert!(BirthDate::parse("2007-12").is_err());
        assert!(BirthDate::parse("").is_err());
    }

    #[test]
    fn test_supervisor_rejects_negative_experience() {
        let person = Person::new(PersonId::new(9), "Staff", BehaviorScore::default());
        assert!(Supervisor::new(person.clone(), -0.5, StaffRole::Mentor).is_err());
        assert!(Supervisor::new(person.clone(), f64::NAN, StaffRole::Mentor).is_err());

        let supervisor = Supervisor::new(person, 0.0, StaffRole::Mentor).unwrap();
        assert_eq!(supervisor.current_load, 0);
        assert_eq!(supervisor.average_effectiveness, 3.0);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Counselor".parse::<StaffRole>().unwrap(), StaffRole::Counselor);
        assert!("janitor".parse::<StaffRole>().is_err());
        for role in [
            StaffRole::Mentor,
            StaffRole::Counselor,
            StaffRole::Instructor,
            StaffRole::Administrator,
            StaffRole::Other,
        ] {
            assert_eq!(StaffRole::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_trait_group_absent_without_birth_date() {
        let person = Person::new(PersonId::new(1), "Ada", BehaviorScore::default());
        assert_eq!(person.trait_group(), None);
    }
}
