//! Import command implementation.

use super::{read_input, Service};
use crate::cli::ImportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use billet_domain::{BehaviorScore, BirthDate, ExamStatus, Person, PersonId, StaffRole, Supervisor};
use serde::Deserialize;

/// Execute the import command.
pub fn execute_import(args: ImportArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let json_data = read_input(args.file.as_deref(), args.stdin)?;
    let (people, supervisors) = parse_roster(&json_data)?;

    if people.is_empty() && supervisors.is_empty() {
        return Err(CliError::InvalidInput("No records provided".to_string()));
    }

    let report = service.import_roster(&people, &supervisors)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Imported {} people and {} supervisors",
            report.people, report.supervisors
        ))
    );

    Ok(())
}

/// Roster file layout.
#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    people: Vec<PersonRecord>,
    #[serde(default)]
    supervisors: Vec<SupervisorRecord>,
}

#[derive(Debug, Deserialize)]
struct PersonRecord {
    id: u64,
    name: String,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    group_tag: Option<String>,
    #[serde(default = "default_behavior_score")]
    behavior_score: i64,
    #[serde(default)]
    exam_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SupervisorRecord {
    #[serde(flatten)]
    person: PersonRecord,
    experience_years: f64,
    role: String,
}

fn default_behavior_score() -> i64 {
    3
}

impl PersonRecord {
    fn to_person(self) -> Result<Person> {
        let mut person = Person::new(
            PersonId::new(self.id),
            self.name,
            BehaviorScore::new(self.behavior_score)?,
        );
        if let Some(date) = self.birth_date {
            person = person.with_birth_date(BirthDate::parse(&date)?);
        }
        if let Some(age) = self.age {
            person = person.with_age(age);
        }
        if let Some(tag) = self.group_tag {
            person = person.with_group_tag(tag);
        }
        if let Some(status) = self.exam_status {
            person = person.with_exam_status(status.parse::<ExamStatus>()?);
        }
        Ok(person)
    }
}

impl SupervisorRecord {
    fn to_supervisor(self) -> Result<Supervisor> {
        let role = self.role.parse::<StaffRole>()?;
        let person = self.person.to_person()?;
        Ok(Supervisor::new(person, self.experience_years, role)?)
    }
}

/// Parse and validate a roster document.
fn parse_roster(json: &str) -> Result<(Vec<Person>, Vec<Supervisor>)> {
    let file: RosterFile = serde_json::from_str(json)?;

    let people = file
        .people
        .into_iter()
        .map(PersonRecord::to_person)
        .collect::<Result<Vec<_>>>()?;
    let supervisors = file
        .supervisors
        .into_iter()
        .map(SupervisorRecord::to_supervisor)
        .collect::<Result<Vec<_>>>()?;

    Ok((people, supervisors))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster() {
        let json = r#"
        {
            "people": [
                {"id": 1, "name": "Avery", "birth_date": "2008-03-21", "age": 16,
                 "group_tag": "Alpha", "behavior_score": 2, "exam_status": "in_progress"},
                {"id": 2, "name": "Blake"}
            ],
            "supervisors": [
                {"id": 100, "name": "Morgan", "experience_years": 6.5, "role": "mentor"}
            ]
        }
        "#;

        let (people, supervisors) = parse_roster(json).unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].birth_date, Some(BirthDate::new(2008, 3, 21).unwrap()));
        assert_eq!(people[0].exam_status, Some(ExamStatus::InProgress));
        assert_eq!(people[1].behavior_score, BehaviorScore::default());
        assert_eq!(supervisors[0].role, StaffRole::Mentor);
        assert_eq!(supervisors[0].experience_years, 6.5);
    }

    #[test]
    fn test_rejects_out_of_range_behavior() {
        let json = r#"{"people": [{"id": 1, "name": "Avery", "behavior_score": 7}]}"#;
        assert!(matches!(parse_roster(json), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_impossible_date() {
        let json = r#"{"people": [{"id": 1, "name": "Avery", "birth_date": "2007-02-29"}]}"#;
        assert!(matches!(parse_roster(json), Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_negative_experience() {
        let json = r#"{"supervisors": [{"id": 9, "name": "Sam", "experience_years": -1, "role": "mentor"}]}"#;
        assert!(matches!(parse_roster(json), Err(CliError::InvalidInput(_))));
    }
}
