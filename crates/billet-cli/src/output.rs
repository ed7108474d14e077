//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use billet_domain::{Assignment, PairProposal, Person};
use billet_service::{CohortPlan, PeerSuggestions, SupervisorSuggestions};
use colored::*;
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format ranked roommate candidates.
    pub fn format_peer_suggestions(&self, result: &PeerSuggestions) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let suggestions: Vec<Value> = result
                    .suggestions
                    .iter()
                    .map(|s| {
                        json!({
                            "candidate": person_json(&s.candidate),
                            "score": s.score,
                            "factors": s.factors,
                            "recommendation_label": s.label.as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "person": person_json(&result.person),
                    "suggestions": suggestions,
                }))?)
            }
            OutputFormat::Quiet => Ok(join_lines(
                result.suggestions.iter().map(|s| s.candidate.id.to_string()),
            )),
            OutputFormat::Table => {
                if result.suggestions.is_empty() {
                    return Ok(self.colorize("No candidates found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "ID", "Name", "Score", "Label", "Factors"]);
                for (rank, s) in result.suggestions.iter().enumerate() {
                    builder.push_record([
                        (rank + 1).to_string(),
                        s.candidate.id.to_string(),
                        s.candidate.name.clone(),
                        format!("{:.2}", s.score),
                        self.label(s.label.as_str()),
                        s.factors.join("; "),
                    ]);
                }
                Ok(format!(
                    "Roommate candidates for {} ({})\n{}",
                    result.person.name,
                    result.person.id,
                    render(builder)
                ))
            }
        }
    }

    /// Format ranked supervisor candidates.
    pub fn format_supervisor_suggestions(&self, result: &SupervisorSuggestions) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let suggestions: Vec<Value> = result
                    .suggestions
                    .iter()
                    .map(|s| {
                        json!({
                            "supervisor": {
                                "person": person_json(&s.supervisor.person),
                                "experience_years": s.supervisor.experience_years,
                                "role": s.supervisor.role.as_str(),
                                "current_load": s.supervisor.current_load,
                                "average_effectiveness": s.supervisor.average_effectiveness,
                            },
                            "score": s.score,
                            "factors": s.factors,
                            "recommendation_label": s.label.as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "person": person_json(&result.person),
                    "suggestions": suggestions,
                }))?)
            }
            OutputFormat::Quiet => Ok(join_lines(
                result.suggestions.iter().map(|s| s.supervisor.id().to_string()),
            )),
            OutputFormat::Table => {
                if result.suggestions.is_empty() {
                    return Ok(self.colorize("No supervisors available.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "ID", "Name", "Role", "Exp", "Load", "Score", "Label"]);
                for (rank, s) in result.suggestions.iter().enumerate() {
                    builder.push_record([
                        (rank + 1).to_string(),
                        s.supervisor.id().to_string(),
                        s.supervisor.person.name.clone(),
                        s.supervisor.role.as_str().to_string(),
                        format!("{:.1}", s.supervisor.experience_years),
                        s.supervisor.current_load.to_string(),
                        format!("{:.2}", s.score),
                        self.label(s.label.as_str()),
                    ]);
                }
                Ok(format!(
                    "Supervisor candidates for {} ({})\n{}",
                    result.person.name,
                    result.person.id,
                    render(builder)
                ))
            }
        }
    }

    /// Format a proposed room plan.
    ///
    /// The JSON form is accepted back by `billet apply`.
    pub fn format_plan(&self, plan: &CohortPlan) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let proposals: Vec<Value> = plan.proposals.iter().map(proposal_json).collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "proposals": proposals,
                    "total_rooms": plan.summary.total_rooms,
                    "paired_rooms": plan.summary.paired_rooms,
                    "average_score": plan.summary.average_score,
                }))?)
            }
            OutputFormat::Quiet => Ok(join_lines(plan.proposals.iter().map(|p| {
                p.member_ids()
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            }))),
            OutputFormat::Table => {
                if plan.proposals.is_empty() {
                    return Ok(self.colorize("Cohort is empty.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Room", "Occupants", "Score", "Label"]);
                for p in &plan.proposals {
                    let occupants: Vec<String> = p
                        .members
                        .iter()
                        .map(|m| format!("{} ({})", m.name, m.id))
                        .collect();
                    builder.push_record([
                        p.room_number.to_string(),
                        occupants.join(" + "),
                        p.score.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string()),
                        self.label(p.label.as_str()),
                    ]);
                }
                Ok(format!(
                    "{}\n{} rooms, {} paired, average score {:.2}",
                    render(builder),
                    plan.summary.total_rooms,
                    plan.summary.paired_rooms,
                    plan.summary.average_score
                ))
            }
        }
    }

    /// Format stored assignments.
    pub fn format_assignments(&self, assignments: &[Assignment]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let items: Vec<Value> = assignments.iter().map(assignment_json).collect();
                Ok(serde_json::to_string_pretty(&items)?)
            }
            OutputFormat::Quiet => Ok(join_lines(assignments.iter().map(|a| a.id.to_string()))),
            OutputFormat::Table => {
                if assignments.is_empty() {
                    return Ok(self.colorize("No assignments found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Kind", "Subject", "Counterpart", "Room", "Score", "Label", "Rating", "Status"]);
                for a in assignments {
                    let id = a.id.to_string();
                    builder.push_record([
                        id[..8].to_string(), // Truncate ID for readability
                        a.kind.as_str().to_string(),
                        a.subject_id.to_string(),
                        a.counterpart_id.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                        a.room_number.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
                        a.score.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string()),
                        self.label(a.label.as_str()),
                        a.effectiveness_rating
                            .map(|r| r.value().to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        a.status.as_str().to_string(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format a single assignment.
    pub fn format_assignment(&self, assignment: &Assignment) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&assignment_json(assignment))?),
            OutputFormat::Quiet => Ok(assignment.id.to_string()),
            OutputFormat::Table => {
                let mut lines = vec![self.success(&format!("Assignment {}", assignment.id))];
                if let Some(score) = assignment.score {
                    lines.push(format!("  Score: {:.2} ({})", score, self.label(assignment.label.as_str())));
                }
                for factor in &assignment.factors {
                    lines.push(format!("  - {}", factor));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Color a recommendation label by tier.
    fn label(&self, label: &str) -> String {
        let color = match label {
            "excellent" => "green",
            "good" => "cyan",
            "moderate" => "yellow",
            "not_recommended" => "red",
            _ => "",
        };
        self.colorize(label, color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn join_lines(lines: impl Iterator<Item = String>) -> String {
    lines.collect::<Vec<_>>().join("\n")
}

fn person_json(person: &Person) -> Value {
    json!({
        "id": person.id.value(),
        "name": person.name,
        "birth_date": person.birth_date.map(|d| d.to_string()),
        "age": person.age,
        "group_tag": person.group_tag,
        "behavior_score": person.behavior_score.value(),
        "exam_status": person.exam_status.map(|s| s.as_str()),
        "trait_group": person.trait_group().map(|g| g.as_str()),
    })
}

fn proposal_json(p: &PairProposal) -> Value {
    json!({
        "room_number": p.room_number,
        "member_ids": p.member_ids().iter().map(|id| id.value()).collect::<Vec<_>>(),
        "members": p.members.iter().map(|m| m.name.clone()).collect::<Vec<_>>(),
        "score": p.score,
        "factors": p.factors,
        "recommendation_label": p.label.as_str(),
    })
}

fn assignment_json(a: &Assignment) -> Value {
    json!({
        "id": a.id.to_string(),
        "kind": a.kind.as_str(),
        "subject_id": a.subject_id.value(),
        "counterpart_id": a.counterpart_id.map(|id| id.value()),
        "room_number": a.room_number,
        "score": a.score,
        "factors": a.factors,
        "recommendation_label": a.label.as_str(),
        "effectiveness_rating": a.effectiveness_rating.map(|r| r.value()),
        "notes": a.notes,
        "status": a.status.as_str(),
        "created_at": a.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use billet_domain::{optimize, BehaviorScore, PairingSummary, PersonId};

    fn create_test_plan() -> CohortPlan {
        let cohort: Vec<Person> = (1..=3)
            .map(|i| Person::new(PersonId::new(i), format!("Cadet {}", i), BehaviorScore::default()))
            .collect();
        let proposals = optimize(&cohort);
        let summary = PairingSummary::from_proposals(&proposals);
        CohortPlan { proposals, summary }
    }

    fn create_test_assignment() -> Assignment {
        let plan = create_test_plan();
        Assignment::from_proposal(&plan.proposals[0], 12345678).unwrap()
    }

    #[test]
    fn test_plan_json_round_trips_through_apply() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_plan(&create_test_plan()).unwrap();

        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total_rooms"], 2);
        assert_eq!(parsed["proposals"][0]["member_ids"], json!([1, 2]));
        assert_eq!(parsed["proposals"][1]["recommendation_label"], "single_occupancy");
        assert!(parsed["proposals"][1]["score"].is_null());
    }

    #[test]
    fn test_plan_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_plan(&create_test_plan()).unwrap();
        assert_eq!(output, "1 2\n3");
    }

    #[test]
    fn test_plan_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_plan(&create_test_plan()).unwrap();
        assert!(output.contains("Occupants"));
        assert!(output.contains("Cadet 3 (3)"));
        assert!(output.contains("2 rooms, 1 paired"));
    }

    #[test]
    fn test_assignment_formats() {
        let assignment = create_test_assignment();

        let table = Formatter::new(OutputFormat::Table, false)
            .format_assignments(&[assignment.clone()])
            .unwrap();
        assert!(table.contains("Counterpart"));
        assert!(table.contains("peer"));

        let quiet = Formatter::new(OutputFormat::Quiet, false)
            .format_assignment(&assignment)
            .unwrap();
        assert_eq!(quiet, assignment.id.to_string());

        let json = Formatter::new(OutputFormat::Json, false)
            .format_assignment(&assignment)
            .unwrap();
        assert!(json.contains("\"room_number\": 1"));
    }

    #[test]
    fn test_empty_assignments() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_assignments(&[]).unwrap();
        assert!(output.contains("No assignments found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.label("excellent"), "excellent");
    }
}
