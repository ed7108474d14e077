//! Supervisor assignment and rating commands.

use super::Service;
use crate::cli::{AssignArgs, RateArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use billet_domain::{AssignmentId, PersonId, RecommendationLabel};

/// Execute the assign command.
pub fn execute_assign(args: AssignArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let outcome = service.create_supervisor_assignment(
        PersonId::new(args.person_id),
        PersonId::new(args.supervisor_id),
    )?;
    let assignment = outcome.assignment;

    if !outcome.created {
        eprintln!(
            "{}",
            formatter.warning("Supervisor already assigned; showing the existing assignment")
        );
    }

    if assignment.label == RecommendationLabel::NotRecommended {
        eprintln!(
            "{}",
            formatter.warning("Low compatibility: consider another supervisor")
        );
    }
    println!("{}", formatter.format_assignment(&assignment)?);
    Ok(())
}

/// Execute the rate command.
pub fn execute_rate(args: RateArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let id = parse_assignment_id(&args.assignment_id)?;
    service.rate_supervisor_assignment(id, args.rating, args.notes)?;
    println!(
        "{}",
        formatter.success(&format!("Assignment {} rated {}", id, args.rating))
    );
    Ok(())
}

fn parse_assignment_id(input: &str) -> Result<AssignmentId> {
    AssignmentId::from_string(input.trim()).map_err(CliError::InvalidInput)
}
