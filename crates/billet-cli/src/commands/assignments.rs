//! Assignments command implementation.

use super::Service;
use crate::cli::AssignmentsArgs;
use crate::error::Result;
use crate::output::Formatter;
use billet_domain::PersonId;

/// Execute the assignments command.
pub fn execute_assignments(
    args: AssignmentsArgs,
    service: &Service,
    formatter: &Formatter,
) -> Result<()> {
    let assignments = service.list_assignments(PersonId::new(args.person_id))?;
    println!("{}", formatter.format_assignments(&assignments)?);
    Ok(())
}
