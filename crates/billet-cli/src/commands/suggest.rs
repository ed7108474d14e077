//! Suggestion commands.

use super::Service;
use crate::cli::{SuggestPeersArgs, SuggestSupervisorsArgs};
use crate::error::Result;
use crate::output::Formatter;
use billet_domain::traits::SupervisorQuery;
use billet_domain::PersonId;

/// Execute the suggest-peers command.
pub fn execute_suggest_peers(
    args: SuggestPeersArgs,
    service: &Service,
    formatter: &Formatter,
) -> Result<()> {
    let result = service.get_peer_suggestions(PersonId::new(args.person_id))?;
    println!("{}", formatter.format_peer_suggestions(&result)?);
    Ok(())
}

/// Execute the suggest-supervisors command.
pub fn execute_suggest_supervisors(
    args: SuggestSupervisorsArgs,
    service: &Service,
    formatter: &Formatter,
) -> Result<()> {
    let pool = SupervisorQuery {
        role: args.role.map(Into::into),
        max_load: args.max_load,
    };
    let result = service.get_supervisor_suggestions(PersonId::new(args.person_id), &pool, args.top_k)?;
    println!("{}", formatter.format_supervisor_suggestions(&result)?);
    Ok(())
}
