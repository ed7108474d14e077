//! Cohort optimization and apply commands.

use super::{read_input, Service};
use crate::cli::{ApplyArgs, OptimizeArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use billet_domain::traits::CohortQuery;
use billet_domain::PersonId;
use billet_service::RoomPlan;
use serde::Deserialize;

/// Execute the optimize command.
pub fn execute_optimize(args: OptimizeArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let filter = CohortQuery {
        group_tag: args.group_tag,
        limit: args.limit,
    };
    let plan = service.optimize_cohort(&filter)?;
    println!("{}", formatter.format_plan(&plan)?);

    let flagged = plan.proposals.iter().filter(|p| p.requires_supervision()).count();
    if flagged > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} room(s) have low compatibility and require supervision", flagged))
        );
    }

    if args.apply {
        let rooms: Vec<RoomPlan> = plan.proposals.iter().map(RoomPlan::from).collect();
        let applied = service.apply_pairing(&rooms)?;
        eprintln!("{}", formatter.success(&format!("Applied {} room(s)", applied)));
    } else if !plan.proposals.is_empty() {
        eprintln!(
            "{}",
            formatter.info("Plan not saved. Re-run with --apply, or pass the JSON output to 'billet apply'.")
        );
    }

    Ok(())
}

/// Execute the apply command.
pub fn execute_apply(args: ApplyArgs, service: &mut Service, formatter: &Formatter) -> Result<()> {
    let json_data = read_input(args.file.as_deref(), args.stdin)?;
    let rooms = parse_plan(&json_data)?;

    if rooms.is_empty() {
        return Err(CliError::InvalidInput("Plan contains no rooms".to_string()));
    }

    let applied = service.apply_pairing(&rooms)?;
    println!("{}", formatter.success(&format!("Applied {} room(s)", applied)));
    Ok(())
}

/// Plan file layout: the JSON output of `optimize`, extra fields ignored.
#[derive(Debug, Deserialize)]
struct PlanFile {
    proposals: Vec<RoomRecord>,
}

#[derive(Debug, Deserialize)]
struct RoomRecord {
    room_number: u32,
    member_ids: Vec<u64>,
}

fn parse_plan(json: &str) -> Result<Vec<RoomPlan>> {
    let plan: PlanFile = serde_json::from_str(json)?;
    Ok(plan
        .proposals
        .into_iter()
        .map(|room| RoomPlan {
            room_number: room.room_number,
            member_ids: room.member_ids.into_iter().map(PersonId::new).collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan_ignores_extra_fields() {
        let json = r#"
        {
            "proposals": [
                {"room_number": 1, "member_ids": [4, 9], "score": 0.72,
                 "recommendation_label": "excellent", "factors": []},
                {"room_number": 2, "member_ids": [5]}
            ],
            "total_rooms": 2
        }
        "#;

        let rooms = parse_plan(json).unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].member_ids, vec![PersonId::new(4), PersonId::new(9)]);
        assert_eq!(rooms[1].room_number, 2);
    }

    #[test]
    fn test_parse_plan_requires_proposals() {
        assert!(matches!(
            parse_plan(r#"{"rooms": []}"#),
            Err(CliError::Serialization(_))
        ));
    }
}
