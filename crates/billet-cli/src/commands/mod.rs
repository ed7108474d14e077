//! Command implementations.

pub mod assign;
pub mod assignments;
pub mod import;
pub mod optimize;
pub mod suggest;

pub use self::assign::{execute_assign, execute_rate};
pub use self::assignments::execute_assignments;
pub use self::import::execute_import;
pub use self::optimize::{execute_apply, execute_optimize};
pub use self::suggest::{execute_suggest_peers, execute_suggest_supervisors};

use crate::error::{CliError, Result};
use billet_service::AssignmentService;
use billet_store::SqliteStore;
use std::fs;
use std::io::{self, Read};

/// Service type the commands run against.
pub type Service = AssignmentService<SqliteStore>;

/// Read JSON input from a file or stdin.
pub(crate) fn read_input(file: Option<&str>, stdin: bool) -> Result<String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = file {
        Ok(fs::read_to_string(path)?)
    } else {
        Err(CliError::InvalidInput(
            "Must specify either --file or --stdin".to_string(),
        ))
    }
}
