//! Service configuration
//!
//! Result limits and the cohort size above which optimization is flagged.
//! Scoring weights and thresholds are not configurable.

use billet_domain::ranking::{DEFAULT_PEER_LIMIT, DEFAULT_SUPERVISOR_TOP_K};
use serde::{Deserialize, Serialize};

/// Default cohort size above which a warning is logged
pub const DEFAULT_LARGE_COHORT_WARNING: usize = 500;

/// Configuration for [`AssignmentService`](crate::AssignmentService)
///
/// # Examples
///
/// ```
/// use billet_service::ServiceConfig;
///
/// let config = ServiceConfig::default();
/// assert_eq!(config.peer_suggestion_limit, 10);
/// assert_eq!(config.supervisor_suggestion_limit, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Maximum roommate suggestions returned per person
    #[serde(default = "default_peer_limit")]
    pub peer_suggestion_limit: usize,

    /// Maximum supervisor suggestions returned per person
    #[serde(default = "default_supervisor_limit")]
    pub supervisor_suggestion_limit: usize,

    /// Cohort size above which optimization logs a warning
    #[serde(default = "default_large_cohort_warning")]
    pub large_cohort_warning: usize,
}

fn default_peer_limit() -> usize {
    DEFAULT_PEER_LIMIT
}

fn default_supervisor_limit() -> usize {
    DEFAULT_SUPERVISOR_TOP_K
}

fn default_large_cohort_warning() -> usize {
    DEFAULT_LARGE_COHORT_WARNING
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            peer_suggestion_limit: DEFAULT_PEER_LIMIT,
            supervisor_suggestion_limit: DEFAULT_SUPERVISOR_TOP_K,
            large_cohort_warning: DEFAULT_LARGE_COHORT_WARNING,
        }
    }
}

impl ServiceConfig {
    /// Reject zero limits
    pub fn validate(&self) -> Result<(), String> {
        if self.peer_suggestion_limit == 0 {
            return Err("peer_suggestion_limit must be greater than 0".to_string());
        }
        if self.supervisor_suggestion_limit == 0 {
            return Err("supervisor_suggestion_limit must be greater than 0".to_string());
        }
        if self.large_cohort_warning == 0 {
            return Err("large_cohort_warning must be greater than 0".to_string());
        }
        Ok(())
    }
}
