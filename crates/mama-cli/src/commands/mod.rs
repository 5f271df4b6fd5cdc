pub mod angles;
pub mod config;
pub mod correct;
pub mod respond;
pub mod signals;

pub use angles::AnglesCommand;
pub use config::ConfigCommand;
pub use correct::CorrectCommand;
pub use respond::RespondCommand;
pub use signals::SignalsCommand;

use std::path::Path;

use mama_brain::bias::{CategoryStat, derive_aggregate_seed};
use serde::de::DeserializeOwned;

use crate::error::CliResult;

fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse {}: {e}", path.display()).into())
}

/// Aggregate statistics from an optional JSON file
fn load_stats(path: Option<&Path>) -> CliResult<Vec<CategoryStat>> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Vec::new()),
    }
}

/// Explicit seed wins; otherwise derive one from the statistics
fn resolve_seed(explicit: Option<u64>, stats: &[CategoryStat]) -> Option<u64> {
    explicit.or_else(|| derive_aggregate_seed(stats))
}
