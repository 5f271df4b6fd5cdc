pub mod commands;
pub mod error;
pub mod output;

pub use commands::{AnglesCommand, ConfigCommand, CorrectCommand, RespondCommand, SignalsCommand};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, format_score, new_table, yes_no};
