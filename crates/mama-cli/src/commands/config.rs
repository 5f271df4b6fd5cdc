use std::path::Path;

use clap::{Parser, Subcommand};
use mama_brain::config::BrainConfig;

use crate::error::CliResult;
use crate::output::{OutputFormat, new_table, yes_no};

#[derive(Parser)]
pub struct ConfigCommand {
    #[clap(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    #[clap(about = "Show effective configuration")]
    Show {
        #[clap(long, help = "Print as TOML, ready to save as a config file")]
        toml: bool,
    },
}

impl ConfigCommand {
    pub async fn execute(
        &self,
        config: &BrainConfig,
        config_path: Option<&Path>,
        format: OutputFormat,
    ) -> CliResult<()> {
        match &self.command {
            ConfigSubcommand::Show { toml } => Self::show(config, config_path, *toml, format),
        }
    }

    fn show(
        config: &BrainConfig,
        config_path: Option<&Path>,
        as_toml: bool,
        format: OutputFormat,
    ) -> CliResult<()> {
        if as_toml {
            print!("{}", toml::to_string_pretty(config)?);
            return Ok(());
        }

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(config)?);
            }
            OutputFormat::Table => {
                match config_path {
                    Some(path) => println!("Configuration from: {}", path.display()),
                    None => println!("Configuration: (discovered or defaults)"),
                }
                println!("==============================\n");

                println!("[pipeline]");
                let mut pipeline = new_table(["Setting", "Value"]);
                pipeline.add_row(["step_delay_ms", &config.pipeline.step_delay_ms.to_string()]);
                pipeline.add_row(["civic_before_faq", yes_no(config.pipeline.civic_before_faq)]);
                pipeline.add_row([
                    "announce_anti_repetition",
                    yes_no(config.pipeline.announce_anti_repetition),
                ]);
                println!("{pipeline}\n");

                println!("[import]");
                let mut import = new_table(["Setting", "Value"]);
                import.add_row(["batch_size", &config.import.batch_size.to_string()]);
                import.add_row(["batch_delay_ms", &config.import.batch_delay_ms.to_string()]);
                println!("{import}\n");

                println!("[sessions]");
                let mut sessions = new_table(["Setting", "Value"]);
                sessions.add_row([
                    "max_conversations",
                    &config.sessions.max_conversations.to_string(),
                ]);
                println!("{sessions}");
            }
        }

        Ok(())
    }
}
