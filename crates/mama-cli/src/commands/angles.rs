use std::path::PathBuf;

use clap::Parser;
use mama_brain::bias::calculate_angle_bias;
use mama_brain::selector::compose_depth_response;

use super::{load_stats, resolve_seed};
use crate::error::CliResult;
use crate::output::{OutputFormat, format_score, new_table, yes_no};

#[derive(Parser)]
pub struct AnglesCommand {
    #[clap(help = "Message to analyze")]
    pub message: String,

    #[clap(long, help = "Angle key selected on the previous turn")]
    pub last_key: Option<String>,

    #[clap(long, help = "Aggregate seed (overrides --stats)")]
    pub seed: Option<u64>,

    #[clap(long, help = "Aggregate category statistics (JSON array)")]
    pub stats: Option<PathBuf>,
}

impl AnglesCommand {
    pub async fn execute(&self, format: OutputFormat) -> CliResult<()> {
        let stats = load_stats(self.stats.as_deref())?;
        let seed = resolve_seed(self.seed, &stats);
        let bias = calculate_angle_bias(&stats, seed);

        let response = compose_depth_response(&self.message, self.last_key.as_deref(), seed, &bias);

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "aggregate_seed": seed,
                    "bias": bias,
                    "response": response,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let mut candidates = new_table(["Rank", "Angle", "Key", "Priority"]);
                for (i, candidate) in response.candidates.iter().enumerate() {
                    candidates.add_row([
                        (i + 1).to_string().as_str(),
                        candidate.angle.as_str(),
                        &candidate.key,
                        &format_score(candidate.priority),
                    ]);
                }
                println!("{candidates}\n");

                if !bias.is_empty() {
                    let mut weights = new_table(["Bias key", "Weight"]);
                    for signal in &bias {
                        weights.add_row([
                            signal.angle_key.as_str(),
                            &format_score(signal.bias_weight),
                        ]);
                    }
                    println!("{weights}\n");
                }

                println!(
                    "Selected: {} ({}), anti-repetition: {}\n",
                    response.template_key,
                    response.depth_template_key,
                    yes_no(response.anti_repetition_triggered)
                );
                println!("{}", response.content);
            }
        }

        Ok(())
    }
}
