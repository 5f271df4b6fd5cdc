use clap::Parser;
use mama_brain::classify::{analyze_emotional_tone, derive_anonymized_signals};
use mama_brain::text::normalize_persian_text;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_score, new_table};

#[derive(Parser)]
pub struct SignalsCommand {
    #[clap(help = "Message to derive signals from")]
    pub message: String,
}

impl SignalsCommand {
    pub async fn execute(&self, format: OutputFormat) -> CliResult<()> {
        let normalized = normalize_persian_text(&self.message);
        let signals = derive_anonymized_signals(&normalized);
        let tone = analyze_emotional_tone(&normalized);

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "tone": tone,
                    "signals": signals,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let mut table = new_table(["Category", "Score"]);
                for signal in &signals {
                    table.add_row([
                        signal.category.as_str(),
                        &format_score(signal.normalized_score),
                    ]);
                }
                println!("{table}\n");
                println!("Tone: {}", tone.label());
            }
        }

        Ok(())
    }
}
