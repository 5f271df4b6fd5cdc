use std::path::PathBuf;

use clap::Parser;
use mama_brain::config::BrainConfig;
use mama_brain::knowledge::{ImportReport, import_faq_entries};
use mama_brain::{FaqEntry, InMemoryKnowledge, MamaPipeline, PipelineStep, StepStatus};

use super::{load_stats, read_json, resolve_seed};
use crate::error::CliResult;
use crate::output::{OutputFormat, new_table, yes_no};

#[derive(Parser)]
pub struct RespondCommand {
    #[clap(help = "Message to answer")]
    pub message: String,

    #[clap(long, help = "FAQ entries to load (JSON array of {question, answer})")]
    pub faq: Option<PathBuf>,

    #[clap(long, help = "Template key selected on the previous turn")]
    pub last_key: Option<String>,

    #[clap(long, help = "Aggregate seed (overrides --stats)")]
    pub seed: Option<u64>,

    #[clap(long, help = "Aggregate category statistics (JSON array)")]
    pub stats: Option<PathBuf>,
}

impl RespondCommand {
    pub async fn execute(&self, config: &BrainConfig, format: OutputFormat) -> CliResult<()> {
        let knowledge = InMemoryKnowledge::new();
        let import = match &self.faq {
            Some(path) => {
                let entries: Vec<FaqEntry> = read_json(path)?;
                Some(import_faq_entries(&knowledge, entries, &config.import).await)
            }
            None => None,
        };

        let stats = load_stats(self.stats.as_deref())?;
        let seed = resolve_seed(self.seed, &stats);

        let progress = |steps: Vec<PipelineStep>| {
            if let Some(step) = steps.iter().find(|s| s.status == StepStatus::Active) {
                tracing::debug!(step = step.id, "step started");
            }
        };

        let pipeline = MamaPipeline::new(config.pipeline.clone());
        let result = pipeline
            .run(
                &self.message,
                &knowledge,
                Some(&progress),
                self.last_key.as_deref(),
                seed,
            )
            .await?;

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "response": result.response_content,
                    "selected_template_key": result.selected_template_key,
                    "aggregate_seed": seed,
                    "feedback": result.feedback,
                    "steps": result.steps,
                    "import": import,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                if let Some(report) = import {
                    print_import(&report);
                }

                let mut steps = new_table(["#", "Step", "Status", "Summary"]);
                for (i, step) in result.steps.iter().enumerate() {
                    let summary = result
                        .feedback
                        .steps_summary
                        .get(i)
                        .map(String::as_str)
                        .unwrap_or("");
                    steps.add_row([
                        step.id.to_string().as_str(),
                        &step.name,
                        step.status.as_str(),
                        summary,
                    ]);
                }
                println!("{steps}\n");

                // Summary lines beyond the seven steps are extra notes
                for note in result.feedback.steps_summary.iter().skip(result.steps.len()) {
                    println!("note: {note}");
                }

                let mut feedback = new_table(["Feedback", "Value"]);
                feedback.add_row(["source", result.feedback.response_source.as_str()]);
                feedback.add_row([
                    "correction applied",
                    yes_no(result.feedback.correction_applied),
                ]);
                feedback.add_row(["faq match", yes_no(result.feedback.faq_match_found)]);
                feedback.add_row([
                    "template key",
                    result.selected_template_key.as_deref().unwrap_or("-"),
                ]);
                feedback.add_row([
                    "aggregate seed",
                    &seed.map_or_else(|| "-".to_string(), |s| s.to_string()),
                ]);
                println!("{feedback}\n");

                println!("{}", result.response_content);
            }
        }

        Ok(())
    }
}

fn print_import(report: &ImportReport) {
    println!(
        "Imported {}/{} FAQ entries ({} failed)\n",
        report.imported, report.total, report.failed
    );
}
