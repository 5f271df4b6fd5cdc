use clap::Parser;
use mama_brain::text::correct_persian_keyboard;

use crate::error::CliResult;
use crate::output::{OutputFormat, new_table, yes_no};

#[derive(Parser)]
pub struct CorrectCommand {
    #[clap(help = "Text typed with the wrong keyboard layout")]
    pub text: String,
}

impl CorrectCommand {
    pub async fn execute(&self, format: OutputFormat) -> CliResult<()> {
        let result = correct_persian_keyboard(&self.text);

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            OutputFormat::Table => {
                let mut table = new_table(["Input", "Corrected", "Changed"]);
                table.add_row([self.text.as_str(), &result.corrected, yes_no(result.was_changed)]);
                println!("{table}");
            }
        }

        Ok(())
    }
}
