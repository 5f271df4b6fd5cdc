//! Literal-bank selection with anti-repetition

use serde::{Deserialize, Serialize};

use super::fold_seed;
use crate::catalog::{CIVIC_BANK, EMPATHETIC_BANK, NEW_ANGLE_NOTICE, ResponseBank};
use crate::text::{first_code_unit, last_code_unit, utf16_len};

/// A template picked from a response bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSelection {
    /// Normalized, Mama-prefixed reply text
    pub content: String,
    pub index: usize,
    /// `"{bank}-{index}"`
    pub key: String,
    pub anti_repetition_triggered: bool,
}

/// `len + first code unit + last code unit` over UTF-16
fn message_hash(message: &str) -> u64 {
    utf16_len(message) as u64
        + u64::from(first_code_unit(message))
        + u64::from(last_code_unit(message))
}

/// Pick a template from `bank`.
///
/// When the naturally chosen key equals `last_template_key`, the next
/// template (wrapping) is used instead and the new-angle notice is appended.
pub fn select_from_bank(
    bank: &ResponseBank,
    message: &str,
    last_template_key: Option<&str>,
    aggregate_seed: Option<u64>,
) -> TemplateSelection {
    let hash = fold_seed(message_hash(message), aggregate_seed);
    let size = bank.len();
    let mut index = (hash % size as u64) as usize;
    let mut anti_repetition_triggered = false;

    if last_template_key == Some(bank.key(index).as_str()) {
        index = (index + 1) % size;
        anti_repetition_triggered = true;
        tracing::debug!(bank = bank.name(), index, "anti-repetition advanced selection");
    }

    let mut content = bank.render(index);
    if anti_repetition_triggered {
        content.push_str("\n\n");
        content.push_str(NEW_ANGLE_NOTICE);
    }

    TemplateSelection {
        content,
        index,
        key: bank.key(index),
        anti_repetition_triggered,
    }
}

/// Pick from the empathetic bank
pub fn select_empathetic_response(
    message: &str,
    last_template_key: Option<&str>,
    aggregate_seed: Option<u64>,
) -> TemplateSelection {
    select_from_bank(&EMPATHETIC_BANK, message, last_template_key, aggregate_seed)
}

/// Pick from the civic-empowerment bank
pub fn select_civic_response(
    message: &str,
    last_template_key: Option<&str>,
    aggregate_seed: Option<u64>,
) -> TemplateSelection {
    select_from_bank(&CIVIC_BANK, message, last_template_key, aggregate_seed)
}
