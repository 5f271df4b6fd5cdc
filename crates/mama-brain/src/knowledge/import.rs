//! Batched FAQ import with bounded concurrency

use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;

use super::{FaqEntry, KnowledgeSink};
use crate::config::ImportConfig;

/// Outcome of a batch import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
    pub failed: usize,
}

/// Import entries into `sink` in fixed-size batches.
///
/// Entries within a batch are written concurrently; batches run one after
/// another with `batch_delay_ms` between them. Blank entries are counted as
/// failed without reaching the sink.
pub async fn import_faq_entries(
    sink: &dyn KnowledgeSink,
    entries: Vec<FaqEntry>,
    config: &ImportConfig,
) -> ImportReport {
    let batch_size = config.batch_size.max(1);
    let mut report = ImportReport {
        total: entries.len(),
        ..Default::default()
    };

    let batch_count = entries.len().div_ceil(batch_size);
    for (batch_index, batch) in entries.chunks(batch_size).enumerate() {
        let results = join_all(batch.iter().cloned().map(|entry| async move {
            if entry.question.trim().is_empty() || entry.answer.trim().is_empty() {
                return false;
            }
            match sink.add_entry(entry).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("FAQ import entry failed: {e}");
                    false
                }
            }
        }))
        .await;

        let imported = results.iter().filter(|ok| **ok).count();
        report.imported += imported;
        report.failed += results.len() - imported;

        tracing::info!(
            batch = batch_index + 1,
            batches = batch_count,
            imported = report.imported,
            failed = report.failed,
            "FAQ import progress"
        );

        if batch_index + 1 < batch_count && config.batch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.batch_delay_ms)).await;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{InMemoryKnowledge, KnowledgeLookup};

    fn config(batch_size: usize) -> ImportConfig {
        ImportConfig {
            batch_size,
            batch_delay_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_imports_all_valid_entries() {
        let store = InMemoryKnowledge::new();
        let entries: Vec<FaqEntry> = (0..12)
            .map(|i| FaqEntry::new(format!("سوال {i}"), format!("جواب {i}")))
            .collect();

        let report = import_faq_entries(&store, entries, &config(5)).await;

        assert_eq!(report, ImportReport { total: 12, imported: 12, failed: 0 });
        assert_eq!(store.len().await, 12);
        assert!(store.lookup("سوال 7").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_blank_entries_fail() {
        let store = InMemoryKnowledge::new();
        let entries = vec![
            FaqEntry::new("سوال", "جواب"),
            FaqEntry::new("", "جواب"),
            FaqEntry::new("سوال دیگر", "  "),
        ];

        let report = import_faq_entries(&store, entries, &config(2)).await;

        assert_eq!(report.imported, 1);
        assert_eq!(report.failed, 2);
    }

    #[tokio::test]
    async fn test_zero_batch_size_treated_as_one() {
        let store = InMemoryKnowledge::new();
        let entries = vec![FaqEntry::new("الف", "ب"), FaqEntry::new("پ", "ت")];
        let report = import_faq_entries(&store, entries, &config(0)).await;
        assert_eq!(report.imported, 2);
    }

    #[tokio::test]
    async fn test_empty_import() {
        let store = InMemoryKnowledge::new();
        let report = import_faq_entries(&store, Vec::new(), &ImportConfig::default()).await;
        assert_eq!(report, ImportReport::default());
    }
}
