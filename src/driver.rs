use anyhow::Result;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::classifier::{classify_article, Label};
use crate::config::ClassifierConfig;
use crate::few_shot::build_few_shot;
use crate::model::LanguageModel;
use crate::table::{read_target, write_table};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub relevant: usize,
    pub not_relevant: usize,
    /// Rows labelled `Non` because no few-shot block could be built.
    pub fallbacks: usize,
    pub elapsed: Duration,
}

/// Label every row of the target table and write it back.
///
/// Fails before writing anything when the target table is missing, unreadable
/// or lacks a required column. Per-row problems degrade to `Non`.
pub async fn run<M, R>(config: &ClassifierConfig, model: &M, rng: &mut R) -> Result<RunSummary>
where
    M: LanguageModel,
    R: Rng + ?Sized,
{
    info!("classifying {} with {} (few-shot)", config.target_csv.display(), config.model);
    let start = Instant::now();

    let (mut table, cols) = read_target(&config.target_csv)?;
    if table.is_empty() {
        info!("{} has no rows to classify", config.target_csv.display());
    } else {
        info!("{} articles to classify", table.len());
    }

    let mut summary = RunSummary {
        rows: table.len(),
        relevant: 0,
        not_relevant: 0,
        fallbacks: 0,
        elapsed: Duration::ZERO,
    };

    for idx in 0..table.len() {
        let title = table.cell(idx, cols.title).to_string();
        let company = table.cell(idx, cols.company).to_string();

        // Fresh sample for every row.
        let label = match build_few_shot(config, rng) {
            Ok(block) => classify_article(model, &block, &title, &company).await,
            Err(e) => {
                error!("cannot build few-shot prompt: {:#}", e);
                summary.fallbacks += 1;
                Label::Non
            }
        };
        table.set_cell(idx, cols.relevant, label.as_str());
        match label {
            Label::Oui => summary.relevant += 1,
            Label::Non => summary.not_relevant += 1,
        }

        let short: String = title.chars().take(60).collect();
        info!("idx={}, title='{}...' => {}", idx, short, label);
    }

    let output = config.output_path();
    write_table(output, &table)?;
    info!("classification done, CSV updated: {}", output.display());

    summary.elapsed = start.elapsed();
    info!(
        "execution time: {:.2} s ({} Oui, {} Non, {} fallbacks)",
        summary.elapsed.as_secs_f64(),
        summary.relevant,
        summary.not_relevant,
        summary.fallbacks
    );
    Ok(summary)
}
