use anyhow::{ensure, Result};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::classifier::Label;
use crate::config::ClassifierConfig;
use crate::prompts::Prompts;
use crate::table::{read_training, TrainingRow};

/// Build a fresh few-shot block from the training table.
///
/// Samples up to `nb_oui` relevant and `nb_non` not-relevant rows without
/// replacement, shuffles them together and renders them after the fixed
/// instructions. Fails when the training file is missing, unreadable, lacks a
/// required column, or holds no `oui`/`non` row at all.
pub fn build_few_shot<R: Rng + ?Sized>(config: &ClassifierConfig, rng: &mut R) -> Result<String> {
    let path = config.train_csv.as_path();
    ensure!(
        path.exists(),
        "training file does not exist: {}",
        path.display()
    );
    let rows = read_training(path)?;
    render_few_shot(&rows, config.nb_oui, config.nb_non, rng)
}

pub fn render_few_shot<R: Rng + ?Sized>(
    rows: &[TrainingRow],
    nb_oui: usize,
    nb_non: usize,
    rng: &mut R,
) -> Result<String> {
    let (oui, non) = split_by_label(rows);
    ensure!(
        !oui.is_empty() || !non.is_empty(),
        "no Oui/Non row in the training table"
    );

    let mut examples: Vec<(&TrainingRow, Label)> = oui
        .choose_multiple(rng, nb_oui)
        .map(|r| (*r, Label::Oui))
        .chain(non.choose_multiple(rng, nb_non).map(|r| (*r, Label::Non)))
        .collect();
    examples.shuffle(rng);

    let mut prompt = String::from(Prompts::instructions());
    for (i, (row, label)) in examples.iter().enumerate() {
        prompt.push_str(&Prompts::example(
            i + 1,
            &row.title,
            &row.company,
            &row.comment,
            label.example_tag(),
        ));
    }
    prompt.push_str(Prompts::closing());
    Ok(prompt)
}

/// Partition rows on their trimmed, lowercased `Pertinent` cell. Other values are dropped.
fn split_by_label(rows: &[TrainingRow]) -> (Vec<&TrainingRow>, Vec<&TrainingRow>) {
    let mut oui = Vec::new();
    let mut non = Vec::new();
    for row in rows {
        match row.relevant.trim().to_lowercase().as_str() {
            "oui" => oui.push(row),
            "non" => non.push(row),
            _ => {}
        }
    }
    (oui, non)
}
