use std::fmt;
use tracing::error;

use crate::model::LanguageModel;
use crate::prompts::Prompts;

/// Relevance label of one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Oui,
    Non,
}

impl Label {
    /// Value written to the `Pertinent` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Oui => "Oui",
            Label::Non => "Non",
        }
    }

    /// How the label appears inside few-shot examples.
    pub fn example_tag(self) -> &'static str {
        match self {
            Label::Oui => "OUI",
            Label::Non => "NON",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read a label out of raw model output. `oui` anywhere wins; everything else is `Non`.
pub fn parse_label(output: &str) -> Label {
    if output.trim().to_lowercase().contains("oui") {
        Label::Oui
    } else {
        Label::Non
    }
}

/// The few-shot block followed by the article, left open on `Pertinent : `.
pub fn article_prompt(few_shot: &str, title: &str, company: &str) -> String {
    let mut prompt = String::with_capacity(few_shot.len() + title.len() + company.len() + 64);
    prompt.push_str(few_shot);
    prompt.push_str(&Prompts::article(title, company));
    prompt
}

/// Ask `model` about one article. Model failures are logged and read as `Non`.
pub async fn classify_article<M: LanguageModel>(
    model: &M,
    few_shot: &str,
    title: &str,
    company: &str,
) -> Label {
    let prompt = article_prompt(few_shot, title, company);
    match model.complete(&prompt).await {
        Ok(output) => parse_label(&output),
        Err(e) => {
            error!("model call failed: {:#}", e);
            Label::Non
        }
    }
}
