//! Rewrites a prompt by applying the analyzer's own corrective heuristics.

use regex::Captures;

use crate::analyzer::metrics::{hedge_replacement, EXCLUSION_CUE_RE, HEADER_RE, HEDGE_WORD_RE, QUANTITY_UNIT_RE};
use crate::analyzer::{AnalyzerConfig, PromptAnalysis};

const CONTEXT_SCAFFOLD: &str = "## Context\nProvide the relevant background here.";
const FORMAT_SCAFFOLD: &str = "## Format\nDescribe the expected response format here.";
const EMPTY_TASK: &str = "State the task here.";
const LENGTH_DIRECTIVE: &str = "Respond in approximately 150 words and include one concrete example.";
const CONSTRAINTS_DIRECTIVE: &str = "Constraints:\n- Do not include information unrelated to the task.\n- Keep the response focused and factual.";

/// Apply, in order: section scaffolding, hedge-word replacement, a length directive and a constraints directive.
/// Each step only runs when the matching metric in `analysis` is below the weakness threshold.
pub(crate) fn optimize(text: &str, analysis: &PromptAnalysis, config: &AnalyzerConfig) -> String {
    let weak = |score: u8| score < config.weakness_threshold;
    let mut optimized = text.trim().to_string();

    if weak(analysis.metrics.structure) && !HEADER_RE.is_match(text) {
        let task = if optimized.is_empty() { EMPTY_TASK } else { optimized.as_str() };
        optimized = format!("{}\n\n## Task\n{}\n\n{}", CONTEXT_SCAFFOLD, task, FORMAT_SCAFFOLD);
    }

    if weak(analysis.metrics.clarity) {
        optimized = replace_hedge_words(&optimized);
    }

    let mut sections = vec![optimized];
    if weak(analysis.metrics.specificity) && !QUANTITY_UNIT_RE.is_match(text) {
        sections.push(LENGTH_DIRECTIVE.to_string());
    }
    if weak(analysis.metrics.completeness) && !EXCLUSION_CUE_RE.is_match(text) {
        sections.push(CONSTRAINTS_DIRECTIVE.to_string());
    }
    sections.join("\n\n").trim().to_string()
}

/// Replace every hedge word with its canonical replacement, keeping a leading capital.
pub(crate) fn replace_hedge_words(text: &str) -> String {
    HEDGE_WORD_RE.replace_all(text, |captures: &Captures| {
        let word = &captures[0];
        let replacement = hedge_replacement(word);
        if word.chars().next().is_some_and(char::is_uppercase) {
            capitalize(replacement)
        } else {
            replacement.to_string()
        }
    }).into_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
