//! Natural-language feedback and structured optimization suggestions.

use crate::analyzer::metrics::{find_hedge_words, hedge_replacement, EXAMPLE_CUE_RE, EXCLUSION_CUE_RE, QUANTITY_UNIT_RE, TONE_CUE_RE};
use crate::analyzer::{AnalyzerConfig, Impact, Metrics, OptimizationSuggestion, SuggestionCategory, SuggestionType};

pub(crate) const STRUCTURE_TEMPLATE: &str = "## Context\n[Background the model needs]\n\n## Task\n[What the model should do]\n\n## Format\n[How the response should be laid out]";
pub(crate) const EXAMPLES_TEMPLATE: &str = "## Example\nInput: [sample input]\nOutput: [expected output]";
pub(crate) const CONSTRAINTS_TEMPLATE: &str = "## Constraints\n- Do not [what to leave out]\n- Keep the response within [scope or length limit]";
pub(crate) const LENGTH_TEMPLATE: &str = "Respond in [number] words (or [number] bullet points).";

/// The four axes in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Clarity,
    Specificity,
    Structure,
    Completeness,
}

impl Axis {
    pub(crate) const ALL: [Axis; 4] = [Axis::Clarity, Axis::Specificity, Axis::Structure, Axis::Completeness];

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Axis::Clarity => "clarity",
            Axis::Specificity => "specificity",
            Axis::Structure => "structure",
            Axis::Completeness => "completeness",
        }
    }

    pub(crate) fn score(&self, metrics: &Metrics) -> u8 {
        match self {
            Axis::Clarity => metrics.clarity,
            Axis::Specificity => metrics.specificity,
            Axis::Structure => metrics.structure,
            Axis::Completeness => metrics.completeness,
        }
    }

    fn strength(&self) -> &'static str {
        match self {
            Axis::Clarity => "Instructions are clear and direct.",
            Axis::Specificity => "Requirements are specific and concrete.",
            Axis::Structure => "The prompt is well organized into distinct parts.",
            Axis::Completeness => "The prompt covers the key components of a complete request.",
        }
    }

    fn weakness(&self) -> &'static str {
        match self {
            Axis::Clarity => "Some instructions are vague or hedged.",
            Axis::Specificity => "Requirements are too general.",
            Axis::Structure => "The prompt lacks a clear organization.",
            Axis::Completeness => "Key components such as context, output format or constraints are missing.",
        }
    }

    fn suggestion(&self) -> &'static str {
        match self {
            Axis::Clarity => "Replace hedging words like \"maybe\" or \"some\" with direct instructions.",
            Axis::Specificity => "Use more specific language: state the exact output, length and audience you expect.",
            Axis::Structure => "Organize the prompt into labeled sections such as Context, Task and Format.",
            Axis::Completeness => "Add the missing context, output format and constraints.",
        }
    }
}

/// Free-text strengths, weaknesses and suggestions, in axis order followed by the content checks.
pub(crate) fn describe(text: &str, metrics: &Metrics, config: &AnalyzerConfig) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut suggestions = Vec::new();
    for axis in Axis::ALL {
        let score = axis.score(metrics);
        if score >= config.strength_threshold {
            strengths.push(axis.strength().to_string());
        }
        if score < config.weakness_threshold {
            weaknesses.push(axis.weakness().to_string());
            suggestions.push(axis.suggestion().to_string());
        }
    }

    if !EXAMPLE_CUE_RE.is_match(text) {
        suggestions.push("Include an example of the output you want.".to_string());
    }
    if !TONE_CUE_RE.is_match(text) {
        suggestions.push("Specify the tone or style of the response, for instance formal or friendly.".to_string());
    }
    if !QUANTITY_UNIT_RE.is_match(text) {
        suggestions.push("Specify the expected length, for instance 150 words or 3 bullet points.".to_string());
    }
    (strengths, weaknesses, suggestions)
}

/// Names of the axes scoring below the weakness threshold.
pub(crate) fn improvement_areas(metrics: &Metrics, config: &AnalyzerConfig) -> Vec<String> {
    Axis::ALL
        .iter()
        .filter(|axis| axis.score(metrics) < config.weakness_threshold)
        .map(|axis| axis.name().to_string())
        .collect()
}

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

/// Structured suggestions. Order: structure, clarity, examples, constraints, specificity.
pub(crate) fn optimization_suggestions(text: &str, metrics: &Metrics, config: &AnalyzerConfig) -> Vec<OptimizationSuggestion> {
    let weak = |score: u8| score < config.weakness_threshold;
    let mut suggestions = Vec::new();

    if weak(metrics.structure) {
        suggestions.push(OptimizationSuggestion {
            suggestion_type: SuggestionType::Restructure,
            category: SuggestionCategory::Structure,
            description: "Split the prompt into Context, Task and Format sections.".to_string(),
            before: Some(excerpt(text, config.excerpt_chars)),
            after: Some(STRUCTURE_TEMPLATE.to_string()),
            impact: Impact::High,
        });
    }

    if weak(metrics.clarity) {
        if let Some(word) = find_hedge_words(text).first() {
            suggestions.push(OptimizationSuggestion {
                suggestion_type: SuggestionType::Improvement,
                category: SuggestionCategory::Clarity,
                description: format!("Replace the vague word \"{}\" with precise wording.", word),
                before: Some(word.to_string()),
                after: Some(hedge_replacement(word).to_string()),
                impact: Impact::Medium,
            });
        }
    }

    if weak(metrics.completeness) {
        if !EXAMPLE_CUE_RE.is_match(text) {
            suggestions.push(OptimizationSuggestion {
                suggestion_type: SuggestionType::Addition,
                category: SuggestionCategory::Examples,
                description: "Add an example of the expected input and output.".to_string(),
                before: None,
                after: Some(EXAMPLES_TEMPLATE.to_string()),
                impact: Impact::High,
            });
        }
        if !EXCLUSION_CUE_RE.is_match(text) {
            suggestions.push(OptimizationSuggestion {
                suggestion_type: SuggestionType::Addition,
                category: SuggestionCategory::Constraints,
                description: "Add constraints stating what to leave out.".to_string(),
                before: None,
                after: Some(CONSTRAINTS_TEMPLATE.to_string()),
                impact: Impact::Medium,
            });
        }
    }

    if weak(metrics.specificity) && !QUANTITY_UNIT_RE.is_match(text) {
        suggestions.push(OptimizationSuggestion {
            suggestion_type: SuggestionType::Addition,
            category: SuggestionCategory::Specificity,
            description: "State the expected length of the response.".to_string(),
            before: None,
            after: Some(LENGTH_TEMPLATE.to_string()),
            impact: Impact::Medium,
        });
    }
    suggestions
}

#[cfg(test)]
mod test_feedback {
    use super::*;

    fn metrics(clarity: u8, specificity: u8, structure: u8, completeness: u8) -> Metrics {
        Metrics { clarity, specificity, structure, completeness }
    }

    #[test]
    fn test_describe_thresholds() {
        let config = AnalyzerConfig::default();
        let text = "For example, a formal answer of 50 words.";
        let (strengths, weaknesses, suggestions) = describe(text, &metrics(80, 79, 70, 69), &config);
        assert_eq!(strengths, vec![Axis::Clarity.strength()]);
        assert_eq!(weaknesses, vec![Axis::Completeness.weakness()]);
        // content checks all pass for this text
        assert_eq!(suggestions, vec![Axis::Completeness.suggestion()]);
    }

    #[test]
    fn test_content_check_suggestions() {
        let config = AnalyzerConfig::default();
        let (_, _, suggestions) = describe("Hello", &metrics(75, 75, 75, 75), &config);
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[0].contains("example"));
        assert!(suggestions[1].contains("tone"));
        assert!(suggestions[2].contains("length"));
    }

    #[test]
    fn test_improvement_areas() {
        let config = AnalyzerConfig::default();
        assert_eq!(improvement_areas(&metrics(50, 90, 69, 70), &config), vec!["clarity", "structure"]);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("  short  ", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_all_optimization_suggestions() {
        let config = AnalyzerConfig::default();
        let text = "Maybe write some stuff.";
        let suggestions = optimization_suggestions(text, &metrics(10, 10, 10, 10), &config);
        let kinds: Vec<_> = suggestions.iter().map(|s| (s.suggestion_type, s.category, s.impact)).collect();
        assert_eq!(kinds, vec![
            (SuggestionType::Restructure, SuggestionCategory::Structure, Impact::High),
            (SuggestionType::Improvement, SuggestionCategory::Clarity, Impact::Medium),
            (SuggestionType::Addition, SuggestionCategory::Examples, Impact::High),
            (SuggestionType::Addition, SuggestionCategory::Constraints, Impact::Medium),
            (SuggestionType::Addition, SuggestionCategory::Specificity, Impact::Medium),
        ]);
        assert_eq!(suggestions[0].before.as_deref(), Some(text));
        assert_eq!(suggestions[0].after.as_deref(), Some(STRUCTURE_TEMPLATE));
        assert_eq!(suggestions[1].before.as_deref(), Some("Maybe"));
        assert_eq!(suggestions[1].after.as_deref(), Some("specifically"));
    }
    #[test]
    fn test_suggestions_skip_present_markers() {
        let config = AnalyzerConfig::default();
        let text = "For example, do not exceed 100 words.";
        let suggestions = optimization_suggestions(text, &metrics(10, 10, 90, 10), &config);
        // no hedge word, example and exclusion present, explicit length present
        assert!(suggestions.is_empty());
        assert!(optimization_suggestions("Maybe.", &metrics(90, 90, 90, 90), &config).is_empty());
    }
}
