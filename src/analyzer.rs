//! # Analyzer
//! Rule-based scoring of prompt text.
//!
//! [analyze] scores a text on four axes (clarity, specificity, structure, completeness), combines them into one
//! weighted score, and explains the result with strengths, weaknesses and suggestions. Structured
//! [OptimizationSuggestion]s carry before/after fragments a caller can apply to the text.
//!
//! [generate_optimized_text] goes one step further and applies the corrective heuristics itself.
//!
//! Analysis is deterministic and side-effect free; the thresholds and weights live in [AnalyzerConfig].

pub mod metrics;
mod feedback;
mod optimizer;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::analyzer::metrics::TextStats;

/// Scores of the four axes, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub clarity: u8,
    pub specificity: u8,
    pub structure: u8,
    pub completeness: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Improvement,
    Addition,
    Removal,
    Restructure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Structure,
    Clarity,
    Specificity,
    Examples,
    Constraints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// A machine-actionable edit to a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub category: SuggestionCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    pub impact: Impact,
}

/// The result of [analyze].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptAnalysis {
    pub score: u8,
    pub metrics: Metrics,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub optimization_suggestions: Vec<OptimizationSuggestion>,
    pub word_count: usize,
    /// Reported separately, not part of `score`
    pub readability_score: u8,
    pub improvement_areas: Vec<String>,
}

/// Relative weights of the axes in the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    pub clarity: u32,
    pub specificity: u32,
    pub structure: u32,
    pub completeness: u32,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            clarity: 30,
            specificity: 25,
            structure: 25,
            completeness: 20,
        }
    }
}

impl MetricWeights {
    fn total(&self) -> u32 {
        self.clarity + self.specificity + self.structure + self.completeness
    }

    /// Weighted average of `metrics`, rounded half up.
    pub fn combine(&self, metrics: &Metrics) -> u8 {
        let weights = if self.total() == 0 {
            warn!("All metric weights are zero, falling back to the default weights");
            MetricWeights::default()
        } else {
            *self
        };
        let total = weights.total();
        let weighted = weights.clarity * metrics.clarity as u32
            + weights.specificity * metrics.specificity as u32
            + weights.structure * metrics.structure as u32
            + weights.completeness * metrics.completeness as u32;
        ((weighted + total / 2) / total).min(100) as u8
    }
}

/// Tunables of the [PromptAnalyzer].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    pub weights: MetricWeights,
    /// Axes scoring at least this much are reported as strengths
    pub strength_threshold: u8,
    /// Axes scoring below this are reported as weaknesses and get fixed by the optimizer
    pub weakness_threshold: u8,
    /// Length of the excerpt quoted by the restructure suggestion
    pub excerpt_chars: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            strength_threshold: 80,
            weakness_threshold: 70,
            excerpt_chars: 100,
        }
    }
}

impl AnalyzerConfig {
    /// Load a config from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Analyzer holding an [AnalyzerConfig].
#[derive(Debug, Clone, Default)]
pub struct PromptAnalyzer {
    config: AnalyzerConfig,
}

impl PromptAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Score `text` and explain the score.
    pub fn analyze(&self, text: &str) -> PromptAnalysis {
        let stats = TextStats::of(text);
        let metrics = Metrics {
            clarity: metrics::clarity(text, &stats),
            specificity: metrics::specificity(text),
            structure: metrics::structure(text),
            completeness: metrics::completeness(text, &stats),
        };
        let score = self.config.weights.combine(&metrics);
        let (strengths, weaknesses, suggestions) = feedback::describe(text, &metrics, &self.config);
        let optimization_suggestions = feedback::optimization_suggestions(text, &metrics, &self.config);
        let improvement_areas = feedback::improvement_areas(&metrics, &self.config);
        debug!("Analyzed {} words: score = {}, metrics = {:?}", stats.word_count, score, metrics);
        PromptAnalysis {
            score,
            metrics,
            strengths,
            weaknesses,
            suggestions,
            optimization_suggestions,
            word_count: stats.word_count,
            readability_score: metrics::readability(&stats),
            improvement_areas,
        }
    }

    /// Rewrite `text` by applying the fixes `analysis` calls for. `analysis` should come from analyzing `text`.
    pub fn generate_optimized_text(&self, text: &str, analysis: &PromptAnalysis) -> String {
        optimizer::optimize(text, analysis, &self.config)
    }

    /// Analyze `text` and rewrite it in one go.
    pub fn optimize(&self, text: &str) -> (PromptAnalysis, String) {
        let analysis = self.analyze(text);
        let optimized = self.generate_optimized_text(text, &analysis);
        (analysis, optimized)
    }
}

/// Analyze `text` with the default [AnalyzerConfig].
///
/// # Example
/// ```
/// use blockprompt::analyzer::analyze;
///
/// let analysis = analyze("Write a thing about some stuff.");
/// assert!(analysis.metrics.clarity < 70);
/// assert!(analysis.metrics.specificity < 70);
/// assert!(analysis.suggestions.iter().any(|s| s.contains("more specific language")));
/// ```
pub fn analyze(text: &str) -> PromptAnalysis {
    PromptAnalyzer::default().analyze(text)
}

/// Rewrite `text` with the default [AnalyzerConfig]. See [PromptAnalyzer::generate_optimized_text].
pub fn generate_optimized_text(text: &str, analysis: &PromptAnalysis) -> String {
    PromptAnalyzer::default().generate_optimized_text(text, analysis)
}

#[cfg(test)]
mod test_analyzer {
    use super::*;

    fn expected_score(m: &Metrics) -> u8 {
        (0.30 * m.clarity as f64 + 0.25 * m.specificity as f64 + 0.25 * m.structure as f64 + 0.20 * m.completeness as f64 + 1e-9).round() as u8
    }

    const RICH_PROMPT: &str = "## Context\n\
        You are a senior product copywriter for an outdoor gear shop.\n\n\
        ## Task\n\
        Please create three product descriptions for our new hiking boots.\n\n\
        ## Format\n\
        - Use markdown with one heading per description\n\
        - Each description must be at most 80 words\n\n\
        ## Constraints\n\
        Use a friendly tone. Do not mention competitor brands.\n\n\
        ## Example\n\
        Input: trail runner. Output: Light, grippy, ready for the next summit.";

    #[test]
    fn test_vague_prompt() {
        let analysis = analyze("Write a thing about some stuff.");
        assert_eq!(analysis.metrics, Metrics { clarity: 62, specificity: 60, structure: 50, completeness: 40 });
        assert_eq!(analysis.score, 54);
        assert_eq!(analysis.word_count, 6);
        assert_eq!(analysis.readability_score, 90);
        assert!(analysis.strengths.is_empty());
        assert_eq!(analysis.weaknesses.len(), 4);
        assert!(analysis.suggestions.iter().any(|s| s.contains("more specific language")));
        assert_eq!(analysis.improvement_areas, vec!["clarity", "specificity", "structure", "completeness"]);

        let clarity = analysis.optimization_suggestions
            .iter()
            .find(|s| s.category == SuggestionCategory::Clarity)
            .expect("a clarity suggestion");
        assert_eq!(clarity.before.as_deref(), Some("some"));
        assert_eq!(clarity.after.as_deref(), Some("three to five"));
    }

    #[test]
    fn test_empty_text() {
        for text in ["", "   \n\t "] {
            let analysis = analyze(text);
            assert_eq!(analysis.metrics, Metrics { clarity: 70, specificity: 60, structure: 50, completeness: 40 });
            assert_eq!(analysis.word_count, 0);
            assert_eq!(analysis.readability_score, 45);
            // 21 + 15 + 12.5 + 8 = 56.5
            assert_eq!(analysis.score, 57);
        }
    }

    #[test]
    fn test_rich_prompt() {
        let analysis = analyze(RICH_PROMPT);
        assert!(analysis.metrics.structure >= 80, "{:?}", analysis.metrics);
        assert!(analysis.metrics.completeness >= 80, "{:?}", analysis.metrics);
        assert!(analysis.metrics.specificity >= 80, "{:?}", analysis.metrics);
        assert!(analysis.score >= 80, "{}", analysis.score);
        assert!(analysis.weaknesses.is_empty());
        assert!(analysis.optimization_suggestions.is_empty());
    }

    #[test]
    fn test_score_is_weighted_metrics() {
        for text in ["", "Write a thing about some stuff.", RICH_PROMPT, "maybe", "Summarize 3 papers. Avoid jargon."] {
            let analysis = analyze(text);
            assert_eq!(analysis.score, expected_score(&analysis.metrics), "{}", text);
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(analyze(RICH_PROMPT), analyze(RICH_PROMPT));
        assert_eq!(analyze("Maybe do stuff"), analyze("Maybe do stuff"));
    }

    #[test]
    fn test_weights_combine() {
        let metrics = Metrics { clarity: 100, specificity: 0, structure: 0, completeness: 0 };
        assert_eq!(MetricWeights::default().combine(&metrics), 30);
        let zero = MetricWeights { clarity: 0, specificity: 0, structure: 0, completeness: 0 };
        assert_eq!(zero.combine(&metrics), 30);
        let only_clarity = MetricWeights { clarity: 1, specificity: 0, structure: 0, completeness: 0 };
        assert_eq!(only_clarity.combine(&metrics), 100);
    }

    #[test]
    fn test_config_from_json() {
        let config = AnalyzerConfig::from_json(r#"{"weaknessThreshold": 50, "weights": {"clarity": 40}}"#).unwrap();
        assert_eq!(config.weakness_threshold, 50);
        assert_eq!(config.strength_threshold, 80);
        assert_eq!(config.weights.clarity, 40);
        assert_eq!(config.weights.completeness, 20);
        assert!(AnalyzerConfig::from_json("42").is_err());

        let lenient = PromptAnalyzer::new(config);
        let analysis = lenient.analyze("Write a thing about some stuff.");
        assert_eq!(analysis.improvement_areas, vec!["completeness"]);
    }

    #[test]
    fn test_analysis_json_shape() {
        let json = serde_json::to_value(analyze("Write a thing about some stuff.")).unwrap();
        for key in ["score", "metrics", "strengths", "weaknesses", "suggestions", "optimizationSuggestions", "wordCount", "readabilityScore", "improvementAreas"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["optimizationSuggestions"][0]["type"], "restructure");
        assert_eq!(json["optimizationSuggestions"][0]["impact"], "high");
    }

    #[test]
    fn test_optimized_text_for_vague_prompt() {
        let text = "Write a thing about some stuff.";
        let analysis = analyze(text);
        let optimized = generate_optimized_text(text, &analysis);
        assert_eq!(optimized, "## Context\nProvide the relevant background here.\n\n\
            ## Task\nWrite a thing about three to five stuff.\n\n\
            ## Format\nDescribe the expected response format here.\n\n\
            Respond in approximately 150 words and include one concrete example.\n\n\
            Constraints:\n- Do not include information unrelated to the task.\n- Keep the response focused and factual.");

        let reanalysis = analyze(&optimized);
        assert!(reanalysis.metrics.clarity >= analysis.metrics.clarity);
        assert!(reanalysis.metrics.specificity >= analysis.metrics.specificity);
        assert!(reanalysis.metrics.structure >= analysis.metrics.structure);
        assert!(reanalysis.metrics.completeness >= analysis.metrics.completeness);
        assert!(reanalysis.score > analysis.score);
    }

    #[test]
    fn test_optimized_text_leaves_good_prompt_alone() {
        let (analysis, optimized) = PromptAnalyzer::default().optimize(RICH_PROMPT);
        assert!(analysis.weaknesses.is_empty());
        assert_eq!(optimized, RICH_PROMPT.trim());
    }

    #[test]
    fn test_optimized_text_for_empty_prompt() {
        let optimized = generate_optimized_text("", &analyze(""));
        assert!(optimized.starts_with("## Context"));
        assert!(optimized.contains("## Task\nState the task here."));
    }
}
