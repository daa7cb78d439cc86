//! The four metric functions plus readability.
//!
//! Every metric starts from a fixed base and adds bounded adjustments, then gets clamped to `0..=100`.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub(crate) static ref PRECISION_MARKER_RE: Regex = Regex::new(r"(?i)\b(please|specifically|exactly|precisely|clearly|explicitly)\b").unwrap();
    pub(crate) static ref HEDGE_WORD_RE: Regex = Regex::new(r"(?i)\b(maybe|perhaps|might|could|possibly|probably|somewhat|some|few|many)\b").unwrap();
    pub(crate) static ref ACTION_VERB_RE: Regex = Regex::new(r"(?i)\b(analy[sz]e|summari[sz]e|explain|describe|list|compare|create|generate|classify|extract|translate|evaluate|identify|outline|draft|design|rewrite|review|provide|calculate)\b").unwrap();

    pub(crate) static ref FORMAT_CUE_RE: Regex = Regex::new(r"(?i)\b(format|json|markdown|bullets?|bullet points?|table|headings?|numbered|csv|yaml|style)\b").unwrap();
    pub(crate) static ref EXAMPLE_CUE_RE: Regex = Regex::new(r"(?i)(\bexamples?\b|\be\.g\.|\bfor instance\b|\bsuch as\b)").unwrap();
    pub(crate) static ref EXCLUSION_CUE_RE: Regex = Regex::new(r"(?i)(\bdo not\b|\bdon't\b|\bavoid\b|\bexclude\b|\bwithout\b|\bnever\b)").unwrap();
    /// An explicit length or amount, e.g. `150 words` or `3 bullet points`
    pub(crate) static ref QUANTITY_UNIT_RE: Regex = Regex::new(r"(?i)\b\d+\s*(words?|sentences?|paragraphs?|characters?|items?|points?|bullets?|bullet points?|lines?|pages?|examples?|steps?)\b").unwrap();
    pub(crate) static ref TONE_CUE_RE: Regex = Regex::new(r"(?i)\b(tone|formal|informal|casual|professional|friendly|conversational|academic|audience|voice)\b").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"\b\d+(?:\.\d+)?\b").unwrap();
    pub(crate) static ref ROLE_RE: Regex = Regex::new(r"(?i)\b(you are|act as|acting as|your role is|pretend to be|imagine you are)\b").unwrap();

    static ref LIST_MARKER_RE: Regex = Regex::new(r"(?m)^\s*(?:[-*+•]|\d+[.)])\s+\S").unwrap();
    pub(crate) static ref HEADER_RE: Regex = Regex::new(r"(?m)^\s*#{1,6}\s+\S").unwrap();
    static ref STRUCTURAL_KEYWORD_RE: Regex = Regex::new(r"(?i)\b(context|task|format|examples?|constraints?|goals?|objectives?|requirements?|output|input|background|audience|steps?|instructions?)\b").unwrap();
    static ref CONTEXT_SIGNAL_RE: Regex = Regex::new(r"(?i)\b(context|background|situation)\b").unwrap();
    static ref TASK_SIGNAL_RE: Regex = Regex::new(r"(?i)\b(task|goal|objective|your job)\b").unwrap();
    static ref FORMAT_SIGNAL_RE: Regex = Regex::new(r"(?i)\b(format|output|structure|respond in|json|markdown)\b").unwrap();

    static ref CONTEXT_CUE_RE: Regex = Regex::new(r"(?i)\b(context|background|situation|given|assume|you are|act as)\b").unwrap();
    static ref CONSTRAINT_CUE_RE: Regex = Regex::new(r"(?i)(\bmust\b|\bshould\b|\bonly\b|\blimit\b|\bat most\b|\bno more than\b|\bat least\b|\bavoid\b|\bdo not\b|\bdon't\b|\bnever\b|\bconstraints?\b|\brequirements?\b)").unwrap();
}

const SPECIFICITY_CATEGORY_BONUS: i32 = 8;
const NUMBER_BONUS: i32 = 5;
const NUMBER_BONUS_CAP: i32 = 15;
const HEDGE_PENALTY: i32 = 3;
const HEDGE_PENALTY_CAP: i32 = 20;
const KEYWORD_BONUS: i32 = 3;
const KEYWORD_BONUS_CAP: i32 = 20;

/// Word and sentence counts of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub char_count: usize,
}

impl TextStats {
    /// Words are whitespace-separated tokens; sentences are the non-blank runs between `.`, `!` and `?`.
    pub fn of(text: &str) -> Self {
        Self {
            word_count: text.split_whitespace().count(),
            sentence_count: text
                .split(|c| matches!(c, '.' | '!' | '?'))
                .filter(|sentence| !sentence.trim().is_empty())
                .count(),
            char_count: text.chars().count(),
        }
    }

    /// `None` when there is no sentence at all.
    pub fn avg_words_per_sentence(&self) -> Option<f64> {
        if self.sentence_count == 0 || self.word_count == 0 {
            None
        } else {
            Some(self.word_count as f64 / self.sentence_count as f64)
        }
    }
}

#[inline]
fn clamp_score(score: i32) -> u8 {
    score.clamp(0, 100) as u8
}

#[inline]
fn bonus_if(matched: bool, bonus: i32) -> i32 {
    if matched { bonus } else { 0 }
}

/// Hedge words in text order, as written.
pub fn find_hedge_words(text: &str) -> Vec<&str> {
    HEDGE_WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// The canonical precise replacement for a hedge word.
pub fn hedge_replacement(word: &str) -> &'static str {
    match word.to_lowercase().as_str() {
        "maybe" => "specifically",
        "perhaps" => "exactly",
        "might" => "should",
        "could" => "will",
        "some" => "three to five",
        "few" => "two to three",
        "many" => "at least five",
        _ => "specifically",
    }
}

pub fn clarity(text: &str, stats: &TextStats) -> u8 {
    let mut score = 70;
    score += bonus_if(PRECISION_MARKER_RE.is_match(text), 10);
    let hedges = HEDGE_WORD_RE.find_iter(text).count() as i32;
    score -= (hedges * HEDGE_PENALTY).min(HEDGE_PENALTY_CAP);
    if let Some(avg) = stats.avg_words_per_sentence() {
        if avg > 25.0 {
            score -= 10;
        } else if avg < 10.0 {
            score -= 5;
        }
    }
    score += bonus_if(ACTION_VERB_RE.is_match(text), 10);
    clamp_score(score)
}

pub fn specificity(text: &str) -> u8 {
    let mut score = 60;
    let categories = [&*FORMAT_CUE_RE, &*EXAMPLE_CUE_RE, &*EXCLUSION_CUE_RE, &*QUANTITY_UNIT_RE, &*TONE_CUE_RE];
    score += categories.iter().filter(|re| re.is_match(text)).count() as i32 * SPECIFICITY_CATEGORY_BONUS;
    let numbers: HashSet<&str> = NUMBER_RE.find_iter(text).map(|m| m.as_str()).collect();
    score += (numbers.len() as i32 * NUMBER_BONUS).min(NUMBER_BONUS_CAP);
    score += bonus_if(ROLE_RE.is_match(text), 10);
    clamp_score(score)
}

pub fn structure(text: &str) -> u8 {
    let mut score = 50;
    score += bonus_if(LIST_MARKER_RE.is_match(text), 15);
    score += bonus_if(HEADER_RE.is_match(text), 10);
    let keywords: HashSet<String> = STRUCTURAL_KEYWORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase().trim_end_matches('s').to_string())
        .collect();
    score += (keywords.len() as i32 * KEYWORD_BONUS).min(KEYWORD_BONUS_CAP);
    score += bonus_if(ROLE_RE.is_match(text), 10);
    let has_context = CONTEXT_SIGNAL_RE.is_match(text);
    let has_task = TASK_SIGNAL_RE.is_match(text);
    let has_format = FORMAT_SIGNAL_RE.is_match(text);
    score += bonus_if(has_context && has_task, 10);
    score += bonus_if(has_task && has_format, 5);
    clamp_score(score)
}

pub fn completeness(text: &str, stats: &TextStats) -> u8 {
    let mut score = 40;
    score += bonus_if(CONTEXT_CUE_RE.is_match(text), 15);
    score += bonus_if(ACTION_VERB_RE.is_match(text) || TASK_SIGNAL_RE.is_match(text), 25);
    score += bonus_if(FORMAT_CUE_RE.is_match(text) || FORMAT_SIGNAL_RE.is_match(text), 15);
    score += bonus_if(CONSTRAINT_CUE_RE.is_match(text), 10);
    score += bonus_if(EXAMPLE_CUE_RE.is_match(text), 10);
    score += bonus_if(stats.char_count > 200, 5);
    score += bonus_if(stats.char_count > 500, 5);
    clamp_score(score)
}

/// Readability from the average sentence length alone.
pub fn readability(stats: &TextStats) -> u8 {
    match stats.avg_words_per_sentence() {
        Some(avg) if avg <= 15.0 => 90,
        Some(avg) if avg <= 20.0 => 75,
        Some(avg) if avg <= 25.0 => 60,
        _ => 45,
    }
}

#[cfg(test)]
mod test_metrics {
    use super::*;

    #[test]
    fn test_text_stats() {
        let stats = TextStats::of("One two three. Four five! Six?  ");
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.sentence_count, 3);
        assert_eq!(stats.avg_words_per_sentence(), Some(2.0));

        let empty = TextStats::of("   ");
        assert_eq!(empty.word_count, 0);
        assert_eq!(empty.sentence_count, 0);
        assert_eq!(empty.avg_words_per_sentence(), None);
    }

    #[test]
    fn test_empty_text_keeps_base_scores() {
        let stats = TextStats::of("");
        assert_eq!(clarity("", &stats), 70);
        assert_eq!(specificity(""), 60);
        assert_eq!(structure(""), 50);
        assert_eq!(completeness("", &stats), 40);
        assert_eq!(readability(&stats), 45);
    }

    #[test]
    fn test_clarity_adjustments() {
        let text = "Write a thing about some stuff.";
        // one hedge, six-word sentence, no precision marker, no action verb
        assert_eq!(clarity(text, &TextStats::of(text)), 62);

        let text = "Please summarize the attached report for the finance team in plain language today.";
        // marker, action verb, 13 words
        assert_eq!(clarity(text, &TextStats::of(text)), 90);
    }

    #[test]
    fn test_hedge_penalty_is_capped() {
        let text = "maybe perhaps might could some few many possibly probably maybe perhaps might";
        // 12 hedges would be -36, capped at -20; one 12-word sentence
        assert_eq!(clarity(text, &TextStats::of(text)), 50);
    }

    #[test]
    fn test_long_sentences_penalized() {
        let text = (0..30).map(|_| "word").collect::<Vec<_>>().join(" ");
        assert_eq!(clarity(&text, &TextStats::of(&text)), 60);
    }

    #[test]
    fn test_specificity_categories() {
        assert_eq!(specificity("Write a thing about some stuff."), 60);
        let text = "You are an editor. Use a formal tone, markdown format, avoid jargon, for instance cite sources, in 200 words.";
        // five categories (+40), one number (+5), role (+10)
        assert_eq!(specificity(text), 100);
        let numbers = "Compare 1, 2, 3 and 4.";
        assert_eq!(specificity(numbers), 75);
    }

    #[test]
    fn test_structure_signals() {
        let text = "## Context\nWe sell shoes.\n\n## Task\n- Write a slogan\n\n## Format\nOne line of output.";
        // list +15, header +10, keywords context/task/format/output +12, context&task +10, task&format +5
        assert_eq!(structure(text), 100);
        assert_eq!(structure("just some words"), 50);
    }

    #[test]
    fn test_completeness_cues() {
        let text = "Given the background below, summarize it in a table. You must avoid jargon. For example: ...";
        assert_eq!(completeness(text, &TextStats::of(text)), 100);
        assert_eq!(completeness("Summarize this.", &TextStats::of("Summarize this.")), 65);
        let long = "a ".repeat(300);
        assert_eq!(completeness(&long, &TextStats::of(&long)), 50);
    }

    #[test]
    fn test_readability_bands() {
        let sentence = |words: usize| format!("{}.", vec!["w"; words].join(" "));
        assert_eq!(readability(&TextStats::of(&sentence(15))), 90);
        assert_eq!(readability(&TextStats::of(&sentence(20))), 75);
        assert_eq!(readability(&TextStats::of(&sentence(25))), 60);
        assert_eq!(readability(&TextStats::of(&sentence(26))), 45);
    }

    #[test]
    fn test_hedge_words() {
        assert_eq!(find_hedge_words("Maybe add some stuff, something else"), vec!["Maybe", "some"]);
        assert_eq!(hedge_replacement("Some"), "three to five");
        assert_eq!(hedge_replacement("few"), "two to three");
        assert_eq!(hedge_replacement("many"), "at least five");
        assert_eq!(hedge_replacement("probably"), "specifically");
    }
}
