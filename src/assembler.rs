//! # Assembler
//! Turns an ordered list of [Block]s plus caller-supplied variable values into one prompt string.
//!
//! Assembly is total: dangling references, half-configured loops and unparsable conditions never fail, they fall
//! back to well-defined behavior (see [assemble]). Only the JSON boundary ([assemble_json]) can return an error.
//!
//! ## Variable resolution
//! A placeholder `{{name}}` is replaced by, in order of priority:
//! 1. the caller-supplied value for `name`, if it is not blank
//! 2. the content of a `variable` block named `name` anywhere in the list
//! 3. nothing, i.e. the literal `{{name}}` stays in the text
//!
//! ## Counting tokens
//! [AssemblyResult::token_count] counts the tokens of the assembled text with any [CountToken] counter.

pub mod condition;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::assembler::condition::evaluate_condition;
use crate::assembler::errors::{DuplicateBlockId, InvalidBlockList, InvalidVariableValues};
use crate::block::{Block, BlockKind};
use crate::utils::prompt_processing::{collect_placeholders, get_placeholders, replace_placeholder, replace_placeholders_with};
use crate::utils::token::CountToken;

/// Mapping from variable name to the value supplied by the caller.
pub type VariableValues = HashMap<String, String>;

const BLOCK_SEPARATOR: &str = "\n\n";

/// The outcome of [assemble]. Recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[readonly::make]
pub struct AssemblyResult {
    /// The assembled prompt, readonly
    pub text: String,
    /// Every variable name found in the assembled blocks, deduplicated, in first-seen order, readonly
    pub variables: Vec<String>,
}

impl AssemblyResult {
    /// Variables that are still literal `{{name}}` placeholders in the text.
    pub fn unresolved(&self) -> Vec<&str> {
        let left: HashSet<String> = get_placeholders(&self.text).into_iter().collect();
        self.variables
            .iter()
            .filter(|v| left.contains(v.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Count the tokens of the assembled text.
    pub fn token_count(&self, counter: &impl CountToken) -> usize {
        counter.count_token(&self.text)
    }
}

/// Looks up placeholder values: caller-supplied first, then `variable` blocks.
struct ValueResolver<'a> {
    supplied: &'a VariableValues,
    declared: HashMap<&'a str, &'a str>,
}

impl<'a> ValueResolver<'a> {
    fn new(blocks: &'a [Block], supplied: &'a VariableValues) -> Self {
        let mut declared: HashMap<&str, &str> = HashMap::new();
        for block in blocks {
            let Some(name) = block.declared_variable() else { continue };
            if block.content.trim().is_empty() {
                continue;
            }
            if declared.contains_key(name) {
                warn!("Variable `{}` is declared more than once (block {}), keeping the first declaration", name, block.id);
                continue;
            }
            declared.insert(name, block.content.as_str());
        }
        Self { supplied, declared }
    }

    fn resolve(&self, name: &str) -> Option<&'a str> {
        self.supplied
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.declared.get(name).copied())
    }
}

/// Assemble `blocks` into a prompt.
///
/// For each block, in list order:
/// * `variable` blocks contribute no text; they only declare fallback values
/// * `conditional` blocks are included when `isActive` is true, when the condition is empty, or when the condition
///   holds. Excluded blocks contribute neither text nor variables
/// * `loop` blocks with a loop variable and a count of at least 1 repeat their content, one line per iteration,
///   with `{{loopVariable}}` set to the 1-based iteration index. Otherwise the content is used as is
/// * `reference` blocks take the raw content of the referenced block (one level only, so cycles terminate). A
///   dangling reference keeps the block's own content
///
/// Then the variables of the block are recorded and its placeholders substituted. Blocks that end up blank are
/// dropped; the rest are joined by a blank line.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use blockprompt::assembler::assemble;
/// use blockprompt::block::{Block, BlockKind};
///
/// let blocks = vec![
///     Block::new("1", BlockKind::Context, "You are a helpful assistant."),
///     Block::new("2", BlockKind::Task, "Summarize {{topic}} in {{n}} words."),
/// ];
/// let values = HashMap::from([("topic".to_string(), "quantum computing".to_string())]);
/// let result = assemble(&blocks, &values);
/// assert_eq!(result.text, "You are a helpful assistant.\n\nSummarize quantum computing in {{n}} words.");
/// assert_eq!(result.variables, vec!["topic", "n"]);
/// ```
pub fn assemble(blocks: &[Block], variable_values: &VariableValues) -> AssemblyResult {
    let resolver = ValueResolver::new(blocks, variable_values);
    let mut by_id: HashMap<&str, &Block> = HashMap::with_capacity(blocks.len());
    for block in blocks {
        by_id.entry(block.id.as_str()).or_insert(block);
    }

    let mut seen = HashSet::new();
    let mut variables = Vec::new();
    let mut sections: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        let content: Cow<str> = match block.kind {
            BlockKind::Variable => continue,
            BlockKind::Conditional => {
                if !is_included(block, &resolver) {
                    continue;
                }
                Cow::Borrowed(&block.content)
            }
            BlockKind::Loop => expand_loop(block),
            BlockKind::Reference => Cow::Borrowed(resolve_reference(block, &by_id)),
            _ => Cow::Borrowed(&block.content),
        };
        collect_placeholders(&content, &mut seen, &mut variables);
        let text = replace_placeholders_with(&content, |name| resolver.resolve(name));
        if !text.trim().is_empty() {
            sections.push(text);
        }
    }

    let text = sections.join(BLOCK_SEPARATOR).trim().to_string();
    debug!("Assembled {} blocks into {} sections with {} variables", blocks.len(), sections.len(), variables.len());
    AssemblyResult { text, variables }
}

fn is_included(block: &Block, resolver: &ValueResolver) -> bool {
    if block.is_active.unwrap_or(false) {
        return true;
    }
    match block.condition.as_deref() {
        Some(condition) if !condition.trim().is_empty() => evaluate_condition(condition, |name| resolver.resolve(name)),
        _ => true,
    }
}

fn expand_loop(block: &Block) -> Cow<'_, str> {
    let loop_variable = block.loop_variable.as_deref().map(str::trim).filter(|v| !v.is_empty());
    let loop_count = block.loop_count.filter(|count| *count >= 1);
    match (loop_variable, loop_count) {
        (Some(loop_variable), Some(loop_count)) => {
            let iterations: Vec<String> = (1..=loop_count)
                .map(|idx| replace_placeholder(&block.content, loop_variable, &idx.to_string()))
                .collect();
            Cow::Owned(iterations.join("\n").trim().to_string())
        }
        _ => {
            warn!("Loop block {} is missing its loop variable or count, using its content as is", block.id);
            Cow::Borrowed(&block.content)
        }
    }
}

fn resolve_reference<'a>(block: &'a Block, by_id: &HashMap<&str, &'a Block>) -> &'a str {
    let Some(reference_id) = block.reference_id.as_deref() else {
        return &block.content;
    };
    match by_id.get(reference_id) {
        Some(target) if target.id != block.id => &target.content,
        Some(_) => {
            warn!("Reference block {} references itself, using its own content", block.id);
            &block.content
        }
        None => {
            warn!("Reference block {} points at unknown block {}, using its own content", block.id, reference_id);
            &block.content
        }
    }
}

/// Check that every block id in `blocks` is unique.
pub fn validate_blocks(blocks: &[Block]) -> Result<(), DuplicateBlockId> {
    let mut ids = HashSet::with_capacity(blocks.len());
    for (position, block) in blocks.iter().enumerate() {
        if !ids.insert(block.id.as_str()) {
            warn!("Block id {} appears more than once", block.id);
            return Err(DuplicateBlockId { id: block.id.clone(), position });
        }
    }
    Ok(())
}

/// Parse a JSON array of blocks and a JSON object of variable values, then [assemble].
///
/// A `null` block list is an error; a `null` value map means no values.
pub fn assemble_json(blocks_json: &str, values_json: &str) -> Result<AssemblyResult, anyhow::Error> {
    let blocks = parse_blocks(blocks_json)?;
    let values = parse_variable_values(values_json)?;
    Ok(assemble(&blocks, &values))
}

/// Parse a JSON array of blocks.
pub fn parse_blocks(blocks_json: &str) -> Result<Vec<Block>, InvalidBlockList> {
    let value: Value = serde_json::from_str(blocks_json).map_err(|e| InvalidBlockList::new(e.to_string()))?;
    match value {
        Value::Null => Err(InvalidBlockList::new("block list is null")),
        Value::Array(_) => serde_json::from_value(value).map_err(|e| InvalidBlockList::new(e.to_string())),
        other => Err(InvalidBlockList::new(format!("expected an array of blocks, got {}", json_type_name(&other)))),
    }
}

/// Parse a JSON object mapping variable names to string values.
pub fn parse_variable_values(values_json: &str) -> Result<VariableValues, InvalidVariableValues> {
    let value: Value = serde_json::from_str(values_json).map_err(|e| InvalidVariableValues::new(e.to_string()))?;
    match value {
        Value::Null => Ok(VariableValues::new()),
        Value::Object(_) => serde_json::from_value(value).map_err(|e| InvalidVariableValues::new(e.to_string())),
        other => Err(InvalidVariableValues::new(format!("expected an object of strings, got {}", json_type_name(&other)))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub mod errors {
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when the block list handed to the JSON boundary is not a list of blocks.
    #[derive(Debug, Clone)]
    pub struct InvalidBlockList {
        pub reason: String,
    }

    impl InvalidBlockList {
        pub(crate) fn new(reason: impl Into<String>) -> Self {
            Self { reason: reason.into() }
        }
    }

    impl fmt::Display for InvalidBlockList {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "InvalidBlockList: {}", self.reason)
        }
    }

    impl Error for InvalidBlockList {}

    /// Error when variable values are not a mapping from names to strings.
    #[derive(Debug, Clone)]
    pub struct InvalidVariableValues {
        pub reason: String,
    }

    impl InvalidVariableValues {
        pub(crate) fn new(reason: impl Into<String>) -> Self {
            Self { reason: reason.into() }
        }
    }

    impl fmt::Display for InvalidVariableValues {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "InvalidVariableValues: {}", self.reason)
        }
    }

    impl Error for InvalidVariableValues {}

    /// Error when two blocks in one list share an id.
    #[derive(Debug, Clone)]
    pub struct DuplicateBlockId {
        pub id: String,
        /// Position of the second block carrying the id
        pub position: usize,
    }

    impl fmt::Display for DuplicateBlockId {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "DuplicateBlockId: id = {} is used again by the block at position {}", self.id, self.position)
        }
    }

    impl Error for DuplicateBlockId {}
}
