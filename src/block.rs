//! # Block
//! A block is one unit of prompt content. A prompt is an ordered list of blocks.
//!
//! Every block has a [BlockKind] that never changes after creation. Plain kinds (`context`, `task`, `format`,
//! `constraints`, `examples`) contribute their content as is. The other kinds steer assembly:
//!
//! * `variable` declares a named value and never shows up in the assembled text
//! * `conditional` is included only when its condition holds (or when forced active)
//! * `loop` repeats its content, numbering each iteration
//! * `reference` borrows the raw content of another block in the same list
//!
//! Blocks serialize to JSON with camelCase field names, e.g.
//! ```json
//! {"id": "b1", "kind": "loop", "content": "item {{i}}", "loopVariable": "i", "loopCount": 3}
//! ```

use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};

/// The kind of a [Block].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Context,
    Task,
    Format,
    Constraints,
    Examples,
    Variable,
    Conditional,
    Loop,
    Reference,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Context => "context",
            BlockKind::Task => "task",
            BlockKind::Format => "format",
            BlockKind::Constraints => "constraints",
            BlockKind::Examples => "examples",
            BlockKind::Variable => "variable",
            BlockKind::Conditional => "conditional",
            BlockKind::Loop => "loop",
            BlockKind::Reference => "reference",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of prompt content.
///
/// Kind-specific attributes are optional and ignored by the assembler when they don't belong to the block's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    #[serde(default)]
    pub content: String,
    /// Display-only hint, never assembled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_variable: Option<String>,
    /// Only counts of at least 1 repeat. Anything that is not an integer reads as missing
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

impl Block {
    /// Create a block with no kind-specific attributes.
    pub fn new(id: impl Into<String>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            placeholder: None,
            variable_name: None,
            condition: None,
            is_active: None,
            loop_variable: None,
            loop_count: None,
            reference_id: None,
        }
    }

    /// A `variable` block binding `name` to `value`.
    pub fn variable(id: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            variable_name: Some(name.into()),
            ..Self::new(id, BlockKind::Variable, value)
        }
    }

    /// A `conditional` block. `condition` looks like `{{var}} == "x"` or `{{var}} != "x"`.
    pub fn conditional(id: impl Into<String>, condition: impl Into<String>, is_active: bool, content: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            is_active: Some(is_active),
            ..Self::new(id, BlockKind::Conditional, content)
        }
    }

    /// A `loop` block repeating `content` `count` times with `{{loop_variable}}` set to 1, 2, ...
    pub fn looped(id: impl Into<String>, loop_variable: impl Into<String>, count: i64, content: impl Into<String>) -> Self {
        Self {
            loop_variable: Some(loop_variable.into()),
            loop_count: Some(count),
            ..Self::new(id, BlockKind::Loop, content)
        }
    }

    /// A `reference` block pointing at the block with id `reference_id`.
    pub fn reference(id: impl Into<String>, reference_id: impl Into<String>) -> Self {
        Self {
            reference_id: Some(reference_id.into()),
            ..Self::new(id, BlockKind::Reference, "")
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// The declared variable name of a `variable` block, trimmed. `None` for other kinds or blank names.
    pub fn declared_variable(&self) -> Option<&str> {
        if self.kind != BlockKind::Variable {
            return None;
        }
        self.variable_name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|count| count.as_i64()))
}

#[cfg(test)]
mod test_block {
    use super::{Block, BlockKind};

    #[test]
    fn test_json_field_names() {
        let block = Block::looped("b1", "i", 3, "item {{i}}").with_placeholder("one line per item");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "loop");
        assert_eq!(json["loopVariable"], "i");
        assert_eq!(json["loopCount"], 3);
        assert_eq!(json["placeholder"], "one line per item");
        assert!(json.get("referenceId").is_none());
    }

    #[test]
    fn test_parse_minimal_block() {
        let block: Block = serde_json::from_str(r#"{"id": "x", "kind": "reference", "referenceId": "y"}"#).unwrap();
        assert_eq!(block.kind, BlockKind::Reference);
        assert_eq!(block.content, "");
        assert_eq!(block.reference_id.as_deref(), Some("y"));

        let unknown_kind = serde_json::from_str::<Block>(r#"{"id": "x", "kind": "banner"}"#);
        assert!(unknown_kind.is_err());
    }

    #[test]
    fn test_parse_out_of_range_loop_count() {
        let parse = |count: &str| {
            let json = format!(r#"{{"id": "l", "kind": "loop", "loopVariable": "i", "loopCount": {}}}"#, count);
            serde_json::from_str::<Block>(&json).unwrap().loop_count
        };
        assert_eq!(parse("-1"), Some(-1));
        assert_eq!(parse("4"), Some(4));
        assert_eq!(parse("2.5"), None);
        assert_eq!(parse(r#""three""#), None);
        assert_eq!(parse("null"), None);
    }

    #[test]
    fn test_declared_variable() {
        assert_eq!(Block::variable("v", " tone ", "formal").declared_variable(), Some("tone"));
        assert_eq!(Block::variable("v", "  ", "formal").declared_variable(), None);
        let mut task = Block::new("t", BlockKind::Task, "x");
        task.variable_name = Some("tone".to_string());
        assert_eq!(task.declared_variable(), None);
    }
}
