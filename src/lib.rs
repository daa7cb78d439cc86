//! # blockprompt
//!
//! Block-based prompt assembly and heuristic prompt analysis in Rust
//!
//! ## Usage
//! `blockprompt` is not released on crates.io. To use it, add a path dependency in `Cargo.toml`
//! ```toml
//! blockprompt = { path = "../blockprompt" }
//! ```
//!
//! ## Concepts and Design
//! `blockprompt` is two independent engines made of pure functions. Nothing here does I/O, keeps state between calls
//! or blocks, so both engines are cheap enough to run on every keystroke of an editor and safe to call from many
//! threads at once.
//!
//! ### Blocks
//!
//! A prompt is an ordered list of [`Block`](crate::block::Block)s. A block has a kind and some content, e.g.
//!
//! ```text
//! [context]  You are a friendly and helpful assistant.
//! [task]     Summarize {{topic}} in {{n}} words.
//! ```
//!
//! `{{topic}}` is a variable, a slot to be filled, with a name `"topic"`. A name can have any characters except
//! braces and line breaks, and surrounding spaces are ignored, so `{{ topic }}` is the same variable.
//!
//! Besides plain content, blocks can declare variables, be conditional, loop or reference other blocks. See
//! [block](crate::block) for the kinds.
//!
//! ### Assembler
//!
//! [`assemble`](crate::assembler::assemble) turns blocks plus variable values into one prompt string and the list of
//! variables it found. It never fails: a broken reference, a loop without a count or a condition it cannot parse
//! all fall back to sane behavior. Only the JSON entry point
//! [`assemble_json`](crate::assembler::assemble_json) rejects malformed input.
//!
//! ### Analyzer
//!
//! [`analyze`](crate::analyzer::analyze) scores any prompt text, assembled or not, on clarity, specificity, structure
//! and completeness, and tells you what to fix. [`generate_optimized_text`](crate::analyzer::generate_optimized_text)
//! applies those fixes mechanically.
//!
//! The analyzer is rule-based: regular expressions and counting, no models involved.
//!
//! ### Collaborators
//!
//! Storage of block lists and live previews through an LLM are the caller's business. The
//! [collaborators](crate::collaborators) module only defines the boundaries, with in-memory implementations for
//! testing.
//!
//! ## Example
//! ```
//! use std::collections::HashMap;
//! use blockprompt::analyzer::analyze;
//! use blockprompt::assembler::assemble;
//! use blockprompt::block::{Block, BlockKind};
//!
//! let blocks = vec![
//!     Block::new("ctx", BlockKind::Context, "You are a helpful assistant."),
//!     Block::looped("steps", "i", 2, "Step {{i}}: {{action}}"),
//! ];
//! let values = HashMap::from([("action".to_string(), "explain".to_string())]);
//! let assembled = assemble(&blocks, &values);
//! assert_eq!(assembled.text, "You are a helpful assistant.\n\nStep 1: explain\nStep 2: explain");
//!
//! let analysis = analyze(&assembled.text);
//! assert!(analysis.score <= 100);
//! ```
//!
//! ## Logging
//! `blockprompt` logs through the [`log`](https://docs.rs/log) facade: warnings for degraded block configurations,
//! debug lines with per-call summaries. Install any logger to see them.
//!
//! ## License
//!
//! `blockprompt` will always remain free under Apache license.
//!
//! ## Attribution
//! * `tiktoken-rs`: In [crate::utils::token::tiktoken], we re-export the `tiktoken-rs` crate.
//!


pub mod block;
pub mod assembler;
pub mod analyzer;
pub mod collaborators;
pub mod utils;
