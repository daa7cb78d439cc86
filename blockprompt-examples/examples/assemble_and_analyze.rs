use std::collections::HashMap;

use anyhow::Result;
use blockprompt::analyzer::PromptAnalyzer;
use blockprompt::assembler::{assemble_json, parse_blocks};
use blockprompt::collaborators::{BlockStore, InMemoryBlockStore};
use blockprompt::utils::token::count_tokens_by_words;

const BLOCKS: &str = r#"[
    {"id": "role", "kind": "context", "content": "You are a {{persona}} explaining things to {{audience}}."},
    {"id": "persona", "kind": "variable", "variableName": "persona", "content": "patient science teacher"},
    {"id": "task", "kind": "task", "content": "Explain {{topic}}."},
    {"id": "formal", "kind": "conditional", "condition": "{{audience}} == \"experts\"", "isActive": false,
     "content": "Use precise terminology."},
    {"id": "points", "kind": "loop", "loopVariable": "n", "loopCount": 3, "content": "- Key point {{n}}:"},
    {"id": "again", "kind": "reference", "referenceId": "task"}
]"#;

fn main() -> Result<()> {
    let store = InMemoryBlockStore::new();
    let saved = store.create("demo-user", "explainer", parse_blocks(BLOCKS)?)?;
    println!("saved {} (version {}) with {} blocks", saved.id, saved.version, saved.blocks.len());

    let values = serde_json::to_string(&HashMap::from([
        ("topic", "photosynthesis"),
        ("audience", "ten year olds"),
    ]))?;
    let assembled = assemble_json(&serde_json::to_string(&saved.blocks)?, &values)?;
    println!("---- assembled ({} words) ----\n{}\n", assembled.token_count(&count_tokens_by_words), assembled.text);
    println!("variables: {:?}, unresolved: {:?}\n", assembled.variables, assembled.unresolved());

    let analyzer = PromptAnalyzer::default();
    let (analysis, optimized) = analyzer.optimize(&assembled.text);
    println!("---- analysis ----\n{}\n", serde_json::to_string_pretty(&analysis)?);
    println!("---- optimized ----\n{}", optimized);
    Ok(())
}
