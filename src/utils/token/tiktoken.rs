use std::collections::HashMap;
use anyhow::{bail, Result};
pub use tiktoken_rs::{get_bpe_from_model, CoreBPE};

use crate::utils::token::CountToken;
use lazy_static::lazy_static;

lazy_static! {
    /// const map from model name to max tokens.
    pub static ref MODEL_TO_MAX_TOKENS: HashMap<&'static str, usize> = HashMap::from([
        ("gpt-4", 8192),
        ("gpt-4-0613", 8192),
        ("gpt-4-32k", 32768),
        ("gpt-4-32k-0613", 32768),
        ("gpt-3.5-turbo", 4096),
        ("gpt-3.5-turbo-16k", 16384),
        ("gpt-3.5-turbo-0613", 4096),
        ("gpt-3.5-turbo-16k-0613", 16384),
    ]);
}

/// Counter using the Tiktoken tokenizer.
#[derive(Clone)]
#[readonly::make]
pub struct Tiktoken {
    /// The model name of the tokenizer. read-only.
    #[readonly]
    pub model: String,
    /// The context window of the model. read-only.
    #[readonly]
    pub max_tokens: usize,
    /// The tokenizer. read-only.
    #[readonly]
    pub bpe: CoreBPE,
}

impl Tiktoken {
    /// Create a new Tiktoken counter. Returns an error if the model is not supported.
    pub fn new(model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        let Some(max_tokens) = MODEL_TO_MAX_TOKENS.get(model.as_str()).copied() else {
            bail!("model {} is not supported", model);
        };
        let family = if model.starts_with("gpt-4-32k") {
            "gpt-4-32k"
        } else if model.starts_with("gpt-4") {
            "gpt-4"
        } else {
            "gpt-3.5-turbo"
        };
        let bpe = get_bpe_from_model(family)?;
        Ok(Tiktoken {
            model,
            max_tokens,
            bpe,
        })
    }

    /// Whether `prompt` fits in the context window of the model, leaving `reserved` tokens for the reply.
    pub fn fits(&self, prompt: &str, reserved: usize) -> bool {
        self.count_token(prompt) + reserved <= self.max_tokens
    }
}

impl CountToken for Tiktoken {
    fn count_token(&self, string: &str) -> usize {
        self.bpe.encode_with_special_tokens(string).len()
    }
}
