//! # Collaborators
//! Boundaries to the outside world. Nothing in the assembler or analyzer calls these; callers load block lists from
//! a [BlockStore], hand them to [assemble](crate::assembler::assemble), and may send the result to a preview
//! generator.
//!
//! * [BlockStore]: saved prompts (named block lists) per owner, with a linear version number
//! * [GeneratePreview] / [AsyncGeneratePreview]: turns an assembled prompt into a model reply for a live preview

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::assembler::{validate_blocks, AssemblyResult};
use crate::block::Block;

/// A named block list owned by someone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPrompt {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub blocks: Vec<Block>,
    /// Starts at 1, incremented by every update
    pub version: u32,
}

/// Persistence of block lists keyed by owner.
pub trait BlockStore {
    fn create(&self, owner: &str, name: &str, blocks: Vec<Block>) -> Result<SavedPrompt>;
    fn list(&self, owner: &str) -> Result<Vec<SavedPrompt>>;
    fn load(&self, owner: &str, id: &str) -> Result<SavedPrompt>;
    /// Replace the blocks of a saved prompt and bump its version.
    fn update(&self, owner: &str, id: &str, blocks: Vec<Block>) -> Result<SavedPrompt>;
    fn delete(&self, owner: &str, id: &str) -> Result<()>;
}

/// [BlockStore] kept in memory. Safe to share between threads.
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    prompts: RwLock<HashMap<String, SavedPrompt>>,
    next_id: AtomicU64,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("block store lock is poisoned")
}

impl BlockStore for InMemoryBlockStore {
    fn create(&self, owner: &str, name: &str, blocks: Vec<Block>) -> Result<SavedPrompt> {
        validate_blocks(&blocks)?;
        let id = format!("prompt-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let saved = SavedPrompt {
            id: id.clone(),
            owner: owner.to_string(),
            name: name.to_string(),
            blocks,
            version: 1,
        };
        self.prompts.write().map_err(poisoned)?.insert(id, saved.clone());
        debug!("Created prompt {} for owner {}", saved.id, owner);
        Ok(saved)
    }

    fn list(&self, owner: &str) -> Result<Vec<SavedPrompt>> {
        let prompts = self.prompts.read().map_err(poisoned)?;
        let mut owned: Vec<SavedPrompt> = prompts.values().filter(|p| p.owner == owner).cloned().collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }

    fn load(&self, owner: &str, id: &str) -> Result<SavedPrompt> {
        let prompts = self.prompts.read().map_err(poisoned)?;
        match prompts.get(id) {
            Some(saved) if saved.owner == owner => Ok(saved.clone()),
            _ => Err(anyhow!("prompt {} not found for owner {}", id, owner)),
        }
    }

    fn update(&self, owner: &str, id: &str, blocks: Vec<Block>) -> Result<SavedPrompt> {
        validate_blocks(&blocks)?;
        let mut prompts = self.prompts.write().map_err(poisoned)?;
        match prompts.get_mut(id) {
            Some(saved) if saved.owner == owner => {
                saved.blocks = blocks;
                saved.version += 1;
                Ok(saved.clone())
            }
            _ => Err(anyhow!("prompt {} not found for owner {}", id, owner)),
        }
    }

    fn delete(&self, owner: &str, id: &str) -> Result<()> {
        let mut prompts = self.prompts.write().map_err(poisoned)?;
        if !prompts.get(id).is_some_and(|saved| saved.owner == owner) {
            bail!("prompt {} not found for owner {}", id, owner);
        }
        prompts.remove(id);
        debug!("Deleted prompt {} of owner {}", id, owner);
        Ok(())
    }
}

/// Request to the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub prompt: String,
}

/// Reply of the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub content: String,
}

//TODO: when async fn in trait is usable with dyn, remove async_trait macro

/// Trait for generating a preview reply for a prompt.
pub trait GeneratePreview {
    fn generate(&self, request: &PreviewRequest) -> Result<PreviewResponse>;
}

/// Blanket impl of GeneratePreview for Fn(&str) -> Result<String>.
impl<F> GeneratePreview for F where F: Fn(&str) -> Result<String> {
    fn generate(&self, request: &PreviewRequest) -> Result<PreviewResponse> {
        self(&request.prompt).map(|content| PreviewResponse { content })
    }
}

/// Async version of GeneratePreview trait.
#[async_trait]
pub trait AsyncGeneratePreview {
    async fn generate(&self, request: &PreviewRequest) -> Result<PreviewResponse>;
}

/// Blanket impl of AsyncGeneratePreview for GeneratePreview trait.
#[async_trait]
impl<T: GeneratePreview + Sync> AsyncGeneratePreview for T {
    async fn generate(&self, request: &PreviewRequest) -> Result<PreviewResponse> {
        GeneratePreview::generate(self, request)
    }
}

/// Send an assembled prompt to `generator`. Fails on an empty prompt without calling the generator.
pub async fn preview_assembled<G>(generator: &G, assembled: &AssemblyResult) -> Result<PreviewResponse>
    where G: AsyncGeneratePreview + Sync + ?Sized {
    if assembled.text.trim().is_empty() {
        bail!("nothing to preview: the assembled prompt is empty");
    }
    let unresolved = assembled.unresolved();
    if !unresolved.is_empty() {
        warn!("Previewing a prompt with unresolved variables: {:?}", unresolved);
    }
    let request = PreviewRequest { prompt: assembled.text.clone() };
    AsyncGeneratePreview::generate(generator, &request).await
}
