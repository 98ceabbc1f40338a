//! # Block Sequence Composer
//!
//! The composer is the mutable, in-memory list of blocks an author works on,
//! both for a brand-new article and for a Working Draft of an existing one.
//!
//! ## Stable Block Ids
//!
//! Every draft block gets a [`BlockId`] when it is created. Anything transient
//! about a block (its pending file, its upload progress) is keyed by that id,
//! never by position. Removing block 2 therefore cannot make block 3 inherit
//! block 2's progress bar: positions shift, ids do not.
//!
//! ## Ordering
//!
//! Relative order is stable under every operation. `remove` is the only
//! operation that changes positions, and it compacts the sequence.

use crate::error::{PressError, Result};
use crate::imaging::ImageFile;
use crate::model::Block;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftContent {
    Text {
        value: String,
    },
    Image {
        url: String,
        caption: String,
        /// Selected but not yet uploaded.
        pending: Option<ImageFile>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftBlock {
    pub id: BlockId,
    pub content: DraftContent,
}

impl DraftBlock {
    fn new(content: DraftContent) -> Self {
        Self {
            id: BlockId::generate(),
            content,
        }
    }

    fn from_block(block: &Block) -> Self {
        let content = match block {
            Block::Text { value } => DraftContent::Text {
                value: value.clone(),
            },
            Block::Image { url, caption } => DraftContent::Image {
                url: url.clone(),
                caption: caption.clone(),
                pending: None,
            },
        };
        Self::new(content)
    }

    /// The persistable form, with authoring-only fields dropped.
    pub fn to_block(&self) -> Block {
        match &self.content {
            DraftContent::Text { value } => Block::text(value.clone()),
            DraftContent::Image { url, caption, .. } => Block::image(url.clone(), caption.clone()),
        }
    }

    pub fn pending_file(&self) -> Option<&ImageFile> {
        match &self.content {
            DraftContent::Image { pending, .. } => pending.as_ref(),
            DraftContent::Text { .. } => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.content, DraftContent::Text { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    blocks: Vec<DraftBlock>,
    progress: HashMap<BlockId, u8>,
}

impl Default for Composer {
    /// A fresh editor starts with one empty paragraph.
    fn default() -> Self {
        let mut composer = Self::empty();
        composer.append_text();
        composer
    }
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self {
            blocks: Vec::new(),
            progress: HashMap::new(),
        }
    }

    /// Deep copy of persisted blocks. Nothing is shared with `blocks`.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        Self {
            blocks: blocks.iter().map(DraftBlock::from_block).collect(),
            progress: HashMap::new(),
        }
    }

    pub fn append_text(&mut self) -> BlockId {
        self.push(DraftContent::Text {
            value: String::new(),
        })
    }

    pub fn append_image(&mut self) -> BlockId {
        self.push(DraftContent::Image {
            url: String::new(),
            caption: String::new(),
            pending: None,
        })
    }

    fn push(&mut self, content: DraftContent) -> BlockId {
        let block = DraftBlock::new(content);
        let id = block.id;
        self.blocks.push(block);
        id
    }

    pub fn update_text(&mut self, index: usize, new_value: impl Into<String>) -> Result<()> {
        match &mut self.block_mut(index)?.content {
            DraftContent::Text { value } => {
                *value = new_value.into();
                Ok(())
            }
            DraftContent::Image { .. } => Err(PressError::BlockKind {
                index,
                expected: "text",
            }),
        }
    }

    pub fn update_image_caption(&mut self, index: usize, new_caption: impl Into<String>) -> Result<()> {
        match &mut self.block_mut(index)?.content {
            DraftContent::Image { caption, .. } => {
                *caption = new_caption.into();
                Ok(())
            }
            DraftContent::Text { .. } => Err(PressError::BlockKind {
                index,
                expected: "image",
            }),
        }
    }

    /// Select a file for the image block at `index`, replacing any earlier selection.
    pub fn attach_file(&mut self, index: usize, file: ImageFile) -> Result<()> {
        match &mut self.block_mut(index)?.content {
            DraftContent::Image { pending, .. } => {
                *pending = Some(file);
                Ok(())
            }
            DraftContent::Text { .. } => Err(PressError::BlockKind {
                index,
                expected: "image",
            }),
        }
    }

    /// Record a finished upload: the block now carries `new_url` and has nothing pending.
    pub fn set_uploaded_url(&mut self, id: BlockId, new_url: impl Into<String>) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| PressError::Api(format!("Unknown block {}", id)))?;
        match &mut self.blocks[index].content {
            DraftContent::Image { url, pending, .. } => {
                *url = new_url.into();
                *pending = None;
                Ok(())
            }
            DraftContent::Text { .. } => Err(PressError::BlockKind {
                index,
                expected: "image",
            }),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<DraftBlock> {
        if index >= self.blocks.len() {
            return Err(PressError::BlockIndex {
                index,
                len: self.blocks.len(),
            });
        }
        let removed = self.blocks.remove(index);
        self.progress.remove(&removed.id);
        Ok(removed)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, index: usize) -> Option<&DraftBlock> {
        self.blocks.get(index)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn blocks(&self) -> &[DraftBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn has_pending_uploads(&self) -> bool {
        self.blocks.iter().any(|b| b.pending_file().is_some())
    }

    pub fn to_blocks(&self) -> Vec<Block> {
        self.blocks.iter().map(DraftBlock::to_block).collect()
    }

    pub fn set_progress(&mut self, id: BlockId, percent: u8) {
        self.progress.insert(id, percent.min(100));
    }

    pub fn progress(&self, id: BlockId) -> Option<u8> {
        self.progress.get(&id).copied()
    }

    pub fn clear_progress(&mut self) {
        self.progress.clear();
    }

    fn block_mut(&mut self, index: usize) -> Result<&mut DraftBlock> {
        let len = self.blocks.len();
        self.blocks
            .get_mut(index)
            .ok_or(PressError::BlockIndex { index, len })
    }
}
