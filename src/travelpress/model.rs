use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const WORDS_PER_MINUTE: usize = 200;
const DESCRIPTION_CHARS: usize = 160;
const TOC_WORDS: usize = 7;
const NEW_FOR_DAYS: i64 = 7;
const TRENDING_VIEWS: u64 = 100;

/// One content unit of an article body.
///
/// Serialized with a `type` tag so stored documents read as
/// `{"type":"text","value":"..."}` and `{"type":"image","url":"...","caption":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text {
        #[serde(default)]
        value: String,
    },
    Image {
        /// Empty until an upload has completed.
        #[serde(default)]
        url: String,
        #[serde(default)]
        caption: String,
    },
}

impl Block {
    pub fn text(value: impl Into<String>) -> Self {
        Block::Text {
            value: value.into(),
        }
    }

    pub fn image(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Block::Image {
            url: url.into(),
            caption: caption.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Block::Text { .. } => "text",
            Block::Image { .. } => "image",
        }
    }
}

/// Store-assigned document id. Never changes once an article exists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(String);

impl ArticleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArticleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An article as written by the publisher, before the store has given it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub province: String,
    pub blocks: Vec<Block>,
    pub author: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    pub author: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub block_index: usize,
    pub title: String,
}

impl Article {
    pub fn from_new(id: ArticleId, new: NewArticle) -> Self {
        Self {
            id,
            title: new.title,
            province: new.province,
            blocks: new.blocks,
            author: new.author,
            owner_id: new.owner_id,
            created_at: new.created_at,
            views: 0,
        }
    }

    fn text_values(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Text { value } => Some(value.as_str()),
            Block::Image { .. } => None,
        })
    }

    /// Minutes to read the text blocks, never less than one.
    pub fn reading_time_minutes(&self) -> usize {
        let words: usize = self.text_values().map(|v| v.split_whitespace().count()).sum();
        words.div_ceil(WORDS_PER_MINUTE).max(1)
    }

    /// Leading text of the article, used as page description and card excerpt.
    pub fn description(&self) -> String {
        self.text_values()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(DESCRIPTION_CHARS)
            .collect()
    }

    pub fn table_of_contents(&self) -> Vec<TocEntry> {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(i, b)| match b {
                Block::Text { value } => Some(TocEntry {
                    block_index: i,
                    title: summarize_heading(value),
                }),
                Block::Image { .. } => None,
            })
            .collect()
    }

    pub fn featured_image(&self) -> Option<&str> {
        self.blocks.iter().find_map(|b| match b {
            Block::Image { url, .. } if !url.is_empty() => Some(url.as_str()),
            _ => None,
        })
    }

    pub fn is_new(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at) <= Duration::days(NEW_FOR_DAYS)
    }

    pub fn is_trending(&self) -> bool {
        self.views >= TRENDING_VIEWS
    }
}

/// First sentence of a paragraph, cut to a handful of words.
fn summarize_heading(text: &str) -> String {
    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return "Section".to_string();
    }
    let first = clean.split('.').next().unwrap_or_default();
    let words = first
        .split_whitespace()
        .take(TOC_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() < first.len() {
        format!("{}…", words)
    } else {
        words
    }
}
