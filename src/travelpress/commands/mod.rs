use crate::auth::User;
use crate::config::PressConfig;
use crate::model::Article;
use std::path::PathBuf;

pub mod config;
pub mod delete;
pub mod export;
pub mod list;
pub mod login;
pub mod publish;
pub mod revise;
pub mod view;

/// Where travelpress keeps its files.
#[derive(Debug, Clone)]
pub struct PressPaths {
    pub data_dir: PathBuf,
}

impl PressPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Position of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based
    pub number: usize,
    pub page_size: usize,
    pub has_next: bool,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_articles: Vec<Article>,
    pub listed_articles: Vec<Article>,
    pub page: Option<PageInfo>,
    pub user: Option<User>,
    pub config: Option<PressConfig>,
    /// Rendered text for the caller to print verbatim.
    pub output: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_articles(mut self, articles: Vec<Article>) -> Self {
        self.affected_articles = articles;
        self
    }

    pub fn with_listed_articles(mut self, articles: Vec<Article>) -> Self {
        self.listed_articles = articles;
        self
    }

    pub fn with_page(mut self, page: PageInfo) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_config(mut self, config: PressConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = Some(output);
        self
    }
}
