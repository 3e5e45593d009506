//! Message templates and the sources they are loaded from.
//!
//! The template file is a small JSON document meant to be edited by hand:
//!
//! ```json
//! {
//!   "join_message": { "text": "Player $(player) joined ...", "color": "yellow" },
//!   "first_time_message": { "text": "$(player) joined the game. ...", "color": "green" }
//! }
//! ```
//!
//! [`FileTemplateSource`] writes the built-in defaults the first time it is
//! asked for templates and the file does not exist. Loading never fails:
//! a missing or broken file degrades to the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::template::{self, Color, Substitutions};

/// Default template file location, relative to the working directory.
pub const DEFAULT_MESSAGES_PATH: &str = "config/lastseen/messages.json";

/// Errors that can occur when loading the template file.
#[derive(Debug, thiserror::Error)]
pub enum MessagesError {
    /// Reading, creating, or writing the file failed.
    #[error("template file I/O error on {}: {source}", path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not a valid template document.
    #[error("failed to parse template file {}: {source}", path.display())]
    Parse {
        /// Path of the template file.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The defaults could not be serialized.
    #[error("failed to serialize default templates: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which of the two templates an arrival uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// The member has a recorded departure from this scope.
    Join,
    /// The member has never been seen leaving this scope.
    FirstTime,
}

impl TemplateKind {
    /// Key of this template in the template file.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Join => "join_message",
            Self::FirstTime => "first_time_message",
        }
    }
}

/// One template: text with `$(key)` placeholders plus a color name.
///
/// `text` is required: an entry without it has nothing to show, and the
/// file is rejected as a whole. A missing `color` renders white.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// Template text.
    pub text: String,
    /// Color name, case-insensitive. Unknown names render white.
    #[serde(default = "default_color")]
    pub color: String,
}

impl MessageEntry {
    /// Create an entry from text and a color name.
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
        }
    }

    /// Render the text and resolve the color.
    pub fn render(&self, substitutions: &Substitutions) -> (String, Color) {
        (
            template::render(&self.text, substitutions),
            Color::from_name(&self.color),
        )
    }
}

/// The complete template document.
///
/// An entry missing from the file falls back to its built-in default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Template for a member returning after a recorded departure.
    #[serde(default = "default_join_message")]
    pub join_message: MessageEntry,
    /// Template for a member with no recorded departure.
    #[serde(default = "default_first_time_message")]
    pub first_time_message: MessageEntry,
}

impl MessageConfig {
    /// The template to use for `kind`.
    pub const fn entry(&self, kind: TemplateKind) -> &MessageEntry {
        match kind {
            TemplateKind::Join => &self.join_message,
            TemplateKind::FirstTime => &self.first_time_message,
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            join_message: default_join_message(),
            first_time_message: default_first_time_message(),
        }
    }
}

fn default_color() -> String {
    Color::White.name().to_owned()
}

fn default_join_message() -> MessageEntry {
    MessageEntry::new(
        "Player $(player) joined at $(date) $(time), last seen $(since) ago on $(server).",
        "yellow",
    )
}

fn default_first_time_message() -> MessageEntry {
    MessageEntry::new(
        "$(player) joined the game. (First time seen on this server)",
        "green",
    )
}

/// Something that supplies the current templates.
///
/// Called once per rendered notification, so edits to a backing file take
/// effect without restarting the host.
pub trait TemplateSource {
    /// The templates to render with. Never fails.
    fn load(&self) -> MessageConfig;
}

/// A fixed set of templates held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateSource(pub MessageConfig);

impl TemplateSource for StaticTemplateSource {
    fn load(&self) -> MessageConfig {
        self.0.clone()
    }
}

/// Templates read from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    /// Create a source bound to `path`. Does not touch the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the template file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default templates if the file does not exist yet.
    ///
    /// Returns `true` if the file was created.
    pub fn ensure_exists(&self) -> Result<bool, MessagesError> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| MessagesError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(&MessageConfig::default())?;
        std::fs::write(&self.path, contents).map_err(|source| MessagesError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), "Wrote default message templates");
        Ok(true)
    }

    /// Load the templates, reporting any failure to the caller.
    pub fn try_load(&self) -> Result<MessageConfig, MessagesError> {
        if let Err(e) = self.ensure_exists() {
            tracing::warn!(error = %e, "could not create default template file");
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| MessagesError::Io {
            path: self.path.clone(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| MessagesError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl Default for FileTemplateSource {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGES_PATH)
    }
}

impl TemplateSource for FileTemplateSource {
    fn load(&self) -> MessageConfig {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using built-in message templates");
            MessageConfig::default()
        })
    }
}
