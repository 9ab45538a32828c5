//! Caller-supplied descriptive envelope of a memory.

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};

/// Highest allowed importance score.
pub const MAX_IMPORTANCE: u8 = 100;

/// Kind of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Conversation,
    Learning,
    Preference,
    Task,
    Knowledge,
    Relationship,
    System,
}

impl MemoryType {
    /// Return a stable string tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Conversation => "conversation",
            Self::Learning => "learning",
            Self::Preference => "preference",
            Self::Task => "task",
            Self::Knowledge => "knowledge",
            Self::Relationship => "relationship",
            Self::System => "system",
        }
    }
}

impl std::str::FromStr for MemoryType {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "conversation" => Ok(Self::Conversation),
            "learning" => Ok(Self::Learning),
            "preference" => Ok(Self::Preference),
            "task" => Ok(Self::Task),
            "knowledge" => Ok(Self::Knowledge),
            "relationship" => Ok(Self::Relationship),
            "system" => Ok(Self::System),
            other => Err(IdentityError::InvalidMetadata(format!(
                "unknown memory type: {other}"
            ))),
        }
    }
}

/// A tag. Opaque to the core; either a small integer or a short string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryTag {
    Number(i64),
    Text(String),
}

impl From<&str> for MemoryTag {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MemoryTag {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for MemoryTag {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Metadata covered in full by a memory signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetadata {
    pub memory_type: MemoryType,
    /// 0–100.
    pub importance: u8,
    /// Caller order is preserved and signed as-is.
    #[serde(default)]
    pub tags: Vec<MemoryTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_cid: Option<String>,
}

impl MemoryMetadata {
    pub fn new(memory_type: MemoryType, importance: u8) -> Self {
        Self {
            memory_type,
            importance,
            tags: Vec::new(),
            ipfs_cid: None,
        }
    }

    pub fn tag(mut self, tag: impl Into<MemoryTag>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn ipfs_cid(mut self, cid: impl Into<String>) -> Self {
        self.ipfs_cid = Some(cid.into());
        self
    }

    /// Reject importance scores above [`MAX_IMPORTANCE`].
    pub fn validate(&self) -> Result<()> {
        if self.importance > MAX_IMPORTANCE {
            return Err(IdentityError::InvalidMetadata(format!(
                "importance {} exceeds {MAX_IMPORTANCE}",
                self.importance
            )));
        }
        Ok(())
    }
}
