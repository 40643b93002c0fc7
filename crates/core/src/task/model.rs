//! Task model definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Category of a task
///
/// The task schema accepts exactly these four values; anything else is
/// rejected before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Do,
    Buy,
    Sell,
    Check,
}

impl TaskKind {
    /// Parse a wire-format category; values match the document schema
    /// exactly, with no case folding or trimming
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "do" => Ok(Self::Do),
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "check" => Ok(Self::Check),
            _ => Err(Error::InvalidInput(format!(
                "type must be one of do, buy, sell, check (got '{}')",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Do => "do",
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Check => "check",
        }
    }
}

/// A task in the list
///
/// The category field is named `kind` here and serialized as `type`, which
/// is the wire and document field name (`type` is a Rust keyword).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub shop: Option<String>,
    #[serde(default)]
    pub extra: Option<String>,
    pub completed: bool,
}

impl Task {
    /// Create a new task with the required fields
    ///
    /// The id is generated here, when the record is constructed; the store
    /// treats it as immutable afterwards.
    pub fn new(name: impl Into<String>, kind: TaskKind, completed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            shop: None,
            extra: None,
            completed,
        }
    }

    /// Set the shop
    pub fn with_shop(mut self, shop: impl Into<String>) -> Self {
        self.shop = Some(shop.into());
        self
    }

    /// Set the extra note
    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}
