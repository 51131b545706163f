use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    /// Blocking dialog the user has to dismiss.
    Alert,
    /// Inline banner.
    Notice,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub text: String,
}

impl Flash {
    pub fn alert(text: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Alert, text: text.into() }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Flash { kind: FlashKind::Notice, text: text.into() }
    }
}
