use serde::{Deserialize, Serialize};

use crate::error::TalkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputKind {
    /// Free text matched against keywords.
    Topic,
    /// The player's name, checked against the avatar's.
    Name,
    /// A gold amount.
    Gold,
    /// Any reply; only acknowledges the text so far.
    Acknowledge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TalkWarning {
    UnknownCommand { code: u8 },
}

/// One fragment of conversation produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TalkOutput {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        rune: bool,
    },
    NewLine,
    Pause,
    Warning {
        warning: TalkWarning,
    },
    Input {
        input: InputKind,
        prompt: String,
    },
    Error {
        code: String,
        message: String,
    },
    End,
}

impl TalkOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            rune: false,
        }
    }

    pub fn error(error: &TalkError) -> Self {
        Self::Error {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }

    /// Appends the displayable part of this fragment.
    pub fn render_into(&self, out: &mut String) {
        match self {
            Self::Text { text, .. } => out.push_str(text),
            Self::NewLine => out.push('\n'),
            _ => {}
        }
    }

    /// Input requests and the end stop a run; an error is always followed
    /// by the end.
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Input { .. } | Self::End)
    }
}
