use thiserror::Error;

use crate::types::LabelId;

/// Failure reported by a host capability. The engine absorbs these into the
/// conversation, speaking the `Display` text to the player.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Thou hast no room for me in thy party! Seek me again if one of thy members doth leave.")]
    PartyFull,
    #[error("Thou hast not that much gold!")]
    NotEnoughGold,
    #[error("{0}")]
    Refused(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TalkError {
    #[error("Script is malformed: {message}")]
    ScriptMalformed { message: String },
    #[error("Label {label} is not defined in this script.")]
    LabelNotFound { label: LabelId },
    #[error("Conversation is not active.")]
    InactiveConversation,
    #[error("No input is pending.")]
    NoPendingInput,
    #[error("Capability failed: {0}")]
    Capability(#[from] CapabilityError),
    #[error("Execution guard exceeded {max_steps} steps.")]
    GuardExceeded { max_steps: usize },
}

impl TalkError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::ScriptMalformed {
            message: message.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ScriptMalformed { .. } => "TALK_SCRIPT_MALFORMED",
            Self::LabelNotFound { .. } => "TALK_LABEL_NOT_FOUND",
            Self::InactiveConversation => "TALK_INACTIVE_CONVERSATION",
            Self::NoPendingInput => "TALK_NO_PENDING_INPUT",
            Self::Capability(_) => "TALK_CAPABILITY",
            Self::GuardExceeded { .. } => "TALK_GUARD_EXCEEDED",
        }
    }

    /// Structural errors end the conversation; everything else leaves it as is.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ScriptMalformed { .. } | Self::LabelNotFound { .. } | Self::GuardExceeded { .. }
        )
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            TalkError::LabelNotFound { label: LabelId(3) }.code(),
            "TALK_LABEL_NOT_FOUND"
        );
        assert_eq!(
            TalkError::InactiveConversation.code(),
            "TALK_INACTIVE_CONVERSATION"
        );
        assert_eq!(
            TalkError::from(CapabilityError::PartyFull).code(),
            "TALK_CAPABILITY"
        );
    }

    #[test]
    fn only_structural_errors_are_fatal() {
        assert!(TalkError::malformed("short").is_fatal());
        assert!(TalkError::LabelNotFound { label: LabelId(1) }.is_fatal());
        assert!(TalkError::GuardExceeded { max_steps: 1 }.is_fatal());
        assert!(!TalkError::InactiveConversation.is_fatal());
        assert!(!TalkError::Capability(CapabilityError::NotEnoughGold).is_fatal());
    }

    #[test]
    fn capability_error_text_is_speakable() {
        assert!(CapabilityError::PartyFull.to_string().contains("no room"));
        assert_eq!(
            CapabilityError::Refused("Nay.".to_string()).to_string(),
            "Nay."
        );
    }
}
