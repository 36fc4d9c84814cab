mod capability;
mod engine;
pub mod host;
pub mod keyword;

pub use capability::TalkCapabilities;
pub use engine::{
    prompt_for, ConversationState, SkipInstruction, TalkEngine, TalkEngineOptions,
    DEFAULT_MAX_STEPS,
};
pub use host::{CapabilityCall, MemoryHost};
pub use keyword::{KeywordResolver, Resolution};
