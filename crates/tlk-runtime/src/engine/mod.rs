mod boundary;
mod control_flow;
mod dispatch;
mod lifecycle;
mod step;

pub use lifecycle::{
    ConversationState, SkipInstruction, TalkEngine, TalkEngineOptions, DEFAULT_MAX_STEPS,
};
pub use step::prompt_for;
