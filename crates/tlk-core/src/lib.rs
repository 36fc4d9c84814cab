pub mod error;
pub mod output;
pub mod phrases;
pub mod script;
pub mod types;

pub use error::{CapabilityError, TalkError};
pub use output::{InputKind, TalkOutput, TalkWarning};
pub use script::{LabelRegistry, LineRef, Script, ScriptData};
pub use types::*;
