mod step;
mod stream;

use std::sync::Arc;

use tlk_core::Script;
use tlk_runtime::{TalkCapabilities, TalkEngineOptions};

pub use step::{Conversation, Response};
pub use stream::{spawn_conversation, ConversationStream, StreamOptions, DEFAULT_OUTPUT_BUFFER};

/// Options for a conversation with the default step guard.
pub fn engine_options(
    script: Arc<Script>,
    capabilities: Arc<dyn TalkCapabilities>,
) -> TalkEngineOptions {
    TalkEngineOptions {
        script,
        capabilities,
        max_steps: None,
    }
}

/// Parses a JSON script, ready to be shared by any number of conversations.
pub fn load_script(raw: &str) -> Result<Arc<Script>, tlk_core::TalkError> {
    Script::from_json(raw).map(Arc::new)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_script_rejects_short_scripts() {
        let error = load_script(r#"{"lines":[[],[]]}"#).expect_err("two lines should fail");
        assert_eq!(error.code(), "TALK_SCRIPT_MALFORMED");
    }

    #[test]
    fn load_script_reads_tagged_commands() {
        let raw = r#"{
            "lines": [
                [{"kind":"text","text":"Iolo"}],
                [{"kind":"text","text":"a bard"}],
                [],
                [],
                [{"kind":"text","text":"Fare thee well."}]
            ],
            "questions": [
                {"keywords":["LUTE"],"response":[{"kind":"text","text":"A fine lute."}]}
            ]
        }"#;
        let script = load_script(raw).expect("script should load");
        assert_eq!(script.line_count(), 5);
        assert_eq!(script.questions()[0].keywords, vec!["LUTE"]);
    }
}
