use std::sync::Arc;

use tlk_core::{InputKind, NpcId, Script, TalkError, TalkOutput, TalkWarning};
use tlk_runtime::{TalkCapabilities, TalkEngine, TalkEngineOptions};

/// Everything a step produced, up to and including the boundary that ended it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Rendered text: text fragments and line breaks.
    pub output: String,
    /// Every fragment in order, boundary last.
    pub fragments: Vec<TalkOutput>,
    pub needs_input: bool,
    pub prompt: Option<String>,
    pub input_kind: Option<InputKind>,
    pub complete: bool,
    pub error: Option<TalkError>,
    pub warnings: Vec<TalkWarning>,
}

impl Response {
    fn rejected(error: TalkError, complete: bool) -> Self {
        Self {
            complete,
            error: Some(error),
            ..Self::default()
        }
    }
}

/// Call-and-return driver: each call runs the engine until it needs input
/// or the conversation ends, then returns. Never blocks.
pub struct Conversation {
    engine: TalkEngine,
}

impl Conversation {
    pub fn new(options: TalkEngineOptions) -> Self {
        Self {
            engine: TalkEngine::new(options),
        }
    }

    pub fn with_script(script: Arc<Script>, capabilities: Arc<dyn TalkCapabilities>) -> Self {
        Self::new(crate::engine_options(script, capabilities))
    }

    pub fn start(&mut self, npc: NpcId) -> Response {
        if let Err(error) = self.engine.start(npc) {
            return Response::rejected(error, true);
        }
        self.run_to_boundary()
    }

    /// Input after the conversation ended is reported in the response and
    /// leaves the conversation untouched.
    pub fn process_input(&mut self, text: &str) -> Response {
        if let Err(error) = self.engine.submit_input(text) {
            return Response::rejected(error, !self.engine.is_active());
        }
        self.run_to_boundary()
    }

    pub fn cancel(&mut self) {
        self.engine.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn engine(&self) -> &TalkEngine {
        &self.engine
    }

    fn run_to_boundary(&mut self) -> Response {
        let mut response = Response::default();
        loop {
            let output = match self.engine.next_output() {
                Ok(output) => output,
                Err(error) => {
                    response.fragments.push(TalkOutput::error(&error));
                    let fatal = error.is_fatal();
                    response.error = Some(error);
                    // A fatal error has terminated the engine; the end follows.
                    if fatal {
                        continue;
                    }
                    return response;
                }
            };

            match &output {
                TalkOutput::Input { input, prompt } => {
                    response.needs_input = true;
                    response.input_kind = Some(*input);
                    response.prompt = Some(prompt.clone());
                }
                TalkOutput::End => response.complete = true,
                TalkOutput::Warning { warning } => response.warnings.push(warning.clone()),
                _ => output.render_into(&mut response.output),
            }
            let boundary = output.is_boundary();
            response.fragments.push(output);
            if boundary {
                return response;
            }
        }
    }
}

#[cfg(test)]
mod step_tests {
    use super::*;
    use crate::test_support::{init_logging, treanna};
    use tlk_core::SideEffect;
    use tlk_runtime::MemoryHost;

    const TREANNA: NpcId = NpcId(7);

    fn conversation(host: &Arc<MemoryHost>) -> Conversation {
        init_logging();
        Conversation::with_script(treanna(), host.clone())
    }

    #[test]
    fn start_requests_topic_after_introduction() {
        let host = Arc::new(MemoryHost::new("Avatar"));
        let mut talk = conversation(&host);
        let response = talk.start(TREANNA);

        assert!(response.output.contains("a mysterious woman in flowing robes"));
        assert!(response.output.contains("I am called Treanna"));
        assert!(response.needs_input);
        assert_eq!(response.prompt.as_deref(), Some("Your interest?"));
        assert_eq!(response.input_kind, Some(InputKind::Topic));
        assert!(!response.complete);
        assert_eq!(response.error, None);
    }

    #[test]
    fn known_player_hears_greeting_instead_of_introduction() {
        let host = Arc::new(MemoryHost::new("Avatar").with_met(TREANNA));
        let mut talk = conversation(&host);
        let response = talk.start(TREANNA);

        assert!(response.output.contains("Welcome back, Avatar!"));
        assert!(!response.output.contains("I am called"));
    }

    #[test]
    fn virtue_then_join_completes_conversation() {
        let host = Arc::new(MemoryHost::new("Avatar"));
        let mut talk = conversation(&host);
        talk.start(TREANNA);

        let response = talk.process_input("VIRTUE");
        assert!(response.output.contains("The Eight Virtues"));
        assert!(response.needs_input);
        assert_eq!(host.count(SideEffect::IncreaseKarma), 1);

        let response = talk.process_input("JOIN");
        assert!(response.output.contains("honoured to join thee"));
        assert!(response.complete);
        assert!(!response.needs_input);
        assert_eq!(response.fragments.last(), Some(&TalkOutput::End));
        assert_eq!(host.count(SideEffect::JoinParty), 1);

        let response = talk.process_input("VIRTUE");
        assert_eq!(response.error, Some(TalkError::InactiveConversation));
        assert!(response.complete);
        assert!(response.output.is_empty());
    }

    #[test]
    fn acknowledgement_resumes_the_same_line() {
        let host = Arc::new(MemoryHost::new("Avatar"));
        let mut talk = conversation(&host);
        talk.start(TREANNA);

        let response = talk.process_input("listen");
        assert_eq!(response.output, "Hear me.");
        assert_eq!(response.input_kind, Some(InputKind::Acknowledge));
        let response = talk.process_input("");
        assert_eq!(response.output, "Go.\n");
        assert_eq!(response.input_kind, Some(InputKind::Topic));
    }

    #[test]
    fn fatal_error_is_reported_then_conversation_ends() {
        let host = Arc::new(MemoryHost::new("Avatar"));
        let mut talk = conversation(&host);
        talk.start(TREANNA);

        let response = talk.process_input("lost");
        assert_eq!(
            response.error,
            Some(TalkError::LabelNotFound {
                label: tlk_core::LabelId(4)
            })
        );
        assert!(response.complete);
        assert!(!response.needs_input);
        assert!(!talk.is_active());
    }

    #[test]
    fn speaking_loop_returns_with_guard_error() {
        let host = Arc::new(MemoryHost::new("Avatar"));
        let mut talk = Conversation::new(TalkEngineOptions {
            max_steps: Some(400),
            ..crate::engine_options(treanna(), host.clone())
        });
        init_logging();
        talk.start(TREANNA);

        let response = talk.process_input("echo");
        assert_eq!(
            response.error,
            Some(TalkError::GuardExceeded { max_steps: 400 })
        );
        assert!(response.output.starts_with("again again "));
        assert!(response.output.len() < 400 * "again ".len());
        assert!(response.complete);
        assert_eq!(response.fragments.last(), Some(&TalkOutput::End));
        assert!(!talk.is_active());
    }

    #[test]
    fn cancel_ends_without_output() {
        let host = Arc::new(MemoryHost::new("Avatar"));
        let mut talk = conversation(&host);
        talk.start(TREANNA);
        talk.cancel();

        let response = talk.process_input("VIRTUE");
        assert_eq!(response.error, Some(TalkError::InactiveConversation));
        assert_eq!(host.count(SideEffect::IncreaseKarma), 0);
    }

    #[test]
    fn input_before_start_is_inactive() {
        let host = Arc::new(MemoryHost::new("Avatar"));
        let mut talk = conversation(&host);
        let response = talk.process_input("JOB");
        assert_eq!(response.error, Some(TalkError::InactiveConversation));
    }
}
