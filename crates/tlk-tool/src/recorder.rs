use tlk_core::{TalkOutput, TalkWarning};

use crate::ExpectedEvent;

/// Folds engine fragments into comparable events.
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<ExpectedEvent>,
    text: String,
}

impl EventRecorder {
    pub fn record(&mut self, output: &TalkOutput) {
        match output {
            TalkOutput::Text { .. } | TalkOutput::NewLine => output.render_into(&mut self.text),
            TalkOutput::Pause => {}
            TalkOutput::Warning {
                warning: TalkWarning::UnknownCommand { code },
            } => self.push(ExpectedEvent::Warning { code: *code }),
            TalkOutput::Input { input, prompt } => self.push(ExpectedEvent::Input {
                input: *input,
                prompt: prompt.clone(),
            }),
            TalkOutput::Error { code, .. } => {
                self.push(ExpectedEvent::Error { code: code.clone() })
            }
            TalkOutput::End => self.push(ExpectedEvent::End),
        }
    }

    /// Number of events recorded so far, pending text included.
    pub fn len(&self) -> usize {
        self.events.len() + usize::from(!self.text.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn finish(mut self) -> Vec<ExpectedEvent> {
        self.flush();
        self.events
    }

    fn push(&mut self, event: ExpectedEvent) {
        self.flush();
        self.events.push(event);
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.events.push(ExpectedEvent::Text { text });
        }
    }
}

#[cfg(test)]
mod recorder_tests {
    use super::*;
    use tlk_core::InputKind;

    #[test]
    fn text_and_breaks_merge_until_next_event() {
        let mut recorder = EventRecorder::default();
        for output in [
            TalkOutput::text("You see "),
            TalkOutput::text("a bard"),
            TalkOutput::Pause,
            TalkOutput::NewLine,
            TalkOutput::Warning {
                warning: TalkWarning::UnknownCommand { code: 0xC7 },
            },
            TalkOutput::text("Hm."),
            TalkOutput::Input {
                input: InputKind::Topic,
                prompt: "Your interest?".to_string(),
            },
        ] {
            recorder.record(&output);
        }
        assert_eq!(recorder.len(), 4);
        assert_eq!(
            recorder.finish(),
            vec![
                ExpectedEvent::Text {
                    text: "You see a bard\n".to_string()
                },
                ExpectedEvent::Warning { code: 0xC7 },
                ExpectedEvent::Text {
                    text: "Hm.".to_string()
                },
                ExpectedEvent::Input {
                    input: InputKind::Topic,
                    prompt: "Your interest?".to_string()
                },
            ]
        );
    }

    #[test]
    fn trailing_text_is_flushed_on_finish() {
        let mut recorder = EventRecorder::default();
        assert!(recorder.is_empty());
        recorder.record(&TalkOutput::text("cut off"));
        assert_eq!(
            recorder.finish(),
            vec![ExpectedEvent::Text {
                text: "cut off".to_string()
            }]
        );
    }
}
