use std::sync::Arc;

use log::error;
use tlk_core::phrases::{GOLD_PROMPT, NAME_PROMPT, TOPIC_PROMPT};
use tlk_core::{InputKind, TalkError, TalkOutput};

use super::lifecycle::{Agenda, ConversationState, LineCursor, SkipInstruction, TalkEngine};

pub fn prompt_for(input: InputKind) -> &'static str {
    match input {
        InputKind::Topic => TOPIC_PROMPT,
        InputKind::Name => NAME_PROMPT,
        InputKind::Gold => GOLD_PROMPT,
        InputKind::Acknowledge => "",
    }
}

impl TalkEngine {
    /// Produces the next fragment of conversation. Text queued before an
    /// input request is always returned before that request.
    ///
    /// The step guard spans every call between two inputs, so a loop that
    /// keeps producing text still ends with `GuardExceeded`.
    pub fn next_output(&mut self) -> Result<TalkOutput, TalkError> {
        loop {
            if let Some(output) = self.outbox.pop_front() {
                return Ok(output);
            }
            if let Some(input) = self.pending_input {
                return Ok(TalkOutput::Input {
                    input,
                    prompt: prompt_for(input).to_string(),
                });
            }
            match self.state {
                ConversationState::Terminated => return Ok(TalkOutput::End),
                ConversationState::Idle => return Err(TalkError::InactiveConversation),
                _ => {}
            }

            self.steps += 1;
            if self.steps > self.max_steps {
                return Err(self.fail(TalkError::GuardExceeded {
                    max_steps: self.max_steps,
                }));
            }
            if let Err(error) = self.advance() {
                return Err(self.fail(error));
            }
        }
    }

    fn fail(&mut self, error: TalkError) -> TalkError {
        error!("{}: conversation aborted: {}", self.npc, error);
        self.capabilities.report_error(&error);
        self.terminate();
        error
    }

    /// Runs one unit of work: a pending jump, one agenda item, a section
    /// decision, or a single command.
    fn advance(&mut self) -> Result<(), TalkError> {
        if let SkipInstruction::JumpToLabel(label) = self.cursor.skip {
            self.cursor.skip = SkipInstruction::None;
            return self.jump(label);
        }

        let Some(active) = self.cursor.active else {
            self.advance_agenda();
            return Ok(());
        };

        let script = Arc::clone(&self.script);
        let line = script.line_ref(active.line).ok_or_else(|| {
            TalkError::malformed(format!("line {:?} does not exist", active.line))
        })?;
        let Some(section) = line.section(active.section) else {
            self.finish_line();
            return Ok(());
        };

        if active.command == 0 && !self.enter_section(section) {
            self.next_section();
            return Ok(());
        }
        let Some(command) = section.get(active.command) else {
            self.next_section();
            return Ok(());
        };

        if let Some(cursor) = self.cursor.active.as_mut() {
            cursor.command += 1;
        }
        self.execute(command);
        Ok(())
    }

    fn advance_agenda(&mut self) {
        match self.cursor.agenda.pop_front() {
            Some(Agenda::Say(text)) => self.say(text),
            Some(Agenda::Line(line)) => self.cursor.active = Some(LineCursor::new(line)),
            Some(Agenda::Break) => self.outbox.push_back(TalkOutput::NewLine),
            Some(Agenda::Close) => self.terminate(),
            None => {
                self.state = ConversationState::AwaitingInput;
                self.pending_input = Some(InputKind::Topic);
            }
        }
    }

    pub(super) fn say(&mut self, text: &str) {
        self.outbox.push_back(TalkOutput::text(text));
    }
}
