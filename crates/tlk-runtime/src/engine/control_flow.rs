use log::{trace, warn};
use tlk_core::{
    CapabilityError, Command, InputKind, LabelId, LineRef, TalkError, TalkOutput, TalkWarning,
};

use super::lifecycle::{LineCursor, SkipInstruction, TalkEngine};

impl TalkEngine {
    /// Consumes the pending skip instruction for the section about to run.
    /// Returns false when the section must not execute.
    pub(super) fn enter_section(&mut self, section: &[Command]) -> bool {
        match std::mem::take(&mut self.cursor.skip) {
            SkipInstruction::SkipNextSection => {
                trace!("{}: section skipped", self.npc);
                return false;
            }
            SkipInstruction::SkipSectionAfterNext => {
                self.cursor.skip = SkipInstruction::SkipNextSection;
            }
            // A pending jump is taken before any section is entered.
            SkipInstruction::JumpToLabel(_) | SkipInstruction::None => {}
        }

        // A stranger never hears the player's name.
        if !self.cursor.has_met
            && section
                .iter()
                .any(|command| matches!(command, Command::AvatarName))
        {
            trace!("{}: section naming the avatar skipped", self.npc);
            return false;
        }
        true
    }

    pub(super) fn next_section(&mut self) {
        if let Some(cursor) = self.cursor.active.as_mut() {
            cursor.section += 1;
            cursor.command = 0;
        }
    }

    pub(super) fn finish_line(&mut self) {
        self.cursor.active = None;
        self.cursor.skip = SkipInstruction::None;
    }

    pub(super) fn jump(&mut self, label: LabelId) -> Result<(), TalkError> {
        let position = self
            .script
            .resolve_label(label)
            .ok_or(TalkError::LabelNotFound { label })?;
        trace!("{}: jump to label {} at line {}", self.npc, label, position);
        self.cursor.active = Some(LineCursor::new(LineRef::Position(position)));
        self.cursor.topic = Some(label);
        Ok(())
    }

    pub(super) fn execute(&mut self, command: &Command) {
        match command {
            Command::Text { text } => {
                self.outbox.push_back(TalkOutput::Text {
                    text: text.clone(),
                    rune: self.cursor.rune_mode,
                });
            }
            Command::AvatarName => match self.capabilities.avatar_name() {
                Ok(name) => self.outbox.push_back(TalkOutput::Text {
                    text: name,
                    rune: self.cursor.rune_mode,
                }),
                Err(error) => self.absorb(error),
            },
            Command::NewLine => self.outbox.push_back(TalkOutput::NewLine),
            Command::Pause => self.outbox.push_back(TalkOutput::Pause),
            Command::KeyWait => self.pending_input = Some(InputKind::Acknowledge),
            Command::StartNewSection | Command::DefineLabel { .. } => {}
            Command::IfElseKnowsName => {
                self.cursor.skip = if self.cursor.has_met {
                    SkipInstruction::SkipSectionAfterNext
                } else {
                    SkipInstruction::SkipNextSection
                };
            }
            Command::GotoLabel { label } => {
                self.cursor.skip = SkipInstruction::JumpToLabel(*label);
            }
            Command::AskName => {
                if !self.cursor.has_met {
                    self.pending_input = Some(InputKind::Name);
                }
            }
            Command::AskGold => self.pending_input = Some(InputKind::Gold),
            Command::Rune => self.cursor.rune_mode = !self.cursor.rune_mode,
            Command::EndConversation => self.terminate(),
            Command::EndScript => self.finish_line(),
            Command::Unknown { code } => {
                warn!("{}: unknown command {:#04x} ignored", self.npc, code);
                self.outbox.push_back(TalkOutput::Warning {
                    warning: TalkWarning::UnknownCommand { code: *code },
                });
            }
            Command::JoinParty
            | Command::CallGuards
            | Command::KarmaPlusOne
            | Command::KarmaMinusOne
            | Command::GoToJail
            | Command::MakeHorse
            | Command::PayExtortion { .. }
            | Command::PayHalfGoldExtortion
            | Command::GiveItem { .. } => {
                if let Some(effect) = command.side_effect() {
                    self.apply_side_effect(effect);
                }
            }
        }
    }

    /// Speaks a capability failure instead of aborting the conversation.
    pub(super) fn absorb(&mut self, error: CapabilityError) {
        warn!("{}: capability failed: {}", self.npc, error);
        self.say(&error.to_string());
        self.outbox.push_back(TalkOutput::NewLine);
    }
}
