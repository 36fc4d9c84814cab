use log::{debug, trace};
use tlk_core::phrases::{
    GOLD_ACCEPTED, INTRODUCTION_PREFIX, INTRODUCTION_SUFFIX, NAME_ACCEPTED, NAME_REJECTED,
    UNRECOGNIZED,
};
use tlk_core::{FixedLine, InputKind, LineRef, TalkError, TalkOutput};

use super::lifecycle::{Agenda, ConversationState, TalkEngine};
use crate::keyword::{normalize, KeywordResolver, Resolution};

impl TalkEngine {
    /// Answers the pending input request. Input after the conversation has
    /// ended is rejected without touching any state.
    pub fn submit_input(&mut self, text: &str) -> Result<(), TalkError> {
        if !self.is_active() {
            return Err(TalkError::InactiveConversation);
        }
        let Some(input) = self.pending_input.take() else {
            return Err(TalkError::NoPendingInput);
        };
        self.steps = 0;

        match input {
            InputKind::Topic => self.dispatch_topic(text),
            InputKind::Name => self.accept_name(text),
            InputKind::Gold => self.accept_gold(text),
            InputKind::Acknowledge => {}
        }
        Ok(())
    }

    fn dispatch_topic(&mut self, text: &str) {
        self.state = ConversationState::Dispatching;
        let topic = self.cursor.topic.take();
        let resolution = KeywordResolver::new(self.script.questions()).resolve(text, topic);
        trace!("{}: {:?} -> {:?}", self.npc, text, resolution);

        let agenda = &mut self.cursor.agenda;
        match resolution {
            Resolution::Farewell => agenda.extend([
                Agenda::Line(FixedLine::Bye.into()),
                Agenda::Break,
                Agenda::Close,
            ]),
            Resolution::Name => agenda.extend([
                Agenda::Say(INTRODUCTION_PREFIX),
                Agenda::Line(FixedLine::Name.into()),
                Agenda::Say(INTRODUCTION_SUFFIX),
                Agenda::Break,
            ]),
            Resolution::Job => agenda.extend([Agenda::Line(FixedLine::Job.into()), Agenda::Break]),
            Resolution::Answer(index) => {
                agenda.extend([Agenda::Line(LineRef::Answer(index)), Agenda::Break])
            }
            Resolution::Unrecognized => agenda.extend([Agenda::Say(UNRECOGNIZED), Agenda::Break]),
        }
    }

    fn accept_name(&mut self, text: &str) {
        let avatar = match self.capabilities.avatar_name() {
            Ok(name) => name,
            Err(error) => {
                self.absorb(error);
                return;
            }
        };

        let given = normalize(text);
        if given.is_empty() || given != normalize(&avatar) {
            self.say(NAME_REJECTED);
            self.outbox.push_back(TalkOutput::NewLine);
            return;
        }
        if let Err(error) = self.capabilities.record_met(self.npc) {
            self.absorb(error);
            return;
        }
        debug!("{}: player introduced as {}", self.npc, avatar);
        self.cursor.has_met = true;
        self.say(NAME_ACCEPTED);
        self.outbox.push_back(TalkOutput::NewLine);
    }

    fn accept_gold(&mut self, text: &str) {
        let amount = text.trim().parse::<u32>().unwrap_or(0);
        match self.capabilities.offer_gold(amount) {
            Ok(()) => {
                self.say(GOLD_ACCEPTED);
                self.outbox.push_back(TalkOutput::NewLine);
            }
            Err(error) => self.absorb(error),
        }
    }
}
