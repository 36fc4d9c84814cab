use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, warn};
use tlk_core::phrases::{DESCRIPTION_PREFIX, INTRODUCTION_PREFIX, INTRODUCTION_SUFFIX};
use tlk_core::{FixedLine, InputKind, LabelId, LineRef, NpcId, Script, TalkError, TalkOutput};

use crate::capability::TalkCapabilities;

pub const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Clone)]
pub struct TalkEngineOptions {
    pub script: Arc<Script>,
    pub capabilities: Arc<dyn TalkCapabilities>,
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Bootstrapping,
    AwaitingInput,
    Dispatching,
    Terminated,
}

/// How the sections following the current one are treated. Set while a
/// section runs; consumed when the next section is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipInstruction {
    #[default]
    None,
    SkipNextSection,
    SkipSectionAfterNext,
    JumpToLabel(LabelId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Agenda {
    Say(&'static str),
    Line(LineRef),
    Break,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LineCursor {
    pub(super) line: LineRef,
    pub(super) section: usize,
    pub(super) command: usize,
}

impl LineCursor {
    pub(super) fn new(line: LineRef) -> Self {
        Self {
            line,
            section: 0,
            command: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct Cursor {
    pub(super) active: Option<LineCursor>,
    pub(super) agenda: VecDeque<Agenda>,
    pub(super) skip: SkipInstruction,
    pub(super) rune_mode: bool,
    pub(super) has_met: bool,
    pub(super) topic: Option<LabelId>,
}

pub struct TalkEngine {
    pub(super) script: Arc<Script>,
    pub(super) capabilities: Arc<dyn TalkCapabilities>,
    pub(super) max_steps: usize,
    /// Work done since the conversation started or last accepted input.
    pub(super) steps: usize,

    pub(super) npc: NpcId,
    pub(super) state: ConversationState,
    pub(super) cursor: Cursor,
    pub(super) outbox: VecDeque<TalkOutput>,
    pub(super) pending_input: Option<InputKind>,
}

impl TalkEngine {
    pub fn new(options: TalkEngineOptions) -> Self {
        Self {
            script: options.script,
            capabilities: options.capabilities,
            max_steps: options.max_steps.unwrap_or(DEFAULT_MAX_STEPS),
            steps: 0,
            npc: NpcId(0),
            state: ConversationState::Idle,
            cursor: Cursor::default(),
            outbox: VecDeque::new(),
            pending_input: None,
        }
    }

    /// Begins a conversation with `npc`: the description, then the greeting
    /// for a known player or a self-introduction for a stranger.
    pub fn start(&mut self, npc: NpcId) -> Result<(), TalkError> {
        self.reset();
        self.npc = npc;

        let has_met = self.capabilities.has_met(npc).unwrap_or_else(|error| {
            warn!("{}: met flag unavailable, assuming stranger: {}", npc, error);
            false
        });
        match self.capabilities.karma() {
            Ok(karma) => debug!("{}: conversation starts, met={} karma={}", npc, has_met, karma),
            Err(_) => debug!("{}: conversation starts, met={}", npc, has_met),
        }

        self.cursor.has_met = has_met;
        self.state = ConversationState::Bootstrapping;
        self.cursor.agenda.extend([
            Agenda::Say(DESCRIPTION_PREFIX),
            Agenda::Line(FixedLine::Description.into()),
            Agenda::Break,
        ]);
        if has_met {
            self.cursor.agenda.extend([
                Agenda::Line(FixedLine::Greeting.into()),
                Agenda::Break,
            ]);
        } else {
            self.cursor.agenda.extend([
                Agenda::Say(INTRODUCTION_PREFIX),
                Agenda::Line(FixedLine::Name.into()),
                Agenda::Say(INTRODUCTION_SUFFIX),
                Agenda::Break,
            ]);
        }
        Ok(())
    }

    /// Ends the conversation without running anything further.
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("{}: conversation cancelled", self.npc);
            self.terminate();
            self.outbox.clear();
        }
    }

    pub fn npc(&self) -> NpcId {
        self.npc
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(
            self.state,
            ConversationState::Idle | ConversationState::Terminated
        )
    }

    pub fn has_met(&self) -> bool {
        self.cursor.has_met
    }

    pub fn rune_mode(&self) -> bool {
        self.cursor.rune_mode
    }

    pub fn pending_input(&self) -> Option<InputKind> {
        self.pending_input
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    fn reset(&mut self) {
        self.state = ConversationState::Idle;
        self.steps = 0;
        self.cursor = Cursor::default();
        self.outbox.clear();
        self.pending_input = None;
    }

    pub(super) fn terminate(&mut self) {
        self.state = ConversationState::Terminated;
        self.cursor.active = None;
        self.cursor.agenda.clear();
        self.cursor.skip = SkipInstruction::None;
        self.pending_input = None;
    }
}
