use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpcId(pub u16);

impl fmt::Display for NpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "npc#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(pub u8);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u8);

/// Fixed line slots at the head of every script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedLine {
    Name = 0,
    Description = 1,
    Greeting = 2,
    Job = 3,
    Bye = 4,
}

impl FixedLine {
    pub const COUNT: usize = 5;

    pub fn position(self) -> usize {
        self as usize
    }
}

/// One script command. Deserializing a tag this build does not know yields
/// `Unknown`, carrying the optional `code` field of the source (0 if absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self", tag = "kind", rename_all = "camelCase")]
pub enum Command {
    Text { text: String },
    AvatarName,
    NewLine,
    Pause,
    KeyWait,
    StartNewSection,
    IfElseKnowsName,
    DefineLabel { label: LabelId },
    GotoLabel { label: LabelId },
    AskName,
    AskGold,
    JoinParty,
    CallGuards,
    KarmaPlusOne,
    KarmaMinusOne,
    GoToJail,
    MakeHorse,
    PayExtortion { amount: u16 },
    PayHalfGoldExtortion,
    GiveItem { item: ItemId },
    Rune,
    EndConversation,
    EndScript,
    Unknown { code: u8 },
}

const COMMAND_KINDS: &[&str] = &[
    "text",
    "avatarName",
    "newLine",
    "pause",
    "keyWait",
    "startNewSection",
    "ifElseKnowsName",
    "defineLabel",
    "gotoLabel",
    "askName",
    "askGold",
    "joinParty",
    "callGuards",
    "karmaPlusOne",
    "karmaMinusOne",
    "goToJail",
    "makeHorse",
    "payExtortion",
    "payHalfGoldExtortion",
    "giveItem",
    "rune",
    "endConversation",
    "endScript",
    "unknown",
];

#[derive(Deserialize)]
struct CommandTag {
    kind: String,
    #[serde(default)]
    code: u8,
}

impl Serialize for Command {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Command::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = CommandTag::deserialize(&value).map_err(de::Error::custom)?;
        if !COMMAND_KINDS.contains(&tag.kind.as_str()) {
            return Ok(Self::Unknown { code: tag.code });
        }
        Command::deserialize(value).map_err(de::Error::custom)
    }
}

impl Command {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn side_effect(&self) -> Option<SideEffect> {
        let effect = match self {
            Self::JoinParty => SideEffect::JoinParty,
            Self::CallGuards => SideEffect::SummonGuards,
            Self::KarmaPlusOne => SideEffect::IncreaseKarma,
            Self::KarmaMinusOne => SideEffect::DecreaseKarma,
            Self::GoToJail => SideEffect::SendToJail,
            Self::MakeHorse => SideEffect::ConjureMount,
            Self::PayExtortion { amount } => SideEffect::PayExtortion { amount: *amount },
            Self::PayHalfGoldExtortion => SideEffect::PayHalfGoldExtortion,
            Self::GiveItem { item } => SideEffect::GrantItem { item: *item },
            _ => return None,
        };
        Some(effect)
    }
}

/// Observable game-state mutation requested by a script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SideEffect {
    JoinParty,
    SummonGuards,
    IncreaseKarma,
    DecreaseKarma,
    SendToJail,
    ConjureMount,
    PayExtortion { amount: u16 },
    PayHalfGoldExtortion,
    GrantItem { item: ItemId },
}

impl SideEffect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinParty => "joinParty",
            Self::SummonGuards => "summonGuards",
            Self::IncreaseKarma => "increaseKarma",
            Self::DecreaseKarma => "decreaseKarma",
            Self::SendToJail => "sendToJail",
            Self::ConjureMount => "conjureMount",
            Self::PayExtortion { .. } => "payExtortion",
            Self::PayHalfGoldExtortion => "payHalfGoldExtortion",
            Self::GrantItem { .. } => "grantItem",
        }
    }
}

/// A run of commands split into sections at `StartNewSection` markers. The
/// markers themselves belong to no section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Command>", into = "Vec<Command>")]
pub struct Line {
    commands: Vec<Command>,
    sections: Vec<(usize, usize)>,
}

impl Line {
    pub fn new(commands: Vec<Command>) -> Self {
        let mut sections = Vec::new();
        let mut start = 0usize;
        for (index, command) in commands.iter().enumerate() {
            if matches!(command, Command::StartNewSection) {
                sections.push((start, index));
                start = index + 1;
            }
        }
        sections.push((start, commands.len()));
        Self { commands, sections }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, index: usize) -> Option<&[Command]> {
        self.sections
            .get(index)
            .map(|(start, end)| &self.commands[*start..*end])
    }

    pub fn label(&self) -> Option<LabelId> {
        match self.commands.first() {
            Some(Command::DefineLabel { label }) => Some(*label),
            _ => None,
        }
    }

    /// Concatenated literal text, ignoring every non-text command.
    pub fn plain_text(&self) -> String {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<Command>> for Line {
    fn from(commands: Vec<Command>) -> Self {
        Self::new(commands)
    }
}

impl From<Line> for Vec<Command> {
    fn from(line: Line) -> Self {
        line.commands
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionGroup {
    pub keywords: Vec<String>,
    pub response: Line,
    /// Label topic this group answers; `None` means always available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<LabelId>,
}

impl QuestionGroup {
    pub fn new(keywords: &[&str], response: Vec<Command>) -> Self {
        Self {
            keywords: keywords.iter().map(|word| (*word).to_string()).collect(),
            response: Line::new(response),
            scope: None,
        }
    }

    pub fn scoped(mut self, label: LabelId) -> Self {
        self.scope = Some(label);
        self
    }
}
