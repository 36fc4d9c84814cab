use serde::{Deserialize, Serialize};
use tlk_core::{InputKind, NpcId};

pub const TESTCASE_SCHEMA_V1: &str = "tlk-tool-case.v1";

/// One scripted conversation: the host's starting state, the player's
/// replies in order, and what the conversation must produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default = "default_npc_id")]
    pub npc_id: NpcId,
    #[serde(default = "default_avatar_name")]
    pub avatar_name: String,
    #[serde(default)]
    pub has_met: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karma: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_capacity: Option<usize>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
    /// Mutating capability calls in order; unchecked when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_calls: Option<Vec<String>>,
}

fn default_npc_id() -> NpcId {
    NpcId(1)
}

fn default_avatar_name() -> String {
    "Avatar".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Input { text: String },
}

impl TestAction {
    pub fn text(&self) -> &str {
        match self {
            Self::Input { text } => text,
        }
    }
}

/// Observable conversation events. Consecutive text and line breaks are
/// merged into a single `Text` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Text { text: String },
    Warning { code: u8 },
    Input { input: InputKind, prompt: String },
    Error { code: String },
    End,
}

#[cfg(test)]
mod case_tests {
    use super::*;

    #[test]
    fn testcase_deserialize_applies_defaults() {
        let parsed: TestCase = serde_json::from_str(
            r#"{
  "schemaVersion": "tlk-tool-case.v1",
  "actions": [],
  "expectedEvents": []
}"#,
        )
        .expect("testcase should deserialize");

        assert_eq!(parsed.schema_version, TESTCASE_SCHEMA_V1);
        assert_eq!(parsed.npc_id, NpcId(1));
        assert_eq!(parsed.avatar_name, "Avatar");
        assert!(!parsed.has_met);
        assert_eq!(parsed.gold, None);
        assert_eq!(parsed.expected_calls, None);
    }

    #[test]
    fn expected_event_deserialize_supports_all_variants() {
        let parsed: Vec<ExpectedEvent> = serde_json::from_str(
            r#"[
  {"kind":"text","text":"a"},
  {"kind":"warning","code":199},
  {"kind":"input","input":"topic","prompt":"Your interest?"},
  {"kind":"error","code":"TALK_LABEL_NOT_FOUND"},
  {"kind":"end"}
]"#,
        )
        .expect("events should deserialize");

        assert_eq!(parsed.len(), 5);
        assert!(matches!(parsed[1], ExpectedEvent::Warning { code: 199 }));
        assert!(matches!(
            parsed[2],
            ExpectedEvent::Input {
                input: InputKind::Topic,
                ..
            }
        ));
        assert!(matches!(parsed[4], ExpectedEvent::End));
    }

    #[test]
    fn input_action_exposes_text() {
        let action: TestAction =
            serde_json::from_str(r#"{"kind":"input","text":"VIRTUE"}"#).expect("action");
        assert_eq!(action.text(), "VIRTUE");
    }
}
