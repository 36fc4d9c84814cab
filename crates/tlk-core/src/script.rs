use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TalkError;
use crate::types::{Command, FixedLine, LabelId, Line, QuestionGroup};

/// Where a line lives: a script position, or a question group's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRef {
    Position(usize),
    Answer(usize),
}

impl From<FixedLine> for LineRef {
    fn from(line: FixedLine) -> Self {
        Self::Position(line.position())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelRegistry {
    positions: BTreeMap<LabelId, usize>,
}

impl LabelRegistry {
    /// A label names the line it opens; a jump always runs that line from
    /// its first section. Labels anywhere else in a line are rejected.
    pub fn build(lines: &[Line]) -> Result<Self, TalkError> {
        let mut positions = BTreeMap::new();
        for (position, line) in lines.iter().enumerate() {
            let inner = line.commands().iter().skip(1).find_map(|command| match command {
                Command::DefineLabel { label } => Some(*label),
                _ => None,
            });
            if let Some(label) = inner {
                return Err(TalkError::malformed(format!(
                    "label {} must open line {}",
                    label, position
                )));
            }
            let Some(label) = line.label() else {
                continue;
            };
            if let Some(existing) = positions.insert(label, position) {
                return Err(TalkError::malformed(format!(
                    "label {} is defined at line {} and again at line {}",
                    label, existing, position
                )));
            }
        }
        Ok(Self { positions })
    }

    pub fn resolve(&self, label: LabelId) -> Option<usize> {
        self.positions.get(&label).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Serialized shape of a [`Script`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptData {
    lines: Vec<Line>,
    #[serde(default)]
    questions: Vec<QuestionGroup>,
}

/// A parsed dialogue script for one NPC. Immutable once built; share it
/// behind an `Arc` across every conversation with that NPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScriptData", into = "ScriptData")]
pub struct Script {
    lines: Vec<Line>,
    questions: Vec<QuestionGroup>,
    labels: LabelRegistry,
}

impl Script {
    pub fn new(lines: Vec<Line>, questions: Vec<QuestionGroup>) -> Result<Self, TalkError> {
        if lines.len() < FixedLine::COUNT {
            return Err(TalkError::malformed(format!(
                "expected at least {} fixed lines, found {}",
                FixedLine::COUNT,
                lines.len()
            )));
        }
        let labels = LabelRegistry::build(&lines)?;
        Ok(Self {
            lines,
            questions,
            labels,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, TalkError> {
        serde_json::from_str(raw).map_err(|error| TalkError::malformed(error.to_string()))
    }

    pub fn line(&self, position: usize) -> Option<&Line> {
        self.lines.get(position)
    }

    pub fn fixed(&self, slot: FixedLine) -> &Line {
        &self.lines[slot.position()]
    }

    pub fn line_ref(&self, line: LineRef) -> Option<&Line> {
        match line {
            LineRef::Position(position) => self.lines.get(position),
            LineRef::Answer(index) => self.questions.get(index).map(|group| &group.response),
        }
    }

    pub fn resolve_label(&self, label: LabelId) -> Option<usize> {
        self.labels.resolve(label)
    }

    pub fn labels(&self) -> &LabelRegistry {
        &self.labels
    }

    pub fn questions(&self) -> &[QuestionGroup] {
        &self.questions
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl TryFrom<ScriptData> for Script {
    type Error = TalkError;

    fn try_from(data: ScriptData) -> Result<Self, Self::Error> {
        Self::new(data.lines, data.questions)
    }
}

impl From<Script> for ScriptData {
    fn from(script: Script) -> Self {
        Self {
            lines: script.lines,
            questions: script.questions,
        }
    }
}

#[cfg(test)]
mod script_tests {
    use super::*;

    fn fixed_lines() -> Vec<Line> {
        ["Iolo", "a bard", "Hail!", "I play the lute.", "Fare thee well."]
            .iter()
            .map(|text| Line::new(vec![Command::text(*text)]))
            .collect()
    }

    #[test]
    fn new_rejects_short_script() {
        let error = Script::new(fixed_lines()[..4].to_vec(), Vec::new())
            .expect_err("four lines should fail");
        assert_eq!(error.code(), "TALK_SCRIPT_MALFORMED");
    }

    #[test]
    fn labels_resolve_to_their_positions() {
        let mut lines = fixed_lines();
        lines.push(Line::new(vec![
            Command::DefineLabel { label: LabelId(1) },
            Command::text("one"),
        ]));
        lines.push(Line::new(vec![
            Command::DefineLabel { label: LabelId(7) },
            Command::text("seven"),
        ]));
        let script = Script::new(lines, Vec::new()).expect("script should build");
        assert_eq!(script.resolve_label(LabelId(1)), Some(5));
        assert_eq!(script.resolve_label(LabelId(7)), Some(6));
        assert_eq!(script.resolve_label(LabelId(2)), None);
        assert_eq!(script.labels().len(), 2);
    }

    #[test]
    fn duplicate_label_is_malformed() {
        let mut lines = fixed_lines();
        for _ in 0..2 {
            lines.push(Line::new(vec![Command::DefineLabel { label: LabelId(1) }]));
        }
        let error = Script::new(lines, Vec::new()).expect_err("duplicate should fail");
        assert!(error.to_string().contains("again at line 6"));
    }

    #[test]
    fn label_inside_a_line_is_malformed() {
        let mut lines = fixed_lines();
        lines.push(Line::new(vec![
            Command::text("Before the mark. "),
            Command::DefineLabel { label: LabelId(3) },
            Command::text("After."),
        ]));
        let error = Script::new(lines, Vec::new()).expect_err("inner label should fail");
        assert_eq!(error.code(), "TALK_SCRIPT_MALFORMED");
        assert!(error.to_string().contains("label #3 must open line 5"));
    }

    #[test]
    fn line_lookup_signals_out_of_range() {
        let script = Script::new(fixed_lines(), Vec::new()).expect("script should build");
        assert!(script.line(4).is_some());
        assert!(script.line(5).is_none());
        assert!(script.line_ref(LineRef::Answer(0)).is_none());
        assert_eq!(script.fixed(FixedLine::Job).plain_text(), "I play the lute.");
    }

    #[test]
    fn from_json_validates_fixed_lines() {
        let error = Script::from_json(r#"{"lines":[[{"kind":"text","text":"x"}]]}"#)
            .expect_err("short script should fail");
        assert_eq!(error.code(), "TALK_SCRIPT_MALFORMED");

        let script = Script::from_json(
            r#"{
  "lines": [
    [{"kind":"text","text":"Iolo"}],
    [{"kind":"text","text":"a bard"}],
    [{"kind":"text","text":"Hail!"}],
    [{"kind":"text","text":"I sing."}],
    [{"kind":"text","text":"Farewell."}]
  ],
  "questions": [
    {"keywords":["LUTE"],"response":[{"kind":"text","text":"Mine own make."}]}
  ]
}"#,
        )
        .expect("script should parse");
        assert_eq!(script.line_count(), 5);
        assert_eq!(script.questions()[0].keywords, vec!["LUTE".to_string()]);
        assert_eq!(
            script
                .line_ref(LineRef::Answer(0))
                .map(|line| line.plain_text()),
            Some("Mine own make.".to_string())
        );
    }
}
