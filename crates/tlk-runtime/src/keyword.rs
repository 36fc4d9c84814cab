//! Matching of player free text against keyword sets.
//!
//! Matching is exact after trimming and lower-casing both sides: "MAGICAL"
//! does not answer a "MAGIC" topic.

use tlk_core::phrases::{FAREWELL_KEYWORDS, JOB_KEYWORDS, NAME_KEYWORDS};
use tlk_core::{LabelId, QuestionGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Farewell,
    Name,
    Job,
    /// Index into the script's question groups.
    Answer(usize),
    Unrecognized,
}

pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

pub struct KeywordResolver<'a> {
    questions: &'a [QuestionGroup],
}

impl<'a> KeywordResolver<'a> {
    pub fn new(questions: &'a [QuestionGroup]) -> Self {
        Self { questions }
    }

    pub fn resolve(&self, input: &str, topic: Option<LabelId>) -> Resolution {
        let normalized = normalize(input);
        if normalized.is_empty() || FAREWELL_KEYWORDS.contains(&normalized.as_str()) {
            return Resolution::Farewell;
        }
        if NAME_KEYWORDS.contains(&normalized.as_str()) {
            return Resolution::Name;
        }
        if JOB_KEYWORDS.contains(&normalized.as_str()) {
            return Resolution::Job;
        }
        self.find_answer(&normalized, topic)
            .map(Resolution::Answer)
            .unwrap_or(Resolution::Unrecognized)
    }

    /// Groups scoped to the current topic win over unscoped ones.
    pub fn find_answer(&self, normalized: &str, topic: Option<LabelId>) -> Option<usize> {
        if let Some(topic) = topic {
            let scoped = self.first_match(normalized, |group| group.scope == Some(topic));
            if scoped.is_some() {
                return scoped;
            }
        }
        self.first_match(normalized, |group| group.scope.is_none())
    }

    fn first_match<F>(&self, normalized: &str, eligible: F) -> Option<usize>
    where
        F: Fn(&QuestionGroup) -> bool,
    {
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, group)| eligible(group))
            .find(|(_, group)| {
                group
                    .keywords
                    .iter()
                    .any(|keyword| normalize(keyword) == normalized)
            })
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod keyword_tests {
    use super::*;
    use tlk_core::Command;

    fn groups() -> Vec<QuestionGroup> {
        vec![
            QuestionGroup::new(&["VIRTUE", "VIRTUES"], vec![Command::text("eight")]),
            QuestionGroup::new(&["MAGIC"], vec![Command::text("arcane")]),
            QuestionGroup::new(&["YES"], vec![Command::text("scoped yes")]).scoped(LabelId(1)),
            QuestionGroup::new(&["YES", "AYE"], vec![Command::text("global yes")]),
        ]
    }

    #[test]
    fn matching_ignores_case_and_surrounding_space() {
        let questions = groups();
        let resolver = KeywordResolver::new(&questions);
        for input in ["virtue", "VIRTUE", "Virtue", "  virtues \n"] {
            assert_eq!(resolver.resolve(input, None), Resolution::Answer(0), "{input}");
        }
    }

    #[test]
    fn matching_is_exact_not_substring() {
        let questions = groups();
        let resolver = KeywordResolver::new(&questions);
        assert_eq!(resolver.resolve("MAGICAL", None), Resolution::Unrecognized);
        assert_eq!(resolver.resolve("MAGIC", None), Resolution::Answer(1));
    }

    #[test]
    fn builtins_cover_name_job_and_farewells() {
        let questions = groups();
        let resolver = KeywordResolver::new(&questions);
        assert_eq!(resolver.resolve("Name", None), Resolution::Name);
        assert_eq!(resolver.resolve("JOB", None), Resolution::Job);
        assert_eq!(resolver.resolve("work", None), Resolution::Job);
        for input in ["", "   ", "bye", "GOODBYE", "Farewell"] {
            assert_eq!(resolver.resolve(input, None), Resolution::Farewell, "{input:?}");
        }
    }

    #[test]
    fn topic_scoped_groups_take_precedence() {
        let questions = groups();
        let resolver = KeywordResolver::new(&questions);
        assert_eq!(resolver.resolve("yes", Some(LabelId(1))), Resolution::Answer(2));
        assert_eq!(resolver.resolve("yes", None), Resolution::Answer(3));
        assert_eq!(resolver.resolve("yes", Some(LabelId(9))), Resolution::Answer(3));
        assert_eq!(resolver.resolve("aye", Some(LabelId(1))), Resolution::Answer(3));
    }
}
