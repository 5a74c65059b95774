//! Choice Set
//!
//! The immutable ordered list of poll options plus the message-to-choice
//! matching rule.

use std::fmt;

/// One selectable poll option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// 1-based position in the configured order, stable for the session.
    pub ordinal: u32,
    /// Operator-supplied label.
    pub label: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.\"{}\"", self.ordinal, self.label)
    }
}

/// Ordered set of choices for one poll session. Built once at session
/// creation and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
}

impl ChoiceSet {
    /// Build a choice set from operator labels, assigning 1-based
    /// ordinals in configuration order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| Choice {
                ordinal: i as u32 + 1,
                label: label.into(),
            })
            .collect();
        Self { choices }
    }

    /// The two-option set used when the operator supplies no choices.
    pub fn default_pair() -> Self {
        Self::new(["1", "2"])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Resolve a chat message against the configured choices.
    ///
    /// A choice matches if the text contains its ordinal's decimal string
    /// or its exact label as a substring (case-sensitive). The first
    /// match in configured order wins; later choices are not consulted.
    pub fn resolve(&self, text: &str) -> Option<&Choice> {
        self.choices
            .iter()
            .find(|c| text.contains(&c.ordinal.to_string()) || text.contains(c.label.as_str()))
    }
}
