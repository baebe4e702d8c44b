//! Contract between the resolver and whatever actually asks the questions

use super::spec::PromptKind;
use super::value::AnswerValue;
use std::collections::{BTreeMap, VecDeque};

/// One entry of a choice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Selectable value
    Item(String),
    /// Non-selectable group label placed before the items of that group
    Separator(String),
}

impl Choice {
    pub fn item(value: impl Into<String>) -> Self {
        Choice::Item(value.into())
    }

    pub fn separator(label: impl Into<String>) -> Self {
        Choice::Separator(label.into())
    }

    pub fn is_selectable(&self) -> bool {
        matches!(self, Choice::Item(_))
    }

    pub fn selectable_value(&self) -> Option<&str> {
        match self {
            Choice::Item(value) => Some(value),
            Choice::Separator(_) => None,
        }
    }
}

/// Everything a collaborator needs to ask one question
#[derive(Debug, Clone, PartialEq)]
pub struct PromptDescriptor {
    pub key: String,
    pub kind: PromptKind,
    pub message: String,
    pub default: Option<AnswerValue>,
    /// Empty unless `kind` is a choice kind
    pub choices: Vec<Choice>,
    /// Set when the previous value for this key was rejected
    pub rejection: Option<String>,
}

impl PromptDescriptor {
    pub fn selectable(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().filter_map(Choice::selectable_value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// No further input can be obtained (non-interactive, end of script)
    #[error("no more input available")]
    Exhausted,

    /// The user aborted
    #[error("prompt cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Asks one question and returns the raw answer. Called once per attempt.
pub trait Prompter {
    fn ask(&mut self, prompt: &PromptDescriptor) -> Result<AnswerValue, PromptError>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, prompt: &PromptDescriptor) -> Result<AnswerValue, PromptError> {
        (**self).ask(prompt)
    }
}

/// Prompter fed from prepared answers, for non-interactive runs and tests.
///
/// Each key holds a queue of answers, consumed one per question. An empty
/// queue reports [`PromptError::Exhausted`]. Every descriptor asked is recorded.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: BTreeMap<String, VecDeque<AnswerValue>>,
    asked: Vec<PromptDescriptor>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for `key`
    pub fn answer(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.answers
            .entry(key.into())
            .or_default()
            .push_back(value.into());
        self
    }

    /// Load a `key: value` YAML mapping, one answer per key
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let answers: BTreeMap<String, AnswerValue> = serde_yaml::from_str(content)?;
        Ok(answers
            .into_iter()
            .fold(Self::new(), |prompter, (key, value)| prompter.answer(key, value)))
    }

    /// Descriptors in the order they were asked
    pub fn asked(&self) -> &[PromptDescriptor] {
        &self.asked
    }

    /// Keys in the order they were asked
    pub fn asked_keys(&self) -> Vec<&str> {
        self.asked.iter().map(|d| d.key.as_str()).collect()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &PromptDescriptor) -> Result<AnswerValue, PromptError> {
        self.asked.push(prompt.clone());
        self.answers
            .get_mut(&prompt.key)
            .and_then(VecDeque::pop_front)
            .ok_or(PromptError::Exhausted)
    }
}
