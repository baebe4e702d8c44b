//! Answer values and the ordered answer map

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw or resolved answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnswerValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            AnswerValue::Bool(_) => "boolean",
            AnswerValue::Text(_) => "text",
            AnswerValue::List(_) => "list",
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(true) => write!(f, "yes"),
            AnswerValue::Bool(false) => write!(f, "no"),
            AnswerValue::Text(text) => write!(f, "{}", text),
            AnswerValue::List(items) if items.is_empty() => write!(f, "(none)"),
            AnswerValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(value: Vec<&str>) -> Self {
        AnswerValue::List(value.into_iter().map(String::from).collect())
    }
}

/// Answers in the order they were accepted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    entries: Vec<(String, AnswerValue)>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace, keeping the original position of a replaced key
    pub fn insert(&mut self, key: impl Into<String>, value: AnswerValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_keep_insertion_order() {
        let mut answers = Answers::new();
        answers.insert("b", "first".into());
        answers.insert("a", true.into());
        answers.insert("b", "second".into());

        let keys: Vec<_> = answers.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(answers.get("b"), Some(&AnswerValue::from("second")));
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn test_deserialize_untagged_values() {
        let values: Vec<AnswerValue> =
            serde_yaml::from_str("[true, \"text\", [a, b], \"false\"]").unwrap();
        assert_eq!(
            values,
            vec![
                AnswerValue::Bool(true),
                AnswerValue::from("text"),
                AnswerValue::from(vec!["a", "b"]),
                AnswerValue::from("false"),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(AnswerValue::from(vec!["a", "b"]).to_string(), "a, b");
        assert_eq!(AnswerValue::List(Vec::new()).to_string(), "(none)");
        assert_eq!(AnswerValue::Bool(false).to_string(), "no");
    }
}
