//! The resolved configuration handed to template rendering and package installation

use crate::prompt::AnswerValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Final key/value set of one run.
///
/// Built by the resolver (or from static defaults) and read-only afterwards.
/// List values keep their order so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: BTreeMap<String, AnswerValue>,
}

impl ResolvedConfig {
    /// Config holding only static defaults
    pub fn from_defaults<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AnswerValue>,
    {
        Self {
            values: defaults
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub(crate) fn set(&mut self, key: impl Into<String>, value: AnswerValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AnswerValue::as_text)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(AnswerValue::as_bool)
    }

    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(AnswerValue::as_list)
    }

    /// Keys a consumer needs that are missing, in the order asked for
    pub fn missing<'k>(&self, keys: &[&'k str]) -> Vec<&'k str> {
        keys.iter()
            .copied()
            .filter(|key| !self.contains(key))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let config = ResolvedConfig::from_defaults(vec![
            ("slug", AnswerValue::from("my-app")),
            ("polyfills", AnswerValue::from(false)),
            ("dependencies", AnswerValue::from(vec!["gsap"])),
        ]);

        assert_eq!(config.text("slug"), Some("my-app"));
        assert_eq!(config.flag("polyfills"), Some(false));
        assert_eq!(config.list("dependencies"), Some(&["gsap".to_string()][..]));
        assert_eq!(config.text("polyfills"), None);
        assert_eq!(config.missing(&["slug", "title"]), vec!["title"]);
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let config = ResolvedConfig::from_defaults(vec![
            ("title", AnswerValue::from("Test")),
            ("dependencies", AnswerValue::List(Vec::new())),
        ]);
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(yaml, "dependencies: []\ntitle: Test\n");
    }
}
