//! Declarative prompt definitions
//!
//! A [`PromptSpec`] is an ordered list of [`PromptEntry`] values plus the
//! [`DerivedField`]s computed once every prompt has been answered. Defaults,
//! visibility conditions and validators are plain closures. The ones that read
//! earlier answers receive a [`PriorAnswers`] view, which refuses to hand out
//! anything that is not declared before the entry being resolved.

use super::collaborator::Choice;
use super::value::{AnswerValue, Answers};
use crate::config::ResolvedConfig;
use crate::resolver::ConfigurationError;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

type Condition = Arc<dyn Fn(&PriorAnswers<'_>) -> Result<bool, ConfigurationError> + Send + Sync>;
type ComputedDefault =
    Arc<dyn Fn(&PriorAnswers<'_>) -> Result<AnswerValue, ConfigurationError> + Send + Sync>;
type Rule = Arc<dyn Fn(&AnswerValue) -> bool + Send + Sync>;
type Derivation = Arc<dyn Fn(&ResolvedConfig) -> Option<AnswerValue> + Send + Sync>;

/// What kind of answer a prompt collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Text,
    SingleChoice,
    MultiChoice,
    Boolean,
}

impl PromptKind {
    /// Name of the answer shape this kind produces
    pub fn value_type(&self) -> &'static str {
        match self {
            PromptKind::Text | PromptKind::SingleChoice => "text",
            PromptKind::MultiChoice => "list",
            PromptKind::Boolean => "boolean",
        }
    }

    /// Does the value have the shape this kind produces?
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        matches!(
            (self, value),
            (PromptKind::Text | PromptKind::SingleChoice, AnswerValue::Text(_))
                | (PromptKind::MultiChoice, AnswerValue::List(_))
                | (PromptKind::Boolean, AnswerValue::Bool(_))
        )
    }
}

/// Where a choice prompt gets its choices from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choices {
    /// Not a choice prompt
    None,
    /// Fixed list given with the entry
    Fixed(Vec<Choice>),
    /// The dependency catalog handed to the resolver, grouped by category
    Catalog,
}

#[derive(Clone)]
pub enum DefaultValue {
    Literal(AnswerValue),
    Computed(ComputedDefault),
}

#[derive(Clone)]
struct Validator {
    rule: Rule,
    message: String,
}

/// One question
#[derive(Clone)]
pub struct PromptEntry {
    key: String,
    kind: PromptKind,
    message: String,
    default: Option<DefaultValue>,
    choices: Choices,
    validator: Option<Validator>,
    visible_when: Option<Condition>,
}

impl fmt::Debug for PromptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptEntry")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("choices", &self.choices)
            .field("conditional", &self.visible_when.is_some())
            .finish()
    }
}

impl PromptEntry {
    fn new(key: impl Into<String>, kind: PromptKind, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            message: message.into(),
            default: None,
            choices: Choices::None,
            validator: None,
            visible_when: None,
        }
    }

    /// Free text input
    pub fn text(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(key, PromptKind::Text, message)
    }

    /// Yes/no question, defaulting to no
    pub fn confirm(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(key, PromptKind::Boolean, message).default(false)
    }

    /// Pick one of a fixed list
    pub fn select<I, S>(key: impl Into<String>, message: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entry = Self::new(key, PromptKind::SingleChoice, message);
        entry.choices = Choices::Fixed(items.into_iter().map(Choice::item).collect());
        entry
    }

    /// Pick any number of a fixed list, defaulting to none
    pub fn multi_select<I, S>(key: impl Into<String>, message: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entry = Self::new(key, PromptKind::MultiChoice, message);
        entry.choices = Choices::Fixed(items.into_iter().map(Choice::item).collect());
        entry.default(Vec::<String>::new())
    }

    /// Pick any number of packages from the dependency catalog, defaulting to none.
    /// Conflicting picks are followed up once every prompt has been answered.
    pub fn packages(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut entry = Self::new(key, PromptKind::MultiChoice, message);
        entry.choices = Choices::Catalog;
        entry.default(Vec::<String>::new())
    }

    pub fn default(mut self, value: impl Into<AnswerValue>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Default computed from earlier answers
    pub fn default_with<F>(mut self, compute: F) -> Self
    where
        F: Fn(&PriorAnswers<'_>) -> Result<AnswerValue, ConfigurationError> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(compute)));
        self
    }

    /// Only ask when `condition` holds for the earlier answers
    pub fn visible_when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&PriorAnswers<'_>) -> Result<bool, ConfigurationError> + Send + Sync + 'static,
    {
        self.visible_when = Some(Arc::new(condition));
        self
    }

    /// Reject values for which `rule` returns false, showing `message`
    pub fn validate<F>(mut self, message: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&AnswerValue) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Validator {
            rule: Arc::new(rule),
            message: message.into(),
        });
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn choices(&self) -> &Choices {
        &self.choices
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn is_conditional(&self) -> bool {
        self.visible_when.is_some()
    }

    pub(crate) fn is_visible(&self, prior: &PriorAnswers<'_>) -> Result<bool, ConfigurationError> {
        match &self.visible_when {
            Some(condition) => condition(prior),
            None => Ok(true),
        }
    }

    pub(crate) fn resolve_default(
        &self,
        prior: &PriorAnswers<'_>,
    ) -> Result<Option<AnswerValue>, ConfigurationError> {
        let value = match &self.default {
            None => return Ok(None),
            Some(DefaultValue::Literal(value)) => value.clone(),
            Some(DefaultValue::Computed(compute)) => compute(prior)?,
        };
        self.check_kind(&value)?;
        Ok(Some(value))
    }

    /// Validator rule, or `Ok` when the entry has none
    pub(crate) fn check_rule(&self, value: &AnswerValue) -> Result<(), String> {
        match &self.validator {
            Some(validator) if !(validator.rule)(value) => Err(validator.message.clone()),
            _ => Ok(()),
        }
    }

    fn check_kind(&self, value: &AnswerValue) -> Result<(), ConfigurationError> {
        if self.kind.accepts(value) {
            Ok(())
        } else {
            Err(ConfigurationError::KindMismatch {
                key: self.key.clone(),
                expected: self.kind.value_type(),
                found: value.type_name(),
            })
        }
    }

    /// Static checks that need no answers
    fn check_definition(&self) -> Result<(), ConfigurationError> {
        let fixed = match &self.choices {
            Choices::Fixed(choices) => Some(choices),
            _ => None,
        };

        if let Some(choices) = fixed {
            if !choices.iter().any(Choice::is_selectable) {
                return Err(ConfigurationError::EmptyChoices(self.key.clone()));
            }
        }

        if let Some(DefaultValue::Literal(value)) = &self.default {
            self.check_kind(value)?;

            if let Some(choices) = fixed {
                let known = |item: &str| choices.iter().any(|c| c.selectable_value() == Some(item));
                let unknown = match value {
                    AnswerValue::Text(item) => (!known(item.as_str())).then(|| item.clone()),
                    AnswerValue::List(items) => items.iter().find(|i| !known(i.as_str())).cloned(),
                    AnswerValue::Bool(_) => None,
                };
                if let Some(value) = unknown {
                    return Err(ConfigurationError::DefaultNotAChoice {
                        key: self.key.clone(),
                        value,
                    });
                }
            }
        }

        Ok(())
    }
}

/// A key computed from the final answers rather than asked for
#[derive(Clone)]
pub struct DerivedField {
    key: String,
    compute: Derivation,
    fallback: Option<AnswerValue>,
}

impl fmt::Debug for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedField")
            .field("key", &self.key)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl DerivedField {
    /// `compute` sees static defaults, answers and earlier derived fields merged.
    /// Returning `None` means its inputs are missing.
    pub fn new<F>(key: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&ResolvedConfig) -> Option<AnswerValue> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            compute: Arc::new(compute),
            fallback: None,
        }
    }

    /// Value used when `compute` returns `None`
    pub fn fallback(mut self, value: impl Into<AnswerValue>) -> Self {
        self.fallback = Some(value.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn compute(&self, config: &ResolvedConfig) -> Option<AnswerValue> {
        (self.compute)(config).or_else(|| self.fallback.clone())
    }
}

/// Ordered prompt definitions
#[derive(Debug, Clone, Default)]
pub struct PromptSpec {
    entries: Vec<PromptEntry>,
    derived: Vec<DerivedField>,
}

impl PromptSpec {
    /// Check and wrap a list of entries. Keys must be unique.
    pub fn new(entries: impl IntoIterator<Item = PromptEntry>) -> Result<Self, ConfigurationError> {
        let entries: Vec<PromptEntry> = entries.into_iter().collect();

        let mut keys = BTreeSet::new();
        for entry in &entries {
            if !keys.insert(entry.key.as_str()) {
                return Err(ConfigurationError::DuplicateKey(entry.key.clone()));
            }
            entry.check_definition()?;
        }

        Ok(Self {
            entries,
            derived: Vec::new(),
        })
    }

    /// Attach derived fields, computed in the given order.
    ///
    /// A derived field may share its key with an entry; it then only fills the
    /// key when that entry was skipped.
    pub fn with_derived(
        mut self,
        fields: impl IntoIterator<Item = DerivedField>,
    ) -> Result<Self, ConfigurationError> {
        for field in fields {
            if self.derived.iter().any(|d| d.key == field.key) {
                return Err(ConfigurationError::DuplicateKey(field.key));
            }
            self.derived.push(field);
        }
        Ok(self)
    }

    pub fn entries(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn derived(&self) -> &[DerivedField] {
        &self.derived
    }

    pub fn get(&self, key: &str) -> Option<&PromptEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only view of the answers accepted before one entry
pub struct PriorAnswers<'a> {
    entry: &'a str,
    earlier: &'a [PromptEntry],
    later: &'a [PromptEntry],
    answers: &'a Answers,
}

impl<'a> PriorAnswers<'a> {
    /// View for the entry at `index`
    pub(crate) fn new(spec: &'a PromptSpec, index: usize, answers: &'a Answers) -> Self {
        let (earlier, later) = spec.entries.split_at(index);
        Self {
            entry: later.first().map(|e| e.key.as_str()).unwrap_or_default(),
            earlier,
            later,
            answers,
        }
    }

    /// Key of the entry being resolved
    pub fn entry(&self) -> &str {
        self.entry
    }

    /// Answer to an earlier entry, `None` when that entry was skipped.
    ///
    /// Reading an entry that is not declared earlier is an error, never `None`.
    pub fn get(&self, key: &str) -> Result<Option<&'a AnswerValue>, ConfigurationError> {
        if self.earlier.iter().any(|e| e.key == key) {
            return Ok(self.answers.get(key));
        }

        let error = if self.later.iter().any(|e| e.key == key) {
            ConfigurationError::ForwardReference {
                entry: self.entry.to_string(),
                key: key.to_string(),
            }
        } else {
            ConfigurationError::UndeclaredKey {
                entry: self.entry.to_string(),
                key: key.to_string(),
            }
        };
        Err(error)
    }

    pub fn text(&self, key: &str) -> Result<Option<&'a str>, ConfigurationError> {
        self.typed(key, "text", AnswerValue::as_text)
    }

    pub fn flag(&self, key: &str) -> Result<Option<bool>, ConfigurationError> {
        self.typed(key, "boolean", AnswerValue::as_bool)
    }

    pub fn list(&self, key: &str) -> Result<Option<&'a [String]>, ConfigurationError> {
        self.typed(key, "list", AnswerValue::as_list)
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &'static str,
        extract: impl Fn(&'a AnswerValue) -> Option<T>,
    ) -> Result<Option<T>, ConfigurationError> {
        match self.get(key)? {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| {
                ConfigurationError::KindMismatch {
                    key: key.to_string(),
                    expected,
                    found: value.type_name(),
                }
            }),
        }
    }
}
