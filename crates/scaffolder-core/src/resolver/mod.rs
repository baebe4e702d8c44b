//! Turns raw answers into a resolved configuration
//!
//! Resolution runs in four steps:
//! 1. every entry of the `PromptSpec`, in declaration order: visibility, default,
//!    ask, validate (asking again until the value is accepted)
//! 2. a follow-up removal prompt for conflicting catalog packages
//! 3. derived fields, computed from the final answers
//! 4. answers and derived fields merged over the static defaults
//!
//! Any error aborts the whole run; there is no partially resolved result.

mod error;

pub use error::{ConfigurationError, ResolveError, ValidationError};

use crate::catalog::DependencyCatalog;
use crate::config::ResolvedConfig;
use crate::prompt::{
    AnswerValue, Answers, Choice, Choices, PriorAnswers, PromptDescriptor, PromptEntry,
    PromptError, PromptKind, PromptSpec, Prompter,
};

/// Key of the follow-up prompt asking which conflicting packages of `key` to remove
pub fn conflict_prompt_key(key: &str) -> String {
    format!("{}_conflicts", key)
}

/// Resolves one `PromptSpec` against a prompt collaborator
pub struct ConfigResolver<'a> {
    spec: &'a PromptSpec,
    catalog: &'a DependencyCatalog,
    defaults: ResolvedConfig,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(spec: &'a PromptSpec, catalog: &'a DependencyCatalog) -> Self {
        Self {
            spec,
            catalog,
            defaults: ResolvedConfig::default(),
        }
    }

    /// Static defaults, overridden by answers and derived fields
    pub fn with_defaults(mut self, defaults: ResolvedConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Run the full resolution
    pub fn resolve<P: Prompter + ?Sized>(
        &self,
        prompter: &mut P,
    ) -> Result<ResolvedConfig, ResolveError> {
        let answers = self.collect_answers(prompter)?;
        let answers = self.resolve_conflicts(answers, prompter)?;
        self.finish(&answers)
    }

    /// Ask every visible entry once, in declaration order
    pub fn collect_answers<P: Prompter + ?Sized>(
        &self,
        prompter: &mut P,
    ) -> Result<Answers, ResolveError> {
        let mut answers = Answers::new();

        for (index, entry) in self.spec.entries().iter().enumerate() {
            let prior = PriorAnswers::new(self.spec, index, &answers);
            if !entry.is_visible(&prior)? {
                continue;
            }
            let default = entry.resolve_default(&prior)?;

            let descriptor = PromptDescriptor {
                key: entry.key().to_string(),
                kind: entry.kind(),
                message: entry.message().to_string(),
                default,
                choices: self.choices_for(entry)?,
                rejection: None,
            };

            if let Some(default) = &descriptor.default {
                if let Err(err) = check_choice(&descriptor, default) {
                    return Err(ConfigurationError::DefaultNotAChoice {
                        key: entry.key().to_string(),
                        value: err.message,
                    }
                    .into());
                }
            }

            let value = ask_until_valid(prompter, descriptor, |descriptor, value| {
                check_shape(descriptor, value)?;
                entry
                    .check_rule(value)
                    .map_err(|message| ValidationError::new(entry.key(), message))
            })?;

            answers.insert(entry.key(), value);
        }

        Ok(answers)
    }

    fn choices_for(&self, entry: &PromptEntry) -> Result<Vec<Choice>, ConfigurationError> {
        match entry.choices() {
            Choices::None => Ok(Vec::new()),
            Choices::Fixed(choices) => Ok(choices.clone()),
            Choices::Catalog if self.catalog.is_empty() => {
                Err(ConfigurationError::EmptyChoices(entry.key().to_string()))
            }
            Choices::Catalog => Ok(self.catalog.choices()),
        }
    }

    /// For each catalog selection holding conflicting packages, ask once which of
    /// them to remove. The answer lists packages to drop; an empty answer keeps all.
    pub fn resolve_conflicts<P: Prompter + ?Sized>(
        &self,
        mut answers: Answers,
        prompter: &mut P,
    ) -> Result<Answers, ResolveError> {
        let catalog_entries = self
            .spec
            .entries()
            .iter()
            .filter(|e| e.kind() == PromptKind::MultiChoice && *e.choices() == Choices::Catalog);

        for entry in catalog_entries {
            let Some(selection) = answers.get(entry.key()).and_then(AnswerValue::as_list) else {
                continue;
            };
            let selection = selection.to_vec();

            let conflicting = self.catalog.conflicting(&selection);
            if conflicting.is_empty() {
                continue;
            }

            let descriptor = PromptDescriptor {
                key: conflict_prompt_key(entry.key()),
                kind: PromptKind::MultiChoice,
                message: format!(
                    "Some selected packages overlap ({}). Select any to remove",
                    conflicting.join(", ")
                ),
                default: Some(AnswerValue::List(Vec::new())),
                choices: conflicting.iter().map(|name| Choice::item(*name)).collect(),
                rejection: None,
            };

            let removals = ask_until_valid(prompter, descriptor, check_shape)?;
            let removals = removals.as_list().unwrap_or_default();

            let kept: Vec<String> = selection
                .into_iter()
                .filter(|name| !removals.contains(name))
                .collect();
            answers.insert(entry.key(), AnswerValue::List(kept));
        }

        Ok(answers)
    }

    /// Merge answers over the static defaults and fill in derived fields
    pub fn finish(&self, answers: &Answers) -> Result<ResolvedConfig, ResolveError> {
        let mut config = self.defaults.clone();
        for (key, value) in answers.iter() {
            config.set(key, value.clone());
        }

        for field in self.spec.derived() {
            // A prompted answer always wins over a derivation
            if answers.contains(field.key()) {
                continue;
            }
            match field.compute(&config) {
                Some(value) => config.set(field.key(), value),
                None if config.contains(field.key()) => {}
                None => {
                    return Err(ConfigurationError::UnresolvedDerived(field.key().to_string()).into())
                }
            }
        }

        Ok(config)
    }
}

/// Ask until `check` accepts the value.
///
/// Exhausted input falls back to the default only while nothing has been rejected;
/// once a value was rejected, exhaustion ends the run.
fn ask_until_valid<P, F>(
    prompter: &mut P,
    mut descriptor: PromptDescriptor,
    check: F,
) -> Result<AnswerValue, ResolveError>
where
    P: Prompter + ?Sized,
    F: Fn(&PromptDescriptor, &AnswerValue) -> Result<(), ValidationError>,
{
    let mut last_error: Option<ValidationError> = None;

    loop {
        let value = match prompter.ask(&descriptor) {
            Ok(value) => value,
            Err(PromptError::Exhausted) => {
                let fallback = match last_error {
                    None => descriptor.default.clone(),
                    Some(_) => None,
                };
                let Some(fallback) = fallback else {
                    return Err(ResolveError::ValidationExhausted {
                        key: descriptor.key,
                        last_error,
                    });
                };
                return match check(&descriptor, &fallback) {
                    Ok(()) => Ok(fallback),
                    Err(err) => Err(ResolveError::ValidationExhausted {
                        key: descriptor.key,
                        last_error: Some(err),
                    }),
                };
            }
            Err(err) => return Err(ResolveError::from_prompt(err, &descriptor.key)),
        };

        match check(&descriptor, &value) {
            Ok(()) => return Ok(value),
            Err(err) => {
                descriptor.rejection = Some(err.message.clone());
                last_error = Some(err);
            }
        }
    }
}

/// The value has the kind's shape and only uses offered choices
fn check_shape(descriptor: &PromptDescriptor, value: &AnswerValue) -> Result<(), ValidationError> {
    if !descriptor.kind.accepts(value) {
        return Err(ValidationError::new(
            &descriptor.key,
            format!(
                "Expected a {} answer, got {}",
                descriptor.kind.value_type(),
                value.type_name()
            ),
        ));
    }
    check_choice(descriptor, value)
}

fn check_choice(descriptor: &PromptDescriptor, value: &AnswerValue) -> Result<(), ValidationError> {
    let offered = |item: &str| descriptor.selectable().any(|choice| choice == item);

    match (descriptor.kind, value) {
        (PromptKind::SingleChoice, AnswerValue::Text(item)) if !offered(item) => Err(
            ValidationError::new(&descriptor.key, format!("'{}' is not one of the choices", item)),
        ),
        (PromptKind::MultiChoice, AnswerValue::List(items)) => {
            for (index, item) in items.iter().enumerate() {
                if !offered(item) {
                    return Err(ValidationError::new(
                        &descriptor.key,
                        format!("'{}' is not one of the choices", item),
                    ));
                }
                if items[..index].contains(item) {
                    return Err(ValidationError::new(
                        &descriptor.key,
                        format!("'{}' is selected twice", item),
                    ));
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
