//! Interactive prompt collaborator backed by cliclack

use crate::prompt::{AnswerValue, Choice, PromptDescriptor, PromptError, PromptKind, Prompter};
use std::io;

/// Asks each question in the terminal
#[derive(Debug, Default)]
pub struct CliclackPrompter;

impl CliclackPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for CliclackPrompter {
    fn ask(&mut self, prompt: &PromptDescriptor) -> Result<AnswerValue, PromptError> {
        if let Some(rejection) = &prompt.rejection {
            cliclack::log::warning(rejection).map_err(cancel_or_io)?;
        }

        let answer = match prompt.kind {
            PromptKind::Text => ask_text(prompt),
            PromptKind::Boolean => ask_confirm(prompt),
            PromptKind::SingleChoice => ask_select(prompt),
            PromptKind::MultiChoice => ask_multiselect(prompt),
        };
        answer.map_err(cancel_or_io)
    }
}

/// cliclack reports Esc / Ctrl-C as an interrupted read
fn cancel_or_io(err: io::Error) -> PromptError {
    match err.kind() {
        io::ErrorKind::Interrupted => PromptError::Cancelled,
        _ => PromptError::Io(err),
    }
}

fn ask_text(prompt: &PromptDescriptor) -> io::Result<AnswerValue> {
    let mut input = cliclack::input(&prompt.message);
    if let Some(default) = prompt.default.as_ref().and_then(AnswerValue::as_text) {
        input = input.default_input(default).placeholder(default);
    }
    let value: String = input.interact()?;
    Ok(AnswerValue::Text(value))
}

fn ask_confirm(prompt: &PromptDescriptor) -> io::Result<AnswerValue> {
    let initial = prompt
        .default
        .as_ref()
        .and_then(AnswerValue::as_bool)
        .unwrap_or(false);
    let value = cliclack::confirm(&prompt.message)
        .initial_value(initial)
        .interact()?;
    Ok(AnswerValue::Bool(value))
}

fn ask_select(prompt: &PromptDescriptor) -> io::Result<AnswerValue> {
    let mut select = cliclack::select(&prompt.message);
    for (value, hint) in hinted_items(&prompt.choices) {
        select = select.item(value.to_string(), value, hint);
    }
    if let Some(default) = prompt.default.as_ref().and_then(AnswerValue::as_text) {
        select = select.initial_value(default.to_string());
    }
    let value: String = select.interact()?;
    Ok(AnswerValue::Text(value))
}

fn ask_multiselect(prompt: &PromptDescriptor) -> io::Result<AnswerValue> {
    let mut multi = cliclack::multiselect(&prompt.message);
    for (value, hint) in hinted_items(&prompt.choices) {
        multi = multi.item(value.to_string(), value, hint);
    }
    if let Some(defaults) = prompt.default.as_ref().and_then(AnswerValue::as_list) {
        multi = multi.initial_values(defaults.to_vec());
    }
    let values: Vec<String> = multi.required(false).interact()?;
    Ok(AnswerValue::List(values))
}

/// Selectable items paired with a hint.
///
/// cliclack has no separators, so a separator's label becomes the hint of the
/// first item in its group.
fn hinted_items(choices: &[Choice]) -> Vec<(&str, &str)> {
    let mut items = Vec::new();
    let mut pending: Option<&str> = None;
    for choice in choices {
        match choice {
            Choice::Separator(label) => pending = Some(label),
            Choice::Item(value) => items.push((value.as_str(), pending.take().unwrap_or(""))),
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_labels_become_hints() {
        let choices = vec![
            Choice::separator("JavaScript"),
            Choice::item("gsap"),
            Choice::item("jquery"),
            Choice::separator("PostCSS"),
            Choice::item("postcss-mixins"),
        ];

        assert_eq!(
            hinted_items(&choices),
            vec![
                ("gsap", "JavaScript"),
                ("jquery", ""),
                ("postcss-mixins", "PostCSS"),
            ]
        );
    }

    #[test]
    fn test_interrupt_maps_to_cancel() {
        let err = io::Error::new(io::ErrorKind::Interrupted, "ctrl-c");
        assert!(matches!(cancel_or_io(err), PromptError::Cancelled));

        let err = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(cancel_or_io(err), PromptError::Io(_)));
    }
}
