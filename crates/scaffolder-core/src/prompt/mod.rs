//! Prompt definitions, answer values and the prompt collaborator contract
//!
//! This module provides:
//! - Answer values and the ordered answer map
//! - Declarative prompt entries, derived fields and the `PromptSpec` list
//! - The `Prompter` trait implemented by interactive and scripted collaborators

pub mod collaborator;
pub mod spec;
pub mod value;

pub use collaborator::{Choice, PromptDescriptor, PromptError, Prompter, ScriptedPrompter};
pub use spec::{Choices, DefaultValue, DerivedField, PriorAnswers, PromptEntry, PromptKind, PromptSpec};
pub use value::{AnswerValue, Answers};
