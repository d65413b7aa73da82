//! The dispatch pipeline and its collaborators.
//!
//! [`Dispatcher::handle_message`] drives one inbound message through
//! classification, entity extraction, capability execution, response
//! generation, and session persistence. The classifier and generator
//! are trait seams; the defaults here are deterministic lexical and
//! template implementations (model-backed variants plug in behind the
//! same traits).

pub mod catalog;
pub mod classify;
pub mod dispatcher;
pub mod error;
pub mod extract;
pub mod generate;
pub mod intent;
pub mod traits;

pub use {
    catalog::{IntentCatalog, IntentDef},
    classify::LexicalClassifier,
    dispatcher::Dispatcher,
    error::{Error, Result},
    extract::RegexExtractor,
    generate::TemplateGenerator,
    intent::Intent,
    traits::{EntityExtractor, IntentClassifier, ResponseGenerator},
};
