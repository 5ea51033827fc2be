//! Internationalization (i18n) module for multi-language support.
//!
//! All language-related logic lives here: the language dictionary, the
//! localization manager that owns the active language, and the typed stores
//! for messages, state metadata and command metadata.
//!
//! # Architecture
//!
//! - `registry`: Language dictionary (every code the runtime knows)
//! - `language`: Type-safe `Language` validated against the dictionary
//! - `document`: JSON envelope shared by all localization documents
//! - `validator`: Completeness checks run while loading a document
//! - `manager`: Active/default language, selectable languages, fallback and load protocol
//! - `messages`, `states`, `commands`: Typed localizers
//!
//! # Example
//!
//! ```rust,ignore
//! use game_hub::i18n::{LocalizationManager, MessageLocalizer, Namespace};
//!
//! let mut manager = LocalizationManager::new("en")?;
//! let mut messages = MessageLocalizer::new();
//! messages.load(&mut manager, &paths.core_messages(), Namespace::Core)?;
//!
//! let text = messages.get(&manager, "quit_confirm")?;
//! ```

mod commands;
mod document;
mod language;
mod manager;
mod messages;
mod registry;
mod states;
mod validator;

pub use commands::{CommandLocalizer, CommandTranslation};
pub use document::{Document, LangMap, Metadata, Namespace};
pub use language::Language;
pub use manager::{read_source, LocalizationManager};
pub use messages::MessageLocalizer;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use states::{StateLocalizer, StateTranslation};
pub use validator::{Validate, ValidationReport};
