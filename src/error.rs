//! Error taxonomy and localized error rendering.
//!
//! Every failure the runtime can surface is an [`AppError`]. Each variant maps
//! to an [`ErrorKind`] that drives recovery in the main loop, and to a message
//! key plus named parameters that [`ErrorRenderer`] resolves through the core
//! message catalog.

use thiserror::Error;

use crate::i18n::{LocalizationManager, MessageLocalizer};
use crate::scope::Scope;
use crate::text::substitute_params;

/// Coarse classification used for recovery decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range user input; the state is retained
    Input,
    /// Missing key, scope or language, or an invalid localization document
    Localization,
    /// Empty or too-shallow state stack; navigation resets to the start state
    Stack,
    /// The input source is closed or interrupted; navigation moves to Exit
    EndOfInput,
    /// Invariant violation inside the runtime
    Internal,
}

impl ErrorKind {
    /// Stable code used when no localized text is available.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Input => "INVALID_INPUT",
            ErrorKind::Localization => "LOCALIZATION_ERROR",
            ErrorKind::Stack => "STATE_STACK_ERROR",
            ErrorKind::EndOfInput => "END_OF_INPUT",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Message key of the label prefixed to rendered errors of this kind.
    fn label_key(&self) -> Option<&'static str> {
        match self {
            ErrorKind::Internal => Some("internal_error"),
            ErrorKind::Localization => Some("localization_error"),
            _ => None,
        }
    }
}

/// Application error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("input is not a valid number")]
    InvalidNumber,

    #[error("number is outside the supported range")]
    OutOfRange,

    #[error("number is below the minimum of {min}")]
    BelowMinimum { min: i64 },

    #[error("number is above the maximum of {max}")]
    AboveMaximum { max: i64 },

    #[error("invalid range {min}..={max}")]
    InvalidRange { min: i64, max: i64 },

    #[error("input interrupted")]
    EndOfInput,

    #[error("console read failed: {reason}")]
    ReadFailed { reason: String },

    #[error("state stack is empty")]
    StackEmpty,

    #[error("state stack has no previous state")]
    StackInsufficient,

    #[error("unknown language code '{code}'")]
    UnknownLanguage { code: String },

    #[error("language '{code}' is not supported")]
    LanguageNotSupported { code: String },

    #[error("translation key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("message set '{set}' not found")]
    SetNotFound { set: String },

    #[error("key '{key}' not found in message set '{set}'")]
    KeyInSetNotFound { set: String, key: String },

    #[error("no translations for scope '{scope}'")]
    ScopeNotFound { scope: Scope },

    #[error("no localization for state '{scope}.{state}'")]
    StateNotLocalized { scope: Scope, state: String },

    #[error("no localization for command '{scope}.{command}'")]
    CommandNotLocalized { scope: Scope, command: String },

    #[error("failed to open '{path}': {reason}")]
    FileOpen { path: String, reason: String },

    #[error("failed to parse '{path}': {reason}")]
    FileParse { path: String, reason: String },

    #[error("'{path}' declares an invalid scope '{scope}'")]
    InvalidScope { path: String, scope: String },

    #[error("'{path}' declares no supported languages")]
    NoSupportedLanguages { path: String },

    #[error("'{path}' does not support the default language '{lang}'")]
    DefaultLanguageMissing { path: String, lang: String },

    #[error("'{path}' has no '{lang}' value for '{key}'")]
    MissingTranslation {
        path: String,
        key: String,
        lang: String,
    },

    #[error("confirmation command used outside a confirmation dialog")]
    InvalidDialog,

    #[error("no game is active")]
    NoActiveGame,

    #[error("{}", join_errors(.0))]
    Multiple(Vec<AppError>),
}

fn join_errors(errors: &[AppError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\r\n")
}

impl AppError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidNumber
            | AppError::OutOfRange
            | AppError::BelowMinimum { .. }
            | AppError::AboveMaximum { .. }
            | AppError::InvalidRange { .. } => ErrorKind::Input,
            AppError::EndOfInput => ErrorKind::EndOfInput,
            AppError::StackEmpty | AppError::StackInsufficient => ErrorKind::Stack,
            AppError::ReadFailed { .. } | AppError::InvalidDialog | AppError::NoActiveGame => {
                ErrorKind::Internal
            }
            _ => ErrorKind::Localization,
        }
    }

    /// Key of the localized message template for this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::InvalidNumber => "invalid_number_input",
            AppError::OutOfRange => "out_of_range_generic",
            AppError::BelowMinimum { .. } => "out_of_range_min",
            AppError::AboveMaximum { .. } => "out_of_range_max",
            AppError::InvalidRange { .. } => "invalid_range",
            AppError::EndOfInput => "interrupt",
            AppError::ReadFailed { .. } => "read_error",
            AppError::StackEmpty => "state_stack_empty",
            AppError::StackInsufficient => "state_stack_insufficient",
            AppError::UnknownLanguage { .. } => "unknown_language",
            AppError::LanguageNotSupported { .. } => "lang_not_supported",
            AppError::KeyNotFound { .. } => "key_not_found",
            AppError::SetNotFound { .. } => "set_not_found",
            AppError::KeyInSetNotFound { .. } => "key_in_set_not_found",
            AppError::ScopeNotFound { .. } => "scope_not_found",
            AppError::StateNotLocalized { .. } => "state_localization_not_found",
            AppError::CommandNotLocalized { .. } => "command_localization_not_found",
            AppError::FileOpen { .. } => "file_open_error",
            AppError::FileParse { .. } => "file_parse_error",
            AppError::InvalidScope { .. } => "invalid_scope",
            AppError::NoSupportedLanguages { .. } => "no_supported_languages",
            AppError::DefaultLanguageMissing { .. } => "default_language_missing",
            AppError::MissingTranslation { .. } => "missing_translation",
            AppError::InvalidDialog => "invalid_confirmation_dialog",
            AppError::NoActiveGame => "no_active_game",
            AppError::Multiple(_) => "multiple_errors",
        }
    }

    /// Named parameters substituted into the message template.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::BelowMinimum { min } => vec![("min", min.to_string())],
            AppError::AboveMaximum { max } => vec![("max", max.to_string())],
            AppError::InvalidRange { min, max } => {
                vec![("min", min.to_string()), ("max", max.to_string())]
            }
            AppError::ReadFailed { reason } => vec![("error", reason.clone())],
            AppError::UnknownLanguage { code } => vec![("code", code.clone())],
            AppError::LanguageNotSupported { code } => vec![("lang", code.clone())],
            AppError::KeyNotFound { key } => vec![("key", key.clone())],
            AppError::SetNotFound { set } => vec![("set", set.clone())],
            AppError::KeyInSetNotFound { set, key } => {
                vec![("set", set.clone()), ("key", key.clone())]
            }
            AppError::ScopeNotFound { scope } => vec![("scope", scope.to_string())],
            AppError::StateNotLocalized { scope, state } => {
                vec![("state", format!("{}.{}", scope, state))]
            }
            AppError::CommandNotLocalized { scope, command } => {
                vec![("command", format!("{}.{}", scope, command))]
            }
            AppError::FileOpen { path, reason } | AppError::FileParse { path, reason } => {
                vec![("file", path.clone()), ("error", reason.clone())]
            }
            AppError::InvalidScope { path, scope } => {
                vec![("file", path.clone()), ("scope", scope.clone())]
            }
            AppError::NoSupportedLanguages { path } => vec![("file", path.clone())],
            AppError::DefaultLanguageMissing { path, lang } => {
                vec![("file", path.clone()), ("lang", lang.clone())]
            }
            AppError::MissingTranslation { path, key, lang } => vec![
                ("file", path.clone()),
                ("key", key.clone()),
                ("lang", lang.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// Stack errors trigger a reset to the start state.
    pub fn is_stack_error(&self) -> bool {
        self.kind() == ErrorKind::Stack
    }

    /// End-of-input forces the Exit state.
    pub fn is_end_of_input(&self) -> bool {
        self.kind() == ErrorKind::EndOfInput
    }

    /// Collapse a list of problems into one error.
    ///
    /// # Returns
    /// * `None` if `errors` is empty
    /// * the single error if there is exactly one
    /// * `AppError::Multiple` otherwise
    pub fn from_list(mut errors: Vec<AppError>) -> Option<AppError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(AppError::Multiple(errors)),
        }
    }
}

/// Renders errors as localized, user-facing text.
pub struct ErrorRenderer<'a> {
    messages: &'a MessageLocalizer,
    manager: &'a LocalizationManager,
}

impl<'a> ErrorRenderer<'a> {
    pub fn new(messages: &'a MessageLocalizer, manager: &'a LocalizationManager) -> Self {
        Self { messages, manager }
    }

    /// Render an error in the active language.
    ///
    /// Composite errors render each member in turn, CRLF-separated. When the
    /// message template itself is missing the result is `<CODE>: <description>`.
    pub fn render(&self, error: &AppError) -> String {
        if let AppError::Multiple(errors) = error {
            return errors
                .iter()
                .map(|e| self.render(e))
                .collect::<Vec<_>>()
                .join("\r\n");
        }

        let kind = error.kind();
        let template = match self.messages.get(self.manager, error.message_key()) {
            Ok(template) => template,
            Err(_) => return format!("{}: {}", kind.code(), error),
        };
        let body = substitute_params(template, &error.params());

        match kind.label_key() {
            Some(label_key) => {
                let label = self
                    .messages
                    .get(self.manager, label_key)
                    .unwrap_or(kind.code());
                format!("{}: {}", label, body)
            }
            None => body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Namespace;

    fn renderer_fixture() -> (MessageLocalizer, LocalizationManager) {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut messages = MessageLocalizer::new();
        messages
            .load_str(
                &mut manager,
                "core/translations.json",
                r#"{
                    "meta": {"supported_languages": ["en"]},
                    "translations": {
                        "out_of_range_min": {"en": "Must be at least $min."},
                        "state_stack_empty": {"en": "Nothing to go back to."},
                        "localization_error": {"en": "Localization error"},
                        "key_not_found": {"en": "Key $key is missing."}
                    }
                }"#,
                Namespace::Core,
            )
            .unwrap();
        (messages, manager)
    }

    // ==================== Classification Tests ====================

    #[test]
    fn test_error_kinds() {
        assert_eq!(AppError::InvalidNumber.kind(), ErrorKind::Input);
        assert_eq!(AppError::StackInsufficient.kind(), ErrorKind::Stack);
        assert_eq!(AppError::EndOfInput.kind(), ErrorKind::EndOfInput);
        assert_eq!(AppError::InvalidDialog.kind(), ErrorKind::Internal);
        assert_eq!(
            AppError::KeyNotFound { key: "x".into() }.kind(),
            ErrorKind::Localization
        );
    }

    #[test]
    fn test_recovery_predicates() {
        assert!(AppError::StackEmpty.is_stack_error());
        assert!(AppError::EndOfInput.is_end_of_input());
        assert!(!AppError::OutOfRange.is_stack_error());
    }

    #[test]
    fn test_from_list() {
        assert_eq!(AppError::from_list(vec![]), None);
        assert_eq!(
            AppError::from_list(vec![AppError::OutOfRange]),
            Some(AppError::OutOfRange)
        );
        let multiple = AppError::from_list(vec![AppError::OutOfRange, AppError::StackEmpty]);
        assert!(matches!(multiple, Some(AppError::Multiple(ref list)) if list.len() == 2));
    }

    #[test]
    fn test_multiple_display_joins_members() {
        let err = AppError::Multiple(vec![AppError::StackEmpty, AppError::EndOfInput]);
        assert_eq!(err.to_string(), "state stack is empty\r\ninput interrupted");
    }

    // ==================== Rendering Tests ====================

    #[test]
    fn test_render_substitutes_params() {
        let (messages, manager) = renderer_fixture();
        let renderer = ErrorRenderer::new(&messages, &manager);
        assert_eq!(
            renderer.render(&AppError::BelowMinimum { min: 5 }),
            "Must be at least 5."
        );
    }

    #[test]
    fn test_render_prefixes_localization_label() {
        let (messages, manager) = renderer_fixture();
        let renderer = ErrorRenderer::new(&messages, &manager);
        assert_eq!(
            renderer.render(&AppError::KeyNotFound { key: "greeting".into() }),
            "Localization error: Key greeting is missing."
        );
    }

    #[test]
    fn test_render_placeholder_when_template_missing() {
        let (messages, manager) = renderer_fixture();
        let renderer = ErrorRenderer::new(&messages, &manager);
        assert_eq!(
            renderer.render(&AppError::InvalidDialog),
            "INTERNAL_ERROR: confirmation command used outside a confirmation dialog"
        );
    }

    #[test]
    fn test_render_composite_renders_each() {
        let (messages, manager) = renderer_fixture();
        let renderer = ErrorRenderer::new(&messages, &manager);
        let err = AppError::Multiple(vec![
            AppError::StackEmpty,
            AppError::BelowMinimum { min: 1 },
        ]);
        assert_eq!(
            renderer.render(&err),
            "Nothing to go back to.\r\nMust be at least 1."
        );
    }
}
