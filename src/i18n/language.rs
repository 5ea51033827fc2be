//! Language type: a code validated against the language dictionary.

use crate::error::AppError;
use crate::i18n::{LanguageConfig, LanguageRegistry};

/// A language known to the dictionary.
///
/// Only constructible through [`Language::from_code`], so holding one proves
/// the code is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "ru")
    code: &'static str,
}

impl Language {
    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is in the dictionary
    /// * `Err(AppError::UnknownLanguage)` otherwise
    pub fn from_code(code: &str) -> Result<Language, AppError> {
        LanguageRegistry::get()
            .get_by_code(code)
            .map(|config| Language { code: config.code })
            .ok_or_else(|| AppError::UnknownLanguage {
                code: code.to_string(),
            })
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the dictionary entry for this language.
    ///
    /// # Panics
    /// Never in practice: a `Language` can only be built from a dictionary code.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// The name shown to players (the language's own name for itself).
    pub fn display_name(&self) -> &'static str {
        self.config().native_name
    }

    /// The English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }
}
