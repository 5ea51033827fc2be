//! Language dictionary: the static table of every language code the runtime knows.
//!
//! Documents may only declare languages listed here. The table is immutable
//! and initialized once on first access.

use std::sync::OnceLock;

/// Entry of the language dictionary.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ru")
    pub code: &'static str,

    /// English name of the language (e.g., "Russian")
    pub name: &'static str,

    /// Name shown to players, in the language itself (e.g., "Русский")
    pub native_name: &'static str,
}

/// Global language dictionary.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language dictionary.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: known_languages(),
        })
    }

    /// Get a language entry by its code.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 language code (e.g., "en", "ru")
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language is known
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }
}

fn known_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
        },
        LanguageConfig {
            code: "ru",
            name: "Russian",
            native_name: "Русский",
        },
        LanguageConfig {
            code: "uk",
            name: "Ukrainian",
            native_name: "Українська",
        },
        LanguageConfig {
            code: "de",
            name: "German",
            native_name: "Deutsch",
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
        },
        LanguageConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_russian() {
        let config = LanguageRegistry::get().get_by_code("ru").unwrap();
        assert_eq!(config.code, "ru");
        assert_eq!(config.name, "Russian");
        assert_eq!(config.native_name, "Русский");
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LanguageRegistry::get().get_by_code("xx").is_none());
        assert!(LanguageRegistry::get().get_by_code("").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_code("en").is_some());
        assert!(registry.get_by_code("EN").is_none());
    }

    #[test]
    fn test_codes_are_unique() {
        let all = &LanguageRegistry::get().languages;
        let mut codes: Vec<_> = all.iter().map(|lang| lang.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
