//! Language selection and the shared document loading protocol.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::i18n::{Document, LangMap, Language, Metadata, Namespace, Validate, ValidationReport};

/// Owns the active language, the default language and the set of languages
/// the player may choose from.
///
/// The selectable set grows as core documents load: it is the union of their
/// supported languages, ordered by display name.
#[derive(Debug, Clone)]
pub struct LocalizationManager {
    current: Language,
    default: Language,
    available: Vec<Language>,
}

impl LocalizationManager {
    /// Create a manager whose active language is the default language.
    ///
    /// # Arguments
    /// * `default_code` - Code of the default language (must be in the dictionary)
    pub fn new(default_code: &str) -> Result<Self, AppError> {
        let default = Language::from_code(default_code)?;
        Ok(Self {
            current: default,
            default,
            available: Vec::new(),
        })
    }

    /// The active language.
    pub fn current(&self) -> Language {
        self.current
    }

    pub fn default_language(&self) -> Language {
        self.default
    }

    /// Languages offered for selection, ordered by display name.
    pub fn available_languages(&self) -> &[Language] {
        &self.available
    }

    pub fn is_available(&self, language: Language) -> bool {
        self.available.contains(&language)
    }

    /// Change the active language.
    ///
    /// Only crate-internal: the command registry must be rebuilt after every
    /// switch, which `Session::switch_language` does.
    ///
    /// # Returns
    /// * `Err(AppError::UnknownLanguage)` if the code is not in the dictionary
    /// * `Err(AppError::LanguageNotSupported)` if no core document offers it
    pub(crate) fn set_language(&mut self, code: &str) -> Result<Language, AppError> {
        let language = Language::from_code(code)?;
        if !self.is_available(language) {
            return Err(AppError::LanguageNotSupported {
                code: code.to_string(),
            });
        }
        info!(from = self.current.code(), to = language.code(), "Language switched");
        self.current = language;
        Ok(language)
    }

    /// Pick the value for the active language, falling back to the default.
    pub fn fetch<'a, T>(&self, entry: &'a LangMap<T>) -> Result<&'a T, AppError> {
        entry
            .get(self.current.code())
            .or_else(|| entry.get(self.default.code()))
            .ok_or_else(|| AppError::LanguageNotSupported {
                code: self.current.code().to_string(),
            })
    }

    /// Read and load a document from disk.
    pub fn load_file<T>(&mut self, path: &Path, namespace: Namespace) -> Result<T, AppError>
    where
        T: DeserializeOwned + Validate,
    {
        let source = read_source(path)?;
        self.load(&path.display().to_string(), &source, namespace)
    }

    /// Decode and validate a document.
    ///
    /// Unknown language codes are dropped with a warning. An empty language
    /// list and a missing default language always fail. Missing values fail
    /// core documents and are only logged for overlays. Languages of a core
    /// document join the selectable set.
    ///
    /// # Arguments
    /// * `source_name` - Name used in errors and logs (usually the file path)
    /// * `json` - Document text
    /// * `namespace` - Validation tier
    pub fn load<T>(&mut self, source_name: &str, json: &str, namespace: Namespace) -> Result<T, AppError>
    where
        T: DeserializeOwned + Validate,
    {
        let document: Document<T> =
            serde_json::from_str(json).map_err(|e| AppError::FileParse {
                path: source_name.to_string(),
                reason: e.to_string(),
            })?;
        document.translations.check_structure(source_name)?;

        let mut report = ValidationReport::new(source_name);
        let languages = self.supported_languages(source_name, &document.meta, &mut report)?;
        document.translations.validate(&languages, &mut report);

        for warning in &report.warnings {
            warn!(path = source_name, "{}", warning);
        }
        if let Some(error) = report.take_error() {
            match namespace {
                Namespace::Core => return Err(error),
                Namespace::Overlay => {
                    warn!(path = source_name, error = %error, "Incomplete translations kept");
                }
            }
        }

        if namespace == Namespace::Core {
            self.merge_available(&languages);
        }
        debug!(path = source_name, languages = languages.len(), "Document loaded");
        Ok(document.translations)
    }

    fn supported_languages(
        &self,
        source_name: &str,
        meta: &Metadata,
        report: &mut ValidationReport,
    ) -> Result<Vec<Language>, AppError> {
        if meta.supported_languages.is_empty() {
            return Err(AppError::NoSupportedLanguages {
                path: source_name.to_string(),
            });
        }

        let mut languages = Vec::with_capacity(meta.supported_languages.len());
        for code in &meta.supported_languages {
            match Language::from_code(code) {
                Ok(language) if !languages.contains(&language) => languages.push(language),
                Ok(_) => {}
                Err(_) => report.warn(format!("Dropped unknown language code '{}'", code)),
            }
        }

        if !languages.contains(&self.default) {
            return Err(AppError::DefaultLanguageMissing {
                path: source_name.to_string(),
                lang: self.default.code().to_string(),
            });
        }
        Ok(languages)
    }

    fn merge_available(&mut self, languages: &[Language]) {
        for language in languages {
            if !self.available.contains(language) {
                self.available.push(*language);
            }
        }
        self.available.sort_by_key(|language| language.display_name());
    }
}

/// Read a document's text.
pub fn read_source(path: &Path) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| AppError::FileOpen {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize)]
    #[serde(transparent)]
    struct Flat(BTreeMap<String, LangMap>);

    impl Validate for Flat {
        fn validate(&self, languages: &[Language], report: &mut ValidationReport) {
            for (key, values) in &self.0 {
                report.require_all(key, values, languages);
            }
        }
    }

    fn doc(languages: &str, body: &str) -> String {
        format!(
            r#"{{"meta": {{"supported_languages": {}}}, "translations": {}}}"#,
            languages, body
        )
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_uses_default_as_current() {
        let manager = LocalizationManager::new("en").unwrap();
        assert_eq!(manager.current().code(), "en");
        assert_eq!(manager.default_language().code(), "en");
        assert!(manager.available_languages().is_empty());
    }

    #[test]
    fn test_new_rejects_unknown_default() {
        assert_eq!(
            LocalizationManager::new("xx").unwrap_err(),
            AppError::UnknownLanguage { code: "xx".into() }
        );
    }

    // ==================== Load Protocol Tests ====================

    #[test]
    fn test_core_load_merges_available_sorted_by_display_name() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let json = doc(r#"["ru", "en", "de"]"#, r#"{"hi": {"en": "Hi", "ru": "Привет", "de": "Hallo"}}"#);
        let _: Flat = manager.load("core.json", &json, Namespace::Core).unwrap();

        let names: Vec<_> = manager
            .available_languages()
            .iter()
            .map(|l| l.display_name())
            .collect();
        assert_eq!(names, vec!["Deutsch", "English", "Русский"]);
    }

    #[test]
    fn test_overlay_load_does_not_extend_available() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let json = doc(r#"["en", "de"]"#, r#"{"hi": {"en": "Hi", "de": "Hallo"}}"#);
        let _: Flat = manager.load("app.json", &json, Namespace::Overlay).unwrap();
        assert!(manager.available_languages().is_empty());
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let json = doc(r#"["en", "xx"]"#, r#"{"hi": {"en": "Hi"}}"#);
        let _: Flat = manager.load("core.json", &json, Namespace::Core).unwrap();
        assert_eq!(manager.available_languages().len(), 1);
    }

    #[test]
    fn test_empty_language_list_fails() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let result: Result<Flat, _> = manager.load("a.json", &doc("[]", "{}"), Namespace::Overlay);
        assert_eq!(
            result.unwrap_err(),
            AppError::NoSupportedLanguages { path: "a.json".into() }
        );
    }

    #[test]
    fn test_missing_default_fails_in_any_namespace() {
        let mut manager = LocalizationManager::new("en").unwrap();
        for namespace in [Namespace::Core, Namespace::Overlay] {
            let result: Result<Flat, _> =
                manager.load("a.json", &doc(r#"["ru"]"#, "{}"), namespace);
            assert_eq!(
                result.unwrap_err(),
                AppError::DefaultLanguageMissing {
                    path: "a.json".into(),
                    lang: "en".into()
                }
            );
        }
    }

    #[test]
    fn test_core_missing_values_fail() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let json = doc(r#"["en", "ru"]"#, r#"{"a": {"en": "A"}, "b": {"en": "B"}}"#);
        let result: Result<Flat, _> = manager.load("core.json", &json, Namespace::Core);

        assert!(matches!(result, Err(AppError::Multiple(ref list)) if list.len() == 2));
        assert!(manager.available_languages().is_empty());
    }

    #[test]
    fn test_overlay_missing_values_are_kept() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let json = doc(r#"["en", "ru"]"#, r#"{"a": {"en": "A"}}"#);
        let loaded: Flat = manager.load("app.json", &json, Namespace::Overlay).unwrap();
        assert_eq!(loaded.0["a"]["en"], "A");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let result: Result<Flat, _> = manager.load("bad.json", "{not json", Namespace::Core);
        assert!(matches!(result, Err(AppError::FileParse { ref path, .. }) if path == "bad.json"));
    }

    #[test]
    fn test_load_file_missing_is_open_error() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Flat, _> =
            manager.load_file(&dir.path().join("absent.json"), Namespace::Core);
        assert!(matches!(result, Err(AppError::FileOpen { .. })));
    }

    // ==================== Fetch and Switch Tests ====================

    #[test]
    fn test_fetch_falls_back_to_default() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let json = doc(r#"["en", "ru"]"#, r#"{"a": {"en": "A", "ru": "А"}}"#);
        let _: Flat = manager.load("core.json", &json, Namespace::Core).unwrap();
        manager.set_language("ru").unwrap();

        let mut entry = LangMap::new();
        entry.insert("en".to_string(), "only english".to_string());
        assert_eq!(manager.fetch(&entry).unwrap(), "only english");

        entry.insert("ru".to_string(), "по-русски".to_string());
        assert_eq!(manager.fetch(&entry).unwrap(), "по-русски");
    }

    #[test]
    fn test_fetch_without_current_or_default() {
        let manager = LocalizationManager::new("en").unwrap();
        let mut entry = LangMap::new();
        entry.insert("de".to_string(), "nur deutsch".to_string());
        assert_eq!(
            manager.fetch(&entry).unwrap_err(),
            AppError::LanguageNotSupported { code: "en".into() }
        );
    }

    #[test]
    fn test_set_language_requires_available() {
        let mut manager = LocalizationManager::new("en").unwrap();
        assert_eq!(
            manager.set_language("ru").unwrap_err(),
            AppError::LanguageNotSupported { code: "ru".into() }
        );
        assert_eq!(
            manager.set_language("zz").unwrap_err(),
            AppError::UnknownLanguage { code: "zz".into() }
        );
        assert_eq!(manager.current().code(), "en");
    }
}
