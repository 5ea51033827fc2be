//! Flat message catalogs and optional per-entity message sets.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::i18n::{LangMap, Language, LocalizationManager, Namespace, Validate, ValidationReport};

/// `key → (lang → text)`
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct MessageTable(BTreeMap<String, LangMap>);

impl Validate for MessageTable {
    fn validate(&self, languages: &[Language], report: &mut ValidationReport) {
        for (key, values) in &self.0 {
            report.require_all(key, values, languages);
        }
    }
}

/// `set → key → (lang → text)`
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct MessageSets(BTreeMap<String, BTreeMap<String, LangMap>>);

impl Validate for MessageSets {
    fn validate(&self, languages: &[Language], report: &mut ValidationReport) {
        for (set, messages) in &self.0 {
            for (key, values) in messages {
                report.require_all(&format!("{}.{}", set, key), values, languages);
            }
        }
    }
}

/// Message store. Successive loads merge per language.
#[derive(Debug, Default)]
pub struct MessageLocalizer {
    messages: BTreeMap<String, LangMap>,
    sets: BTreeMap<String, BTreeMap<String, LangMap>>,
}

impl MessageLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a flat message document from disk.
    pub fn load(
        &mut self,
        manager: &mut LocalizationManager,
        path: &Path,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        let table: MessageTable = manager.load_file(path, namespace)?;
        self.merge(table);
        Ok(())
    }

    /// Load a flat message document from text.
    pub fn load_str(
        &mut self,
        manager: &mut LocalizationManager,
        source_name: &str,
        json: &str,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        let table: MessageTable = manager.load(source_name, json, namespace)?;
        self.merge(table);
        Ok(())
    }

    /// Load a document of optional message sets from disk.
    pub fn load_optional(
        &mut self,
        manager: &mut LocalizationManager,
        path: &Path,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        let sets: MessageSets = manager.load_file(path, namespace)?;
        self.merge_sets(sets);
        Ok(())
    }

    /// Look up a message in the active language, falling back to the default.
    pub fn get<'a>(&'a self, manager: &LocalizationManager, key: &str) -> Result<&'a str, AppError> {
        let entry = self.messages.get(key).ok_or_else(|| AppError::KeyNotFound {
            key: key.to_string(),
        })?;
        manager.fetch(entry).map(String::as_str)
    }

    /// Look up a message inside an optional set.
    ///
    /// # Returns
    /// * `Err(AppError::SetNotFound)` if the set is absent
    /// * `Err(AppError::KeyInSetNotFound)` if the set lacks the key
    pub fn get_optional<'a>(
        &'a self,
        manager: &LocalizationManager,
        set: &str,
        key: &str,
    ) -> Result<&'a str, AppError> {
        let messages = self.sets.get(set).ok_or_else(|| AppError::SetNotFound {
            set: set.to_string(),
        })?;
        let entry = messages
            .get(key)
            .ok_or_else(|| AppError::KeyInSetNotFound {
                set: set.to_string(),
                key: key.to_string(),
            })?;
        manager.fetch(entry).map(String::as_str)
    }

    fn merge(&mut self, table: MessageTable) {
        for (key, values) in table.0 {
            self.messages.entry(key).or_default().extend(values);
        }
    }

    fn merge_sets(&mut self, sets: MessageSets) {
        for (set, messages) in sets.0 {
            let target = self.sets.entry(set).or_default();
            for (key, values) in messages {
                target.entry(key).or_default().extend(values);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (MessageLocalizer, LocalizationManager) {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut messages = MessageLocalizer::new();
        messages
            .load_str(
                &mut manager,
                "core/translations.json",
                r#"{
                    "meta": {"supported_languages": ["en", "ru"]},
                    "translations": {
                        "greeting": {"en": "Hello", "ru": "Привет"},
                        "farewell": {"en": "Bye", "ru": "Пока"}
                    }
                }"#,
                Namespace::Core,
            )
            .unwrap();
        (messages, manager)
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_active_language() {
        let (messages, mut manager) = fixture();
        assert_eq!(messages.get(&manager, "greeting").unwrap(), "Hello");
        manager.set_language("ru").unwrap();
        assert_eq!(messages.get(&manager, "greeting").unwrap(), "Привет");
    }

    #[test]
    fn test_get_missing_key() {
        let (messages, manager) = fixture();
        assert_eq!(
            messages.get(&manager, "nope").unwrap_err(),
            AppError::KeyNotFound { key: "nope".into() }
        );
    }

    #[test]
    fn test_overlay_gap_falls_back_to_default() {
        let (mut messages, mut manager) = fixture();
        messages
            .load_str(
                &mut manager,
                "app/translations.json",
                r#"{
                    "meta": {"supported_languages": ["en", "ru"]},
                    "translations": {"title": {"en": "Game Hub"}}
                }"#,
                Namespace::Overlay,
            )
            .unwrap();
        manager.set_language("ru").unwrap();
        assert_eq!(messages.get(&manager, "title").unwrap(), "Game Hub");
    }

    // ==================== Merge Tests ====================

    #[test]
    fn test_loads_merge_per_language() {
        let (mut messages, mut manager) = fixture();
        messages
            .load_str(
                &mut manager,
                "extra.json",
                r#"{
                    "meta": {"supported_languages": ["en"]},
                    "translations": {"greeting": {"en": "Hi there"}, "new": {"en": "New"}}
                }"#,
                Namespace::Overlay,
            )
            .unwrap();

        assert_eq!(messages.get(&manager, "greeting").unwrap(), "Hi there");
        assert_eq!(messages.get(&manager, "new").unwrap(), "New");
        manager.set_language("ru").unwrap();
        assert_eq!(messages.get(&manager, "greeting").unwrap(), "Привет");
    }

    // ==================== Optional Set Tests ====================

    #[test]
    fn test_optional_sets() {
        let (mut messages, mut manager) = fixture();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("translations.json");
        std::fs::write(
            &path,
            r#"{
                "meta": {"supported_languages": ["en", "ru"]},
                "translations": {
                    "name": {"guess_number": {"en": "Guess the number", "ru": "Угадай число"}}
                }
            }"#,
        )
        .unwrap();
        messages
            .load_optional(&mut manager, &path, Namespace::Overlay)
            .unwrap();

        assert_eq!(
            messages.get_optional(&manager, "name", "guess_number").unwrap(),
            "Guess the number"
        );
        assert_eq!(
            messages.get_optional(&manager, "author", "guess_number").unwrap_err(),
            AppError::SetNotFound { set: "author".into() }
        );
        assert_eq!(
            messages.get_optional(&manager, "name", "tic_tac_toe").unwrap_err(),
            AppError::KeyInSetNotFound {
                set: "name".into(),
                key: "tic_tac_toe".into()
            }
        );
    }
}
