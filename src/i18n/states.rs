//! State metadata: descriptions and per-state messages, grouped by scope.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;
use crate::i18n::{LangMap, Language, LocalizationManager, Namespace, Validate, ValidationReport};
use crate::scope::Scope;

/// Localized data of one state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StateTranslation {
    #[serde(default)]
    pub description: LangMap,

    #[serde(default)]
    pub messages: BTreeMap<String, LangMap>,
}

/// `scope → state id → translation`, scopes still in text form.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct StateTable(BTreeMap<String, BTreeMap<String, StateTranslation>>);

impl Validate for StateTable {
    fn check_structure(&self, source: &str) -> Result<(), AppError> {
        check_scopes(source, self.0.keys())
    }

    fn validate(&self, languages: &[Language], report: &mut ValidationReport) {
        for (scope, states) in &self.0 {
            for (id, state) in states {
                let prefix = format!("{}.{}", scope, id);
                report.require_if_present(
                    &format!("{}.description", prefix),
                    &state.description,
                    languages,
                );
                for (key, values) in &state.messages {
                    report.require_all(&format!("{}.messages.{}", prefix, key), values, languages);
                }
            }
        }
    }
}

/// Parse every scope key of a document.
pub(crate) fn check_scopes<'a>(
    source: &str,
    scopes: impl IntoIterator<Item = &'a String>,
) -> Result<(), AppError> {
    for scope in scopes {
        scope.parse::<Scope>().map_err(|_| AppError::InvalidScope {
            path: source.to_string(),
            scope: scope.clone(),
        })?;
    }
    Ok(())
}

/// State metadata store.
#[derive(Debug, Default)]
pub struct StateLocalizer {
    states: HashMap<Scope, BTreeMap<String, StateTranslation>>,
}

impl StateLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &mut self,
        manager: &mut LocalizationManager,
        path: &Path,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        let table: StateTable = manager.load_file(path, namespace)?;
        self.merge(table);
        Ok(())
    }

    pub fn load_str(
        &mut self,
        manager: &mut LocalizationManager,
        source_name: &str,
        json: &str,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        let table: StateTable = manager.load(source_name, json, namespace)?;
        self.merge(table);
        Ok(())
    }

    /// Localized description of a state.
    pub fn get_description<'a>(
        &'a self,
        manager: &LocalizationManager,
        scope: Scope,
        id: &str,
    ) -> Result<&'a str, AppError> {
        let state = self.state(scope, id)?;
        manager.fetch(&state.description).map(String::as_str)
    }

    /// Localized message belonging to a state.
    pub fn get_message<'a>(
        &'a self,
        manager: &LocalizationManager,
        scope: Scope,
        id: &str,
        key: &str,
    ) -> Result<&'a str, AppError> {
        let entry = self
            .state(scope, id)?
            .messages
            .get(key)
            .ok_or_else(|| AppError::KeyNotFound {
                key: format!("{}.{}.{}", scope, id, key),
            })?;
        manager.fetch(entry).map(String::as_str)
    }

    fn state(&self, scope: Scope, id: &str) -> Result<&StateTranslation, AppError> {
        self.states
            .get(&scope)
            .ok_or(AppError::ScopeNotFound { scope })?
            .get(id)
            .ok_or_else(|| AppError::StateNotLocalized {
                scope,
                state: id.to_string(),
            })
    }

    fn merge(&mut self, table: StateTable) {
        for (scope, states) in table.0 {
            // Scopes were checked during load.
            let Ok(scope) = scope.parse::<Scope>() else {
                continue;
            };
            let target = self.states.entry(scope).or_default();
            for (id, state) in states {
                let entry = target.entry(id).or_default();
                entry.description.extend(state.description);
                for (key, values) in state.messages {
                    entry.messages.entry(key).or_default().extend(values);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE_STATES: &str = r#"{
        "meta": {"supported_languages": ["en", "ru"]},
        "translations": {
            "core": {
                "menu": {
                    "description": {"en": "Menu", "ru": "Меню"},
                    "messages": {
                        "make_your_choice": {"en": "Make your choice", "ru": "Сделайте выбор"}
                    }
                }
            }
        }
    }"#;

    fn fixture() -> (StateLocalizer, LocalizationManager) {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut states = StateLocalizer::new();
        states
            .load_str(&mut manager, "core/states.json", CORE_STATES, Namespace::Core)
            .unwrap();
        (states, manager)
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_description_and_message() {
        let (states, mut manager) = fixture();
        assert_eq!(states.get_description(&manager, Scope::Core, "menu").unwrap(), "Menu");
        manager.set_language("ru").unwrap();
        assert_eq!(
            states
                .get_message(&manager, Scope::Core, "menu", "make_your_choice")
                .unwrap(),
            "Сделайте выбор"
        );
    }

    #[test]
    fn test_lookup_errors() {
        let (states, manager) = fixture();
        assert_eq!(
            states.get_description(&manager, Scope::Game, "menu").unwrap_err(),
            AppError::ScopeNotFound { scope: Scope::Game }
        );
        assert_eq!(
            states.get_description(&manager, Scope::Core, "nope").unwrap_err(),
            AppError::StateNotLocalized {
                scope: Scope::Core,
                state: "nope".into()
            }
        );
        assert!(matches!(
            states.get_message(&manager, Scope::Core, "menu", "nope"),
            Err(AppError::KeyNotFound { .. })
        ));
    }

    // ==================== Load Tests ====================

    #[test]
    fn test_invalid_scope_fails() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut states = StateLocalizer::new();
        let result = states.load_str(
            &mut manager,
            "bad.json",
            r#"{"meta": {"supported_languages": ["en"]},
                "translations": {"system": {"x": {"description": {"en": "X"}}}}}"#,
            Namespace::Overlay,
        );
        assert_eq!(
            result.unwrap_err(),
            AppError::InvalidScope {
                path: "bad.json".into(),
                scope: "system".into()
            }
        );
    }

    #[test]
    fn test_core_missing_message_language_fails() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut states = StateLocalizer::new();
        let result = states.load_str(
            &mut manager,
            "core/states.json",
            r#"{"meta": {"supported_languages": ["en", "ru"]},
                "translations": {"core": {"x": {"messages": {"m": {"ru": "м"}}}}}}"#,
            Namespace::Core,
        );
        assert_eq!(
            result.unwrap_err(),
            AppError::MissingTranslation {
                path: "core/states.json".into(),
                key: "core.x.messages.m".into(),
                lang: "en".into()
            }
        );
    }

    #[test]
    fn test_merge_adds_states_and_messages() {
        let (mut states, mut manager) = fixture();
        states
            .load_str(
                &mut manager,
                "app/states.json",
                r#"{"meta": {"supported_languages": ["en"]},
                    "translations": {
                        "core": {"menu": {"messages": {"invalid_option": {"en": "Invalid option"}}}},
                        "app": {"main_menu": {"description": {"en": "Main menu"}}}
                    }}"#,
                Namespace::Overlay,
            )
            .unwrap();

        assert_eq!(states.get_description(&manager, Scope::Core, "menu").unwrap(), "Menu");
        assert_eq!(
            states
                .get_message(&manager, Scope::Core, "menu", "invalid_option")
                .unwrap(),
            "Invalid option"
        );
        assert_eq!(
            states.get_description(&manager, Scope::App, "main_menu").unwrap(),
            "Main menu"
        );
    }
}
