//! Command metadata: localized names, descriptions and alias lists.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::AppError;
use crate::i18n::states::check_scopes;
use crate::i18n::{LangMap, Language, LocalizationManager, Namespace, Validate, ValidationReport};
use crate::scope::Scope;

/// Localized data of one command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommandTranslation {
    #[serde(default)]
    pub name: LangMap,

    #[serde(default)]
    pub description: LangMap,

    #[serde(default)]
    pub aliases: LangMap<Vec<String>>,
}

/// `scope → command id → translation`, scopes still in text form.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct CommandTable(BTreeMap<String, BTreeMap<String, CommandTranslation>>);

impl Validate for CommandTable {
    fn check_structure(&self, source: &str) -> Result<(), AppError> {
        check_scopes(source, self.0.keys())
    }

    fn validate(&self, languages: &[Language], report: &mut ValidationReport) {
        for (scope, commands) in &self.0 {
            // Nameless entries are skipped on merge.
            for (id, command) in commands.iter().filter(|(_, c)| !c.name.is_empty()) {
                let prefix = format!("{}.{}", scope, id);
                report.require_all(&format!("{}.name", prefix), &command.name, languages);
                report.require_if_present(
                    &format!("{}.description", prefix),
                    &command.description,
                    languages,
                );
                report.require_if_present(
                    &format!("{}.aliases", prefix),
                    &command.aliases,
                    languages,
                );
            }
        }
    }
}

/// Command metadata store.
#[derive(Debug, Default)]
pub struct CommandLocalizer {
    commands: HashMap<Scope, BTreeMap<String, CommandTranslation>>,
}

impl CommandLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(
        &mut self,
        manager: &mut LocalizationManager,
        path: &Path,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        let table: CommandTable = manager.load_file(path, namespace)?;
        self.merge(table, &path.display().to_string());
        Ok(())
    }

    pub fn load_str(
        &mut self,
        manager: &mut LocalizationManager,
        source_name: &str,
        json: &str,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        let table: CommandTable = manager.load(source_name, json, namespace)?;
        self.merge(table, source_name);
        Ok(())
    }

    /// Localized primary name, with default-language fallback.
    pub fn name<'a>(
        &'a self,
        manager: &LocalizationManager,
        scope: Scope,
        id: &str,
    ) -> Result<&'a str, AppError> {
        manager.fetch(&self.command(scope, id)?.name).map(String::as_str)
    }

    /// Localized description; empty when none is provided.
    pub fn description<'a>(&'a self, manager: &LocalizationManager, scope: Scope, id: &str) -> &'a str {
        self.command(scope, id)
            .ok()
            .and_then(|command| manager.fetch(&command.description).ok())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Localized aliases; empty when none are provided.
    pub fn aliases<'a>(
        &'a self,
        manager: &LocalizationManager,
        scope: Scope,
        id: &str,
    ) -> &'a [String] {
        self.command(scope, id)
            .ok()
            .and_then(|command| manager.fetch(&command.aliases).ok())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the command has a name in exactly `language`, without fallback.
    pub fn has_name_for(&self, scope: Scope, id: &str, language: Language) -> bool {
        self.command(scope, id)
            .map(|command| command.name.contains_key(language.code()))
            .unwrap_or(false)
    }

    fn command(&self, scope: Scope, id: &str) -> Result<&CommandTranslation, AppError> {
        self.commands
            .get(&scope)
            .and_then(|commands| commands.get(id))
            .ok_or_else(|| AppError::CommandNotLocalized {
                scope,
                command: id.to_string(),
            })
    }

    fn merge(&mut self, table: CommandTable, source_name: &str) {
        for (scope, commands) in table.0 {
            let Ok(scope) = scope.parse::<Scope>() else {
                continue;
            };
            let target = self.commands.entry(scope).or_default();
            for (id, command) in commands {
                if command.name.is_empty() {
                    warn!(path = source_name, %scope, command = %id, "Command without a name skipped");
                    continue;
                }
                let entry = target.entry(id).or_default();
                entry.name.extend(command.name);
                entry.description.extend(command.description);
                entry.aliases.extend(command.aliases);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMANDS: &str = r#"{
        "meta": {"supported_languages": ["en", "ru"]},
        "translations": {
            "core": {
                "help": {
                    "name": {"en": "help", "ru": "помощь"},
                    "description": {"en": "Show help", "ru": "Показать помощь"},
                    "aliases": {"en": ["h", "?"], "ru": ["п"]}
                },
                "quit": {
                    "name": {"en": "quit", "ru": "выход"}
                },
                "broken": {
                    "description": {"en": "No name"}
                }
            }
        }
    }"#;

    fn fixture() -> (CommandLocalizer, LocalizationManager) {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut commands = CommandLocalizer::new();
        commands
            .load_str(&mut manager, "core/global_commands.json", COMMANDS, Namespace::Core)
            .unwrap();
        (commands, manager)
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_name_follows_language() {
        let (commands, mut manager) = fixture();
        assert_eq!(commands.name(&manager, Scope::Core, "help").unwrap(), "help");
        manager.set_language("ru").unwrap();
        assert_eq!(commands.name(&manager, Scope::Core, "help").unwrap(), "помощь");
        assert_eq!(commands.aliases(&manager, Scope::Core, "help"), ["п".to_string()]);
    }

    #[test]
    fn test_missing_optional_data_is_empty() {
        let (commands, manager) = fixture();
        assert_eq!(commands.description(&manager, Scope::Core, "quit"), "");
        assert!(commands.aliases(&manager, Scope::Core, "quit").is_empty());
    }

    #[test]
    fn test_nameless_entry_is_skipped() {
        let (commands, manager) = fixture();
        assert_eq!(
            commands.name(&manager, Scope::Core, "broken").unwrap_err(),
            AppError::CommandNotLocalized {
                scope: Scope::Core,
                command: "broken".into()
            }
        );
    }

    #[test]
    fn test_has_name_for_does_not_fall_back() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut commands = CommandLocalizer::new();
        commands
            .load_str(
                &mut manager,
                "game/commands.json",
                r#"{"meta": {"supported_languages": ["en", "ru"]},
                    "translations": {"game": {"restart": {"name": {"en": "restart"}}}}}"#,
                Namespace::Overlay,
            )
            .unwrap();

        let en = Language::from_code("en").unwrap();
        let ru = Language::from_code("ru").unwrap();
        assert!(commands.has_name_for(Scope::Game, "restart", en));
        assert!(!commands.has_name_for(Scope::Game, "restart", ru));
        assert!(!commands.has_name_for(Scope::Core, "restart", en));
    }

    #[test]
    fn test_core_missing_alias_language_fails() {
        let mut manager = LocalizationManager::new("en").unwrap();
        let mut commands = CommandLocalizer::new();
        let result = commands.load_str(
            &mut manager,
            "core/local_commands.json",
            r#"{"meta": {"supported_languages": ["en", "ru"]},
                "translations": {"core": {"back": {
                    "name": {"en": "back", "ru": "назад"},
                    "aliases": {"en": ["b"]}
                }}}}"#,
            Namespace::Core,
        );
        assert_eq!(
            result.unwrap_err(),
            AppError::MissingTranslation {
                path: "core/local_commands.json".into(),
                key: "core.back.aliases".into(),
                lang: "ru".into()
            }
        );
    }
}
