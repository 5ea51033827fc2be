use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::i18n::{Language, Namespace};

#[derive(Debug, Clone)]
pub struct Config {
    // Localization
    pub data_dir: PathBuf,
    pub default_language: String,

    // Console
    pub wrap_width: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Localization
            data_dir: std::env::var("GAME_HUB_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_data_dir()),
            default_language: std::env::var("GAME_HUB_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),

            // Console
            wrap_width: std::env::var("GAME_HUB_WRAP_WIDTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(80),
        };

        Language::from_code(&config.default_language)
            .with_context(|| format!("GAME_HUB_LANGUAGE '{}' is not a known language", config.default_language))?;

        Ok(config)
    }

    pub fn paths(&self) -> DataPaths {
        DataPaths::new(&self.data_dir)
    }
}

/// `<exe dir>/data` when it exists, otherwise `./data`.
fn default_data_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("data")))
        .filter(|dir| dir.is_dir())
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Layout of the localization tree.
///
/// ```text
/// data/
///   core/  translations.json states.json global_commands.json local_commands.json
///   app/   translations.json states.json
///   games/ translations.json <game id>/{states,commands,translations}.json
/// ```
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn core_messages(&self) -> PathBuf {
        self.root.join("core").join("translations.json")
    }

    pub fn core_states(&self) -> PathBuf {
        self.root.join("core").join("states.json")
    }

    pub fn core_global_commands(&self) -> PathBuf {
        self.root.join("core").join("global_commands.json")
    }

    pub fn core_local_commands(&self) -> PathBuf {
        self.root.join("core").join("local_commands.json")
    }

    pub fn app_messages(&self) -> PathBuf {
        self.root.join("app").join("translations.json")
    }

    pub fn app_states(&self) -> PathBuf {
        self.root.join("app").join("states.json")
    }

    /// Per-game display data (name, description, author) as optional sets.
    pub fn games_overlay(&self) -> PathBuf {
        self.root.join("games").join("translations.json")
    }

    pub fn game_states(&self, game_id: &str) -> PathBuf {
        self.root.join("games").join(game_id).join("states.json")
    }

    pub fn game_commands(&self, game_id: &str) -> PathBuf {
        self.root.join("games").join(game_id).join("commands.json")
    }

    pub fn game_messages(&self, game_id: &str) -> PathBuf {
        self.root.join("games").join(game_id).join("translations.json")
    }

    /// Documents under `<root>/core` are core; everything else is an overlay.
    pub fn namespace_of(&self, path: &Path) -> Namespace {
        if path.starts_with(self.root.join("core")) {
            Namespace::Core
        } else {
            Namespace::Overlay
        }
    }
}
