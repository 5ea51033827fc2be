//! Global and local command catalogs with alias and prefix resolution.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::AppError;
use crate::i18n::{CommandLocalizer, LocalizationManager, Namespace};
use crate::navigation::Command;

/// Localized view of a registered command, as shown by `help`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
}

/// One catalog: its localizer, its commands sorted by localized name and the
/// lowercase name/alias index derived from them.
#[derive(Default)]
struct Catalog {
    localizer: CommandLocalizer,
    commands: Vec<Rc<dyn Command>>,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Catalog {
    fn register(
        &mut self,
        manager: &LocalizationManager,
        commands: Vec<Rc<dyn Command>>,
    ) -> Result<(), AppError> {
        let language = manager.current();
        if let Some(missing) = commands
            .iter()
            .find(|c| !self.localizer.has_name_for(c.scope(), c.id(), language))
        {
            return Err(AppError::CommandNotLocalized {
                scope: missing.scope(),
                command: missing.id().to_string(),
            });
        }

        self.commands = commands;
        self.rebuild(manager);
        Ok(())
    }

    fn rebuild(&mut self, manager: &LocalizationManager) {
        let localizer = &self.localizer;
        let name_of = |command: &Rc<dyn Command>| {
            localizer
                .name(manager, command.scope(), command.id())
                .map(str::to_lowercase)
                .unwrap_or_default()
        };

        let mut named: Vec<(String, Rc<dyn Command>)> = self
            .commands
            .drain(..)
            .map(|command| (name_of(&command), command))
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));

        let (names, commands): (Vec<_>, Vec<_>) = named.into_iter().unzip();
        self.names = names;
        self.commands = commands;

        self.index.clear();
        for (position, name) in self.names.iter().enumerate() {
            self.index.entry(name.clone()).or_insert(position);
        }
        for (position, command) in self.commands.iter().enumerate() {
            for alias in self.localizer.aliases(manager, command.scope(), command.id()) {
                self.index.entry(alias.to_lowercase()).or_insert(position);
            }
        }
    }

    fn exact(&self, token: &str) -> Option<&Rc<dyn Command>> {
        self.index.get(token).map(|&position| &self.commands[position])
    }

    /// The single command whose name or alias starts with `prefix`.
    fn by_prefix(&self, prefix: &str) -> Option<&Rc<dyn Command>> {
        let matches: BTreeSet<usize> = self
            .index
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(_, &position)| position)
            .collect();

        match matches.len() {
            1 => matches.first().map(|&position| &self.commands[position]),
            _ => None,
        }
    }

    fn contains(&self, command: &dyn Command) -> bool {
        self.commands
            .iter()
            .any(|c| c.scope() == command.scope() && c.id() == command.id())
    }

    fn info(&self, manager: &LocalizationManager, command: &dyn Command) -> Result<CommandInfo, AppError> {
        let (scope, id) = (command.scope(), command.id());
        Ok(CommandInfo {
            name: self.localizer.name(manager, scope, id)?.to_string(),
            aliases: self.localizer.aliases(manager, scope, id).to_vec(),
            description: self.localizer.description(manager, scope, id).to_string(),
        })
    }
}

/// Resolves player input to commands.
///
/// The global catalog is registered once at startup; the local catalog is
/// replaced on every transition with the commands of the entered state.
/// Indices cache localized strings, so [`rebuild`](Self::rebuild) must run
/// after every language switch.
#[derive(Default)]
pub struct CommandRegistry {
    global: Catalog,
    local: Catalog,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_global_translations(
        &mut self,
        manager: &mut LocalizationManager,
        path: &Path,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        self.global.localizer.load(manager, path, namespace)
    }

    pub fn load_local_translations(
        &mut self,
        manager: &mut LocalizationManager,
        path: &Path,
        namespace: Namespace,
    ) -> Result<(), AppError> {
        self.local.localizer.load(manager, path, namespace)
    }

    pub fn global_localizer_mut(&mut self) -> &mut CommandLocalizer {
        &mut self.global.localizer
    }

    pub fn local_localizer_mut(&mut self) -> &mut CommandLocalizer {
        &mut self.local.localizer
    }

    /// Replace the global catalog.
    ///
    /// All-or-nothing: if any command lacks a name in the active language the
    /// previous catalog is kept.
    pub fn register_global(
        &mut self,
        manager: &LocalizationManager,
        commands: Vec<Rc<dyn Command>>,
    ) -> Result<(), AppError> {
        self.global.register(manager, commands)?;
        debug!(count = self.global.commands.len(), "Global commands registered");
        Ok(())
    }

    /// Replace the local catalog. Same all-or-nothing rule as the global one.
    pub fn register_local(
        &mut self,
        manager: &LocalizationManager,
        commands: Vec<Rc<dyn Command>>,
    ) -> Result<(), AppError> {
        self.local.register(manager, commands).map_err(|error| {
            warn!(error = %error, "Local commands rejected");
            error
        })
    }

    /// Recompute both indices for the active language.
    pub fn rebuild(&mut self, manager: &LocalizationManager) {
        self.global.rebuild(manager);
        self.local.rebuild(manager);
    }

    /// Resolve a raw input line.
    ///
    /// The first token is matched case-insensitively: exact local, exact
    /// global, unique local prefix, unique global prefix. On a match the
    /// remaining tokens become the arguments. `None` means the line is plain
    /// text for the current state.
    pub fn resolve(&self, input: &str) -> Option<(Rc<dyn Command>, Vec<String>)> {
        let mut tokens = input.split_whitespace();
        let token = tokens.next()?.to_lowercase();

        let command = self
            .local
            .exact(&token)
            .or_else(|| self.global.exact(&token))
            .or_else(|| self.local.by_prefix(&token))
            .or_else(|| self.global.by_prefix(&token))?;

        Some((Rc::clone(command), tokens.map(str::to_string).collect()))
    }

    /// Localized name, aliases and description of a registered command.
    /// The local catalog is searched first.
    pub fn describe(
        &self,
        manager: &LocalizationManager,
        command: &dyn Command,
    ) -> Result<CommandInfo, AppError> {
        if self.local.contains(command) {
            return self.local.info(manager, command);
        }
        if self.global.contains(command) {
            return self.global.info(manager, command);
        }
        Err(AppError::CommandNotLocalized {
            scope: command.scope(),
            command: command.id().to_string(),
        })
    }

    /// Local commands in localized name order.
    pub fn local_commands(&self) -> &[Rc<dyn Command>] {
        &self.local.commands
    }

    /// Global commands in localized name order.
    pub fn global_commands(&self) -> &[Rc<dyn Command>] {
        &self.global.commands
    }
}
