//! Console registry for ConVars and ConCommands.
//!
//! Variables and commands live in separate tables that share one namespace,
//! plus a help table used for listings and autocomplete.

use std::collections::HashMap;

use bevy::prelude::*;

use super::{
    CommandHandler, ConCommand, ConCommandMeta, ConVar, ConVarDyn, ConVarFlags, ConVarValue,
    ConsoleError, Token, VarCell,
};

/// Runtime settings for a console registry.
#[derive(Debug, Clone)]
pub struct ConsoleSettings {
    /// Allow console writes to variables flagged [`ConVarFlags::DEVELOPER`].
    pub developer_mode: bool,
    /// Register `help`, `cvarlist` and `find` when the plugin builds.
    pub bind_base_commands: bool,
    /// Echo each input line as a command output event.
    pub echo_input: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            developer_mode: cfg!(debug_assertions),
            bind_base_commands: true,
            echo_input: true,
        }
    }
}

/// Kind of a registered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Var,
    Cmd,
}

/// Metadata for a type-erased ConVar.
pub struct ConVarMeta {
    /// The variable name.
    pub name: Box<str>,
    /// Description.
    pub description: String,
    /// Flags.
    pub flags: ConVarFlags,
    /// Type-erased view onto the value.
    value: Box<dyn ConVarDyn>,
}

impl ConVarMeta {
    /// Create from a typed ConVar.
    pub fn from_convar<T: ConVarValue>(cvar: ConVar<T>) -> Self {
        Self {
            name: cvar.name().into(),
            description: cvar.get_description().to_string(),
            flags: cvar.get_flags(),
            value: Box::new(cvar),
        }
    }

    /// Get the current value as a string.
    pub fn get_string(&self) -> String {
        self.value.get_string()
    }

    /// Name of the stored value type.
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// Try to downcast to a specific ConVar type.
    pub fn downcast_ref<T: ConVarValue>(&self) -> Option<&ConVar<T>> {
        self.value.as_any().downcast_ref()
    }

    pub(crate) fn set_token(&self, token: &Token) -> bool {
        self.value.set_token(token)
    }

    pub(crate) fn notify_update(&self) {
        self.value.notify_update();
    }

    pub(crate) fn downcast_checked<T: ConVarValue>(&self) -> Result<&ConVar<T>, ConsoleError> {
        self.downcast_ref::<T>().ok_or_else(|| ConsoleError::TypeMismatch {
            name: self.name.to_string(),
            expected: T::type_name(),
            actual: self.type_name(),
        })
    }
}

impl std::fmt::Debug for ConVarMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConVarMeta")
            .field("name", &self.name)
            .field("type", &self.type_name())
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

struct RegisteredCommand {
    meta: ConCommandMeta,
    handler: CommandHandler,
}

/// Central registry for console variables and commands.
///
/// A name lives in at most one table. Registering a taken name is a no-op:
/// the first registration wins and a warning is logged.
///
/// # Examples
///
/// ```
/// use bevy_console_dispatch::core::{ConVar, ConCommand, ConsoleRegistry, VarCell};
///
/// let mut registry = ConsoleRegistry::new();
/// let gravity = VarCell::new(800.0f32);
///
/// registry.register_var(ConVar::new("sv_gravity", gravity.clone())
///     .description("World gravity"));
/// registry.register_cmd(ConCommand::new("ping", |cmd, _| {
///     cmd.set_return("pong");
///     Ok(())
/// }));
///
/// assert_eq!(registry.get::<f32>("sv_gravity").unwrap(), 800.0);
/// assert_eq!(registry.dispatch("sv_gravity 600").unwrap(), "600");
/// assert_eq!(gravity.get(), 600.0);
/// assert_eq!(registry.dispatch("ping").unwrap(), "pong");
/// ```
#[derive(Resource, Default)]
pub struct ConsoleRegistry {
    vars: HashMap<Box<str>, ConVarMeta>,
    cmds: HashMap<Box<str>, RegisteredCommand>,
    help: HashMap<Box<str>, String>,
    settings: ConsoleSettings,
}

impl ConsoleRegistry {
    /// Create a new empty registry with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty registry with the given settings.
    pub fn with_settings(settings: ConsoleSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[inline]
    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    /// Enable or disable writes to developer variables.
    pub fn set_developer_mode(&mut self, enabled: bool) {
        self.settings.developer_mode = enabled;
    }

    fn name_taken(&self, name: &str, kind: &str) -> bool {
        if let Some(existing) = self.kind(name) {
            let existing = match existing {
                EntryKind::Var => "variable",
                EntryKind::Cmd => "command",
            };
            bevy::log::warn!(
                "Console: '{}' is already registered as a {}, ignoring new {}",
                name,
                existing,
                kind
            );
            return true;
        }
        false
    }

    /// Register a console variable.
    ///
    /// Returns `true` if the variable was installed. Returns `false` if it is
    /// flagged [`ConVarFlags::UNREGISTERED`] or the name is already taken.
    pub fn register_var<T: ConVarValue>(&mut self, cvar: ConVar<T>) -> bool {
        if cvar.get_flags().contains(ConVarFlags::UNREGISTERED) {
            bevy::log::debug!("Console: skipping unregistered variable '{}'", cvar.name());
            return false;
        }
        if self.name_taken(cvar.name(), "variable") {
            return false;
        }

        let meta = ConVarMeta::from_convar(cvar);
        self.help.insert(meta.name.clone(), meta.description.clone());
        self.vars.insert(meta.name.clone(), meta);
        true
    }

    /// Register a console command.
    ///
    /// Returns `true` if the command was installed, `false` if the name is already taken.
    pub fn register_cmd(&mut self, cmd: ConCommand) -> bool {
        if self.name_taken(cmd.name(), "command") {
            return false;
        }

        let (meta, handler) = cmd.split();
        self.help.insert(meta.name.clone(), meta.description.clone());
        self.cmds
            .insert(meta.name.clone(), RegisteredCommand { meta, handler });
        true
    }

    /// Check if a variable with that name exists.
    #[inline]
    pub fn var_exists(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Check if a command with that name exists.
    #[inline]
    pub fn cmd_exists(&self, name: &str) -> bool {
        self.cmds.contains_key(name)
    }

    /// Check if an entry exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.var_exists(name) || self.cmd_exists(name)
    }

    /// Which table holds `name`, if any.
    pub fn kind(&self, name: &str) -> Option<EntryKind> {
        if self.var_exists(name) {
            Some(EntryKind::Var)
        } else if self.cmd_exists(name) {
            Some(EntryKind::Cmd)
        } else {
            None
        }
    }

    /// Get a variable's metadata.
    pub fn var(&self, name: &str) -> Option<&ConVarMeta> {
        self.vars.get(name)
    }

    /// Get a command's metadata.
    pub fn cmd(&self, name: &str) -> Option<&ConCommandMeta> {
        self.cmds.get(name).map(|c| &c.meta)
    }

    pub(crate) fn handler(&self, name: &str) -> Option<&CommandHandler> {
        self.cmds.get(name).map(|c| &c.handler)
    }

    pub(crate) fn var_or_not_found(&self, name: &str) -> Result<&ConVarMeta, ConsoleError> {
        self.vars
            .get(name)
            .ok_or_else(|| ConsoleError::NotFound(name.to_string()))
    }

    /// Get a ConVar's value by name.
    ///
    /// Fails with `NotFound` for unknown names and `TypeMismatch` when `T`
    /// is not the registered type.
    pub fn get<T: ConVarValue>(&self, name: &str) -> Result<T, ConsoleError> {
        Ok(self.var_or_not_found(name)?.downcast_checked::<T>()?.get())
    }

    /// Get a handle to a ConVar's storage cell.
    pub fn cell<T: ConVarValue>(&self, name: &str) -> Result<VarCell<T>, ConsoleError> {
        Ok(self
            .var_or_not_found(name)?
            .downcast_checked::<T>()?
            .cell()
            .clone())
    }

    /// Get a ConVar's value as a string.
    pub fn get_string(&self, name: &str) -> Option<String> {
        self.vars.get(name).map(ConVarMeta::get_string)
    }

    /// Help text for a variable or command, empty when unknown.
    pub fn help_text(&self, name: &str) -> &str {
        self.help.get(name).map(String::as_str).unwrap_or("")
    }

    /// Iterate over every registered name and its help text.
    pub fn help_table(&self) -> impl Iterator<Item = (&str, &str)> {
        self.help.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.vars.len() + self.cmds.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty() && self.cmds.is_empty()
    }

    /// Iterate over all variables.
    pub fn vars(&self) -> impl Iterator<Item = (&str, &ConVarMeta)> {
        self.vars.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Iterate over all commands.
    pub fn cmds(&self) -> impl Iterator<Item = (&str, &ConCommandMeta)> {
        self.cmds.iter().map(|(k, v)| (k.as_ref(), &v.meta))
    }

    /// Names starting with `prefix`, ignoring ASCII case, sorted.
    pub fn completions(&self, prefix: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .help
            .keys()
            .map(|k| k.as_ref())
            .filter(|name| {
                name.len() >= prefix.len()
                    && name.is_char_boundary(prefix.len())
                    && name[..prefix.len()].eq_ignore_ascii_case(prefix)
            })
            .collect();
        names.sort_unstable();
        names
    }

    /// Find names whose name or description contains `query`, ignoring case, sorted.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query_lower = query.to_lowercase();

        let mut matches: Vec<&str> = self
            .help
            .iter()
            .filter(|(name, desc)| {
                name.to_lowercase().contains(&query_lower)
                    || desc.to_lowercase().contains(&query_lower)
            })
            .map(|(name, _)| name.as_ref())
            .collect();

        matches.sort_unstable();
        matches
    }
}
