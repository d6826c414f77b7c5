//! System parameters for working with the console from Bevy systems.
//!
//! [`Console`] wraps the [`ConsoleRegistry`] resource for registration and
//! dispatch. [`ConsoleRef`] only reads; dispatch needs no exclusive access
//! because variable writes go through their storage cells.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::{
    ConCommand, ConVar, ConVarValue, ConsoleError, ConsoleRegistry, DispatchOutcome,
    StaticConVar, VarCell,
};

/// Console system parameter with registration access.
///
/// # Examples
///
/// ```ignore
/// static FONT_SCALE: LazyLock<StaticConVar<f32>> =
///     LazyLock::new(|| StaticConVar::new("ui.fontScale", 1.0));
///
/// fn setup_console(mut console: Console) {
///     console.register_static(&FONT_SCALE);
///     console.register_cmd(ConCommand::new("ping", |cmd, _| {
///         cmd.set_return("pong");
///         Ok(())
///     }));
///
///     let scale: f32 = console.get("ui.fontScale").unwrap();
/// }
/// ```
#[derive(SystemParam)]
pub struct Console<'w> {
    registry: ResMut<'w, ConsoleRegistry>,
}

impl Console<'_> {
    /// Register a console variable.
    pub fn register_var<T: ConVarValue>(&mut self, cvar: ConVar<T>) -> bool {
        self.registry.register_var(cvar)
    }

    /// Register a variable that owns its storage.
    pub fn register_static<T: ConVarValue>(&mut self, var: &StaticConVar<T>) -> bool {
        var.register(&mut self.registry)
    }

    /// Register a console command.
    pub fn register_cmd(&mut self, cmd: ConCommand) -> bool {
        self.registry.register_cmd(cmd)
    }

    /// Run a console line and return its text result.
    pub fn dispatch(&self, line: &str) -> Result<String, ConsoleError> {
        self.registry.dispatch(line)
    }

    /// Run a console line and report what happened.
    pub fn execute(&self, line: &str) -> Result<DispatchOutcome, ConsoleError> {
        self.registry.execute(line)
    }

    /// Get a ConVar's typed value by name.
    pub fn get<T: ConVarValue>(&self, name: &str) -> Result<T, ConsoleError> {
        self.registry.get(name)
    }

    /// Get a handle to a ConVar's storage.
    pub fn cell<T: ConVarValue>(&self, name: &str) -> Result<VarCell<T>, ConsoleError> {
        self.registry.cell(name)
    }

    /// Check if an entry (variable or command) exists.
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Get read-only access to the underlying registry.
    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }
}

/// Read-only console system parameter.
///
/// Still allows dispatching lines; only registration needs [`Console`].
#[derive(SystemParam)]
pub struct ConsoleRef<'w> {
    registry: Res<'w, ConsoleRegistry>,
}

impl ConsoleRef<'_> {
    /// Run a console line and return its text result.
    pub fn dispatch(&self, line: &str) -> Result<String, ConsoleError> {
        self.registry.dispatch(line)
    }

    /// Get a ConVar's typed value by name.
    pub fn get<T: ConVarValue>(&self, name: &str) -> Result<T, ConsoleError> {
        self.registry.get(name)
    }

    /// Help text for a name, empty when unknown.
    pub fn help_text(&self, name: &str) -> &str {
        self.registry.help_text(name)
    }

    /// Names starting with `prefix`, for autocomplete.
    pub fn completions(&self, prefix: &str) -> Vec<&str> {
        self.registry.completions(prefix)
    }

    /// Get read-only access to the underlying registry.
    pub fn registry(&self) -> &ConsoleRegistry {
        &self.registry
    }
}
