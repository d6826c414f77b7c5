//! Variables owned by the code that declares them.
//!
//! A [`StaticConVar`] holds its own storage and gives the owning code direct
//! typed access. Registering it installs a string-addressable view onto the
//! same storage, so console writes show up in [`StaticConVar::get`].
//!
//! Registration is an explicit call made during startup:
//!
//! ```
//! use std::sync::LazyLock;
//! use bevy_console_dispatch::core::{ConsoleRegistry, StaticConVar};
//!
//! static FONT_SCALE: LazyLock<StaticConVar<f32>> = LazyLock::new(|| {
//!     StaticConVar::new("ui.fontScale", 1.0).description("Font scaling for the window")
//! });
//!
//! let mut registry = ConsoleRegistry::new();
//! FONT_SCALE.register(&mut registry);
//!
//! registry.dispatch("ui.fontScale 1.5").unwrap();
//! assert_eq!(FONT_SCALE.get(), 1.5);
//! ```

use std::sync::Arc;

use super::{ConVar, ConVarFlags, ConVarValue, ConsoleRegistry, UpdateHook, VarCell};

/// A console variable that owns its value.
pub struct StaticConVar<T: ConVarValue> {
    name: Box<str>,
    description: String,
    flags: ConVarFlags,
    cell: VarCell<T>,
    on_update: Option<UpdateHook<T>>,
}

impl<T: ConVarValue> StaticConVar<T> {
    /// Create the variable with its initial value.
    pub fn new(name: impl Into<Box<str>>, value: T) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            flags: ConVarFlags::DEFAULT,
            cell: VarCell::new(value),
            on_update: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set the flags.
    pub fn flags(mut self, flags: ConVarFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the callback run after every successful console write.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(hook));
        self
    }

    /// Install this variable's view into `registry`.
    ///
    /// Same rules as [`ConsoleRegistry::register_var`].
    pub fn register(&self, registry: &mut ConsoleRegistry) -> bool {
        registry.register_var(self.convar())
    }

    /// A ConVar viewing this variable's storage.
    pub fn convar(&self) -> ConVar<T> {
        ConVar::new(self.name.clone(), self.cell.clone())
            .description(self.description.clone())
            .flags(self.flags)
            .with_hook(self.on_update.clone())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a copy of the current value. Does not go through the registry.
    #[inline]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    /// Replace the value. Does not go through the registry or run the update hook.
    #[inline]
    pub fn set(&self, value: T) {
        self.cell.set(value);
    }

    #[inline]
    pub fn cell(&self) -> &VarCell<T> {
        &self.cell
    }
}
