//! A string-addressable console for Bevy: typed variables, commands and a
//! line dispatcher.
//!
//! Inspired by the Source Engine ConVar system, bevy_console_dispatch provides:
//!
//! - **ConVar**: Typed console variables viewing caller-owned storage
//! - **StaticConVar**: Variables that own their storage and register themselves
//! - **ConCommand**: Console commands with handlers
//! - **Dispatch**: `name` reads, `name value` writes, anything else invokes
//! - **Console**: System parameters for convenient access
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_console_dispatch::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(ConsolePlugin::default())
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: Console) {
//!     // Register a variable over storage the caller keeps
//!     let gravity = VarCell::new(800.0f32);
//!     console.register_var(ConVar::new("sv_gravity", gravity.clone())
//!         .description("World gravity"));
//!
//!     // Register a command
//!     console.register_cmd(ConCommand::new("add", |cmd, _| {
//!         let mut sum = 0i64;
//!         for token in cmd.tokens() {
//!             sum += token.as_int().ok_or("add takes integers")?;
//!         }
//!         cmd.set_return(sum.to_string());
//!         Ok(())
//!     }).description("Add a sequence of integers"));
//!
//!     // Dispatch lines
//!     console.dispatch("sv_gravity 600").unwrap();
//!     assert_eq!(gravity.get(), 600.0);
//! }
//! ```

use bevy::prelude::*;

pub mod core;

// Re-export core types at crate root for convenience
pub use core::{
    Console, ConsoleRef,
    ConVar, ConVarDyn, ConVarFlags, ConVarValue, UpdateHook, VarCell, StaticConVar,
    ConCommand, ConCommandMeta, CommandHandler, CommandResult,
    ConsoleRegistry, ConsoleSettings, ConVarMeta, EntryKind, DispatchOutcome,
    tokenize, numeric_kind, Token, TokenKind, ParsedCommand, MAX_INPUT_LEN, MAX_TOKENS,
    ConsoleError, TokenizeError,
    ConsoleInputEvent, ConsoleOutputEvent, ConsoleOutputLevel, ConVarChangedEvent,
    ConsoleEventsPlugin,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Console, ConsoleRef,
        ConVar, ConVarFlags, ConVarValue, VarCell, StaticConVar,
        ConCommand, ParsedCommand, Token, TokenKind,
        ConsoleRegistry, ConsoleSettings, DispatchOutcome, ConsoleError,
        ConsoleInputEvent, ConsoleOutputEvent, ConsoleOutputLevel, ConVarChangedEvent,
        tokenize,
    };
    pub use crate::{ConsolePlugin, ConsoleSet};
}

/// System sets used by [`ConsolePlugin`] in the `Update` schedule.
///
/// Order systems that read [`ConsoleOutputEvent`] or [`ConVarChangedEvent`]
/// after [`ConsoleSet::Process`] to see the results in the same frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConsoleSet {
    /// Dispatches submitted lines and writes the output events.
    Process,
}

/// Main console plugin.
///
/// Inserts the [`ConsoleRegistry`] resource, registers the console events and
/// dispatches every [`ConsoleInputEvent`] during `Update`.
///
/// # Configuration
///
/// ```ignore
/// ConsolePlugin::default().with_settings(ConsoleSettings {
///     developer_mode: false,
///     ..default()
/// })
/// ```
#[derive(Default, Clone)]
pub struct ConsolePlugin {
    pub settings: ConsoleSettings,
}

impl ConsolePlugin {
    /// Replace the registry settings.
    pub fn with_settings(mut self, settings: ConsoleSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let mut registry = ConsoleRegistry::with_settings(self.settings.clone());
        if self.settings.bind_base_commands {
            registry.bind_base_commands();
        }

        app.insert_resource(registry)
            .add_plugins(ConsoleEventsPlugin)
            .add_systems(Update, process_console_input.in_set(ConsoleSet::Process));
    }
}

/// System that dispatches submitted lines and reports the results.
fn process_console_input(
    mut input_events: MessageReader<ConsoleInputEvent>,
    registry: Res<ConsoleRegistry>,
    mut output_events: MessageWriter<ConsoleOutputEvent>,
    mut change_events: MessageWriter<ConVarChangedEvent>,
) {
    for event in input_events.read() {
        if registry.settings().echo_input {
            output_events.write(ConsoleOutputEvent::command(format!("> {}", event.command)));
        }

        match registry.execute(&event.command) {
            Ok(DispatchOutcome::Write { name, old, new }) => {
                output_events.write(ConsoleOutputEvent::result(new.clone()));
                change_events.write(ConVarChangedEvent::new(name, old, new));
            }
            Ok(outcome) => {
                let text = outcome.into_text();
                if !text.is_empty() {
                    output_events.write(ConsoleOutputEvent::result(text));
                }
            }
            Err(e) => {
                output_events.write(ConsoleOutputEvent::error(e.to_string()));
            }
        }
    }
}
