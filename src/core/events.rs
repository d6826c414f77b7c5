//! Console events for communication with the host application.
//!
//! - Host -> Console: command lines to dispatch
//! - Console -> Host: results and errors to display
//! - Console -> Systems: ConVar changes

use bevy::prelude::*;

/// Event sent when a line is submitted to the console.
///
/// # Examples
///
/// ```ignore
/// fn submit_command(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("sv_gravity 600"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to dispatch.
    pub command: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Event carrying console output for the host to display.
#[derive(Message, Debug, Clone)]
pub struct ConsoleOutputEvent {
    /// The message text.
    pub message: String,
    /// The kind of output.
    pub level: ConsoleOutputLevel,
}

/// Kind of console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleOutputLevel {
    /// Echo of the submitted line.
    Command,
    /// Text returned by a read, write or command.
    #[default]
    Result,
    /// A dispatch error.
    Error,
}

impl ConsoleOutputEvent {
    /// Create a new output event.
    pub fn new(level: ConsoleOutputLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    /// Create a command echo message.
    pub fn command(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Command, message)
    }

    /// Create a result message.
    pub fn result(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Result, message)
    }

    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Error, message)
    }
}

/// Event sent when a console write changed a ConVar.
///
/// # Examples
///
/// ```ignore
/// fn on_gravity_change(mut events: MessageReader<ConVarChangedEvent>) {
///     for event in events.read() {
///         if &*event.name == "sv_gravity" {
///             info!("Gravity changed to {}", event.new_value);
///         }
///     }
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConVarChangedEvent {
    /// The name of the ConVar that changed.
    pub name: Box<str>,
    /// The old value as a string.
    pub old_value: String,
    /// The new value as a string.
    pub new_value: String,
}

impl ConVarChangedEvent {
    /// Create a new change event.
    pub fn new(
        name: impl Into<Box<str>>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }
}

/// Plugin that registers all console events.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleOutputEvent>()
            .add_message::<ConVarChangedEvent>();
    }
}
