//! Console command (ConCommand) implementation.
//!
//! ConCommands are named handlers that receive the parsed command line.

use super::{ConsoleRegistry, ParsedCommand};

/// What a command handler returns; `Err` carries a message for the caller.
pub type CommandResult = Result<(), String>;

/// Type alias for command handler functions.
///
/// Handlers receive:
/// - `cmd`: The parsed command; write output to `cmd.return_text`
/// - `registry`: The registry the command was dispatched through
pub type CommandHandler =
    Box<dyn Fn(&mut ParsedCommand, &ConsoleRegistry) -> CommandResult + Send + Sync>;

/// A console command with a handler function.
///
/// # Examples
///
/// ```
/// use bevy_console_dispatch::core::ConCommand;
///
/// let add = ConCommand::new("add", |cmd, _registry| {
///     if cmd.argc() <= 1 {
///         return Err("add requires more than 1 argument".into());
///     }
///     let sum: i64 = cmd.tokens().iter().filter_map(|t| t.as_int()).sum();
///     cmd.set_return(sum.to_string());
///     Ok(())
/// })
/// .description("Adds together a sequence of numbers");
///
/// assert_eq!(add.name(), "add");
/// ```
pub struct ConCommand {
    name: Box<str>,
    description: String,
    handler: CommandHandler,
}

impl ConCommand {
    /// Create a new command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&mut ParsedCommand, &ConsoleRegistry) -> CommandResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            handler: Box::new(handler),
        }
    }

    /// Set the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// Split the command into metadata and handler.
    pub fn split(self) -> (ConCommandMeta, CommandHandler) {
        (
            ConCommandMeta {
                name: self.name,
                description: self.description,
            },
            self.handler,
        )
    }
}

impl std::fmt::Debug for ConCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Metadata for a registered command.
#[derive(Debug, Clone)]
pub struct ConCommandMeta {
    /// The command name.
    pub name: Box<str>,
    /// Description.
    pub description: String,
}

impl ConCommandMeta {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn get_description(&self) -> &str {
        &self.description
    }
}
