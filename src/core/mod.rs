//! Core console types.
//!
//! This module provides the fundamental building blocks:
//! - [`tokenize`] - Typed tokenizer for a single command line
//! - [`ConVar`] / [`VarCell`] - Console variables viewing caller-owned storage
//! - [`StaticConVar`] - Variables that own their storage
//! - [`ConCommand`] - Console commands with handlers
//! - [`ConsoleRegistry`] - Registration, lookup and dispatch
//! - [`Console`] - System parameters for Bevy systems
//! - Events for communication with the host

mod error;
mod tokenizer;
mod convar;
mod concommand;
mod registry;
mod dispatch;
mod builtins;
mod static_var;
mod events;
mod console;

pub use error::{ConsoleError, TokenizeError};
pub use tokenizer::{
    tokenize, numeric_kind, Token, TokenKind, ParsedCommand, MAX_INPUT_LEN, MAX_TOKENS,
};
pub use convar::{ConVar, ConVarDyn, ConVarFlags, ConVarValue, UpdateHook, VarCell};
pub use concommand::{ConCommand, ConCommandMeta, CommandHandler, CommandResult};
pub use registry::{ConsoleRegistry, ConsoleSettings, ConVarMeta, EntryKind};
pub use dispatch::DispatchOutcome;
pub use static_var::StaticConVar;
pub use events::{
    ConsoleInputEvent, ConsoleOutputEvent, ConsoleOutputLevel, ConVarChangedEvent,
    ConsoleEventsPlugin,
};
pub use console::{Console, ConsoleRef};
