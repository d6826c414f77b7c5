//! Resolving a console line against the registry.
//!
//! A variable name with no argument reads it, with one argument writes it.
//! A command name runs its handler with the whole parsed line.

use std::panic::{self, AssertUnwindSafe};

use super::{
    ConVarFlags, ConVarMeta, ConVarValue, ConsoleError, ConsoleRegistry, ParsedCommand, Token,
    tokenize,
};

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A variable was read.
    Read { name: String, text: String },
    /// A variable was written.
    Write { name: String, old: String, new: String },
    /// A command ran; `text` is what it returned.
    Invoke { name: String, text: String },
}

impl DispatchOutcome {
    /// The variable or command name.
    pub fn name(&self) -> &str {
        match self {
            DispatchOutcome::Read { name, .. }
            | DispatchOutcome::Write { name, .. }
            | DispatchOutcome::Invoke { name, .. } => name,
        }
    }

    /// The text handed back to the caller.
    pub fn text(&self) -> &str {
        match self {
            DispatchOutcome::Read { text, .. } | DispatchOutcome::Invoke { text, .. } => text,
            DispatchOutcome::Write { new, .. } => new,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            DispatchOutcome::Read { text, .. } | DispatchOutcome::Invoke { text, .. } => text,
            DispatchOutcome::Write { new, .. } => new,
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl ConsoleRegistry {
    /// Run a single console line and return its text result.
    ///
    /// Reads return the variable's text, writes return the value after the
    /// write, commands return whatever they put in `return_text`.
    pub fn dispatch(&self, line: &str) -> Result<String, ConsoleError> {
        Ok(self.execute(line)?.into_text())
    }

    /// Run a single console line and return the variable's typed value.
    ///
    /// Command invocations yield `T::default()`. When the line targets a
    /// variable of another type this fails with `TypeMismatch` before
    /// anything is written.
    pub fn dispatch_as<T: ConVarValue + Default>(&self, line: &str) -> Result<T, ConsoleError> {
        let cmd = tokenize(line)?;
        if let Some(var) = self.var(cmd.target()) {
            if cmd.argc() <= 1 {
                var.downcast_checked::<T>()?;
            }
        }

        match self.execute_parsed(cmd)? {
            DispatchOutcome::Read { name, .. } | DispatchOutcome::Write { name, .. } => {
                self.get::<T>(&name)
            }
            DispatchOutcome::Invoke { .. } => Ok(T::default()),
        }
    }

    /// Run a single console line and report what happened.
    pub fn execute(&self, line: &str) -> Result<DispatchOutcome, ConsoleError> {
        self.execute_parsed(tokenize(line)?)
    }

    /// Resolve an already tokenized command.
    pub fn execute_parsed(&self, mut cmd: ParsedCommand) -> Result<DispatchOutcome, ConsoleError> {
        let name = cmd.target().to_string();

        if let Some(var) = self.var(&name) {
            return match cmd.tokens() {
                [] => Ok(DispatchOutcome::Read {
                    text: var.get_string(),
                    name,
                }),
                [token] => self.write_var(var, token),
                tokens => Err(ConsoleError::TooManyArguments {
                    name,
                    argc: tokens.len(),
                }),
            };
        }

        let handler = self
            .handler(&name)
            .ok_or_else(|| ConsoleError::NotFound(name.clone()))?;

        match panic::catch_unwind(AssertUnwindSafe(|| handler(&mut cmd, self))) {
            Ok(Ok(())) => Ok(DispatchOutcome::Invoke {
                name,
                text: cmd.return_text,
            }),
            Ok(Err(message)) => Err(ConsoleError::CommandFailure { name, message }),
            Err(payload) => Err(ConsoleError::CommandFailure {
                name,
                message: format!("panicked: {}", panic_message(payload)),
            }),
        }
    }

    fn write_var(&self, var: &ConVarMeta, token: &Token) -> Result<DispatchOutcome, ConsoleError> {
        let name = var.name.to_string();

        if var.flags.contains(ConVarFlags::READ_ONLY) {
            return Err(ConsoleError::ReadOnly(name));
        }
        if var.flags.contains(ConVarFlags::DEVELOPER) && !self.settings().developer_mode {
            return Err(ConsoleError::DeveloperOnly(name));
        }

        let old = var.get_string();
        if !var.set_token(token) {
            return Err(ConsoleError::InvalidValue {
                name,
                value: token.text().to_string(),
                expected: var.type_name(),
            });
        }
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| var.notify_update())) {
            return Err(ConsoleError::UpdateHookFailure {
                name,
                message: panic_message(payload),
            });
        }

        let new = var.get_string();
        bevy::log::debug!("Console: {} changed \"{}\" -> \"{}\"", name, old, new);
        Ok(DispatchOutcome::Write { name, old, new })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::core::{ConCommand, ConVar, ConsoleSettings, TokenizeError, VarCell};

    fn add_command() -> ConCommand {
        ConCommand::new("add", |cmd, _| {
            if cmd.argc() <= 1 {
                return Err("add method requires more than 1 argument".into());
            }
            let mut sum = 0i64;
            for token in cmd.tokens() {
                sum += token
                    .as_int()
                    .ok_or_else(|| format!("'{}' is not a number", token.text()))?;
            }
            cmd.set_return(sum.to_string());
            Ok(())
        })
        .description("Adds together a sequence of numbers")
    }

    fn registry() -> ConsoleRegistry {
        let mut registry = ConsoleRegistry::new();
        registry.register_var(ConVar::new("test.integer", VarCell::new(123i32)));
        registry.register_var(ConVar::new(
            "test.string",
            VarCell::new(String::from("cppstring")),
        ));
        registry.register_var(ConVar::new("test.float", VarCell::new(3.142f32)));
        registry.register_var(ConVar::new("test.uint", VarCell::new(200u8)));
        registry.register_var(ConVar::new("test.bool", VarCell::new(true)));
        registry.register_var(
            ConVar::new("test.cstring", VarCell::new("mystr")).flags(ConVarFlags::READ_ONLY),
        );
        registry.register_cmd(add_command());
        registry.register_cmd(ConCommand::new("myMethod", |cmd, _| {
            cmd.set_return("returned");
            Ok(())
        }));
        registry
    }

    #[test]
    fn test_read_returns_text() {
        let registry = registry();
        assert_eq!(registry.dispatch("test.integer").unwrap(), "123");
        assert_eq!(registry.dispatch("test.string").unwrap(), "cppstring");
        assert_eq!(registry.dispatch("test.bool").unwrap(), "1");
        assert_eq!(registry.dispatch("test.cstring").unwrap(), "mystr");

        assert_eq!(
            registry.execute("test.uint").unwrap(),
            DispatchOutcome::Read {
                name: "test.uint".into(),
                text: "200".into(),
            }
        );
    }

    #[test]
    fn test_read_typed() {
        let registry = registry();
        assert_eq!(registry.dispatch_as::<u8>("test.uint"), Ok(200));
        assert_eq!(registry.dispatch_as::<f32>("test.float"), Ok(3.142));
        assert_eq!(registry.dispatch_as::<String>("test.string").unwrap(), "cppstring");
        assert_eq!(registry.dispatch_as::<&'static str>("test.cstring"), Ok("mystr"));
    }

    #[test]
    fn test_write_round_trip() {
        let registry = registry();

        assert_eq!(registry.dispatch("test.integer 12345").unwrap(), "12345");
        assert_eq!(registry.get::<i32>("test.integer"), Ok(12345));

        assert_eq!(registry.dispatch_as::<u8>("test.uint 1"), Ok(1));
        assert_eq!(registry.dispatch_as::<f32>("test.float 4.21"), Ok(4.21));

        assert_eq!(
            registry.execute("test.integer 54321        \t").unwrap(),
            DispatchOutcome::Write {
                name: "test.integer".into(),
                old: "12345".into(),
                new: "54321".into(),
            }
        );
    }

    #[test]
    fn test_write_strings() {
        let registry = registry();

        registry.dispatch("test.string consoleiscool").unwrap();
        assert_eq!(registry.get::<String>("test.string").unwrap(), "consoleiscool");

        registry.dispatch("test.string 'this is a string'").unwrap();
        assert_eq!(registry.get::<String>("test.string").unwrap(), "this is a string");

        registry.dispatch("test.string \"another test str\"").unwrap();
        assert_eq!(registry.dispatch("test.string").unwrap(), "another test str");
    }

    #[test]
    fn test_write_bools() {
        let registry = registry();

        for _ in 0..2 {
            registry.dispatch("test.bool false").unwrap();
            assert_eq!(registry.get::<bool>("test.bool"), Ok(false));
            registry.dispatch("test.bool true").unwrap();
            assert_eq!(registry.get::<bool>("test.bool"), Ok(true));
        }

        assert_eq!(registry.dispatch_as::<bool>("test.bool 0"), Ok(false));
        assert_eq!(registry.dispatch_as::<bool>("test.bool 2.5"), Ok(true));
    }

    #[test]
    fn test_write_bool_literals_to_numbers() {
        let registry = registry();

        assert_eq!(registry.dispatch("test.integer true").unwrap(), "1");
        assert_eq!(registry.get::<i32>("test.integer"), Ok(1));
        assert_eq!(registry.dispatch("test.float false").unwrap(), "0");
        assert_eq!(registry.get::<f32>("test.float"), Ok(0.0));
        assert_eq!(registry.dispatch_as::<u8>("test.uint true"), Ok(1));
    }

    #[test]
    fn test_write_read_only() {
        let registry = registry();

        assert_eq!(
            registry.dispatch("test.cstring constantchange"),
            Err(ConsoleError::ReadOnly("test.cstring".into()))
        );
        assert_eq!(registry.get::<&'static str>("test.cstring"), Ok("mystr"));
    }

    #[test]
    fn test_write_developer_only() {
        let mut registry = ConsoleRegistry::with_settings(ConsoleSettings {
            developer_mode: false,
            ..Default::default()
        });
        registry.register_var(
            ConVar::new("r_wireframe", VarCell::new(false)).flags(ConVarFlags::DEVELOPER),
        );

        assert_eq!(
            registry.dispatch("r_wireframe true"),
            Err(ConsoleError::DeveloperOnly("r_wireframe".into()))
        );
        assert_eq!(registry.dispatch("r_wireframe").unwrap(), "0");

        registry.set_developer_mode(true);
        assert_eq!(registry.dispatch("r_wireframe true").unwrap(), "1");
    }

    #[test]
    fn test_write_invalid_value_keeps_old() {
        let registry = registry();

        assert_eq!(
            registry.dispatch("test.float fast"),
            Err(ConsoleError::InvalidValue {
                name: "test.float".into(),
                value: "fast".into(),
                expected: "f32",
            })
        );
        assert_eq!(registry.get::<f32>("test.float"), Ok(3.142));

        assert!(matches!(
            registry.dispatch("test.uint 300"),
            Err(ConsoleError::InvalidValue { .. })
        ));
        assert_eq!(registry.get::<u8>("test.uint"), Ok(200));
    }

    #[test]
    fn test_too_many_arguments() {
        let registry = registry();

        assert_eq!(
            registry.dispatch("test.string invalid string"),
            Err(ConsoleError::TooManyArguments {
                name: "test.string".into(),
                argc: 2,
            })
        );
        assert_eq!(registry.get::<String>("test.string").unwrap(), "cppstring");
    }

    #[test]
    fn test_not_found() {
        let registry = registry();
        assert_eq!(
            registry.dispatch("this.doesnt.exist"),
            Err(ConsoleError::NotFound("this.doesnt.exist".into()))
        );
        assert_eq!(
            registry.dispatch("this.doesnt.exist 1 2"),
            Err(ConsoleError::NotFound("this.doesnt.exist".into()))
        );
    }

    #[test]
    fn test_tokenize_errors_propagate() {
        let registry = registry();
        assert_eq!(
            registry.dispatch("test.string 'never closed"),
            Err(ConsoleError::Tokenize(TokenizeError::UnterminatedString { position: 0 }))
        );
        assert_eq!(
            registry.dispatch(""),
            Err(ConsoleError::Tokenize(TokenizeError::EmptyInput))
        );
        assert!(matches!(
            registry.dispatch(&"x".repeat(300)),
            Err(ConsoleError::Tokenize(TokenizeError::InputTooLong { .. }))
        ));
    }

    #[test]
    fn test_command_invocation() {
        let registry = registry();

        assert_eq!(registry.dispatch("myMethod").unwrap(), "returned");
        assert_eq!(registry.dispatch("add 3 5").unwrap(), "8");
        assert_eq!(registry.dispatch("add 10 20 30").unwrap(), "60");
        assert_eq!(registry.dispatch_as::<i32>("add 10 20 30"), Ok(0));
    }

    #[test]
    fn test_command_failure() {
        let registry = registry();

        assert_eq!(
            registry.dispatch("add 2"),
            Err(ConsoleError::CommandFailure {
                name: "add".into(),
                message: "add method requires more than 1 argument".into(),
            })
        );
        assert!(matches!(
            registry.dispatch("add 2 two"),
            Err(ConsoleError::CommandFailure { .. })
        ));
    }

    #[test]
    fn test_command_panic_is_reported() {
        let mut registry = ConsoleRegistry::new();
        registry.register_cmd(ConCommand::new("boom", |_, _| panic!("kaboom")));

        assert_eq!(
            registry.dispatch("boom"),
            Err(ConsoleError::CommandFailure {
                name: "boom".into(),
                message: "panicked: kaboom".into(),
            })
        );
    }

    #[test]
    fn test_update_hook_panic_is_reported() {
        let mut registry = ConsoleRegistry::new();
        let value = VarCell::new(1i32);
        registry.register_var(
            ConVar::new("test.hooked", value.clone()).on_update(|_| panic!("hook boom")),
        );

        assert_eq!(
            registry.dispatch("test.hooked 5"),
            Err(ConsoleError::UpdateHookFailure {
                name: "test.hooked".into(),
                message: "hook boom".into(),
            })
        );
        assert_eq!(value.get(), 5);
        assert_eq!(registry.dispatch("test.hooked").unwrap(), "5");
    }

    #[test]
    fn test_command_can_dispatch_nested() {
        let mut registry = registry();
        registry.register_cmd(ConCommand::new("double", |cmd, registry| {
            let name = cmd.token(0).ok_or("usage: double <var>")?.text().to_string();
            let value = registry.get::<i32>(&name).map_err(|e| e.to_string())?;
            registry
                .dispatch(&format!("{} {}", name, value * 2))
                .map_err(|e| e.to_string())?;
            cmd.set_return(registry.dispatch(&name).map_err(|e| e.to_string())?);
            Ok(())
        }));

        assert_eq!(registry.dispatch("double test.integer").unwrap(), "246");
    }

    #[test]
    fn test_update_hook_fires_after_write() {
        let changed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&changed);

        let mut registry = ConsoleRegistry::new();
        registry.register_var(
            ConVar::new("test.integer", VarCell::new(123i32))
                .on_update(move |_| flag.store(true, Ordering::SeqCst)),
        );

        registry.dispatch("test.integer").unwrap();
        assert!(!changed.load(Ordering::SeqCst));

        registry.dispatch("test.integer 12345").unwrap();
        assert!(changed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dispatch_as_type_mismatch_writes_nothing() {
        let registry = registry();

        assert!(matches!(
            registry.dispatch_as::<f32>("test.integer 5"),
            Err(ConsoleError::TypeMismatch { expected: "f32", actual: "i32", .. })
        ));
        assert_eq!(registry.get::<i32>("test.integer"), Ok(123));
    }
}
