//! Built-in console commands.

use super::{ConCommand, ConsoleRegistry, EntryKind};

impl ConsoleRegistry {
    /// Register the base commands: `help`, `cvarlist` and `find`.
    ///
    /// Names that are already taken keep their existing registration.
    pub fn bind_base_commands(&mut self) {
        // help - List every entry, or describe one
        self.register_cmd(
            ConCommand::new("help", |cmd, registry| {
                if let Some(name) = cmd.token(0).map(|t| t.text().to_string()) {
                    if !registry.contains(&name) {
                        return Err(format!("unknown command or variable: {}", name));
                    }
                    let text = format!("{}\t\t{}", name, registry.help_text(&name));
                    cmd.set_return(text);
                    return Ok(());
                }

                let mut entries: Vec<_> = registry.help_table().collect();
                entries.sort_unstable_by_key(|(name, _)| *name);

                let mut result = String::from("Method/variable list:\n");
                for (name, desc) in entries {
                    result.push_str(&format!("{}\t\t{}\n", name, desc));
                }
                cmd.set_return(result);
                Ok(())
            })
            .description("Returns a list of variables/methods and their descriptions"),
        );

        // cvarlist - List variables with their current values
        self.register_cmd(
            ConCommand::new("cvarlist", |cmd, registry| {
                let prefix = cmd.token(0).map(|t| t.text()).unwrap_or("");

                let mut vars: Vec<_> = registry
                    .vars()
                    .filter(|(name, _)| name.starts_with(prefix))
                    .collect();
                vars.sort_unstable_by_key(|(name, _)| *name);

                let mut result = String::new();
                for (name, meta) in &vars {
                    result.push_str(&format!("{} = \"{}\"\n", name, meta.get_string()));
                }
                result.push_str(&format!("{} convars", vars.len()));
                cmd.set_return(result);
                Ok(())
            })
            .description("List console variables and their values"),
        );

        // find - Search names and descriptions
        self.register_cmd(
            ConCommand::new("find", |cmd, registry| {
                let query = cmd.join(" ");
                if query.is_empty() {
                    return Err("usage: find <search term>".into());
                }

                let mut lines: Vec<String> = registry
                    .search(&query)
                    .into_iter()
                    .map(|name| {
                        let kind = match registry.kind(name) {
                            Some(EntryKind::Var) => "var",
                            _ => "cmd",
                        };
                        let desc = registry.help_text(name);
                        if desc.is_empty() {
                            format!("[{}] {}", kind, name)
                        } else {
                            format!("[{}] {} - {}", kind, name, desc)
                        }
                    })
                    .collect();

                lines.push(format!("{} results", lines.len()));
                cmd.set_return(lines.join("\n"));
                Ok(())
            })
            .description("Search commands and variables by name or description"),
        );
    }
}
