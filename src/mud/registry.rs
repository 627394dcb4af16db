//! Command name -> handler table with a bind-time alias layer.
//!
//! An alias captures the handler registered under its target *when the alias
//! is created*. Registering a new handler under the target name afterwards
//! leaves existing aliases on the old implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::mud::dispatch::Invocation;
use crate::mud::errors::MudError;

/// What the session loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    /// End the player's session (quit).
    Terminate,
}

pub type Handler =
    Arc<dyn Fn(&Invocation<'_>) -> Result<CommandOutcome, MudError> + Send + Sync>;

struct Alias {
    target: String,
    handler: Handler,
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Handler>,
    aliases: BTreeMap<String, Alias>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a canonical command. A same-named alias is dropped.
    pub fn register<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(&Invocation<'_>) -> Result<CommandOutcome, MudError> + Send + Sync + 'static,
    {
        self.aliases.remove(name);
        self.commands.insert(name.to_string(), Arc::new(handler));
    }

    /// Bind `name` to whatever `target` resolves to right now.
    pub fn alias(&mut self, name: &str, target: &str) -> Result<(), MudError> {
        if self.commands.contains_key(name) {
            return Err(MudError::DuplicateCommand(name.to_string()));
        }
        let handler = self
            .lookup(target)
            .ok_or_else(|| MudError::UnknownCommand(target.to_string()))?;
        self.aliases.insert(
            name.to_string(),
            Alias {
                target: target.to_string(),
                handler,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Handler> {
        self.commands
            .get(name)
            .or_else(|| self.aliases.get(name).map(|a| &a.handler))
            .cloned()
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Name an alias was created against.
    pub fn alias_target(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(|a| a.target.as_str())
    }

    /// Canonical command names in ascending order. Aliases are not listed.
    pub fn commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Canonical names laid out `per_line` to a row, each padded to the longest
    /// name plus one space. The last name on a row is padded too, so every full
    /// row has the same length.
    pub fn format_listing(&self, per_line: usize) -> Vec<String> {
        let names = self.commands();
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0) + 1;
        names
            .chunks(per_line.max(1))
            .map(|row| {
                row.iter()
                    .map(|n| format!("{:<width$}", n, width = width))
                    .collect::<String>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Invocation<'_>) -> Result<CommandOutcome, MudError> {
        Ok(CommandOutcome::Continue)
    }

    fn quit(_: &Invocation<'_>) -> Result<CommandOutcome, MudError> {
        Ok(CommandOutcome::Terminate)
    }

    #[test]
    fn test_lookup_missing_is_none() {
        let registry = CommandRegistry::new();
        assert!(registry.lookup("look").is_none());
    }

    #[test]
    fn test_alias_requires_existing_target() {
        let mut registry = CommandRegistry::new();
        let err = registry.alias("l", "look").unwrap_err();
        assert!(matches!(err, MudError::UnknownCommand(t) if t == "look"));
    }

    #[test]
    fn test_alias_cannot_shadow_command() {
        let mut registry = CommandRegistry::new();
        registry.register("look", noop);
        registry.register("quit", quit);
        assert!(matches!(
            registry.alias("look", "quit"),
            Err(MudError::DuplicateCommand(_))
        ));
    }

    #[test]
    fn test_alias_binds_at_creation_time() {
        let mut registry = CommandRegistry::new();
        registry.register("q", noop);
        registry.alias("leave", "q").unwrap();
        registry.register("q", quit);

        let alias = registry.lookup("leave").unwrap();
        let current = registry.lookup("q").unwrap();
        assert!(!Arc::ptr_eq(&alias, &current));
        assert_eq!(registry.alias_target("leave"), Some("q"));
    }

    #[test]
    fn test_alias_of_alias_resolves_transitively() {
        let mut registry = CommandRegistry::new();
        registry.register("inventory", noop);
        registry.alias("inv", "inventory").unwrap();
        registry.alias("i", "inv").unwrap();
        let direct = registry.lookup("inventory").unwrap();
        assert!(Arc::ptr_eq(&direct, &registry.lookup("i").unwrap()));
    }

    #[test]
    fn test_register_replaces_alias_of_same_name() {
        let mut registry = CommandRegistry::new();
        registry.register("look", noop);
        registry.alias("l", "look").unwrap();
        registry.register("l", quit);
        assert!(!registry.is_alias("l"));
        assert_eq!(registry.commands(), vec!["l", "look"]);
    }

    #[test]
    fn test_listing_skips_aliases_and_pads_columns() {
        let mut registry = CommandRegistry::new();
        for name in ["who", "look", "drop", "get", "inventory", "quit", "save"] {
            registry.register(name, noop);
        }
        registry.alias("l", "look").unwrap();

        let lines = registry.format_listing(5);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "drop      get       inventory look      quit      "
        );
        assert_eq!(lines[1], "save      who       ");
        assert_eq!(lines[0].len(), 5 * "inventory ".len());
    }
}
