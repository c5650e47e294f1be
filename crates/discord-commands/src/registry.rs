//! Command registry: name → descriptor, built once at startup

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::CommandContext;
use crate::error::CommandResult;

/// A prefix command.
///
/// `args` are the whitespace-separated tokens after the command name; each
/// command interprets them itself.
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult;
}

/// A registered command and its help text.
#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub command: Arc<dyn Command>,
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Lookup table of commands, iterated in registration order.
///
/// Names are stored lowercased so lookups with any casing reach them.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandDescriptor>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in command.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::commands::register_builtin(&mut registry);
        registry
    }

    /// Insert a command, replacing any previous command with the same name.
    /// A replaced command keeps its original position in the listing.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        command: impl Command + 'static,
    ) {
        let name = name.into().to_lowercase();
        let descriptor = CommandDescriptor {
            name: name.clone(),
            description: description.into(),
            command: Arc::new(command),
        };
        match self.index.get(&name) {
            Some(&slot) => self.entries[slot] = descriptor,
            None => {
                self.index.insert(name, self.entries.len());
                self.entries.push(descriptor);
            }
        }
    }

    /// Case-insensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| &self.entries[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
