use std::collections::HashMap;

use super::{context::ShellContext, errors::CommandResult};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands that belong to one ledger area (months, donations, places...).
pub struct CommandGroup {
    pub title: &'static str,
    pub commands: Vec<CommandEntry>,
}

impl CommandGroup {
    pub fn new(title: &'static str, commands: Vec<CommandEntry>) -> Self {
        Self { title, commands }
    }
}

/// Command groups in display order, with a name index into them. A name registered
/// twice keeps its first entry.
pub struct CommandRegistry {
    groups: Vec<CommandGroup>,
    index: HashMap<&'static str, (usize, usize)>,
}

impl CommandRegistry {
    pub fn from_groups(groups: Vec<CommandGroup>) -> Self {
        let mut index = HashMap::new();
        for (group_at, group) in groups.iter().enumerate() {
            for (entry_at, entry) in group.commands.iter().enumerate() {
                index.entry(entry.name).or_insert((group_at, entry_at));
            }
        }
        Self { groups, index }
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// Looks a command up by name, ignoring case.
    pub fn resolve(&self, name: &str) -> Option<&CommandEntry> {
        let (group_at, entry_at) = *self.index.get(name.to_ascii_lowercase().as_str())?;
        self.groups
            .get(group_at)
            .and_then(|group| group.commands.get(entry_at))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.commands.iter().map(|entry| entry.name))
    }

    /// Closest registered name within edit distance 3.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_ascii_lowercase();
        self.names()
            .map(|name| (strsim::levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}
