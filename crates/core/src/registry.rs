// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use indexmap::IndexMap;
use indexmap::map::{Iter, IterMut};

use crate::command_set::CommandSet;

/// The commands of one appliance, by name, in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commands {
    sets: IndexMap<String, CommandSet>,
}

impl Commands {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a command.
    pub fn insert(&mut self, command_set: CommandSet) {
        self.sets
            .insert(String::from(command_set.name()), command_set);
    }

    /// Returns a command by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandSet> {
        self.sets.get(name)
    }

    /// Returns a command by name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CommandSet> {
        self.sets.get_mut(name)
    }

    /// Returns `true` if a command with this name is loaded.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Returns the command names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.sets.keys().cloned().collect()
    }

    /// Iterates over the commands.
    pub fn iter(&self) -> Iter<'_, String, CommandSet> {
        self.sets.iter()
    }

    /// Iterates mutably over the commands.
    pub fn iter_mut(&mut self) -> IterMut<'_, String, CommandSet> {
        self.sets.iter_mut()
    }

    /// Returns the number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if no command is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

impl FromIterator<CommandSet> for Commands {
    fn from_iter<I: IntoIterator<Item = CommandSet>>(iter: I) -> Self {
        let mut commands: Self = Self::new();
        for command_set in iter {
            commands.insert(command_set);
        }
        commands
    }
}

impl<'a> IntoIterator for &'a Commands {
    type Item = (&'a String, &'a CommandSet);
    type IntoIter = Iter<'a, String, CommandSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}

impl<'a> IntoIterator for &'a mut Commands {
    type Item = (&'a String, &'a mut CommandSet);
    type IntoIter = IterMut<'a, String, CommandSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter_mut()
    }
}
