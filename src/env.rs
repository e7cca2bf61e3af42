use crate::command::CommandInfo;
use crate::table::Table;

/// Mutable state shared by every command of a session.
///
/// The environment contains:
/// - `table`: the loaded periodic table that lookups run against.
/// - `catalog`: the registered commands, in registration order, for `help`.
/// - `should_exit`: a flag that a REPL loop can check to know when to terminate.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub table: Table,
    pub catalog: Vec<CommandInfo>,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Create an environment around a loaded table with an empty catalog.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            catalog: Vec::new(),
            should_exit: false,
        }
    }

    /// Look up the description of a registered command.
    pub fn command_info(&self, name: &str) -> Option<&CommandInfo> {
        self.catalog.iter().find(|c| c.name == name)
    }
}
