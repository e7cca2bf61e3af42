use crate::builtin;
use crate::command::{COMMAND_NOT_FOUND, CommandFactory, ExitCode};
use crate::env::Environment;
use crate::table::{Table, TableError};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::Write;
use tracing::{debug, error, warn};

const BANNER: &str = "\
==================================================================

pTable
Find out stuff about elements. For a list of commands, type 'help'
Type 'exit' to quit

==================================================================
";

const PROMPT: &str = "> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports the builtin commands defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// The pTable command interpreter.
///
/// The interpreter owns an [`Environment`] (the loaded element table plus
/// session state) and a list of [`CommandFactory`] objects that are queried
/// in order to create commands by name.
///
/// Example
/// ```
/// use ptable::Interpreter;
/// let mut repl = Interpreter::embedded().unwrap();
/// let mut out = Vec::new();
/// let code = repl.run("display", &["H"], &mut out).unwrap();
/// assert_eq!(code, 0);
/// assert!(String::from_utf8(out).unwrap().starts_with("Hydrogen (H)"));
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>, table: Table) -> Self {
        let mut env = Environment::new(table);
        env.catalog = commands.iter().map(|c| c.describe()).collect();
        Self { env, commands }
    }

    /// Create an interpreter with every builtin over the given table.
    pub fn with_table(table: Table) -> Self {
        Self::new(builtin::default_factories(), table)
    }

    /// Create an interpreter over the built-in element table with every
    /// builtin command registered.
    pub fn embedded() -> std::result::Result<Self, TableError> {
        Ok(Self::with_table(Table::embedded()?))
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Whether `exit` has been run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Unknown names are reported on `stdout` and yield exit code 127.
    pub fn run(
        &mut self,
        name: &str,
        args: &[&str],
        stdout: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                let code = cmd.execute(stdout, &mut self.env)?;
                debug!(command = name, code, "command finished");
                return Ok(code);
            }
        }
        warn!(command = name, "unknown command");
        writeln!(stdout, "Could not process command '{}'", name)?;
        Ok(COMMAND_NOT_FOUND)
    }

    /// Split a typed line on whitespace and run it.
    ///
    /// Output is framed by blank lines to keep it apart from what the user
    /// typed. Blank input is ignored.
    pub fn execute_line(&mut self, line: &str, stdout: &mut dyn Write) -> anyhow::Result<ExitCode> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((name, args)) = words.split_first() else {
            return Ok(0);
        };

        writeln!(stdout)?;
        let code = self.run(name, args, stdout)?;
        writeln!(stdout)?;
        Ok(code)
    }

    /// Interactive Read-Eval-Print Loop on the terminal.
    ///
    /// Stops after `exit`, on Ctrl-C or at end of input.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();
        println!("{}", BANNER);

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    if let Err(err) = self.execute_line(&line, &mut stdout) {
                        error!(%err, "command failed");
                        println!("Error: {}", err);
                    }
                    if self.should_exit() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn run_line(interp: &mut Interpreter, line: &str) -> (i32, String) {
        let mut out: Vec<u8> = Vec::new();
        let code = interp.execute_line(line, &mut out).unwrap();
        (code, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn test_registers_every_builtin() {
        let interp = Interpreter::embedded().unwrap();
        let names: Vec<&str> = interp.env().catalog.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["help", "exit", "version", "display", "compare", "list"]
        );
        assert_eq!(interp.env().table.len(), 118);
    }

    #[test]
    fn test_embedded_loads_full_table() {
        let interp = Interpreter::embedded().expect("built-in element data is valid");
        assert_eq!(interp.env().table.len(), 118);
        assert!(!interp.env().table.is_empty());
    }

    #[test]
    fn test_line_output_is_framed_by_blank_lines() {
        let mut interp = Interpreter::embedded().unwrap();
        let (code, s) = run_line(&mut interp, "display   1");
        assert_eq!(code, 0);
        assert_eq!(
            s,
            "\nHydrogen (H)\n\
             Atomic Number: 1\n\
             Period: 1\tGroup: 1\n\
             Electronegativity: 2.2\n\
             Radius: 53 pm\n\n"
        );
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let mut interp = Interpreter::embedded().unwrap();
        let (code, s) = run_line(&mut interp, "   ");
        assert_eq!(code, 0);
        assert!(s.is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let mut interp = Interpreter::embedded().unwrap();
        let (code, s) = run_line(&mut interp, "Display H");
        assert_eq!(code, crate::command::COMMAND_NOT_FOUND);
        assert_eq!(s, "\nCould not process command 'Display'\n\n");
    }

    #[test]
    fn test_exit_stops_session() {
        let mut interp = Interpreter::embedded().unwrap();
        assert!(!interp.should_exit());
        run_line(&mut interp, "version");
        assert!(!interp.should_exit());
        let (code, _) = run_line(&mut interp, "exit");
        assert_eq!(code, 0);
        assert!(interp.should_exit());
    }

    #[test]
    fn test_session_of_commands() {
        let mut interp = Interpreter::embedded().unwrap();

        let (code, s) = run_line(&mut interp, "compare electronegativity F Cs");
        assert_eq!(code, 0);
        assert!(s.contains("Fluorine's electronegativity of 3.98 is greater than\n"));
        assert!(s.contains("Caesium's electronegativity of 0.79\n"));

        let (code, s) = run_line(&mut interp, "display Unobtainium");
        assert_eq!(code, 1);
        assert!(s.contains("Could not find element"));

        let (code, s) = run_line(&mut interp, "compare help");
        assert_eq!(code, 0);
        assert!(s.starts_with("\nCompares properties of elements\n\n"));
    }

    #[test]
    fn test_custom_factories() {
        let table = crate::Table::embedded().unwrap();
        let mut interp = Interpreter::new(Vec::new(), table);
        let (code, s) = run_line(&mut interp, "help");
        assert_eq!(code, crate::command::COMMAND_NOT_FOUND);
        assert!(s.contains("Could not process command 'help'"));
    }
}
