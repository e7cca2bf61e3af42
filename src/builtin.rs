use crate::command::{CommandFactory, CommandInfo, ExecutableCommand, ExitCode};
use crate::element::{Element, eq_ignore_case};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Result, bail};
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use tracing::{debug, warn};

/// Built-in commands known to the REPL at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly against the session [`Environment`].
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Name the user types, e.g. "display". Matched case-sensitively.
    const NAME: &'static str;

    /// Minimum number of positional arguments.
    const ARITY: usize = 0;

    /// One-line blurb shown by `help` and `<name> help`.
    const INFO: &'static str;

    /// Detailed usage printed by `<name> help` after the blurb.
    const HELP: Option<&'static str> = None;

    /// Executes the command using the provided output stream and environment.
    ///
    /// Return value follows shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match <T as BuiltinCommand>::execute(*self, stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(stdout, "{}", e)?;
                Ok(1)
            }
        }
    }
}

/// Canned output produced without running the command itself: usage text,
/// arity complaints and argument parse failures.
struct Message {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for Message {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        stdout.write_all(self.output.as_bytes())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

fn usage<T: BuiltinCommand>() -> String {
    let mut s = format!("{}\n\n", T::INFO);
    if let Some(help) = T::HELP {
        s.push_str(help);
    }
    s
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn describe(&self) -> CommandInfo {
        CommandInfo {
            name: T::NAME,
            info: T::INFO,
        }
    }

    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != T::NAME {
            return None;
        }

        if args.first() == Some(&"help") {
            return Some(Box::new(Message {
                output: usage::<T>(),
                is_error: false,
            }));
        }

        if args.len() < T::ARITY {
            warn!(command = name, given = args.len(), needed = T::ARITY, "missing arguments");
            return Some(Box::new(Message {
                output: format!("Missing a parameter. For help try '{} help'\n", name),
                is_error: true,
            }));
        }

        // Trailing extras are ignored. "--" stops argh from reading element
        // arguments such as "-1" as flags.
        let mut argv = vec!["--"];
        argv.extend_from_slice(&args[..T::ARITY]);
        debug!(command = name, args = ?&argv[1..], "dispatching builtin");

        Some(match T::from_args(&[name], &argv) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(Message {
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

/// Factories for every builtin, in the order `help` lists them.
pub(crate) fn default_factories() -> Vec<Box<dyn CommandFactory>> {
    vec![
        Box::new(Factory::<Help>::default()),
        Box::new(Factory::<Exit>::default()),
        Box::new(Factory::<Version>::default()),
        Box::new(Factory::<DisplayElement>::default()),
        Box::new(Factory::<CompareElements>::default()),
        Box::new(Factory::<ListElements>::default()),
    ]
}

#[derive(FromArgs)]
/// List every command with a short description.
pub struct Help {}

impl BuiltinCommand for Help {
    const NAME: &'static str = "help";
    const INFO: &'static str = "Displays helpful information";

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        writeln!(
            stdout,
            "Run a command by using 'CommandName arguments' (case-sensitive)"
        )?;
        writeln!(
            stdout,
            "For more information about a command run 'CommandName help'\n"
        )?;
        writeln!(stdout, "List of commands:")?;
        for command in &env.catalog {
            writeln!(stdout, "{} | {}", command.name, command.info)?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Leave the REPL.
pub struct Exit {}

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";
    const INFO: &'static str = "Exit the program";

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the pTable version.
pub struct Version {}

impl BuiltinCommand for Version {
    const NAME: &'static str = "version";
    const INFO: &'static str = "Displays the pTable version";

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "The version is {}", env!("CARGO_PKG_VERSION"))?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Find an element and print its properties.
pub struct DisplayElement {
    #[argh(positional)]
    /// atomic number, symbol (case-sensitive) or name (case-insensitive).
    pub element: String,
}

impl BuiltinCommand for DisplayElement {
    const NAME: &'static str = "display";
    const ARITY: usize = 1;
    const INFO: &'static str = "Find an element and display useful information";
    const HELP: Option<&'static str> = Some(
        "This command takes one argument:\n\
         \tA number for atomic number\t\t\tex. 'display 6'\n\
         \tText for either element name or element symbol\tex. 'display H' or 'display Hydrogen'\n",
    );

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let element = env.table.query(&self.element)?;
        write!(stdout, "{}", element)?;
        Ok(0)
    }
}

/// Numeric properties `compare` knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Property {
    Electronegativity,
    Radius,
}

impl Property {
    fn label(self) -> &'static str {
        match self {
            Property::Electronegativity => "electronegativity",
            Property::Radius => "radius",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            Property::Electronegativity => "",
            Property::Radius => " pm",
        }
    }

    fn value(self, element: &Element) -> Option<f32> {
        match self {
            Property::Electronegativity => element.electronegativity,
            Property::Radius => element.radius.map(f32::from),
        }
    }

    /// Resolve a user-typed property; `all` expands to every property.
    fn resolve(arg: &str) -> Option<&'static [Property]> {
        const ALL: &[Property] = &[Property::Electronegativity, Property::Radius];
        if eq_ignore_case(arg, "all") {
            Some(ALL)
        } else if eq_ignore_case(arg, Property::Electronegativity.label()) {
            Some(&ALL[0..1])
        } else if eq_ignore_case(arg, Property::Radius.label()) {
            Some(&ALL[1..2])
        } else {
            None
        }
    }
}

/// Two decimals at most, trailing zeros dropped: 0.35000002 -> "0.35", 53.0 -> "53".
fn format_value(value: f32) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn compare_property(
    stdout: &mut dyn Write,
    property: Property,
    a: &Element,
    b: &Element,
) -> Result<()> {
    let label = property.label();
    let unit = property.unit();
    match (property.value(a), property.value(b)) {
        (None, None) => writeln!(
            stdout,
            "Both of the selected elements don't have a known {}",
            label
        )?,
        (None, Some(_)) => writeln!(stdout, "{} does not have a known {}", a.name, label)?,
        (Some(_), None) => writeln!(stdout, "{} does not have a known {}", b.name, label)?,
        (Some(x), Some(y)) if format_value(x) == format_value(y) => writeln!(
            stdout,
            "{} and {} have the same {} of {}{}",
            a.name,
            b.name,
            label,
            format_value(x),
            unit
        )?,
        (Some(x), Some(y)) => {
            let ((hi_name, hi), (lo_name, lo)) = if x > y {
                ((&a.name, x), (&b.name, y))
            } else {
                ((&b.name, y), (&a.name, x))
            };
            writeln!(
                stdout,
                "{}'s {} of {}{} is greater than",
                hi_name,
                label,
                format_value(hi),
                unit
            )?;
            writeln!(stdout, "{}'s {} of {}{}", lo_name, label, format_value(lo), unit)?;
            writeln!(
                stdout,
                "The difference between the values is {}{}",
                format_value(hi - lo),
                unit
            )?;
        }
    }
    Ok(())
}

#[derive(FromArgs)]
/// Compare a property of two elements.
pub struct CompareElements {
    #[argh(positional)]
    /// electronegativity, radius or all.
    pub property: String,

    #[argh(positional)]
    /// first element.
    pub first: String,

    #[argh(positional)]
    /// second element.
    pub second: String,
}

impl BuiltinCommand for CompareElements {
    const NAME: &'static str = "compare";
    const ARITY: usize = 3;
    const INFO: &'static str = "Compares properties of elements";
    const HELP: Option<&'static str> = Some(
        "This command takes three arguments:\n\
         \tThe property to compare, the options are:\n\
         \t\telectronegativity\n\
         \t\tradius\n\
         \t\tall (every property above)\n\
         \tTwo elements, each one of:\n\
         \t\tA number for atomic number\n\
         \t\tText for the element symbol or name (symbol is case sensitive: FIRSTLETTERsecondletter)\n\n\
         \tex. 'compare electronegativity H Carbon'\n",
    );

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let (a, b) = match (env.table.query(&self.first), env.table.query(&self.second)) {
            (Ok(a), Ok(b)) => (a, b),
            (first, second) => {
                debug!(first = ?first.err(), second = ?second.err(), "compare lookup failed");
                bail!("Could not process the elements.");
            }
        };

        let Some(properties) = Property::resolve(&self.property) else {
            bail!("Could not process the command: {}", self.property);
        };

        for (i, property) in properties.iter().enumerate() {
            if i > 0 {
                writeln!(stdout)?;
            }
            compare_property(stdout, *property, a, b)?;
        }
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print every element in the table.
pub struct ListElements {}

impl BuiltinCommand for ListElements {
    const NAME: &'static str = "list";
    const INFO: &'static str = "Display every element in the table";

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        for (i, element) in env.table.iter().enumerate() {
            if i > 0 {
                writeln!(stdout)?;
            }
            write!(stdout, "{}", element)?;
        }
        Ok(0)
    }
}
