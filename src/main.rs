use anyhow::{Context, Result};
use argh::FromArgs;
use ptable::{Interpreter, Table};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help"))]
/// Find out stuff about elements.
///
/// Without a command, starts an interactive session.
struct Args {
    #[argh(option)]
    /// read element data from this CSV file instead of the built-in table.
    data: Option<PathBuf>,

    #[argh(switch, short = 'v')]
    /// log debug output to stderr.
    verbose: bool,

    #[argh(positional, greedy)]
    /// run a single command, e.g. `display H`, and exit with its status.
    command: Vec<String>,
}

/// Logs go to stderr so they never mix with command output. `RUST_LOG`
/// takes precedence over `level`.
fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    init_logging(if args.verbose { "debug" } else { "warn" });

    let table = match &args.data {
        Some(path) => Table::from_path(path)
            .with_context(|| format!("can't load element data from {}", path.display()))?,
        None => Table::embedded().context("built-in element data is invalid")?,
    };
    let mut interpreter = Interpreter::with_table(table);

    if let Some((name, rest)) = args.command.split_first() {
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
        let mut stdout = std::io::stdout();
        let code = interpreter.run(name, &rest, &mut stdout)?;
        stdout.flush()?;
        std::process::exit(code);
    }

    interpreter.repl()?;
    Ok(())
}
