use std::io;

use anyhow::Result;
use comfy_table::{Cell, Row};
use femview_cli::config::{Config, load_config};
use femview_cli::runner::{build_session, repl, run_scripts};
use femview_cli::terminal::TerminalFrontend;
use femview_interp::command_table;
use femview_interp::table::styled_table;

use crate::cli::{Cli, ExecArgs, RunArgs};

fn config(cli: &Cli) -> Result<Config> {
    load_config(cli.config.as_deref())
}

/// Returns the exit code.
pub fn run_batch(cli: &Cli, args: &RunArgs) -> Result<i32> {
    let config = config(cli)?;
    let mut session_config = config.session_config(true);
    session_config.echo |= args.echo;
    let mut session = build_session(&config, session_config, Box::new(TerminalFrontend::stdio()))?;
    let stats = run_scripts(&mut session, &args.scripts)?;
    tracing::info!(valid = stats.valid, invalid = stats.invalid, "scripts finished");
    Ok(if args.strict && stats.invalid > 0 { 1 } else { 0 })
}

pub fn run_repl(cli: &Cli) -> Result<i32> {
    let config = config(cli)?;
    let mut session = build_session(&config, config.session_config(false), Box::new(TerminalFrontend::stdio()))?;
    let stdin = io::stdin();
    repl(&mut session, stdin.lock(), &mut io::stdout())?;
    Ok(0)
}

pub fn run_exec(cli: &Cli, args: &ExecArgs) -> Result<i32> {
    let config = config(cli)?;
    let mut session = build_session(&config, config.session_config(true), Box::new(TerminalFrontend::stdio()))?;
    let line = args.line.join(" ");
    Ok(if session.parse_command(&line) { 0 } else { 1 })
}

pub fn run_commands() -> Result<()> {
    let mut table = styled_table(&["Command", "Usage", "Description"]);
    for spec in command_table().iter() {
        table.add_row(Row::from(vec![
            Cell::new(spec.name),
            Cell::new(spec.usage),
            Cell::new(spec.summary),
        ]));
    }
    println!("{table}");
    Ok(())
}
