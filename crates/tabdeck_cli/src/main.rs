//! Terminal shell for the TabDeck widgets.
//!
//! # Responsibility
//! - Resolve configuration from env and flags, then open task storage.
//! - Run one widget command, or an interactive session with `repl`.

mod session;

use clap::{Parser, Subcommand};
use log::error;
use session::Session;
use std::path::PathBuf;
use std::process::ExitCode;
use tabdeck_core::db::open_db;
use tabdeck_core::{init_logging, AppConfig};

#[derive(Debug, Parser)]
#[command(
    name = "tabdeck",
    version,
    about = "Calculator, to-do list and gallery in a terminal"
)]
struct Cli {
    /// SQLite file holding the task list (overrides TABDECK_DB_PATH).
    #[arg(long, value_name = "PATH", global = true)]
    db_path: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error (overrides TABDECK_LOG_LEVEL).
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files (overrides TABDECK_LOG_DIR).
    #[arg(long, value_name = "DIR", global = true)]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Feed keypad tokens to the calculator, e.g. `calc 5 + 3 =`.
    Calc {
        /// Print the display after every key instead of only the last one.
        #[arg(long)]
        trace: bool,
        #[arg(required = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },
    /// Manage the to-do list.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Browse the image gallery.
    #[command(subcommand)]
    Gallery(GalleryCommand),
    /// Interactive session with tab navigation.
    Repl,
}

#[derive(Debug, Subcommand)]
pub(crate) enum TaskCommand {
    /// List tasks in creation order.
    List,
    /// Add a task.
    Add {
        text: String,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark a task completed.
    Done {
        id: i64,
        /// Stay until the removal timeline finishes.
        #[arg(long)]
        wait: bool,
    },
    /// Replace a task's text.
    Edit { id: i64, text: String },
    /// Set or clear (omit DATE) a task's due date.
    Date { id: i64, date: Option<String> },
    /// Delete a task.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub(crate) enum GalleryCommand {
    /// List images with their index.
    List,
    /// Open the viewer on one image.
    Open { index: usize },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("error: cannot open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let trace = matches!(cli.command, Command::Calc { trace: true, .. });
    let mut session = match Session::open(&conn, trace) {
        Ok(session) => session,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Calc { tokens, .. } => session.run_calc(&tokens),
        Command::Task(command) => session.run_task(command),
        Command::Gallery(command) => session.run_gallery(command),
        Command::Repl => session.run_repl(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(db_path) = &cli.db_path {
        config.db_path = db_path.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, TaskCommand};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn calc_accepts_operator_tokens_that_look_like_flags() {
        let cli = Cli::try_parse_from(["tabdeck", "calc", "9", "-", "4", "="]).unwrap();
        match cli.command {
            Command::Calc { tokens, trace } => {
                assert!(!trace);
                assert_eq!(tokens, vec!["9", "-", "4", "="]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn task_add_parses_optional_date() {
        let cli = Cli::try_parse_from([
            "tabdeck",
            "--db-path",
            "/tmp/tabdeck-test.db",
            "task",
            "add",
            "pay rent",
            "--date",
            "2025-12-09",
        ])
        .unwrap();

        assert_eq!(
            cli.db_path.as_deref(),
            Some(std::path::Path::new("/tmp/tabdeck-test.db"))
        );
        match cli.command {
            Command::Task(TaskCommand::Add { text, date }) => {
                assert_eq!(text, "pay rent");
                assert_eq!(date.as_deref(), Some("2025-12-09"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
