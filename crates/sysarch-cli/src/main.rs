//! sysarch - Command-line interface for collaborative architecture assessment.

use clap::Parser;
use sysarch_cli::commands;
use sysarch_cli::{Cli, Command, Config, Formatter, Session};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> sysarch_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load or create config
    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Could not load configuration; using defaults");
        Config::default()
    });

    // Override workspace if specified
    if let Some(name) = cli.workspace {
        config.switch_workspace(name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let command = match cli.command {
        Command::Workspace(args) => {
            return commands::execute_workspace(args, &mut config, &formatter);
        }
        command => command,
    };

    let workspace = config.active()?;
    let data_file = cli.data.unwrap_or_else(|| workspace.data_file.clone());
    let project = cli.project.or_else(|| workspace.project.clone());
    let mut session = Session::open(data_file, project, config.scoring.clone())?;

    match command {
        Command::Project(args) => commands::execute_project(args, &mut session, &formatter)?,
        Command::Goal(args) => commands::execute_goal(args, &mut session, &formatter)?,
        Command::Term(args) => commands::execute_term(args, &mut session, &formatter)?,
        Command::Function(args) => commands::execute_function(args, &mut session, &formatter)?,
        Command::System(args) => commands::execute_system(args, &mut session, &formatter)?,
        Command::Scenario(args) => commands::execute_scenario(args, &mut session, &formatter)?,
        Command::Category(args) => commands::execute_category(args, &mut session, &formatter)?,
        Command::Scale(args) => commands::execute_scale(args, &mut session, &formatter)?,
        Command::Relate(args) => commands::execute_relate(args, &mut session, &formatter)?,
        Command::Relationships => commands::execute_relationships(&session, &formatter)?,
        Command::Vote(args) => commands::execute_vote(args, &mut session, &formatter)?,
        Command::Votes(args) => commands::execute_votes(args, &session, &formatter)?,
        Command::Architecture(args) => {
            commands::execute_architecture(args, &mut session, &formatter)?
        }
        Command::Shortfall(args) => commands::execute_shortfall(args, &session, &formatter)?,
        Command::Expert(args) => commands::execute_expert(args, &mut session, &formatter)?,
        Command::Import(args) => commands::execute_import(args, &mut session, &formatter)?,
        Command::Seed(args) => commands::execute_seed(args, &mut session, &formatter)?,
        Command::Workspace(_) => unreachable!("handled before the store is opened"),
    }

    // Persist only after the command succeeded
    session.save()
}
