// Keystate CLI
// Replays a raw key event script against a session's rules and prints logical state updates

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use keystate_core::{load_script, KeyEventDispatcher, KeyStateEngine, SessionFile};

/// Keyboard combination state tracker
#[derive(Parser, Debug)]
#[command(name = "keystate")]
#[command(version)]
#[command(about = "Replay key events against named key combinations", long_about = None)]
struct Args {
    /// Session file with [rules] and optional [config] tables
    #[arg(short, long, value_name = "FILE")]
    session: Option<PathBuf>,

    /// Event script to replay
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Validate the session file and exit
    #[arg(long)]
    check: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn default_session_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("keystate").join("session.toml"))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn build_engine(session: &SessionFile) -> Result<KeyStateEngine> {
    let mut engine = KeyStateEngine::new(session.rules.clone()).context("invalid rule map")?;
    engine.update_config(&session.config);
    Ok(engine)
}

fn print_state(engine: &mut KeyStateEngine) {
    for (name, status) in engine.read_all() {
        println!("{} {}", name, status);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let session_path = match args.session.clone().or_else(default_session_path) {
        Some(path) => path,
        None => bail!("no --session given and no config directory available"),
    };
    log::debug!("loading session from {}", session_path.display());

    let session = SessionFile::from_path(&session_path)
        .with_context(|| format!("failed to load session {}", session_path.display()))?;
    let engine = build_engine(&session)?;

    if args.check {
        println!(
            "Session is valid: {} rules, {} captured codes",
            engine.rules().len(),
            engine.parsed_rules().capture_set().len()
        );
        return Ok(());
    }

    let Some(script_path) = args.script else {
        bail!("--script is required unless --check is given");
    };
    let events = load_script(&script_path)
        .with_context(|| format!("failed to load script {}", script_path.display()))?;

    let engine = engine.into_shared();
    let mut dispatcher = KeyEventDispatcher::new();
    dispatcher.attach(&engine);

    let mut seen = engine.lock().generation();
    for mut event in events {
        dispatcher.dispatch(&mut event);

        let mut engine = engine.lock();
        if engine.generation() == seen {
            continue;
        }
        seen = engine.generation();
        println!("# {}", event);
        print_state(&mut engine);
    }

    Ok(())
}
