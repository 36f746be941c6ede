//! RobCo Terminal CLI - runs the menu terminal in a host terminal.
//!
//! This is the main binary entry point. See the `robco_terminal` library
//! for the core functionality.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mimalloc::MiMalloc;
use robco_terminal::input::{HidKeyboard, ReportReader};
use robco_terminal::tui::{self, HostAction, TerminalGuard, TerminalSurface};
use robco_terminal::{
    event_channel, EventSender, FsStore, LoopbackTransport, MenuTree, Terminal, TerminalConfig,
    TerminalEvent,
};

/// Global allocator configured per M-MIMALLOC-APPS guideline.
/// mimalloc provides better multi-threaded performance than the system allocator.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Global flag for signal-triggered shutdown (as Arc for signal-hook compatibility)
static SHUTDOWN_FLAG: std::sync::LazyLock<Arc<AtomicBool>> =
    std::sync::LazyLock::new(|| Arc::new(AtomicBool::new(false)));

/// How long the keyboard thread waits for an event before rechecking shutdown.
const KEYBOARD_POLL: Duration = Duration::from_millis(100);

// CLI
#[derive(Parser)]
#[command(name = "robco-terminal")]
#[command(version)]
#[command(about = "Retro menu terminal with condition-gated items and a line editor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the terminal in this console
    Run(RunArgs),
    /// Validate a configuration file and print the menu outline
    Check {
        /// Path to the configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory text editor files are read from and saved to
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Seed a topic value before start, e.g. `--set robco_terminal/door=open`
    #[arg(long = "set", value_name = "TOPIC=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,
    /// Read HID keyboard reports from a serial device or file
    #[arg(long, value_name = "PATH")]
    hid_serial: Option<PathBuf>,
    /// Skip the boot banner
    #[arg(long)]
    no_boot: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((topic, value)) if !topic.is_empty() => Ok((topic.to_string(), value.to_string())),
        _ => Err(format!("expected TOPIC=VALUE, got '{raw}'")),
    }
}

/// Load the config from an explicit path, or the default path when present.
///
/// A missing explicit file is an error; a missing default file falls back
/// to built-in defaults.
fn load_config(explicit: Option<&Path>) -> Result<TerminalConfig> {
    if let Some(path) = explicit {
        return TerminalConfig::load(path);
    }

    let path = TerminalConfig::default_path()?;
    if path.exists() {
        TerminalConfig::load(&path)
    } else {
        log::warn!("No config file at {}, using defaults", path.display());
        let mut config = TerminalConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

fn build_tree(config: &TerminalConfig) -> Result<MenuTree> {
    MenuTree::build(&config.menu_items, &config.mqtt_topic_prefix)
        .context("Invalid menu configuration")
}

fn default_data_dir() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .context("Could not determine data directory")?
        .join("robco-terminal"))
}

/// Spawn the host keyboard reader.
///
/// Quit keys raise the shutdown flag instead of reaching the terminal.
fn spawn_keyboard_reader(events: EventSender, shutdown: Arc<AtomicBool>) -> Result<()> {
    std::thread::Builder::new()
        .name("keyboard".to_string())
        .spawn(move || {
            while !shutdown.load(Ordering::SeqCst) {
                match crossterm::event::poll(KEYBOARD_POLL) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        log::error!("Keyboard poll failed: {e}");
                        break;
                    }
                }
                let event = match crossterm::event::read() {
                    Ok(event) => event,
                    Err(e) => {
                        log::error!("Keyboard read failed: {e}");
                        break;
                    }
                };
                match tui::event_to_action(&event) {
                    Some(HostAction::Quit) => {
                        log::info!("Quit requested from keyboard");
                        shutdown.store(true, Ordering::SeqCst);
                    }
                    Some(HostAction::Input(input)) => {
                        if events.send(TerminalEvent::Input(input)).is_err() {
                            break;
                        }
                    }
                    None => {}
                }
            }
            log::debug!("Keyboard reader stopped");
        })
        .context("Failed to spawn keyboard thread")?;
    Ok(())
}

/// Spawn the HID report reader for `path`.
fn spawn_hid_reader(path: &Path, events: EventSender) -> Result<()> {
    let mut source = File::open(path)
        .with_context(|| format!("Failed to open HID source {}", path.display()))?;
    let label = path.display().to_string();
    log::info!("Reading HID reports from {label}");

    std::thread::Builder::new()
        .name("hid".to_string())
        .spawn(move || {
            let mut reader = ReportReader::new();
            let mut keyboard = HidKeyboard::new();
            let mut buf = [0u8; 64];
            loop {
                let n = match source.read(&mut buf) {
                    Ok(0) => {
                        log::info!("HID source {label} closed");
                        break;
                    }
                    Ok(n) => n,
                    Err(e) => {
                        log::error!("HID read from {label} failed: {e}");
                        break;
                    }
                };
                for report in reader.push(&buf[..n]) {
                    for input in keyboard.decode(&report) {
                        if events.send(TerminalEvent::Input(input)).is_err() {
                            return;
                        }
                    }
                }
            }
        })
        .context("Failed to spawn HID thread")?;
    Ok(())
}

/// Run the terminal until a signal or quit key.
fn run(args: RunArgs) -> Result<()> {
    // Set up signal handlers
    use signal_hook::consts::signal::{SIGINT, SIGTERM};
    use signal_hook::flag;
    flag::register(SIGINT, Arc::clone(&SHUTDOWN_FLAG))?;
    flag::register(SIGTERM, Arc::clone(&SHUTDOWN_FLAG))?;

    // Everything that can fail happens before raw mode so errors are visible
    let mut config = load_config(args.config.as_deref())?;
    if args.no_boot {
        config.boot_sequence = false;
    }
    config.log_summary();
    let tree = Arc::new(build_tree(&config)?);

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    log::info!("Text files under {}", data_dir.display());
    let store = FsStore::new(data_dir);

    let mut transport = LoopbackTransport::new();
    for (topic, value) in &args.set {
        log::info!("Seeding {topic} = {value}");
        transport.inject(topic, value);
    }

    let (tx, rx) = event_channel();
    if let Some(path) = &args.hid_serial {
        spawn_hid_reader(path, tx.clone())?;
    }
    let runtime = tokio::runtime::Runtime::new()?;

    let _terminal_guard = TerminalGuard::enter()?;
    let surface = TerminalSurface::stdout(config.font_color, config.background_color)?;
    spawn_keyboard_reader(tx.clone(), Arc::clone(&SHUTDOWN_FLAG))?;

    let now = Instant::now();
    let mut terminal = Terminal::new(tree, &config, transport, store, surface, now);
    terminal.start(&tx, now);
    drop(tx);

    log::info!("RobCo Terminal v{} started", env!("CARGO_PKG_VERSION"));
    runtime.block_on(terminal.run(rx, Arc::clone(&SHUTDOWN_FLAG)));
    log::info!("Shutting down");
    Ok(())
}

/// Validate the config and print the outline.
fn check(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let tree = build_tree(&config)?;
    print!("{}", tree.outline());
    println!(
        "OK: {} items, {} watched topics",
        tree.len(),
        tree.watched_topics().len()
    );
    Ok(())
}

fn init_logging() -> Result<()> {
    // Log to a file so output doesn't corrupt the screen
    let log_path = std::env::var("ROBCO_LOG_FILE")
        .map_or_else(|_| PathBuf::from("/tmp/robco-terminal.log"), PathBuf::from);
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file at {}", log_path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp_secs()
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    // Set up panic hook to log panics and ensure terminal cleanup
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        log::error!("PANIC: {:?}", panic_info);
        TerminalGuard::restore();
        default_hook(panic_info);
    }));

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args)?,
        Commands::Check { config } => check(config.as_deref())?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("robco_terminal/door=open"),
            Ok(("robco_terminal/door".to_string(), "open".to_string()))
        );
        assert_eq!(parse_assignment("t=a=b"), Ok(("t".to_string(), "a=b".to_string())));
        assert_eq!(parse_assignment("t="), Ok(("t".to_string(), String::new())));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "robco-terminal",
            "run",
            "--no-boot",
            "--set",
            "a=1",
            "--set",
            "b=2",
            "--data-dir",
            "/tmp/d",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.no_boot);
        assert_eq!(args.set.len(), 2);
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/d")));
        assert!(args.hid_serial.is_none());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_config(Some(&missing)).is_err());
    }
}
