//! pomo - Terminal focus timer with big ASCII clocks
//!
//! Usage:
//!   pomo                      Run one block with the configured durations
//!   pomo -f 50 -r 10 -b 2     Override durations and block count
//!   pomo --plan               Print the session plan and exit

use anyhow::{Context, Result};
use clap::Parser;
use pomo_core::{logging, Config, Paths};
use ratatui::backend::CrosstermBackend;
use std::io::Stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use pomo::background::Background;
use pomo::banner::FigletBanner;
use pomo::cli::Cli;
use pomo::clock::MonotonicClock;
use pomo::display::{self, DisplayContext};
use pomo::input::TerminalKeys;
use pomo::sound::{notifier_from_config, Notifier};
use pomo::{Sequencer, SessionPlan, SessionSummary, SessionTimer, TimerSettings};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new();

    let (config_path, mut config) = match &cli.config {
        Some(path) => (path.clone(), Config::load_required(path)?),
        None => {
            let path = paths.config_file();
            let config = Config::load(&path)?;
            (path, config)
        }
    };
    cli.apply(&mut config);
    config.validate()?;

    let plan = SessionPlan::from_config(&config);
    if cli.plan {
        println!("{}", plan);
        return Ok(());
    }

    let log_path = config.log_file.clone().unwrap_or_else(|| paths.log_file());
    if let Err(err) = logging::init(&log_path) {
        eprintln!("warning: logging disabled ({}): {}", log_path.display(), err);
    }
    info!(
        "starting {} phases, background {}, config {}",
        plan.len(),
        config.background.as_str(),
        config_path.display()
    );

    // Ctrl-C arrives as a key in raw mode; this catches SIGINT/SIGTERM from
    // outside the terminal
    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = interrupt.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("Failed to install interrupt handler")?;

    let banner = FigletBanner::new(&config.fonts)?;
    let notifier = notifier_from_config(&config.sound);

    display::install_panic_hook();
    let mut display = DisplayContext::new().context("Failed to set up the terminal")?;
    let result = run(&mut display, &config, plan, banner, notifier.as_ref(), interrupt);
    display.restore().context("Failed to restore the terminal")?;
    // Joins the sound worker so the final notification is not lost
    drop(notifier);

    let summary = result?;
    println!("{}", summary);
    Ok(())
}

fn run(
    display: &mut DisplayContext<CrosstermBackend<Stdout>>,
    config: &Config,
    plan: SessionPlan,
    banner: FigletBanner,
    notifier: &dyn Notifier,
    interrupt: Arc<AtomicBool>,
) -> Result<SessionSummary> {
    let timer = SessionTimer::new(
        display,
        TerminalKeys,
        MonotonicClock::new(),
        Box::new(banner),
        Background::new(config.background),
        TimerSettings::from_config(config),
    )
    .with_interrupt(interrupt.clone());

    Sequencer::new(plan, timer, notifier)
        .with_interrupt(interrupt)
        .run()
}
