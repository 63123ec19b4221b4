use std::fs;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use scrivener::config::{SimConfig, Variant};
use scrivener::keyboard;
use scrivener::motion::Point;
use scrivener::schedule::{Clock, ManualClock, SessionState};
use scrivener::session;
use scrivener::sim::{self, RecordingSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// Plain typing: tab stays a Tab key, no breaks, drift, or scrolling.
    Basic,
    /// Breaks, cursor drift, scrolling, tab-as-spaces, caret reset on Enter.
    Enhanced,
}

impl VariantArg {
    fn to_library(self) -> Variant {
        match self {
            VariantArg::Basic => Variant::Basic,
            VariantArg::Enhanced => Variant::Enhanced,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "scrivener")]
#[command(about = "Human-like mouse and keyboard session simulator for X11 editors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drive the focused editor in an endless click+type loop
    Run {
        /// Text file to type, over and over
        #[arg(long, value_name = "PATH", default_value = "input.txt")]
        input: PathBuf,

        /// Seconds before the first cycle; focus the editor during this window
        #[arg(long, default_value_t = 30)]
        countdown: u64,

        /// Behavior profile.
        ///
        /// The two profiles handle tab differently (Tab key vs four spaces);
        /// pick per deployment.
        #[arg(long, value_enum, default_value_t = VariantArg::Enhanced)]
        variant: VariantArg,

        /// Optional RNG seed (for debugging)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Record one cycle against a virtual sink and print the event log (JSON)
    Rehearse {
        /// Text file to type
        #[arg(long, value_name = "PATH", default_value = "input.txt")]
        input: PathBuf,

        /// Behavior profile.
        #[arg(long, value_enum, default_value_t = VariantArg::Enhanced)]
        variant: VariantArg,

        /// Optional RNG seed (for debugging)
        #[arg(long)]
        seed: Option<u64>,

        /// Output file for the event log (defaults to stdout)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

fn load_text(path: &PathBuf) -> Result<String> {
    let raw = fs::read_to_string(path).with_context(|| {
        format!(
            "failed to read {}; create it with the text you want typed",
            path.display()
        )
    })?;

    let text = raw.replace("\r\n", "\n");

    if let Some((byte_idx, c)) = keyboard::find_first_unsupported_char(&text) {
        let (line, col) = byte_index_to_line_col(&text, byte_idx);
        return Err(anyhow!(
            "untypeable character {c:?} (U+{:04X}) at line {line}, column {col}. Supported: ASCII, newline, tab, and smart quotes.",
            c as u32
        ));
    }

    Ok(text)
}

fn byte_index_to_line_col(text: &str, byte_idx: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut col = 1usize;
    for (i, c) in text.char_indices() {
        if i >= byte_idx {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn install_stop_flag() -> Result<Arc<AtomicBool>> {
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::SeqCst);
        })
        .context("failed to install Ctrl+C handler")?;
    }
    Ok(stop)
}

fn run(input: PathBuf, countdown: u64, variant: VariantArg, seed: Option<u64>) -> Result<()> {
    // Fail fast on unsupported environments.
    scrivener::inject::require_x11_environment()?;

    let text = load_text(&input)?;
    eprintln!(
        "Loaded {} characters from {}.",
        text.chars().count(),
        input.display()
    );

    let stop = install_stop_flag()?;
    if !session::countdown(stop.as_ref(), countdown) {
        eprintln!("Stopped before the first cycle.");
        return Ok(());
    }

    #[cfg(feature = "x11")]
    {
        use scrivener::input::InputSink;
        use scrivener::schedule::SystemClock;

        let mut sink = scrivener::inject::x11::X11Sink::connect()?;
        let mut routine = scrivener::breaks::platform_routine();
        let cfg = SimConfig::default();
        let mut rng = rng_from_seed(seed);

        let outcome = session::run(
            &text,
            &cfg,
            variant.to_library().capabilities(),
            &mut sink,
            routine.as_mut(),
            &SystemClock,
            &mut rng,
            stop.as_ref(),
        );

        let _ = sink.neutralize();
        match outcome? {
            session::Outcome::Stopped => eprintln!("Stopped by operator."),
        }
        Ok(())
    }

    #[cfg(not(feature = "x11"))]
    {
        let _ = (text, stop, variant, seed);
        Err(anyhow!("no injection backend enabled in this build"))
    }
}

fn rehearse(
    input: PathBuf,
    variant: VariantArg,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let text = load_text(&input)?;

    let cfg = SimConfig::instant();
    let clock = ManualClock::new();
    let stop = AtomicBool::new(false);
    let mut rng = rng_from_seed(seed);
    let mut sink = RecordingSink::new(Point::new(0, 0));
    let mut routine = scrivener::breaks::PlainWait;
    let mut state = SessionState::new(clock.now());

    session::run_cycle(
        &text,
        &cfg,
        variant.to_library().capabilities(),
        &mut sink,
        &mut routine,
        &clock,
        &mut rng,
        &stop,
        &mut state,
    )?;

    let stats = sim::stats(&sink.events);
    eprintln!(
        "Rehearsed one cycle: {} cursor moves, {} clicks, {} scrolls, {} key events",
        stats.cursor_moves, stats.clicks, stats.scrolls, stats.key_events
    );

    let json =
        serde_json::to_string_pretty(&sink.events).context("failed to serialize the event log")?;
    match output {
        Some(path) => fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            input,
            countdown,
            variant,
            seed,
        } => run(input, countdown, variant, seed),
        Command::Rehearse {
            input,
            variant,
            seed,
            output,
        } => rehearse(input, variant, seed, output),
    }
}
