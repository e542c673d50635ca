use clap::{error::ErrorKind, CommandFactory, Parser};
use itertools::Itertools;
use notedrill::{
    config::{ConfigStore, FileConfigStore},
    runtime::{
        Clock, DrillEvent, FixedTicker, InputSource, LineInputSource, Randomness, RngSource,
        Runner, SystemClock, Ticker,
    },
    util::format_duration_secs,
    ClefMode, Configuration, Difficulty, GameEngine, SessionCommand, SessionSnapshot,
    SessionStatus, SessionSummary,
};
use std::{
    error::Error,
    io::{self, Write},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;
const FLASH_ERROR_MS: u64 = 600;

/// note recognition drill: name the note, keep your lives
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A note recognition drill. Each prompt shows the next note as a notation key (e.g. c#/4) on a clef; answer with a pitch name (C#4, Db4) or a note number (61). A miss costs a life and reshuffles the sequence."
)]
pub struct Cli {
    /// difficulty tier (defaults to the saved setting)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// staff to draw notes on; `both` picks per note around middle C
    #[clap(short = 'c', long, value_enum)]
    clef: Option<ClefMode>,

    /// number of lives (1-5)
    #[clap(short = 'l', long)]
    lives: Option<u8>,

    /// notes per sequence (3-20)
    #[clap(short = 'n', long = "length")]
    sequence_length: Option<usize>,

    /// allow double sharps and flats (advanced only)
    #[clap(long)]
    double_accidentals: bool,

    /// seed the note generator for a repeatable session
    #[clap(long)]
    seed: Option<u64>,

    /// pause automatically after this many seconds without input
    #[clap(long)]
    idle_secs: Option<u64>,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save: bool,
}

impl Cli {
    /// Overlay command line flags on the stored settings
    fn to_configuration(&self, stored: Configuration) -> Configuration {
        Configuration {
            difficulty: self.difficulty.unwrap_or(stored.difficulty),
            clef: self.clef.unwrap_or(stored.clef),
            lives: self.lives.unwrap_or(stored.lives),
            sequence_length: self.sequence_length.unwrap_or(stored.sequence_length),
            allow_double_accidentals: self.double_accidentals || stored.allow_double_accidentals,
        }
    }
}

pub struct App<C: Clock, R: Randomness> {
    pub engine: GameEngine<C, R>,
    pub config: Configuration,
    pub snapshot: SessionSnapshot,
    flash_since: Option<u64>,
    last_input_at: u64,
    idle_timeout_ms: Option<u64>,
}

impl<C: Clock, R: Randomness> App<C, R> {
    pub fn new(
        mut engine: GameEngine<C, R>,
        config: Configuration,
        idle_timeout_ms: Option<u64>,
    ) -> Self {
        let snapshot = engine.start(&config);
        let last_input_at = engine.clock().now_ms();
        Self {
            engine,
            config,
            snapshot,
            flash_since: None,
            last_input_at,
            idle_timeout_ms,
        }
    }

    pub fn on_command(&mut self, command: SessionCommand) {
        let now = self.engine.clock().now_ms();
        self.last_input_at = now;
        self.snapshot = self.engine.apply(&self.snapshot, command, &self.config);
        self.flash_since = match (self.snapshot.flash_error, self.flash_since) {
            (false, _) => None,
            (true, None) => Some(now),
            (true, since) => since,
        };
    }

    /// Run the caller-owned timers; true when the session was paused for idling
    pub fn on_tick(&mut self) -> bool {
        let now = self.engine.clock().now_ms();

        if let Some(since) = self.flash_since {
            if now.saturating_sub(since) >= FLASH_ERROR_MS {
                self.snapshot = self.engine.clear_flash_error(&self.snapshot);
                self.flash_since = None;
            }
        }

        match self.idle_timeout_ms {
            Some(limit)
                if self.snapshot.status() == SessionStatus::Waiting
                    && now.saturating_sub(self.last_input_at) >= limit =>
            {
                log::debug!("idle for {limit}ms, pausing");
                self.snapshot = self.engine.pause(&self.snapshot);
                true
            }
            _ => false,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        self.snapshot.summary(self.engine.clock().now_ms())
    }
}

fn render_status(snapshot: &SessionSnapshot) -> String {
    match snapshot.status() {
        SessionStatus::GameOver => format!(
            "game over | score {} | n: new session, q: quit",
            snapshot.score
        ),
        SessionStatus::Paused => "paused | r: resume, q: quit".to_string(),
        SessionStatus::Waiting => {
            let feedback = match (snapshot.flash_error, snapshot.last_was_correct) {
                (true, _) => "x ",
                (false, Some(true)) => "ok ",
                _ => "",
            };
            let progress = (0..snapshot.sequence.len())
                .map(|i| if i < snapshot.current_index { '#' } else { '.' })
                .join("");
            let (clef, key) = snapshot
                .expected_note()
                .map(|n| (n.clef.to_string(), n.notation_key.clone()))
                .unwrap_or_default();
            format!(
                "{feedback}[{progress}] {clef} {key} | score {} streak {} lives {} acc {}%",
                snapshot.score,
                snapshot.streak,
                snapshot.lives,
                snapshot.accuracy()
            )
        }
    }
}

fn render_summary(summary: &SessionSummary) -> String {
    [
        format!("time        {}", format_duration_secs(summary.duration_secs)),
        format!("score       {}", summary.score),
        format!("final score {}", summary.final_score),
        format!("accuracy    {}% ({}/{})", summary.accuracy, summary.correct, summary.attempts),
        format!("notes/min   {}", summary.notes_per_minute),
        format!("best streak {}", summary.best_streak),
    ]
    .iter()
    .join("\n")
}

fn run<E, T, C, R, W>(runner: &Runner<E, T>, app: &mut App<C, R>, out: &mut W) -> io::Result<()>
where
    E: InputSource,
    T: Ticker,
    C: Clock,
    R: Randomness,
    W: Write,
{
    writeln!(out, "{}", render_status(&app.snapshot))?;

    loop {
        match runner.step() {
            DrillEvent::Tick => {
                if app.on_tick() {
                    writeln!(out, "{}", render_status(&app.snapshot))?;
                }
            }
            DrillEvent::Command(command) => {
                let was_over = app.snapshot.is_game_over;
                app.on_command(command);
                if app.snapshot.is_game_over && !was_over {
                    writeln!(out, "{}", render_summary(&app.summary()))?;
                }
                writeln!(out, "{}", render_status(&app.snapshot))?;
            }
            DrillEvent::Unrecognized(text) => {
                writeln!(
                    out,
                    "? {text}: answer with a pitch (C#4) or note number (61); p pause, r resume, n new, q quit"
                )?;
            }
            DrillEvent::Quit | DrillEvent::Closed => break,
        }
        out.flush()?;
    }

    if !app.snapshot.is_game_over && app.snapshot.attempts > 0 {
        writeln!(out, "{}", render_summary(&app.summary()))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = cli.to_configuration(store.load());
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }
    if cli.save {
        store.save(&config)?;
        log::info!("saved settings to {}", store.path().display());
    }

    let rng = match cli.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let engine = GameEngine::new(SystemClock::new(), rng);
    let mut app = App::new(engine, config, cli.idle_secs.map(|s| s * 1000));

    let runner = Runner::new(
        LineInputSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let stdout = io::stdout();
    run(&runner, &mut app, &mut stdout.lock())?;

    Ok(())
}
