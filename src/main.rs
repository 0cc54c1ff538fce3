use std::io::{stdout, BufWriter, Stdout};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{event, terminal};
use rand::thread_rng;
use tracing::{error, info};

use flappy_term::compute::{flap, init_state};
use flappy_term::config::GameConfig;
use flappy_term::display::{
    self,
    terminal::{enter_screen, leave_screen, TerminalCanvas},
};
use flappy_term::error::GameError;
use flappy_term::input::{translate, Command};
use flappy_term::logging;
use flappy_term::scoreboard::{self, JsonLinesStore, ScoreStore};

type Screen = TerminalCanvas<BufWriter<Stdout>>;

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Run frames until the player quits.
///
/// Each frame: drain pending input, advance the simulation (settling the
/// session on the frame it ends), render, then sleep out the rest of the
/// frame.
fn game_loop<S: ScoreStore>(
    canvas: &mut Screen,
    config: &GameConfig,
    store: &mut S,
    rx: &mpsc::Receiver<event::Event>,
) -> Result<(), GameError> {
    let mut rng = thread_rng();
    let frame_duration = config.frame_duration();
    let started = Instant::now();
    let mut state = init_state(config, store.best());

    loop {
        let frame_start = Instant::now();
        let now_ms = started.elapsed().as_millis() as u64;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match translate(&ev) {
                Some(Command::Quit) => return Ok(()),
                Some(Command::Flap) => state = flap(&state, config, now_ms),
                Some(Command::Resize(cols, rows)) => canvas.resize(cols, rows),
                None => {}
            }
        }

        state = scoreboard::advance(
            &state,
            config,
            now_ms,
            &mut rng,
            store,
            &scoreboard::timestamp_now(),
        )?;

        display::render(canvas, &state, config, now_ms)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
    }
}

/// Everything that runs with the terminal in raw mode.
fn play<S: ScoreStore>(
    canvas: &mut Screen,
    config: &GameConfig,
    store: &mut S,
) -> Result<(), GameError> {
    enter_screen(canvas.writer_mut())?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<event::Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    game_loop(canvas, config, store, &rx)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), GameError> {
    let config = GameConfig::from_env()?;
    let data_dir = scoreboard::data_dir()?;
    logging::init(&data_dir)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let scores_path = match &config.scores_file {
        Some(path) => path.clone(),
        None => scoreboard::default_scores_path()?,
    };
    let mut store = JsonLinesStore::open(&scores_path)?;

    let (cols, rows) = terminal::size()?;
    let mut canvas = TerminalCanvas::new(
        BufWriter::new(stdout()),
        cols,
        rows,
        config.world_width,
        config.world_height,
    );

    terminal::enable_raw_mode()?;
    let result = play(&mut canvas, &config, &mut store);

    // Always restore the terminal, whichever step above failed
    let _ = leave_screen(canvas.writer_mut());
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!(error = %e, "game loop failed");
    }
    let closed = store.close();
    result?;
    closed?;
    info!("exiting");
    Ok(())
}
