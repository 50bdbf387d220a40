//! Pyra Flap entry point
//!
//! Owns the terminal, the frame loop, and the glue between simulation
//! events and the ambient systems (audio, persistence, logging).

use std::io::{self, stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute, terminal,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use pyra_flap::audio::{AudioManager, SoundEffect};
use pyra_flap::consts::*;
use pyra_flap::renderer::TermRenderer;
use pyra_flap::sim::{GameEvent, GameState, TickInput, tick};
use pyra_flap::{FileStore, HighScore};

/// Game instance holding all state; constructed once at startup and
/// handed to the loop. No globals.
struct Game {
    state: GameState,
    renderer: TermRenderer,
    audio: AudioManager,
    store: FileStore,
    high_score: HighScore,
    rng: Pcg32,
    input: TickInput,
    accumulator: f32,
    last_frame: Instant,
}

impl Game {
    fn new(cols: u16, rows: u16) -> Self {
        let store = FileStore::open_default();
        let high_score = HighScore::load(&store);
        log::info!("loaded high score: {}", high_score.best());

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0xF1A9);
        log::info!("run seed: {seed}");

        Self {
            state: GameState::new(high_score.best()),
            renderer: TermRenderer::new(cols, rows),
            audio: AudioManager::new(),
            store,
            high_score,
            rng: Pcg32::seed_from_u64(seed),
            input: TickInput::default(),
            accumulator: 0.0,
            last_frame: Instant::now(),
        }
    }

    /// Run however many fixed ticks the elapsed wall time calls for
    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, &mut self.rng);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs apply to exactly one tick
            self.input.activate = false;

            self.handle_events();
        }
    }

    /// React to what the tick reported: sounds, persistence, logging
    fn handle_events(&mut self) {
        for event in self.state.events.drain(..) {
            match event {
                GameEvent::Flapped => self.audio.play(SoundEffect::Flap),
                GameEvent::Scored(score) => {
                    log::debug!("score: {score}");
                    self.audio.play(SoundEffect::Score);
                }
                GameEvent::NewHighScore(score) => {
                    if self.high_score.record(score, &mut self.store) {
                        log::info!("new high score: {score}");
                    }
                    self.audio.play(SoundEffect::HighScore);
                }
                GameEvent::Crashed => self.audio.play(SoundEffect::Hit),
            }
        }
    }

    fn render(&mut self, out: &mut io::Stdout) -> io::Result<()> {
        self.renderer.render(&self.state, out)
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("pyra-flap starting");

    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let mut game = Game::new(cols, rows);
    let frame_dur = Duration::from_secs_f32(SIM_DT);

    loop {
        let frame_start = Instant::now();

        // Fold pending terminal events into the next tick's input, so a
        // click landing mid-frame applies atomically at a tick boundary
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        cleanup(&mut out)?;
                        return Ok(());
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        cleanup(&mut out)?;
                        return Ok(());
                    }
                    KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                        game.input.activate = true;
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if matches!(mouse.kind, MouseEventKind::Down(_)) {
                        game.input.activate = true;
                    }
                }
                Event::Resize(c, r) => game.renderer.resize(c, r),
                _ => {}
            }
        }

        game.update();
        // A bad frame is dropped, not fatal
        if let Err(e) = game.render(&mut out) {
            log::warn!("render error: {e}");
        }

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
