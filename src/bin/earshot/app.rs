//! earshot - event loop tying the terminal, the game and its inputs

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossbeam_channel::Receiver;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, RingBuffer};
use tracing::{info, warn};

use earshot::{
    game::{Scoreboard, SessionSummary},
    input::{self, device, DeviceSignal},
    scores::{HighScores, JsonFileStore, ScoreRecord},
    AudioOutput, Difficulty, Game, Phase, Pitch,
};

use super::audio::CpalBackend;
use super::ui::{self, View};

/// Samples kept for the scope
const SCOPE_SIZE: usize = 1024;
const SCOPE_QUEUE: usize = 8192;
const FRAME: Duration = Duration::from_millis(16);

pub struct AppConfig {
    pub player: String,
    pub difficulty: Difficulty,
    pub device: Option<PathBuf>,
    pub seed: Option<u64>,
    pub mute: bool,
}

pub struct App {
    config: AppConfig,
    game: Game,
    epoch: Instant,
    high_scores: Rc<RefCell<HighScores<JsonFileStore>>>,
    records: Vec<ScoreRecord>,
    device_rx: Option<Receiver<DeviceSignal>>,
    scope_rx: Option<Consumer<f32>>,
    scope: Vec<f32>,
    last_phase: Phase,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, store: JsonFileStore) -> EyreResult<Self> {
        let high_scores = Rc::new(RefCell::new(HighScores::new(store)));
        let records = high_scores.borrow().records()?;

        let (output, scope_rx) = if config.mute {
            (AudioOutput::disabled(), None)
        } else {
            let (tx, rx) = RingBuffer::<f32>::new(SCOPE_QUEUE);
            (AudioOutput::new(CpalBackend::new(tx)), Some(rx))
        };

        let device_rx = config.device.as_deref().and_then(|path| {
            match device::open(path).and_then(device::spawn_reader) {
                Ok((rx, _handle)) => {
                    info!(path = %path.display(), "button device attached");
                    Some(rx)
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "button device unavailable");
                    None
                }
            }
        });

        let game = build_game(&config, &high_scores, output);
        Ok(Self {
            config,
            game,
            epoch: Instant::now(),
            high_scores,
            records,
            device_rx,
            scope_rx,
            scope: vec![0.0; SCOPE_SIZE],
            last_phase: Phase::Idle,
            should_quit: false,
        })
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_device();
            self.game.tick(self.epoch.elapsed());
            self.poll_scope();
            self.refresh_records();

            terminal.draw(|frame| ui::render(frame, &self.view()))?;

            if event::poll(FRAME)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.game.exit();
        Ok(())
    }

    fn poll_device(&mut self) {
        let Some(rx) = &self.device_rx else {
            return;
        };
        let signals: Vec<DeviceSignal> = rx.try_iter().collect();
        for signal in signals {
            input::device_signal(&mut self.game, signal);
        }
    }

    fn poll_scope(&mut self) {
        let Some(rx) = self.scope_rx.as_mut() else {
            return;
        };
        while let Ok(sample) = rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > SCOPE_SIZE {
            let excess = self.scope.len() - SCOPE_SIZE;
            self.scope.drain(0..excess);
        }
    }

    /// Reload the table whenever a game has just ended.
    fn refresh_records(&mut self) {
        let phase = self.game.phase();
        if phase == Phase::Ended && self.last_phase != Phase::Ended {
            match self.high_scores.borrow().records() {
                Ok(records) => self.records = records,
                Err(err) => warn!(%err, "failed to reload high scores"),
            }
        }
        self.last_phase = phase;
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.game.phase() {
            Phase::Idle | Phase::Ended => match code {
                KeyCode::Enter => self.start_game(),
                KeyCode::Tab => self.cycle_difficulty(),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            _ => match code {
                KeyCode::Char('n') => {
                    self.game.replay_note();
                }
                KeyCode::Char('p') => {
                    self.game.replay_passage();
                }
                KeyCode::Esc => self.game.exit(),
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    self.game.exit();
                    self.should_quit = true;
                }
                KeyCode::Char(c) => {
                    if let Some(pitch) = pitch_for_key(c) {
                        input::key_press(&mut self.game, pitch);
                    }
                }
                _ => {}
            },
        }
    }

    fn start_game(&mut self) {
        if self.game.phase() != Phase::Idle {
            self.rebuild();
        }
        self.game.start();
    }

    fn cycle_difficulty(&mut self) {
        let current = Difficulty::ALL
            .iter()
            .position(|d| *d == self.config.difficulty)
            .unwrap_or(0);
        self.config.difficulty = Difficulty::ALL[(current + 1) % Difficulty::ALL.len()];
        self.rebuild();
    }

    /// Fresh game on the same (possibly already open) output.
    fn rebuild(&mut self) {
        let placeholder = Game::new("", self.config.difficulty.profile(), AudioOutput::disabled());
        let previous = std::mem::replace(&mut self.game, placeholder);
        self.game = build_game(&self.config, &self.high_scores, previous.into_output());
        self.epoch = Instant::now();
        self.last_phase = Phase::Idle;
    }

    fn view(&self) -> View<'_> {
        View {
            snapshot: self.game.snapshot(),
            player: &self.config.player,
            profile: *self.game.profile(),
            finalized: self.game.is_finalized(),
            audio: self.game.audio_initialized(),
            muted: self.config.mute,
            device: self.device_rx.is_some(),
            scope: &self.scope,
            records: &self.records,
        }
    }
}

fn build_game(
    config: &AppConfig,
    high_scores: &Rc<RefCell<HighScores<JsonFileStore>>>,
    output: AudioOutput,
) -> Game {
    let table = Rc::clone(high_scores);
    let game = Game::new(config.player.clone(), config.difficulty.profile(), output)
        .with_scoreboard(move |summary: &SessionSummary| {
            table.borrow_mut().finalize_session(summary);
        });
    match config.seed {
        Some(seed) => game.with_seed(seed),
        None => game,
    }
}

/// Letter names or 1-7 in scale order.
fn pitch_for_key(c: char) -> Option<Pitch> {
    if let Some(digit) = c.to_digit(10) {
        return (1..=7)
            .contains(&digit)
            .then(|| Pitch::ALL[digit as usize - 1]);
    }
    Pitch::from_letter(c)
}
