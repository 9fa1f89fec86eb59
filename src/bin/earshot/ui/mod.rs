//! TUI module for earshot
//!
//! Three screens share one layout: a status bar on top, a help bar at the
//! bottom, and in between either the ready screen, the keyboard with its
//! scope, or the final score next to the high-score table.

mod keyboard;
mod scores;
mod status;
mod waveform;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use earshot::{scores::ScoreRecord, Phase, Profile, Snapshot};

use keyboard::render_keyboard;
use scores::render_scores;
use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Everything one frame needs.
pub struct View<'a> {
    pub snapshot: Snapshot,
    pub player: &'a str,
    pub profile: Profile,
    pub finalized: bool,
    pub audio: bool,
    pub muted: bool,
    pub device: bool,
    pub scope: &'a [f32],
    pub records: &'a [ScoreRecord],
}

pub fn render(frame: &mut Frame, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status bar
            Constraint::Min(8),    // Screen body
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    let stats = AudioStats::from_buffer(view.scope);
    render_status(frame, chunks[0], view, &stats);

    match view.snapshot.phase {
        Phase::Idle => render_ready(frame, chunks[1], view),
        Phase::Ended => render_final(frame, chunks[1], view),
        _ => render_game(frame, chunks[1], view),
    }

    let help = match view.snapshot.phase {
        Phase::Idle => " [Enter] Start  [Tab] Difficulty  [Q] Quit",
        Phase::Ended => " [Enter] Play again  [Tab] Difficulty  [Q] Quit",
        _ => " [C-B / 1-7] Guess  [N] Replay note  [P] Replay passage  [Esc] End game  [Q] Quit",
    };
    let help = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn render_ready(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default().title(" Ready ").borders(Borders::ALL);
    let notes: Vec<&str> = view.profile.usable().iter().map(|p| p.name()).collect();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Hello, {}", view.player),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "Difficulty: {}  ({} rounds, {} passage)",
            view.profile.label(),
            view.profile.total_rounds,
            view.profile.passage.name()
        )),
        Line::from(format!("Notes in play: {}", notes.join(" "))),
        Line::from(""),
        Line::from(Span::styled(
            "Listen to the passage, then name the note that follows.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(body, area);
}

fn render_game(frame: &mut Frame, area: Rect, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Prompt
            Constraint::Min(5),    // Keyboard
            Constraint::Length(8), // Scope
        ])
        .split(area);

    let snapshot = &view.snapshot;
    let prompt = match (snapshot.phase, snapshot.feedback) {
        (Phase::Priming, _) => Span::styled("Listen...", Style::default().fg(Color::Cyan)),
        (Phase::AwaitingGuess, _) => {
            Span::styled("Which note was that?", Style::default().fg(Color::Yellow))
        }
        (Phase::Feedback, Some(outcome)) if outcome.correct => Span::styled(
            format!("Correct! It was {}.", outcome.target),
            Style::default().fg(Color::Green),
        ),
        (Phase::Feedback, Some(outcome)) => Span::styled(
            format!("You said {}, it was {}.", outcome.guessed, outcome.target),
            Style::default().fg(Color::Red),
        ),
        _ => Span::styled("Next round...", Style::default().fg(Color::DarkGray)),
    };
    let prompt = Paragraph::new(Line::from(prompt))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(prompt, chunks[0]);

    render_keyboard(frame, chunks[1], view);
    render_waveform(frame, chunks[2], view.scope);
}

fn render_final(frame: &mut Frame, area: Rect, view: &View) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let snapshot = &view.snapshot;
    let headline = if view.finalized {
        format!("Final score: {} / {}", snapshot.score, snapshot.total_rounds)
    } else {
        format!(
            "Game ended in round {} with {} points (not recorded)",
            snapshot.round, snapshot.score
        )
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(format!("{}, {}", view.player, view.profile.label())),
    ];
    let summary = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title(" Game over ").borders(Borders::ALL));
    frame.render_widget(summary, chunks[0]);

    render_scores(frame, chunks[1], view.records);
}
