//! Piano keys for C through B.
//!
//! Keys outside the current profile are drawn dim. While a guess is
//! expected the usable keys are lit; after a guess the target (and a wrong
//! guess) are colored.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use earshot::{Phase, Pitch};

use super::View;

fn key_style(view: &View, pitch: Pitch) -> Style {
    let snapshot = &view.snapshot;
    if !view.profile.is_usable(pitch) {
        return Style::default().fg(Color::DarkGray);
    }

    if let Some(outcome) = snapshot.feedback {
        if pitch == outcome.target {
            return Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD);
        }
        if pitch == outcome.guessed {
            return Style::default().fg(Color::Black).bg(Color::Red);
        }
    }

    if snapshot.keys_enabled {
        Style::default().fg(Color::Black).bg(Color::White)
    } else if snapshot.phase == Phase::Priming {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn render_keyboard(frame: &mut Frame, area: Rect, view: &View) {
    let keys = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, Pitch::ALL.len() as u32); 7])
        .split(area);

    for (pitch, &cell) in Pitch::ALL.iter().zip(keys.iter()) {
        let style = key_style(view, *pitch);
        let label = vec![
            Line::from(""),
            Line::from(pitch.name()).centered(),
            Line::from(format!("{}", pitch.index() + 1)).centered(),
        ];
        let key = Paragraph::new(label)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(key, cell);
    }
}
