//! Status bar widget - shows player, round, score, and audio stats

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::View;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, view: &View, stats: &AudioStats) {
    let block = Block::default().title(" earshot ").borders(Borders::ALL);
    let snapshot = &view.snapshot;

    let round = if snapshot.round == 0 {
        "-".to_string()
    } else {
        format!("{}/{}", snapshot.round, snapshot.total_rounds)
    };

    let (audio_label, audio_color) = match (view.muted, view.audio) {
        (true, _) => ("muted", Color::DarkGray),
        (false, true) => ("audio on", Color::Green),
        (false, false) => ("audio off", Color::Yellow),
    };

    let mut spans = vec![
        Span::styled(format!(" {}  ", view.player), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{}  ", view.profile.label()),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{}  ", snapshot.phase.label()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(format!("Round {round}  ")),
        Span::styled(
            format!("Score {}  ", snapshot.score),
            Style::default().fg(Color::Green),
        ),
        Span::styled(format!("{audio_label}  "), Style::default().fg(audio_color)),
    ];
    if view.device {
        spans.push(Span::styled("device  ", Style::default().fg(Color::Blue)));
    }
    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
        Style::default().fg(Color::Magenta),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
