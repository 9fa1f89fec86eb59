//! High-score table

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Row, Table},
    Frame,
};

use earshot::scores::ScoreRecord;

pub fn render_scores(frame: &mut Frame, area: Rect, records: &[ScoreRecord]) {
    let header = Row::new(["#", "Player", "Level", "Score", "%", "When"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = records.iter().enumerate().map(|(rank, r)| {
        Row::new(vec![
            format!("{}", rank + 1),
            r.player.clone(),
            r.difficulty.label().to_string(),
            format!("{}/{}", r.score, r.total_rounds),
            format!("{}%", r.percentage),
            r.recorded_at.format("%Y-%m-%d").to_string(),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .style(Style::default().fg(Color::White))
    .block(Block::default().title(" High scores ").borders(Borders::ALL));

    frame.render_widget(table, area);
}
