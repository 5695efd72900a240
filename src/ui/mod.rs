use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use request_status::notification::{CurrentMessage, Entry, Phase};

use crate::app::App;

pub fn render(app: &App, frame: &mut Frame) {
    let rows = Layout::default()
        .margin(0)
        .constraints([Constraint::Length(1), Constraint::Min(4)].as_ref())
        .split(frame.area());

    frame.render_widget(status_widget(app), rows[0]);
    frame.render_widget(entries_widget(app.notifier.store().entries()), rows[1]);
}

fn status_widget(app: &App) -> Paragraph<'static> {
    let current = app.notifier.current();
    Paragraph::new(vec![Line::from(vec![
        Span::styled(
            match app.loading.is_loading() {
                true => " loading ".to_string(),
                false => " ready ".to_string(),
            },
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Black)
                .bg(match app.loading.is_loading() {
                    true => Color::Yellow,
                    false => Color::Green,
                }),
        ),
        message_span(&current),
    ])])
}

fn message_span(current: &CurrentMessage) -> Span<'static> {
    let text = match &current.text {
        Some(text) => format!(" {} ", text),
        None => "".to_string(),
    };
    Span::styled(text, phase_style(current.phase))
}

fn phase_style(phase: Option<Phase>) -> Style {
    match phase {
        Some(Phase::Fail) => Style::default().fg(Color::White).bg(Color::Red),
        Some(Phase::Success) => Style::default().fg(Color::Black).bg(Color::Green),
        Some(Phase::Start) => Style::default().fg(Color::White).bg(Color::Blue),
        None => Style::default(),
    }
}

fn entries_widget(entries: &[Entry]) -> Paragraph<'static> {
    let lines: Vec<Line> = entries
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::raw(format!("{:>5} ", entry.operation.to_string())),
                Span::styled(format!("{:<8}", entry.phase), phase_style(Some(entry.phase))),
                Span::raw(format!(" {:>6} ", entry.severity)).bold(),
                Span::raw(entry.text.clone().unwrap_or_default()),
            ])
        })
        .collect();

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::all())
            .title(format!("active notifications ({})", entries.len())),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_span() {
        let span = message_span(&CurrentMessage {
            severity: Some(1001),
            text: Some("could not save".to_string()),
            phase: Some(Phase::Fail),
        });
        assert_eq!(" could not save ", span.content);
        assert_eq!(Some(Color::Red), span.style.bg);

        let span = message_span(&CurrentMessage::none());
        assert_eq!("", span.content);
    }
}
