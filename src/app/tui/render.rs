use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::guide::{GuideEntry, Service, Status};

use super::super::format::{describe_row, episode_label, status_label, truncate};

pub(super) struct HeaderInfo<'a> {
    pub(super) date: &'a str,
    pub(super) clock: &'a str,
    pub(super) viewer: Option<&'a str>,
    pub(super) filtering: bool,
    pub(super) loading: bool,
}

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);

pub(super) fn row_style(status: Status) -> Style {
    match status {
        Status::Airing => Style::default()
            .fg(Color::Rgb(150, 235, 160))
            .add_modifier(Modifier::BOLD),
        Status::Finished => Style::default()
            .fg(Color::Rgb(105, 112, 125))
            .add_modifier(Modifier::DIM),
        Status::Unclassified => Style::default().fg(Color::Rgb(230, 230, 230)),
    }
}

pub(super) fn draw_tui(
    frame: &mut Frame,
    entries: &[GuideEntry],
    table_state: &mut TableState,
    service: Service,
    header: &HeaderInfo<'_>,
    status: &str,
) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let airing = entries
        .iter()
        .filter(|entry| entry.status == Status::Airing)
        .count();
    let scope = match (header.viewer, header.filtering) {
        (Some(viewer), true) => format!("{viewer}'s shows"),
        _ => "all shows".to_string(),
    };
    let mut header_spans = vec![
        Span::styled("TV GUIDE", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(header.date.to_string(), Style::default().fg(MUTED)),
        Span::raw("   "),
        Span::styled(header.clock.to_string(), Style::default().fg(Color::Yellow)),
        Span::raw("   "),
        Span::styled(
            format!("{} programmes, {airing} airing", entries.len()),
            Style::default().fg(MUTED),
        ),
        Span::raw("   "),
        Span::styled(scope, Style::default().fg(MUTED)),
    ];
    if header.loading {
        header_spans.push(Span::raw("   "));
        header_spans.push(Span::styled("loading...", Style::default().fg(Color::Yellow)));
    }
    let header_widget = Paragraph::new(Line::from(header_spans))
        .alignment(Alignment::Center)
        .block(panel_block("Guide"));
    frame.render_widget(header_widget, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let row = &entry.row;
            Row::new(vec![
                Cell::from(row.start_time.clone()),
                Cell::from(row.end_time.clone()),
                Cell::from(row.title.clone()),
                Cell::from(row.channel.clone()),
                Cell::from(episode_label(row)),
                Cell::from(if row.repeat { "Repeat" } else { "" }),
                Cell::from(status_label(entry.status)),
            ])
            .style(row_style(entry.status))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(9),
        ],
    )
    .header(
        Row::new(vec![
            "Start", "End", "Show", "Channel", "Episode", "Repeat", "Status",
        ])
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(panel_block(service.label()))
    .row_highlight_style(
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, body_chunks[0], table_state);

    let selection_text = match table_state.selected().and_then(|idx| entries.get(idx)) {
        Some(entry) => {
            let row = &entry.row;
            let mut text = format!(
                "{}\n\nChannel\n{}\n\nTime\n{} - {}\n\nEpisode\n{}",
                describe_row(row),
                truncate(&row.channel, 28),
                row.start_time,
                row.end_time,
                episode_label(row),
            );
            if !row.episode_title.is_empty() {
                text.push_str(&format!("\n{}", truncate(&row.episode_title, 40)));
            }
            let live = status_label(entry.status);
            if !live.is_empty() {
                text.push_str(&format!("\n\nStatus\n{live}"));
            }
            text
        }
        None if header.loading => "Fetching today's guide...".to_string(),
        None => "No episodes for this day.\n\nPress r to reload, f to toggle your subscriptions."
            .to_string(),
    };
    let selection = Paragraph::new(selection_text)
        .style(Style::default().fg(Color::Rgb(230, 230, 230)))
        .wrap(Wrap { trim: true })
        .block(panel_block("Selected"));
    frame.render_widget(selection, body_chunks[1]);

    let command_bar = Paragraph::new(service_selector_line(service))
        .alignment(Alignment::Center)
        .block(panel_block("Controls"));
    frame.render_widget(command_bar, chunks[2]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[3]);
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn pill_style(service: Service, current: Service) -> Style {
    if service == current {
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(Color::Rgb(72, 82, 96))
            .fg(Color::Rgb(230, 235, 242))
    }
}

fn service_selector_line(current: Service) -> Line<'static> {
    let mut spans = Vec::new();
    for service in Service::ALL {
        spans.push(Span::styled(
            format!(" {} ", service.label()),
            pill_style(service, current),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        "  ←/→ service  ↑/↓ move  f subscriptions  r reload  q quit",
        Style::default().fg(MUTED),
    ));
    Line::from(spans)
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}
