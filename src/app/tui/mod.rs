mod actions;
mod render;
mod session;

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::guide::{GuideEngine, Schedule, Service, SystemClock};

use super::format::format_instant;
use super::{resolve_subscriber, schedule_date};

use self::actions::{
    FetchResult, apply_fetch_result, drain_fetch_results, recompute_view, spawn_guide_fetch,
    status_error, status_info,
};
use self::render::{HeaderInfo, draw_tui};
use self::session::TuiSession;

const EVENT_POLL: Duration = Duration::from_millis(200);

pub(crate) fn run_tui(config: &Config, db: &Database) -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut engine = GuideEngine::new(SystemClock::new(config.timezone), config.tick_interval);
    engine.start()?;

    let mut service = Service::default();
    let mut filtering = config.filter_by_subscriptions;
    let mut subscriber = resolve_subscriber(config, db, filtering)?;
    let mut schedule = None::<Schedule>;
    let mut table_state = TableState::default();
    let (fetch_tx, fetch_rx) = mpsc::channel::<FetchResult>();
    let mut loading = false;

    let mut status = match config.location.as_ref() {
        Some(location) => {
            spawn_guide_fetch(location, &fetch_tx);
            loading = true;
            status_info(&format!("Fetching guide from {location}..."))
        }
        None => status_error("No guide source configured. Pass --guide-url or --guide-file."),
    };
    recompute_view(
        &mut engine,
        schedule.as_ref(),
        service,
        subscriber.as_ref(),
        &mut table_state,
    )?;

    loop {
        if let Some(result) = drain_fetch_results(&fetch_rx) {
            loading = false;
            status = apply_fetch_result(&mut schedule, result);
            recompute_view(
                &mut engine,
                schedule.as_ref(),
                service,
                subscriber.as_ref(),
                &mut table_state,
            )?;
        }
        engine.tick();

        let clock_text = format_instant(&engine.instant());
        let date_text = schedule
            .as_ref()
            .map(|s| schedule_date(s, "today"))
            .unwrap_or_else(|| "today".to_string());
        let header = HeaderInfo {
            date: &date_text,
            clock: &clock_text,
            viewer: config.viewer.as_deref(),
            filtering,
            loading,
        };
        terminal.draw(|frame| {
            draw_tui(
                frame,
                engine.entries(),
                &mut table_state,
                service,
                &header,
                &status,
            )
        })?;

        if !event::poll(EVENT_POLL)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let next_service = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Left => Some(service.move_left()),
            KeyCode::Right => Some(service.move_right()),
            KeyCode::Char('1') => Some(Service::Fta),
            KeyCode::Char('2') => Some(Service::Bbc),
            KeyCode::Char('3') => Some(Service::All),
            KeyCode::Char('f') => {
                if config.viewer.is_none() {
                    status = status_error("No viewer selected. Pass --viewer to filter.");
                    continue;
                }
                filtering = !filtering;
                subscriber = resolve_subscriber(config, db, filtering)?;
                status = if filtering {
                    status_info("Showing subscribed shows only.")
                } else {
                    status_info("Showing every programme.")
                };
                Some(service)
            }
            KeyCode::Char('r') => {
                match config.location.as_ref() {
                    Some(_) if loading => status = status_info("Already fetching the guide."),
                    Some(location) => {
                        spawn_guide_fetch(location, &fetch_tx);
                        loading = true;
                        status = status_info("Reloading guide...");
                    }
                    None => status = status_error("No guide source configured."),
                }
                None
            }
            KeyCode::Up => {
                if let Some(selected) = table_state.selected() {
                    table_state.select(Some(selected.saturating_sub(1)));
                }
                None
            }
            KeyCode::Down => {
                let len = engine.entries().len();
                if let Some(selected) = table_state.selected()
                    && len > 0
                {
                    table_state.select(Some((selected + 1).min(len - 1)));
                }
                None
            }
            _ => None,
        };

        if let Some(next) = next_service {
            service = next;
            recompute_view(
                &mut engine,
                schedule.as_ref(),
                service,
                subscriber.as_ref(),
                &mut table_state,
            )?;
        }
    }

    engine.teardown();
    info!("guide closed");
    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}
