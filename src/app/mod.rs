mod format;
mod tui;


use anyhow::{Context, Result, bail};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::Database;
use crate::guide::{GuideEngine, GuideEntry, Schedule, Service, Subscriber, SystemClock};
use crate::http::RetryPolicy;
use crate::paths::database_file_path;
use crate::source::{GuideLocation, load_schedule};

use self::format::{episode_label, format_added_at, format_instant, status_label, truncate};

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::from_args(&cli.global).context("invalid configuration")?;
    let db = open_db()?;

    match cli.command {
        Some(Command::List { service }) => run_list(&config, &db, service.into())?,
        Some(Command::Subscribe { title }) => run_subscribe(&config, &db, &title)?,
        Some(Command::Unsubscribe { title }) => run_unsubscribe(&config, &db, &title)?,
        Some(Command::Subscriptions) => run_subscriptions(&config, &db)?,
        Some(Command::Tui) | None => tui::run_tui(&config, &db)?,
    }

    Ok(())
}

fn open_db() -> Result<Database> {
    let db_path = database_file_path()?;
    let db = Database::open(&db_path)?;
    db.migrate()?;
    Ok(db)
}

fn require_viewer(config: &Config) -> Result<&str> {
    match config.viewer.as_deref() {
        Some(viewer) => Ok(viewer),
        None => bail!("no viewer selected. Pass --viewer or set TVGUIDE_VIEWER."),
    }
}

fn require_location(config: &Config) -> Result<&GuideLocation> {
    match config.location.as_ref() {
        Some(location) => Ok(location),
        None => bail!("no guide source configured. Pass --guide-url or --guide-file."),
    }
}

pub(crate) fn resolve_subscriber(
    config: &Config,
    db: &Database,
    filtering: bool,
) -> Result<Option<Subscriber>> {
    match (filtering, config.viewer.as_deref()) {
        (true, Some(viewer)) => Ok(Some(db.subscriber(viewer)?)),
        _ => Ok(None),
    }
}

fn run_list(config: &Config, db: &Database, service: Service) -> Result<()> {
    let location = require_location(config)?;
    let schedule = load_schedule(location, &RetryPolicy::default())
        .with_context(|| format!("failed to load guide from {location}"))?;
    let subscriber = resolve_subscriber(config, db, config.filter_by_subscriptions)?;

    let mut engine = GuideEngine::new(SystemClock::new(config.timezone), config.tick_interval);
    engine.start()?;
    engine.compute(Some(&schedule), service, subscriber.as_ref())?;

    println!(
        "{} | {} | {}",
        service.label(),
        schedule_date(&schedule, &format_instant(&engine.instant())),
        match &subscriber {
            Some(sub) => format!("{}'s shows", sub.viewer),
            None => "all shows".to_string(),
        }
    );
    let entries = engine.entries();
    if entries.is_empty() {
        println!("No episodes for this day.");
        return Ok(());
    }
    for line in list_lines(entries) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn schedule_date(schedule: &Schedule, fallback: &str) -> String {
    schedule
        .date
        .clone()
        .unwrap_or_else(|| fallback.to_string())
}

pub(crate) fn list_lines(entries: &[GuideEntry]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<6} {:<6} {:<30} {:<12} {:<10} {:<30} {:<7} {:<8}",
        "START", "END", "SHOW", "CHANNEL", "EPISODE", "EPISODE TITLE", "REPEAT", "STATUS"
    )
    .trim_end()
    .to_string()];
    for entry in entries {
        let row = &entry.row;
        lines.push(
            format!(
                "{:<6} {:<6} {:<30} {:<12} {:<10} {:<30} {:<7} {:<8}",
                row.start_time,
                row.end_time,
                truncate(&row.title, 30),
                truncate(&row.channel, 12),
                episode_label(row),
                truncate(&row.episode_title, 30),
                if row.repeat { "yes" } else { "" },
                status_label(entry.status),
            )
            .trim_end()
            .to_string(),
        );
    }
    lines
}

fn run_subscribe(config: &Config, db: &Database, title: &str) -> Result<()> {
    let viewer = require_viewer(config)?;
    let title = title.trim();
    if title.is_empty() {
        bail!("show title must not be empty");
    }
    if db.subscribe(viewer, title)? {
        println!("{viewer} now follows \"{title}\".");
    } else {
        println!("{viewer} already follows \"{title}\".");
    }
    Ok(())
}

fn run_unsubscribe(config: &Config, db: &Database, title: &str) -> Result<()> {
    let viewer = require_viewer(config)?;
    if db.unsubscribe(viewer, title.trim())? {
        println!("{viewer} no longer follows \"{}\".", title.trim());
    } else {
        println!("{viewer} was not following \"{}\".", title.trim());
    }
    Ok(())
}

fn run_subscriptions(config: &Config, db: &Database) -> Result<()> {
    let viewer = require_viewer(config)?;
    let items = db.list_subscriptions(viewer)?;
    if items.is_empty() {
        println!("{viewer} has no subscriptions yet. Run `tvguide subscribe <TITLE>`.");
        return Ok(());
    }

    println!("{:<40} {:<28}", "TITLE", "ADDED");
    for item in items {
        println!(
            "{:<40} {:<28}",
            truncate(&item.title, 40),
            format_added_at(&item.added_at, config.timezone)
        );
    }
    Ok(())
}
