//! Wall-clock sources for the guide engine.
//!
//! A clock caches the current instant on a fixed timezone and refreshes it
//! only when its repeating timer fires. The timer is cooperative: the owner
//! calls [`Clock::poll_tick`] from its event loop and the clock reports
//! whether a tick was due. Nothing fires while the clock is stopped.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub(crate) const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);

pub(crate) trait Clock {
    /// Instant captured at the last tick (or at start).
    fn now(&self) -> DateTime<Tz>;

    /// Schedules the repeating timer. Restarting reschedules it.
    fn start(&mut self, interval: Duration);

    /// Cancels the timer. Safe to call repeatedly or before `start`.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Fires the timer if it is due, returning the refreshed instant.
    fn poll_tick(&mut self) -> Option<DateTime<Tz>>;
}

// Instants handed out never go backwards, even if the host clock does.
fn monotonic(cached: DateTime<Tz>, fresh: DateTime<Tz>) -> DateTime<Tz> {
    if fresh < cached { cached } else { fresh }
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    interval: Duration,
    deadline: Instant,
}

/// Host wall clock converted to a configured zone.
#[derive(Debug)]
pub(crate) struct SystemClock {
    tz: Tz,
    cached: DateTime<Tz>,
    timer: Option<Timer>,
}

impl SystemClock {
    pub(crate) fn new(tz: Tz) -> Self {
        Self {
            tz,
            cached: Utc::now().with_timezone(&tz),
            timer: None,
        }
    }

    fn refresh(&mut self) -> DateTime<Tz> {
        self.cached = monotonic(self.cached, Utc::now().with_timezone(&self.tz));
        self.cached
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        self.cached
    }

    fn start(&mut self, interval: Duration) {
        self.refresh();
        self.timer = Some(Timer {
            interval,
            deadline: Instant::now() + interval,
        });
    }

    fn stop(&mut self) {
        self.timer = None;
    }

    fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    fn poll_tick(&mut self) -> Option<DateTime<Tz>> {
        let timer = self.timer.as_mut()?;
        let now = Instant::now();
        if now < timer.deadline {
            return None;
        }
        // Missed deadlines collapse into one tick.
        timer.deadline = now + timer.interval;
        Some(self.refresh())
    }
}

#[cfg(test)]
pub(crate) use manual::ManualClock;


#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Australia::Sydney;

    use super::*;

    fn evening() -> DateTime<Tz> {
        Sydney.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap()
    }

    #[test]
    fn stopping_is_idempotent_and_safe_before_start() {
        let mut clock = SystemClock::new(Sydney);
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());

        clock.start(DEFAULT_TICK_INTERVAL);
        assert!(clock.is_running());
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.poll_tick(), None);
    }

    #[test]
    fn system_clock_reports_the_configured_zone() {
        let clock = SystemClock::new(Sydney);
        assert_eq!(clock.now().timezone(), Sydney);
    }

    #[test]
    fn system_clock_ticks_once_the_interval_elapses() {
        let mut clock = SystemClock::new(Sydney);
        clock.start(Duration::from_millis(5));
        let first = clock.now();

        std::thread::sleep(Duration::from_millis(10));
        let ticked = clock.poll_tick().expect("tick should be due");
        assert!(ticked >= first);
        assert_eq!(clock.now(), ticked);
        assert_eq!(clock.poll_tick(), None, "next deadline is in the future");
    }

    #[test]
    fn manual_clock_caches_the_instant_between_ticks() {
        let handle = ManualClock::new(evening());
        let mut clock = handle.clone();
        clock.start(DEFAULT_TICK_INTERVAL);

        handle.advance(Duration::from_secs(30));
        assert_eq!(clock.poll_tick(), None);
        assert_eq!(clock.now(), evening());

        handle.advance(Duration::from_secs(30));
        let ticked = clock.poll_tick().expect("a full interval elapsed");
        assert_eq!(ticked, evening() + chrono::Duration::minutes(1));
        assert_eq!(clock.now(), ticked);
    }

    #[test]
    fn manual_clock_never_fires_while_stopped() {
        let handle = ManualClock::new(evening());
        let mut clock = handle.clone();

        handle.advance(Duration::from_secs(600));
        assert_eq!(clock.poll_tick(), None);

        clock.start(DEFAULT_TICK_INTERVAL);
        clock.stop();
        handle.advance(Duration::from_secs(600));
        assert_eq!(clock.poll_tick(), None);
        assert_eq!(clock.now(), evening() + chrono::Duration::minutes(10));
    }

    #[test]
    fn ticks_never_move_backwards() {
        let handle = ManualClock::new(evening());
        let mut clock = handle.clone();
        clock.start(DEFAULT_TICK_INTERVAL);

        handle.advance(Duration::from_secs(120));
        let forward = clock.poll_tick().expect("tick");

        handle.set(evening() - chrono::Duration::hours(1));
        assert_eq!(clock.poll_tick(), None);
        assert_eq!(clock.now(), forward);

        handle.set(evening() + chrono::Duration::hours(2));
        let later = clock.poll_tick().expect("tick");
        assert!(later > forward);
    }
}
