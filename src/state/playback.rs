use crate::state::filters::FilterManager;
use crate::state::messages::UiEvent;
use log::debug;
use olympics_api::YearSelection;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl PlaybackSpeed {
    pub fn period(&self) -> Duration {
        match self {
            PlaybackSpeed::Slow => Duration::from_millis(4000),
            PlaybackSpeed::Normal => Duration::from_millis(2000),
            PlaybackSpeed::Fast => Duration::from_millis(1000),
        }
    }

    pub fn next(self) -> Self {
        match self {
            PlaybackSpeed::Slow => PlaybackSpeed::Normal,
            PlaybackSpeed::Normal => PlaybackSpeed::Fast,
            PlaybackSpeed::Fast => PlaybackSpeed::Slow,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick from a timer that has since been stopped or replaced.
    Ignored,
    /// A load is in flight; the year stays put until a later tick.
    Stalled,
    Advanced(u16),
    /// End of the year list (or all-years mode); playback stopped.
    Finished,
}

/// Steps the year filter through the valid year list on a fixed period.
///
/// The timer runs as its own task and posts [`UiEvent::PlaybackTick`] to the
/// main loop. Every start or stop bumps the generation so ticks still queued
/// from an older timer are dropped.
pub struct PlaybackScheduler {
    state: PlaybackState,
    speed: PlaybackSpeed,
    generation: u64,
    ticks: mpsc::Sender<UiEvent>,
    timer: Option<JoinHandle<()>>,
}

impl PlaybackScheduler {
    pub fn new(ticks: mpsc::Sender<UiEvent>, speed: PlaybackSpeed) -> Self {
        Self {
            state: PlaybackState::Stopped,
            speed,
            generation: 0,
            ticks,
            timer: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Start playing from `year`. Refused in all-years mode, while a load is
    /// in flight, or when already playing.
    pub fn play(&mut self, year: YearSelection, loading: bool) -> bool {
        if year.is_all_years() || loading || self.is_playing() {
            return false;
        }
        self.state = PlaybackState::Playing;
        self.restart_timer();
        true
    }

    pub fn pause(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.state = PlaybackState::Stopped;
        self.cancel_timer();
        self.generation += 1;
    }

    pub fn toggle(&mut self, year: YearSelection, loading: bool) -> bool {
        if self.is_playing() {
            self.pause();
            true
        } else {
            self.play(year, loading)
        }
    }

    /// Change the tick period. The current year is kept; a running timer is
    /// replaced so the next tick arrives one new period from now.
    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        if self.is_playing() {
            self.restart_timer();
        }
    }

    pub fn on_tick(&mut self, generation: u64, filters: &mut FilterManager, loading: bool) -> TickOutcome {
        if generation != self.generation || !self.is_playing() {
            return TickOutcome::Ignored;
        }
        if loading {
            debug!("playback tick skipped: load in flight");
            return TickOutcome::Stalled;
        }

        let YearSelection::Specific(year) = filters.state().year else {
            self.pause();
            return TickOutcome::Finished;
        };

        match filters.next_year_after(year) {
            Some(next) => {
                filters.set_year(YearSelection::Specific(next));
                TickOutcome::Advanced(next)
            }
            None => {
                debug!("playback reached {year}, stopping");
                self.pause();
                TickOutcome::Finished
            }
        }
    }

    fn restart_timer(&mut self) {
        self.cancel_timer();
        self.generation += 1;

        let generation = self.generation;
        let period = self.speed.period();
        let ticks = self.ticks.clone();
        self.timer = Some(tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; playback waits a full period.
            timer.tick().await;

            loop {
                timer.tick().await;
                if ticks.send(UiEvent::PlaybackTick { generation }).await.is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for PlaybackScheduler {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olympics_api::FilterOptions;

    fn filters(years: &[u16]) -> FilterManager {
        let mut filters = FilterManager::new();
        filters.load_options(FilterOptions { years: years.to_vec(), ..Default::default() });
        filters
    }

    async fn next_tick(rx: &mut mpsc::Receiver<UiEvent>) -> u64 {
        match rx.recv().await {
            Some(UiEvent::PlaybackTick { generation }) => generation,
            other => panic!("expected a playback tick, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn advances_through_the_year_list() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Fast);
        let mut filters = filters(&[2000, 2004, 2008]);
        filters.set_year(YearSelection::Specific(2000));

        assert!(playback.play(filters.state().year, false));
        let generation = next_tick(&mut rx).await;
        assert_eq!(playback.on_tick(generation, &mut filters, false), TickOutcome::Advanced(2004));
        let generation = next_tick(&mut rx).await;
        assert_eq!(playback.on_tick(generation, &mut filters, false), TickOutcome::Advanced(2008));
        assert_eq!(filters.state().year, YearSelection::Specific(2008));
    }

    #[tokio::test(start_paused = true)]
    async fn playing_from_the_last_year_stops_on_the_first_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Normal);
        let mut filters = filters(&[2000, 2004, 2008]);

        assert!(playback.play(filters.state().year, false));
        let generation = next_tick(&mut rx).await;

        assert_eq!(playback.on_tick(generation, &mut filters, false), TickOutcome::Finished);
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert_eq!(filters.state().year, YearSelection::Specific(2008));

        tokio::time::sleep(PlaybackSpeed::Normal.period() * 3).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn loading_stalls_the_tick_and_the_next_one_advances() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Fast);
        let mut filters = filters(&[2000, 2004]);
        filters.set_year(YearSelection::Specific(2000));
        playback.play(filters.state().year, false);

        let generation = next_tick(&mut rx).await;
        assert_eq!(playback.on_tick(generation, &mut filters, true), TickOutcome::Stalled);
        assert_eq!(filters.state().year, YearSelection::Specific(2000));
        assert!(playback.is_playing());

        let generation = next_tick(&mut rx).await;
        assert_eq!(playback.on_tick(generation, &mut filters, false), TickOutcome::Advanced(2004));
    }

    #[test]
    fn cannot_start_in_all_years_mode_or_while_loading() {
        let (tx, _rx) = mpsc::channel(8);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Normal);

        assert!(!playback.play(YearSelection::AllYears, false));
        assert!(!playback.play(YearSelection::Specific(2016), true));
        assert_eq!(playback.state(), PlaybackState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_to_all_years_finishes_playback() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Fast);
        let mut filters = filters(&[2000, 2004]);
        filters.set_year(YearSelection::Specific(2000));
        playback.play(filters.state().year, false);

        filters.toggle_all_years();
        let generation = next_tick(&mut rx).await;
        assert_eq!(playback.on_tick(generation, &mut filters, false), TickOutcome::Finished);
        assert!(!playback.is_playing());
        assert!(filters.state().year.is_all_years());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_queued_before_a_pause_are_ignored() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Fast);
        let mut filters = filters(&[2000, 2004, 2008]);
        filters.set_year(YearSelection::Specific(2000));

        playback.play(filters.state().year, false);
        let stale = next_tick(&mut rx).await;
        playback.pause();
        playback.play(filters.state().year, false);

        assert_eq!(playback.on_tick(stale, &mut filters, false), TickOutcome::Ignored);
        assert_eq!(filters.state().year, YearSelection::Specific(2000));

        let fresh = next_tick(&mut rx).await;
        assert_ne!(fresh, stale);
        assert_eq!(playback.on_tick(fresh, &mut filters, false), TickOutcome::Advanced(2004));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_toggling_leaves_a_single_timer() {
        let (tx, mut rx) = mpsc::channel(32);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Fast);
        let year = YearSelection::Specific(2000);

        for _ in 0..5 {
            playback.toggle(year, false);
            playback.toggle(year, false);
        }
        playback.toggle(year, false);
        assert!(playback.is_playing());

        tokio::time::sleep(PlaybackSpeed::Fast.period() * 3 + Duration::from_millis(10)).await;
        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push(event);
        }
        assert_eq!(received.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_change_keeps_the_year() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut playback = PlaybackScheduler::new(tx, PlaybackSpeed::Slow);
        let mut filters = filters(&[2000, 2004, 2008]);
        filters.set_year(YearSelection::Specific(2004));
        playback.play(filters.state().year, false);

        playback.set_speed(PlaybackSpeed::Fast);
        assert_eq!(filters.state().year, YearSelection::Specific(2004));

        let started = tokio::time::Instant::now();
        let generation = next_tick(&mut rx).await;
        let waited = started.elapsed();
        assert!(waited >= PlaybackSpeed::Fast.period() && waited < PlaybackSpeed::Slow.period());
        assert_eq!(playback.on_tick(generation, &mut filters, false), TickOutcome::Advanced(2008));
    }
}
