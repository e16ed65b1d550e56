//! The phase timer: one loop that reads keys, tracks time and redraws
//!
//! Each iteration waits briefly for a key, applies it, then, unless
//! paused, measures elapsed time and redraws if the frame budget allows.
//! The wait is bounded by the poll interval, the time until the next frame
//! is due and the time until the phase ends, so keys are handled as soon as
//! they arrive while redraws stay at the target frame rate.
//!
//! Pausing moves the time origin forward by the paused span on resume, so
//! a phase always runs for its full duration of unpaused time.

use pomo_core::format::{format_clock, format_duration, needs_hours};
use pomo_core::Config;
use rand::rngs::StdRng;
use ratatui::backend::Backend;
use ratatui::style::{Color, Modifier, Style};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::background::Background;
use crate::banner::{Banner, BannerStyle};
use crate::clock::Clock;
use crate::display::{Canvas, DisplayContext};
use crate::input::{Command, KeySource};
use crate::layout::{block_size, Anchor};
use crate::phase::Phase;
use crate::progress::{self, BAR_COLUMN};

/// How long the "skipped" overlay stays up
pub const SKIP_HOLD: Duration = Duration::from_millis(400);

/// Shortest wait while a frame is not yet due
const MIN_FRAME_WAIT: Duration = Duration::from_millis(1);

const BACKGROUND_COLOR: Color = Color::DarkGray;

/// Loop tuning
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSettings {
    /// Target redraws per second
    pub frame_rate: f64,
    /// Longest single wait for a key
    pub poll_interval: Duration,
    /// How long the skip overlay is shown
    pub skip_hold: Duration,
    /// Start with the clock showing elapsed rather than remaining time
    pub show_elapsed: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            frame_rate: 15.0,
            poll_interval: Duration::from_millis(20),
            skip_hold: SKIP_HOLD,
            show_elapsed: false,
        }
    }
}

impl TimerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            frame_rate: config.frame_rate,
            poll_interval: config.poll_interval(),
            skip_hold: SKIP_HOLD,
            show_elapsed: config.show_elapsed,
        }
    }
}

/// How a phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Ran for its full duration
    Completed,
    /// Ended early by the skip key
    Skipped,
    /// The quit key was pressed; the whole run should stop
    Quit,
    /// Interrupted by a signal or Ctrl-C; the whole run should stop
    Interrupted,
}

impl PhaseOutcome {
    /// Whether the run should continue with the next phase
    pub fn continues(&self) -> bool {
        matches!(self, PhaseOutcome::Completed | PhaseOutcome::Skipped)
    }
}

/// Result of running one phase
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport {
    pub outcome: PhaseOutcome,
    /// Unpaused time spent in the phase, never more than its duration
    pub elapsed: Duration,
    /// Regular frames drawn (overlays not counted)
    pub frames: u64,
}

/// Runs phases one at a time
pub trait PhaseRunner {
    fn run_phase(&mut self, phase: &Phase) -> io::Result<PhaseReport>;
}

/// Pause-aware stopwatch for one phase
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    /// Clock reading that counts as zero elapsed; moves forward on resume
    origin: Duration,
    /// Clock reading when the current pause began
    paused_at: Option<Duration>,
    show_elapsed: bool,
}

impl TimerState {
    pub fn start(now: Duration, show_elapsed: bool) -> Self {
        Self {
            origin: now,
            paused_at: None,
            show_elapsed,
        }
    }

    /// Elapsed unpaused time; frozen while paused
    pub fn elapsed(&self, now: Duration) -> Duration {
        self.paused_at.unwrap_or(now).saturating_sub(self.origin)
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Pause or resume. Returns true if now paused.
    pub fn toggle_pause(&mut self, now: Duration) -> bool {
        match self.paused_at.take() {
            Some(paused_at) => {
                self.origin += now.saturating_sub(paused_at);
                false
            }
            None => {
                self.paused_at = Some(now);
                true
            }
        }
    }

    pub fn show_elapsed(&self) -> bool {
        self.show_elapsed
    }

    pub fn toggle_display(&mut self) {
        self.show_elapsed = !self.show_elapsed;
    }
}

/// Paces redraws to a target rate.
///
/// The value counts frame intervals since the last draw. A draw takes
/// exactly one interval off, keeping any fraction, so the long-run draw
/// count tracks elapsed time times the frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBudget {
    value: f64,
    last_tick: Duration,
    frame_rate: f64,
    forced: bool,
}

impl FrameBudget {
    /// New budget with the first frame forced
    pub fn new(now: Duration, frame_rate: f64) -> Self {
        Self {
            value: 0.0,
            last_tick: now,
            frame_rate,
            forced: true,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Add the intervals elapsed since the last tick
    pub fn accumulate(&mut self, now: Duration) {
        let delta = now.saturating_sub(self.last_tick);
        self.value += delta.as_secs_f64() * self.frame_rate;
        self.last_tick = now;
    }

    /// Restart tick measurement at `now` without adding anything
    pub fn rebase(&mut self, now: Duration) {
        self.last_tick = now;
    }

    pub fn force(&mut self) {
        self.forced = true;
    }

    pub fn is_due(&self) -> bool {
        self.forced || self.value >= 1.0
    }

    /// Account for one draw
    pub fn consume(&mut self) {
        if self.value >= 1.0 {
            self.value -= 1.0;
        }
        self.forced = false;
    }

    /// Time until the next frame is due, measured from the last tick
    pub fn until_due(&self) -> Duration {
        if self.is_due() {
            return Duration::ZERO;
        }
        let secs = (1.0 - self.value) / self.frame_rate;
        Duration::try_from_secs_f64(secs)
            .unwrap_or(MIN_FRAME_WAIT)
            .max(MIN_FRAME_WAIT)
    }
}

/// Drives a single phase on the display
pub struct SessionTimer<'d, B: Backend, K: KeySource, C: Clock> {
    display: &'d mut DisplayContext<B>,
    keys: K,
    clock: C,
    banner: Box<dyn Banner>,
    background: Background<StdRng>,
    settings: TimerSettings,
    show_elapsed: bool,
    interrupt: Arc<AtomicBool>,
}

impl<'d, B: Backend, K: KeySource, C: Clock> SessionTimer<'d, B, K, C> {
    pub fn new(
        display: &'d mut DisplayContext<B>,
        keys: K,
        clock: C,
        banner: Box<dyn Banner>,
        background: Background<StdRng>,
        settings: TimerSettings,
    ) -> Self {
        let show_elapsed = settings.show_elapsed;
        Self {
            display,
            keys,
            clock,
            banner,
            background,
            settings,
            show_elapsed,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop at the next iteration once `flag` is set
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    pub fn keys(&self) -> &K {
        &self.keys
    }

    fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    fn report(outcome: PhaseOutcome, elapsed: Duration, phase: &Phase, frames: u64) -> PhaseReport {
        PhaseReport {
            outcome,
            elapsed: elapsed.min(phase.duration),
            frames,
        }
    }

    fn draw_frame(
        &mut self,
        phase: &Phase,
        title: &str,
        state: &TimerState,
        now: Duration,
    ) -> io::Result<()> {
        let elapsed = state.elapsed(now);
        let show_hours = needs_hours(phase.duration);
        let clock_text = if state.show_elapsed() {
            format_clock(elapsed.as_secs_f64(), show_hours)
        } else {
            // Ceiling, so the clock never reads zero while time is left
            let remaining = phase.duration.saturating_sub(elapsed).as_secs_f64();
            format_clock(remaining.ceil(), show_hours)
        };
        let clock = self.banner.render(&clock_text, BannerStyle::Clock);
        let proportion = ratio(elapsed, phase.duration);
        let label = format_duration(phase.duration);

        let color = phase.color();
        let background = &mut self.background;
        self.display.draw(|canvas| {
            background.advance(canvas.height(), canvas.width());
            let bg_style = Style::default().fg(BACKGROUND_COLOR);
            for (row, line) in background.rows().enumerate() {
                if let Ok(row) = u16::try_from(row) {
                    canvas.try_draw_at(row, 0, line, bg_style);
                }
            }

            draw_header(canvas, phase, title);

            let (clock_height, _) = block_size(&clock);
            let body_offset = (clock_height / 2 + 2) as i32;
            let style = Style::default().fg(color);
            canvas.try_draw(&phase.body, Anchor::Center, style, body_offset, 0);
            canvas.try_draw(&clock, Anchor::Center, style.add_modifier(Modifier::BOLD), 0, 0);

            draw_progress(canvas, proportion, &label, color);
        })
    }

    fn draw_paused(
        &mut self,
        phase: &Phase,
        title: &str,
        state: &TimerState,
        now: Duration,
    ) -> io::Result<()> {
        let overlay = self.banner.render("paused", BannerStyle::Overlay);
        let proportion = ratio(state.elapsed(now), phase.duration);
        let label = format_duration(phase.duration);
        let color = phase.color();

        self.display.draw(|canvas| {
            draw_header(canvas, phase, title);
            let (overlay_height, _) = block_size(&overlay);
            let style = Style::default().fg(color);
            canvas.try_draw(&overlay, Anchor::Center, style.add_modifier(Modifier::BOLD), 0, 0);
            let hint_offset = (overlay_height / 2 + 2) as i32;
            canvas.try_draw("press space to resume", Anchor::Center, style, hint_offset, 0);
            draw_progress(canvas, proportion, &label, color);
        })
    }

    fn draw_skipped(&mut self, phase: &Phase) -> io::Result<()> {
        let overlay = self.banner.render("skipped", BannerStyle::Overlay);
        let style = Style::default().fg(phase.color()).add_modifier(Modifier::BOLD);
        self.display.draw(|canvas| {
            canvas.try_draw(&overlay, Anchor::Center, style, 0, 0);
        })
    }
}

impl<'d, B: Backend, K: KeySource, C: Clock> PhaseRunner for SessionTimer<'d, B, K, C> {
    fn run_phase(&mut self, phase: &Phase) -> io::Result<PhaseReport> {
        let title = self.banner.render(&phase.title, BannerStyle::Title);
        let start = self.clock.now();
        let mut state = TimerState::start(start, self.show_elapsed);
        let mut budget = FrameBudget::new(start, self.settings.frame_rate);
        let mut frames = 0u64;
        self.background.clear();

        loop {
            let now = self.clock.now();
            let elapsed = state.elapsed(now);
            if self.interrupted() {
                return Ok(Self::report(PhaseOutcome::Interrupted, elapsed, phase, frames));
            }
            if !state.is_paused() && elapsed >= phase.duration {
                return Ok(Self::report(PhaseOutcome::Completed, elapsed, phase, frames));
            }

            let wait = if state.is_paused() {
                self.settings.poll_interval
            } else {
                self.settings
                    .poll_interval
                    .min(budget.until_due())
                    .min(phase.duration - elapsed)
            };

            match self.keys.poll_key(wait)? {
                Some(Command::TogglePause) => {
                    let now = self.clock.now();
                    if state.toggle_pause(now) {
                        let at = format_clock(state.elapsed(now).as_secs_f64(), true);
                        debug!("paused at {}", at);
                        self.draw_paused(phase, &title, &state, now)?;
                    } else {
                        debug!("resumed");
                        budget.rebase(now);
                        budget.force();
                    }
                }
                Some(Command::Skip) => {
                    let elapsed = state.elapsed(self.clock.now());
                    debug!("skipped {} phase", phase.kind.as_str());
                    self.draw_skipped(phase)?;
                    self.clock.sleep(self.settings.skip_hold);
                    return Ok(Self::report(PhaseOutcome::Skipped, elapsed, phase, frames));
                }
                Some(Command::ToggleDisplay) => {
                    state.toggle_display();
                    self.show_elapsed = state.show_elapsed();
                }
                Some(Command::Quit) => {
                    debug!("quit requested");
                    let elapsed = state.elapsed(self.clock.now());
                    return Ok(Self::report(PhaseOutcome::Quit, elapsed, phase, frames));
                }
                Some(Command::Resize) => {
                    let now = self.clock.now();
                    if state.is_paused() {
                        self.draw_paused(phase, &title, &state, now)?;
                    } else {
                        budget.force();
                    }
                }
                Some(Command::Interrupt) => {
                    let elapsed = state.elapsed(self.clock.now());
                    return Ok(Self::report(PhaseOutcome::Interrupted, elapsed, phase, frames));
                }
                None => {}
            }

            if state.is_paused() {
                continue;
            }

            let now = self.clock.now();
            if state.elapsed(now) >= phase.duration {
                continue;
            }

            budget.accumulate(now);
            if budget.is_due() {
                self.draw_frame(phase, &title, &state, now)?;
                budget.consume();
                frames += 1;
            }
        }
    }
}

fn draw_header(canvas: &mut Canvas<'_>, phase: &Phase, title: &str) {
    let style = Style::default().fg(phase.color());
    canvas.try_draw(title, Anchor::TopLeft, style, 0, 0);
    canvas.try_draw(&phase.subtitle, Anchor::TopRight, style, 0, 0);
}

fn draw_progress(canvas: &mut Canvas<'_>, proportion: f64, label: &str, color: Color) {
    let bar = progress::render(proportion, label, canvas.width());
    let row = canvas.height().saturating_sub(1);
    canvas.try_draw_at(row, BAR_COLUMN, &bar, Style::default().fg(color));
}

fn ratio(elapsed: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        1.0
    } else {
        elapsed.as_secs_f64() / total.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::PlainBanner;
    use crate::clock::FakeClock;
    use crate::input::ScriptedKeys;
    use crate::phase::SessionPlan;
    use pomo_core::BackgroundMode;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::cell::Cell;
    use std::rc::Rc;

    fn secs(n: f64) -> Duration {
        Duration::from_secs_f64(n)
    }

    fn focus_phase(duration: Duration) -> Phase {
        let plan = SessionPlan::build(duration, secs(1.0), secs(1.0), 1);
        plan.phases()[0].clone()
    }

    fn test_display() -> DisplayContext<TestBackend> {
        DisplayContext::with_terminal(Terminal::new(TestBackend::new(60, 20)).unwrap())
    }

    fn run(
        display: &mut DisplayContext<TestBackend>,
        clock: &FakeClock,
        script: Vec<(Duration, Command)>,
        phase: &Phase,
    ) -> PhaseReport {
        let background = Background::with_rng(BackgroundMode::Snow, StdRng::seed_from_u64(1));
        run_with(display, clock, script, phase, background, Box::new(PlainBanner))
    }

    fn run_with(
        display: &mut DisplayContext<TestBackend>,
        clock: &FakeClock,
        script: Vec<(Duration, Command)>,
        phase: &Phase,
        background: Background<StdRng>,
        banner: Box<dyn Banner>,
    ) -> PhaseReport {
        let keys = ScriptedKeys::new(clock.clone(), script);
        let mut timer = SessionTimer::new(
            display,
            keys,
            clock.clone(),
            banner,
            background,
            TimerSettings::default(),
        );
        timer.run_phase(phase).unwrap()
    }

    /// Quit after `frames` regular frames of a seeded matrix background
    fn matrix_screen(frames: u64) -> String {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));
        let background = Background::with_rng(BackgroundMode::Matrix, StdRng::seed_from_u64(9));
        // Halfway between frame `frames - 1` and frame `frames`
        let quit_at = secs((frames as f64 - 0.5) / TimerSettings::default().frame_rate);

        let script = vec![(quit_at, Command::Quit)];
        let banner = Box::new(PlainBanner);
        let report = run_with(&mut display, &clock, script, &phase, background, banner);
        assert_eq!(report.frames, frames);
        screen(&display)
    }

    fn columns(row: &str, from: usize, to: usize) -> String {
        row.chars().skip(from).take(to - from).collect()
    }

    /// Counts overlay renders to observe redraws of the paused screen
    struct CountingBanner(Rc<Cell<usize>>);

    impl Banner for CountingBanner {
        fn render(&self, text: &str, style: BannerStyle) -> String {
            if style == BannerStyle::Overlay {
                self.0.set(self.0.get() + 1);
            }
            text.to_string()
        }
    }

    fn screen(display: &DisplayContext<TestBackend>) -> String {
        let buf = display.terminal().backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_timer_state_pause_shifts_origin() {
        let mut state = TimerState::start(secs(10.0), false);
        assert_eq!(state.elapsed(secs(12.0)), secs(2.0));

        assert!(state.toggle_pause(secs(12.0)));
        assert_eq!(state.elapsed(secs(30.0)), secs(2.0));

        assert!(!state.toggle_pause(secs(30.0)));
        assert_eq!(state.elapsed(secs(31.0)), secs(3.0));
    }

    #[test]
    fn test_frame_budget_keeps_fraction() {
        let mut budget = FrameBudget::new(Duration::ZERO, 10.0);
        assert!(budget.is_due());
        budget.consume();
        assert_eq!(budget.value(), 0.0);
        assert!(!budget.is_due());

        budget.accumulate(secs(0.25));
        assert!((budget.value() - 2.5).abs() < 1e-9);
        budget.consume();
        assert!(budget.is_due());
        budget.consume();
        assert!((budget.value() - 0.5).abs() < 1e-9);
        assert!(!budget.is_due());
        assert_eq!(budget.until_due(), secs(0.05));
    }

    #[test]
    fn test_frame_budget_rebase_skips_paused_time() {
        let mut budget = FrameBudget::new(Duration::ZERO, 10.0);
        budget.consume();
        budget.rebase(secs(100.0));
        budget.accumulate(secs(100.05));
        assert!((budget.value() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_frame_budget_never_waits_zero_when_not_due() {
        let mut budget = FrameBudget::new(Duration::ZERO, 15.0);
        budget.consume();
        budget.value = 1.0 - 1e-12;
        assert!(!budget.is_due());
        assert_eq!(budget.until_due(), MIN_FRAME_WAIT);
    }

    #[test]
    fn test_phase_completes_after_duration() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));

        let report = run(&mut display, &clock, vec![], &phase);
        assert_eq!(report.outcome, PhaseOutcome::Completed);
        assert_eq!(report.elapsed, secs(10.0));
        assert_eq!(clock.now(), secs(10.0));
    }

    #[test]
    fn test_redraw_count_tracks_frame_rate() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));

        let report = run(&mut display, &clock, vec![], &phase);
        let expected = 10.0 * TimerSettings::default().frame_rate;
        assert!(
            (report.frames as f64 - expected).abs() <= 1.0,
            "drew {} frames, expected about {}",
            report.frames,
            expected
        );
    }

    #[test]
    fn test_pausing_does_not_shorten_or_stretch_the_phase() {
        for paused_for in [0.5, 7.0, 120.0] {
            let clock = FakeClock::default();
            let mut display = test_display();
            let phase = focus_phase(secs(5.0));

            let script = vec![
                (secs(2.0), Command::TogglePause),
                (secs(2.0 + paused_for), Command::TogglePause),
            ];
            let report = run(&mut display, &clock, script, &phase);

            assert_eq!(report.outcome, PhaseOutcome::Completed);
            assert_eq!(report.elapsed, secs(5.0));
            let wall = clock.now().as_secs_f64();
            assert!((wall - (5.0 + paused_for)).abs() < 1.0 / 15.0, "wall time {wall}");
        }
    }

    #[test]
    fn test_paused_overlay_is_shown() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(60.0));

        let script = vec![(secs(1.0), Command::TogglePause), (secs(3.0), Command::Quit)];
        let report = run(&mut display, &clock, script, &phase);

        assert_eq!(report.outcome, PhaseOutcome::Quit);
        assert_eq!(report.elapsed, secs(1.0));
        let screen = screen(&display);
        assert!(screen.contains("paused"));
        assert!(screen.contains("focus..."));
    }

    #[test]
    fn test_skip_ends_phase_after_short_hold() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(3600.0));

        let report = run(&mut display, &clock, vec![(secs(1.0), Command::Skip)], &phase);
        assert_eq!(report.outcome, PhaseOutcome::Skipped);
        assert_eq!(report.elapsed, secs(1.0));
        assert_eq!(clock.now(), secs(1.0) + SKIP_HOLD);
        assert!(screen(&display).contains("skipped"));
    }

    #[test]
    fn test_skip_works_while_paused() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(60.0));

        let script = vec![(secs(1.0), Command::TogglePause), (secs(50.0), Command::Skip)];
        let report = run(&mut display, &clock, script, &phase);
        assert_eq!(report.outcome, PhaseOutcome::Skipped);
        assert_eq!(report.elapsed, secs(1.0));
        assert_eq!(clock.now(), secs(50.0) + SKIP_HOLD);
    }

    #[test]
    fn test_quit_stops_immediately() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(60.0));

        let report = run(&mut display, &clock, vec![(secs(2.0), Command::Quit)], &phase);
        assert_eq!(report.outcome, PhaseOutcome::Quit);
        assert!(!report.outcome.continues());
        assert_eq!(clock.now(), secs(2.0));
    }

    #[test]
    fn test_interrupt_flag_stops_the_phase() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(60.0));
        let flag = Arc::new(AtomicBool::new(true));

        let keys = ScriptedKeys::idle(clock.clone());
        let background = Background::with_rng(BackgroundMode::None, StdRng::seed_from_u64(1));
        let mut timer = SessionTimer::new(
            &mut display,
            keys,
            clock.clone(),
            Box::new(PlainBanner),
            background,
            TimerSettings::default(),
        )
        .with_interrupt(flag);

        let report = timer.run_phase(&phase).unwrap();
        assert_eq!(report.outcome, PhaseOutcome::Interrupted);
        assert_eq!(report.frames, 0);
        assert_eq!(timer.keys().polls, 0);
    }

    #[test]
    fn test_clock_shows_remaining_rounded_up() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));

        run(&mut display, &clock, vec![(secs(3.5), Command::Quit)], &phase);
        let screen = screen(&display);
        // 6.5 s left (plus a frame) displays as 7
        assert!(screen.contains("00:07"), "{screen}");
    }

    #[test]
    fn test_toggle_display_shows_elapsed_on_next_frame() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));

        let script = vec![(secs(2.5), Command::ToggleDisplay), (secs(3.5), Command::Quit)];
        run(&mut display, &clock, script, &phase);
        let screen = screen(&display);
        assert!(screen.contains("00:03"), "{screen}");
    }

    #[test]
    fn test_frame_layers() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));

        run(&mut display, &clock, vec![(secs(5.0), Command::Quit)], &phase);
        let screen = screen(&display);
        let rows: Vec<&str> = screen.lines().collect();

        assert!(rows[0].starts_with("focus..."));
        assert!(rows[0].trim_end().ends_with(&phase.subtitle));
        assert!(screen.contains(&phase.body));
        // Columns outside the bar belong to the background
        assert_eq!(rows[19].chars().nth(2), Some('['));
        assert!(rows[19].contains("] 00:10"));
    }

    #[test]
    fn test_background_falls_one_row_per_frame() {
        let before = matrix_screen(11);
        let after = matrix_screen(12);
        let before: Vec<&str> = before.lines().collect();
        let after: Vec<&str> = after.lines().collect();

        // Row 0 between the title and the subtitle is background only
        let newest = columns(before[0], 8, 40);
        assert!(newest.chars().any(|c| c != ' '), "{newest:?}");
        assert_eq!(columns(after[1], 8, 40), newest);

        // Rows above the clock hold nothing but background
        for row in 1..8 {
            assert_eq!(after[row + 1], before[row], "row {row}");
        }
    }

    #[test]
    fn test_no_background_leaves_screen_blank() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));
        let background = Background::with_rng(BackgroundMode::None, StdRng::seed_from_u64(9));

        let script = vec![(secs(1.0), Command::Quit)];
        run_with(&mut display, &clock, script, &phase, background, Box::new(PlainBanner));
        let screen = screen(&display);
        let rows: Vec<&str> = screen.lines().collect();

        // Title and subtitle on row 0, clock on row 9, body on row 11, bar on row 19
        assert!(columns(rows[0], 8, 40).trim().is_empty());
        for (i, row) in rows.iter().enumerate() {
            if ![0, 9, 11, 19].contains(&i) {
                assert!(row.trim().is_empty(), "row {i}: {row:?}");
            }
        }
        assert!(rows[9].contains("00:"));
        assert!(rows[11].contains(&phase.body));
    }

    #[test]
    fn test_resize_while_paused_redraws_overlay() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(60.0));
        let overlays = Rc::new(Cell::new(0));
        let background = Background::with_rng(BackgroundMode::None, StdRng::seed_from_u64(1));

        let script = vec![
            (secs(1.0), Command::TogglePause),
            (secs(2.0), Command::Resize),
            (secs(3.0), Command::Quit),
        ];
        let banner = Box::new(CountingBanner(overlays.clone()));
        let report = run_with(&mut display, &clock, script, &phase, background, banner);

        assert_eq!(report.outcome, PhaseOutcome::Quit);
        assert_eq!(report.elapsed, secs(1.0));
        assert_eq!(overlays.get(), 2);
        assert!(screen(&display).contains("paused"));
    }

    #[test]
    fn test_resize_while_running_forces_a_frame() {
        let clock = FakeClock::default();
        let mut display = test_display();
        let phase = focus_phase(secs(10.0));

        // 1.02 s is between frames 15 and 16; the resize adds one
        let quit_at = secs(1.05);
        let plain = run(&mut display, &clock, vec![(quit_at, Command::Quit)], &phase);

        let clock = FakeClock::default();
        let script = vec![(secs(1.02), Command::Resize), (quit_at, Command::Quit)];
        let resized = run(&mut display, &clock, script, &phase);
        assert_eq!(resized.frames, plain.frames + 1);
    }

    #[test]
    fn test_tiny_terminal_does_not_crash() {
        let clock = FakeClock::default();
        let terminal = Terminal::new(TestBackend::new(3, 1)).unwrap();
        let mut display = DisplayContext::with_terminal(terminal);
        let phase = focus_phase(secs(2.0));

        let script = vec![(secs(1.0), Command::TogglePause), (secs(1.5), Command::TogglePause)];
        let report = run(&mut display, &clock, script, &phase);
        assert_eq!(report.outcome, PhaseOutcome::Completed);
    }
}
