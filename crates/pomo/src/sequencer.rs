//! Runs the session plan phase by phase
//!
//! Phases run synchronously in plan order. When a focus period or a long
//! break ends (completed or skipped) the notifier is poked and the next
//! phase starts straight away. Quit and interrupt end the run at once.

use anyhow::{Context, Result};
use pomo_core::format::format_duration;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::phase::{PhaseKind, SessionPlan};
use crate::sound::Notifier;
use crate::timer::{PhaseOutcome, PhaseRunner};

/// What happened over a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    /// Phases started, including one that was cut short
    pub phases_run: usize,
    pub phases_planned: usize,
    /// Focus periods that ran to the end
    pub focus_completed: usize,
    /// Unpaused time spent in focus periods
    pub focus_time: Duration,
    /// How the run was cut short, if it was
    pub stopped_by: Option<PhaseOutcome>,
}

impl SessionSummary {
    pub fn finished(&self) -> bool {
        self.stopped_by.is_none()
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.stopped_by {
            None => "session complete",
            Some(PhaseOutcome::Quit) => "session quit",
            Some(_) => "session interrupted",
        };
        write!(
            f,
            "{}: {}/{} phases, {} focus periods completed, {} focused",
            status,
            self.phases_run,
            self.phases_planned,
            self.focus_completed,
            format_duration(self.focus_time)
        )
    }
}

/// Owns the plan and the phase runner for one run
pub struct Sequencer<'a, R: PhaseRunner> {
    plan: SessionPlan,
    runner: R,
    notifier: &'a dyn Notifier,
    interrupt: Arc<AtomicBool>,
}

impl<'a, R: PhaseRunner> Sequencer<'a, R> {
    pub fn new(plan: SessionPlan, runner: R, notifier: &'a dyn Notifier) -> Self {
        Self {
            plan,
            runner,
            notifier,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop before the next phase once `flag` is set
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    /// Run every phase in order
    pub fn run(&mut self) -> Result<SessionSummary> {
        let mut summary = SessionSummary {
            phases_planned: self.plan.len(),
            ..SessionSummary::default()
        };

        for phase in self.plan.phases() {
            if self.interrupt.load(Ordering::SeqCst) {
                summary.stopped_by = Some(PhaseOutcome::Interrupted);
                break;
            }

            info!(
                "phase {}/{} started: {} for {}",
                phase.position,
                self.plan.len(),
                phase.kind.as_str(),
                format_duration(phase.duration)
            );

            let report = self.runner.run_phase(phase).with_context(|| {
                format!("phase {} ({}) failed", phase.position, phase.kind.as_str())
            })?;
            summary.phases_run += 1;

            info!(
                "phase {}/{} ended: {:?} after {}",
                phase.position,
                self.plan.len(),
                report.outcome,
                format_duration(report.elapsed)
            );

            if phase.kind == PhaseKind::Focus {
                summary.focus_time += report.elapsed;
                if report.outcome == PhaseOutcome::Completed {
                    summary.focus_completed += 1;
                }
            }

            if !report.outcome.continues() {
                summary.stopped_by = Some(report.outcome);
                break;
            }

            if phase.plays_sound() {
                self.notifier.notify();
            }
        }

        info!("{}", summary);
        Ok(summary)
    }
}
