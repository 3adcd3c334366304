//! Hooks an external driver can attach to a running search: to observe it
//! and to stop it early.
//!
//! Engines call `on_enter_search` once, `on_restart` at the start of every
//! restart (or once for population methods), `on_step` after every
//! iteration, and `on_exit_search` before returning. `search_command` is
//! polled once per iteration; a `Terminate` stops the engine, which then
//! returns the best fully evaluated point it has.

pub mod composite;
pub mod interrupt;
pub mod time_limit;

use std::fmt;

pub use composite::CompositeMonitor;
pub use interrupt::InterruptMonitor;
pub use time_limit::TimeLimitMonitor;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

impl fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate: {}", reason),
        }
    }
}

/// Snapshot handed to `SearchMonitor::on_step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub restart: usize,
    pub iteration: usize,
    /// Fitness of the current point; mean population fitness for the
    /// genetic engine.
    pub current_fitness: f64,
    pub best_fitness: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchPlan {
    pub engine: &'static str,
    pub restarts: usize,
    /// Iterations per restart when known up front.
    pub iterations: Option<usize>,
}

pub trait SearchMonitor {
    fn name(&self) -> &str;
    fn on_enter_search(&mut self, _plan: &SearchPlan) {}
    fn on_restart(&mut self, _restart: usize) {}
    fn on_step(&mut self, _progress: &Progress) {}
    fn on_exit_search(&mut self) {}
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}

impl fmt::Debug for dyn SearchMonitor + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMonitor;

impl SearchMonitor for NoOpMonitor {
    fn name(&self) -> &str {
        "NoOpMonitor"
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Records every step so tests can inspect the trajectory.
    #[derive(Debug, Default)]
    pub struct RecordingMonitor {
        pub restarts: Vec<usize>,
        pub steps: Vec<Progress>,
        pub stop_after: Option<usize>,
        pub entered: bool,
        pub exited: bool,
    }

    impl SearchMonitor for RecordingMonitor {
        fn name(&self) -> &str {
            "RecordingMonitor"
        }
        fn on_enter_search(&mut self, _plan: &SearchPlan) {
            self.entered = true;
        }
        fn on_restart(&mut self, restart: usize) {
            self.restarts.push(restart);
        }
        fn on_step(&mut self, progress: &Progress) {
            self.steps.push(*progress);
        }
        fn on_exit_search(&mut self) {
            self.exited = true;
        }
        fn search_command(&self) -> SearchCommand {
            match self.stop_after {
                Some(limit) if self.steps.len() >= limit => {
                    SearchCommand::Terminate("step limit".to_string())
                }
                _ => SearchCommand::Continue,
            }
        }
    }
}
