use std::time::{Duration, Instant};

use crate::monitor::{SearchCommand, SearchMonitor, SearchPlan};

/// Wall-clock budget for one engine invocation. The clock starts when the
/// engine enters the search.
#[derive(Debug, Clone, Copy)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Instant,
}

impl TimeLimitMonitor {
    pub fn new(time_limit: Duration) -> Self {
        Self {
            time_limit,
            start_time: Instant::now(),
        }
    }
}

impl SearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _plan: &SearchPlan) {
        self.start_time = Instant::now();
    }

    fn search_command(&self) -> SearchCommand {
        if self.start_time.elapsed() >= self.time_limit {
            SearchCommand::Terminate("time limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}
