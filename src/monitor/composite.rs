use crate::monitor::{Progress, SearchCommand, SearchMonitor, SearchPlan};

/// Fans every hook out to its children. The first child asking to terminate
/// wins.
#[derive(Default)]
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn SearchMonitor + 'a>>,
}

impl<'a> CompositeMonitor<'a> {
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    pub fn add_monitor<M: SearchMonitor + 'a>(&mut self, monitor: M) {
        self.monitors.push(Box::new(monitor));
    }

    pub fn with_monitor<M: SearchMonitor + 'a>(mut self, monitor: M) -> Self {
        self.add_monitor(monitor);
        self
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl SearchMonitor for CompositeMonitor<'_> {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, plan: &SearchPlan) {
        self.monitors.iter_mut().for_each(|m| m.on_enter_search(plan));
    }

    fn on_restart(&mut self, restart: usize) {
        self.monitors.iter_mut().for_each(|m| m.on_restart(restart));
    }

    fn on_step(&mut self, progress: &Progress) {
        self.monitors.iter_mut().for_each(|m| m.on_step(progress));
    }

    fn on_exit_search(&mut self) {
        self.monitors.iter_mut().for_each(|m| m.on_exit_search());
    }

    fn search_command(&self) -> SearchCommand {
        self.monitors
            .iter()
            .map(|m| m.search_command())
            .find(|command| matches!(command, SearchCommand::Terminate(_)))
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.monitors.iter().map(|m| m.name()))
            .finish()
    }
}
