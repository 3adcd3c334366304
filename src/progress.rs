use indicatif::{ProgressBar, ProgressState, ProgressStyle};

use ga_ipd::monitor::{Progress, SearchMonitor, SearchPlan};

/// Draws one bar tick per engine step.
pub struct ProgressMonitor {
    style: ProgressStyle,
    bar: Option<ProgressBar>,
}

impl ProgressMonitor {
    pub fn new() -> anyhow::Result<ProgressMonitor> {
        let template = "{prefix} [{wide_bar}] [{elapsed_precise}] ({eta}) {msg}";
        let style = ProgressStyle::with_template(template)?
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("#>-");
        Ok(ProgressMonitor { style, bar: None })
    }
}

impl SearchMonitor for ProgressMonitor {
    fn name(&self) -> &str {
        "ProgressMonitor"
    }

    fn on_enter_search(&mut self, plan: &SearchPlan) {
        let bar = match plan.iterations {
            Some(iterations) => ProgressBar::new((plan.restarts * iterations) as u64),
            None => ProgressBar::no_length(),
        };
        bar.set_style(self.style.clone());
        bar.set_prefix(plan.engine);
        self.bar = Some(bar);
    }

    fn on_step(&mut self, progress: &Progress) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(format!("best {:.1}", progress.best_fitness));
        }
    }

    fn on_exit_search(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
