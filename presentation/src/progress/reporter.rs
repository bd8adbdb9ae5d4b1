//! Progress reporting for council deliberation

use colored::Colorize;
use council_application::{CouncilProgress, NoProgress};
use council_domain::{AgentVerdict, AnalysisResult};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};

/// Reports progress on stderr with an indicatif bar, one tick per agent
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
    draw_target: fn() -> ProgressDrawTarget,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_target: ProgressDrawTarget::stderr,
        }
    }

    /// Reporter that draws nowhere; state changes still happen
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_target: ProgressDrawTarget::hidden,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn verdict_label(verdict: &AgentVerdict) -> String {
        match verdict {
            AgentVerdict::Responded(vote) => format!(
                "{} {} {}",
                "v".green(),
                vote.agent_name,
                vote.decision
            ),
            AgentVerdict::Abstained(abstention) => {
                format!("{} {} abstained", "x".red(), abstention.agent_name)
            }
        }
    }

    fn finish(&self, message: String) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(bar) = bar.take()
        {
            bar.finish_with_message(message);
        }
    }

    #[cfg(test)]
    fn position(&self) -> Option<u64> {
        self.bar
            .lock()
            .ok()
            .and_then(|bar| bar.as_ref().map(ProgressBar::position))
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CouncilProgress for ProgressReporter {
    fn on_analysis_start(&self, case_id: &str, roster_size: usize) {
        let bar = ProgressBar::with_draw_target(Some(roster_size as u64), (self.draw_target)());
        bar.set_style(Self::style());
        bar.set_prefix(format!("Case {}", case_id));
        bar.set_message("Consulting agents...");

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_agent_complete(&self, verdict: &AgentVerdict) {
        if let Ok(bar) = self.bar.lock()
            && let Some(bar) = bar.as_ref()
        {
            bar.set_message(Self::verdict_label(verdict));
            bar.inc(1);
        }
    }

    fn on_analysis_complete(&self, result: &AnalysisResult) {
        self.finish(format!(
            "{} {}",
            "Consensus:".green(),
            result.decision
        ));
    }

    fn on_analysis_failed(&self, reason: &str) {
        self.finish(format!("{} {}", "Failed:".red(), reason));
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl CouncilProgress for SimpleProgress {
    fn on_analysis_start(&self, case_id: &str, roster_size: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            format!("Case {}", case_id).bold(),
            roster_size
        );
    }

    fn on_agent_complete(&self, verdict: &AgentVerdict) {
        eprintln!("  {}", ProgressReporter::verdict_label(verdict));
    }

    fn on_analysis_complete(&self, result: &AnalysisResult) {
        eprintln!("  {} {}\n", "=".cyan(), result.vote_summary());
    }
}

/// How progress is shown for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// indicatif bar on an interactive stderr
    Bars,
    /// Plain lines when stderr is redirected
    Lines,
    Silent,
}

impl ProgressMode {
    pub fn detect(quiet: bool, stderr_is_terminal: bool) -> Self {
        match (quiet, stderr_is_terminal) {
            (true, _) => ProgressMode::Silent,
            (false, true) => ProgressMode::Bars,
            (false, false) => ProgressMode::Lines,
        }
    }

    pub fn reporter(self) -> Arc<dyn CouncilProgress> {
        match self {
            ProgressMode::Bars => Arc::new(ProgressReporter::new()),
            ProgressMode::Lines => Arc::new(SimpleProgress),
            ProgressMode::Silent => Arc::new(NoProgress),
        }
    }
}
