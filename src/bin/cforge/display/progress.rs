use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use compound_forge::{CanonicalCompoundRecord, ProgressSink, RegistryEntry};

pub struct StepSpinner {
    bar: Option<ProgressBar>,
    start: Instant,
    step: u8,
    total_steps: u8,
    step_start: Instant,
}

impl StepSpinner {
    pub fn new(total_steps: u8) -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            start: now,
            step: 0,
            total_steps,
            step_start: now,
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        self.step += 1;
        self.step_start = Instant::now();

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("invalid template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(self.message(description));

        self.bar = Some(bar);
    }

    pub fn set_detail(&self, description: &str, detail: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} ({})", self.message(description), detail));
        }
    }

    fn message(&self, description: &str) -> String {
        format!("[{}/{}] {}...", self.step, self.total_steps, description)
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[&str]) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let elapsed = self.step_start.elapsed();
        let mut stderr = io::stderr().lock();

        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            description,
            elapsed.as_secs_f64()
        );

        for substep in substeps {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", substep);
        }
    }

    pub fn finish(mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        print_footer(self.start.elapsed());
    }
}

fn print_footer(elapsed: Duration) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
    );
    let _ = writeln!(stderr);
    let _ = writeln!(
        stderr,
        "  \x1b[32m✓\x1b[0m Run complete {:>37}",
        format!("Total: {:.2}s", elapsed.as_secs_f64())
    );
    let _ = writeln!(stderr);
}

pub enum Progress {
    Interactive(StepSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_steps: u8) -> Self {
        if interactive {
            Self::Interactive(StepSpinner::new(total_steps))
        } else {
            Self::Silent
        }
    }

    pub fn step(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.step(description);
        }
    }

    pub fn set_detail(&self, description: &str, detail: &str) {
        if let Self::Interactive(s) = self {
            s.set_detail(description, detail);
        }
    }

    pub fn complete_step(&mut self, description: &str, substeps: &[&str]) {
        if let Self::Interactive(s) = self {
            s.complete_step(description, substeps);
        }
    }

    pub fn finish(self) {
        if let Self::Interactive(s) = self {
            s.finish();
        }
    }
}

/// Shows the entry being processed on the current spinner and tallies the
/// outcome of each record.
pub struct EntryProgress<'a> {
    progress: &'a Progress,
    description: &'a str,
    pub resolved: usize,
    pub failed: Vec<String>,
}

impl<'a> EntryProgress<'a> {
    pub fn new(progress: &'a Progress, description: &'a str) -> Self {
        Self {
            progress,
            description,
            resolved: 0,
            failed: Vec::new(),
        }
    }
}

impl ProgressSink for EntryProgress<'_> {
    fn entry_started(&mut self, index: usize, total: usize, entry: &RegistryEntry) {
        self.progress.set_detail(
            self.description,
            &format!("{}/{} {}", index + 1, total, entry.identifier),
        );
    }

    fn entry_finished(&mut self, _index: usize, _total: usize, record: &CanonicalCompoundRecord) {
        if record.has_structure() {
            self.resolved += 1;
        } else {
            self.failed.push(record.identifier.clone());
        }
    }
}
