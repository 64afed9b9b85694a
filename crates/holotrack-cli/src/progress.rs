use holotrack_core::pipeline::{PipelineStage, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Drives one terminal progress bar from pipeline stage events.
pub struct BarReporter {
    bar: ProgressBar,
    counted: ProgressStyle,
    spinner: ProgressStyle,
}

impl BarReporter {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            bar: ProgressBar::new(0),
            counted: ProgressStyle::default_bar()
                .template("{msg:24} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
            spinner: ProgressStyle::default_spinner().template("{msg:24} {spinner}")?,
        })
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.reset();
        match total_items {
            Some(total) => {
                self.bar.set_style(self.counted.clone());
                self.bar.set_length(total as u64);
            }
            None => self.bar.set_style(self.spinner.clone()),
        }
        self.bar.set_message(stage.to_string());
        self.bar.tick();
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        self.bar.finish_and_clear();
    }
}
