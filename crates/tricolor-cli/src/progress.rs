use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tricolor_core::pipeline::{CompositeStage, ProgressReporter};

/// Drives an indicatif bar with one tick per compositor stage.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Result<Self> {
        let bar = ProgressBar::new(CompositeStage::ALL.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:24} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: CompositeStage) {
        self.bar.set_message(stage.to_string());
    }

    fn finish_stage(&self) {
        self.bar.inc(1);
    }
}
