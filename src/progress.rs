//! Progress indicators and prompts for prismactl

use anyhow::Result;
use declarative::{Action, ConfirmCallback, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::ui;

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Spinner for a single blocking step
pub fn spinner(msg: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress bar fed by the executor
pub struct BarProgress {
    bar: Option<ProgressBar>,
    visible: bool,
}

impl BarProgress {
    pub fn new(visible: bool) -> Self {
        Self { bar: None, visible }
    }
}

impl ProgressCallback for BarProgress {
    fn on_start(&mut self, total: usize) {
        if !self.visible {
            return;
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        self.bar = Some(pb);
    }

    fn on_entry_start(&mut self, label: &str) {
        if let Some(pb) = &self.bar {
            pb.set_message(label.to_string());
        }
    }

    fn on_entry_complete(&mut self, label: &str, action: Action) {
        if let Some(pb) = &self.bar {
            pb.set_message(format!("{} {}", ui::action_symbol(action), label));
            pb.inc(1);
        }
    }

    fn on_finish(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}

/// Interactive yes/no prompt
pub struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;

        Ok(confirmed)
    }
}
