use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pepforge::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 100;

/// Renders library progress events as a single stderr progress line.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), target).with_style(Self::spinner_style());
        bar.finish_and_clear();
        Self {
            bar: Arc::new(Mutex::new(bar)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();

        Box::new(move |progress: Progress| {
            let Ok(bar) = bar.lock() else {
                warn!("Progress bar mutex was poisoned; dropping progress event.");
                return;
            };
            Self::apply(&bar, progress);
        })
    }

    fn apply(bar: &ProgressBar, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                bar.reset();
                bar.set_length(0);
                bar.set_style(Self::spinner_style());
                bar.set_message(name);
                bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
            }
            Progress::PhaseFinish => {
                bar.disable_steady_tick();
                let phase = bar.message();
                bar.finish_with_message(format!("✓ {phase}"));
            }
            Progress::TaskStart { total_steps } => {
                bar.disable_steady_tick();
                bar.set_length(total_steps);
                bar.set_position(0);
                bar.set_style(Self::bar_style());
            }
            Progress::TaskIncrement => bar.inc(1),
            Progress::TaskFinish => {
                if let Some(len) = bar.length() {
                    bar.set_position(len);
                }
            }
            Progress::ArtifactWritten { format, path } => {
                bar.println(format!("  wrote {format:<6} {}", path.display()));
            }
            Progress::Message(msg) => bar.println(format!("  {msg}")),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pepforge::engine::config::ExportFormat;
    use std::path::PathBuf;
    use std::thread;

    fn hidden_handler() -> CliProgressHandler {
        CliProgressHandler::with_draw_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn handler_starts_finished_and_empty() {
        let handler = hidden_handler();
        let bar = handler.bar.lock().unwrap();
        assert_eq!(bar.length(), Some(0));
        assert!(bar.is_finished());
    }

    #[test]
    fn phase_and_task_events_drive_the_bar() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Generating" });
        assert_eq!(handler.bar.lock().unwrap().message(), "Generating");

        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        {
            let bar = handler.bar.lock().unwrap();
            assert_eq!(bar.length(), Some(4));
            assert_eq!(bar.position(), 2);
        }

        callback(Progress::TaskFinish);
        assert_eq!(handler.bar.lock().unwrap().position(), 4);

        callback(Progress::PhaseFinish);
        let bar = handler.bar.lock().unwrap();
        assert!(bar.is_finished());
        assert_eq!(bar.message(), "✓ Generating");
    }

    #[test]
    fn artifact_and_message_events_do_not_disturb_the_bar() {
        let handler = hidden_handler();
        let callback = handler.get_callback();
        callback(Progress::PhaseStart { name: "Exporting" });
        callback(Progress::ArtifactWritten {
            format: ExportFormat::Csv,
            path: PathBuf::from("out/amp.csv"),
        });
        callback(Progress::Message("note".to_string()));
        assert_eq!(handler.bar.lock().unwrap().message(), "Exporting");
    }

    #[test]
    fn callback_can_be_driven_from_another_thread() {
        let handler = hidden_handler();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Evaluating" });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        assert!(handler.bar.lock().unwrap().is_finished());
    }
}
