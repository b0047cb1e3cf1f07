use super::config::ExportFormat;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    ArtifactWritten { format: ExportFormat, path: PathBuf },
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Wraps `body` between a `PhaseStart` and `PhaseFinish` pair.
    /// `PhaseFinish` is reported even when `body` fails.
    pub fn phase<T>(&self, name: &'static str, body: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let result = body();
        self.report(Progress::PhaseFinish);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |p| {
            sink.lock().unwrap().push(format!("{:?}", p));
        }));
        (reporter, events)
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn phase_brackets_body_with_start_and_finish() {
        let (reporter, events) = recording_reporter();
        let value = reporter.phase("Generating", || {
            reporter.report(Progress::TaskIncrement);
            7
        });
        assert_eq!(value, 7);
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[0].contains("Generating"));
        assert_eq!(events[1], "TaskIncrement");
        assert_eq!(events[2], "PhaseFinish");
    }

    #[test]
    fn phase_finishes_when_body_returns_error() {
        let (reporter, events) = recording_reporter();
        let result: Result<(), &str> = reporter.phase("Exporting", || Err("disk full"));
        assert!(result.is_err());
        assert_eq!(events.lock().unwrap().last().unwrap(), "PhaseFinish");
    }
}
