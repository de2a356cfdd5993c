//! Process-wide error reporting sink.
//!
//! Installed once at startup with a project identifier. Captured errors are
//! emitted as structured `tracing` events tagged with that project so the log
//! pipeline can route them. Capturing before `init` is a no-op.

use once_cell::sync::OnceCell;
use std::error::Error;
use tracing::error;

static REPORTER: OnceCell<ErrorReporter> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReporter {
    project: String,
}

impl ErrorReporter {
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    fn capture(&self, err: &(dyn Error + 'static)) {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        error!(
            target: "dicebot::reporting",
            project = %self.project,
            error = %err,
            causes = ?causes,
            "captured error"
        );
    }
}

/// Installs the reporter. Returns `false` if one was already installed.
pub fn init(project: &str) -> bool {
    REPORTER
        .set(ErrorReporter {
            project: project.to_string(),
        })
        .is_ok()
}

/// The installed reporter, if any.
#[must_use]
pub fn reporter() -> Option<&'static ErrorReporter> {
    REPORTER.get()
}

pub fn capture(err: &(dyn Error + 'static)) {
    if let Some(reporter) = REPORTER.get() {
        reporter.capture(err);
    }
}
