//! Progress reporting callback.

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Host-supplied progress callback. Invoked periodically from the execution
/// loop with a human-readable status message; its return value is never
/// consumed and a failing reporter is swallowed so it can never block or
/// alter a validation run.
pub struct ProgressReporter {
    callback: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl ProgressReporter {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// A reporter that discards all messages.
    pub fn silent() -> Self {
        Self { callback: None }
    }

    pub fn emit(&self, message: &str) {
        let Some(callback) = &self.callback else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| callback(message))).is_err() {
            tracing::debug!("progress reporter failed; continuing");
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::silent()
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("silent", &self.callback.is_none())
            .finish()
    }
}
