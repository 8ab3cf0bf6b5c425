use std::sync::Mutex;

use tracing::{debug, info};

use super::verdict::StatusVerdict;

/// Receives every freshly computed verdict.
pub trait Render: Send + Sync {
    fn render(&self, verdict: &StatusVerdict);
}

/// Writes the status to the log, at `info` only when it changes.
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: Mutex<Option<StatusVerdict>>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers `verdict` and reports whether it differs from the previous one.
    fn changed(&self, verdict: &StatusVerdict) -> bool {
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if last.as_ref() == Some(verdict) {
            return false;
        }
        *last = Some(verdict.clone());
        true
    }
}

impl Render for LogRenderer {
    fn render(&self, verdict: &StatusVerdict) {
        if self.changed(verdict) {
            info!(
                state = %verdict.state(),
                open = verdict.is_open(),
                class = verdict.state().css_class(),
                detail = verdict.detail(),
                "store status changed"
            );
        } else {
            debug!(state = %verdict.state(), detail = verdict.detail(), "store status unchanged");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_new_verdicts_count_as_changes() {
        let renderer = LogRenderer::new();
        let open = StatusVerdict::open("Open until 23:00");
        let closed = StatusVerdict::closed("Opens tomorrow at 14:00");

        assert!(renderer.changed(&open));
        assert!(!renderer.changed(&open));
        assert!(renderer.changed(&closed));
        assert!(renderer.changed(&open));
    }

    #[test]
    fn render_does_not_panic_without_subscriber() {
        let renderer = LogRenderer::new();
        renderer.render(&StatusVerdict::closed("We are closed on Sundays"));
        renderer.render(&StatusVerdict::closed("We are closed on Sundays"));
    }
}
