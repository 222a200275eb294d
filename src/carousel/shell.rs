//! The page around the carousel.

use std::sync::Arc;

use tracing::info;

/// Page-level services the carousel calls out to.
pub trait PageShell: Send + Sync {
    /// Suspends or restores the document's own scrolling.
    fn set_scroll_locked(&self, locked: bool);
    /// The visitor asked to be contacted about `project_title`.
    fn inquire(&self, project_title: &str);
    /// Brings the contact section into view.
    fn scroll_to_contact(&self);
}

/// Holds the page scroll lock for as long as it lives.
pub struct ScrollLock {
    shell: Arc<dyn PageShell>,
}

impl ScrollLock {
    pub fn acquire(shell: Arc<dyn PageShell>) -> Self {
        shell.set_scroll_locked(true);
        Self { shell }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.shell.set_scroll_locked(false);
    }
}

impl std::fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScrollLock")
    }
}

/// Prefill for the contact form when a visitor inquires about a project.
pub fn inquiry_message(project_title: &str) -> String {
    format!(
        "Ich interessiere mich für das Projekt \"{project_title}\" und würde gerne mehr erfahren."
    )
}

/// Shell for headless runs: every call becomes a log line.
#[derive(Debug, Default)]
pub struct TracingShell;

impl PageShell for TracingShell {
    fn set_scroll_locked(&self, locked: bool) {
        info!(locked, "page scroll lock");
    }

    fn inquire(&self, project_title: &str) {
        info!(
            project = project_title,
            message = %inquiry_message(project_title),
            "contact form prefilled"
        );
    }

    fn scroll_to_contact(&self) {
        info!("scrolling to contact section");
    }
}
