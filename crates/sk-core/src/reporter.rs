//! Reporter trait for dependency injection
//!
//! Lets the install pipeline report progress and status without being coupled
//! to a specific terminal implementation.

use sk_schema::SkillName;

/// Progress and status sink for long-running operations.
pub trait Reporter: Send + Sync {
    /// A new phase has started (e.g. "Resolving", "Downloading").
    fn section(&self, title: &str);

    /// Download progress for a skill archive.
    fn downloading(&self, name: &SkillName, current: u64, total: Option<u64>);

    /// The archive is being unpacked into the skills directory.
    fn extracting(&self, name: &SkillName, attempt: &str);

    /// Marks an operation as successfully completed.
    fn done(&self, name: &SkillName, detail: &str);

    /// Marks an operation as failed with a specific reason.
    fn failed(&self, name: &SkillName, reason: &str);

    /// Log an informational message.
    fn info(&self, msg: &str);

    /// Log a warning message.
    fn warning(&self, msg: &str);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn section(&self, title: &str) {
        (**self).section(title);
    }
    fn downloading(&self, name: &SkillName, current: u64, total: Option<u64>) {
        (**self).downloading(name, current, total);
    }
    fn extracting(&self, name: &SkillName, attempt: &str) {
        (**self).extracting(name, attempt);
    }
    fn done(&self, name: &SkillName, detail: &str) {
        (**self).done(name, detail);
    }
    fn failed(&self, name: &SkillName, reason: &str) {
        (**self).failed(name, reason);
    }
    fn info(&self, msg: &str) {
        (**self).info(msg);
    }
    fn warning(&self, msg: &str) {
        (**self).warning(msg);
    }
}

/// A no-op reporter for silent operations (e.g. testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn section(&self, _: &str) {}
    fn downloading(&self, _: &SkillName, _: u64, _: Option<u64>) {}
    fn extracting(&self, _: &SkillName, _: &str) {}
    fn done(&self, _: &SkillName, _: &str) {}
    fn failed(&self, _: &SkillName, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
}
