//! Reporter implementation for the terminal.
//!
//! Progress and status go to stderr so that listings on stdout stay clean.
//! Download progress redraws a single line when stderr is a terminal.

use std::io::{IsTerminal, Write};

use crossterm::style::{Print, Stylize};
use crossterm::{cursor, execute, terminal};
use sk_core::Reporter;
use sk_schema::SkillName;

use super::theme::{Theme, format_size};

#[derive(Debug, Clone)]
pub struct Output {
    theme: Theme,
    interactive: bool,
}

impl Output {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            interactive: std::io::stderr().is_terminal(),
        }
    }

    /// Replace the current line when interactive, otherwise append one.
    fn status_line(&self, line: &str) {
        let mut err = std::io::stderr();
        if self.interactive {
            let _ = execute!(
                err,
                cursor::MoveToColumn(0),
                terminal::Clear(terminal::ClearType::CurrentLine),
                Print(line),
                Print("\n"),
            );
        } else {
            let _ = writeln!(err, "{line}");
        }
    }

    fn padded(&self, name: &SkillName) -> String {
        format!("{:<w$}", name.as_str(), w = self.theme.layout.name_width)
    }

    pub fn success(&self, msg: &str) {
        eprintln!("  {} {msg}", self.theme.icons.success.with(self.theme.colors.success));
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for Output {
    fn section(&self, title: &str) {
        eprintln!("{}", title.to_uppercase().with(self.theme.colors.header));
    }

    fn downloading(&self, name: &SkillName, current: u64, total: Option<u64>) {
        if !self.interactive {
            return;
        }
        let progress = match total {
            Some(total) if total > 0 => {
                format!("{} / {}", format_size(current), format_size(total))
            }
            _ => format_size(current),
        };
        let mut err = std::io::stderr();
        let _ = execute!(
            err,
            cursor::MoveToColumn(0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(format!(
                "  {} {} {}",
                self.theme.icons.active.with(self.theme.colors.active),
                self.padded(name).with(self.theme.colors.name),
                progress.with(self.theme.colors.secondary),
            )),
        );
    }

    fn extracting(&self, name: &SkillName, attempt: &str) {
        tracing::debug!("Extracting {name} from '{attempt}'");
    }

    fn done(&self, name: &SkillName, detail: &str) {
        self.status_line(&format!(
            "  {} {} {}",
            self.theme.icons.success.with(self.theme.colors.success),
            self.padded(name).with(self.theme.colors.name),
            detail.with(self.theme.colors.secondary),
        ));
    }

    fn failed(&self, name: &SkillName, reason: &str) {
        self.status_line(&format!(
            "  {} {} {}",
            self.theme.icons.error.with(self.theme.colors.error),
            self.padded(name).with(self.theme.colors.name),
            reason.with(self.theme.colors.error),
        ));
    }

    fn info(&self, msg: &str) {
        eprintln!("  {} {msg}", self.theme.icons.info.blue());
    }

    fn warning(&self, msg: &str) {
        eprintln!("  {} {msg}", self.theme.icons.warning.with(self.theme.colors.warning));
    }
}
