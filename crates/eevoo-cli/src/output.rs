//! Terminal output: status lines, spinners, and confirmations.
//!
//! On a CI server output is monochrome, status lines carry `[ SUCCESS ]`
//! style prefixes, spinners are hidden, and tips are dropped.

use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
#[cfg(test)]
use std::collections::VecDeque;
#[cfg(test)]
use std::sync::Mutex;
use std::time::Duration;

/// Environment variables whose presence means "running on a CI server".
const CI_VARS: &[&str] = &["CI", "CONTINUOUS_INTEGRATION", "BUILD_NUMBER", "JENKINS_URL"];

pub(crate) struct Ui {
    prompt: Prompt,
    plain: bool,
}

/// How yes/no questions get answered.
enum Prompt {
    /// Not interactive: every question is answered "yes".
    AssumeYes,
    Terminal,
    /// Pre-recorded answers, consumed in order.
    #[cfg(test)]
    Scripted(Mutex<VecDeque<bool>>),
}

impl Ui {
    pub(crate) fn new(interactive: bool) -> Self {
        let plain = is_ci();
        if plain {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        let prompt = if interactive {
            Prompt::Terminal
        } else {
            Prompt::AssumeYes
        };
        Self { prompt, plain }
    }

    /// Non-interactive, monochrome output. Used by tests.
    #[cfg(test)]
    pub(crate) fn plain() -> Self {
        Self {
            prompt: Prompt::AssumeYes,
            plain: true,
        }
    }

    /// Interactive session that answers each confirmation from `answers`.
    #[cfg(test)]
    pub(crate) fn scripted(answers: &[bool]) -> Self {
        Self {
            prompt: Prompt::Scripted(Mutex::new(answers.iter().copied().collect())),
            plain: true,
        }
    }

    pub(crate) fn log(&self, msg: impl std::fmt::Display) {
        println!("{msg}");
    }

    pub(crate) fn blank(&self) {
        println!();
    }

    pub(crate) fn success(&self, msg: impl std::fmt::Display) {
        if self.plain {
            eprintln!("[ SUCCESS ] {msg}");
        } else {
            println!("{} {msg}", style("success").green());
        }
    }

    pub(crate) fn warn(&self, msg: impl std::fmt::Display) {
        if self.plain {
            eprintln!("[ WARN ] {msg}");
        } else {
            eprintln!("{} {msg}", style("warning").yellow().bold());
        }
    }

    pub(crate) fn error(&self, msg: impl std::fmt::Display) {
        if self.plain {
            eprintln!("[ ERROR ] {msg}");
        } else {
            eprintln!("{} {msg}", style(" ERROR ").on_red());
        }
    }

    pub(crate) fn tip(&self, msg: impl std::fmt::Display) {
        if !self.plain {
            println!("{} {msg}", style("+ TIP:").cyan().bold());
        }
    }

    /// Ask a yes/no question in interactive mode; always "yes" otherwise.
    pub(crate) fn confirm(&self, prompt: &str) -> anyhow::Result<bool> {
        match &self.prompt {
            Prompt::AssumeYes => Ok(true),
            Prompt::Terminal => Ok(Confirm::new().with_prompt(prompt).default(true).interact()?),
            #[cfg(test)]
            Prompt::Scripted(answers) => match answers.lock() {
                Ok(mut answers) => match answers.pop_front() {
                    Some(answer) => Ok(answer),
                    None => anyhow::bail!("no scripted answer for {prompt:?}"),
                },
                Err(e) => anyhow::bail!("scripted answers poisoned: {e}"),
            },
        }
    }

    pub(crate) fn spinner(&self, msg: impl Into<Cow<'static, str>>) -> anyhow::Result<Spinner> {
        let bar = if self.plain {
            ProgressBar::hidden()
        } else {
            let template = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?;
            let bar = ProgressBar::new_spinner().with_style(template);
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        };
        let spinner = Spinner { bar };
        spinner.set_message(msg);
        Ok(spinner)
    }
}

/// A running spinner. Cleared when dropped, so error paths never leave
/// one spinning.
pub(crate) struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub(crate) fn set_message(&self, msg: impl Into<Cow<'static, str>>) {
        let msg = msg.into();
        tracing::debug!(step = %msg);
        self.bar.set_message(msg);
    }

    /// Run `f` with the spinner hidden (for output that streams to the terminal).
    pub(crate) fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

fn is_ci() -> bool {
    CI_VARS.iter().any(|var| {
        std::env::var_os(var).is_some_and(|v| !v.is_empty() && v != "false" && v != "0")
    })
}

/// Human-readable size in SI units (`91.2 MB`).
pub(crate) fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB"];

    if bytes < 1000 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let formatted = format!("{value:.decimals$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        &formatted
    };
    format!("{trimmed} {}", UNITS[unit])
}
