//! Reporting configuration.
//!
//! Defaults are read once from the environment:
//!
//! - `ASSERTIONS_COLOR`: colour the stderr echo (`always`/`never`, or any
//!   boolean spelling). Unset means "if stderr is a terminal".
//! - `ASSERTIONS_ECHO`: echo each failure to stderr as it is reported.
//! - `ASSERTIONS_DETAIL`: append sequence diffs and mapping key reports to
//!   mismatch messages.

use std::env;

use once_cell::sync::Lazy;

const COLOR_VAR: &str = "ASSERTIONS_COLOR";
const ECHO_VAR: &str = "ASSERTIONS_ECHO";
const DETAIL_VAR: &str = "ASSERTIONS_DETAIL";

static ENV_CONFIG: Lazy<ReportConfig> = Lazy::new(ReportConfig::from_env);

/// How failures are presented and what happens to them at the end of a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub use_colors: bool,
    pub echo_to_stderr: bool,
    pub show_detail: bool,
    /// Panic when a [`TestScope`](crate::TestScope) holding failures is
    /// dropped without being finished.
    pub panic_on_drop: bool,
}

impl ReportConfig {
    /// Built-in defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stderr),
            echo_to_stderr: true,
            show_detail: true,
            panic_on_drop: true,
        }
    }

    /// Built-in defaults overridden by any recognised environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::builtin();
        if let Some(flag) = env_flag(COLOR_VAR) {
            config.use_colors = flag;
        }
        if let Some(flag) = env_flag(ECHO_VAR) {
            config.echo_to_stderr = flag;
        }
        if let Some(flag) = env_flag(DETAIL_VAR) {
            config.show_detail = flag;
        }
        config
    }

    /// The process-wide defaults, computed on first use.
    pub fn global() -> &'static ReportConfig {
        &ENV_CONFIG
    }

    /// No colour, no echo, no panic on drop. Useful when a test inspects
    /// failures itself.
    pub fn quiet() -> Self {
        Self {
            use_colors: false,
            echo_to_stderr: false,
            show_detail: true,
            panic_on_drop: false,
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_echo(mut self, echo_to_stderr: bool) -> Self {
        self.echo_to_stderr = echo_to_stderr;
        self
    }

    pub fn with_detail(mut self, show_detail: bool) -> Self {
        self.show_detail = show_detail;
        self
    }

    pub fn with_panic_on_drop(mut self, panic_on_drop: bool) -> Self {
        self.panic_on_drop = panic_on_drop;
        self
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::global().clone()
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "always" => Some(true),
        "0" | "false" | "no" | "off" | "never" => Some(false),
        _ => None,
    }
}
