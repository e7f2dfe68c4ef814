/// Subsystem tags for log line prefixes and per-module debug gating
///
/// Each tag maps to a --debug-<key> command-line flag via to_debug_key().
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Contracts,
    Normalize,
    Validate,
    Plan,
    Dispatch,
    Adapter,
    Feedback,
    Webserver,
}

impl LogTag {
    /// Plain uppercase name for file-safe output and flag matching
    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Contracts => "CONTRACTS",
            LogTag::Normalize => "NORMALIZE",
            LogTag::Validate => "VALIDATE",
            LogTag::Plan => "PLAN",
            LogTag::Dispatch => "DISPATCH",
            LogTag::Adapter => "ADAPTER",
            LogTag::Feedback => "FEEDBACK",
            LogTag::Webserver => "WEBSERVER",
        }
    }

    /// Key used by the --debug-<key> command-line flags
    pub fn to_debug_key(&self) -> &'static str {
        match self {
            LogTag::System => "system",
            LogTag::Config => "config",
            LogTag::Contracts => "contracts",
            LogTag::Normalize => "normalize",
            LogTag::Validate => "validate",
            LogTag::Plan => "plan",
            LogTag::Dispatch => "dispatch",
            LogTag::Adapter => "adapter",
            LogTag::Feedback => "feedback",
            LogTag::Webserver => "webserver",
        }
    }

    /// Colored tag for console output
    pub fn colored(&self) -> ColoredString {
        let name = self.to_plain_string();
        match self {
            LogTag::System => name.bright_white().bold(),
            LogTag::Config => name.white(),
            LogTag::Contracts => name.cyan(),
            LogTag::Normalize => name.blue(),
            LogTag::Validate => name.bright_blue(),
            LogTag::Plan => name.magenta(),
            LogTag::Dispatch => name.yellow(),
            LogTag::Adapter => name.bright_yellow(),
            LogTag::Feedback => name.green(),
            LogTag::Webserver => name.bright_green(),
        }
    }

    /// All tags, used when scanning command-line debug flags
    pub fn all() -> &'static [LogTag] {
        &[
            LogTag::System,
            LogTag::Config,
            LogTag::Contracts,
            LogTag::Normalize,
            LogTag::Validate,
            LogTag::Plan,
            LogTag::Dispatch,
            LogTag::Adapter,
            LogTag::Feedback,
            LogTag::Webserver,
        ]
    }
}
