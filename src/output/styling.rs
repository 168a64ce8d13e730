use console::style;

use crate::providers::gitlab::JobStatus;

/// Styling helpers for terminal output
pub fn bright_green(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn dim(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn bright(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Status text colored the way the GitLab UI colors it.
pub fn status(status: &str) -> console::StyledObject<String> {
    let text = style(status.to_string());
    match status {
        "success" => text.green(),
        "failed" => text.red(),
        "running" => text.cyan(),
        "pending" | "created" | "waiting_for_resource" | "preparing" | "scheduled" => {
            text.yellow()
        }
        "manual" => text.magenta(),
        _ => text.dim(),
    }
}

pub fn job_status(job_status: &JobStatus) -> console::StyledObject<String> {
    status(job_status.as_str())
}
