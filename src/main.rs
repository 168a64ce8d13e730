mod auth;
mod cli;
mod config;
mod error;
mod git;
mod output;
mod providers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use error::LabCiError;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting labci");
    if let Err(err) = cli.execute().await {
        if is_not_found(&err) {
            eprintln!("{}", output::dim(&err));
            std::process::exit(NOT_FOUND_EXIT_CODE);
        }
        return Err(err);
    }

    Ok(())
}

/// Exit status when there is nothing to show, as opposed to a failure of the
/// tool itself.
const NOT_FOUND_EXIT_CODE: i32 = 2;

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<LabCiError>()
        .is_some_and(LabCiError::is_not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn missing_pipeline_is_not_found() {
        let err = anyhow::Error::from(LabCiError::NoPipelineForRef("main".to_string()));
        assert!(is_not_found(&err));
    }

    #[test]
    fn context_does_not_hide_not_found() {
        let result: std::result::Result<(), LabCiError> = Err(LabCiError::NoJobsInPipeline(3));
        let err = result.context("Resolving job on main").unwrap_err();
        assert!(is_not_found(&err));
    }

    #[test]
    fn remote_404_is_a_failure() {
        let err = anyhow::Error::from(LabCiError::Api {
            status: 404,
            message: "404 Project Not Found".to_string(),
        });
        assert!(!is_not_found(&err));
    }

    #[test]
    fn other_errors_are_failures() {
        assert!(!is_not_found(&anyhow::anyhow!("No project configured")));
    }
}
