mod progress;
mod styling;
mod tables;

pub use progress::Spinner;
pub use styling::{bright, dim, job_status, magenta_bold};
pub use tables::{job_table, pipeline_table, stage_summary};

/// Prints the labci banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🦊 labci"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitLab CI pipelines and jobs")
    );
}
