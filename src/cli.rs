use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use crate::auth::Token;
use crate::config::{Config, OutputFormat};
use crate::git::{GitCli, LocalGit};
use crate::output::{self, Spinner};
use crate::providers::gitlab::{
    job_url, pipeline_url, GitLabProvider, Job, LifecycleAction, Pipeline,
};

const TRACE_POLL_SECONDS: u64 = 3;

#[derive(Parser)]
#[command(name = "labci")]
#[command(author, version, about = "GitLab CI pipelines and jobs from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./labci.toml or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// GitLab instance URL
    #[arg(short, long, global = true, env = "GITLAB_URL")]
    url: Option<String>,

    #[arg(short, long, global = true, env = "GITLAB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Project path (group/project) or numeric id
    #[arg(short = 'P', long, global = true, env = "GITLAB_PROJECT")]
    project: Option<String>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest pipeline of a branch or tag
    Pipeline {
        /// Branch or tag (defaults to the current branch)
        #[arg(value_name = "REF")]
        ref_: Option<String>,
    },
    /// Show the latest pipeline of a branch or tag with its jobs
    Status {
        #[arg(value_name = "REF")]
        ref_: Option<String>,
    },
    /// Show the job a name resolves to
    Job {
        /// Job name; without one the running, then pending, then latest job is used
        job: Option<String>,

        /// Branch, tag or commit SHA (defaults to the current branch)
        #[arg(short, long = "ref", value_name = "REF")]
        ref_: Option<String>,
    },
    /// Play a manual job or retry a finished one
    Run {
        job: Option<String>,

        #[arg(short, long = "ref", value_name = "REF")]
        ref_: Option<String>,
    },
    /// Print a job's log
    Trace {
        job: Option<String>,

        #[arg(short, long = "ref", value_name = "REF")]
        ref_: Option<String>,

        /// Keep printing new output until the job finishes
        #[arg(short = 'F', long, default_value_t = false)]
        follow: bool,
    },
    /// Write the connection settings given on the command line to a config file
    Init {
        /// Target file (defaults to the user config dir)
        path: Option<PathBuf>,
    },
}

/// Connection and output settings after merging flags, environment and config file.
struct Settings {
    base_url: String,
    token: Option<Token>,
    project: String,
    format: OutputFormat,
    pretty: bool,
}

#[derive(Serialize)]
struct PipelineStatus<'a> {
    pipeline: &'a Pipeline,
    jobs: &'a [Job],
}

#[derive(Serialize)]
struct RunOutcome<'a> {
    action: &'static str,
    job: &'a Job,
    result: Option<&'a Job>,
}

impl Cli {
    fn settings(&self, config: Config) -> Result<Settings> {
        let project = self
            .project
            .clone()
            .or(config.gitlab.project)
            .context("No project configured: pass --project, set GITLAB_PROJECT or add gitlab.project to the config file")?;

        Ok(Settings {
            base_url: self.url.clone().unwrap_or(config.gitlab.base_url),
            token: self.token.clone().or(config.gitlab.token).map(Token::from),
            project,
            format: self.format.unwrap_or(config.output.format),
            pretty: self.pretty || config.output.pretty,
        })
    }

    fn print_json<T: Serialize>(settings: &Settings, value: &T) -> Result<()> {
        let json_output = if settings.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{json_output}");
        Ok(())
    }

    fn init(&self, path: Option<&PathBuf>) -> Result<()> {
        let path = match path {
            Some(path) => path.clone(),
            None => Config::user_config_path().context("No user config directory available")?,
        };

        let mut config = Config::load(Some(path.as_path()))?;
        if let Some(url) = &self.url {
            config.gitlab.base_url.clone_from(url);
        }
        if self.token.is_some() {
            config.gitlab.token.clone_from(&self.token);
        }
        if self.project.is_some() {
            config.gitlab.project.clone_from(&self.project);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }

        config.save(&path)?;
        info!("Configuration written to: {}", path.display());
        eprintln!("Configuration written to {}", path.display());
        Ok(())
    }

    /// Ref given on the command line, or the checked out branch.
    fn target_ref(ref_: Option<&str>, git: &GitCli) -> Result<String> {
        match ref_ {
            Some(ref_) => Ok(ref_.to_string()),
            None => Ok(git.current_branch()?),
        }
    }

    async fn show_pipeline(
        settings: &Settings,
        provider: &GitLabProvider,
        git: &GitCli,
        ref_: Option<&str>,
        with_jobs: bool,
    ) -> Result<()> {
        let pipeline = spin(
            "Resolving latest pipeline",
            provider.resolve_latest_pipeline(ref_, git),
        )
        .await?;

        let jobs = if with_jobs {
            spin(
                format!("Collecting jobs of pipeline {}", pipeline.id),
                provider.collect_pipeline_jobs(pipeline.id),
            )
            .await?
        } else {
            Vec::new()
        };

        if settings.format == OutputFormat::Json {
            return if with_jobs {
                Self::print_json(
                    settings,
                    &PipelineStatus {
                        pipeline: &pipeline,
                        jobs: &jobs,
                    },
                )
            } else {
                Self::print_json(settings, &pipeline)
            };
        }

        let url = pipeline_url(&provider.api.web_base(), &settings.project, &pipeline);
        println!("{}", output::pipeline_table(&pipeline, &url));
        if with_jobs {
            println!("{}", output::job_table(&jobs));
            println!("{}", output::dim(output::stage_summary(&jobs)));
        }
        Ok(())
    }

    async fn show_job(
        settings: &Settings,
        provider: &GitLabProvider,
        ref_: &str,
        job_name: &str,
    ) -> Result<()> {
        let job = spin(
            format!("Resolving job on {ref_}"),
            provider.resolve_target_job(ref_, job_name),
        )
        .await?;

        if settings.format == OutputFormat::Json {
            return Self::print_json(settings, &job);
        }

        println!("{}", output::job_table(std::slice::from_ref(&job)));
        println!(
            "{}",
            output::dim(job_url(&provider.api.web_base(), &settings.project, &job))
        );
        Ok(())
    }

    async fn run_job(
        settings: &Settings,
        provider: &GitLabProvider,
        ref_: &str,
        job_name: &str,
    ) -> Result<()> {
        let job = spin(
            format!("Resolving job on {ref_}"),
            provider.resolve_target_job(ref_, job_name),
        )
        .await?;

        let action = match LifecycleAction::for_status(&job.status) {
            LifecycleAction::Nothing => "none",
            LifecycleAction::Invoke(action) => action.as_str(),
        };
        let result = provider.dispatch_job_action(&job).await?;

        if settings.format == OutputFormat::Json {
            return Self::print_json(
                settings,
                &RunOutcome {
                    action,
                    job: &job,
                    result: result.as_ref(),
                },
            );
        }

        match result {
            None => println!(
                "Job {} ({}) is already {}, nothing to do",
                job.id,
                job.name,
                output::job_status(&job.status)
            ),
            Some(updated) => println!(
                "{} job {} ({}) → job {} is {}\n{}",
                output::bright(action),
                job.id,
                job.name,
                updated.id,
                output::job_status(&updated.status),
                output::dim(job_url(&provider.api.web_base(), &settings.project, &updated))
            ),
        }
        Ok(())
    }

    async fn trace_job(
        settings: &Settings,
        provider: &GitLabProvider,
        ref_: &str,
        job_name: &str,
        follow: bool,
    ) -> Result<()> {
        let mut job = spin(
            format!("Resolving job on {ref_}"),
            provider.resolve_target_job(ref_, job_name),
        )
        .await?;
        eprintln!(
            "{} {} ({}) {}",
            output::bright("Job"),
            job.id,
            job.name,
            output::job_status(&job.status)
        );

        let mut printed = String::new();
        loop {
            let trace = provider
                .api
                .fetch_job_trace(&settings.project, job.id)
                .await?;

            print!("{}", unprinted(&trace, &printed));
            std::io::stdout().flush()?;
            printed = trace;

            if !follow || job.status.is_finished() {
                break;
            }

            tokio::time::sleep(Duration::from_secs(TRACE_POLL_SECONDS)).await;
            job = provider.api.fetch_job(&settings.project, job.id).await?;
        }

        if follow {
            eprintln!("{}", output::job_status(&job.status));
        }
        Ok(())
    }

    fn connect(&self, config: Config) -> Result<(Settings, GitLabProvider)> {
        let settings = self.settings(config)?;
        info!("Using project {} on {}", settings.project, settings.base_url);

        let provider = GitLabProvider::new(
            &settings.base_url,
            settings.project.clone(),
            settings.token.clone(),
        )?;
        Ok((settings, provider))
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let git = GitCli::new(".");

        match &self.command {
            Commands::Init { path } => self.init(path.as_ref()),
            Commands::Pipeline { ref_ } => {
                let (settings, provider) = self.connect(config)?;
                Self::show_pipeline(&settings, &provider, &git, ref_.as_deref(), false).await
            }
            Commands::Status { ref_ } => {
                let (settings, provider) = self.connect(config)?;
                Self::show_pipeline(&settings, &provider, &git, ref_.as_deref(), true).await
            }
            Commands::Job { job, ref_ } => {
                let (settings, provider) = self.connect(config)?;
                let ref_ = Self::target_ref(ref_.as_deref(), &git)?;
                Self::show_job(&settings, &provider, &ref_, job.as_deref().unwrap_or_default())
                    .await
            }
            Commands::Run { job, ref_ } => {
                let (settings, provider) = self.connect(config)?;
                let ref_ = Self::target_ref(ref_.as_deref(), &git)?;
                Self::run_job(&settings, &provider, &ref_, job.as_deref().unwrap_or_default())
                    .await
            }
            Commands::Trace { job, ref_, follow } => {
                let (settings, provider) = self.connect(config)?;
                let ref_ = Self::target_ref(ref_.as_deref(), &git)?;
                Self::trace_job(
                    &settings,
                    &provider,
                    &ref_,
                    job.as_deref().unwrap_or_default(),
                    *follow,
                )
                .await
            }
        }
    }
}

/// The part of `trace` that follows what was already `printed`.
///
/// A log that no longer starts with the printed text was rewritten and is
/// returned whole.
fn unprinted<'a>(trace: &'a str, printed: &str) -> &'a str {
    trace.strip_prefix(printed).unwrap_or(trace)
}

/// Await `task` behind a spinner, clearing it when the task fails.
async fn spin<T>(
    message: impl Into<String>,
    task: impl Future<Output = crate::error::Result<T>>,
) -> crate::error::Result<T> {
    let message = message.into();
    let spinner = Spinner::start(message.clone());
    match task.await {
        Ok(value) => {
            spinner.finish(message);
            Ok(value)
        }
        Err(e) => {
            spinner.abandon();
            Err(e)
        }
    }
}
