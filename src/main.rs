use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use impactlens_collect::document::{collect, CollectSettings};
use impactlens_collect::vcs::GitCli;
use impactlens_core::{ImpactConfig, ImpactError, DEFAULT_CONFIG_TEMPLATE};
use impactlens_report::client::SubmitOutcome;
use impactlens_report::output::CiOutput;
use impactlens_report::settings::ReportInputs;

const CONFIG_FILE: &str = ".impactlens.toml";

#[derive(Parser)]
#[command(
    name = "impactlens",
    version,
    about = "Structured diffs and impact analysis requests for CI pipelines",
    long_about = "impactlens turns the files changed between two branches into a structured\n\
                   JSON diff and submits it, with pull-request metadata, to an impact analysis API.\n\n\
                   Examples:\n  \
                     impactlens collect                 Build structured_diff.json from changed_files.txt\n  \
                     impactlens report                  Submit structured_diff.json for analysis\n  \
                     impactlens init                    Create a .impactlens.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (default: .impactlens.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Build the structured diff from a changed-files list
    #[command(long_about = "Build the structured diff from a changed-files list.\n\n\
        Reads tab-separated '<status>\\t<path>' lines, then asks git for each file's diff\n\
        between origin/<target> and origin/<source> and for its content on both branches.\n\
        Content of 100000 bytes or more is left out.\n\n\
        Examples:\n  git diff --name-status origin/main origin/feature > changed_files.txt\n  \
        SOURCE_BRANCH=feature TARGET_BRANCH=main impactlens collect")]
    Collect {
        /// Changed-files list (default: changed_files.txt)
        #[arg(long)]
        changed_files: Option<PathBuf>,
        /// Output path (default: structured_diff.json)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Repository to run git in
        #[arg(long, default_value = ".")]
        repo: PathBuf,
        /// Branch carrying the changes
        #[arg(long, env = "SOURCE_BRANCH")]
        source_branch: Option<String>,
        /// Branch the changes are compared against
        #[arg(long, env = "TARGET_BRANCH")]
        target_branch: Option<String>,
    },
    /// Submit the structured diff to the impact analysis API
    #[command(long_about = "Submit the structured diff to the impact analysis API.\n\n\
        POSTs the document with pull-request metadata and records the returned job id\n\
        in impact_analysis_job.txt and as the 'impact_analysis_id' step output.\n\
        Exits non-zero on missing configuration, network failure, or an error status.")]
    Report {
        /// Structured diff to submit (default: structured_diff.json)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where to write the job id (default: impact_analysis_job.txt)
        #[arg(long)]
        job_file: Option<PathBuf>,
        /// Impact analysis endpoint
        #[arg(long, env = "IMPACT_API_URL")]
        api_url: Option<String>,
        /// Access token sent as X-API-Access-Token
        #[arg(long, env = "API_ACCESS_TOKEN", hide_env_values = true)]
        api_token: Option<String>,
        /// Project identifier on the impact analysis service
        #[arg(long, env = "PROJECT_ID")]
        project_id: Option<String>,
        /// Branch carrying the changes
        #[arg(long, env = "SOURCE_BRANCH")]
        source_branch: Option<String>,
        /// Branch the changes are compared against
        #[arg(long, env = "TARGET_BRANCH")]
        target_branch: Option<String>,
        /// GitHub token forwarded to the service
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,
        /// Pull-request number
        #[arg(long, env = "PR_NUMBER")]
        pr_number: Option<String>,
        /// Pull-request title
        #[arg(long, env = "PR_TITLE")]
        pr_title: Option<String>,
        /// Pull-request author
        #[arg(long, env = "PR_AUTHOR")]
        pr_author: Option<String>,
        /// Repository full name (owner/name)
        #[arg(long, env = "REPO_FULL_NAME")]
        repo_full_name: Option<String>,
        /// Step output file provided by GitHub Actions
        #[arg(long, env = "GITHUB_OUTPUT", hide = true)]
        github_output: Option<String>,
    },
    /// Create a default .impactlens.toml configuration file
    #[command(long_about = "Create a default .impactlens.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .impactlens.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{level},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn")
}

/// `--verbose` wins over `RUST_LOG`; otherwise a non-empty `RUST_LOG` is used.
fn filter_directives(verbose: bool, rust_log: Option<String>) -> String {
    match rust_log {
        Some(directives) if !verbose && !directives.trim().is_empty() => directives,
        _ => default_filter(verbose),
    }
}

fn init_tracing(verbose: bool) {
    let directives = filter_directives(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(directives)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ImpactConfig> {
    let config = match path {
        Some(path) => ImpactConfig::from_file(path)?,
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                ImpactConfig::from_file(default_path)?
            } else {
                ImpactConfig::default()
            }
        }
    };
    Ok(config)
}

fn run_init() -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        miette::bail!(miette::miette!(
            help = "Edit the existing file or remove it first",
            "{CONFIG_FILE} already exists"
        ));
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE).into_diagnostic()?;
    println!("Created {CONFIG_FILE}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Collect {
            changed_files,
            output,
            repo,
            source_branch,
            target_branch,
        } => {
            let mut config = load_config(cli.config.as_deref())?.collect;
            if let Some(path) = changed_files {
                config.changed_files = path;
            }
            if let Some(path) = output {
                config.output = path;
            }

            let settings =
                CollectSettings::new(source_branch, target_branch, config.max_content_bytes)?;
            let git = GitCli::new(repo);

            match collect(&config.changed_files, &config.output, &git, &settings) {
                Ok(_) => {}
                Err(ImpactError::EmptyInput(msg)) => {
                    let list = config.changed_files.display();
                    miette::bail!(miette::miette!(
                        help = format!(
                            "Produce the list first, e.g.: git diff --name-status origin/<target> origin/<source> > {list}"
                        ),
                        "{msg} in {list}"
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Report {
            input,
            job_file,
            api_url,
            api_token,
            project_id,
            source_branch,
            target_branch,
            github_token,
            pr_number,
            pr_title,
            pr_author,
            repo_full_name,
            github_output,
        } => {
            let mut config = load_config(cli.config.as_deref())?.report;
            if let Some(path) = input {
                config.input = path;
            }
            if let Some(path) = job_file {
                config.job_file = path;
            }

            let inputs = ReportInputs {
                api_url,
                api_token,
                project_id,
                source_branch,
                target_branch,
                github_token,
                pr_number,
                pr_title,
                pr_author,
                repo_full_name,
            };
            let ci_output = CiOutput::from_env_value(github_output);

            match impactlens_report::pipeline::run(inputs, &config, &ci_output).await? {
                SubmitOutcome::Created(job) => {
                    tracing::info!(
                        path = %config.job_file.display(),
                        "recorded impact analysis job {job}"
                    );
                }
                SubmitOutcome::AcceptedWithoutId => {
                    tracing::warn!("request accepted but no job id was recorded");
                }
            }
        }
        Command::Init => run_init()?,
        Command::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "impactlens",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
