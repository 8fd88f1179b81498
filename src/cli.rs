use std::path::PathBuf;

use clap::Parser;

use crate::{
    error::Result,
    export::default_csv_path,
    types::{Destination, ExportSpec, Repo, RepoError, StateFilter},
};

const BUILD_INFO_HUMAN: &str = env!("BUILD_INFO_HUMAN");

#[derive(Parser, Debug, Default)]
#[command(
    name = "pr-export",
    about = "Export a GitHub repository's pull requests as CSV, or print them"
)]
#[command(long_version = BUILD_INFO_HUMAN)]
struct CliArgs {
    /// Repository owner (user or organisation)
    #[arg(long, env = "PR_EXPORT_OWNER", value_name = "OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, env = "PR_EXPORT_NAME", value_name = "NAME")]
    pub name: Option<String>,

    /// Repository as 'owner/name' or a repository URL; takes precedence over
    /// --owner and --name
    #[arg(short = 'r', long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Which pull requests to list
    #[arg(long, value_enum, default_value_t = StateFilter::Open)]
    pub state: StateFilter,

    /// Print pull requests to stdout instead of writing a CSV file
    #[arg(short = 'p', long)]
    pub print: bool,

    /// CSV destination (default: <name>_<owner>.csv)
    #[arg(short = 'o', long, value_name = "PATH", conflicts_with = "print")]
    pub output: Option<PathBuf>,

    /// GitHub API base URL, for GitHub Enterprise
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL")]
    pub api_url: Option<String>,
}

impl CliArgs {
    fn resolve_repo(&self) -> Result<Repo, RepoError> {
        if let Some(repo) = &self.repo {
            return Repo::parse(repo);
        }

        let owner = self.owner.as_deref().unwrap_or_default();
        let name = self.name.as_deref().unwrap_or_default();
        Repo::new(owner, name)
    }
}

fn determine_destination(cli: &CliArgs, repo: &Repo) -> Destination {
    if cli.print {
        Destination::Stdout
    } else {
        Destination::Csv(
            cli.output
                .clone()
                .unwrap_or_else(|| default_csv_path(repo)),
        )
    }
}

fn build_spec_from_cli(cli: CliArgs) -> Result<(ExportSpec, Destination)> {
    let repo = cli.resolve_repo()?;
    let destination = determine_destination(&cli, &repo);

    let api_url = cli
        .api_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    Ok((
        ExportSpec {
            repo,
            state: cli.state,
            api_url,
        },
        destination,
    ))
}

/// Parses command-line arguments into an export specification and a
/// destination.
///
/// Repository identifiers are validated here, so a missing or malformed
/// owner/name fails with [`Error::Configuration`](crate::Error::Configuration)
/// before any client exists.
pub fn parse_args<I, T>(args: I) -> Result<(ExportSpec, Destination)>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = CliArgs::try_parse_from(args)?;
    build_spec_from_cli(cli)
}
