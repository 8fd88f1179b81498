use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use chrono_humanize::{Accuracy, HumanTime, Tense};
use tempfile::NamedTempFile;
use tracing::info;

use crate::{
    error::{Error, Result},
    query::fetch_pull_requests,
    types::{Destination, ExportSpec, Forge, PullRequest, Repo},
};

pub const CSV_HEADERS: [&str; 11] = [
    "PR №",
    "Title",
    "Author",
    "State",
    "URL",
    "Created At",
    "Updated At",
    "Time open",
    "Commits",
    "Comments",
    "Reviewers",
];

const RECORD_SEPARATOR_WIDTH: usize = 80;

/// `{name}_{owner}.csv` in the working directory.
pub fn default_csv_path(repo: &Repo) -> PathBuf {
    PathBuf::from(format!("{}_{}.csv", repo.name(), repo.owner()))
}

/// Renders a duration as `[D day[s], ]H:MM:SS`.
pub fn format_time_open(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("1 day, {hours}:{minutes:02}:{seconds:02}"),
        _ => format!("{days} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}

fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn csv_row(pr: &PullRequest) -> Result<[String; 11]> {
    Ok([
        pr.number.to_string(),
        pr.title.clone(),
        pr.author.clone(),
        pr.state.to_string(),
        pr.url.clone(),
        format_timestamp(pr.created_at),
        format_timestamp(pr.updated_at),
        format_time_open(pr.time_open),
        serde_json::to_string(&pr.commits)?,
        serde_json::to_string(&pr.comments)?,
        serde_json::to_string(&pr.reviewers)?,
    ])
}

/// Writes a header row followed by one row per pull request.
pub fn write_csv<W: Write>(prs: &[PullRequest], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;
    for pr in prs {
        csv_writer.write_record(&csv_row(pr)?)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the CSV export to `path`, replacing any existing file.
///
/// Rows go to a temporary file in the same directory that is renamed over
/// `path` once complete, so a failed write leaves neither a partial file nor
/// a clobbered previous export.
pub fn save_csv(prs: &[PullRequest], path: &Path) -> Result<()> {
    let io_error = |source: std::io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(io_error)?;
    write_csv(prs, BufWriter::new(staged.as_file_mut()))?;
    staged.persist(path).map_err(|err| io_error(err.error))?;

    info!(path = %path.display(), rows = prs.len(), "wrote CSV export");
    Ok(())
}

fn stdout_error(source: std::io::Error) -> Error {
    Error::Io {
        path: PathBuf::from("<stdout>"),
        source,
    }
}

fn write_listing<W: Write>(prs: &[PullRequest], writer: &mut W) -> std::io::Result<()> {
    for pr in prs {
        writeln!(writer, "Number: {}", pr.number)?;
        writeln!(writer, "Title: {}", pr.title)?;
        writeln!(writer, "User: {}", pr.author)?;
        writeln!(writer, "State: {}", pr.state)?;
        if !pr.url.is_empty() {
            writeln!(writer, "URL: {}", pr.url)?;
        }
        writeln!(writer, "Created at: {}", format_timestamp(pr.created_at))?;
        writeln!(writer, "Updated at: {}", format_timestamp(pr.updated_at))?;
        writeln!(
            writer,
            "Time open: {} ({})",
            format_time_open(pr.time_open),
            HumanTime::from(pr.time_open).to_text_en(Accuracy::Rough, Tense::Present)
        )?;

        writeln!(writer, "Commits:")?;
        for commit in &pr.commits {
            writeln!(writer, "\tSHA: {}", commit.sha)?;
            writeln!(writer, "\tMessage: {}", commit.message)?;
            writeln!(writer, "\tCommitter: {}", commit.committer)?;
        }

        writeln!(writer, "Comments:")?;
        for comment in &pr.comments {
            writeln!(writer, "\tAuthor: {}", comment.author)?;
            writeln!(writer, "\tBody: {}", comment.body)?;
        }

        writeln!(writer, "Review requests:")?;
        for reviewer in &pr.reviewers {
            writeln!(writer, "\tLogin: {}", reviewer.login)?;
            writeln!(writer, "\tId: {}", reviewer.id)?;
            writeln!(writer, "\tType: {}", reviewer.kind)?;
        }

        writeln!(writer, "{}", "*".repeat(RECORD_SEPARATOR_WIDTH))?;
    }
    writer.flush()
}

/// Human-readable listing, one block per pull request.
pub fn print_pull_requests<W: Write>(prs: &[PullRequest], writer: &mut W) -> Result<()> {
    write_listing(prs, writer).map_err(stdout_error)
}

pub fn export<W: Write>(
    prs: &[PullRequest],
    destination: &Destination,
    stdout: &mut W,
) -> Result<()> {
    match destination {
        Destination::Stdout => print_pull_requests(prs, stdout),
        Destination::Csv(path) => save_csv(prs, path),
    }
}

/// Fetches the listing and hands it to the exporter. Nothing is written
/// unless the fetch succeeded. Returns the number of exported pull requests.
pub async fn run_export<F, W>(
    spec: &ExportSpec,
    destination: &Destination,
    forge: &F,
    stdout: &mut W,
) -> Result<usize>
where
    F: Forge + Sync,
    W: Write,
{
    let prs = fetch_pull_requests(spec, forge).await?;
    export(&prs, destination, stdout)?;
    Ok(prs.len())
}
