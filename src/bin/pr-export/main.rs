use pr_export::{Error, GitHub, parse_args, run_export};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

/// Logs go to stderr so stdout carries only the printed listing.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let (spec, destination) = match parse_args(std::env::args_os()) {
        Ok(result) => result,
        // Help and version exit 0 on stdout; usage errors exit 2 on stderr.
        Err(Error::Cli(clap_err)) => clap_err.exit(),
        Err(err) => return Err(err.into()),
    };

    let github = GitHub::from_env(spec.api_url.as_deref())?;
    let mut stdout = std::io::stdout().lock();
    run_export(&spec, &destination, &github, &mut stdout).await?;

    Ok(())
}
