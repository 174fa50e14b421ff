use anyhow::Result;
use clap::Parser;
use fundfolio::cli::Cli;
use fundfolio::config::Config;
use fundfolio::dispatcher::{dispatch_command, AppContext};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "fundfolio=debug"
    } else {
        "fundfolio=warn"
    };

    // Logs go to stderr so --json output on stdout stays parseable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db_path) = cli.db {
        config.db_path = Some(db_path);
    }

    let ctx = AppContext::new(config, cli.json);
    dispatch_command(cli.command, &ctx)
}
