use clap::Parser;
use collect_code::{cli::Cli, run};

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(format!("collect_code={level}")),
    )
    .format_timestamp(None)
    .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity());
    run(cli.command)
}
