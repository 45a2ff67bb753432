use std::io;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use runtee::cli;
use runtee::prefix::LineReassembler;
use runtee::subprocess::{ProcessCommandBuilder, Supervisor};

#[tokio::main]
async fn main() {
    // Logging goes to stderr; stdout is reserved for the child's prefixed
    // output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let options = match cli::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            print!("{}", cli::USAGE);
            std::process::exit(-1);
        }
    };

    if let Err(err) = run(options).await {
        eprintln!("{err}");
        std::process::exit(-1);
    }
}

async fn run(options: cli::Options) -> anyhow::Result<()> {
    let command = ProcessCommandBuilder::new(&options.program)
        .args(&options.args)
        .build();

    let supervisor = Supervisor::new(
        command,
        LineReassembler::new(options.out_prefix, io::stdout()),
        LineReassembler::new(options.err_prefix, io::stderr()),
    );

    let outcome = supervisor.run().await?;
    // The child's own exit code is deliberately not propagated; a
    // successful launch+wait+flush exits 0.
    debug!(status = ?outcome.status, "child finished");
    Ok(())
}
