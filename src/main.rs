use std::io::{Read, Write};
use std::process::ExitCode;

use anyhow::Context;
use console::style;

use archgraph::Catalog;

fn run() -> anyhow::Result<()> {
    #[cfg(feature = "logging")]
    init_tracing();

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Couldn't read catalog from '{path}'"))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Couldn't read catalog from stdin")?;
            buffer
        }
    };

    let catalog = Catalog::from_json(&raw)?;
    let resolved = archgraph::resolve(catalog)?;

    // Nothing is written until the whole catalog resolved cleanly.
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &resolved)?;
    writeln!(stdout)?;

    Ok(())
}

#[cfg(feature = "logging")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
