mod compare;
mod config;
mod error;
mod hubs;
mod layout;
mod loader;
mod mds;
mod network;
mod pipeline;
mod render;
mod report;

use std::error::Error;
use std::time::Instant;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::pipeline::{analyze, load_network};
use crate::report::Summary;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let started = Instant::now();

    // Bad arguments or an unreadable edge list end the run with a message.
    let loaded = AnalysisConfig::from_args(std::env::args().skip(1))
        .and_then(|config| load_network(&config).map(|loaded| (config, loaded)));
    let (config, (network, stats)) = match loaded {
        Ok(loaded) => loaded,
        Err(err) if err.is_input_error() => exit_on_input_error(err),
        Err(err) => return Err(err.into()),
    };
    let load = started.elapsed();
    info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        seconds = load.as_secs_f64(),
        "step 1: network loaded"
    );

    info!("step 2: solving minimum dominating set");
    let mut analysis = analyze(network, stats, &config)?;
    analysis.timings.load = load;

    info!("step 3: drawing figures");
    let written = analysis.render(&config)?;
    info!(files = written.len(), "figures written");

    let summary = Summary::new(&analysis, &config, started.elapsed().as_secs_f64());
    if config.write_summary {
        let path = summary.write_json(&config.output_dir)?;
        info!(path = %path.display(), "summary saved");
    }
    println!();
    println!("{summary}");

    Ok(())
}

fn exit_on_input_error(err: AnalysisError) -> ! {
    eprintln!("!!! error: {err}");
    std::process::exit(1)
}
