use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::compare::SetComparison;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::hubs::{select_hubs, HubPolicy, HubSet};
use crate::layout::spring_layout;
use crate::loader::read_edges;
use crate::mds::{solve_minimum_dominating_set, DominatingSet};
use crate::network::InteractionNetwork;
use crate::render::{render_all, View};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_kept: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Timings {
    pub load: Duration,
    pub solve: Duration,
    pub render: Duration,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub network: InteractionNetwork,
    pub mds: DominatingSet,
    pub hubs: HubSet,
    pub comparison: SetComparison,
    pub load_stats: LoadStats,
    pub timings: Timings,
}

/// Reads and filters the edge list, builds the graph and keeps its largest
/// connected component.
pub fn load_network(config: &AnalysisConfig) -> Result<(InteractionNetwork, LoadStats)> {
    let list = read_edges(&config.input_path)?;
    let kept = list.filtered(config.threshold);
    let stats = LoadStats {
        rows_read: list.edges.len(),
        rows_kept: kept.edges.len(),
    };
    info!(
        rows = stats.rows_read,
        kept = stats.rows_kept,
        threshold = config.threshold,
        score_column = kept.score_column(),
        "edge list filtered"
    );

    let network = InteractionNetwork::from_edges(&kept.edges).largest_component();
    debug_assert!(network.is_connected());
    if network.is_empty() {
        warn!("no interaction reaches the threshold, continuing with an empty graph");
    }
    Ok((network, stats))
}

/// Computes the dominating set, the hubs and their comparison.
pub fn analyze(
    network: InteractionNetwork,
    load_stats: LoadStats,
    config: &AnalysisConfig,
) -> Result<Analysis> {
    let started = Instant::now();
    let mds = solve_minimum_dominating_set(&network, config.canonical_mds)?;
    let solve = started.elapsed();

    let policy = HubPolicy {
        fraction: config.hub_fraction,
        minimum: config.hub_minimum,
    };
    let hubs = select_hubs(&network, &policy);
    let comparison = SetComparison::new(&hubs.names(), &mds.members);
    info!(
        hubs = hubs.len(),
        shared = comparison.intersection.len(),
        hidden_critical = comparison.hidden_critical.len(),
        "hub comparison done"
    );

    Ok(Analysis {
        network,
        mds,
        hubs,
        comparison,
        load_stats,
        timings: Timings {
            solve,
            ..Timings::default()
        },
    })
}

impl Analysis {
    /// The four figures, in output order.
    pub fn views(&self) -> Vec<View> {
        vec![
            View::raw_network(&self.network),
            View::hubs(&self.network, &self.hubs.names()),
            View::mds(&self.network, &self.mds.members),
            View::comparison(&self.network, &self.comparison),
        ]
    }

    pub fn render(&mut self, config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
        let started = Instant::now();
        let layout = spring_layout(&self.network, &config.layout);
        let written = render_all(
            &self.views(),
            &self.network,
            &layout,
            &config.output_dir,
            config.dpi,
            config.show,
        )?;
        self.timings.render = started.elapsed();
        Ok(written)
    }
}
