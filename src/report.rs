use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::pipeline::Analysis;

pub const SUMMARY_FILE: &str = "summary.json";
const HIDDEN_SAMPLE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub nodes: usize,
    pub edges: usize,
    pub mds_size: usize,
    /// MDS size as a percentage of the node count.
    pub mds_percent: f64,
    pub hub_count: usize,
    pub intersection: usize,
    pub hidden_critical: usize,
    pub pure_hub: usize,
    pub hidden_critical_sample: Vec<String>,
    pub mds_members: Vec<String>,
    pub hubs: Vec<(String, usize)>,
    pub load_seconds: f64,
    pub solve_seconds: f64,
    pub render_seconds: f64,
    pub elapsed_seconds: f64,
    pub config: AnalysisConfig,
}

impl Summary {
    pub fn new(analysis: &Analysis, config: &AnalysisConfig, elapsed_seconds: f64) -> Self {
        let cmp = &analysis.comparison;
        Summary {
            rows_read: analysis.load_stats.rows_read,
            rows_kept: analysis.load_stats.rows_kept,
            nodes: analysis.network.node_count(),
            edges: analysis.network.edge_count(),
            mds_size: analysis.mds.len(),
            mds_percent: analysis.mds.fraction_of(&analysis.network) * 100.0,
            hub_count: analysis.hubs.len(),
            intersection: cmp.intersection.len(),
            hidden_critical: cmp.hidden_critical.len(),
            pure_hub: cmp.pure_hub.len(),
            hidden_critical_sample: cmp.hidden_sample(HIDDEN_SAMPLE),
            mds_members: analysis.mds.members.iter().cloned().collect(),
            hubs: analysis.hubs.ranked.clone(),
            load_seconds: analysis.timings.load.as_secs_f64(),
            solve_seconds: analysis.timings.solve.as_secs_f64(),
            render_seconds: analysis.timings.render.as_secs_f64(),
            elapsed_seconds,
            config: config.clone(),
        }
    }

    pub fn write_json(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| AnalysisError::io(dir, e))?;
        let path = dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| AnalysisError::io(&path, e))?;
        Ok(path)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(40);
        let thin = "-".repeat(40);
        writeln!(f, "{rule}")?;
        writeln!(f, "     MDS vs HUB SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "Elapsed: {:.2} s (load {:.2}, solve {:.2}, figures {:.2})",
            self.elapsed_seconds, self.load_seconds, self.solve_seconds, self.render_seconds
        )?;
        writeln!(f, "Genes: {} | Interactions: {}", self.nodes, self.edges)?;
        writeln!(
            f,
            "MDS size: {} ({:.1}% of the network)",
            self.mds_size, self.mds_percent
        )?;
        writeln!(f, "Hubs: {}", self.hub_count)?;
        writeln!(f, "{thin}")?;
        writeln!(f, "1. Purple (hub + MDS): {}", self.intersection)?;
        writeln!(f, "2. Red (hidden critical): {}", self.hidden_critical)?;
        writeln!(f, "3. Blue (hub only): {}", self.pure_hub)?;
        writeln!(f, "{thin}")?;
        writeln!(
            f,
            "Sample hidden critical genes: [{}]",
            self.hidden_critical_sample.join(", ")
        )?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::SetComparison;
    use crate::hubs::HubSet;
    use crate::mds::DominatingSet;
    use crate::network::tests::network;
    use crate::pipeline::{LoadStats, Timings};

    fn sample_analysis() -> Analysis {
        let net = network(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "F")]);
        let mds = DominatingSet {
            members: ["B".to_string(), "E".to_string()].into_iter().collect(),
        };
        let hubs = HubSet {
            ranked: vec![("B".to_string(), 2), ("C".to_string(), 2)],
        };
        let comparison = SetComparison::new(&hubs.names(), &mds.members);
        Analysis {
            network: net,
            mds,
            hubs,
            comparison,
            load_stats: LoadStats {
                rows_read: 7,
                rows_kept: 5,
            },
            timings: Timings::default(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let config = AnalysisConfig::new("veri.tsv");
        let summary = Summary::new(&sample_analysis(), &config, 1.5);
        assert_eq!(summary.nodes, 6);
        assert_eq!(summary.edges, 5);
        assert_eq!(summary.mds_size, 2);
        assert!((summary.mds_percent - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.intersection, 1);
        assert_eq!(summary.hidden_critical_sample, vec!["E"]);
        assert_eq!(summary.pure_hub, 1);

        let text = summary.to_string();
        assert!(text.contains("MDS size: 2 (33.3% of the network)"));
        assert!(text.contains("Sample hidden critical genes: [E]"));
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::new("veri.tsv");
        let summary = Summary::new(&sample_analysis(), &config, 0.25);
        let path = summary.write_json(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), SUMMARY_FILE);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["mds_size"], 2);
        assert_eq!(value["config"]["threshold"], 0.4);
        assert_eq!(value["hubs"][0][0], "B");
    }
}
