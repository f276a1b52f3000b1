use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::hubs::HubPolicy;

pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Spring layout parameters shared by every rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub seed: u64,
    /// Optimal distance between nodes.
    pub k: f64,
    pub iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            seed: 42,
            k: 0.55,
            iterations: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    /// Rows whose confidence score is below this value are dropped.
    pub threshold: f64,
    pub output_dir: PathBuf,
    pub hub_fraction: f64,
    pub hub_minimum: usize,
    /// Prefer the minimum dominating set with the smallest node ids.
    pub canonical_mds: bool,
    pub layout: LayoutConfig,
    pub dpi: u32,
    /// Open every written image with the platform viewer.
    pub show: bool,
    /// Also write `summary.json` next to the figures.
    pub write_summary: bool,
}

impl AnalysisConfig {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        let output_dir = default_output_dir(&input_path);
        let hubs = HubPolicy::default();
        AnalysisConfig {
            input_path,
            threshold: DEFAULT_THRESHOLD,
            output_dir,
            hub_fraction: hubs.fraction,
            hub_minimum: hubs.minimum,
            canonical_mds: true,
            layout: LayoutConfig::default(),
            dpi: 300,
            show: false,
            write_summary: false,
        }
    }

    /// Builds the configuration from positional arguments (program name
    /// already skipped): `<edges.tsv> [threshold] [output_dir]`.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let input = args.next().ok_or_else(|| {
            AnalysisError::Config("usage: mds_network <edges.tsv> [threshold] [output_dir]".into())
        })?;
        let mut config = AnalysisConfig::new(input);

        if let Some(raw) = args.next() {
            let threshold: f64 = raw
                .trim()
                .parse()
                .map_err(|_| AnalysisError::Config(format!("threshold {raw:?} is not a number")))?;
            if !threshold.is_finite() {
                return Err(AnalysisError::Config(format!(
                    "threshold {raw:?} must be finite"
                )));
            }
            config.threshold = threshold;
        }
        if let Some(dir) = args.next() {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(extra) = args.next() {
            return Err(AnalysisError::Config(format!("unexpected argument {extra:?}")));
        }

        Ok(config)
    }
}

fn default_output_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_follow_input_location() {
        let config = AnalysisConfig::from_args(args(&["data/veri.tsv"])).unwrap();
        assert_eq!(config.threshold, 0.4);
        assert_eq!(config.output_dir, PathBuf::from("data"));
        assert_eq!(config.hub_minimum, 5);
        assert_eq!(config.hub_fraction, 0.10);
        assert!(!config.write_summary);
        assert!(!config.show);
        assert_eq!(config.layout, LayoutConfig::default());

        let bare = AnalysisConfig::from_args(args(&["veri.tsv"])).unwrap();
        assert_eq!(bare.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_positional_overrides() {
        let config = AnalysisConfig::from_args(args(&["veri.tsv", "0.7", "out"])).unwrap();
        assert_eq!(config.threshold, 0.7);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(AnalysisConfig::from_args(args(&[])).is_err());
        assert!(AnalysisConfig::from_args(args(&["veri.tsv", "high"])).is_err());
        assert!(AnalysisConfig::from_args(args(&["veri.tsv", "NaN"])).is_err());
        assert!(AnalysisConfig::from_args(args(&["veri.tsv", "0.4", "out", "x"])).is_err());
    }
}
