use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use petgraph::graph::NodeIndex;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{info, warn};

use crate::compare::SetComparison;
use crate::error::{AnalysisError, Result};
use crate::layout::Layout;
use crate::network::InteractionNetwork;

const BACKGROUND_NODE: RGBColor = RGBColor(0xEE, 0xEE, 0xEE);
const RAW_NODE: RGBColor = RGBColor(0xCC, 0xCC, 0xCC);
const FADED_NODE: RGBColor = RGBColor(0xF5, 0xF5, 0xF5);
const HUB_BLUE: RGBColor = RGBColor(0x00, 0x00, 0xFF);
const MDS_RED: RGBColor = RGBColor(0xFF, 0x00, 0x00);
const PURPLE: RGBColor = RGBColor(0x80, 0x00, 0x80);
const EDGE_GREY: RGBColor = RGBColor(0x55, 0x55, 0x55);
const EDGE_DARK: RGBColor = RGBColor(0x33, 0x33, 0x33);
const EDGE_ALPHA: f64 = 0.05;
const TITLE_POINTS: f64 = 14.0;
const AXIS_RANGE: f64 = 1.1;

/// Marker look of a single node. `size` is a marker area in points², the
/// unit scatter plots use for node sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub color: RGBColor,
    pub size: f64,
    pub outlined: bool,
}

impl NodeStyle {
    const fn new(color: RGBColor, size: f64, outlined: bool) -> Self {
        NodeStyle {
            color,
            size,
            outlined,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
}

/// Everything needed to draw one figure, independent of the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub file_name: &'static str,
    pub title: String,
    /// Width and height in inches.
    pub figure_size: (f64, f64),
    /// One style per node, indexed like the network.
    pub node_styles: Vec<NodeStyle>,
    pub labels: BTreeSet<NodeIndex>,
    pub label_points: f64,
    pub edge_color: RGBColor,
    pub legend: Vec<LegendEntry>,
    pub legend_points: f64,
}

impl View {
    pub fn raw_network(network: &InteractionNetwork) -> Self {
        View {
            file_name: "1_Ham_Ag.png",
            title: "1. Ham Protein Ağı".to_string(),
            figure_size: (12.0, 10.0),
            node_styles: vec![NodeStyle::new(RAW_NODE, 30.0, false); network.node_count()],
            labels: BTreeSet::new(),
            label_points: 8.0,
            edge_color: EDGE_GREY,
            legend: Vec::new(),
            legend_points: 10.0,
        }
    }

    pub fn hubs(network: &InteractionNetwork, hubs: &BTreeSet<String>) -> Self {
        let highlight = NodeStyle::new(HUB_BLUE, 250.0, false);
        let plain = NodeStyle::new(BACKGROUND_NODE, 30.0, false);
        View {
            file_name: "2_Hub_Analizi.png",
            title: "2. Klasik Yaklaşım: Hub Analizi".to_string(),
            figure_size: (12.0, 10.0),
            node_styles: styles_by_membership(network, hubs, highlight, plain),
            labels: indices_of(network, hubs),
            label_points: 8.0,
            edge_color: EDGE_GREY,
            legend: vec![LegendEntry {
                label: "Hub (Merkezi)".to_string(),
                color: HUB_BLUE,
            }],
            legend_points: 10.0,
        }
    }

    pub fn mds(network: &InteractionNetwork, mds: &BTreeSet<String>) -> Self {
        let highlight = NodeStyle::new(MDS_RED, 250.0, true);
        let plain = NodeStyle::new(BACKGROUND_NODE, 30.0, true);
        View {
            file_name: "3_MDS_Sonucu.png",
            title: format!("3. MDS Yöntemi ({} Gen)", mds.len()),
            figure_size: (12.0, 10.0),
            node_styles: styles_by_membership(network, mds, highlight, plain),
            labels: indices_of(network, mds),
            label_points: 9.0,
            edge_color: EDGE_GREY,
            legend: vec![LegendEntry {
                label: "MDS (Kritik)".to_string(),
                color: MDS_RED,
            }],
            legend_points: 10.0,
        }
    }

    pub fn comparison(network: &InteractionNetwork, cmp: &SetComparison) -> Self {
        let node_styles = network
            .node_indices()
            .map(|node| {
                let name = network.name(node);
                if cmp.intersection.contains(name) {
                    NodeStyle::new(PURPLE, 300.0, true)
                } else if cmp.hidden_critical.contains(name) {
                    NodeStyle::new(MDS_RED, 300.0, true)
                } else if cmp.pure_hub.contains(name) {
                    NodeStyle::new(HUB_BLUE, 150.0, true)
                } else {
                    NodeStyle::new(FADED_NODE, 20.0, true)
                }
            })
            .collect();

        View {
            file_name: "4_Final_Karsilastirma.png",
            title: "4. Detaylı Karşılaştırma".to_string(),
            figure_size: (14.0, 12.0),
            node_styles,
            labels: indices_of(network, &cmp.union()),
            label_points: 8.0,
            edge_color: EDGE_DARK,
            legend: vec![
                LegendEntry {
                    label: format!("Hem Hub Hem MDS ({})", cmp.intersection.len()),
                    color: PURPLE,
                },
                LegendEntry {
                    label: format!("GİZLİ KRİTİK (Sadece MDS) ({})", cmp.hidden_critical.len()),
                    color: MDS_RED,
                },
                LegendEntry {
                    label: format!("Sadece Hub ({})", cmp.pure_hub.len()),
                    color: HUB_BLUE,
                },
            ],
            legend_points: 11.0,
        }
    }

    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let (w, h) = self.figure_size;
        (
            (w * dpi as f64).round() as u32,
            (h * dpi as f64).round() as u32,
        )
    }

    /// Nodes in drawing order: small markers first so highlighted nodes stay
    /// on top.
    fn draw_order(&self) -> Vec<NodeIndex> {
        let mut order: Vec<NodeIndex> = (0..self.node_styles.len()).map(NodeIndex::new).collect();
        order.sort_by(|a, b| {
            self.node_styles[a.index()]
                .size
                .total_cmp(&self.node_styles[b.index()].size)
        });
        order
    }
}

fn styles_by_membership(
    network: &InteractionNetwork,
    members: &BTreeSet<String>,
    highlight: NodeStyle,
    plain: NodeStyle,
) -> Vec<NodeStyle> {
    network
        .node_indices()
        .map(|node| {
            if members.contains(network.name(node)) {
                highlight
            } else {
                plain
            }
        })
        .collect()
}

fn indices_of(network: &InteractionNetwork, names: &BTreeSet<String>) -> BTreeSet<NodeIndex> {
    names
        .iter()
        .filter_map(|name| network.index_of(name))
        .collect()
}

fn points_to_px(points: f64, dpi: u32) -> f64 {
    points * dpi as f64 / 72.0
}

/// Radius in pixels of a marker whose area is `size` points².
fn marker_radius(size: f64, dpi: u32) -> i32 {
    (points_to_px(size.sqrt() / 2.0, dpi).round() as i32).max(1)
}

pub fn render_view(
    view: &View,
    network: &InteractionNetwork,
    layout: &Layout,
    path: &Path,
    dpi: u32,
) -> Result<()> {
    let root = BitMapBackend::new(path, view.pixel_size(dpi)).into_drawing_area();
    root.fill(&WHITE).map_err(AnalysisError::render)?;

    let root = if view.title.is_empty() {
        root
    } else {
        let title_font = FontDesc::new(
            FontFamily::SansSerif,
            points_to_px(TITLE_POINTS, dpi),
            FontStyle::Bold,
        );
        root.titled(&view.title, title_font)
            .map_err(AnalysisError::render)?
    };

    let margin = points_to_px(10.0, dpi).round() as u32;
    let mut chart = ChartBuilder::on(&root)
        .margin(margin)
        .build_cartesian_2d(-AXIS_RANGE..AXIS_RANGE, -AXIS_RANGE..AXIS_RANGE)
        .map_err(AnalysisError::render)?;

    let edge_style = view.edge_color.mix(EDGE_ALPHA).stroke_width(1);
    chart
        .draw_series(network.edges().map(|(a, b)| {
            PathElement::new(vec![layout.position(a), layout.position(b)], edge_style)
        }))
        .map_err(AnalysisError::render)?;

    let outline_width = points_to_px(0.5, dpi).round().max(1.0) as u32;
    chart
        .draw_series(view.draw_order().into_iter().map(|node| {
            let style = view.node_styles[node.index()];
            let radius = marker_radius(style.size, dpi);
            let outline = if style.outlined { BLACK } else { style.color };
            EmptyElement::at(layout.position(node))
                + Circle::new((0, 0), radius, style.color.filled())
                + Circle::new((0, 0), radius, outline.stroke_width(outline_width))
        }))
        .map_err(AnalysisError::render)?;

    if !view.labels.is_empty() {
        let label_style = FontDesc::new(
            FontFamily::SansSerif,
            points_to_px(view.label_points, dpi),
            FontStyle::Bold,
        )
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series(view.labels.iter().map(|&node| {
                Text::new(
                    network.name(node).to_string(),
                    layout.position(node),
                    label_style.clone(),
                )
            }))
            .map_err(AnalysisError::render)?;
    }

    if !view.legend.is_empty() {
        let half = (points_to_px(view.legend_points, dpi) / 2.0).round() as i32;
        for entry in &view.legend {
            let color = entry.color;
            chart
                .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
                .map_err(AnalysisError::render)?
                .label(entry.label.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - half), (x + 2 * half, y + half)], color.filled())
                });
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(FontDesc::new(
                FontFamily::SansSerif,
                points_to_px(view.legend_points, dpi),
                FontStyle::Normal,
            ))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(AnalysisError::render)?;
    }

    root.present().map_err(AnalysisError::render)?;
    Ok(())
}

/// Draws every view into `output_dir` and returns the written files.
pub fn render_all(
    views: &[View],
    network: &InteractionNetwork,
    layout: &Layout,
    output_dir: &Path,
    dpi: u32,
    show: bool,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| AnalysisError::io(output_dir, e))?;

    let mut written = Vec::with_capacity(views.len());
    for view in views {
        let path = output_dir.join(view.file_name);
        render_view(view, network, layout, &path, dpi)?;
        info!(file = view.file_name, "saved figure");
        if show {
            open_image(&path);
        }
        written.push(path);
    }
    Ok(written)
}

/// Hands the image to the desktop viewer. Failing to launch one is not fatal.
fn open_image(path: &Path) {
    let status = if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", ""]).arg(path).status()
    } else if cfg!(target_os = "macos") {
        Command::new("open").arg(path).status()
    } else {
        Command::new("xdg-open").arg(path).status()
    };

    if let Err(err) = status {
        warn!(path = %path.display(), %err, "could not open image viewer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::spring_layout;
    use crate::network::tests::network;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn star() -> InteractionNetwork {
        network(&[("C", "L1"), ("C", "L2"), ("C", "L3"), ("C", "L4"), ("C", "L5")])
    }

    #[test]
    fn test_raw_view_is_uniform() {
        let net = star();
        let view = View::raw_network(&net);
        assert_eq!(view.file_name, "1_Ham_Ag.png");
        assert_eq!(view.node_styles.len(), 6);
        assert!(view
            .node_styles
            .iter()
            .all(|s| s.color == RAW_NODE && s.size == 30.0));
        assert!(view.labels.is_empty());
        assert!(view.legend.is_empty());
    }

    #[test]
    fn test_hub_view_highlights_and_labels_hubs() {
        let net = star();
        let view = View::hubs(&net, &set(&["C"]));
        let c = net.index_of("C").unwrap();
        let leaf = net.index_of("L3").unwrap();
        assert_eq!(view.node_styles[c.index()].color, HUB_BLUE);
        assert_eq!(view.node_styles[c.index()].size, 250.0);
        assert_eq!(view.node_styles[leaf.index()].size, 30.0);
        assert_eq!(view.labels, BTreeSet::from([c]));
        assert_eq!(view.legend[0].label, "Hub (Merkezi)");
    }

    #[test]
    fn test_mds_view_title_counts_members() {
        let net = star();
        let view = View::mds(&net, &set(&["C"]));
        assert_eq!(view.title, "3. MDS Yöntemi (1 Gen)");
        assert!(view.node_styles.iter().all(|s| s.outlined));
    }

    #[test]
    fn test_comparison_view_colours_partitions() {
        let net = network(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")]);
        let cmp = SetComparison::new(&set(&["B", "C"]), &set(&["B", "E"]));
        let view = View::comparison(&net, &cmp);
        let style = |name: &str| view.node_styles[net.index_of(name).unwrap().index()];

        assert_eq!(style("B").color, PURPLE);
        assert_eq!(style("E").color, MDS_RED);
        assert_eq!(style("C").color, HUB_BLUE);
        assert_eq!(style("C").size, 150.0);
        assert_eq!(style("A").color, FADED_NODE);
        assert_eq!(view.labels.len(), 3);
        assert_eq!(view.legend[1].label, "GİZLİ KRİTİK (Sadece MDS) (1)");
        assert_eq!(view.pixel_size(300), (4200, 3600));
    }

    #[test]
    fn test_draw_order_puts_highlights_last() {
        let net = star();
        let view = View::hubs(&net, &set(&["C"]));
        let order = view.draw_order();
        assert_eq!(order.last().copied(), net.index_of("C"));
        assert_eq!(order.len(), 6);
    }

    /// Width and height from the IHDR chunk of a PNG file.
    fn png_dimensions(path: &Path) -> (u32, u32) {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(&bytes[12..16], b"IHDR");
        let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
        (width, height)
    }

    #[test]
    fn test_render_view_pixel_size() {
        let dir = tempfile::tempdir().unwrap();
        let net = star();
        let layout = spring_layout(&net, &LayoutConfig::default());
        let mut view = View::raw_network(&net);
        view.title.clear();

        let path = dir.path().join(view.file_name);
        render_view(&view, &net, &layout, &path, 300).unwrap();
        assert_eq!(png_dimensions(&path), (3600, 3000));
    }

    #[test]
    fn test_render_all_into_unwritable_dir() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let output_dir = file.path().join("figures");
        let net = star();
        let layout = spring_layout(&net, &LayoutConfig::default());
        let views = vec![View::raw_network(&net)];

        let err = render_all(&views, &net, &layout, &output_dir, 300, false).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { ref path, .. } if path == &output_dir));
    }

    #[test]
    fn test_marker_radius_scales_with_dpi() {
        assert_eq!(marker_radius(30.0, 72), 3);
        assert_eq!(marker_radius(250.0, 300), 33);
        assert_eq!(marker_radius(0.0, 300), 1);
    }
}
