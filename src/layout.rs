use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;
use crate::network::InteractionNetwork;

const MIN_DISTANCE: f64 = 0.01;
const CONVERGENCE: f64 = 1e-4;

/// Node coordinates indexed like the network's nodes, centred on the origin
/// with the largest absolute coordinate equal to one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub positions: Vec<(f64, f64)>,
}

impl Layout {
    pub fn position(&self, node: petgraph::graph::NodeIndex) -> (f64, f64) {
        self.positions[node.index()]
    }
}

/// Fruchterman-Reingold force directed placement.
///
/// Every pair of nodes repels with `k² / d`, every edge attracts with
/// `d² / k`. Steps are capped by a temperature that starts at a tenth of the
/// initial spread and cools linearly to zero.
pub fn spring_layout(network: &InteractionNetwork, config: &LayoutConfig) -> Layout {
    let n = network.node_count();
    match n {
        0 => return Layout::default(),
        1 => {
            return Layout {
                positions: vec![(0.0, 0.0)],
            }
        }
        _ => {}
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen::<f64>(), rng.gen::<f64>())).collect();

    let adjacency: Vec<Vec<usize>> = network
        .node_indices()
        .map(|node| network.neighbors(node).map(|other| other.index()).collect())
        .collect();

    let k = config.k;
    let mut t = spread(&pos) * 0.1;
    let dt = t / (config.iterations as f64 + 1.0);
    let mut displacement = vec![(0.0, 0.0); n];

    for _ in 0..config.iterations {
        for (i, disp) in displacement.iter_mut().enumerate() {
            let (mut fx, mut fy) = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (dx, dy, d) = offset(pos[i], pos[j]);
                let repulsion = k * k / (d * d);
                fx += dx * repulsion;
                fy += dy * repulsion;
            }
            for &j in &adjacency[i] {
                let (dx, dy, d) = offset(pos[i], pos[j]);
                let attraction = d / k;
                fx -= dx * attraction;
                fy -= dy * attraction;
            }
            *disp = (fx, fy);
        }

        let mut moved = 0.0;
        for (p, &(fx, fy)) in pos.iter_mut().zip(&displacement) {
            let mut length = fx.hypot(fy);
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let (sx, sy) = (fx * t / length, fy * t / length);
            p.0 += sx;
            p.1 += sy;
            moved += sx * sx + sy * sy;
        }

        t -= dt;
        if moved.sqrt() / (n as f64) < CONVERGENCE {
            break;
        }
    }

    rescale(&mut pos);
    Layout { positions: pos }
}

/// Vector from `b` to `a` and its length, clamped away from zero.
fn offset(a: (f64, f64), b: (f64, f64)) -> (f64, f64, f64) {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx, dy, dx.hypot(dy).max(MIN_DISTANCE))
}

fn spread(pos: &[(f64, f64)]) -> f64 {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in pos {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (max_x - min_x).max(max_y - min_y)
}

fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.1).sum::<f64>() / n;

    let mut limit: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= mean_x;
        p.1 -= mean_y;
        limit = limit.max(p.0.abs()).max(p.1.abs());
    }
    if limit > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= limit;
            p.1 /= limit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::network;

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        (a.0 - b.0).hypot(a.1 - b.1)
    }

    #[test]
    fn test_same_seed_same_layout() {
        let net = network(&[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"), ("A", "E")]);
        let config = LayoutConfig::default();
        let first = spring_layout(&net, &config);
        let second = spring_layout(&net, &config);
        assert_eq!(first, second);

        let other = spring_layout(
            &net,
            &LayoutConfig {
                seed: 7,
                ..config
            },
        );
        assert_ne!(first, other);
    }

    #[test]
    fn test_layout_is_normalised() {
        let net = network(&[("A", "B"), ("B", "C"), ("C", "D"), ("B", "E"), ("E", "F")]);
        let layout = spring_layout(&net, &LayoutConfig::default());
        assert_eq!(layout.positions.len(), 6);

        let max_abs = layout
            .positions
            .iter()
            .flat_map(|&(x, y)| [x.abs(), y.abs()])
            .fold(0.0, f64::max);
        assert!((max_abs - 1.0).abs() < 1e-9);

        let mean_x: f64 = layout.positions.iter().map(|p| p.0).sum::<f64>() / 6.0;
        let mean_y: f64 = layout.positions.iter().map(|p| p.1).sum::<f64>() / 6.0;
        assert!(mean_x.abs() < 1e-9 && mean_y.abs() < 1e-9);
    }

    #[test]
    fn test_path_ends_pushed_apart() {
        let net = network(&[("A", "B"), ("B", "C")]);
        let layout = spring_layout(&net, &LayoutConfig::default());
        let a = layout.position(net.index_of("A").unwrap());
        let b = layout.position(net.index_of("B").unwrap());
        let c = layout.position(net.index_of("C").unwrap());
        assert!(distance(a, c) > distance(a, b));
        assert!(distance(a, c) > distance(b, c));
    }

    #[test]
    fn test_self_loop_does_not_move_node() {
        let looped = network(&[("A", "A"), ("A", "B"), ("B", "C")]);
        let plain = network(&[("A", "B"), ("B", "C")]);
        let config = LayoutConfig::default();
        assert_eq!(spring_layout(&looped, &config), spring_layout(&plain, &config));
    }

    #[test]
    fn test_trivial_graphs() {
        let empty = InteractionNetwork::default();
        assert!(spring_layout(&empty, &LayoutConfig::default()).positions.is_empty());

        let single = network(&[("A", "A")]);
        assert_eq!(
            spring_layout(&single, &LayoutConfig::default()).positions,
            vec![(0.0, 0.0)]
        );
    }
}
