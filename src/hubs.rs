use std::collections::BTreeSet;

use crate::network::InteractionNetwork;

/// How many of the best connected nodes count as hubs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HubPolicy {
    pub fraction: f64,
    pub minimum: usize,
}

impl Default for HubPolicy {
    fn default() -> Self {
        HubPolicy {
            fraction: 0.10,
            minimum: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubSet {
    /// Selected hubs with their degree, best connected first.
    pub ranked: Vec<(String, usize)>,
}

impl HubSet {
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.ranked.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// `max(minimum, round(fraction * n))`, never more than the node count.
pub fn hub_count(node_count: usize, policy: &HubPolicy) -> usize {
    let share = (policy.fraction * node_count as f64).round() as usize;
    share.max(policy.minimum).min(node_count)
}

/// Every node with its degree, sorted by descending degree. Equal degrees are
/// ordered by ascending identifier.
pub fn rank_by_degree(network: &InteractionNetwork) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = network
        .node_indices()
        .map(|node| (network.name(node).to_string(), network.degree(node)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn select_hubs(network: &InteractionNetwork, policy: &HubPolicy) -> HubSet {
    let k = hub_count(network.node_count(), policy);
    let mut ranked = rank_by_degree(network);
    ranked.truncate(k);
    HubSet { ranked }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::network;
    use rstest::rstest;

    #[rstest]
    #[case(40, 5)]
    #[case(200, 20)]
    #[case(55, 6)]
    #[case(3, 3)]
    #[case(0, 0)]
    fn test_hub_count(#[case] nodes: usize, #[case] expected: usize) {
        assert_eq!(hub_count(nodes, &HubPolicy::default()), expected);
    }

    #[test]
    fn test_ties_break_by_identifier() {
        // H has degree 3, B and D degree 2, the rest are leaves.
        let net = network(&[("E", "D"), ("D", "H"), ("H", "B"), ("B", "A"), ("H", "C")]);
        let ranked = rank_by_degree(&net);
        assert_eq!(ranked[0], ("H".to_string(), 3));
        assert_eq!(ranked[1], ("B".to_string(), 2));
        assert_eq!(ranked[2], ("D".to_string(), 2));
        assert_eq!(
            ranked[3..].iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            vec!["A", "C", "E"]
        );
    }

    #[test]
    fn test_select_hubs_with_small_minimum() {
        let net = network(&[("C", "L1"), ("C", "L2"), ("C", "L3"), ("C", "L4"), ("C", "L5")]);
        let policy = HubPolicy {
            fraction: 0.10,
            minimum: 1,
        };
        let hubs = select_hubs(&net, &policy);
        assert_eq!(hubs.ranked, vec![("C".to_string(), 5)]);

        let default_hubs = select_hubs(&net, &HubPolicy::default());
        assert_eq!(default_hubs.len(), 5);
        assert!(default_hubs.names().contains("C"));
        assert!(!default_hubs.names().contains("L5"));
    }
}
