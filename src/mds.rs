use std::collections::BTreeSet;

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable,
};
use petgraph::graph::NodeIndex;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::network::InteractionNetwork;

/// A minimum dominating set, members sorted by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DominatingSet {
    pub members: BTreeSet<String>,
}

impl DominatingSet {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Share of the network covered by the set, in [0, 1].
    pub fn fraction_of(&self, network: &InteractionNetwork) -> f64 {
        if self.is_empty() || network.is_empty() {
            0.0
        } else {
            self.len() as f64 / network.node_count() as f64
        }
    }
}

/// Solves the 0/1 program
///
/// ```text
/// minimise   Σ x_v
/// subject to x_v + Σ_{u ∈ N(v)} x_u ≥ 1   for every node v
///            x_v ∈ {0, 1}
/// ```
///
/// With `canonical` set, node `v` costs `n (n + 1) + rank(v) + 1` where
/// `rank` orders identifiers ascending. The rank terms add up to at most
/// half the base cost, so the optimum still has minimum cardinality and
/// among those the set with the smallest identifier rank sum is returned.
/// Costs stay integral so HiGHS separates them exactly once both MIP gaps
/// are zero.
pub fn solve_minimum_dominating_set(
    network: &InteractionNetwork,
    canonical: bool,
) -> Result<DominatingSet> {
    if network.is_empty() {
        return Ok(DominatingSet::default());
    }

    let nodes: Vec<NodeIndex> = network.node_indices().collect();
    let weights = objective_weights(network, &nodes, canonical);

    let mut vars = ProblemVariables::new();
    let x: Vec<Variable> = nodes
        .iter()
        .map(|_| vars.add(variable().binary()))
        .collect();

    let objective: Expression = x
        .iter()
        .zip(&weights)
        .map(|(&var, &weight)| weight * var)
        .sum();

    let mut model = vars
        .minimise(objective)
        .using(highs)
        .set_option("output_flag", false)
        .set_option("mip_rel_gap", 0.0)
        .set_option("mip_abs_gap", 0.0);
    for &node in &nodes {
        let mut cover = Expression::from(x[node.index()]);
        for neighbor in network.neighbors(node) {
            cover += x[neighbor.index()];
        }
        model = model.with(constraint!(cover >= 1));
    }

    debug!(
        variables = nodes.len(),
        constraints = nodes.len(),
        canonical,
        "solving dominating set program"
    );
    let solution = model.solve()?;

    let members: BTreeSet<String> = nodes
        .iter()
        .filter(|node| solution.value(x[node.index()]) > 0.5)
        .map(|&node| network.name(node).to_string())
        .collect();
    let set = DominatingSet { members };

    let undominated = undominated_count(network, &set.members);
    if undominated > 0 {
        return Err(AnalysisError::NotDominating { undominated });
    }

    info!(size = set.len(), "minimum dominating set found");
    Ok(set)
}

fn objective_weights(
    network: &InteractionNetwork,
    nodes: &[NodeIndex],
    canonical: bool,
) -> Vec<f64> {
    if !canonical {
        return vec![1.0; nodes.len()];
    }

    let n = nodes.len() as f64;
    let base = n * (n + 1.0);
    let mut by_name: Vec<NodeIndex> = nodes.to_vec();
    by_name.sort_by(|&a, &b| network.name(a).cmp(network.name(b)));

    let mut weights = vec![1.0; nodes.len()];
    for (rank, node) in by_name.into_iter().enumerate() {
        weights[node.index()] = base + rank as f64 + 1.0;
    }
    weights
}

/// Number of nodes that are neither in `set` nor adjacent to a member.
pub fn undominated_count(network: &InteractionNetwork, set: &BTreeSet<String>) -> usize {
    network
        .node_indices()
        .filter(|&node| {
            !set.contains(network.name(node))
                && !network
                    .neighbors(node)
                    .any(|neighbor| set.contains(network.name(neighbor)))
        })
        .count()
}
