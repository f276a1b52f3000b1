use std::collections::BTreeSet;

use serde::Serialize;

/// Hub set and dominating set split into three disjoint groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetComparison {
    /// Hubs that are also in the dominating set.
    pub intersection: BTreeSet<String>,
    /// Dominating set members that are not hubs.
    pub hidden_critical: BTreeSet<String>,
    /// Hubs left out of the dominating set.
    pub pure_hub: BTreeSet<String>,
}

impl SetComparison {
    pub fn new(hubs: &BTreeSet<String>, mds: &BTreeSet<String>) -> Self {
        SetComparison {
            intersection: hubs.intersection(mds).cloned().collect(),
            hidden_critical: mds.difference(hubs).cloned().collect(),
            pure_hub: hubs.difference(mds).cloned().collect(),
        }
    }

    pub fn union(&self) -> BTreeSet<String> {
        self.intersection
            .iter()
            .chain(&self.hidden_critical)
            .chain(&self.pure_hub)
            .cloned()
            .collect()
    }

    /// Up to `n` hidden critical identifiers in ascending order.
    pub fn hidden_sample(&self, n: usize) -> Vec<String> {
        self.hidden_critical.iter().take(n).cloned().collect()
    }
}
