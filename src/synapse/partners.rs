//! Listing of postsynaptic targets per connector.

use crate::model::ConnectorId;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Id of a postsynaptic target as reported by the data source
/// (a treenode or skeleton id, depending on the source).
pub type TargetId = i64;

/// Mapping `connector id -> postsynaptic target ids`, fetched separately
/// from the skeleton records and used to weight presynaptic connectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartnerListing {
    targets: AHashMap<ConnectorId, Vec<TargetId>>,
}

impl PartnerListing {
    /// Creates an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `target` as postsynaptic partner of `connector`.
    pub fn add_target(&mut self, connector: ConnectorId, target: TargetId) {
        self.targets.entry(connector).or_default().push(target);
    }

    /// Adds all entries of `other` to this listing.
    pub fn merge(&mut self, other: PartnerListing) {
        for (connector, targets) in other.targets {
            self.targets.entry(connector).or_default().extend(targets);
        }
    }

    /// Returns the targets recorded for `connector` (possibly with repeats).
    pub fn targets(&self, connector: ConnectorId) -> &[TargetId] {
        self.targets
            .get(&connector)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the number of distinct targets of `connector`;
    /// `0` if the connector is not listed.
    pub fn distinct_count(&self, connector: ConnectorId) -> usize {
        self.targets(connector)
            .iter()
            .collect::<AHashSet<_>>()
            .len()
    }

    /// Returns the number of listed connectors.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if no connector is listed.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<(ConnectorId, TargetId)> for PartnerListing {
    fn from_iter<I: IntoIterator<Item = (ConnectorId, TargetId)>>(iter: I) -> Self {
        let mut listing = PartnerListing::new();
        for (connector, target) in iter {
            listing.add_target(connector, target);
        }
        listing
    }
}
