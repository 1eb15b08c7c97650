//! Connector aggregation.
//!
//! Connector records are resolved against the positions of their carrier
//! nodes and split into presynaptic (outgoing) and postsynaptic (incoming)
//! sets. Presynaptic connectors are additionally weighted by the number of
//! distinct postsynaptic partners listed for them in a [PartnerListing].

pub mod partners;

pub use partners::{PartnerListing, TargetId};

use crate::error::{SkeletonError, SkeletonResult};
use crate::model::{
    Connector, ConnectorId, ConnectorRole, NodePositions, Point3, RawConnectorRecord,
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =#========================================================================#=
// CONNECTOR SET
// =#========================================================================#=
/// Connectors of one skeleton, partitioned by role.
///
/// Every input record ends up in exactly one of the two lists, in input order.
/// A connector id may occur more than once (e.g. a synapse received at two
/// nodes of the same skeleton); each occurrence is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSet {
    presynaptic: Vec<Connector>,
    postsynaptic: Vec<Connector>,
    partner_counts: IndexMap<ConnectorId, usize>,
}

impl ConnectorSet {
    /// Returns outgoing connectors.
    pub fn presynaptic(&self) -> &[Connector] {
        &self.presynaptic
    }

    /// Returns incoming connectors.
    pub fn postsynaptic(&self) -> &[Connector] {
        &self.postsynaptic
    }

    /// Returns connectors with the given role.
    pub fn with_role(&self, role: ConnectorRole) -> &[Connector] {
        match role {
            ConnectorRole::Presynaptic => &self.presynaptic,
            ConnectorRole::Postsynaptic => &self.postsynaptic,
        }
    }

    /// Returns the distinct ids of presynaptic connectors in input order,
    /// e.g. to request their partner listing.
    pub fn presynaptic_ids(&self) -> Vec<ConnectorId> {
        self.presynaptic
            .iter()
            .map(|connector| connector.id)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the total number of connectors.
    pub fn len(&self) -> usize {
        self.presynaptic.len() + self.postsynaptic.len()
    }

    /// Returns `true` if the skeleton has no connectors.
    pub fn is_empty(&self) -> bool {
        self.presynaptic.is_empty() && self.postsynaptic.is_empty()
    }

    /// Computes the number of distinct postsynaptic partners for every
    /// presynaptic connector from `listing`, replacing earlier counts.
    ///
    /// Connectors missing from the listing get a count of `0`.
    pub fn apply_partner_listing(&mut self, listing: &PartnerListing) {
        self.partner_counts = self
            .presynaptic_ids()
            .into_iter()
            .map(|id| (id, listing.distinct_count(id)))
            .collect();
    }

    /// Returns the partner count of a presynaptic connector, or `None`
    /// if no count was computed for it.
    pub fn partner_count(&self, connector: ConnectorId) -> Option<usize> {
        self.partner_counts.get(&connector).copied()
    }

    /// Returns all partner counts, in presynaptic input order.
    pub fn partner_counts(&self) -> &IndexMap<ConnectorId, usize> {
        &self.partner_counts
    }
}

// =#========================================================================#=
// AGGREGATION
// =#========================================================================#=
/// Resolves and partitions connector records.
///
/// # Arguments
/// * `positions` - Id-to-position lookup of the carrier skeleton
///   (connectors always reference original, not resampled, node ids)
/// * `records` - Connector records of this skeleton
/// * `scale` - Coordinate divisor for the connectors' own positions
///
/// # Errors
/// * [SkeletonError::UnknownConnectorRole] - role flag is neither `0` nor `1`
/// * [SkeletonError::UnknownCarrierNode] - carrier node has no position
///
/// # Example
/// ```
/// use neuroskel::model::{ConnectorRole, NodeTable, RawConnectorRecord, RawNodeRecord};
/// use neuroskel::synapse::aggregate_connectors;
///
/// let nodes = vec![RawNodeRecord::new(1, None, 0.0, 0.0, 0.0)];
/// let table = NodeTable::build(&nodes, 1.0)?;
/// let records = vec![RawConnectorRecord::new(1, 50, ConnectorRole::Presynaptic, 1.0, 0.0, 0.0)];
///
/// let set = aggregate_connectors(&table, &records, 1.0)?;
/// assert_eq!(set.presynaptic().len(), 1);
/// assert!(set.postsynaptic().is_empty());
/// # Ok::<(), neuroskel::SkeletonError>(())
/// ```
pub fn aggregate_connectors<P>(
    positions: &P,
    records: &[RawConnectorRecord],
    scale: f64,
) -> SkeletonResult<ConnectorSet>
where
    P: NodePositions + ?Sized,
{
    let mut set = ConnectorSet::default();

    for record in records {
        let role = ConnectorRole::from_flag(record.role_flag).ok_or(
            SkeletonError::UnknownConnectorRole {
                connector: record.connector_id,
                flag: record.role_flag,
            },
        )?;
        let position = positions.position_of(record.carrier_node).ok_or(
            SkeletonError::UnknownCarrierNode {
                connector: record.connector_id,
                node: record.carrier_node,
            },
        )?;

        let connector = Connector {
            id: record.connector_id,
            carrier_node: record.carrier_node,
            role,
            position,
            connector_position: Point3::from_raw(record.x, record.y, record.z, scale),
        };
        match role {
            ConnectorRole::Presynaptic => set.presynaptic.push(connector),
            ConnectorRole::Postsynaptic => set.postsynaptic.push(connector),
        }
    }

    debug!(
        presynaptic = set.presynaptic.len(),
        postsynaptic = set.postsynaptic.len(),
        "Aggregated connectors"
    );

    Ok(set)
}
