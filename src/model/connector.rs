//! Synaptic connectors attached to treenodes.

use crate::model::node::NodeId;
use crate::model::point::Point3;
use serde::{Deserialize, Serialize};

/// Id of a connector (synapse). Shared between all skeletons it links.
pub type ConnectorId = i64;

// =#========================================================================#=
// CONNECTOR ROLE
// =#========================================================================#=
/// Side of the synapse the carrier node is on.
///
/// Source records encode the role as flag: `0` is presynaptic (the carrier
/// node emits the connector), `1` is postsynaptic (the carrier node
/// receives it). This crate uses this one convention everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorRole {
    Presynaptic,
    Postsynaptic,
}

impl ConnectorRole {
    /// Flag value of [ConnectorRole::Presynaptic] in source records.
    pub const PRESYNAPTIC_FLAG: u8 = 0;
    /// Flag value of [ConnectorRole::Postsynaptic] in source records.
    pub const POSTSYNAPTIC_FLAG: u8 = 1;

    /// Decodes a source role flag, returning `None` for unknown flags.
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            Self::PRESYNAPTIC_FLAG => Some(ConnectorRole::Presynaptic),
            Self::POSTSYNAPTIC_FLAG => Some(ConnectorRole::Postsynaptic),
            _ => None,
        }
    }

    /// Encodes this role as source flag.
    pub fn flag(&self) -> u8 {
        match self {
            ConnectorRole::Presynaptic => Self::PRESYNAPTIC_FLAG,
            ConnectorRole::Postsynaptic => Self::POSTSYNAPTIC_FLAG,
        }
    }
}

// =#========================================================================#=
// RAW CONNECTOR RECORD
// =#========================================================================#=
/// A connector attachment as delivered by the data source.
///
/// Mirrors the row layout `(carrier_node, connector_id, role_flag, x, y, z)`,
/// with the connector's own location in source coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConnectorRecord {
    pub carrier_node: NodeId,
    pub connector_id: ConnectorId,
    pub role_flag: u8,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RawConnectorRecord {
    /// Creates a record for the given role.
    pub fn new(
        carrier_node: NodeId,
        connector_id: ConnectorId,
        role: ConnectorRole,
        x: f64,
        y: f64,
        z: f64,
    ) -> Self {
        RawConnectorRecord {
            carrier_node,
            connector_id,
            role_flag: role.flag(),
            x,
            y,
            z,
        }
    }
}

// =#========================================================================#=
// CONNECTOR
// =#========================================================================#=
/// A connector resolved against its carrier node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Connector id
    pub id: ConnectorId,
    /// Treenode the connector is attached to
    pub carrier_node: NodeId,
    /// Pre- or postsynaptic side
    pub role: ConnectorRole,
    /// Scene position of the carrier node
    pub position: Point3,
    /// Scene position of the connector itself
    pub connector_position: Point3,
}
