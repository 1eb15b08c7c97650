//! Data model for neuron skeletons.
//!
//! # Skeleton representation
//! A skeleton is held in a [NodeTable], which uses the arena pattern to
//! store [TreeNode]s in input order. All accessors are keyed by [NodeId];
//! adjacency lives in a [ChildIndex] built by inverting parent references.
//! Topological roles ([NodeRole]) are derived on demand, never stored.
//!
//! # Records
//! Data sources deliver flat rows:
//! - [RawNodeRecord] `(id, parent, x, y, z, radius, confidence)`
//! - [RawConnectorRecord] `(carrier_node, connector_id, role_flag, x, y, z)`
//!
//! Coordinates are converted to scene space by [Point3::from_raw].
//!
//! # Output
//! Results of an import are handed to renderers as typed [SceneEntity]s.

pub mod child_index;
pub mod connector;
pub mod entity;
pub mod node;
pub mod node_table;
pub mod point;

// Skeleton
pub use child_index::ChildIndex;
pub use node::{NodeId, NodeRole, RawNodeRecord, SkeletonId, TreeNode};
pub use node_table::{NodePositions, NodeTable, RoleCounts};
pub use point::{DEFAULT_COORDINATE_SCALE, Point3};
// Connectors
pub use connector::{Connector, ConnectorId, ConnectorRole, RawConnectorRecord};
// Scene
pub use entity::{EntityKind, SceneEntity};
