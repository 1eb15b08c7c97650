//! Typed scene entities handed to a rendering collaborator.
//!
//! Each entity carries its kind explicitly, so consumers can dispatch on
//! [EntityKind] instead of inspecting object names.

use crate::model::connector::{Connector, ConnectorRole};
use crate::model::node::SkeletonId;
use crate::model::point::Point3;
use crate::skeleton::Path;
use serde::{Deserialize, Serialize};

/// Kind tag of a [SceneEntity].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Skeleton,
    ConnectorSet,
    SomaMarker,
    ClusterCenter,
}

/// A renderable group of geometric primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEntity {
    /// The decomposed paths of one skeleton
    Skeleton {
        skeleton_id: SkeletonId,
        paths: Vec<Path>,
    },
    /// All connectors of one role attached to one skeleton
    ConnectorSet {
        skeleton_id: SkeletonId,
        role: ConnectorRole,
        connectors: Vec<Connector>,
        /// Partner count per connector, parallel to `connectors`
        /// (always `0` for postsynaptic connectors)
        weights: Vec<usize>,
    },
    /// The soma of one skeleton
    SomaMarker {
        skeleton_id: SkeletonId,
        position: Point3,
        radius: f64,
    },
    /// Center of a soma cluster
    ClusterCenter { index: usize, position: Point3 },
}

impl SceneEntity {
    /// Returns the kind tag of this entity.
    pub fn kind(&self) -> EntityKind {
        match self {
            SceneEntity::Skeleton { .. } => EntityKind::Skeleton,
            SceneEntity::ConnectorSet { .. } => EntityKind::ConnectorSet,
            SceneEntity::SomaMarker { .. } => EntityKind::SomaMarker,
            SceneEntity::ClusterCenter { .. } => EntityKind::ClusterCenter,
        }
    }

    /// Returns the skeleton this entity belongs to, `None` for cluster centers.
    pub fn skeleton_id(&self) -> Option<SkeletonId> {
        match self {
            SceneEntity::Skeleton { skeleton_id, .. }
            | SceneEntity::ConnectorSet { skeleton_id, .. }
            | SceneEntity::SomaMarker { skeleton_id, .. } => Some(*skeleton_id),
            SceneEntity::ClusterCenter { .. } => None,
        }
    }
}
