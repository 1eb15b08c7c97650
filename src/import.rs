//! Skeleton import pipeline.
//!
//! A [SkeletonImporter] runs all stages for one skeleton against an
//! injected [SkeletonSource]:
//!
//! ```text
//! fetch records ──→ NodeTable ──→ resample ──→ PathDecomposer ──→ paths
//!                      ├──────→ find_soma ──→ soma
//!                      └──────→ aggregate_connectors ──→ fetch partners ──→ connectors
//! ```
//!
//! Each stage starts only after its input is complete. Imports of different
//! skeletons are independent; every [ImportedSkeleton] owns its own
//! [NodeTable], so callers may run imports in parallel.

use crate::cluster::{Cluster, find_clusters};
use crate::config::{ConfigResult, ImportConfig};
use crate::error::{SkeletonError, SkeletonResult};
use crate::model::{
    ChildIndex, ConnectorRole, NodeTable, Point3, SceneEntity, SkeletonId,
};
use crate::skeleton::{Path, PathDecomposer, PathGeometry, Soma, find_soma, resample};
use crate::source::{SkeletonRecords, SkeletonSource};
use crate::synapse::{ConnectorSet, aggregate_connectors};
use tracing::{debug, info, warn};

// =#========================================================================#=
// IMPORTED SKELETON
// =#========================================================================#=
/// Result of importing one skeleton.
#[derive(Debug, Clone)]
pub struct ImportedSkeleton {
    skeleton_id: SkeletonId,
    table: NodeTable,
    resampled: ChildIndex,
    paths: Vec<Path>,
    soma: Option<Soma>,
    connectors: ConnectorSet,
}

impl ImportedSkeleton {
    /// Returns the id of the imported skeleton.
    pub fn skeleton_id(&self) -> SkeletonId {
        self.skeleton_id
    }

    /// Returns the full-resolution node table (root, positions, radii).
    pub fn table(&self) -> &NodeTable {
        &self.table
    }

    /// Returns the child index the paths were decomposed from.
    pub fn resampled_index(&self) -> &ChildIndex {
        &self.resampled
    }

    /// Returns the decomposed paths in depth-first order.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Returns the soma, if one was recognized.
    pub fn soma(&self) -> Option<&Soma> {
        self.soma.as_ref()
    }

    /// Returns the aggregated connectors with partner counts.
    pub fn connectors(&self) -> &ConnectorSet {
        &self.connectors
    }

    /// Converts this import into typed scene entities: the skeleton paths,
    /// one connector set per non-empty role, and the soma marker if present.
    pub fn entities(&self) -> Vec<SceneEntity> {
        let mut entities = vec![SceneEntity::Skeleton {
            skeleton_id: self.skeleton_id,
            paths: self.paths.clone(),
        }];

        for role in [ConnectorRole::Presynaptic, ConnectorRole::Postsynaptic] {
            let connectors = self.connectors.with_role(role);
            if connectors.is_empty() {
                continue;
            }
            let weights = connectors
                .iter()
                .map(|c| self.connectors.partner_count(c.id).unwrap_or(0))
                .collect();
            entities.push(SceneEntity::ConnectorSet {
                skeleton_id: self.skeleton_id,
                role,
                connectors: connectors.to_vec(),
                weights,
            });
        }

        if let Some(soma) = &self.soma {
            entities.push(SceneEntity::SomaMarker {
                skeleton_id: self.skeleton_id,
                position: soma.position,
                radius: soma.radius,
            });
        }

        entities
    }
}

// =#========================================================================#=
// SKELETON IMPORTER
// =#========================================================================#=
/// Imports skeletons from a [SkeletonSource].
///
/// # Example
/// ```
/// use neuroskel::import::SkeletonImporter;
/// use neuroskel::model::RawNodeRecord;
/// use neuroskel::source::{InMemorySource, SkeletonRecords};
///
/// let nodes = (1..=10)
///     .map(|id| RawNodeRecord::new(id, (id > 1).then(|| id - 1), 0.0, 0.0, 0.0))
///     .collect();
/// let source = InMemorySource::new()
///     .with_skeleton(42, SkeletonRecords { nodes, connectors: Vec::new() });
///
/// let importer = SkeletonImporter::builder(&source)
///     .with_resampling(3)
///     .build()?;
/// let skeleton = importer.import(42)?;
///
/// assert_eq!(skeleton.paths().len(), 1);
/// assert_eq!(skeleton.paths()[0].nodes(), &[1, 4, 7, 10]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct SkeletonImporter<S: SkeletonSource> {
    pub(crate) source: S,
    pub(crate) config: ImportConfig,
}

impl<S: SkeletonSource> SkeletonImporter<S> {
    /// Creates an importer with a validated configuration.
    pub fn new(source: S, config: ImportConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(SkeletonImporter { source, config })
    }

    /// Starts a builder with default configuration.
    pub fn builder(source: S) -> SkeletonImporterBuilder<S> {
        SkeletonImporterBuilder {
            source,
            config: ImportConfig::default(),
        }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Fetches and imports one skeleton, including partner counts
    /// of its presynaptic connectors.
    ///
    /// # Errors
    /// Any [SkeletonError] of the stages, or [SkeletonError::Source]
    /// if the source fails.
    pub fn import(&self, skeleton_id: SkeletonId) -> SkeletonResult<ImportedSkeleton> {
        let records = self
            .source
            .fetch_skeleton(skeleton_id)
            .map_err(SkeletonError::source_error)?;

        let mut skeleton = self.import_records(skeleton_id, &records)?;

        let presynaptic = skeleton.connectors.presynaptic_ids();
        if !presynaptic.is_empty() {
            let listing = self
                .source
                .fetch_partners(&presynaptic)
                .map_err(SkeletonError::source_error)?;
            skeleton.connectors.apply_partner_listing(&listing);
        }

        Ok(skeleton)
    }

    /// Imports several skeletons, stopping at the first error.
    pub fn import_all(&self, skeleton_ids: &[SkeletonId]) -> SkeletonResult<Vec<ImportedSkeleton>> {
        skeleton_ids.iter().map(|&id| self.import(id)).collect()
    }

    /// Runs all stages on records that were already fetched.
    ///
    /// Partner counts are not computed; see
    /// [ConnectorSet::apply_partner_listing].
    pub fn import_records(
        &self,
        skeleton_id: SkeletonId,
        records: &SkeletonRecords,
    ) -> SkeletonResult<ImportedSkeleton> {
        let config = &self.config;

        let table = NodeTable::build(&records.nodes, config.coordinate_scale)?;
        let resampled = resample(&table, config.resampling_factor);
        let paths = PathDecomposer::new(&table)
            .with_geometry(config.geometry)
            .with_max_steps(config.max_traversal_steps)
            .decompose(&resampled)?;

        let soma = find_soma(&table, config.soma_radius_threshold);
        if soma.is_none() {
            debug!(skeleton_id, "No soma recognized");
        }

        let connectors =
            aggregate_connectors(&table, &records.connectors, config.coordinate_scale)?;

        info!(
            skeleton_id,
            nodes = table.len(),
            paths = paths.len(),
            connectors = connectors.len(),
            "Imported skeleton"
        );

        Ok(ImportedSkeleton {
            skeleton_id,
            table,
            resampled,
            paths,
            soma,
            connectors,
        })
    }

    /// Clusters the somata of `skeletons` with the configured cluster parameters.
    ///
    /// Skeletons without soma are skipped.
    pub fn cluster_somata(&self, skeletons: &[ImportedSkeleton]) -> Vec<Cluster<SkeletonId>> {
        let somata = collect_somata(skeletons);
        if somata.len() < skeletons.len() {
            warn!(
                skipped = skeletons.len() - somata.len(),
                "Skeletons without soma excluded from clustering"
            );
        }
        find_clusters(&somata, &self.config.cluster)
    }
}

/// Collects `(soma position, skeleton id)` pairs of all skeletons with a soma.
pub fn collect_somata(skeletons: &[ImportedSkeleton]) -> Vec<(Point3, SkeletonId)> {
    skeletons
        .iter()
        .filter_map(|s| s.soma().map(|soma| (soma.position, s.skeleton_id())))
        .collect()
}

/// Converts clusters into [SceneEntity::ClusterCenter]s.
pub fn cluster_entities<L>(clusters: &[Cluster<L>]) -> Vec<SceneEntity> {
    clusters
        .iter()
        .enumerate()
        .map(|(index, cluster)| SceneEntity::ClusterCenter {
            index,
            position: cluster.center,
        })
        .collect()
}

// =#========================================================================#=
// SKELETON IMPORTER BUILDER
// =#========================================================================#=
/// Builder for configuring and creating a [SkeletonImporter].
///
/// Starts from [ImportConfig::default]; each `with_*` call overrides one
/// setting. [`build()`](SkeletonImporterBuilder::build) validates the result.
pub struct SkeletonImporterBuilder<S: SkeletonSource> {
    source: S,
    config: ImportConfig,
}

impl<S: SkeletonSource> SkeletonImporterBuilder<S> {
    /// Replaces the whole configuration, e.g. one loaded from TOML.
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the decimation factor (`1` keeps every node).
    pub fn with_resampling(mut self, factor: usize) -> Self {
        self.config.resampling_factor = factor;
        self
    }

    /// Emits full-resolution geometry along resampled paths.
    pub fn with_full_resolution(mut self) -> Self {
        self.config.geometry = PathGeometry::FullResolution;
        self
    }

    /// Sets the coordinate divisor.
    pub fn with_coordinate_scale(mut self, scale: f64) -> Self {
        self.config.coordinate_scale = scale;
        self
    }

    /// Sets the radius above which a node is taken as soma.
    pub fn with_soma_threshold(mut self, threshold: f64) -> Self {
        self.config.soma_radius_threshold = threshold;
        self
    }

    /// Sets the step cap of the path walk.
    pub fn with_max_traversal_steps(mut self, max_steps: usize) -> Self {
        self.config.max_traversal_steps = max_steps;
        self
    }

    /// Validates the configuration and creates the importer.
    pub fn build(self) -> ConfigResult<SkeletonImporter<S>> {
        SkeletonImporter::new(self.source, self.config)
    }
}
