//! Neuroskel is a library to turn flat neuron skeleton records into
//! renderable geometry.
//!
//! A skeleton arrives as unordered rows of treenodes (id, parent, position,
//! radius) plus connector rows attaching synapses to treenodes. This crate
//! reconstructs the implied rooted tree and prepares it for display.
//! Core functionality provided:
//! - Node table: Indexed, validated tree with child index and root
//!   (see [model::NodeTable]).
//! - Resampling: Decimate non-branching runs while keeping root, branches
//!   and leaves (see [skeleton::resample]).
//! - Paths: Decompose the (resampled) tree into the minimal set of
//!   polylines between significant nodes (see [skeleton::PathDecomposer]).
//! - Connectors: Resolve synapses to their carrier nodes, split them into
//!   pre- and postsynaptic sets and weight them by partner count
//!   (see [synapse]).
//! - Soma clustering: Greedy spatial clustering of cell bodies and a
//!   palette coloring by nearest cluster (see [cluster]).
//! - Configurability:
//!   - Resampling factor, coordinate scale, soma threshold, path geometry
//!   - TOML configuration files via [ImportConfig]
//!
//! Data retrieval is not part of this crate: records come from an explicit
//! [SkeletonSource](source::SkeletonSource) handed to the importer.
//!
//! # Usage patterns
//! 1. The quick API [import_skeleton] imports one skeleton with default
//!    settings.
//! 2. Configure a [SkeletonImporter](import::SkeletonImporter) via
//!    [`SkeletonImporter::builder`](import::SkeletonImporter::builder) for
//!    full control.
//! 3. Use the stages directly: [model::NodeTable::build],
//!    [skeleton::resample], [skeleton::PathDecomposer],
//!    [synapse::aggregate_connectors], [cluster::find_clusters].
//!
//! ## Example Default Configuration
//! ```
//! use neuroskel::import_skeleton;
//! use neuroskel::model::RawNodeRecord;
//! use neuroskel::source::{InMemorySource, SkeletonRecords};
//!
//! let nodes = vec![
//!     RawNodeRecord::new(1, None, 0.0, 0.0, 0.0).with_radius(40.0),
//!     RawNodeRecord::new(2, Some(1), 10_000.0, 0.0, 0.0),
//!     RawNodeRecord::new(3, Some(2), 20_000.0, 0.0, 0.0),
//!     RawNodeRecord::new(4, Some(2), 20_000.0, 10_000.0, 0.0),
//! ];
//! let source = InMemorySource::new()
//!     .with_skeleton(7, SkeletonRecords { nodes, connectors: Vec::new() });
//!
//! let skeleton = import_skeleton(&source, 7)?;
//! assert_eq!(skeleton.paths().len(), 3);
//! assert_eq!(skeleton.soma().map(|s| s.node), Some(1));
//! # Ok::<(), neuroskel::SkeletonError>(())
//! ```
//!
//! ## Example Importer Configuration
//! ```no_run
//! use neuroskel::config::ImportConfig;
//! use neuroskel::import::SkeletonImporter;
//! use neuroskel::source::InMemorySource;
//!
//! let source = InMemorySource::new();
//! let importer = SkeletonImporter::builder(&source)
//!     .with_config(ImportConfig::load("neuroskel.toml")?)
//!     .with_resampling(4)          // Keep every 4th node on long runs
//!     .with_full_resolution()      // But draw all original points
//!     .build()?;
//!
//! let skeletons = importer.import_all(&[17, 23])?;
//! let clusters = importer.cluster_somata(&skeletons);
//! println!("Found {} soma clusters", clusters.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cluster;
pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod skeleton;
pub mod source;
pub mod synapse;

pub use crate::config::ImportConfig;
pub use crate::error::{SkeletonError, SkeletonResult};

use crate::import::{ImportedSkeleton, SkeletonImporter};
use crate::model::SkeletonId;
use crate::source::SkeletonSource;

// ============================================================================
// Quick Import API
// ============================================================================
/// Imports one skeleton from `source` using default settings
/// (no resampling, resampled geometry, default coordinate scale and
/// soma threshold), including partner counts.
///
/// See [`SkeletonImporter::import`] for full documentation.
pub fn import_skeleton<S: SkeletonSource>(
    source: S,
    skeleton_id: SkeletonId,
) -> SkeletonResult<ImportedSkeleton> {
    SkeletonImporter {
        source,
        config: ImportConfig::default(),
    }
    .import(skeleton_id)
}
