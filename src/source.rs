//! Data retrieval seam.
//!
//! The import pipeline never talks to a remote annotation server itself.
//! Instead it is handed an explicit [SkeletonSource]; any transport,
//! authentication or caching lives in the implementation of that trait.
//! [InMemorySource] serves pre-fetched records, e.g. for tests or when
//! records were loaded from a file.

use crate::model::{ConnectorId, RawConnectorRecord, RawNodeRecord, SkeletonId};
use crate::synapse::{PartnerListing, TargetId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// All records of one skeleton as delivered by a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonRecords {
    pub nodes: Vec<RawNodeRecord>,
    #[serde(default)]
    pub connectors: Vec<RawConnectorRecord>,
}

// =#========================================================================#=
// SKELETON SOURCE (trait)
// =#========================================================================#=
/// Provider of skeleton records and connector partner listings.
///
/// All data for a stage has to be fully retrieved before the stage runs;
/// there is no streaming of partial trees.
pub trait SkeletonSource {
    /// Error raised by this source, wrapped into
    /// [SkeletonError::Source](crate::SkeletonError::Source) by the importer.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches node and connector records of one skeleton.
    fn fetch_skeleton(&self, skeleton_id: SkeletonId) -> Result<SkeletonRecords, Self::Error>;

    /// Fetches the postsynaptic targets of the given connectors.
    ///
    /// Connectors unknown to the source may simply be missing from the listing.
    fn fetch_partners(&self, connectors: &[ConnectorId]) -> Result<PartnerListing, Self::Error>;
}

impl<S: SkeletonSource + ?Sized> SkeletonSource for &S {
    type Error = S::Error;

    fn fetch_skeleton(&self, skeleton_id: SkeletonId) -> Result<SkeletonRecords, Self::Error> {
        (**self).fetch_skeleton(skeleton_id)
    }

    fn fetch_partners(&self, connectors: &[ConnectorId]) -> Result<PartnerListing, Self::Error> {
        (**self).fetch_partners(connectors)
    }
}

// =#========================================================================#=
// IN-MEMORY SOURCE
// =#========================================================================#=
/// Errors of [InMemorySource].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InMemorySourceError {
    #[error("Unknown skeleton {0}")]
    UnknownSkeleton(SkeletonId),
}

/// [SkeletonSource] serving records held in memory.
///
/// # Example
/// ```
/// use neuroskel::model::RawNodeRecord;
/// use neuroskel::source::{InMemorySource, SkeletonRecords, SkeletonSource};
///
/// let source = InMemorySource::new().with_skeleton(
///     17,
///     SkeletonRecords {
///         nodes: vec![RawNodeRecord::new(1, None, 0.0, 0.0, 0.0)],
///         connectors: Vec::new(),
///     },
/// );
/// assert_eq!(source.fetch_skeleton(17)?.nodes.len(), 1);
/// assert!(source.fetch_skeleton(18).is_err());
/// # Ok::<(), neuroskel::source::InMemorySourceError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    skeletons: AHashMap<SkeletonId, SkeletonRecords>,
    partners: PartnerListing,
}

impl InMemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the records of a skeleton.
    pub fn with_skeleton(mut self, skeleton_id: SkeletonId, records: SkeletonRecords) -> Self {
        self.insert_skeleton(skeleton_id, records);
        self
    }

    /// Adds postsynaptic targets for a connector.
    pub fn with_partners<I>(mut self, connector: ConnectorId, targets: I) -> Self
    where
        I: IntoIterator<Item = TargetId>,
    {
        for target in targets {
            self.partners.add_target(connector, target);
        }
        self
    }

    /// Adds (or replaces) the records of a skeleton.
    pub fn insert_skeleton(&mut self, skeleton_id: SkeletonId, records: SkeletonRecords) {
        self.skeletons.insert(skeleton_id, records);
    }

    /// Returns the ids of all held skeletons, ascending.
    pub fn skeleton_ids(&self) -> Vec<SkeletonId> {
        let mut ids: Vec<_> = self.skeletons.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl SkeletonSource for InMemorySource {
    type Error = InMemorySourceError;

    fn fetch_skeleton(&self, skeleton_id: SkeletonId) -> Result<SkeletonRecords, Self::Error> {
        self.skeletons
            .get(&skeleton_id)
            .cloned()
            .ok_or(InMemorySourceError::UnknownSkeleton(skeleton_id))
    }

    fn fetch_partners(&self, connectors: &[ConnectorId]) -> Result<PartnerListing, Self::Error> {
        Ok(connectors
            .iter()
            .flat_map(|&connector| {
                self.partners
                    .targets(connector)
                    .iter()
                    .map(move |&target| (connector, target))
            })
            .collect())
    }
}
