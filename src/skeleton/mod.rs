//! Algorithms over a built [NodeTable](crate::model::NodeTable).
//!
//! * [resample] - decimates pass-through runs, keeping root, branches and leaves
//! * [PathDecomposer] - splits a (resampled) child index into [Path]s
//! * [find_soma] - locates the cell body by radius
//!
//! Typical flow:
//! ```text
//! NodeTable ──→ resample(k) ──→ ChildIndex ──→ PathDecomposer ──→ Vec<Path>
//!     └──────→ find_soma ──→ Option<Soma>
//! ```

pub mod paths;
pub mod resample;
pub mod soma;

pub use paths::{
    DEFAULT_MAX_TRAVERSAL_STEPS, InvalidPath, Path, PathDecomposer, PathGeometry, decompose,
};
pub use resample::resample;
pub use soma::{DEFAULT_SOMA_RADIUS_THRESHOLD, Soma, find_soma};
