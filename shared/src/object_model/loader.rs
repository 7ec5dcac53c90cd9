use std::path::Path;

use crate::{ModelTree, ObjectModelError};

/// Produces a `ModelTree` from an external object model document.
///
/// Any one-time format registration a loader needs is done when the loader
/// itself is constructed; the loader is then handed explicitly to
/// `ObjectModelIndex::load`.
pub trait ObjectModelLoader {
    fn load(&self, source: &Path) -> Result<ModelTree, ObjectModelError>;
}
