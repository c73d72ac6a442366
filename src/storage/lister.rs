//! The listing seam between the scanner and a blob container.

use futures::stream::BoxStream;

use crate::error::ListerResult;

/// A blob as seen by the scanner: only its name matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobDescriptor {
    pub name: String,
}

impl BlobDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One page of a blob listing, in the order the container returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobPage {
    pub blobs: Vec<BlobDescriptor>,
}

impl BlobPage {
    pub fn new(blobs: Vec<BlobDescriptor>) -> Self {
        Self { blobs }
    }
}

/// Lazy stream of listing pages. Each item is fetched on demand.
pub type BlobPageStream<'a> = BoxStream<'a, ListerResult<BlobPage>>;

/// Trait for containers that can list blobs by name prefix.
///
/// The returned stream can only be restarted by calling `list_blobs` again.
/// A failed page ends the listing; implementations do not retry.
pub trait BlobLister: Send + Sync {
    fn list_blobs(&self, prefix: &str) -> BlobPageStream<'_>;
}
