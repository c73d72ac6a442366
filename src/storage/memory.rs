//! In-memory blob container.

use futures::stream::{self, StreamExt};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::ops::Bound;

use crate::error::{ErrorCode, ListerError, StorageError};

use super::{BlobDescriptor, BlobLister, BlobPage, BlobPageStream};

/// Default page size, matching the service's default `maxresults`.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// In-memory implementation of a blob container.
///
/// Names are listed in lexicographic order, as Azure Blob Storage lists them.
/// A listing always yields at least one page, even when nothing matches.
pub struct MemoryBlobLister {
    names: RwLock<BTreeSet<String>>,
    page_size: usize,
    /// Fail with the given code in place of the page at this index.
    failure: Option<(usize, ErrorCode)>,
}

impl MemoryBlobLister {
    pub fn new() -> Self {
        Self {
            names: RwLock::new(BTreeSet::new()),
            page_size: DEFAULT_PAGE_SIZE,
            failure: None,
        }
    }

    /// Creates a container holding the given blob names.
    pub fn with_blobs<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lister = Self::new();
        for name in names {
            lister.insert(name);
        }
        lister
    }

    /// Sets the number of blobs per page. Zero is treated as one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Makes every listing fail once `pages` pages have been yielded.
    pub fn fail_after(mut self, pages: usize, code: ErrorCode) -> Self {
        self.failure = Some((pages, code));
        self
    }

    pub fn insert(&self, name: impl Into<String>) {
        self.names.write().insert(name.into());
    }

    pub fn remove(&self, name: &str) -> bool {
        self.names.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }

    fn pages_for(&self, prefix: &str) -> Vec<BlobPage> {
        let names = self.names.read();
        let matching: Vec<BlobDescriptor> = names
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|name| name.starts_with(prefix))
            .map(|name| BlobDescriptor::new(name.as_str()))
            .collect();

        if matching.is_empty() {
            return vec![BlobPage::default()];
        }

        matching
            .chunks(self.page_size)
            .map(|chunk| BlobPage::new(chunk.to_vec()))
            .collect()
    }
}

impl Default for MemoryBlobLister {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobLister for MemoryBlobLister {
    fn list_blobs(&self, prefix: &str) -> BlobPageStream<'_> {
        let pages = self.pages_for(prefix);

        let items = match self.failure {
            Some((index, code)) => {
                let mut items: Vec<_> = pages.into_iter().take(index).map(Ok).collect();
                items.push(Err(ListerError::Storage(StorageError::new(code))));
                items
            }
            None => pages.into_iter().map(Ok).collect(),
        };

        stream::iter(items).boxed()
    }
}
