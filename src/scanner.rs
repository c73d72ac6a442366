//! Lists grain state blobs and decodes their names into records.

use futures::TryStreamExt;
use tracing::{debug, info};

use crate::decoder::{DecodedRecord, GrainNameDecoder};
use crate::error::ListerResult;
use crate::registry::GrainRegistry;
use crate::sink::RecordSink;
use crate::storage::BlobLister;

/// Counts gathered over one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub grain_types: usize,
    pub pages: usize,
    pub blobs_seen: usize,
    pub records: usize,
}

/// Walks every registered prefix of a container and emits one record per
/// blob whose name decodes to a grain identifier.
///
/// Registrations are processed one at a time, in registry order, and each
/// listing is drained before the next one starts. Records are emitted as
/// soon as their page arrives. The first listing or sink error stops the
/// whole scan.
pub struct GrainScanner<L> {
    lister: L,
}

impl<L: BlobLister> GrainScanner<L> {
    pub fn new(lister: L) -> Self {
        Self { lister }
    }

    pub async fn scan<S: RecordSink>(
        &self,
        registry: &GrainRegistry,
        sink: &mut S,
    ) -> ListerResult<ScanSummary> {
        let mut summary = ScanSummary::default();

        for registration in registry {
            let decoder = GrainNameDecoder::new(&registration.prefix)?;
            debug!(
                grain_type = %registration.grain_type,
                pattern = decoder.as_str(),
                "Listing grain state blobs"
            );

            let mut pages = self.lister.list_blobs(&registration.prefix);
            let mut records = 0;
            while let Some(page) = pages.try_next().await? {
                summary.pages += 1;
                summary.blobs_seen += page.blobs.len();

                for blob in &page.blobs {
                    if let Some(grain_id) = decoder.decode(&blob.name) {
                        sink.emit(&DecodedRecord::new(registration.grain_type.as_str(), grain_id))?;
                        records += 1;
                    }
                }
            }

            debug!(grain_type = %registration.grain_type, records, "Finished grain type");
            summary.records += records;
            summary.grain_types += 1;
        }

        info!(
            grain_types = summary.grain_types,
            pages = summary.pages,
            blobs = summary.blobs_seen,
            records = summary.records,
            "Scan complete"
        );

        Ok(summary)
    }
}
