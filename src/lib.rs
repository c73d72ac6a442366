//! grain-lister: lists persisted grain identifiers from Azure Blob Storage.
//!
//! Grain state written by a blob storage provider lands under names like
//! `accountStateName-accountStorageName/<grainId>.json`. This crate lists the
//! blobs under each registered prefix and decodes the grain identifiers out
//! of their names.
//!
//! # Example
//!
//! ```no_run
//! use grain_lister::{AzureBlobLister, GrainRegistry, GrainScanner, WriterSink};
//!
//! #[tokio::main]
//! async fn main() -> grain_lister::ListerResult<()> {
//!     let lister = AzureBlobLister::from_connection_string("UseDevelopmentStorage=true", "grainstate")?;
//!     let scanner = GrainScanner::new(lister);
//!     scanner.scan(&GrainRegistry::default(), &mut WriterSink::stdout()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod registry;
pub mod scanner;
pub mod sink;
pub mod storage;

// Re-exports for convenience
pub use config::{Args, Config, Settings, DEV_STORAGE_ACCOUNT, DEV_STORAGE_ACCOUNT_KEY};
pub use decoder::{DecodedRecord, GrainNameDecoder};
pub use error::{ErrorCode, ListerError, ListerResult, StorageError};
pub use registry::{GrainRegistration, GrainRegistry};
pub use scanner::{GrainScanner, ScanSummary};
pub use sink::{RecordSink, WriterSink};
pub use storage::{AzureBlobLister, BlobDescriptor, BlobLister, BlobPage, MemoryBlobLister};
