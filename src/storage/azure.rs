//! Azure Blob Storage lister backed by the official SDK.

use azure_core::request_options::MaxResults;
use azure_storage::{CloudLocation, ConnectionString, StorageCredentials};
use azure_storage_blobs::prelude::{ClientBuilder, ContainerClient};
use futures::StreamExt;
use std::num::NonZeroU32;
use tracing::debug;
use url::Url;

use crate::config::{DEV_STORAGE_ACCOUNT, DEV_STORAGE_ACCOUNT_KEY, DEV_STORAGE_BLOB_ENDPOINT};
use crate::error::{ListerError, ListerResult};

use super::{BlobDescriptor, BlobLister, BlobPage, BlobPageStream};

/// Blob endpoint resolved from a connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEndpoint {
    pub account: String,
    /// Explicit service URL. `None` means the public cloud endpoint of `account`.
    pub uri: Option<String>,
}

impl BlobEndpoint {
    /// Resolves the blob endpoint described by a parsed connection string.
    pub fn resolve(conn: &ConnectionString<'_>) -> ListerResult<Self> {
        if conn.use_development_storage == Some(true) {
            return Ok(Self {
                account: DEV_STORAGE_ACCOUNT.to_string(),
                uri: Some(DEV_STORAGE_BLOB_ENDPOINT.to_string()),
            });
        }

        if let Some(endpoint) = conn.blob_endpoint {
            let url = Url::parse(endpoint).map_err(|e| {
                ListerError::ConnectionString(format!("invalid BlobEndpoint '{}': {}", endpoint, e))
            })?;
            let account = match conn.account_name {
                Some(account) => account.to_string(),
                None => account_from_url(&url).ok_or_else(|| {
                    ListerError::ConnectionString(
                        "AccountName is required when BlobEndpoint has no account host".into(),
                    )
                })?,
            };
            return Ok(Self {
                account,
                uri: Some(endpoint.trim_end_matches('/').to_string()),
            });
        }

        let account = conn
            .account_name
            .ok_or_else(|| ListerError::ConnectionString("AccountName is missing".into()))?
            .to_string();

        let uri = conn
            .endpoint_suffix
            .map(|suffix| format!("https://{}.blob.{}", account, suffix));

        Ok(Self { account, uri })
    }

    /// Returns the SDK location for this endpoint.
    pub fn location(&self) -> CloudLocation {
        match &self.uri {
            Some(uri) => CloudLocation::Custom {
                account: self.account.clone(),
                uri: uri.clone(),
            },
            None => CloudLocation::Public {
                account: self.account.clone(),
            },
        }
    }
}

/// Takes the account name from a `<account>.blob.<suffix>` host.
fn account_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let (account, rest) = host.split_once('.')?;
    if rest.starts_with("blob.") && !account.is_empty() {
        Some(account.to_string())
    } else {
        None
    }
}

/// Lists blobs from one Azure Blob Storage container.
///
/// Paging (continuation markers) is driven by the SDK. Failed page requests
/// surface as errors on the stream; nothing here retries.
#[derive(Clone)]
pub struct AzureBlobLister {
    container: ContainerClient,
    page_size: Option<NonZeroU32>,
}

impl AzureBlobLister {
    pub fn new(container: ContainerClient) -> Self {
        Self {
            container,
            page_size: None,
        }
    }

    /// Connects to `container` using an Azure Storage connection string.
    pub fn from_connection_string(connection_string: &str, container: &str) -> ListerResult<Self> {
        let conn = ConnectionString::new(connection_string)
            .map_err(|e| ListerError::ConnectionString(e.to_string()))?;

        let endpoint = BlobEndpoint::resolve(&conn)?;
        let credentials = if conn.use_development_storage == Some(true) {
            StorageCredentials::access_key(DEV_STORAGE_ACCOUNT, DEV_STORAGE_ACCOUNT_KEY.to_string())
        } else {
            conn.storage_credentials()
                .map_err(|e| ListerError::ConnectionString(e.to_string()))?
        };

        debug!(
            account = %endpoint.account,
            uri = endpoint.uri.as_deref().unwrap_or("public"),
            container,
            "Connecting to blob container"
        );

        let client = ClientBuilder::with_location(endpoint.location(), credentials)
            .container_client(container);
        Ok(Self::new(client))
    }

    /// Sets the `maxresults` requested per page.
    pub fn page_size(mut self, page_size: Option<NonZeroU32>) -> Self {
        self.page_size = page_size;
        self
    }
}

impl BlobLister for AzureBlobLister {
    fn list_blobs(&self, prefix: &str) -> BlobPageStream<'_> {
        let mut request = self.container.list_blobs().prefix(prefix.to_string());
        if let Some(page_size) = self.page_size {
            request = request.max_results(MaxResults::new(page_size));
        }

        request
            .into_stream()
            .map(|page| -> ListerResult<BlobPage> {
                let page = page?;
                let blobs = page
                    .blobs
                    .blobs()
                    .map(|blob| BlobDescriptor::new(blob.name.clone()))
                    .collect();
                Ok(BlobPage::new(blobs))
            })
            .boxed()
    }
}
