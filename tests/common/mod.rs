//! Common test utilities.
//!
//! `ListBlobsServer` answers the Azure Blob Storage "List Blobs" operation
//! for a single container, paging with continuation markers, so the SDK-backed
//! lister can be exercised without a real storage account.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

use grain_lister::{AzureBlobLister, DEV_STORAGE_ACCOUNT, DEV_STORAGE_ACCOUNT_KEY};

/// Failure injected into the server's responses.
#[derive(Debug, Clone, Copy)]
pub struct Failure {
    /// Number of requests answered normally before failing.
    pub after_requests: usize,
    pub status: StatusCode,
    pub code: &'static str,
    pub message: &'static str,
}

impl Failure {
    pub fn authorization(after_requests: usize) -> Self {
        Self {
            after_requests,
            status: StatusCode::FORBIDDEN,
            code: "AuthorizationFailure",
            message: "This request is not authorized to perform this operation.",
        }
    }
}

struct ContainerState {
    container: String,
    names: BTreeSet<String>,
    page_size: usize,
    failure: Option<Failure>,
    requests: AtomicUsize,
}

/// Test server wrapper.
pub struct ListBlobsServer {
    pub base_url: String,
    pub account: String,
    pub key: String,
    pub container: String,
    state: Arc<ContainerState>,
}

impl ListBlobsServer {
    /// Starts a server on a random port holding `names` in `container`.
    pub async fn start(
        container: &str,
        names: &[&str],
        page_size: usize,
        failure: Option<Failure>,
    ) -> Self {
        let state = Arc::new(ContainerState {
            container: container.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            page_size: page_size.max(1),
            failure,
            requests: AtomicUsize::new(0),
        });

        let app = Router::new()
            .route("/:account/:container", get(list_blobs))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        // Start server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            account: DEV_STORAGE_ACCOUNT.to_string(),
            key: DEV_STORAGE_ACCOUNT_KEY.to_string(),
            container: container.to_string(),
            state,
        }
    }

    /// Connection string pointing at this server.
    pub fn connection_string(&self) -> String {
        format!(
            "DefaultEndpointsProtocol=http;AccountName={};AccountKey={};BlobEndpoint={}/{};",
            self.account, self.key, self.base_url, self.account
        )
    }

    /// A lister for `container` on this server.
    pub fn lister(&self, container: &str) -> AzureBlobLister {
        AzureBlobLister::from_connection_string(&self.connection_string(), container).unwrap()
    }

    /// Number of list requests served so far.
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

async fn list_blobs(
    State(state): State<Arc<ContainerState>>,
    Path((account, container)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let served = state.requests.fetch_add(1, Ordering::SeqCst);

    if let Some(failure) = state.failure {
        if served >= failure.after_requests {
            return error_response(failure.status, failure.code, failure.message);
        }
    }

    if container != state.container {
        return error_response(
            StatusCode::NOT_FOUND,
            "ContainerNotFound",
            "The specified container does not exist.",
        );
    }

    let prefix = params.get("prefix").map(String::as_str).unwrap_or("");
    let marker = params.get("marker").map(String::as_str);
    let max_results = params
        .get("maxresults")
        .and_then(|m| m.parse::<usize>().ok())
        .map(|m| m.min(state.page_size))
        .unwrap_or(state.page_size);

    let matching: Vec<&String> = state
        .names
        .iter()
        .filter(|name| name.starts_with(prefix))
        .filter(|name| marker.map_or(true, |m| name.as_str() >= m))
        .collect();

    let page = &matching[..matching.len().min(max_results)];
    let next_marker = matching.get(max_results).map(|n| n.as_str());

    let xml = serialize_blob_list(&account, &container, prefix, marker, max_results, page, next_marker);

    let mut headers = common_headers();
    headers.insert("Content-Type", HeaderValue::from_static("application/xml"));
    (StatusCode::OK, headers, xml).into_response()
}

/// Creates common response headers for Azure Blob Storage API responses.
fn common_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-ms-request-id",
        HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
    );
    headers.insert("x-ms-version", HeaderValue::from_static("2021-10-04"));
    headers.insert("Date", HeaderValue::from_str(&format_http_date()).unwrap());
    headers
}

fn error_response(status: StatusCode, code: &'static str, message: &str) -> Response {
    let xml = format!(
        r#"<?xml version="1.0" encoding="utf-8"?><Error><Code>{}</Code><Message>{}</Message></Error>"#,
        code,
        xml_escape(message)
    );

    let mut headers = common_headers();
    headers.insert("Content-Type", HeaderValue::from_static("application/xml"));
    headers.insert("x-ms-error-code", HeaderValue::from_static(code));
    (status, headers, xml).into_response()
}

fn serialize_blob_list(
    account: &str,
    container: &str,
    prefix: &str,
    marker: Option<&str>,
    max_results: usize,
    blobs: &[&String],
    next_marker: Option<&str>,
) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push_str(&format!(
        r#"<EnumerationResults ServiceEndpoint="http://127.0.0.1/{}/" ContainerName="{}">"#,
        xml_escape(account),
        xml_escape(container)
    ));
    xml.push_str(&format!("<Prefix>{}</Prefix>", xml_escape(prefix)));
    if let Some(m) = marker {
        xml.push_str(&format!("<Marker>{}</Marker>", xml_escape(m)));
    }
    xml.push_str(&format!("<MaxResults>{}</MaxResults>", max_results));

    xml.push_str("<Blobs>");
    for name in blobs {
        xml.push_str(&serialize_blob(name));
    }
    xml.push_str("</Blobs>");

    match next_marker {
        Some(nm) => xml.push_str(&format!("<NextMarker>{}</NextMarker>", xml_escape(nm))),
        None => xml.push_str("<NextMarker />"),
    }

    xml.push_str("</EnumerationResults>");
    xml
}

fn serialize_blob(name: &str) -> String {
    let now = format_http_date();
    let mut xml = String::from("<Blob>");
    xml.push_str(&format!("<Name>{}</Name>", xml_escape(name)));
    xml.push_str("<Properties>");
    xml.push_str(&format!("<Creation-Time>{}</Creation-Time>", now));
    xml.push_str(&format!("<Last-Modified>{}</Last-Modified>", now));
    xml.push_str("<Etag>0x8D9F0C2B1A2B3C4</Etag>");
    xml.push_str("<Content-Length>2</Content-Length>");
    xml.push_str("<Content-Type>application/json</Content-Type>");
    xml.push_str("<BlobType>BlockBlob</BlobType>");
    xml.push_str("<AccessTier>Hot</AccessTier>");
    xml.push_str("<AccessTierInferred>true</AccessTierInferred>");
    xml.push_str("<LeaseStatus>unlocked</LeaseStatus>");
    xml.push_str("<LeaseState>available</LeaseState>");
    xml.push_str("<ServerEncrypted>true</ServerEncrypted>");
    xml.push_str("</Properties>");
    xml.push_str("</Blob>");
    xml
}

fn format_http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
