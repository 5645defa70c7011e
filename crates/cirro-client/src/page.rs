use serde::Deserialize;
use serde_json::Value;

/// Collection envelope returned by list endpoints.
///
/// `metadata.next` carries an absolute URL minted by the server; a `None`
/// marks the final page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub metadata: PageMetadata,

    #[serde(default)]
    pub data: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMetadata {
    #[serde(default)]
    pub first: Option<String>,

    #[serde(default)]
    pub last: Option<String>,

    #[serde(default)]
    pub next: Option<String>,

    #[serde(default)]
    pub total_size: Option<u64>,
}
