//! JSON envelope returned by the hub's yaml endpoint.
//!
//! The hub reports "not found" as a 200 with a sentinel body
//! (`{"name":"not-found", ...}`). That body carries no `data` field, so with
//! defaulted fields it deserializes to an empty yaml payload — empty content,
//! not an error. Found/not-found is decided by body shape, never by HTTP
//! status, because the upstream does not reserve status codes for this case.

use serde::Deserialize;

/// Top-level envelope for a yaml resource response.
#[derive(Debug, Default, Deserialize)]
pub struct HubResponse {
    #[serde(default)]
    pub data: HubResourceData,
}

/// Payload of a successful response: the manifest text.
#[derive(Debug, Default, Deserialize)]
pub struct HubResourceData {
    #[serde(default)]
    pub yaml: String,
}
