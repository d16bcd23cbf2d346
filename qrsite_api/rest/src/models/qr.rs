use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ApiQrRequest {
    pub text: String,
    pub width: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQrResponse {
    /// `None` if the text was blank.
    pub data_url: Option<String>,
    pub width: u32,
}
