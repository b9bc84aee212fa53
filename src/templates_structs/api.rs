use serde::Serialize;

/// Live share link and its QR code, fetched by the form as the user types.
#[derive(Serialize, Debug, Clone)]
pub struct ShareCodeResponse {
    pub link: String,
    pub svg: Option<String>,
}
