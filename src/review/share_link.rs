//! Shareable review links and their QR rendering.
//!
//! A link points back at the review form with the shop name and location as
//! query parameters, so scanning it opens a pre-filled form.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use qrcode::QrCode;
use qrcode::render::svg;

/// Path of the review form, relative to the share host.
pub const FORM_PATH: &str = "/Qr";

/// Minimum edge of the rendered QR code in pixels.
pub const QR_MIN_SIZE: u32 = 200;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Form path with both parameters, empty values included.
pub fn form_path(shop_name: &str, location: &str) -> String {
    format!(
        "{FORM_PATH}?shopName={}&location={}",
        encode_component(shop_name),
        encode_component(location)
    )
}

/// Absolute shareable link, only once both fields are filled in.
pub fn share_link(base: &str, shop_name: &str, location: &str) -> Option<String> {
    if shop_name.is_empty() || location.is_empty() {
        return None;
    }
    Some(format!(
        "{}{}",
        base.trim_end_matches('/'),
        form_path(shop_name, location)
    ))
}

/// Render any string as an SVG QR code.
pub fn render_qr_svg(value: &str) -> Result<String, qrcode::types::QrError> {
    let code = QrCode::new(value.as_bytes())?;
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
        .build())
}
