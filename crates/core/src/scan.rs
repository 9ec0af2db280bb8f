//! Scanner payload normalization.
//!
//! Some printed labels encode a link to the public product page instead of a
//! bare code, so phone cameras resolve them to a web page. When such a URL
//! is scanned inside the app we unwrap it back to the `code` query parameter
//! before handing it to the lookup screens.

use url::Url;

/// Marker present in hybrid QR payloads that wrap a product code in a URL.
const PUBLIC_VIEW_MARKER: &str = "public-product-view.html";

/// Normalize a scanned payload to a bare product code.
///
/// If the payload is a public-product-view URL carrying a `code` query
/// parameter, that parameter is returned; otherwise the payload comes back
/// unchanged (including when the URL fails to parse).
pub fn normalize_scan(raw: &str) -> String {
    if raw.contains(PUBLIC_VIEW_MARKER) && raw.contains("code=") {
        if let Ok(url) = Url::parse(raw) {
            if let Some((_, code)) = url.query_pairs().find(|(k, _)| k == "code") {
                if !code.is_empty() {
                    return code.into_owned();
                }
            }
        }
    }
    raw.to_string()
}
