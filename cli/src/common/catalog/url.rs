//! Storefront link assembly.

/// Joins the storefront base URL and a product URL key with exactly one `/`.
///
/// Trailing slashes on `base_url` and leading slashes on `url_key` are
/// collapsed, so `("http://shop.example/", "/red-shoes")` gives
/// `http://shop.example/red-shoes`.
pub fn product_url(base_url: &str, url_key: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let key = url_key.trim().trim_start_matches('/');
    format!("{}/{}", base, key)
}
