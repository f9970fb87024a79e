//! Base URL checks

use url::Url;

/// Validate a backend origin.
///
/// The URL must parse, use `http` or `https`, carry a host, and have no
/// query or fragment (the API path is appended to it).
pub fn validate_base_url(url_str: &str, context: &str) -> Result<(), String> {
    if url_str.trim().is_empty() {
        return Err(format!("{} cannot be empty", context));
    }

    let url =
        Url::parse(url_str).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(format!(
                "{} must use http:// or https:// scheme, got: {}",
                context, scheme
            ));
        }
    }

    if url.host_str().is_none() {
        return Err(format!("{} URL must have a valid host", context));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(format!("{} must not contain a query or fragment", context));
    }

    Ok(())
}
