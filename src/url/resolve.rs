use url::Url;

/// Resolves a link discovered on a page into an absolute URL string
///
/// Candidates containing `//` (absolute or scheme-relative) are returned
/// untouched. Everything else is joined against `base` using standard
/// relative-reference resolution, so `../`, root-relative paths, queries and
/// fragments behave the way a browser would treat them.
///
/// Resolution never fails: if the join is rejected the candidate is handed
/// back as-is.
///
/// # Arguments
///
/// * `base` - The URL of the page the link was found on
/// * `candidate` - The raw link text captured from the markup
///
/// # Examples
///
/// ```
/// use miles::url::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/teaching/").unwrap();
/// assert_eq!(
///     resolve_url(&base, "static/img/ostep.jpg"),
///     "https://example.com/teaching/static/img/ostep.jpg"
/// );
/// assert_eq!(
///     resolve_url(&base, "https://other.org/a.jpg"),
///     "https://other.org/a.jpg"
/// );
/// ```
pub fn resolve_url(base: &Url, candidate: &str) -> String {
    if candidate.contains("//") {
        return candidate.to_string();
    }

    match base.join(candidate) {
        Ok(absolute) => absolute.to_string(),
        Err(e) => {
            tracing::debug!("Could not resolve {} against {}: {}", candidate, base, e);
            candidate.to_string()
        }
    }
}
