/// Returns the local file name for a download URL
///
/// The name is the text after the final `/`, taken verbatim (no percent
/// decoding, no query stripping). A URL ending in `/` yields an empty name.
///
/// # Examples
///
/// ```
/// use miles::url::file_name_from_url;
///
/// assert_eq!(file_name_from_url("https://example.com/img/ostep.jpg"), "ostep.jpg");
/// assert_eq!(file_name_from_url("https://example.com/dir/"), "");
/// ```
pub fn file_name_from_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}
