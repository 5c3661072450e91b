//! Link extraction from raw page markup
//!
//! Links are located with the catalog's regular expressions rather than an
//! HTML parser, so anything the patterns match is reported, including links
//! inside comments or scripts.

use crate::config::FileTypeCatalog;
use crate::crawler::fetcher::{fetch_bytes, FetchResult};
use crate::url::resolve_url;
use regex::Regex;
use reqwest::Client;
use url::Url;

/// Lazy sequence of absolute link URLs found on one page
///
/// Matches are computed while iterating, pattern by pattern, in catalog order
/// then pattern-list order. The sequence is finite and cannot be restarted;
/// scanning the page again means fetching it again. Nothing is deduplicated:
/// a link matched by two patterns is yielded twice.
#[derive(Debug)]
pub struct ExtractedLinks {
    page_url: Url,
    body: String,
    patterns: std::vec::IntoIter<Regex>,
    current: Option<Regex>,
    offset: usize,
}

impl ExtractedLinks {
    fn new(page_url: Url, body: String, patterns: Vec<Regex>) -> Self {
        Self {
            page_url,
            body,
            patterns: patterns.into_iter(),
            current: None,
            offset: 0,
        }
    }

    /// A sequence that yields nothing (used when the page fetch fails)
    pub fn empty(page_url: Url) -> Self {
        Self::new(page_url, String::new(), Vec::new())
    }

    /// Finds the next match of the current pattern at or after `offset`
    ///
    /// Returns the match span and the captured link text.
    fn next_match(&self) -> Option<(usize, usize, String)> {
        let regex = self.current.as_ref()?;
        if self.offset > self.body.len() {
            return None;
        }

        let caps = regex.captures_at(&self.body, self.offset)?;
        let whole = caps.get(0)?;
        let link = caps.get(1).unwrap_or(whole);
        Some((whole.start(), whole.end(), link.as_str().to_string()))
    }
}

impl Iterator for ExtractedLinks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if self.current.is_none() {
                self.current = Some(self.patterns.next()?);
                self.offset = 0;
            }

            match self.next_match() {
                Some((start, end, link)) => {
                    // Step past empty matches so the scan always advances
                    self.offset = if end > start {
                        end
                    } else {
                        end + self.body[end..].chars().next().map_or(1, char::len_utf8)
                    };
                    return Some(resolve_url(&self.page_url, &link));
                }
                None => self.current = None,
            }
        }
    }
}

/// Scans already-fetched markup for links of the requested file types
///
/// # Arguments
///
/// * `body` - The page markup
/// * `page_url` - The URL relative links are resolved against
/// * `file_types` - Requested identifiers; unknown ones match nothing
/// * `catalog` - The catalog supplying the patterns
///
/// # Example
///
/// ```
/// use miles::config::FileTypeCatalog;
/// use miles::crawler::scan_links;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/gallery/").unwrap();
/// let html = r#"<img src="cat.jpg">"#.to_string();
/// let links: Vec<_> = scan_links(html, &page, &["jpg"], &FileTypeCatalog::builtin()).collect();
/// assert_eq!(links, vec!["https://example.com/gallery/cat.jpg"]);
/// ```
pub fn scan_links<S: AsRef<str>>(
    body: String,
    page_url: &Url,
    file_types: &[S],
    catalog: &FileTypeCatalog,
) -> ExtractedLinks {
    ExtractedLinks::new(page_url.clone(), body, catalog.patterns_for(file_types))
}

/// Fetches a page once and returns the lazy sequence of matching links
///
/// A transport failure or non-2xx status is not an error: it is logged and
/// the returned sequence is empty.
pub async fn extract_links<S: AsRef<str>>(
    client: &Client,
    page_url: &Url,
    file_types: &[S],
    catalog: &FileTypeCatalog,
) -> ExtractedLinks {
    match fetch_bytes(client, page_url.as_str()).await {
        FetchResult::Success {
            final_url, body, ..
        } => {
            tracing::debug!(
                "Fetched {} ({} bytes, final URL {})",
                page_url,
                body.len(),
                final_url
            );
            let body = String::from_utf8_lossy(&body).into_owned();
            scan_links(body, page_url, file_types, catalog)
        }
        FetchResult::HttpError { status_code } => {
            tracing::warn!("Page {} returned HTTP {}, no links extracted", page_url, status_code);
            ExtractedLinks::empty(page_url.clone())
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Page {} could not be fetched: {}", page_url, error);
            ExtractedLinks::empty(page_url.clone())
        }
    }
}
