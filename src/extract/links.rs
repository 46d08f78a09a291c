// src/extract/links.rs
// =============================================================================
// This module finds the links on a page that the crawler should follow.
//
// How it works:
// 1. Walk every <a> element the Document exposes
// 2. Skip elements with no href
// 3. Resolve the href against the page URL (relative -> absolute)
// 4. Drop the #fragment, it points into the same page
// 5. Keep the link only if its hostname ends with the crawl domain
//
// The domain check is a plain suffix match, so "blog.site.com" is in scope
// for "site.com" (good) but so is "othersite.com" (a known over-inclusion).
// =============================================================================

use std::collections::HashSet;

use tracing::{debug, warn};
use url::Url;

use crate::fetch::Document;

/// Collects the in-domain links of a page
///
/// Parameters:
///   base_url: the URL of the page (for resolving relative links)
///   document: the fetched page
///   domain: the crawl's domain, matched as a hostname suffix
///
/// A bad href is skipped on its own. If the anchor list itself breaks
/// halfway, the links gathered so far are still returned.
pub fn extract_links<D>(base_url: &str, document: &D, domain: &str) -> HashSet<String>
where
    D: Document + ?Sized,
{
    let mut links = HashSet::new();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid base URL {}: {}", base_url, e);
            return links;
        }
    };

    for anchor in document.anchors() {
        let anchor = match anchor {
            Ok(anchor) => anchor,
            Err(e) => {
                warn!("Error parsing links on {}: {}", base_url, e);
                break;
            }
        };

        let Some(href) = anchor.href else {
            continue;
        };
        // An empty href is the page itself, nothing new to follow
        if href.trim().is_empty() {
            continue;
        }

        match resolve_link(&base, &href) {
            Some(url) if in_domain(&url, domain) => {
                links.insert(url.to_string());
            }
            Some(_) => {}
            None => debug!("Skipping unresolvable href {:?} on {}", href, base_url),
        }
    }

    links
}

/// Normalizes a URL the way the frontier keys it: parsed, fragment removed
pub fn normalize_url(url: &str) -> Option<String> {
    let mut url = Url::parse(url).ok()?;
    url.set_fragment(None);
    Some(url.to_string())
}

// Resolves a (possibly relative) href to an absolute URL without fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href.trim()).ok()?;
    url.set_fragment(None);
    Some(url)
}

// Only web pages on the crawl domain (or anything ending with it)
fn in_domain(url: &Url, domain: &str) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url.host_str().map_or(false, |host| host.ends_with(domain))
}
