//! Resolve the link behind a click and the path it points at

use url::{Position, Url};

use crate::host::{ClickEvent, ElementId, Host};

/// Nearest element, starting at the click target and walking outward, that
/// exposes an `href`
///
/// Covers clicks on markup nested inside a link. `None` means the click was
/// not a navigation click.
pub fn resolve_anchor<H: Host + ?Sized>(host: &H, event: &ClickEvent) -> Option<ElementId> {
    let mut current = Some(event.target);
    while let Some(element) = current {
        if host.href(element).is_some() {
            return Some(element);
        }
        current = host.parent(element);
    }
    None
}

/// The anchor's href with the current origin removed
pub fn path_of<H: Host + ?Sized>(host: &H, anchor: ElementId) -> Option<String> {
    let href = host.href(anchor)?;
    Some(strip_origin(&href, &host.origin()))
}

/// Remove `origin` from the front of `href`
///
/// Same-origin URLs become `path?query#fragment`. Anything else is returned
/// unchanged; patterns are expected to be written for internal paths.
pub fn strip_origin(href: &str, origin: &str) -> String {
    if let (Ok(url), Ok(base)) = (Url::parse(href), Url::parse(origin)) {
        if url.origin() == base.origin() {
            return url[Position::BeforePath..].to_string();
        }
        return href.to_string();
    }

    href.strip_prefix(origin).unwrap_or(href).to_string()
}
