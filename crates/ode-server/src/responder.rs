//! TOC responder: selection handling and TOC production for `/toc_bin`.

use bytes::Bytes;

use ode_core::{Error, Result};

use crate::catalog::Catalog;
use crate::session::Session;

/// Apply an optional catalog selection, then parse the selected image.
///
/// A selector that matches nothing is logged and the previous selection is
/// kept, so the response describes whatever image was selected before. A
/// parse failure leaves the session's TOC unchanged.
pub fn produce_toc(
    session: &mut Session,
    catalog: &Catalog,
    selector: Option<i64>,
) -> Result<Bytes> {
    if let Some(id) = selector {
        match catalog.lookup_filename(id) {
            Some(path) => {
                tracing::trace!(id, path = %path.display(), "Selection found");
                session.select_image(path);
            }
            None => {
                let err = Error::not_found("game", id);
                tracing::error!(
                    current = ?session.selected_image(),
                    "{err}, keeping current selection"
                );
            }
        }
    }

    session.load_toc().cloned()
}

/// Parse a selector path segment the way `%d` does: optional leading
/// whitespace and sign, then digits. Anything else selects nothing.
pub fn parse_selector(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
