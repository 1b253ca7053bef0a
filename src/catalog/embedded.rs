//! Locating JSON payloads that the server embedded in the quote page
//!
//! The page ships each table as `<script id="..." type="application/json">`.

use crate::error::{QuoteError, Result};

pub const PRICING_SCRIPT_ID: &str = "pricing-data";
pub const CARS_SCRIPT_ID: &str = "cars-data";
pub const MODIFIERS_SCRIPT_ID: &str = "modifiers-data";

/// Return the text content of the element with the given id
pub fn script_text<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let start_tag = find_tag_with_id(html, id)?;
    let body_start = start_tag + html[start_tag..].find('>')? + 1;
    let body_len = html[body_start..].find("</script")?;
    Some(html[body_start..body_start + body_len].trim())
}

/// Like [`script_text`] but an absent tag is an error
pub fn require_script_text<'a>(html: &'a str, id: &str) -> Result<&'a str> {
    script_text(html, id)
        .ok_or_else(|| QuoteError::CatalogParse(format!("No <script id=\"{}\"> in page", id)))
}

fn find_tag_with_id(html: &str, id: &str) -> Option<usize> {
    let needles = [format!("id=\"{}\"", id), format!("id='{}'", id)];
    let mut offset = 0;

    while let Some(pos) = html[offset..].find("<script") {
        let tag_start = offset + pos;
        let tag_end = tag_start + html[tag_start..].find('>')?;
        let tag = &html[tag_start..tag_end];

        if needles.iter().any(|needle| tag.contains(needle.as_str())) {
            return Some(tag_start);
        }
        offset = tag_end;
    }

    None
}
