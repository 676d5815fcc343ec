//! Intrinsic size discovery for SVG markup.
//!
//! Only the root `<svg>` element is inspected. The markup is scanned with
//! `quick-xml` up to that element; anything after it is never parsed, so
//! trailing garbage does not affect the result.

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::RasterError;

/// Leading decimal number, the way CSS-ish attribute values start (`"100px"`, `"50%"`).
static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
});

/// Size of an SVG document in user units. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    /// Width in user units.
    pub width: f64,
    /// Height in user units.
    pub height: f64,
}

impl Dimensions {
    /// Size used when the markup declares none.
    pub const DEFAULT: Self = Self {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
    };
}

/// Size-related attributes of the root element, as raw strings.
#[derive(Debug, Default)]
struct RootAttributes {
    view_box: Option<String>,
    width: Option<String>,
    height: Option<String>,
}

/// Derive the intrinsic size of SVG markup.
///
/// Resolution order:
/// 1. Width and height entries of `viewBox="minX minY W H"`, each used if positive.
/// 2. If either is still missing, the `width`/`height` attributes. An attribute
///    that is present replaces the corresponding value, even one taken from
///    `viewBox`.
/// 3. If either side is still missing or non-positive, both sides fall back to
///    300x150 together.
///
/// # Errors
///
/// Returns [`RasterError::MalformedInput`] if no `<svg>` element is found.
pub fn resolve_dimensions(markup: &str) -> Result<Dimensions, RasterError> {
    let attrs = find_root_attributes(markup)?;

    let (mut width, mut height) = attrs
        .view_box
        .as_deref()
        .map_or((None, None), view_box_size);

    if width.is_none() || height.is_none() {
        if let Some(value) = attrs.width.as_deref() {
            width = parse_positive(value);
        }
        if let Some(value) = attrs.height.as_deref() {
            height = parse_positive(value);
        }
    }

    let dimensions = match (width, height) {
        (Some(width), Some(height)) => Dimensions { width, height },
        _ => Dimensions::DEFAULT,
    };
    tracing::debug!(
        width = dimensions.width,
        height = dimensions.height,
        "Resolved SVG dimensions"
    );
    Ok(dimensions)
}

/// Width and height entries of a `viewBox` value.
fn view_box_size(view_box: &str) -> (Option<f64>, Option<f64>) {
    let mut parts = view_box.split_whitespace().skip(2);
    let width = parts.next().and_then(parse_positive);
    let height = parts.next().and_then(parse_positive);
    (width, height)
}

/// Parse the leading number of an attribute value, keeping it only if positive.
fn parse_positive(value: &str) -> Option<f64> {
    parse_leading_number(value).filter(|v| v.is_finite() && *v > 0.0)
}

/// Parse the longest numeric prefix of `value`, ignoring any unit suffix.
fn parse_leading_number(value: &str) -> Option<f64> {
    let matched = LEADING_NUMBER_RE.find(value)?;
    matched.as_str().trim_start().parse().ok()
}

/// Scan markup up to the first `<svg>` element and collect its size attributes.
fn find_root_attributes(markup: &str) -> Result<RootAttributes, RasterError> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e) | Event::Empty(e)) if is_svg_element(&e) => {
                return Ok(collect_attributes(&e));
            }
            Ok(Event::Eof) => {
                return Err(RasterError::MalformedInput("No SVG element found".to_owned()));
            }
            Ok(_) => {}
            Err(e) => {
                return Err(RasterError::MalformedInput(format!(
                    "markup could not be parsed: {e}"
                )));
            }
        }
    }
}

/// Whether an element is `<svg>`, ignoring namespace prefix and ASCII case.
fn is_svg_element(e: &BytesStart) -> bool {
    e.local_name().as_ref().eq_ignore_ascii_case(b"svg")
}

fn collect_attributes(e: &BytesStart) -> RootAttributes {
    let mut attrs = RootAttributes::default();
    for attr in e.attributes().flatten() {
        let key = attr.key.local_name();
        let slot = match key.as_ref() {
            k if k.eq_ignore_ascii_case(b"viewBox") => &mut attrs.view_box,
            k if k.eq_ignore_ascii_case(b"width") => &mut attrs.width,
            k if k.eq_ignore_ascii_case(b"height") => &mut attrs.height,
            _ => continue,
        };
        let value = attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            Cow::into_owned,
        );
        slot.get_or_insert(value);
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dims(width: f64, height: f64) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn test_view_box_takes_priority() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20" viewBox="0 0 100 50"></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(100.0, 50.0));
    }

    #[test]
    fn test_width_height_attributes() {
        let svg = r#"<svg width="640" height="480"><rect/></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(640.0, 480.0));
    }

    #[test]
    fn test_width_height_with_units() {
        let svg = r#"<svg width="120px" height="40.5pt"/>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(120.0, 40.5));
    }

    #[test]
    fn test_no_size_information_uses_defaults() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><circle r="5"/></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(300.0, 150.0));
    }

    #[test]
    fn test_one_missing_side_resets_both() {
        let svg = r#"<svg width="640"></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), Dimensions::DEFAULT);
    }

    #[test]
    fn test_non_numeric_attribute_resets_both() {
        let svg = r#"<svg width="auto" height="480"></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), Dimensions::DEFAULT);
    }

    #[test]
    fn test_zero_or_negative_sizes_reset_both() {
        let zero = r#"<svg viewBox="0 0 0 50"></svg>"#;
        let negative = r#"<svg width="-20" height="10"></svg>"#;
        assert_eq!(resolve_dimensions(zero).unwrap(), Dimensions::DEFAULT);
        assert_eq!(resolve_dimensions(negative).unwrap(), Dimensions::DEFAULT);
    }

    #[test]
    fn test_partial_view_box_completed_by_attribute() {
        let svg = r#"<svg viewBox="0 0 100 oops" height="40"></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(100.0, 40.0));
    }

    #[test]
    fn test_attribute_overrides_view_box_entry_when_incomplete() {
        let svg = r#"<svg viewBox="0 0 100" width="70" height="30"></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(70.0, 30.0));
    }

    #[test]
    fn test_view_box_with_extra_whitespace() {
        let svg = "<svg viewBox=\"  0\t0\n 64   32 \"></svg>";
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(64.0, 32.0));
    }

    #[test]
    fn test_prolog_and_doctype_are_skipped() {
        let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<!-- generated -->
<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4"></svg>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(8.0, 4.0));
    }

    #[test]
    fn test_first_svg_inside_wrapper() {
        let svg = r#"<div><p>chart</p><svg width="12" height="6"><svg width="1" height="1"/></svg></div>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(12.0, 6.0));
    }

    #[test]
    fn test_prefixed_svg_element() {
        let svg = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" width="5" height="7"/>"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(5.0, 7.0));
    }

    #[test]
    fn test_trailing_garbage_is_ignored() {
        let svg = r#"<svg width="10" height="10"></svg></not-closed><<<"#;
        assert_eq!(resolve_dimensions(svg).unwrap(), dims(10.0, 10.0));
    }

    #[test]
    fn test_missing_svg_element() {
        let err = resolve_dimensions("<html><body>nothing here</body></html>").unwrap_err();
        assert!(
            matches!(err, RasterError::MalformedInput(_)),
            "Expected RasterError::MalformedInput, got {err:?}"
        );
        assert_eq!(err.to_string(), "Invalid SVG: No SVG element found");
    }

    #[test]
    fn test_empty_markup() {
        assert!(matches!(
            resolve_dimensions(""),
            Err(RasterError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("42"), Some(42.0));
        assert_eq!(parse_leading_number(" 1.5em"), Some(1.5));
        assert_eq!(parse_leading_number(".25"), Some(0.25));
        assert_eq!(parse_leading_number("1e2px"), Some(100.0));
        assert_eq!(parse_leading_number("-3"), Some(-3.0));
        assert_eq!(parse_leading_number("px"), None);
        assert_eq!(parse_leading_number(""), None);
    }
}
