use super::*;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

pub(crate) fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

pub(crate) fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

pub(crate) fn escape_html_text_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn escape_html_attr_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for raw_decl in style_attr.split(';') {
        let Some((name, value)) = raw_decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }
        out.push((name, value.to_string()));
    }
    out
}

pub(crate) fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(name, value)| format!("{name}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn px_length_regex() -> Option<&'static fancy_regex::Regex> {
    static PX_LENGTH: OnceLock<Option<fancy_regex::Regex>> = OnceLock::new();
    PX_LENGTH
        .get_or_init(|| fancy_regex::Regex::new(r"^\s*(-?\d+(?:\.\d+)?)(?:px)?\s*$").ok())
        .as_ref()
}

/// Parses a CSS pixel length such as `2px` or `1.5`. Anything else reads as zero,
/// the same way `parseInt` on a computed border width degrades.
pub(crate) fn parse_px_length(raw: &str) -> f64 {
    let Some(regex) = px_length_regex() else {
        return 0.0;
    };
    match regex.captures(raw) {
        Ok(Some(captures)) => captures
            .get(1)
            .and_then(|number| number.as_str().parse::<f64>().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

pub(crate) fn format_px(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0px".to_string();
    }
    format!("{rounded}px")
}

/// Strips and collapses ASCII whitespace, as an option's text-derived value does.
pub(crate) fn collapse_whitespace(raw: &str) -> String {
    raw.split(|ch: char| ch.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// NFC-normalizes and collapses whitespace the way rendered option text reads.
pub(crate) fn normalize_visible_text(raw: &str) -> String {
    raw.nfc()
        .collect::<String>()
        .split(char::is_whitespace)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn px_lengths_parse_with_and_without_unit() {
        assert_eq!(parse_px_length("2px"), 2.0);
        assert_eq!(parse_px_length(" 1.5px "), 1.5);
        assert_eq!(parse_px_length("3"), 3.0);
        assert_eq!(parse_px_length("thin"), 0.0);
        assert_eq!(parse_px_length(""), 0.0);
    }

    #[test]
    fn format_px_drops_trailing_zeroes() {
        assert_eq!(format_px(0.0), "0px");
        assert_eq!(format_px(72.0), "72px");
        assert_eq!(format_px(12.346), "12.35px");
    }

    #[test]
    fn visible_text_is_composed_and_collapsed() {
        assert_eq!(normalize_visible_text("  Cafe\u{301}\n  au   lait "), "Caf\u{e9} au lait");
    }

    #[test]
    fn style_declarations_round_trip_through_serializer() {
        let decls = parse_style_declarations(Some("display:none; height : 0px;;bogus"));
        assert_eq!(
            decls,
            vec![
                ("display".to_string(), "none".to_string()),
                ("height".to_string(), "0px".to_string()),
            ]
        );
        assert_eq!(
            serialize_style_declarations(&decls),
            "display: none; height: 0px;"
        );
    }
}
