// Color parsing for command line input

use thiserror::Error;

/// Colors that can be given by name
pub const NAMED_COLORS: &[(&str, (i64, i64, i64))] = &[
    ("red", (255, 0, 0)),
    ("green", (0, 255, 0)),
    ("blue", (0, 0, 255)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 102, 204)),
    ("cyan", (127, 255, 212)),
    ("magenta", (252, 116, 253)),
    ("purple", (128, 0, 128)),
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "invalid color {input:?}: expected one of {}, #RRGGBB or three integers",
    color_names().join(", ")
)]
pub struct ColorParseError {
    pub input: String,
}

/// Names accepted by [`parse_color`]
pub fn color_names() -> Vec<&'static str> {
    NAMED_COLORS.iter().map(|(name, _)| *name).collect()
}

/// Look up a named color, case-insensitively
pub fn named_color(name: &str) -> Option<(i64, i64, i64)> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, rgb)| *rgb)
}

/// Parse a color from command line values
///
/// Accepts a single name or `#RRGGBB`, or three integers. Range checking is
/// left to the keyboard so the error names the offending values.
pub fn parse_color<S: AsRef<str>>(values: &[S]) -> Result<(i64, i64, i64), ColorParseError> {
    let error = || ColorParseError {
        input: values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(" "),
    };

    match values {
        [single] => {
            let single = single.as_ref();
            if let Some(rgb) = named_color(single) {
                return Ok(rgb);
            }
            parse_hex(single).ok_or_else(error)
        }
        [r, g, b] => {
            let channel = |s: &S| s.as_ref().trim().parse::<i64>().ok();
            match (channel(r), channel(g), channel(b)) {
                (Some(r), Some(g), Some(b)) => Ok((r, g, b)),
                _ => Err(error()),
            }
        }
        _ => Err(error()),
    }
}

fn parse_hex(s: &str) -> Option<(i64, i64, i64)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| i64::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color(&["red"]), Ok((255, 0, 0)));
        assert_eq!(parse_color(&["Orange"]), Ok((255, 165, 0)));
        assert_eq!(parse_color(&["cyan"]), Ok((127, 255, 212)));
        assert_eq!(color_names().len(), 8);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(parse_color(&["#ff6600"]), Ok((255, 102, 0)));
        assert_eq!(parse_color(&["#FF6600"]), Ok((255, 102, 0)));
        assert!(parse_color(&["ff6600"]).is_err());
        assert!(parse_color(&["#ff66"]).is_err());
        assert!(parse_color(&["#gg0000"]).is_err());
        assert!(parse_color(&["#+f0000"]).is_err());
    }

    #[test]
    fn test_rgb_triple() {
        assert_eq!(parse_color(&["1", "2", "3"]), Ok((1, 2, 3)));
        // Out of range values are passed on for the keyboard to reject
        assert_eq!(parse_color(&["300", "0", "-1"]), Ok((300, 0, -1)));
        assert!(parse_color(&["1", "two", "3"]).is_err());
    }

    #[test]
    fn test_wrong_arity() {
        let err = parse_color(&["1", "2"]).unwrap_err();
        assert_eq!(err.input, "1 2");
        assert!(err.to_string().contains("magenta"));
        assert!(parse_color::<&str>(&[]).is_err());
    }
}
