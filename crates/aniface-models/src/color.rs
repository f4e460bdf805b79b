//! Stroke-color spec parsing for annotation.

use thiserror::Error;

/// Default stroke color (red-orange), RGBA.
pub const DEFAULT_STROKE: [u8; 4] = [255, 44, 41, 255];

/// Errors that can occur when parsing a color spec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("unrecognized color spec: {0}")]
    Unrecognized(String),
}

/// Parse a stroke-color spec into RGBA bytes.
///
/// Accepts `#RGB`, `#RRGGBB`, `#RRGGBBAA`, or one of a small set of named
/// colors. Alpha defaults to fully opaque.
pub fn parse_color(spec: &str) -> Result<[u8; 4], ColorError> {
    let s = spec.trim();
    let parsed = match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => named(s),
    };
    parsed.ok_or_else(|| ColorError::Unrecognized(spec.to_string()))
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    // Length checks below are byte lengths; multi-byte input must not
    // reach the pair slicing.
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => {
            let mut out = [0u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            out[3] = 255;
            Some(out)
        }
        6 | 8 => {
            let mut out = [0u8, 0, 0, 255];
            for i in 0..hex.len() / 2 {
                out[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
            }
            Some(out)
        }
        _ => None,
    }
}

fn named(name: &str) -> Option<[u8; 4]> {
    let rgb = match name.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "gray" | "grey" => [128, 128, 128],
        _ => return None,
    };
    Some([rgb[0], rgb[1], rgb[2], 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_long() {
        assert_eq!(parse_color("#ff2c29").unwrap(), [255, 44, 41, 255]);
        assert_eq!(parse_color("#FF2C29").unwrap(), [255, 44, 41, 255]);
        assert_eq!(parse_color("#00000080").unwrap(), [0, 0, 0, 128]);
    }

    #[test]
    fn test_parse_hex_short() {
        assert_eq!(parse_color("#f00").unwrap(), [255, 0, 0, 255]);
        assert_eq!(parse_color("#0f0").unwrap(), [0, 255, 0, 255]);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_color("red").unwrap(), [255, 0, 0, 255]);
        assert_eq!(parse_color("Orange").unwrap(), [255, 165, 0, 255]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("notacolor").is_err());
        assert!(parse_color("#gghhii").is_err());
    }

    #[test]
    fn test_parse_multibyte_spec_is_rejected() {
        // Two euro signs are six bytes; slicing byte pairs out of that
        // must yield an error, not a char-boundary panic.
        assert_eq!(
            parse_color("#\u{20ac}\u{20ac}"),
            Err(ColorError::Unrecognized("#\u{20ac}\u{20ac}".to_string()))
        );
        assert!(parse_color("#\u{e9}\u{e9}\u{e9}").is_err());
        assert!(parse_color("c\u{f4}te").is_err());
    }
}
