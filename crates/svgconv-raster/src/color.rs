//! Background colors.

use std::str::FromStr;

use crate::error::RasterError;

/// An RGBA background color parsed from a CSS color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Background {
    /// Opaque white, the JPG default.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    /// Parse any CSS color: `#fff`, `#ffffff80`, `rgb(...)`, `hsl(...)`, named colors.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidColor`] if the string is not a CSS color.
    pub fn parse(value: &str) -> Result<Self, RasterError> {
        let color = csscolorparser::parse(value.trim()).map_err(|e| RasterError::InvalidColor {
            value: value.to_owned(),
            reason: e.to_string(),
        })?;
        let [r, g, b, a] = color.to_rgba8();
        Ok(Self { r, g, b, a })
    }

    /// The same color with full opacity, for formats without alpha.
    #[must_use]
    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }
}

impl FromStr for Background {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Background::parse("#ffffff").unwrap(), Background::WHITE);
        assert_eq!(
            Background::parse("#f00").unwrap(),
            Background {
                r: 255,
                g: 0,
                b: 0,
                a: 255
            }
        );
    }

    #[test]
    fn test_parse_named_and_functional() {
        assert_eq!(Background::parse("white").unwrap(), Background::WHITE);
        assert_eq!(
            "rgb(0, 128, 255)".parse::<Background>().unwrap(),
            Background {
                r: 0,
                g: 128,
                b: 255,
                a: 255
            }
        );
    }

    #[test]
    fn test_parse_transparent() {
        let color = Background::parse("transparent").unwrap();
        assert_eq!(color.a, 0);
        assert_eq!(color.opaque().a, 255);
    }

    #[test]
    fn test_parse_invalid() {
        let err = Background::parse("not-a-color").unwrap_err();
        assert!(
            matches!(err, RasterError::InvalidColor { ref value, .. } if value == "not-a-color"),
            "Expected RasterError::InvalidColor, got {err:?}"
        );
    }
}
