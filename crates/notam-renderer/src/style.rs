//! Base map styles.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use thiserror::Error;

/// Which base map the rendered plots are drawn over.
///
/// Each style maps to its own base image file under the image directory; a
/// missing base is synthesized as a blank ocean-and-graticule map in the
/// style's palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapStyle {
    /// Minimalist flat map.
    Basic,
    /// Dark satellite-photo look.
    Marble,
    /// Pale relief look.
    Etopo,
    /// Shaded relief (default).
    #[default]
    Shaded,
}

impl MapStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapStyle::Basic => "basic",
            MapStyle::Marble => "marble",
            MapStyle::Etopo => "etopo",
            MapStyle::Shaded => "shaded",
        }
    }

    /// File name of this style's base map image.
    pub fn base_map_name(&self) -> String {
        format!("{}_map.png", self.as_str())
    }

    /// Ocean fill used when synthesizing a blank base map.
    pub fn ocean_color(&self) -> Rgba<u8> {
        match self {
            MapStyle::Basic => Rgba([127, 205, 255, 255]),
            MapStyle::Marble => Rgba([8, 16, 48, 255]),
            MapStyle::Etopo => Rgba([170, 207, 229, 255]),
            MapStyle::Shaded => Rgba([100, 155, 200, 255]),
        }
    }

    /// Graticule line color for the synthesized base map.
    pub fn grid_color(&self) -> Rgba<u8> {
        match self {
            MapStyle::Marble => Rgba([80, 90, 120, 255]),
            _ => Rgba([220, 230, 240, 255]),
        }
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(MapStyle::Basic),
            "marble" => Ok(MapStyle::Marble),
            "etopo" => Ok(MapStyle::Etopo),
            "shaded" => Ok(MapStyle::Shaded),
            other => Err(StyleParseError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleParseError {
    #[error("unknown map style: {0} (expected basic, marble, etopo or shaded)")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_styles() {
        assert_eq!("shaded".parse::<MapStyle>().unwrap(), MapStyle::Shaded);
        assert_eq!("MARBLE".parse::<MapStyle>().unwrap(), MapStyle::Marble);
        assert!("mercator".parse::<MapStyle>().is_err());
    }

    #[test]
    fn test_base_map_name() {
        assert_eq!(MapStyle::Etopo.base_map_name(), "etopo_map.png");
    }
}
