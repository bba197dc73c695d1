//! The NOTAM record model.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::parse::parse_fields;

/// A NOTAM record as entered by the operator and persisted on disk.
///
/// Field names match both the form inputs and the YAML keys of the per-day
/// files (`ident`, `lat`, `lon`, `rad`), so day files round-trip without a
/// mapping layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotam {
    /// Short free-text identifier, 1-20 characters.
    pub ident: String,
    /// Latitude as `DDMMSS[NS]`, e.g. `123456N`.
    pub lat: String,
    /// Longitude as `[D]DDMMSS[EW]`, e.g. `0765432W`.
    pub lon: String,
    /// Radius of effect as 1-5 digits with optional `NM` suffix, e.g. `500NM`.
    pub rad: String,
}

impl RawNotam {
    pub fn new(
        ident: impl Into<String>,
        lat: impl Into<String>,
        lon: impl Into<String>,
        rad: impl Into<String>,
    ) -> Self {
        Self {
            ident: ident.into(),
            lat: lat.into(),
            lon: lon.into(),
            rad: rad.into(),
        }
    }

    /// Validate this record, producing the decoded form.
    pub fn validate(&self) -> Result<Notam, ValidationError> {
        parse_fields(&self.ident, &self.lat, &self.lon, &self.rad)
    }
}

/// A validated NOTAM with decoded coordinates.
///
/// Holds both the raw fields (what gets persisted and displayed) and the
/// derived values used for plotting. Only constructible through the parser,
/// so `|lat_deg| <= 90`, `|lon_deg| <= 180` and `radius_nm > 0` hold by
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Notam {
    raw: RawNotam,
    lat_deg: f64,
    lon_deg: f64,
    radius_nm: f64,
}

impl Notam {
    pub(crate) fn from_parts(raw: RawNotam, lat_deg: f64, lon_deg: f64, radius_nm: f64) -> Self {
        Self {
            raw,
            lat_deg,
            lon_deg,
            radius_nm,
        }
    }

    pub fn raw(&self) -> &RawNotam {
        &self.raw
    }

    pub fn ident(&self) -> &str {
        &self.raw.ident
    }

    /// Signed decimal latitude in degrees.
    pub fn lat_deg(&self) -> f64 {
        self.lat_deg
    }

    /// Signed decimal longitude in degrees.
    pub fn lon_deg(&self) -> f64 {
        self.lon_deg
    }

    /// Radius of effect in nautical miles.
    pub fn radius_nm(&self) -> f64 {
        self.radius_nm
    }

    pub fn into_raw(self) -> RawNotam {
        self.raw
    }
}
