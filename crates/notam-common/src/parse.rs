//! Fixed-width NOTAM coordinate parsing.
//!
//! NOTAM positions arrive as packed degree/minute/second strings:
//! latitude `DDMMSS[NS]`, longitude `[D]DDMMSS[EW]` (two or three degree
//! digits, so values up to 180 fit), and the radius as one to five digits
//! with an optional `NM` suffix. The fields are fixed width, so the parser
//! slices digit groups directly.

use crate::error::{FieldName, ValidationError};
use crate::notam::{Notam, RawNotam};

const MAX_IDENT_LEN: usize = 20;
const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;
const MAX_RADIUS_DIGITS: usize = 5;

/// Parse and validate the four NOTAM form fields.
///
/// Pure: on failure nothing is produced and no state is touched. The error
/// names the first failing field and why it failed, for inline display.
pub fn parse_fields(
    ident: &str,
    lat_raw: &str,
    lon_raw: &str,
    rad_raw: &str,
) -> Result<Notam, ValidationError> {
    let ident = parse_ident(ident)?;
    let lat_raw = lat_raw.trim().to_uppercase();
    let lon_raw = lon_raw.trim().to_uppercase();
    let rad_raw = rad_raw.trim().to_uppercase();

    let lat_deg = parse_latitude(&lat_raw)?;
    let lon_deg = parse_longitude(&lon_raw)?;
    let radius_nm = parse_radius(&rad_raw)?;

    Ok(Notam::from_parts(
        RawNotam::new(ident, lat_raw, lon_raw, rad_raw),
        lat_deg,
        lon_deg,
        radius_nm,
    ))
}

fn parse_ident(ident: &str) -> Result<String, ValidationError> {
    let ident = ident.trim();
    if ident.is_empty() {
        return Err(ValidationError::new(FieldName::Ident, "must not be empty"));
    }
    if ident.chars().count() > MAX_IDENT_LEN {
        return Err(ValidationError::new(
            FieldName::Ident,
            format!("must be at most {} characters", MAX_IDENT_LEN),
        ));
    }
    Ok(ident.to_string())
}

/// Decode `DDMMSS[NS]` into signed decimal degrees.
fn parse_latitude(lat: &str) -> Result<f64, ValidationError> {
    let field = FieldName::Lat;
    if lat.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    // Byte-indexed slicing below is only sound on ASCII input.
    if !lat.is_ascii() || lat.len() != 7 {
        return Err(ValidationError::new(
            field,
            "must be six digits followed by N or S (e.g. 123456N)",
        ));
    }
    let sign = match &lat[6..] {
        "N" => 1.0,
        "S" => -1.0,
        other => {
            return Err(ValidationError::new(
                field,
                format!("hemisphere must be N or S, got '{}'", other),
            ))
        }
    };
    let degrees = decode_dms(field, &lat[..6], 2)?;
    if degrees > MAX_LATITUDE {
        return Err(ValidationError::new(
            field,
            format!("exceeds {} degrees", MAX_LATITUDE),
        ));
    }
    Ok(sign * degrees)
}

/// Decode `[D]DDMMSS[EW]` into signed decimal degrees.
fn parse_longitude(lon: &str) -> Result<f64, ValidationError> {
    let field = FieldName::Lon;
    if lon.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if !lon.is_ascii() || (lon.len() != 7 && lon.len() != 8) {
        return Err(ValidationError::new(
            field,
            "must be six or seven digits followed by E or W (e.g. 0765432W)",
        ));
    }
    let (digits, compass) = lon.split_at(lon.len() - 1);
    let sign = match compass {
        "E" => 1.0,
        "W" => -1.0,
        other => {
            return Err(ValidationError::new(
                field,
                format!("compass direction must be E or W, got '{}'", other),
            ))
        }
    };
    let degrees = decode_dms(field, digits, digits.len() - 4)?;
    if degrees > MAX_LONGITUDE {
        return Err(ValidationError::new(
            field,
            format!("exceeds {} degrees", MAX_LONGITUDE),
        ));
    }
    Ok(sign * degrees)
}

/// Decode a packed digit group (degrees of width `deg_len`, then two-digit
/// minutes and seconds) into unsigned decimal degrees.
fn decode_dms(field: FieldName, digits: &str, deg_len: usize) -> Result<f64, ValidationError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(field, "must contain only digits"));
    }
    let deg: f64 = digits[..deg_len].parse().map_err(|_| bad_number(field))?;
    let min: f64 = digits[deg_len..deg_len + 2]
        .parse()
        .map_err(|_| bad_number(field))?;
    let sec: f64 = digits[deg_len + 2..]
        .parse()
        .map_err(|_| bad_number(field))?;
    if min > 60.0 {
        return Err(ValidationError::new(field, "minutes out of range"));
    }
    if sec > 60.0 {
        return Err(ValidationError::new(field, "seconds out of range"));
    }
    Ok(deg + min / 60.0 + sec / 3600.0)
}

fn bad_number(field: FieldName) -> ValidationError {
    ValidationError::new(field, "not a valid number")
}

/// Decode a radius string, stripping the optional `NM` suffix.
fn parse_radius(rad: &str) -> Result<f64, ValidationError> {
    let field = FieldName::Rad;
    if rad.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if !rad.is_ascii() {
        return Err(ValidationError::new(field, "must contain only digits"));
    }
    let digits = rad.strip_suffix("NM").unwrap_or(rad);
    if digits.is_empty() || digits.len() > MAX_RADIUS_DIGITS {
        return Err(ValidationError::new(
            field,
            "must be one to five digits, optionally followed by NM",
        ));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(field, "must contain only digits"));
    }
    let nm: u32 = digits.parse().map_err(|_| bad_number(field))?;
    if nm == 0 {
        return Err(ValidationError::new(field, "must be greater than zero"));
    }
    Ok(f64::from(nm))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(lat: &str, lon: &str, rad: &str) -> Notam {
        parse_fields("TEST", lat, lon, rad).unwrap()
    }

    fn failing_field(ident: &str, lat: &str, lon: &str, rad: &str) -> FieldName {
        parse_fields(ident, lat, lon, rad).unwrap_err().field
    }

    #[test]
    fn test_latitude_decoding() {
        let notam = parse_ok("123456N", "0765432W", "500NM");
        let expected = 12.0 + 34.0 / 60.0 + 56.0 / 3600.0;
        assert!((notam.lat_deg() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_southern_latitude_is_negative() {
        let notam = parse_ok("123456S", "0765432E", "500");
        assert!(notam.lat_deg() < 0.0);
        assert!(notam.lon_deg() > 0.0);
    }

    #[test]
    fn test_longitude_decoding() {
        let notam = parse_ok("123456N", "0765432W", "500NM");
        let expected = -(76.0 + 54.0 / 60.0 + 32.0 / 3600.0);
        assert!((notam.lon_deg() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_six_digit_longitude() {
        let notam = parse_ok("123456N", "765432W", "500NM");
        let expected = -(76.0 + 54.0 / 60.0 + 32.0 / 3600.0);
        assert!((notam.lon_deg() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_longitude_up_to_180() {
        let notam = parse_ok("123456N", "1795959E", "1");
        assert!(notam.lon_deg() > 179.0 && notam.lon_deg() <= 180.0);
    }

    #[test]
    fn test_radius_suffix_optional_and_case_insensitive() {
        assert_eq!(parse_ok("123456N", "0765432W", "500NM").radius_nm(), 500.0);
        assert_eq!(parse_ok("123456N", "0765432W", "500nm").radius_nm(), 500.0);
        assert_eq!(parse_ok("123456N", "0765432W", "500").radius_nm(), 500.0);
        assert_eq!(parse_ok("123456N", "0765432W", "99999").radius_nm(), 99999.0);
    }

    #[test]
    fn test_lowercase_hemisphere_accepted() {
        let notam = parse_ok("123456n", "0765432w", "500");
        assert!(notam.lat_deg() > 0.0);
        assert!(notam.lon_deg() < 0.0);
        assert_eq!(notam.raw().lat, "123456N");
    }

    #[test]
    fn test_empty_ident_rejected() {
        assert_eq!(
            failing_field("", "123456N", "0765432W", "500"),
            FieldName::Ident
        );
        assert_eq!(
            failing_field("   ", "123456N", "0765432W", "500"),
            FieldName::Ident
        );
    }

    #[test]
    fn test_overlong_ident_rejected() {
        let long = "X".repeat(21);
        assert_eq!(
            failing_field(&long, "123456N", "0765432W", "500"),
            FieldName::Ident
        );
    }

    #[test]
    fn test_bad_latitude_rejected() {
        // wrong digit count
        assert_eq!(failing_field("A", "12345N", "0765432W", "500"), FieldName::Lat);
        assert_eq!(failing_field("A", "1234567N", "0765432W", "500"), FieldName::Lat);
        // bad hemisphere
        assert_eq!(failing_field("A", "123456E", "0765432W", "500"), FieldName::Lat);
        // non-digit
        assert_eq!(failing_field("A", "12a456N", "0765432W", "500"), FieldName::Lat);
        // out of range
        assert_eq!(failing_field("A", "910000N", "0765432W", "500"), FieldName::Lat);
        assert_eq!(failing_field("A", "126100N", "0765432W", "500"), FieldName::Lat);
    }

    #[test]
    fn test_bad_longitude_rejected() {
        assert_eq!(failing_field("A", "123456N", "076543W", "500"), FieldName::Lon);
        assert_eq!(failing_field("A", "123456N", "0765432N", "500"), FieldName::Lon);
        assert_eq!(failing_field("A", "123456N", "1810000E", "500"), FieldName::Lon);
    }

    #[test]
    fn test_bad_radius_rejected() {
        assert_eq!(failing_field("A", "123456N", "0765432W", ""), FieldName::Rad);
        assert_eq!(failing_field("A", "123456N", "0765432W", "0"), FieldName::Rad);
        assert_eq!(failing_field("A", "123456N", "0765432W", "0NM"), FieldName::Rad);
        assert_eq!(failing_field("A", "123456N", "0765432W", "123456"), FieldName::Rad);
        assert_eq!(failing_field("A", "123456N", "0765432W", "NM"), FieldName::Rad);
        assert_eq!(failing_field("A", "123456N", "0765432W", "5x0"), FieldName::Rad);
    }

    #[test]
    fn test_raw_validate_round_trip() {
        let raw = RawNotam::new("ABC", "123456N", "0765432W", "500NM");
        let notam = raw.validate().unwrap();
        assert_eq!(notam.raw(), &raw);
        assert_eq!(notam.radius_nm(), 500.0);
    }
}
