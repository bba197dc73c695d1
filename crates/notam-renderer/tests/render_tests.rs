//! Integration tests for daily NOTAM plot rendering.

use std::path::Path;

use notam_common::{parse_fields, DayKey, Notam};
use notam_renderer::{MapRenderer, MapStyle, RenderConfig};
use tempfile::tempdir;

const RING_COLOR: [u8; 4] = [220, 20, 20, 255];

fn renderer(image_dir: &Path) -> MapRenderer {
    MapRenderer::new(RenderConfig {
        image_dir: image_dir.to_path_buf(),
        style: MapStyle::Shaded,
        // Deliberately nonexistent: tests must not depend on system fonts,
        // and the renderer draws unlabeled footprints without one.
        font_path: image_dir.join("no-such-font.ttf"),
    })
}

fn notam(ident: &str) -> Notam {
    parse_fields(ident, "123456N", "0765432W", "500NM").unwrap()
}

fn count_ring_pixels(path: &Path) -> usize {
    let img = image::open(path).unwrap().to_rgba8();
    img.pixels().filter(|p| p.0 == RING_COLOR).count()
}

#[test]
fn test_render_produces_dated_png() {
    let dir = tempdir().unwrap();
    let r = renderer(dir.path());
    let day: DayKey = "2024-03-01".parse().unwrap();

    let path = r.render_day(day, &[notam("ABC")]).unwrap();
    assert_eq!(path, dir.path().join("2024-03-01_notams.png"));
    assert!(path.exists());

    // The footprint ring is visible on the composed image.
    assert!(count_ring_pixels(&path) > 100);
}

#[test]
fn test_render_empty_list_is_not_an_error() {
    let dir = tempdir().unwrap();
    let r = renderer(dir.path());
    let day: DayKey = "2024-03-01".parse().unwrap();

    let path = r.render_day(day, &[]).unwrap();
    assert!(path.exists());
    assert_eq!(count_ring_pixels(&path), 0);
}

#[test]
fn test_rerender_overwrites_same_path() {
    let dir = tempdir().unwrap();
    let r = renderer(dir.path());
    let day: DayKey = "2024-03-01".parse().unwrap();

    let first = r.render_day(day, &[notam("ABC")]).unwrap();
    let second = r.render_day(day, &[notam("ABC"), notam("DEF")]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_failed_render_leaves_previous_artifact() {
    let dir = tempdir().unwrap();
    let r = renderer(dir.path());
    let day: DayKey = "2024-03-01".parse().unwrap();

    r.render_day(day, &[notam("ABC")]).unwrap();
    let before = std::fs::read(r.image_path(day)).unwrap();

    // Corrupt the base map so the next render fails at decode.
    let base = dir.path().join(MapStyle::Shaded.base_map_name());
    std::fs::write(&base, b"not a png").unwrap();

    let err = r.render_day(day, &[notam("ABC")]);
    assert!(err.is_err());

    // Previous artifact is untouched, byte for byte.
    let after = std::fs::read(r.image_path(day)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_base_map_created_on_first_render() {
    let dir = tempdir().unwrap();
    let r = renderer(dir.path());
    assert!(!dir.path().join("shaded_map.png").exists());
    r.ensure_base_map().unwrap();
    assert!(dir.path().join("shaded_map.png").exists());
}
