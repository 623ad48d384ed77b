use std::path::PathBuf;

use kurbo::{Point, Rect};
use lookbook::{
    BrandTheme, PageComposer, PageGeometry, PageSurface, Palette, ProductGroup, scan_directory,
};

/// Scaled-down page geometry so debug-mode Lanczos resampling stays fast;
/// proportions and the column/grid switch mirror the production defaults.
fn test_geometry() -> PageGeometry {
    PageGeometry {
        page_width: 400,
        page_height: 500,
        hero_width_ratio: 0.65,
        column_diameter: 80,
        column_gap: 10,
        grid_diameter: 56,
        grid_gap: 8,
        grid_columns: 2,
        column_max: 2,
        max_thumbs: 4,
        thumb_right_margin: 20,
        thumb_start_y: 120,
        ring_width: 2,
        mark_right_margin: 20,
        mark_top: 4,
        mark_block_width: 80,
        mark_title_px: 20.0,
        mark_tagline_px: 6.0,
        name_box_origin: Point::new(20.0, 440.0),
        label_pad: 4.0,
        label_font_px: 16.0,
        price_box: Rect::new(44.0, 470.0, 104.0, 490.0),
        price_text_inset: 2.0,
    }
}

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("compose_page").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_solid_png(dir: &PathBuf, name: &str, rgb: [u8; 3]) {
    let img = image::RgbaImage::from_pixel(60, 160, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
    img.save(dir.join(name)).unwrap();
}

fn variant_color(variant: u8) -> [u8; 3] {
    [variant * 30, 255 - variant * 30, 40 + variant * 10]
}

fn product_dir(name: &str, variants: u8) -> PathBuf {
    let dir = scratch_dir(name);
    for v in 1..=variants {
        write_solid_png(
            &dir,
            &format!("Vestido_Luna-199900-{v}.png"),
            variant_color(v),
        );
    }
    dir
}

fn only_group(dir: &PathBuf) -> ProductGroup {
    let mut groups = scan_directory(dir).unwrap();
    assert_eq!(groups.len(), 1);
    groups.remove(0)
}

fn composer() -> PageComposer {
    PageComposer::new(
        test_geometry(),
        Palette::default(),
        BrandTheme::default(),
        None,
    )
}

fn pixel(page: &PageSurface, x: u32, y: u32) -> [u8; 4] {
    let i = (y as usize * page.width as usize + x as usize) * 4;
    [
        page.data[i],
        page.data[i + 1],
        page.data[i + 2],
        page.data[i + 3],
    ]
}

fn assert_rgb_close(actual: [u8; 4], expected: [u8; 3], what: &str) {
    for c in 0..3 {
        let delta = i16::from(actual[c]).abs_diff(i16::from(expected[c]));
        assert!(delta <= 2, "{what}: got {actual:?}, expected {expected:?}");
    }
}

#[test]
fn hero_fills_the_left_block() {
    let dir = product_dir("hero", 1);
    let group = only_group(&dir);
    let page = composer().compose(&group).unwrap();

    assert_eq!((page.width, page.height), (400, 500));
    assert_rgb_close(pixel(&page, 130, 250), variant_color(1), "hero center");
    // Right of the hero block, above the labels, the background is white.
    assert_eq!(pixel(&page, 350, 350), [255, 255, 255, 255]);
}

#[test]
fn two_details_stack_in_a_column() {
    let dir = product_dir("column", 3);
    let group = only_group(&dir);
    let page = composer().compose(&group).unwrap();

    // Column slots at x=300 start at y=120 with step diameter+gap.
    assert_rgb_close(pixel(&page, 340, 160), variant_color(2), "first circle");
    assert_rgb_close(pixel(&page, 340, 250), variant_color(3), "second circle");
}

#[test]
fn six_images_render_the_hero_plus_exactly_four_thumbnails() {
    let dir = product_dir("grid", 6);
    let group = only_group(&dir);
    assert_eq!(group.images.len(), 6);
    let page = composer().compose(&group).unwrap();

    // Grid slot centers, rank order is row-major.
    assert_rgb_close(pixel(&page, 288, 148), variant_color(2), "rank 1");
    assert_rgb_close(pixel(&page, 352, 148), variant_color(3), "rank 2");
    assert_rgb_close(pixel(&page, 288, 212), variant_color(4), "rank 3");
    assert_rgb_close(pixel(&page, 352, 212), variant_color(5), "rank 4");

    // The fifth detail shot is dropped: its photo is never decoded, so its
    // solid color cannot appear anywhere on the page.
    let rgb = variant_color(6);
    let found = page
        .data
        .chunks_exact(4)
        .any(|px| px[0] == rgb[0] && px[1] == rgb[1] && px[2] == rgb[2]);
    assert!(!found, "dropped variant color leaked onto the page");
}

#[test]
fn composition_is_deterministic() {
    let dir = product_dir("deterministic", 4);
    let group = only_group(&dir);
    let mut c = composer();

    let a = c.compose(&group).unwrap();
    let b = c.compose(&group).unwrap();
    assert_eq!(digest_u64(&a.data), digest_u64(&b.data));

    // A second composer over the same inputs agrees as well.
    let c2 = composer().compose(&group).unwrap();
    assert_eq!(digest_u64(&a.data), digest_u64(&c2.data));
}

#[test]
fn unreadable_hero_fails_the_page() {
    let dir = scratch_dir("broken_hero");
    std::fs::write(dir.join("Roto-99900-1.jpg"), b"not a jpeg").unwrap();
    let group = only_group(&dir);

    let err = composer().compose(&group).unwrap_err();
    assert!(err.to_string().contains("image decode error:"));
}

#[test]
fn unreadable_detail_fails_the_page() {
    let dir = scratch_dir("broken_detail");
    write_solid_png(&dir, "Conjunto-129900-1.png", [10, 200, 10]);
    std::fs::write(dir.join("Conjunto-129900-2.png"), b"garbage").unwrap();
    let group = only_group(&dir);

    assert!(composer().compose(&group).is_err());
}
