use std::fs::{self, File};
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use crate::error::GaltonError;
use crate::board::{BAR_BOTTOM_MARGIN, GaltonBoard};

pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([128, 0, 128]);
pub const BAR_COLOR: Rgb<u8> = Rgb([0, 128, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_PX: f32 = 14.0;

const FONT_CANDIDATES: &[&str] = &[
    "Arial", "Helvetica", "DejaVuSans", "LiberationSans", "SegoeUI", "Segoe UI", "NotoSans-Regular", "NotoSans", "Cantarell-Regular"
];

/// Rasterize the board's slot totals as a vertical-bar histogram and write a
/// PNG to `path`, overwriting any existing file. Bar heights are scaled so the
/// fullest slot spans the full available bar height. With `count_labels`, each
/// slot's total is drawn centered above its bar using a system font.
pub fn render_histogram_to_png(
    board: &GaltonBoard,
    path: &str,
    count_labels: bool,
) -> Result<(), GaltonError> {
    if path.trim().is_empty() {
        return Err(GaltonError::InvalidParameter {
            param: "filename",
            reason: "filename cannot be empty",
        });
    }

    let width = board.width();
    let height = board.height();
    let bar_width = board.bar_width();
    let counts = board.slot_counts();

    // Floor at 1 so an all-zero board renders an empty chart instead of
    // dividing by zero.
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let mut img = RgbImage::from_pixel(width, height, BACKGROUND_COLOR);

    let bar_bottom = height.saturating_sub(BAR_BOTTOM_MARGIN);
    for (i, &count) in counts.iter().enumerate() {
        let bar_height =
            ((count as f64 / max_count as f64) * board.max_bar_height() as f64) as u32;
        let x0 = i as u32 * bar_width + bar_width / 2;
        let y0 = bar_bottom.saturating_sub(bar_height);
        for x in x0..(x0 + bar_width).min(width) {
            for y in y0..bar_bottom {
                img.put_pixel(x, y, BAR_COLOR);
            }
        }
    }

    if count_labels {
        let font_data = find_system_font_data().ok_or(GaltonError::FontUnavailable)?;
        let labeler = CountLabeler::new(font_data, LABEL_PX)?;
        for (i, &count) in counts.iter().enumerate() {
            let bar_height =
                ((count as f64 / max_count as f64) * board.max_bar_height() as f64) as u32;
            let center_x = i as u32 * bar_width + bar_width;
            let bar_top = bar_bottom.saturating_sub(bar_height);
            labeler.draw_centered(&mut img, &count.to_string(), center_x, bar_top, LABEL_COLOR);
        }
    }

    let mut file = File::create(path).map_err(|e| GaltonError::Io {
        path: PathBuf::from(path),
        source: image::ImageError::IoError(e),
    })?;
    img.write_to(&mut file, image::ImageFormat::Png)
        .map_err(|e| GaltonError::Io {
            path: PathBuf::from(path),
            source: e,
        })
}

struct CountLabeler {
    font: Font<'static>,
    scale: Scale,
    ascent: f32,
}

impl CountLabeler {
    fn new(font_data: Vec<u8>, px: f32) -> Result<Self, GaltonError> {
        let font = Font::try_from_vec(font_data).ok_or(GaltonError::FontUnavailable)?;
        let scale = Scale::uniform(px);
        let ascent = font.v_metrics(scale).ascent;
        Ok(Self { font, scale, ascent })
    }

    fn text_width(&self, text: &str) -> f32 {
        let glyphs: Vec<_> = self.font.layout(text, self.scale, point(0.0, 0.0)).collect();
        if let Some(last) = glyphs.last() {
            last.position().x + last.unpositioned().h_metrics().advance_width
        } else {
            0.0
        }
    }

    /// Draw `text` horizontally centered on `center_x`, with its baseline a
    /// few pixels above `above_y`. Pixels falling outside the canvas clip.
    fn draw_centered(&self, img: &mut RgbImage, text: &str, center_x: u32, above_y: u32, color: Rgb<u8>) {
        let left = center_x as f32 - self.text_width(text) / 2.0;
        let baseline = (above_y as f32 - 4.0).max(self.ascent);
        for glyph in self.font.layout(text, self.scale, point(left, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, v| {
                    if v < 0.05 { return; }
                    let gx = x as i32 + bb.min.x;
                    let gy = y as i32 + bb.min.y;
                    if gx >= 0 && gy >= 0 && (gx as u32) < img.width() && (gy as u32) < img.height() {
                        let dst = img.get_pixel_mut(gx as u32, gy as u32);
                        for i in 0..3 { dst[i] = ((dst[i] as f32)*(1.0 - v) + (color[i] as f32)*v) as u8; }
                    }
                });
            }
        }
    }
}

fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if cfg!(target_os = "macos") {
        dirs.extend([
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
        ]);
        if let Some(home) = dirs_next::home_dir() { dirs.push(home.join("Library/Fonts")); }
    } else if cfg!(target_os = "windows") {
        if let Some(win) = std::env::var_os("WINDIR") { dirs.push(PathBuf::from(win).join("Fonts")); }
        dirs.push(PathBuf::from("C:/Windows/Fonts"));
    } else { // Linux / BSD
        dirs.extend([
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
        ]);
        if let Some(home) = dirs_next::home_dir() {
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
        }
    }
    dirs
}

fn find_system_font_data() -> Option<Vec<u8>> {
    // Explicit override for custom font selection
    if let Ok(path) = std::env::var("GALTON_FONT_PATH") {
        if let Ok(bytes) = fs::read(&path) { return Some(bytes); }
    }

    // Collect font files recursively to catch fonts in subdirectories
    let mut font_files: Vec<PathBuf> = Vec::new();
    for dir in font_search_dirs() {
        if !dir.exists() { continue; }
        for entry in walkdir::WalkDir::new(&dir).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() { continue; }
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                let ext_l = ext.to_ascii_lowercase();
                if matches!(ext_l.as_str(), "ttf" | "otf") { font_files.push(path.to_path_buf()); }
            }
        }
    }

    if font_files.is_empty() { return None; }

    // Fast path: try candidate names first
    for &cand in FONT_CANDIDATES {
        if let Some(p) = font_files.iter().find(|p| p.file_stem().and_then(|s| s.to_str()).map(|s| s.eq_ignore_ascii_case(cand)).unwrap_or(false)) {
            if let Ok(data) = fs::read(p) { return Some(data); }
        }
    }

    // Labels are numeric, so score fonts by digit coverage
    let mut best: Option<(usize, &Path)> = None;
    for path in &font_files {
        if let Ok(bytes) = fs::read(path) {
            if let Some(font) = Font::try_from_vec(bytes) {
                let score = ('0'..='9').filter(|&c| font.glyph(c).id().0 != 0).count();
                if best.map(|(s, _)| score > s).unwrap_or(true) {
                    best = Some((score, path));
                }
            }
        }
    }
    if let Some((_, p)) = best { if let Ok(bytes) = fs::read(p) { return Some(bytes); } }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(img: &RgbImage, x: u32, y: u32) -> Rgb<u8> {
        *img.get_pixel(x, y)
    }

    #[test]
    fn test_empty_filename_is_rejected_before_writing() {
        let board = GaltonBoard::new(2, 4, 100, 100).expect("valid parameters");
        for name in ["", "   ", "\t"] {
            match render_histogram_to_png(&board, name, false) {
                Err(GaltonError::InvalidParameter { param, .. }) => {
                    assert_eq!(param, "filename");
                }
                other => panic!("expected InvalidParameter for {name:?}, got {other:?}"),
            }
        }
        assert!(!Path::new("   ").exists());
    }

    #[test]
    fn test_unwritable_path_reports_io_failure() {
        let board = GaltonBoard::new(2, 4, 100, 100).expect("valid parameters");
        let result = render_histogram_to_png(&board, "no_such_dir/galton.png", false);
        match result {
            Err(GaltonError::Io { path, .. }) => {
                assert_eq!(path, Path::new("no_such_dir/galton.png"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_bar_geometry_matches_slot_counts() {
        let mut board = GaltonBoard::new(2, 4, 100, 100).expect("valid parameters");
        board.set_slot_counts(&[1, 2, 1]);
        assert_eq!(board.bar_width(), 25);
        assert_eq!(board.max_bar_height(), 60);

        let out = "test_galton_geometry.png";
        render_histogram_to_png(&board, out, false).expect("render");
        let img = image::open(out).expect("decode").to_rgb8();
        fs::remove_file(out).ok();

        assert_eq!(img.dimensions(), (100, 100));
        assert_eq!(probe(&img, 0, 0), BACKGROUND_COLOR);

        // Counts [1, 2, 1] against max 2 give bar heights [30, 60, 30],
        // columns starting at x = [12, 37, 62], tops at y = [50, 20, 50],
        // all bottoms at y = 80. The bars are contiguous in x.
        for (x0, y0) in [(12u32, 50u32), (37, 20), (62, 50)] {
            assert_eq!(probe(&img, x0, y0), BAR_COLOR, "top-left corner of bar at {x0}");
            assert_eq!(probe(&img, x0 + 24, 79), BAR_COLOR, "bottom-right corner of bar at {x0}");
            assert_eq!(probe(&img, x0, y0 - 1), BACKGROUND_COLOR, "above bar at {x0}");
            assert_eq!(probe(&img, x0, 80), BACKGROUND_COLOR, "below bar at {x0}");
        }
        // Only the middle bar reaches above y = 50.
        assert_eq!(probe(&img, 36, 30), BACKGROUND_COLOR);
        assert_eq!(probe(&img, 37, 30), BAR_COLOR);
        assert_eq!(probe(&img, 61, 30), BAR_COLOR);
        assert_eq!(probe(&img, 62, 30), BACKGROUND_COLOR);
        // Half-column gap before the first bar, background past the last.
        assert_eq!(probe(&img, 11, 79), BACKGROUND_COLOR);
        assert_eq!(probe(&img, 87, 79), BACKGROUND_COLOR);
    }

    #[test]
    fn test_zero_counts_render_background_only() {
        let board = GaltonBoard::new(4, 10, 60, 60).expect("valid parameters");
        let out = "test_galton_empty.png";
        render_histogram_to_png(&board, out, false).expect("render");
        let img = image::open(out).expect("decode").to_rgb8();
        fs::remove_file(out).ok();
        assert!(img.pixels().all(|p| *p == BACKGROUND_COLOR));
    }

    #[test]
    fn test_rendering_is_deterministic_for_fixed_counts() {
        let mut board = GaltonBoard::new(3, 10, 120, 90).expect("valid parameters");
        board.set_slot_counts(&[1, 4, 3, 2]);

        let first = "test_galton_det_a.png";
        let second = "test_galton_det_b.png";
        render_histogram_to_png(&board, first, false).expect("render");
        render_histogram_to_png(&board, second, false).expect("render");
        let bytes_a = fs::read(first).expect("read first");
        let bytes_b = fs::read(second).expect("read second");
        fs::remove_file(first).ok();
        fs::remove_file(second).ok();
        assert_eq!(bytes_a, bytes_b);
    }

    #[test]
    fn test_labeled_render_writes_file() {
        // Hosts without any discoverable font cannot exercise labels.
        if find_system_font_data().is_none() {
            return;
        }
        let mut board = GaltonBoard::new(2, 4, 200, 150).expect("valid parameters");
        board.set_slot_counts(&[1, 2, 1]);
        let out = "test_galton_labeled.png";
        render_histogram_to_png(&board, out, true).expect("render");
        assert!(Path::new(out).exists());
        fs::remove_file(out).ok();
    }
}
