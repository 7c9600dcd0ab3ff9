#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Writes a real JPEG with a simple gradient.
pub fn write_jpeg(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 90])
    })
    .save_with_format(path, image::ImageFormat::Jpeg)
    .unwrap();
    path.to_path_buf()
}

/// Writes a real RGBA PNG with varying transparency.
pub fn write_png(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 3 % 256) as u8, 40, ((x + y) * 4 % 256) as u8])
    })
    .save_with_format(path, image::ImageFormat::Png)
    .unwrap();
    path.to_path_buf()
}

/// Lays out a small site: `src/img` with nested photos, a PNG logo, an SVG
/// icon and a gallery.
pub fn create_site(root: &Path) -> PathBuf {
    let img = root.join("src/img");
    write_jpeg(&img.join("photos/cat.jpg"), 48, 32);
    write_png(&img.join("logo.png"), 20, 20);
    fs::write(img.join("icon.svg"), b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
    write_jpeg(&img.join("gallery/full/dog.jpg"), 500, 400);
    img
}

/// Every file under `root`, relative to it, sorted.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
