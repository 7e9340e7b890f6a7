//! Best-effort logo loading. Every failure path here degrades to `None`
//! and a log line; the renderer then draws the placeholder box instead.

use image::GenericImageView;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// A decoded logo, ready for XObject embedding.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    pub encoding: LogoEncoding,
}

#[derive(Debug, Clone)]
pub enum LogoEncoding {
    /// Original JPEG bytes, embedded as-is with DCTDecode.
    Jpeg { data: Vec<u8>, gray: bool },
    /// Raw 8-bit RGB samples, with an optional 8-bit alpha SMask.
    Rgb {
        data: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// Where the logo is looked for by default: next to the executable,
/// then in the working directory.
pub fn candidate_paths(file_name: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            candidates.push(dir.join(file_name));
        }
    }
    candidates.push(PathBuf::from(file_name));
    candidates
}

/// First candidate that exists and decodes wins; a document without a
/// logo is still a valid document.
pub fn resolve(candidates: &[PathBuf]) -> Option<LogoImage> {
    candidates
        .iter()
        .filter(|path| path.is_file())
        .find_map(|path| load(path))
}

pub fn load(path: &Path) -> Option<LogoImage> {
    if !path.is_file() {
        debug!("no logo at {}; using placeholder", path.display());
        return None;
    }
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("cannot read logo {}: {err}; using placeholder", path.display());
            return None;
        }
    };
    match decode(&bytes) {
        Some(logo) => Some(logo),
        None => {
            warn!(
                "cannot decode logo {}; using placeholder",
                path.display()
            );
            None
        }
    }
}

fn decode(bytes: &[u8]) -> Option<LogoImage> {
    let format = image::guess_format(bytes).ok();
    let decoded = image::load_from_memory(bytes).ok()?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    if matches!(format, Some(image::ImageFormat::Jpeg)) {
        let gray = matches!(
            decoded.color(),
            image::ColorType::L8 | image::ColorType::La8
        );
        return Some(LogoImage {
            width,
            height,
            encoding: LogoEncoding::Jpeg {
                data: bytes.to_vec(),
                gray,
            },
        });
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    let mut has_alpha = false;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        if a != 255 {
            has_alpha = true;
        }
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }
    Some(LogoImage {
        width,
        height,
        encoding: LogoEncoding::Rgb {
            data: rgb,
            alpha: has_alpha.then_some(alpha),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_degrades_to_none() {
        assert!(load(Path::new("/nonexistent/logo.png")).is_none());
        assert!(resolve(&[PathBuf::from("/nonexistent/logo.png")]).is_none());
    }

    #[test]
    fn garbage_bytes_degrade_to_none() {
        assert!(decode(b"definitely not an image").is_none());
    }

    #[test]
    fn opaque_png_has_no_smask() {
        let mut png = Vec::new();
        let img = image::RgbImage::from_pixel(4, 2, image::Rgb([10, 20, 30]));
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode png");
        let logo = decode(&png).expect("decode");
        assert_eq!((logo.width, logo.height), (4, 2));
        match logo.encoding {
            LogoEncoding::Rgb { data, alpha } => {
                assert_eq!(data.len(), 4 * 2 * 3);
                assert!(alpha.is_none());
            }
            LogoEncoding::Jpeg { .. } => panic!("png decoded as jpeg"),
        }
    }

    #[test]
    fn transparent_png_carries_an_alpha_channel() {
        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 128]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode png");
        let logo = decode(&png).expect("decode");
        match logo.encoding {
            LogoEncoding::Rgb { alpha, .. } => {
                let alpha = alpha.expect("alpha present");
                assert_eq!(alpha, vec![128; 4]);
            }
            LogoEncoding::Jpeg { .. } => panic!("png decoded as jpeg"),
        }
    }
}
