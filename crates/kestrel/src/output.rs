//! Writing rendered images to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use kestrel_renderer::ImageBuffer;

/// Save an image, picking the format from the file extension.
///
/// `.ppm` is written as plain-text P3; anything else goes through the
/// `image` crate.
pub fn save_image(image: &ImageBuffer, path: &Path) -> Result<()> {
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path).with_context(|| format!("failed to create {:?}", path))?;
        let mut writer = BufWriter::new(file);
        write_ppm(image, &mut writer)?;
        writer.flush()?;
    } else {
        let rgba = image::RgbaImage::from_raw(image.width, image.height, image.to_rgba8())
            .context("pixel buffer does not match the image size")?;
        rgba.save(path)
            .with_context(|| format!("failed to write {:?}", path))?;
    }

    Ok(())
}

/// Write an ASCII PPM, top row first, one pixel per line.
pub fn write_ppm(image: &ImageBuffer, writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for rgba in image.to_rgba8().chunks_exact(4) {
        writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
    }

    Ok(())
}
