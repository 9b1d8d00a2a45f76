//! PNG snapshots of a recorded frame.
//!
//! Feature-gated behind `png` (default on). Rasterization itself lives in
//! [`crate::pixel`].

use std::path::Path;

use particle_net_core::{DrawCommand, EngineError, Srgb};

use crate::pixel::{rasterize, PixelBuffer};

/// Writes a rasterized buffer as a PNG.
///
/// Returns `EngineError::InvalidDimensions` if the buffer is empty or its
/// dimensions overflow `u32`, or `EngineError::Io` on write failure.
pub fn write_buffer(buf: &PixelBuffer, path: &Path) -> Result<(), EngineError> {
    if buf.width() == 0 || buf.height() == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    let w = u32::try_from(buf.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(buf.height()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, buf.to_rgba8())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    tracing::info!(path = %path.display(), width = w, height = h, "wrote snapshot");
    Ok(())
}

/// Rasterizes `commands` over `background` and writes the result as a PNG.
pub fn write_png(
    commands: &[DrawCommand],
    width: usize,
    height: usize,
    background: Option<Srgb>,
    path: &Path,
) -> Result<(), EngineError> {
    write_buffer(&rasterize(commands, width, height, background), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use particle_net_core::{
        AnimationDriver, NetworkConfig, RecordingSurface, Rgba, Surface, Viewport,
    };

    #[test]
    fn write_png_round_trip() {
        let commands = [
            DrawCommand::Clear,
            DrawCommand::Circle {
                center: DVec2::new(8.0, 8.0),
                radius: 3.0,
                color: Rgba::new(Srgb::from_u8(0, 212, 255), 1.0),
            },
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        write_png(&commands, 16, 16, Some(Srgb::from_u8(0, 0, 0)), &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 16);
        assert_eq!(img.get_pixel(8, 8).0, [0, 212, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn driver_frame_snapshot() {
        let mut driver =
            AnimationDriver::new(Viewport::new(64.0, 48.0), 7, NetworkConfig::default()).unwrap();
        let mut surface = RecordingSurface::default();
        driver.run(&mut surface, 3);
        assert_eq!(surface.width(), 64.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.png");
        write_png(surface.commands(), 64, 48, None, &path).unwrap();
        let img = image::open(&path).unwrap().to_rgba8();
        assert!(img.pixels().any(|p| p.0[3] > 0));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let err = write_png(&[], 0, 10, None, &path).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDimensions));
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let err = write_png(&[], 4, 4, None, &path).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
