use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};
use log::info;

use crate::error::{JamifyError, Result};
use crate::sync_api::FrameSet;

// Decode every frame of a GIF, composited onto the full canvas, so each one
// can be drawn on its own regardless of the GIF's disposal settings.
pub fn load(path: &Path) -> Result<FrameSet<RgbaImage>> {
    let file = File::open(path).map_err(|source| JamifyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decoder = GifDecoder::new(BufReader::new(file))?;
    let frames: Vec<RgbaImage> = decoder
        .into_frames()
        .collect_frames()?
        .into_iter()
        .map(|frame| frame.into_buffer())
        .collect();

    if frames.is_empty() {
        return Err(JamifyError::EmptyFrameSet);
    }
    let (w, h) = frames[0].dimensions();
    info!("loaded {} ({} frames, {}x{})", path.display(), frames.len(), w, h);
    Ok(FrameSet::new(frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba};

    fn write_gif(path: &Path, colors: &[[u8; 4]]) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        let frames = colors.iter().map(|&c| {
            Frame::from_parts(
                RgbaImage::from_pixel(3, 2, Rgba(c)),
                0,
                0,
                Delay::from_numer_denom_ms(100, 1),
            )
        });
        encoder.encode_frames(frames).unwrap();
    }

    #[test]
    fn decodes_every_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three.gif");
        write_gif(&path, &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]);

        let frames = load(&path).unwrap();
        assert_eq!(frames.len(), 3);
        let first = frames.get(0).unwrap();
        assert_eq!(first.dimensions(), (3, 2));
        assert_eq!(first.get_pixel(0, 0)[0], 255);
        assert_eq!(frames.get(2).unwrap().get_pixel(2, 1)[2], 255);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("definitely/not/here.gif")).unwrap_err();
        assert!(matches!(err, JamifyError::Io { .. }));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.gif");
        std::fs::write(&path, b"not a gif at all").unwrap();
        assert!(matches!(load(&path).unwrap_err(), JamifyError::Decode(_)));
    }
}
