//! Captured frame type, YUYV conversion, and the dark-frame heuristic.

use image::GrayImage;

/// A captured grayscale camera frame.
#[derive(Clone)]
pub struct Frame {
    /// Grayscale pixel data (width * height bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub sequence: u32,
}

impl Frame {
    /// Average pixel brightness (0.0–255.0).
    pub fn avg_brightness(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().map(|&b| b as f32).sum::<f32>() / self.data.len() as f32
    }

    /// Convert into an owned [`image::GrayImage`].
    ///
    /// Returns `None` if the buffer does not hold exactly width * height
    /// bytes.
    pub fn to_image(&self) -> Option<GrayImage> {
        if self.data.len() != (self.width * self.height) as usize {
            return None;
        }
        GrayImage::from_raw(self.width, self.height, self.data.clone())
    }
}

/// Convert packed YUYV (4:2:2) to grayscale by extracting the Y channel.
///
/// YUYV packs two pixels per 4 bytes: [Y0, U, Y1, V].
/// Grayscale = every even-indexed byte.
pub fn yuyv_to_grayscale(yuyv: &[u8], width: u32, height: u32) -> Result<Vec<u8>, FrameError> {
    let expected = (width * height * 2) as usize;
    if yuyv.len() < expected {
        return Err(FrameError::InvalidLength {
            expected,
            actual: yuyv.len(),
        });
    }
    Ok(yuyv[..expected].iter().step_by(2).copied().collect())
}

/// Check if a frame is dark using the fraction of near-black pixels.
///
/// Returns true if more than `threshold_pct` of pixels fall below 32.
pub fn is_dark_frame(gray: &[u8], threshold_pct: f32) -> bool {
    if gray.is_empty() {
        return true;
    }
    let dark_count = gray.iter().filter(|&&p| p < 32).count();
    (dark_count as f32 / gray.len() as f32) > threshold_pct
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid YUYV length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_to_grayscale() {
        // 2x1 image: [Y0=100, U=128, Y1=200, V=128]
        let yuyv = vec![100, 128, 200, 128];
        let gray = yuyv_to_grayscale(&yuyv, 2, 1).unwrap();
        assert_eq!(gray, vec![100, 200]);
    }

    #[test]
    fn test_yuyv_to_grayscale_4x2() {
        // 4x2 image = 8 pixels, 16 YUYV bytes
        let yuyv: Vec<u8> = (0..16).collect();
        let gray = yuyv_to_grayscale(&yuyv, 4, 2).unwrap();
        assert_eq!(gray, vec![0, 2, 4, 6, 8, 10, 12, 14]);
    }

    #[test]
    fn test_yuyv_invalid_length() {
        let yuyv = vec![100, 128]; // too short for 2x1
        assert!(yuyv_to_grayscale(&yuyv, 2, 1).is_err());
    }

    #[test]
    fn test_dark_frame_all_black() {
        let gray = vec![0u8; 1000];
        assert!(is_dark_frame(&gray, 0.95));
    }

    #[test]
    fn test_dark_frame_normal() {
        let gray = vec![128u8; 1000];
        assert!(!is_dark_frame(&gray, 0.95));
    }

    #[test]
    fn test_dark_frame_empty() {
        assert!(is_dark_frame(&[], 0.95));
    }

    #[test]
    fn test_dark_frame_borderline_bright() {
        // 94% dark, 6% bright → not dark
        let mut gray = vec![10u8; 940];
        gray.extend(vec![128u8; 60]);
        assert!(!is_dark_frame(&gray, 0.95));
    }

    #[test]
    fn test_to_image_round_trip() {
        let frame = Frame {
            data: vec![7u8; 6],
            width: 3,
            height: 2,
            sequence: 0,
        };
        let img = frame.to_image().unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0[0], 7);
    }

    #[test]
    fn test_to_image_rejects_short_buffer() {
        let frame = Frame {
            data: vec![7u8; 5],
            width: 3,
            height: 2,
            sequence: 0,
        };
        assert!(frame.to_image().is_none());
    }
}
