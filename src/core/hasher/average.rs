//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Resizing the image to 8x8
//! 2. Converting to grayscale
//! 3. Computing the average brightness
//! 4. For each pixel: if brighter than average, set bit to 1, else 0
//!
//! Bits are packed row-major, first pixel in the most significant bit.

use super::traits::PerceptualFingerprint;
use image::DynamicImage;

/// Side of the luminance grid; 8x8 gives a 64-bit fingerprint
pub const GRID_SIZE: u32 = 8;

/// Average Hash (aHash) implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageHasher;

impl AverageHasher {
    pub fn new() -> Self {
        Self
    }

    /// Fingerprint an already-decoded image
    pub fn fingerprint(&self, image: &DynamicImage) -> PerceptualFingerprint {
        let resized = image.resize_exact(
            GRID_SIZE,
            GRID_SIZE,
            image::imageops::FilterType::Lanczos3,
        );
        let gray = resized.to_luma8();

        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let average = total as f64 / (GRID_SIZE * GRID_SIZE) as f64;

        let bits = gray
            .pixels()
            .fold(0u64, |acc, p| (acc << 1) | u64::from(p[0] as f64 > average));

        PerceptualFingerprint::from_bits(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::super::traits::PerceptualHash;
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    fn create_solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([r, g, b]));
        DynamicImage::ImageRgb8(img)
    }

    fn create_split_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Luma([20u8])
            } else {
                Luma([230u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn identical_images_produce_identical_fingerprint() {
        let hasher = AverageHasher::new();
        let image = create_split_image(64, 64);

        assert_eq!(hasher.fingerprint(&image), hasher.fingerprint(&image));
    }

    #[test]
    fn solid_image_produces_empty_fingerprint() {
        let hasher = AverageHasher::new();
        let image = create_solid_image(128, 128, 128);

        assert_eq!(hasher.fingerprint(&image).bits(), 0);
    }

    #[test]
    fn left_dark_right_bright_sets_right_half_bits() {
        let hasher = AverageHasher::new();
        let fingerprint = hasher.fingerprint(&create_split_image(64, 64));

        // Every row reads 00001111
        assert_eq!(fingerprint.bits(), 0x0F0F_0F0F_0F0F_0F0F);
    }

    #[test]
    fn resized_copy_stays_within_default_threshold() {
        let hasher = AverageHasher::new();
        let large = hasher.fingerprint(&create_split_image(1600, 1200));
        let small = hasher.fingerprint(&create_split_image(400, 300));

        assert!(large.distance(&small) <= super::super::DEFAULT_SIMILARITY_THRESHOLD);
    }
}
