//! Resampling and per-channel OR merge.

use image::imageops::{self, FilterType};
use image::RgbImage;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Filter used when resizing a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleFilter {
    /// Nearest neighbour; keeps hard edges of rendered lines
    Nearest,
    /// Linear (tent) filter
    #[default]
    Triangle,
}

impl ResampleFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResampleFilter::Nearest => write!(f, "nearest"),
            ResampleFilter::Triangle => write!(f, "triangle"),
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(ResampleFilter::Nearest),
            "triangle" | "linear" => Ok(ResampleFilter::Triangle),
            other => Err(format!(
                "unknown filter '{}', expected 'nearest' or 'triangle'",
                other
            )),
        }
    }
}

/// Resizes `image` to exactly `width × height`.
///
/// Returns a copy when the size already matches.
pub fn resample(image: &RgbImage, width: u32, height: u32, filter: ResampleFilter) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width, height, filter.filter_type())
}

/// Size of a raster after shrinking by `factor`, rounded to the nearest
/// pixel (halves to even) and never below 1.
pub fn downscaled_size(width: u32, height: u32, factor: u32) -> (u32, u32) {
    if factor <= 1 {
        return (width, height);
    }
    let scale = |v: u32| div_round_half_even(v, factor).max(1);
    (scale(width), scale(height))
}

fn div_round_half_even(value: u32, divisor: u32) -> u32 {
    let quotient = value / divisor;
    let twice_remainder = 2 * u64::from(value % divisor);
    match twice_remainder.cmp(&u64::from(divisor)) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
    }
}

/// Shrinks `image` by an integer factor. Factors of 0 or 1 leave it unchanged.
pub fn downscale(image: &RgbImage, factor: u32, filter: ResampleFilter) -> RgbImage {
    let (width, height) = downscaled_size(image.width(), image.height(), factor);
    resample(image, width, height, filter)
}

/// Merges `overlay` onto `aerial` with a per-channel bitwise OR.
///
/// The overlay is first resampled to the aerial raster's size, so the result
/// always has the aerial raster's dimensions. OR-ing with an all-black
/// overlay returns the aerial raster unchanged.
pub fn merge_or(aerial: &RgbImage, overlay: &RgbImage, filter: ResampleFilter) -> RgbImage {
    let (width, height) = aerial.dimensions();
    let overlay = resample(overlay, width, height, filter);

    let mut merged = aerial.clone();
    for (out, top) in merged.pixels_mut().zip(overlay.pixels()) {
        for (channel, value) in out.0.iter_mut().zip(top.0) {
            *channel |= value;
        }
    }

    debug!(width, height, filter = %filter, "Merged overlay onto aerial raster");
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("nearest".parse::<ResampleFilter>(), Ok(ResampleFilter::Nearest));
        assert_eq!("Triangle".parse::<ResampleFilter>(), Ok(ResampleFilter::Triangle));
        assert!("lanczos".parse::<ResampleFilter>().is_err());
        assert_eq!(ResampleFilter::Nearest.to_string(), "nearest");
    }

    #[test]
    fn test_merge_with_black_is_identity() {
        let aerial = gradient(300, 200);
        let black = RgbImage::new(60, 40);

        let merged = merge_or(&aerial, &black, ResampleFilter::Nearest);
        assert_eq!(merged, aerial);
    }

    #[test]
    fn test_merge_with_white_saturates() {
        let aerial = gradient(64, 64);
        let white = RgbImage::from_pixel(64, 64, Rgb([255, 255, 255]));

        let merged = merge_or(&aerial, &white, ResampleFilter::Triangle);
        assert!(merged.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_merge_is_bitwise_or() {
        let aerial = RgbImage::from_pixel(4, 4, Rgb([0b1010_0000, 0x0F, 0x00]));
        let overlay = RgbImage::from_pixel(4, 4, Rgb([0b0000_0101, 0xF0, 0x01]));

        let merged = merge_or(&aerial, &overlay, ResampleFilter::Nearest);
        assert_eq!(*merged.get_pixel(2, 2), Rgb([0b1010_0101, 0xFF, 0x01]));
    }

    #[test]
    fn test_merge_output_matches_aerial_size() {
        let aerial = gradient(3401, 17);
        let overlay = gradient(100, 100);

        let merged = merge_or(&aerial, &overlay, ResampleFilter::Triangle);
        assert_eq!(merged.dimensions(), (3401, 17));
    }

    #[test]
    fn test_downscaled_size_rounds() {
        assert_eq!(downscaled_size(3401, 3200, 5), (680, 640));
        assert_eq!(downscaled_size(13, 12, 5), (3, 2));
        assert_eq!(downscaled_size(2, 2, 5), (1, 1));
        assert_eq!(downscaled_size(100, 50, 1), (100, 50));
        assert_eq!(downscaled_size(100, 50, 0), (100, 50));
    }

    #[test]
    fn test_downscaled_size_halves_round_to_even() {
        assert_eq!(downscaled_size(5, 7, 2), (2, 4));
        assert_eq!(downscaled_size(10, 30, 4), (2, 8));
        assert_eq!(downscaled_size(u32::MAX, 9, 2), (2_147_483_648, 4));
    }

    #[test]
    fn test_downscale_image() {
        let image = gradient(100, 60);
        assert_eq!(downscale(&image, 4, ResampleFilter::Triangle).dimensions(), (25, 15));
        assert_eq!(downscale(&image, 1, ResampleFilter::Nearest), image);
    }

    proptest! {
        /// Property: merge output always has the aerial raster's dimensions.
        #[test]
        fn prop_merge_keeps_aerial_size(
            aw in 1u32..64, ah in 1u32..64, ow in 1u32..64, oh in 1u32..64,
        ) {
            let merged = merge_or(&gradient(aw, ah), &gradient(ow, oh), ResampleFilter::Nearest);
            prop_assert_eq!(merged.dimensions(), (aw, ah));
        }

        /// Property: the shrunk size is within half a pixel of the exact ratio.
        #[test]
        fn prop_downscaled_size_is_nearest(width in 1u32..100_000, factor in 2u32..16) {
            let (shrunk, _) = downscaled_size(width, 1, factor);
            let exact = width as f64 / factor as f64;
            prop_assert!((shrunk as f64 - exact).abs() <= 0.5 || shrunk == 1);
        }
    }
}
