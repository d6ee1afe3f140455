use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};

/// Struct, representing raw rgb8 pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        return Self { r, g, b };
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        return Rgb([color.r, color.g, color.b]);
    }
}

/// Anything pixels can be written to. (0, 0) is the top left pixel.
pub trait PixelSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Half-open range of rows [first, last) this sink accepts writes for.
    /// Writes outside of it are a bug of the caller.
    fn row_span(&self) -> (u32, u32) {
        return (0, self.height());
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Fills every pixel of the sink with one color.
    fn clear(&mut self, color: Color);
}

/// Rendered image, holding its width, height and private flat array(vec) of rgb8 pixel data,
/// row by row from the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixel_data: Vec<u8>,
}

impl FrameBuffer {
    /// Black frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let capacity = 3 * width as usize * height as usize;
        return Self {
            width,
            height,
            pixel_data: vec![0; capacity],
        };
    }

    /// Get rendered frame as a slice of color values of size 3 * (number of pixels).
    pub fn as_pixel_data(&self) -> &[u8] {
        return &self.pixel_data[..];
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        let index = self.index(x, y);
        return Color::new(
            self.pixel_data[index],
            self.pixel_data[index + 1],
            self.pixel_data[index + 2],
        );
    }

    /// Mutable rgb8 data of the rows [first, first + rows).
    pub(crate) fn rows_mut(&mut self, first: u32, rows: u32) -> &mut [u8] {
        let row_len = 3 * self.width as usize;
        let begin = first as usize * row_len;
        let end = begin + rows as usize * row_len;
        return &mut self.pixel_data[begin..end];
    }

    pub fn to_image(&self) -> RgbImage {
        return RgbImage::from_fn(self.width, self.height, |x, y| self.get_pixel(x, y).into());
    }

    /// Saves the frame, format picked by the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_image()
            .save(path)
            .with_context(|| format!("failed to save frame to {}", path.display()))?;
        log::info!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        return Ok(());
    }

    fn index(&self, x: u32, y: u32) -> usize {
        return 3 * (x as usize + y as usize * self.width as usize);
    }
}

impl PixelSink for FrameBuffer {
    fn width(&self) -> u32 {
        return self.width;
    }

    fn height(&self) -> u32 {
        return self.height;
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        // Pixel data is rgb8, so we find the starting index of a 3-tuple and do 3 assignments.
        let index = self.index(x, y);
        self.pixel_data[index] = color.r;
        self.pixel_data[index + 1] = color.g;
        self.pixel_data[index + 2] = color.b;
    }

    fn clear(&mut self, color: Color) {
        for pixel in self.pixel_data.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[color.r, color.g, color.b]);
        }
    }
}

impl PixelSink for RgbImage {
    fn width(&self) -> u32 {
        return RgbImage::width(self);
    }

    fn height(&self) -> u32 {
        return RgbImage::height(self);
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.put_pixel(x, y, color.into());
    }

    fn clear(&mut self, color: Color) {
        for pixel in self.pixels_mut() {
            *pixel = color.into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_black() {
        let frame = FrameBuffer::new(4, 3);
        assert_eq!(frame.as_pixel_data().len(), 36);
        assert!(frame.as_pixel_data().iter().all(|c| *c == 0));
    }

    #[test]
    fn set_pixel_is_row_major_from_top() {
        let mut frame = FrameBuffer::new(4, 3);
        frame.set_pixel(1, 2, Color::new(10, 20, 30));
        assert_eq!(frame.get_pixel(1, 2), Color::new(10, 20, 30));
        assert_eq!(&frame.as_pixel_data()[27..30], &[10, 20, 30]);
        assert_eq!(frame.get_pixel(2, 1), Color::BLACK);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut frame = FrameBuffer::new(5, 2);
        frame.clear(Color::new(1, 2, 3));
        assert!(frame.as_pixel_data().chunks(3).all(|p| p == [1, 2, 3]));
    }

    #[test]
    fn image_matches_frame() {
        let mut frame = FrameBuffer::new(3, 3);
        frame.set_pixel(2, 0, Color::WHITE);
        let image = frame.to_image();
        assert_eq!(*image.get_pixel(2, 0), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(0, 2), Rgb([0, 0, 0]));
        assert_eq!(image.as_raw().as_slice(), frame.as_pixel_data());
    }

    #[test]
    fn rgb_image_is_a_sink() {
        let mut image = RgbImage::new(2, 2);
        PixelSink::clear(&mut image, Color::new(9, 9, 9));
        image.set_pixel(1, 1, Color::WHITE);
        assert_eq!(PixelSink::row_span(&image), (0, 2));
        assert_eq!(*image.get_pixel(0, 0), Rgb([9, 9, 9]));
        assert_eq!(*image.get_pixel(1, 1), Rgb([255, 255, 255]));
    }
}
