//! Minimal raster drawing for challenge images.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use bastion_core::GenerateError;
use image::{DynamicImage, Rgba, RgbaImage};
use rand::Rng;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// 5x7 digit bitmaps, one byte per row, high bit on the left.
const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

pub(crate) struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn put(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    /// Scales the RGB channels of a region by `factor` (0.0 black, 1.0 unchanged).
    pub fn shade_rect(&mut self, x: u32, y: u32, width: u32, height: u32, factor: f32) {
        for py in y..(y + height).min(self.height()) {
            for px in x..(x + width).min(self.width()) {
                let pixel = self.image.get_pixel_mut(px, py);
                for channel in pixel.0.iter_mut().take(3) {
                    *channel = (f32::from(*channel) * factor).clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    pub fn outline(&mut self, color: Rgba<u8>) {
        let (w, h) = (self.width() as i32 - 1, self.height() as i32 - 1);
        self.draw_line((0, 0), (w, 0), color);
        self.draw_line((w, 0), (w, h), color);
        self.draw_line((w, h), (0, h), color);
        self.draw_line((0, h), (0, 0), color);
    }

    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgba<u8>) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let step_x = if x < to.0 { 1 } else { -1 };
        let step_y = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x, y, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += step_x;
            }
            if doubled <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    pub fn draw_disc(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draws `digit` with its top-left corner at (`x`, `y`), each font pixel
    /// `scale` pixels wide. Non-digits are skipped.
    pub fn draw_digit(&mut self, digit: char, x: i32, y: i32, scale: u32, color: Rgba<u8>) {
        let Some(index) = digit.to_digit(10) else {
            return;
        };
        for (row, bits) in DIGITS[index as usize].iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    self.fill_rect(
                        x + (col * scale) as i32,
                        y + (row as u32 * scale) as i32,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }

    pub fn speckle<R: Rng + ?Sized>(&mut self, rng: &mut R, count: u32) {
        for _ in 0..count {
            let x = rng.random_range(0..self.width()) as i32;
            let y = rng.random_range(0..self.height()) as i32;
            let color = random_color(rng, 100, 220);
            self.put(x, y, color);
        }
    }

    pub fn scribble<R: Rng + ?Sized>(&mut self, rng: &mut R, lines: u32) {
        let (w, h) = (self.width() as i32, self.height() as i32);
        for _ in 0..lines {
            let from = (rng.random_range(0..w), rng.random_range(0..h));
            let to = (rng.random_range(0..w), rng.random_range(0..h));
            let color = random_color(rng, 120, 200);
            self.draw_line(from, to, color);
        }
    }

    /// Copy of a region clamped to the canvas.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Canvas {
        let view = image::imageops::crop_imm(&self.image, x, y, width, height);
        Canvas {
            image: view.to_image(),
        }
    }

    pub fn to_base64_png(&self) -> Result<String, GenerateError> {
        let dynamic_image = DynamicImage::ImageRgba8(self.image.clone());
        let mut buffer = Cursor::new(Vec::new());
        dynamic_image
            .write_to(&mut buffer, image::ImageOutputFormat::Png)
            .map_err(|e| GenerateError::Render(e.to_string()))?;

        Ok(general_purpose::STANDARD.encode(buffer.get_ref()))
    }
}

/// Largest glyph scale that fits `chars` digits into `width` x `height`.
pub(crate) fn glyph_scale(chars: usize, width: u32, height: u32) -> u32 {
    let cell_width = GLYPH_WIDTH + 2;
    let by_width = width / (cell_width * chars.max(1) as u32);
    let by_height = height * 7 / 10 / GLYPH_HEIGHT;
    by_width.min(by_height).max(1)
}

pub(crate) fn glyph_size(scale: u32) -> (u32, u32) {
    (GLYPH_WIDTH * scale, GLYPH_HEIGHT * scale)
}

pub(crate) fn random_color<R: Rng + ?Sized>(rng: &mut R, min: u8, max: u8) -> Rgba<u8> {
    Rgba([
        rng.random_range(min..=max),
        rng.random_range(min..=max),
        rng.random_range(min..=max),
        255,
    ])
}

pub(crate) fn random_digits<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[cfg(test)]
pub(crate) fn decode_png(encoded: &str) -> image::DynamicImage {
    let bytes = general_purpose::STANDARD.decode(encoded).unwrap();
    image::load_from_memory(&bytes).unwrap()
}
