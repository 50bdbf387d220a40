//! Half-block pixel buffer
//!
//! Terminal cells are roughly twice as tall as they are wide; printing
//! `▀` with independent foreground and background colors yields two
//! square-ish pixels per cell.

use std::io::{self, Write};

use crossterm::{cursor, queue, style};

/// A packed 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend toward `other`, `t` clamped to 0..=1
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let ch = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Rgb(ch(self.0, other.0), ch(self.1, other.1), ch(self.2, other.2))
    }

    /// Half brightness; used to dim the scene behind overlays
    pub fn dimmed(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn as_crossterm(self) -> style::Color {
        style::Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

/// Pixel buffer holding two pixel rows per terminal row
pub struct PixelBuf {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize, fill: Rgb) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, fill);
    }

    /// Write one pixel; out-of-bounds coordinates are ignored
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, color);
            }
        }
    }

    /// Overwrite this buffer with another of identical dimensions
    pub fn copy_from(&mut self, other: &PixelBuf) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Dim every pixel in place
    pub fn dim_all(&mut self) {
        for px in &mut self.pixels {
            *px = px.dimmed();
        }
    }

    /// Flush the buffer to the terminal as rows of `▀` glyphs, skipping
    /// redundant color escapes by remembering the last colors set
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.height / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.width {
                let top = self.get(col, row * 2);
                let bottom = self.get(col, row * 2 + 1);
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.as_crossterm()))?;
                    fg = Some(top);
                }
                if bg != Some(bottom) {
                    queue!(out, style::SetBackgroundColor(bottom.as_crossterm()))?;
                    bg = Some(bottom);
                }
                queue!(out, style::Print('\u{2580}'))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}
