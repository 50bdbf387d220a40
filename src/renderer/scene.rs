//! Scene drawing
//!
//! Translates a `GameState` snapshot into pixels: desert backdrop, pipes,
//! scrolling ground, the bird, and the HUD. The backdrop is generated
//! procedurally once per resize; the simulation never sees any of this.

use std::io::{self, Write};

use crossterm::{cursor, queue, style};

use crate::consts::*;
use crate::sim::{GamePhase, GameState};

use super::pixel::{PixelBuf, Rgb};

// Palette: bright sky, sand, and cartoon-green pipes
const SKY_TOP: Rgb = Rgb(112, 197, 206);
const SKY_BOTTOM: Rgb = Rgb(190, 232, 245);
const SAND: Rgb = Rgb(222, 216, 149);
const SAND_DARK: Rgb = Rgb(198, 190, 120);
const GRASS: Rgb = Rgb(115, 191, 46);
const GRASS_LIGHT: Rgb = Rgb(140, 210, 70);
const OUTLINE: Rgb = Rgb(58, 58, 58);
const PIPE_BODY: Rgb = Rgb(139, 224, 78);
const PIPE_HI: Rgb = Rgb(214, 255, 179);
const PIPE_MID: Rgb = Rgb(182, 232, 122);
const PIPE_SHADE: Rgb = Rgb(163, 217, 119);
const PYRAMID: [Rgb; 3] = [Rgb(230, 201, 122), Rgb(210, 177, 109), Rgb(194, 160, 90)];
const PYRAMID_STEP: Rgb = Rgb(247, 233, 160);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(255, 215, 80);
const SHADOW: Rgb = Rgb(30, 30, 30);

// 3x5 digit glyphs, one bit per pixel, row-major from the top
#[rustfmt::skip]
const DIGIT_GLYPHS: [u16; 10] = [
    0b111_101_101_101_111, // 0
    0b010_110_010_010_111, // 1
    0b111_001_111_100_111, // 2
    0b111_001_011_001_111, // 3
    0b101_101_111_001_001, // 4
    0b111_100_111_001_111, // 5
    0b111_100_111_101_111, // 6
    0b111_001_001_010_010, // 7
    0b111_101_111_101_111, // 8
    0b111_101_111_001_111, // 9
];

/// Terminal renderer: scales the fixed logical world onto whatever cell
/// grid the terminal currently has
pub struct TermRenderer {
    buf: PixelBuf,
    backdrop: PixelBuf,
    cols: u16,
    rows: u16,
}

impl TermRenderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        let (w, h) = (cols as usize, rows as usize * 2);
        Self {
            buf: PixelBuf::new(w, h, SKY_TOP),
            backdrop: build_backdrop(w, h),
            cols,
            rows,
        }
    }

    /// Rebuild for a new terminal size; world coordinates never change
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (w, h) = (cols as usize, rows as usize * 2);
        self.buf.resize(w, h, SKY_TOP);
        self.backdrop = build_backdrop(w, h);
        self.cols = cols;
        self.rows = rows;
    }

    /// Draw one frame from a read-only snapshot of the world
    pub fn render(&mut self, state: &GameState, out: &mut impl Write) -> io::Result<()> {
        self.buf.copy_from(&self.backdrop);

        if state.phase != GamePhase::Welcome {
            self.draw_pipes(state);
        }
        self.draw_ground(state.ground_x);
        self.draw_bird(state);

        if state.phase != GamePhase::Playing {
            self.buf.dim_all();
        }
        self.draw_hud(state);

        self.buf.present(out)?;
        self.overlay_text(state, out)
    }

    fn px(&self, x: f32) -> i32 {
        (x / WORLD_W * self.buf.width() as f32) as i32
    }

    fn py(&self, y: f32) -> i32 {
        (y / WORLD_H * self.buf.height() as f32) as i32
    }

    fn draw_pipes(&mut self, state: &GameState) {
        for pipe in &state.pipes {
            let x0 = self.px(pipe.x);
            let x1 = self.px(pipe.x + PIPE_W);
            let ground = self.py(GROUND_Y);

            // top pipe hangs from the world's upper edge
            self.draw_pipe_column(x0, x1, 0, self.py(pipe.top_height), true);
            // bottom pipe rises from the ground line
            self.draw_pipe_column(x0, x1, self.py(pipe.bottom_y), ground, false);
        }
    }

    /// One pipe body plus its lip; the lip hugs the gap edge
    fn draw_pipe_column(&mut self, x0: i32, x1: i32, y0: i32, y1: i32, is_top: bool) {
        if y1 <= y0 || x1 <= x0 {
            return;
        }
        let w = x1 - x0;
        let lip_h = self.py(16.0).clamp(1, (y1 - y0).max(1));
        let lip_extra = (w / 8).max(1);

        let (body_y0, body_y1, lip_y0, lip_y1) = if is_top {
            (y0, y1 - lip_h, y1 - lip_h, y1)
        } else {
            (y0 + lip_h, y1, y0, y0 + lip_h)
        };

        for x in x0..x1 {
            let t = (x - x0) as f32 / (w - 1).max(1) as f32;
            let c = pipe_shade(t);
            for y in body_y0..body_y1 {
                self.buf.set(x, y, c);
            }
        }

        for x in (x0 - lip_extra)..(x1 + lip_extra) {
            let t = (x - x0 + lip_extra) as f32 / (w + 2 * lip_extra - 1).max(1) as f32;
            let c = pipe_shade(t);
            for y in lip_y0..lip_y1 {
                self.buf.set(x, y, c);
            }
            self.buf.set(x, lip_y0, OUTLINE);
            self.buf.set(x, lip_y1 - 1, OUTLINE);
        }
    }

    /// Grass strip, outline, and striped sand, all sliding with the
    /// scroll offset
    fn draw_ground(&mut self, ground_x: f32) {
        let w = self.buf.width() as i32;
        let h = self.buf.height() as i32;
        let top = self.py(GROUND_Y);
        let grass_bottom = (self.py(GROUND_Y + 20.0)).max(top + 1);
        let outline_bottom = (self.py(GROUND_Y + 24.0)).max(grass_bottom + 1);

        for x in 0..w {
            let wx = x as f32 * WORLD_W / w.max(1) as f32;
            let band = (((wx - ground_x) / 12.0).floor() as i64).rem_euclid(2) == 0;
            let grass = if band { GRASS } else { GRASS_LIGHT };

            for y in top..grass_bottom {
                self.buf.set(x, y, grass);
            }
            for y in grass_bottom..outline_bottom {
                self.buf.set(x, y, OUTLINE);
            }
            for y in outline_bottom..h {
                let stripe = ((((wx - ground_x * 0.8) / 24.0).floor() as i64)
                    + ((y - outline_bottom) / 3) as i64)
                    .rem_euclid(2)
                    == 0;
                self.buf.set(x, y, if stripe { SAND } else { SAND_DARK });
            }
        }
    }

    fn draw_bird(&mut self, state: &GameState) {
        let bird = &state.bird;
        let x0 = self.px(bird.pos.x);
        let y0 = self.py(bird.pos.y);
        // the drawn sprite is larger than the collision box
        let w = (self.px(bird.pos.x + 40.0) - x0).max(2);
        let h = (self.py(bird.pos.y + 28.0) - y0).max(2);

        // crude tilt: nose and tail shift against each other
        let tilt = (bird.rotation / std::f32::consts::FRAC_PI_4 * h as f32 * 0.35) as i32;

        // body with a lighter crown
        self.buf.fill_rect(x0, y0, w, h, BIRD_BODY);
        self.buf.fill_rect(x0 + 1, y0, w - 2, (h / 4).max(1), BIRD_HI);

        // wing, cycling through the frame sequence
        let wing_phase = (bird.frame as f32 / BIRD_FRAMES as f32 * std::f32::consts::TAU).sin();
        let wing_y = y0 + h / 2 + (wing_phase * h as f32 * 0.25) as i32;
        self.buf
            .fill_rect(x0 + w / 6, wing_y, (w / 2).max(1), (h / 3).max(1), BIRD_WING);

        // tail
        let tail_w = (w / 5).max(1);
        self.buf
            .fill_rect(x0 - tail_w, y0 + h / 2 - tilt, tail_w, (h / 4).max(1), BIRD_WING);

        // eye
        let er = (w / 8).max(1);
        let ex = x0 + w - er * 2;
        let ey = y0 + (h / 5).max(1);
        self.buf.fill_rect(ex, ey, er, er, BIRD_EYE);
        self.buf.set(ex + er / 2, ey + er / 2, BIRD_PUPIL);

        // beak, leading the tilt
        let bw = (w / 4).max(1);
        let bh = (h / 4).max(1);
        self.buf
            .fill_rect(x0 + w - 1, y0 + h / 2 - bh / 2 + tilt, bw, bh, BIRD_BEAK);
    }

    fn draw_hud(&mut self, state: &GameState) {
        let w = self.buf.width() as i32;
        let scale = (self.buf.height() as i32 / 80).max(1);
        draw_number(&mut self.buf, w / 2, 2 * scale, scale, state.score, WHITE);
        draw_number(&mut self.buf, w - 8 * scale, 2 * scale, scale, state.high_score, GOLD);
    }

    /// Phase banners printed as plain text on top of the pixel frame
    fn overlay_text(&self, state: &GameState, out: &mut impl Write) -> io::Result<()> {
        let lines: &[&str] = match state.phase {
            GamePhase::Welcome => &["P Y R A  F L A P", "click or press space to begin"],
            GamePhase::GameOver => &["G A M E  O V E R", "click or press space to try again"],
            GamePhase::Playing => return Ok(()),
        };

        for (i, line) in lines.iter().enumerate() {
            let col = (self.cols as usize).saturating_sub(line.len()) / 2;
            queue!(
                out,
                cursor::MoveTo(col as u16, self.rows / 2 + i as u16 * 2),
                style::SetForegroundColor(style::Color::White),
                style::SetBackgroundColor(style::Color::Rgb { r: 40, g: 40, b: 40 }),
                style::Print(line),
                style::ResetColor
            )?;
        }
        out.flush()
    }
}

fn pipe_shade(t: f32) -> Rgb {
    // vertical highlight bands give the flat fill a rounded look
    if t < 0.08 {
        OUTLINE
    } else if t < 0.18 {
        PIPE_BODY
    } else if t < 0.30 {
        PIPE_HI
    } else if t < 0.38 {
        PIPE_BODY
    } else if t < 0.46 {
        PIPE_MID
    } else if t < 0.65 {
        PIPE_BODY
    } else if t < 0.72 {
        PIPE_SHADE
    } else if t < 0.92 {
        PIPE_BODY
    } else {
        OUTLINE
    }
}

/// Sky gradient plus a row of stepped pyramids
fn build_backdrop(w: usize, h: usize) -> PixelBuf {
    let mut buf = PixelBuf::new(w, h, SKY_TOP);
    let px = |x: f32| (x / WORLD_W * w as f32) as i32;
    let py = |y: f32| (y / WORLD_H * h as f32) as i32;

    let horizon = py(GROUND_Y).max(1);
    for y in 0..horizon {
        let c = SKY_TOP.lerp(SKY_BOTTOM, y as f32 / horizon as f32);
        for x in 0..w as i32 {
            buf.set(x, y, c);
        }
    }

    const BASE: f32 = 160.0;
    const HEIGHT: f32 = 140.0;
    const STEPS: i32 = 6;
    let stride = BASE - 20.0;
    let mut index = 0u64;
    let mut left = -BASE / 2.0;

    while left < WORLD_W {
        let body = PYRAMID[(hash_unit(index) * PYRAMID.len() as f32) as usize % PYRAMID.len()];
        for step in 0..STEPS {
            let inset = step as f32 * (BASE / 12.0);
            let y_top = GROUND_Y - HEIGHT * (step + 1) as f32 / STEPS as f32;
            let y_bot = GROUND_Y - HEIGHT * step as f32 / STEPS as f32;
            let x0 = px(left + inset);
            let x1 = px(left + BASE - inset);
            let face = body.lerp(PYRAMID_STEP, 0.35 + 0.08 * step as f32);
            for x in x0..x1 {
                // the right face sits in shade
                let c = if x > x0 + (x1 - x0) * 3 / 4 {
                    face.lerp(SHADOW, 0.15)
                } else {
                    face
                };
                for y in py(y_top)..py(y_bot) {
                    buf.set(x, y, c);
                }
            }
        }
        left += stride;
        index += 1;
    }

    buf
}

/// Cheap hash to the unit interval; the backdrop is decorative and needs
/// variety, not randomness
fn hash_unit(seed: u64) -> f32 {
    let x = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    (((x >> 33) ^ x) % 1000) as f32 / 1000.0
}

fn draw_digit(buf: &mut PixelBuf, x: i32, y: i32, scale: i32, digit: usize, color: Rgb) {
    let glyph = DIGIT_GLYPHS[digit];
    for row in 0..5i32 {
        for col in 0..3i32 {
            let bit = 14 - (row * 3 + col);
            if glyph >> bit & 1 == 1 {
                buf.fill_rect(x + col * scale, y + row * scale, scale, scale, color);
            }
        }
    }
}

/// Draw `n` centered on `cx` with a one-pixel drop shadow
fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, scale: i32, n: u32, color: Rgb) {
    let digits = n.to_string();
    let advance = 4 * scale;
    let total = digits.len() as i32 * advance - scale;
    let mut x = cx - total / 2;

    for ch in digits.chars() {
        let d = (ch as u8 - b'0') as usize;
        draw_digit(buf, x + 1, y + 1, scale, d, SHADOW);
        draw_digit(buf, x, y, scale, d, color);
        x += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Pipe;

    #[test]
    fn test_render_smoke_all_phases() {
        let mut renderer = TermRenderer::new(80, 24);
        let mut state = GameState::new(12);
        state.pipes.push(Pipe::new(300.0, 200.0));
        state.score = 3;

        let mut out: Vec<u8> = Vec::new();
        for phase in [GamePhase::Welcome, GamePhase::Playing, GamePhase::GameOver] {
            state.phase = phase;
            renderer.render(&state, &mut out).unwrap();
        }
        assert!(!out.is_empty());
    }

    #[test]
    fn test_render_survives_resize_and_tiny_terminals() {
        let mut renderer = TermRenderer::new(80, 24);
        let state = GameState::new(0);
        let mut out: Vec<u8> = Vec::new();

        for (cols, rows) in [(1u16, 1u16), (5, 2), (200, 60)] {
            renderer.resize(cols, rows);
            renderer.render(&state, &mut out).unwrap();
        }
    }
}
