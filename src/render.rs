//! Drawing the three phases into an off-screen frame.
//!
//! Each tick draws a complete frame into RAM and then pushes it to the
//! panel in one transfer, so the player never sees a half-drawn screen.

use core::{
    convert::Infallible,
    fmt::Write as _,
};

use embassy_time::Instant;
use embedded_graphics::{
    mono_font::{
        MonoFont,
        MonoTextStyle,
        iso_8859_1::{
            FONT_6X10,
            FONT_10X20,
        },
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        PrimitiveStyle,
        Rectangle,
    },
    text::{
        Baseline,
        Text,
    },
};

use crate::{
    config::{
        BLOCK_H,
        BLOCK_W,
        DEATH_SCREEN_DELAY,
        H,
        PIXELS,
        PLAYER_H,
        PLAYER_W,
        W,
    },
    state::{
        GameState,
        Phase,
    },
};

/// What the game needs from a display: a small immediate-mode API and a
/// way to present the finished frame.
pub trait Surface {
    fn clear(&mut self, color: Rgb565);
    fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565);
    fn set_font(&mut self, font: &'static MonoFont<'static>);
    fn set_font_color(&mut self, r: u8, g: u8, b: u8);
    fn print_text(&mut self, text: &str, x: i32, y: i32);
    fn font_height(&self) -> i32;
    fn font_width(&self) -> i32;
    /// Present everything drawn since the last flip.
    fn flip_frame(&mut self);
}

// ── Frame buffer ────────────────────────────────────────────────────────────

/// Full-screen RGB565 buffer.
pub struct FrameBuffer<'a> {
    buf: &'a mut [Rgb565; PIXELS],
}

impl<'a> FrameBuffer<'a> {
    pub fn new(buf: &'a mut [Rgb565; PIXELS]) -> Self {
        Self { buf }
    }

    #[cfg(test)]
    fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if (0..W).contains(&x) && (0..H).contains(&y) {
            Some(self.buf[(y * W + x) as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.buf.iter().copied()
    }
}

impl OriginDimensions for FrameBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl DrawTarget for FrameBuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..W).contains(&point.x) && (0..H).contains(&point.y) {
                self.buf[(point.y * W + point.x) as usize] = color;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        for y in area.top_left.y..=bottom_right.y {
            let row = (y * W) as usize;
            self.buf[row + area.top_left.x as usize..=row + bottom_right.x as usize].fill(color);
        }
        Ok(())
    }
}

// ── Screen ──────────────────────────────────────────────────────────────────

/// A frame buffer paired with the panel it is flipped onto.
pub struct Screen<'a, D> {
    frame: FrameBuffer<'a>,
    panel: D,
    font: &'static MonoFont<'static>,
    color: Rgb565,
}

impl<'a, D> Screen<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(frame: FrameBuffer<'a>, panel: D) -> Self {
        Self {
            frame,
            panel,
            font: &FONT_6X10,
            color: Rgb565::WHITE,
        }
    }

    #[cfg(test)]
    fn frame(&self) -> &FrameBuffer<'a> {
        &self.frame
    }

    #[cfg(test)]
    fn panel(&self) -> &D {
        &self.panel
    }
}

impl<D> Surface for Screen<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn clear(&mut self, color: Rgb565) {
        let _ = DrawTarget::clear(&mut self.frame, color);
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let _ = Rectangle::new(Point::new(x, y), Size::new(w as u32, h as u32))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.frame);
    }

    fn set_font(&mut self, font: &'static MonoFont<'static>) {
        self.font = font;
    }

    fn set_font_color(&mut self, r: u8, g: u8, b: u8) {
        self.color = Rgb565::new(r >> 3, g >> 2, b >> 3);
    }

    fn print_text(&mut self, text: &str, x: i32, y: i32) {
        let style = MonoTextStyle::new(self.font, self.color);
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(&mut self.frame);
    }

    fn font_height(&self) -> i32 {
        self.font.character_size.height as i32
    }

    fn font_width(&self) -> i32 {
        (self.font.character_size.width + self.font.character_spacing) as i32
    }

    fn flip_frame(&mut self) {
        let area = Rectangle::new(Point::zero(), Size::new(W as u32, H as u32));
        if self.panel.fill_contiguous(&area, self.frame.pixels()).is_err() {
            error!("Display flush failed");
        }
    }
}

// ── Phase screens ───────────────────────────────────────────────────────────

const BACKGROUND: Rgb565 = Rgb565::BLACK;
const BLOCK_COLOR: Rgb565 = Rgb565::RED;
const PLAYER_COLOR: Rgb565 = Rgb565::WHITE;

/// Draw the current phase and present it.
pub fn render(surface: &mut impl Surface, state: &GameState, now: Instant) {
    match state.phase {
        Phase::Menu if state.selection == 0 => title_screen(surface),
        Phase::Menu => instructions_screen(surface),
        Phase::Game => game_screen(surface, state),
        Phase::Death { died_at } => death_screen(surface, state.player.score, died_at, now),
    }
    surface.flip_frame();
}

fn print_centered(surface: &mut impl Surface, text: &str, y: i32) {
    let width = surface.font_width() * text.len() as i32;
    surface.print_text(text, (W - width) / 2, y);
}

fn title_screen(surface: &mut impl Surface) {
    surface.clear(BACKGROUND);

    surface.set_font(&FONT_10X20);
    surface.set_font_color(255, 220, 0);
    print_centered(surface, "FALLING BLOCKS", H / 2 - 30);

    surface.set_font(&FONT_6X10);
    surface.set_font_color(255, 255, 255);
    print_centered(surface, "Press any button", H / 2 + 10);
}

fn instructions_screen(surface: &mut impl Surface) {
    surface.clear(BACKGROUND);

    surface.set_font(&FONT_10X20);
    surface.set_font_color(255, 220, 0);
    print_centered(surface, "HOW TO PLAY", 16);

    surface.set_font(&FONT_6X10);
    surface.set_font_color(255, 255, 255);
    let line = surface.font_height() + 4;
    let lines = [
        "Hold LEFT or RIGHT to move.",
        "Dodge the falling blocks.",
        "Every block you dodge scores.",
        "They get faster and more numerous!",
    ];
    for (i, text) in lines.iter().enumerate() {
        print_centered(surface, text, 56 + i as i32 * line);
    }

    surface.set_font_color(0, 255, 0);
    print_centered(surface, "Press any button to start", H - 24);
}

fn game_screen(surface: &mut impl Surface, state: &GameState) {
    surface.clear(BACKGROUND);

    for block in state.blocks.blocks().iter().filter(|b| b.is_live()) {
        surface.draw_rectangle(block.x, block.y, BLOCK_W, BLOCK_H, BLOCK_COLOR);
    }
    surface.draw_rectangle(state.player.x, state.player.y, PLAYER_W, PLAYER_H, PLAYER_COLOR);

    let mut text = heapless::String::<24>::new();
    let _ = write!(text, "Score: {}", state.player.score);
    surface.set_font(&FONT_6X10);
    surface.set_font_color(255, 255, 255);
    surface.print_text(&text, 4, 4);
}

fn death_screen(surface: &mut impl Surface, score: u32, died_at: Instant, now: Instant) {
    surface.clear(BACKGROUND);

    surface.set_font(&FONT_10X20);
    surface.set_font_color(255, 0, 0);
    print_centered(surface, "GAME OVER", H / 2 - 30);

    let mut text = heapless::String::<24>::new();
    let _ = write!(text, "Score: {}", score);
    surface.set_font(&FONT_6X10);
    surface.set_font_color(255, 255, 255);
    print_centered(surface, &text, H / 2 + 2);

    // Shrinking bar until the screen returns to the menu by itself.
    let total = DEATH_SCREEN_DELAY.as_millis();
    let shown = now.saturating_duration_since(died_at).as_millis().min(total);
    let bar = ((total - shown) * (W as u64 - 40) / total) as i32;
    surface.draw_rectangle(20, H - 16, bar, 4, Rgb565::CSS_ORANGE);
}
