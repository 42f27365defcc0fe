use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;

pub struct Screen;

impl Screen {
    pub const WIDTH: i32 = 320;
    pub const HEIGHT: i32 = 240;

    pub const BACKGROUND: Rgb565 = Rgb565::WHITE;
    pub const INK: Rgb565 = Rgb565::BLACK;
}

/// Raw XPT2046 readings at the screen edges.
pub struct RawBounds;

impl RawBounds {
    pub const MIN_X: i32 = 370;
    pub const MAX_X: i32 = 3900;
    pub const MIN_Y: i32 = 210;
    pub const MAX_Y: i32 = 3800;
}

pub struct Toolbar;

impl Toolbar {
    /// Taps with a mapped `y` above this land on the canvas.
    pub const HEIGHT: i32 = 50;

    // Bands are open intervals on the mapped x coordinate
    pub const SAVE_BAND_END: i32 = 60;
    pub const WHITE_BAND_START: i32 = 230;
    pub const WHITE_BAND_END: i32 = 270;
    pub const BLACK_BAND_START: i32 = 275;

    pub const WHITE_BUTTON: Point = Point::new(250, 25);
    pub const BLACK_BUTTON: Point = Point::new(295, 25);
    pub const BUTTON_RADIUS: u32 = 16;
    pub const BUTTON_RING_RADIUS: u32 = 20;

    pub const NOTICE_POSITION: Point = Point::new(64, 20);
}

pub struct Pen;

impl Pen {
    pub const RADIUS: u32 = 5;
    pub const DEFAULT: Rgb565 = Rgb565::WHITE;
}

pub struct Timing;

impl Timing {
    pub const TICK_MS: u32 = 5;
    pub const TICK_HZ: u32 = 1000 / Timing::TICK_MS;
    pub const NOTICE_TICKS: u16 = (2000 / Timing::TICK_MS) as u16;
}

pub struct Export;

impl Export {
    pub const PATH: &'static str = "SLIKA.PBM";
    pub const ROWS_PER_CHUNK: u32 = 8;
    /// One token and one separator per pixel.
    pub const ROW_BYTES: usize = Screen::WIDTH as usize * 2;
    pub const CHUNK_BYTES: usize = Export::ROWS_PER_CHUNK as usize * Export::ROW_BYTES;
}
