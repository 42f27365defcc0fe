use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::{Point, Primitive};
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

use crate::config::{Screen, Timing, Toolbar};
use crate::hw::Lcd;

// Floppy disk outline, drawn as a closed polyline plus the shutter
const SAVE_ICON: [(Point, Point); 8] = [
    (Point::new(10, 5), Point::new(10, 45)),
    (Point::new(10, 45), Point::new(50, 45)),
    (Point::new(50, 45), Point::new(50, 15)),
    (Point::new(50, 15), Point::new(45, 5)),
    (Point::new(45, 5), Point::new(10, 5)),
    (Point::new(15, 45), Point::new(15, 35)),
    (Point::new(15, 35), Point::new(25, 35)),
    (Point::new(25, 35), Point::new(25, 45)),
];

pub fn text(message: &str, position: Point, color: Rgb565) -> Text<'_, MonoTextStyle<'static, Rgb565>> {
    Text::with_baseline(
        message,
        position,
        MonoTextStyle::new(&FONT_6X10, color),
        Baseline::Top,
    )
}

/// Filled circle covering every pixel within `radius` of `center`.
pub fn dot(center: Point, radius: u32) -> Circle {
    Circle::with_center(center, 2 * radius + 1)
}

pub fn draw_booting<L: Lcd>(lcd: &mut L) -> Result<(), L::Error> {
    lcd.clear(Rgb565::BLACK)?;
    lcd.draw(&text("Initializing touch screen...", Point::new(10, 10), Rgb565::WHITE))?;
    Ok(())
}

pub fn draw_touch_failure<L: Lcd>(lcd: &mut L) -> Result<(), L::Error> {
    lcd.clear(Rgb565::BLACK)?;
    lcd.draw(&text(
        "ERROR! Touch screen failed to initialize!",
        Point::new(10, 10),
        Rgb565::WHITE,
    ))?;
    Ok(())
}

/// Blank canvas with the pen buttons, the separator and the save icon.
pub fn draw<L: Lcd>(lcd: &mut L) -> Result<(), L::Error> {
    lcd.clear(Screen::BACKGROUND)?;

    let ring = dot(Toolbar::WHITE_BUTTON, Toolbar::BUTTON_RING_RADIUS)
        .into_styled(PrimitiveStyle::with_fill(Screen::INK));
    let white = dot(Toolbar::WHITE_BUTTON, Toolbar::BUTTON_RADIUS)
        .into_styled(PrimitiveStyle::with_fill(Rgb565::WHITE));
    let black = dot(Toolbar::BLACK_BUTTON, Toolbar::BUTTON_RADIUS)
        .into_styled(PrimitiveStyle::with_fill(Rgb565::BLACK));
    lcd.draw(&ring)?;
    lcd.draw(&white)?;
    lcd.draw(&black)?;

    let separator = Line::new(
        Point::new(0, Toolbar::HEIGHT),
        Point::new(Screen::WIDTH, Toolbar::HEIGHT),
    )
    .into_styled(PrimitiveStyle::with_stroke(Screen::INK, 1));
    lcd.draw(&separator)?;

    for (start, end) in SAVE_ICON.iter() {
        let stroke = Line::new(*start, *end).into_styled(PrimitiveStyle::with_stroke(Screen::INK, 1));
        lcd.draw(&stroke)?;
    }
    Ok(())
}

/// Short message in the toolbar that disappears after a while.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    message: &'static str,
    color: Rgb565,
    ticks_left: u16,
}

impl Notice {
    pub fn new(message: &'static str, color: Rgb565) -> Self {
        Notice {
            message,
            color,
            ticks_left: Timing::NOTICE_TICKS,
        }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn show<L: Lcd>(&self, lcd: &mut L) -> Result<(), L::Error> {
        lcd.draw(&text(self.message, Toolbar::NOTICE_POSITION, self.color))?;
        Ok(())
    }

    pub fn hide<L: Lcd>(&self, lcd: &mut L) -> Result<(), L::Error> {
        lcd.draw(&text(self.message, Toolbar::NOTICE_POSITION, Screen::BACKGROUND))?;
        Ok(())
    }

    /// Counts one tick down, returns true once the notice has expired.
    pub fn tick(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.ticks_left == 0
    }
}
