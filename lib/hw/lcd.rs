use core::convert::Infallible;
use display_interface::{DisplayError, WriteOnlyDataCommand};
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565, RgbColor};
use embedded_graphics::prelude::{DrawTarget, Drawable, Pixel, Point};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::geometry::Dimensions;
use ili9341::{DisplaySize240x320, Ili9341, Orientation};
use stm32g0xx_hal::hal::blocking::delay::DelayMs;
use stm32g0xx_hal::hal::digital::v2::OutputPin;

use crate::config::Screen;
use crate::hw::Lcd;

#[derive(Debug)]
pub struct IliError(pub DisplayError);

const SHADOW_WORDS: usize = (Screen::WIDTH * Screen::HEIGHT) as usize / 32;

// The parallel bus is write-only, so lit pixels are tracked here.
struct Shadow {
    bits: [u32; SHADOW_WORDS],
}

impl Shadow {
    fn new() -> Self {
        Shadow {
            bits: [0; SHADOW_WORDS],
        }
    }

    fn index(point: Point) -> Option<usize> {
        if point.x < 0 || point.y < 0 || point.x >= Screen::WIDTH || point.y >= Screen::HEIGHT {
            return None;
        }
        Some((point.y * Screen::WIDTH + point.x) as usize)
    }

    fn fill(&mut self, color: Rgb565) {
        let word = if color.into_storage() > 0 { u32::MAX } else { 0 };
        self.bits.iter_mut().for_each(|bits| *bits = word);
    }

    fn set(&mut self, point: Point, color: Rgb565) {
        if let Some(i) = Shadow::index(point) {
            if color.into_storage() > 0 {
                self.bits[i / 32] |= 1 << (i % 32);
            } else {
                self.bits[i / 32] &= !(1 << (i % 32));
            }
        }
    }

    fn is_lit(&self, point: Point) -> bool {
        Shadow::index(point).map_or(false, |i| self.bits[i / 32] & (1 << (i % 32)) != 0)
    }
}

struct Mirror<'a, D> {
    target: &'a mut D,
    shadow: &'a mut Shadow,
}

impl<'a, D> Dimensions for Mirror<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<'a, D> DrawTarget for Mirror<'a, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Color = Rgb565;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let shadow = &mut *self.shadow;
        self.target.draw_iter(
            pixels
                .into_iter()
                .inspect(|Pixel(point, color)| shadow.set(*point, *color)),
        )
    }
}

pub struct IliLcd<I, R> {
    ili: Ili9341<I, R>,
    shadow: Shadow,
}

impl<I, R> IliLcd<I, R>
where
    I: WriteOnlyDataCommand,
    R: OutputPin<Error = Infallible>,
{
    pub fn new<D>(interface: I, reset: R, delay: &mut D) -> Result<Self, IliError>
    where
        D: DelayMs<u16>,
    {
        let ili = Ili9341::new(
            interface,
            reset,
            delay,
            Orientation::LandscapeFlipped,
            DisplaySize240x320,
        )
        .map_err(IliError)?;

        Ok(IliLcd {
            ili,
            shadow: Shadow::new(),
        })
    }
}

impl<I, R> Lcd for IliLcd<I, R>
where
    I: WriteOnlyDataCommand,
    R: OutputPin<Error = Infallible>,
{
    type Error = IliError;

    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.shadow.fill(color);
        self.ili.clear(color).map_err(IliError)
    }

    fn draw<D: Drawable<Color = Rgb565>>(&mut self, drawable: &D) -> Result<D::Output, Self::Error> {
        let mut mirror = Mirror {
            target: &mut self.ili,
            shadow: &mut self.shadow,
        };
        drawable.draw(&mut mirror).map_err(IliError)
    }

    /// Only tells lit from black: lit pixels read back as white.
    fn pixel(&mut self, point: Point) -> Result<Rgb565, Self::Error> {
        Ok(if self.shadow.is_lit(point) {
            Rgb565::WHITE
        } else {
            Rgb565::BLACK
        })
    }
}
