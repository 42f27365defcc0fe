use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Drawable, Point};

use crate::input::TouchSample;

#[cfg(feature = "board")]
mod helper;
#[cfg(feature = "board")]
mod lcd;
#[cfg(feature = "board")]
mod sd;
#[cfg(feature = "board")]
mod serial;
#[cfg(feature = "board")]
mod timers;
pub mod touch;

#[cfg(feature = "board")]
pub use helper::*;
#[cfg(feature = "board")]
pub use lcd::IliError;
#[cfg(feature = "board")]
pub use timers::PollTimer;

pub trait Lcd {
    type Error;
    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error>;
    fn draw<D: Drawable<Color = Rgb565>>(&mut self, drawable: &D) -> Result<D::Output, Self::Error>;
    /// Reads back the color currently shown at `point`.
    fn pixel(&mut self, point: Point) -> Result<Rgb565, Self::Error>;
}

pub trait Touch {
    type Error;
    fn begin(&mut self) -> Result<(), Self::Error>;
    /// Current contact point, with zero pressure when nothing touches the panel.
    fn point(&mut self) -> Result<TouchSample, Self::Error>;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OpenMode {
    Truncate,
    Append,
}

pub trait Storage {
    const NAME: &'static str;
    type Error;
    type File;
    fn begin(&mut self) -> Result<(), Self::Error>;
    fn open(&mut self, path: &str, mode: OpenMode, create: bool)
        -> Result<Self::File, Self::Error>;
    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), Self::Error>;
    fn close(&mut self, file: Self::File) -> Result<(), Self::Error>;
    fn end(&mut self);
}

/// A channel that has to stay silent while storage owns the bus.
pub trait Peer {
    const NAME: &'static str;
    fn suspend(&mut self);
    fn resume(&mut self);
}
