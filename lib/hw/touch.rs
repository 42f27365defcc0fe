#[cfg(feature = "board")]
use core::convert::Infallible;
#[cfg(feature = "board")]
use stm32g0xx_hal::hal::blocking::spi::Transfer;
#[cfg(feature = "board")]
use stm32g0xx_hal::hal::digital::v2::OutputPin;

#[cfg(feature = "board")]
use crate::hw::Touch;
#[cfg(feature = "board")]
use crate::input::TouchSample;

// Control bytes: start bit, channel, 12-bit differential, PENIRQ kept enabled
#[cfg(feature = "board")]
const READ_X: u8 = 0b1_101_0_0_00;
#[cfg(feature = "board")]
const READ_Y: u8 = 0b1_001_0_0_00;
#[cfg(feature = "board")]
const READ_Z1: u8 = 0b1_011_0_0_00;
#[cfg(feature = "board")]
const READ_Z2: u8 = 0b1_100_0_0_00;

const FULL_SCALE: u16 = 4095;
// Lighter presses are treated as noise
const PRESSURE_THRESHOLD: u16 = 400;

/// True when the replies look like an empty bus rather than a controller.
///
/// A floating MISO reads either all ones or all zeros on every channel.
pub fn is_silent(z1: u16, z2: u16, x: u16) -> bool {
    let stuck_high = z1 >= FULL_SCALE && x >= FULL_SCALE;
    let stuck_low = z1 == 0 && z2 == 0 && x == 0;
    stuck_high || stuck_low
}

/// Contact pressure from the two plate readings, `None` when untouched.
pub fn pressure(z1: u16, z2: u16) -> Option<u16> {
    if z1 == 0 {
        return None;
    }
    let z = (z1 + FULL_SCALE).saturating_sub(z2);
    if z < PRESSURE_THRESHOLD {
        None
    } else {
        Some(z)
    }
}

#[cfg(feature = "board")]
#[derive(Debug)]
pub enum TouchError<E> {
    Spi(E),
    NotResponding,
}

#[cfg(feature = "board")]
pub struct Xpt2046<SPI, CS> {
    spi: SPI,
    cs: CS,
    rotation: u8,
}

#[cfg(feature = "board")]
impl<SPI, CS, E> Xpt2046<SPI, CS>
where
    SPI: Transfer<u8, Error = E>,
    CS: OutputPin<Error = Infallible>,
{
    pub fn new(spi: SPI, cs: CS, rotation: u8) -> Self {
        Xpt2046 {
            spi,
            cs,
            rotation: rotation % 4,
        }
    }

    fn read(&mut self, command: u8) -> Result<u16, TouchError<E>> {
        let mut buffer = [command, 0, 0];
        let _ = self.cs.set_low();
        let result = self.spi.transfer(&mut buffer).map(|reply| {
            (((reply[1] as u16) << 8) | reply[2] as u16) >> 3
        });
        let _ = self.cs.set_high();
        result.map_err(TouchError::Spi)
    }

    fn rotate(&self, x: u16, y: u16) -> (u16, u16) {
        match self.rotation {
            0 => (FULL_SCALE - y, x),
            1 => (x, y),
            2 => (y, FULL_SCALE - x),
            _ => (FULL_SCALE - x, FULL_SCALE - y),
        }
    }
}

#[cfg(feature = "board")]
impl<SPI, CS, E> Touch for Xpt2046<SPI, CS>
where
    SPI: Transfer<u8, Error = E>,
    CS: OutputPin<Error = Infallible>,
{
    type Error = TouchError<E>;

    fn begin(&mut self) -> Result<(), Self::Error> {
        let _ = self.cs.set_high();
        let z1 = self.read(READ_Z1)?;
        let z2 = self.read(READ_Z2)?;
        let x = self.read(READ_X)?;
        if is_silent(z1, z2, x) {
            return Err(TouchError::NotResponding);
        }
        Ok(())
    }

    fn point(&mut self) -> Result<TouchSample, Self::Error> {
        let z1 = self.read(READ_Z1)?;
        let z2 = self.read(READ_Z2)?;
        let z = match pressure(z1, z2) {
            Some(z) => z,
            None => return Ok(TouchSample::default()),
        };
        let x = self.read(READ_X)?.min(FULL_SCALE);
        let y = self.read(READ_Y)?.min(FULL_SCALE);
        let (x, y) = self.rotate(x, y);
        Ok(TouchSample::new(x, y, z))
    }
}
