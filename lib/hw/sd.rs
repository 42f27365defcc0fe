use core::fmt::Debug;
use embedded_sdmmc::{
    Controller, Error as SdError, File, Mode, SdMmcError, SdMmcSpi, TimeSource, Timestamp,
    Volume, VolumeIdx,
};
use stm32g0xx_hal::hal::digital::v2::OutputPin;
use stm32g0xx_hal::hal::spi::FullDuplex;

use crate::hw::{OpenMode, Storage};

/// No RTC on the board, files get a fixed date.
pub struct FixedClock;

impl TimeSource for FixedClock {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 52,
            zero_indexed_month: 11,
            zero_indexed_day: 15,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

pub struct SdStorage<SPI, CS>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    <SPI as FullDuplex<u8>>::Error: Debug,
{
    controller: Controller<SdMmcSpi<SPI, CS>, FixedClock>,
    volume: Option<Volume>,
}

impl<SPI, CS> SdStorage<SPI, CS>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    <SPI as FullDuplex<u8>>::Error: Debug,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        SdStorage {
            controller: Controller::new(SdMmcSpi::new(spi, cs), FixedClock),
            volume: None,
        }
    }
}

impl<SPI, CS> Storage for SdStorage<SPI, CS>
where
    SPI: FullDuplex<u8>,
    CS: OutputPin,
    <SPI as FullDuplex<u8>>::Error: Debug,
{
    const NAME: &'static str = "sd";
    type Error = SdError<SdMmcError>;
    type File = File;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.controller
            .device()
            .init()
            .map_err(SdError::DeviceError)?;
        self.volume = Some(self.controller.get_volume(VolumeIdx(0))?);
        Ok(())
    }

    fn open(
        &mut self,
        path: &str,
        mode: OpenMode,
        create: bool,
    ) -> Result<Self::File, Self::Error> {
        let volume = self
            .volume
            .as_mut()
            .ok_or(SdError::DeviceError(SdMmcError::BadState))?;
        let mode = match (mode, create) {
            (OpenMode::Truncate, _) => Mode::ReadWriteCreateOrTruncate,
            (OpenMode::Append, true) => Mode::ReadWriteCreateOrAppend,
            (OpenMode::Append, false) => Mode::ReadWriteAppend,
        };
        let root = self.controller.open_root_dir(volume)?;
        let file = self.controller.open_file_in_dir(volume, &root, path, mode);
        self.controller.close_dir(volume, root);
        file
    }

    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<(), Self::Error> {
        let volume = self
            .volume
            .as_mut()
            .ok_or(SdError::DeviceError(SdMmcError::BadState))?;
        self.controller.write(volume, file, data)?;
        Ok(())
    }

    fn close(&mut self, file: Self::File) -> Result<(), Self::Error> {
        let volume = self
            .volume
            .as_ref()
            .ok_or(SdError::DeviceError(SdMmcError::BadState))?;
        self.controller.close_file(volume, file)
    }

    fn end(&mut self) {
        self.volume = None;
        self.controller.device().deinit();
    }
}
