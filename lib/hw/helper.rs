use cortex_m::peripheral::SYST;
use display_interface_parallel_gpio::{Generic8BitBus, PGPIO8BitInterface};
use stm32g0xx_hal::gpio::gpioa::{PA1, PA4, PA5, PA6, PA7, PA8};
use stm32g0xx_hal::gpio::gpiob::{
    PB0, PB1, PB12, PB13, PB14, PB15, PB2, PB3, PB4, PB5, PB6, PB7, PB8, PB9,
};
use stm32g0xx_hal::gpio::{DefaultMode, Output, PushPull};
use stm32g0xx_hal::prelude::OutputPin;
use stm32g0xx_hal::rcc::{Config, PllConfig, Rcc, RccExt};
use stm32g0xx_hal::serial::{FullConfig, Serial};
use stm32g0xx_hal::spi::Spi;
use stm32g0xx_hal::stm32g0::stm32g070::{RCC, SPI1, SPI2, USART2};
use stm32g0xx_hal::timer::delay::Delay;

use crate::hw::lcd::{IliError, IliLcd};
use crate::hw::sd::SdStorage;
use crate::hw::serial::SerialLink;
use crate::hw::touch::Xpt2046;

pub fn init_clock(pac_rcc: RCC) -> Rcc {
    // ((16 MHz / 4) * 32) / 2 = 64 MHz
    let pll_config = PllConfig::with_hsi(4, 32, 2);
    pac_rcc.freeze(Config::pll().pll_cfg(pll_config))
}

// PB0 - LCD_D0
type LcdD0 = PB0<Output<PushPull>>;
// PB1 - LCD_D1
type LcdD1 = PB1<Output<PushPull>>;
// PB2 - LCD_D2
type LcdD2 = PB2<Output<PushPull>>;
// PB3 - LCD_D3
type LcdD3 = PB3<Output<PushPull>>;
// PB4 - LCD_D4
type LcdD4 = PB4<Output<PushPull>>;
// PB5 - LCD_D5
type LcdD5 = PB5<Output<PushPull>>;
// PB6 - LCD_D6
type LcdD6 = PB6<Output<PushPull>>;
// PB7 - LCD_D7
type LcdD7 = PB7<Output<PushPull>>;
// PB8 - LCD_DC (Command[Low]/Data[High])
type LcdDC = PB8<Output<PushPull>>;
// PB9 - LCD_WR (Write signal)
type LcdWR = PB9<Output<PushPull>>;

// PA4 - LCD_RST (Reset)
pub type LcdRst = PA4<Output<PushPull>>;
// PA5 - LCD_RD (Read signal)
pub type LcdRD = PA5<Output<PushPull>>;

// PA1 - TOUCH_CLK, PA6 - TOUCH_DO, PA7 - TOUCH_DIN
pub type TouchSpi = Spi<SPI1, (PA1<DefaultMode>, PA6<DefaultMode>, PA7<DefaultMode>)>;
// PA8 - TOUCH_CS
pub type TouchCs = PA8<Output<PushPull>>;

// PB13 - SD_SCK, PB14 - SD_MISO, PB15 - SD_MOSI
pub type SdSpi = Spi<SPI2, (PB13<DefaultMode>, PB14<DefaultMode>, PB15<DefaultMode>)>;
// PB12 - SD_CS
pub type SdCs = PB12<Output<PushPull>>;

// PA2 - USART2_TX
// PA3 - USART2_RX
pub type SerialPort = Serial<USART2, FullConfig>;

pub type LcdBus =
    Generic8BitBus<LcdD0, LcdD1, LcdD2, LcdD3, LcdD4, LcdD5, LcdD6, LcdD7>;
pub type LcdInterface = PGPIO8BitInterface<LcdBus, LcdDC, LcdWR>;
pub type HwLcd = IliLcd<LcdInterface, LcdRst>;
pub type HwTouch = Xpt2046<TouchSpi, TouchCs>;
pub type HwStorage = SdStorage<SdSpi, SdCs>;
pub type HwSerial = SerialLink;

pub fn init_lcd(
    interface: LcdInterface,
    lcd_rst: LcdRst,
    lcd_rd: LcdRD,
    delay: &mut Delay<SYST>,
) -> Result<HwLcd, IliError> {
    let mut lcd_rd = lcd_rd;
    let _ = lcd_rd.set_high();
    IliLcd::new(interface, lcd_rst, delay)
}

/// Touch axes follow the panel mounted rotated by one quarter turn.
pub fn init_touch(spi: TouchSpi, cs: TouchCs) -> HwTouch {
    Xpt2046::new(spi, cs, 1)
}

pub fn init_storage(spi: SdSpi, cs: SdCs) -> HwStorage {
    SdStorage::new(spi, cs)
}

pub fn init_serial(serial: SerialPort) -> HwSerial {
    SerialLink::new(serial)
}
