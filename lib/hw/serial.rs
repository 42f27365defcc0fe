use stm32g0xx_hal::serial::{FullConfig, Serial};
use stm32g0xx_hal::stm32g0::stm32g070::USART2;

use crate::hw::Peer;

/// USART2 link, which may not run while the SD card is in use.
pub struct SerialLink {
    _serial: Serial<USART2, FullConfig>,
}

impl SerialLink {
    pub fn new(serial: Serial<USART2, FullConfig>) -> Self {
        SerialLink { _serial: serial }
    }

    fn regs() -> &'static stm32g0xx_hal::stm32g0::stm32g070::usart1::RegisterBlock {
        unsafe { &(*USART2::ptr()) }
    }
}

impl Peer for SerialLink {
    const NAME: &'static str = "usart2";

    fn suspend(&mut self) {
        let usart = SerialLink::regs();
        // Let the last frame leave the shift register
        while usart.isr.read().tc().bit_is_clear() {}
        usart.cr1.modify(|_, w| w.ue().clear_bit());
    }

    fn resume(&mut self) {
        SerialLink::regs().cr1.modify(|_, w| w.ue().set_bit());
    }
}
