use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::TIM6;
use stm32g0xx_hal::time::U32Ext;
use stm32g0xx_hal::timer::{Timer, TimerExt};

use crate::config::Timing;

/// Fires the painter's poll interrupt every [`Timing::TICK_MS`].
pub struct PollTimer {
    timer: Timer<TIM6>,
}

impl PollTimer {
    pub fn new(pac_tim: TIM6, rcc: &mut Rcc) -> Self {
        PollTimer {
            timer: pac_tim.timer(rcc),
        }
    }

    pub fn start(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
        self.timer.start(Timing::TICK_HZ.hz());
    }

    pub fn unpend(&mut self) {
        self.timer.clear_irq();
    }
}
