#![no_main]
#![no_std]

use lib as _;

#[rtic::app(device = stm32g0xx_hal::stm32, peripherals = true)]
mod app {
    use display_interface_parallel_gpio::{Generic8BitBus, PGPIO8BitInterface};
    use lib::hw::{
        init_clock, init_lcd, init_serial, init_storage, init_touch, HwLcd, HwSerial, HwStorage,
        HwTouch, PollTimer,
    };
    use lib::painter::Painter;
    use stm32g0xx_hal::delay::DelayExt;
    use stm32g0xx_hal::gpio::{GpioExt, Speed};
    use stm32g0xx_hal::serial::{FullConfig, SerialExt};
    use stm32g0xx_hal::spi::{SpiExt, MODE_0};
    use stm32g0xx_hal::time::U32Ext;

    type HwPainter = Painter<HwLcd, HwTouch, HwStorage, HwSerial>;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        painter: HwPainter,
        poll_timer: PollTimer,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local, init::Monotonics) {
        let core = cx.core;
        let device = cx.device;

        // Clock
        let mut rcc = init_clock(device.RCC);
        let mut delay = core.SYST.delay(&mut rcc);

        // GPIO
        let gpioa = device.GPIOA.split(&mut rcc);
        let gpiob = device.GPIOB.split(&mut rcc);

        // LCD
        let bus = Generic8BitBus::new((
            gpiob.pb0.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb1.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb2.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb3.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb4.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb5.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb6.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb7.into_push_pull_output().set_speed(Speed::VeryHigh),
        ))
        .unwrap();
        let interface = PGPIO8BitInterface::new(
            bus,
            gpiob.pb8.into_push_pull_output().set_speed(Speed::VeryHigh),
            gpiob.pb9.into_push_pull_output().set_speed(Speed::VeryHigh),
        );
        let lcd = init_lcd(
            interface,
            gpioa.pa4.into_push_pull_output(),
            gpioa.pa5.into_push_pull_output(),
            &mut delay,
        )
        .unwrap();

        // Touch
        let touch_spi = device
            .SPI1
            .spi((gpioa.pa1, gpioa.pa6, gpioa.pa7), MODE_0, 2.mhz(), &mut rcc);
        let touch = init_touch(touch_spi, gpioa.pa8.into_push_pull_output());

        // SD card
        let sd_spi = device
            .SPI2
            .spi((gpiob.pb13, gpiob.pb14, gpiob.pb15), MODE_0, 400.khz(), &mut rcc);
        let storage = init_storage(sd_spi, gpiob.pb12.into_push_pull_output());

        // Serial
        let usart = device
            .USART2
            .usart(
                gpioa.pa2,
                gpioa.pa3,
                FullConfig::default().baudrate(9600.bps()),
                &mut rcc,
            )
            .unwrap();
        let serial = init_serial(usart);

        let painter = match Painter::new(lcd, touch, storage, serial) {
            Ok(painter) => painter,
            Err(_) => lib::halt(),
        };

        let mut poll_timer = PollTimer::new(device.TIM6, &mut rcc);
        poll_timer.start();

        (Shared {}, Local { painter, poll_timer }, init::Monotonics())
    }

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            cortex_m::asm::nop();
        }
    }

    #[task(binds = TIM6, local = [painter, poll_timer])]
    fn tim6(cx: tim6::Context) {
        let poll_timer: &mut PollTimer = cx.local.poll_timer;
        let painter: &mut HwPainter = cx.local.painter;

        poll_timer.unpend();
        painter.tick().unwrap();
    }
}
