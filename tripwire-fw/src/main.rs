#![no_main]
#![no_std]

use panic_persist::{self as _, get_panic_message_bytes};

use rtfm::app;
use stm32f0xx_hal::{
    delay::Delay,
    gpio::{
        gpioa::{PA10, PA9},
        gpiob::{PB12, PB13, PB6, PB7},
        Alternate, OpenDrain, Output, PushPull, AF1,
    },
    i2c::I2c,
    prelude::*,
    serial::Serial,
    stm32::{I2C1, USART1},
    timers::Timer,
};
use tripwire_core::{
    config::{DEFAULT_TIMEOUT_SECS, TICK_PERIOD_US},
    console,
    eeprom::{self, Eeprom},
    hal::{Lock, Port},
    nvstore, Watchdog,
};

mod tick;

use tick::TickTimer;

const BAUD_RATE: u32 = 115_200;

/// 24C02 on I2C1
const EEPROM_SIZE: u16 = 256;

type HalI2C1 = I2c<I2C1, PB6<Alternate<AF1>>, PB7<Alternate<AF1>>>;
type Uart = Serial<USART1, PA9<Alternate<AF1>>, PA10<Alternate<AF1>>>;

/// Heartbeat / tripped LED
type Indicator = PB13<Output<PushPull>>;

/// Pulled low to reset the monitored device, floating otherwise
type ResetLine = PB12<Output<OpenDrain>>;

type Wdt = Watchdog<Indicator, ResetLine, TickTimer, Eeprom<HalI2C1>, Delay>;

/// The idle side of a resource shared with the tick task.
struct Shared<M>(M);

impl<M: rtfm::Mutex> Lock for Shared<M> {
    type T = M::T;

    fn lock<R>(&mut self, f: impl FnOnce(&mut M::T) -> R) -> R {
        self.0.lock(f)
    }
}

#[app(device = stm32f0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        watchdog: Wdt,
        serial: Uart,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        //////////////////////////////////////////////////////////////////////
        // Set up the hardware!
        //////////////////////////////////////////////////////////////////////
        let (rcc, crs, mut flash, gpioa, gpiob, i2c1, usart1, syst, tim7) = (
            cx.device.RCC,
            cx.device.CRS,
            cx.device.FLASH,
            cx.device.GPIOA,
            cx.device.GPIOB,
            cx.device.I2C1,
            cx.device.USART1,
            cx.core.SYST,
            cx.device.TIM7,
        );

        let (indicator, reset_line, i2c, serial, delay, timer) =
            cortex_m::interrupt::free(|cs| {
                let mut rcc = rcc
                    .configure()
                    .hsi48()
                    .enable_crs(crs)
                    .sysclk(48.mhz())
                    .pclk(24.mhz())
                    .freeze(&mut flash);

                let gpioa = gpioa.split(&mut rcc);
                let gpiob = gpiob.split(&mut rcc);

                let mut indicator = gpiob.pb13.into_push_pull_output(cs);
                indicator.set_low().ok();

                // Released until the watchdog trips
                let mut reset_line = gpiob.pb12.into_open_drain_output(cs);
                reset_line.set_high().ok();

                let scl = gpiob.pb6.into_alternate_af1(cs);
                let sda = gpiob.pb7.into_alternate_af1(cs);
                let i2c = I2c::i2c1(i2c1, (scl, sda), 100.khz(), &mut rcc);

                let tx = gpioa.pa9.into_alternate_af1(cs);
                let rx = gpioa.pa10.into_alternate_af1(cs);
                let serial = Serial::usart1(usart1, (tx, rx), BAUD_RATE.bps(), &mut rcc);

                let delay = Delay::new(syst, &rcc);

                let timer = Timer::tim7(tim7, (1_000_000 / TICK_PERIOD_US).hz(), &mut rcc);

                (indicator, reset_line, i2c, serial, delay, timer)
            });

        let mut store = Eeprom::new(i2c, eeprom::DEFAULT_ADDRESS, EEPROM_SIZE);

        // A missing EEPROM shows up as "Storage error!" on status
        nvstore::prepare(&mut store).ok();

        let watchdog = Watchdog::new(
            indicator,
            reset_line,
            TickTimer::new(timer),
            store,
            delay,
            DEFAULT_TIMEOUT_SECS,
        );

        init::LateResources { watchdog, serial }
    }

    /// On expiry this holds the reset line for the whole pulse. The console
    /// in `idle` stalls meanwhile and bytes sent to it in that second are
    /// lost to overrun.
    #[task(binds = TIM7, resources = [watchdog])]
    fn watchdog_tick(cx: watchdog_tick::Context) {
        cx.resources.watchdog.tick();
    }

    #[idle(resources = [watchdog, serial])]
    fn idle(cx: idle::Context) -> ! {
        let idle::Resources { watchdog, serial } = cx.resources;

        if let Some(msg) = get_panic_message_bytes() {
            serial.write_str("Last panic: ");
            serial.write_bytes(msg);
            serial.write_line("");
        }

        console::watchdog::run(serial, &mut Shared(watchdog))
    }
};
