#![no_main]
#![no_std]

use crate::hal::{delay::Delay, prelude::*, serial::Serial, stm32};
use cortex_m_rt::entry;
use panic_reset as _;
use stm32f0xx_hal as hal;
use tripwire_core::console::led::{self, Demo};

const BAUD_RATE: u32 = 115_200;

#[entry]
fn main() -> ! {
    if let (Some(p), Some(cp)) = (stm32::Peripherals::take(), cortex_m::Peripherals::take()) {
        //////////////////////////////////////////////////////////////////////
        // Set up the hardware!
        //////////////////////////////////////////////////////////////////////
        let (rcc, mut flash, gpioa, gpiob, usart1) = (p.RCC, p.FLASH, p.GPIOA, p.GPIOB, p.USART1);

        let (mut serial, led, delay) = cortex_m::interrupt::free(|cs| {
            let mut rcc = rcc.configure().sysclk(48.mhz()).freeze(&mut flash);

            let gpioa = gpioa.split(&mut rcc);
            let gpiob = gpiob.split(&mut rcc);

            let tx = gpioa.pa9.into_alternate_af1(cs);
            let rx = gpioa.pa10.into_alternate_af1(cs);
            let serial = Serial::usart1(usart1, (tx, rx), BAUD_RATE.bps(), &mut rcc);

            let delay = Delay::new(cp.SYST, &rcc);

            (serial, gpiob.pb13.into_push_pull_output(cs), delay)
        });

        led::run(&mut serial, &mut Demo { led, delay });
    }

    panic!();
}
