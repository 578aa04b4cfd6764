use stm32f0xx_hal::{
    prelude::*,
    stm32::TIM7,
    timers::{Event, Timer},
};
use tripwire_core::{config::TICK_PERIOD_US, hal::TickSource};

/// TIM7 update interrupt as the watchdog tick.
pub struct TickTimer {
    timer: Timer<TIM7>,
    armed: bool,
}

impl TickTimer {
    pub fn new(mut timer: Timer<TIM7>) -> Self {
        timer.unlisten(Event::TimeOut);
        TickTimer { timer, armed: false }
    }
}

impl TickSource for TickTimer {
    fn arm(&mut self) {
        // Restarting zeroes the counter; the update it raises is not a tick
        self.timer.start((1_000_000 / TICK_PERIOD_US).hz());
        self.timer.wait().ok();
        self.timer.listen(Event::TimeOut);
        self.armed = true;
    }

    fn disarm(&mut self) {
        self.timer.unlisten(Event::TimeOut);
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn acknowledge(&mut self) {
        self.timer.wait().ok();
    }
}
