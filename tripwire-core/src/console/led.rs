//! Commands of the LED demo device.

use embedded_hal::{
    blocking::delay::DelayMs,
    digital::v2::{OutputPin, ToggleableOutputPin},
};
use heapless::consts::*;

use crate::config::{BlinkLineCap, LineCap};
use crate::hal::Port;
use crate::parse::parse_int;
use crate::recognizer::{Command, Outcome, Recognizer};

pub struct Demo<LED, DLY> {
    pub led: LED,
    pub delay: DLY,
}

pub type Handler<P, LED, DLY> = fn(&mut P, &mut Demo<LED, DLY>);

pub type Console<P, LED, DLY> = Recognizer<Handler<P, LED, DLY>, LineCap, U3>;

pub fn commands<P, LED, DLY>() -> [Command<Handler<P, LED, DLY>>; 3]
where
    P: Port,
    LED: OutputPin + ToggleableOutputPin,
    DLY: DelayMs<u32>,
{
    [
        Command { name: "led on", handler: led_on::<P, LED, DLY> },
        Command { name: "led off", handler: led_off::<P, LED, DLY> },
        Command { name: "blink", handler: blink::<P, LED, DLY> },
    ]
}

pub fn console<P, LED, DLY>() -> Console<P, LED, DLY>
where
    P: Port,
    LED: OutputPin + ToggleableOutputPin,
    DLY: DelayMs<u32>,
{
    let mut rx = Console::new();
    super::install(&mut rx, &commands::<P, LED, DLY>());
    rx
}

/// Read and handle one line.
pub fn serve<P, LED, DLY>(port: &mut P, demo: &mut Demo<LED, DLY>, rx: &mut Console<P, LED, DLY>)
where
    P: Port,
    LED: OutputPin + ToggleableOutputPin,
    DLY: DelayMs<u32>,
{
    match rx.read_line(port) {
        Outcome::Matched { handler, .. } => handler(port, demo),
        _ => port.write_line(super::INVALID),
    }
    rx.reset();
}

pub fn run<P, LED, DLY>(port: &mut P, demo: &mut Demo<LED, DLY>) -> !
where
    P: Port,
    LED: OutputPin + ToggleableOutputPin,
    DLY: DelayMs<u32>,
{
    let mut rx = console::<P, LED, DLY>();
    super::banner(port, &rx);

    demo.led.set_low().ok();

    loop {
        serve(port, demo, &mut rx);
    }
}

fn led_on<P, LED, DLY>(port: &mut P, demo: &mut Demo<LED, DLY>)
where
    P: Port,
    LED: OutputPin,
{
    port.write_line("Turning LED on.");
    demo.led.set_high().ok();
}

fn led_off<P, LED, DLY>(port: &mut P, demo: &mut Demo<LED, DLY>)
where
    P: Port,
    LED: OutputPin,
{
    port.write_line("Turning LED off.");
    demo.led.set_low().ok();
}

fn blink<P, LED, DLY>(port: &mut P, demo: &mut Demo<LED, DLY>)
where
    P: Port,
    LED: ToggleableOutputPin,
    DLY: DelayMs<u32>,
{
    port.write_str("Specify the number of ms or 'default': ");

    let mut rx: Recognizer<(), BlinkLineCap, U1> = Recognizer::new();
    rx.register("default", ()).ok();
    let outcome = rx.read_line(port);
    port.write_line("");

    let ms = match outcome {
        Outcome::Matched { .. } => crate::config::BLINK_DEFAULT_MS,
        _ => match parse_int(rx.buffer()) {
            ms if ms < 0 => return,
            ms => ms as u32,
        },
    };

    demo.led.toggle().ok();
    demo.delay.delay_ms(ms);
    demo.led.toggle().ok();
}
