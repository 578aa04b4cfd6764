mod common;

use common::{Delay, Led, Wire};
use tripwire_core::console::led::{console, serve, Console, Demo};

type Session = Console<Wire, Led, Delay>;

fn line(wire: &mut Wire, demo: &mut Demo<Led, Delay>, rx: &mut Session, input: &str) -> String {
    wire.send(input);
    serve(wire, demo, rx);
    assert!(wire.rx.is_empty(), "unconsumed input after {:?}", input);
    wire.take_output()
}

fn setup() -> (Wire, Demo<Led, Delay>, Session) {
    (
        Wire::default(),
        Demo {
            led: Led::default(),
            delay: Delay::default(),
        },
        console(),
    )
}

#[test]
fn switches_the_led() {
    let (mut wire, mut demo, mut rx) = setup();

    assert_eq!(line(&mut wire, &mut demo, &mut rx, "led on\r"), "Turning LED on.\r\n");
    assert!(demo.led.high);

    assert_eq!(line(&mut wire, &mut demo, &mut rx, "\nled off\r"), "Turning LED off.\r\n");
    assert!(!demo.led.high);
}

#[test]
fn blink_default_duration() {
    let (mut wire, mut demo, mut rx) = setup();

    let out = line(&mut wire, &mut demo, &mut rx, "blink\rdefault\r");
    assert!(out.starts_with("Specify the number of ms or 'default': "), "{}", out);
    assert_eq!(demo.delay.total_ms, 1_333);
    assert_eq!(demo.led.toggles, 2);
    assert!(!demo.led.high);
}

#[test]
fn blink_given_duration() {
    let (mut wire, mut demo, mut rx) = setup();

    line(&mut wire, &mut demo, &mut rx, "blink\r250\r");
    assert_eq!(demo.delay.total_ms, 250);

    line(&mut wire, &mut demo, &mut rx, "blink\r0x10\r");
    assert_eq!(demo.delay.total_ms, 266);
    assert_eq!(demo.led.toggles, 4);
}

#[test]
fn negative_blink_is_ignored() {
    let (mut wire, mut demo, mut rx) = setup();

    line(&mut wire, &mut demo, &mut rx, "blink\r-20\r");
    assert_eq!(demo.delay.total_ms, 0);
    assert_eq!(demo.led.toggles, 0);
}

#[test]
fn unknown_commands() {
    let (mut wire, mut demo, mut rx) = setup();

    assert_eq!(line(&mut wire, &mut demo, &mut rx, "led\r"), "Invalid command!\r\n");
    assert_eq!(line(&mut wire, &mut demo, &mut rx, "led on\r"), "Turning LED on.\r\n");
}

#[test]
fn banner_lists_commands() {
    let (mut wire, _, rx) = setup();
    tripwire_core::console::banner(&mut wire, &rx);

    let out = wire.take_output();
    assert!(out.starts_with("Commands: 3\r\n"), "{}", out);
    assert!(out.contains("   led on\r\n   led off\r\n   blink\r\n"), "{}", out);
}
