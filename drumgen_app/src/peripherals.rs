/// Device initialisation and interfacing.
use super::encoder::{EncoderBank, EncoderPins};
use fugit::{HertzU32, RateExtU32};
use rp2040_hal::rosc::Enabled;
use rp_pico::{
    hal::{
        clocks::{self, Clock},
        gpio::{
            pin::bank0::{Gpio0, Gpio1, Gpio16, Gpio17},
            FunctionUart,
            Interrupt::EdgeLow,
            Pin, PullUpInput,
        },
        pac::{self, RESETS, TIMER, UART0},
        rosc::RingOscillator,
        sio::Sio,
        timer::{monotonic::Monotonic, Alarm0},
        uart::{DataBits, Reader, StopBits, UartConfig, UartPeripheral, Writer},
        Timer, Watchdog,
    },
    Pins, XOSC_CRYSTAL_FREQ,
};

const MIDI_BAUD_RATE: u32 = 31_250;

// type alias for UART pins
type MidiOutUartPin = Pin<Gpio16, FunctionUart>;
type MidiInUartPin = Pin<Gpio17, FunctionUart>;
type MidiUartPins = (MidiOutUartPin, MidiInUartPin);

// drumgen-specific midi in/out channel types
pub type MidiIn = embedded_midi::MidiIn<Reader<UART0, MidiUartPins>>;
pub type MidiOut = embedded_midi::MidiOut<Writer<UART0, MidiUartPins>>;

// type alias for button pins
pub type ButtonPatternPin = Pin<Gpio0, PullUpInput>;
pub type ButtonFillPin = Pin<Gpio1, PullUpInput>;
type ButtonArray = (ButtonPatternPin, ButtonFillPin);

/// The hardware random source, used to perturb drum map levels.
pub type Rng = RingOscillator<Enabled>;

pub fn setup(
    mut pac: pac::Peripherals,
) -> (
    MidiIn,
    MidiOut,
    ButtonArray,
    EncoderBank,
    Rng,
    Monotonic<Alarm0>,
) {
    // setup gpio pins
    let sio = Sio::new(pac.SIO);
    let pins = Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // setup clocks
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let clocks = clocks::init_clocks_and_plls(
        XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .expect("init: init_clocks_and_plls(...) should succeed");

    let (midi_in, midi_out) = new_midi_uart(
        pac.UART0,
        pins.gpio16.into_mode::<FunctionUart>(),
        pins.gpio17.into_mode::<FunctionUart>(),
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
    );

    // setup buttons
    let button_pattern_pin = pins.gpio0.into_pull_up_input();
    let button_fill_pin = pins.gpio1.into_pull_up_input();
    button_pattern_pin.set_interrupt_enabled(EdgeLow, true);
    button_fill_pin.set_interrupt_enabled(EdgeLow, true);
    let buttons = (button_pattern_pin, button_fill_pin);

    let encoder_pins: EncoderPins = [
        (pins.gpio9.into(), pins.gpio10.into()),
        (pins.gpio11.into(), pins.gpio12.into()),
        (pins.gpio13.into(), pins.gpio14.into()),
        (pins.gpio3.into(), pins.gpio4.into()),
        (pins.gpio5.into(), pins.gpio6.into()),
        (pins.gpio7.into(), pins.gpio8.into()),
    ];
    let encoders = EncoderBank::new(encoder_pins);

    let rosc = RingOscillator::new(pac.ROSC).initialize();

    (
        midi_in,
        midi_out,
        buttons,
        encoders,
        rosc,
        new_monotonic_timer(pac.TIMER, &mut pac.RESETS),
    )
}

fn new_monotonic_timer(timer: TIMER, resets: &mut RESETS) -> Monotonic<Alarm0> {
    // setup monotonic timer for rtic
    let mut timer = Timer::new(timer, resets);
    let monotonic_alarm = timer
        .alarm_0()
        .expect("init: alarm 0 should be available");
    Monotonic::new(timer, monotonic_alarm)
}

fn new_midi_uart(
    uart: UART0,
    out_pin: MidiOutUartPin,
    in_pin: MidiInUartPin,
    resets: &mut RESETS,
    peripheral_clock_freq: HertzU32,
) -> (MidiIn, MidiOut) {
    let midi_uart_pins = (out_pin, in_pin);
    let uart_config = UartConfig::new(MIDI_BAUD_RATE.Hz(), DataBits::Eight, None, StopBits::One);
    let mut midi_uart = UartPeripheral::new(uart, midi_uart_pins, resets)
        .enable(uart_config, peripheral_clock_freq)
        .expect("enabling uart for midi should succeed");
    midi_uart.enable_rx_interrupt();
    let (midi_reader, midi_writer) = midi_uart.split();
    (
        embedded_midi::MidiIn::new(midi_reader),
        embedded_midi::MidiOut::new(midi_writer),
    )
}
