#![no_std]
#![no_main]

mod encoder;
mod input;
mod midi;
mod peripherals;

use panic_probe as _;

// RTIC app module runs the app as a set of concurrent tasks modifying shared state
// this module is responsible for interfacing with the hardware
#[rtic::app(
    device = rp_pico::hal::pac,
    peripherals = true,
    dispatchers = [USBCTRL_IRQ, DMA_IRQ_0, DMA_IRQ_1]
)]
mod app {
    use defmt::{self, error, info, trace};
    use defmt_rtt as _;
    use fugit::MicrosDurationU64;
    use midi_types::MidiMessage;
    use nb::block;
    use rp_pico::hal::{
        gpio::Interrupt::EdgeLow,
        timer::{monotonic::Monotonic, Alarm0},
    };

    use crate::{
        encoder::EncoderBank,
        input::{self, InputMode},
        midi,
        peripherals::{setup, ButtonFillPin, ButtonPatternPin, MidiIn, MidiOut, Rng},
    };
    use drumgen_sequencer::{
        sequencer::{ScheduledMidiMessage, Sequencer},
        GeneratorConfig, PatternGenerator,
    };

    // how often to poll encoders for position updates
    const ENCODER_READ_INTERVAL: MicrosDurationU64 = MicrosDurationU64::millis(2);

    /// Define RTIC monotonic timer. Also used for defmt.
    #[monotonic(binds = TIMER_IRQ_0, default = true)]
    type TimerMonotonic = Monotonic<Alarm0>;

    /// RTIC shared resources.
    #[shared]
    struct Shared {
        /// Pattern generator, drum voices and transport state.
        sequencer: Sequencer<'static, Rng>,

        /// Param page the encoders are editing.
        input_mode: InputMode,
    }

    /// RTIC local resources.
    #[local]
    struct Local {
        /// MIDI input port (1 half of the split UART).
        midi_in: MidiIn,

        /// MIDI output port (1 half of the split UART).
        midi_out: MidiOut,

        /// Pin for the [PATTERN] button
        button_pattern_pin: ButtonPatternPin,

        /// Pin for the [FILL] button
        button_fill_pin: ButtonFillPin,

        /// Encoders under the param pages.
        encoders: EncoderBank,
    }

    /// RTIC init method sets up the hardware and initialises shared and local resources.
    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        info!("[init] hello world!");

        // configure RTIC monotonic as source of timestamps for defmt
        defmt::timestamp!("{=u64:us}", {
            monotonics::now().duration_since_epoch().to_micros()
        });

        // create a device wrapper instance and grab some of the peripherals we need
        let (midi_in, midi_out, buttons, encoders, rosc, monotonic_timer) = setup(ctx.device);
        let (button_pattern_pin, button_fill_pin) = buttons;

        // the ring oscillator perturbs drum map levels when CHAOS is turned up
        let generator = PatternGenerator::from_config(GeneratorConfig::default(), rosc);
        let sequencer = Sequencer::new(generator);

        // start scheduled task to read encoders
        read_encoders::spawn().expect("read_encoders::spawn should succeed");

        info!("[init] complete");

        (
            Shared {
                sequencer,
                input_mode: Default::default(),
            },
            Local {
                midi_in,
                midi_out,
                button_pattern_pin,
                button_fill_pin,
                encoders,
            },
            init::Monotonics(monotonic_timer),
        )
    }

    /// Handle MIDI input. Triggered by a byte being received on UART0.
    #[task(
        binds = UART0_IRQ,
        priority = 4,
        shared = [sequencer],
        local = [midi_in]
    )]
    fn uart0_irq(mut ctx: uart0_irq::Context) {
        let start = monotonics::now();
        trace!("[uart0_irq] start");

        if let Ok(message) = block!(ctx.local.midi_in.read()) {
            ctx.shared.sequencer.lock(|sequencer| match message {
                MidiMessage::TimingClock => {
                    trace!("[midi] clock");
                    let now_us = monotonics::now().duration_since_epoch().to_micros();
                    for message in sequencer.advance(now_us) {
                        match message {
                            ScheduledMidiMessage::Immediate(message) => {
                                if midi_send::spawn(message).is_err() {
                                    error!("[uart0_irq] could not spawn midi_send for immediate message")
                                }
                            }
                            ScheduledMidiMessage::Delayed(message, delay) => {
                                if midi_send::spawn_after(delay, message).is_err() {
                                    error!("[uart0_irq] could not spawn midi_send for delayed message")
                                }
                            }
                        }
                    }
                }
                MidiMessage::Start => {
                    info!("[midi] start");
                    sequencer.start_playing();
                }
                MidiMessage::Stop => {
                    info!("[midi] stop");
                    sequencer.stop_playing();
                }
                MidiMessage::Continue => {
                    info!("[midi] continue");
                    sequencer.continue_playing();
                }
                _ => trace!("[midi] UNKNOWN"),
            });

            // pass received message to midi out ("soft thru")
            if midi_send::spawn(message).is_err() {
                error!("[uart0_irq] could not spawn midi_send to pass through message");
            }
        }

        trace!(
            "[uart0_irq] elapsed_time={}",
            (monotonics::now() - start).to_micros()
        );
    }

    /// Send a MIDI message. Implemented as a task to allow cooperative multitasking with
    /// higher-pri tasks.
    #[task(
        priority = 3,
        capacity = 64,
        local = [midi_out]
    )]
    fn midi_send(ctx: midi_send::Context, message: MidiMessage) {
        midi::log_message(&message);
        if ctx.local.midi_out.write(&message).is_err() {
            error!("[midi_send] could not write message");
        }
    }

    /// Handle interrupts caused by button presses and update the `input_mode` shared resource.
    #[task(
        binds = IO_IRQ_BANK0,
        priority = 4,
        shared = [input_mode],
        local = [button_pattern_pin, button_fill_pin]
    )]
    fn io_irq_bank0(mut ctx: io_irq_bank0::Context) {
        trace!("[io_irq_bank0] start");

        if ctx.local.button_pattern_pin.interrupt_status(EdgeLow) {
            info!("[PATTERN] pressed");
            ctx.shared
                .input_mode
                .lock(|input_mode| *input_mode = InputMode::Pattern);
            ctx.local.button_pattern_pin.clear_interrupt(EdgeLow);
        }
        if ctx.local.button_fill_pin.interrupt_status(EdgeLow) {
            info!("[FILL] pressed");
            ctx.shared
                .input_mode
                .lock(|input_mode| *input_mode = InputMode::Fill);
            ctx.local.button_fill_pin.clear_interrupt(EdgeLow);
        }
    }

    /// Check encoders for position changes and apply them to the current param page.
    #[task(
        priority = 4,
        shared = [input_mode, sequencer],
        local = [encoders],
    )]
    fn read_encoders(ctx: read_encoders::Context) {
        let start = monotonics::now();
        trace!("[read_encoders] start");

        if ctx.local.encoders.poll() {
            let detents = ctx.local.encoders.take_detents();
            (ctx.shared.input_mode, ctx.shared.sequencer).lock(|input_mode, sequencer| {
                input::apply_encoder_detents(detents, *input_mode, sequencer);
            });
        }

        if read_encoders::spawn_after(ENCODER_READ_INTERVAL).is_err() {
            error!("[read_encoders] could not reschedule");
        }

        trace!(
            "[read_encoders] elapsed_time={}",
            (monotonics::now() - start).to_micros()
        );
    }

    // idle task needed because default RTIC idle task calls wfi(), which breaks rtt
    #[idle]
    fn task_main(_: task_main::Context) -> ! {
        loop {
            cortex_m::asm::nop();
        }
    }
}
