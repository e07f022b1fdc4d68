//! The pattern generator: reads the drum map (or the euclidean table) once per step and packs
//! the result into an [`Output`] event word.
//!
//! Drive it by calling [`PatternGenerator::evaluate`] once per incoming clock pulse, followed by
//! [`PatternGenerator::tick_clock`].
use core::fmt::{Display, Formatter, Result as FmtResult};
use rand_core::RngCore;

#[cfg(feature = "host_testing")]
use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    clock::{ClockDivider, ClockResolution},
    config::GeneratorConfig,
    drum_map::{DrumMap, DRUM_MAP},
    euclidean::{self, EuclideanTable, EUCLIDEAN_TABLE},
    output::Output,
    Instrument, PatternError, INSTRUMENT_COUNT, STEP_COUNT,
};

/// Levels above this are played as accents.
pub const ACCENT_THRESHOLD: u8 = 192;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    #[default]
    Grid,
    Euclidean,
}

impl Display for OutputMode {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{}",
            match *self {
                OutputMode::Grid => "GRID",
                OutputMode::Euclidean => "EUCL",
            }
        )
    }
}

/// A continuous control addressed by name, for callers holding untyped values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Control {
    X,
    Y,
    Density(Instrument),
    Randomness,
}

/// Add the per-part perturbation to a level without wrapping.
fn perturb_level(level: u8, perturbation: u8) -> u8 {
    level.saturating_add(perturbation)
}

/// Scale a random byte by the randomness amount.
fn scale_perturbation(random: u8, randomness: u8) -> u8 {
    ((random as u16 * randomness as u16) >> 8) as u8
}

#[derive(Debug)]
pub struct PatternGenerator<'a, R> {
    drum_map: &'a DrumMap,
    euclidean_table: &'a EuclideanTable,
    rng: R,
    x: u8,
    y: u8,
    density: [u8; INSTRUMENT_COUNT],
    randomness: u8,
    clock: ClockDivider,
    euclidean_step: [u8; INSTRUMENT_COUNT],
    output_mode: OutputMode,
    part_perturbation: [u8; INSTRUMENT_COUNT],
}

impl<R: RngCore> PatternGenerator<'static, R> {
    /// Create a generator over the built-in Grids tables.
    pub fn from_config(config: GeneratorConfig, rng: R) -> PatternGenerator<'static, R> {
        PatternGenerator::new(config, &DRUM_MAP, &EUCLIDEAN_TABLE, rng)
    }
}

#[cfg(feature = "host_testing")]
impl PatternGenerator<'static, SmallRng> {
    /// Create a generator over the built-in tables whose perturbation draws are reproducible.
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> PatternGenerator<'static, SmallRng> {
        PatternGenerator::from_config(config, SmallRng::seed_from_u64(seed))
    }
}

impl<'a, R: RngCore> PatternGenerator<'a, R> {
    pub fn new(
        config: GeneratorConfig,
        drum_map: &'a DrumMap,
        euclidean_table: &'a EuclideanTable,
        rng: R,
    ) -> PatternGenerator<'a, R> {
        PatternGenerator {
            drum_map,
            euclidean_table,
            rng,
            x: config.x,
            y: config.y,
            density: config.density,
            randomness: config.randomness,
            clock: ClockDivider::new(config.resolution),
            euclidean_step: [0; INSTRUMENT_COUNT],
            output_mode: config.mode,
            part_perturbation: [0; INSTRUMENT_COUNT],
        }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn set_x(&mut self, x: u8) {
        self.x = x;
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn set_y(&mut self, y: u8) {
        self.y = y;
    }

    pub fn density(&self, instrument: Instrument) -> u8 {
        self.density[instrument.index()]
    }

    pub fn set_density(&mut self, instrument: Instrument, density: u8) {
        self.density[instrument.index()] = density;
    }

    pub fn randomness(&self) -> u8 {
        self.randomness
    }

    pub fn set_randomness(&mut self, randomness: u8) {
        self.randomness = randomness;
    }

    pub fn control(&self, control: Control) -> u8 {
        match control {
            Control::X => self.x,
            Control::Y => self.y,
            Control::Density(instrument) => self.density(instrument),
            Control::Randomness => self.randomness,
        }
    }

    /// Set a control from an untyped value. Values outside `0..=255` are rejected and leave the
    /// generator unchanged.
    pub fn set_control(&mut self, control: Control, value: i32) -> Result<(), PatternError> {
        let value = PatternError::check_range(value, 0, u8::MAX as i32)? as u8;
        match control {
            Control::X => self.set_x(value),
            Control::Y => self.set_y(value),
            Control::Density(instrument) => self.set_density(instrument, value),
            Control::Randomness => self.set_randomness(value),
        }
        Ok(())
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Switch output mode. Step, pulse and euclidean cursors carry on where they were.
    pub fn set_output_mode(&mut self, output_mode: OutputMode) {
        if output_mode != self.output_mode {
            #[cfg(feature = "defmt")]
            defmt::debug!("[PatternGenerator] output_mode={}", output_mode);
        }
        self.output_mode = output_mode;
    }

    pub fn clock_resolution(&self) -> ClockResolution {
        self.clock.resolution()
    }

    /// Change the clock resolution without resynchronizing the pulse counter, see
    /// [`ClockDivider::set_resolution`].
    pub fn set_clock_resolution(&mut self, resolution: ClockResolution) {
        if resolution != self.clock.resolution() {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "[PatternGenerator] clock_resolution={} pulse={}",
                resolution,
                self.clock.pulse()
            );
        }
        self.clock.set_resolution(resolution);
    }

    pub fn step(&self) -> u8 {
        self.clock.step()
    }

    pub fn pulse(&self) -> u8 {
        self.clock.pulse()
    }

    pub fn pulses_per_step(&self) -> u8 {
        self.clock.pulses_per_step()
    }

    pub fn euclidean_step(&self, instrument: Instrument) -> u8 {
        self.euclidean_step[instrument.index()]
    }

    pub fn part_perturbation(&self, instrument: Instrument) -> u8 {
        self.part_perturbation[instrument.index()]
    }

    /// Interpolated drum map level at the current `(x, y)`.
    pub fn read_drum_map(&self, step: u8, instrument: Instrument) -> u8 {
        self.drum_map.read(self.x, self.y, step, instrument)
    }

    /// Evaluate the current pulse. Returns [`Output::NONE`] unless the pulse starts a step.
    pub fn evaluate(&mut self) -> Output {
        if !self.clock.is_step_boundary() {
            return Output::NONE;
        }
        match self.output_mode {
            OutputMode::Grid => self.evaluate_drums(),
            OutputMode::Euclidean => self.evaluate_euclidean(),
        }
    }

    /// Grid mode: compare each instrument's perturbed drum map level against its density
    /// threshold. Perturbation is re-rolled at the start of every cycle.
    pub fn evaluate_drums(&mut self) -> Output {
        let step = self.clock.step();
        if step == 0 {
            for perturbation in self.part_perturbation.iter_mut() {
                let random = (self.rng.next_u32() & 0xff) as u8;
                *perturbation = scale_perturbation(random, self.randomness);
            }
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "[PatternGenerator::evaluate_drums] part_perturbation={}",
                self.part_perturbation
            );
        }

        let mut output = Output::NONE.with_clock();
        for instrument in Instrument::ALL {
            let level = perturb_level(
                self.read_drum_map(step, instrument),
                self.part_perturbation[instrument.index()],
            );
            let threshold = u8::MAX - self.density[instrument.index()];
            if level > threshold {
                output = output.with_trigger(instrument);
                if level > ACCENT_THRESHOLD {
                    output = output.with_accent(instrument);
                }
            }
        }
        if step == 0 {
            output = output.with_reset();
        }
        output
    }

    /// Euclidean mode: each instrument walks its own cursor through the pattern selected by its
    /// density. Only trigger bits are set.
    pub fn evaluate_euclidean(&mut self) -> Output {
        let mut output = Output::NONE;
        for instrument in Instrument::ALL {
            let length = euclidean::length_for_density(self.density[instrument.index()]);
            let pattern = self.euclidean_table.pattern_for_length(length);
            let cursor = &mut self.euclidean_step[instrument.index()];
            if euclidean::is_hit(pattern, *cursor) {
                output = output.with_trigger(instrument);
            }
            *cursor = (*cursor + 1) % STEP_COUNT;
        }
        output
    }

    pub fn tick_clock(&mut self, num_pulses: u32) {
        self.clock.tick(num_pulses);
    }

    /// Return to the start of the cycle: step, pulse and every euclidean cursor go back to zero.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.euclidean_step = [0; INSTRUMENT_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{CLOCK_BIT, RESET_BIT};

    // bits of each grid mode step at x=y=128 with density 128 and no randomness
    const CENTER_TRACE: [u8; 32] = [
        201, 64, 64, 64, 100, 64, 64, 64, 86, 64, 64, 64, 101, 64, 64, 64, 73, 64, 64, 64, 103, 64,
        64, 64, 86, 64, 82, 64, 70, 64, 64, 64,
    ];

    fn generator(config: GeneratorConfig) -> PatternGenerator<'static, SmallRng> {
        PatternGenerator::with_seed(config, 42)
    }

    fn euclidean_config(density: [u8; INSTRUMENT_COUNT]) -> GeneratorConfig {
        GeneratorConfig {
            density,
            mode: OutputMode::Euclidean,
            resolution: ClockResolution::Ppqn4,
            ..Default::default()
        }
    }

    #[test]
    fn pattern_generator_new_should_start_at_cycle_start() {
        let generator = generator(GeneratorConfig::default());
        assert_eq!((0, 0), (generator.step(), generator.pulse()));
        assert_eq!(3, generator.pulses_per_step());
        assert_eq!(OutputMode::Grid, generator.output_mode());
        for instrument in Instrument::ALL {
            assert_eq!(128, generator.density(instrument));
            assert_eq!(0, generator.euclidean_step(instrument));
            assert_eq!(0, generator.part_perturbation(instrument));
        }
    }

    #[test]
    fn perturb_level_should_saturate() {
        assert_eq!(255, perturb_level(250, 10));
        assert_eq!(255, perturb_level(245, 10));
        assert_eq!(254, perturb_level(244, 10));
        assert_eq!(100, perturb_level(100, 0));
    }

    #[test]
    fn scale_perturbation_should_scale_by_randomness() {
        assert_eq!(0, scale_perturbation(255, 0));
        assert_eq!(254, scale_perturbation(255, 255));
        assert_eq!(63, scale_perturbation(127, 128));
    }

    #[test]
    fn evaluate_should_only_fire_on_step_boundaries() {
        let mut generator = generator(GeneratorConfig::default());
        let outputs: Vec<Output> = (0..6)
            .map(|_| {
                let output = generator.evaluate();
                generator.tick_clock(1);
                output
            })
            .collect();
        assert!(outputs[0].is_clock());
        assert_eq!(Output::NONE, outputs[1]);
        assert_eq!(Output::NONE, outputs[2]);
        assert!(outputs[3].is_clock());
        assert_eq!(Output::NONE, outputs[4]);
    }

    #[test]
    fn evaluate_over_a_full_cycle_should_match_reference_trace() {
        let mut generator = generator(GeneratorConfig::default());
        let words: Vec<u8> = (0..96)
            .map(|_| {
                let bits = generator.evaluate().bits();
                generator.tick_clock(1);
                bits
            })
            .collect();

        let clocks = words.iter().filter(|&&bits| bits & CLOCK_BIT != 0).count();
        let resets = words.iter().filter(|&&bits| bits & RESET_BIT != 0).count();
        assert_eq!(32, clocks);
        assert_eq!(1, resets);

        let step_words: Vec<u8> = words.iter().step_by(3).cloned().collect();
        assert_eq!(CENTER_TRACE.to_vec(), step_words);
        assert!(words
            .iter()
            .enumerate()
            .filter(|(pulse, _)| pulse % 3 != 0)
            .all(|(_, &bits)| bits == 0));
        assert_eq!((0, 0), (generator.step(), generator.pulse()));
    }

    #[test]
    fn evaluate_drums_triggers_should_follow_levels_and_density() {
        let mut generator = generator(GeneratorConfig::default());
        for _ in 0..32 {
            let step = generator.step();
            let output = generator.evaluate_drums();
            for instrument in Instrument::ALL {
                let level = DRUM_MAP.read(128, 128, step, instrument);
                assert_eq!(level > 127, output.is_triggered(instrument));
                assert_eq!(level > 192, output.is_accented(instrument));
            }
            generator.tick_clock(3);
        }
    }

    #[test]
    fn evaluate_drums_should_set_reset_bit_only_at_cycle_start() {
        let mut generator = generator(GeneratorConfig {
            resolution: ClockResolution::Ppqn4,
            ..Default::default()
        });
        for _ in 0..64 {
            let step = generator.step();
            let output = generator.evaluate();
            assert_eq!(step == 0, output.is_reset());
            assert!(output.is_clock());
            generator.tick_clock(1);
        }
    }

    #[test]
    fn evaluate_drums_with_zero_density_should_never_trigger() {
        let mut generator = generator(GeneratorConfig {
            density: [0; INSTRUMENT_COUNT],
            randomness: 255,
            resolution: ClockResolution::Ppqn4,
            ..Default::default()
        });
        for _ in 0..64 {
            assert_eq!(0, generator.evaluate().triggers());
            generator.tick_clock(1);
        }
    }

    #[test]
    fn evaluate_drums_with_full_density_should_trigger_on_any_level() {
        let mut generator = generator(GeneratorConfig {
            density: [255; INSTRUMENT_COUNT],
            ..Default::default()
        });
        let output = generator.evaluate();
        for instrument in Instrument::ALL {
            let level = DRUM_MAP.read(128, 128, 0, instrument);
            assert_eq!(level > 0, output.is_triggered(instrument));
        }
    }

    #[test]
    fn evaluate_drums_should_reroll_perturbation_once_per_cycle() {
        let config = GeneratorConfig {
            randomness: 255,
            resolution: ClockResolution::Ppqn4,
            ..Default::default()
        };
        let mut generator = PatternGenerator::with_seed(config, 7);
        let mut reference = SmallRng::seed_from_u64(7);

        let mut expected = [0; INSTRUMENT_COUNT];
        for cycle in 0..3 {
            for perturbation in expected.iter_mut() {
                *perturbation = scale_perturbation((reference.next_u32() & 0xff) as u8, 255);
            }
            for step in 0..STEP_COUNT {
                generator.evaluate();
                for instrument in Instrument::ALL {
                    assert_eq!(
                        expected[instrument.index()],
                        generator.part_perturbation(instrument),
                        "cycle {} step {}",
                        cycle,
                        step
                    );
                }
                generator.tick_clock(1);
            }
        }
    }

    #[test]
    fn evaluate_drums_should_add_perturbation_to_levels() {
        let config = GeneratorConfig {
            randomness: 200,
            ..Default::default()
        };
        let mut generator = PatternGenerator::with_seed(config, 3);
        let output = generator.evaluate_drums();
        for instrument in Instrument::ALL {
            let level = perturb_level(
                DRUM_MAP.read(128, 128, 0, instrument),
                generator.part_perturbation(instrument),
            );
            assert_eq!(level > 127, output.is_triggered(instrument));
            assert_eq!(level > 192, output.is_accented(instrument));
        }
    }

    #[test]
    fn evaluate_drums_without_randomness_should_keep_perturbation_at_zero() {
        let mut generator = PatternGenerator::with_seed(GeneratorConfig::default(), 99);
        for _ in 0..96 {
            generator.evaluate();
            generator.tick_clock(1);
        }
        for instrument in Instrument::ALL {
            assert_eq!(0, generator.part_perturbation(instrument));
        }
    }

    #[test]
    fn evaluate_euclidean_should_replay_the_table_mask() {
        let mut generator = generator(euclidean_config([128, 255, 0]));
        let expected_bd = EUCLIDEAN_TABLE.pattern_for_length(5);
        let expected_sd = EUCLIDEAN_TABLE.pattern_for_length(8);

        let (mut bd, mut sd, mut hh) = (0u32, 0u32, 0u32);
        for step in 0..STEP_COUNT {
            let output = generator.evaluate();
            assert_eq!(output.bits(), output.triggers());
            if output.is_triggered(Instrument::BD) {
                bd |= 1 << step;
            }
            if output.is_triggered(Instrument::SD) {
                sd |= 1 << step;
            }
            if output.is_triggered(Instrument::HH) {
                hh |= 1 << step;
            }
            generator.tick_clock(1);
        }
        assert_eq!(0x8808_0808, expected_bd);
        assert_eq!(expected_bd, bd);
        assert_eq!(expected_sd, sd);
        assert_eq!(0, hh);
    }

    #[test]
    fn evaluate_euclidean_cursors_should_wrap_after_32_steps() {
        let mut generator = generator(euclidean_config([128; INSTRUMENT_COUNT]));
        for _ in 0..STEP_COUNT {
            generator.evaluate();
            generator.tick_clock(1);
        }
        for instrument in Instrument::ALL {
            assert_eq!(0, generator.euclidean_step(instrument));
        }
    }

    #[test]
    fn evaluate_euclidean_cursors_should_advance_once_per_step() {
        let mut generator = generator(GeneratorConfig {
            mode: OutputMode::Euclidean,
            ..Default::default()
        });
        for _ in 0..9 {
            generator.evaluate();
            generator.tick_clock(1);
        }
        assert_eq!(3, generator.euclidean_step(Instrument::BD));
        assert_eq!(3, generator.step());
    }

    #[test]
    fn set_output_mode_should_not_reset_counters() {
        let mut generator = generator(GeneratorConfig {
            resolution: ClockResolution::Ppqn4,
            ..Default::default()
        });
        for _ in 0..5 {
            generator.evaluate();
            generator.tick_clock(1);
        }
        generator.set_output_mode(OutputMode::Euclidean);
        assert_eq!(5, generator.step());
        assert_eq!(0, generator.pulse());
        assert_eq!(0, generator.euclidean_step(Instrument::SD));

        for _ in 0..4 {
            generator.evaluate();
            generator.tick_clock(1);
        }
        generator.set_output_mode(OutputMode::Grid);
        generator.evaluate();
        generator.tick_clock(1);
        generator.set_output_mode(OutputMode::Euclidean);

        // cursors resume at 4 although the shared step counter has moved on to 10
        assert_eq!(10, generator.step());
        assert_eq!(4, generator.euclidean_step(Instrument::SD));
        let pattern = EUCLIDEAN_TABLE.pattern_for_length(5);
        let output = generator.evaluate();
        assert_eq!(euclidean::is_hit(pattern, 4), output.is_triggered(Instrument::SD));
        assert_eq!(5, generator.euclidean_step(Instrument::SD));
    }

    #[test]
    fn set_clock_resolution_mid_step_should_not_resynchronize() {
        let mut generator = generator(GeneratorConfig::default());
        generator.evaluate();
        generator.tick_clock(2);
        generator.set_clock_resolution(ClockResolution::Ppqn8);
        assert_eq!((0, 2), (generator.step(), generator.pulse()));
        assert_eq!(Output::NONE, generator.evaluate());

        generator.tick_clock(1);
        assert_eq!((1, 1), (generator.step(), generator.pulse()));
    }

    #[test]
    fn reset_should_rewind_step_and_euclidean_cursors() {
        let mut generator = generator(euclidean_config([64; INSTRUMENT_COUNT]));
        for _ in 0..11 {
            generator.evaluate();
            generator.tick_clock(1);
        }
        generator.reset();
        assert_eq!(0, generator.step());
        for instrument in Instrument::ALL {
            assert_eq!(0, generator.euclidean_step(instrument));
        }
    }

    #[test]
    fn set_control_should_reject_out_of_range_values() {
        let mut generator = generator(GeneratorConfig::default());
        assert_eq!(
            Err(PatternError::OutOfRange { value: 256, min: 0, max: 255 }),
            generator.set_control(Control::X, 256)
        );
        assert!(generator.set_control(Control::Randomness, -1).is_err());
        assert_eq!(128, generator.x());
        assert_eq!(0, generator.randomness());

        generator
            .set_control(Control::Density(Instrument::HH), 17)
            .unwrap();
        assert_eq!(17, generator.density(Instrument::HH));
        assert_eq!(17, generator.control(Control::Density(Instrument::HH)));
        generator.set_control(Control::Y, 255).unwrap();
        assert_eq!(255, generator.y());
    }

    #[test]
    fn tick_clock_should_roll_over_for_large_pulse_counts() {
        let mut generator = generator(GeneratorConfig::default());
        generator.tick_clock(1);
        generator.tick_clock(u32::MAX);
        assert_eq!((21, 1), (generator.step(), generator.pulse()));
    }

    #[test]
    fn read_drum_map_should_follow_coordinates() {
        let mut generator = generator(GeneratorConfig::default());
        generator.set_x(100);
        generator.set_y(200);
        assert_eq!(123, generator.read_drum_map(6, Instrument::SD));
        generator.set_x(37);
        generator.set_y(90);
        assert_eq!(197, generator.read_drum_map(16, Instrument::HH));
    }

    #[test]
    fn pattern_generator_should_accept_custom_tables() {
        let drum_map = DrumMap::new([[[255; crate::drum_map::NODE_SIZE]; 5]; 5]);
        let euclidean_table = EuclideanTable::new([u32::MAX; 256]);
        let mut generator = PatternGenerator::new(
            GeneratorConfig {
                density: [1; INSTRUMENT_COUNT],
                ..Default::default()
            },
            &drum_map,
            &euclidean_table,
            SmallRng::seed_from_u64(1),
        );
        // a flat map of 255 reads back as 253 after two blends
        assert_eq!(253, generator.read_drum_map(0, Instrument::BD));
        assert_eq!(0, generator.evaluate_drums().triggers());
        generator.set_density(Instrument::BD, 3);
        assert!(generator.evaluate_drums().is_triggered(Instrument::BD));
        assert_eq!(0b111, generator.evaluate_euclidean().bits());
    }
}
