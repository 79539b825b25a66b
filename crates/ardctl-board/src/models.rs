//! Board model definitions and the model registry.
//!
//! Each supported board is described by a [`PinCapability`] that captures
//! how many digital and analog pins it exposes, which pins can drive PWM,
//! and how raw ADC readings map to volts. The protocol engine checks every
//! request against this descriptor before touching the serial port.
//!
//! Models are defined as factory functions (e.g. [`uno()`]) and collected
//! into a [`ModelRegistry`], which connection setup consults by name:
//!
//! | Model      | Digital | Analog | PWM pins                    |
//! |------------|---------|--------|-----------------------------|
//! | Uno        | 14      | 6      | 3, 5, 6, 9, 10, 11          |
//! | Nano       | 14      | 8      | 3, 5, 6, 9, 10, 11          |
//! | Leonardo   | 20      | 12     | 3, 5, 6, 9, 10, 11, 13      |
//! | Mega2560   | 54      | 16     | 2-13, 44, 45, 46            |
//!
//! Pin bounds are inclusive: a board with 14 digital pins accepts pin
//! numbers `0..=14`, matching what the firmware accepts.

use std::collections::{BTreeSet, HashMap};

use ardctl_core::error::{Error, Result};

/// Name of the Arduino Uno model.
pub const MODEL_UNO: &str = "Uno";
/// Name of the Arduino Nano model.
pub const MODEL_NANO: &str = "Nano";
/// Name of the Arduino Leonardo model.
pub const MODEL_LEONARDO: &str = "Leonardo";
/// Name of the Arduino Mega 2560 model.
pub const MODEL_MEGA2560: &str = "Mega2560";

/// Analog reference voltage of the 5 V AVR boards.
pub const DEFAULT_ANALOG_REFERENCE: f32 = 5.0;
/// Largest reading of a 10-bit ADC.
pub const DEFAULT_ADC_MAX: u16 = 1023;

/// Static pin description for one board model.
#[derive(Debug, Clone, PartialEq)]
pub struct PinCapability {
    /// Model name used as the registry key (e.g. "Uno").
    pub name: String,
    /// Number of digital I/O pins.
    pub digital_pins: u8,
    /// Number of analog input pins.
    pub analog_pins: u8,
    /// Pins that can drive PWM output.
    pub pwm_pins: BTreeSet<u8>,
    /// Voltage corresponding to a full-scale ADC reading.
    pub analog_reference: f32,
    /// Full-scale ADC reading.
    pub adc_max: u16,
}

impl PinCapability {
    fn invalid_pin(&self, pin: u8, kind: &str) -> Error {
        Error::InvalidArgument(format!(
            "invalid {kind} pin {pin} for model '{}'",
            self.name
        ))
    }

    /// Check a pin for digital writes and pin mode changes.
    pub fn check_digital(&self, pin: u8) -> Result<()> {
        if pin > self.digital_pins {
            return Err(self.invalid_pin(pin, "digital"));
        }
        Ok(())
    }

    /// Check a pin for digital reads.
    ///
    /// Analog inputs can also be read digitally; they are addressed as
    /// `digital_pins + n` for analog pin `n`.
    pub fn check_digital_read(&self, pin: u8) -> Result<()> {
        if u16::from(pin) > u16::from(self.digital_pins) + u16::from(self.analog_pins) {
            return Err(self.invalid_pin(pin, "digital"));
        }
        Ok(())
    }

    /// Check a pin for analog reads.
    pub fn check_analog(&self, pin: u8) -> Result<()> {
        if pin > self.analog_pins {
            return Err(self.invalid_pin(pin, "analog"));
        }
        Ok(())
    }

    /// Check a pin for PWM writes.
    pub fn check_pwm(&self, pin: u8) -> Result<()> {
        if !self.pwm_pins.contains(&pin) {
            return Err(self.invalid_pin(pin, "pwm"));
        }
        Ok(())
    }

    /// Convert a raw ADC reading to volts.
    pub fn scale_analog(&self, raw: i32) -> f32 {
        raw as f32 * self.analog_reference / f32::from(self.adc_max)
    }
}

fn avr_board(name: &str, digital_pins: u8, analog_pins: u8, pwm: &[u8]) -> PinCapability {
    PinCapability {
        name: name.to_string(),
        digital_pins,
        analog_pins,
        pwm_pins: pwm.iter().copied().collect(),
        analog_reference: DEFAULT_ANALOG_REFERENCE,
        adc_max: DEFAULT_ADC_MAX,
    }
}

/// Arduino Uno (ATmega328P).
pub fn uno() -> PinCapability {
    avr_board(MODEL_UNO, 14, 6, &[3, 5, 6, 9, 10, 11])
}

/// Arduino Nano (ATmega328P, two extra analog inputs over the Uno).
pub fn nano() -> PinCapability {
    avr_board(MODEL_NANO, 14, 8, &[3, 5, 6, 9, 10, 11])
}

/// Arduino Leonardo (ATmega32U4).
pub fn leonardo() -> PinCapability {
    avr_board(MODEL_LEONARDO, 20, 12, &[3, 5, 6, 9, 10, 11, 13])
}

/// Arduino Mega 2560 (ATmega2560).
pub fn mega2560() -> PinCapability {
    let pwm: Vec<u8> = (2..=13).chain(44..=46).collect();
    avr_board(MODEL_MEGA2560, 54, 16, &pwm)
}

/// Returns all built-in model definitions.
pub fn all_models() -> Vec<PinCapability> {
    vec![uno(), nano(), leonardo(), mega2560()]
}

/// Lookup table from model name to [`PinCapability`].
///
/// Built once and passed by reference to connection setup. Registering a
/// new board is a data-only change: call [`register`](Self::register) with
/// its descriptor.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, PinCapability>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in models.
    pub fn with_builtin_models() -> Self {
        let mut registry = Self::new();
        registry.load();
        registry
    }

    /// Populate the built-in models.
    ///
    /// Does nothing if the registry already holds any model, so calling it
    /// more than once never duplicates or resets entries.
    pub fn load(&mut self) -> &mut Self {
        if self.models.is_empty() {
            for model in all_models() {
                self.register(model);
            }
        }
        self
    }

    /// Add or replace a model.
    pub fn register(&mut self, model: PinCapability) {
        self.models.insert(model.name.clone(), model);
    }

    /// Find a model by name.
    pub fn lookup(&self, name: &str) -> Result<&PinCapability> {
        self.models
            .get(name)
            .ok_or_else(|| Error::UnsupportedModel(name.to_string()))
    }

    /// Names of all registered models, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model has been registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
