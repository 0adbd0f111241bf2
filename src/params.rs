//! Stored parameter record
//!
//! The flat record a node keeps in its settings store. Values arrive from
//! outside (config files, remote config frames) and are not trusted: each
//! field that fails validation falls back to its default with a warning
//! instead of refusing the whole record, the node must always come up.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::{MAX_PORTS, PixelConfiguration, PixelSettings};
use crate::gamma::{GAMMA_MAX, GAMMA_MIN};
use crate::mapping::{DEFAULT_UNIVERSE_STEP, PortMapping, UNIVERSE_SIZE};
use crate::patterns::PatternKind;
use crate::pixel_type::{ChannelOrder, MAX_COUNT_RGB, MAX_COUNT_RGBW, PixelType};

pub const DEFAULT_COUNT: u16 = 170;
pub const DEFAULT_BRIGHTNESS: u8 = 0xFF;

/// Everything a node persists about its pixel output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelParams {
    pub pixel_type: PixelType,
    pub count: u16,
    /// Datasheet colour order override, `None` keeps the chip default.
    pub map: Option<ChannelOrder>,
    /// T0H override in microseconds.
    pub low_code_us: Option<f32>,
    /// T1H override in microseconds.
    pub high_code_us: Option<f32>,
    pub grouping_count: u16,
    /// Clock override for clocked chips.
    pub clock_hz: Option<u32>,
    pub global_brightness: u8,
    pub dmx_start_address: u16,
    pub start_universe: [u16; MAX_PORTS],
    pub active_ports: u8,
    pub test_pattern: PatternKind,
    pub gamma_correction: bool,
    /// Gamma exponent, `None` keeps the built-in curve.
    pub gamma_value: Option<f32>,
}

impl Default for PixelParams {
    fn default() -> Self {
        let mut start_universe = [1u16; MAX_PORTS];
        for (index, universe) in start_universe.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            {
                *universe = 1 + (index as u16) * DEFAULT_UNIVERSE_STEP;
            }
        }
        Self {
            pixel_type: PixelType::Ws2812b,
            count: DEFAULT_COUNT,
            map: None,
            low_code_us: None,
            high_code_us: None,
            grouping_count: 1,
            clock_hz: None,
            global_brightness: DEFAULT_BRIGHTNESS,
            dmx_start_address: 1,
            start_universe,
            active_ports: 1,
            test_pattern: PatternKind::None,
            gamma_correction: false,
            gamma_value: None,
        }
    }
}

impl PixelParams {
    /// Clamp every out-of-range field back to its default. Runs right
    /// after loading, before the record is applied anywhere.
    pub fn sanitize(&mut self) {
        let max_count = MAX_COUNT_RGB.max(MAX_COUNT_RGBW);

        if self.count == 0 || usize::from(self.count) > max_count {
            warn!("pixel count {} out of range, using {}", self.count, DEFAULT_COUNT);
            self.count = DEFAULT_COUNT;
        }
        if !(1..=self.count).contains(&self.grouping_count) {
            warn!("grouping count {} out of range, disabling", self.grouping_count);
            self.grouping_count = 1;
        }
        if self.global_brightness == 0 {
            warn!("global brightness 0 would blank the strip, using full");
            self.global_brightness = DEFAULT_BRIGHTNESS;
        }
        if self.dmx_start_address == 0 || usize::from(self.dmx_start_address) > UNIVERSE_SIZE {
            warn!("dmx start address {} out of range, using 1", self.dmx_start_address);
            self.dmx_start_address = 1;
        }
        for (index, universe) in self.start_universe.iter_mut().enumerate() {
            if *universe == 0 {
                #[allow(clippy::cast_possible_truncation)]
                let fallback = 1 + (index as u16) * DEFAULT_UNIVERSE_STEP;
                warn!("start universe 0 on port {}, using {}", index + 1, fallback);
                *universe = fallback;
            }
        }
        if self.active_ports == 0 || usize::from(self.active_ports) > MAX_PORTS {
            warn!("active ports {} out of range, using 1", self.active_ports);
            self.active_ports = 1;
        }
        if let Some(gamma) = self.gamma_value {
            let tenths = tenths_from_gamma(gamma);
            if !(GAMMA_MIN..=GAMMA_MAX).contains(&tenths) {
                warn!("gamma value outside curve range, using built-in table");
                self.gamma_value = None;
            }
        }
    }

    /// Build the pixel configuration this record describes. Timing
    /// overrides that fail validation are dropped with a warning, the
    /// datasheet timing stays in effect.
    pub fn configuration(&self) -> PixelConfiguration {
        let mut config = PixelConfiguration::new(self.pixel_type, usize::from(self.count));

        if let Some(order) = self.map {
            config.set_map(order);
        }
        if let Some(us) = self.low_code_us {
            if config.set_low_code_us(us).is_err() {
                warn!("low code override rejected, keeping datasheet timing");
            }
        }
        if let Some(us) = self.high_code_us {
            if config.set_high_code_us(us).is_err() {
                warn!("high code override rejected, keeping datasheet timing");
            }
        }
        if let Some(clock) = self.clock_hz {
            config.set_clock_hz(clock);
        }
        config.set_global_brightness(self.global_brightness);
        if self.gamma_correction {
            config.enable_gamma(true);
            if let Some(gamma) = self.gamma_value {
                if config.set_gamma(tenths_from_gamma(gamma)).is_err() {
                    warn!("gamma override rejected, using built-in table");
                }
            }
        }
        config
    }

    /// Build the universe layout this record describes.
    pub fn port_mapping(&self, settings: &PixelSettings) -> PortMapping {
        let mut mapping = PortMapping::new(settings);
        for (index, port) in mapping.ports.iter_mut().enumerate() {
            port.start_universe = self.start_universe[index];
            port.grouping = usize::from(self.grouping_count);
            port.active = index < usize::from(self.active_ports);
        }
        if mapping.set_dmx_start_address(self.dmx_start_address).is_err() {
            warn!(
                "dmx start address {} does not fit the footprint, using 1",
                self.dmx_start_address
            );
        }
        mapping
    }

    pub fn dump(&self) {
        log::debug!(
            "params: type {} count {} map {:?} active {} grouping {}",
            self.pixel_type.as_str(),
            self.count,
            self.map,
            self.active_ports,
            self.grouping_count
        );
        log::debug!(
            "params: start address {} universes {:?} pattern {}",
            self.dmx_start_address,
            self.start_universe,
            self.test_pattern.name()
        );
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tenths_from_gamma(gamma: f32) -> u8 {
    if !(0.0..=25.5).contains(&gamma) {
        return 0;
    }
    (gamma * 10.0) as u8
}
