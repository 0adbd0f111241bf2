//! Pixel output configuration
//!
//! A mutable builder the firmware fills from persisted parameters, resolved
//! once by [`PixelConfiguration::validate`] into the immutable
//! [`PixelSettings`] snapshot the encoder reads. Validation pulls defaults
//! from the chip catalog and clamps hardware limits.

use log::info;

use crate::{
    gamma::{GAMMA_DEFAULT, GAMMA_MAX, GAMMA_MIN, GammaTable},
    pixel_type::{ChannelOrder, PixelType, ProtocolClass, TICKS_PER_BIT, ticks_from_us},
};

/// Output ports sharing one interleaved stream, fixed by the byte width.
pub const MAX_PORTS: usize = 8;

/// Start plus end frame bytes wrapping APA102/SK9822/P9813 pixel data.
pub const CLOCKED_FRAMING_BYTES: usize = 8;

/// Rejected configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Channel order arity does not match the chip's channel count.
    InvalidMapping,
    /// One-wire codes must satisfy `0 < low < high <= TICKS_PER_BIT`.
    InvalidTiming,
    /// Value outside the accepted range.
    OutOfRange,
    /// Encoded frame would not fit the transport's buffer.
    CapacityExceeded {
        required: usize,
        available: usize,
    },
}

/// Builder for a validated pixel output setup.
#[derive(Debug, Clone)]
pub struct PixelConfiguration {
    pixel_type: PixelType,
    count: usize,
    order: Option<ChannelOrder>,
    low_code: Option<u8>,
    high_code: Option<u8>,
    clock_hz: Option<u32>,
    global_brightness: u8,
    gamma_enabled: bool,
    gamma_tenths: Option<u8>,
}

impl PixelConfiguration {
    pub const fn new(pixel_type: PixelType, count: usize) -> Self {
        Self {
            pixel_type,
            count,
            order: None,
            low_code: None,
            high_code: None,
            clock_hz: None,
            global_brightness: 0xFF,
            gamma_enabled: false,
            gamma_tenths: None,
        }
    }

    pub fn set_type(&mut self, pixel_type: PixelType) {
        self.pixel_type = pixel_type;
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// Override the catalog's transmit order for three-channel chips.
    pub fn set_map(&mut self, order: ChannelOrder) {
        self.order = Some(order);
    }

    /// Override the logical-0 high time, given in carrier ticks.
    pub fn set_low_code(&mut self, ticks: u8) {
        self.low_code = Some(ticks);
    }

    /// Override the logical-1 high time, given in carrier ticks.
    pub fn set_high_code(&mut self, ticks: u8) {
        self.high_code = Some(ticks);
    }

    /// Override the logical-0 high time, given in microseconds.
    pub fn set_low_code_us(&mut self, us: f32) -> Result<(), ConfigError> {
        self.low_code = Some(ticks_from_us(us).ok_or(ConfigError::InvalidTiming)?);
        Ok(())
    }

    /// Override the logical-1 high time, given in microseconds.
    pub fn set_high_code_us(&mut self, us: f32) -> Result<(), ConfigError> {
        self.high_code = Some(ticks_from_us(us).ok_or(ConfigError::InvalidTiming)?);
        Ok(())
    }

    /// Clock speed for SPI-clocked chips. One-wire chips ignore it.
    pub fn set_clock_hz(&mut self, hz: u32) {
        self.clock_hz = Some(hz);
    }

    /// Brightness prefix for APA102/SK9822 pixels. Other chips ignore it.
    pub fn set_global_brightness(&mut self, brightness: u8) {
        self.global_brightness = brightness;
    }

    pub fn enable_gamma(&mut self, enabled: bool) {
        self.gamma_enabled = enabled;
    }

    /// Correction exponent in tenths, e.g. 22 for 2.2.
    pub fn set_gamma(&mut self, tenths: u8) -> Result<(), ConfigError> {
        if !(GAMMA_MIN..=GAMMA_MAX).contains(&tenths) {
            return Err(ConfigError::OutOfRange);
        }
        self.gamma_tenths = Some(tenths);
        Ok(())
    }

    /// Resolve defaults, clamp limits and produce the encoder snapshot.
    pub fn validate(&self) -> Result<PixelSettings, ConfigError> {
        let descriptor = self.pixel_type.descriptor();

        if self.count == 0 {
            return Err(ConfigError::OutOfRange);
        }
        let count = self.count.min(descriptor.max_count);

        // Four-channel chips have a fixed transmit layout; an explicit
        // three-channel order cannot cover the white slot.
        if self.order.is_some() && descriptor.channel_count == 4 {
            return Err(ConfigError::InvalidMapping);
        }
        let order = self.order.unwrap_or(descriptor.default_order);

        let (low_code, high_code) = match descriptor.class {
            ProtocolClass::OneWire => {
                let low = self.low_code.unwrap_or(descriptor.low_code);
                let high = self.high_code.unwrap_or(descriptor.high_code);
                if low == 0 || low >= high || usize::from(high) > TICKS_PER_BIT {
                    return Err(ConfigError::InvalidTiming);
                }
                (low, high)
            }
            // Clocked chips carry no pulse coding.
            ProtocolClass::SpiClocked => (0, 0),
        };

        let clock_hz = match descriptor.class {
            ProtocolClass::OneWire => descriptor.default_clock_hz,
            ProtocolClass::SpiClocked => self
                .clock_hz
                .filter(|hz| *hz != 0)
                .unwrap_or(descriptor.default_clock_hz)
                .min(descriptor.max_clock_hz),
        };

        let gamma_tenths = self
            .gamma_enabled
            .then(|| self.gamma_tenths.unwrap_or(GAMMA_DEFAULT));
        let gamma = match gamma_tenths {
            Some(tenths) => GammaTable::from_tenths(tenths),
            None => GammaTable::identity(),
        };

        Ok(PixelSettings {
            pixel_type: self.pixel_type,
            class: descriptor.class,
            count,
            channel_count: usize::from(descriptor.channel_count),
            order,
            low_code,
            high_code,
            clock_hz,
            global_brightness: self.global_brightness,
            gamma_tenths,
            gamma,
        })
    }
}

/// Immutable snapshot the encoder and bridge read.
///
/// Obtain it through [`PixelConfiguration::validate`]. The fields are
/// public for reading; hand-built values skip the range checks the rest
/// of the crate relies on.
#[derive(Debug, Clone)]
pub struct PixelSettings {
    pub pixel_type: PixelType,
    pub class: ProtocolClass,
    pub count: usize,
    pub channel_count: usize,
    pub order: ChannelOrder,
    pub low_code: u8,
    pub high_code: u8,
    pub clock_hz: u32,
    pub global_brightness: u8,
    /// Exponent in tenths when correction is enabled.
    pub gamma_tenths: Option<u8>,
    pub gamma: GammaTable,
}

impl PixelSettings {
    pub const fn is_one_wire(&self) -> bool {
        matches!(self.class, ProtocolClass::OneWire)
    }

    /// Bytes each pixel occupies on the wire, framing excluded.
    pub const fn bytes_per_pixel(&self) -> usize {
        match self.class {
            ProtocolClass::OneWire => self.channel_count,
            // Clocked 4-byte-frame chips carry a prefix byte per pixel.
            ProtocolClass::SpiClocked => match self.pixel_type {
                PixelType::Ws2801 => self.channel_count,
                _ => self.channel_count + 1,
            },
        }
    }

    /// Wire bytes for one full refresh of a single port.
    pub const fn wire_bytes(&self) -> usize {
        let data = self.count * self.bytes_per_pixel();
        match self.pixel_type {
            PixelType::Apa102 | PixelType::Sk9822 | PixelType::P9813 => {
                data + CLOCKED_FRAMING_BYTES
            }
            _ => data,
        }
    }

    /// Elements in the shared interleaved stream.
    ///
    /// One-wire chips expand every wire bit into [`TICKS_PER_BIT`] carrier
    /// elements; clocked chips map each wire bit to a single element.
    pub const fn stream_len(&self) -> usize {
        match self.class {
            ProtocolClass::OneWire => self.wire_bytes() * 8 * TICKS_PER_BIT,
            ProtocolClass::SpiClocked => self.wire_bytes() * 8,
        }
    }

    /// Logical pixels a single DMX universe can address.
    pub const fn pixels_per_universe(&self) -> usize {
        if self.channel_count == 4 { 128 } else { 170 }
    }

    /// Log the resolved setup the way nodes report it at boot.
    pub fn dump(&self) {
        info!(
            "pixel: type {} [{} channels, map {}], count {}",
            self.pixel_type.as_str(),
            self.channel_count,
            self.order.as_str(),
            self.count
        );
        match self.class {
            ProtocolClass::OneWire => {
                info!(
                    "pixel: codes T0H {} ticks, T1H {} ticks",
                    self.low_code, self.high_code
                );
            }
            ProtocolClass::SpiClocked => {
                info!("pixel: clock {} Hz", self.clock_hz);
            }
        }
        if let Some(tenths) = self.gamma_tenths {
            info!(
                "pixel: gamma {}.{} enabled",
                tenths / 10,
                tenths % 10
            );
        }
    }
}
