//! Single-port strip output
//!
//! Drives one strip over a plain serial transport, no bit-interleaving.
//! One-wire chips are rendered as pattern bytes, one byte per wire bit on
//! the 6.4 MHz carrier, with a leading idle byte so the line settles low
//! before the first cell. Clocked chips are rendered as their literal
//! wire bytes. Writes are synchronous.

use crate::PixelTransport;
use crate::Rgb;
use crate::TransportError;
use crate::config::{ConfigError, PixelSettings};
use crate::encoder::{APA_PREFIX, p9813_flag};
use crate::pixel_type::{PixelType, ProtocolClass};

const FRAME_BYTES: usize = 4;

/// Render one tick code as a byte with that many leading one bits.
///
/// Codes outside the eight-tick cell clamp to all-low or all-high.
const fn code_byte(ticks: u8) -> u8 {
    match ticks {
        0 => 0x00,
        1..=7 => 0xFFu8 << (8 - ticks as u32),
        _ => 0xFF,
    }
}

/// Byte length of the serial frame for one strip.
pub const fn frame_len(settings: &PixelSettings) -> usize {
    match settings.class {
        ProtocolClass::OneWire => 1 + settings.count * settings.channel_count * 8,
        ProtocolClass::SpiClocked => settings.wire_bytes(),
    }
}

/// One strip on one serial line.
#[derive(Debug)]
pub struct PixelStrip<T, const CAP: usize> {
    transport: T,
    settings: PixelSettings,
    buffer: heapless::Vec<u8, CAP>,
    dark: heapless::Vec<u8, CAP>,
}

impl<T: PixelTransport, const CAP: usize> PixelStrip<T, CAP> {
    pub fn new(transport: T, settings: PixelSettings) -> Result<Self, ConfigError> {
        let required = frame_len(&settings);
        let available = transport.capacity().min(CAP);
        if required > available {
            return Err(ConfigError::CapacityExceeded {
                required,
                available,
            });
        }

        let mut strip = Self {
            transport,
            settings,
            buffer: heapless::Vec::new(),
            dark: heapless::Vec::new(),
        };
        let _ = strip.buffer.resize_default(required);
        strip.paint_uniform(0x00, APA_PREFIX);
        strip.dark = strip.buffer.clone();
        Ok(strip)
    }

    pub fn settings(&self) -> &PixelSettings {
        &self.settings
    }

    pub fn frame(&self) -> &[u8] {
        &self.buffer
    }

    pub fn set_pixel(&mut self, index: usize, colour: Rgb) {
        if self.settings.channel_count == 4 {
            self.set_pixel_rgbw(index, colour, 0);
            return;
        }
        debug_assert!(index < self.settings.count);
        if index >= self.settings.count {
            return;
        }

        let r = self.settings.gamma.correct(colour.r);
        let g = self.settings.gamma.correct(colour.g);
        let b = self.settings.gamma.correct(colour.b);

        match self.settings.pixel_type {
            PixelType::Apa102 | PixelType::Sk9822 => {
                let base = FRAME_BYTES + index * 4;
                let [d0, d1, d2] = self.settings.order.reorder(r, g, b);
                self.buffer[base] = APA_PREFIX | (self.settings.global_brightness >> 3);
                self.buffer[base + 1] = d0;
                self.buffer[base + 2] = d1;
                self.buffer[base + 3] = d2;
            }
            PixelType::P9813 => {
                let base = FRAME_BYTES + index * 4;
                let [d0, d1, d2] = self.settings.order.reorder(r, g, b);
                self.buffer[base] = p9813_flag(d0, d1, d2);
                self.buffer[base + 1] = d0;
                self.buffer[base + 2] = d1;
                self.buffer[base + 3] = d2;
            }
            _ => {
                let slots = self.settings.order.reorder(r, g, b);
                for (slot, value) in slots.iter().enumerate() {
                    self.write_wire_byte(index * 3 + slot, *value);
                }
            }
        }
    }

    pub fn set_pixel_rgbw(&mut self, index: usize, colour: Rgb, white: u8) {
        debug_assert!(index < self.settings.count);
        if index >= self.settings.count || self.settings.channel_count != 4 {
            return;
        }

        let g = self.settings.gamma.correct(colour.g);
        let r = self.settings.gamma.correct(colour.r);
        let b = self.settings.gamma.correct(colour.b);
        let w = self.settings.gamma.correct(white);

        let base = index * 4;
        self.write_wire_byte(base, g);
        self.write_wire_byte(base + 1, r);
        self.write_wire_byte(base + 2, b);
        self.write_wire_byte(base + 3, w);
    }

    /// Send the current frame.
    pub fn update(&mut self) -> Result<(), TransportError> {
        self.transport.write_sync(&self.buffer)
    }

    /// Send a dark frame without touching the working pixel data.
    pub fn blackout(&mut self) -> Result<(), TransportError> {
        self.transport.write_sync(&self.dark)
    }

    /// Overwrite the frame with every channel fully lit and send it.
    pub fn full_on(&mut self) -> Result<(), TransportError> {
        self.paint_uniform(0xFF, 0xFF);
        self.update()
    }

    fn write_wire_byte(&mut self, byte_index: usize, value: u8) {
        match self.settings.class {
            ProtocolClass::OneWire => {
                let low = code_byte(self.settings.low_code);
                let high = code_byte(self.settings.high_code);
                let base = 1 + byte_index * 8;
                for bit in 0..8 {
                    self.buffer[base + bit] = if value & (0x80 >> bit) != 0 { high } else { low };
                }
            }
            ProtocolClass::SpiClocked => {
                self.buffer[byte_index] = value;
            }
        }
    }

    /// Paint every channel of every pixel to `channel`, with valid framing
    /// and per-chip prefixes.
    fn paint_uniform(&mut self, channel: u8, apa_prefix: u8) {
        match self.settings.pixel_type {
            PixelType::Apa102 | PixelType::Sk9822 => {
                let len = self.buffer.len();
                self.buffer[..FRAME_BYTES].fill(0x00);
                for index in 0..self.settings.count {
                    let base = FRAME_BYTES + index * 4;
                    self.buffer[base] = apa_prefix;
                    self.buffer[base + 1..base + 4].fill(channel);
                }
                self.buffer[len - FRAME_BYTES..].fill(0xFF);
            }
            PixelType::P9813 => {
                let len = self.buffer.len();
                self.buffer[..FRAME_BYTES].fill(0x00);
                for index in 0..self.settings.count {
                    let base = FRAME_BYTES + index * 4;
                    self.buffer[base] = p9813_flag(channel, channel, channel);
                    self.buffer[base + 1..base + 4].fill(channel);
                }
                self.buffer[len - FRAME_BYTES..].fill(0x00);
            }
            PixelType::Ws2801 => {
                self.buffer.fill(channel);
            }
            _ => {
                let code = if channel == 0 {
                    code_byte(self.settings.low_code)
                } else {
                    code_byte(self.settings.high_code)
                };
                self.buffer[0] = 0x00;
                self.buffer[1..].fill(code);
            }
        }
    }
}
