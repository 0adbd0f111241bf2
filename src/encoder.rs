//! Protocol encoder
//!
//! Turns colors into the exact wire stream each chip expects, writing
//! through the shared interleaved frame. One-wire chips get pulse-width
//! coded bit cells, clocked chips literal framed bytes. All routines
//! address wire bytes; the frame expands them per protocol class.

use crate::{
    Rgb,
    config::{MAX_PORTS, PixelSettings},
    frame::InterleavedFrame,
    pixel_type::{PixelType, ProtocolClass, TICKS_PER_BIT},
};

/// Brightness marker bits opening every APA102/SK9822 pixel frame.
pub const APA_PREFIX: u8 = 0xE0;

const START_FRAME_BYTES: usize = 4;
const END_FRAME_BYTES: usize = 4;

/// Write one pixel's color on `port`.
///
/// `index` past the configured count is a caller error: debug builds
/// assert, release builds ignore the write.
pub fn set_pixel<const CAP: usize>(
    settings: &PixelSettings,
    frame: &mut InterleavedFrame<CAP>,
    port: usize,
    index: usize,
    color: Rgb,
) {
    if settings.channel_count == 4 {
        set_pixel_rgbw(settings, frame, port, index, color, 0);
        return;
    }
    debug_assert!(index < settings.count);
    if index >= settings.count {
        return;
    }

    let r = settings.gamma.correct(color.r);
    let g = settings.gamma.correct(color.g);
    let b = settings.gamma.correct(color.b);

    match settings.pixel_type {
        PixelType::Apa102 | PixelType::Sk9822 => {
            let base = START_FRAME_BYTES + index * 4;
            let prefix = APA_PREFIX | (settings.global_brightness >> 3);
            let [d0, d1, d2] = settings.order.reorder(r, g, b);
            write_wire_byte(settings, frame, base, port, prefix);
            write_wire_byte(settings, frame, base + 1, port, d0);
            write_wire_byte(settings, frame, base + 2, port, d1);
            write_wire_byte(settings, frame, base + 3, port, d2);
        }
        PixelType::P9813 => {
            let base = START_FRAME_BYTES + index * 4;
            let [d0, d1, d2] = settings.order.reorder(r, g, b);
            write_wire_byte(settings, frame, base, port, p9813_flag(d0, d1, d2));
            write_wire_byte(settings, frame, base + 1, port, d0);
            write_wire_byte(settings, frame, base + 2, port, d1);
            write_wire_byte(settings, frame, base + 3, port, d2);
        }
        _ => {
            let slots = settings.order.reorder(r, g, b);
            let base = index * settings.channel_count;
            for (slot, value) in slots.iter().enumerate() {
                write_wire_byte(settings, frame, base + slot, port, *value);
            }
        }
    }
}

/// Write one pixel's color plus white channel, SK6812W transmit layout.
pub fn set_pixel_rgbw<const CAP: usize>(
    settings: &PixelSettings,
    frame: &mut InterleavedFrame<CAP>,
    port: usize,
    index: usize,
    color: Rgb,
    white: u8,
) {
    debug_assert!(settings.channel_count == 4);
    debug_assert!(index < settings.count);
    if settings.channel_count != 4 || index >= settings.count {
        return;
    }

    // The white variants shift GRB followed by the white byte.
    let slots = [
        settings.gamma.correct(color.g),
        settings.gamma.correct(color.r),
        settings.gamma.correct(color.b),
        settings.gamma.correct(white),
    ];
    let base = index * 4;
    for (slot, value) in slots.iter().enumerate() {
        write_wire_byte(settings, frame, base + slot, port, *value);
    }
}

/// Populate an all-off frame across every port, wired or not.
///
/// APA102/SK9822 pixels carry the bare marker prefix with a zero
/// brightness field.
pub fn prepare_blackout<const CAP: usize>(
    settings: &PixelSettings,
    frame: &mut InterleavedFrame<CAP>,
) {
    prepare_uniform(settings, frame, 0x00, APA_PREFIX);
}

/// Populate an all-on frame across every port.
pub fn prepare_full_on<const CAP: usize>(
    settings: &PixelSettings,
    frame: &mut InterleavedFrame<CAP>,
) {
    prepare_uniform(settings, frame, 0xFF, 0xFF);
}

/// Write start and end frames for the framed clocked chips on every port.
///
/// Chips without framing leave the frame untouched.
pub fn prepare_framing<const CAP: usize>(
    settings: &PixelSettings,
    frame: &mut InterleavedFrame<CAP>,
) {
    let end_byte = match settings.pixel_type {
        PixelType::Apa102 | PixelType::Sk9822 => 0xFF,
        PixelType::P9813 => 0x00,
        _ => return,
    };
    let end_base = START_FRAME_BYTES + settings.count * 4;
    for port in 0..MAX_PORTS {
        for i in 0..START_FRAME_BYTES {
            write_wire_byte(settings, frame, i, port, 0x00);
        }
        for i in 0..END_FRAME_BYTES {
            write_wire_byte(settings, frame, end_base + i, port, end_byte);
        }
    }
}

fn prepare_uniform<const CAP: usize>(
    settings: &PixelSettings,
    frame: &mut InterleavedFrame<CAP>,
    channel: u8,
    apa_prefix: u8,
) {
    prepare_framing(settings, frame);
    for port in 0..MAX_PORTS {
        for index in 0..settings.count {
            match settings.pixel_type {
                PixelType::Apa102 | PixelType::Sk9822 => {
                    let base = START_FRAME_BYTES + index * 4;
                    write_wire_byte(settings, frame, base, port, apa_prefix);
                    write_wire_byte(settings, frame, base + 1, port, channel);
                    write_wire_byte(settings, frame, base + 2, port, channel);
                    write_wire_byte(settings, frame, base + 3, port, channel);
                }
                PixelType::P9813 => {
                    let base = START_FRAME_BYTES + index * 4;
                    let flag = p9813_flag(channel, channel, channel);
                    write_wire_byte(settings, frame, base, port, flag);
                    write_wire_byte(settings, frame, base + 1, port, channel);
                    write_wire_byte(settings, frame, base + 2, port, channel);
                    write_wire_byte(settings, frame, base + 3, port, channel);
                }
                _ => {
                    let base = index * settings.channel_count;
                    for slot in 0..settings.channel_count {
                        write_wire_byte(settings, frame, base + slot, port, channel);
                    }
                }
            }
        }
    }
}

/// Write one wire byte for `port` at `byte_index`.
///
/// One-wire setups expand the byte MSB-first into eight bit cells of
/// [`TICKS_PER_BIT`] elements, the leading low/high-code elements driven
/// high. Clocked setups map each bit to a single element.
fn write_wire_byte<const CAP: usize>(
    settings: &PixelSettings,
    frame: &mut InterleavedFrame<CAP>,
    byte_index: usize,
    port: usize,
    value: u8,
) {
    match settings.class {
        ProtocolClass::OneWire => {
            let base = byte_index * 8 * TICKS_PER_BIT;
            for bit in 0..8 {
                let code = if value & (0x80 >> bit) != 0 {
                    settings.high_code
                } else {
                    settings.low_code
                };
                let cell = base + bit * TICKS_PER_BIT;
                for tick in 0..TICKS_PER_BIT {
                    frame.set_port_bit(cell + tick, port, tick < usize::from(code));
                }
            }
        }
        ProtocolClass::SpiClocked => frame.write_port_byte(byte_index * 8, port, value),
    }
}

/// Checksum byte guarding a P9813 pixel frame.
///
/// Each following data byte's inverted top bits land in the flag, in
/// wire order.
pub(crate) const fn p9813_flag(d0: u8, d1: u8, d2: u8) -> u8 {
    0xC0 | ((!d0 & 0xC0) >> 2) | ((!d1 & 0xC0) >> 4) | ((!d2 & 0xC0) >> 6)
}
