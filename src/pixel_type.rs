//! Pixel chip catalog
//!
//! Chip types, channel orders and the descriptor the configuration layer
//! resolves its defaults from. One-wire timings are expressed in carrier
//! ticks: the carrier runs at 6.4 MHz, one tick is 156.25 ns and a 1.25 µs
//! bit cell is eight ticks.

use serde::{Deserialize, Serialize};

/// Carrier frequency synthesizing one-wire waveforms.
pub const ONE_WIRE_CARRIER_HZ: u32 = 6_400_000;
/// Carrier ticks per one-wire bit cell.
pub const TICKS_PER_BIT: usize = 8;
/// Duration of one carrier tick in microseconds.
pub const TICK_US: f32 = 0.156_25;

/// Highest addressable pixel count for three-channel chips
/// (four universes of 170 pixels each).
pub const MAX_COUNT_RGB: usize = 4 * 170;
/// Highest addressable pixel count for four-channel chips
/// (four universes of 128 pixels each).
pub const MAX_COUNT_RGBW: usize = 4 * 128;

const TYPE_NAME_WS2801: &str = "ws2801";
const TYPE_NAME_WS2811: &str = "ws2811";
const TYPE_NAME_WS2812: &str = "ws2812";
const TYPE_NAME_WS2812B: &str = "ws2812b";
const TYPE_NAME_WS2813: &str = "ws2813";
const TYPE_NAME_WS2815: &str = "ws2815";
const TYPE_NAME_SK6812: &str = "sk6812";
const TYPE_NAME_SK6812W: &str = "sk6812w";
const TYPE_NAME_UCS1903: &str = "ucs1903";
const TYPE_NAME_UCS2903: &str = "ucs2903";
const TYPE_NAME_APA102: &str = "apa102";
const TYPE_NAME_SK9822: &str = "sk9822";
const TYPE_NAME_P9813: &str = "p9813";

const ORDER_NAME_RGB: &str = "rgb";
const ORDER_NAME_RBG: &str = "rbg";
const ORDER_NAME_GRB: &str = "grb";
const ORDER_NAME_GBR: &str = "gbr";
const ORDER_NAME_BRG: &str = "brg";
const ORDER_NAME_BGR: &str = "bgr";

/// Leading-high ticks for a logical 0 on every supported one-wire chip.
pub const DEFAULT_LOW_CODE: u8 = 2;
const HIGH_CODE_DEFAULT: u8 = 4;
const HIGH_CODE_WS2812B: u8 = 5;
const HIGH_CODE_UCS: u8 = 6;

const WS2801_DEFAULT_HZ: u32 = 4_000_000;
const WS2801_MAX_HZ: u32 = 25_000_000;
const P9813_DEFAULT_HZ: u32 = 4_000_000;
const P9813_MAX_HZ: u32 = 15_000_000;

/// How a chip family receives its data stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolClass {
    /// Single data line, bits coded as pulse widths (WS281x and friends).
    OneWire,
    /// Data plus clock line, bytes latched per clock edge.
    SpiClocked,
}

/// Supported pixel chip families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelType {
    Ws2801,
    Ws2811,
    Ws2812,
    Ws2812b,
    Ws2813,
    Ws2815,
    Sk6812,
    Sk6812w,
    Ucs1903,
    Ucs2903,
    Apa102,
    Sk9822,
    P9813,
}

/// Transmit order of the three color channels.
///
/// The variant name lists the channels in the order they leave the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
}

/// Per-chip properties resolved by [`crate::config::PixelConfiguration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipDescriptor {
    pub class: ProtocolClass,
    /// Color channels per pixel, 3 or 4.
    pub channel_count: u8,
    pub default_order: ChannelOrder,
    /// Leading-high ticks for a logical 0, one-wire chips only.
    pub low_code: u8,
    /// Leading-high ticks for a logical 1, one-wire chips only.
    pub high_code: u8,
    pub default_clock_hz: u32,
    pub max_clock_hz: u32,
    pub max_count: usize,
}

impl PixelType {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            TYPE_NAME_WS2801 => Some(Self::Ws2801),
            TYPE_NAME_WS2811 => Some(Self::Ws2811),
            TYPE_NAME_WS2812 => Some(Self::Ws2812),
            TYPE_NAME_WS2812B => Some(Self::Ws2812b),
            TYPE_NAME_WS2813 => Some(Self::Ws2813),
            TYPE_NAME_WS2815 => Some(Self::Ws2815),
            TYPE_NAME_SK6812 => Some(Self::Sk6812),
            TYPE_NAME_SK6812W => Some(Self::Sk6812w),
            TYPE_NAME_UCS1903 => Some(Self::Ucs1903),
            TYPE_NAME_UCS2903 => Some(Self::Ucs2903),
            TYPE_NAME_APA102 => Some(Self::Apa102),
            TYPE_NAME_SK9822 => Some(Self::Sk9822),
            TYPE_NAME_P9813 => Some(Self::P9813),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ws2801 => TYPE_NAME_WS2801,
            Self::Ws2811 => TYPE_NAME_WS2811,
            Self::Ws2812 => TYPE_NAME_WS2812,
            Self::Ws2812b => TYPE_NAME_WS2812B,
            Self::Ws2813 => TYPE_NAME_WS2813,
            Self::Ws2815 => TYPE_NAME_WS2815,
            Self::Sk6812 => TYPE_NAME_SK6812,
            Self::Sk6812w => TYPE_NAME_SK6812W,
            Self::Ucs1903 => TYPE_NAME_UCS1903,
            Self::Ucs2903 => TYPE_NAME_UCS2903,
            Self::Apa102 => TYPE_NAME_APA102,
            Self::Sk9822 => TYPE_NAME_SK9822,
            Self::P9813 => TYPE_NAME_P9813,
        }
    }

    /// Catalog entry for this chip family.
    pub const fn descriptor(self) -> ChipDescriptor {
        match self {
            Self::Ws2801 => ChipDescriptor {
                class: ProtocolClass::SpiClocked,
                channel_count: 3,
                default_order: ChannelOrder::Rgb,
                low_code: 0,
                high_code: 0,
                default_clock_hz: WS2801_DEFAULT_HZ,
                max_clock_hz: WS2801_MAX_HZ,
                max_count: MAX_COUNT_RGB,
            },
            // Framed clocked chips shift blue first after the per-pixel
            // prefix byte.
            Self::Apa102 | Self::Sk9822 | Self::P9813 => ChipDescriptor {
                class: ProtocolClass::SpiClocked,
                channel_count: 3,
                default_order: ChannelOrder::Bgr,
                low_code: 0,
                high_code: 0,
                default_clock_hz: P9813_DEFAULT_HZ,
                max_clock_hz: P9813_MAX_HZ,
                max_count: MAX_COUNT_RGB,
            },
            Self::Sk6812w => ChipDescriptor {
                class: ProtocolClass::OneWire,
                channel_count: 4,
                default_order: ChannelOrder::Grb,
                low_code: DEFAULT_LOW_CODE,
                high_code: HIGH_CODE_DEFAULT,
                default_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_count: MAX_COUNT_RGBW,
            },
            Self::Ws2811 => ChipDescriptor {
                class: ProtocolClass::OneWire,
                channel_count: 3,
                default_order: ChannelOrder::Rgb,
                low_code: DEFAULT_LOW_CODE,
                high_code: HIGH_CODE_DEFAULT,
                default_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_count: MAX_COUNT_RGB,
            },
            Self::Ucs2903 => ChipDescriptor {
                class: ProtocolClass::OneWire,
                channel_count: 3,
                default_order: ChannelOrder::Rgb,
                low_code: DEFAULT_LOW_CODE,
                high_code: HIGH_CODE_UCS,
                default_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_count: MAX_COUNT_RGB,
            },
            Self::Ucs1903 => ChipDescriptor {
                class: ProtocolClass::OneWire,
                channel_count: 3,
                default_order: ChannelOrder::Brg,
                low_code: DEFAULT_LOW_CODE,
                high_code: HIGH_CODE_UCS,
                default_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_count: MAX_COUNT_RGB,
            },
            Self::Ws2812 | Self::Ws2813 | Self::Ws2815 | Self::Sk6812 => ChipDescriptor {
                class: ProtocolClass::OneWire,
                channel_count: 3,
                default_order: ChannelOrder::Grb,
                low_code: DEFAULT_LOW_CODE,
                high_code: HIGH_CODE_DEFAULT,
                default_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_count: MAX_COUNT_RGB,
            },
            Self::Ws2812b => ChipDescriptor {
                class: ProtocolClass::OneWire,
                channel_count: 3,
                default_order: ChannelOrder::Grb,
                low_code: DEFAULT_LOW_CODE,
                high_code: HIGH_CODE_WS2812B,
                default_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_clock_hz: ONE_WIRE_CARRIER_HZ,
                max_count: MAX_COUNT_RGB,
            },
        }
    }

    pub const fn is_one_wire(self) -> bool {
        matches!(self.descriptor().class, ProtocolClass::OneWire)
    }

    /// Whether the chip carries a dedicated white channel.
    pub const fn is_rgbw(self) -> bool {
        matches!(self, Self::Sk6812w)
    }
}

impl ChannelOrder {
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ORDER_NAME_RGB => Some(Self::Rgb),
            ORDER_NAME_RBG => Some(Self::Rbg),
            ORDER_NAME_GRB => Some(Self::Grb),
            ORDER_NAME_GBR => Some(Self::Gbr),
            ORDER_NAME_BRG => Some(Self::Brg),
            ORDER_NAME_BGR => Some(Self::Bgr),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => ORDER_NAME_RGB,
            Self::Rbg => ORDER_NAME_RBG,
            Self::Grb => ORDER_NAME_GRB,
            Self::Gbr => ORDER_NAME_GBR,
            Self::Brg => ORDER_NAME_BRG,
            Self::Bgr => ORDER_NAME_BGR,
        }
    }

    /// Reorder red/green/blue into transmit slots.
    pub const fn reorder(self, red: u8, green: u8, blue: u8) -> [u8; 3] {
        match self {
            Self::Rgb => [red, green, blue],
            Self::Rbg => [red, blue, green],
            Self::Grb => [green, red, blue],
            Self::Gbr => [green, blue, red],
            Self::Brg => [blue, red, green],
            Self::Bgr => [blue, green, red],
        }
    }
}

/// Convert a high-time in microseconds to carrier ticks.
///
/// Returns `None` when the rounded width leaves the eight-tick bit cell.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn ticks_from_us(us: f32) -> Option<u8> {
    let ticks = libm::roundf(us / TICK_US);
    if ticks < 1.0 || ticks > TICKS_PER_BIT as f32 {
        return None;
    }
    Some(ticks as u8)
}

/// High-time in microseconds reached by a tick count.
pub fn us_from_ticks(ticks: u8) -> f32 {
    f32::from(ticks) * TICK_US
}
