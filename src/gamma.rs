//! Gamma correction
//!
//! A 256-entry lookup table derived from a correction exponent. The exponent
//! travels as integer tenths (22 means 2.2) so persisted configuration never
//! carries floats.

use libm::{powf, roundf};

/// Lowest accepted exponent, in tenths (1.0).
pub const GAMMA_MIN: u8 = 10;
/// Highest accepted exponent, in tenths (4.0).
pub const GAMMA_MAX: u8 = 40;
/// Exponent applied when correction is enabled without an explicit value.
pub const GAMMA_DEFAULT: u8 = 22;

/// Lookup table mapping raw channel values to corrected ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GammaTable([u8; 256]);

impl GammaTable {
    /// Identity mapping, used when correction is disabled.
    pub const fn identity() -> Self {
        let mut table = [0u8; 256];
        let mut i = 0;
        while i < 256 {
            #[allow(clippy::cast_possible_truncation)]
            {
                table[i] = i as u8;
            }
            i += 1;
        }
        Self(table)
    }

    /// Build the table for an exponent given in tenths, e.g. 22 for 2.2.
    ///
    /// Out-of-range exponents clamp to the nearest bound.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_tenths(tenths: u8) -> Self {
        let gamma = f32::from(tenths.clamp(GAMMA_MIN, GAMMA_MAX)) / 10.0;
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = roundf(powf(i as f32 / 255.0, gamma) * 255.0) as u8;
        }
        Self(table)
    }

    #[inline]
    pub const fn correct(&self, value: u8) -> u8 {
        self.0[value as usize]
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::identity()
    }
}
