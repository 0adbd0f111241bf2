//! Shared bit-interleaved frame buffer
//!
//! One byte stream drives up to eight ports: element `k` carries, in bit
//! position `p`, the line level (or data bit) of port `p` at stream position
//! `k`. All writes are read-modify-write, so ports never disturb each other.

use heapless::Vec;

use crate::config::MAX_PORTS;

/// Owned interleaved stream with a compile-time capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterleavedFrame<const CAP: usize> {
    stream: Vec<u8, CAP>,
}

impl<const CAP: usize> InterleavedFrame<CAP> {
    /// Zero-filled frame of `len` elements, `None` when `len` exceeds `CAP`.
    pub fn with_len(len: usize) -> Option<Self> {
        let mut stream = Vec::new();
        stream.resize_default(len).ok()?;
        Some(Self { stream })
    }

    pub fn len(&self) -> usize {
        self.stream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// The raw stream handed to the transport.
    pub fn as_slice(&self) -> &[u8] {
        &self.stream
    }

    /// Drive port `port`'s level at stream position `index`.
    ///
    /// Out-of-range positions are a caller error: debug builds assert,
    /// release builds ignore the write.
    #[inline]
    pub fn set_port_bit(&mut self, index: usize, port: usize, high: bool) {
        debug_assert!(port < MAX_PORTS);
        debug_assert!(index < self.stream.len());
        if port >= MAX_PORTS {
            return;
        }
        let Some(element) = self.stream.get_mut(index) else {
            return;
        };
        let mask = 1u8 << port;
        if high {
            *element |= mask;
        } else {
            *element &= !mask;
        }
    }

    /// Write one data byte for `port`, MSB first, one element per bit.
    pub fn write_port_byte(&mut self, offset: usize, port: usize, byte: u8) {
        for bit in 0..8 {
            self.set_port_bit(offset + bit, port, byte & (0x80 >> bit) != 0);
        }
    }

    /// Overwrite this frame's stream with `other`'s.
    ///
    /// Both frames must have been created with the same length: debug
    /// builds assert, release builds ignore a mismatched copy.
    pub fn copy_from(&mut self, other: &Self) {
        debug_assert_eq!(self.stream.len(), other.stream.len());
        if self.stream.len() == other.stream.len() {
            self.stream.copy_from_slice(&other.stream);
        }
    }

    /// Read back port `port`'s stream, eight elements folded per byte.
    ///
    /// The inverse of the interleave: for one-wire setups every yielded byte
    /// is one bit cell's waveform, for clocked setups one wire data byte.
    pub fn plane(&self, port: usize) -> impl Iterator<Item = u8> + '_ {
        let mask = if port < MAX_PORTS { 1u8 << port } else { 0 };
        self.stream.chunks(8).map(move |chunk| {
            let mut byte = 0u8;
            for (bit, element) in chunk.iter().enumerate() {
                if element & mask != 0 {
                    byte |= 0x80 >> bit;
                }
            }
            byte
        })
    }
}
