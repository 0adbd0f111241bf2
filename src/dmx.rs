//! DMX-to-pixel bridge
//!
//! Feeds received universes into the staged frame and commits once the
//! last expected universe of a refresh has arrived. A universe that lands
//! while the previous transfer is still running is dropped whole, the
//! hardware never sees a half-written frame.

use log::warn;

use crate::PixelTransport;
use crate::Rgb;
use crate::config::ConfigError;
use crate::mapping::{PortMapping, SlotInfo};
use crate::output::MultiportOutput;

/// Routes DMX payloads onto the multi-port output.
pub struct PixelDmx<T, const CAP: usize> {
    output: MultiportOutput<T, CAP>,
    mapping: PortMapping,
    started: u32,
    blackout: bool,
    skipped_frames: u32,
}

impl<T: PixelTransport, const CAP: usize> PixelDmx<T, CAP> {
    pub fn new(output: MultiportOutput<T, CAP>, mapping: PortMapping) -> Self {
        Self {
            output,
            mapping,
            started: 0,
            blackout: false,
            skipped_frames: 0,
        }
    }

    pub fn output(&self) -> &MultiportOutput<T, CAP> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut MultiportOutput<T, CAP> {
        &mut self.output
    }

    pub fn mapping(&self) -> &PortMapping {
        &self.mapping
    }

    pub fn mapping_mut(&mut self) -> &mut PortMapping {
        &mut self.mapping
    }

    /// Universes dropped because the transport was still busy.
    pub fn skipped_frames(&self) -> u32 {
        self.skipped_frames
    }

    pub fn is_started(&self, protocol_port: usize) -> bool {
        protocol_port < u32::BITS as usize && self.started & (1 << protocol_port) != 0
    }

    pub fn start(&mut self, protocol_port: usize) {
        if protocol_port >= u32::BITS as usize {
            return;
        }
        self.started |= 1 << protocol_port;
    }

    /// Stop one protocol port; the strip goes dark once every port has
    /// stopped.
    pub fn stop(&mut self, protocol_port: usize) {
        if protocol_port >= u32::BITS as usize {
            return;
        }
        let bit = 1u32 << protocol_port;
        if self.started & bit == 0 {
            return;
        }
        self.started &= !bit;
        if self.started == 0 {
            if let Err(err) = self.output.blackout() {
                warn!("blackout after stop dropped: {:?}", err);
            }
        }
    }

    /// Write one universe payload onto its mapped pixel span. Commits the
    /// staged frame when `commit_now` forces a sync point or when
    /// `protocol_port` is the last expected universe, unless blackout is
    /// engaged.
    pub fn set_data(&mut self, protocol_port: usize, data: &[u8], commit_now: bool) {
        if self.output.is_updating() {
            self.skipped_frames = self.skipped_frames.wrapping_add(1);
            return;
        }
        let Some((out, switch)) = self.mapping.resolve(protocol_port) else {
            return;
        };
        if !self.mapping.ports[out].active {
            return;
        }

        let channels = self.output.settings().channel_count;
        let grouping = self.mapping.effective_grouping(out);
        let groups = self.mapping.groups(out);
        let begin = self.mapping.begin_group(switch);

        let mut offset = 0usize;
        if groups < self.mapping.pixels_per_universe() {
            offset = usize::from(self.mapping.dmx_start_address()) - 1;
        }
        let end = groups.min(begin + data.len().saturating_sub(offset) / channels);

        for group in begin..end {
            let red = data[offset];
            let green = data[offset + 1];
            let blue = data[offset + 2];
            for k in 0..grouping {
                let pixel = group * grouping + k;
                if channels == 4 {
                    self.output.set_pixel_rgbw(
                        out,
                        pixel,
                        Rgb::new(red, green, blue),
                        data[offset + 3],
                    );
                } else {
                    self.output.set_pixel(out, pixel, Rgb::new(red, green, blue));
                }
            }
            offset += channels;
        }

        if commit_now || protocol_port == self.mapping.last_protocol_port() {
            if self.blackout {
                return;
            }
            if self.output.update().is_err() {
                self.skipped_frames = self.skipped_frames.wrapping_add(1);
            }
        }
    }

    pub fn is_blackout(&self) -> bool {
        self.blackout
    }

    /// Engage or release blackout. Engaging sends the dark frame at once;
    /// releasing re-sends the staged frame so the last received look comes
    /// back without waiting for the next refresh.
    pub fn set_blackout(&mut self, enable: bool) {
        self.blackout = enable;
        while self.output.is_updating() {}
        let result = if enable {
            self.output.blackout()
        } else {
            self.output.update()
        };
        if let Err(err) = result {
            warn!("blackout toggle dropped: {:?}", err);
        }
    }

    /// Drive every pixel fully lit, a lamp-test override.
    pub fn full_on(&mut self) {
        if let Err(err) = self.output.full_on() {
            warn!("full-on dropped: {:?}", err);
        }
    }

    pub fn set_dmx_start_address(&mut self, address: u16) -> Result<(), ConfigError> {
        self.mapping.set_dmx_start_address(address)
    }

    pub fn dmx_start_address(&self) -> u16 {
        self.mapping.dmx_start_address()
    }

    /// DMX channels consumed by `port` in its first universe.
    pub fn footprint(&self, port: usize) -> usize {
        self.mapping.footprint(port)
    }

    pub fn slot_info(&self, port: usize, offset: usize) -> Option<SlotInfo> {
        self.mapping.slot_info(port, offset)
    }
}
