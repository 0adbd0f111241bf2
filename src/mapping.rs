//! DMX port mapping
//!
//! Distributes incoming universes across output ports. A port's pixel
//! groups span `ceil(groups / universe capacity)` consecutive universes;
//! the flat protocol port index walks (output port, universe) pairs in
//! order, so index `out * span + switch` addresses universe `switch` of
//! output `out`.

use crate::config::{ConfigError, MAX_PORTS, PixelSettings};

/// Channels in one DMX universe.
pub const UNIVERSE_SIZE: usize = 512;

/// Default universe stride between ports; a port spans at most four
/// universes at full pixel count.
pub const DEFAULT_UNIVERSE_STEP: u16 = 4;

/// Where one output port takes its pixels from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMap {
    /// First universe feeding this port.
    pub start_universe: u16,
    /// Physical pixels driven by this port.
    pub count: usize,
    /// Physical pixels repeating each DMX-controlled group.
    pub grouping: usize,
    pub active: bool,
}

/// DMX slot description, primary-color categories as RDM names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotInfo {
    pub kind: u8,
    pub category: u16,
}

const SLOT_TYPE_PRIMARY: u8 = 0x00;
const SLOT_CATEGORY_RED: u16 = 0x0205;
const SLOT_CATEGORY_GREEN: u16 = 0x0206;
const SLOT_CATEGORY_BLUE: u16 = 0x0207;
const SLOT_CATEGORY_WHITE: u16 = 0x0212;

/// Resolved universe-to-port layout, built once at startup.
#[derive(Debug, Clone)]
pub struct PortMapping {
    pub ports: [PortMap; MAX_PORTS],
    channel_count: usize,
    pixels_per_universe: usize,
    dmx_start_address: u16,
}

impl PortMapping {
    /// Seed every port from the validated settings: full pixel count, no
    /// grouping, universes strided by [`DEFAULT_UNIVERSE_STEP`], only the
    /// first port active.
    pub fn new(settings: &PixelSettings) -> Self {
        let mut ports = [PortMap {
            start_universe: 1,
            count: settings.count,
            grouping: 1,
            active: false,
        }; MAX_PORTS];
        for (index, port) in ports.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            {
                port.start_universe = 1 + (index as u16) * DEFAULT_UNIVERSE_STEP;
            }
            port.active = index == 0;
        }
        Self {
            ports,
            channel_count: settings.channel_count,
            pixels_per_universe: settings.pixels_per_universe(),
            dmx_start_address: 1,
        }
    }

    /// Mark the first `n` ports active, the rest inactive.
    pub fn set_active_ports(&mut self, n: usize) {
        for (index, port) in self.ports.iter_mut().enumerate() {
            port.active = index < n;
        }
    }

    pub fn dmx_start_address(&self) -> u16 {
        self.dmx_start_address
    }

    /// Move the DMX start address, which applies to ports whose whole
    /// strip fits a single universe.
    pub fn set_dmx_start_address(&mut self, address: u16) -> Result<(), ConfigError> {
        if address == 0 || usize::from(address) > UNIVERSE_SIZE {
            return Err(ConfigError::OutOfRange);
        }
        for index in 0..MAX_PORTS {
            if self.ports[index].active
                && self.universes(index) == 1
                && usize::from(address - 1) + self.footprint(index) > UNIVERSE_SIZE
            {
                return Err(ConfigError::OutOfRange);
            }
        }
        self.dmx_start_address = address;
        Ok(())
    }

    /// Grouping factor actually applied; a value outside `1..=count`
    /// falls back to 1.
    pub fn effective_grouping(&self, port: usize) -> usize {
        let map = &self.ports[port];
        if (1..=map.count).contains(&map.grouping) {
            map.grouping
        } else {
            1
        }
    }

    /// DMX-controlled groups on `port`.
    pub fn groups(&self, port: usize) -> usize {
        self.ports[port].count / self.effective_grouping(port)
    }

    pub fn pixels_per_universe(&self) -> usize {
        self.pixels_per_universe
    }

    /// Universes needed to address all of `port`'s groups.
    pub fn universes(&self, port: usize) -> usize {
        self.groups(port).div_ceil(self.pixels_per_universe)
    }

    /// Uniform universe span per output, the widest any active port needs.
    pub fn universes_per_port(&self) -> usize {
        (0..MAX_PORTS)
            .filter(|index| self.ports[*index].active)
            .map(|index| self.universes(index))
            .max()
            .unwrap_or(1)
            .max(1)
    }

    pub fn active_count(&self) -> usize {
        self.ports.iter().filter(|port| port.active).count()
    }

    /// Flat index of the final universe expected per refresh; receiving it
    /// is the bridge's commit point.
    pub fn last_protocol_port(&self) -> usize {
        let active = self.active_count().max(1);
        active * self.universes_per_port() - 1
    }

    /// Split a flat protocol port index into (output port, universe switch).
    pub fn resolve(&self, protocol_port: usize) -> Option<(usize, usize)> {
        let span = self.universes_per_port();
        let out = protocol_port / span;
        (out < MAX_PORTS).then_some((out, protocol_port % span))
    }

    /// First group addressed by universe `switch` within a port.
    pub fn begin_group(&self, switch: usize) -> usize {
        switch * self.pixels_per_universe
    }

    /// DMX channels `port` consumes in its first universe.
    pub fn footprint(&self, port: usize) -> usize {
        (self.channel_count * self.groups(port)).min(UNIVERSE_SIZE)
    }

    /// Slot metadata for channel `offset` of `port`'s footprint.
    pub fn slot_info(&self, port: usize, offset: usize) -> Option<SlotInfo> {
        if port >= MAX_PORTS || offset >= self.footprint(port) {
            return None;
        }
        let category = match offset % self.channel_count {
            0 => SLOT_CATEGORY_RED,
            1 => SLOT_CATEGORY_GREEN,
            2 => SLOT_CATEGORY_BLUE,
            _ => SLOT_CATEGORY_WHITE,
        };
        Some(SlotInfo {
            kind: SLOT_TYPE_PRIMARY,
            category,
        })
    }
}
