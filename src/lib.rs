#![no_std]

pub mod config;
pub mod dmx;
pub mod encoder;
pub mod frame;
pub mod gamma;
pub mod ingress;
pub mod mapping;
pub mod output;
pub mod params;
pub mod patterns;
pub mod pixel_type;
pub mod strip;

pub use config::{ConfigError, MAX_PORTS, PixelConfiguration, PixelSettings};
pub use dmx::PixelDmx;
pub use frame::InterleavedFrame;
pub use gamma::GammaTable;
pub use ingress::{UniverseConsumer, UniverseProducer, UniverseQueue, UniverseUpdate};
pub use mapping::{PortMap, PortMapping, SlotInfo, UNIVERSE_SIZE};
pub use output::{MultiportOutput, OutputError, TransferState};
pub use params::PixelParams;
pub use patterns::{Direction, PatternKind, PixelPatterns};
pub use pixel_type::{ChannelOrder, PixelType, ProtocolClass};
pub use strip::PixelStrip;

pub use embassy_time::{Duration, Instant};

/// Color triple in the order callers think in, red green blue.
pub type Rgb = smart_leds::RGB8;

/// Error returned when the transport rejects a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportError;

/// Abstract pixel bus
///
/// Implement this trait to support different hardware platforms. The
/// output engine is generic over this trait and hands it fully encoded
/// frames, ready for the wire.
pub trait PixelTransport {
    /// Largest frame the transport can move in one transfer.
    fn capacity(&self) -> usize;

    /// Start moving `frame` out on the wire. Returns as soon as the
    /// transfer is running; completion is observed via
    /// [`is_transfer_active`](Self::is_transfer_active).
    fn begin_transfer(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Whether a previously started transfer is still on the wire.
    fn is_transfer_active(&mut self) -> bool;

    /// Move `frame` and wait for it to finish.
    fn write_sync(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        self.begin_transfer(frame)?;
        while self.is_transfer_active() {}
        Ok(())
    }
}
