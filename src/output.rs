//! Multi-port output controller
//!
//! Owns the double-buffered interleaved frames and the transfer state
//! machine in front of the asynchronous transport. Colors go in through
//! the encoder entry points, committed frames leave through [`MultiportOutput::update`].

use log::warn;

use crate::{
    PixelTransport, Rgb,
    config::{ConfigError, PixelSettings},
    encoder,
    frame::InterleavedFrame,
};

/// Status of the in-flight buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// No transfer running, the in-flight buffer is free.
    Idle,
    /// The transport is reading the in-flight buffer.
    Active,
    /// The transport rejected a transfer. Sticky until
    /// [`MultiportOutput::clear_fault`].
    Failed,
}

/// Rejected commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// A transfer is still active.
    Busy,
    /// The transport reported a fault. Reset the peripheral, then call
    /// [`MultiportOutput::clear_fault`].
    Faulted,
}

/// Double-buffered eight-port pixel output.
///
/// Pixel writes always land in the staging buffer, never in the one the
/// transport may be reading, so encoding while a transfer runs is safe.
/// Both working buffers start as encoded black: pixels never written still
/// produce valid all-off cells on the wire.
#[derive(Debug)]
pub struct MultiportOutput<T, const CAP: usize> {
    transport: T,
    settings: PixelSettings,
    frames: [InterleavedFrame<CAP>; 2],
    staging: usize,
    blackout: InterleavedFrame<CAP>,
    full_on: InterleavedFrame<CAP>,
    state: TransferState,
}

impl<T: PixelTransport, const CAP: usize> MultiportOutput<T, CAP> {
    /// Build the controller and precompute the static buffers.
    ///
    /// Fails when the encoded stream does not fit `CAP` or the transport's
    /// reported capacity.
    pub fn new(transport: T, settings: PixelSettings) -> Result<Self, ConfigError> {
        let required = settings.stream_len();
        let available = transport.capacity().min(CAP);
        if required > available {
            return Err(ConfigError::CapacityExceeded {
                required,
                available,
            });
        }

        let mut blackout = InterleavedFrame::with_len(required).ok_or(
            ConfigError::CapacityExceeded {
                required,
                available,
            },
        )?;
        encoder::prepare_blackout(&settings, &mut blackout);

        let mut full_on = InterleavedFrame::with_len(required).ok_or(
            ConfigError::CapacityExceeded {
                required,
                available,
            },
        )?;
        encoder::prepare_full_on(&settings, &mut full_on);

        Ok(Self {
            transport,
            settings,
            frames: [blackout.clone(), blackout.clone()],
            staging: 0,
            blackout,
            full_on,
            state: TransferState::Idle,
        })
    }

    pub fn settings(&self) -> &PixelSettings {
        &self.settings
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Write one pixel's color on `port` into the staging buffer.
    pub fn set_pixel(&mut self, port: usize, index: usize, color: Rgb) {
        encoder::set_pixel(
            &self.settings,
            &mut self.frames[self.staging],
            port,
            index,
            color,
        );
    }

    /// Write one pixel's color plus white channel on `port`.
    pub fn set_pixel_rgbw(&mut self, port: usize, index: usize, color: Rgb, white: u8) {
        encoder::set_pixel_rgbw(
            &self.settings,
            &mut self.frames[self.staging],
            port,
            index,
            color,
            white,
        );
    }

    /// Whether the transport is still reading the in-flight buffer.
    ///
    /// Polling this is what moves [`TransferState::Active`] back to
    /// [`TransferState::Idle`] once the hardware finishes.
    pub fn is_updating(&mut self) -> bool {
        if matches!(self.state, TransferState::Active) {
            if self.transport.is_transfer_active() {
                return true;
            }
            self.state = TransferState::Idle;
        }
        false
    }

    /// Commit the staging buffer and start its transfer.
    ///
    /// Subsequent pixel writes target the other buffer, seeded with a copy
    /// of the frame just sent. Pixel state persists across commits: a pixel
    /// not rewritten keeps its last committed color.
    pub fn update(&mut self) -> Result<(), OutputError> {
        match self.state {
            TransferState::Failed => return Err(OutputError::Faulted),
            TransferState::Active => {
                if self.transport.is_transfer_active() {
                    return Err(OutputError::Busy);
                }
                self.state = TransferState::Idle;
            }
            TransferState::Idle => {}
        }

        let committed = self.staging;
        match self.transport.begin_transfer(self.frames[committed].as_slice()) {
            Ok(()) => {
                // The freed buffer becomes staging. Reads of the in-flight
                // buffer are safe, only writes must stay off it.
                let [first, second] = &mut self.frames;
                if committed == 0 {
                    second.copy_from(first);
                } else {
                    first.copy_from(second);
                }
                self.staging ^= 1;
                self.state = TransferState::Active;
                Ok(())
            }
            Err(err) => {
                warn!("pixel transfer rejected: {:?}", err);
                self.state = TransferState::Failed;
                Err(OutputError::Faulted)
            }
        }
    }

    /// Ship the precomputed all-off frame and wait for it to finish.
    ///
    /// A blackout may not be interrupted. The working buffers keep their
    /// content; the next [`MultiportOutput::update`] restores the colors.
    pub fn blackout(&mut self) -> Result<(), OutputError> {
        self.transfer_static(true)
    }

    /// Ship the precomputed all-on frame and wait for it to finish.
    pub fn full_on(&mut self) -> Result<(), OutputError> {
        self.transfer_static(false)
    }

    /// Acknowledge a transport fault after the peripheral has been reset.
    pub fn clear_fault(&mut self) {
        if matches!(self.state, TransferState::Failed) {
            self.state = TransferState::Idle;
        }
    }

    /// Buffer receiving pixel writes.
    pub fn staging_frame(&self) -> &InterleavedFrame<CAP> {
        &self.frames[self.staging]
    }

    /// Most recently committed buffer.
    pub fn committed_frame(&self) -> &InterleavedFrame<CAP> {
        &self.frames[self.staging ^ 1]
    }

    fn transfer_static(&mut self, off: bool) -> Result<(), OutputError> {
        if matches!(self.state, TransferState::Failed) {
            return Err(OutputError::Faulted);
        }
        while self.is_updating() {}

        let frame = if off { &self.blackout } else { &self.full_on };
        match self.transport.begin_transfer(frame.as_slice()) {
            Ok(()) => {
                while self.transport.is_transfer_active() {}
                Ok(())
            }
            Err(err) => {
                warn!("pixel transfer rejected: {:?}", err);
                self.state = TransferState::Failed;
                Err(OutputError::Faulted)
            }
        }
    }
}
