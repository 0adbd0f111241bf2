//! Universe ingress queue
//!
//! Bounded handoff between the receive path (often an interrupt or a
//! different task) and the main-loop bridge. Built on `critical-section`
//! and `heapless::Deque`, so it is safe to push from interrupt context.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::PixelTransport;
use crate::dmx::PixelDmx;
use crate::mapping::UNIVERSE_SIZE;

/// One received universe, queued until the main loop picks it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseUpdate {
    pub protocol_port: u16,
    pub data: heapless::Vec<u8, UNIVERSE_SIZE>,
}

impl UniverseUpdate {
    /// Copy a received payload, truncated to one universe.
    pub fn new(protocol_port: u16, data: &[u8]) -> Self {
        let mut payload = heapless::Vec::new();
        let _ = payload.extend_from_slice(&data[..data.len().min(UNIVERSE_SIZE)]);
        Self {
            protocol_port,
            data: payload,
        }
    }
}

/// Error returned when pushing into a full queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFullError(pub UniverseUpdate);

/// Error returned when popping from an empty queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEmptyError;

/// Fixed-depth universe queue, synchronized with critical sections.
pub struct UniverseQueue<const DEPTH: usize> {
    inner: Mutex<RefCell<Deque<UniverseUpdate, DEPTH>>>,
}

impl<const DEPTH: usize> UniverseQueue<DEPTH> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Producer handle for the receive path. Multiple producers may share
    /// the queue.
    pub const fn producer(&self) -> UniverseProducer<'_, DEPTH> {
        UniverseProducer { queue: self }
    }

    /// Consumer handle for the main loop.
    pub const fn consumer(&self) -> UniverseConsumer<'_, DEPTH> {
        UniverseConsumer { queue: self }
    }

    pub fn try_push(&self, update: UniverseUpdate) -> Result<(), QueueFullError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(update).map_err(QueueFullError)
        })
    }

    pub fn try_pop(&self) -> Result<UniverseUpdate, QueueEmptyError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(QueueEmptyError)
        })
    }
}

impl<const DEPTH: usize> Default for UniverseQueue<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

/// Push side of a [`UniverseQueue`].
#[derive(Clone, Copy)]
pub struct UniverseProducer<'a, const DEPTH: usize> {
    queue: &'a UniverseQueue<DEPTH>,
}

impl<const DEPTH: usize> UniverseProducer<'_, DEPTH> {
    pub fn try_push(&self, update: UniverseUpdate) -> Result<(), QueueFullError> {
        self.queue.try_push(update)
    }
}

/// Pop side of a [`UniverseQueue`].
#[derive(Clone, Copy)]
pub struct UniverseConsumer<'a, const DEPTH: usize> {
    queue: &'a UniverseQueue<DEPTH>,
}

impl<const DEPTH: usize> UniverseConsumer<'_, DEPTH> {
    pub fn try_pop(&self) -> Result<UniverseUpdate, QueueEmptyError> {
        self.queue.try_pop()
    }

    /// Drain everything queued so far into the bridge. Commits are left to
    /// the bridge's last-universe bookkeeping.
    pub fn pump<T: PixelTransport, const CAP: usize>(&self, dmx: &mut PixelDmx<T, CAP>) {
        while let Ok(update) = self.try_pop() {
            dmx.set_data(usize::from(update.protocol_port), &update.data, false);
        }
    }
}
