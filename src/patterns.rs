//! Built-in test patterns
//!
//! Self-running animations for lamp tests and passive installs, one
//! independent runner per output port. `run` is meant to be polled from
//! the main loop; it repaints due ports and commits a frame only when at
//! least one port advanced.

use embassy_time::{Duration, Instant};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::PixelTransport;
use crate::Rgb;
use crate::config::MAX_PORTS;
use crate::output::MultiportOutput;

const BLACK: Rgb = Rgb::new(0, 0, 0);

const TEST_INTERVAL: Duration = Duration::from_millis(100);
const SCANNER_INTERVAL: Duration = Duration::from_millis(55);
const FADE_INTERVAL: Duration = Duration::from_millis(25);
const FADE_STEPS: usize = 64;
const CHASE_ON: Rgb = Rgb::new(255, 255, 255);
const WIPE_COLOUR: Rgb = Rgb::new(0, 255, 0);
const SCANNER_COLOUR: Rgb = Rgb::new(255, 0, 0);
const FADE_FROM: Rgb = Rgb::new(255, 0, 0);
const FADE_TO: Rgb = Rgb::new(0, 0, 255);

/// Animation selector, also the numeric id used in stored parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatternKind {
    #[default]
    None,
    RainbowCycle,
    TheaterChase,
    ColourWipe,
    Scanner,
    Fade,
}

impl PatternKind {
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::None),
            1 => Some(Self::RainbowCycle),
            2 => Some(Self::TheaterChase),
            3 => Some(Self::ColourWipe),
            4 => Some(Self::Scanner),
            5 => Some(Self::Fade),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::RainbowCycle => "Rainbow cycle",
            Self::TheaterChase => "Theater chase",
            Self::ColourWipe => "Colour wipe",
            Self::Scanner => "Scanner",
            Self::Fade => "Fade",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

struct PortRunner<const PIXELS: usize> {
    pattern: PatternKind,
    interval: Duration,
    last_update: Instant,
    total_steps: usize,
    index: usize,
    direction: Direction,
    colour1: Rgb,
    colour2: Rgb,
    trail: heapless::Vec<Rgb, PIXELS>,
}

impl<const PIXELS: usize> PortRunner<PIXELS> {
    fn new(now: Instant) -> Self {
        Self {
            pattern: PatternKind::None,
            interval: TEST_INTERVAL,
            last_update: now,
            total_steps: 1,
            index: 0,
            direction: Direction::Forward,
            colour1: BLACK,
            colour2: BLACK,
            trail: heapless::Vec::new(),
        }
    }

    fn increment(&mut self) {
        match self.direction {
            Direction::Forward => {
                self.index += 1;
                if self.index == self.total_steps {
                    self.index = 0;
                }
            }
            Direction::Reverse => {
                if self.index > 0 {
                    self.index -= 1;
                }
                if self.index == 0 {
                    self.index = self.total_steps - 1;
                }
            }
        }
    }
}

/// Per-port pattern animator driving a multi-port output.
pub struct PixelPatterns<T, const CAP: usize, const PIXELS: usize> {
    output: MultiportOutput<T, CAP>,
    runners: [PortRunner<PIXELS>; MAX_PORTS],
    active_ports: usize,
    count: usize,
}

impl<T: PixelTransport, const CAP: usize, const PIXELS: usize> PixelPatterns<T, CAP, PIXELS> {
    pub fn new(output: MultiportOutput<T, CAP>, active_ports: usize) -> Self {
        let now = Instant::now();
        let count = output.settings().count;
        Self {
            output,
            runners: core::array::from_fn(|_| PortRunner::new(now)),
            active_ports: active_ports.min(MAX_PORTS),
            count,
        }
    }

    pub fn output(&self) -> &MultiportOutput<T, CAP> {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut MultiportOutput<T, CAP> {
        &mut self.output
    }

    /// Advance every due port and push one frame when something changed.
    pub fn run(&mut self) {
        if self.output.is_updating() {
            return;
        }

        let now = Instant::now();
        let mut updated = false;

        for port in 0..self.active_ports {
            updated |= self.port_update(port, now);
        }

        if updated {
            if let Err(err) = self.output.update() {
                warn!("pattern frame dropped: {:?}", err);
            }
        }
    }

    /// Arm one pattern with its lamp-test defaults on every active port.
    pub fn set_pattern(&mut self, kind: PatternKind) {
        for port in 0..self.active_ports {
            match kind {
                PatternKind::None => self.clear(port),
                PatternKind::RainbowCycle => {
                    self.rainbow_cycle(port, TEST_INTERVAL, Direction::Forward);
                }
                PatternKind::TheaterChase => {
                    self.theater_chase(port, CHASE_ON, BLACK, TEST_INTERVAL, Direction::Forward);
                }
                PatternKind::ColourWipe => {
                    self.colour_wipe(port, WIPE_COLOUR, TEST_INTERVAL, Direction::Forward);
                }
                PatternKind::Scanner => self.scanner(port, SCANNER_COLOUR, SCANNER_INTERVAL),
                PatternKind::Fade => {
                    self.fade(
                        port,
                        FADE_FROM,
                        FADE_TO,
                        FADE_STEPS,
                        FADE_INTERVAL,
                        Direction::Forward,
                    );
                }
            }
        }
    }

    pub fn clear(&mut self, port: usize) {
        if port < MAX_PORTS {
            self.runners[port].pattern = PatternKind::None;
        }
    }

    pub fn rainbow_cycle(&mut self, port: usize, interval: Duration, direction: Direction) {
        let Some(runner) = self.arm(port, PatternKind::RainbowCycle, interval, direction) else {
            return;
        };
        runner.total_steps = 255;
    }

    pub fn theater_chase(
        &mut self,
        port: usize,
        colour1: Rgb,
        colour2: Rgb,
        interval: Duration,
        direction: Direction,
    ) {
        let count = self.count;
        let Some(runner) = self.arm(port, PatternKind::TheaterChase, interval, direction) else {
            return;
        };
        runner.total_steps = count;
        runner.colour1 = colour1;
        runner.colour2 = colour2;
    }

    pub fn colour_wipe(&mut self, port: usize, colour: Rgb, interval: Duration, direction: Direction) {
        let count = self.count;
        let Some(runner) = self.arm(port, PatternKind::ColourWipe, interval, direction) else {
            return;
        };
        runner.total_steps = count;
        runner.colour1 = colour;
    }

    pub fn scanner(&mut self, port: usize, colour: Rgb, interval: Duration) {
        let count = self.count;
        let Some(runner) = self.arm(port, PatternKind::Scanner, interval, Direction::Forward)
        else {
            return;
        };
        runner.total_steps = ((count - 1) * 2).max(1);
        runner.colour1 = colour;
        runner.trail.clear();
        for _ in 0..count.min(PIXELS) {
            let _ = runner.trail.push(BLACK);
        }
    }

    pub fn fade(
        &mut self,
        port: usize,
        colour1: Rgb,
        colour2: Rgb,
        steps: usize,
        interval: Duration,
        direction: Direction,
    ) {
        let Some(runner) = self.arm(port, PatternKind::Fade, interval, direction) else {
            return;
        };
        runner.total_steps = steps.max(1);
        runner.colour1 = colour1;
        runner.colour2 = colour2;
    }

    /// Swap a running pattern's direction in place.
    pub fn reverse(&mut self, port: usize) {
        if port >= MAX_PORTS {
            return;
        }
        let runner = &mut self.runners[port];
        match runner.direction {
            Direction::Forward => {
                runner.direction = Direction::Reverse;
                runner.index = runner.total_steps - 1;
            }
            Direction::Reverse => {
                runner.direction = Direction::Forward;
                runner.index = 0;
            }
        }
    }

    fn arm(
        &mut self,
        port: usize,
        pattern: PatternKind,
        interval: Duration,
        direction: Direction,
    ) -> Option<&mut PortRunner<PIXELS>> {
        if port >= MAX_PORTS {
            return None;
        }
        let runner = &mut self.runners[port];
        runner.pattern = pattern;
        runner.interval = interval;
        runner.index = 0;
        runner.direction = direction;
        Some(runner)
    }

    fn port_update(&mut self, port: usize, now: Instant) -> bool {
        if self.runners[port].pattern == PatternKind::None {
            return false;
        }
        if now.duration_since(self.runners[port].last_update) < self.runners[port].interval {
            return false;
        }
        self.runners[port].last_update = now;

        match self.runners[port].pattern {
            PatternKind::None => return false,
            PatternKind::RainbowCycle => self.rainbow_cycle_update(port),
            PatternKind::TheaterChase => self.theater_chase_update(port),
            PatternKind::ColourWipe => self.colour_wipe_update(port),
            PatternKind::Scanner => self.scanner_update(port),
            PatternKind::Fade => self.fade_update(port),
        }
        true
    }

    fn rainbow_cycle_update(&mut self, port: usize) {
        let index = self.runners[port].index;
        for i in 0..self.count {
            #[allow(clippy::cast_possible_truncation)]
            let position = ((i * 256 / self.count + index) & 0xFF) as u8;
            self.output.set_pixel(port, i, wheel(position));
        }
        self.runners[port].increment();
    }

    fn theater_chase_update(&mut self, port: usize) {
        let runner = &self.runners[port];
        let (colour1, colour2, index) = (runner.colour1, runner.colour2, runner.index);
        for i in 0..self.count {
            let colour = if (i + index) % 3 == 0 { colour1 } else { colour2 };
            self.output.set_pixel(port, i, colour);
        }
        self.runners[port].increment();
    }

    fn colour_wipe_update(&mut self, port: usize) {
        let (colour, index) = (self.runners[port].colour1, self.runners[port].index);
        self.output.set_pixel(port, index, colour);
        self.runners[port].increment();
    }

    fn scanner_update(&mut self, port: usize) {
        let count = self.count;
        let output = &mut self.output;
        let runner = &mut self.runners[port];
        let (colour, total_steps, index) = (runner.colour1, runner.total_steps, runner.index);

        for i in 0..count.min(runner.trail.len()) {
            let next = if i == index || i == total_steps - index {
                colour
            } else {
                dim(runner.trail[i])
            };
            output.set_pixel(port, i, next);
            runner.trail[i] = next;
        }
        runner.increment();
    }

    fn fade_update(&mut self, port: usize) {
        let runner = &self.runners[port];
        let (colour1, colour2) = (runner.colour1, runner.colour2);
        let (total_steps, index) = (runner.total_steps, runner.index);

        let blend = |from: u8, to: u8| {
            #[allow(clippy::cast_possible_truncation)]
            let level = ((usize::from(from) * (total_steps - index) + usize::from(to) * index)
                / total_steps) as u8;
            level
        };
        let colour = Rgb::new(
            blend(colour1.r, colour2.r),
            blend(colour1.g, colour2.g),
            blend(colour1.b, colour2.b),
        );

        for i in 0..self.count {
            self.output.set_pixel(port, i, colour);
        }
        self.runners[port].increment();
    }
}

/// Map 0..=255 onto the red-green-blue colour wheel.
pub fn wheel(position: u8) -> Rgb {
    let position = 255 - position;
    if position < 85 {
        Rgb::new(255 - position * 3, 0, position * 3)
    } else if position < 170 {
        let position = position - 85;
        Rgb::new(0, position * 3, 255 - position * 3)
    } else {
        let position = position - 170;
        Rgb::new(position * 3, 255 - position * 3, 0)
    }
}

fn dim(colour: Rgb) -> Rgb {
    Rgb::new(colour.r >> 1, colour.g >> 1, colour.b >> 1)
}
