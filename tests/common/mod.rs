//! Shared fakes for the integration and property tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal_mock::eh1::delay::NoopDelay;
use extruder_motion::config::parse_config;
use extruder_motion::{
    AngleInput, BlockHandle, Command, CommandCode, Direction, ExtruderAxis, ExtruderConfig,
    HaltFlag, MotionQueue, PrimaryAxis, StepTicker, StepperMotor,
};

/// Ten steps per millimetre and five per degree: one degree is half a millimetre.
pub const TEST_CONFIG: &str = r#"
[extruders.hotend]
identifier = 1
enabled = true
steps_per_mm = 10.0
steps_per_angle = 5.0
acceleration = 1000.0
default_feed_rate = 1000.0
max_speed = 1000.0
retract_zlift_length = 0.4
angle_sensor_pin = "0.23"
"#;

pub fn test_config() -> ExtruderConfig {
    parse_config(TEST_CONFIG)
        .unwrap()
        .extruder("hotend")
        .unwrap()
}

/// Stepper that records every move.
///
/// With `polls_per_move == 0` a move runs until [`FakeStepper::finish`]; otherwise it
/// completes after that many `is_moving` polls.
#[derive(Debug, Default)]
pub struct FakeStepper {
    pub moves: Vec<(Direction, u32)>,
    pub speed: f32,
    pub max_rate: f32,
    pub enabled: bool,
    pub moved_last_block: bool,
    pub polls_per_move: u32,
    moving: Cell<bool>,
    remaining: Cell<u32>,
}

impl FakeStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_completing(polls_per_move: u32) -> Self {
        Self {
            polls_per_move,
            ..Self::default()
        }
    }

    pub fn finish(&self) {
        self.moving.set(false);
    }

    pub fn last_move(&self) -> Option<(Direction, u32)> {
        self.moves.last().copied()
    }
}

impl StepperMotor for FakeStepper {
    fn move_steps(&mut self, direction: Direction, steps: u32) {
        self.moves.push((direction, steps));
        self.moving.set(steps > 0);
        self.remaining.set(self.polls_per_move);
    }

    fn set_speed(&mut self, rate: f32) {
        self.speed = rate;
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn steps_to_move(&self) -> u32 {
        self.moves.last().map(|(_, steps)| *steps).unwrap_or(0)
    }

    fn set_max_rate(&mut self, rate: f32) {
        self.max_rate = rate;
    }

    fn max_rate(&self) -> f32 {
        self.max_rate
    }

    fn is_moving(&self) -> bool {
        if !self.moving.get() {
            return false;
        }
        if self.polls_per_move > 0 {
            let left = self.remaining.get();
            if left == 0 {
                self.moving.set(false);
                return false;
            }
            self.remaining.set(left - 1);
        }
        true
    }

    fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_moved_last_block(&mut self, moved: bool) {
        self.moved_last_block = moved;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeTicker {
    pub ticks_per_second: u32,
    pub primary_rate: f32,
}

impl Default for FakeTicker {
    fn default() -> Self {
        Self {
            ticks_per_second: 1000,
            primary_rate: 2000.0,
        }
    }
}

impl StepTicker for FakeTicker {
    fn acceleration_ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    fn trapezoid_adjusted_rate(&self) -> f32 {
        self.primary_rate
    }
}

/// Block that counts takes and releases.
#[derive(Debug)]
pub struct TestBlock {
    pub millimeters: f32,
    pub steps_event_count: u32,
    pub taken: Cell<u32>,
    pub released: Cell<u32>,
}

impl TestBlock {
    pub fn new(millimeters: f32, steps_event_count: u32) -> Self {
        Self {
            millimeters,
            steps_event_count,
            taken: Cell::new(0),
            released: Cell::new(0),
        }
    }

    /// Block queued behind a solo move.
    pub fn solo() -> Self {
        Self::new(0.0, 0)
    }

    pub fn outstanding(&self) -> i64 {
        self.taken.get() as i64 - self.released.get() as i64
    }
}

impl BlockHandle for TestBlock {
    fn take(&self) {
        self.taken.set(self.taken.get() + 1);
    }

    fn release(&self) {
        self.released.set(self.released.get() + 1);
    }

    fn steps_event_count(&self) -> u32 {
        self.steps_event_count
    }

    fn millimeters(&self) -> f32 {
        self.millimeters
    }
}

/// Sensor whose readings peak at sample `peak`.
#[derive(Debug, Default)]
pub struct PeakSensor {
    pub peak: usize,
    index: usize,
}

impl PeakSensor {
    pub fn new(peak: usize) -> Self {
        Self { peak, index: 0 }
    }
}

impl AngleInput for PeakSensor {
    fn read_raw(&mut self) -> i32 {
        let distance = (self.index as i32 - self.peak as i32).abs();
        self.index += 1;
        4000 - distance * 25
    }
}

/// What the queue and the primary axes were asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Append(CommandCode),
    SoloBarrier,
    Drain,
    PushState,
    PopState,
    SetAbsolute(bool),
    Move(char, f32, f32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Debug, Default)]
pub struct FakeQueue {
    pub log: EventLog,
}

impl MotionQueue for FakeQueue {
    fn append_command(&mut self, command: &Command) {
        self.log.borrow_mut().push(Event::Append(command.code()));
    }

    fn queue_solo_barrier(&mut self) {
        self.log.borrow_mut().push(Event::SoloBarrier);
    }

    fn wait_for_empty_queue(&mut self) {
        self.log.borrow_mut().push(Event::Drain);
    }
}

#[derive(Debug)]
pub struct FakePrimary {
    pub log: EventLog,
    pub absolute: bool,
}

impl PrimaryAxis for FakePrimary {
    fn push_state(&mut self) {
        self.log.borrow_mut().push(Event::PushState);
    }

    fn pop_state(&mut self) {
        self.log.borrow_mut().push(Event::PopState);
    }

    fn set_absolute_mode(&mut self, absolute: bool) {
        self.log.borrow_mut().push(Event::SetAbsolute(absolute));
    }

    fn is_absolute_mode(&self) -> bool {
        self.absolute
    }

    fn queue_move(&mut self, axis: char, distance: f32, feed_rate: f32) {
        self.log
            .borrow_mut()
            .push(Event::Move(axis, distance, feed_rate));
    }
}

/// Queue and primary axes sharing one event log.
pub fn machine() -> (FakeQueue, FakePrimary, EventLog) {
    let log = EventLog::default();
    let queue = FakeQueue { log: log.clone() };
    let primary = FakePrimary {
        log: log.clone(),
        absolute: true,
    };
    (queue, primary, log)
}

pub type TestAxis<'a> =
    ExtruderAxis<FakeStepper, FakeTicker, &'a HaltFlag, &'a TestBlock, PeakSensor, NoopDelay>;

pub fn build_axis_with<'a>(
    config: &ExtruderConfig,
    halt: &'a HaltFlag,
    stepper: FakeStepper,
) -> TestAxis<'a> {
    ExtruderAxis::builder()
        .name("hotend")
        .from_extruder_config(config)
        .stepper(stepper)
        .ticker(FakeTicker::default())
        .halt(halt)
        .sensor(PeakSensor::new(18))
        .delay(NoopDelay::new())
        .build()
        .unwrap()
}

pub fn build_axis(halt: &HaltFlag) -> TestAxis<'_> {
    build_axis_with(&test_config(), halt, FakeStepper::new())
}

/// Send `command` through the received phase, then through the execute phase if it
/// was queued.
pub fn run_command(
    axis: &mut TestAxis<'_>,
    command: &Command,
    queue: &mut FakeQueue,
    primary: &mut FakePrimary,
) -> String {
    let before = queue.log.borrow().len();
    let mut reply = String::new();
    axis.on_command_received(command, queue, primary, &mut reply)
        .unwrap();

    let queued = queue.log.borrow()[before..]
        .iter()
        .any(|e| *e == Event::Append(command.code()));
    if queued {
        axis.on_command_execute(command, primary);
    }
    reply
}
