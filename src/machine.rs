//! Collaborators owned by the rest of the machine.
//!
//! The feed axis never reaches into global state; everything it needs from the motion
//! queue, the primary axes, the step ticker and the halt line comes through these
//! traits.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::command::Command;

/// The shared queue of planned motion blocks.
pub trait MotionQueue {
    /// Queue `command` so its execute phase runs when it reaches the head of the queue.
    fn append_command(&mut self, command: &Command);

    /// Queue an empty block so later commands wait for the solo move ahead of it.
    fn queue_solo_barrier(&mut self);

    /// Block until every queued block has run.
    fn wait_for_empty_queue(&mut self);
}

/// The primary (X/Y/Z) axes of the machine.
pub trait PrimaryAxis {
    /// Save modal state, feed rates included.
    fn push_state(&mut self);

    /// Restore the state saved by the matching `push_state`.
    fn pop_state(&mut self);

    /// Switch between absolute and relative coordinates.
    fn set_absolute_mode(&mut self, absolute: bool);

    /// Whether coordinates are absolute.
    fn is_absolute_mode(&self) -> bool;

    /// Queue a move of `distance` on `axis` at `feed_rate` (units per minute), in the
    /// current coordinate mode.
    fn queue_move(&mut self, axis: char, distance: f32, feed_rate: f32);

    /// Divisor turning `F` words into per-second rates.
    fn seconds_per_minute(&self) -> f32 {
        60.0
    }
}

/// Timing source of the step generator.
pub trait StepTicker {
    /// Rate at which [`MotionHooks::on_acceleration_tick`] fires.
    fn acceleration_ticks_per_second(&self) -> u32;

    /// Current step rate of the primary axes, after trapezoid adjustment.
    fn trapezoid_adjusted_rate(&self) -> f32;
}

/// Global halt state.
pub trait HaltSignal {
    /// Whether the machine is halted.
    fn is_halted(&self) -> bool;
}

impl<T: HaltSignal + ?Sized> HaltSignal for &T {
    fn is_halted(&self) -> bool {
        (**self).is_halted()
    }
}

/// Halt line shared between an interrupt and the foreground.
#[derive(Debug, Default)]
pub struct HaltFlag(AtomicBool);

impl HaltFlag {
    /// Create a released flag.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Assert or release the halt.
    pub fn set(&self, halted: bool) {
        self.0.store(halted, Ordering::SeqCst);
    }
}

impl HaltSignal for HaltFlag {
    fn is_halted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Speed update delivered by the primary step generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedChange {
    /// The primary rate changed; follow it.
    Adjusted,
    /// The queue is being flushed and the primary axes reached zero speed.
    Flush,
}

/// Halt line transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HaltEvent {
    /// The machine halted.
    Asserted,
    /// The halt was cleared.
    Released,
}

/// Motion events a feed axis reacts to.
///
/// Block and tick events run in interrupt context. The owner serializes them with
/// the foreground command path.
pub trait MotionHooks<B> {
    /// A block became the head of the queue.
    fn on_block_begin(&mut self, block: B);

    /// The head block finished on the primary axes.
    fn on_block_end(&mut self);

    /// Periodic acceleration tick.
    fn on_acceleration_tick(&mut self);

    /// The primary step rate changed.
    fn on_speed_change(&mut self, change: SpeedChange);

    /// The feed stepper completed its programmed move.
    fn on_stepper_finished(&mut self);

    /// The halt line changed.
    fn on_halt(&mut self, event: HaltEvent);
}
