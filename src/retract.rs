//! Firmware retract with optional Z hop.
//!
//! A retract queues a solo pull-back of the filament and then lifts Z. Un-retract
//! lowers Z first and then pushes the filament back, unless an absolute Z move in
//! between made the old height meaningless.

use crate::command::Command;
use crate::config::units::{Millimeters, MmPerSec};
use crate::config::ExtruderConfig;
use crate::machine::{MotionQueue, PrimaryAxis};

/// Firmware retract direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetractCommand {
    /// Pull the filament back (`G10`).
    Retract,
    /// Push it back (`G11`).
    Recover,
}

impl RetractCommand {
    /// Firmware retract carried by `command`, if any. `L` marks a different `G10`.
    pub fn from_command(command: &Command) -> Option<Self> {
        if command.has_letter('L') {
            return None;
        }
        if command.is_g(10) {
            Some(RetractCommand::Retract)
        } else if command.is_g(11) {
            Some(RetractCommand::Recover)
        } else {
            None
        }
    }
}

/// Lengths and rates of the retract moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetractSettings {
    /// Pull-back length.
    pub length: Millimeters,
    /// Pull-back feed rate.
    pub feedrate: MmPerSec,
    /// Extra length pushed on recover.
    pub recover_length: Millimeters,
    /// Recover feed rate.
    pub recover_feedrate: MmPerSec,
    /// Z hop; zero disables it.
    pub zlift_length: Millimeters,
    /// Z hop feed rate, units per minute.
    pub zlift_feedrate: f32,
}

impl RetractSettings {
    /// Take the retract keys of an extruder configuration.
    pub fn from_config(config: &ExtruderConfig) -> Self {
        Self {
            length: config.retract_length,
            feedrate: config.retract_feedrate,
            recover_length: config.retract_recover_length,
            recover_feedrate: config.retract_recover_feedrate,
            zlift_length: config.retract_zlift_length,
            zlift_feedrate: config.retract_zlift_feedrate,
        }
    }

    /// Solo feed move `(travel, feed rate)` for `command`.
    pub fn solo_move(&self, command: RetractCommand) -> (f32, MmPerSec) {
        match command {
            RetractCommand::Retract => (-self.length.0, self.feedrate),
            RetractCommand::Recover => (
                self.length.0 + self.recover_length.0,
                self.recover_feedrate,
            ),
        }
    }

    fn zlift(&self, distance: f32) -> Option<ZLift> {
        (self.zlift_length.0 > 0.0).then_some(ZLift {
            distance,
            feed_rate: self.zlift_feedrate,
        })
    }
}

/// Relative Z move around a retract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZLift {
    /// Signed Z distance.
    pub distance: f32,
    /// Feed rate, units per minute.
    pub feed_rate: f32,
}

/// Moves to queue for one accepted retract command, in order around the feed move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RetractPlan {
    /// Z move queued before the feed move.
    pub zlift_before: Option<ZLift>,
    /// Z move queued after the feed move.
    pub zlift_after: Option<ZLift>,
}

/// Retract state of one feed axis.
#[derive(Debug, Clone)]
pub struct RetractSequencer {
    settings: RetractSettings,
    retracted: bool,
    cancel_zlift_restore: bool,
}

impl RetractSequencer {
    /// Create an un-retracted sequencer.
    pub fn new(settings: RetractSettings) -> Self {
        Self {
            settings,
            retracted: false,
            cancel_zlift_restore: false,
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &RetractSettings {
        &self.settings
    }

    /// Mutable settings, for runtime commands.
    pub fn settings_mut(&mut self) -> &mut RetractSettings {
        &mut self.settings
    }

    /// Whether the filament is retracted.
    pub fn is_retracted(&self) -> bool {
        self.retracted
    }

    /// Whether the next recover skips lowering Z.
    pub fn is_zlift_restore_cancelled(&self) -> bool {
        self.cancel_zlift_restore
    }

    /// Accept or ignore a retract command.
    ///
    /// Returns `None` for a duplicate (retract while retracted, recover while not).
    pub fn request(&mut self, command: RetractCommand) -> Option<RetractPlan> {
        match (command, self.retracted) {
            (RetractCommand::Retract, false) => {
                self.retracted = true;
                self.cancel_zlift_restore = false;
                log::info!("filament retracted");
                Some(RetractPlan {
                    zlift_before: None,
                    zlift_after: self.settings.zlift(self.settings.zlift_length.0),
                })
            }
            (RetractCommand::Recover, true) => {
                self.retracted = false;
                log::info!("filament recovered");
                let zlift_before = if self.cancel_zlift_restore {
                    None
                } else {
                    self.settings.zlift(-self.settings.zlift_length.0)
                };
                Some(RetractPlan {
                    zlift_before,
                    zlift_after: None,
                })
            }
            _ => None,
        }
    }

    /// Note a primary-axis move with a Z word.
    ///
    /// An absolute Z move while retracted keeps the new height on recover.
    pub fn note_z_move(&mut self, absolute: bool) {
        if self.retracted && absolute {
            self.cancel_zlift_restore = true;
        }
    }
}

impl RetractPlan {
    /// Queue the feed command behind a solo barrier with the Z moves around it.
    pub fn queue<Q, P>(&self, command: &Command, queue: &mut Q, primary: &mut P)
    where
        Q: MotionQueue + ?Sized,
        P: PrimaryAxis + ?Sized,
    {
        if let Some(lift) = self.zlift_before {
            queue_zlift(primary, lift);
        }

        queue.append_command(command);
        queue.queue_solo_barrier();

        if let Some(lift) = self.zlift_after {
            queue_zlift(primary, lift);
        }
    }
}

fn queue_zlift<P: PrimaryAxis + ?Sized>(primary: &mut P, lift: ZLift) {
    primary.push_state();
    primary.set_absolute_mode(false);
    primary.queue_move('Z', lift.distance, lift.feed_rate);
    primary.pop_state();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(zlift: f32) -> RetractSettings {
        RetractSettings {
            length: Millimeters(3.0),
            feedrate: MmPerSec(45.0),
            recover_length: Millimeters(0.5),
            recover_feedrate: MmPerSec(8.0),
            zlift_length: Millimeters(zlift),
            zlift_feedrate: 6000.0,
        }
    }

    #[test]
    fn test_toggle_ignores_duplicates() {
        let mut seq = RetractSequencer::new(settings(0.0));

        assert!(seq.request(RetractCommand::Recover).is_none());
        assert!(seq.request(RetractCommand::Retract).is_some());
        assert!(seq.request(RetractCommand::Retract).is_none());
        assert!(seq.is_retracted());
        assert!(seq.request(RetractCommand::Recover).is_some());
        assert!(!seq.is_retracted());
    }

    #[test]
    fn test_zlift_order() {
        let mut seq = RetractSequencer::new(settings(0.4));

        let retract = seq.request(RetractCommand::Retract).unwrap();
        assert_eq!(retract.zlift_before, None);
        assert_eq!(retract.zlift_after.map(|z| z.distance), Some(0.4));

        let recover = seq.request(RetractCommand::Recover).unwrap();
        assert_eq!(recover.zlift_before.map(|z| z.distance), Some(-0.4));
        assert_eq!(recover.zlift_after, None);
    }

    #[test]
    fn test_absolute_z_cancels_restore() {
        let mut seq = RetractSequencer::new(settings(0.4));

        seq.note_z_move(true);
        assert!(!seq.is_zlift_restore_cancelled());

        seq.request(RetractCommand::Retract);
        seq.note_z_move(false);
        assert!(!seq.is_zlift_restore_cancelled());
        seq.note_z_move(true);
        assert!(seq.is_zlift_restore_cancelled());

        let recover = seq.request(RetractCommand::Recover).unwrap();
        assert_eq!(recover.zlift_before, None);

        // a new retract re-arms the restore
        seq.request(RetractCommand::Retract);
        assert!(!seq.is_zlift_restore_cancelled());
    }

    #[test]
    fn test_solo_moves() {
        let s = settings(0.0);
        assert_eq!(s.solo_move(RetractCommand::Retract), (-3.0, MmPerSec(45.0)));
        assert_eq!(s.solo_move(RetractCommand::Recover), (3.5, MmPerSec(8.0)));
    }

    #[test]
    fn test_from_command() {
        assert_eq!(
            RetractCommand::from_command(&Command::g(10)),
            Some(RetractCommand::Retract)
        );
        assert_eq!(
            RetractCommand::from_command(&Command::g(11)),
            Some(RetractCommand::Recover)
        );
        assert_eq!(
            RetractCommand::from_command(&Command::g(10).with_arg('L', 2.0)),
            None
        );
        assert_eq!(RetractCommand::from_command(&Command::g(1)), None);
    }
}
