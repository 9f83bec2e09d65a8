//! Structured motion commands as delivered by the command parser.

use heapless::Vec;

/// Most letter arguments a command carries.
pub const MAX_ARGS: usize = 16;

/// Primary-axis travel below this is treated as none.
pub const TRAVEL_EPSILON: f32 = 0.00001;

/// Command class and number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandCode {
    /// Motion and coordinate commands.
    G(u16),
    /// Machine and settings commands.
    M(u16),
}

/// A parsed command with its letter arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    code: CommandCode,
    subcode: u16,
    args: Vec<(char, f32), MAX_ARGS>,
    millimeters_of_travel: f32,
}

impl Command {
    /// Create a `G` command without arguments.
    pub fn g(number: u16) -> Self {
        Self::new(CommandCode::G(number))
    }

    /// Create an `M` command without arguments.
    pub fn m(number: u16) -> Self {
        Self::new(CommandCode::M(number))
    }

    fn new(code: CommandCode) -> Self {
        Self {
            code,
            subcode: 0,
            args: Vec::new(),
            millimeters_of_travel: 0.0,
        }
    }

    /// Add a letter argument. A repeated letter replaces the earlier value; arguments
    /// past [`MAX_ARGS`] are dropped.
    pub fn with_arg(mut self, letter: char, value: f32) -> Self {
        let letter = letter.to_ascii_uppercase();
        if let Some(arg) = self.args.iter_mut().find(|(l, _)| *l == letter) {
            arg.1 = value;
        } else if self.args.push((letter, value)).is_err() {
            log::warn!("dropping argument {} of {:?}", letter, self.code);
        }
        self
    }

    /// Set the primary-axis distance the planner computed for this command.
    pub fn with_travel(mut self, millimeters: f32) -> Self {
        self.millimeters_of_travel = millimeters;
        self
    }

    /// Set the subcode (`M114.1` has subcode 1).
    pub fn with_subcode(mut self, subcode: u16) -> Self {
        self.subcode = subcode;
        self
    }

    /// Command class and number.
    pub fn code(&self) -> CommandCode {
        self.code
    }

    /// Whether this is `G<number>`.
    pub fn is_g(&self, number: u16) -> bool {
        self.code == CommandCode::G(number)
    }

    /// Whether this is `M<number>`.
    pub fn is_m(&self, number: u16) -> bool {
        self.code == CommandCode::M(number)
    }

    /// `G` number, if a `G` command.
    pub fn g_number(&self) -> Option<u16> {
        match self.code {
            CommandCode::G(n) => Some(n),
            CommandCode::M(_) => None,
        }
    }

    /// `M` number, if an `M` command.
    pub fn m_number(&self) -> Option<u16> {
        match self.code {
            CommandCode::M(n) => Some(n),
            CommandCode::G(_) => None,
        }
    }

    /// Subcode, 0 when absent.
    pub fn subcode(&self) -> u16 {
        self.subcode
    }

    /// Whether `letter` is present.
    pub fn has_letter(&self, letter: char) -> bool {
        self.value(letter).is_some()
    }

    /// Value of `letter`, if present.
    pub fn value(&self, letter: char) -> Option<f32> {
        let letter = letter.to_ascii_uppercase();
        self.args.iter().find(|(l, _)| *l == letter).map(|(_, v)| *v)
    }

    /// Number of letter arguments.
    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    /// Primary-axis distance of the move.
    pub fn millimeters_of_travel(&self) -> f32 {
        self.millimeters_of_travel
    }

    /// Whether the primary axes stay put.
    pub fn is_solo(&self) -> bool {
        libm::fabsf(self.millimeters_of_travel) < TRAVEL_EPSILON
    }
}
