//! Machine state and its double buffer
//!
//! A motion core owns exactly two `MachineState` slots. One is the
//! committed `current` state, read-only while a movement is computed; the
//! other is the `next` state the pipeline writes. Committing a movement
//! toggles which slot is current.

use bitflags::bitflags;

/// Maximum number of axes a machine may have
pub const MAX_AXES: usize = 8;

bitflags! {
    /// Which position representations of a state are trustworthy
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateStatus: u8 {
        /// `actuation` holds the real native-unit position
        const ACTUATION_KNOWN = 0x01;
        /// `control` holds the real logical position
        const CONTROL_KNOWN   = 0x02;
        /// Both representations are consistent
        const POSITION_KNOWN  = Self::ACTUATION_KNOWN.bits() | Self::CONTROL_KNOWN.bits();
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateStatus {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "StateStatus({=u8:#04x})", self.bits())
    }
}

/// Position snapshot of the whole machine
///
/// `X` carries controller-specific persistent fields (e.g. the exit speed
/// of the last committed movement).
#[derive(Debug, Clone, PartialEq)]
pub struct MachineState<X> {
    dimension: usize,
    /// Trust flags for the position arrays
    pub status: StateStatus,
    actuation: [i32; MAX_AXES],
    control: [f32; MAX_AXES],
    /// Controller-owned persistent fields
    pub ext: X,
}

impl<X: Default> MachineState<X> {
    /// Create a zeroed state with unknown position
    ///
    /// `dimension` is clamped to [`MAX_AXES`]; callers that need to detect
    /// an oversized request check it against the motion core at init.
    pub fn new(dimension: usize) -> Self {
        Self::with_ext(dimension, X::default())
    }
}

impl<X> MachineState<X> {
    /// Create a zeroed state carrying the given controller fields
    pub fn with_ext(dimension: usize, ext: X) -> Self {
        Self {
            dimension: dimension.min(MAX_AXES),
            status: StateStatus::empty(),
            actuation: [0; MAX_AXES],
            control: [0.0; MAX_AXES],
            ext,
        }
    }

    /// Number of axes
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Native-unit positions, one per axis
    pub fn actuation(&self) -> &[i32] {
        &self.actuation[..self.dimension]
    }

    /// Mutable native-unit positions
    pub fn actuation_mut(&mut self) -> &mut [i32] {
        &mut self.actuation[..self.dimension]
    }

    /// Logical positions, one per axis
    pub fn control(&self) -> &[f32] {
        &self.control[..self.dimension]
    }

    /// Mutable logical positions
    pub fn control_mut(&mut self) -> &mut [f32] {
        &mut self.control[..self.dimension]
    }

    /// Both position arrays at once, for geometry conversions
    pub fn positions_mut(&mut self) -> (&mut [i32], &mut [f32]) {
        (
            &mut self.actuation[..self.dimension],
            &mut self.control[..self.dimension],
        )
    }

    /// Check if native positions are known
    pub fn actuation_known(&self) -> bool {
        self.status.contains(StateStatus::ACTUATION_KNOWN)
    }

    /// Check if logical positions are known
    pub fn control_known(&self) -> bool {
        self.status.contains(StateStatus::CONTROL_KNOWN)
    }
}

/// Identifies one of the two state slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// The other slot
    pub fn other(self) -> Self {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }
}

/// Two machine states with a toggle selecting the current one
#[derive(Debug, Clone)]
pub struct StatePair<X> {
    a: MachineState<X>,
    b: MachineState<X>,
    current: Slot,
}

impl<X> StatePair<X> {
    /// Build a pair; slot A starts as current
    pub fn new(a: MachineState<X>, b: MachineState<X>) -> Self {
        Self {
            a,
            b,
            current: Slot::A,
        }
    }

    /// Which slot is currently committed
    pub fn current_slot(&self) -> Slot {
        self.current
    }

    /// The committed state
    pub fn current(&self) -> &MachineState<X> {
        self.slot(self.current)
    }

    /// The scratch state for the movement being computed
    pub fn next(&self) -> &MachineState<X> {
        self.slot(self.current.other())
    }

    /// Borrow a slot by name
    pub fn slot(&self, slot: Slot) -> &MachineState<X> {
        match slot {
            Slot::A => &self.a,
            Slot::B => &self.b,
        }
    }

    /// Mutable access to the committed state
    ///
    /// Only used for out-of-band position resets (homing).
    pub fn current_mut(&mut self) -> &mut MachineState<X> {
        match self.current {
            Slot::A => &mut self.a,
            Slot::B => &mut self.b,
        }
    }

    /// Split into `(current, next)` with `next` writable
    pub fn split(&mut self) -> (&MachineState<X>, &mut MachineState<X>) {
        match self.current {
            Slot::A => (&self.a, &mut self.b),
            Slot::B => (&self.b, &mut self.a),
        }
    }

    /// Make `next` the committed state
    pub fn flip(&mut self) {
        self.current = self.current.other();
    }
}
