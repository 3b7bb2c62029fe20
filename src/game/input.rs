//! Input Capture and Normalization
//!
//! The simulation consumes normalized intent only: four held-direction
//! flags and a fire edge per player per tick. Raw keyboard events are
//! translated by the presentation layer.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::heading::Heading;
use crate::core::vec2::FixedVec2;
use crate::game::actor::PlayerSlot;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Input state for a single player for a single tick.
///
/// Direction bits are level state (key held). The fire bit is an edge:
/// set only on the tick the trigger was pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Packed flags:
    /// - Bit 0: Up held
    /// - Bit 1: Left held
    /// - Bit 2: Down held
    /// - Bit 3: Right held
    /// - Bit 4: Fire pressed this tick
    pub flags: u8,
}

impl InputFrame {
    /// Up flag bit
    pub const FLAG_UP: u8 = 0x01;
    /// Left flag bit
    pub const FLAG_LEFT: u8 = 0x02;
    /// Down flag bit
    pub const FLAG_DOWN: u8 = 0x04;
    /// Right flag bit
    pub const FLAG_RIGHT: u8 = 0x08;
    /// Fire flag bit
    pub const FLAG_FIRE: u8 = 0x10;

    /// Create an idle frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Frame holding a single direction.
    pub const fn holding(heading: Heading) -> Self {
        Self { flags: Self::flag_for(heading) }
    }

    /// Frame that only fires.
    pub const fn fire() -> Self {
        Self { flags: Self::FLAG_FIRE }
    }

    /// Add the fire edge to this frame.
    pub const fn with_fire(self) -> Self {
        Self { flags: self.flags | Self::FLAG_FIRE }
    }

    /// Add a held direction to this frame.
    pub const fn with_held(self, heading: Heading) -> Self {
        Self { flags: self.flags | Self::flag_for(heading) }
    }

    const fn flag_for(heading: Heading) -> u8 {
        match heading {
            Heading::Up => Self::FLAG_UP,
            Heading::Left => Self::FLAG_LEFT,
            Heading::Down => Self::FLAG_DOWN,
            Heading::Right => Self::FLAG_RIGHT,
        }
    }

    /// Whether a direction is held.
    #[inline]
    pub fn is_held(&self, heading: Heading) -> bool {
        self.flags & Self::flag_for(heading) != 0
    }

    /// Check if fire was pressed this tick.
    #[inline]
    pub fn fire_pressed(&self) -> bool {
        self.flags & Self::FLAG_FIRE != 0
    }

    /// Held-direction view of this frame.
    #[inline]
    pub fn held(&self) -> HeldDirections {
        HeldDirections {
            up: self.is_held(Heading::Up),
            left: self.is_held(Heading::Left),
            down: self.is_held(Heading::Down),
            right: self.is_held(Heading::Right),
        }
    }

    /// Check if this is an idle frame (no input).
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

/// The four direction keys a player may hold simultaneously.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldDirections {
    /// Up key held
    pub up: bool,
    /// Left key held
    pub left: bool,
    /// Down key held
    pub down: bool,
    /// Right key held
    pub right: bool,
}

impl HeldDirections {
    /// Evaluation order. The last held direction in this order sets facing.
    pub const EVALUATION_ORDER: [Heading; 4] =
        [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Whether a given direction is held.
    #[inline]
    pub fn is_held(&self, heading: Heading) -> bool {
        match heading {
            Heading::Up => self.up,
            Heading::Left => self.left,
            Heading::Down => self.down,
            Heading::Right => self.right,
        }
    }

    /// Movement delta for this tick and the resulting facing.
    ///
    /// Each held key contributes `speed` on its axis, so two perpendicular
    /// keys move diagonally and opposite keys cancel. Facing is `None` when
    /// nothing is held.
    pub fn movement(&self, speed: Fixed) -> (FixedVec2, Option<Heading>) {
        let mut delta = FixedVec2::ZERO;
        let mut facing = None;

        for heading in Self::EVALUATION_ORDER {
            if !self.is_held(heading) {
                continue;
            }
            let (ux, uy) = heading.unit();
            delta = delta.add(FixedVec2::new(ux * speed, uy * speed));
            facing = Some(heading);
        }

        (delta, facing)
    }
}

/// Inputs for both player slots for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInputs {
    /// Frames indexed by [`PlayerSlot::index`]
    pub frames: [InputFrame; 2],
}

impl TickInputs {
    /// No input for either player.
    pub const fn idle() -> Self {
        Self { frames: [InputFrame::new(); 2] }
    }

    /// Input for player one only.
    pub const fn single(frame: InputFrame) -> Self {
        Self { frames: [frame, InputFrame::new()] }
    }

    /// Input for both players.
    pub const fn pair(one: InputFrame, two: InputFrame) -> Self {
        Self { frames: [one, two] }
    }

    /// Frame for a slot.
    #[inline]
    pub fn get(&self, slot: PlayerSlot) -> InputFrame {
        self.frames[slot.index()]
    }

    /// Mutable frame for a slot.
    #[inline]
    pub fn get_mut(&mut self, slot: PlayerSlot) -> &mut InputFrame {
        &mut self.frames[slot.index()]
    }
}

/// Delta-compressed input entry: the frame in effect from `tick` onward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

impl InputDelta {
    /// Create new delta entry.
    pub fn new(tick: u32, frame: InputFrame) -> Self {
        Self { tick, frame }
    }
}

// =============================================================================
// INPUT BUFFER
// =============================================================================

/// Complete input recording for one player in one game.
///
/// Recording every tick and storing only changes is lossless: the fire
/// edge clears on the following tick, which is itself a change.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerInputBuffer {
    /// Player slot
    pub slot: PlayerSlot,

    /// RNG seed used for this game
    pub rng_seed: u64,

    /// Starting tick (usually 1, the first simulated tick)
    pub start_tick: u32,

    /// Last recorded tick
    pub end_tick: u32,

    /// Only stores ticks where input CHANGED.
    deltas: Vec<InputDelta>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_frame: InputFrame,
}

impl PlayerInputBuffer {
    /// Create a new input buffer for a player.
    pub fn new(slot: PlayerSlot, rng_seed: u64) -> Self {
        Self {
            slot,
            rng_seed,
            start_tick: 1,
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick.
    ///
    /// Only stores if input changed from previous frame.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;

        if frame != self.last_frame {
            self.deltas.push(InputDelta::new(tick, frame));
            self.last_frame = frame;
        }
    }

    /// Get input at a specific tick.
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        // Last delta at or before this tick
        let idx = self.deltas.partition_point(|d| d.tick <= tick);

        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Create iterator over all inputs for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            buffer: self,
            current_tick: self.start_tick,
            delta_idx: 0,
            current_frame: InputFrame::new(),
        }
    }
}

/// Iterator for replaying inputs tick-by-tick.
///
/// Yields `(tick, frame)` from `start_tick` through `end_tick`.
pub struct ReplayIterator<'a> {
    buffer: &'a PlayerInputBuffer,
    current_tick: u32,
    delta_idx: usize,
    current_frame: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_tick > self.buffer.end_tick {
            return None;
        }

        while let Some(delta) = self.buffer.deltas.get(self.delta_idx) {
            if delta.tick > self.current_tick {
                break;
            }
            self.current_frame = delta.frame;
            self.delta_idx += 1;
        }

        let result = (self.current_tick, self.current_frame);
        self.current_tick += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================
