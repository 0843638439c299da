//! Turns raw pointer input into state mutations.
//!
//! A gesture starts with [`PointerEvent::Down`] over an entity and lives in the
//! [`DragController`] until the pointer is released or the gesture is aborted.
//! Moves are only applied while a gesture is held, so once it is dropped no
//! further move can reach the state.

use crate::entities::{EntityRef, MagnetId};
use crate::error::SimError;
use crate::simulation::SimulationState;
use bevy::prelude::*;

/// Pointer travel (in canvas units) after which a press counts as a drag, not a click
pub const CLICK_SLOP: f32 = 4.0;

/// Hit radius of a magnet disc
pub const MAGNET_RADIUS: f32 = 35.0;

/// Hit radius of a particle disc
pub const PARTICLE_RADIUS: f32 = 20.0;

/// Input events coming from the window layer, in canvas coordinates
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed. `target` is whatever was under the pointer.
    Down {
        target: Option<EntityRef>,
        pointer: Vec2,
    },
    Move {
        pointer: Vec2,
    },
    Up,
    /// Pointer capture lost (cursor left the window, focus lost, ...)
    Cancel,
    /// A click that did not come through a press/release pair, e.g. from the controls panel
    Click {
        target: MagnetId,
    },
}

/// What handling one event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    Ignored,
    Grabbed(EntityRef),
    Moved(EntityRef),
    /// The magnet's new active flag
    Toggled(MagnetId, bool),
    Released(EntityRef),
}

/// A press that is currently held
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub target: EntityRef,
    /// Pointer minus entity position at press time, keeps the grab point stable
    pub offset: Vec2,
    /// Where the pointer went down
    pub origin: Vec2,
    /// Set once the pointer travelled past `CLICK_SLOP`
    pub dragging: bool,
}

/// Holds at most one live gesture
#[derive(Resource, Debug, Default)]
pub struct DragController {
    gesture: Option<DragGesture>,
}

impl DragController {
    pub fn gesture(&self) -> Option<&DragGesture> {
        self.gesture.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Drop the current gesture without touching the state
    pub fn release(&mut self) -> Option<DragGesture> {
        self.gesture.take()
    }

    /// Apply one pointer event to `state`.
    ///
    /// Errors are only returned when the state rejects a write, which means
    /// the gesture refers to an entity that no longer exists; that gesture is
    /// dropped before returning.
    pub fn handle(
        &mut self,
        state: &mut SimulationState,
        event: PointerEvent,
    ) -> Result<InteractionOutcome, SimError> {
        match event {
            PointerEvent::Down { target, pointer } => Ok(self.press(state, target, pointer)),
            PointerEvent::Move { pointer } => self.drag_to(state, pointer),
            PointerEvent::Up => self.lift(state),
            PointerEvent::Cancel => Ok(self
                .release()
                .map_or(InteractionOutcome::Ignored, |g| InteractionOutcome::Released(g.target))),
            PointerEvent::Click { target } => {
                let active = state.toggle_magnet_active(target)?;
                Ok(InteractionOutcome::Toggled(target, active))
            }
        }
    }

    fn press(
        &mut self,
        state: &SimulationState,
        target: Option<EntityRef>,
        pointer: Vec2,
    ) -> InteractionOutcome {
        // a missed Up must not leave the old gesture alive
        self.gesture = None;

        let Some(target) = target else {
            return InteractionOutcome::Ignored;
        };
        let Some(position) = state.position_of(target) else {
            return InteractionOutcome::Ignored;
        };

        self.gesture = Some(DragGesture {
            target,
            offset: pointer - position,
            origin: pointer,
            dragging: false,
        });
        InteractionOutcome::Grabbed(target)
    }

    fn drag_to(
        &mut self,
        state: &mut SimulationState,
        pointer: Vec2,
    ) -> Result<InteractionOutcome, SimError> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Ok(InteractionOutcome::Ignored);
        };

        if !gesture.dragging {
            if pointer.distance(gesture.origin) <= CLICK_SLOP {
                return Ok(InteractionOutcome::Ignored);
            }
            gesture.dragging = true;
        }

        let target = gesture.target;
        let position = pointer - gesture.offset;
        let written = match target {
            EntityRef::Magnet(id) => state.set_magnet_position(id, position.x, position.y),
            EntityRef::Particle(id) => state.set_particle_position(id, position.x, position.y),
        };

        if let Err(err) = written {
            self.gesture = None;
            return Err(err);
        }
        Ok(InteractionOutcome::Moved(target))
    }

    fn lift(&mut self, state: &mut SimulationState) -> Result<InteractionOutcome, SimError> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(InteractionOutcome::Ignored);
        };

        match gesture.target {
            EntityRef::Magnet(id) if !gesture.dragging => {
                let active = state.toggle_magnet_active(id)?;
                Ok(InteractionOutcome::Toggled(id, active))
            }
            target => Ok(InteractionOutcome::Released(target)),
        }
    }
}

/// Topmost entity under `point`.
///
/// Magnets sit above particles, active magnets above inactive ones, and later
/// entries are drawn above earlier ones. Each layer is searched back to front,
/// top layer first.
pub fn hit_test(state: &SimulationState, point: Vec2) -> Option<EntityRef> {
    let magnet_under = |active: bool| {
        state
            .magnets()
            .iter()
            .rev()
            .filter(|m| m.active == active)
            .find(|m| m.position().distance(point) <= MAGNET_RADIUS)
            .map(|m| EntityRef::Magnet(m.id))
    };

    magnet_under(true).or_else(|| magnet_under(false)).or_else(|| {
        state
            .particles()
            .iter()
            .rev()
            .find(|p| p.position().distance(point) <= PARTICLE_RADIUS)
            .map(|p| EntityRef::Particle(p.id))
    })
}
