//! Pointer drag tracking
//!
//! A drag session lives from pointer-down to the first pointer-up. Move and
//! up events are only observed while a session exists, so the "listeners"
//! for them are exactly the [`DragState::Dragging`] variant: they cannot be
//! attached twice or released without having been attached.
//!
//! Positions are raw viewport pixels with a top-left origin. Only deltas are
//! consumed, so no recentring on the viewport middle is applied.

use bevy_math::Vec2;
use tracing::debug;

/// Pointer input delivered by the host, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    /// Position consumed by the last delta sample
    last_sample: Vec2,
    /// Most recent pointer position
    current: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Accumulates pointer movement between pointer-down and pointer-up.
///
/// Pointer-down is always observed, but only starts a session while the
/// tracker is enabled. Disabling ends any session immediately.
#[derive(Debug, Clone, Default)]
pub struct PointerDragTracker {
    enabled: bool,
    state: DragState,
}

impl PointerDragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow pointer-down to start sessions
    pub fn on_activate(&mut self) {
        self.enabled = true;
    }

    /// Stop accepting sessions and drop the current one, if any
    pub fn on_deactivate(&mut self) {
        self.enabled = false;
        if self.end_session() {
            debug!("Drag session cancelled by deactivation");
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Feed a pointer event. Returns `true` if the event changed tracker state.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down(position) => {
                // A second press (other button, lost up event) restarts sampling
                // from the new position instead of producing a jump.
                if let DragState::Dragging(session) = &mut self.state {
                    session.last_sample = position;
                    session.current = position;
                    return true;
                }
                if !self.enabled {
                    return false;
                }
                self.state = DragState::Dragging(DragSession {
                    last_sample: position,
                    current: position,
                });
                debug!(x = position.x, y = position.y, "Drag session started");
                true
            }
            PointerEvent::Move(position) => match &mut self.state {
                DragState::Dragging(session) => {
                    session.current = position;
                    true
                }
                DragState::Idle => false,
            },
            PointerEvent::Up(_) => {
                let ended = self.end_session();
                if ended {
                    debug!("Drag session ended");
                }
                ended
            }
        }
    }

    /// Delta accumulated since the previous sample, advancing the sample.
    /// `None` when no session is active.
    pub fn take_delta(&mut self) -> Option<Vec2> {
        match &mut self.state {
            DragState::Dragging(session) => {
                let delta = session.current - session.last_sample;
                session.last_sample = session.current;
                Some(delta)
            }
            DragState::Idle => None,
        }
    }

    fn end_session(&mut self) -> bool {
        std::mem::take(&mut self.state) != DragState::Idle
    }
}
