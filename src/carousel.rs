use std::time::{Duration, Instant};

use tracing::debug;

/// Which way a navigation request moves the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionKind {
    Direct,
    WrapForward,
    WrapBackward,
}

/// Timing knobs for slide transitions.
#[derive(Debug, Clone, Copy)]
pub struct CarouselTimings {
    /// Duration of an animated slide transition.
    pub transition: Duration,
    /// Pause at the strip boundary before a backward wrap lands.
    pub backward_settle: Duration,
}

impl Default for CarouselTimings {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(300),
            backward_settle: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: usize,
    to: usize,
    kind: TransitionKind,
    deadline: Instant,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle(usize),
    Animating(Transition),
}

/// Read-only snapshot for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    pub current_index: usize,
    pub is_animating: bool,
}

/// Slide-navigation state machine over a fixed, non-empty image sequence.
///
/// The controller never sleeps on its own: callers pass `now` into every
/// operation and drive the pending transition by sleeping until
/// [`CarouselController::next_deadline`] and then calling
/// [`CarouselController::tick`]. While a transition is in flight any further
/// navigation is rejected, so at most one resolution is ever pending.
///
/// Wraps are asymmetric because the strip has no slide beyond either end:
/// a forward wrap animates past the last slide for the full transition and
/// then snaps to slide 0; a backward wrap snaps to the strip boundary first
/// and lands on the last slide after a short settle delay.
#[derive(Debug)]
pub struct CarouselController {
    len: usize,
    state: State,
    timings: CarouselTimings,
    closed: bool,
}

impl CarouselController {
    /// Callers guarantee a non-empty sequence and an in-range start index;
    /// an empty gallery never constructs a controller.
    pub fn new(len: usize, initial_index: usize, timings: CarouselTimings) -> Self {
        assert!(len > 0, "carousel requires at least one slide");
        assert!(
            initial_index < len,
            "initial index {initial_index} outside 0..{len}"
        );
        Self {
            len,
            state: State::Idle(initial_index),
            timings,
            closed: false,
        }
    }

    /// Request the next slide. Returns false when the request is rejected
    /// (animation in flight or controller closed).
    pub fn next(&mut self, now: Instant) -> bool {
        self.navigate(Direction::Forward, now)
    }

    /// Request the previous slide. Same rejection rules as [`Self::next`].
    pub fn previous(&mut self, now: Instant) -> bool {
        self.navigate(Direction::Backward, now)
    }

    fn navigate(&mut self, direction: Direction, now: Instant) -> bool {
        if self.closed {
            debug!(?direction, "navigation after close ignored");
            return false;
        }
        let from = match self.state {
            State::Idle(index) => index,
            State::Animating(_) => {
                debug!(?direction, "navigation rejected while animating");
                return false;
            }
        };
        let (to, kind) = match direction {
            Direction::Forward => {
                let to = (from + 1) % self.len;
                let kind = if to == 0 {
                    TransitionKind::WrapForward
                } else {
                    TransitionKind::Direct
                };
                (to, kind)
            }
            Direction::Backward => {
                let to = (from + self.len - 1) % self.len;
                let kind = if to == self.len - 1 {
                    TransitionKind::WrapBackward
                } else {
                    TransitionKind::Direct
                };
                (to, kind)
            }
        };
        let deadline = now + self.wait_for(kind);
        self.state = State::Animating(Transition {
            from,
            to,
            kind,
            deadline,
        });
        true
    }

    /// Resolve the in-flight transition once its deadline has passed,
    /// returning the newly current index.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        if self.closed {
            return None;
        }
        let State::Animating(transition) = self.state else {
            return None;
        };
        if now < transition.deadline {
            return None;
        }
        self.state = State::Idle(transition.to);
        Some(transition.to)
    }

    /// When the pending transition resolves, if one is in flight.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.closed {
            return None;
        }
        match self.state {
            State::Animating(transition) => Some(transition.deadline),
            State::Idle(_) => None,
        }
    }

    /// Terminal: the host destroys the carousel view afterwards. A pending
    /// resolution is discarded.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The slide the strip is on or leaving; only advanced at resolution.
    pub fn current_index(&self) -> usize {
        match self.state {
            State::Idle(index) => index,
            State::Animating(transition) => transition.from,
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.closed && matches!(self.state, State::Animating(_))
    }

    /// Slide count; fixed for the controller's lifetime and never zero.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn snapshot(&self) -> CarouselState {
        CarouselState {
            current_index: self.current_index(),
            is_animating: self.is_animating(),
        }
    }

    /// Strip position in slide widths for a rendering surface.
    ///
    /// A forward wrap eases toward one past the last slide before the
    /// resolution snaps to 0; a backward wrap sits at the boundary position
    /// until it lands. The intermediate offsets are presentational only.
    pub fn visual_offset(&self, now: Instant) -> f32 {
        let transition = match self.state {
            State::Idle(index) => return index as f32,
            State::Animating(transition) => transition,
        };
        let target = match transition.kind {
            TransitionKind::Direct => transition.to as f32,
            TransitionKind::WrapForward => (transition.from + 1) as f32,
            TransitionKind::WrapBackward => return 0.0,
        };
        let total = self.wait_for(transition.kind);
        let remaining = transition.deadline.saturating_duration_since(now);
        let progress = if total.is_zero() {
            1.0
        } else {
            (1.0 - remaining.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
        };
        let start = transition.from as f32;
        start + (target - start) * ease_out(progress)
    }

    fn wait_for(&self, kind: TransitionKind) -> Duration {
        match kind {
            TransitionKind::WrapBackward => self.timings.backward_settle,
            _ => self.timings.transition,
        }
    }
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}
