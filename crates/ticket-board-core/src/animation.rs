//! Per-tile animation state machines.
//!
//! A tile is either resting, sliding toward its slot or fading away. The
//! machines only move when [`TileAnimation::tick`] is called by the display's
//! central driver; each animation reports its completion exactly once.

use serde::{Deserialize, Serialize};

use crate::config::AnimationConfig;

/// Position in display units (terminal cells for the bundled host).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Point {
    /// Build a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// 8-bit colour with straight alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque white, the resting tile fill.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black, the resting number colour.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Build a colour.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Coarse animation phase of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Resting in its slot.
    Idle,
    /// Moving from its start point toward its slot.
    SlidingIn,
    /// Fading toward transparent.
    FadingOut,
    /// Fade finished; the tile must be detached.
    Removed,
}

/// What a finished animation asks its owner to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The slide reached its target; the tile rests in its slot.
    Arrived,
    /// The fade finished; the tile should be detached.
    Faded,
}

#[derive(Clone, Debug, PartialEq)]
struct Slide {
    start: Point,
    position: Point,
    target: Point,
}

impl Slide {
    fn advance(&mut self, config: &AnimationConfig) -> bool {
        let dx = self.target.x - self.position.x;
        let dy = self.target.y - self.position.y;
        if dx.abs() <= config.settle_threshold && dy.abs() <= config.settle_threshold {
            self.position = self.target;
            return true;
        }
        let rate = config.slide_speed / config.slide_divisor;
        self.position.x += rate * dx;
        self.position.y += rate * dy * config.vertical_damping;
        false
    }

    fn progress(&self) -> f64 {
        let total = self.start.distance_to(self.target);
        if total <= f64::EPSILON {
            return 1.0;
        }
        (1.0 - self.position.distance_to(self.target) / total).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Fade {
    step: u8,
    initial_floor: u8,
}

impl Fade {
    fn new(fill: Rgba, iterations: u8) -> Self {
        Self {
            step: u8::MAX / iterations.max(1),
            initial_floor: fade_floor(fill),
        }
    }

    fn advance(&self, fill: &mut Rgba, text: &mut Rgba) -> bool {
        if fade_floor(*fill) <= self.step {
            return true;
        }
        // Green is left alone so the tile drifts toward green as it fades.
        fill.r -= self.step;
        fill.b -= self.step;
        fill.a -= self.step;
        text.a = text.a.saturating_sub(self.step);
        false
    }

    fn progress(&self, fill: Rgba) -> f64 {
        if self.initial_floor == 0 {
            return 1.0;
        }
        let left = f64::from(fade_floor(fill)) / f64::from(self.initial_floor);
        (1.0 - left).clamp(0.0, 1.0)
    }
}

fn fade_floor(fill: Rgba) -> u8 {
    fill.r.min(fill.b).min(fill.a)
}

#[derive(Clone, Debug, PartialEq)]
enum State {
    Idle,
    SlidingIn(Slide),
    FadingOut(Fade),
    Removed,
}

/// Animation state machine and current colours of one tile.
///
/// Transitions: `Idle -> SlidingIn -> Idle` and `Idle -> FadingOut ->
/// Removed`. A started animation cannot be cancelled.
#[derive(Clone, Debug, PartialEq)]
pub struct TileAnimation {
    state: State,
    fill: Rgba,
    text: Rgba,
}

impl Default for TileAnimation {
    fn default() -> Self {
        Self::idle()
    }
}

impl TileAnimation {
    /// A resting tile in the default colours.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            state: State::Idle,
            fill: Rgba::WHITE,
            text: Rgba::BLACK,
        }
    }

    /// A tile already sliding from `from` toward `to`.
    #[must_use]
    pub fn sliding(from: Point, to: Point) -> Self {
        let mut animation = Self::idle();
        animation.start_slide(from, to);
        animation
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::SlidingIn(_) => Phase::SlidingIn,
            State::FadingOut(_) => Phase::FadingOut,
            State::Removed => Phase::Removed,
        }
    }

    /// Whether any animation is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        matches!(self.state, State::SlidingIn(_) | State::FadingOut(_))
    }

    /// Begin sliding. Only legal from `Idle`; returns whether it started.
    pub fn start_slide(&mut self, from: Point, to: Point) -> bool {
        if self.state != State::Idle {
            return false;
        }
        self.state = State::SlidingIn(Slide {
            start: from,
            position: from,
            target: to,
        });
        true
    }

    /// Begin fading. Only legal from `Idle`; returns whether it started.
    pub fn start_fade(&mut self, iterations: u8) -> bool {
        if self.state != State::Idle {
            return false;
        }
        self.state = State::FadingOut(Fade::new(self.fill, iterations));
        true
    }

    /// Point a running slide at a new destination (the slot moved).
    pub fn retarget(&mut self, to: Point) {
        if let State::SlidingIn(slide) = &mut self.state {
            slide.target = to;
        }
    }

    /// Advance one tick. Returns the completion on the tick it happens.
    pub fn tick(&mut self, config: &AnimationConfig) -> Option<Completion> {
        match &mut self.state {
            State::SlidingIn(slide) => {
                if slide.advance(config) {
                    self.state = State::Idle;
                    return Some(Completion::Arrived);
                }
                None
            }
            State::FadingOut(fade) => {
                if fade.advance(&mut self.fill, &mut self.text) {
                    self.state = State::Removed;
                    return Some(Completion::Faded);
                }
                None
            }
            State::Idle | State::Removed => None,
        }
    }

    /// Where to draw the tile: the slide position while sliding, else
    /// `resting`.
    #[must_use]
    pub const fn position_or(&self, resting: Point) -> Point {
        match &self.state {
            State::SlidingIn(slide) => slide.position,
            _ => resting,
        }
    }

    /// Destination of a running slide.
    #[must_use]
    pub const fn target(&self) -> Option<Point> {
        match &self.state {
            State::SlidingIn(slide) => Some(slide.target),
            _ => None,
        }
    }

    /// Completion fraction of the running animation, `1.0` when none runs.
    #[must_use]
    pub fn progress(&self) -> f64 {
        match &self.state {
            State::SlidingIn(slide) => slide.progress(),
            State::FadingOut(fade) => fade.progress(self.fill),
            State::Idle | State::Removed => 1.0,
        }
    }

    /// Current tile fill.
    #[must_use]
    pub const fn fill(&self) -> Rgba {
        self.fill
    }

    /// Current number colour.
    #[must_use]
    pub const fn text(&self) -> Rgba {
        self.text
    }
}
