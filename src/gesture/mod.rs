//! Swipe/scroll disambiguation for the review card.
//!
//! The engine consumes a stream of pointer coordinates (press, drags,
//! release) and classifies each gesture exactly once as a card swipe or a
//! content scroll. It is a pure classifier: no terminal handles, no timers,
//! no callbacks. Rendering is a downstream concern driven by the frames and
//! outcomes returned here, so the classification rules are testable by
//! feeding synthetic coordinate sequences.

/// A pointer position in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// What the active gesture has been classified as.
///
/// Set exactly once per gesture and immutable for its remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Undetermined,
    Swipe,
    Scroll,
}

/// Horizontal swipe direction, by sign of dx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Approve,
    Reject,
}

/// Tuning constants. Presentation tuning, not behavioral contracts: any
/// values here satisfy the engine's invariants.
#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    /// Movement below this (on both axes) is still a tap; nothing is
    /// classified yet.
    pub scroll_threshold: f32,
    /// Commit threshold as a fraction of the viewport width.
    pub commit_fraction: f32,
    /// Absolute cap on the commit threshold, so very wide viewports stay
    /// usable.
    pub commit_max: f32,
    /// |dx| below this keeps both indicators at zero.
    pub deadzone: f32,
    /// Card tilt per unit of horizontal travel.
    pub rotation_per_unit: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 15.0,
            commit_fraction: 0.35,
            commit_max: 200.0,
            deadzone: 12.0,
            rotation_per_unit: 0.05,
        }
    }
}

/// Visual state of the card for one swipe move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeFrame {
    /// Horizontal travel since gesture start.
    pub dx: f32,
    /// Horizontal card translation; always equals `dx`.
    pub translation: f32,
    /// Card tilt, monotonic in `dx`.
    pub rotation: f32,
    /// Approve indicator opacity in [0, 1]; nonzero only when `dx` clears
    /// the deadzone to the right.
    pub approve: f32,
    /// Reject indicator opacity, symmetric to `approve`. At most one of the
    /// two is nonzero.
    pub reject: f32,
}

/// Response to a single move event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveFrame {
    /// Not enough movement to classify, or no gesture active. No transform,
    /// and default handling must not be suppressed.
    Pending,
    /// The gesture belongs to native content scrolling; the engine is inert
    /// for its remainder.
    Scroll,
    /// Active swipe. The caller suppresses default handling for this and all
    /// following moves of the gesture and applies the frame.
    Swipe(SwipeFrame),
}

/// Terminal result of a gesture at release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tap or scroll: the card never moved, so there is nothing to settle.
    /// Falls through to ordinary click/scroll handling.
    Pass,
    /// Swipe released under the commit threshold: snap the card back to rest
    /// and zero both indicators.
    Cancel,
    /// Swipe released past the commit threshold.
    Commit(SwipeDirection),
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    origin: Point,
    current: Point,
    intent: Intent,
    on_scrollable: bool,
}

/// One card's gesture classifier.
///
/// Owns no event listeners or handles; dropping it mid-gesture (e.g. when
/// the card under it is replaced) is safe, and a fresh engine behaves
/// identically.
#[derive(Debug)]
pub struct GestureEngine {
    config: GestureConfig,
    viewport_width: f32,
    gesture: Option<ActiveGesture>,
}

impl GestureEngine {
    pub fn new(config: GestureConfig, viewport_width: f32) -> Self {
        Self {
            config,
            viewport_width,
            gesture: None,
        }
    }

    /// Update the viewport width (terminal resize). Affects only the commit
    /// threshold evaluated at release.
    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    /// Effective commit threshold: a fraction of the viewport width, capped.
    pub fn commit_threshold(&self) -> f32 {
        self.config
            .commit_max
            .min(self.config.commit_fraction * self.viewport_width)
    }

    /// Intent of the active gesture, if one is in progress.
    pub fn intent(&self) -> Option<Intent> {
        self.gesture.map(|g| g.intent)
    }

    /// True while a classified swipe is in progress.
    pub fn is_swiping(&self) -> bool {
        self.intent() == Some(Intent::Swipe)
    }

    /// Begin a gesture. Bookkeeping only: intent is unknown, so no default
    /// handling may be suppressed yet.
    pub fn on_start(&mut self, point: Point, on_scrollable: bool) {
        self.gesture = Some(ActiveGesture {
            origin: point,
            current: point,
            intent: Intent::Undetermined,
            on_scrollable,
        });
    }

    /// Feed a move event and get the card's visual response.
    pub fn on_move(&mut self, point: Point) -> MoveFrame {
        let config = self.config;
        let threshold = self.commit_threshold();
        let Some(gesture) = self.gesture.as_mut() else {
            return MoveFrame::Pending;
        };

        gesture.current = point;
        let dx = point.x - gesture.origin.x;
        let dy = point.y - gesture.origin.y;

        if gesture.intent == Intent::Undetermined {
            if dx.abs().max(dy.abs()) < config.scroll_threshold {
                return MoveFrame::Pending;
            }
            // The one classification per gesture. Vertical dominance hands
            // the gesture to native scrolling only when it started on the
            // scrollable region; horizontal dominance always wins.
            gesture.intent = if dy.abs() > dx.abs() && gesture.on_scrollable {
                Intent::Scroll
            } else {
                Intent::Swipe
            };
        }

        match gesture.intent {
            Intent::Scroll => MoveFrame::Scroll,
            Intent::Swipe => MoveFrame::Swipe(swipe_frame(dx, threshold, &config)),
            Intent::Undetermined => MoveFrame::Pending,
        }
    }

    /// End the gesture and reset for the next one.
    pub fn on_end(&mut self) -> Outcome {
        let Some(gesture) = self.gesture.take() else {
            return Outcome::Pass;
        };

        match gesture.intent {
            Intent::Undetermined | Intent::Scroll => Outcome::Pass,
            Intent::Swipe => {
                let dx = gesture.current.x - gesture.origin.x;
                if dx.abs() > self.commit_threshold() {
                    if dx > 0.0 {
                        Outcome::Commit(SwipeDirection::Approve)
                    } else {
                        Outcome::Commit(SwipeDirection::Reject)
                    }
                } else {
                    Outcome::Cancel
                }
            }
        }
    }

    /// Abandon the active gesture without settling it (pointer cancel).
    pub fn reset(&mut self) {
        self.gesture = None;
    }
}

fn swipe_frame(dx: f32, commit_threshold: f32, config: &GestureConfig) -> SwipeFrame {
    let progress = (dx.abs() / commit_threshold).clamp(0.0, 1.0);
    let (approve, reject) = if dx > config.deadzone {
        (progress, 0.0)
    } else if dx < -config.deadzone {
        (0.0, progress)
    } else {
        (0.0, 0.0)
    };

    SwipeFrame {
        dx,
        translation: dx,
        rotation: dx * config.rotation_per_unit,
        approve,
        reject,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GestureEngine {
        // Viewport of 600 units: commit threshold = min(200, 0.35 * 600) = 200.
        GestureEngine::new(GestureConfig::default(), 600.0)
    }

    #[test]
    fn sub_threshold_gesture_is_a_tap() {
        let mut e = engine();
        e.on_start(Point::new(100.0, 100.0), false);
        assert_eq!(e.on_move(Point::new(105.0, 103.0)), MoveFrame::Pending);
        assert_eq!(e.on_move(Point::new(110.0, 95.0)), MoveFrame::Pending);
        assert_eq!(e.on_end(), Outcome::Pass);
    }

    #[test]
    fn horizontal_movement_classifies_swipe() {
        let mut e = engine();
        e.on_start(Point::new(100.0, 100.0), false);
        match e.on_move(Point::new(130.0, 105.0)) {
            MoveFrame::Swipe(frame) => {
                assert_eq!(frame.dx, 30.0);
                assert_eq!(frame.translation, 30.0);
            }
            other => panic!("expected swipe frame, got {other:?}"),
        }
        assert_eq!(e.intent(), Some(Intent::Swipe));
    }

    #[test]
    fn vertical_movement_on_scrollable_region_classifies_scroll() {
        // Scenario C: dy reaches -40 while dx stays at 5, started inside the
        // scrollable region.
        let mut e = engine();
        e.on_start(Point::new(100.0, 100.0), true);
        assert_eq!(e.on_move(Point::new(105.0, 60.0)), MoveFrame::Scroll);
        assert_eq!(e.intent(), Some(Intent::Scroll));

        // Subsequent dx growth is ignored; the engine stays inert.
        assert_eq!(e.on_move(Point::new(400.0, 60.0)), MoveFrame::Scroll);
        assert_eq!(e.on_end(), Outcome::Pass);
    }

    #[test]
    fn vertical_movement_outside_scrollable_region_still_swipes() {
        // The region flag is only a tiebreaker for vertical dominance.
        let mut e = engine();
        e.on_start(Point::new(100.0, 100.0), false);
        assert!(matches!(
            e.on_move(Point::new(102.0, 140.0)),
            MoveFrame::Swipe(_)
        ));
    }

    #[test]
    fn horizontal_dominance_wins_inside_scrollable_region() {
        let mut e = engine();
        e.on_start(Point::new(100.0, 100.0), true);
        assert!(matches!(
            e.on_move(Point::new(140.0, 110.0)),
            MoveFrame::Swipe(_)
        ));
    }

    #[test]
    fn intent_never_changes_mid_gesture() {
        let mut e = engine();
        e.on_start(Point::new(100.0, 100.0), true);
        assert!(matches!(
            e.on_move(Point::new(140.0, 100.0)),
            MoveFrame::Swipe(_)
        ));
        // A later vertically-dominant position must not reclassify.
        assert!(matches!(
            e.on_move(Point::new(110.0, 300.0)),
            MoveFrame::Swipe(_)
        ));
        assert_eq!(e.intent(), Some(Intent::Swipe));
    }

    #[test]
    fn commit_approve_past_threshold() {
        // Scenario A: dx moves from 0 to +220 with a 200-unit threshold.
        let mut e = engine();
        e.on_start(Point::new(0.0, 0.0), false);
        for dx in [40.0, 120.0, 220.0] {
            assert!(matches!(
                e.on_move(Point::new(dx, 0.0)),
                MoveFrame::Swipe(_)
            ));
        }
        assert_eq!(e.on_end(), Outcome::Commit(SwipeDirection::Approve));
        // The gesture is fully reset; a stray release settles nothing.
        assert_eq!(e.on_end(), Outcome::Pass);
    }

    #[test]
    fn release_under_threshold_cancels() {
        // Scenario B: dx reaches +150 then returns to +40 at release.
        let mut e = engine();
        e.on_start(Point::new(0.0, 0.0), false);
        e.on_move(Point::new(150.0, 0.0));
        e.on_move(Point::new(40.0, 0.0));
        assert_eq!(e.on_end(), Outcome::Cancel);
    }

    #[test]
    fn commit_reject_on_leftward_release() {
        let mut e = engine();
        e.on_start(Point::new(300.0, 0.0), false);
        e.on_move(Point::new(50.0, 0.0));
        assert_eq!(e.on_end(), Outcome::Commit(SwipeDirection::Reject));
    }

    #[test]
    fn translation_tracks_dx_and_rotation_is_monotonic() {
        let mut e = engine();
        e.on_start(Point::new(0.0, 0.0), false);
        let mut last_rotation = f32::MIN;
        for dx in [20.0, 60.0, 110.0, 180.0] {
            match e.on_move(Point::new(dx, 0.0)) {
                MoveFrame::Swipe(frame) => {
                    assert_eq!(frame.translation, dx);
                    assert!(frame.rotation > last_rotation);
                    last_rotation = frame.rotation;
                }
                other => panic!("expected swipe frame, got {other:?}"),
            }
        }
    }

    #[test]
    fn at_most_one_indicator_nonzero() {
        let mut e = engine();
        e.on_start(Point::new(300.0, 0.0), false);

        let MoveFrame::Swipe(right) = e.on_move(Point::new(400.0, 0.0)) else {
            panic!("expected swipe");
        };
        assert!(right.approve > 0.0);
        assert_eq!(right.reject, 0.0);

        let MoveFrame::Swipe(left) = e.on_move(Point::new(150.0, 0.0)) else {
            panic!("expected swipe");
        };
        assert_eq!(left.approve, 0.0);
        assert!(left.reject > 0.0);

        // Inside the deadzone both stay dark.
        let MoveFrame::Swipe(rest) = e.on_move(Point::new(305.0, 0.0)) else {
            panic!("expected swipe");
        };
        assert_eq!((rest.approve, rest.reject), (0.0, 0.0));
    }

    #[test]
    fn indicator_saturates_at_commit_threshold() {
        let mut e = engine();
        e.on_start(Point::new(0.0, 0.0), false);
        let MoveFrame::Swipe(frame) = e.on_move(Point::new(500.0, 0.0)) else {
            panic!("expected swipe");
        };
        assert_eq!(frame.approve, 1.0);
    }

    #[test]
    fn commit_threshold_caps_on_wide_viewports() {
        let e = GestureEngine::new(GestureConfig::default(), 2000.0);
        assert_eq!(e.commit_threshold(), 200.0);

        let narrow = GestureEngine::new(GestureConfig::default(), 400.0);
        assert_eq!(narrow.commit_threshold(), 140.0);
    }

    #[test]
    fn move_without_start_is_ignored() {
        let mut e = engine();
        assert_eq!(e.on_move(Point::new(500.0, 0.0)), MoveFrame::Pending);
        assert_eq!(e.on_end(), Outcome::Pass);
    }

    #[test]
    fn reset_abandons_active_swipe() {
        let mut e = engine();
        e.on_start(Point::new(0.0, 0.0), false);
        e.on_move(Point::new(300.0, 0.0));
        e.reset();
        assert_eq!(e.on_end(), Outcome::Pass);
    }
}
