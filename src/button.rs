// Timings in seconds.
pub(crate) const ENTER_SECS: f32 = 0.25;
pub(crate) const SHAKE_COUNT: u32 = 5;
pub(crate) const BREATH_SECS: f32 = 0.5;
pub(crate) const BREATH_MIN: f32 = 0.95;
pub(crate) const BREATH_MAX: f32 = 1.05;
pub(crate) const PRESS_SECS: f32 = 0.1;
pub(crate) const PRESS_SCALE: f32 = 0.9;
pub(crate) const PRESS_DIM: f32 = 0.5;
pub(crate) const BOUNCE_LEG_SECS: f32 = 0.07;
pub(crate) const BOUNCE_COUNT: usize = 3;
pub(crate) const RELEASE_MIN: f32 = 0.95;
pub(crate) const RELEASE_MAX: f32 = 1.05;
pub(crate) const DIM_RESTORE_SECS: f32 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Scale {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Scale {
    pub(crate) const ZERO: Scale = Scale { x: 0.0, y: 0.0 };
    pub(crate) const ONE: Scale = Scale { x: 1.0, y: 1.0 };

    fn lerp(self, to: Scale, k: f32) -> Scale {
        Scale {
            x: lerp(self.x, to.x, k),
            y: lerp(self.y, to.y, k),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ButtonState {
    Idle,
    Entering {
        t: f32,
    },
    Breathing,
    Pressed {
        t: f32,
        from: Scale,
        from_dim: f32,
        auto_release: bool,
    },
    Releasing {
        t: f32,
        from: Scale,
        from_dim: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ButtonEvent {
    Clicked,
}

/// The play button's look over time. Presses only register once the
/// entrance has finished; the breathing loop pauses while pressed and
/// resumes where it stopped.
#[derive(Clone, Debug)]
pub(crate) struct PlayButton {
    state: ButtonState,
    breath_t: f32,
    scale: Scale,
    dim: f32,
    shake: i16,
}

impl PlayButton {
    pub(crate) fn new() -> Self {
        Self {
            state: ButtonState::Idle,
            // start mid-way up so breathing begins at scale 1
            breath_t: BREATH_SECS / 4.0,
            scale: Scale::ZERO,
            dim: 1.0,
            shake: 0,
        }
    }

    pub(crate) fn state(&self) -> ButtonState {
        self.state
    }
    pub(crate) fn scale(&self) -> Scale {
        self.scale
    }
    /// 1.0 = full brightness.
    pub(crate) fn dim(&self) -> f32 {
        self.dim
    }
    /// Horizontal jitter in cells while entering.
    pub(crate) fn shake(&self) -> i16 {
        self.shake
    }

    pub(crate) fn appear(&mut self) {
        if self.state == ButtonState::Idle {
            self.state = ButtonState::Entering { t: 0.0 };
        }
    }

    /// Returns false when the press was ignored.
    pub(crate) fn press(&mut self, auto_release: bool) -> bool {
        match self.state {
            ButtonState::Breathing | ButtonState::Releasing { .. } => {
                self.state = ButtonState::Pressed {
                    t: 0.0,
                    from: self.scale,
                    from_dim: self.dim,
                    auto_release,
                };
                true
            }
            _ => false,
        }
    }

    /// End a press. A cancelled press still plays the release bounce but
    /// does not click.
    pub(crate) fn release(&mut self, cancelled: bool) -> Option<ButtonEvent> {
        if !matches!(self.state, ButtonState::Pressed { .. }) {
            return None;
        }
        self.state = ButtonState::Releasing {
            t: 0.0,
            from: self.scale,
            from_dim: self.dim,
        };
        if cancelled {
            None
        } else {
            Some(ButtonEvent::Clicked)
        }
    }

    pub(crate) fn tick(&mut self, dt: f32) -> Option<ButtonEvent> {
        match self.state {
            ButtonState::Idle => None,
            ButtonState::Entering { t } => {
                let t = t + dt;
                let k = (t / ENTER_SECS).min(1.0);
                self.scale = Scale::ZERO.lerp(Scale::ONE, k);
                if t >= ENTER_SECS {
                    self.shake = 0;
                    self.scale = breath_scale(self.breath_t);
                    self.state = ButtonState::Breathing;
                } else {
                    let leg = ENTER_SECS / (2 * SHAKE_COUNT) as f32;
                    self.shake = if ((t / leg) as u32) % 2 == 0 { 1 } else { -1 };
                    self.state = ButtonState::Entering { t };
                }
                None
            }
            ButtonState::Breathing => {
                self.breath_t = (self.breath_t + dt) % BREATH_SECS;
                self.scale = breath_scale(self.breath_t);
                None
            }
            ButtonState::Pressed {
                t,
                from,
                from_dim,
                auto_release,
            } => {
                let t = t + dt;
                let k = (t / PRESS_SECS).min(1.0);
                let target = Scale {
                    x: PRESS_SCALE,
                    y: PRESS_SCALE,
                };
                self.scale = from.lerp(target, k);
                self.dim = lerp(from_dim, PRESS_DIM, k);
                self.state = ButtonState::Pressed {
                    t,
                    from,
                    from_dim,
                    auto_release,
                };
                if auto_release && t >= PRESS_SECS {
                    self.release(false)
                } else {
                    None
                }
            }
            ButtonState::Releasing { t, from, from_dim } => {
                let t = t + dt;
                self.dim = lerp(from_dim, 1.0, (t / DIM_RESTORE_SECS).min(1.0));
                if t >= release_secs() {
                    self.dim = 1.0;
                    self.scale = breath_scale(self.breath_t);
                    self.state = ButtonState::Breathing;
                } else {
                    self.scale = release_scale(from, t);
                    self.state = ButtonState::Releasing { t, from, from_dim };
                }
                None
            }
        }
    }
}

fn lerp(a: f32, b: f32, k: f32) -> f32 {
    a + (b - a) * k
}

/// Triangle wave min -> max -> min over one breath; only the width breathes.
fn breath_scale(t: f32) -> Scale {
    let half = BREATH_SECS / 2.0;
    let x = if t < half {
        lerp(BREATH_MIN, BREATH_MAX, t / half)
    } else {
        lerp(BREATH_MAX, BREATH_MIN, (t - half) / half)
    };
    Scale { x, y: 1.0 }
}

/// Scale reached at the end of each bounce leg after letting go.
const RELEASE_TARGETS: [f32; 2 * BOUNCE_COUNT + 2] = [
    RELEASE_MAX,
    RELEASE_MIN,
    RELEASE_MAX,
    RELEASE_MIN,
    RELEASE_MAX,
    RELEASE_MIN,
    RELEASE_MAX,
    1.0,
];

pub(crate) fn release_secs() -> f32 {
    RELEASE_TARGETS.len() as f32 * BOUNCE_LEG_SECS
}

/// Bounce position `t` seconds after letting go; holds the last target past the end.
fn release_scale(from: Scale, t: f32) -> Scale {
    let targets = &RELEASE_TARGETS;
    let leg = ((t / BOUNCE_LEG_SECS) as usize).min(targets.len() - 1);
    let start = if leg == 0 {
        from
    } else {
        Scale {
            x: targets[leg - 1],
            y: targets[leg - 1],
        }
    };
    let to = Scale {
        x: targets[leg],
        y: targets[leg],
    };
    let k = ((t - leg as f32 * BOUNCE_LEG_SECS) / BOUNCE_LEG_SECS).min(1.0);
    start.lerp(to, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breathing() -> PlayButton {
        let mut b = PlayButton::new();
        b.appear();
        b.tick(ENTER_SECS + 0.01);
        assert_eq!(b.state(), ButtonState::Breathing);
        b
    }

    fn run(b: &mut PlayButton, secs: f32) -> Vec<ButtonEvent> {
        let mut out = Vec::new();
        let mut left = secs;
        while left > 0.0 {
            out.extend(b.tick(0.01));
            left -= 0.01;
        }
        out
    }

    #[test]
    fn hidden_until_it_appears() {
        let mut b = PlayButton::new();
        assert_eq!(b.scale(), Scale::ZERO);
        b.tick(1.0);
        assert_eq!(b.state(), ButtonState::Idle);
        assert!(!b.press(false));
    }

    #[test]
    fn entering_grows_and_shakes_then_breathes() {
        let mut b = PlayButton::new();
        b.appear();
        b.tick(ENTER_SECS / 2.0);
        assert!(matches!(b.state(), ButtonState::Entering { .. }));
        assert!((b.scale().x - 0.5).abs() < 1e-4);
        assert_ne!(b.shake(), 0);
        assert!(!b.press(false));

        b.tick(ENTER_SECS);
        assert_eq!(b.state(), ButtonState::Breathing);
        assert_eq!(b.shake(), 0);
        assert!((b.scale().x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn breathing_stays_in_range() {
        let mut b = breathing();
        for _ in 0..200 {
            b.tick(0.013);
            let s = b.scale();
            assert!(s.x >= BREATH_MIN - 1e-4 && s.x <= BREATH_MAX + 1e-4);
            assert_eq!(s.y, 1.0);
        }
    }

    #[test]
    fn press_dims_and_shrinks_then_release_clicks() {
        let mut b = breathing();
        assert!(b.press(false));
        assert!(!b.press(false));
        run(&mut b, PRESS_SECS + 0.05);
        assert!((b.scale().x - PRESS_SCALE).abs() < 1e-4);
        assert!((b.dim() - PRESS_DIM).abs() < 1e-4);

        assert_eq!(b.release(false), Some(ButtonEvent::Clicked));
        assert!(matches!(b.state(), ButtonState::Releasing { .. }));
        run(&mut b, release_secs() + 0.05);
        assert_eq!(b.state(), ButtonState::Breathing);
        assert_eq!(b.dim(), 1.0);
    }

    #[test]
    fn cancel_does_not_click() {
        let mut b = breathing();
        b.press(false);
        assert_eq!(b.release(true), None);
        assert!(matches!(b.state(), ButtonState::Releasing { .. }));
        assert_eq!(b.release(false), None);
    }

    #[test]
    fn auto_release_clicks_once() {
        let mut b = breathing();
        b.press(true);
        let events = run(&mut b, PRESS_SECS + release_secs() + 0.1);
        assert_eq!(events, vec![ButtonEvent::Clicked]);
        assert_eq!(b.state(), ButtonState::Breathing);
    }

    #[test]
    fn press_during_release_restarts() {
        let mut b = breathing();
        b.press(false);
        b.release(false);
        b.tick(0.1);
        assert!(b.press(false));
        assert!(matches!(b.state(), ButtonState::Pressed { .. }));
    }

    #[test]
    fn breathing_resumes_where_it_paused() {
        let mut b = breathing();
        b.tick(0.1);
        let paused_at = b.scale();
        b.press(false);
        run(&mut b, 0.2);
        b.release(true);
        b.tick(release_secs() + 0.02);
        assert_eq!(b.state(), ButtonState::Breathing);
        assert!((b.scale().x - paused_at.x).abs() < 1e-4);
    }

    #[test]
    fn release_bounce_length() {
        assert!((release_secs() - 0.56).abs() < 1e-5);
        let from = Scale { x: 0.9, y: 0.9 };
        assert_eq!(release_scale(from, 0.0), from);
        let peak = release_scale(from, BOUNCE_LEG_SECS);
        assert!((peak.x - RELEASE_MAX).abs() < 1e-4);
        assert!((release_scale(from, 0.6).x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn release_targets_alternate_then_settle() {
        assert_eq!(RELEASE_TARGETS.len(), 8);
        for pair in RELEASE_TARGETS[..RELEASE_TARGETS.len() - 1].windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(RELEASE_TARGETS[RELEASE_TARGETS.len() - 1], 1.0);
        let trough = release_scale(Scale::ONE, 2.0 * BOUNCE_LEG_SECS);
        assert!((trough.x - RELEASE_MIN).abs() < 1e-4);
    }
}
