use tracing::warn;

use super::timeline::Timeline;

/// How a pending timeline is played out. One mode, one dispatch point,
/// instead of handing three callbacks to every call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    #[default]
    Normal,
    Fast,
    Jump,
}

#[derive(Debug, Clone, Copy)]
pub struct SkipController {
    mode: PlaybackMode,
    fast_factor: f32,
}

impl SkipController {
    pub fn new(fast_factor: f32) -> Self {
        let fast_factor = if fast_factor.is_finite() && fast_factor >= 1.0 {
            fast_factor
        } else {
            warn!(fast_factor, "invalid fast factor; falling back to 1.0");
            1.0
        };
        Self {
            mode: PlaybackMode::Normal,
            fast_factor,
        }
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn fast_factor(&self) -> f32 {
        self.fast_factor
    }

    /// Fast playback never downgrades an already-latched jump.
    pub fn request_fast(&mut self) {
        if self.mode == PlaybackMode::Normal {
            self.mode = PlaybackMode::Fast;
        }
    }

    pub fn request_jump(&mut self) {
        self.mode = PlaybackMode::Jump;
    }

    pub fn reset(&mut self) {
        self.mode = PlaybackMode::Normal;
    }

    pub fn step<C: Clone>(&self, timeline: &mut Timeline<C>, dt_seconds: f32) -> Vec<C> {
        self.step_guarded(timeline, dt_seconds, true)
    }

    /// Drives one tick of playback. With `jump_allowed = false` a latched
    /// jump degrades to fast playback; callers use this while a state
    /// transition (for example an inner-to-outer carry fill) must not be
    /// collapsed into a single instant.
    pub fn step_guarded<C: Clone>(
        &self,
        timeline: &mut Timeline<C>,
        dt_seconds: f32,
        jump_allowed: bool,
    ) -> Vec<C> {
        match self.mode {
            PlaybackMode::Normal => timeline.advance(dt_seconds),
            PlaybackMode::Fast => timeline.advance(dt_seconds * self.fast_factor),
            PlaybackMode::Jump if jump_allowed => timeline.jump_to_end(),
            PlaybackMode::Jump => timeline.advance(dt_seconds * self.fast_factor),
        }
    }
}

/// Picks the normal or fast variant of a tunable, mirroring how every
/// duration in the presentation is authored as a (normal, fast) pair.
pub fn speed_mode(fast_play: bool, normal: f32, fast: f32) -> f32 {
    if fast_play {
        fast
    } else {
        normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_cue_timeline() -> Timeline<u32> {
        let mut timeline = Timeline::new();
        timeline.cue(0.0, 0).cue(1.0, 1).cue(2.0, 2);
        timeline
    }

    #[test]
    fn normal_mode_advances_by_dt() {
        let controller = SkipController::new(1.5);
        let mut timeline = three_cue_timeline();
        assert_eq!(controller.step(&mut timeline, 1.0), vec![0, 1]);
        assert!(!timeline.finished());
    }

    #[test]
    fn fast_mode_scales_dt() {
        let mut controller = SkipController::new(2.0);
        controller.request_fast();
        let mut timeline = three_cue_timeline();
        assert_eq!(controller.step(&mut timeline, 1.0), vec![0, 1, 2]);
        assert!(timeline.finished());
    }

    #[test]
    fn jump_completes_synchronously_in_order() {
        let mut controller = SkipController::new(1.5);
        controller.request_jump();
        let mut timeline = three_cue_timeline();
        assert_eq!(controller.step(&mut timeline, 0.001), vec![0, 1, 2]);
        assert!(timeline.finished());
    }

    #[test]
    fn guarded_jump_degrades_to_fast() {
        let mut controller = SkipController::new(1.5);
        controller.request_jump();
        let mut timeline = three_cue_timeline();
        let fired = controller.step_guarded(&mut timeline, 1.0, false);
        assert_eq!(fired, vec![0, 1]);
        assert!(!timeline.finished());
    }

    #[test]
    fn fast_request_does_not_downgrade_jump() {
        let mut controller = SkipController::new(1.5);
        controller.request_jump();
        controller.request_fast();
        assert_eq!(controller.mode(), PlaybackMode::Jump);
        controller.reset();
        assert_eq!(controller.mode(), PlaybackMode::Normal);
    }

    #[test]
    fn invalid_fast_factor_falls_back() {
        let controller = SkipController::new(0.2);
        assert_eq!(controller.fast_factor(), 1.0);
    }

    #[test]
    fn speed_mode_selects_pair_member() {
        assert_eq!(speed_mode(false, 1.0, 1.5), 1.0);
        assert_eq!(speed_mode(true, 1.0, 1.5), 1.5);
    }
}
