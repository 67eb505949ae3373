use thiserror::Error;
use tracing::{debug, info, warn};

use super::audio::AudioBus;
use super::metrics::{MetricsHandle, MetricsRecorder};
use super::scene::{PlayerInput, Scene, SceneCommand, SceneKey};

#[derive(Debug, Clone, Copy)]
pub struct SequencerConfig {
    pub fixed_dt_seconds: f32,
    pub max_ticks_per_round: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            fixed_dt_seconds: 1.0 / 60.0,
            max_ticks_per_round: 120_000,
        }
    }
}

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("fixed_dt_seconds must be finite and > 0, got {0}")]
    InvalidFixedDt(f32),
    #[error("max_ticks_per_round must be > 0")]
    InvalidTickBound,
    #[error("scene stalled: still busy after {ticks} ticks ({seconds:.1}s of fixed-dt time)")]
    SceneStalled { ticks: u32, seconds: f32 },
}

/// Headless fixed-dt driver for a presentation scene. There is no render
/// pass and no wall clock: one call steps the scene until its round
/// sequence returns to idle or the tick bound trips.
pub struct Sequencer {
    config: SequencerConfig,
    recorder: MetricsRecorder,
    handle: MetricsHandle,
    current_key: SceneKey,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Result<Self, SequencerError> {
        if !config.fixed_dt_seconds.is_finite() || config.fixed_dt_seconds <= 0.0 {
            return Err(SequencerError::InvalidFixedDt(config.fixed_dt_seconds));
        }
        if config.max_ticks_per_round == 0 {
            return Err(SequencerError::InvalidTickBound);
        }
        Ok(Self {
            config,
            recorder: MetricsRecorder::default(),
            handle: MetricsHandle::default(),
            current_key: SceneKey::Regular,
        })
    }

    pub fn metrics(&self) -> MetricsHandle {
        self.handle.clone()
    }

    pub fn current_key(&self) -> SceneKey {
        self.current_key
    }

    /// Steps the scene until it reports idle. Returns the tick count spent.
    pub fn run_until_idle(
        &mut self,
        scene: &mut dyn Scene,
        input: &PlayerInput,
        audio: &mut AudioBus,
    ) -> Result<u32, SequencerError> {
        let mut ticks = 0u32;
        while !scene.is_idle() {
            if ticks >= self.config.max_ticks_per_round {
                self.recorder.record_stall(ticks);
                self.handle.publish(self.recorder.snapshot());
                warn!(
                    ticks,
                    title = %scene.debug_title().unwrap_or_default(),
                    "scene stalled; aborting round"
                );
                return Err(SequencerError::SceneStalled {
                    ticks,
                    seconds: ticks as f32 * self.config.fixed_dt_seconds,
                });
            }

            let command = scene.update(self.config.fixed_dt_seconds, input, audio);
            ticks = ticks.saturating_add(1);

            if let SceneCommand::SwitchTo(key) = command {
                if key != self.current_key {
                    info!(
                        from = self.current_key.as_token(),
                        to = key.as_token(),
                        "scene_switched"
                    );
                    self.current_key = key;
                    self.recorder.record_scene_switch();
                }
            }
        }

        self.recorder.record_round(ticks);
        self.handle.publish(self.recorder.snapshot());
        debug!(ticks, "round_sequence_idle");
        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountdownScene {
        remaining: u32,
        switch_on_last: Option<SceneKey>,
    }

    impl Scene for CountdownScene {
        fn load(&mut self, _audio: &mut AudioBus) {}

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            _input: &PlayerInput,
            _audio: &mut AudioBus,
        ) -> SceneCommand {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                if let Some(key) = self.switch_on_last {
                    return SceneCommand::SwitchTo(key);
                }
            }
            SceneCommand::None
        }

        fn unload(&mut self, _audio: &mut AudioBus) {}

        fn is_idle(&self) -> bool {
            self.remaining == 0
        }
    }

    struct NeverIdleScene;

    impl Scene for NeverIdleScene {
        fn load(&mut self, _audio: &mut AudioBus) {}

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            _input: &PlayerInput,
            _audio: &mut AudioBus,
        ) -> SceneCommand {
            SceneCommand::None
        }

        fn unload(&mut self, _audio: &mut AudioBus) {}

        fn is_idle(&self) -> bool {
            false
        }
    }

    #[test]
    fn runs_scene_to_idle_and_counts_ticks() {
        let mut sequencer = Sequencer::new(SequencerConfig::default()).expect("sequencer");
        let mut scene = CountdownScene {
            remaining: 7,
            switch_on_last: None,
        };
        let mut audio = AudioBus::default();
        let ticks = sequencer
            .run_until_idle(&mut scene, &PlayerInput::empty(), &mut audio)
            .expect("run");
        assert_eq!(ticks, 7);
        assert_eq!(sequencer.metrics().snapshot().rounds_completed, 1);
        assert_eq!(sequencer.metrics().snapshot().ticks_total, 7);
    }

    #[test]
    fn records_scene_switch_once_per_transition() {
        let mut sequencer = Sequencer::new(SequencerConfig::default()).expect("sequencer");
        let mut scene = CountdownScene {
            remaining: 3,
            switch_on_last: Some(SceneKey::Bonus),
        };
        let mut audio = AudioBus::default();
        sequencer
            .run_until_idle(&mut scene, &PlayerInput::empty(), &mut audio)
            .expect("run");
        assert_eq!(sequencer.current_key(), SceneKey::Bonus);
        assert_eq!(sequencer.metrics().snapshot().scene_switches, 1);
    }

    #[test]
    fn stalled_scene_reports_error_instead_of_spinning() {
        let config = SequencerConfig {
            fixed_dt_seconds: 1.0 / 60.0,
            max_ticks_per_round: 25,
        };
        let mut sequencer = Sequencer::new(config).expect("sequencer");
        let mut audio = AudioBus::default();
        let result = sequencer.run_until_idle(&mut NeverIdleScene, &PlayerInput::empty(), &mut audio);
        assert!(matches!(
            result,
            Err(SequencerError::SceneStalled { ticks: 25, .. })
        ));
        assert_eq!(sequencer.metrics().snapshot().rounds_stalled, 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad_dt = SequencerConfig {
            fixed_dt_seconds: 0.0,
            max_ticks_per_round: 10,
        };
        assert!(matches!(
            Sequencer::new(bad_dt),
            Err(SequencerError::InvalidFixedDt(_))
        ));

        let bad_bound = SequencerConfig {
            fixed_dt_seconds: 1.0 / 60.0,
            max_ticks_per_round: 0,
        };
        assert!(matches!(
            Sequencer::new(bad_bound),
            Err(SequencerError::InvalidTickBound)
        ));
    }
}
