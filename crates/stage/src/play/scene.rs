use super::audio::AudioBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Regular,
    Bonus,
}

impl SceneKey {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Bonus => "bonus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneKey),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    skip_pressed: bool,
    fast_play_enabled: bool,
}

impl PlayerInput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_skip_pressed(mut self, skip_pressed: bool) -> Self {
        self.skip_pressed = skip_pressed;
        self
    }

    pub fn with_fast_play_enabled(mut self, fast_play_enabled: bool) -> Self {
        self.fast_play_enabled = fast_play_enabled;
        self
    }

    pub fn skip_pressed(&self) -> bool {
        self.skip_pressed
    }

    pub fn fast_play_enabled(&self) -> bool {
        self.fast_play_enabled
    }
}

/// A presentation scene stepped at fixed dt by the sequencer. `update`
/// returns a command when the backdrop should switch; the scene object
/// itself stays resident (backdrop swapping belongs to the renderer).
pub trait Scene {
    fn load(&mut self, audio: &mut AudioBus);

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &PlayerInput,
        audio: &mut AudioBus,
    ) -> SceneCommand;

    fn unload(&mut self, audio: &mut AudioBus);

    /// True when no round sequence is in flight.
    fn is_idle(&self) -> bool;

    fn debug_title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_builders_set_flags() {
        let input = PlayerInput::empty()
            .with_skip_pressed(true)
            .with_fast_play_enabled(true);
        assert!(input.skip_pressed());
        assert!(input.fast_play_enabled());
        assert!(!PlayerInput::empty().skip_pressed());
    }

    #[test]
    fn scene_key_tokens_are_stable() {
        assert_eq!(SceneKey::Regular.as_token(), "regular");
        assert_eq!(SceneKey::Bonus.as_token(), "bonus");
    }
}
