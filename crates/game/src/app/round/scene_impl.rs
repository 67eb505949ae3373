/// The one resident scene of the presentation: both the regular game and
/// the bonus game play through it, with the backdrop switch reported via
/// `SceneCommand` for the renderer to act on.
pub(crate) struct KrakenScene {
    orchestrator: RoundOrchestrator,
    capabilities: Capabilities,
}

impl KrakenScene {
    pub(crate) fn new(defs: PresentationDefs) -> Self {
        Self::with_presenter(defs, Box::new(LoggingPresenter))
    }

    pub(crate) fn with_presenter(
        defs: PresentationDefs,
        presenter: Box<dyn Presenter<StageCue>>,
    ) -> Self {
        Self {
            orchestrator: RoundOrchestrator::new(defs, presenter),
            capabilities: Capabilities {
                device: Device::Desktop,
                orientation: Orientation::Landscape,
            },
        }
    }

    pub(crate) fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    pub(crate) fn layout(&self) -> &SceneLayout {
        self.orchestrator.defs.layout.resolve(self.capabilities)
    }

    pub(crate) fn queue_round(&mut self, script: RoundScript, is_last: bool) -> RoundDataResult<()> {
        self.orchestrator.queue_round(script, is_last)
    }

    pub(crate) fn score_state(&self) -> ScoreState {
        self.orchestrator.score_state()
    }

    pub(crate) fn total_coins(&self) -> u32 {
        self.orchestrator.total_coins()
    }

    pub(crate) fn last_round_counts(&self) -> RoundEventCounts {
        self.orchestrator.last_round_counts()
    }

    pub(crate) fn bonus_mode(&self) -> bool {
        self.orchestrator.bonus_mode()
    }

    pub(crate) fn remaining_bonus_spins(&self) -> u32 {
        self.orchestrator.remaining_bonus_spins()
    }
}

impl Scene for KrakenScene {
    fn load(&mut self, audio: &mut AudioBus) {
        play_music(audio, self.orchestrator.bonus_mode());
        let layout = *self.layout();
        info!(
            capability = self.capabilities.as_token(),
            meter_x = layout.meter_anchor.x,
            meter_y = layout.meter_anchor.y,
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &PlayerInput,
        audio: &mut AudioBus,
    ) -> SceneCommand {
        self.orchestrator.update(fixed_dt_seconds, input, audio)
    }

    fn unload(&mut self, audio: &mut AudioBus) {
        let _ = audio;
        info!(
            total_coins = self.orchestrator.total_coins(),
            "scene_unload"
        );
        self.orchestrator.reset_session();
    }

    fn is_idle(&self) -> bool {
        self.orchestrator.is_idle()
    }

    fn debug_title(&self) -> Option<String> {
        let state = self.orchestrator.score_state();
        Some(format!(
            "Kraken Reels | {} | {} | score {}/{} | charges {}/{} | coins {}",
            state.mode.as_token(),
            self.orchestrator.stage().name(),
            state.inner_score + state.outer_score,
            self.orchestrator.accumulator.current_ceiling(),
            state.active_milestones,
            state.consumed_milestones,
            self.orchestrator.total_coins()
        ))
    }
}
