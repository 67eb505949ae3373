#[derive(Debug, Clone)]
struct ActiveRound {
    script: RoundScript,
    playground: usize,
    payout: usize,
    is_last: bool,
}

/// Drives one round sequence through the stages
/// Idle -> Refilling -> ResolvingWilds -> RevealingPayouts -> UpdatingMeters
/// -> CheckingBonusTransition, looping over the round's playground queue.
/// All state mutation happens synchronously at stage entry; the per-stage
/// timelines only narrate it, which is what keeps the final state identical
/// under normal, fast and jumped playback.
pub(crate) struct RoundOrchestrator {
    defs: PresentationDefs,
    accumulator: ScoreAccumulator,
    minions: MinionField,
    panel: KrakenPanel,
    skip: SkipController,
    events: RoundEventBus,
    picker: VariantPicker,
    presenter: Box<dyn Presenter<StageCue>>,
    stage: RoundStage,
    timeline: Timeline<StageCue>,
    round: Option<ActiveRound>,
    bonus_mode: bool,
    remaining_bonus_spins: u32,
    total_coins: u32,
    keg_sound_played: bool,
    kraken_win_sound_played: bool,
    fast_play: bool,
    pending_switch: Option<SceneKey>,
}

impl RoundOrchestrator {
    fn new(defs: PresentationDefs, presenter: Box<dyn Presenter<StageCue>>) -> Self {
        let accumulator =
            ScoreAccumulator::new(defs.regular_meter, defs.bonus_meter, &defs.timing);
        let panel = KrakenPanel::new(&defs.kraken);
        let skip = SkipController::new(defs.timing.fast_factor);
        Self {
            defs,
            accumulator,
            minions: MinionField::default(),
            panel,
            skip,
            events: RoundEventBus::default(),
            picker: VariantPicker::default(),
            presenter,
            stage: RoundStage::Idle,
            timeline: Timeline::new(),
            round: None,
            bonus_mode: false,
            remaining_bonus_spins: 0,
            total_coins: 0,
            keg_sound_played: false,
            kraken_win_sound_played: false,
            fast_play: false,
            pending_switch: None,
        }
    }

    fn stage(&self) -> RoundStage {
        self.stage
    }

    fn is_idle(&self) -> bool {
        self.stage == RoundStage::Idle
    }

    fn score_state(&self) -> ScoreState {
        self.accumulator.state()
    }

    fn total_coins(&self) -> u32 {
        self.total_coins
    }

    fn bonus_mode(&self) -> bool {
        self.bonus_mode
    }

    fn remaining_bonus_spins(&self) -> u32 {
        self.remaining_bonus_spins
    }

    fn last_round_counts(&self) -> RoundEventCounts {
        self.events.last_round_counts()
    }

    fn current_playground(&self) -> Option<&PlaygroundScript> {
        let round = self.round.as_ref()?;
        round.script.playgrounds.get(round.playground)
    }

    /// Accepts the next round from the game-state service. Malformed data is
    /// a terminal error for the round: nothing is mutated and Idle holds.
    fn queue_round(&mut self, script: RoundScript, is_last: bool) -> RoundDataResult<()> {
        if self.stage != RoundStage::Idle {
            return Err("a round sequence is already in progress".to_string());
        }
        validate_round_script(&script, &self.defs)?;

        info!(
            playgrounds = script.playgrounds.len(),
            is_last,
            bonus = self.bonus_mode,
            "round_queued"
        );
        self.events.emit(RoundEvent::RoundStarted {
            playgrounds: script.playgrounds.len() as u32,
        });

        if self.bonus_mode {
            if self.remaining_bonus_spins == 0 {
                warn!("bonus spin started with an exhausted allotment");
            }
            self.remaining_bonus_spins = self.remaining_bonus_spins.saturating_sub(1);
            self.accumulator.reset_bonus_spin();
            self.events.emit(RoundEvent::BonusSpinStarted {
                remaining: self.remaining_bonus_spins,
            });
        }

        self.round = Some(ActiveRound {
            script,
            playground: 0,
            payout: 0,
            is_last,
        });
        self.enter_refilling();
        Ok(())
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &PlayerInput,
        audio: &mut AudioBus,
    ) -> SceneCommand {
        self.fast_play = input.fast_play_enabled();
        if input.skip_pressed() {
            self.skip.request_jump();
        } else if input.fast_play_enabled() {
            self.skip.request_fast();
        }

        if self.stage == RoundStage::Idle {
            return SceneCommand::None;
        }

        let jump_allowed = self.accumulator.jump_allowed();
        let fired = self
            .skip
            .step_guarded(&mut self.timeline, fixed_dt_seconds, jump_allowed);
        self.dispatch_cues(&fired, audio);

        if self.timeline.finished() {
            return self.advance_stage();
        }
        SceneCommand::None
    }

    fn set_stage(&mut self, stage: RoundStage, timeline: Timeline<StageCue>) {
        debug!(stage = stage.name(), "round_stage_entered");
        self.stage = stage;
        self.timeline = timeline;
    }

    fn abort_missing_round(&mut self) -> SceneCommand {
        warn!(stage = self.stage.name(), "round data missing mid-sequence; aborting");
        self.stage = RoundStage::Idle;
        self.timeline = Timeline::new();
        self.round = None;
        self.skip.reset();
        SceneCommand::None
    }

    fn advance_stage(&mut self) -> SceneCommand {
        match self.stage {
            RoundStage::Idle => SceneCommand::None,
            RoundStage::Refilling => {
                self.enter_resolving_wilds();
                SceneCommand::None
            }
            RoundStage::ResolvingWilds => {
                self.enter_revealing_payouts();
                SceneCommand::None
            }
            RoundStage::RevealingPayouts => {
                let Some(round) = self.round.as_ref() else {
                    return self.abort_missing_round();
                };
                let payout_index = round.payout;
                let playground = &round.script.playgrounds[round.playground];
                let coefficient = playground
                    .payouts
                    .get(payout_index)
                    .map(|payout| payout.coefficient)
                    .unwrap_or(0);
                let has_more = payout_index + 1 < playground.payouts.len();

                self.total_coins = self.total_coins.saturating_add(coefficient);
                self.events.emit(RoundEvent::WinUpdated {
                    total_coins: self.total_coins,
                });

                if has_more {
                    self.enter_payout(payout_index + 1);
                } else {
                    self.enter_updating_meters();
                }
                SceneCommand::None
            }
            RoundStage::UpdatingMeters => {
                debug!(
                    inner_busy = self.accumulator.inner_busy(),
                    outer_busy = self.accumulator.outer_busy(),
                    "meter_fill_finished"
                );
                self.accumulator.finish_fill();
                self.enter_checking_bonus();
                SceneCommand::None
            }
            RoundStage::CheckingBonusTransition => {
                let command = self
                    .pending_switch
                    .take()
                    .map(SceneCommand::SwitchTo)
                    .unwrap_or(SceneCommand::None);
                let Some(round) = self.round.as_mut() else {
                    return self.abort_missing_round();
                };
                round.playground += 1;
                round.payout = 0;
                if round.playground < round.script.playgrounds.len() {
                    self.enter_refilling();
                } else {
                    self.finish_round();
                }
                command
            }
        }
    }

    fn enter_refilling(&mut self) {
        let Some(round) = self.round.as_ref() else {
            self.abort_missing_round();
            return;
        };
        let first = round.playground == 0;
        let timing = self.defs.timing;

        let mut timeline = Timeline::new();
        if first {
            timeline.cue(0.0, StageCue::SpinIn);
            timeline.hold_until(timing.spin_in_seconds);
        } else {
            timeline.cue(0.0, StageCue::Refill);
            timeline.hold_until(timing.refill_seconds);
        }
        self.set_stage(RoundStage::Refilling, timeline);
    }

    fn enter_resolving_wilds(&mut self) {
        let Some(playground) = self.current_playground().cloned() else {
            self.abort_missing_round();
            return;
        };
        let timing = self.defs.timing;
        let mut timeline = Timeline::new();
        self.keg_sound_played = false;
        self.kraken_win_sound_played = false;

        if !playground.powder_kegs.is_empty() {
            for keg in &playground.powder_kegs {
                timeline.cue(0.0, StageCue::KegFall { index: *keg });
            }
            timeline.hold_until(timing.keg_drop_seconds);
            if let Some(index) = self.accumulator.consume_one() {
                self.events.emit(RoundEvent::MilestoneConsumed { index });
                timeline.cue(0.0, StageCue::MilestoneExplode { index });
            }
        }

        let mut cursor = if playground.powder_kegs.is_empty() {
            0.0
        } else {
            timing.keg_drop_seconds
        };

        if !playground.wild_bursts.is_empty() {
            for (idx, burst) in playground.wild_bursts.iter().enumerate() {
                let base = cursor + idx as f32 * WILD_FLY_DELAY_SECONDS;
                timeline.cue(base, StageCue::KegExplode { index: burst.keg_index });
                for wild in &burst.wild_indexes {
                    timeline.cue(
                        base + WILD_FLY_DELAY_SECONDS,
                        StageCue::WildChestFly {
                            from: burst.keg_index,
                            to: *wild,
                        },
                    );
                }
            }
            cursor += playground.wild_bursts.len() as f32 * WILD_FLY_DELAY_SECONDS
                + timing.wild_burst_seconds;
            timeline.hold_until(cursor);
        }

        if !playground.strikes.is_empty() {
            let kegs: HashSet<usize> = playground.powder_kegs.iter().copied().collect();
            let spawn_allowed = !self.minions.stop_spawning();
            for strike in &playground.strikes {
                if kegs.contains(&strike.position) || !spawn_allowed {
                    continue;
                }
                if self.minions.spawn(
                    strike.position,
                    strike.minion_hp,
                    self.defs.kraken.max_minion_hp,
                ) {
                    self.events.emit(RoundEvent::MinionSpawned {
                        position: strike.position as u32,
                        hp: strike.minion_hp,
                    });
                }
            }
            cursor = push_strike_cues(
                &mut timeline,
                cursor,
                &playground.strikes,
                &kegs,
                spawn_allowed,
                &timing,
            );
        }

        if !playground.kraken_wilds.is_empty() {
            if let Some(size) = KrakenWildSize::from_cluster_len(playground.kraken_wilds.len()) {
                debug!(size = size.as_token(), "kraken_wild_placed");
                timeline.cue(cursor, StageCue::KrakenIntro { size });
                timeline.hold_until(cursor + timing.kraken_intro_seconds);
                self.events.emit(RoundEvent::KrakenWildPlaced { size });
            }
        }

        self.set_stage(RoundStage::ResolvingWilds, timeline);
    }

    fn enter_revealing_payouts(&mut self) {
        let Some(playground) = self.current_playground() else {
            self.abort_missing_round();
            return;
        };
        if playground.payouts.is_empty() {
            self.enter_updating_meters();
        } else {
            self.enter_payout(0);
        }
    }

    fn enter_payout(&mut self, payout_index: usize) {
        let details = match self.round.as_mut() {
            Some(round) => {
                round.payout = payout_index;
                let playground_index = round.playground;
                let playground = &round.script.playgrounds[playground_index];
                playground.payouts.get(payout_index).map(|payout| {
                    (
                        playground_index,
                        payout.coefficient,
                        !playground.kraken_wilds.is_empty(),
                    )
                })
            }
            None => None,
        };
        let Some((playground_index, coefficient, has_kraken)) = details else {
            self.abort_missing_round();
            return;
        };
        let timing = self.defs.timing;
        let gap = if self.bonus_mode {
            timing.bonus_payout_gap_seconds
        } else {
            timing.payout_gap_seconds
        };

        self.events.emit(RoundEvent::PayoutRevealed {
            playground: playground_index as u32,
            payout: payout_index as u32,
        });

        let mut timeline = Timeline::new();
        timeline.cue(0.0, StageCue::PayoutHighlight { payout: payout_index });
        timeline.cue(0.0, StageCue::PayoutAmount { coefficient });
        if has_kraken {
            timeline.cue(0.0, StageCue::KrakenWin);
        }
        timeline.hold_until(timing.payout_reveal_seconds + gap);
        self.set_stage(RoundStage::RevealingPayouts, timeline);
    }

    fn enter_updating_meters(&mut self) {
        let Some(round) = self.round.as_ref() else {
            self.abort_missing_round();
            return;
        };
        let playground_index = round.playground;
        let is_final_playground = playground_index + 1 == round.script.playgrounds.len();
        let is_last_round = round.is_last;
        let Some(playground) = self.current_playground().cloned() else {
            self.abort_missing_round();
            return;
        };
        let timing = self.defs.timing;
        let mut timeline = Timeline::new();

        let had_payouts = !playground.payouts.is_empty();
        if had_payouts {
            timeline.cue(0.0, StageCue::SymbolsOut);
            timeline.cue(0.0, StageCue::LogoWin);

            let winners = winner_indexes(&playground.payouts);
            for hit in self.minions.counter_off(&winners) {
                self.events.emit(RoundEvent::MinionStruck {
                    position: hit.position as u32,
                    hp: hit.hp_after,
                });
                timeline.cue(
                    MINION_COUNTER_OFF_SECONDS,
                    StageCue::MinionCounterOff {
                        position: hit.position,
                        hp: hit.hp_after,
                    },
                );
            }
            for dead in &playground.dead_minions {
                if self.minions.kill(*dead) {
                    self.events
                        .emit(RoundEvent::MinionDied { position: *dead as u32 });
                    timeline.cue(
                        MINION_FLY_OFF_SECONDS,
                        StageCue::MinionFlyOff { position: *dead },
                    );
                }
            }
            if !playground.kraken_wilds.is_empty() {
                timeline.cue(0.0, StageCue::KrakenHide);
            }
        }

        let score_before = self.accumulator.total();
        let delta = self.accumulator.apply_score(playground.total_score_after);
        if delta.overflow_diff > 0 {
            self.events.emit(RoundEvent::CarryOverflow {
                diff: delta.overflow_diff,
            });
        }

        let activations = self
            .accumulator
            .activate_up_to(playground.charge_after, score_before);
        for activation in &activations {
            self.events.emit(RoundEvent::MilestoneArmed {
                index: activation.index,
                at_seconds: activation.at_seconds,
            });
        }

        // The last payout of the last round would flash the meters right
        // before the scene hand-off; state still updates, cues do not play.
        let suppressed = is_final_playground && is_last_round;
        if suppressed {
            self.events.emit(RoundEvent::MeterFillSuppressed {
                playground: playground_index as u32,
            });
            let _ = self.accumulator.take_pending_ceilings();
        } else if !delta.is_zero() {
            self.events.emit(RoundEvent::MeterFillStarted {
                inner_delta: delta.inner_delta,
                outer_delta: delta.outer_delta,
                overflow: delta.overflow_diff,
            });
            let fill_start = if had_payouts { 0.3 } else { 0.0 };
            let new_spin = playground_index == 0;
            self.accumulator
                .push_fill_cues(&mut timeline, fill_start, &delta, new_spin, &timing);
            for activation in &activations {
                timeline.cue(
                    fill_start + activation.at_seconds,
                    StageCue::MilestoneArm {
                        index: activation.index,
                    },
                );
            }
        } else {
            let _ = self.accumulator.take_pending_ceilings();
        }

        if self.bonus_mode {
            for item in self.panel.activate_items(playground.finished_mini_krakens) {
                timeline.cue(0.2, StageCue::PanelItemLit { index: item });
            }
            if self.panel.is_stage_complete() {
                if let Some(stage) = self.panel.advance_stage() {
                    timeline.cue(0.6, StageCue::PanelStageUp { stage });
                } else if !self.minions.stop_spawning() {
                    self.minions.set_stop_spawning();
                    for position in self.minions.die_all() {
                        self.events
                            .emit(RoundEvent::MinionDied { position: position as u32 });
                        timeline.cue(
                            MINION_FLY_OFF_SECONDS,
                            StageCue::MinionFlyOff { position },
                        );
                    }
                }
            }
        }

        self.set_stage(RoundStage::UpdatingMeters, timeline);
    }

    fn enter_checking_bonus(&mut self) {
        let Some(round) = self.round.as_ref() else {
            self.abort_missing_round();
            return;
        };
        let is_final_playground = round.playground + 1 == round.script.playgrounds.len();
        let bonus_triggered = round.script.bonus_triggered;
        let closes_bonus = round.script.closes_bonus;
        let spins = round.script.spins_awarded;
        let timing = self.defs.timing;
        let mut timeline = Timeline::new();

        if is_final_playground && !self.bonus_mode && bonus_triggered {
            self.accumulator.enter_bonus();
            self.panel.reset();
            self.minions.reset();
            self.bonus_mode = true;
            self.remaining_bonus_spins = spins;
            self.events.emit(RoundEvent::BonusEntered { spins });
            timeline.cue(0.0, StageCue::MeterMaskReset);
            timeline.cue(0.0, StageCue::PanelReset);
            timeline.cue(0.2, StageCue::BonusIntro { spins });
            timeline.hold_until(timing.bonus_intro_seconds);
            self.pending_switch = Some(SceneKey::Bonus);
            info!(spins, "bonus_entered");
        } else if is_final_playground && self.bonus_mode && closes_bonus {
            for position in self.minions.die_all() {
                self.events
                    .emit(RoundEvent::MinionDied { position: position as u32 });
                timeline.cue(0.0, StageCue::MinionFlyOff { position });
            }
            self.minions.reset();
            self.panel.reset();
            self.accumulator.reset_to_regular();
            self.bonus_mode = false;
            self.remaining_bonus_spins = 0;
            self.events.emit(RoundEvent::BonusExited);
            timeline.cue(0.0, StageCue::PanelReset);
            timeline.cue(
                0.2,
                StageCue::BonusOutro {
                    total_coins: self.total_coins,
                },
            );
            timeline.hold_until(timing.bonus_outro_seconds);
            self.pending_switch = Some(SceneKey::Regular);
            info!("bonus_exited");
        } else if !is_final_playground {
            timeline.cue(0.0, StageCue::SymbolsRespawn);
            timeline.hold_until(RESPAWN_HOLD_SECONDS);
        }

        self.set_stage(RoundStage::CheckingBonusTransition, timeline);
    }

    fn finish_round(&mut self) {
        self.events.emit(RoundEvent::RoundCompleted {
            total_coins: self.total_coins,
        });
        info!(total_coins = self.total_coins, "round_completed");
        self.events.finish_round_rollover();
        debug!(counts = %self.events.last_round_counts().render_human_readable(), "round_event_counts");
        self.stage = RoundStage::Idle;
        self.timeline = Timeline::new();
        self.round = None;
        self.skip.reset();
    }

    fn dispatch_cues(&mut self, cues: &[StageCue], audio: &mut AudioBus) {
        for cue in cues {
            self.play_cue_audio(cue, audio);
            if let Err(error) = self.presenter.present(cue) {
                warn!(error = %error, cue = ?cue, "cue presentation failed; continuing");
            }
        }
    }

    fn play_cue_audio(&mut self, cue: &StageCue, audio: &mut AudioBus) {
        match cue {
            StageCue::TentacleIdle => {
                let name = self.picker.pick("kraken_tentacles", &SOUNDS_KRAKEN_TENTACLES);
                audio.play_tagged(&name, "tentacles", 90);
            }
            StageCue::TentaclePunch { .. } => {
                let name = self.picker.pick("kraken_scream", &SOUNDS_KRAKEN_SCREAM);
                audio.play(&name);
            }
            StageCue::Splash { .. } => {
                let name = self.picker.pick("kraken_strike", &SOUNDS_KRAKEN_STRIKE);
                audio.play_tagged(&name, "strike", 70);
            }
            StageCue::KegExplode { .. } => {
                if !self.keg_sound_played {
                    self.keg_sound_played = true;
                    let name = self.picker.pick("barrel_explodes", &SOUNDS_BARREL_EXPLODES);
                    audio.play(&name);
                }
            }
            StageCue::MilestoneArm { .. } => {
                let name = self.picker.pick("cannon_ignites", &SOUNDS_CANNON_IGNITES);
                audio.play(&name);
            }
            StageCue::MilestoneExplode { .. } => {
                let name = self.picker.pick("cannon_shoots", &SOUNDS_CANNON_SHOOTS);
                audio.play(&name);
            }
            StageCue::InnerFillStart { .. } | StageCue::OuterFillStart { .. } => {
                let name = self.picker.pick("compass_activate", &SOUNDS_COMPASS_ACTIVATE);
                audio.play(&name);
            }
            StageCue::PayoutHighlight { payout } => {
                let symbol = self
                    .current_playground()
                    .and_then(|pg| pg.payouts.get(*payout))
                    .map(|p| p.symbol);
                if let Some(symbol) = symbol {
                    let (name, delay_ms) = symbol_voice(symbol, &mut self.picker, self.fast_play);
                    audio.play_tagged(&name, "symbol", delay_ms);
                }
            }
            StageCue::SymbolsOut => {
                let name = self.picker.pick("waves", &SOUNDS_WAVES);
                audio.play(&name);
            }
            StageCue::KrakenIntro { .. } => {
                audio.play("kraken_drop");
            }
            StageCue::KrakenWin => {
                if !self.kraken_win_sound_played {
                    self.kraken_win_sound_played = true;
                    audio.play("kraken_scream_big");
                }
            }
            StageCue::BonusIntro { .. } => {
                audio.play("spin_start");
                play_music(audio, true);
            }
            StageCue::BonusOutro { .. } => {
                play_music(audio, false);
            }
            _ => {}
        }
    }

    fn reset_session(&mut self) {
        self.stage = RoundStage::Idle;
        self.timeline = Timeline::new();
        self.round = None;
        self.accumulator.reset_to_regular();
        self.minions.reset();
        self.panel.reset();
        self.bonus_mode = false;
        self.remaining_bonus_spins = 0;
        self.total_coins = 0;
        self.skip.reset();
        self.pending_switch = None;
    }
}
