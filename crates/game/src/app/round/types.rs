pub(crate) type RoundDataResult<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PayoutScript {
    pub(crate) indexes: Vec<usize>,
    pub(crate) symbol: u8,
    pub(crate) coefficient: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct WildBurst {
    pub(crate) keg_index: usize,
    pub(crate) wild_indexes: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StrikeScript {
    pub(crate) position: usize,
    pub(crate) minion_hp: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PlaygroundScript {
    pub(crate) refill_symbols: Vec<u8>,
    #[serde(default)]
    pub(crate) wild_bursts: Vec<WildBurst>,
    #[serde(default)]
    pub(crate) powder_kegs: Vec<usize>,
    #[serde(default)]
    pub(crate) strikes: Vec<StrikeScript>,
    #[serde(default)]
    pub(crate) kraken_wilds: Vec<usize>,
    #[serde(default)]
    pub(crate) payouts: Vec<PayoutScript>,
    pub(crate) total_score_after: u32,
    #[serde(default)]
    pub(crate) charge_after: u32,
    #[serde(default)]
    pub(crate) finished_mini_krakens: u32,
    #[serde(default)]
    pub(crate) dead_minions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RoundScript {
    pub(crate) playgrounds: Vec<PlaygroundScript>,
    #[serde(default)]
    pub(crate) bonus_triggered: bool,
    #[serde(default)]
    pub(crate) spins_awarded: u32,
    #[serde(default)]
    pub(crate) closes_bonus: bool,
}

fn validation_err(path: &str, message: impl Into<String>) -> String {
    format!("validation failed at {path}: {}", message.into())
}

fn expected_actual(path: &str, expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> String {
    validation_err(path, format!("expected {expected}, got {actual}"))
}

fn check_board_index(path: &str, index: usize, board_size: usize) -> RoundDataResult<()> {
    if index >= board_size {
        return Err(expected_actual(path, format!("index < {board_size}"), index));
    }
    Ok(())
}

pub(crate) fn validate_round_script(
    script: &RoundScript,
    defs: &PresentationDefs,
) -> RoundDataResult<()> {
    if script.playgrounds.is_empty() {
        return Err(validation_err("playgrounds", "round has no playgrounds"));
    }
    if script.bonus_triggered && script.closes_bonus {
        return Err(validation_err(
            "bonus_triggered",
            "a round cannot both trigger and close the bonus",
        ));
    }
    if script.bonus_triggered && script.spins_awarded == 0 {
        return Err(expected_actual("spins_awarded", "> 0 for a bonus trigger", 0));
    }

    let board_size = defs.board_size;
    let mut previous_total = 0u32;

    for (pg_index, playground) in script.playgrounds.iter().enumerate() {
        let base = format!("playgrounds[{pg_index}]");

        if playground.refill_symbols.len() != board_size {
            return Err(expected_actual(
                &format!("{base}.refill_symbols"),
                format!("{board_size} symbols"),
                playground.refill_symbols.len(),
            ));
        }

        if playground.total_score_after < previous_total {
            return Err(expected_actual(
                &format!("{base}.total_score_after"),
                format!(">= {previous_total}"),
                playground.total_score_after,
            ));
        }
        previous_total = playground.total_score_after;

        if playground.charge_after > MILESTONE_COUNT {
            return Err(expected_actual(
                &format!("{base}.charge_after"),
                format!("<= {MILESTONE_COUNT}"),
                playground.charge_after,
            ));
        }

        for (i, keg) in playground.powder_kegs.iter().enumerate() {
            check_board_index(&format!("{base}.powder_kegs[{i}]"), *keg, board_size)?;
        }
        for (i, dead) in playground.dead_minions.iter().enumerate() {
            check_board_index(&format!("{base}.dead_minions[{i}]"), *dead, board_size)?;
        }

        for (i, burst) in playground.wild_bursts.iter().enumerate() {
            check_board_index(
                &format!("{base}.wild_bursts[{i}].keg_index"),
                burst.keg_index,
                board_size,
            )?;
            if burst.wild_indexes.is_empty() {
                return Err(validation_err(
                    &format!("{base}.wild_bursts[{i}].wild_indexes"),
                    "a burst must scatter at least one wild",
                ));
            }
            for (j, wild) in burst.wild_indexes.iter().enumerate() {
                check_board_index(
                    &format!("{base}.wild_bursts[{i}].wild_indexes[{j}]"),
                    *wild,
                    board_size,
                )?;
            }
        }

        for (i, strike) in playground.strikes.iter().enumerate() {
            check_board_index(
                &format!("{base}.strikes[{i}].position"),
                strike.position,
                board_size,
            )?;
            if strike.minion_hp == 0 || strike.minion_hp > defs.kraken.max_minion_hp {
                return Err(expected_actual(
                    &format!("{base}.strikes[{i}].minion_hp"),
                    format!("1..={}", defs.kraken.max_minion_hp),
                    strike.minion_hp,
                ));
            }
        }

        if !playground.kraken_wilds.is_empty()
            && KrakenWildSize::from_cluster_len(playground.kraken_wilds.len()).is_none()
        {
            return Err(expected_actual(
                &format!("{base}.kraken_wilds"),
                "a cluster of 9, 16 or 25 cells",
                playground.kraken_wilds.len(),
            ));
        }
        for (i, wild) in playground.kraken_wilds.iter().enumerate() {
            check_board_index(&format!("{base}.kraken_wilds[{i}]"), *wild, board_size)?;
        }

        for (p, payout) in playground.payouts.iter().enumerate() {
            let payout_path = format!("{base}.payouts[{p}]");
            if payout.indexes.is_empty() {
                return Err(validation_err(
                    &format!("{payout_path}.indexes"),
                    "payout cluster is empty",
                ));
            }
            if payout.coefficient == 0 {
                return Err(expected_actual(&format!("{payout_path}.coefficient"), "> 0", 0));
            }
            let mut seen = HashSet::new();
            for (i, index) in payout.indexes.iter().enumerate() {
                check_board_index(&format!("{payout_path}.indexes[{i}]"), *index, board_size)?;
                if !seen.insert(*index) {
                    return Err(validation_err(
                        &format!("{payout_path}.indexes[{i}]"),
                        format!("duplicate cluster index {index}"),
                    ));
                }
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoundStage {
    Idle,
    Refilling,
    ResolvingWilds,
    RevealingPayouts,
    UpdatingMeters,
    CheckingBonusTransition,
}

impl RoundStage {
    fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Refilling => "Refilling",
            Self::ResolvingWilds => "ResolvingWilds",
            Self::RevealingPayouts => "RevealingPayouts",
            Self::UpdatingMeters => "UpdatingMeters",
            Self::CheckingBonusTransition => "CheckingBonusTransition",
        }
    }
}

/// Everything the animation side can be asked to play. Cues narrate state
/// that has already been applied; firing order is the only contract.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StageCue {
    SpinIn,
    Refill,
    KegFall { index: usize },
    KegExplode { index: usize },
    WildChestFly { from: usize, to: usize },
    MilestoneExplode { index: u32 },
    KrakenIntro { size: KrakenWildSize },
    KrakenWin,
    KrakenHide,
    TentacleIdle,
    TentaclePunch { name: String, under_ship: bool },
    Splash { position: usize },
    MinionRig { position: usize, hp: u8 },
    MinionCounterOff { position: usize, hp: u8 },
    MinionFlyOff { position: usize },
    SymbolToWild { position: usize },
    SceneShake,
    PayoutHighlight { payout: usize },
    PayoutAmount { coefficient: u32 },
    StarPulse,
    Shockwave { big: bool },
    ArrowsWin,
    MeterActivated { ring: MeterRing },
    MeterMaskReset,
    InnerFillStart { from: u32, to: u32, seconds: f32 },
    OuterFillStart { from: u32, to: u32, seconds: f32 },
    CounterRoll { from: u32, to: u32, seconds: f32 },
    TierCeiling { ceiling: u32 },
    MilestoneArm { index: u32 },
    PanelItemLit { index: u32 },
    PanelStageUp { stage: u32 },
    PanelReset,
    SymbolsOut,
    SymbolsRespawn,
    LogoWin,
    BonusIntro { spins: u32 },
    BonusOutro { total_coins: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MeterRing {
    Inner,
    Outer,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RoundEvent {
    RoundStarted { playgrounds: u32 },
    BonusSpinStarted { remaining: u32 },
    PayoutRevealed { playground: u32, payout: u32 },
    WinUpdated { total_coins: u32 },
    MeterFillStarted { inner_delta: u32, outer_delta: u32, overflow: u32 },
    MeterFillSuppressed { playground: u32 },
    CarryOverflow { diff: u32 },
    MilestoneArmed { index: u32, at_seconds: f32 },
    MilestoneConsumed { index: u32 },
    KrakenWildPlaced { size: KrakenWildSize },
    MinionSpawned { position: u32, hp: u8 },
    MinionStruck { position: u32, hp: u8 },
    MinionDied { position: u32 },
    BonusEntered { spins: u32 },
    BonusExited,
    RoundCompleted { total_coins: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoundEventKind {
    RoundStarted,
    BonusSpinStarted,
    PayoutRevealed,
    WinUpdated,
    MeterFillStarted,
    MeterFillSuppressed,
    CarryOverflow,
    MilestoneArmed,
    MilestoneConsumed,
    KrakenWildPlaced,
    MinionSpawned,
    MinionStruck,
    MinionDied,
    BonusEntered,
    BonusExited,
    RoundCompleted,
}

impl RoundEvent {
    fn kind(self) -> RoundEventKind {
        match self {
            Self::RoundStarted { .. } => RoundEventKind::RoundStarted,
            Self::BonusSpinStarted { .. } => RoundEventKind::BonusSpinStarted,
            Self::PayoutRevealed { .. } => RoundEventKind::PayoutRevealed,
            Self::WinUpdated { .. } => RoundEventKind::WinUpdated,
            Self::MeterFillStarted { .. } => RoundEventKind::MeterFillStarted,
            Self::MeterFillSuppressed { .. } => RoundEventKind::MeterFillSuppressed,
            Self::CarryOverflow { .. } => RoundEventKind::CarryOverflow,
            Self::MilestoneArmed { .. } => RoundEventKind::MilestoneArmed,
            Self::MilestoneConsumed { .. } => RoundEventKind::MilestoneConsumed,
            Self::KrakenWildPlaced { .. } => RoundEventKind::KrakenWildPlaced,
            Self::MinionSpawned { .. } => RoundEventKind::MinionSpawned,
            Self::MinionStruck { .. } => RoundEventKind::MinionStruck,
            Self::MinionDied { .. } => RoundEventKind::MinionDied,
            Self::BonusEntered { .. } => RoundEventKind::BonusEntered,
            Self::BonusExited => RoundEventKind::BonusExited,
            Self::RoundCompleted { .. } => RoundEventKind::RoundCompleted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RoundEventCounts {
    pub(crate) total: u32,
    pub(crate) round_started: u32,
    pub(crate) bonus_spin_started: u32,
    pub(crate) payout_revealed: u32,
    pub(crate) win_updated: u32,
    pub(crate) meter_fill_started: u32,
    pub(crate) meter_fill_suppressed: u32,
    pub(crate) carry_overflow: u32,
    pub(crate) milestone_armed: u32,
    pub(crate) milestone_consumed: u32,
    pub(crate) kraken_wild_placed: u32,
    pub(crate) minion_spawned: u32,
    pub(crate) minion_struck: u32,
    pub(crate) minion_died: u32,
    pub(crate) bonus_entered: u32,
    pub(crate) bonus_exited: u32,
    pub(crate) round_completed: u32,
}

impl RoundEventCounts {
    fn render_human_readable(&self) -> String {
        format!(
            "total={} round_started={} bonus_spin_started={} payout_revealed={} win_updated={} \
             meter_fill_started={} meter_fill_suppressed={} carry_overflow={} milestone_armed={} \
             milestone_consumed={} kraken_wild_placed={} minion_spawned={} minion_struck={} \
             minion_died={} bonus_entered={} bonus_exited={} round_completed={}",
            self.total,
            self.round_started,
            self.bonus_spin_started,
            self.payout_revealed,
            self.win_updated,
            self.meter_fill_started,
            self.meter_fill_suppressed,
            self.carry_overflow,
            self.milestone_armed,
            self.milestone_consumed,
            self.kraken_wild_placed,
            self.minion_spawned,
            self.minion_struck,
            self.minion_died,
            self.bonus_entered,
            self.bonus_exited,
            self.round_completed
        )
    }

    fn record(&mut self, kind: RoundEventKind) {
        self.total = self.total.saturating_add(1);
        let slot = match kind {
            RoundEventKind::RoundStarted => &mut self.round_started,
            RoundEventKind::BonusSpinStarted => &mut self.bonus_spin_started,
            RoundEventKind::PayoutRevealed => &mut self.payout_revealed,
            RoundEventKind::WinUpdated => &mut self.win_updated,
            RoundEventKind::MeterFillStarted => &mut self.meter_fill_started,
            RoundEventKind::MeterFillSuppressed => &mut self.meter_fill_suppressed,
            RoundEventKind::CarryOverflow => &mut self.carry_overflow,
            RoundEventKind::MilestoneArmed => &mut self.milestone_armed,
            RoundEventKind::MilestoneConsumed => &mut self.milestone_consumed,
            RoundEventKind::KrakenWildPlaced => &mut self.kraken_wild_placed,
            RoundEventKind::MinionSpawned => &mut self.minion_spawned,
            RoundEventKind::MinionStruck => &mut self.minion_struck,
            RoundEventKind::MinionDied => &mut self.minion_died,
            RoundEventKind::BonusEntered => &mut self.bonus_entered,
            RoundEventKind::BonusExited => &mut self.bonus_exited,
            RoundEventKind::RoundCompleted => &mut self.round_completed,
        };
        *slot = slot.saturating_add(1);
    }
}

#[derive(Default)]
pub(crate) struct RoundEventBus {
    current_round_events: Vec<RoundEvent>,
    last_round_counts: RoundEventCounts,
}

impl RoundEventBus {
    fn emit(&mut self, event: RoundEvent) {
        self.current_round_events.push(event);
    }

    #[cfg(test)]
    fn iter_emitted_so_far(&self) -> impl Iterator<Item = &RoundEvent> {
        self.current_round_events.iter()
    }

    fn finish_round_rollover(&mut self) {
        let mut counts = RoundEventCounts::default();
        for event in &self.current_round_events {
            counts.record(event.kind());
        }
        self.last_round_counts = counts;
        self.current_round_events.clear();
    }

    fn last_round_counts(&self) -> RoundEventCounts {
        self.last_round_counts
    }
}
