#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MeterMode {
    Regular,
    Bonus,
}

impl MeterMode {
    fn as_token(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Bonus => "bonus",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MeterTrack {
    score: u32,
    done: bool,
    busy: bool,
}

/// Point-in-time view of the accumulator, used by the scene title, the
/// replay summary and the tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScoreState {
    pub(crate) inner_score: u32,
    pub(crate) outer_score: u32,
    pub(crate) inner_done: bool,
    pub(crate) outer_done: bool,
    pub(crate) carry_pending: bool,
    pub(crate) active_milestones: u32,
    pub(crate) consumed_milestones: u32,
    pub(crate) current_tier: usize,
    pub(crate) mode: MeterMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ScoreDelta {
    pub(crate) inner_delta: u32,
    pub(crate) outer_delta: u32,
    pub(crate) overflow_diff: u32,
}

impl ScoreDelta {
    fn is_zero(&self) -> bool {
        self.inner_delta == 0 && self.outer_delta == 0 && self.overflow_diff == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MilestoneActivation {
    pub(crate) index: u32,
    pub(crate) at_seconds: f32,
}

/// Score accumulator for the two nested meters plus the milestone markers.
/// The round orchestrator is its only mutator; every update is synchronous
/// and the cue timelines it hands out merely narrate the applied state.
pub(crate) struct ScoreAccumulator {
    regular: MeterDef,
    bonus: MeterDef,
    fill_seconds: f32,
    arm_delay_seconds: f32,
    mode: MeterMode,
    inner: MeterTrack,
    outer: MeterTrack,
    carry_pending: bool,
    active_milestones: u32,
    consumed_milestones: u32,
    current_tier: usize,
    step_seconds: f32,
    inner_was_zero: bool,
    outer_was_zero: bool,
    pending_ceilings: Vec<u32>,
}

impl ScoreAccumulator {
    fn new(regular: MeterDef, bonus: MeterDef, timing: &TimingDef) -> Self {
        Self {
            regular,
            bonus,
            fill_seconds: timing.fill_seconds,
            arm_delay_seconds: timing.milestone_arm_delay_seconds,
            mode: MeterMode::Regular,
            inner: MeterTrack::default(),
            outer: MeterTrack::default(),
            carry_pending: false,
            active_milestones: 0,
            consumed_milestones: 0,
            current_tier: 1,
            step_seconds: 0.0,
            inner_was_zero: true,
            outer_was_zero: true,
            pending_ceilings: Vec::new(),
        }
    }

    fn meter_def(&self) -> MeterDef {
        match self.mode {
            MeterMode::Regular => self.regular,
            MeterMode::Bonus => self.bonus,
        }
    }

    fn total(&self) -> u32 {
        self.inner.score.saturating_add(self.outer.score)
    }

    fn state(&self) -> ScoreState {
        ScoreState {
            inner_score: self.inner.score,
            outer_score: self.outer.score,
            inner_done: self.inner.done,
            outer_done: self.outer.done,
            carry_pending: self.carry_pending,
            active_milestones: self.active_milestones,
            consumed_milestones: self.consumed_milestones,
            current_tier: self.current_tier,
            mode: self.mode,
        }
    }

    fn inner_busy(&self) -> bool {
        self.inner.busy
    }

    fn outer_busy(&self) -> bool {
        self.outer.busy
    }

    /// A latched jump must not collapse a carry fill; the skip controller
    /// degrades to fast playback while this returns false.
    fn jump_allowed(&self) -> bool {
        !self.carry_pending
    }

    fn current_ceiling(&self) -> u32 {
        self.meter_def().ceiling_for_tier(self.current_tier)
    }

    /// Routes a new cumulative total into the meters. Totals never decrease
    /// outside an explicit reset; a decreasing input clamps and logs.
    fn apply_score(&mut self, new_total: u32) -> ScoreDelta {
        let current_total = self.total();
        let new_total = if new_total < current_total {
            warn!(new_total, current_total, "cumulative score decreased; clamping");
            current_total
        } else {
            new_total
        };

        let meter = self.meter_def();
        let inner_capacity = meter.inner_capacity();
        let outer_capacity = meter.outer_capacity();
        let mut delta = ScoreDelta::default();

        self.inner_was_zero = self.inner.score == 0;
        self.outer_was_zero = self.outer.score == 0;

        if !self.inner.done {
            let mut inner_delta = new_total - self.inner.score;
            self.inner.score += inner_delta;
            if self.inner.score > inner_capacity {
                let overflow = self.inner.score - inner_capacity;
                self.inner.score = inner_capacity;
                inner_delta -= overflow;
                self.outer.score = self.outer.score.saturating_add(overflow);
                self.inner.done = true;
                self.carry_pending = true;
                delta.overflow_diff = overflow;
            } else if self.inner.score == inner_capacity {
                self.inner.done = true;
                self.carry_pending = false;
            }
            delta.inner_delta = inner_delta;
        } else {
            let outer_delta = new_total - self.inner.score - self.outer.score;
            self.outer.score += outer_delta;
            delta.outer_delta = outer_delta;
        }

        if self.outer.score >= outer_capacity {
            if self.outer.score > outer_capacity {
                // Single-lap assumption: a total jumping past both rings in
                // one update clamps at the outer rim.
                let excess = self.outer.score - outer_capacity;
                warn!(excess, "outer meter overfilled in one update; clamping");
                self.outer.score = outer_capacity;
                if delta.outer_delta >= excess {
                    delta.outer_delta -= excess;
                } else {
                    let remainder = excess - delta.outer_delta;
                    delta.outer_delta = 0;
                    delta.overflow_diff = delta.overflow_diff.saturating_sub(remainder);
                }
            }
            self.outer.done = true;
        }

        let total = self.total();
        let tier_count = meter.tier_count();
        while self.current_tier < tier_count && meter.ceiling_for_tier(self.current_tier) < total {
            self.current_tier += 1;
            self.pending_ceilings
                .push(meter.ceiling_for_tier(self.current_tier));
        }

        let step_basis = delta.inner_delta + delta.overflow_diff + delta.outer_delta;
        if step_basis > 0 {
            self.step_seconds = self.fill_seconds / step_basis as f32;
        }

        delta
    }

    /// Raises one activation per newly active milestone between the current
    /// count and `charge`, each with its trigger offset inside the running
    /// fill window. `charge` is computed by the game-state service.
    fn activate_up_to(&mut self, charge: u32, score_at_tick_start: u32) -> Vec<MilestoneActivation> {
        let mut fired = Vec::new();
        if charge == self.active_milestones {
            return fired;
        }
        if charge > MILESTONE_COUNT {
            warn!(charge, "milestone charge above milestone count; ignoring");
            return fired;
        }
        if charge < self.active_milestones {
            warn!(
                charge,
                active = self.active_milestones,
                "milestone charge decreased; ignoring"
            );
            return fired;
        }

        let thresholds = self.meter_def().milestone_thresholds();
        for index in self.active_milestones..charge {
            let threshold = thresholds[index as usize];
            let steps = threshold.saturating_sub(score_at_tick_start);
            fired.push(MilestoneActivation {
                index,
                at_seconds: steps as f32 * self.step_seconds + self.arm_delay_seconds,
            });
        }
        self.active_milestones = charge;
        fired
    }

    /// Spends one armed milestone. Returns the consumed index, or None when
    /// nothing is armed (logged, never fatal).
    fn consume_one(&mut self) -> Option<u32> {
        if self.consumed_milestones < self.active_milestones {
            let index = self.consumed_milestones;
            self.consumed_milestones += 1;
            Some(index)
        } else {
            warn!(
                active = self.active_milestones,
                "milestone consume requested with none armed"
            );
            None
        }
    }

    fn reset_milestones(&mut self) {
        self.active_milestones = 0;
        self.consumed_milestones = 0;
    }

    /// Bonus configuration: fresh scores, bonus tier table, outer ring
    /// parked done (the bonus mode only plays the inner ring).
    fn enter_bonus(&mut self) {
        self.inner = MeterTrack::default();
        self.outer = MeterTrack {
            score: 0,
            done: true,
            busy: false,
        };
        self.carry_pending = false;
        self.reset_milestones();
        self.current_tier = 1;
        self.mode = MeterMode::Bonus;
        self.step_seconds = 0.0;
        self.pending_ceilings.clear();
    }

    /// Full reset back to the regular configuration; loses all progress.
    fn reset_to_regular(&mut self) {
        self.inner = MeterTrack::default();
        self.outer = MeterTrack::default();
        self.carry_pending = false;
        self.reset_milestones();
        self.current_tier = 1;
        self.mode = MeterMode::Regular;
        self.step_seconds = 0.0;
        self.pending_ceilings.clear();
    }

    /// Every bonus spin restarts the inner ring from empty.
    fn reset_bonus_spin(&mut self) {
        self.inner.score = 0;
        self.inner.done = false;
        self.inner.busy = false;
        self.outer.score = 0;
        self.carry_pending = false;
        self.current_tier = 1;
        self.pending_ceilings.clear();
    }

    fn take_pending_ceilings(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.pending_ceilings)
    }

    fn finish_fill(&mut self) {
        self.inner.busy = false;
        self.outer.busy = false;
        self.carry_pending = false;
    }

    /// Appends the meter fill cues for an applied delta. The per-meter busy
    /// flags are set here and cleared by `finish_fill` when the owning
    /// timeline completes; a zero delta appends nothing and must not replay
    /// first-activation cues.
    fn push_fill_cues(
        &mut self,
        timeline: &mut Timeline<StageCue>,
        start_at: f32,
        delta: &ScoreDelta,
        new_spin: bool,
        timing: &TimingDef,
    ) {
        if new_spin {
            timeline.cue(start_at, StageCue::MeterMaskReset);
        }

        let ceilings = self.take_pending_ceilings();
        if delta.is_zero() {
            return;
        }

        let accumulate = start_at + timing.accumulate_offset_seconds;
        let total_after = self.total();
        let total_delta = delta.inner_delta + delta.overflow_diff + delta.outer_delta;
        let total_before = total_after - total_delta;

        if self.inner_was_zero && delta.inner_delta > 0 {
            timeline.cue(start_at, StageCue::MeterActivated { ring: MeterRing::Inner });
        }
        if self.outer_was_zero && (delta.overflow_diff > 0 || delta.outer_delta > 0) {
            timeline.cue(start_at, StageCue::MeterActivated { ring: MeterRing::Outer });
        }

        timeline.cue(start_at, StageCue::StarPulse);
        let big = delta.inner_delta == 0;
        timeline.cue(accumulate - 0.3, StageCue::Shockwave { big });
        timeline.cue(accumulate - 0.45, StageCue::ArrowsWin);

        let mut fill_end = accumulate;
        if delta.inner_delta > 0 {
            let seconds = delta.inner_delta as f32 * self.step_seconds;
            self.inner.busy = true;
            timeline.cue(
                accumulate,
                StageCue::InnerFillStart {
                    from: self.inner.score - delta.inner_delta,
                    to: self.inner.score,
                    seconds,
                },
            );
            fill_end += seconds;
        }
        if delta.overflow_diff > 0 {
            // Carry tick: the outer ring starts the moment the inner rim is
            // reached, one step after the inner fill ends.
            let seconds = delta.overflow_diff as f32 * self.step_seconds;
            self.outer.busy = true;
            timeline.cue(
                fill_end + self.step_seconds,
                StageCue::OuterFillStart {
                    from: self.outer.score - delta.overflow_diff,
                    to: self.outer.score,
                    seconds,
                },
            );
            fill_end += self.step_seconds + seconds;
        }
        if delta.outer_delta > 0 {
            let seconds = delta.outer_delta as f32 * self.step_seconds;
            self.outer.busy = true;
            timeline.cue(
                accumulate,
                StageCue::OuterFillStart {
                    from: self.outer.score - delta.outer_delta,
                    to: self.outer.score,
                    seconds,
                },
            );
            fill_end += seconds;
        }

        timeline.cue(
            accumulate,
            StageCue::CounterRoll {
                from: total_before,
                to: total_after,
                seconds: fill_end - accumulate,
            },
        );
        for ceiling in ceilings {
            timeline.cue(accumulate, StageCue::TierCeiling { ceiling });
        }

        timeline.hold_until(fill_end.max(start_at + self.fill_seconds));
    }
}
