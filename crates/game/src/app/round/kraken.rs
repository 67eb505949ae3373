#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KrakenWildSize {
    ThreeByThree,
    FourByFour,
    FiveByFive,
}

impl KrakenWildSize {
    fn from_cluster_len(len: usize) -> Option<Self> {
        match len {
            9 => Some(Self::ThreeByThree),
            16 => Some(Self::FourByFour),
            25 => Some(Self::FiveByFive),
            _ => None,
        }
    }

    fn as_token(self) -> &'static str {
        match self {
            Self::ThreeByThree => "3x3",
            Self::FourByFour => "4x4",
            Self::FiveByFive => "5x5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MinionHit {
    position: usize,
    hp_after: u8,
}

/// Per-position minions with hit points. Spawned by tentacle splashes,
/// chipped by winning clusters, despawned by the script's dead list or a
/// field-wide wipe when the largest bonus stage completes.
#[derive(Debug, Default)]
pub(crate) struct MinionField {
    minions: BTreeMap<usize, u8>,
    stop_spawning: bool,
}

impl MinionField {
    fn spawn(&mut self, position: usize, hp: u8, max_hp: u8) -> bool {
        if self.stop_spawning {
            return false;
        }
        if self.minions.contains_key(&position) {
            warn!(position, "minion spawn on occupied position; ignoring");
            return false;
        }
        let hp = if hp == 0 || hp > max_hp {
            warn!(position, hp, max_hp, "minion hp out of range; clamping");
            hp.clamp(1, max_hp)
        } else {
            hp
        };
        self.minions.insert(position, hp);
        true
    }

    /// Knocks one hit point off every minion covered by a winning cluster.
    /// Hit points floor at 1; removal is script-driven (`kill`).
    fn counter_off(&mut self, winner_indexes: &[usize]) -> Vec<MinionHit> {
        let mut hits = Vec::new();
        for position in winner_indexes {
            if let Some(hp) = self.minions.get_mut(position) {
                *hp = hp.saturating_sub(1).max(1);
                hits.push(MinionHit {
                    position: *position,
                    hp_after: *hp,
                });
            }
        }
        hits
    }

    fn kill(&mut self, position: usize) -> bool {
        self.minions.remove(&position).is_some()
    }

    fn die_all(&mut self) -> Vec<usize> {
        let positions: Vec<usize> = self.minions.keys().copied().collect();
        self.minions.clear();
        positions
    }

    fn set_stop_spawning(&mut self) {
        self.stop_spawning = true;
    }

    fn stop_spawning(&self) -> bool {
        self.stop_spawning
    }

    fn len(&self) -> usize {
        self.minions.len()
    }

    #[cfg(test)]
    fn hp(&self, position: usize) -> Option<u8> {
        self.minions.get(&position).copied()
    }

    fn reset(&mut self) {
        self.minions.clear();
        self.stop_spawning = false;
    }
}

/// Bonus-mode stage tracker: one row of items per kraken growth stage.
/// The item count comes from the game-state service as a running total of
/// finished mini-krakens; the panel converts it to stage-relative lights.
#[derive(Debug)]
pub(crate) struct KrakenPanel {
    stage_sizes: Vec<u32>,
    stage: usize,
    active_items: u32,
}

impl KrakenPanel {
    fn new(def: &KrakenDef) -> Self {
        Self {
            stage_sizes: def.stage_sizes.clone(),
            stage: 0,
            active_items: 0,
        }
    }

    #[cfg(test)]
    fn stage(&self) -> usize {
        self.stage
    }

    fn stage_capacity(&self) -> u32 {
        self.stage_sizes.get(self.stage).copied().unwrap_or(0)
    }

    fn stage_floor(&self) -> u32 {
        self.stage_sizes.iter().take(self.stage).sum()
    }

    #[cfg(test)]
    fn total_capacity(&self) -> u32 {
        self.stage_sizes.iter().sum()
    }

    #[cfg(test)]
    fn active_items(&self) -> u32 {
        self.active_items
    }

    /// Lights items up to the stage-relative share of `total_finished`.
    /// Returns the newly lit item indexes; the lit count never decreases.
    fn activate_items(&mut self, total_finished: u32) -> Vec<u32> {
        let target = total_finished
            .saturating_sub(self.stage_floor())
            .min(self.stage_capacity());
        if target < self.active_items {
            warn!(
                target,
                active = self.active_items,
                "finished mini-kraken count decreased; ignoring"
            );
            return Vec::new();
        }
        let newly: Vec<u32> = (self.active_items..target).collect();
        self.active_items = target;
        newly
    }

    fn is_stage_complete(&self) -> bool {
        self.stage_capacity() > 0 && self.active_items == self.stage_capacity()
    }

    fn advance_stage(&mut self) -> Option<u32> {
        if self.stage + 1 >= self.stage_sizes.len() {
            return None;
        }
        self.stage += 1;
        self.active_items = 0;
        Some(self.stage as u32)
    }

    fn reset(&mut self) {
        self.stage = 0;
        self.active_items = 0;
    }
}
