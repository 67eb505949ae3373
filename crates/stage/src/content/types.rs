use crate::play::{LayoutTable, Vec2};

pub const METER_SECTOR_COUNT: usize = 4;
pub const BOARD_SIZE: usize = 42;

/// Sector widths for one game mode. The inner ring carries the milestone
/// sectors; milestone thresholds are its prefix sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeterDef {
    pub inner_sectors: [u32; METER_SECTOR_COUNT],
    pub outer_sectors: [u32; METER_SECTOR_COUNT],
}

impl MeterDef {
    pub fn inner_capacity(&self) -> u32 {
        self.inner_sectors.iter().sum()
    }

    pub fn outer_capacity(&self) -> u32 {
        self.outer_sectors.iter().sum()
    }

    pub fn total_capacity(&self) -> u32 {
        self.inner_capacity().saturating_add(self.outer_capacity())
    }

    pub fn milestone_thresholds(&self) -> [u32; METER_SECTOR_COUNT] {
        let mut thresholds = [0u32; METER_SECTOR_COUNT];
        let mut acc = 0u32;
        for (slot, width) in thresholds.iter_mut().zip(self.inner_sectors) {
            acc = acc.saturating_add(width);
            *slot = acc;
        }
        thresholds
    }

    pub fn tier_count(&self) -> usize {
        METER_SECTOR_COUNT * 2
    }

    /// Display ceiling for a 1-based tier index: the prefix sum of sector
    /// widths across both rings up to that tier.
    pub fn ceiling_for_tier(&self, tier: usize) -> u32 {
        let tier = tier.clamp(1, self.tier_count());
        self.inner_sectors
            .iter()
            .chain(self.outer_sectors.iter())
            .take(tier)
            .sum()
    }
}

/// Authored durations, all in seconds except the fast-play factor. Every
/// value pairs with the fast factor through `speed_mode` at the call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingDef {
    pub fill_seconds: f32,
    pub spin_in_seconds: f32,
    pub refill_seconds: f32,
    pub payout_reveal_seconds: f32,
    pub payout_gap_seconds: f32,
    pub bonus_payout_gap_seconds: f32,
    pub wild_burst_seconds: f32,
    pub keg_drop_seconds: f32,
    pub kraken_intro_seconds: f32,
    pub strike_spacing_seconds: f32,
    pub strike_splash_offset_seconds: f32,
    pub strike_spawn_offset_seconds: f32,
    pub strike_duration_seconds: f32,
    pub milestone_arm_delay_seconds: f32,
    pub accumulate_offset_seconds: f32,
    pub bonus_intro_seconds: f32,
    pub bonus_outro_seconds: f32,
    pub fast_factor: f32,
}

impl Default for TimingDef {
    fn default() -> Self {
        Self {
            fill_seconds: 1.012,
            spin_in_seconds: 0.9,
            refill_seconds: 0.6,
            payout_reveal_seconds: 0.45,
            payout_gap_seconds: 0.2,
            bonus_payout_gap_seconds: 0.4,
            wild_burst_seconds: 0.8,
            keg_drop_seconds: 0.4,
            kraken_intro_seconds: 1.5,
            strike_spacing_seconds: 0.5,
            strike_splash_offset_seconds: 1.2,
            strike_spawn_offset_seconds: 1.4,
            strike_duration_seconds: 2.6,
            milestone_arm_delay_seconds: 0.4,
            accumulate_offset_seconds: 0.45,
            bonus_intro_seconds: 2.0,
            bonus_outro_seconds: 2.0,
            fast_factor: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KrakenDef {
    pub stage_sizes: Vec<u32>,
    pub max_minion_hp: u8,
}

impl Default for KrakenDef {
    fn default() -> Self {
        Self {
            stage_sizes: vec![4, 5, 6],
            max_minion_hp: 4,
        }
    }
}

impl KrakenDef {
    pub fn total_capacity(&self) -> u32 {
        self.stage_sizes.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLayout {
    pub meter_anchor: Vec2,
    pub meter_scale: f32,
    pub kraken_panel_anchor: Vec2,
    pub kraken_panel_scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationDefs {
    pub regular_meter: MeterDef,
    pub bonus_meter: MeterDef,
    pub timing: TimingDef,
    pub kraken: KrakenDef,
    pub layout: LayoutTable<SceneLayout>,
    pub board_size: usize,
}

impl PresentationDefs {
    pub fn milestone_count(&self) -> u32 {
        METER_SECTOR_COUNT as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter() -> MeterDef {
        MeterDef {
            inner_sectors: [10, 15, 20, 25],
            outer_sectors: [30, 40, 50, 60],
        }
    }

    #[test]
    fn capacities_sum_sectors() {
        assert_eq!(meter().inner_capacity(), 70);
        assert_eq!(meter().outer_capacity(), 180);
        assert_eq!(meter().total_capacity(), 250);
    }

    #[test]
    fn milestone_thresholds_are_inner_prefix_sums() {
        assert_eq!(meter().milestone_thresholds(), [10, 25, 45, 70]);
    }

    #[test]
    fn tier_ceiling_walks_both_rings() {
        let meter = meter();
        assert_eq!(meter.ceiling_for_tier(1), 10);
        assert_eq!(meter.ceiling_for_tier(4), 70);
        assert_eq!(meter.ceiling_for_tier(5), 100);
        assert_eq!(meter.ceiling_for_tier(8), 250);
        assert_eq!(meter.ceiling_for_tier(99), 250);
        assert_eq!(meter.ceiling_for_tier(0), 10);
    }

    #[test]
    fn kraken_capacity_sums_stages() {
        assert_eq!(KrakenDef::default().total_capacity(), 15);
    }
}
