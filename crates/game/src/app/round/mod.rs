use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use stage::{
    speed_mode, AudioBus, Capabilities, Device, KrakenDef, LoggingPresenter, MeterDef, Orientation,
    PlayerInput, PresentationDefs, Presenter, Scene, SceneCommand, SceneKey, SceneLayout,
    SkipController, Timeline, TimingDef, VariantPicker,
};
use tracing::{debug, info, warn};

const MILESTONE_COUNT: u32 = 4;
const KEG_CONVERT_OFFSET_SECONDS: f32 = 2.1;
const WILD_FLY_DELAY_SECONDS: f32 = 0.25;
const MINION_COUNTER_OFF_SECONDS: f32 = 0.0;
const MINION_FLY_OFF_SECONDS: f32 = 0.5;
const RESPAWN_HOLD_SECONDS: f32 = 0.4;

const SYMBOL_PIRATE: u8 = 1;
const SYMBOL_CAPTAIN: u8 = 2;
const SYMBOL_GIRL: u8 = 3;
const SYMBOL_SAILOR: u8 = 4;

// Board cells are 1-based in the strike animation rig.
const UNDER_SHIP_STRIKE_CELLS: [usize; 10] = [5, 11, 12, 13, 18, 19, 20, 25, 26, 27];
const STRIKE_PUNCH_GROUPS: [&[usize]; 11] = [
    &[5, 12],
    &[7, 14],
    &[9, 16, 23],
    &[10, 17, 24, 31],
    &[11, 18, 25],
    &[12, 19, 26],
    &[13, 20, 27],
    &[19, 26, 33, 40],
    &[21, 28, 35],
    &[32, 39],
    &[34, 41],
];

const SOUNDS_COMPASS_ACTIVATE: [&str; 4] = [
    "compass_activate_1",
    "compass_activate_2",
    "compass_activate_3",
    "compass_activate_4",
];
const SOUNDS_CANNON_IGNITES: [&str; 2] = ["cannon_ignites_1", "cannon_ignites_2"];
const SOUNDS_CANNON_SHOOTS: [&str; 3] = ["cannon_shoots_1", "cannon_shoots_2", "cannon_shoots_3"];
const SOUNDS_WAVES: [&str; 3] = ["waves_1", "waves_2", "waves_3"];
const SOUNDS_COIN: [&str; 3] = ["coin_1", "coin_2", "coin_3"];
const SOUNDS_BARREL_EXPLODES: [&str; 3] = [
    "barrel_explodes_1",
    "barrel_explodes_2",
    "barrel_explodes_3",
];
const SOUNDS_KRAKEN_TENTACLES: [&str; 4] = [
    "kraken_tentacles_1",
    "kraken_tentacles_2",
    "kraken_tentacles_3",
    "kraken_tentacles_4",
];
const SOUNDS_KRAKEN_SCREAM: [&str; 3] = ["kraken_scream_1", "kraken_scream_2", "kraken_scream_3"];
const SOUNDS_KRAKEN_STRIKE: [&str; 4] = [
    "kraken_strike_1",
    "kraken_strike_2",
    "kraken_strike_3",
    "kraken_strike_4",
];

include!("types.rs");
include!("accumulator.rs");
include!("kraken.rs");
include!("strikes.rs");
include!("orchestrator.rs");
include!("scene_impl.rs");
include!("util.rs");

pub(crate) fn build_scene(defs: PresentationDefs) -> KrakenScene {
    KrakenScene::new(defs)
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
