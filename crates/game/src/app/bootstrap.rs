use std::env;
use std::fs;
use std::path::PathBuf;

use stage::{
    load_presentation_defs, resolve_app_paths, AudioBus, Capabilities, Device, Orientation,
    PlayerInput, Scene, Sequencer, SequencerConfig,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use super::round::{self, RoundScript};

const FAST_PLAY_ENV_VAR: &str = "KRAKENREELS_FAST_PLAY";
const SKIP_ENV_VAR: &str = "KRAKENREELS_SKIP";
const CAPABILITY_ENV_VAR: &str = "KRAKENREELS_CAPABILITY";
const DEFAULT_ROUNDS_FILE: &str = "sample_rounds.json";

/// Headless replay: loads the presentation defs and a recorded round-script
/// file, then plays every round through the sequencer.
pub(crate) fn run() -> Result<(), String> {
    init_tracing();
    info!("=== Kraken Reels Presentation Startup ===");

    let paths = resolve_app_paths().map_err(|error| error.to_string())?;
    let defs = load_presentation_defs(&paths).map_err(|error| error.to_string())?;

    let rounds_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.rounds_dir.join(DEFAULT_ROUNDS_FILE));
    let raw = fs::read_to_string(&rounds_path)
        .map_err(|error| format!("read rounds file '{}': {error}", rounds_path.display()))?;
    let rounds = parse_rounds_json(&raw)?;
    if rounds.is_empty() {
        return Err(format!(
            "rounds file '{}' contains no rounds",
            rounds_path.display()
        ));
    }

    let input = PlayerInput::empty()
        .with_fast_play_enabled(env_flag(FAST_PLAY_ENV_VAR))
        .with_skip_pressed(env_flag(SKIP_ENV_VAR));

    let mut audio = AudioBus::default();
    let mut scene = round::build_scene(defs);
    scene.set_capabilities(capabilities_from_env());
    scene.load(&mut audio);

    let mut sequencer =
        Sequencer::new(SequencerConfig::default()).map_err(|error| error.to_string())?;

    let total_rounds = rounds.len();
    for (index, script) in rounds.into_iter().enumerate() {
        let is_last = index + 1 == total_rounds;
        scene.queue_round(script, is_last)?;
        let ticks = sequencer
            .run_until_idle(&mut scene, &input, &mut audio)
            .map_err(|error| error.to_string())?;

        let state = scene.score_state();
        let counts = scene.last_round_counts();
        info!(
            round = index,
            ticks,
            payouts = counts.payout_revealed,
            events = counts.total,
            inner = state.inner_score,
            outer = state.outer_score,
            bonus = scene.bonus_mode(),
            spins_left = scene.remaining_bonus_spins(),
            coins = scene.total_coins(),
            "round_replayed"
        );
        debug!(
            inner_done = state.inner_done,
            outer_done = state.outer_done,
            carry = state.carry_pending,
            tier = state.current_tier,
            "meter_state"
        );
        let sounds = audio.drain();
        debug!(round = index, sounds = sounds.len(), "audio_drained");
    }

    let metrics = sequencer.metrics().snapshot();
    info!(
        rounds = metrics.rounds_completed,
        ticks = metrics.ticks_total,
        scene_switches = metrics.scene_switches,
        coins = scene.total_coins(),
        "replay_finished"
    );
    scene.unload(&mut audio);
    Ok(())
}

fn parse_rounds_json(raw: &str) -> Result<Vec<RoundScript>, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, Vec<RoundScript>>(&mut deserializer) {
        Ok(rounds) => Ok(rounds),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse rounds json: {source}"))
            } else {
                Err(format!("parse rounds json at {path}: {source}"))
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn env_flag(var: &str) -> bool {
    env::var(var)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn capabilities_from_env() -> Capabilities {
    let raw = env::var(CAPABILITY_ENV_VAR).unwrap_or_default();
    match raw.as_str() {
        "" | "desktop" => Capabilities {
            device: Device::Desktop,
            orientation: Orientation::Landscape,
        },
        "mobile-landscape" => Capabilities {
            device: Device::Mobile,
            orientation: Orientation::Landscape,
        },
        "mobile-portrait" => Capabilities {
            device: Device::Mobile,
            orientation: Orientation::Portrait,
        },
        other => {
            warn!(capability = other, "unknown capability; using desktop");
            Capabilities {
                device: Device::Desktop,
                orientation: Orientation::Landscape,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_rounds_file() {
        let raw = r#"[
            {
                "playgrounds": [
                    {
                        "refill_symbols": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0],
                        "payouts": [{ "indexes": [1, 2, 3], "symbol": 1, "coefficient": 25 }],
                        "total_score_after": 3
                    }
                ]
            }
        ]"#;
        let rounds = parse_rounds_json(raw).expect("rounds");
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].playgrounds[0].payouts[0].coefficient, 25);
        assert!(!rounds[0].bonus_triggered);
    }

    #[test]
    fn parse_error_reports_json_path() {
        let raw = r#"[
            {
                "playgrounds": [
                    {
                        "refill_symbols": [0],
                        "total_score_after": "not-a-number"
                    }
                ]
            }
        ]"#;
        let error = parse_rounds_json(raw).expect_err("must fail");
        assert!(error.contains("total_score_after"), "error was: {error}");
    }

    #[test]
    fn env_flag_accepts_one_and_true() {
        assert!(!env_flag("KRAKENREELS_TEST_UNSET_FLAG"));
    }
}
