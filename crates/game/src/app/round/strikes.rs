/// Strike punches address 1-based cells; grouped cells share one sweeping
/// punch animation in the rig.
fn punch_animation_name(position: usize) -> String {
    let cell = position + 1;
    for group in STRIKE_PUNCH_GROUPS {
        if group.contains(&cell) {
            let joined: Vec<String> = group.iter().map(usize::to_string).collect();
            return format!("punch_{}", joined.join("_"));
        }
    }
    format!("punch_{cell}")
}

fn is_under_ship(position: usize) -> bool {
    UNDER_SHIP_STRIKE_CELLS.contains(&(position + 1))
}

/// Schedules one batch of tentacle strikes starting at `start_at`. A strike
/// on a powder keg converts the cell to a wild; every other strike splashes
/// and rigs a minion (unless spawning is latched off). The minion state
/// itself is mutated by the orchestrator before this timeline plays.
fn push_strike_cues(
    timeline: &mut Timeline<StageCue>,
    start_at: f32,
    strikes: &[StrikeScript],
    keg_positions: &HashSet<usize>,
    spawn_allowed: bool,
    timing: &TimingDef,
) -> f32 {
    if strikes.is_empty() {
        return start_at;
    }

    timeline.cue(start_at, StageCue::TentacleIdle);

    let mut last_base = start_at;
    for (idx, strike) in strikes.iter().enumerate() {
        let base = start_at + idx as f32 * timing.strike_spacing_seconds;
        last_base = base;

        timeline.cue(
            base,
            StageCue::TentaclePunch {
                name: punch_animation_name(strike.position),
                under_ship: is_under_ship(strike.position),
            },
        );
        timeline.cue(base + timing.strike_splash_offset_seconds, StageCue::SceneShake);

        if keg_positions.contains(&strike.position) {
            timeline.cue(
                base + KEG_CONVERT_OFFSET_SECONDS,
                StageCue::SymbolToWild {
                    position: strike.position,
                },
            );
        } else {
            timeline.cue(
                base + timing.strike_splash_offset_seconds,
                StageCue::Splash {
                    position: strike.position,
                },
            );
            if spawn_allowed {
                timeline.cue(
                    base + timing.strike_spawn_offset_seconds,
                    StageCue::MinionRig {
                        position: strike.position,
                        hp: strike.minion_hp,
                    },
                );
            }
        }
    }

    let end = last_base + timing.strike_duration_seconds;
    timeline.hold_until(end);
    end
}
