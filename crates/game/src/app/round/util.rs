/// Union of all winning-cluster indexes of a playground, sorted and
/// deduplicated so minion counter-offs land once per position.
fn winner_indexes(payouts: &[PayoutScript]) -> Vec<usize> {
    let mut indexes: Vec<usize> = payouts
        .iter()
        .flat_map(|payout| payout.indexes.iter().copied())
        .collect();
    indexes.sort_unstable();
    indexes.dedup();
    indexes
}

/// Voice line for a winning symbol. Character symbols carry fixed lines;
/// everything else falls back to a coin clink variant.
fn symbol_voice(symbol: u8, picker: &mut VariantPicker, fast_play: bool) -> (String, u32) {
    match symbol {
        SYMBOL_PIRATE => (
            "pirate_green".to_string(),
            speed_mode(fast_play, 550.0, 400.0) as u32,
        ),
        SYMBOL_CAPTAIN => (
            "pirate_captain".to_string(),
            speed_mode(fast_play, 860.0, 650.0) as u32,
        ),
        SYMBOL_GIRL => (
            "pirate_girl".to_string(),
            speed_mode(fast_play, 450.0, 350.0) as u32,
        ),
        SYMBOL_SAILOR => (
            "pirate_black".to_string(),
            speed_mode(fast_play, 200.0, 70.0) as u32,
        ),
        _ => (
            picker.pick("coin", &SOUNDS_COIN),
            speed_mode(fast_play, 210.0, 50.0) as u32,
        ),
    }
}

fn play_music(audio: &mut AudioBus, bonus: bool) {
    let mode = if bonus { "bonus" } else { "regular" };
    audio.play_loop("mainTheme", &format!("main_theme_{mode}"));
    audio.play_loop("ocean", &format!("background_ocean_{mode}"));
}
