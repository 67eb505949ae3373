use std::collections::HashMap;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCueKind {
    OneShot,
    Loop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEvent {
    pub kind: AudioCueKind,
    pub name: String,
    pub tag: Option<String>,
    pub delay_ms: u32,
}

/// Fire-and-forget sound queue. The round code only ever pushes; the
/// external audio service drains. Nothing in the round sequence waits on,
/// or reads back from, this bus.
#[derive(Debug, Default)]
pub struct AudioBus {
    queued: Vec<AudioEvent>,
    emitted_total: u32,
}

impl AudioBus {
    pub fn play(&mut self, name: &str) {
        self.push(AudioCueKind::OneShot, name, None, 0);
    }

    pub fn play_tagged(&mut self, name: &str, tag: &str, delay_ms: u32) {
        self.push(AudioCueKind::OneShot, name, Some(tag), delay_ms);
    }

    pub fn play_loop(&mut self, track: &str, name: &str) {
        self.push(AudioCueKind::Loop, name, Some(track), 0);
    }

    fn push(&mut self, kind: AudioCueKind, name: &str, tag: Option<&str>, delay_ms: u32) {
        self.queued.push(AudioEvent {
            kind,
            name: name.to_string(),
            tag: tag.map(str::to_string),
            delay_ms,
        });
        self.emitted_total = self.emitted_total.saturating_add(1);
    }

    pub fn drain(&mut self) -> Vec<AudioEvent> {
        std::mem::take(&mut self.queued)
    }

    pub fn queued(&self) -> &[AudioEvent] {
        &self.queued
    }

    pub fn emitted_total(&self) -> u32 {
        self.emitted_total
    }
}

/// Picks a sound variant from a group, never repeating the group's previous
/// pick. Groups with one variant repeat by necessity.
#[derive(Debug, Default)]
pub struct VariantPicker {
    last_by_group: HashMap<String, String>,
}

impl VariantPicker {
    pub fn pick(&mut self, group: &str, variants: &[&str]) -> String {
        if variants.is_empty() {
            warn!(group, "empty sound variant group");
            return String::new();
        }

        let last = self.last_by_group.get(group).map(String::as_str);
        let candidates: Vec<&str> = variants
            .iter()
            .copied()
            .filter(|variant| Some(*variant) != last)
            .collect();
        let picked = if candidates.is_empty() {
            variants[0]
        } else {
            candidates[fastrand::usize(..candidates.len())]
        };

        self.last_by_group
            .insert(group.to_string(), picked.to_string());
        picked.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_queues_in_emission_order_and_drains() {
        let mut bus = AudioBus::default();
        bus.play("waves_1");
        bus.play_tagged("coin_2", "payout", 70);
        bus.play_loop("mainTheme", "main_theme_regular");

        let drained = bus.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].name, "waves_1");
        assert_eq!(drained[1].tag.as_deref(), Some("payout"));
        assert_eq!(drained[1].delay_ms, 70);
        assert_eq!(drained[2].kind, AudioCueKind::Loop);
        assert!(bus.queued().is_empty());
        assert_eq!(bus.emitted_total(), 3);
    }

    #[test]
    fn picker_never_repeats_previous_variant() {
        let mut picker = VariantPicker::default();
        let variants = ["a", "b", "c"];
        let mut previous = picker.pick("group", &variants);
        for _ in 0..50 {
            let next = picker.pick("group", &variants);
            assert_ne!(next, previous);
            previous = next;
        }
    }

    #[test]
    fn single_variant_group_repeats() {
        let mut picker = VariantPicker::default();
        assert_eq!(picker.pick("solo", &["only"]), "only");
        assert_eq!(picker.pick("solo", &["only"]), "only");
    }

    #[test]
    fn groups_track_last_pick_independently() {
        let mut picker = VariantPicker::default();
        let a = picker.pick("a", &["x", "y"]);
        let b = picker.pick("b", &[a.as_str()]);
        assert_eq!(a, b);
    }
}
