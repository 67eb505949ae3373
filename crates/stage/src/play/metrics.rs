use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::warn;

static METRICS_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_metrics_lock_poison_once(operation: &'static str) {
    if METRICS_LOCK_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "metrics lock poisoned; recovered inner value");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackMetricsSnapshot {
    pub rounds_completed: u32,
    pub rounds_stalled: u32,
    pub ticks_total: u32,
    pub scene_switches: u32,
}

#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    snapshot: Arc<RwLock<PlaybackMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> PlaybackMetricsSnapshot {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn_metrics_lock_poison_once("read");
                *poisoned.into_inner()
            }
        }
    }

    pub(crate) fn publish(&self, snapshot: PlaybackMetricsSnapshot) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                warn_metrics_lock_poison_once("write");
                let mut guard = poisoned.into_inner();
                *guard = snapshot;
            }
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    rounds_completed: u32,
    rounds_stalled: u32,
    ticks_total: u32,
    scene_switches: u32,
}

impl MetricsRecorder {
    pub(crate) fn record_round(&mut self, ticks: u32) {
        self.rounds_completed = self.rounds_completed.saturating_add(1);
        self.ticks_total = self.ticks_total.saturating_add(ticks);
    }

    pub(crate) fn record_stall(&mut self, ticks: u32) {
        self.rounds_stalled = self.rounds_stalled.saturating_add(1);
        self.ticks_total = self.ticks_total.saturating_add(ticks);
    }

    pub(crate) fn record_scene_switch(&mut self) {
        self.scene_switches = self.scene_switches.saturating_add(1);
    }

    pub(crate) fn snapshot(&self) -> PlaybackMetricsSnapshot {
        PlaybackMetricsSnapshot {
            rounds_completed: self.rounds_completed,
            rounds_stalled: self.rounds_stalled,
            ticks_total: self.ticks_total,
            scene_switches: self.scene_switches,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;
    use std::thread;

    use super::*;

    fn poison_lock(lock: &RwLock<PlaybackMetricsSnapshot>) {
        thread::scope(|scope| {
            let _ = scope
                .spawn(|| {
                    let _guard = lock.write().expect("write guard");
                    panic!("poison metrics lock");
                })
                .join();
        });
    }

    #[test]
    fn recorder_accumulates_counts() {
        let mut recorder = MetricsRecorder::default();
        recorder.record_round(120);
        recorder.record_round(60);
        recorder.record_scene_switch();
        recorder.record_stall(999);

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.rounds_completed, 2);
        assert_eq!(snapshot.rounds_stalled, 1);
        assert_eq!(snapshot.ticks_total, 1179);
        assert_eq!(snapshot.scene_switches, 1);
    }

    #[test]
    fn snapshot_recovers_after_poison_without_panic() {
        let handle = MetricsHandle::default();
        poison_lock(handle.snapshot.as_ref());

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.rounds_completed, 0);
    }

    #[test]
    fn publish_recovers_after_poison_without_panic() {
        let handle = MetricsHandle::default();
        poison_lock(handle.snapshot.as_ref());

        let expected = PlaybackMetricsSnapshot {
            rounds_completed: 3,
            rounds_stalled: 0,
            ticks_total: 450,
            scene_switches: 2,
        };
        handle.publish(expected);

        let actual = handle.snapshot();
        assert_eq!(actual.rounds_completed, expected.rounds_completed);
        assert_eq!(actual.ticks_total, expected.ticks_total);
        assert_eq!(actual.scene_switches, expected.scene_switches);
    }
}
