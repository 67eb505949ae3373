#[derive(Debug, Clone, PartialEq)]
struct TimedCue<C> {
    at_seconds: f32,
    cue: C,
}

/// An ordered list of timed cues with a total duration. This is the whole
/// contract the round code has with the animation side: a timeline can be
/// advanced by fixed-dt ticks, queried for completion, or forced to its end
/// state, firing every remaining cue in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<C> {
    cues: Vec<TimedCue<C>>,
    duration_seconds: f32,
    elapsed_seconds: f32,
    next_index: usize,
}

impl<C> Default for Timeline<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Timeline<C> {
    pub fn new() -> Self {
        Self {
            cues: Vec::new(),
            duration_seconds: 0.0,
            elapsed_seconds: 0.0,
            next_index: 0,
        }
    }

    /// Schedules a cue. Negative offsets clamp to the timeline start; cues
    /// sharing an offset fire in insertion order.
    pub fn cue(&mut self, at_seconds: f32, cue: C) -> &mut Self {
        let at_seconds = if at_seconds.is_finite() {
            at_seconds.max(0.0)
        } else {
            0.0
        };
        let insert_at = self
            .cues
            .partition_point(|timed| timed.at_seconds <= at_seconds);
        self.cues.insert(insert_at, TimedCue { at_seconds, cue });
        if at_seconds > self.duration_seconds {
            self.duration_seconds = at_seconds;
        }
        self
    }

    /// Extends the total duration past the last cue (trailing hold).
    pub fn hold_until(&mut self, seconds: f32) -> &mut Self {
        if seconds.is_finite() && seconds > self.duration_seconds {
            self.duration_seconds = seconds;
        }
        self
    }

    pub fn duration_seconds(&self) -> f32 {
        self.duration_seconds
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed_seconds
    }

    pub fn pending_cues(&self) -> usize {
        self.cues.len() - self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty() && self.duration_seconds <= 0.0
    }

    pub fn finished(&self) -> bool {
        self.next_index >= self.cues.len() && self.elapsed_seconds >= self.duration_seconds
    }
}

impl<C: Clone> Timeline<C> {
    /// Advances playback by `dt_seconds` and returns the cues whose offsets
    /// were crossed, in schedule order.
    pub fn advance(&mut self, dt_seconds: f32) -> Vec<C> {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return Vec::new();
        }
        self.elapsed_seconds = (self.elapsed_seconds + dt_seconds).min(self.duration_seconds);

        let mut fired = Vec::new();
        while self.next_index < self.cues.len()
            && self.cues[self.next_index].at_seconds <= self.elapsed_seconds
        {
            fired.push(self.cues[self.next_index].cue.clone());
            self.next_index += 1;
        }
        fired
    }

    /// Completes the timeline synchronously: every pending cue fires in
    /// schedule order and the play head lands on the end.
    pub fn jump_to_end(&mut self) -> Vec<C> {
        self.elapsed_seconds = self.duration_seconds;
        let mut fired = Vec::new();
        while self.next_index < self.cues.len() {
            fired.push(self.cues[self.next_index].cue.clone());
            self.next_index += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_cues_in_schedule_order() {
        let mut timeline = Timeline::new();
        timeline.cue(0.5, "mid").cue(0.0, "start").cue(1.0, "end");

        assert_eq!(timeline.advance(0.25), vec!["start"]);
        assert_eq!(timeline.advance(0.25), vec!["mid"]);
        assert!(!timeline.finished());
        assert_eq!(timeline.advance(10.0), vec!["end"]);
        assert!(timeline.finished());
    }

    #[test]
    fn equal_offsets_keep_insertion_order() {
        let mut timeline = Timeline::new();
        timeline.cue(0.2, "a").cue(0.2, "b").cue(0.2, "c");
        assert_eq!(timeline.advance(0.2), vec!["a", "b", "c"]);
    }

    #[test]
    fn jump_fires_all_pending_cues_once() {
        let mut timeline = Timeline::new();
        timeline.cue(0.0, 1).cue(0.4, 2).cue(0.8, 3);
        assert_eq!(timeline.advance(0.1), vec![1]);

        assert_eq!(timeline.jump_to_end(), vec![2, 3]);
        assert!(timeline.finished());
        assert_eq!(timeline.jump_to_end(), Vec::<i32>::new());
    }

    #[test]
    fn hold_extends_duration_past_last_cue() {
        let mut timeline = Timeline::new();
        timeline.cue(0.1, "only").hold_until(1.0);
        assert_eq!(timeline.advance(0.5), vec!["only"]);
        assert!(!timeline.finished());
        timeline.advance(0.5);
        assert!(timeline.finished());
    }

    #[test]
    fn negative_offset_clamps_to_start() {
        let mut timeline = Timeline::new();
        timeline.cue(-0.3, "early");
        assert_eq!(timeline.advance(0.001), vec!["early"]);
    }

    #[test]
    fn empty_timeline_is_finished_without_advancing() {
        let timeline: Timeline<u8> = Timeline::new();
        assert!(timeline.is_empty());
        assert!(timeline.finished());
    }

    #[test]
    fn zero_or_negative_dt_is_a_noop() {
        let mut timeline = Timeline::new();
        timeline.cue(0.0, "start");
        assert!(timeline.advance(0.0).is_empty());
        assert!(timeline.advance(-1.0).is_empty());
        assert_eq!(timeline.pending_cues(), 1);
    }
}
