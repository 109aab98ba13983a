//! Cue scheduler.
//!
//! Tracks the countdown to the next audio cue during a focus period. Fed with
//! whole seconds of newly elapsed time, it reports every cue that should have
//! fired in that span, so a process that missed ticks (a suspended terminal,
//! a busy runtime) catches up instead of firing once and drifting.

use serde::{Deserialize, Serialize};

/// Result of feeding elapsed seconds to a [`CueScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueAdvance {
    /// Cues that came due during the delta.
    pub fired: u64,
    /// Seconds until the next cue, in `1..=interval`.
    pub secs_until_next: u64,
}

/// Countdown to the next cue. Always `1 <= secs_until_next <= interval_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCueScheduler")]
pub struct CueScheduler {
    interval_secs: u64,
    secs_until_next: u64,
}

#[derive(Deserialize)]
struct RawCueScheduler {
    interval_secs: u64,
    secs_until_next: u64,
}

impl TryFrom<RawCueScheduler> for CueScheduler {
    type Error = String;

    fn try_from(raw: RawCueScheduler) -> Result<Self, Self::Error> {
        if raw.interval_secs == 0 {
            return Err("interval_secs must be at least 1".to_string());
        }
        if raw.secs_until_next == 0 || raw.secs_until_next > raw.interval_secs {
            return Err(format!(
                "secs_until_next must be in 1..={} (got {})",
                raw.interval_secs, raw.secs_until_next
            ));
        }
        Ok(Self {
            interval_secs: raw.interval_secs,
            secs_until_next: raw.secs_until_next,
        })
    }
}

impl CueScheduler {
    /// A scheduler whose first cue is one full interval away.
    ///
    /// Intervals below one second are clamped to one.
    pub fn new(interval_secs: u64) -> Self {
        let interval_secs = interval_secs.max(1);
        Self {
            interval_secs,
            secs_until_next: interval_secs,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn secs_until_next(&self) -> u64 {
        self.secs_until_next
    }

    /// Seconds since the last cue (or since the scheduler was reset).
    pub fn secs_since_cue(&self) -> u64 {
        self.interval_secs - self.secs_until_next
    }

    /// Restart the countdown at a full interval.
    pub fn reset(&mut self) {
        self.secs_until_next = self.interval_secs;
    }

    /// Consume `secs_delta` newly elapsed seconds.
    pub fn advance(&mut self, secs_delta: u64) -> CueAdvance {
        let total = self.secs_since_cue().saturating_add(secs_delta);
        let fired = total / self.interval_secs;
        self.secs_until_next = self.interval_secs - total % self.interval_secs;
        CueAdvance {
            fired,
            secs_until_next: self.secs_until_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn counts_down_without_firing() {
        let mut cue = CueScheduler::new(60);
        let adv = cue.advance(1);
        assert_eq!(adv.fired, 0);
        assert_eq!(adv.secs_until_next, 59);
    }

    #[test]
    fn fires_on_the_interval_boundary() {
        let mut cue = CueScheduler::new(60);
        cue.advance(59);
        let adv = cue.advance(1);
        assert_eq!(adv.fired, 1);
        assert_eq!(adv.secs_until_next, 60);
    }

    #[test]
    fn catches_up_after_a_long_gap() {
        let mut cue = CueScheduler::new(60);
        cue.advance(30);
        // 30 + 200 = 230 -> cues at 60, 120, 180; next at 240.
        let adv = cue.advance(200);
        assert_eq!(adv.fired, 3);
        assert_eq!(adv.secs_until_next, 10);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut cue = CueScheduler::new(300);
        cue.advance(42);
        let before = cue;
        let adv = cue.advance(0);
        assert_eq!(adv.fired, 0);
        assert_eq!(cue, before);
    }

    #[test]
    fn reset_restores_full_interval() {
        let mut cue = CueScheduler::new(120);
        cue.advance(100);
        cue.reset();
        assert_eq!(cue.secs_until_next(), 120);
        assert_eq!(cue.secs_since_cue(), 0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let mut cue = CueScheduler::new(0);
        assert_eq!(cue.interval_secs(), 1);
        assert_eq!(cue.advance(5).fired, 5);
    }

    #[test]
    fn deserialize_rejects_zero_interval() {
        let res = serde_json::from_str::<CueScheduler>(
            r#"{"interval_secs":0,"secs_until_next":0}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn deserialize_rejects_wait_beyond_interval() {
        let res = serde_json::from_str::<CueScheduler>(
            r#"{"interval_secs":60,"secs_until_next":120}"#,
        );
        assert!(res.is_err());
        let res = serde_json::from_str::<CueScheduler>(
            r#"{"interval_secs":60,"secs_until_next":0}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn deserialize_keeps_a_valid_countdown() {
        let mut cue = CueScheduler::new(60);
        cue.advance(45);
        let json = serde_json::to_string(&cue).unwrap();
        let mut restored: CueScheduler = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cue);
        assert_eq!(restored.advance(15).fired, 1);
    }

    proptest! {
        #[test]
        fn fire_count_matches_floor_division(
            interval in 1u64..3_600,
            prior in 0u64..10_000,
            delta in 0u64..100_000,
        ) {
            let mut cue = CueScheduler::new(interval);
            cue.advance(prior);
            let prior_since = cue.secs_since_cue();

            let adv = cue.advance(delta);

            prop_assert_eq!(adv.fired, (prior_since + delta) / interval);
            prop_assert!(adv.secs_until_next >= 1);
            prop_assert!(adv.secs_until_next <= interval);
            prop_assert!(cue.secs_since_cue() < interval);
        }

        #[test]
        fn split_deltas_fire_as_often_as_one_big_delta(
            interval in 1u64..600,
            a in 0u64..5_000,
            b in 0u64..5_000,
        ) {
            let mut split = CueScheduler::new(interval);
            let fired_split = split.advance(a).fired + split.advance(b).fired;

            let mut whole = CueScheduler::new(interval);
            let fired_whole = whole.advance(a + b).fired;

            prop_assert_eq!(fired_split, fired_whole);
            prop_assert_eq!(split, whole);
        }
    }
}
