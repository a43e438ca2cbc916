use std::time::{Duration, Instant};

pub const FLING_THRESHOLD_MS: i64 = 1500;

/// How interaction boosts are sized and coalesced on a given chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePolicy {
    /// Skip a boost whose end is already covered by the previous one.
    Coverage {
        default_ms: i64,
        extra_ms: i64,
        max_ms: i64,
    },
    /// Skip short boosts arriving too soon after the previous one.
    MinGap {
        default_ms: i64,
        min_gap_ms: i64,
        short_ms: i64,
        elapsed_cap_ms: i64,
    },
}

impl DebouncePolicy {
    pub const COVERAGE: Self = Self::Coverage {
        default_ms: 1500,
        extra_ms: 750,
        max_ms: 5750,
    };

    pub const MIN_GAP: Self = Self::MinGap {
        default_ms: 500,
        min_gap_ms: 250,
        short_ms: 750,
        elapsed_cap_ms: 750,
    };

    /// Effective boost duration for a caller-supplied hint payload.
    pub fn duration_ms(&self, requested: Option<i32>) -> i64 {
        match *self {
            Self::Coverage {
                default_ms,
                extra_ms,
                max_ms,
            } => match requested {
                Some(ms) => {
                    let padded = i64::from(ms) + extra_ms;
                    if padded > default_ms {
                        padded.min(max_ms)
                    } else {
                        default_ms
                    }
                }
                None => default_ms,
            },
            Self::MinGap { default_ms, .. } => match requested {
                Some(ms) if ms > 0 => i64::from(ms),
                _ => default_ms,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostSize {
    Fling,
    Small,
}

impl BoostSize {
    pub fn for_duration(duration_ms: i64) -> Self {
        if duration_ms >= FLING_THRESHOLD_MS {
            Self::Fling
        } else {
            Self::Small
        }
    }
}

/// Last accepted interaction boost, on the monotonic clock.
#[derive(Debug, Clone, Default)]
pub struct InteractionDebounce {
    last: Option<Instant>,
    last_duration_ms: i64,
}

impl InteractionDebounce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a boost of `duration_ms` at `now` should be applied.
    /// Accepting records `now` and the duration.
    pub fn admit(&mut self, policy: &DebouncePolicy, now: Instant, duration_ms: i64) -> bool {
        let elapsed_us = self
            .last
            .map(|t| now.saturating_duration_since(t))
            .map(|d| i64::try_from(d.as_micros()).unwrap_or(i64::MAX));

        let suppress = match (*policy, elapsed_us) {
            (_, None) => false,
            (DebouncePolicy::Coverage { .. }, Some(elapsed_us)) => {
                self.last_duration_ms.saturating_mul(1000)
                    > elapsed_us.saturating_add(duration_ms.saturating_mul(1000))
            }
            (
                DebouncePolicy::MinGap {
                    min_gap_ms,
                    short_ms,
                    elapsed_cap_ms,
                    ..
                },
                Some(elapsed_us),
            ) => {
                let elapsed_us = elapsed_us.min(elapsed_cap_ms * 1000);
                elapsed_us < min_gap_ms * 1000 && duration_ms <= short_ms
            }
        };

        if suppress {
            return false;
        }
        self.last = Some(now);
        self.last_duration_ms = duration_ms;
        true
    }

    pub fn last_duration(&self) -> Option<Duration> {
        self.last
            .map(|_| Duration::from_millis(self.last_duration_ms.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn coverage_duration_is_padded_and_clamped() {
        let p = DebouncePolicy::COVERAGE;
        assert_eq!(p.duration_ms(None), 1500);
        assert_eq!(p.duration_ms(Some(100)), 1500);
        assert_eq!(p.duration_ms(Some(1000)), 1750);
        assert_eq!(p.duration_ms(Some(9000)), 5750);
        assert_eq!(p.duration_ms(Some(i32::MAX)), 5750);
    }

    #[test]
    fn min_gap_duration_uses_positive_payload() {
        let p = DebouncePolicy::MIN_GAP;
        assert_eq!(p.duration_ms(None), 500);
        assert_eq!(p.duration_ms(Some(0)), 500);
        assert_eq!(p.duration_ms(Some(-4)), 500);
        assert_eq!(p.duration_ms(Some(2000)), 2000);
    }

    #[test]
    fn covered_request_is_suppressed_until_window_ends() {
        let p = DebouncePolicy::COVERAGE;
        let mut d = InteractionDebounce::new();
        let t0 = Instant::now();

        assert!(d.admit(&p, t0, 1500));
        assert!(!d.admit(&p, t0 + ms(200), 100));
        assert!(d.admit(&p, t0 + ms(1600), 100));
    }

    #[test]
    fn longer_request_extends_past_covered_window() {
        let p = DebouncePolicy::COVERAGE;
        let mut d = InteractionDebounce::new();
        let t0 = Instant::now();

        assert!(d.admit(&p, t0, 1500));
        // 200ms + 1500ms reaches past the previous 1500ms window.
        assert!(d.admit(&p, t0 + ms(200), 1500));
        assert_eq!(d.last_duration(), Some(ms(1500)));
    }

    #[test]
    fn clock_going_backwards_counts_as_zero_elapsed() {
        let p = DebouncePolicy::COVERAGE;
        let mut d = InteractionDebounce::new();
        let t0 = Instant::now() + ms(10_000);

        assert!(d.admit(&p, t0, 5750));
        assert!(!d.admit(&p, t0 - ms(5000), 1500));
    }

    #[test]
    fn min_gap_skips_short_bursts_only() {
        let p = DebouncePolicy::MIN_GAP;
        let mut d = InteractionDebounce::new();
        let t0 = Instant::now();

        assert!(d.admit(&p, t0, 500));
        assert!(!d.admit(&p, t0 + ms(100), 500));
        assert!(d.admit(&p, t0 + ms(150), 1500));
        assert!(d.admit(&p, t0 + ms(450), 500));
    }

    #[test]
    fn fling_threshold() {
        assert_eq!(BoostSize::for_duration(1500), BoostSize::Fling);
        assert_eq!(BoostSize::for_duration(1499), BoostSize::Small);
    }
}
