use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Factom produces one directory block every 10 minutes.
pub const BLOCK_INTERVAL_SECS: i64 = 600;
pub const BLOCKS_PER_DAY: u32 = 144;

/// Grant payouts activate 1000 blocks after the coinbase descriptor to leave
/// room for a coinbase cancel.
const COINBASE_CANCEL_WINDOW: u32 = 1000;

/// A quarterly grant round, identified by the year of its payout.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GrantRound {
    pub year: i32,
    pub quarter: u8,
}

impl fmt::Display for GrantRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.year, self.quarter)
    }
}

/// The round whose payout comes next after `now`.
///
/// December dates belong to the first round of the following year once the
/// Dec 1 payout has passed.
pub fn current_round(now: DateTime<Utc>) -> GrantRound {
    let year = now.year();
    for quarter in 1..=4 {
        let round = GrantRound { year, quarter };
        if payout_time(round) > now {
            return round;
        }
    }
    GrantRound {
        year: year + 1,
        quarter: 1,
    }
}

/// Payout dates are the first of March, June, September and December.
pub fn payout_date(round: GrantRound) -> NaiveDate {
    let month = match round.quarter {
        1 => 3,
        2 => 6,
        3 => 9,
        _ => 12,
    };
    NaiveDate::from_ymd_opt(round.year, month, 1).expect("first of a month is a valid date")
}

/// Payouts are anchored at 12:00:01 UTC on the payout date.
pub fn payout_time(round: GrantRound) -> DateTime<Utc> {
    let naive = payout_date(round)
        .and_hms_opt(12, 0, 1)
        .expect("12:00:01 is a valid time");
    Utc.from_utc_datetime(&naive)
}

/// Estimate the height the chain will have reached at `target_time`, assuming
/// one block per `BLOCK_INTERVAL_SECS`. A target in the past estimates the
/// current height.
pub fn estimate_height_for_date(
    current_height: u32,
    current_time: DateTime<Utc>,
    target_time: DateTime<Utc>,
) -> u32 {
    let delta = target_time.signed_duration_since(current_time).num_seconds();
    if delta <= 0 {
        return current_height;
    }
    let blocks = (delta as f64 / BLOCK_INTERVAL_SECS as f64).round() as u32;
    current_height + blocks
}

/// Snap an estimated height onto the coinbase descriptor grid: descriptors
/// only occur at heights one past a multiple of 25.
pub fn payout_height(estimate: u32) -> u32 {
    estimate - estimate % 25 + 1
}

/// The height at which the payout activates, `COINBASE_CANCEL_WINDOW` blocks
/// before the descriptor pays out.
pub fn activation_height(payout: u32) -> u32 {
    payout.saturating_sub(COINBASE_CANCEL_WINDOW)
}

/// The current round together with its estimated payout height.
pub fn payout_estimate(current_height: u32, now: DateTime<Utc>) -> (GrantRound, u32) {
    let round = current_round(now);
    let estimate = estimate_height_for_date(current_height, now, payout_time(round));
    (round, payout_height(estimate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn rounds_follow_the_next_payout() {
        assert_eq!(
            current_round(at(2026, 1, 15)),
            GrantRound {
                year: 2026,
                quarter: 1
            }
        );
        assert_eq!(
            current_round(at(2026, 4, 10)),
            GrantRound {
                year: 2026,
                quarter: 2
            }
        );
        assert_eq!(
            current_round(at(2026, 7, 1)),
            GrantRound {
                year: 2026,
                quarter: 3
            }
        );
        assert_eq!(
            current_round(at(2026, 10, 5)),
            GrantRound {
                year: 2026,
                quarter: 4
            }
        );
        // After the Dec 1 payout the next round belongs to the new year.
        assert_eq!(
            current_round(at(2026, 12, 15)),
            GrantRound {
                year: 2027,
                quarter: 1
            }
        );
    }

    #[test]
    fn round_boundaries_use_the_payout_instant() {
        let round = GrantRound {
            year: 2026,
            quarter: 1,
        };
        let just_before = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let just_after = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 2).unwrap();
        assert_eq!(current_round(just_before), round);
        assert_eq!(
            current_round(just_after),
            GrantRound {
                year: 2026,
                quarter: 2
            }
        );
    }

    #[test]
    fn payout_dates_per_quarter() {
        let date = |q| {
            payout_date(GrantRound {
                year: 2026,
                quarter: q,
            })
        };
        assert_eq!(date(1), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(date(2), NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        assert_eq!(date(3), NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        assert_eq!(date(4), NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
    }

    #[test]
    fn one_day_ahead_is_144_blocks() {
        let now = at(2026, 1, 1);
        let tomorrow = at(2026, 1, 2);
        assert_eq!(estimate_height_for_date(1000, now, tomorrow), 1144);
    }

    #[test]
    fn past_targets_estimate_the_current_height() {
        let now = at(2026, 1, 2);
        let yesterday = at(2026, 1, 1);
        assert_eq!(estimate_height_for_date(1000, now, yesterday), 1000);
    }

    #[test]
    fn payout_heights_sit_one_past_a_multiple_of_25() {
        assert_eq!(payout_height(1000), 1001);
        assert_eq!(payout_height(1013), 1001);
        assert_eq!(payout_height(1025), 1026);
        assert_eq!(payout_height(1026), 1026);
    }

    #[test]
    fn activation_precedes_payout_by_the_cancel_window() {
        assert_eq!(activation_height(2026), 1026);
        assert_eq!(activation_height(500), 0);
    }

    #[test]
    fn round_display() {
        let round = GrantRound {
            year: 2026,
            quarter: 2,
        };
        assert_eq!(round.to_string(), "2026.2");
    }
}
