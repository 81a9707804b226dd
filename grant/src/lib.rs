mod error;
mod pool;
mod round;

pub use self::{
    error::GrantError,
    pool::{
        contribution_until_height, daily_pool_contribution, AuthorityEntity, AuthorityEntry,
        AuthoritySetClient, FactoidsPerDay, DEFAULT_AUTHORITY_SET_URL,
    },
    round::{
        activation_height, current_round, estimate_height_for_date, payout_date, payout_estimate,
        payout_height, payout_time, GrantRound, BLOCKS_PER_DAY, BLOCK_INTERVAL_SECS,
    },
};
