//! Second-phase pool assignment under the fixed cross-group seeding rule.
//!
//! Each first-phase group sends exactly one qualifier to pool X and one
//! to pool Y, so two teams from the same group never share a pool.
//! For one group with qualifiers (1st, 2nd):
//!   - both seeds qualified      -> each takes its designated pool
//!   - only the X seed qualified -> it takes X, the other takes Y
//!   - only the Y seed qualified -> it takes Y, the other takes X
//!   - neither seed qualified    -> 1st takes X, 2nd takes Y

use crate::{
    field::ResolvedSeeding,
    first_phase::FirstPhaseOutcome,
    types::{Pool, TeamIdx},
};

pub const POOL_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPair {
    pub x: TeamIdx,
    pub y: TeamIdx,
}

/// Second-phase pools, each in the order groups were assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pools {
    pub x: Vec<TeamIdx>,
    pub y: Vec<TeamIdx>,
}

impl Pools {
    pub fn members(&self, pool: Pool) -> &[TeamIdx] {
        match pool {
            Pool::X => &self.x,
            Pool::Y => &self.y,
        }
    }
}

/// Route one group's ordered top two into pools.
pub fn assign_group(first: TeamIdx, second: TeamIdx, seeding: &ResolvedSeeding) -> PoolPair {
    let is_x = |t: TeamIdx| seeding.x == Some(t);
    let is_y = |t: TeamIdx| seeding.y == Some(t);

    // Both seeds qualified
    if is_x(first) && is_y(second) {
        return PoolPair { x: first, y: second };
    }
    if is_y(first) && is_x(second) {
        return PoolPair { x: second, y: first };
    }

    // Only the X seed qualified
    if is_x(first) {
        return PoolPair { x: first, y: second };
    }
    if is_x(second) {
        return PoolPair { x: second, y: first };
    }

    // Only the Y seed qualified
    if is_y(first) {
        return PoolPair { x: second, y: first };
    }
    if is_y(second) {
        return PoolPair { x: first, y: second };
    }

    PoolPair { x: first, y: second }
}

/// Build both pools from every group's qualifiers.
///
/// Returns None when the result is not exactly POOL_SIZE teams per pool:
/// a group without a seeding entry or with fewer than two qualifiers
/// contributes nothing, which invalidates the trial.
pub fn assign_pools(outcome: &FirstPhaseOutcome<'_>) -> Option<Pools> {
    let mut pools = Pools { x: Vec::with_capacity(POOL_SIZE), y: Vec::with_capacity(POOL_SIZE) };

    for group in &outcome.groups {
        let Some(seeding) = group.group.seeding.as_ref() else {
            continue;
        };
        let [first, second] = group.qualifiers[..] else {
            continue;
        };
        let pair = assign_group(first, second, seeding);
        pools.x.push(pair.x);
        pools.y.push(pair.y);
    }

    if pools.x.len() != POOL_SIZE || pools.y.len() != POOL_SIZE {
        log::debug!(
            "seeding: pool sizes {}/{} invalid, trial discarded",
            pools.x.len(), pools.y.len()
        );
        return None;
    }
    Some(pools)
}
