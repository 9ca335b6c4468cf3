use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::SettleError;

pub type UserId = u64;

/// One user's part in an expense, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub user: UserId,
    pub lent: i64,
    pub owed: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: UserId,
    pub to: UserId,
    pub amount: i64,
}

/// Net `lent - owed` per user. Users whose shares cancel out are dropped.
pub fn net_balances(shares: &[Share]) -> BTreeMap<UserId, i64> {
    let mut balances = BTreeMap::new();
    for share in shares {
        *balances.entry(share.user).or_insert(0) += share.lent - share.owed;
    }
    balances.retain(|_, amount| *amount != 0);
    balances
}

/// Greedy settlement: repeatedly move `min(deficit, surplus)` from the most
/// indebted user to the most owed one.
///
/// Produces at most `n - 1` transfers for `n` users with a non-zero balance,
/// and the transferred total equals the sum of positive balances.
pub fn settle(balances: &BTreeMap<UserId, i64>) -> Result<Vec<Transfer>, SettleError> {
    let residual: i64 = balances.values().sum();
    if residual != 0 {
        return Err(SettleError::Unbalanced { residual });
    }

    let mut sorted: Vec<(UserId, i64)> = balances
        .iter()
        .filter(|(_, amount)| **amount != 0)
        .map(|(user, amount)| (*user, *amount))
        .collect();
    sorted.sort_by_key(|(user, amount)| (*amount, *user));

    let mut transfers = Vec::new();
    if sorted.is_empty() {
        return Ok(transfers);
    }

    let (mut low, mut high) = (0, sorted.len() - 1);
    while low < high {
        let (debtor, deficit) = sorted[low];
        let (creditor, surplus) = sorted[high];
        let amount = deficit.abs().min(surplus);

        transfers.push(Transfer {
            from: debtor,
            to: creditor,
            amount,
        });
        sorted[low].1 += amount;
        sorted[high].1 -= amount;

        if sorted[low].1 == 0 {
            low += 1;
        }
        if sorted[high].1 == 0 {
            high -= 1;
        }
    }

    debug!(
        action = "complete",
        component = "settlement",
        participants = sorted.len(),
        transfers = transfers.len(),
        "Settled balances"
    );
    Ok(transfers)
}
