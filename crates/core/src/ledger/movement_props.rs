//! Property tests for movement application over a closed set of accounts.

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::movement::{Movement, check_funds};
use crate::operation::types::OperationKind;

/// Applies a movement to an in-memory balance map, mirroring what the
/// storage layer does under row locks.
fn apply(balances: &mut HashMap<Uuid, Decimal>, movement: &Movement) {
    if let Some(source) = movement.source() {
        *balances.entry(source).or_default() += movement.source_delta();
    }
    if let Some(dest) = movement.destination() {
        *balances.entry(dest).or_default() += movement.destination_delta();
    }
}

/// A randomly generated external action against the closed account set.
#[derive(Debug, Clone)]
enum Action {
    Deposit { account: usize, amount: Decimal },
    Withdrawal { account: usize, amount: Decimal },
    Transfer { from: usize, to: usize, amount: Decimal },
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn action_strategy(accounts: usize) -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..accounts, amount_strategy())
            .prop_map(|(account, amount)| Action::Deposit { account, amount }),
        (0..accounts, amount_strategy())
            .prop_map(|(account, amount)| Action::Withdrawal { account, amount }),
        (0..accounts, 0..accounts, amount_strategy())
            .prop_map(|(from, to, amount)| Action::Transfer { from, to, amount }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any sequence of deposits, withdrawals, and transfers applied
    /// to a closed set of accounts, the total balance changes only by
    /// net external deposits minus net external withdrawals. Transfers
    /// alone never change the total.
    #[test]
    fn prop_money_is_conserved(
        actions in proptest::collection::vec(action_strategy(4), 1..50),
    ) {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut balances: HashMap<Uuid, Decimal> =
            ids.iter().map(|id| (*id, Decimal::new(100_000, 2))).collect();

        let initial_total: Decimal = balances.values().copied().sum();
        let mut net_external = Decimal::ZERO;

        for action in &actions {
            match action {
                Action::Deposit { account, amount } => {
                    let movement = Movement::new(
                        OperationKind::Deposit,
                        None,
                        Some(ids[*account]),
                        *amount,
                    )
                    .unwrap();
                    apply(&mut balances, &movement);
                    net_external += *amount;
                }
                Action::Withdrawal { account, amount } => {
                    let movement = Movement::new(
                        OperationKind::Withdrawal,
                        Some(ids[*account]),
                        None,
                        *amount,
                    )
                    .unwrap();
                    // Skipped when funds do not cover, exactly as the
                    // storage layer rejects the operation.
                    if check_funds(balances[&ids[*account]], *amount).is_ok() {
                        apply(&mut balances, &movement);
                        net_external -= *amount;
                    }
                }
                Action::Transfer { from, to, amount } => {
                    if from == to {
                        continue; // rejected as SameAccountTransfer
                    }
                    let movement = Movement::new(
                        OperationKind::Transfer,
                        Some(ids[*from]),
                        Some(ids[*to]),
                        *amount,
                    )
                    .unwrap();
                    if check_funds(balances[&ids[*from]], *amount).is_ok() {
                        apply(&mut balances, &movement);
                    }
                }
            }
        }

        let final_total: Decimal = balances.values().copied().sum();
        prop_assert_eq!(final_total, initial_total + net_external);
    }

    /// Transfers between validated accounts with sufficient funds move
    /// exactly the magnitude from one side to the other.
    #[test]
    fn prop_transfer_moves_exact_magnitude(amount in amount_strategy()) {
        let source = Uuid::new_v4();
        let dest = Uuid::new_v4();
        let mut balances: HashMap<Uuid, Decimal> = HashMap::new();
        balances.insert(source, Decimal::new(100_000_000, 2));
        balances.insert(dest, Decimal::ZERO);

        let movement =
            Movement::new(OperationKind::Transfer, Some(source), Some(dest), amount).unwrap();
        apply(&mut balances, &movement);

        prop_assert_eq!(balances[&dest], amount);
        prop_assert_eq!(balances[&source], Decimal::new(100_000_000, 2) - amount);
    }
}
