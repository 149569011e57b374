//! Movement construction and delta derivation.
//!
//! Amounts are stored as positive magnitudes everywhere; the sign is
//! derived per side here: the source loses the amount, the destination
//! gains it. This is the single authority on how an approved operation
//! affects balances.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::error::LedgerError;
use crate::operation::types::OperationKind;

/// The balance-affecting shape of an operation.
///
/// Exactly one side is set for deposits and withdrawals; both sides are
/// set (and distinct) for transfers. Construction via [`Movement::new`]
/// is the only way to obtain a `Movement`, so holders can rely on the
/// shape invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    source: Option<Uuid>,
    destination: Option<Uuid>,
    amount: Decimal,
}

impl Movement {
    /// Builds a movement for an operation, enforcing shape invariants.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if `amount <= 0`, `SameAccountTransfer`
    /// if a transfer names the same account twice, and one of the
    /// shape-violation variants if the sides do not match the kind.
    /// The shape violations are internal invariant errors: callers
    /// assemble the sides from the operation kind, so hitting one is a
    /// programmer error, not bad user input.
    pub fn new(
        kind: OperationKind,
        source: Option<Uuid>,
        destination: Option<Uuid>,
        amount: Decimal,
    ) -> Result<Self, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount));
        }

        match kind {
            OperationKind::Deposit => {
                if source.is_some() {
                    return Err(LedgerError::UnexpectedSource(kind.as_str()));
                }
                if destination.is_none() {
                    return Err(LedgerError::MissingDestination(kind.as_str()));
                }
            }
            OperationKind::Withdrawal => {
                if destination.is_some() {
                    return Err(LedgerError::UnexpectedDestination(kind.as_str()));
                }
                if source.is_none() {
                    return Err(LedgerError::MissingSource(kind.as_str()));
                }
            }
            OperationKind::Transfer => {
                if source.is_none() {
                    return Err(LedgerError::MissingSource(kind.as_str()));
                }
                if destination.is_none() {
                    return Err(LedgerError::MissingDestination(kind.as_str()));
                }
                if source == destination {
                    return Err(LedgerError::SameAccountTransfer);
                }
            }
        }

        Ok(Self {
            source,
            destination,
            amount,
        })
    }

    /// The account the amount is taken from, if any.
    #[must_use]
    pub const fn source(&self) -> Option<Uuid> {
        self.source
    }

    /// The account the amount is added to, if any.
    #[must_use]
    pub const fn destination(&self) -> Option<Uuid> {
        self.destination
    }

    /// The positive magnitude of the movement.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The signed balance change for the source account.
    #[must_use]
    pub fn source_delta(&self) -> Decimal {
        -self.amount
    }

    /// The signed balance change for the destination account.
    #[must_use]
    pub const fn destination_delta(&self) -> Decimal {
        self.amount
    }

    /// Whether the movement needs funds on its source side.
    #[must_use]
    pub const fn requires_funds(&self) -> bool {
        self.source.is_some()
    }
}

/// Checks that a balance covers a requested amount.
///
/// Used both at operation creation and again under row lock at apply
/// time, so an approval racing another withdrawal cannot overdraw the
/// account (decrement-with-floor).
///
/// # Errors
///
/// Returns `InsufficientFunds` when `available < requested`.
pub fn check_funds(available: Decimal, requested: Decimal) -> Result<(), LedgerError> {
    if available < requested {
        return Err(LedgerError::InsufficientFunds {
            requested,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deposit_shape() {
        let dest = Uuid::new_v4();
        let movement =
            Movement::new(OperationKind::Deposit, None, Some(dest), dec!(50)).unwrap();

        assert_eq!(movement.source(), None);
        assert_eq!(movement.destination(), Some(dest));
        assert_eq!(movement.destination_delta(), dec!(50));
        assert!(!movement.requires_funds());
    }

    #[test]
    fn test_withdrawal_shape() {
        let source = Uuid::new_v4();
        let movement =
            Movement::new(OperationKind::Withdrawal, Some(source), None, dec!(30)).unwrap();

        assert_eq!(movement.source(), Some(source));
        assert_eq!(movement.source_delta(), dec!(-30));
        assert!(movement.requires_funds());
    }

    #[test]
    fn test_transfer_deltas_cancel_out() {
        let source = Uuid::new_v4();
        let dest = Uuid::new_v4();
        let movement =
            Movement::new(OperationKind::Transfer, Some(source), Some(dest), dec!(20)).unwrap();

        assert_eq!(
            movement.source_delta() + movement.destination_delta(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = Movement::new(OperationKind::Deposit, None, Some(Uuid::new_v4()), dec!(0));
        assert_eq!(result, Err(LedgerError::InvalidAmount(dec!(0))));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = Movement::new(
            OperationKind::Withdrawal,
            Some(Uuid::new_v4()),
            None,
            dec!(-5),
        );
        assert_eq!(result, Err(LedgerError::InvalidAmount(dec!(-5))));
    }

    #[test]
    fn test_same_account_transfer_rejected() {
        let account = Uuid::new_v4();
        let result = Movement::new(
            OperationKind::Transfer,
            Some(account),
            Some(account),
            dec!(10),
        );
        assert_eq!(result, Err(LedgerError::SameAccountTransfer));
    }

    #[test]
    fn test_deposit_with_source_rejected() {
        let result = Movement::new(
            OperationKind::Deposit,
            Some(Uuid::new_v4()),
            Some(Uuid::new_v4()),
            dec!(10),
        );
        assert!(matches!(result, Err(LedgerError::UnexpectedSource(_))));
    }

    #[test]
    fn test_withdrawal_without_source_rejected() {
        let result = Movement::new(OperationKind::Withdrawal, None, None, dec!(10));
        assert!(matches!(result, Err(LedgerError::MissingSource(_))));
    }

    #[test]
    fn test_check_funds_sufficient() {
        assert!(check_funds(dec!(100), dec!(100)).is_ok());
        assert!(check_funds(dec!(100), dec!(99.99)).is_ok());
    }

    #[test]
    fn test_check_funds_insufficient() {
        let result = check_funds(dec!(10), dec!(50));
        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                requested: dec!(50),
                available: dec!(10),
            })
        );
    }
}
