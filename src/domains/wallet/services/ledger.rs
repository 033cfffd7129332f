// =====================================================
// 지갑 원장 상태 머신
// Wallet Ledger State Machine
// =====================================================
// 역할: 거래 상태 전이와 잔액 변화량을 계산하는 순수 함수 모음
//
// - DB에 접근하지 않음 (WalletService가 행 잠금 후 호출)
// - 잘못된 전이는 에러로 거절
// - 잔액이 음수가 되는 전이는 항상 거절
//
// 전이 규칙:
// | 작업                | 대상               | 결과 상태   | 잔액 변화 |
// |---------------------|--------------------|-------------|-----------|
// | 게이트웨이 finished | pending deposit    | completed   | +amount   |
// | 게이트웨이 expired  | pending deposit    | expired     | 0         |
// | 게이트웨이 failed   | pending deposit    | failed      | 0         |
// | 관리자 승인         | pending withdraw   | approved    | -amount   |
// | 관리자 거절         | pending            | rejected    | 0         |
// | 사용자 취소         | pending            | cancelled   | 0         |
// | 만료 스윕           | pending deposit    | expired     | 0         |
// | 조정 (환불 등)      | 신규               | completed   | ±amount   |
// =====================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::domains::wallet::models::{
    Direction, PaymentStatus, TransactionStatus, TransactionType, WalletTransaction,
};
use crate::shared::errors::WalletError;

/// 금액 소수점 최대 자리수 (DB NUMERIC(20, 8))
pub const AMOUNT_SCALE: u32 = 8;

/// 금액/잔액 최대값: 999,999,999,999.99999999 (NUMERIC(20, 8)에 들어가는 최대값)
/// Largest amount or balance the NUMERIC(20, 8) columns can hold
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x630F_FFFF, 0x6BC7_5E2D, 0x5, false, AMOUNT_SCALE);

/// 상태 전이 결과
/// Result of a ledger transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: TransactionStatus,
    /// 지갑 잔액 변화량 (부호 포함)
    /// Signed balance delta
    pub balance_delta: Decimal,
}

impl Transition {
    fn without_balance_change(to: TransactionStatus) -> Self {
        Self { to, balance_delta: Decimal::ZERO }
    }
}

/// 게이트웨이 상태 업데이트 처리 결과
/// Outcome of a gateway status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// 종료 상태로 전이
    Settle(Transition),
    /// 아직 진행 중 (payment_status만 기록)
    InProgress,
    /// 이미 종료된 거래 (중복 IPN) - 아무것도 하지 않음
    AlreadySettled,
}

/// 금액 검증: 양수, 소수점 8자리 이하
/// Validate a money amount
pub fn validate_amount(amount: Decimal) -> Result<(), WalletError> {
    if amount <= Decimal::ZERO {
        return Err(WalletError::Validation("amount must be greater than 0".to_string()));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(WalletError::Validation(format!(
            "amount must have at most {} decimal places",
            AMOUNT_SCALE
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(WalletError::Validation(format!(
            "amount must not exceed {}",
            MAX_AMOUNT
        )));
    }
    Ok(())
}

/// 잔액에 변화량 적용 (음수 불가)
/// Apply a signed delta, refusing to go below zero
pub fn apply_delta(balance: Decimal, delta: Decimal) -> Result<Decimal, WalletError> {
    let next = balance
        .checked_add(delta)
        .filter(|next| *next <= MAX_AMOUNT)
        .ok_or_else(|| {
            WalletError::Validation(format!("balance must not exceed {}", MAX_AMOUNT))
        })?;
    if next < Decimal::ZERO {
        return Err(WalletError::InsufficientBalance {
            available: balance,
            required: -delta,
        });
    }
    Ok(next)
}

/// 출금 요청 가능 여부 (대기 중인 출금 합계 차감 후 비교)
/// Check a new withdrawal against balance minus already-pending withdrawals
pub fn check_withdrawable(
    balance: Decimal,
    pending_withdrawals: Decimal,
    amount: Decimal,
) -> Result<(), WalletError> {
    let available = (balance - pending_withdrawals).max(Decimal::ZERO);
    if amount > available {
        return Err(WalletError::InsufficientBalance { available, required: amount });
    }
    Ok(())
}

fn ensure_pending(tx: &WalletTransaction, action: &'static str) -> Result<(), WalletError> {
    if tx.status.is_terminal() {
        return Err(WalletError::InvalidTransition {
            action,
            status: tx.status.to_string(),
        });
    }
    Ok(())
}

fn ensure_type(
    tx: &WalletTransaction,
    expected: TransactionType,
    action: &'static str,
) -> Result<(), WalletError> {
    if tx.tx_type != expected {
        return Err(WalletError::WrongTransactionType {
            action,
            tx_type: tx.tx_type.to_string(),
        });
    }
    Ok(())
}

/// 게이트웨이 상태 반영 (IPN 또는 폴링)
/// Apply a payment gateway status to a deposit
///
/// 종료된 거래에 대한 업데이트는 `AlreadySettled`로 무시되므로
/// 같은 IPN이 여러 번 와도 입금은 한 번만 반영됨
pub fn on_payment_update(
    tx: &WalletTransaction,
    status: PaymentStatus,
) -> Result<GatewayOutcome, WalletError> {
    ensure_type(tx, TransactionType::Deposit, "apply payment update to")?;

    if tx.status.is_terminal() {
        return Ok(GatewayOutcome::AlreadySettled);
    }

    let outcome = match status {
        PaymentStatus::Finished => GatewayOutcome::Settle(Transition {
            to: TransactionStatus::Completed,
            balance_delta: tx.amount,
        }),
        PaymentStatus::Expired => {
            GatewayOutcome::Settle(Transition::without_balance_change(TransactionStatus::Expired))
        }
        PaymentStatus::Failed | PaymentStatus::Refunded => {
            GatewayOutcome::Settle(Transition::without_balance_change(TransactionStatus::Failed))
        }
        PaymentStatus::Waiting
        | PaymentStatus::Confirming
        | PaymentStatus::Confirmed
        | PaymentStatus::Sending
        | PaymentStatus::PartiallyPaid => GatewayOutcome::InProgress,
    };

    Ok(outcome)
}

/// 출금 승인: 잔액 차감
/// Approve a pending withdrawal; the balance must cover it
pub fn approve_withdrawal(tx: &WalletTransaction, balance: Decimal) -> Result<Transition, WalletError> {
    ensure_type(tx, TransactionType::Withdraw, "approve")?;
    ensure_pending(tx, "approve")?;

    let delta = -tx.amount;
    apply_delta(balance, delta)?;

    Ok(Transition { to: TransactionStatus::Approved, balance_delta: delta })
}

/// 관리자 거절
pub fn reject(tx: &WalletTransaction) -> Result<Transition, WalletError> {
    ensure_pending(tx, "reject")?;
    Ok(Transition::without_balance_change(TransactionStatus::Rejected))
}

/// 사용자 취소
pub fn cancel(tx: &WalletTransaction) -> Result<Transition, WalletError> {
    ensure_pending(tx, "cancel")?;
    Ok(Transition::without_balance_change(TransactionStatus::Cancelled))
}

/// 만료 처리 (스케줄러)
/// Expire a pending deposit once its deadline has passed
///
/// # Returns
/// * `Ok(Some(_))` - 만료 대상
/// * `Ok(None)` - 아직 만료 시간이 지나지 않음 (또는 만료 시간 없음)
pub fn expire(tx: &WalletTransaction, now: DateTime<Utc>) -> Result<Option<Transition>, WalletError> {
    ensure_type(tx, TransactionType::Deposit, "expire")?;
    ensure_pending(tx, "expire")?;

    match tx.expires_at {
        Some(deadline) if deadline <= now => {
            Ok(Some(Transition::without_balance_change(TransactionStatus::Expired)))
        }
        _ => Ok(None),
    }
}

/// 관리자 조정 거래 (환불/수수료/캐시백/서비스 구매)
/// Immediate adjustment, created directly as completed
pub fn adjustment(
    tx_type: TransactionType,
    amount: Decimal,
    balance: Decimal,
) -> Result<Transition, WalletError> {
    if !tx_type.is_adjustment() {
        return Err(WalletError::WrongTransactionType {
            action: "post adjustment for",
            tx_type: tx_type.to_string(),
        });
    }
    validate_amount(amount)?;

    let delta = match tx_type.direction() {
        Direction::Credit => amount,
        Direction::Debit => -amount,
    };
    apply_delta(balance, delta)?;

    Ok(Transition { to: TransactionStatus::Completed, balance_delta: delta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use chrono::Duration;
    use crate::domains::wallet::models::{Network, WithdrawDestination};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn create_test_tx(id: u64, tx_type: TransactionType, amount: &str) -> WalletTransaction {
        let now = Utc::now();
        WalletTransaction {
            id,
            wallet_id: 1,
            tx_type,
            status: TransactionStatus::Pending,
            amount: dec(amount),
            network: Some(Network::Bep20),
            payment_id: Some(format!("pay-{}", id)),
            payment_status: Some(PaymentStatus::Waiting),
            pay_address: None,
            pay_amount: None,
            pay_currency: None,
            destination: None,
            description: None,
            admin_note: None,
            processed_by: None,
            expires_at: Some(now + Duration::minutes(60)),
            processed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 테스트용 인메모리 원장 (WalletService의 처리 순서를 그대로 흉내냄)
    struct MemoryLedger {
        balance: Decimal,
        txs: HashMap<String, WalletTransaction>,
    }

    impl MemoryLedger {
        fn new(balance: &str) -> Self {
            Self { balance: dec(balance), txs: HashMap::new() }
        }

        fn add(&mut self, tx: WalletTransaction) {
            self.txs.insert(tx.payment_id.clone().unwrap(), tx);
        }

        fn ipn(&mut self, payment_id: &str, status: PaymentStatus) -> GatewayOutcome {
            let tx = self.txs.get_mut(payment_id).unwrap();
            let outcome = on_payment_update(tx, status).unwrap();
            if let GatewayOutcome::Settle(t) = outcome {
                self.balance = apply_delta(self.balance, t.balance_delta).unwrap();
                tx.status = t.to;
            }
            tx.payment_status = Some(status);
            outcome
        }
    }

    #[test]
    fn test_finished_deposit_credits_exactly_once() {
        // 50 USDT BEP20 입금 → finished IPN 두 번 → 잔액 +50 한 번만
        let mut ledger = MemoryLedger::new("0");
        ledger.add(create_test_tx(1, TransactionType::Deposit, "50"));

        ledger.ipn("pay-1", PaymentStatus::Confirming);
        assert_eq!(ledger.balance, Decimal::ZERO);

        let first = ledger.ipn("pay-1", PaymentStatus::Finished);
        assert!(matches!(first, GatewayOutcome::Settle(_)));
        assert_eq!(ledger.balance, dec("50"));

        let second = ledger.ipn("pay-1", PaymentStatus::Finished);
        assert_eq!(second, GatewayOutcome::AlreadySettled);
        assert_eq!(ledger.balance, dec("50"));
    }

    #[test]
    fn test_late_finished_after_expired_is_ignored() {
        let mut ledger = MemoryLedger::new("10");
        ledger.add(create_test_tx(2, TransactionType::Deposit, "30"));

        ledger.ipn("pay-2", PaymentStatus::Expired);
        assert_eq!(ledger.txs["pay-2"].status, TransactionStatus::Expired);

        assert_eq!(ledger.ipn("pay-2", PaymentStatus::Finished), GatewayOutcome::AlreadySettled);
        assert_eq!(ledger.balance, dec("10"));
    }

    #[test]
    fn test_non_terminal_gateway_states_keep_pending() {
        let tx = create_test_tx(3, TransactionType::Deposit, "20");
        for status in [
            PaymentStatus::Waiting,
            PaymentStatus::Confirming,
            PaymentStatus::Confirmed,
            PaymentStatus::Sending,
            PaymentStatus::PartiallyPaid,
        ] {
            assert_eq!(on_payment_update(&tx, status).unwrap(), GatewayOutcome::InProgress);
        }

        for status in [PaymentStatus::Failed, PaymentStatus::Refunded] {
            assert_eq!(
                on_payment_update(&tx, status).unwrap(),
                GatewayOutcome::Settle(Transition {
                    to: TransactionStatus::Failed,
                    balance_delta: Decimal::ZERO,
                })
            );
        }
    }

    #[test]
    fn test_payment_update_on_withdraw_is_rejected() {
        let tx = create_test_tx(4, TransactionType::Withdraw, "20");
        assert!(matches!(
            on_payment_update(&tx, PaymentStatus::Finished),
            Err(WalletError::WrongTransactionType { .. })
        ));
    }

    #[test]
    fn test_approve_withdrawal_debits_balance() {
        let mut tx = create_test_tx(5, TransactionType::Withdraw, "40");
        tx.destination = Some(WithdrawDestination::Crypto {
            network: Network::Trc20,
            address: "TXYZ".to_string(),
        });

        let t = approve_withdrawal(&tx, dec("100")).unwrap();
        assert_eq!(t.to, TransactionStatus::Approved);
        assert_eq!(apply_delta(dec("100"), t.balance_delta).unwrap(), dec("60"));
    }

    #[test]
    fn test_approve_withdrawal_never_goes_negative() {
        let tx = create_test_tx(6, TransactionType::Withdraw, "100.5");
        let err = approve_withdrawal(&tx, dec("100")).unwrap_err();
        assert!(matches!(err, WalletError::InsufficientBalance { .. }));

        // 정확히 같은 금액은 허용 (잔액 0)
        let tx = create_test_tx(7, TransactionType::Withdraw, "100");
        let t = approve_withdrawal(&tx, dec("100")).unwrap();
        assert_eq!(apply_delta(dec("100"), t.balance_delta).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_terminal_transactions_are_immutable() {
        for status in [
            TransactionStatus::Approved,
            TransactionStatus::Rejected,
            TransactionStatus::Completed,
            TransactionStatus::Cancelled,
            TransactionStatus::Expired,
            TransactionStatus::Failed,
        ] {
            let mut tx = create_test_tx(8, TransactionType::Withdraw, "1");
            tx.status = status;
            assert!(matches!(reject(&tx), Err(WalletError::InvalidTransition { .. })));
            assert!(matches!(cancel(&tx), Err(WalletError::InvalidTransition { .. })));
            assert!(matches!(
                approve_withdrawal(&tx, dec("10")),
                Err(WalletError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_reject_and_cancel_leave_balance_unchanged() {
        let tx = create_test_tx(9, TransactionType::Withdraw, "10");
        assert_eq!(reject(&tx).unwrap().balance_delta, Decimal::ZERO);
        assert_eq!(cancel(&tx).unwrap().balance_delta, Decimal::ZERO);
        assert_eq!(cancel(&tx).unwrap().to, TransactionStatus::Cancelled);
    }

    #[test]
    fn test_expire_only_after_deadline() {
        let mut tx = create_test_tx(10, TransactionType::Deposit, "10");
        let deadline = Utc::now();
        tx.expires_at = Some(deadline);

        assert_eq!(expire(&tx, deadline - Duration::seconds(1)).unwrap(), None);
        let t = expire(&tx, deadline).unwrap().unwrap();
        assert_eq!(t.to, TransactionStatus::Expired);
        assert_eq!(t.balance_delta, Decimal::ZERO);

        tx.expires_at = None;
        assert_eq!(expire(&tx, deadline).unwrap(), None);
    }

    #[test]
    fn test_adjustments() {
        let refund = adjustment(TransactionType::Refund, dec("5"), dec("0")).unwrap();
        assert_eq!(refund.balance_delta, dec("5"));
        assert_eq!(refund.to, TransactionStatus::Completed);

        let purchase = adjustment(TransactionType::ServicePurchase, dec("30"), dec("30")).unwrap();
        assert_eq!(purchase.balance_delta, dec("-30"));

        assert!(matches!(
            adjustment(TransactionType::Fee, dec("1"), dec("0.5")),
            Err(WalletError::InsufficientBalance { .. })
        ));
        assert!(matches!(
            adjustment(TransactionType::Deposit, dec("1"), dec("0")),
            Err(WalletError::WrongTransactionType { .. })
        ));
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec("0.00000001")).is_ok());
        assert!(validate_amount(dec("10.500000000")).is_ok());
        assert!(matches!(validate_amount(dec("0")), Err(WalletError::Validation(_))));
        assert!(matches!(validate_amount(dec("-1")), Err(WalletError::Validation(_))));
        assert!(matches!(validate_amount(dec("0.000000001")), Err(WalletError::Validation(_))));

        assert_eq!(MAX_AMOUNT, Decimal::new(1_000_000_000_000, 0) - dec("0.00000001"));
        assert!(validate_amount(MAX_AMOUNT).is_ok());
        assert!(matches!(
            validate_amount(dec("1000000000000")),
            Err(WalletError::Validation(_))
        ));
    }

    #[test]
    fn test_huge_amounts_are_rejected_without_overflow() {
        // Decimal::MAX 근처 값도 panic 없이 에러
        assert!(matches!(
            apply_delta(Decimal::ONE, Decimal::MAX),
            Err(WalletError::Validation(_))
        ));
        assert!(matches!(
            adjustment(TransactionType::Refund, Decimal::MAX, Decimal::ONE),
            Err(WalletError::Validation(_))
        ));

        // 잔액 상한을 넘는 입금 반영도 거절
        let tx = create_test_tx(11, TransactionType::Deposit, "1");
        let GatewayOutcome::Settle(t) = on_payment_update(&tx, PaymentStatus::Finished).unwrap() else {
            panic!("finished deposit must settle");
        };
        assert!(matches!(apply_delta(MAX_AMOUNT, t.balance_delta), Err(WalletError::Validation(_))));
        assert_eq!(apply_delta(MAX_AMOUNT - Decimal::ONE, t.balance_delta).unwrap(), MAX_AMOUNT);
    }

    #[test]
    fn test_check_withdrawable_accounts_for_pending() {
        assert!(check_withdrawable(dec("100"), dec("60"), dec("40")).is_ok());
        let err = check_withdrawable(dec("100"), dec("60"), dec("40.01")).unwrap_err();
        match err {
            WalletError::InsufficientBalance { available, required } => {
                assert_eq!(available, dec("40"));
                assert_eq!(required, dec("40.01"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
