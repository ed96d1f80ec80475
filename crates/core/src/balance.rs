//! # Balance Calculator
//!
//! Quy tắc kế toán của credit ledger, tách riêng khỏi storage:
//! `balance[i] == balance[i-1] + delta[i]`, với balance trước transaction đầu tiên là 0.

use crate::error::{CoreError, CoreResult};
use crate::transaction::Transaction;

/// Tính balance kế tiếp.
pub fn next_balance(prior_balance: i64, delta: i64) -> i64 {
    prior_balance + delta
}

/// Như [`next_balance`] nhưng báo lỗi khi tràn số.
pub fn checked_next_balance(prior_balance: i64, delta: i64) -> CoreResult<i64> {
    prior_balance
        .checked_add(delta)
        .ok_or(CoreError::BalanceOverflow {
            prior: prior_balance,
            delta,
        })
}

/// Replay tất cả deltas từ trạng thái rỗng.
pub fn replay<I>(deltas: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    deltas.into_iter().fold(0, next_balance)
}

/// Kiểm tra chuỗi balance của các transactions (đã sắp xếp theo id).
///
/// Trả về lỗi ở transaction đầu tiên có balance không khớp.
pub fn verify_chain(transactions: &[Transaction]) -> CoreResult<i64> {
    let mut running = 0;
    for trx in transactions {
        let expected = checked_next_balance(running, trx.delta)?;
        if trx.balance != expected {
            return Err(CoreError::BalanceMismatch {
                id: trx.id,
                stored: trx.balance,
                expected,
            });
        }
        running = expected;
    }
    Ok(running)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TrxKind;
    use chrono::{NaiveDate, Utc};

    fn trx(id: i64, delta: i64, balance: i64) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            kind: TrxKind::Addition,
            delta,
            balance,
            entry_ref: None,
            entry_label: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_next_balance() {
        assert_eq!(next_balance(0, 1), 1);
        assert_eq!(next_balance(3, -1), 2);
        assert_eq!(next_balance(0, -1), -1);
    }

    #[test]
    fn test_checked_overflow() {
        assert!(checked_next_balance(i64::MAX, 1).is_err());
        assert_eq!(checked_next_balance(1, 1), Ok(2));
    }

    #[test]
    fn test_replay() {
        assert_eq!(replay(Vec::new()), 0);
        assert_eq!(replay(vec![1, 1, -1, 1, 5]), 7);
    }

    #[test]
    fn test_verify_chain_ok() {
        let chain = vec![trx(1, 1, 1), trx(2, -1, 0), trx(3, 1, 1), trx(4, 1, 2)];
        assert_eq!(verify_chain(&chain), Ok(2));
        assert_eq!(verify_chain(&[]), Ok(0));
    }

    #[test]
    fn test_verify_chain_reports_first_mismatch() {
        let chain = vec![trx(1, 1, 1), trx(2, 1, 3), trx(3, 1, 9)];
        assert_eq!(
            verify_chain(&chain),
            Err(CoreError::BalanceMismatch {
                id: 2,
                stored: 3,
                expected: 2
            })
        );
    }
}
