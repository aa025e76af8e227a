use std::collections::BTreeSet;

use crate::normalize::is_canonical_date;
use crate::records::{CommissionRates, SettlementMode, SettlementRow, ShopKey, TxnRow};

// ---------------------------------------------------------------------------
// Category amounts
// ---------------------------------------------------------------------------

/// Per-category amounts for one ledger line, and for the ledger's totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryAmounts {
    pub deposits: f64,
    pub withdrawals: f64,
    pub transfer_in: f64,
    pub transfer_out: f64,
    pub settlement: f64,
    pub special_payment: f64,
    pub adjustment: f64,
    pub security_deposit: f64,
    pub dp_comm: f64,
    pub wd_comm: f64,
    pub add_comm: f64,
}

impl CategoryAmounts {
    fn accumulate(&mut self, line: &CategoryAmounts) {
        self.deposits += line.deposits;
        self.withdrawals += line.withdrawals;
        self.transfer_in += line.transfer_in;
        self.transfer_out += line.transfer_out;
        self.settlement += line.settlement;
        self.special_payment += line.special_payment;
        self.adjustment += line.adjustment;
        self.security_deposit += line.security_deposit;
        self.dp_comm += line.dp_comm;
        self.wd_comm += line.wd_comm;
        self.add_comm += line.add_comm;
    }

    /// Signed contribution of this line to the running balance. OUT,
    /// SETTLEMENT and SPECIAL PAYMENT always subtract and ADJUSTMENT always
    /// adds, whatever sign the source rows carried. SECURITY DEPOSIT is
    /// tracked in its column but never moves the balance.
    pub fn net(&self) -> f64 {
        self.deposits - self.withdrawals + self.transfer_in - self.transfer_out
            - self.settlement
            - self.special_payment
            + self.adjustment
            - self.dp_comm
            - self.wd_comm
            - self.add_comm
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// One ledger line. `date` is `None` for the synthetic opening line that
/// carries the bring-forward balance; `balance` is the running balance
/// after this line applies.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub date: Option<String>,
    pub amounts: CategoryAmounts,
    pub balance: f64,
    pub most_recent: bool,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    pub shop: ShopKey,
    pub entries: Vec<LedgerEntry>,
    pub totals: CategoryAmounts,
    pub final_balance: f64,
}

/// Build one shop's date-bucketed ledger.
///
/// Rows are filtered to the shop by normalized key, bucketed by canonical
/// date, and folded oldest-first into a running balance seeded with the
/// bring-forward balance. A shop with no activity and zero openings yields
/// an empty ledger, not an error.
pub fn build_ledger(
    shop: &ShopKey,
    deposits: &[TxnRow],
    withdrawals: &[TxnRow],
    settlements: &[SettlementRow],
    rates: CommissionRates,
    opening_balance: f64,
    opening_security_deposit: f64,
) -> Ledger {
    let deposits: Vec<&TxnRow> = deposits.iter().filter(|r| r.shop == *shop).collect();
    let withdrawals: Vec<&TxnRow> = withdrawals.iter().filter(|r| r.shop == *shop).collect();
    let settlements: Vec<&SettlementRow> =
        settlements.iter().filter(|r| r.shop == *shop).collect();

    // Distinct canonical dates across the three activity sources. Canonical
    // ISO strings order lexically as calendar dates; everything else was
    // passthrough text and is dropped here.
    let mut dates: BTreeSet<&str> = BTreeSet::new();
    for date in deposits
        .iter()
        .map(|r| r.date.as_str())
        .chain(withdrawals.iter().map(|r| r.date.as_str()))
        .chain(settlements.iter().map(|r| r.date.as_str()))
    {
        if is_canonical_date(date) {
            dates.insert(date);
        }
    }

    let mut entries = Vec::new();
    let mut totals = CategoryAmounts::default();
    let mut balance = opening_balance;

    if opening_balance != 0.0 || opening_security_deposit != 0.0 {
        entries.push(LedgerEntry {
            date: None,
            amounts: CategoryAmounts {
                security_deposit: opening_security_deposit,
                ..Default::default()
            },
            balance,
            most_recent: false,
        });
    }

    for date in dates {
        let mut line = CategoryAmounts::default();
        line.deposits = deposits
            .iter()
            .filter(|r| r.date == date)
            .map(|r| r.amount)
            .sum();
        line.withdrawals = withdrawals
            .iter()
            .filter(|r| r.date == date)
            .map(|r| r.amount)
            .sum();
        for row in settlements.iter().filter(|r| r.date == date) {
            match row.mode {
                Some(SettlementMode::In) => line.transfer_in += row.amount,
                Some(SettlementMode::Out) => line.transfer_out += row.amount,
                Some(SettlementMode::Settlement) => line.settlement += row.amount,
                Some(SettlementMode::SpecialPayment) => line.special_payment += row.amount,
                Some(SettlementMode::Adjustment) => line.adjustment += row.amount,
                Some(SettlementMode::SecurityDeposit) => line.security_deposit += row.amount,
                None => {}
            }
        }
        line.dp_comm = line.deposits * rates.dp / 100.0;
        line.wd_comm = line.withdrawals * rates.wd / 100.0;
        line.add_comm = line.deposits * rates.add / 100.0;

        balance += line.net();
        totals.accumulate(&line);
        entries.push(LedgerEntry {
            date: Some(date.to_string()),
            amounts: line,
            balance,
            most_recent: false,
        });
    }

    if let Some(last) = entries.last_mut() {
        last.most_recent = true;
    }

    Ledger {
        shop: shop.clone(),
        entries,
        totals,
        final_balance: balance,
    }
}
