use std::collections::HashMap;

use serde_json::Value;

use crate::normalize::normalize_key;

// ---------------------------------------------------------------------------
// Field names (canonical, post-normalization)
// ---------------------------------------------------------------------------

pub const SHOP: &str = "SHOP";
pub const SHOP_NAME: &str = "SHOP NAME";
pub const DATE: &str = "DATE";
pub const AMOUNT: &str = "AMOUNT";
pub const MODE: &str = "MODE";
pub const TEAM_LEADER: &str = "TEAM LEADER";
pub const BRING_FORWARD: &str = "BRING FORWARD BALANCE";
pub const SECURITY_DEPOSIT: &str = "SECURITY DEPOSIT";
pub const TOTAL_DEPOSIT: &str = "TOTAL DEPOSIT";
pub const TOTAL_WITHDRAWAL: &str = "TOTAL WITHDRAWAL";
pub const TRANSFER_IN: &str = "INTERNAL TRANSFER IN";
pub const TRANSFER_OUT: &str = "INTERNAL TRANSFER OUT";
pub const SETTLEMENT: &str = "SETTLEMENT";
pub const SPECIAL_PAYMENT: &str = "SPECIAL PAYMENT";
pub const ADJUSTMENT: &str = "ADJUSTMENT";
pub const DP_COMM: &str = "DP COMM";
pub const WD_COMM: &str = "WD COMM";
pub const ADD_COMM: &str = "ADD COMM";

// ---------------------------------------------------------------------------
// Raw and normalized rows
// ---------------------------------------------------------------------------

/// A row as delivered by a source table: key casing and padding untouched,
/// values still typed the way the sheet exported them.
pub type RawRecord = HashMap<String, Value>;

/// A row after cleanup: canonical keys, trimmed string values. Accessors
/// are lenient; missing fields read as empty or zero.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecord {
    fields: HashMap<String, String>,
}

impl NormalizedRecord {
    pub fn insert(&mut self, key: String, value: String) {
        self.fields.insert(key, value);
    }

    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn amount(&self, key: &str) -> f64 {
        crate::normalize::parse_amount(self.get(key))
    }

    pub fn date(&self, key: &str) -> String {
        crate::normalize::parse_date(self.get(key))
    }
}

/// Display name for a row: `SHOP` with `SHOP NAME` as fallback.
pub fn shop_field(rec: &NormalizedRecord) -> &str {
    let shop = rec.get(SHOP);
    if shop.is_empty() {
        rec.get(SHOP_NAME)
    } else {
        shop
    }
}

// ---------------------------------------------------------------------------
// Shop key
// ---------------------------------------------------------------------------

/// The join key used across every source table. Shops are matched by their
/// cleaned-up name: whitespace-collapsed and case-insensitive. Raw names
/// never participate in lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShopKey(String);

impl ShopKey {
    pub fn new(name: &str) -> Self {
        ShopKey(normalize_key(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShopKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Typed rows: the ingestion boundary ends here
// ---------------------------------------------------------------------------

/// One deposit or withdrawal line.
#[derive(Debug, Clone)]
pub struct TxnRow {
    pub shop: ShopKey,
    pub date: String,
    pub amount: f64,
}

impl TxnRow {
    pub fn from_record(rec: &NormalizedRecord) -> Self {
        TxnRow {
            shop: ShopKey::new(rec.get(SHOP)),
            date: rec.date(DATE),
            amount: rec.amount(AMOUNT),
        }
    }
}

pub fn txn_rows(records: &[NormalizedRecord]) -> Vec<TxnRow> {
    records.iter().map(TxnRow::from_record).collect()
}

/// Settlement/top-up bucket, from the sheet's `MODE` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementMode {
    In,
    Out,
    Settlement,
    SpecialPayment,
    Adjustment,
    SecurityDeposit,
}

impl SettlementMode {
    /// Case- and whitespace-insensitive. Unknown labels have no bucket.
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_key(label).as_str() {
            "IN" => Some(Self::In),
            "OUT" => Some(Self::Out),
            "SETTLEMENT" => Some(Self::Settlement),
            "SPECIAL PAYMENT" => Some(Self::SpecialPayment),
            "ADJUSTMENT" => Some(Self::Adjustment),
            "SECURITY DEPOSIT" => Some(Self::SecurityDeposit),
            _ => None,
        }
    }
}

/// One settlement/top-up line.
#[derive(Debug, Clone)]
pub struct SettlementRow {
    pub shop: ShopKey,
    pub date: String,
    pub mode: Option<SettlementMode>,
    pub amount: f64,
}

impl SettlementRow {
    pub fn from_record(rec: &NormalizedRecord) -> Self {
        SettlementRow {
            shop: ShopKey::new(rec.get(SHOP)),
            date: rec.date(DATE),
            mode: SettlementMode::from_label(rec.get(MODE)),
            amount: rec.amount(AMOUNT),
        }
    }
}

pub fn settlement_rows(records: &[NormalizedRecord]) -> Vec<SettlementRow> {
    records.iter().map(SettlementRow::from_record).collect()
}

/// Percentage rates applied to a shop's daily volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CommissionRates {
    pub dp: f64,
    pub wd: f64,
    pub add: f64,
}

impl CommissionRates {
    /// Look up a shop's rates in the COMM table. No row, no rate: zeros.
    pub fn for_shop(records: &[NormalizedRecord], shop: &ShopKey) -> Self {
        records
            .iter()
            .find(|r| ShopKey::new(shop_field(r)) == *shop)
            .map(|r| CommissionRates {
                dp: r.amount(DP_COMM),
                wd: r.amount(WD_COMM),
                add: r.amount(ADD_COMM),
            })
            .unwrap_or_default()
    }
}

/// Opening position and supervision for one shop, from the balance sheet.
#[derive(Debug, Clone)]
pub struct ShopInfo {
    pub bring_forward: f64,
    pub security_deposit: f64,
    pub team_leader: String,
}

impl Default for ShopInfo {
    fn default() -> Self {
        ShopInfo {
            bring_forward: 0.0,
            security_deposit: 0.0,
            team_leader: "-".to_string(),
        }
    }
}

impl ShopInfo {
    /// A shop missing from the balance sheet opens at zero with a
    /// placeholder leader.
    pub fn for_shop(records: &[NormalizedRecord], shop: &ShopKey) -> Self {
        records
            .iter()
            .find(|r| ShopKey::new(shop_field(r)) == *shop)
            .map(|r| {
                let leader = r.get(TEAM_LEADER).trim();
                ShopInfo {
                    bring_forward: r.amount(BRING_FORWARD),
                    security_deposit: r.amount(SECURITY_DEPOSIT),
                    team_leader: if leader.is_empty() { "-".to_string() } else { leader.to_string() },
                }
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn record(pairs: &[(&str, &str)]) -> NormalizedRecord {
        let raw: RawRecord = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        normalize(&raw)
    }

    #[test]
    fn test_shop_key_is_case_and_whitespace_insensitive() {
        assert_eq!(ShopKey::new(" acme "), ShopKey::new("ACME"));
        assert_eq!(ShopKey::new("acme   store"), ShopKey::new("Acme Store"));
        assert_ne!(ShopKey::new("acme"), ShopKey::new("acme 2"));
    }

    #[test]
    fn test_shop_field_falls_back_to_shop_name() {
        let rec = record(&[("SHOP NAME", "Acme")]);
        assert_eq!(shop_field(&rec), "Acme");
        let rec = record(&[("SHOP", "Acme"), ("SHOP NAME", "Other")]);
        assert_eq!(shop_field(&rec), "Acme");
    }

    #[test]
    fn test_txn_row_from_record() {
        let rec = record(&[("SHOP", " acme "), ("DATE", "01/01/2024"), ("AMOUNT", "1,000")]);
        let row = TxnRow::from_record(&rec);
        assert_eq!(row.shop, ShopKey::new("ACME"));
        assert_eq!(row.date, "2024-01-01");
        assert_eq!(row.amount, 1000.0);
    }

    #[test]
    fn test_settlement_mode_labels() {
        assert_eq!(SettlementMode::from_label(" in "), Some(SettlementMode::In));
        assert_eq!(
            SettlementMode::from_label("special   payment"),
            Some(SettlementMode::SpecialPayment)
        );
        assert_eq!(SettlementMode::from_label("TOPUP"), None);
        assert_eq!(SettlementMode::from_label(""), None);
    }

    #[test]
    fn test_commission_rates_default_to_zero() {
        let rows = vec![record(&[("SHOP", "Acme"), ("DP COMM", "5"), ("WD COMM", "2")])];
        let rates = CommissionRates::for_shop(&rows, &ShopKey::new("acme"));
        assert_eq!(rates, CommissionRates { dp: 5.0, wd: 2.0, add: 0.0 });
        let rates = CommissionRates::for_shop(&rows, &ShopKey::new("other"));
        assert_eq!(rates, CommissionRates::default());
    }

    #[test]
    fn test_shop_info_missing_row() {
        let info = ShopInfo::for_shop(&[], &ShopKey::new("acme"));
        assert_eq!(info.bring_forward, 0.0);
        assert_eq!(info.security_deposit, 0.0);
        assert_eq!(info.team_leader, "-");
    }

    #[test]
    fn test_shop_info_reads_balance_row() {
        let rows = vec![record(&[
            ("SHOP", "ACME"),
            ("BRING FORWARD BALANCE", "1,500.25"),
            ("SECURITY DEPOSIT", "(200)"),
            ("TEAM LEADER", "munim"),
        ])];
        let info = ShopInfo::for_shop(&rows, &ShopKey::new(" Acme "));
        assert_eq!(info.bring_forward, 1500.25);
        assert_eq!(info.security_deposit, -200.0);
        assert_eq!(info.team_leader, "munim");
    }
}
