use std::collections::HashMap;

use crate::normalize::normalize_key;
use crate::records::{
    shop_field, NormalizedRecord, ShopKey, ADD_COMM, ADJUSTMENT, BRING_FORWARD, DP_COMM,
    SECURITY_DEPOSIT, SETTLEMENT, SPECIAL_PAYMENT, TEAM_LEADER, TOTAL_DEPOSIT, TOTAL_WITHDRAWAL,
    TRANSFER_IN, TRANSFER_OUT, WD_COMM,
};

/// One aggregated balance row per shop: every category totalled across the
/// shop's rows, plus the running balance derived from them.
#[derive(Debug, Clone, Default)]
pub struct ShopSummary {
    /// Display name; first appearance wins.
    pub shop: String,
    pub key: ShopKey,
    /// Normalized; later rows overwrite earlier ones.
    pub team_leader: String,
    pub security_deposit: f64,
    pub bring_forward: f64,
    pub total_deposit: f64,
    pub total_withdrawal: f64,
    pub transfer_in: f64,
    pub transfer_out: f64,
    pub settlement: f64,
    pub special_payment: f64,
    pub adjustment: f64,
    pub dp_comm: f64,
    pub wd_comm: f64,
    pub add_comm: f64,
    pub running_balance: f64,
}

impl ShopSummary {
    fn fold(&mut self, rec: &NormalizedRecord) {
        self.team_leader = normalize_key(rec.get(TEAM_LEADER));
        self.security_deposit += rec.amount(SECURITY_DEPOSIT);
        self.bring_forward += rec.amount(BRING_FORWARD);
        self.total_deposit += rec.amount(TOTAL_DEPOSIT);
        self.total_withdrawal += rec.amount(TOTAL_WITHDRAWAL);
        self.transfer_in += rec.amount(TRANSFER_IN);
        self.transfer_out += rec.amount(TRANSFER_OUT);
        self.settlement += rec.amount(SETTLEMENT);
        self.special_payment += rec.amount(SPECIAL_PAYMENT);
        self.adjustment += rec.amount(ADJUSTMENT);
        self.dp_comm += rec.amount(DP_COMM);
        self.wd_comm += rec.amount(WD_COMM);
        self.add_comm += rec.amount(ADD_COMM);
        // Recomputed after every folded row so a partial group is already
        // consistent. Same sign convention as the per-date ledger.
        self.running_balance = self.bring_forward + self.total_deposit - self.total_withdrawal
            + self.transfer_in
            - self.transfer_out
            - self.settlement
            - self.special_payment
            + self.adjustment
            - self.dp_comm
            - self.wd_comm
            - self.add_comm;
    }
}

/// Group balance rows per shop and total every category. Rows with no shop
/// name are dropped. Output keeps first-appearance order; shop keys are
/// unique, so the vector is the shop → summary mapping.
pub fn build_summaries(records: &[NormalizedRecord]) -> Vec<ShopSummary> {
    let mut order: Vec<ShopKey> = Vec::new();
    let mut by_shop: HashMap<ShopKey, ShopSummary> = HashMap::new();

    for rec in records {
        let name = shop_field(rec);
        if name.is_empty() {
            continue;
        }
        let key = ShopKey::new(name);
        let summary = by_shop.entry(key.clone()).or_insert_with(|| {
            order.push(key.clone());
            ShopSummary {
                shop: name.to_string(),
                key,
                ..Default::default()
            }
        });
        summary.fold(rec);
    }

    order
        .iter()
        .filter_map(|key| by_shop.remove(key))
        .collect()
}

// ---------------------------------------------------------------------------
// Overview helpers
// ---------------------------------------------------------------------------

/// Distinct team leaders, sorted. Sheet error artifacts and blanks are not
/// leaders.
pub fn team_leaders(summaries: &[ShopSummary]) -> Vec<String> {
    let mut leaders: Vec<String> = summaries
        .iter()
        .map(|s| s.team_leader.clone())
        .filter(|l| !l.is_empty() && l != "#N/A" && l != "N/A")
        .collect();
    leaders.sort();
    leaders.dedup();
    leaders
}

/// Filter by team leader (normalized equality) and/or shop-name substring
/// (case-insensitive).
pub fn filter_summaries<'a>(
    summaries: &'a [ShopSummary],
    leader: Option<&str>,
    search: Option<&str>,
) -> Vec<&'a ShopSummary> {
    let leader = leader.map(normalize_key);
    let search = search.map(|s| s.trim().to_uppercase());
    summaries
        .iter()
        .filter(|s| {
            let leader_ok = leader.as_deref().map_or(true, |l| s.team_leader == l);
            let search_ok = search
                .as_deref()
                .map_or(true, |q| s.shop.to_uppercase().contains(q));
            leader_ok && search_ok
        })
        .collect()
}

/// Column totals across a (typically filtered) set of summaries: the
/// overview's totals bar.
pub fn summary_totals(summaries: &[&ShopSummary]) -> ShopSummary {
    let mut totals = ShopSummary {
        shop: "TOTAL".to_string(),
        ..Default::default()
    };
    for s in summaries {
        totals.security_deposit += s.security_deposit;
        totals.bring_forward += s.bring_forward;
        totals.total_deposit += s.total_deposit;
        totals.total_withdrawal += s.total_withdrawal;
        totals.transfer_in += s.transfer_in;
        totals.transfer_out += s.transfer_out;
        totals.settlement += s.settlement;
        totals.special_payment += s.special_payment;
        totals.adjustment += s.adjustment;
        totals.dp_comm += s.dp_comm;
        totals.wd_comm += s.wd_comm;
        totals.add_comm += s.add_comm;
        totals.running_balance += s.running_balance;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::records::RawRecord;
    use serde_json::json;

    fn record(pairs: &[(&str, &str)]) -> NormalizedRecord {
        let raw: RawRecord = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        normalize(&raw)
    }

    #[test]
    fn test_two_rows_total_into_one_summary() {
        let rows = vec![
            record(&[("SHOP", "B"), ("TOTAL DEPOSIT", "100")]),
            record(&[("SHOP", "B"), ("TOTAL DEPOSIT", "150")]),
        ];
        let summaries = build_summaries(&rows);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_deposit, 250.0);
        assert_eq!(summaries[0].running_balance, 250.0);
    }

    #[test]
    fn test_running_balance_formula_signs() {
        let rows = vec![record(&[
            ("SHOP", "B"),
            ("BRING FORWARD BALANCE", "1000"),
            ("TOTAL DEPOSIT", "500"),
            ("TOTAL WITHDRAWAL", "200"),
            ("INTERNAL TRANSFER IN", "50"),
            ("INTERNAL TRANSFER OUT", "30"),
            ("SETTLEMENT", "20"),
            ("SPECIAL PAYMENT", "10"),
            ("ADJUSTMENT", "5"),
            ("DP COMM", "25"),
            ("WD COMM", "4"),
            ("ADD COMM", "1"),
        ])];
        let summaries = build_summaries(&rows);
        let s = &summaries[0];
        // adjustment adds; out/settlement/special payment subtract
        assert_eq!(
            s.running_balance,
            1000.0 + 500.0 - 200.0 + 50.0 - 30.0 - 20.0 - 10.0 + 5.0 - 25.0 - 4.0 - 1.0
        );
        // security deposit is a column, not a balance term
        let rows = vec![record(&[("SHOP", "C"), ("SECURITY DEPOSIT", "400")])];
        assert_eq!(build_summaries(&rows)[0].running_balance, 0.0);
    }

    #[test]
    fn test_rows_without_shop_are_dropped() {
        let rows = vec![
            record(&[("TOTAL DEPOSIT", "100")]),
            record(&[("SHOP NAME", "Named"), ("TOTAL DEPOSIT", "70")]),
        ];
        let summaries = build_summaries(&rows);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].shop, "Named");
        assert_eq!(summaries[0].total_deposit, 70.0);
    }

    #[test]
    fn test_shop_grouping_is_case_insensitive_but_keeps_display_name() {
        let rows = vec![
            record(&[("SHOP", "Acme Store"), ("TOTAL DEPOSIT", "10")]),
            record(&[("SHOP", " ACME   STORE "), ("TOTAL DEPOSIT", "15")]),
        ];
        let summaries = build_summaries(&rows);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].shop, "Acme Store");
        assert_eq!(summaries[0].total_deposit, 25.0);
    }

    #[test]
    fn test_later_team_leader_overwrites() {
        let rows = vec![
            record(&[("SHOP", "B"), ("TEAM LEADER", "munim")]),
            record(&[("SHOP", "B"), ("TEAM LEADER", "Shakil")]),
        ];
        let summaries = build_summaries(&rows);
        assert_eq!(summaries[0].team_leader, "SHAKIL");
    }

    #[test]
    fn test_first_appearance_order() {
        let rows = vec![
            record(&[("SHOP", "Zeta")]),
            record(&[("SHOP", "Alpha")]),
            record(&[("SHOP", "Zeta")]),
        ];
        let names: Vec<String> = build_summaries(&rows).iter().map(|s| s.shop.clone()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_team_leaders_roster() {
        let rows = vec![
            record(&[("SHOP", "A"), ("TEAM LEADER", "zubair")]),
            record(&[("SHOP", "B"), ("TEAM LEADER", "ALI")]),
            record(&[("SHOP", "C"), ("TEAM LEADER", "#N/A")]),
            record(&[("SHOP", "D"), ("TEAM LEADER", "ali")]),
            record(&[("SHOP", "E")]),
        ];
        let leaders = team_leaders(&build_summaries(&rows));
        assert_eq!(leaders, vec!["ALI", "ZUBAIR"]);
    }

    #[test]
    fn test_filter_by_leader_and_search() {
        let rows = vec![
            record(&[("SHOP", "Acme One"), ("TEAM LEADER", "ALI")]),
            record(&[("SHOP", "Acme Two"), ("TEAM LEADER", "ZUBAIR")]),
            record(&[("SHOP", "Other"), ("TEAM LEADER", "ALI")]),
        ];
        let summaries = build_summaries(&rows);
        let by_leader = filter_summaries(&summaries, Some("ali"), None);
        assert_eq!(by_leader.len(), 2);
        let by_search = filter_summaries(&summaries, None, Some("acme"));
        assert_eq!(by_search.len(), 2);
        let both = filter_summaries(&summaries, Some("ali"), Some("acme"));
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].shop, "Acme One");
    }

    #[test]
    fn test_summary_totals() {
        let rows = vec![
            record(&[("SHOP", "A"), ("TOTAL DEPOSIT", "100"), ("DP COMM", "5")]),
            record(&[("SHOP", "B"), ("TOTAL DEPOSIT", "50")]),
        ];
        let summaries = build_summaries(&rows);
        let all: Vec<&ShopSummary> = summaries.iter().collect();
        let totals = summary_totals(&all);
        assert_eq!(totals.total_deposit, 150.0);
        assert_eq!(totals.dp_comm, 5.0);
        assert_eq!(totals.running_balance, 95.0 + 50.0);
    }
}
