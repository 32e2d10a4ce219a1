use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Performance summary over a set of pronos, recomputed on every range query.
///
/// `strike_rate` and `unit_roi` stay `None` until at least one prono is settled,
/// so "nothing graded yet" is distinguishable from a 0% record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_bets: u32,
    pub won: u32,
    pub lost: u32,
    pub void: u32,
    pub pending: u32,
    pub settled: u32,
    pub pnl_units: Decimal,
    pub strike_rate: Option<Decimal>,
    pub unit_roi: Option<Decimal>,
}
