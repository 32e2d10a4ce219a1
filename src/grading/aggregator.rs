use rust_decimal::Decimal;

use crate::models::{Prono, PronoStatus, Summary};

/// Summarize a set of pronos at one unit staked per prediction.
///
/// Won pronos pay `odds - 1` (nothing when odds are missing or not positive,
/// but they still count as settled), lost pronos cost one unit, void pronos
/// are settled at zero and pending pronos stay out of P&L and denominators.
pub fn summarize(pronos: &[Prono]) -> Summary {
    let mut summary = Summary::default();
    let mut pnl = Decimal::ZERO;

    for prono in pronos {
        summary.total_bets += 1;

        match prono.status {
            PronoStatus::Won => {
                summary.won += 1;
                if let Some(odds) = prono.odds.filter(|o| *o > Decimal::ZERO) {
                    pnl += odds - Decimal::ONE;
                }
            }
            PronoStatus::Lost => {
                summary.lost += 1;
                pnl -= Decimal::ONE;
            }
            PronoStatus::Void => summary.void += 1,
            PronoStatus::Pending => summary.pending += 1,
        }
    }

    summary.settled = summary.won + summary.lost + summary.void;
    summary.pnl_units = pnl;

    if summary.settled > 0 {
        let settled = Decimal::from(summary.settled);
        summary.strike_rate = Some(Decimal::from(summary.won) / settled);
        summary.unit_roi = Some(pnl / settled);
    }

    summary
}
