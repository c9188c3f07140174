use super::*;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
  pub inputs: Vec<OutPoint>,
  pub total: Amount,
}

impl Selection {
  /// Takes coins in order of closeness to `target` until their total is
  /// strictly greater than `target`. A total exactly equal to `target` keeps
  /// selecting. If the coins run out first, the short selection is returned
  /// as is.
  // TODO: replace closest-first ordering with branch and bound selection
  pub fn select(mut unspent: Vec<UnspentCoin>, target: Amount) -> Self {
    unspent.sort_by_key(|coin| coin.amount.to_sat().abs_diff(target.to_sat()));

    let mut selection = Self::default();

    for coin in unspent {
      selection.total += coin.amount;
      selection.inputs.push(coin.outpoint);

      log::debug!(
        "Selected {} worth {} BTC, running total {} BTC",
        coin.outpoint,
        Decimal::from(coin.amount),
        Decimal::from(selection.total),
      );

      if selection.total > target {
        break;
      }
    }

    if selection.total <= target {
      log::warn!(
        "Listed coins total {} BTC, which does not exceed target of {} BTC",
        Decimal::from(selection.total),
        Decimal::from(target),
      );
    }

    log::info!(
      "Selected {} inputs totaling {} BTC",
      selection.inputs.len(),
      Decimal::from(selection.total),
    );

    selection
  }
}
