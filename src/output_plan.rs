use super::*;

/// Destination addresses and amounts, in the order they were planned.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct OutputPlan {
  addresses: BTreeSet<String>,
  outputs: Vec<(String, Amount)>,
}

impl OutputPlan {
  /// Splits `total` into the donation, as many `target` sized outputs as fit
  /// while more than `target` remains, and a final change output. Each
  /// target and change output is sent to a freshly minted address.
  pub fn build(
    wallet: &impl WalletRpc,
    donation: &Donation,
    donation_amount: Amount,
    total: Amount,
    target: Amount,
  ) -> Result<Self> {
    let mut plan = Self::default();

    plan.insert(donation.address.clone(), donation_amount)?;

    let mut remaining = total.checked_sub(donation_amount).ok_or_else(|| {
      anyhow!(
        "donation of {} BTC exceeds selected input total of {} BTC",
        Decimal::from(donation_amount),
        Decimal::from(total),
      )
    })?;

    if target > Amount::ZERO {
      while remaining > target {
        plan.insert(wallet.new_address()?, target)?;
        remaining -= target;
      }
    }

    plan.insert(wallet.new_address()?, remaining)?;

    log::info!(
      "Planned {} outputs: donation of {} BTC, {} of {} BTC, change of {} BTC",
      plan.len(),
      Decimal::from(donation_amount),
      plan.len() - 2,
      Decimal::from(target),
      Decimal::from(remaining),
    );

    Ok(plan)
  }

  pub fn insert(&mut self, address: String, amount: Amount) -> Result {
    ensure!(
      self.addresses.insert(address.clone()),
      "duplicate output address `{address}`",
    );

    self.outputs.push((address, amount));

    Ok(())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
    self
      .outputs
      .iter()
      .map(|(address, amount)| (address.as_str(), *amount))
  }

  pub fn len(&self) -> usize {
    self.outputs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.outputs.is_empty()
  }

  pub fn total(&self) -> Amount {
    self.outputs.iter().map(|(_, amount)| *amount).sum()
  }

  pub fn get(&self, address: &str) -> Option<Amount> {
    self
      .outputs
      .iter()
      .find(|(existing, _)| existing == address)
      .map(|(_, amount)| *amount)
  }
}
