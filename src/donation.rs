use super::*;

/// Flat per-input donation paid to a fixed address.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
  pub address: String,
  pub minimum: Amount,
  pub per_input: Amount,
}

impl Donation {
  pub const DEFAULT_ADDRESS: &'static str = "1ForFeesAndDonationsSpendHerdtWbWy";
  pub const DEFAULT_MINIMUM: Amount = Amount::ZERO;
  pub const DEFAULT_PER_INPUT: Amount = Amount::from_sat(3000);

  /// `max(minimum, per_input * inputs)`
  pub fn for_inputs(&self, inputs: usize) -> Result<Amount> {
    let inputs = u64::try_from(inputs).context("input count out of range")?;

    let accumulated = self
      .per_input
      .checked_mul(inputs)
      .ok_or_else(|| anyhow!("donation for {inputs} inputs out of range"))?;

    Ok(accumulated.max(self.minimum))
  }
}

impl Default for Donation {
  fn default() -> Self {
    Self {
      address: Self::DEFAULT_ADDRESS.into(),
      minimum: Self::DEFAULT_MINIMUM,
      per_input: Self::DEFAULT_PER_INPUT,
    }
  }
}
