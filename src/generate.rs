use super::*;

/// What a run of the generator produced. Only `Transaction` means a
/// transaction was built; the other two are reported to the user as plain
/// messages and leave the wallet untouched.
#[derive(Debug, PartialEq)]
pub enum Outcome {
  InsufficientBalance { balance: Amount, target: Amount },
  InvalidTargetRange { input: Amount, output: Amount },
  Transaction(String),
}

impl Display for Outcome {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Self::InsufficientBalance { balance, target } => write!(
        f,
        "Cannot spend {} BTC; only have {} BTC in wallet.",
        Decimal::from(*target),
        Decimal::from(*balance),
      ),
      Self::InvalidTargetRange { .. } => {
        write!(f, "Please have a smaller target output than input value.")
      }
      Self::Transaction(hex) => write!(f, "{hex}"),
    }
  }
}

pub struct Generator<'a, W> {
  pub donation: &'a Donation,
  pub wallet: &'a W,
}

impl<W: WalletRpc> Generator<'_, W> {
  pub fn run(&self, input: Amount, output: Amount) -> Result<Outcome> {
    let balance = self.wallet.balance()?;
    let unspent = self.wallet.list_unspent()?;

    if balance < input {
      return Ok(Outcome::InsufficientBalance {
        balance,
        target: input,
      });
    }

    if output > input {
      return Ok(Outcome::InvalidTargetRange { input, output });
    }

    let selection = Selection::select(unspent, input);

    let donation = self.donation.for_inputs(selection.inputs.len())?;

    let outputs = OutputPlan::build(self.wallet, self.donation, donation, selection.total, output)?;

    Ok(Outcome::Transaction(
      self
        .wallet
        .create_raw_transaction(&selection.inputs, &outputs)?,
    ))
  }
}
