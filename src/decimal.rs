use super::*;

/// Number of decimal places between a bitcoin and a satoshi.
const BITCOIN_SCALE: u8 = 8;

/// An exact base-ten number, used for amounts typed by or shown to the user.
#[derive(Debug, PartialEq, Copy, Clone, Default)]
pub struct Decimal {
  pub value: u128,
  pub scale: u8,
}

impl Decimal {
  pub fn to_integer(self, divisibility: u8) -> Result<u128> {
    match divisibility.checked_sub(self.scale) {
      Some(difference) => Ok(
        self
          .value
          .checked_mul(
            10u128
              .checked_pow(u32::from(difference))
              .context("divisibility out of range")?,
          )
          .context("amount out of range")?,
      ),
      None => bail!("excessive precision"),
    }
  }

  pub fn to_amount(self) -> Result<Amount> {
    Ok(Amount::from_sat(
      u64::try_from(self.to_integer(BITCOIN_SCALE)?).context("amount out of range")?,
    ))
  }
}

impl From<Amount> for Decimal {
  fn from(amount: Amount) -> Self {
    Self {
      value: amount.to_sat().into(),
      scale: BITCOIN_SCALE,
    }
  }
}

impl Display for Decimal {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let magnitude = 10u128.pow(self.scale.into());

    let integer = self.value / magnitude;
    let mut fraction = self.value % magnitude;

    write!(f, "{integer}")?;

    if fraction > 0 {
      let mut width = self.scale.into();

      while fraction % 10 == 0 {
        fraction /= 10;
        width -= 1;
      }

      write!(f, ".{fraction:0>width$}", width = width)?;
    }

    Ok(())
  }
}

impl FromStr for Decimal {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let Some((integer, decimal)) = s.split_once('.') else {
      ensure!(is_digits(s), "invalid digit in `{s}`");
      return Ok(Self {
        value: s.parse::<u128>()?,
        scale: 0,
      });
    };

    if integer.is_empty() && decimal.is_empty() {
      bail!("empty decimal");
    }

    ensure!(
      is_digits(integer) && is_digits(decimal),
      "invalid digit in `{s}`"
    );

    let integer = if integer.is_empty() {
      0
    } else {
      integer.parse::<u128>()?
    };

    let significant = decimal.trim_end_matches('0');

    let (decimal, scale) = if significant.is_empty() {
      (0, 0)
    } else {
      (
        significant.parse::<u128>()?,
        u8::try_from(significant.len()).context("excessive precision")?,
      )
    };

    Ok(Self {
      value: 10u128
        .checked_pow(u32::from(scale))
        .and_then(|magnitude| integer.checked_mul(magnitude))
        .and_then(|value| value.checked_add(decimal))
        .context("amount out of range")?,
      scale,
    })
  }
}

fn is_digits(s: &str) -> bool {
  s.bytes().all(|b| b.is_ascii_digit())
}
