use {super::*, clap::CommandFactory, generate::Generator};

#[derive(Debug, Parser)]
#[command(
  name = "generate-tx",
  version,
  about = "Select coins and build an unsigned transaction that splits them into equal outputs"
)]
pub struct Arguments {
  #[command(flatten)]
  pub(crate) options: Options,
  #[arg(help = "Select coins worth more than <INPUT_SIZE> BTC.")]
  pub(crate) input_size: Option<Decimal>,
  #[arg(help = "Split selected coins into outputs of <OUTPUT_SIZE> BTC.")]
  pub(crate) output_size: Option<Decimal>,
}

impl Arguments {
  pub(crate) fn run(self) -> SnafuResult {
    let (Some(input_size), Some(output_size)) = (self.input_size, self.output_size) else {
      println!("{}", Self::command().render_usage());
      return Ok(());
    };

    let input = input_size
      .to_amount()
      .with_context(|| format!("invalid input size `{input_size}`"))?;

    let output = output_size
      .to_amount()
      .with_context(|| format!("invalid output size `{output_size}`"))?;

    let settings = Settings::new(self.options)?;

    let donation = settings.donation()?;

    let wallet = settings.wallet()?;

    let outcome = Generator {
      donation: &donation,
      wallet: &wallet,
    }
    .run(input, output)?;

    println!("{outcome}");

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn positional_amounts() {
    let arguments = Arguments::try_parse_from(["generate-tx", "0.01", "0.005"]).unwrap();

    assert_eq!(arguments.input_size, Some("0.01".parse().unwrap()));
    assert_eq!(arguments.output_size, Some("0.005".parse().unwrap()));
  }

  #[test]
  fn missing_amounts_parse() {
    let arguments = Arguments::try_parse_from(["generate-tx", "0.01"]).unwrap();

    assert_eq!(arguments.output_size, None);
  }

  #[test]
  fn malformed_amount_is_rejected() {
    assert!(Arguments::try_parse_from(["generate-tx", "one", "0.5"]).is_err());
  }

  #[test]
  fn extra_positional_is_rejected() {
    assert!(Arguments::try_parse_from(["generate-tx", "1", "0.5", "0.1"]).is_err());
  }

  #[test]
  fn excess_precision_is_an_error() {
    assert_eq!(
      Arguments::try_parse_from(["generate-tx", "0.000000001", "0"])
        .unwrap()
        .run()
        .unwrap_err()
        .to_string(),
      "invalid input size `0.000000001`",
    );
  }

  #[test]
  fn usage_mentions_both_sizes() {
    let usage = Arguments::command().render_usage().to_string();

    assert!(usage.contains("[INPUT_SIZE]"), "{usage}");
    assert!(usage.contains("[OUTPUT_SIZE]"), "{usage}");
  }
}
