#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    coin_selection::Selection,
    config::Config,
    decimal::Decimal,
    error::{ResultExt, SnafuError},
    options::Options,
    settings::Settings,
  },
  anyhow::{anyhow, bail, ensure, Context, Error},
  bitcoin::{
    absolute::LockTime,
    consensus::{self, encode},
    Amount, Network, OutPoint, ScriptBuf, Transaction, TxIn, Witness,
  },
  bitcoincore_rpc::{Auth, Client, RpcApi},
  clap::{ArgGroup, Parser},
  serde::{Deserialize, Serialize},
  snafu::{Backtrace, ErrorCompat, Snafu},
  std::{
    backtrace::BacktraceStatus,
    collections::{BTreeMap, BTreeSet},
    env,
    fmt::{self, Display, Formatter},
    fs::File,
    io::{self, BufRead},
    path::{Path, PathBuf},
    process,
    str::FromStr,
  },
};

pub use self::{
  chain::Chain,
  donation::Donation,
  output_plan::OutputPlan,
  wallet_rpc::{CoreWallet, UnspentCoin, WalletRpc},
};

#[cfg(test)]
#[macro_use]
mod test;

#[cfg(test)]
use self::test::*;

pub mod arguments;
pub mod chain;
pub mod coin_selection;
pub mod coinjoin;
mod config;
pub mod decimal;
pub mod donation;
mod error;
pub mod generate;
pub mod options;
pub mod output_plan;
pub mod settings;
pub mod wallet_rpc;

type Result<T = (), E = Error> = std::result::Result<T, E>;
type SnafuResult<T = (), E = SnafuError> = std::result::Result<T, E>;

fn report(err: SnafuError) -> ! {
  eprintln!("error: {err}");

  if let SnafuError::Anyhow { err } = err {
    for (i, err) in err.chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();
        eprintln!("because:");
      }

      eprintln!("- {err}");
    }

    if env::var_os("RUST_BACKTRACE")
      .map(|val| val == "1")
      .unwrap_or_default()
    {
      eprintln!("{}", err.backtrace());
    }
  } else {
    for (i, err) in err.iter_chain().skip(1).enumerate() {
      if i == 0 {
        eprintln!();
        eprintln!("because:");
      }

      eprintln!("- {err}");
    }

    if let Some(backtrace) = err.backtrace() {
      if backtrace.status() == BacktraceStatus::Captured {
        eprintln!("backtrace:");
        eprintln!("{backtrace}");
      }
    }
  }

  process::exit(1);
}

pub fn main() {
  env_logger::init();

  if let Err(err) = Arguments::parse().run() {
    report(err);
  }
}

pub fn coinjoin_main(mode: coinjoin::Mode) {
  env_logger::init();

  if let Err(err) = coinjoin::run(mode) {
    report(err);
  }
}
