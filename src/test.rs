pub(crate) use {
  super::*,
  pretty_assertions::assert_eq as pretty_assert_eq,
  std::{
    cell::{Cell, RefCell},
    iter,
  },
};

macro_rules! assert_matches {
  ($expression:expr, $( $pattern:pat_param )|+ $( if $guard:expr )? $(,)?) => {
    match $expression {
      $( $pattern )|+ $( if $guard )? => {}
      left => panic!(
        "assertion failed: (left ~= right)\n  left: `{:?}`\n right: `{}`",
        left,
        stringify!($($pattern)|+ $(if $guard)?)
      ),
    }
  }
}

pub(crate) fn default<T: Default>() -> T {
  Default::default()
}

pub(crate) fn txid(n: u64) -> bitcoin::Txid {
  let hex = format!("{n:x}");

  if hex.is_empty() || hex.len() > 1 {
    panic!();
  }

  hex.repeat(64).parse().unwrap()
}

pub(crate) fn outpoint(n: u64) -> OutPoint {
  format!("{}:{}", txid(n), n).parse().unwrap()
}

/// Scripted wallet that records every call it receives.
#[derive(Default)]
pub(crate) struct FakeWallet {
  pub(crate) balance: Amount,
  pub(crate) calls: RefCell<Vec<&'static str>>,
  pub(crate) coins: Vec<UnspentCoin>,
  pub(crate) created: RefCell<Option<(Vec<OutPoint>, OutputPlan)>>,
  pub(crate) fail_create: bool,
  pub(crate) minted: Cell<usize>,
}

impl FakeWallet {
  pub(crate) fn with_balance(balance: Amount) -> Self {
    Self {
      balance,
      ..default()
    }
  }

  pub(crate) fn with_coins(amounts: &[u64]) -> Self {
    let coins = amounts
      .iter()
      .enumerate()
      .map(|(i, &sat)| UnspentCoin {
        outpoint: outpoint(i.try_into().unwrap()),
        amount: Amount::from_sat(sat),
      })
      .collect::<Vec<UnspentCoin>>();

    Self {
      balance: coins.iter().map(|coin| coin.amount).sum(),
      coins,
      ..default()
    }
  }

  pub(crate) fn address(n: usize) -> String {
    format!("fake-address-{n}")
  }

  pub(crate) fn addresses_minted(&self) -> usize {
    self.minted.get()
  }

  pub(crate) fn calls(&self) -> Vec<&'static str> {
    self.calls.borrow().clone()
  }

  pub(crate) fn created(&self) -> Option<(Vec<OutPoint>, OutputPlan)> {
    self.created.borrow().clone()
  }
}

impl WalletRpc for FakeWallet {
  fn balance(&self) -> Result<Amount> {
    self.calls.borrow_mut().push("balance");
    Ok(self.balance)
  }

  fn list_unspent(&self) -> Result<Vec<UnspentCoin>> {
    self.calls.borrow_mut().push("list_unspent");
    Ok(self.coins.clone())
  }

  fn new_address(&self) -> Result<String> {
    self.calls.borrow_mut().push("new_address");
    let n = self.minted.get();
    self.minted.set(n + 1);
    Ok(Self::address(n))
  }

  fn create_raw_transaction(&self, inputs: &[OutPoint], outputs: &OutputPlan) -> Result<String> {
    self.calls.borrow_mut().push("create_raw_transaction");

    ensure!(!self.fail_create, "wallet is locked");

    *self.created.borrow_mut() = Some((inputs.to_vec(), outputs.clone()));

    Ok("02000000".into())
  }
}
