use {
  api::Api,
  bitcoin::{
    address::{Address, NetworkUnchecked},
    bip32::{DerivationPath, Xpriv},
    consensus::encode::serialize_hex,
    locktime::absolute::LockTime,
    script,
    secp256k1::{self, Secp256k1, XOnlyPublicKey},
    transaction::Version,
    Amount, Network, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness,
  },
  bitcoincore_rpc::json::{
    CreateRawTransactionInput, GetBlockchainInfoResult, ListUnspentResultEntry,
    StringOrStringArray,
  },
  jsonrpc_core::{IoHandler, Value},
  jsonrpc_http_server::{CloseHandle, ServerBuilder},
  server::Server,
  state::State,
  std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::PathBuf,
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
    thread,
    time::Duration,
  },
  tempfile::TempDir,
  wallet::Wallet,
};

mod api;
mod server;
mod state;
mod wallet;

pub fn builder() -> Builder {
  Builder {
    network: Network::Bitcoin,
  }
}

pub struct Builder {
  network: Network,
}

impl Builder {
  pub fn network(self, network: Network) -> Self {
    Self { network }
  }

  pub fn build(self) -> Handle {
    let state = Arc::new(Mutex::new(State::new(self.network)));
    let server = Server::new(state.clone());
    let mut io = IoHandler::default();
    io.extend_with(server.to_delegate());

    let rpc_server = ServerBuilder::new(io)
      .threads(1)
      .start_http(&"127.0.0.1:0".parse().unwrap())
      .unwrap();

    let close_handle = rpc_server.close_handle();
    let port = rpc_server.address().port();

    thread::spawn(|| rpc_server.wait());

    for i in 0.. {
      match reqwest::blocking::get(format!("http://127.0.0.1:{port}/")) {
        Ok(_) => break,
        Err(err) => {
          if i == 400 {
            panic!("mock bitcoind server failed to start: {err}");
          }
        }
      }

      thread::sleep(Duration::from_millis(25));
    }

    let tempdir = TempDir::new().unwrap();

    fs::write(tempdir.path().join(".cookie"), "username:password").unwrap();

    Handle {
      close_handle: Some(close_handle),
      tempdir,
      port,
      state,
    }
  }
}

pub fn spawn() -> Handle {
  builder().build()
}

pub struct Handle {
  close_handle: Option<CloseHandle>,
  port: u16,
  state: Arc<Mutex<State>>,
  tempdir: TempDir,
}

impl Handle {
  pub fn url(&self) -> String {
    format!("http://127.0.0.1:{}", self.port)
  }

  pub fn cookie_file(&self) -> PathBuf {
    self.tempdir.path().join(".cookie")
  }

  pub fn network(&self) -> String {
    match self.state().network {
      Network::Bitcoin => "mainnet".to_string(),
      network => network.to_string(),
    }
  }

  pub fn state(&self) -> MutexGuard<State> {
    self.state.lock().unwrap()
  }

  /// Funds a fresh wallet address with a coin of `amount` and returns its
  /// outpoint.
  pub fn receive(&self, amount: Amount) -> OutPoint {
    self.state().receive(amount)
  }

  /// Makes `getbalance` report `balance` instead of the sum of unspent
  /// coins.
  pub fn set_balance(&self, balance: Amount) {
    self.state().balance = Some(balance);
  }

  pub fn calls(&self) -> Vec<String> {
    self.state().calls.clone()
  }

  pub fn created(&self) -> Vec<Transaction> {
    self.state().created.clone()
  }

  pub fn receive_addresses(&self) -> Vec<Address> {
    self.state().receive_addresses.clone()
  }
}

impl Drop for Handle {
  fn drop(&mut self) {
    self.close_handle.take().unwrap().close();
  }
}
