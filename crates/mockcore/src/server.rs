use super::*;

pub(crate) struct Server {
  pub(crate) state: Arc<Mutex<State>>,
  pub(crate) network: Network,
}

impl Server {
  pub(crate) fn new(state: Arc<Mutex<State>>) -> Self {
    let network = state.lock().unwrap().network;
    Self { network, state }
  }

  fn state(&self) -> MutexGuard<State> {
    self.state.lock().unwrap()
  }

  fn record(&self, method: &str) {
    self.state().calls.push(method.into());
  }

  fn call(&self, method: &str) -> MutexGuard<State> {
    self.record(method);
    self.state()
  }

  fn invalid_address(address: &str) -> jsonrpc_core::Error {
    jsonrpc_core::Error {
      code: jsonrpc_core::ErrorCode::ServerError(-5),
      message: format!("Invalid Bitcoin address: {address}"),
      data: None,
    }
  }

  fn invalid_amount(value: &Value) -> jsonrpc_core::Error {
    jsonrpc_core::Error {
      code: jsonrpc_core::ErrorCode::ServerError(-3),
      message: format!("Invalid amount: {value}"),
      data: None,
    }
  }
}

impl Api for Server {
  fn get_blockchain_info(&self) -> Result<Value, jsonrpc_core::Error> {
    self.record("getblockchaininfo");

    let mut info = serde_json::to_value(GetBlockchainInfoResult {
      chain: self.network,
      blocks: 0,
      headers: 0,
      best_block_hash: bitcoin::blockdata::constants::genesis_block(self.network).block_hash(),
      difficulty: 0.0,
      median_time: 0,
      verification_progress: 0.0,
      initial_block_download: false,
      chain_work: Vec::new(),
      size_on_disk: 0,
      pruned: false,
      prune_height: None,
      automatic_pruning: None,
      prune_target_size: None,
      softforks: HashMap::new(),
      warnings: StringOrStringArray::String(String::new()),
    })
    .unwrap();

    info["chain"] = self.network.to_core_arg().into();

    Ok(info)
  }

  fn get_network_info(&self) -> Result<Value, jsonrpc_core::Error> {
    self.record("getnetworkinfo");

    Ok(serde_json::json!({
      "version": 260000,
      "subversion": "/Satoshi:26.0.0/",
      "protocolversion": 70016,
    }))
  }

  fn get_balance(
    &self,
    _dummy: Option<String>,
    minconf: Option<usize>,
    include_watchonly: Option<bool>,
  ) -> Result<f64, jsonrpc_core::Error> {
    assert_eq!(minconf, None, "minconf param not supported");
    assert_eq!(include_watchonly, None, "include_watchonly param not supported");

    let state = self.call("getbalance");

    Ok(
      state
        .balance
        .unwrap_or_else(|| state.utxos.values().map(|(amount, _)| *amount).sum())
        .to_btc(),
    )
  }

  fn list_unspent(
    &self,
    minconf: Option<usize>,
    maxconf: Option<usize>,
    addresses: Option<Vec<Address<NetworkUnchecked>>>,
    include_unsafe: Option<bool>,
    query_options: Option<Value>,
  ) -> Result<Vec<ListUnspentResultEntry>, jsonrpc_core::Error> {
    assert_eq!(minconf, None, "minconf param not supported");
    assert_eq!(maxconf, None, "maxconf param not supported");
    assert!(addresses.is_none(), "addresses param not supported");
    assert_eq!(include_unsafe, None, "include_unsafe param not supported");
    assert_eq!(query_options, None, "query_options param not supported");

    let state = self.call("listunspent");

    Ok(
      state
        .utxos
        .iter()
        .map(|(outpoint, (amount, address))| ListUnspentResultEntry {
          txid: outpoint.txid,
          vout: outpoint.vout,
          address: None,
          label: None,
          redeem_script: None,
          witness_script: None,
          script_pub_key: address.script_pubkey(),
          amount: *amount,
          confirmations: 1,
          spendable: true,
          solvable: true,
          descriptor: None,
          safe: true,
        })
        .collect(),
    )
  }

  fn get_new_address(
    &self,
    _label: Option<String>,
    _address_type: Option<String>,
  ) -> Result<Address, jsonrpc_core::Error> {
    Ok(self.call("getnewaddress").new_address())
  }

  fn create_raw_transaction(
    &self,
    utxos: Vec<CreateRawTransactionInput>,
    outs: serde_json::Map<String, Value>,
    locktime: Option<i64>,
    replaceable: Option<bool>,
  ) -> Result<String, jsonrpc_core::Error> {
    assert_eq!(locktime, None, "locktime param not supported");
    assert_eq!(replaceable, None, "replaceable param not supported");

    self.record("createrawtransaction");

    let mut output = Vec::new();

    for (address, value) in &outs {
      let script_pubkey = Address::from_str(address)
        .ok()
        .and_then(|address| address.require_network(self.network).ok())
        .ok_or_else(|| Self::invalid_address(address))?
        .script_pubkey();

      let value = value
        .as_f64()
        .and_then(|btc| Amount::from_btc(btc).ok())
        .ok_or_else(|| Self::invalid_amount(value))?;

      output.push(TxOut {
        value,
        script_pubkey,
      });
    }

    let tx = Transaction {
      version: Version::TWO,
      lock_time: LockTime::ZERO,
      input: utxos
        .iter()
        .map(|input| TxIn {
          previous_output: OutPoint::new(input.txid, input.vout),
          script_sig: ScriptBuf::new(),
          sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
          witness: Witness::new(),
        })
        .collect(),
      output,
    };

    let hex = serialize_hex(&tx);

    self.state().created.push(tx);

    Ok(hex)
  }
}
