use {super::*, bitcoincore_rpc::json::CreateRawTransactionInput, serde_json::Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnspentCoin {
  pub outpoint: OutPoint,
  pub amount: Amount,
}

/// The four wallet calls transaction generation needs.
pub trait WalletRpc {
  fn balance(&self) -> Result<Amount>;

  fn list_unspent(&self) -> Result<Vec<UnspentCoin>>;

  /// Mints a receiving address. Every call allocates from the wallet's
  /// address pool.
  fn new_address(&self) -> Result<String>;

  /// Returns the hex-encoded unsigned transaction.
  fn create_raw_transaction(&self, inputs: &[OutPoint], outputs: &OutputPlan) -> Result<String>;
}

pub struct CoreWallet {
  chain: Chain,
  client: Client,
}

impl CoreWallet {
  pub fn new(client: Client, chain: Chain) -> Self {
    Self { chain, client }
  }
}

impl WalletRpc for CoreWallet {
  fn balance(&self) -> Result<Amount> {
    self
      .client
      .get_balance(None, None)
      .context("failed to get wallet balance")
  }

  fn list_unspent(&self) -> Result<Vec<UnspentCoin>> {
    Ok(
      self
        .client
        .list_unspent(None, None, None, None, None)
        .context("failed to list unspent outputs")?
        .into_iter()
        .map(|entry| UnspentCoin {
          outpoint: OutPoint::new(entry.txid, entry.vout),
          amount: entry.amount,
        })
        .collect(),
    )
  }

  fn new_address(&self) -> Result<String> {
    let address = self
      .client
      .get_new_address(None, None)
      .context("failed to get new address")?;

    Ok(
      address
        .require_network(self.chain.network())
        .with_context(|| format!("wallet returned address not valid on {}", self.chain))?
        .to_string(),
    )
  }

  fn create_raw_transaction(&self, inputs: &[OutPoint], outputs: &OutputPlan) -> Result<String> {
    let inputs = inputs
      .iter()
      .map(|outpoint| CreateRawTransactionInput {
        txid: outpoint.txid,
        vout: outpoint.vout,
        sequence: None,
      })
      .collect::<Vec<CreateRawTransactionInput>>();

    self
      .client
      .call(
        "createrawtransaction",
        &[serde_json::to_value(inputs)?, outputs.to_json()],
      )
      .context("failed to create raw transaction")
  }
}

impl OutputPlan {
  /// Outputs as the JSON object `createrawtransaction` expects, in plan order.
  fn to_json(&self) -> Value {
    Value::Object(
      self
        .iter()
        .map(|(address, amount)| (address.into(), Value::from(amount.to_btc())))
        .collect(),
    )
  }
}
