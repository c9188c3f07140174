use super::*;

#[doc(hidden)]
#[jsonrpc_derive::rpc(server)]
pub trait Api {
  #[rpc(name = "getblockchaininfo")]
  fn get_blockchain_info(&self) -> Result<Value, jsonrpc_core::Error>;

  #[rpc(name = "getnetworkinfo")]
  fn get_network_info(&self) -> Result<Value, jsonrpc_core::Error>;

  #[rpc(name = "getbalance")]
  fn get_balance(
    &self,
    dummy: Option<String>,
    minconf: Option<usize>,
    include_watchonly: Option<bool>,
  ) -> Result<f64, jsonrpc_core::Error>;

  #[rpc(name = "listunspent")]
  fn list_unspent(
    &self,
    minconf: Option<usize>,
    maxconf: Option<usize>,
    addresses: Option<Vec<Address<NetworkUnchecked>>>,
    include_unsafe: Option<bool>,
    query_options: Option<Value>,
  ) -> Result<Vec<ListUnspentResultEntry>, jsonrpc_core::Error>;

  #[rpc(name = "getnewaddress")]
  fn get_new_address(
    &self,
    label: Option<String>,
    address_type: Option<String>,
  ) -> Result<Address, jsonrpc_core::Error>;

  #[rpc(name = "createrawtransaction")]
  fn create_raw_transaction(
    &self,
    utxos: Vec<CreateRawTransactionInput>,
    outs: serde_json::Map<String, Value>,
    locktime: Option<i64>,
    replaceable: Option<bool>,
  ) -> Result<String, jsonrpc_core::Error>;
}
