use super::*;

#[derive(Debug)]
pub struct State {
  pub balance: Option<Amount>,
  pub calls: Vec<String>,
  pub created: Vec<Transaction>,
  pub network: Network,
  pub nonce: u32,
  pub receive_addresses: Vec<Address>,
  pub utxos: BTreeMap<OutPoint, (Amount, Address)>,
  pub wallet: Wallet,
}

impl State {
  pub(crate) fn new(network: Network) -> Self {
    Self {
      balance: None,
      calls: Vec::new(),
      created: Vec::new(),
      network,
      nonce: 0,
      receive_addresses: Vec::new(),
      utxos: BTreeMap::new(),
      wallet: Wallet::new(network, &[0; 32]),
    }
  }

  pub(crate) fn new_address(&mut self) -> Address {
    let address = self.wallet.new_address();
    self.receive_addresses.push(address.clone());
    address
  }

  pub(crate) fn receive(&mut self, amount: Amount) -> OutPoint {
    let address = self.wallet.new_address();

    let tx = Transaction {
      version: Version::TWO,
      lock_time: LockTime::ZERO,
      input: vec![TxIn {
        previous_output: OutPoint::null(),
        script_sig: script::Builder::new()
          .push_int(self.nonce.into())
          .into_script(),
        sequence: Sequence::MAX,
        witness: Witness::new(),
      }],
      output: vec![TxOut {
        value: amount,
        script_pubkey: address.script_pubkey(),
      }],
    };

    self.nonce += 1;

    let outpoint = OutPoint::new(tx.compute_txid(), 0);

    self.utxos.insert(outpoint, (amount, address));

    outpoint
  }
}
