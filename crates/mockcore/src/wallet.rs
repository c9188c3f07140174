use super::*;

#[derive(Debug)]
pub struct Wallet {
  master_key: Xpriv,
  network: Network,
  next_index: u32,
  secp: Secp256k1<secp256k1::All>,
}

impl Wallet {
  pub fn new(network: Network, seed: &[u8]) -> Self {
    Self {
      master_key: Xpriv::new_master(network, seed).unwrap(),
      secp: Secp256k1::new(),
      network,
      next_index: 0,
    }
  }

  pub fn new_address(&mut self) -> Address {
    let derivation_path =
      DerivationPath::from_str(&format!("m/86'/0'/0'/0/{}", self.next_index)).unwrap();

    let derived_key = self
      .master_key
      .derive_priv(&self.secp, &derivation_path)
      .unwrap();

    let keypair = derived_key.to_keypair(&self.secp);
    let (internal_key, _parity) = XOnlyPublicKey::from_keypair(&keypair);

    let script = ScriptBuf::new_p2tr(&self.secp, internal_key, None);

    self.next_index += 1;

    Address::from_script(&script, self.network).unwrap()
  }
}
