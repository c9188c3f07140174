use super::*;

#[derive(Clone, Default, Debug, Parser)]
#[command(group(
  ArgGroup::new("chains")
    .required(false)
    .args(&["chain_argument", "signet", "regtest", "testnet"]),
))]
pub struct Options {
  #[arg(long, help = "Load Bitcoin Core data dir from <BITCOIN_DATA_DIR>.")]
  pub(crate) bitcoin_data_dir: Option<PathBuf>,
  #[arg(
    long,
    help = "Connect to Bitcoin Core RPC on <BITCOIN_RPC_HOST>. [default: 127.0.0.1]"
  )]
  pub(crate) bitcoin_rpc_host: Option<String>,
  #[arg(
    long,
    help = "Authenticate to Bitcoin Core RPC with <BITCOIN_RPC_PASSWORD>."
  )]
  pub(crate) bitcoin_rpc_password: Option<String>,
  #[arg(
    long,
    help = "Connect to Bitcoin Core RPC on <BITCOIN_RPC_PORT>. [default: chain RPC port]"
  )]
  pub(crate) bitcoin_rpc_port: Option<u16>,
  #[arg(
    long,
    help = "Connect to Bitcoin Core RPC at <BITCOIN_RPC_URL>. Overrides host and port."
  )]
  pub(crate) bitcoin_rpc_url: Option<String>,
  #[arg(
    long,
    help = "Authenticate to Bitcoin Core RPC as <BITCOIN_RPC_USERNAME>."
  )]
  pub(crate) bitcoin_rpc_username: Option<String>,
  #[arg(long = "chain", value_enum, help = "Use <CHAIN>. [default: mainnet]")]
  pub(crate) chain_argument: Option<Chain>,
  #[arg(long, help = "Load configuration from <CONFIG>.")]
  pub(crate) config: Option<PathBuf>,
  #[arg(long, help = "Load configuration from <CONFIG_DIR>.")]
  pub(crate) config_dir: Option<PathBuf>,
  #[arg(long, help = "Load Bitcoin Core RPC cookie file from <COOKIE_FILE>.")]
  pub(crate) cookie_file: Option<PathBuf>,
  #[arg(
    long,
    help = "Send the donation to <DONATION_ADDRESS>. [default: 1ForFeesAndDonationsSpendHerdtWbWy]"
  )]
  pub(crate) donation_address: Option<String>,
  #[arg(
    long,
    value_name = "SATS",
    help = "Donate at least <SATS> satoshis per transaction. [default: 0]"
  )]
  pub(crate) donation_minimum: Option<u64>,
  #[arg(
    long,
    value_name = "SATS",
    help = "Donate <SATS> satoshis for every selected input. [default: 3000]"
  )]
  pub(crate) donation_per_input: Option<u64>,
  #[arg(long, short, help = "Use regtest. Equivalent to `--chain regtest`.")]
  pub(crate) regtest: bool,
  #[arg(long, short, help = "Use signet. Equivalent to `--chain signet`.")]
  pub(crate) signet: bool,
  #[arg(long, short, help = "Use testnet. Equivalent to `--chain testnet`.")]
  pub(crate) testnet: bool,
}
