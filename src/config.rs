use super::*;

#[derive(Deserialize, Default, PartialEq, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
  pub(crate) bitcoin_data_dir: Option<PathBuf>,
  pub(crate) bitcoin_rpc_host: Option<String>,
  pub(crate) bitcoin_rpc_password: Option<String>,
  pub(crate) bitcoin_rpc_port: Option<u16>,
  pub(crate) bitcoin_rpc_url: Option<String>,
  pub(crate) bitcoin_rpc_username: Option<String>,
  pub(crate) chain: Option<Chain>,
  pub(crate) cookie_file: Option<PathBuf>,
  pub(crate) donation_address: Option<String>,
  pub(crate) donation_minimum: Option<u64>,
  pub(crate) donation_per_input: Option<u64>,
}

impl Config {
  pub(crate) fn load(options: &Options) -> Result<Self> {
    let path = match (&options.config, &options.config_dir) {
      (Some(path), _) => path.clone(),
      (None, Some(dir)) if dir.join("gentx.yaml").exists() => dir.join("gentx.yaml"),
      _ => return Ok(Self::default()),
    };

    let file =
      File::open(&path).with_context(|| format!("failed to open config `{}`", path.display()))?;

    serde_yaml::from_reader(file)
      .with_context(|| format!("failed to deserialize config `{}`", path.display()))
  }
}
