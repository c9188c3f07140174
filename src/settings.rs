use super::*;

#[derive(Default, Debug, Clone)]
pub struct Settings {
  pub(crate) chain: Chain,
  pub(crate) config: Config,
  pub(crate) options: Options,
}

impl Settings {
  pub fn new(options: Options) -> Result<Self> {
    let config = Config::load(&options)?;

    let chain = Self::setting_typed(
      options
        .signet
        .then_some(Chain::Signet)
        .or(options.regtest.then_some(Chain::Regtest))
        .or(options.testnet.then_some(Chain::Testnet))
        .or(options.chain_argument),
      Some("CHAIN"),
      config.chain,
      Chain::Mainnet,
    )?;

    Ok(Self {
      chain,
      config,
      options,
    })
  }

  pub(crate) fn auth(&self) -> Result<Auth> {
    let rpc_user = Self::setting(
      self.options.bitcoin_rpc_username.as_deref(),
      Some("BITCOIN_RPC_USERNAME"),
      self.config.bitcoin_rpc_username.as_deref(),
      None,
    )?;

    let rpc_pass = Self::setting(
      self.options.bitcoin_rpc_password.as_deref(),
      Some("BITCOIN_RPC_PASSWORD"),
      self.config.bitcoin_rpc_password.as_deref(),
      None,
    )?;

    match (rpc_user, rpc_pass) {
      (Some(rpc_user), Some(rpc_pass)) => Ok(Auth::UserPass(rpc_user, rpc_pass)),
      (None, Some(_rpc_pass)) => Err(anyhow!("no bitcoind rpc user specified")),
      (Some(_rpc_user), None) => Err(anyhow!("no bitcoind rpc password specified")),
      _ => Ok(Auth::CookieFile(self.cookie_file()?)),
    }
  }

  pub(crate) fn bitcoin_rpc_client(&self) -> Result<Client> {
    let rpc_url = self.rpc_url()?;

    let auth = self.auth()?;

    log::info!("Connecting to Bitcoin Core at {rpc_url}");

    if let Auth::CookieFile(cookie_file) = &auth {
      log::info!(
        "Using credentials from cookie file at `{}`",
        cookie_file.display()
      );

      ensure!(
        cookie_file.is_file(),
        "cookie file `{}` does not exist",
        cookie_file.display()
      );
    }

    let client = Client::new(&rpc_url, auth)
      .with_context(|| format!("failed to connect to Bitcoin Core RPC at `{rpc_url}`"))?;

    let rpc_chain = Chain::from(
      client
        .get_blockchain_info()
        .with_context(|| format!("failed to connect to Bitcoin Core RPC at `{rpc_url}`"))?
        .chain,
    );

    if rpc_chain != self.chain {
      bail!("Bitcoin RPC server is on {rpc_chain} but gentx is on {}", self.chain);
    }

    Ok(client)
  }

  pub fn chain(&self) -> Chain {
    self.chain
  }

  pub(crate) fn cookie_file(&self) -> Result<PathBuf> {
    if let Some(cookie_file) = Self::setting_path(
      self.options.cookie_file.as_ref(),
      Some("COOKIE_FILE"),
      self.config.cookie_file.as_ref(),
    )? {
      return Ok(cookie_file);
    }

    let path = if let Some(bitcoin_data_dir) = Self::setting_path(
      self.options.bitcoin_data_dir.as_ref(),
      Some("BITCOIN_DATA_DIR"),
      self.config.bitcoin_data_dir.as_ref(),
    )? {
      bitcoin_data_dir
    } else if cfg!(target_os = "linux") {
      dirs::home_dir()
        .ok_or_else(|| anyhow!("failed to get cookie file path: could not get home dir"))?
        .join(".bitcoin")
    } else {
      dirs::data_dir()
        .ok_or_else(|| anyhow!("failed to get cookie file path: could not get data dir"))?
        .join("Bitcoin")
    };

    Ok(self.chain.join_with_data_dir(path).join(".cookie"))
  }

  pub fn donation(&self) -> Result<Donation> {
    let address = Self::setting(
      self.options.donation_address.as_deref(),
      Some("DONATION_ADDRESS"),
      self.config.donation_address.as_deref(),
      None,
    )?
    .unwrap_or_else(|| Donation::DEFAULT_ADDRESS.into());

    let minimum = Self::setting_typed(
      self.options.donation_minimum,
      Some("DONATION_MINIMUM"),
      self.config.donation_minimum,
      Donation::DEFAULT_MINIMUM.to_sat(),
    )?;

    let per_input = Self::setting_typed(
      self.options.donation_per_input,
      Some("DONATION_PER_INPUT"),
      self.config.donation_per_input,
      Donation::DEFAULT_PER_INPUT.to_sat(),
    )?;

    Ok(Donation {
      address,
      minimum: Amount::from_sat(minimum),
      per_input: Amount::from_sat(per_input),
    })
  }

  pub(crate) fn rpc_url(&self) -> Result<String> {
    if let Some(url) = Self::setting(
      self.options.bitcoin_rpc_url.as_deref(),
      Some("BITCOIN_RPC_URL"),
      self.config.bitcoin_rpc_url.as_deref(),
      None,
    )? {
      return Ok(url);
    }

    let host = Self::setting(
      self.options.bitcoin_rpc_host.as_deref(),
      Some("BITCOIN_RPC_HOST"),
      self.config.bitcoin_rpc_host.as_deref(),
      None,
    )?
    .unwrap_or_else(|| "127.0.0.1".into());

    let port = Self::setting_typed(
      self.options.bitcoin_rpc_port,
      Some("BITCOIN_RPC_PORT"),
      self.config.bitcoin_rpc_port,
      self.chain.default_rpc_port(),
    )?;

    Ok(format!("{host}:{port}/"))
  }

  pub fn wallet(&self) -> Result<CoreWallet> {
    Ok(CoreWallet::new(self.bitcoin_rpc_client()?, self.chain))
  }

  fn setting_path(
    arg_value: Option<&PathBuf>,
    env_key: Option<&str>,
    config_value: Option<&PathBuf>,
  ) -> Result<Option<PathBuf>> {
    if let Some(arg_value) = arg_value {
      return Ok(Some(arg_value.clone()));
    }

    if let Some(env_key) = env_key {
      if let Some(env_value) = env::var_os(format!("GENTX_{env_key}")) {
        return Ok(Some(env_value.into()));
      }
    }

    Ok(config_value.cloned())
  }

  fn setting_typed<T>(
    arg_value: Option<T>,
    env_key: Option<&str>,
    config_value: Option<T>,
    default_value: T,
  ) -> Result<T>
  where
    T: FromStr,
    T::Err: Into<Error>,
  {
    if let Some(arg_value) = arg_value {
      return Ok(arg_value);
    }

    if let Some(env_key) = env_key {
      let key = format!("GENTX_{env_key}");
      match env::var(&key) {
        Ok(env_value) => {
          return env_value
            .parse::<T>()
            .map_err(|err| Into::<Error>::into(err).context(format!("failed to parse {key}")))
        }
        Err(err @ env::VarError::NotUnicode(_)) => return Err(err.into()),
        Err(env::VarError::NotPresent) => {}
      }
    }

    if let Some(config_value) = config_value {
      return Ok(config_value);
    }

    Ok(default_value)
  }

  fn setting(
    arg_value: Option<&str>,
    env_key: Option<&str>,
    config_value: Option<&str>,
    default_value: Option<&str>,
  ) -> Result<Option<String>> {
    if let Some(arg_value) = arg_value {
      return Ok(Some(arg_value.into()));
    }

    if let Some(env_key) = env_key {
      match env::var(format!("GENTX_{env_key}")) {
        Ok(env_value) => return Ok(Some(env_value)),
        Err(err @ env::VarError::NotUnicode(_)) => return Err(err.into()),
        Err(env::VarError::NotPresent) => {}
      }
    }

    Ok(config_value.or(default_value).map(str::to_string))
  }
}
