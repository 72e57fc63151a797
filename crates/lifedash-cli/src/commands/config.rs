use clap::Subcommand;
use lifedash_core::Config;

use crate::common::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init,
    /// Store the API bearer token
    SetToken { token: String },
    /// Store the API base URL
    SetUrl { url: String },
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Init => {
            let config = Config::load()?;
            config.save()?;
            println!("wrote {}", Config::config_path()?.display());
        }
        ConfigAction::SetToken { token } => {
            let mut config = Config::load()?;
            config.api.token = token;
            config.save()?;
            println!("token updated");
        }
        ConfigAction::SetUrl { url } => {
            let mut config = Config::load()?;
            config.api.base_url = url;
            config.save()?;
            println!("base URL updated");
        }
    }
    Ok(())
}
