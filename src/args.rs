use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::RelayError;

#[derive(Parser, Debug)]
#[command(name = "peer-relay")]
#[command(author = "Peer Relay Team")]
#[command(version = "0.1.0")]
#[command(about = "Room-based WebRTC signaling relay", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/peer-relay.toml")]
    pub config: PathBuf,

    /// Bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Verbose logging
    #[arg(short, long, action)]
    pub verbose: bool,
}

impl Args {
    pub fn load_config(&self) -> Result<Config, RelayError> {
        Config::load(&self.config)
    }

    /// Apply overrides on top of the file config: `PORT` first, then flags
    pub fn apply_overrides(&self, config: &mut Config, env_port: Option<&str>) {
        if let Some(port) = env_port.and_then(|p| p.trim().parse::<u16>().ok()) {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment() {
        let args = Args::parse_from(["peer-relay", "--port", "5000", "--host", "127.0.0.1"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config, Some("4000"));
        assert_eq!(config.server.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn environment_port_applies_without_flag() {
        let args = Args::parse_from(["peer-relay"]);
        let mut config = Config::default();
        args.apply_overrides(&mut config, Some("4000"));
        assert_eq!(config.server.port, 4000);

        args.apply_overrides(&mut config, Some("not-a-port"));
        assert_eq!(config.server.port, 4000);
    }
}
