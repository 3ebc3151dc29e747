use clap::{builder::PossibleValuesParser, Parser};
use std::net::{IpAddr, SocketAddr};

use crate::constants::LOG_LEVELS;

/// Every option can also be supplied through the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "chain-node", about = "HTTP node serving a hash-linked block chain")]
pub(crate) struct Args {
    /// Port to listen on
    #[arg(long, env = "SERVER_PORT", default_value_t = 9000)]
    pub port: u16,

    /// Interface to bind, e.g. 127.0.0.1
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Service name echoed in every response
    #[arg(long, env = "NAME", default_value = "chain-node")]
    pub name: String,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info", value_parser = PossibleValuesParser::new(LOG_LEVELS))]
    pub log_level: String,

    /// Create the genesis block at startup instead of waiting for POST /api/v1/genesis
    #[arg(long, env = "GENESIS_ON_START", default_value_t = false)]
    pub genesis_on_start: bool,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
