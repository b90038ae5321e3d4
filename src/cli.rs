//! Command line interface for the `tokenframe` demo binary.
//!
//! The binary exchanges tokens over TCP: `listen` echoes every token it
//! receives and `send` transmits one token and checks the echo.

use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};

/// Command line arguments for the `tokenframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tokenframe",
    version,
    about = "Exchange length-prefixed security tokens over TCP"
)]
pub struct Cli {
    /// Log a hex dump of every token sent or received.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Seconds each read may wait for data.
    #[arg(long, global = true, default_value_t = 10, value_name = "SECS")]
    pub recv_timeout_secs: u64,

    /// Seconds each write may wait for the peer; unbounded when omitted.
    #[arg(long, global = true, value_name = "SECS")]
    pub send_timeout_secs: Option<u64>,

    /// Serve Prometheus metrics on this address.
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_addr: Option<SocketAddr>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operating mode.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Accept one connection and echo each token until the peer hangs up.
    Listen {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:7878")]
        addr: SocketAddr,
    },
    /// Send one token and wait for it to be echoed back.
    Send {
        /// Address of the listening peer.
        #[arg(long)]
        connect: SocketAddr,

        /// Flag value; only the low-order byte is transmitted.
        #[arg(long, default_value_t = 0)]
        flags: u32,

        #[command(flatten)]
        payload: Payload,
    },
}

/// Source of the token payload.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct Payload {
    /// Read the token from a file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Use the UTF-8 bytes of this string as the token.
    #[arg(long)]
    pub text: Option<String>,
}
