//! Demo binary exchanging tokens with `tokenframe` over TCP.

mod cli;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Command, Payload};
use tokenframe::{FrameConfig, FrameError, Stage, Token, TokenChannel, TokenFlags};
use tokio::net::{TcpListener, TcpStream};
use tracing::Level;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();

    // Not `init()`: its `log` bridge would capture the records `tracing`
    // already forwards to `log`, printing every event twice.
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt().with_max_level(level).finish(),
    )?;

    if let Some(addr) = cli.metrics_addr {
        install_metrics(addr)?;
    }

    let config = FrameConfig::default()
        .with_recv_timeout(Duration::from_secs(cli.recv_timeout_secs))
        .with_send_timeout(cli.send_timeout_secs.map(Duration::from_secs))
        .with_verbose(cli.verbose);

    match cli.command {
        Command::Listen { addr } => listen(addr, config).await,
        Command::Send {
            connect,
            flags,
            payload,
        } => send(connect, TokenFlags::truncate(flags), payload, config).await,
    }
}

#[cfg(feature = "metrics")]
fn install_metrics(addr: std::net::SocketAddr) -> Result<(), BoxError> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(%addr, "serving metrics");
    Ok(())
}

#[cfg(not(feature = "metrics"))]
fn install_metrics(addr: std::net::SocketAddr) -> Result<(), BoxError> {
    tracing::warn!(%addr, "built without metrics support; ignoring --metrics-addr");
    Ok(())
}

async fn listen(addr: std::net::SocketAddr, config: FrameConfig) -> Result<(), BoxError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "waiting for a peer");
    let (stream, peer) = listener.accept().await?;
    tracing::info!(%peer, "peer connected");

    let mut channel = TokenChannel::with_config(stream, config);
    let mut echoed = 0usize;
    loop {
        let (flags, token) = match channel.recv_token().await {
            Ok(frame) => frame,
            // Hanging up between frames ends the session cleanly.
            Err(FrameError::ShortTransfer { stage, got: 0, .. }) if stage == Stage::RECV_FLAGS => {
                break;
            }
            Err(e) => return Err(e.into()),
        };
        channel.send_token(flags, &token).await?;
        echoed += 1;
        token.release();
    }
    tracing::info!(%peer, echoed, "peer disconnected");
    Ok(())
}

async fn send(
    addr: std::net::SocketAddr,
    flags: TokenFlags,
    payload: Payload,
    config: FrameConfig,
) -> Result<(), BoxError> {
    let token = match (payload.file, payload.text) {
        (Some(path), _) => Token::new(std::fs::read(path)?),
        (None, Some(text)) => Token::new(text.into_bytes()),
        (None, None) => return Err("no token payload given".into()),
    };

    let stream = TcpStream::connect(addr).await?;
    let mut channel = TokenChannel::with_config(stream, config);
    channel.send_token(flags, &token).await?;
    let (echo_flags, echo) = channel.recv_token().await?;
    if echo != token {
        return Err("peer echoed a different token".into());
    }
    println!(
        "{} bytes echoed with flags {echo_flags} (sent {flags})",
        echo.len()
    );
    Ok(())
}
