mod error;
mod forms;
mod server;
mod store;
mod timing;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::Parser;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use server::server::Server;
use store::{
    config::StoreConfig,
    engine::StoreStatusEngine,
    render::LogRenderer,
    ticker::{StatusTicker, DEFAULT_INTERVAL},
};
use timing::clock::{Clock, FixedClock, SystemClock};
use tokio::{net::TcpListener, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Serves the store's opening status and the site's form rules.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Weekly hours and holidays, as JSON
    #[arg(long, default_value = "config/store.json")]
    config: PathBuf,

    #[arg(long, default_value = "127.0.0.1:7878")]
    bind: SocketAddr,

    /// Seconds between status refreshes
    #[arg(
        long,
        default_value_t = DEFAULT_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval_secs: u64,

    /// Print the status at this local time (YYYY-MM-DDTHH:MM:SS) and exit
    #[arg(long)]
    at: Option<NaiveDateTime>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "store_hours=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = StoreConfig::from_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    info!(
        path = %args.config.display(),
        timezone = config.timezone().name(),
        holidays = config.holidays().len(),
        lookahead_days = config.lookahead_days(),
        "configuration loaded"
    );
    let engine = Arc::new(StoreStatusEngine::new(config));

    if let Some(at) = args.at {
        let verdict = engine.status_now(&FixedClock(at));
        println!("{}: {}", verdict.state(), verdict.detail());
        return Ok(());
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(engine.config().timezone()));
    let ticker = StatusTicker::new(
        engine.clone(),
        clock.clone(),
        LogRenderer::new(),
        Duration::from_secs(args.interval_secs),
    );
    tokio::spawn(ticker.run());

    let server = Server::setup(engine, clock);
    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(connection) => connection,
            Err(err) => {
                warn!(%err, "accept failed");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let server_clone = server.clone();
        tokio::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .serve_connection(io, server_clone)
                .await
            {
                warn!(%peer, %err, "connection error");
            }
        });
    }
}
