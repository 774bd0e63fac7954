use std::io::BufWriter;
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::stream::PeekReader;
use crate::netconfig::NetConfig;
use crate::site::Site;
use crate::storage::FsStorage;

/// Address to bind: `listen_addr`, with its IP replaced by the network
/// config's address when one is set.
pub fn bind_addr(listen_addr: &str, net: Option<&NetConfig>) -> anyhow::Result<SocketAddr> {
    let mut addr: SocketAddr = listen_addr
        .parse()
        .with_context(|| format!("invalid listen address {}", listen_addr))?;
    if let Some(ip) = net.and_then(|n| n.ip) {
        addr.set_ip(IpAddr::V4(ip));
    }
    Ok(addr)
}

/// Everything a connection needs, moved onto the blocking pool for the
/// duration of one connection and handed back afterwards.
struct Worker {
    storage: FsStorage,
    site: Site,
    read_timeout: Option<Duration>,
}

impl Worker {
    fn serve(&mut self, stream: TcpStream, peer: SocketAddr) -> anyhow::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(self.read_timeout)?;

        let reader = stream.try_clone().context("failed to clone client socket")?;
        let mut conn = Connection::new(PeekReader::new(reader), BufWriter::new(stream));
        let result = self.site.serve(&mut conn, &self.storage);

        if let Some(e) = conn.input_mut().take_error() {
            warn!("Read from {} ended with error: {}", peer, e);
        }
        let (_, out) = conn.into_parts();
        if let Err(e) = out.get_ref().shutdown(Shutdown::Both) {
            debug!("Shutdown of {} returned: {}", peer, e);
        }

        result.map(|_| ())
    }
}

/// Accept clients forever, serving them one at a time.
///
/// The protocol engine is blocking, so each accepted socket is turned into
/// a std stream and served on tokio's blocking pool; the next client is
/// accepted only when it is done.
pub async fn run(cfg: &Config, net: Option<&NetConfig>) -> anyhow::Result<()> {
    let addr = bind_addr(&cfg.server.listen_addr, net)?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    let mut worker = Worker {
        storage: FsStorage::new(&cfg.static_files.root),
        site: Site::from_config(cfg),
        read_timeout: cfg.server.read_timeout_secs.map(Duration::from_secs),
    };
    info!("Serving files from {}", worker.storage.root().display());

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let stream = socket.into_std()?;
        worker = tokio::task::spawn_blocking(move || {
            if let Err(e) = worker.serve(stream, peer) {
                error!("Connection error from {}: {:#}", peer, e);
            }
            worker
        })
        .await?;
    }
}
