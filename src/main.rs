use tinyhttpd::config::Config;
use tinyhttpd::netconfig::NetConfig;
use tinyhttpd::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    // A network config that does not parse stops the server right here.
    let net = match &cfg.network.config_file {
        Some(path) => {
            let net = NetConfig::load(path)?;
            tracing::info!(
                "Network config: mac={:02x?} ip={:?} netmask={:?} gateway={:?} dns={:?}",
                net.mac,
                net.ip,
                net.netmask,
                net.gateway,
                net.dns
            );
            Some(net)
        }
        None => None,
    };

    tokio::select! {
        res = server::listener::run(&cfg, net.as_ref()) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
