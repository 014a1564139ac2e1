// ABOUTME: Serve command implementation.
// ABOUTME: Connects the clients once and serves build requests until interrupted.

use std::net::IpAddr;
use std::sync::Arc;

use kaas_build::config::Settings;
use kaas_build::error::Result;
use kaas_build::output::Output;
use kaas_build::server;

use super::connect;

pub async fn serve(
    mut settings: Settings,
    bind: Option<IpAddr>,
    port: Option<u16>,
    output: Output,
) -> Result<()> {
    if let Some(bind) = bind {
        settings.server.bind = bind;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let namespace = settings.namespace.clone();
    let pipeline = connect::pipeline(&settings, &namespace, &output).await?;

    let addr = settings.server.socket_addr();
    output.progress(&format!("→ Listening on {addr}"));
    server::serve(Arc::new(pipeline), addr).await?;
    Ok(())
}
