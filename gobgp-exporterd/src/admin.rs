// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use crate::log::dlog;
use dropshot::{
    endpoint, ApiDescription, ConfigDropshot, HttpError, HttpServerStarter,
    RequestContext,
};
use gobgp_api::Client;
use gobgp_exporter::exposition::TEXT_FORMAT;
use gobgp_exporter::RouterNode;
use http::header::CONTENT_TYPE;
use hyper::{Body, Response};
use slog::{o, Logger};
use std::fs::File;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::task::JoinHandle;

const UNIT_DAEMON: &str = "api-server";

pub struct HandlerContext {
    pub node: Arc<RouterNode<Client>>,
    pub log: Logger,
}

pub fn start_server(
    log: Logger,
    addr: IpAddr,
    port: u16,
    context: Arc<HandlerContext>,
) -> Result<JoinHandle<()>, String> {
    let sa = SocketAddr::new(addr, port);
    let ds_config = ConfigDropshot {
        bind_address: sa,
        ..Default::default()
    };

    let ds_log = log.new(o!("unit" => UNIT_DAEMON));

    let api = api_description();

    let server = HttpServerStarter::new(&ds_config, api, context, &ds_log)
        .map_err(|e| format!("new metrics dropshot: {}", e))?;

    dlog!(log, info, "listening on {}", sa);

    Ok(tokio::spawn(async move {
        match server.start().await {
            Ok(_) => dlog!(log, warn, "unexpected server exit"),
            Err(e) => dlog!(log, error, "server start error {:?}", e),
        }
    }))
}

macro_rules! register {
    ($api:expr, $endpoint:expr) => {
        $api.register($endpoint).expect(stringify!($endpoint))
    };
}

pub fn api_description() -> ApiDescription<Arc<HandlerContext>> {
    let mut api = ApiDescription::new();
    register!(api, metrics);
    api
}

pub fn apigen(path: &str) -> anyhow::Result<()> {
    let api = api_description();
    let openapi = api.openapi("GoBGP Exporter", "0.1.0");
    let mut out = File::create(path)?;
    openapi.write(&mut out)?;
    Ok(())
}

/// Scrape the BGP daemon and return every metric in the Prometheus text
/// format.
#[endpoint { method = GET, path = "/metrics" }]
async fn metrics(
    ctx: RequestContext<Arc<HandlerContext>>,
) -> Result<Response<Body>, HttpError> {
    let ctx = ctx.context();
    let node = ctx.node.clone();

    // The daemon client blocks.
    let text = tokio::task::spawn_blocking(move || node.render())
        .await
        .map_err(Error::from)?
        .map_err(Error::from)?;

    dlog!(ctx.log, trace, "served scrape"; "bytes" => text.len());

    Ok(Response::builder()
        .header(CONTENT_TYPE, TEXT_FORMAT)
        .body(Body::from(text))
        .map_err(Error::from)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_endpoint_registered() {
        let api = api_description();
        let doc = api
            .openapi("GoBGP Exporter", "0.1.0")
            .json()
            .expect("openapi json");
        assert!(doc["paths"].get("/metrics").is_some(), "{doc}");
    }
}
