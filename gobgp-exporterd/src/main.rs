// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use gobgp_api::Client;
use gobgp_exporter::{RibSelection, RouterNode};
use crate::log::{dlog, init_logger, parse_level, LogFormat};
use slog::Level;
use std::net::{IpAddr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;

mod admin;
mod error;
mod log;

const COMPONENT_EXPORTERD: &str = "exporterd";
const UNIT_DAEMON: &str = "daemon";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve GoBGP metrics to Prometheus.
    Run(RunArgs),
    /// Generate the OpenAPI document for the scrape server.
    Apigen {
        /// Where to write the document.
        #[arg(long, default_value = "gobgp-exporter.json")]
        out: String,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// gRPC endpoint of the GoBGP daemon to scrape.
    #[arg(
        long,
        env = "GOBGP_ENDPOINT",
        default_value = "http://127.0.0.1:50051"
    )]
    gobgp_endpoint: String,

    /// Deadline for each request to the daemon.
    #[arg(
        long,
        env = "GOBGP_TIMEOUT",
        default_value = "5s",
        value_parser = humantime::parse_duration
    )]
    timeout: Duration,

    /// Address to serve metrics on.
    #[arg(long, default_value_t = IpAddr::V6(Ipv6Addr::UNSPECIFIED))]
    listen_address: IpAddr,

    /// Port to serve metrics on.
    #[arg(long, default_value_t = 9474)]
    listen_port: u16,

    /// Routing tables to size.
    #[arg(long, value_delimiter = ',', default_value = "global,local")]
    resource_types: Vec<String>,

    /// Address families to size, either `afi-safi` or a bare SAFI.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "ipv4-unicast,ipv6-unicast"
    )]
    address_families: Vec<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Bunyan)]
    log_format: LogFormat,

    /// Write logs here instead of stdout.
    #[arg(long)]
    log_file: Option<String>,

    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: Level,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    match args.command {
        Commands::Run(run_args) => run(run_args),
        Commands::Apigen { out } => admin::apigen(&out),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let log = init_logger(
        args.log_format,
        args.log_level,
        args.log_file.as_deref(),
    )
    .context("init logger")?;

    let selection =
        RibSelection::new(&args.resource_types, &args.address_families);
    for name in selection.unknown_names() {
        dlog!(log, warn, "{} selects no routing table", name);
    }

    // Build the blocking client outside of the async runtime.
    let client = Client::new(&args.gobgp_endpoint, args.timeout, log.clone())
        .with_context(|| format!("gobgp endpoint {}", args.gobgp_endpoint))?;

    dlog!(log, info, "exporter starting";
        "gobgp_endpoint" => client.endpoint(),
        "timeout_ms" => args.timeout.as_millis() as u64
    );

    // The node owns the client runtime, so it must outlive the server
    // runtime and be dropped outside of it.
    let node = Arc::new(RouterNode::new(client, selection, log.clone()));
    let context = Arc::new(admin::HandlerContext {
        node: node.clone(),
        log: log.clone(),
    });

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(async move {
        let server = admin::start_server(
            log.clone(),
            args.listen_address,
            args.listen_port,
            context,
        )
        .map_err(|e| anyhow!(e))?;
        server.await?;
        Ok(())
    })
}
