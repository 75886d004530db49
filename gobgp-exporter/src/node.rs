// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::RibSelection;
use crate::error::Error;
use crate::exposition;
use crate::log::node_log;
use crate::metrics::{self, MetricSample};
use crate::peer::PeerCollector;
use crate::rib::RibCollector;
use gobgp_api::RouterApi;
use slog::Logger;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Default)]
pub struct NodeStats {
    pub errors: AtomicU64,
    pub scrapes: AtomicU64,
}

/// Everything one scrape produced.
#[derive(Debug)]
pub struct Scrape {
    pub samples: Vec<MetricSample>,
    pub up: bool,
    pub errors: u64,
    pub duration: Duration,
}

/// Session with one BGP daemon.
///
/// The node carries only the connectivity flag and monotonic counters from
/// one scrape to the next. Samples are produced fresh by every call to
/// [`RouterNode::scrape`].
pub struct RouterNode<C> {
    client: C,
    selection: RibSelection,
    connected: AtomicBool,
    stats: NodeStats,
    log: Logger,
}

impl<C: RouterApi> RouterNode<C> {
    pub fn new(client: C, selection: RibSelection, log: Logger) -> Self {
        Self {
            client,
            selection,
            connected: AtomicBool::new(false),
            stats: NodeStats::default(),
            log,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.stats.errors.load(Ordering::Relaxed)
    }

    pub fn increment_error_counter(&self, n: u64) {
        self.stats.errors.fetch_add(n, Ordering::Relaxed);
    }

    /// Query the daemon once. Never fails: whatever could not be collected
    /// is missing from the result and accounted for in the error counter.
    pub fn scrape(&self) -> Scrape {
        let start = Instant::now();
        let mut samples = Vec::new();

        match self.client.get_bgp() {
            Ok(info) => {
                if !self.is_connected() {
                    node_log!(self.log, info,
                        "connected to bgp daemon";
                        "asn" => info.asn,
                        "router_id" => &info.router_id
                    );
                }
                self.connected.store(true, Ordering::Relaxed);
                samples.push(MetricSample::new(
                    &metrics::ROUTER_ASN,
                    info.asn.into(),
                    &[info.router_id.as_str()],
                ));
            }
            Err(e) => {
                node_log!(self.log, error,
                    "bgp daemon query failed: {}", e;
                    "error" => format!("{e}")
                );
                self.connected.store(false, Ordering::Relaxed);
                self.increment_error_counter(1);
            }
        }

        if self.is_connected() {
            let peers =
                PeerCollector::new(&self.client, &self.connected, &self.log)
                    .collect();
            self.increment_error_counter(peers.errors);
            samples.extend(peers.samples);

            let rib = RibCollector::new(
                &self.client,
                &self.selection,
                &self.connected,
                &self.log,
            )
            .collect();
            self.increment_error_counter(rib.errors);
            samples.extend(rib.samples);
        }

        let up = self.is_connected();
        let errors = self.errors();
        let scrapes = self.stats.scrapes.fetch_add(1, Ordering::Relaxed) + 1;
        let duration = start.elapsed();

        samples.push(MetricSample::flag(&metrics::ROUTER_UP, up, &[]));
        samples.push(MetricSample::new(
            &metrics::ROUTER_ERRORS,
            errors as f64,
            &[],
        ));
        samples.push(MetricSample::new(
            &metrics::ROUTER_SCRAPES,
            scrapes as f64,
            &[],
        ));
        samples.push(MetricSample::new(
            &metrics::ROUTER_SCRAPE_DURATION,
            duration.as_secs_f64(),
            &[],
        ));

        node_log!(self.log, debug,
            "scrape finished";
            "samples" => samples.len(),
            "up" => up,
            "errors" => errors,
            "duration_ms" => duration.as_millis() as u64
        );

        Scrape {
            samples,
            up,
            errors,
            duration,
        }
    }

    /// Scrape and render the result in the text exposition format.
    pub fn render(&self) -> Result<String, Error> {
        exposition::encode(&self.scrape().samples)
    }
}
