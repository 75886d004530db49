// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use crate::metrics::{MetricKind, MetricSample};
use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

pub use prometheus::TEXT_FORMAT;

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// Render samples in the Prometheus text exposition format.
///
/// A fresh registry is built for every call so nothing leaks from one scrape
/// into the next. When two samples share a metric and label set the last
/// one wins.
pub fn encode(samples: &[MetricSample]) -> Result<String, Error> {
    let registry = Registry::new();
    let mut families: BTreeMap<&'static str, Family> = BTreeMap::new();

    for sample in samples {
        let metric = sample.metric();
        let family = match families.entry(metric.name) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let opts = Opts::new(metric.name, metric.help);
                let family = match metric.kind {
                    MetricKind::Gauge => {
                        let v = GaugeVec::new(opts, metric.labels)?;
                        registry.register(Box::new(v.clone()))?;
                        Family::Gauge(v)
                    }
                    MetricKind::Counter => {
                        let v = CounterVec::new(opts, metric.labels)?;
                        registry.register(Box::new(v.clone()))?;
                        Family::Counter(v)
                    }
                };
                e.insert(family)
            }
        };

        let labels: Vec<&str> =
            sample.labels().iter().map(String::as_str).collect();
        match family {
            Family::Gauge(v) => {
                v.get_metric_with_label_values(&labels)?.set(sample.value())
            }
            Family::Counter(v) => {
                let c = v.get_metric_with_label_values(&labels)?;
                c.reset();
                c.inc_by(sample.value());
            }
        }
    }

    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::*;

    #[test]
    fn gauges_and_counters() {
        let samples = vec![
            MetricSample::new(&ROUTER_PEER_COUNT, 2.0, &[]),
            MetricSample::new(&PEER_UP, 1.0, &["10.0.0.1"]),
            MetricSample::new(&PEER_UP, 0.0, &["10.0.0.2"]),
            MetricSample::new(&ROUTER_ERRORS, 7.0, &[]),
            MetricSample::new(
                &ROUTER_RIB_DESTINATIONS,
                3.0,
                &["global", "ipv4-unicast"],
            ),
        ];
        let text = encode(&samples).expect("encode");

        assert!(text.contains("# TYPE gobgp_router_peer_count gauge"));
        assert!(text.contains("gobgp_router_peer_count 2\n"));
        assert!(text.contains("gobgp_peer_up{peer=\"10.0.0.1\"} 1\n"));
        assert!(text.contains("gobgp_peer_up{peer=\"10.0.0.2\"} 0\n"));
        assert!(text.contains("# TYPE gobgp_router_errors_total counter"));
        assert!(text.contains("gobgp_router_errors_total 7\n"));
        let rib = text
            .lines()
            .find(|l| l.starts_with("gobgp_router_rib_destinations{"))
            .expect("rib line");
        assert!(rib.contains("route_table=\"global\""), "{rib}");
        assert!(rib.contains("address_family=\"ipv4-unicast\""), "{rib}");
        assert!(rib.ends_with("} 3"), "{rib}");
    }

    #[test]
    fn duplicate_label_sets_overwrite() {
        let samples = vec![
            MetricSample::new(&PEER_ASN, 65001.0, &["10.0.0.1"]),
            MetricSample::new(&PEER_ASN, 65002.0, &["10.0.0.1"]),
        ];
        let text = encode(&samples).expect("encode");
        assert!(text.contains("gobgp_peer_asn{peer=\"10.0.0.1\"} 65002\n"));
        assert!(!text.contains("65001"));
    }

    #[test]
    fn nothing_to_say() {
        assert_eq!(encode(&[]).expect("encode"), "");
    }
}
