// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Metric definitions published by the exporter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Name, help text and label schema of one published time series family.
#[derive(Debug, PartialEq, Eq)]
pub struct Metric {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: &'static [&'static str],
}

macro_rules! gauge {
    ($ident:ident, $name:literal, $help:expr, [$($label:literal),*]) => {
        pub static $ident: Metric = Metric {
            name: $name,
            help: $help,
            kind: MetricKind::Gauge,
            labels: &[$($label),*],
        };
    };
}

macro_rules! counter {
    ($ident:ident, $name:literal, $help:expr) => {
        pub static $ident: Metric = Metric {
            name: $name,
            help: $help,
            kind: MetricKind::Counter,
            labels: &[],
        };
    };
}

//
// router
//

gauge!(
    ROUTER_UP,
    "gobgp_router_up",
    "Whether the BGP daemon answered the last query (1) or not (0).",
    []
);
counter!(
    ROUTER_ERRORS,
    "gobgp_router_errors_total",
    "Number of failed queries and malformed records since start."
);
counter!(
    ROUTER_SCRAPES,
    "gobgp_router_scrapes_total",
    "Number of scrapes since start."
);
gauge!(
    ROUTER_SCRAPE_DURATION,
    "gobgp_router_scrape_duration_seconds",
    "Time spent querying the BGP daemon during the last scrape.",
    []
);
gauge!(
    ROUTER_ASN,
    "gobgp_router_asn",
    "Autonomous system number of the BGP daemon.",
    ["router_id"]
);
gauge!(
    ROUTER_PEER_COUNT,
    "gobgp_router_peer_count",
    "Number of BGP peers known to the daemon.",
    []
);
gauge!(
    ROUTER_RIB_DESTINATIONS,
    "gobgp_router_rib_destinations",
    "Number of destinations in a routing table.",
    ["route_table", "address_family"]
);

//
// peer
//

gauge!(
    PEER_UP,
    "gobgp_peer_up",
    "Whether the BGP session with the peer is established (1) or not (0).",
    ["peer"]
);
gauge!(
    PEER_ASN,
    "gobgp_peer_asn",
    "Autonomous system number of the peer.",
    ["peer"]
);
gauge!(
    PEER_ADMIN_STATE,
    "gobgp_peer_admin_state",
    concat!(
        "Administrative state of the peer: up (0), down (1), prefix limit ",
        "down (2).",
    ),
    ["peer"]
);
gauge!(
    PEER_SESSION_STATE,
    "gobgp_peer_session_state",
    concat!(
        "Session state of the peer: idle (0), connect (1), active (2), ",
        "opensent (3), openconfirm (4), established (5).",
    ),
    ["peer"]
);
gauge!(
    PEER_LOCAL_ASN,
    "gobgp_peer_local_asn",
    "Local autonomous system number advertised to the peer.",
    ["peer"]
);
gauge!(
    PEER_RECEIVED_ROUTES,
    "gobgp_peer_received_routes",
    "Number of routes received from the peer.",
    ["peer"]
);
gauge!(
    PEER_ACCEPTED_ROUTES,
    "gobgp_peer_accepted_routes",
    "Number of routes accepted from the peer.",
    ["peer"]
);
gauge!(
    PEER_ADVERTISED_ROUTES,
    "gobgp_peer_advertised_routes",
    "Number of routes advertised to the peer.",
    ["peer"]
);
gauge!(
    PEER_OUT_QUEUE,
    "gobgp_peer_out_queue",
    "Number of messages queued for the peer.",
    ["peer"]
);
gauge!(
    PEER_FLOPS,
    "gobgp_peer_flop_count",
    "Number of times the session with the peer went down.",
    ["peer"]
);
gauge!(
    PEER_SEND_COMMUNITY,
    "gobgp_peer_send_community",
    "Community attributes sent to the peer.",
    ["peer"]
);
gauge!(
    PEER_REMOVE_PRIVATE_AS,
    "gobgp_peer_remove_private_as",
    "Private AS removal towards the peer: none (0), all (1), replace (2).",
    ["peer"]
);
gauge!(
    PEER_PASSWORD_SET,
    "gobgp_peer_password_set",
    "Whether an authentication password is configured for the peer.",
    ["peer"]
);
gauge!(
    PEER_TYPE,
    "gobgp_peer_type",
    "Peer type: internal (0), external (1).",
    ["peer"]
);

/// Every definition the exporter can publish.
pub static ALL: &[&Metric] = &[
    &ROUTER_UP,
    &ROUTER_ERRORS,
    &ROUTER_SCRAPES,
    &ROUTER_SCRAPE_DURATION,
    &ROUTER_ASN,
    &ROUTER_PEER_COUNT,
    &ROUTER_RIB_DESTINATIONS,
    &PEER_UP,
    &PEER_ASN,
    &PEER_ADMIN_STATE,
    &PEER_SESSION_STATE,
    &PEER_LOCAL_ASN,
    &PEER_RECEIVED_ROUTES,
    &PEER_ACCEPTED_ROUTES,
    &PEER_ADVERTISED_ROUTES,
    &PEER_OUT_QUEUE,
    &PEER_FLOPS,
    &PEER_SEND_COMMUNITY,
    &PEER_REMOVE_PRIVATE_AS,
    &PEER_PASSWORD_SET,
    &PEER_TYPE,
];

/// One point of a metric, taken during a single scrape.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    metric: &'static Metric,
    value: f64,
    labels: Vec<String>,
}

impl MetricSample {
    /// Label values are given in the order of the definition's label names.
    pub fn new(metric: &'static Metric, value: f64, labels: &[&str]) -> Self {
        debug_assert_eq!(
            labels.len(),
            metric.labels.len(),
            "label values for {}",
            metric.name
        );
        Self {
            metric,
            value,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn flag(metric: &'static Metric, set: bool, labels: &[&str]) -> Self {
        Self::new(metric, if set { 1.0 } else { 0.0 }, labels)
    }

    pub fn metric(&self) -> &'static Metric {
        self.metric
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.metric
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn names_are_unique() {
        let names: BTreeSet<&str> = ALL.iter().map(|m| m.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn counters_carry_total_suffix() {
        for m in ALL {
            assert_eq!(
                m.kind == MetricKind::Counter,
                m.name.ends_with("_total"),
                "{}",
                m.name
            );
        }
    }

    #[test]
    fn label_lookup() {
        let s = MetricSample::new(
            &ROUTER_RIB_DESTINATIONS,
            3.0,
            &["global", "ipv4-unicast"],
        );
        assert_eq!(s.label("route_table"), Some("global"));
        assert_eq!(s.label("address_family"), Some("ipv4-unicast"));
        assert_eq!(s.label("peer"), None);
    }
}
