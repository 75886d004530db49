// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::collector::{drain, note_disconnect, Collection};
use crate::log::collector_log;
use crate::metrics::{self, MetricSample};
use gobgp_api::types::{ListPeerRequest, Peer};
use gobgp_api::RouterApi;
use slog::Logger;
use std::sync::atomic::AtomicBool;

const UNIT: &str = "peer";

/// Route counters of a peer summed over all of its address families.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteCounters {
    pub received: u64,
    pub accepted: u64,
    pub advertised: u64,
}

impl From<&Peer> for RouteCounters {
    fn from(peer: &Peer) -> Self {
        peer.afi_safis.iter().fold(Self::default(), |acc, afi_safi| {
            let s = &afi_safi.state;
            Self {
                received: acc.received.saturating_add(s.received),
                accepted: acc.accepted.saturating_add(s.accepted),
                advertised: acc.advertised.saturating_add(s.advertised),
            }
        })
    }
}

/// Publishes the daemon's peer table.
pub struct PeerCollector<'a> {
    client: &'a dyn RouterApi,
    connected: &'a AtomicBool,
    log: &'a Logger,
}

impl<'a> PeerCollector<'a> {
    pub fn new(
        client: &'a dyn RouterApi,
        connected: &'a AtomicBool,
        log: &'a Logger,
    ) -> Self {
        Self {
            client,
            connected,
            log,
        }
    }

    pub fn collect(&self) -> Collection {
        let request = ListPeerRequest {
            address: String::new(),
            enable_advertised: false,
        };

        let stream = match self.client.list_peers(&request) {
            Ok(stream) => stream,
            Err(e) => {
                collector_log!(self.log, error,
                    "query for peers failed: {}", e;
                    "error" => format!("{e}")
                );
                note_disconnect(self.connected, &e);
                return Collection::failed();
            }
        };

        let mut peers = Vec::new();
        let drained = drain(stream, self.log, "peer", |p| peers.push(p));

        if let Some(e) = &drained.error {
            collector_log!(self.log, error,
                "peer stream broke after {} records: {}", drained.records, e;
                "error" => format!("{e}")
            );
            note_disconnect(self.connected, e);
            return Collection {
                samples: Vec::new(),
                errors: drained.errors(),
            };
        }

        collector_log!(self.log, debug, "collected {} peers", peers.len());

        let mut samples = Vec::with_capacity(1 + peers.len() * PER_PEER);
        samples.push(MetricSample::new(
            &metrics::ROUTER_PEER_COUNT,
            peers.len() as f64,
            &[],
        ));
        for peer in &peers {
            samples.extend(peer_samples(peer));
        }

        Collection {
            samples,
            errors: drained.errors(),
        }
    }
}

/// Number of samples published for each peer.
pub const PER_PEER: usize = 14;

/// Every per-peer sample, labeled by the neighbor address.
pub fn peer_samples(peer: &Peer) -> Vec<MetricSample> {
    let state = &peer.state;
    let labels = [state.neighbor_address.as_str()];
    let counters = RouteCounters::from(peer);

    vec![
        MetricSample::flag(&metrics::PEER_UP, state.is_established(), &labels),
        MetricSample::new(&metrics::PEER_ASN, state.peer_as.into(), &labels),
        MetricSample::new(
            &metrics::PEER_ADMIN_STATE,
            state.admin_state.code().into(),
            &labels,
        ),
        MetricSample::new(
            &metrics::PEER_SESSION_STATE,
            state.session_state.code().into(),
            &labels,
        ),
        MetricSample::new(
            &metrics::PEER_LOCAL_ASN,
            state.local_as.into(),
            &labels,
        ),
        MetricSample::new(
            &metrics::PEER_RECEIVED_ROUTES,
            counters.received as f64,
            &labels,
        ),
        MetricSample::new(
            &metrics::PEER_ACCEPTED_ROUTES,
            counters.accepted as f64,
            &labels,
        ),
        MetricSample::new(
            &metrics::PEER_ADVERTISED_ROUTES,
            counters.advertised as f64,
            &labels,
        ),
        MetricSample::new(
            &metrics::PEER_OUT_QUEUE,
            state.out_q.into(),
            &labels,
        ),
        MetricSample::new(&metrics::PEER_FLOPS, state.flops.into(), &labels),
        MetricSample::new(
            &metrics::PEER_SEND_COMMUNITY,
            state.send_community.into(),
            &labels,
        ),
        MetricSample::new(
            &metrics::PEER_REMOVE_PRIVATE_AS,
            state.remove_private_as.code().into(),
            &labels,
        ),
        MetricSample::flag(
            &metrics::PEER_PASSWORD_SET,
            state.password_set(),
            &labels,
        ),
        MetricSample::new(&metrics::PEER_TYPE, state.peer_type.into(), &labels),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::*;
    use crate::test::{
        count, logger, peer, value, Item, MockRouter, Reply,
    };
    use gobgp_api::types::{AdminState, SessionState};
    use gobgp_api::Code;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;

    fn collect(router: &MockRouter) -> (Collection, bool) {
        let connected = AtomicBool::new(true);
        let log = logger();
        let c = PeerCollector::new(router, &connected, &log).collect();
        (c, connected.load(Ordering::Relaxed))
    }

    #[test]
    fn two_peers() {
        let router = MockRouter {
            peers: Reply::Stream(vec![
                Item::Record(peer(
                    "10.0.0.1",
                    65001,
                    SessionState::Established,
                    &[(10, 8, 5)],
                )),
                Item::Record(peer(
                    "10.0.0.2",
                    65002,
                    SessionState::Active,
                    &[],
                )),
            ]),
            ..Default::default()
        };
        let (c, connected) = collect(&router);
        assert!(connected);
        assert_eq!(c.errors, 0);
        assert_eq!(c.samples.len(), 1 + 2 * PER_PEER);
        assert_eq!(count(&c.samples, &ROUTER_PEER_COUNT), 1);
        assert_eq!(value(&c.samples, &ROUTER_PEER_COUNT, &[]), Some(2.0));

        let p1 = &["10.0.0.1"];
        assert_eq!(value(&c.samples, &PEER_UP, p1), Some(1.0));
        assert_eq!(value(&c.samples, &PEER_ASN, p1), Some(65001.0));
        assert_eq!(value(&c.samples, &PEER_RECEIVED_ROUTES, p1), Some(10.0));
        assert_eq!(value(&c.samples, &PEER_ACCEPTED_ROUTES, p1), Some(8.0));
        assert_eq!(value(&c.samples, &PEER_ADVERTISED_ROUTES, p1), Some(5.0));
        assert_eq!(value(&c.samples, &PEER_SESSION_STATE, p1), Some(5.0));

        let p2 = &["10.0.0.2"];
        assert_eq!(value(&c.samples, &PEER_UP, p2), Some(0.0));
        assert_eq!(value(&c.samples, &PEER_ASN, p2), Some(65002.0));
        assert_eq!(value(&c.samples, &PEER_RECEIVED_ROUTES, p2), Some(0.0));
        assert_eq!(value(&c.samples, &PEER_ACCEPTED_ROUTES, p2), Some(0.0));
        assert_eq!(value(&c.samples, &PEER_ADVERTISED_ROUTES, p2), Some(0.0));
        assert_eq!(value(&c.samples, &PEER_SESSION_STATE, p2), Some(2.0));
    }

    #[test]
    fn empty_peer_table() {
        let router = MockRouter::default();
        let (c, _) = collect(&router);
        assert_eq!(c.errors, 0);
        assert_eq!(c.samples.len(), 1);
        assert_eq!(value(&c.samples, &ROUTER_PEER_COUNT, &[]), Some(0.0));
    }

    #[test]
    fn counters_sum_over_address_families() {
        let p = peer(
            "10.0.0.1",
            65001,
            SessionState::Established,
            &[(10, 8, 5), (1, 2, 3), (0, 0, 0)],
        );
        assert_eq!(
            RouteCounters::from(&p),
            RouteCounters {
                received: 11,
                accepted: 10,
                advertised: 8,
            }
        );
        let lonely = peer("10.0.0.2", 65002, SessionState::Idle, &[]);
        assert_eq!(RouteCounters::from(&lonely), RouteCounters::default());
    }

    #[test]
    fn up_only_when_established() {
        for state in SessionState::ALL {
            let p = peer("10.0.0.1", 65001, *state, &[]);
            let samples = peer_samples(&p);
            let expected = if *state == SessionState::Established {
                1.0
            } else {
                0.0
            };
            assert_eq!(
                value(&samples, &PEER_UP, &["10.0.0.1"]),
                Some(expected),
                "{state}"
            );
        }
    }

    #[test]
    fn password_flag() {
        for (password, expected) in [("", 0.0), ("x", 1.0), ("s3cr3t!", 1.0)] {
            let mut p = peer("10.0.0.1", 65001, SessionState::Idle, &[]);
            p.state.auth_password = password.into();
            let samples = peer_samples(&p);
            assert_eq!(
                value(&samples, &PEER_PASSWORD_SET, &["10.0.0.1"]),
                Some(expected)
            );
        }
    }

    #[test]
    fn raw_codes_pass_through() {
        let mut p = peer("10.0.0.1", 65001, SessionState::OpenConfirm, &[]);
        p.state.admin_state = AdminState::PfxCt;
        p.state.local_as = 64512;
        p.state.out_q = 4;
        p.state.flops = 9;
        p.state.send_community = 3;
        p.state.peer_type = 1;
        let samples = peer_samples(&p);
        assert_eq!(samples.len(), PER_PEER);
        let l = &["10.0.0.1"];
        assert_eq!(value(&samples, &PEER_ADMIN_STATE, l), Some(2.0));
        assert_eq!(value(&samples, &PEER_SESSION_STATE, l), Some(4.0));
        assert_eq!(value(&samples, &PEER_LOCAL_ASN, l), Some(64512.0));
        assert_eq!(value(&samples, &PEER_OUT_QUEUE, l), Some(4.0));
        assert_eq!(value(&samples, &PEER_FLOPS, l), Some(9.0));
        assert_eq!(value(&samples, &PEER_SEND_COMMUNITY, l), Some(3.0));
        assert_eq!(value(&samples, &PEER_REMOVE_PRIVATE_AS, l), Some(0.0));
        assert_eq!(value(&samples, &PEER_TYPE, l), Some(1.0));
    }

    #[test]
    fn failed_query_counts_one_error() {
        let router = MockRouter {
            peers: Reply::Refused,
            ..Default::default()
        };
        let (c, connected) = collect(&router);
        assert_eq!(c.errors, 1);
        assert!(c.samples.is_empty());
        assert!(!connected);
    }

    #[test]
    fn status_error_keeps_session() {
        let router = MockRouter {
            peers: Reply::Status(Code::Internal),
            ..Default::default()
        };
        let (c, connected) = collect(&router);
        assert_eq!(c.errors, 1);
        assert!(c.samples.is_empty());
        assert!(connected);
    }

    #[test]
    fn malformed_peer_is_skipped() {
        let router = MockRouter {
            peers: Reply::Stream(vec![
                Item::Record(peer("10.0.0.1", 65001, SessionState::Idle, &[])),
                Item::Malformed,
                Item::Record(peer("10.0.0.2", 65002, SessionState::Idle, &[])),
            ]),
            ..Default::default()
        };
        let (c, _) = collect(&router);
        assert_eq!(c.errors, 1);
        assert_eq!(value(&c.samples, &ROUTER_PEER_COUNT, &[]), Some(2.0));
        assert_eq!(c.samples.len(), 1 + 2 * PER_PEER);
    }

    #[test]
    fn broken_stream_discards_partial_table() {
        let router = MockRouter {
            peers: Reply::Stream(vec![
                Item::Record(peer("10.0.0.1", 65001, SessionState::Idle, &[])),
                Item::Broken,
            ]),
            ..Default::default()
        };
        let (c, connected) = collect(&router);
        assert_eq!(c.errors, 1);
        assert!(c.samples.is_empty());
        assert!(!connected);
    }
}
