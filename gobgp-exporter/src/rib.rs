// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::collector::{drain, note_disconnect, Collection};
use crate::config::RibSelection;
use crate::log::collector_log;
use crate::metrics::{self, MetricSample};
use gobgp_api::types::{Afi, Family, ListPathRequest, Safi, TableType};
use gobgp_api::RouterApi;
use itertools::iproduct;
use slog::Logger;
use std::sync::atomic::{AtomicBool, Ordering};

const UNIT: &str = "rib";

/// Table scopes that can be sized. Adj-RIB and VRF views need a neighbor or
/// VRF name and are not collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibScope {
    Global,
    Local,
}

impl RibScope {
    pub fn from_table_type(table: TableType) -> Option<RibScope> {
        match table {
            TableType::Global => Some(RibScope::Global),
            TableType::Local => Some(RibScope::Local),
            TableType::AdjIn | TableType::AdjOut | TableType::Vrf => None,
        }
    }

    pub fn table_type(self) -> TableType {
        match self {
            RibScope::Global => TableType::Global,
            RibScope::Local => TableType::Local,
        }
    }
}

/// Publishes the number of destinations of every selected routing table.
pub struct RibCollector<'a> {
    client: &'a dyn RouterApi,
    selection: &'a RibSelection,
    connected: &'a AtomicBool,
    log: &'a Logger,
}

impl<'a> RibCollector<'a> {
    pub fn new(
        client: &'a dyn RouterApi,
        selection: &'a RibSelection,
        connected: &'a AtomicBool,
        log: &'a Logger,
    ) -> Self {
        Self {
            client,
            selection,
            connected,
            log,
        }
    }

    pub fn collect(&self) -> Collection {
        let mut collection = Collection::default();

        for (table, safi, afi) in
            iproduct!(TableType::ALL, Safi::ALL, Afi::ALL)
        {
            if !self.connected.load(Ordering::Relaxed) {
                collector_log!(self.log, debug,
                    "not connected, skipping remaining tables"
                );
                break;
            }

            let family = Family::new(*afi, *safi);
            if !self.selection.enabled(*table, family) {
                continue;
            }

            let Some(scope) = RibScope::from_table_type(*table) else {
                collector_log!(self.log, debug,
                    "skipping unsupported table type {}", table;
                    "family" => family.to_string()
                );
                continue;
            };

            let sample = self.destinations(scope, family, &mut collection);
            if let Some(sample) = sample {
                collection.samples.push(sample);
            }
        }

        collection
    }

    fn destinations(
        &self,
        scope: RibScope,
        family: Family,
        collection: &mut Collection,
    ) -> Option<MetricSample> {
        let table = scope.table_type();
        let request = ListPathRequest {
            table_type: table,
            family,
        };

        let stream = match self.client.list_paths(&request) {
            Ok(stream) => stream,
            Err(e) => {
                collector_log!(self.log, error,
                    "query failed for resource type {} for {} address \
                    family: {}",
                    table, family, e;
                    "error" => format!("{e}")
                );
                note_disconnect(self.connected, &e);
                collection.errors += 1;
                return None;
            }
        };

        let drained = drain(stream, self.log, "destination", |_| {});
        collection.errors += drained.errors();

        if let Some(e) = &drained.error {
            collector_log!(self.log, error,
                "path stream for {}/{} broke after {} records: {}",
                table, family, drained.records, e;
                "error" => format!("{e}")
            );
            note_disconnect(self.connected, e);
            return None;
        }

        collector_log!(self.log, debug,
            "rib size for {}/{}: {}", table, family, drained.records
        );

        let family = family.to_string();
        Some(MetricSample::new(
            &metrics::ROUTER_RIB_DESTINATIONS,
            drained.records as f64,
            &[table.label(), family.as_str()],
        ))
    }
}
