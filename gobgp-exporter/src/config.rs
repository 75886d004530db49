// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use gobgp_api::types::{Afi, Family, Safi, TableType};
use std::collections::BTreeSet;

/// Which routing tables are sized on every scrape.
///
/// Resource types are table names (`global`, `local`). Address families are
/// either a full family (`ipv4-unicast`) or a bare SAFI (`unicast`), which
/// selects that SAFI under every AFI the daemon carries it for. Matching is
/// case-insensitive. Families the daemon keeps no RIB for are never enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RibSelection {
    resource_types: BTreeSet<String>,
    address_families: BTreeSet<String>,
}

impl RibSelection {
    pub fn new<R, F>(resource_types: R, address_families: F) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            resource_types: normalize(resource_types),
            address_families: normalize(address_families),
        }
    }

    pub fn table_enabled(&self, table: TableType) -> bool {
        self.resource_types.contains(table.label())
    }

    pub fn family_enabled(&self, family: Family) -> bool {
        if !family.is_supported() {
            return false;
        }
        self.address_families.contains(&family.to_string())
            || self.address_families.contains(family.safi.label())
    }

    pub fn enabled(&self, table: TableType, family: Family) -> bool {
        self.table_enabled(table) && self.family_enabled(family)
    }

    /// Configured names that select nothing the daemon knows about.
    pub fn unknown_names(&self) -> Vec<&str> {
        let tables: BTreeSet<&str> =
            TableType::ALL.iter().map(|t| t.label()).collect();
        let mut families: BTreeSet<String> =
            Safi::ALL.iter().map(|s| s.label().to_string()).collect();
        for afi in Afi::ALL {
            for safi in Safi::ALL {
                let family = Family::new(*afi, *safi);
                if family.is_supported() {
                    families.insert(family.to_string());
                }
            }
        }

        let unknown_tables = self
            .resource_types
            .iter()
            .filter(|name| !tables.contains(name.as_str()));
        let unknown_families = self
            .address_families
            .iter()
            .filter(|name| !families.contains(*name));

        unknown_tables
            .chain(unknown_families)
            .map(String::as_str)
            .collect()
    }
}

fn normalize<I>(names: I) -> BTreeSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect()
}
