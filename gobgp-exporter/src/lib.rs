// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod collector;
pub mod config;
pub mod error;
pub mod exposition;
pub mod log;
pub mod metrics;
pub mod node;
pub mod peer;
pub mod rib;


pub use collector::Collection;
pub use config::RibSelection;
pub use error::Error;
pub use metrics::{Metric, MetricKind, MetricSample};
pub use node::{RouterNode, Scrape};
pub use peer::PeerCollector;
pub use rib::RibCollector;

pub const COMPONENT_EXPORTER: &str = "exporter";
pub const MOD_COLLECTOR: &str = "collector";
pub const MOD_NODE: &str = "node";
