// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client side of the BGP daemon's management API.
//!
//! The daemon serves its management API over gRPC. Everything the exporter
//! consumes goes through the [`RouterApi`] trait so collectors can run
//! against a live daemon or a canned implementation in tests.

pub mod client;
pub mod error;
pub mod stream;
pub mod types;

mod proto;

pub use client::Client;
pub use error::Error;
pub use stream::Stream;
pub use tonic::Code;

use types::{
    Destination, ListPathRequest, ListPeerRequest, Peer, RouterInfo,
};

pub type Result<T> = std::result::Result<T, Error>;

/// Operations the exporter needs from a BGP daemon.
///
/// All calls block the calling thread. Streaming calls hand back a
/// [`Stream`] that is drained by the caller until it yields `None`.
pub trait RouterApi: Send + Sync {
    /// Global daemon information. Cheap, used as a liveness check.
    fn get_bgp(&self) -> Result<RouterInfo>;

    fn list_peers(
        &self,
        request: &ListPeerRequest,
    ) -> Result<Stream<'_, Peer>>;

    fn list_paths(
        &self,
        request: &ListPathRequest,
    ) -> Result<Stream<'_, Destination>>;
}
