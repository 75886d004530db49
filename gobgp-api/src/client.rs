// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::proto;
use crate::types::{
    Destination, ListPathRequest, ListPeerRequest, Peer, RouterInfo,
};
use crate::{Error, Result, RouterApi, Stream};
use slog::{trace, Logger};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Runtime;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Streaming};

/// Blocking gRPC client for the daemon's `GobgpApi` service.
///
/// The client drives its own small runtime, so it must be created and dropped
/// outside of any async context. Calls may be made from blocking threads of
/// another runtime.
pub struct Client {
    endpoint: String,
    channel: Channel,
    runtime: Runtime,
    timeout: Duration,
    log: Logger,
}

impl Client {
    /// Set up a lazily connected channel to `endpoint`. Nothing goes over the
    /// wire until the first call, and a lost connection is re-established on
    /// the next one.
    pub fn new(endpoint: &str, timeout: Duration, log: Logger) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("gobgp-client")
            .enable_all()
            .build()?;

        let channel = {
            let _guard = runtime.enter();
            Endpoint::from_shared(endpoint.to_string())
                .map_err(|e| Error::Endpoint(format!("{endpoint}: {e}")))?
                .connect_timeout(timeout)
                .connect_lazy()
        };

        Ok(Self {
            endpoint: endpoint.to_string(),
            channel,
            runtime,
            timeout,
            log,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run `f` to completion on the client runtime, bounded by the call
    /// timeout.
    fn block_on<F, T>(&self, f: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, tonic::Status>>,
    {
        match self.runtime.block_on(tokio::time::timeout(self.timeout, f)) {
            Ok(result) => result.map_err(Error::from),
            Err(_) => Err(Error::Timeout(self.timeout)),
        }
    }

    async fn ready(&self) -> std::result::Result<Grpc<Channel>, tonic::Status> {
        let mut grpc = Grpc::new(self.channel.clone());
        grpc.ready().await.map_err(|e| {
            tonic::Status::unavailable(format!("channel not ready: {e}"))
        })?;
        Ok(grpc)
    }

    fn unary<Req, Resp>(&self, path: &'static str, request: Req) -> Result<Resp>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        trace!(self.log, "client request"; "method" => path);

        self.block_on(async {
            let mut grpc = self.ready().await?;
            let response = grpc
                .unary(
                    Request::new(request),
                    PathAndQuery::from_static(path),
                    ProstCodec::<Req, Resp>::default(),
                )
                .await?;
            Ok::<_, tonic::Status>(response.into_inner())
        })
    }

    fn server_streaming<Req, Resp, T>(
        &self,
        path: &'static str,
        request: Req,
        convert: fn(Resp) -> Result<T>,
    ) -> Result<Stream<'_, T>>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
        T: 'static,
    {
        trace!(self.log, "client request"; "method" => path);

        let streaming = self.block_on(async {
            let mut grpc = self.ready().await?;
            let response = grpc
                .server_streaming(
                    Request::new(request),
                    PathAndQuery::from_static(path),
                    ProstCodec::<Req, Resp>::default(),
                )
                .await?;
            Ok::<_, tonic::Status>(response.into_inner())
        })?;

        Ok(Stream::new(Messages {
            client: self,
            streaming: Some(streaming),
            convert,
        }))
    }
}

/// Messages of one server stream, each received under the call timeout.
struct Messages<'a, M, T> {
    client: &'a Client,
    streaming: Option<Streaming<M>>,
    convert: fn(M) -> Result<T>,
}

impl<M, T> Iterator for Messages<'_, M, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let streaming = self.streaming.as_mut()?;
        match self.client.block_on(streaming.message()) {
            Ok(Some(message)) => Some((self.convert)(message)),
            Ok(None) => {
                self.streaming = None;
                None
            }
            Err(e) => {
                trace!(self.client.log, "stream ended"; "error" => %e);
                self.streaming = None;
                Some(Err(e))
            }
        }
    }
}

impl RouterApi for Client {
    fn get_bgp(&self) -> Result<RouterInfo> {
        let response: proto::GetBgpResponse =
            self.unary(proto::GET_BGP, proto::GetBgpRequest {})?;
        proto::router_info(response)
    }

    fn list_peers(
        &self,
        request: &ListPeerRequest,
    ) -> Result<Stream<'_, Peer>> {
        self.server_streaming(
            proto::LIST_PEER,
            proto::ListPeerRequest::from(request),
            proto::peer,
        )
    }

    fn list_paths(
        &self,
        request: &ListPathRequest,
    ) -> Result<Stream<'_, Destination>> {
        self.server_streaming(
            proto::LIST_PATH,
            proto::ListPathRequest::from(request),
            proto::destination,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    #[test]
    fn endpoint_must_be_a_uri() {
        let err = Client::new("not a uri", Duration::from_secs(1), logger())
            .err()
            .expect("bad endpoint");
        assert!(matches!(err, Error::Endpoint(_)), "{err}");
    }

    #[test]
    fn endpoint_is_kept() {
        let client = Client::new(
            "http://127.0.0.1:50051",
            Duration::from_secs(1),
            logger(),
        )
        .expect("client");
        assert_eq!(client.endpoint(), "http://127.0.0.1:50051");
    }

    #[test]
    fn unreachable_daemon_is_a_disconnect() {
        // Nothing listens on the discard port of the loopback address.
        let client = Client::new(
            "http://127.0.0.1:9",
            Duration::from_millis(500),
            logger(),
        )
        .expect("client");
        let err = client.get_bgp().expect_err("no daemon");
        assert!(err.is_disconnect(), "{err}");

        let err = client
            .list_peers(&ListPeerRequest::default())
            .err()
            .expect("no daemon");
        assert!(err.is_disconnect(), "{err}");
    }
}
