// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire messages of the daemon's gRPC service, `apipb.GobgpApi`.
//!
//! Only the fields the exporter reads are declared; protobuf decoding skips
//! everything else. Tags follow `api/gobgp.proto` in the GoBGP tree. Enum
//! fields are carried as their raw `int32` and checked on conversion.

use crate::types;
use crate::{Error, Result};

pub(crate) const GET_BGP: &str = "/apipb.GobgpApi/GetBgp";
pub(crate) const LIST_PEER: &str = "/apipb.GobgpApi/ListPeer";
pub(crate) const LIST_PATH: &str = "/apipb.GobgpApi/ListPath";

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct GetBgpRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct GetBgpResponse {
    #[prost(message, optional, tag = "1")]
    pub global: Option<Global>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct Global {
    #[prost(uint32, tag = "1")]
    pub asn: u32,
    #[prost(string, tag = "2")]
    pub router_id: String,
    #[prost(int32, tag = "3")]
    pub listen_port: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ListPeerRequest {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(bool, tag = "2")]
    pub enable_advertised: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ListPeerResponse {
    #[prost(message, optional, tag = "1")]
    pub peer: Option<Peer>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct Peer {
    #[prost(message, optional, tag = "5")]
    pub state: Option<PeerState>,
    #[prost(message, repeated, tag = "10")]
    pub afi_safis: Vec<AfiSafi>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct PeerState {
    #[prost(string, tag = "1")]
    pub auth_password: String,
    #[prost(uint32, tag = "3")]
    pub local_asn: u32,
    #[prost(string, tag = "5")]
    pub neighbor_address: String,
    #[prost(uint32, tag = "6")]
    pub peer_asn: u32,
    #[prost(int32, tag = "8")]
    pub peer_type: i32,
    #[prost(int32, tag = "10")]
    pub remove_private: i32,
    #[prost(uint32, tag = "12")]
    pub send_community: u32,
    #[prost(int32, tag = "13")]
    pub session_state: i32,
    #[prost(int32, tag = "15")]
    pub admin_state: i32,
    #[prost(uint32, tag = "16")]
    pub out_q: u32,
    #[prost(uint32, tag = "17")]
    pub flops: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct AfiSafi {
    #[prost(message, optional, tag = "3")]
    pub state: Option<AfiSafiState>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct AfiSafiState {
    #[prost(message, optional, tag = "1")]
    pub family: Option<Family>,
    #[prost(bool, tag = "2")]
    pub enabled: bool,
    #[prost(uint64, tag = "3")]
    pub received: u64,
    #[prost(uint64, tag = "4")]
    pub accepted: u64,
    #[prost(uint64, tag = "5")]
    pub advertised: u64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct Family {
    #[prost(int32, tag = "1")]
    pub afi: i32,
    #[prost(int32, tag = "2")]
    pub safi: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ListPathRequest {
    #[prost(int32, tag = "1")]
    pub table_type: i32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(message, optional, tag = "3")]
    pub family: Option<Family>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ListPathResponse {
    #[prost(message, optional, tag = "1")]
    pub destination: Option<Destination>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct Destination {
    #[prost(string, tag = "1")]
    pub prefix: String,
}

fn enumeration<T: TryFrom<i32>>(kind: &str, code: i32) -> Result<T> {
    T::try_from(code)
        .map_err(|_| Error::Decode(format!("unknown {kind} {code}")))
}

impl From<&types::ListPeerRequest> for ListPeerRequest {
    fn from(r: &types::ListPeerRequest) -> Self {
        Self {
            address: r.address.clone(),
            enable_advertised: r.enable_advertised,
        }
    }
}

impl From<&types::ListPathRequest> for ListPathRequest {
    fn from(r: &types::ListPathRequest) -> Self {
        Self {
            table_type: r.table_type.code(),
            name: String::new(),
            family: Some(Family {
                afi: r.family.afi.code(),
                safi: r.family.safi.code(),
            }),
        }
    }
}

impl TryFrom<Family> for types::Family {
    type Error = Error;

    fn try_from(f: Family) -> Result<Self> {
        Ok(types::Family::new(
            enumeration(types::Afi::KIND, f.afi)?,
            enumeration(types::Safi::KIND, f.safi)?,
        ))
    }
}

impl TryFrom<PeerState> for types::PeerState {
    type Error = Error;

    fn try_from(s: PeerState) -> Result<Self> {
        let session_state = types::SessionState::from_wire(s.session_state)
            .ok_or_else(|| {
                Error::Decode(format!(
                    "unknown {} {}",
                    types::SessionState::KIND,
                    s.session_state
                ))
            })?;
        let peer_type = u32::try_from(s.peer_type).map_err(|_| {
            Error::Decode(format!("unknown peer type {}", s.peer_type))
        })?;

        Ok(types::PeerState {
            neighbor_address: s.neighbor_address,
            peer_as: s.peer_asn,
            local_as: s.local_asn,
            session_state,
            admin_state: enumeration(types::AdminState::KIND, s.admin_state)?,
            out_q: s.out_q,
            flops: s.flops,
            send_community: s.send_community,
            remove_private_as: enumeration(
                types::RemovePrivateAs::KIND,
                s.remove_private,
            )?,
            auth_password: s.auth_password,
            peer_type,
        })
    }
}

impl TryFrom<AfiSafi> for types::AfiSafi {
    type Error = Error;

    fn try_from(a: AfiSafi) -> Result<Self> {
        let s = a.state.unwrap_or_default();
        Ok(types::AfiSafi {
            state: types::AfiSafiState {
                family: s
                    .family
                    .map(types::Family::try_from)
                    .transpose()?
                    .unwrap_or_default(),
                enabled: s.enabled,
                received: s.received,
                accepted: s.accepted,
                advertised: s.advertised,
            },
        })
    }
}

impl TryFrom<Peer> for types::Peer {
    type Error = Error;

    fn try_from(p: Peer) -> Result<Self> {
        Ok(types::Peer {
            state: p.state.unwrap_or_default().try_into()?,
            afi_safis: p
                .afi_safis
                .into_iter()
                .map(types::AfiSafi::try_from)
                .collect::<Result<_>>()?,
        })
    }
}

pub(crate) fn router_info(r: GetBgpResponse) -> Result<types::RouterInfo> {
    let global = r
        .global
        .ok_or_else(|| Error::Decode("bgp response without global".into()))?;
    Ok(types::RouterInfo {
        asn: global.asn,
        router_id: global.router_id,
        listen_port: global.listen_port,
    })
}

pub(crate) fn peer(r: ListPeerResponse) -> Result<types::Peer> {
    r.peer
        .ok_or_else(|| Error::Decode("peer response without a peer".into()))?
        .try_into()
}

pub(crate) fn destination(r: ListPathResponse) -> Result<types::Destination> {
    let d = r.destination.ok_or_else(|| {
        Error::Decode("path response without a destination".into())
    })?;
    Ok(types::Destination { prefix: d.prefix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prost::Message;

    fn varint(out: &mut Vec<u8>, mut value: u64) {
        while value >= 0x80 {
            out.push((value as u8) | 0x80);
            value >>= 7;
        }
        out.push(value as u8);
    }

    fn key(out: &mut Vec<u8>, tag: u32, wire_type: u8) {
        varint(out, u64::from(tag << 3 | u32::from(wire_type)));
    }

    fn bytes_field(out: &mut Vec<u8>, tag: u32, value: &[u8]) {
        key(out, tag, 2);
        varint(out, value.len() as u64);
        out.extend_from_slice(value);
    }

    fn varint_field(out: &mut Vec<u8>, tag: u32, value: u64) {
        key(out, tag, 0);
        varint(out, value);
    }

    /// A `ListPeerResponse` encoded byte by byte, including fields the
    /// exporter does not declare.
    fn peer_response_bytes() -> Vec<u8> {
        let mut family = Vec::new();
        varint_field(&mut family, 1, 1); // AFI_IP
        varint_field(&mut family, 2, 1); // SAFI_UNICAST

        let mut afi_safi_state = Vec::new();
        bytes_field(&mut afi_safi_state, 1, &family);
        varint_field(&mut afi_safi_state, 2, 1);
        varint_field(&mut afi_safi_state, 3, 10);
        varint_field(&mut afi_safi_state, 4, 8);
        varint_field(&mut afi_safi_state, 5, 5);

        let mut afi_safi = Vec::new();
        bytes_field(&mut afi_safi, 3, &afi_safi_state);

        let mut state = Vec::new();
        bytes_field(&mut state, 1, b"hunter2");
        bytes_field(&mut state, 2, b"upstream");
        varint_field(&mut state, 3, 100);
        bytes_field(&mut state, 5, b"10.0.0.1");
        varint_field(&mut state, 6, 4_200_000_000);
        varint_field(&mut state, 8, 1);
        varint_field(&mut state, 10, 2);
        varint_field(&mut state, 12, 1);
        varint_field(&mut state, 13, 6); // ESTABLISHED
        varint_field(&mut state, 15, 2); // PFX_CT
        varint_field(&mut state, 16, 3);
        varint_field(&mut state, 17, 7);

        let mut peer = Vec::new();
        bytes_field(&mut peer, 5, &state);
        bytes_field(&mut peer, 10, &afi_safi);

        let mut response = Vec::new();
        bytes_field(&mut response, 1, &peer);
        response
    }

    #[test]
    fn peer_from_wire() {
        let bytes = peer_response_bytes();
        let response =
            ListPeerResponse::decode(bytes.as_slice()).expect("decode");
        let p = peer(response).expect("convert");

        assert_eq!(p.state.neighbor_address, "10.0.0.1");
        assert_eq!(p.state.peer_as, 4_200_000_000);
        assert_eq!(p.state.local_as, 100);
        assert_eq!(p.state.session_state, types::SessionState::Established);
        assert_eq!(p.state.admin_state, types::AdminState::PfxCt);
        assert_eq!(p.state.out_q, 3);
        assert_eq!(p.state.flops, 7);
        assert_eq!(p.state.send_community, 1);
        assert_eq!(
            p.state.remove_private_as,
            types::RemovePrivateAs::Replace
        );
        assert_eq!(p.state.peer_type, 1);
        assert!(p.state.password_set());
        assert_eq!(p.afi_safis.len(), 1);
        let counters = &p.afi_safis[0].state;
        assert_eq!(counters.family, types::Family::IPV4_UNICAST);
        assert!(counters.enabled);
        assert_eq!(counters.received, 10);
        assert_eq!(counters.accepted, 8);
        assert_eq!(counters.advertised, 5);
    }

    #[test]
    fn missing_fields_are_zero() {
        let p = peer(ListPeerResponse {
            peer: Some(Peer::default()),
        })
        .expect("convert");
        assert_eq!(p, types::Peer::default());
        assert!(!p.state.password_set());
    }

    #[test]
    fn unknown_enum_values_are_decode_errors() {
        let mut state = PeerState {
            session_state: 9,
            ..Default::default()
        };
        let e = types::PeerState::try_from(state.clone()).expect_err("state");
        assert!(e.is_recoverable(), "{e}");

        state.session_state = 6;
        state.admin_state = 7;
        let e = types::PeerState::try_from(state).expect_err("admin");
        assert!(e.is_recoverable(), "{e}");

        let e = types::Family::try_from(Family { afi: 3, safi: 1 })
            .expect_err("afi");
        assert_eq!(e.to_string(), "decode: unknown afi 3");
    }

    #[test]
    fn empty_responses_are_decode_errors() {
        assert!(peer(ListPeerResponse::default())
            .is_err_and(|e| e.is_recoverable()));
        assert!(destination(ListPathResponse::default())
            .is_err_and(|e| e.is_recoverable()));
        assert!(router_info(GetBgpResponse::default()).is_err());
    }

    #[test]
    fn path_request_on_the_wire() {
        let request = ListPathRequest::from(&types::ListPathRequest {
            table_type: types::TableType::Local,
            family: types::Family::new(types::Afi::Ip6, types::Safi::Unicast),
        });
        // table_type = 1, then family { afi = 2, safi = 1 }
        assert_eq!(
            request.encode_to_vec(),
            vec![0x08, 0x01, 0x1a, 0x04, 0x08, 0x02, 0x10, 0x01]
        );
    }
}
