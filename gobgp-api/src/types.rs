// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt::{self, Display, Formatter};

/// Declares an enum mirrored from the daemon's API. The first variant is the
/// zero value.
macro_rules! proto_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $kind:literal {
            $first:ident = $first_code:literal => $first_proto:literal,
            $($variant:ident = $code:literal => $proto:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            IntoPrimitive,
            TryFromPrimitive,
        )]
        #[repr(i32)]
        pub enum $name {
            $first = $first_code,
            $($variant = $code,)*
        }

        impl $name {
            pub const KIND: &'static str = $kind;

            /// Every value in the daemon's enum table, in table order.
            pub const ALL: &'static [$name] =
                &[$name::$first, $($name::$variant,)*];

            /// Symbolic name used by the daemon.
            pub fn proto_name(self) -> &'static str {
                match self {
                    $name::$first => $first_proto,
                    $($name::$variant => $proto,)*
                }
            }

            pub fn code(self) -> i32 {
                self.into()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }
    };
}

proto_enum! {
    /// BGP finite state machine state of a peer session.
    pub enum SessionState: "session state" {
        Idle = 0 => "IDLE",
        Connect = 1 => "CONNECT",
        Active = 2 => "ACTIVE",
        OpenSent = 3 => "OPENSENT",
        OpenConfirm = 4 => "OPENCONFIRM",
        Established = 5 => "ESTABLISHED",
    }
}

proto_enum! {
    /// Administrative state of a peer. `PfxCt` means the session was shut
    /// down by the prefix count limit.
    pub enum AdminState: "admin state" {
        Up = 0 => "UP",
        Down = 1 => "DOWN",
        PfxCt = 2 => "PFX_CT",
    }
}

proto_enum! {
    pub enum RemovePrivateAs: "remove private as" {
        None = 0 => "NONE",
        All = 1 => "ALL",
        Replace = 2 => "REPLACE",
    }
}

proto_enum! {
    /// Scope of a RIB view.
    pub enum TableType: "table type" {
        Global = 0 => "GLOBAL",
        Local = 1 => "LOCAL",
        AdjIn = 2 => "ADJ_IN",
        AdjOut = 3 => "ADJ_OUT",
        Vrf = 4 => "VRF",
    }
}

proto_enum! {
    pub enum Afi: "afi" {
        Unknown = 0 => "AFI_UNKNOWN",
        Ip = 1 => "AFI_IP",
        Ip6 = 2 => "AFI_IP6",
        L2vpn = 25 => "AFI_L2VPN",
        Ls = 16388 => "AFI_LS",
        Opaque = 16397 => "AFI_OPAQUE",
    }
}

proto_enum! {
    pub enum Safi: "safi" {
        Unknown = 0 => "SAFI_UNKNOWN",
        Unicast = 1 => "SAFI_UNICAST",
        Multicast = 2 => "SAFI_MULTICAST",
        MplsLabel = 4 => "SAFI_MPLS_LABEL",
        Encapsulation = 7 => "SAFI_ENCAPSULATION",
        Vpls = 65 => "SAFI_VPLS",
        Evpn = 70 => "SAFI_EVPN",
        Ls = 71 => "SAFI_LS",
        SrPolicy = 73 => "SAFI_SR_POLICY",
        Mup = 85 => "SAFI_MUP",
        MplsVpn = 128 => "SAFI_MPLS_VPN",
        MplsVpnMulticast = 129 => "SAFI_MPLS_VPN_MULTICAST",
        RouteTargetConstraints = 132 => "SAFI_ROUTE_TARGET_CONSTRAINTS",
        FlowSpecUnicast = 133 => "SAFI_FLOW_SPEC_UNICAST",
        FlowSpecVpn = 134 => "SAFI_FLOW_SPEC_VPN",
        KeyValue = 241 => "SAFI_KEY_VALUE",
    }
}

impl TableType {
    /// Lower-cased table name as used in metric labels.
    pub fn label(self) -> &'static str {
        match self {
            TableType::Global => "global",
            TableType::Local => "local",
            TableType::AdjIn => "adj_in",
            TableType::AdjOut => "adj_out",
            TableType::Vrf => "vrf",
        }
    }
}

impl Afi {
    pub fn label(self) -> &'static str {
        match self {
            Afi::Unknown => "unknown",
            Afi::Ip => "ipv4",
            Afi::Ip6 => "ipv6",
            Afi::L2vpn => "l2vpn",
            Afi::Ls => "ls",
            Afi::Opaque => "opaque",
        }
    }
}

impl Safi {
    pub fn label(self) -> &'static str {
        match self {
            Safi::Unknown => "unknown",
            Safi::Unicast => "unicast",
            Safi::Multicast => "multicast",
            Safi::MplsLabel => "mpls-label",
            Safi::Encapsulation => "encapsulation",
            Safi::Vpls => "vpls",
            Safi::Evpn => "evpn",
            Safi::Ls => "ls",
            Safi::SrPolicy => "sr-policy",
            Safi::Mup => "mup",
            Safi::MplsVpn => "mpls-vpn",
            Safi::MplsVpnMulticast => "mpls-vpn-multicast",
            Safi::RouteTargetConstraints => "route-target-constraints",
            Safi::FlowSpecUnicast => "flowspec-unicast",
            Safi::FlowSpecVpn => "flowspec-vpn",
            Safi::KeyValue => "key-value",
        }
    }
}

impl SessionState {
    /// Map the daemon's wire code, which reserves 0 for an unknown state and
    /// numbers the FSM states from 1.
    pub fn from_wire(code: i32) -> Option<SessionState> {
        match code {
            0 | 1 => Some(SessionState::Idle),
            2 => Some(SessionState::Connect),
            3 => Some(SessionState::Active),
            4 => Some(SessionState::OpenSent),
            5 => Some(SessionState::OpenConfirm),
            6 => Some(SessionState::Established),
            _ => None,
        }
    }
}

impl Display for SessionState {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Connect => write!(f, "connect"),
            SessionState::Active => write!(f, "active"),
            SessionState::OpenSent => write!(f, "open sent"),
            SessionState::OpenConfirm => write!(f, "open confirm"),
            SessionState::Established => write!(f, "established"),
        }
    }
}

impl Display for TableType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.proto_name())
    }
}

/// An (AFI, SAFI) pair selecting an address space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Family {
    pub afi: Afi,
    pub safi: Safi,
}

impl Family {
    pub const IPV4_UNICAST: Family = Family::new(Afi::Ip, Safi::Unicast);
    pub const IPV6_UNICAST: Family = Family::new(Afi::Ip6, Safi::Unicast);

    pub const fn new(afi: Afi, safi: Safi) -> Self {
        Self { afi, safi }
    }

    /// Whether the daemon keeps a RIB for this family at all.
    pub fn is_supported(self) -> bool {
        use Safi::*;
        match self.afi {
            Afi::Ip | Afi::Ip6 => match self.safi {
                Unicast | Multicast | MplsLabel | Encapsulation | SrPolicy
                | Mup | MplsVpn | MplsVpnMulticast | FlowSpecUnicast
                | FlowSpecVpn => true,
                RouteTargetConstraints => self.afi == Afi::Ip,
                Unknown | Vpls | Evpn | Ls | KeyValue => false,
            },
            Afi::L2vpn => {
                matches!(self.safi, Vpls | Evpn | FlowSpecUnicast | FlowSpecVpn)
            }
            Afi::Ls => self.safi == Ls,
            Afi::Opaque => self.safi == KeyValue,
            Afi::Unknown => false,
        }
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.afi.label(), self.safi.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterInfo {
    pub asn: u32,
    pub router_id: String,
    pub listen_port: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Peer {
    pub state: PeerState,
    pub afi_safis: Vec<AfiSafi>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerState {
    pub neighbor_address: String,
    pub peer_as: u32,
    pub local_as: u32,
    pub session_state: SessionState,
    pub admin_state: AdminState,
    pub out_q: u32,
    pub flops: u32,
    pub send_community: u32,
    pub remove_private_as: RemovePrivateAs,
    pub auth_password: String,
    pub peer_type: u32,
}

impl PeerState {
    pub fn is_established(&self) -> bool {
        self.session_state == SessionState::Established
    }

    pub fn password_set(&self) -> bool {
        !self.auth_password.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AfiSafi {
    pub state: AfiSafiState,
}

/// Per address family route counters of a peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AfiSafiState {
    pub family: Family,
    pub enabled: bool,
    pub received: u64,
    pub accepted: u64,
    pub advertised: u64,
}

/// One prefix in a RIB view. Paths are not decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub prefix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPeerRequest {
    /// Restrict the listing to one neighbor. Empty means every peer.
    pub address: String,
    pub enable_advertised: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPathRequest {
    pub table_type: TableType,
    pub family: Family,
}
