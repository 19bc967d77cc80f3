//! Core FDM domain types.
//!
//! Endpoint paths, object type tags, the duplicate policy applied by create
//! operations and the port protocol selector.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Fixed path prefix of every FDM REST endpoint.
pub const API_BASE_PATH: &str = "api/fdm/v1/";

/// Token endpoint (password grant).
pub const TOKEN_ENDPOINT: &str = "fdm/token";
/// Network objects collection.
pub const NETWORKS_ENDPOINT: &str = "object/networks";
/// Network object groups collection.
pub const NETWORK_GROUPS_ENDPOINT: &str = "object/networkgroups";
/// TCP port objects collection.
pub const TCP_PORTS_ENDPOINT: &str = "object/tcpports";
/// UDP port objects collection.
pub const UDP_PORTS_ENDPOINT: &str = "object/udpports";
/// Port object groups collection.
pub const PORT_GROUPS_ENDPOINT: &str = "object/portgroups";
/// Access policies collection.
pub const ACCESS_POLICIES_ENDPOINT: &str = "policy/accesspolicies";

/// Access rules collection of the given access policy.
#[must_use]
pub fn access_rules_endpoint(policy_id: &str) -> String {
    format!("{ACCESS_POLICIES_ENDPOINT}/{policy_id}/accessrules")
}

/// Type tag of network objects.
pub const TYPE_NETWORK_OBJECT: &str = "networkobject";
/// Type tag of network object groups.
pub const TYPE_NETWORK_GROUP: &str = "networkobjectgroup";
/// Type tag of TCP port objects.
pub const TYPE_TCP_PORT: &str = "tcpportobject";
/// Type tag of UDP port objects.
pub const TYPE_UDP_PORT: &str = "udpportobject";
/// Type tag of port object groups.
pub const TYPE_PORT_GROUP: &str = "portobjectgroup";
/// Type tag of access policies.
pub const TYPE_ACCESS_POLICY: &str = "accesspolicy";
/// Type tag of access rules.
pub const TYPE_ACCESS_RULE: &str = "accessrule";
/// Type tag of an access policy's default action.
pub const TYPE_ACCESS_DEFAULT_ACTION: &str = "accessdefaultaction";

/// What a create does when an object with the same name already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with the conflict error
    #[default]
    Error,
    /// Adopt the existing object as-is
    DoNothing,
    /// Overwrite the existing object's value fields with the candidate's
    Replace,
}

impl DuplicatePolicy {
    /// Returns the policy name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::DoNothing => "do_nothing",
            Self::Replace => "replace",
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "do_nothing" | "donothing" => Ok(Self::DoNothing),
            "replace" => Ok(Self::Replace),
            _ => Err(Error::ConfigError(format!("Unknown duplicate policy: {s}"))),
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a create operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The object did not exist and was created
    Created,
    /// A same-named object existed and was adopted unchanged
    Existing,
    /// A same-named object existed and was overwritten
    Replaced,
}

/// Protocol of a port object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
}

impl Protocol {
    /// Collection endpoint for port objects of this protocol.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::Tcp => TCP_PORTS_ENDPOINT,
            Self::Udp => UDP_PORTS_ENDPOINT,
        }
    }

    /// Type tag for port objects of this protocol.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::Tcp => TYPE_TCP_PORT,
            Self::Udp => TYPE_UDP_PORT,
        }
    }

    /// Resolve the protocol from a port object's type tag.
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            TYPE_TCP_PORT => Some(Self::Tcp),
            TYPE_UDP_PORT => Some(Self::Udp),
            _ => None,
        }
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            _ => Err(Error::ConfigError(format!("Unknown protocol: {s}"))),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}
