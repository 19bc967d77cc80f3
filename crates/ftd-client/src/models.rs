//! FDM configuration object records.
//!
//! Every record embeds [`ObjectMeta`] with `#[serde(flatten)]`, so the wire
//! shape is the appliance's flat JSON object. Fields the appliance owns (links,
//! system flags, rule ids) are accepted on read and left out of the value
//! fields a duplicate `Replace` copies across.

use ftd_core::types::{
    Protocol, TYPE_ACCESS_DEFAULT_ACTION, TYPE_ACCESS_POLICY, TYPE_ACCESS_RULE,
    TYPE_NETWORK_GROUP, TYPE_NETWORK_OBJECT, TYPE_PORT_GROUP,
};
use ftd_core::{ObjectMeta, Reference, Resource};
use serde::{Deserialize, Serialize};

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

fn meta_with_type(name: impl Into<String>, type_tag: &str) -> ObjectMeta {
    ObjectMeta {
        type_tag: type_tag.to_string(),
        ..ObjectMeta::named(name)
    }
}

/// Hypermedia links attached by the appliance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    /// Canonical URL of the object.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Kind of address a network object holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NetworkSubType {
    /// Single address.
    #[default]
    Host,
    /// CIDR network.
    Network,
    /// Address range `a-b`.
    Range,
    /// Fully qualified domain name.
    Fqdn,
}

/// Network object (`networkobject`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkObject {
    /// Identity fields.
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Address kind.
    #[serde(default)]
    pub sub_type: NetworkSubType,
    /// Address, network, range or FQDN.
    #[serde(default)]
    pub value: String,
    /// Whether the appliance ships this object.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_system_defined: bool,
    /// Hypermedia links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl NetworkObject {
    /// New, not-yet-created network object.
    #[must_use]
    pub fn new(name: impl Into<String>, sub_type: NetworkSubType, value: impl Into<String>) -> Self {
        Self {
            meta: meta_with_type(name, TYPE_NETWORK_OBJECT),
            description: None,
            sub_type,
            value: value.into(),
            is_system_defined: false,
            links: None,
        }
    }

    /// New host object.
    #[must_use]
    pub fn host(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self::new(name, NetworkSubType::Host, address)
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Resource for NetworkObject {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn overlay_domain_fields(&mut self, source: &Self) {
        self.sub_type = source.sub_type;
        self.value.clone_from(&source.value);
    }
}

/// A group whose members are held as [`Reference`]s.
pub trait ObjectGroup: Resource {
    /// Current members.
    fn members(&self) -> &[Reference];

    /// Mutable member list.
    fn members_mut(&mut self) -> &mut Vec<Reference>;

    /// True if an object with `id` is already a member.
    fn contains(&self, id: &str) -> bool {
        self.members().iter().any(|member| member.id() == id)
    }
}

/// Network object group (`networkobjectgroup`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkObjectGroup {
    /// Identity fields.
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the appliance ships this group.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_system_defined: bool,
    /// Member objects.
    #[serde(default)]
    pub objects: Vec<Reference>,
    /// Hypermedia links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl NetworkObjectGroup {
    /// New, empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: meta_with_type(name, TYPE_NETWORK_GROUP),
            description: None,
            is_system_defined: false,
            objects: Vec::new(),
            links: None,
        }
    }

    /// Add the given objects as initial members.
    #[must_use]
    pub fn with_members<'a>(mut self, members: impl IntoIterator<Item = &'a NetworkObject>) -> Self {
        self.objects
            .extend(members.into_iter().map(Resource::reference));
        self
    }
}

impl Resource for NetworkObjectGroup {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn overlay_domain_fields(&mut self, source: &Self) {
        self.objects.clone_from(&source.objects);
    }
}

impl ObjectGroup for NetworkObjectGroup {
    fn members(&self) -> &[Reference] {
        &self.objects
    }

    fn members_mut(&mut self) -> &mut Vec<Reference> {
        &mut self.objects
    }
}

/// TCP or UDP port object (`tcpportobject` / `udpportobject`).
///
/// The protocol is carried by the type tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortObject {
    /// Identity fields.
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Single port (`443`) or range (`8000-8080`).
    #[serde(default)]
    pub port: String,
    /// Whether the appliance ships this object.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_system_defined: bool,
    /// Hypermedia links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl PortObject {
    /// New, not-yet-created port object.
    #[must_use]
    pub fn new(protocol: Protocol, name: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            meta: meta_with_type(name, protocol.type_tag()),
            description: None,
            port: port.into(),
            is_system_defined: false,
            links: None,
        }
    }

    /// New TCP port object.
    #[must_use]
    pub fn tcp(name: impl Into<String>, port: impl Into<String>) -> Self {
        Self::new(Protocol::Tcp, name, port)
    }

    /// New UDP port object.
    #[must_use]
    pub fn udp(name: impl Into<String>, port: impl Into<String>) -> Self {
        Self::new(Protocol::Udp, name, port)
    }

    /// Protocol named by the type tag, if it is a port type.
    #[must_use]
    pub fn protocol(&self) -> Option<Protocol> {
        Protocol::from_type_tag(&self.meta.type_tag)
    }
}

impl Resource for PortObject {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn overlay_domain_fields(&mut self, source: &Self) {
        self.port.clone_from(&source.port);
    }
}

/// Port object group (`portobjectgroup`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortObjectGroup {
    /// Identity fields.
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the appliance ships this group.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_system_defined: bool,
    /// Member port objects.
    #[serde(default)]
    pub objects: Vec<Reference>,
    /// Hypermedia links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl PortObjectGroup {
    /// New, empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: meta_with_type(name, TYPE_PORT_GROUP),
            description: None,
            is_system_defined: false,
            objects: Vec::new(),
            links: None,
        }
    }

    /// Add the given port objects as initial members.
    #[must_use]
    pub fn with_members<'a>(mut self, members: impl IntoIterator<Item = &'a PortObject>) -> Self {
        self.objects
            .extend(members.into_iter().map(Resource::reference));
        self
    }
}

impl Resource for PortObjectGroup {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn overlay_domain_fields(&mut self, source: &Self) {
        self.objects.clone_from(&source.objects);
    }
}

impl ObjectGroup for PortObjectGroup {
    fn members(&self) -> &[Reference] {
        &self.objects
    }

    fn members_mut(&mut self) -> &mut Vec<Reference> {
        &mut self.objects
    }
}

/// Verdict of an access rule or policy default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleAction {
    /// Allow and inspect.
    Permit,
    /// Drop.
    Deny,
    /// Allow without further inspection.
    Trust,
}

/// Connection logging mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventLogAction {
    /// No connection events.
    LogNone,
    /// Log at connection start.
    LogFlowStart,
    /// Log at connection end.
    LogFlowEnd,
    /// Log at start and end.
    LogBoth,
}

/// Default action of an access policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultAction {
    /// Verdict for traffic no rule matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleAction>,
    /// Logging for that traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log_action: Option<EventLogAction>,
    /// Intrusion policy applied to permitted traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrusion_policy: Option<Reference>,
    /// Syslog destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_server: Option<Reference>,
    /// Always `accessdefaultaction`.
    #[serde(rename = "type", default)]
    pub type_tag: String,
}

impl Default for DefaultAction {
    fn default() -> Self {
        Self {
            action: None,
            event_log_action: None,
            intrusion_policy: None,
            syslog_server: None,
            type_tag: TYPE_ACCESS_DEFAULT_ACTION.to_string(),
        }
    }
}

/// Access policy (`accesspolicy`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    /// Identity fields.
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Numeric ids of the policy's rules, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_rule_ids: Vec<i64>,
    /// Action for traffic no rule matches.
    #[serde(default)]
    pub default_action: DefaultAction,
    /// SSL decryption policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_policy: Option<Reference>,
    /// Rules of the policy.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Reference>,
    /// Identity policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_policy_setting: Option<Reference>,
    /// Security intelligence policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_intelligence: Option<Reference>,
    /// Hypermedia links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl AccessPolicy {
    /// Force the type tags the appliance expects on a write.
    pub fn normalize_type_tags(&mut self) {
        self.meta.type_tag = TYPE_ACCESS_POLICY.to_string();
        self.default_action.type_tag = TYPE_ACCESS_DEFAULT_ACTION.to_string();
    }
}

impl Resource for AccessPolicy {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn overlay_domain_fields(&mut self, source: &Self) {
        self.default_action.clone_from(&source.default_action);
        self.ssl_policy.clone_from(&source.ssl_policy);
        self.identity_policy_setting
            .clone_from(&source.identity_policy_setting);
        self.security_intelligence
            .clone_from(&source.security_intelligence);
    }
}

/// Access rule (`accessrule`), scoped to one access policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessRule {
    /// Identity fields.
    #[serde(flatten)]
    pub meta: ObjectMeta,
    /// Numeric rule id assigned by the appliance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<i64>,
    /// Source security zones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_zones: Vec<Reference>,
    /// Destination security zones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_zones: Vec<Reference>,
    /// Source networks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_networks: Vec<Reference>,
    /// Destination networks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_networks: Vec<Reference>,
    /// Source ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_ports: Vec<Reference>,
    /// Destination ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination_ports: Vec<Reference>,
    /// Verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_action: Option<RuleAction>,
    /// Connection logging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_log_action: Option<EventLogAction>,
    /// VLAN tag objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vlan_tags: Vec<Reference>,
    /// User and group objects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<Reference>,
    /// Intrusion policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intrusion_policy: Option<Reference>,
    /// File policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_policy: Option<Reference>,
    /// Whether file events are logged.
    #[serde(default, skip_serializing_if = "is_false")]
    pub log_files: bool,
    /// Syslog destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syslog_server: Option<Reference>,
    /// Hypermedia links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl AccessRule {
    /// New, not-yet-created rule with the given verdict.
    #[must_use]
    pub fn new(name: impl Into<String>, action: RuleAction) -> Self {
        Self {
            meta: meta_with_type(name, TYPE_ACCESS_RULE),
            rule_action: Some(action),
            ..Self::default()
        }
    }
}

impl Resource for AccessRule {
    fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.meta
    }

    fn overlay_domain_fields(&mut self, source: &Self) {
        let Self {
            meta: _,
            rule_id: _,
            links: _,
            source_zones,
            destination_zones,
            source_networks,
            destination_networks,
            source_ports,
            destination_ports,
            rule_action,
            event_log_action,
            vlan_tags,
            users,
            intrusion_policy,
            file_policy,
            log_files,
            syslog_server,
        } = source;

        self.source_zones.clone_from(source_zones);
        self.destination_zones.clone_from(destination_zones);
        self.source_networks.clone_from(source_networks);
        self.destination_networks.clone_from(destination_networks);
        self.source_ports.clone_from(source_ports);
        self.destination_ports.clone_from(destination_ports);
        self.rule_action = *rule_action;
        self.event_log_action = *event_log_action;
        self.vlan_tags.clone_from(vlan_tags);
        self.users.clone_from(users);
        self.intrusion_policy.clone_from(intrusion_policy);
        self.file_policy.clone_from(file_policy);
        self.log_files = *log_files;
        self.syslog_server.clone_from(syslog_server);
    }
}
