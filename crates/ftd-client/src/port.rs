//! TCP/UDP port objects and port object groups.
//!
//! TCP and UDP objects share one record type; the protocol picks the endpoint
//! on create and the object's type tag picks it afterwards.

use crate::client::FtdClient;
use crate::models::{PortObject, PortObjectGroup};
use crate::{crud, duplicate, Result};
use ftd_core::query::ListQuery;
use ftd_core::types::{PORT_GROUPS_ENDPOINT, TYPE_PORT_GROUP};
use ftd_core::{CreateOutcome, DuplicatePolicy, Error, Protocol};

fn object_endpoint(object: &PortObject) -> Result<&'static str> {
    object.protocol().map(|protocol| protocol.endpoint()).ok_or_else(|| {
        Error::ConfigError(format!(
            "`{}` has no port object type tag (got `{}`)",
            object.meta.name, object.meta.type_tag
        ))
    })
}

impl FtdClient {
    /// List port objects of one protocol.
    pub async fn list_port_objects(&self, protocol: Protocol, limit: u32) -> Result<Vec<PortObject>> {
        crud::list(self, protocol.endpoint(), &ListQuery::with_limit(limit)).await
    }

    /// Fetch a port object by id.
    pub async fn get_port_object(&self, protocol: Protocol, id: &str) -> Result<PortObject> {
        crud::get(self, protocol.endpoint(), id).await
    }

    /// Port objects of one protocol whose name matches `name`.
    pub async fn find_port_objects(&self, protocol: Protocol, name: &str) -> Result<Vec<PortObject>> {
        crud::list(self, protocol.endpoint(), &ListQuery::by_name(name)).await
    }

    /// Create a port object, resolving a name conflict per `policy`.
    ///
    /// `protocol` overrides whatever type tag the object carries.
    pub async fn create_port_object(
        &self,
        protocol: Protocol,
        object: &mut PortObject,
        policy: DuplicatePolicy,
    ) -> Result<CreateOutcome> {
        object.meta.type_tag = protocol.type_tag().to_string();
        duplicate::create_with_policy(self, protocol.endpoint(), object, policy).await
    }

    /// PUT a port object and adopt the result.
    pub async fn update_port_object(&self, object: &mut PortObject) -> Result<()> {
        let endpoint = object_endpoint(object)?;
        crud::update(self, endpoint, object).await
    }

    /// Delete a port object.
    pub async fn delete_port_object(&self, object: &PortObject) -> Result<()> {
        crud::delete(self, object_endpoint(object)?, &object.meta.id).await
    }

    /// List port object groups.
    pub async fn list_port_object_groups(&self, limit: u32) -> Result<Vec<PortObjectGroup>> {
        crud::list(self, PORT_GROUPS_ENDPOINT, &ListQuery::with_limit(limit)).await
    }

    /// Fetch a port object group by id.
    pub async fn get_port_object_group(&self, id: &str) -> Result<PortObjectGroup> {
        crud::get(self, PORT_GROUPS_ENDPOINT, id).await
    }

    /// Port object groups whose name matches `name`.
    pub async fn find_port_object_groups(&self, name: &str) -> Result<Vec<PortObjectGroup>> {
        crud::list(self, PORT_GROUPS_ENDPOINT, &ListQuery::by_name(name)).await
    }

    /// Create a port object group, resolving a name conflict per `policy`.
    pub async fn create_port_object_group(
        &self,
        group: &mut PortObjectGroup,
        policy: DuplicatePolicy,
    ) -> Result<CreateOutcome> {
        group.meta.type_tag = TYPE_PORT_GROUP.to_string();
        duplicate::create_with_policy(self, PORT_GROUPS_ENDPOINT, group, policy).await
    }

    /// PUT a port object group and adopt the result.
    pub async fn update_port_object_group(&self, group: &mut PortObjectGroup) -> Result<()> {
        crud::update(self, PORT_GROUPS_ENDPOINT, group).await
    }

    /// Delete a port object group.
    pub async fn delete_port_object_group(&self, group: &PortObjectGroup) -> Result<()> {
        crud::delete(self, PORT_GROUPS_ENDPOINT, &group.meta.id).await
    }

    /// Add `object` to `group`; `Ok(false)` if it was already a member.
    pub async fn add_to_port_object_group(
        &self,
        group: &mut PortObjectGroup,
        object: &PortObject,
    ) -> Result<bool> {
        crud::add_member(self, PORT_GROUPS_ENDPOINT, group, object).await
    }

    /// Remove `object` from `group`; `Ok(false)` if it was not a member.
    pub async fn delete_from_port_object_group(
        &self,
        group: &mut PortObjectGroup,
        object: &PortObject,
    ) -> Result<bool> {
        crud::remove_member(self, PORT_GROUPS_ENDPOINT, group, object).await
    }
}
