//! Network objects and network object groups.

use crate::client::FtdClient;
use crate::models::{NetworkObject, NetworkObjectGroup, NetworkSubType};
use crate::{crud, duplicate, Result};
use ftd_core::query::ListQuery;
use ftd_core::types::{
    NETWORKS_ENDPOINT, NETWORK_GROUPS_ENDPOINT, TYPE_NETWORK_GROUP, TYPE_NETWORK_OBJECT,
};
use ftd_core::{CreateOutcome, DuplicatePolicy};
use tracing::info;

/// Name of the built-in `0.0.0.0/0` network object.
pub const NETWORK_ANY_NAME: &str = "0.0.0.0";

impl FtdClient {
    /// List network objects; `limit` 0 asks for the appliance default page.
    pub async fn list_network_objects(&self, limit: u32) -> Result<Vec<NetworkObject>> {
        crud::list(self, NETWORKS_ENDPOINT, &ListQuery::with_limit(limit)).await
    }

    /// Fetch a network object by id.
    pub async fn get_network_object(&self, id: &str) -> Result<NetworkObject> {
        crud::get(self, NETWORKS_ENDPOINT, id).await
    }

    /// Network objects whose name matches `name`.
    pub async fn find_network_objects(&self, name: &str) -> Result<Vec<NetworkObject>> {
        crud::list(self, NETWORKS_ENDPOINT, &ListQuery::by_name(name)).await
    }

    /// Create a network object, resolving a name conflict per `policy`.
    pub async fn create_network_object(
        &self,
        object: &mut NetworkObject,
        policy: DuplicatePolicy,
    ) -> Result<CreateOutcome> {
        object.meta.type_tag = TYPE_NETWORK_OBJECT.to_string();
        duplicate::create_with_policy(self, NETWORKS_ENDPOINT, object, policy).await
    }

    /// PUT a network object and adopt the result.
    pub async fn update_network_object(&self, object: &mut NetworkObject) -> Result<()> {
        crud::update(self, NETWORKS_ENDPOINT, object).await
    }

    /// Delete a network object.
    pub async fn delete_network_object(&self, object: &NetworkObject) -> Result<()> {
        self.delete_network_object_by_id(&object.meta.id).await
    }

    /// Delete a network object by id.
    pub async fn delete_network_object_by_id(&self, id: &str) -> Result<()> {
        crud::delete(self, NETWORKS_ENDPOINT, id).await
    }

    /// One host object per address, in input order.
    ///
    /// Existing host objects with a matching value are reused as they are;
    /// the rest are created with the address as their name under
    /// [`DuplicatePolicy::DoNothing`]. Stops at the first failure.
    pub async fn create_network_objects_from_ips<I, S>(&self, ips: I) -> Result<Vec<NetworkObject>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known = self.list_network_objects(0).await?;
        let mut objects = Vec::new();

        for ip in ips {
            let ip = ip.as_ref();
            let existing = known
                .iter()
                .find(|object| object.sub_type == NetworkSubType::Host && object.value == ip);

            if let Some(existing) = existing {
                objects.push(existing.clone());
                continue;
            }

            let mut object = NetworkObject::host(ip, ip);
            self.create_network_object(&mut object, DuplicatePolicy::DoNothing)
                .await?;
            info!(address = ip, id = %object.meta.id, "Host object ready");
            known.push(object.clone());
            objects.push(object);
        }

        Ok(objects)
    }

    /// The system-defined "any" network object.
    pub async fn get_network_any(&self) -> Result<NetworkObject> {
        crud::find_unique(self, NETWORKS_ENDPOINT, NETWORK_ANY_NAME).await
    }

    /// List network object groups.
    pub async fn list_network_object_groups(&self, limit: u32) -> Result<Vec<NetworkObjectGroup>> {
        crud::list(self, NETWORK_GROUPS_ENDPOINT, &ListQuery::with_limit(limit)).await
    }

    /// Fetch a network object group by id.
    pub async fn get_network_object_group(&self, id: &str) -> Result<NetworkObjectGroup> {
        crud::get(self, NETWORK_GROUPS_ENDPOINT, id).await
    }

    /// Network object groups whose name matches `name`.
    pub async fn find_network_object_groups(&self, name: &str) -> Result<Vec<NetworkObjectGroup>> {
        crud::list(self, NETWORK_GROUPS_ENDPOINT, &ListQuery::by_name(name)).await
    }

    /// Create a network object group, resolving a name conflict per `policy`.
    pub async fn create_network_object_group(
        &self,
        group: &mut NetworkObjectGroup,
        policy: DuplicatePolicy,
    ) -> Result<CreateOutcome> {
        group.meta.type_tag = TYPE_NETWORK_GROUP.to_string();
        duplicate::create_with_policy(self, NETWORK_GROUPS_ENDPOINT, group, policy).await
    }

    /// PUT a network object group and adopt the result.
    pub async fn update_network_object_group(&self, group: &mut NetworkObjectGroup) -> Result<()> {
        crud::update(self, NETWORK_GROUPS_ENDPOINT, group).await
    }

    /// Delete a network object group.
    pub async fn delete_network_object_group(&self, group: &NetworkObjectGroup) -> Result<()> {
        crud::delete(self, NETWORK_GROUPS_ENDPOINT, &group.meta.id).await
    }

    /// Add `object` to `group`; `Ok(false)` if it was already a member.
    pub async fn add_to_network_object_group(
        &self,
        group: &mut NetworkObjectGroup,
        object: &NetworkObject,
    ) -> Result<bool> {
        crud::add_member(self, NETWORK_GROUPS_ENDPOINT, group, object).await
    }

    /// Remove `object` from `group`; `Ok(false)` if it was not a member.
    pub async fn delete_from_network_object_group(
        &self,
        group: &mut NetworkObjectGroup,
        object: &NetworkObject,
    ) -> Result<bool> {
        crud::remove_member(self, NETWORK_GROUPS_ENDPOINT, group, object).await
    }
}
