//! Generic collection operations shared by every resource type.
//!
//! These are plain request/adopt helpers: update is a PUT by id that adopts
//! the echoed body, delete is a DELETE by id. Neither runs duplicate
//! resolution.

use crate::client::{ApiRequest, Dispatch};
use crate::models::ObjectGroup;
use crate::Result;
use ftd_core::envelope::{decode, ListResponse};
use ftd_core::query::{name_filter, ListQuery};
use ftd_core::{Error, Resource};
use serde::de::DeserializeOwned;
use tracing::debug;

/// `<endpoint>/<id>`, rejecting an empty id.
pub(crate) fn item_endpoint(endpoint: &str, id: &str) -> Result<String> {
    if id.is_empty() {
        return Err(Error::ConfigError(format!(
            "object id is required for `{endpoint}`"
        )));
    }
    Ok(format!("{}/{id}", endpoint.trim_end_matches('/')))
}

/// List a collection.
///
/// # Errors
///
/// Propagates dispatcher errors; a body without `items` is a
/// [`Error::SerializationError`].
pub async fn list<D, R>(dispatch: &D, endpoint: &str, query: &ListQuery) -> Result<Vec<R>>
where
    D: Dispatch + ?Sized,
    R: DeserializeOwned,
{
    let request = ApiRequest::get(endpoint).with_query(query.to_pairs());
    let body = dispatch.request(request).await?;
    let page: ListResponse<R> = decode(&body)?;
    debug!(endpoint, count = page.items.len(), "Listed FDM objects");
    Ok(page.items)
}

/// Fetch one object by id.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] for an empty id and propagates dispatcher
/// errors.
pub async fn get<D, R>(dispatch: &D, endpoint: &str, id: &str) -> Result<R>
where
    D: Dispatch + ?Sized,
    R: DeserializeOwned,
{
    let body = dispatch
        .request(ApiRequest::get(item_endpoint(endpoint, id)?))
        .await?;
    decode(&body)
}

/// Look up the single object named `name`.
///
/// # Errors
///
/// Returns [`Error::AmbiguityError`] unless the name filter matches exactly
/// one object.
pub async fn find_unique<D, R>(dispatch: &D, endpoint: &str, name: &str) -> Result<R>
where
    D: Dispatch + ?Sized,
    R: DeserializeOwned,
{
    let query = ListQuery {
        filter: Some(name_filter(name)),
        limit: Some(0),
    };
    let mut matches: Vec<R> = list(dispatch, endpoint, &query).await?;
    if matches.len() != 1 {
        return Err(Error::AmbiguityError {
            name: name.to_string(),
            matches: matches.len(),
        });
    }
    matches.pop().ok_or_else(|| Error::AmbiguityError {
        name: name.to_string(),
        matches: 0,
    })
}

/// PUT `resource` by id and adopt the echoed body.
///
/// On error `resource` is left as it was.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the object has no id yet and propagates
/// dispatcher errors.
pub async fn update<D, R>(dispatch: &D, endpoint: &str, resource: &mut R) -> Result<()>
where
    D: Dispatch + ?Sized,
    R: Resource,
{
    let request = ApiRequest::put(item_endpoint(endpoint, &resource.meta().id)?, &*resource)?;
    let body = dispatch.request(request).await?;
    *resource = decode(&body)?;
    Ok(())
}

/// DELETE the object with `id`.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] for an empty id and propagates dispatcher
/// errors.
pub async fn delete<D>(dispatch: &D, endpoint: &str, id: &str) -> Result<()>
where
    D: Dispatch + ?Sized,
{
    dispatch
        .request(ApiRequest::delete(item_endpoint(endpoint, id)?))
        .await?;
    Ok(())
}

/// Add `member` to `group` and PUT the group.
///
/// Returns `false` without sending anything when `member` is already in the
/// group. `group` only changes if the PUT succeeds.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if `member` has not been created yet.
pub async fn add_member<D, G, M>(
    dispatch: &D,
    endpoint: &str,
    group: &mut G,
    member: &M,
) -> Result<bool>
where
    D: Dispatch + ?Sized,
    G: ObjectGroup,
    M: Resource,
{
    let id = &member.meta().id;
    if id.is_empty() {
        return Err(Error::ConfigError(format!(
            "`{}` must be created before it can join a group",
            member.meta().name
        )));
    }
    if group.contains(id) {
        debug!(group = %group.meta().name, member = %member.meta().name, "Already a group member");
        return Ok(false);
    }

    let mut staged = group.clone();
    staged.members_mut().push(member.reference());
    update(dispatch, endpoint, &mut staged).await?;
    *group = staged;
    Ok(true)
}

/// Remove the member with `member`'s id from `group` and PUT the group.
///
/// Returns `false` without sending anything when it is not a member.
///
/// # Errors
///
/// Propagates dispatcher errors.
pub async fn remove_member<D, G, M>(
    dispatch: &D,
    endpoint: &str,
    group: &mut G,
    member: &M,
) -> Result<bool>
where
    D: Dispatch + ?Sized,
    G: ObjectGroup,
    M: Resource,
{
    let id = &member.meta().id;
    if id.is_empty() || !group.contains(id) {
        return Ok(false);
    }

    let mut staged = group.clone();
    staged.members_mut().retain(|existing| existing.id() != id);
    update(dispatch, endpoint, &mut staged).await?;
    *group = staged;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockDispatch;
    use crate::models::{NetworkObject, NetworkObjectGroup};
    use ftd_core::types::{NETWORKS_ENDPOINT, NETWORK_GROUPS_ENDPOINT};
    use reqwest::Method;
    use serde_json::json;

    fn bytes(value: &serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    fn persisted_host(id: &str, name: &str) -> NetworkObject {
        let mut object = NetworkObject::host(name, "1.1.1.1");
        object.meta.id = id.to_string();
        object.meta.version = "v1".to_string();
        object
    }

    fn persisted_group() -> NetworkObjectGroup {
        let mut group = NetworkObjectGroup::new("grp");
        group.meta.id = "grp-1".to_string();
        group.meta.version = "g1".to_string();
        group
    }

    #[test]
    fn item_endpoint_requires_id() {
        assert_eq!(
            item_endpoint("object/networks", "abc").unwrap(),
            "object/networks/abc"
        );
        assert!(matches!(
            item_endpoint("object/networks", ""),
            Err(Error::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn list_sends_limit_and_returns_items() {
        let mut dispatch = MockDispatch::new();
        dispatch
            .expect_request()
            .withf(|request| {
                request.method == Method::GET
                    && request.endpoint == NETWORKS_ENDPOINT
                    && request.query == vec![("limit", "0".to_string())]
            })
            .times(1)
            .returning(|_| {
                Ok(bytes(&json!({
                    "items": [{"id": "a", "name": "h1", "type": "networkobject", "subType": "HOST", "value": "1.1.1.1"}],
                    "paging": {"prev": [], "next": [], "limit": 0, "offset": 0, "count": 1, "pages": 1}
                })))
            });

        let objects: Vec<NetworkObject> = list(&dispatch, NETWORKS_ENDPOINT, &ListQuery::with_limit(0))
            .await
            .unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].meta.name, "h1");
    }

    #[tokio::test]
    async fn list_without_items_is_serialization_error() {
        let mut dispatch = MockDispatch::new();
        dispatch
            .expect_request()
            .returning(|_| Ok(bytes(&json!({"paging": {}}))));

        let result: Result<Vec<NetworkObject>> =
            list(&dispatch, NETWORKS_ENDPOINT, &ListQuery::default()).await;
        assert!(matches!(result, Err(Error::SerializationError(_))));
    }

    #[tokio::test]
    async fn find_unique_counts_matches() {
        let mut dispatch = MockDispatch::new();
        dispatch
            .expect_request()
            .withf(|request| {
                request.query
                    == vec![
                        ("filter", "name:dup".to_string()),
                        ("limit", "0".to_string()),
                    ]
            })
            .returning(|_| {
                Ok(bytes(&json!({"items": [
                    {"id": "a", "name": "dup", "type": "networkobject"},
                    {"id": "b", "name": "dup", "type": "networkobject"}
                ]})))
            });

        let err = find_unique::<_, NetworkObject>(&dispatch, NETWORKS_ENDPOINT, "dup")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::AmbiguityError {
                name: "dup".to_string(),
                matches: 2
            }
        );
    }

    #[tokio::test]
    async fn update_adopts_echoed_body() {
        let mut dispatch = MockDispatch::new();
        dispatch
            .expect_request()
            .withf(|request| {
                request.method == Method::PUT && request.endpoint == "object/networks/abc"
            })
            .times(1)
            .returning(|_| {
                Ok(bytes(&json!({
                    "id": "abc", "version": "v2", "name": "h1",
                    "type": "networkobject", "subType": "HOST", "value": "1.1.1.1"
                })))
            });

        let mut object = persisted_host("abc", "h1");
        update(&dispatch, NETWORKS_ENDPOINT, &mut object).await.unwrap();
        assert_eq!(object.meta.version, "v2");
    }

    #[tokio::test]
    async fn update_without_id_sends_nothing() {
        let dispatch = MockDispatch::new();
        let mut object = NetworkObject::host("h1", "1.1.1.1");
        let err = update(&dispatch, NETWORKS_ENDPOINT, &mut object)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[tokio::test]
    async fn add_member_puts_group_with_reference() {
        let mut dispatch = MockDispatch::new();
        dispatch
            .expect_request()
            .withf(|request| {
                request.method == Method::PUT
                    && request.endpoint == "object/networkgroups/grp-1"
                    && request.body.as_ref().unwrap()["objects"][0]["id"] == "abc"
            })
            .times(1)
            .returning(|request| Ok(bytes(request.body.as_ref().unwrap())));

        let mut group = persisted_group();
        let host = persisted_host("abc", "h1");

        assert!(add_member(&dispatch, NETWORK_GROUPS_ENDPOINT, &mut group, &host)
            .await
            .unwrap());
        assert!(group.contains("abc"));

        // second add is a no-op and sends nothing
        assert!(!add_member(&dispatch, NETWORK_GROUPS_ENDPOINT, &mut group, &host)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn failed_member_update_leaves_group_untouched() {
        let mut dispatch = MockDispatch::new();
        dispatch
            .expect_request()
            .times(1)
            .returning(|_| Err(Error::TransportError("connection reset".to_string())));

        let mut group = persisted_group();
        let host = persisted_host("abc", "h1");

        let err = add_member(&dispatch, NETWORK_GROUPS_ENDPOINT, &mut group, &host)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TransportError(_)));
        assert!(group.objects.is_empty());
        assert_eq!(group.meta.version, "g1");
    }

    #[tokio::test]
    async fn remove_member_drops_reference() {
        let mut dispatch = MockDispatch::new();
        dispatch
            .expect_request()
            .withf(|request| request.body.as_ref().unwrap()["objects"] == json!([]))
            .times(1)
            .returning(|request| Ok(bytes(request.body.as_ref().unwrap())));

        let host = persisted_host("abc", "h1");
        let outsider = persisted_host("zzz", "h2");
        let mut group = persisted_group().with_members([&host]);

        assert!(!remove_member(&dispatch, NETWORK_GROUPS_ENDPOINT, &mut group, &outsider)
            .await
            .unwrap());
        assert!(remove_member(&dispatch, NETWORK_GROUPS_ENDPOINT, &mut group, &host)
            .await
            .unwrap());
        assert!(group.objects.is_empty());
    }
}
