//! Create-with-duplicate-policy.
//!
//! A create POSTs the candidate. When the appliance answers with a structured
//! error whose first message code is `duplicateName` or
//! `newInstanceWithDuplicateId`, the [`DuplicatePolicy`] decides what happens:
//!
//! | policy      | on conflict                                                  |
//! |-------------|--------------------------------------------------------------|
//! | `Error`     | return the conflict error                                    |
//! | `DoNothing` | look the object up by name and adopt it unchanged            |
//! | `Replace`   | look it up, copy the candidate's value fields onto it, PUT   |
//!
//! The lookup must match exactly one object, otherwise the create fails with
//! [`ftd_core::Error::AmbiguityError`]. The caller's object is only written once the
//! whole flow has succeeded, and then holds the server's copy.

use crate::client::{ApiRequest, Dispatch};
use crate::crud::{find_unique, item_endpoint};
use crate::Result;
use ftd_core::envelope::decode;
use ftd_core::{CreateOutcome, DuplicatePolicy, Resource};
use tracing::{debug, warn};

/// Create `candidate` at `endpoint`, resolving a name conflict per `policy`.
///
/// The candidate's type tag must already be set.
///
/// # Errors
///
/// Returns the conflict error under [`DuplicatePolicy::Error`],
/// [`ftd_core::Error::AmbiguityError`] when a conflict cannot be pinned to exactly one
/// existing object, and any other dispatcher error unchanged. On error
/// `candidate` is not modified.
pub async fn create_with_policy<D, R>(
    dispatch: &D,
    endpoint: &str,
    candidate: &mut R,
    policy: DuplicatePolicy,
) -> Result<CreateOutcome>
where
    D: Dispatch + ?Sized,
    R: Resource,
{
    let request = ApiRequest::post(endpoint, &*candidate)?;
    let conflict = match dispatch.request(request).await {
        Ok(body) => {
            *candidate = decode(&body)?;
            debug!(endpoint, name = %candidate.meta().name, id = %candidate.meta().id, "Created FDM object");
            return Ok(CreateOutcome::Created);
        }
        Err(err) if err.is_duplicate() => err,
        Err(err) => return Err(err),
    };

    let name = candidate.meta().name.clone();
    warn!(endpoint, %name, %policy, "FDM object already exists");

    match policy {
        DuplicatePolicy::Error => Err(conflict),
        DuplicatePolicy::DoNothing => {
            let existing: R = find_unique(dispatch, endpoint, &name).await?;
            *candidate = existing;
            Ok(CreateOutcome::Existing)
        }
        DuplicatePolicy::Replace => {
            let mut existing: R = find_unique(dispatch, endpoint, &name).await?;
            existing.overlay_domain_fields(candidate);

            let request = ApiRequest::put(item_endpoint(endpoint, &existing.meta().id)?, &existing)?;
            let body = dispatch.request(request).await?;
            *candidate = decode(&body)?;
            debug!(endpoint, %name, id = %candidate.meta().id, "Replaced FDM object");
            Ok(CreateOutcome::Replaced)
        }
    }
}
