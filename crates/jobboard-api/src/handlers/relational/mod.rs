//! Handlers of the relational variant.

pub mod applications;
pub mod auth;
pub mod jobs;

use jobboard_models::Principal;

use crate::error::{ApiError, ApiResult};

/// Numeric user ID carried by a relational principal.
pub(crate) fn user_id(principal: &Principal) -> ApiResult<i64> {
    principal
        .id
        .parse()
        .map_err(|_| ApiError::internal(format!("non-numeric user id {:?}", principal.id)))
}
