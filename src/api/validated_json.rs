use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::trace;
use validator::Validate;

use crate::{api::json_error::JsonError, utils::short_type_name};

/// Body extractor for CRUD create and update payloads.
///
/// The body must deserialize into `T` and pass its `validator` rules before the
/// handler runs, so no permission hook ever sees a malformed payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = JsonError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;

        if let Err(errors) = payload.validate() {
            trace!(
                payload = short_type_name::<T>(),
                fields = ?errors.field_errors().keys().collect::<Vec<_>>(),
                "Payload failed validation"
            );
            return Err(JsonError::ValidationError(errors));
        }

        Ok(Self(payload))
    }
}
