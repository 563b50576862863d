//! Extract the caller's role and id from the `user_role` / `user_id` query parameters.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::access::Role;
use crate::error::AppError;

/// Who is calling. A missing `user_role` means guest; there is no token validation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caller {
    pub role: Role,
    pub user_id: Option<i64>,
}

#[derive(Deserialize)]
struct CallerParams {
    user_role: Option<String>,
    user_id: Option<i64>,
}

impl Caller {
    pub fn new(role: Role, user_id: Option<i64>) -> Self {
        Caller { role, user_id }
    }

    pub fn at_least(&self, minimum: Role) -> bool {
        self.role.at_least(minimum)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Caller holds exactly `role` and identifies as `id`.
    pub fn is_self(&self, role: Role, id: i64) -> bool {
        self.role == role && self.user_id == Some(id)
    }

    /// Id of a caller holding exactly `role`.
    pub fn id_as(&self, role: Role) -> Option<i64> {
        if self.role == role {
            self.user_id
        } else {
            None
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<CallerParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let role = match params.user_role.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse().map_err(AppError::BadRequest)?,
            None => Role::Guest,
        };
        Ok(Caller::new(role, params.user_id))
    }
}
