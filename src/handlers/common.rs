//! Helpers shared by the entity handlers: ownership checks, repeated query parameters
//! and multipart image extraction.

use axum::extract::Multipart;

use crate::access::Role;
use crate::config::{AssociationDef, EntityKind};
use crate::error::AppError;
use crate::extractors::Caller;
use crate::images::ImageUpload;
use crate::query::AssociationQuery;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Admin, or a university caller linked to `id` through `association`.
pub(crate) async fn admin_or_owning_university(
    state: &AppState,
    caller: &Caller,
    association: &'static AssociationDef,
    id: i64,
) -> bool {
    if caller.is_admin() {
        return true;
    }
    let Some(university_id) = caller.id_as(Role::University) else {
        return false;
    };
    let query = AssociationQuery::new(state.store.clone(), association);
    match query.exists(EntityKind::University, university_id, id).await {
        Ok(owned) => owned,
        Err(e) => {
            tracing::error!(association = association.name(), university_id, id, error = %e, "ownership check failed");
            false
        }
    }
}

/// Admin, or exactly `role` acting on its own record.
pub(crate) fn admin_or_self(caller: &Caller, role: Role, id: i64) -> bool {
    caller.is_admin() || caller.is_self(role, id)
}

/// Every value of a repeated query key, e.g. `category_list=1&category_list=2`.
pub(crate) fn id_list(pairs: &[(String, String)], key: &str) -> Result<Vec<i64>, AppError> {
    pairs
        .iter()
        .filter(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| {
            v.parse()
                .map_err(|_| AppError::BadRequest(format!("{} must be an integer, got '{}'", key, v)))
        })
        .collect()
}

/// Last value of an optional integer query key; empty means absent.
pub(crate) fn optional_id(pairs: &[(String, String)], key: &str) -> Result<Option<i64>, AppError> {
    Ok(id_list(pairs, key)?.pop())
}

/// Reads the `image` field of a multipart body.
pub(crate) async fn read_image(mut multipart: Multipart) -> Result<ImageUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("image is empty".into()));
        }
        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::BadRequest(format!("multipart field '{}' is required", IMAGE_FIELD)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_keys_are_collected() {
        let p = pairs(&[("category_list", "1"), ("tag_id", ""), ("category_list", "3")]);
        assert_eq!(id_list(&p, "category_list").unwrap(), vec![1, 3]);
        assert_eq!(optional_id(&p, "tag_id").unwrap(), None);
        assert!(id_list(&pairs(&[("id", "x")]), "id").is_err());
    }

    #[test]
    fn self_access() {
        let caller = Caller::new(Role::User, Some(4));
        assert!(admin_or_self(&caller, Role::User, 4));
        assert!(!admin_or_self(&caller, Role::User, 5));
        assert!(!admin_or_self(&caller, Role::University, 4));
        assert!(admin_or_self(&Caller::new(Role::Admin, None), Role::User, 5));
    }
}
