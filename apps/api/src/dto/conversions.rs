use chrono::{DateTime, Utc};
use tessera_application::{
    AuditLogQuery, CreatePermissionDefinitionInput, GrantPermissionInput, PermissionGrantQuery,
};
use tessera_core::{AppError, AppResult, NonEmptyString};
use tessera_domain::{PermissionName, UserId};
use uuid::Uuid;

use super::{
    CreatePermissionDefinitionRequest, GrantPermissionRequest, ListAuditLogQuery,
    ListPermissionGrantsQuery, UpdateGrantExpiryRequest,
};

const DEFAULT_GRANT_PAGE_SIZE: usize = 50;
const DEFAULT_AUDIT_PAGE_SIZE: usize = 50;

/// Parses a user id from a request field.
pub fn parse_user_id(value: &str) -> AppResult<UserId> {
    Uuid::parse_str(value.trim())
        .map(UserId::from_uuid)
        .map_err(|error| AppError::Validation(format!("invalid user id '{value}': {error}")))
}

/// Parses a grant id from a path segment.
pub fn parse_grant_id(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|error| AppError::Validation(format!("invalid grant id '{value}': {error}")))
}

fn parse_optional_timestamp(value: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            DateTime::parse_from_rfc3339(value)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|error| {
                    AppError::Validation(format!("invalid timestamp '{value}': {error}"))
                })
        })
        .transpose()
}

impl TryFrom<GrantPermissionRequest> for GrantPermissionInput {
    type Error = AppError;

    fn try_from(value: GrantPermissionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: parse_user_id(&value.user_id)?,
            permission: PermissionName::new(value.permission)?,
            expires_at: parse_optional_timestamp(value.expires_at.as_deref())?,
        })
    }
}

impl TryFrom<CreatePermissionDefinitionRequest> for CreatePermissionDefinitionInput {
    type Error = AppError;

    fn try_from(value: CreatePermissionDefinitionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: PermissionName::new(value.name)?,
            description: value
                .description
                .map(|description| description.trim().to_owned())
                .filter(|description| !description.is_empty()),
            category: NonEmptyString::new(value.category.trim())?,
        })
    }
}

impl TryFrom<ListPermissionGrantsQuery> for PermissionGrantQuery {
    type Error = AppError;

    fn try_from(value: ListPermissionGrantsQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: value.user_id.as_deref().map(parse_user_id).transpose()?,
            active_only: value.active_only.unwrap_or(false),
            limit: value.limit.map_or(DEFAULT_GRANT_PAGE_SIZE, to_usize),
            offset: value.offset.map_or(0, to_usize),
        })
    }
}

impl TryFrom<ListAuditLogQuery> for AuditLogQuery {
    type Error = AppError;

    fn try_from(value: ListAuditLogQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            limit: value.limit.map_or(DEFAULT_AUDIT_PAGE_SIZE, to_usize),
            offset: value.offset.map_or(0, to_usize),
            action: non_blank(value.action),
            actor_user_id: non_blank(value.actor_user_id)
                .as_deref()
                .map(parse_user_id)
                .transpose()?,
            resource_type: non_blank(value.resource_type),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl UpdateGrantExpiryRequest {
    /// Parsed expiry; `None` clears it.
    pub fn expires_at(&self) -> AppResult<Option<DateTime<Utc>>> {
        parse_optional_timestamp(self.expires_at.as_deref())
    }
}

fn to_usize(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use tessera_application::{AuditLogQuery, GrantPermissionInput, PermissionGrantQuery};
    use tessera_core::AppError;

    use super::{
        GrantPermissionRequest, ListAuditLogQuery, ListPermissionGrantsQuery,
        UpdateGrantExpiryRequest,
    };

    #[test]
    fn grant_request_parses_ids_names_and_expiry() {
        let request = GrantPermissionRequest {
            user_id: "3f0f1e52-8f55-4ad1-bb4e-0c2bd3d2e6a1".to_owned(),
            permission: " reports.view ".to_owned(),
            expires_at: Some("2030-01-01T00:00:00-03:00".to_owned()),
        };

        let Ok(input) = GrantPermissionInput::try_from(request) else {
            panic!("request should convert");
        };

        assert_eq!(input.permission.as_str(), "reports.view");
        assert_eq!(
            input.expires_at.map(|value| value.to_rfc3339()),
            Some("2030-01-01T03:00:00+00:00".to_owned())
        );
    }

    #[test]
    fn wildcard_and_malformed_inputs_are_validation_errors() {
        let wildcard = GrantPermissionInput::try_from(GrantPermissionRequest {
            user_id: "3f0f1e52-8f55-4ad1-bb4e-0c2bd3d2e6a1".to_owned(),
            permission: "*".to_owned(),
            expires_at: None,
        });
        let bad_user = GrantPermissionInput::try_from(GrantPermissionRequest {
            user_id: "42".to_owned(),
            permission: "reports.view".to_owned(),
            expires_at: None,
        });
        let bad_expiry = UpdateGrantExpiryRequest {
            expires_at: Some("tomorrow".to_owned()),
        }
        .expires_at();

        assert!(matches!(wildcard, Err(AppError::Validation(_))));
        assert!(matches!(bad_user, Err(AppError::Validation(_))));
        assert!(matches!(bad_expiry, Err(AppError::Validation(_))));
    }

    #[test]
    fn empty_expiry_clears_the_expiry() {
        let request = UpdateGrantExpiryRequest {
            expires_at: Some(String::new()),
        };

        assert!(matches!(request.expires_at(), Ok(None)));
    }

    #[test]
    fn list_query_defaults_to_first_page_of_all_grants() {
        let Ok(query) = PermissionGrantQuery::try_from(ListPermissionGrantsQuery::default()) else {
            panic!("empty query should convert");
        };

        assert_eq!(query.user_id, None);
        assert!(!query.active_only);
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn audit_query_trims_filters_and_rejects_bad_actor() {
        let Ok(query) = AuditLogQuery::try_from(ListAuditLogQuery {
            action: Some(" security.permission.granted ".to_owned()),
            actor_user_id: Some(String::new()),
            resource_type: Some("  ".to_owned()),
            limit: None,
            offset: Some(20),
        }) else {
            panic!("query should convert");
        };
        let bad_actor = AuditLogQuery::try_from(ListAuditLogQuery {
            actor_user_id: Some("admin".to_owned()),
            ..ListAuditLogQuery::default()
        });

        assert_eq!(query.action.as_deref(), Some("security.permission.granted"));
        assert_eq!(query.actor_user_id, None);
        assert_eq!(query.resource_type, None);
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset, 20);
        assert!(matches!(bad_actor, Err(AppError::Validation(_))));
    }
}
