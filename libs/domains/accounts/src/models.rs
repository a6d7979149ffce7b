use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Account entity - the owner of tasks, linked to an OAuth provider identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub provider: String,
    pub provider_account_id: String,
    pub thumbnail: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Input for the account store's `create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub provider: String,
    pub provider_account_id: String,
    pub thumbnail: Option<String>,
}

/// Request body for `POST /accounts/auth`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrGetAccountRequest {
    #[validate(email)]
    pub email: String,
    /// Display name; the first word becomes the first name
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub provider: String,
    #[validate(length(min = 1))]
    pub provider_account_id: String,
    pub thumbnail: Option<String>,
}

impl CreateOrGetAccountRequest {
    pub fn into_new_account(self) -> NewAccount {
        let (first_name, last_name) = split_name(&self.name);
        NewAccount {
            email: self.email,
            first_name,
            last_name,
            provider: self.provider,
            provider_account_id: self.provider_account_id,
            thumbnail: self.thumbnail,
        }
    }
}

/// Query for `GET /accounts/by-email`
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountByEmailQuery {
    /// Email address to look up
    #[validate(length(min = 1))]
    pub email: String,
}

/// Account as rendered to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            full_name: account.full_name(),
            id: account.id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            thumbnail: account.thumbnail,
            last_login_at: account.last_login_at.as_ref().map(format_timestamp),
            created_at: format_timestamp(&account.created_at),
            updated_at: format_timestamp(&account.updated_at),
        }
    }
}

/// RFC 3339 with a `Z` suffix, second precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Splits a display name on whitespace: the first word is the first name,
/// the remaining words joined by single spaces form the last name.
pub fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn split_name_single_word() {
        assert_eq!(split_name("Alice"), ("Alice".to_string(), String::new()));
    }

    #[test]
    fn split_name_collapses_whitespace() {
        assert_eq!(
            split_name("  Mary   Ann  Smith "),
            ("Mary".to_string(), "Ann Smith".to_string())
        );
    }

    #[test]
    fn split_name_blank() {
        assert_eq!(split_name("   "), (String::new(), String::new()));
    }

    #[test]
    fn response_renders_full_name_and_timestamps() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let account = Account {
            id: Uuid::nil(),
            email: "a@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_active: true,
            provider: "google".to_string(),
            provider_account_id: "g-1".to_string(),
            thumbnail: None,
            last_login_at: None,
            created_at: ts,
            updated_at: ts,
        };

        let response = AccountResponse::from(account);
        assert_eq!(response.full_name, "Ada Lovelace");
        assert_eq!(response.created_at, "2025-03-01T09:30:00Z");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("thumbnail").is_none());
        assert!(json.get("lastLoginAt").is_none());
    }

    #[test]
    fn request_validation_rejects_bad_email_and_blank_fields() {
        let request = CreateOrGetAccountRequest {
            email: "not-an-email".to_string(),
            name: String::new(),
            provider: "google".to_string(),
            provider_account_id: String::new(),
            thumbnail: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("provider_account_id"));
        assert!(!fields.contains_key("provider"));
    }

    #[test]
    fn request_deserializes_camel_case() {
        let request: CreateOrGetAccountRequest = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "name": "Ada King Lovelace",
            "provider": "google",
            "providerAccountId": "g-1"
        }))
        .unwrap();

        let new_account = request.into_new_account();
        assert_eq!(new_account.first_name, "Ada");
        assert_eq!(new_account.last_name, "King Lovelace");
        assert_eq!(new_account.provider_account_id, "g-1");
        assert!(new_account.thumbnail.is_none());
    }
}
