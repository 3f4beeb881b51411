use serde::{Deserialize, Serialize};

use crate::auth::password::hash_password;
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::extract::BaseUrl;
use crate::store::{filter_value, ListQuery, NewUser, User, UserChanges, UserFilter};
use crate::validate::{email_field, text_field};

/// Incoming user fields. `password` is write-only.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

struct CheckedUser {
    email: Option<String>,
    name: Option<String>,
    password: Option<String>,
}

impl UserPayload {
    fn check(self, partial: bool) -> ApiResult<CheckedUser> {
        let mut errors = FieldErrors::default();
        let email = email_field(&mut errors, "email", self.email, partial);
        let name = text_field(&mut errors, "name", self.name, partial, true);
        let password = text_field(&mut errors, "password", self.password, partial, false);
        errors.into_result()?;
        Ok(CheckedUser { email, name, password })
    }

    /// Validates a signup and hashes its password.
    pub fn into_new_user(self) -> ApiResult<NewUser> {
        let CheckedUser { email, name, password } = self.check(false)?;
        let (Some(email), Some(name), Some(password)) = (email, name, password) else {
            return Err(ApiError::internal("validated signup lost a field"));
        };
        Ok(NewUser {
            email,
            name,
            password_hash: hash_password(&password).map_err(ApiError::internal)?,
        })
    }

    /// Validates an update; `partial` is set for PATCH.
    pub fn into_changes(self, partial: bool) -> ApiResult<UserChanges> {
        let CheckedUser { email, name, password } = self.check(partial)?;
        let password_hash = password
            .map(|p| hash_password(&p))
            .transpose()
            .map_err(ApiError::internal)?;
        Ok(UserChanges { email, name, password_hash })
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub url: String,
}

impl UserResponse {
    pub fn new(user: User, base: &BaseUrl) -> Self {
        Self {
            url: base.resource("users", user.id),
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserListParams {
    pub fn into_query(self) -> ListQuery<UserFilter> {
        let filter = UserFilter {
            name: filter_value(self.name),
            email: filter_value(self.email),
        };
        ListQuery::new(filter, self.search.as_deref(), self.ordering.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::error::{MSG_INVALID_EMAIL, MSG_REQUIRED};

    #[test]
    fn signup_hashes_the_password() {
        let payload = UserPayload {
            email: Some("Foobar@Example.com".into()),
            name: Some("foobar".into()),
            password: Some("somepassword".into()),
        };
        let new = payload.into_new_user().unwrap();
        assert_eq!(new.email, "foobar@example.com");
        assert_ne!(new.password_hash, "somepassword");
        assert!(verify_password("somepassword", &new.password_hash).unwrap());
    }

    #[test]
    fn signup_reports_every_bad_field() {
        let payload = UserPayload { email: Some("nope".into()), ..Default::default() };
        let Err(ApiError::Validation(errors)) = payload.into_new_user() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("email").unwrap(), [MSG_INVALID_EMAIL.to_string()]);
        assert_eq!(errors.get("name").unwrap(), [MSG_REQUIRED.to_string()]);
        assert_eq!(errors.get("password").unwrap(), [MSG_REQUIRED.to_string()]);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let payload = UserPayload { name: Some("renamed".into()), ..Default::default() };
        let changes = payload.into_changes(true).unwrap();
        assert_eq!(changes.name.as_deref(), Some("renamed"));
        assert!(changes.email.is_none());
        assert!(changes.password_hash.is_none());
    }

    #[test]
    fn response_never_contains_password() {
        let user = User {
            id: 4,
            email: "a@b.io".into(),
            name: "a".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(UserResponse::new(user, &BaseUrl("http://testserver".into()))).unwrap();
        assert_eq!(json["url"], "http://testserver/users/4/");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
