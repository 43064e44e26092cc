//! User account and profile models.

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::utils::normalize_tags;

/// Collection name.
pub const USERS: &str = "users";

/// User as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// Always stored lower-cased.
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Public view of a user (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// User ID (24 hex characters).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Free-form biography.
    pub bio: String,
    /// Skills the user offers.
    pub skills: Vec<String>,
    /// GitHub profile URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// LinkedIn profile URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last profile update (RFC 3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<UserDocument> for UserProfile {
    fn from(user: UserDocument) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            bio: user.bio,
            skills: user.skills,
            github: user.github,
            linkedin: user.linkedin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request body for account registration.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Plain-text password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Partial profile update. Only provided fields are written.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "crate::utils::not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(url(message = "GitHub must be a URL"))]
    pub github: Option<String>,
    #[validate(url(message = "LinkedIn must be a URL"))]
    pub linkedin: Option<String>,
}

impl UpdateProfileRequest {
    /// Builds the `$set` body, or `None` when nothing was provided.
    pub fn into_set_document(self) -> Option<Document> {
        let mut set = Document::new();
        if let Some(name) = self.name {
            set.insert("name", name.trim());
        }
        if let Some(bio) = self.bio {
            set.insert("bio", bio);
        }
        if let Some(skills) = self.skills {
            set.insert("skills", normalize_tags(skills));
        }
        if let Some(github) = self.github {
            set.insert("github", github);
        }
        if let Some(linkedin) = self.linkedin {
            set.insert("linkedin", linkedin);
        }
        (!set.is_empty()).then_some(set)
    }
}

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Only return users offering this skill.
    pub skill: Option<String>,
}

impl ListUsersQuery {
    /// MongoDB filter for this query.
    pub fn filter(&self) -> Document {
        match self.skill.as_deref().map(str::trim) {
            Some(skill) if !skill.is_empty() => doc! { "skills": skill.to_lowercase() },
            _ => doc! {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_hides_password_hash() {
        let user = UserDocument {
            id: Some(ObjectId::new()),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            bio: String::new(),
            skills: vec!["rust".into()],
            github: None,
            linkedin: None,
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: None,
        };
        let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_empty_update_yields_none() {
        assert!(UpdateProfileRequest::default().into_set_document().is_none());
    }

    #[test]
    fn test_update_normalizes_skills() {
        let update = UpdateProfileRequest {
            skills: Some(vec![" rust ".into(), "".into(), "rust".into(), "go".into()]),
            ..Default::default()
        };
        let set = update.into_set_document().unwrap();
        let skills: Vec<&str> = set
            .get_array("skills")
            .unwrap()
            .iter()
            .filter_map(|b| b.as_str())
            .collect();
        assert_eq!(skills, vec!["rust", "go"]);
    }

    #[test]
    fn test_register_validation() {
        let bad = RegisterRequest {
            name: "".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let req = RegisterRequest {
            name: "   ".into(),
            email: "ada@example.com".into(),
            password: "long enough".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let update = UpdateProfileRequest {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_skill_filter() {
        let query = ListUsersQuery {
            skill: Some("rust".into()),
        };
        assert_eq!(query.filter(), doc! { "skills": "rust" });
        assert_eq!(ListUsersQuery::default().filter(), doc! {});
    }
}
