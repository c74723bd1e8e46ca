use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    // Never serialized: the hash must not leak through any envelope.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub company_location: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_start_year: Option<i32>,
    pub graduation_end_year: Option<i32>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Public projection returned by network search and filter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
}

/// Optional criteria for the alumni directory filter; all present criteria
/// are ANDed together.
#[derive(Debug, Clone, Default)]
pub struct PeopleFilter {
    pub graduation_start_year_range: Option<(i64, i64)>,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub field_of_study: Option<String>,
    pub company: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            avatar_url: user.avatar_url.clone(),
            bio: user.bio.clone(),
            company: user.company.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: 1,
            username: "casey".into(),
            firstname: "Casey".into(),
            lastname: "Nguyen".into(),
            email: "casey@example.edu".into(),
            password_hash: "$2b$12$secret".into(),
            role: "MEMBER".into(),
            avatar_url: None,
            bio: None,
            company: None,
            company_location: None,
            field_of_study: None,
            graduation_start_year: None,
            graduation_end_year: None,
            location: None,
            industry: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "casey");
    }
}
