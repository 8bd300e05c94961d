use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::errors::AppError;

/// User whose profile fills placeholders for anonymous visitors.
pub const DEFAULT_PROFILE_USER_ID: i64 = 1;

/// Scalar profile attributes of a user. Keys are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    fields: BTreeMap<String, String>,
}

impl Profile {
    pub fn from_pairs<K: AsRef<str>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut profile = Profile::default();
        for (k, v) in pairs {
            profile.insert(k.as_ref(), v);
        }
        profile
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.trim().to_lowercase(), value.into());
    }

    /// Case-insensitive lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&key.trim().to_lowercase()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add `fullname` from first and last name when both are known.
    pub fn with_fullname(mut self) -> Self {
        if let (Some(first), Some(last)) = (self.get("firstname"), self.get("lastname")) {
            let fullname = format!("{first} {last}");
            self.insert("fullname", fullname);
        }
        self
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    key: String,
    value: String,
}

pub async fn find_by_user(pool: &PgPool, user_id: i64) -> Result<Profile, AppError> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        "SELECT key, value FROM user_profile_fields WHERE user_id = $1 ORDER BY key",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(Profile::from_pairs(rows.into_iter().map(|r| (r.key, r.value))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive() {
        let profile = Profile::from_pairs([("FirstName", "Ada"), ("lastname", "Lovelace")]).with_fullname();
        assert_eq!(profile.get("firstname"), Some("Ada"));
        assert_eq!(profile.get("FULLNAME"), Some("Ada Lovelace"));
    }
}
