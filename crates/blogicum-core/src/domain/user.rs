use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - an account that owns posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Name shown next to posts: "First Last" when set, the username otherwise.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name(),
        }
    }
}

/// A user that does not exist in storage yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
        }
    }
}

/// The public face of a user, attached to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: i32,
    pub username: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "leo".to_string(),
            email: "leo@example.com".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            password_hash: String::new(),
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(user("", "").display_name(), "leo");
        assert_eq!(user(" ", "").display_name(), "leo");
    }

    #[test]
    fn display_name_joins_present_parts() {
        assert_eq!(user("Leo", "Tolstoy").display_name(), "Leo Tolstoy");
        assert_eq!(user("Leo", "").display_name(), "Leo");
    }
}
