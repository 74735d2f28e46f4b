use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the auth endpoints.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl User {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.split('@').next().unwrap_or("User").to_string()
        } else {
            name.to_string()
        }
    }

    pub fn initials(&self) -> String {
        let initials: String = [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect();

        if initials.is_empty() {
            self.email
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_else(|| "U".to_string())
        } else {
            initials
        }
    }
}

/// Body of a successful login or registration.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: "1".into(),
            email: "ada@example.com".into(),
            first_name: first.into(),
            last_name: last.into(),
        }
    }

    #[test]
    fn accepts_numeric_ids() {
        let user: User =
            serde_json::from_str(r#"{"id": 42, "email": "a@b.co", "first_name": "Ada"}"#).unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.last_name, "");
    }

    #[test]
    fn names_and_initials() {
        assert_eq!(user("Ada", "Lovelace").full_name(), "Ada Lovelace");
        assert_eq!(user("Ada", "Lovelace").initials(), "AL");
        assert_eq!(user("", "").full_name(), "ada");
        assert_eq!(user("", "").initials(), "A");
    }
}
