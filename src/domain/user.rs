use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub type UserId = Uuid;

/// A registered account. Every transaction, budget and goal belongs to
/// exactly one user; no record is visible across users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub salt: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let password_digest = digest_password(&salt, password);
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            salt,
            password_digest,
            created_at: Utc::now(),
        }
    }

    pub fn set_password(&mut self, password: &str) {
        self.salt = Uuid::new_v4().simple().to_string();
        self.password_digest = digest_password(&self.salt, password);
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        digest_password(&self.salt, candidate) == self.password_digest
    }
}

fn digest_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// An opaque bearer token tied to a user. Presented as
/// `Authorization: Bearer <token>` on every authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserId,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: UserId) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            user,
            created_at: Utc::now(),
        }
    }
}
