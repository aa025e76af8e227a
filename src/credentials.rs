//! PIN gate for the admin overview and team-leader views.
//!
//! PINs live hashed in a JSON file beside the settings and are loaded as an
//! injected store; nothing here is consulted by the aggregation modules,
//! and an absent or empty store disables the gate.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, TallyError};
use crate::normalize::normalize_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    TeamLeader,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin: Option<String>,
    #[serde(default)]
    team_leaders: HashMap<String, String>,
}

pub fn hash_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.trim().as_bytes());
    hex::encode(hasher.finalize())
}

impl CredentialStore {
    /// A missing file is an empty store, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.admin.is_none() && self.team_leaders.is_empty()
    }

    pub fn has_admin(&self) -> bool {
        self.admin.is_some()
    }

    /// Stored hash for a role. A missing credential is its own error,
    /// distinct from a wrong PIN.
    pub fn lookup(&self, role: Role, id: &str) -> Result<&str> {
        match role {
            Role::Admin => self
                .admin
                .as_deref()
                .ok_or_else(|| TallyError::Other("no admin PIN configured".to_string())),
            Role::TeamLeader => {
                let key = normalize_key(id);
                self.team_leaders
                    .get(&key)
                    .map(String::as_str)
                    .ok_or(TallyError::UnknownLeader(key))
            }
        }
    }

    pub fn verify(&self, role: Role, id: &str, pin: &str) -> Result<()> {
        let stored = self.lookup(role, id)?;
        if stored == hash_pin(pin) {
            Ok(())
        } else {
            Err(TallyError::InvalidPin)
        }
    }

    pub fn set(&mut self, role: Role, id: &str, pin: &str) {
        let hash = hash_pin(pin);
        match role {
            Role::Admin => self.admin = Some(hash),
            Role::TeamLeader => {
                self.team_leaders.insert(normalize_key(id), hash);
            }
        }
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, role: Role, id: &str) -> bool {
        match role {
            Role::Admin => self.admin.take().is_some(),
            Role::TeamLeader => self.team_leaders.remove(&normalize_key(id)).is_some(),
        }
    }

    pub fn leaders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.team_leaders.keys().map(String::as_str).collect();
        names.sort();
        names
    }
}
