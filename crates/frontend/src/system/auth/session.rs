use contracts::system::auth::{AccountStatus, Role, UserInfo};
use serde::Deserialize;
use serde_json::Value;

use super::storage::{self, SessionStorage};

/// Identity of the signed-in user as seen by routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Lenient view of the stored record: only `role` is mandatory.
/// `id` may be a string or a number.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    nom: Option<String>,
    #[serde(default)]
    prenom: Option<String>,
    role: String,
    #[serde(default)]
    statut: Option<String>,
}

impl Session {
    /// Parses the raw session record. Anything unexpected yields `None`.
    pub fn from_stored(raw: Option<&str>) -> Option<Session> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }

        let record: StoredRecord = match serde_json::from_str(raw) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Ignoring malformed session record: {}", e);
                return None;
            }
        };

        let role = Role::from_code(&record.role)?;

        if let Some(statut) = record.statut.as_deref() {
            if AccountStatus::from_code(statut) != Some(AccountStatus::Active) {
                return None;
            }
        }

        let id = match record.id {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            None | Some(Value::Null) => String::new(),
            Some(_) => return None,
        };

        let name = format!(
            "{} {}",
            record.prenom.unwrap_or_default(),
            record.nom.unwrap_or_default()
        )
        .trim()
        .to_string();

        Some(Session { id, name, role })
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.is_empty() || roles.contains(&self.role)
    }
}

impl From<&UserInfo> for Session {
    fn from(user: &UserInfo) -> Self {
        Session {
            id: user.id.clone(),
            name: user.full_name(),
            role: user.role,
        }
    }
}

/// Reads the current session straight from storage
pub fn load(storage: &dyn SessionStorage) -> Option<Session> {
    Session::from_stored(storage::read_user(storage).as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::storage::{MemoryStorage, USER_KEY};

    #[test]
    fn test_full_record_parses() {
        let raw = r#"{"id":"12","nom":"Benali","prenom":"Sara","email":"s@p.dz",
            "role":"INGENIEUR_TERRAIN","date_creation":"2024-05-01","statut":"ACTIF"}"#;
        let session = Session::from_stored(Some(raw)).unwrap();
        assert_eq!(session.id, "12");
        assert_eq!(session.name, "Sara Benali");
        assert_eq!(session.role, Role::IngenieurTerrain);
    }

    #[test]
    fn test_role_only_record_is_a_session() {
        let session = Session::from_stored(Some(r#"{"role":"EXPERT"}"#)).unwrap();
        assert_eq!(session.role, Role::Expert);
        assert_eq!(session.id, "");
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let session = Session::from_stored(Some(r#"{"id":5,"role":"TOP_MANAGEMENT"}"#)).unwrap();
        assert_eq!(session.id, "5");
    }

    #[test]
    fn test_fail_closed_inputs() {
        let cases = [
            None,
            Some(""),
            Some("   "),
            Some("not json"),
            Some("{"),
            Some("null"),
            Some("42"),
            Some(r#""EXPERT""#),
            Some(r#"["EXPERT"]"#),
            Some(r#"{}"#),
            Some(r#"{"role":null}"#),
            Some(r#"{"role":"expert"}"#),
            Some(r#"{"role":"ADMIN"}"#),
            Some(r#"{"role":"EXPERT","statut":"SUSPENDU"}"#),
            Some(r#"{"role":"EXPERT","statut":"INACTIF"}"#),
            Some(r#"{"role":"EXPERT","statut":"whatever"}"#),
            Some(r#"{"role":"EXPERT","id":{"nested":true}}"#),
        ];
        for raw in cases {
            assert!(Session::from_stored(raw).is_none(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_load_reads_the_user_key() {
        let storage = MemoryStorage::with_item(USER_KEY, r#"{"id":"1","role":"EXPERT"}"#);
        assert_eq!(load(&storage).map(|s| s.role), Some(Role::Expert));

        let storage = MemoryStorage::with_item(USER_KEY, "{broken");
        assert!(load(&storage).is_none());

        assert!(load(&MemoryStorage::new()).is_none());
    }

    #[test]
    fn test_has_role() {
        let session = Session::from_stored(Some(r#"{"role":"EXPERT"}"#)).unwrap();
        assert!(session.has_role(&[]));
        assert!(session.has_role(&[Role::TopManagement, Role::Expert]));
        assert!(!session.has_role(&[Role::TopManagement]));
    }
}
