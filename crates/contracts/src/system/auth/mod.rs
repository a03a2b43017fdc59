use serde::{Deserialize, Serialize};

/// Application role. Wire codes are exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "TOP_MANAGEMENT")]
    TopManagement,
    #[serde(rename = "EXPERT")]
    Expert,
    #[serde(rename = "INGENIEUR_TERRAIN")]
    IngenieurTerrain,
}

impl Role {
    pub fn code(&self) -> &'static str {
        match self {
            Role::TopManagement => "TOP_MANAGEMENT",
            Role::Expert => "EXPERT",
            Role::IngenieurTerrain => "INGENIEUR_TERRAIN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::TopManagement => "Top Management",
            Role::Expert => "Expert",
            Role::IngenieurTerrain => "Ingénieur terrain",
        }
    }

    pub fn all() -> Vec<Role> {
        vec![Role::TopManagement, Role::Expert, Role::IngenieurTerrain]
    }

    /// Strict parse: "expert" or " EXPERT" are not roles.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TOP_MANAGEMENT" => Some(Role::TopManagement),
            "EXPERT" => Some(Role::Expert),
            "INGENIEUR_TERRAIN" => Some(Role::IngenieurTerrain),
            _ => None,
        }
    }

    /// Landing page after sign-in
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::TopManagement => "/choose-project/manager",
            Role::Expert => "/choose-project",
            Role::IngenieurTerrain => "/reports/ingenieur",
        }
    }

    /// Roles allowed to change project data (projects, phases, operations, team)
    pub fn can_edit_projects(&self) -> bool {
        matches!(self, Role::TopManagement | Role::Expert)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Account state. Only `ACTIF` accounts may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[serde(rename = "ACTIF")]
    #[default]
    Active,
    #[serde(rename = "INACTIF")]
    Inactive,
    #[serde(rename = "SUSPENDU")]
    Suspended,
}

impl AccountStatus {
    pub fn code(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIF",
            AccountStatus::Inactive => "INACTIF",
            AccountStatus::Suspended => "SUSPENDU",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ACTIF" => Some(AccountStatus::Active),
            "INACTIF" => Some(AccountStatus::Inactive),
            "SUSPENDU" => Some(AccountStatus::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub mot_de_passe: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Signed-in user as returned by the API and persisted client-side
/// under the `utilisateur` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub role: Role,
    pub date_creation: String,
    pub statut: AccountStatus,
}

impl UserInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes_are_case_sensitive() {
        for role in Role::all() {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("expert"), None);
        assert_eq!(Role::from_code("Top_Management"), None);
        assert_eq!(Role::from_code(""), None);
    }

    #[test]
    fn test_user_info_persisted_shape() {
        let raw = r#"{
            "id": "42",
            "nom": "Benali",
            "prenom": "Sara",
            "email": "sara@petro.dz",
            "role": "INGENIEUR_TERRAIN",
            "date_creation": "2024-05-01T08:00:00Z",
            "statut": "ACTIF"
        }"#;
        let user: UserInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(user.role, Role::IngenieurTerrain);
        assert_eq!(user.statut, AccountStatus::Active);
        assert_eq!(user.full_name(), "Sara Benali");
    }

    #[test]
    fn test_unknown_role_is_rejected_by_serde() {
        let raw = r#"{"id":"1","nom":"a","prenom":"b","email":"c","role":"ADMIN","date_creation":"","statut":"ACTIF"}"#;
        assert!(serde_json::from_str::<UserInfo>(raw).is_err());
    }

    #[test]
    fn test_login_request_uses_french_password_field() {
        let req = LoginRequest {
            email: "a@b.c".into(),
            mot_de_passe: "secret".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["mot_de_passe"], "secret");
    }
}
