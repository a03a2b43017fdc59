use serde::{Deserialize, Serialize};

use super::auth::{AccountStatus, Role, UserInfo};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub role: Role,
    pub statut: AccountStatus,
    pub date_creation: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub created_by: Option<String>,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        UserInfo {
            id: u.id,
            nom: u.nom,
            prenom: u.prenom,
            email: u.email,
            role: u.role,
            date_creation: u.date_creation,
            statut: u.statut,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    #[serde(default)]
    pub id: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    /// Ignored unless the requester is top management
    pub role: Option<Role>,
    pub statut: Option<AccountStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub old_password: String,
    pub new_password: String,
}
