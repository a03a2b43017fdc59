use std::sync::Arc;

use contracts::system::auth::{LoginResponse, Role, UserInfo};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::session::{self, Session};
use super::storage::{self, SessionStorage, ACCESS_TOKEN_KEY, SELECTED_PROJECT_KEY, USER_KEY};
use super::api;

/// Session state shared with the routing layer.
///
/// Storage is the source of truth; the signals mirror it so views re-render
/// when the user signs in or out, in this window or another one.
#[derive(Clone, Copy)]
pub struct SessionContext {
    pub session: RwSignal<Option<Session>>,
    pub access_token: RwSignal<Option<String>>,
    pub selected_project: RwSignal<Option<String>>,
    storage: StoredValue<Arc<dyn SessionStorage>>,
}

impl SessionContext {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let ctx = Self {
            session: RwSignal::new(None),
            access_token: RwSignal::new(None),
            selected_project: RwSignal::new(None),
            storage: StoredValue::new(storage),
        };
        ctx.reload();
        ctx
    }

    /// Re-reads storage and updates the signals that changed
    pub fn reload(&self) {
        let (current, token, project) = self.storage.with_value(|s| {
            (
                session::load(s.as_ref()),
                storage::access_token(s.as_ref()),
                s.get_item(SELECTED_PROJECT_KEY).filter(|p| !p.is_empty()),
            )
        });

        if self.session.get_untracked() != current {
            self.session.set(current);
        }
        if self.access_token.get_untracked() != token {
            self.access_token.set(token);
        }
        if self.selected_project.get_untracked() != project {
            self.selected_project.set(project);
        }
    }

    pub fn sign_in(&self, response: &LoginResponse) {
        self.storage.with_value(|s| {
            storage::write_user(s.as_ref(), &response.user);
            storage::write_tokens(s.as_ref(), &response.access_token, &response.refresh_token);
            s.remove_item(SELECTED_PROJECT_KEY);
        });
        log::info!("Signed in as {} ({})", response.user.email, response.user.role);
        self.reload();
    }

    /// Rewrites the stored user after a profile edit; tokens are kept
    pub fn refresh_user(&self, user: &UserInfo) {
        self.storage.with_value(|s| storage::write_user(s.as_ref(), user));
        self.reload();
    }

    /// Drops every stored session key and resets the signals
    pub fn clear(&self) {
        self.storage.with_value(|s| storage::clear_session(s.as_ref()));
        self.reload();
    }

    /// Clears the local session and revokes the refresh token in the background
    pub fn sign_out(&self) {
        let refresh = self.storage.with_value(|s| storage::refresh_token(s.as_ref()));
        self.clear();
        if let Some(refresh) = refresh {
            spawn_local(async move {
                if let Err(e) = api::logout(refresh).await {
                    log::warn!("Logout request failed: {}", e);
                }
            });
        }
    }

    pub fn select_project(&self, project_id: &str) {
        self.storage
            .with_value(|s| s.set_item(SELECTED_PROJECT_KEY, project_id));
        self.selected_project.set(Some(project_id.to_string()));
    }

    pub fn role(&self) -> Option<Role> {
        self.session.with(|s| s.as_ref().map(|s| s.role))
    }

    /// Checks the stored access token against the server, refreshing it once
    /// when it has expired. The session is dropped only when the server
    /// refuses it; an unreachable or failing server leaves it in place.
    pub fn revalidate(&self) {
        let ctx = *self;
        let Some(token) = ctx.access_token.get_untracked() else {
            return;
        };
        spawn_local(async move {
            match api::get_current_user(&token).await {
                Ok(_) => return,
                Err(e) if !e.drops_session() => {
                    log::warn!("Session kept, token not checked: {}", e);
                    return;
                }
                Err(_) => {}
            }
            let refresh = ctx.storage.with_value(|s| storage::refresh_token(s.as_ref()));
            let Some(refresh) = refresh else {
                ctx.clear();
                return;
            };
            match api::refresh_token(refresh).await {
                Ok(response) => {
                    ctx.storage
                        .with_value(|s| s.set_item(ACCESS_TOKEN_KEY, &response.access_token));
                    ctx.reload();
                }
                Err(e) if e.drops_session() => {
                    log::warn!("Session could not be renewed: {}", e);
                    ctx.clear();
                }
                Err(e) => log::warn!("Session kept, refresh unavailable: {}", e),
            }
        });
    }

    /// Follows sign-in and sign-out performed in other windows
    pub fn listen_cross_window(&self) {
        let ctx = *self;
        let _ = window_event_listener(leptos::ev::storage, move |ev| {
            if is_session_key(ev.key().as_deref()) {
                ctx.reload();
            }
        });
    }
}

/// Storage events that can change the session; `None` is a full `clear()`
fn is_session_key(key: Option<&str>) -> bool {
    match key {
        None => true,
        Some(key) => key == USER_KEY || key == ACCESS_TOKEN_KEY || key == SELECTED_PROJECT_KEY,
    }
}

/// Provides the session context at the application root
pub fn provide_session(storage: Arc<dyn SessionStorage>) -> SessionContext {
    let ctx = SessionContext::new(storage);
    provide_context(ctx);
    ctx
}

/// Hook to access the session context
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext not found in component tree")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::auth::storage::{MemoryStorage, REFRESH_TOKEN_KEY};
    use contracts::system::auth::AccountStatus;

    fn response(role: Role) -> LoginResponse {
        LoginResponse {
            access_token: "access-1".into(),
            refresh_token: "refresh-1".into(),
            user: UserInfo {
                id: "u1".into(),
                nom: "Meziane".into(),
                prenom: "Lina".into(),
                email: "lina@petro.dz".into(),
                role,
                date_creation: "2024-02-02T10:00:00Z".into(),
                statut: AccountStatus::Active,
            },
        }
    }

    #[test]
    fn test_sign_in_persists_and_updates_signals() {
        let owner = Owner::new();
        owner.with(|| {
            let storage = Arc::new(MemoryStorage::new());
            let ctx = SessionContext::new(storage.clone());
            assert!(ctx.session.get_untracked().is_none());

            ctx.sign_in(&response(Role::Expert));

            let session = ctx.session.get_untracked().unwrap();
            assert_eq!(session.role, Role::Expert);
            assert_eq!(session.name, "Lina Meziane");
            assert_eq!(ctx.access_token.get_untracked().as_deref(), Some("access-1"));
            assert_eq!(storage.get_item(REFRESH_TOKEN_KEY).as_deref(), Some("refresh-1"));
            assert_eq!(session::load(storage.as_ref()), Some(session));
        });
    }

    #[test]
    fn test_clear_drops_everything() {
        let owner = Owner::new();
        owner.with(|| {
            let storage = Arc::new(MemoryStorage::new());
            let ctx = SessionContext::new(storage.clone());
            ctx.sign_in(&response(Role::TopManagement));
            ctx.select_project("p-9");
            assert_eq!(ctx.selected_project.get_untracked().as_deref(), Some("p-9"));

            ctx.clear();

            assert!(ctx.session.get_untracked().is_none());
            assert!(ctx.access_token.get_untracked().is_none());
            assert!(ctx.selected_project.get_untracked().is_none());
            assert!(storage.get_item(USER_KEY).is_none());
        });
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let owner = Owner::new();
        owner.with(|| {
            let storage = Arc::new(MemoryStorage::new());
            let ctx = SessionContext::new(storage.clone());

            // another window signs in
            storage.set_item(USER_KEY, r#"{"id":"3","role":"INGENIEUR_TERRAIN"}"#);
            ctx.reload();
            assert_eq!(
                ctx.session.get_untracked().map(|s| s.role),
                Some(Role::IngenieurTerrain)
            );

            // and then writes garbage
            storage.set_item(USER_KEY, "garbage");
            ctx.reload();
            assert!(ctx.session.get_untracked().is_none());
        });
    }

    #[test]
    fn test_session_keys() {
        assert!(is_session_key(None));
        assert!(is_session_key(Some("utilisateur")));
        assert!(is_session_key(Some("auth_access_token")));
        assert!(is_session_key(Some("selected_project")));
        assert!(!is_session_key(Some("auth_refresh_token")));
        assert!(!is_session_key(Some("theme")));
    }
}
