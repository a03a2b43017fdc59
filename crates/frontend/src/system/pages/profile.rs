//! Profile of the signed-in user: identity edit and password change.

use contracts::system::auth::UserInfo;
use contracts::system::users::{ChangePasswordDto, UpdateUserDto};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Badge, BadgeAppearance, BadgeColor, Button, ButtonAppearance, Input, InputType, Spinner};

use crate::shared::page_frame::{PageFrame, PAGE_CAT_SYSTEM};
use crate::system::auth::{api, context::use_session};
use crate::system::users::api as users_api;

pub fn password_change(old: &str, new: &str, confirm: &str) -> Result<ChangePasswordDto, String> {
    if old.is_empty() {
        return Err("Saisissez votre mot de passe actuel".into());
    }
    if new.trim().is_empty() {
        return Err("Le nouveau mot de passe ne peut pas être vide".into());
    }
    if new != confirm {
        return Err("Les mots de passe ne correspondent pas".into());
    }
    if new == old {
        return Err("Le nouveau mot de passe doit être différent de l'actuel".into());
    }
    Ok(ChangePasswordDto {
        old_password: old.to_string(),
        new_password: new.to_string(),
    })
}

/// Identity edit; role and status stay as they are
pub fn identity_update(user: &UserInfo, nom: &str, prenom: &str, email: &str) -> Result<UpdateUserDto, String> {
    let (nom, prenom, email) = (nom.trim(), prenom.trim(), email.trim());
    if nom.is_empty() || prenom.is_empty() {
        return Err("Le nom et le prénom sont obligatoires".into());
    }
    if !email.contains('@') {
        return Err("Adresse email invalide".into());
    }
    Ok(UpdateUserDto {
        id: user.id.clone(),
        nom: nom.to_string(),
        prenom: prenom.to_string(),
        email: email.to_string(),
        role: None,
        statut: None,
    })
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();
    let (user, set_user) = signal(None::<UserInfo>);
    let (error, set_error) = signal(None::<String>);
    let (notice, set_notice) = signal(None::<String>);

    let nom = RwSignal::new(String::new());
    let prenom = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());

    let show_user = move |info: UserInfo| {
        nom.set(info.nom.clone());
        prenom.set(info.prenom.clone());
        email.set(info.email.clone());
        set_user.set(Some(info));
    };

    Effect::new(move |_| {
        let Some(token) = session.access_token.get() else {
            return;
        };
        spawn_local(async move {
            match api::get_current_user(&token).await {
                Ok(info) => show_user(info),
                Err(e) => set_error.set(Some(e.to_string())),
            }
        });
    });

    let save_identity = move |_| {
        let Some(current) = user.get_untracked() else {
            return;
        };
        let dto = match identity_update(
            &current,
            &nom.get_untracked(),
            &prenom.get_untracked(),
            &email.get_untracked(),
        ) {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        spawn_local(async move {
            match users_api::update_user(&dto).await {
                Ok(info) => {
                    session.refresh_user(&info);
                    show_user(info);
                    set_error.set(None);
                    set_notice.set(Some("Profil mis à jour".into()));
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let save_password = move |_| {
        let dto = match password_change(
            &old_password.get_untracked(),
            &new_password.get_untracked(),
            &confirm_password.get_untracked(),
        ) {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => {
                    old_password.set(String::new());
                    new_password.set(String::new());
                    confirm_password.set(String::new());
                    set_error.set(None);
                    set_notice.set(Some("Mot de passe modifié".into()));
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <PageFrame page_id="sys_profile--detail" category=PAGE_CAT_SYSTEM>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Mon profil"</h1>
                </div>
            </div>

            <div class="page__content">
                {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}
                {move || notice.get().map(|msg| view! { <div class="alert alert--success">{msg}</div> })}

                <Show
                    when=move || user.with(|u| u.is_some())
                    fallback=|| view! { <div class="page__loading"><Spinner /></div> }
                >
                    <div class="form-card">
                        <div class="profile__summary">
                            <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                                {move || user.with(|u| u.as_ref().map(|u| u.role.display_name()).unwrap_or_default())}
                            </Badge>
                            <span class="profile__since">
                                {move || {
                                    user.with(|u| {
                                        u.as_ref()
                                            .map(|u| format!("Compte créé le {}", u.date_creation.get(..10).unwrap_or(&u.date_creation)))
                                            .unwrap_or_default()
                                    })
                                }}
                            </span>
                        </div>

                        <div class="form-field">
                            <label>"Prénom"</label>
                            <Input value=prenom />
                        </div>
                        <div class="form-field">
                            <label>"Nom"</label>
                            <Input value=nom />
                        </div>
                        <div class="form-field">
                            <label>"Email"</label>
                            <Input value=email input_type=InputType::Email />
                        </div>
                        <Button appearance=ButtonAppearance::Primary on_click=save_identity>
                            "Enregistrer"
                        </Button>
                    </div>

                    <div class="form-card">
                        <h3 class="section__title">"Changer le mot de passe"</h3>
                        <div class="form-field">
                            <label>"Mot de passe actuel"</label>
                            <Input value=old_password input_type=InputType::Password />
                        </div>
                        <div class="form-field">
                            <label>"Nouveau mot de passe"</label>
                            <Input value=new_password input_type=InputType::Password />
                        </div>
                        <div class="form-field">
                            <label>"Confirmation"</label>
                            <Input value=confirm_password input_type=InputType::Password />
                        </div>
                        <Button appearance=ButtonAppearance::Primary on_click=save_password>
                            "Modifier le mot de passe"
                        </Button>
                    </div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::auth::{AccountStatus, Role};

    #[test]
    fn test_password_change_checks() {
        assert!(password_change("", "abcdefgh", "abcdefgh").is_err());
        assert_eq!(
            password_change("old", "abcdefgh", "abcdefgx").unwrap_err(),
            "Les mots de passe ne correspondent pas"
        );
        assert!(password_change("same", "same", "same").is_err());
        let dto = password_change("old", "nouveau1", "nouveau1").unwrap();
        assert_eq!(dto.new_password, "nouveau1");
    }

    #[test]
    fn test_identity_update_keeps_role_untouched() {
        let user = UserInfo {
            id: "7".into(),
            nom: "Haddad".into(),
            prenom: "Sami".into(),
            email: "sami@petro.dz".into(),
            role: Role::Expert,
            date_creation: "2024-03-01T09:00:00Z".into(),
            statut: AccountStatus::Active,
        };
        let dto = identity_update(&user, " Haddad ", "Samir", "samir@petro.dz").unwrap();
        assert_eq!(dto.id, "7");
        assert_eq!(dto.prenom, "Samir");
        assert_eq!(dto.role, None);
        assert_eq!(dto.statut, None);
        assert!(identity_update(&user, "", "x", "a@b.dz").is_err());
        assert!(identity_update(&user, "a", "b", "nope").is_err());
    }
}
