//! Команда проекта.
//!
//! Состав команды видят все; назначать, менять роль и убирать участников
//! может только руководство, так как только ему доступен список пользователей.

use contracts::domain::a008_team_member::aggregate::{
    AssignMemberDto, TeamMemberView, UpdateMemberDto,
};
use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{
    Badge, BadgeAppearance, BadgeColor, Button, ButtonAppearance, ButtonSize, Flex, FlexGap, Input,
    Select, Spinner, Table, TableBody, TableCell, TableCellLayout, TableHeader, TableHeaderCell,
    TableRow,
};

use crate::domain::a008_team_member::api;
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::project_scope::WithProject;
use crate::system::users::api as users_api;

/// Users that can still join the team, sorted by name
pub fn assignable_users(users: &[UserInfo], team: &[TeamMemberView]) -> Vec<UserInfo> {
    let mut free: Vec<UserInfo> = users
        .iter()
        .filter(|u| !team.iter().any(|m| m.member.user_id == u.id))
        .cloned()
        .collect();
    free.sort_by_key(|u| u.full_name().to_lowercase());
    free
}

pub fn build_assignment(user_id: &str, project_role: &str) -> Result<AssignMemberDto, String> {
    if user_id.is_empty() {
        return Err("Veuillez choisir un utilisateur".into());
    }
    let project_role = project_role.trim();
    if project_role.is_empty() {
        return Err("Le rôle dans le projet est obligatoire".into());
    }
    Ok(AssignMemberDto {
        user_id: user_id.to_string(),
        project_role: project_role.to_string(),
    })
}

#[component]
pub fn TeamPage(manager: bool) -> impl IntoView {
    view! {
        <PageFrame page_id="a008_team_member--list" category=PAGE_CAT_LIST>
            <WithProject render=move |project_id| view! { <TeamList project_id=project_id manager=manager /> } />
        </PageFrame>
    }
}

#[component]
fn TeamList(project_id: String, manager: bool) -> impl IntoView {
    let (team, set_team) = signal(Vec::<TeamMemberView>::new());
    let (users, set_users) = signal(Vec::<UserInfo>::new());
    let (loading, set_loading) = signal(true);
    let (error, set_error) = signal(None::<String>);
    let new_user = RwSignal::new(String::new());
    let new_role = RwSignal::new(String::new());
    let project_id = StoredValue::new(project_id);

    let load = move || {
        let id = project_id.get_value();
        spawn_local(async move {
            set_loading.set(true);
            match api::fetch_team(&id).await {
                Ok(list) => {
                    set_error.set(None);
                    set_team.set(list);
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        load();
        if manager {
            spawn_local(async move {
                match users_api::fetch_users().await {
                    Ok(list) => set_users.set(list),
                    Err(e) => log::warn!("Unable to load users: {}", e),
                }
            });
        }
    });

    let candidates = move || team.with(|t| users.with(|u| assignable_users(u, t)));

    let assign = move |_| {
        let dto = match build_assignment(&new_user.get_untracked(), &new_role.get_untracked()) {
            Ok(dto) => dto,
            Err(e) => {
                set_error.set(Some(e));
                return;
            }
        };
        spawn_local(async move {
            match api::assign(&project_id.get_value(), &dto).await {
                Ok(_) => {
                    new_user.set(String::new());
                    new_role.set(String::new());
                    load();
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let unassign = move |user_id: String| {
        spawn_local(async move {
            match api::unassign(&project_id.get_value(), &user_id).await {
                Ok(()) => set_team.update(|t| t.retain(|m| m.member.user_id != user_id)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let rename_role = move |user_id: String, role: String| {
        let role = role.trim().to_string();
        if role.is_empty() {
            set_error.set(Some("Le rôle dans le projet est obligatoire".into()));
            return;
        }
        spawn_local(async move {
            let dto = UpdateMemberDto { project_role: role };
            match api::update_role(&project_id.get_value(), &user_id, &dto).await {
                Ok(member) => set_team.update(|t| {
                    if let Some(m) = t.iter_mut().find(|m| m.member.user_id == member.user_id) {
                        m.member = member;
                    }
                }),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="page__header">
            <div class="page__header-left">
                <h1 class="page__title">"Équipe du projet"</h1>
            </div>
        </div>

        <div class="page__content">
            {move || error.get().map(|err| view! { <div class="alert alert--error">{err}</div> })}

            <Show when=move || manager>
                <div class="form-card">
                    <Flex gap=FlexGap::Small>
                        <Select value=new_user>
                            <option value="">"Choisir un utilisateur"</option>
                            {move || {
                                candidates()
                                    .into_iter()
                                    .map(|u| {
                                        let label = format!("{} ({})", u.full_name(), u.role.display_name());
                                        view! { <option value=u.id>{label}</option> }
                                    })
                                    .collect_view()
                            }}
                        </Select>
                        <Input value=new_role placeholder="Rôle dans le projet" />
                        <Button appearance=ButtonAppearance::Primary on_click=assign>
                            {icon("plus")}
                            " Affecter"
                        </Button>
                    </Flex>
                </div>
            </Show>

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="page__loading"><Spinner /></div> }
            >
                <Show
                    when=move || !team.with(|t| t.is_empty())
                    fallback=|| view! { <div class="page__empty">"Aucun membre dans l'équipe"</div> }
                >
                    <Table>
                        <TableHeader>
                            <TableRow>
                                <TableHeaderCell>"Nom"</TableHeaderCell>
                                <TableHeaderCell>"Email"</TableHeaderCell>
                                <TableHeaderCell>"Profil"</TableHeaderCell>
                                <TableHeaderCell>"Rôle dans le projet"</TableHeaderCell>
                                <Show when=move || manager>
                                    <TableHeaderCell>""</TableHeaderCell>
                                </Show>
                            </TableRow>
                        </TableHeader>
                        <TableBody>
                            {move || {
                                team.get()
                                    .into_iter()
                                    .map(|m| {
                                        let user_id = StoredValue::new(m.member.user_id.clone());
                                        let role = RwSignal::new(m.member.project_role.clone());
                                        view! {
                                            <TableRow>
                                                <TableCell>
                                                    <TableCellLayout>{format!("{} {}", m.prenom, m.nom)}</TableCellLayout>
                                                </TableCell>
                                                <TableCell><TableCellLayout truncate=true>{m.email}</TableCellLayout></TableCell>
                                                <TableCell>
                                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Informative>
                                                        {m.role.display_name()}
                                                    </Badge>
                                                </TableCell>
                                                <TableCell>
                                                    <Show
                                                        when=move || manager
                                                        fallback=move || view! { <span>{role.get_untracked()}</span> }
                                                    >
                                                        <Input value=role />
                                                    </Show>
                                                </TableCell>
                                                <Show when=move || manager>
                                                    <TableCell>
                                                        <Flex gap=FlexGap::Small>
                                                            <Button
                                                                size=ButtonSize::Small
                                                                on_click=move |_| rename_role(user_id.get_value(), role.get_untracked())
                                                            >
                                                                {icon("check")}
                                                            </Button>
                                                            <Button
                                                                size=ButtonSize::Small
                                                                on_click=move |_| unassign(user_id.get_value())
                                                            >
                                                                {icon("trash")}
                                                            </Button>
                                                        </Flex>
                                                    </TableCell>
                                                </Show>
                                            </TableRow>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </TableBody>
                    </Table>
                </Show>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_project::aggregate::ProjectId;
    use contracts::domain::a008_team_member::aggregate::TeamMember;
    use contracts::system::auth::{AccountStatus, Role};

    fn user(id: &str, prenom: &str) -> UserInfo {
        UserInfo {
            id: id.into(),
            nom: "Benali".into(),
            prenom: prenom.into(),
            email: format!("{}@petro.dz", id),
            role: Role::IngenieurTerrain,
            date_creation: "2024-01-01T00:00:00Z".into(),
            statut: AccountStatus::Active,
        }
    }

    fn member(user_id: &str) -> TeamMemberView {
        let dto = AssignMemberDto {
            user_id: user_id.into(),
            project_role: "Chef de chantier".into(),
        };
        TeamMemberView {
            member: TeamMember::new_for_insert(ProjectId::new_v4(), &dto, "boss"),
            nom: "Benali".into(),
            prenom: "x".into(),
            email: String::new(),
            role: Role::IngenieurTerrain,
        }
    }

    #[test]
    fn test_assignable_users_skips_members_and_sorts() {
        let users = vec![user("3", "Yacine"), user("1", "Amine"), user("2", "Karim")];
        let team = vec![member("2")];
        let ids: Vec<_> = assignable_users(&users, &team).into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_build_assignment() {
        assert!(build_assignment("", "Foreur").is_err());
        assert_eq!(
            build_assignment("5", "   ").unwrap_err(),
            "Le rôle dans le projet est obligatoire"
        );
        let dto = build_assignment("5", " Foreur ").unwrap();
        assert_eq!(dto.user_id, "5");
        assert_eq!(dto.project_role, "Foreur");
    }
}
