//! Password recovery screen.
//!
//! The server has no reset endpoint yet; the request is only acknowledged.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::auth::guard::SIGN_IN_PATH;

const ACKNOWLEDGE_DELAY_MS: u32 = 1_000;

pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (submitted, set_submitted) = signal(false);
    let (is_loading, set_is_loading) = signal(false);
    let (error_message, set_error_message) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !looks_like_email(&email.get_untracked()) {
            set_error_message.set(Some("Adresse email invalide".to_string()));
            return;
        }
        set_error_message.set(None);
        set_is_loading.set(true);
        spawn_local(async move {
            TimeoutFuture::new(ACKNOWLEDGE_DELAY_MS).await;
            log::info!("Password recovery requested for {}", email.get_untracked().trim());
            set_is_loading.set(false);
            set_submitted.set(true);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"PetroMonitore"</h1>
                <h2>"Mot de passe oublié"</h2>

                <Show
                    when=move || submitted.get()
                    fallback=move || view! {
                        <p class="login-info">
                            "Saisissez votre adresse email, un lien de réinitialisation vous sera envoyé."
                        </p>

                        <Show when=move || error_message.get().is_some()>
                            <div class="error-message">
                                {move || error_message.get().unwrap_or_default()}
                            </div>
                        </Show>

                        <form on:submit=on_submit>
                            <div class="form-group">
                                <label for="email">"Email"</label>
                                <input
                                    type="email"
                                    id="email"
                                    value=move || email.get()
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    required
                                    disabled=move || is_loading.get()
                                />
                            </div>
                            <button type="submit" class="btn-primary" disabled=move || is_loading.get()>
                                {move || if is_loading.get() { "Envoi..." } else { "Envoyer le lien" }}
                            </button>
                        </form>
                    }
                >
                    <div class="success-message">
                        {move || format!("Si un compte existe pour {}, un email de réinitialisation a été envoyé.", email.get().trim())}
                    </div>
                </Show>

                <div class="login-info">
                    <a href=SIGN_IN_PATH>"Retour à la connexion"</a>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("karim@sonatrach.dz"));
        assert!(looks_like_email("  a.b@petro.co.dz "));
        assert!(!looks_like_email("karim"));
        assert!(!looks_like_email("@petro.dz"));
        assert!(!looks_like_email("karim@petro"));
        assert!(!looks_like_email("karim@petro."));
    }
}
