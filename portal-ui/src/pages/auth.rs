//! Login and registration screens

use leptos::*;

use portal::forms::{LoginForm, RegistrationForm};
use portal::model::Role;
use portal::Page;

use crate::components::{SelectInput, SubmitButton, TextInput};
use crate::state::global::{log_failure, GlobalState};

fn switch_page(state: GlobalState, page: Page) {
    state.dispatch(move |d| {
        Box::pin(async move {
            log_failure("show page", d.show_page(page));
        })
    });
}

#[component]
pub fn Login() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm {
            username: username.get(),
            password: password.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("login", d.login(&form).await);
            })
        });
    };

    view! {
        <AuthCard title="Sign in">
            <form on:submit=on_submit class="space-y-4">
                <TextInput label="Username" value=username />
                <TextInput label="Password" value=password kind="password" />
                <SubmitButton label="Login" />
            </form>
            <p class="text-sm text-gray-400 mt-4">
                "No account yet? "
                <button
                    class="text-primary-400 hover:underline"
                    on:click=move |_| switch_page(state, Page::Register)
                >
                    "Register"
                </button>
            </p>
        </AuthCard>
    }
}

#[component]
pub fn Register() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let username = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let first_name = create_rw_signal(String::new());
    let last_name = create_rw_signal(String::new());
    let role = create_rw_signal(Role::Student.as_str().to_string());
    let crn = create_rw_signal(String::new());
    let title = create_rw_signal(String::new());

    let roles = Signal::derive(|| {
        vec![
            ("student".to_string(), "Student".to_string()),
            ("faculty".to_string(), "Faculty".to_string()),
        ]
    });
    let is_faculty = move || Role::parse(&role.get()) == Some(Role::Faculty);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = RegistrationForm {
            username: username.get(),
            email: email.get(),
            password: password.get(),
            first_name: first_name.get(),
            last_name: last_name.get(),
            role: role.get(),
            crn: crn.get(),
            title: title.get(),
        };
        state.dispatch(move |d| {
            Box::pin(async move {
                log_failure("register", d.register(&form).await);
            })
        });
    };

    view! {
        <AuthCard title="Create an account">
            <form on:submit=on_submit class="space-y-4">
                <TextInput label="Username" value=username />
                <TextInput label="Email" value=email kind="email" />
                <TextInput label="Password" value=password kind="password" />
                <div class="grid grid-cols-2 gap-4">
                    <TextInput label="First name" value=first_name />
                    <TextInput label="Last name" value=last_name />
                </div>
                <SelectInput label="Role" value=role options=roles />
                // Students register under a section, faculty give a title
                {move || if is_faculty() {
                    view! { <TextInput label="Title" value=title placeholder="Professor" /> }.into_view()
                } else {
                    view! { <TextInput label="CRN" value=crn placeholder="Course section code" /> }.into_view()
                }}
                <SubmitButton label="Register" />
            </form>
            <p class="text-sm text-gray-400 mt-4">
                "Already registered? "
                <button
                    class="text-primary-400 hover:underline"
                    on:click=move |_| switch_page(state, Page::Login)
                >
                    "Login"
                </button>
            </p>
        </AuthCard>
    }
}

#[component]
fn AuthCard(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen px-4">
            <div class="bg-gray-800 rounded-xl p-8 w-full max-w-md">
                <div class="flex items-center space-x-3 mb-6">
                    <span class="text-3xl">"🎓"</span>
                    <h1 class="text-2xl font-bold">{title}</h1>
                </div>
                {children()}
            </div>
        </div>
    }
}
