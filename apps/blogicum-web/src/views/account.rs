//! Profile pages and the authentication forms.

use blogicum_core::Page;
use blogicum_core::domain::{PostView, User};
use blogicum_shared::{FormErrors, LoginForm, ProfileForm, RegistrationForm};
use maud::{Markup, html};

use super::{field_errors, format_date, layout, non_field_errors, posts};
use crate::middleware::auth::Identity;
use crate::urls;

pub fn profile(viewer: Option<&Identity>, user: &User, page: &Page<PostView>) -> Markup {
    let is_owner = viewer.is_some_and(|v| v.user_id == user.id);
    layout(
        &user.username,
        viewer,
        html! {
            div class="card" {
                h1 { (user.display_name()) }
                p class="meta" {
                    "@" (user.username) " · joined " (format_date(user.date_joined))
                }
                @if is_owner {
                    p {
                        a href="/profile/edit/" { "Edit profile" }
                        " · "
                        a href="/posts/create/" { "New post" }
                    }
                }
            }
            h2 { "Posts" }
            (posts::post_list(page, &urls::profile(&user.username)))
        },
    )
}

pub fn edit_profile(viewer: Option<&Identity>, form: &ProfileForm, errors: &FormErrors) -> Markup {
    layout(
        "Edit profile",
        viewer,
        html! {
            h1 { "Edit profile" }
            form class="stacked card" method="post" action="/profile/edit/" {
                (non_field_errors(errors))

                label for="id_username" { "Username" }
                input id="id_username" type="text" name="username" maxlength="150" value=(form.username);
                (field_errors(errors, "username"))

                label for="id_first_name" { "First name" }
                input id="id_first_name" type="text" name="first_name" maxlength="150" value=(form.first_name);
                (field_errors(errors, "first_name"))

                label for="id_last_name" { "Last name" }
                input id="id_last_name" type="text" name="last_name" maxlength="150" value=(form.last_name);
                (field_errors(errors, "last_name"))

                label for="id_email" { "Email" }
                input id="id_email" type="email" name="email" value=(form.email);
                (field_errors(errors, "email"))

                button type="submit" { "Save" }
            }
        },
    )
}

pub fn login(action: &str, form: &LoginForm, errors: &FormErrors) -> Markup {
    layout(
        "Log in",
        None,
        html! {
            h1 { "Log in" }
            form class="stacked card" method="post" action=(action) {
                (non_field_errors(errors))

                label for="id_username" { "Username" }
                input id="id_username" type="text" name="username" autofocus value=(form.username);
                (field_errors(errors, "username"))

                label for="id_password" { "Password" }
                input id="id_password" type="password" name="password";
                (field_errors(errors, "password"))

                button type="submit" { "Log in" }
            }
            p class="meta" {
                "No account yet? " a href="/auth/registration/" { "Sign up" }
            }
        },
    )
}

pub fn registration(form: &RegistrationForm, errors: &FormErrors) -> Markup {
    layout(
        "Sign up",
        None,
        html! {
            h1 { "Sign up" }
            form class="stacked card" method="post" action="/auth/registration/" {
                (non_field_errors(errors))

                label for="id_username" { "Username" }
                input id="id_username" type="text" name="username" maxlength="150" value=(form.username);
                (field_errors(errors, "username"))

                label for="id_email" { "Email" }
                input id="id_email" type="email" name="email" value=(form.email);
                (field_errors(errors, "email"))

                label for="id_password1" { "Password" }
                input id="id_password1" type="password" name="password1";
                (field_errors(errors, "password1"))

                label for="id_password2" { "Password confirmation" }
                input id="id_password2" type="password" name="password2";
                (field_errors(errors, "password2"))

                button type="submit" { "Sign up" }
            }
        },
    )
}
