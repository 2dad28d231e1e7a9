// ABOUTME: Sign-up, code verification and login forms
// ABOUTME: Forms re-render with the submitted values and an error banner on failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use super::helpers::attr;
use super::layout::{page, Flash};

/// Registration form
#[must_use]
pub fn register_page(full_name: &str, email: &str, flash: &Flash) -> String {
    let body = format!(
        r#"<div class="row justify-content-center"><div class="col-md-6 col-lg-5">
<h1 class="h3 fw-bold mb-4">Create your account</h1>
{flash}
<form method="post" action="/auth/register">
<div class="mb-3"><label class="form-label" for="full_name">Full name</label>
<input class="form-control" id="full_name" name="full_name" value="{full_name}" required maxlength="100"></div>
<div class="mb-3"><label class="form-label" for="email">Email</label>
<input class="form-control" id="email" name="email" type="email" value="{email}" required></div>
<div class="mb-3"><label class="form-label" for="password">Password</label>
<input class="form-control" id="password" name="password" type="password" required minlength="8">
<div class="form-text">At least 8 characters with a letter and a digit.</div></div>
<div class="mb-3"><label class="form-label" for="confirm_password">Confirm password</label>
<input class="form-control" id="confirm_password" name="confirm_password" type="password" required></div>
<button class="btn btn-primary w-100" type="submit">Sign up</button>
</form>
<p class="mt-3 text-center">Already have an account? <a href="/auth/login">Log in</a></p>
</div></div>"#,
        flash = flash.render(),
        full_name = attr(full_name),
        email = attr(email),
    );
    page("Sign up", None, &body)
}

/// Code entry form after registration or an unverified login
#[must_use]
pub fn verify_page(email: &str, flash: &Flash) -> String {
    let body = format!(
        r#"<div class="row justify-content-center"><div class="col-md-6 col-lg-5">
<h1 class="h3 fw-bold mb-2">Verify your email</h1>
<p class="text-muted">We sent a 6-digit code to <strong>{email}</strong>. It expires in 5 minutes.</p>
{flash}
<form method="post" action="/auth/verify">
<input type="hidden" name="email" value="{email}">
<div class="mb-3"><label class="form-label" for="code">Verification code</label>
<input class="form-control form-control-lg text-center" id="code" name="code" inputmode="numeric" pattern="[0-9]{{6}}" maxlength="6" required autofocus></div>
<button class="btn btn-primary w-100" type="submit">Verify</button>
</form>
<form method="post" action="/auth/resend-otp" class="mt-3 text-center">
<input type="hidden" name="email" value="{email}">
<button class="btn btn-link" type="submit">Send a new code</button>
</form>
</div></div>"#,
        email = attr(email),
        flash = flash.render(),
    );
    page("Verify email", None, &body)
}

/// Login form
#[must_use]
pub fn login_page(email: &str, return_to: Option<&str>, google_enabled: bool, flash: &Flash) -> String {
    let return_field = return_to.map_or_else(String::new, |path| {
        format!(r#"<input type="hidden" name="return_to" value="{}">"#, attr(path))
    });
    let google = if google_enabled {
        r#"<div class="text-center my-3 text-muted small">or</div>
<a class="btn btn-outline-dark w-100" href="/auth/google"><i class="bi bi-google me-2"></i>Continue with Google</a>"#
    } else {
        ""
    };
    let body = format!(
        r#"<div class="row justify-content-center"><div class="col-md-6 col-lg-5">
<h1 class="h3 fw-bold mb-4">Log in</h1>
{flash}
<form method="post" action="/auth/login">
{return_field}
<div class="mb-3"><label class="form-label" for="email">Email</label>
<input class="form-control" id="email" name="email" type="email" value="{email}" required></div>
<div class="mb-3"><label class="form-label" for="password">Password</label>
<input class="form-control" id="password" name="password" type="password" required></div>
<button class="btn btn-primary w-100" type="submit">Log in</button>
</form>
{google}
<p class="mt-3 text-center">New here? <a href="/auth/register">Create an account</a></p>
</div></div>"#,
        flash = flash.render(),
        email = attr(email),
    );
    page("Log in", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_page_keeps_values_and_error() {
        let html = register_page("Lan \"N\"", "lan@example.com", &Flash::error("Email already registered"));
        assert!(html.contains("Lan &quot;N&quot;"));
        assert!(html.contains("lan@example.com"));
        assert!(html.contains("Email already registered"));
    }

    #[test]
    fn test_login_page_return_to_and_google() {
        let html = login_page("", Some("/learn/3"), true, &Flash::default());
        assert!(html.contains(r#"name="return_to" value="/learn/3""#));
        assert!(html.contains("/auth/google"));
        let plain = login_page("", None, false, &Flash::default());
        assert!(!plain.contains("return_to"));
        assert!(!plain.contains("/auth/google"));
    }
}
