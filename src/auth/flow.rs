use crate::auth::validation::{FormValidator, ResetForm, SigninForm, SignupForm};
use crate::client::{SwaraClient, Transport};
use crate::error::AuthError;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::ui::control::ActionControl;
use tracing::{info, warn};

/// What the page does after a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSuccess {
    pub message: String,
    pub redirect: Option<&'static str>,
}

/// Drives the sign-up, sign-in and reset-password forms against the backend
pub struct AuthFlow<'a, T: Transport> {
    client: &'a SwaraClient<T>,
    pub signup_button: ActionControl,
    pub signin_button: ActionControl,
    pub reset_button: ActionControl,
}

impl<'a, T: Transport> AuthFlow<'a, T> {
    pub fn new(client: &'a SwaraClient<T>) -> Self {
        Self {
            client,
            signup_button: ActionControl::new("Create Account", "Creating..."),
            signin_button: ActionControl::new("Sign In", "Signing in..."),
            reset_button: ActionControl::new("Send Reset Link", "Sending..."),
        }
    }

    pub fn signup(&mut self, form: &SignupForm) -> Result<AuthSuccess, AuthError> {
        let errors = FormValidator::validate_signup(form);
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        let _busy = self.signup_button.begin().ok_or(AuthError::Busy)?;
        let response = self
            .client
            .register(&RegisterRequest {
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            })
            .map_err(network)?;

        let response = accepted(response, "Registration failed. Please try again.")?;
        info!(username = form.username.trim(), "Account created");
        Ok(AuthSuccess {
            message: response
                .message
                .unwrap_or_else(|| "Registration successful! Redirecting to sign in...".to_string()),
            redirect: Some("/signin"),
        })
    }

    pub fn signin(&mut self, form: &SigninForm) -> Result<AuthSuccess, AuthError> {
        let errors = FormValidator::validate_signin(form);
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        let _busy = self.signin_button.begin().ok_or(AuthError::Busy)?;
        let response = self
            .client
            .login(&LoginRequest {
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            })
            .map_err(network)?;

        let response = accepted(response, "Invalid email or password")?;
        info!(email = form.email.trim(), "Signed in");
        Ok(AuthSuccess {
            message: response.message.unwrap_or_else(|| "Login successful!".to_string()),
            redirect: Some("/dashboard"),
        })
    }

    pub fn reset_password(&mut self, form: &ResetForm) -> Result<AuthSuccess, AuthError> {
        let errors = FormValidator::validate_reset(form);
        if !errors.is_empty() {
            return Err(AuthError::Invalid(errors));
        }

        let _busy = self.reset_button.begin().ok_or(AuthError::Busy)?;
        let response = self
            .client
            .reset_password(&ResetPasswordRequest {
                email: form.email.trim().to_string(),
            })
            .map_err(network)?;

        accepted(response, "Failed to send reset email.")?;
        Ok(AuthSuccess {
            message: "Password reset instructions sent to your email!".to_string(),
            redirect: None,
        })
    }
}

fn network(err: crate::error::ClientError) -> AuthError {
    warn!("Auth request failed: {err}");
    AuthError::Network(err)
}

fn accepted(response: AuthResponse, fallback: &str) -> Result<AuthResponse, AuthError> {
    if response.success {
        Ok(response)
    } else {
        Err(AuthError::Rejected(
            response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        ))
    }
}
