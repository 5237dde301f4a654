use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\s]{3,30}$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 6;

/// Sign-up form as typed by the user
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub terms_accepted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SigninForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResetForm {
    pub email: String,
}

/// Display label for a form field
fn field_label(field: &str) -> &str {
    match field {
        "username" => "Username",
        "email" => "Email",
        "password" => "Password",
        "confirmPassword" => "Confirm Password",
        other => other,
    }
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, format!("{} is required", field_label(field))))
    } else {
        Ok(())
    }
}

pub struct FormValidator;

impl FormValidator {
    pub fn validate_email(value: &str) -> Result<(), ValidationError> {
        required("email", value)?;
        if !EMAIL_RE.is_match(value.trim()) {
            return Err(ValidationError::new("email", "Please enter a valid email address"));
        }
        Ok(())
    }

    pub fn validate_username(value: &str) -> Result<(), ValidationError> {
        required("username", value)?;
        if !USERNAME_RE.is_match(value.trim()) {
            return Err(ValidationError::new("username", "Username must be 3-30 characters"));
        }
        Ok(())
    }

    /// Length is only enforced when choosing a new password
    pub fn validate_password(value: &str, is_signup: bool) -> Result<(), ValidationError> {
        required("password", value)?;
        if is_signup && value.trim().chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "password",
                "Password must be at least 6 characters long",
            ));
        }
        Ok(())
    }

    pub fn validate_confirmation(password: &str, confirm: &str) -> Result<(), ValidationError> {
        required("confirmPassword", confirm)?;
        if confirm != password {
            return Err(ValidationError::new("confirmPassword", "Passwords do not match"));
        }
        Ok(())
    }

    /// Every failing field, in form order
    pub fn validate_signup(form: &SignupForm) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = [
            Self::validate_username(&form.username),
            Self::validate_email(&form.email),
            Self::validate_password(&form.password, true),
            Self::validate_confirmation(&form.password, &form.confirm_password),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if !form.terms_accepted {
            errors.push(ValidationError::new(
                "terms",
                "Please accept the Terms and Privacy Policy",
            ));
        }
        errors
    }

    pub fn validate_signin(form: &SigninForm) -> Vec<ValidationError> {
        [
            Self::validate_email(&form.email),
            Self::validate_password(&form.password, false),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    pub fn validate_reset(form: &ResetForm) -> Vec<ValidationError> {
        Self::validate_email(&form.email).err().into_iter().collect()
    }

    /// Score 0-4: one point each for length >= 6, length >= 8, lowercase,
    /// uppercase, digit and symbol, capped at 4
    pub fn password_strength(password: &str) -> u8 {
        let len = password.chars().count();
        let checks = [
            len >= 6,
            len >= 8,
            password.chars().any(|c| c.is_ascii_lowercase()),
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        checks.iter().filter(|&&passed| passed).count().min(4) as u8
    }

    pub fn strength_label(score: u8) -> Option<&'static str> {
        match score {
            1 => Some("Weak"),
            2 => Some("Fair"),
            3 => Some("Good"),
            4 => Some("Strong"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.message.as_str()).collect()
    }

    fn good_signup() -> SignupForm {
        SignupForm {
            username: "luna_moth".to_string(),
            email: "luna@example.com".to_string(),
            password: "moonlight".to_string(),
            confirm_password: "moonlight".to_string(),
            terms_accepted: true,
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(FormValidator::validate_signup(&good_signup()).is_empty());
    }

    #[test]
    fn test_required_messages_use_field_labels() {
        let errors = FormValidator::validate_signup(&SignupForm {
            terms_accepted: true,
            ..Default::default()
        });

        assert_eq!(
            messages(&errors),
            vec![
                "Username is required",
                "Email is required",
                "Password is required",
                "Confirm Password is required",
            ]
        );
    }

    #[test]
    fn test_email_format() {
        assert!(FormValidator::validate_email("a@b.co").is_ok());
        assert!(FormValidator::validate_email("  a@b.co  ").is_ok());
        for bad in ["plainaddress", "a@b", "a b@c.d", "@b.co"] {
            let err = FormValidator::validate_email(bad).unwrap_err();
            assert_eq!(err.message, "Please enter a valid email address", "{bad}");
        }
    }

    #[test]
    fn test_short_password_only_rejected_on_signup() {
        let err = FormValidator::validate_password("abc", true).unwrap_err();
        assert_eq!(err.message, "Password must be at least 6 characters long");

        assert!(FormValidator::validate_password("abc", false).is_ok());
    }

    #[test]
    fn test_mismatched_confirmation() {
        let form = SignupForm {
            confirm_password: "moonshine".to_string(),
            ..good_signup()
        };

        let errors = FormValidator::validate_signup(&form);
        assert_eq!(messages(&errors), vec!["Passwords do not match"]);
        assert_eq!(errors[0].field, "confirmPassword");
    }

    #[test]
    fn test_trailing_space_passwords_still_match() {
        let form = SignupForm {
            password: "moonlight ".to_string(),
            confirm_password: "moonlight ".to_string(),
            ..good_signup()
        };

        assert!(FormValidator::validate_signup(&form).is_empty());
        assert!(FormValidator::validate_confirmation("moonlight ", "moonlight").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(FormValidator::validate_username("DJ Ravi_2").is_ok());
        assert_eq!(
            FormValidator::validate_username("ab").unwrap_err().message,
            "Username must be 3-30 characters"
        );
        assert!(FormValidator::validate_username("bad-name!").is_err());
        assert!(FormValidator::validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let form = SignupForm {
            terms_accepted: false,
            ..good_signup()
        };

        let errors = FormValidator::validate_signup(&form);
        assert_eq!(messages(&errors), vec!["Please accept the Terms and Privacy Policy"]);
    }

    #[test]
    fn test_signin_and_reset_forms() {
        let signin = SigninForm {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        assert_eq!(
            messages(&FormValidator::validate_signin(&signin)),
            vec!["Please enter a valid email address", "Password is required"]
        );

        let reset = ResetForm {
            email: "luna@example.com".to_string(),
        };
        assert!(FormValidator::validate_reset(&reset).is_empty());
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(FormValidator::password_strength(""), 0);
        assert_eq!(FormValidator::password_strength("abc"), 1);
        assert_eq!(FormValidator::password_strength("abcdef"), 2);
        assert_eq!(FormValidator::password_strength("abcdefgh"), 3);
        assert_eq!(FormValidator::password_strength("Abcdefg1!"), 4);

        assert_eq!(FormValidator::strength_label(0), None);
        assert_eq!(FormValidator::strength_label(2), Some("Fair"));
        assert_eq!(FormValidator::strength_label(4), Some("Strong"));
    }
}
