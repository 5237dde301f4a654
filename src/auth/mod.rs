pub mod flow;
pub mod validation;

pub use flow::{AuthFlow, AuthSuccess};
pub use validation::{FormValidator, ResetForm, SigninForm, SignupForm};
