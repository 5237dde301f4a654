use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

/// How long a banner stays up before it expires
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// A button that can be disabled while its request is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    pub label: &'static str,
    pub busy_label: &'static str,
    pub disabled: bool,
    pub spinner: bool,
}

impl ActionControl {
    pub fn new(label: &'static str, busy_label: &'static str) -> Self {
        Self {
            label,
            busy_label,
            disabled: false,
            spinner: false,
        }
    }

    /// Text the control currently shows
    pub fn text(&self) -> &'static str {
        if self.spinner { self.busy_label } else { self.label }
    }

    /// Disable the control until the returned guard drops; `None` if already busy
    pub fn begin(&mut self) -> Option<BusyGuard<'_>> {
        if self.disabled {
            return None;
        }
        self.disabled = true;
        self.spinner = true;
        Some(BusyGuard { control: self })
    }
}

/// Restores its control to the idle state on drop, on every exit path
#[derive(Debug)]
pub struct BusyGuard<'a> {
    control: &'a mut ActionControl,
}

impl Deref for BusyGuard<'_> {
    type Target = ActionControl;

    fn deref(&self) -> &ActionControl {
        self.control
    }
}

impl DerefMut for BusyGuard<'_> {
    fn deref_mut(&mut self) -> &mut ActionControl {
        self.control
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.disabled = false;
        self.control.spinner = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient, dismissible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Banner {
    pub fn new(kind: BannerKind, message: impl Into<String>, now: Instant) -> Self {
        Self {
            kind,
            message: message.into(),
            expires_at: now + BANNER_TTL,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Error, message, Instant::now())
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Success, message, Instant::now())
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = match self.kind {
            BannerKind::Success => "✓",
            BannerKind::Error => "✗",
        };
        write!(f, "{mark} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_disables_and_restores() {
        let mut control = ActionControl::new("Get Recommendations", "Loading...");
        {
            let guard = control.begin().unwrap();
            assert!(guard.disabled);
            assert_eq!(guard.text(), "Loading...");
        }
        assert!(!control.disabled);
        assert_eq!(control.text(), "Get Recommendations");
    }

    #[test]
    fn test_busy_control_refuses_second_begin() {
        let mut control = ActionControl::new("Sign In", "Signing in...");
        control.disabled = true;

        assert!(control.begin().is_none());
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn failing_request(control: &mut ActionControl) -> Result<(), String> {
            let _guard = control.begin().ok_or("busy")?;
            Err("connection refused".to_string())
        }

        let mut control = ActionControl::new("Send Reset Link", "Sending...");
        assert!(failing_request(&mut control).is_err());
        assert!(!control.disabled);
        assert!(!control.spinner);
    }

    #[test]
    fn test_banner_expires_after_ttl() {
        let now = Instant::now();
        let banner = Banner::new(BannerKind::Error, "Network error. Please try again.", now);

        assert!(!banner.is_expired(now + Duration::from_secs(4)));
        assert!(banner.is_expired(now + BANNER_TTL));
    }

    #[test]
    fn test_banner_line_is_marked_by_kind() {
        assert_eq!(Banner::success("Login successful!").to_string(), "✓ Login successful!");
        assert_eq!(Banner::error("Passwords do not match").to_string(), "✗ Passwords do not match");
    }
}
