//! Authentication state carried between commands.

/// Session cookie and library token of the current user.
///
/// `None` means "not authenticated" for either credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookie: Option<String>,
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `connect.sid=...` cookie handed out at login.
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// The bearer token handed out on library access.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.cookie.is_some()
    }

    pub fn has_library_access(&self) -> bool {
        self.token.is_some()
    }

    pub fn set_cookie(&mut self, cookie: String) {
        self.cookie = Some(cookie);
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Forget both credentials.
    pub fn clear(&mut self) {
        self.cookie = None;
        self.token = None;
    }
}
