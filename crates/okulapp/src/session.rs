//! Explicit admin session.
//!
//! Admin operations need a signed-in user. Instead of a process-wide auth
//! observer, the session is a value owned by whoever drives the admin surface
//! (the [`crate::api::SiteApi`] facade) and passed where it is needed.
//! Observers registered with [`SessionContext::on_change`] hear every sign-in
//! and sign-out.

use crate::error::{Result, SiteError};
use serde::Serialize;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminUser {
    pub email: String,
}

impl AdminUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

pub type SessionObserver = Rc<dyn Fn(Option<&AdminUser>)>;

#[derive(Default)]
pub struct SessionContext {
    user: Option<AdminUser>,
    observers: Vec<SessionObserver>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that starts signed in.
    pub fn signed_in(user: AdminUser) -> Self {
        Self {
            user: Some(user),
            observers: Vec::new(),
        }
    }

    pub fn current_user(&self) -> Option<&AdminUser> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn sign_in(&mut self, user: AdminUser) {
        tracing::debug!(email = %user.email, "admin signed in");
        self.user = Some(user);
        self.notify();
    }

    pub fn sign_out(&mut self) {
        if self.user.take().is_some() {
            tracing::debug!("admin signed out");
        }
        self.notify();
    }

    /// Registers an observer. It is called immediately with the current user.
    pub fn on_change(&mut self, observer: impl Fn(Option<&AdminUser>) + 'static) {
        let observer: SessionObserver = Rc::new(observer);
        observer(self.user.as_ref());
        self.observers.push(observer);
    }

    pub fn require_admin(&self) -> Result<&AdminUser> {
        self.user.as_ref().ok_or(SiteError::Unauthorized)
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer(self.user.as_ref());
        }
    }
}
