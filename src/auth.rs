// Simulated authentication gate and the route guard it backs

use crate::error::{StorageError, TodoError};
use crate::notify::{Notifier, SubscriptionId};
use crate::storage::{AUTH_SLOT, Slot, SlotStorage};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{info, warn};

/// Persisted authenticated/unauthenticated flag
///
/// No credentials are checked; this only decides whether the settings view
/// may be entered.
pub struct AuthGate {
    slot: Slot<bool>,
    authenticated: bool,
    subscribers: Notifier<bool>,
}

impl AuthGate {
    /// Read the `auth` slot; missing or corrupt content means logged out
    pub fn open(storage: Rc<dyn SlotStorage>) -> Self {
        let slot = Slot::new(storage, AUTH_SLOT);
        let authenticated = slot.load_or_default();

        Self {
            slot,
            authenticated,
            subscribers: Notifier::new(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn login(&mut self) {
        info!("Logged in");
        self.set(true);
    }

    pub fn logout(&mut self) {
        info!("Logged out");
        self.set(false);
    }

    /// Remove the `auth` slot and fall back to logged out
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.slot.clear()?;
        self.authenticated = false;
        self.subscribers.publish(&false);
        Ok(())
    }

    /// Receive the flag now and after every login/logout
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&bool) + 'static,
    {
        self.subscribers.subscribe_with(&self.authenticated, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn set(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
        self.subscribers.publish(&authenticated);
        self.slot.save(&authenticated);
    }
}

/// Navigable views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    /// The todo list, also the redirect target
    #[default]
    Todos,
    About,
    Settings,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Todos => "/",
            Route::About => "/about",
            Route::Settings => "/settings",
        }
    }

    pub fn requires_auth(self) -> bool {
        matches!(self, Route::Settings)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_ascii_lowercase().as_str() {
            "" | "todos" => Ok(Route::Todos),
            "about" => Ok(Route::About),
            "settings" => Ok(Route::Settings),
            other => Err(TodoError::Validation(format!("unknown route: /{}", other))),
        }
    }
}

/// Resolve navigation to `requested`
///
/// Denied navigation redirects to the default view instead of failing.
pub fn guard(auth: &AuthGate, requested: Route) -> Route {
    if requested.requires_auth() && !auth.is_authenticated() {
        warn!(route = %requested, "Not authenticated, redirecting to default view");
        return Route::default();
    }
    requested
}
