//! Route state and navigation ports.
//!
//! The API client never reaches for global location state. It asks an
//! injected [`Location`] for the current route and sends the user to the
//! login route through an injected [`Navigate`] (or, failing that, a full
//! redirect through [`Location::assign`]).

use std::sync::RwLock;

/// Route the user is sent to when their session expires.
pub const LOGIN_ROUTE: &str = "/auth";

/// Routes reachable without a valid session.
pub const DEFAULT_EXEMPT_ROUTES: [&str; 3] = ["/", "/auth", "/admin/dashboard"];

/// Read access to the current client-side route, plus a hard redirect.
pub trait Location: Send + Sync {
    fn current_path(&self) -> String;

    /// Full redirect. Used when no [`Navigate`] was injected.
    fn assign(&self, path: &str);
}

/// Soft, in-app navigation.
pub trait Navigate: Send + Sync {
    fn navigate(&self, path: &str);
}

impl<F> Navigate for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, path: &str) {
        self(path)
    }
}

/// In-process router state.
#[derive(Debug)]
pub struct MemoryLocation {
    path: RwLock<String>,
}

impl MemoryLocation {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(path.into()),
        }
    }

    pub fn set_path(&self, path: impl Into<String>) {
        let mut guard = self.path.write().unwrap_or_else(|e| e.into_inner());
        *guard = path.into();
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Location for MemoryLocation {
    fn current_path(&self) -> String {
        self.path.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn assign(&self, path: &str) {
        self.set_path(path);
    }
}

/// Set of routes where a 401 is tolerated and must not force a logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteExemptions {
    routes: Vec<String>,
}

impl RouteExemptions {
    pub fn new<I, S>(routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            routes: routes
                .into_iter()
                .map(|r| normalize(r.as_ref()).to_string())
                .collect(),
        }
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        let path = normalize(path);
        self.routes.iter().any(|r| r == path)
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }
}

impl Default for RouteExemptions {
    fn default() -> Self {
        Self::new(DEFAULT_EXEMPT_ROUTES)
    }
}

/// Drop query, fragment and a trailing slash (but keep the root `/`).
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    if path.is_empty() {
        return "/";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_default_exemptions() {
        let ex = RouteExemptions::default();
        assert!(ex.is_exempt("/"));
        assert!(ex.is_exempt("/auth"));
        assert!(ex.is_exempt("/admin/dashboard"));

        assert!(!ex.is_exempt("/dashboard"));
        assert!(!ex.is_exempt("/auth/profile"));
        assert!(!ex.is_exempt("/admin"));
        assert!(!ex.is_exempt("/settings"));
    }

    #[test]
    fn test_exemptions_normalize_paths() {
        let ex = RouteExemptions::default();
        assert!(ex.is_exempt("/auth/"));
        assert!(ex.is_exempt("/auth?mode=login"));
        assert!(ex.is_exempt("/admin/dashboard#top"));
        assert!(ex.is_exempt(""));
        assert!(ex.is_exempt("//"));
    }

    #[test]
    fn test_custom_exemptions_replace_defaults() {
        let ex = RouteExemptions::new(["/pricing/"]);
        assert!(ex.is_exempt("/pricing"));
        assert!(!ex.is_exempt("/auth"));
        assert_eq!(ex.routes(), ["/pricing".to_string()]);
    }

    #[test]
    fn test_memory_location_assign() {
        let loc = MemoryLocation::default();
        assert_eq!(loc.current_path(), "/");
        loc.assign(LOGIN_ROUTE);
        assert_eq!(loc.current_path(), "/auth");
        loc.set_path("/dashboard");
        assert_eq!(loc.current_path(), "/dashboard");
    }

    #[test]
    fn test_closure_navigator() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let nav = move |path: &str| sink.lock().unwrap().push(path.to_string());
        nav.navigate("/auth");
        assert_eq!(*seen.lock().unwrap(), vec!["/auth".to_string()]);
    }
}
