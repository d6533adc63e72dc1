//! Path routing and the protected-route gate.
//!
//! DESIGN
//! ======
//! [`resolve`] is a pure function of `(user present, loading, path)`; it owns
//! every redirect decision so screens never navigate on their own to enforce
//! authentication. The app applies the result and re-runs it whenever the
//! session changes.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const LANDING_PATH: &str = "/dashboard";

/// A named screen addressed by a URL path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Index,
    Login,
    Register,
    Dashboard,
    /// `/jobs/new`
    JobNew,
    /// `/jobs/:id`
    JobDetails(String),
    /// `/jobs/:id/edit`
    JobEdit(String),
    /// Any unmatched path, kept verbatim.
    NotFound(String),
}

impl Route {
    /// Parse a path, ignoring query string, fragment, and trailing slashes.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Index,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["dashboard"] => Self::Dashboard,
            ["jobs", "new"] => Self::JobNew,
            ["jobs", id] => Self::JobDetails((*id).to_owned()),
            ["jobs", id, "edit"] => Self::JobEdit((*id).to_owned()),
            _ => Self::NotFound(format!("/{}", segments.join("/"))),
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Index => "/".to_owned(),
            Self::Login => LOGIN_PATH.to_owned(),
            Self::Register => REGISTER_PATH.to_owned(),
            Self::Dashboard => LANDING_PATH.to_owned(),
            Self::JobNew => "/jobs/new".to_owned(),
            Self::JobDetails(id) => format!("/jobs/{id}"),
            Self::JobEdit(id) => format!("/jobs/{id}/edit"),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Screens reachable only while signed out.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Screens rendered inside the authenticated shell.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Dashboard | Self::JobNew | Self::JobDetails(_) | Self::JobEdit(_))
    }
}

/// Outcome of gating a requested path against the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Session check in flight; render only a loading indicator.
    Loading,
    /// Replace the requested path with this route.
    Redirect(Route),
    /// Render a signed-out screen.
    Public(Route),
    /// Render the shell with this screen in its outlet.
    Protected(Route),
    /// Render the not-found screen for this path.
    NotFound(String),
}

/// Decide what to render for `path`.
#[must_use]
pub fn resolve(user_present: bool, loading: bool, path: &str) -> Resolution {
    if loading {
        return Resolution::Loading;
    }
    let route = Route::parse(path);
    match route {
        Route::Index if user_present => Resolution::Redirect(Route::Dashboard),
        Route::Index => Resolution::Redirect(Route::Login),
        Route::NotFound(path) => Resolution::NotFound(path),
        r if r.is_public() && user_present => Resolution::Redirect(Route::Dashboard),
        r if r.is_public() => Resolution::Public(r),
        r if r.is_protected() && user_present => Resolution::Protected(r),
        _ => Resolution::Redirect(Route::Login),
    }
}

/// Follow redirects until a renderable resolution is reached.
///
/// Returns the final path alongside the resolution.
#[must_use]
pub fn settle(user_present: bool, loading: bool, path: &str) -> (String, Resolution) {
    let mut current = path.to_owned();
    // Each redirect lands on Login or Dashboard, neither of which redirects
    // again for the same session, so two hops always suffice.
    for _ in 0..2 {
        match resolve(user_present, loading, &current) {
            Resolution::Redirect(target) => current = target.path(),
            other => return (current, other),
        }
    }
    let resolution = resolve(user_present, loading, &current);
    (current, resolution)
}
