//! # Route Table and Gates
//!
//! Every navigation is resolved synchronously against the in-memory session:
//! no request is made to decide whether a view may render.
//!
//! | Gate        | No session          | User              | Admin  |
//! |-------------|---------------------|-------------------|--------|
//! | `Public`    | render              | render            | render |
//! | `GuestOnly` | render              | redirect `/`      | redirect `/` |
//! | `Protected` | redirect `/login`   | render            | render |
//! | `AdminOnly` | redirect `/login`   | redirect `/`      | render |

use std::collections::BTreeMap;

use crate::app::events::{HOME_PATH, LOGIN_PATH};
use crate::services::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Public,
    /// Sign-in screens; an authenticated user is sent home.
    GuestOnly,
    Protected,
    AdminOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Listings,
    ListingDetails,
    Categories,
    Category,
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    VerifyEmail,
    CreateListing,
    EditListing,
    Profile,
    Settings,
    MyListings,
    Chat,
    Notifications,
    Payments,
    PaymentResult,
    AdminDashboard,
    AdminUsers,
    AdminListings,
    AdminCategories,
    AdminPayments,
    AdminSettings,
    NotFound,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: &'static str,
    pub view: View,
    pub gate: Gate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub view: View,
    /// Values of `:name` segments.
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// A numeric parameter such as `:id` or `:userId`.
    pub fn id_param(&self, name: &str) -> Option<i64> {
        self.param(name)?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(RouteMatch),
    Redirect(&'static str),
}

pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        use Gate::*;
        use View::*;

        let table = [
            ("/", Home, Public),
            ("/listings", Listings, Public),
            ("/listings/:id", ListingDetails, Public),
            ("/categories", Categories, Public),
            ("/categories/:slug", Category, Public),
            ("/verify-email/:token", VerifyEmail, Public),
            ("/login", Login, GuestOnly),
            ("/register", Register, GuestOnly),
            ("/forgot-password", ForgotPassword, GuestOnly),
            ("/reset-password/:token", ResetPassword, GuestOnly),
            ("/create-listing", CreateListing, Protected),
            ("/listings/:id/edit", EditListing, Protected),
            ("/profile", Profile, Protected),
            ("/settings", Settings, Protected),
            ("/my-listings", MyListings, Protected),
            ("/chat", Chat, Protected),
            ("/chat/:userId", Chat, Protected),
            ("/notifications", Notifications, Protected),
            ("/payments", Payments, Protected),
            ("/payments/:transactionId", PaymentResult, Protected),
            ("/admin", AdminDashboard, AdminOnly),
            ("/admin/users", AdminUsers, AdminOnly),
            ("/admin/listings", AdminListings, AdminOnly),
            ("/admin/categories", AdminCategories, AdminOnly),
            ("/admin/payments", AdminPayments, AdminOnly),
            ("/admin/settings", AdminSettings, AdminOnly),
        ];

        Self {
            routes: table
                .into_iter()
                .map(|(pattern, view, gate)| Route { pattern, view, gate })
                .collect(),
        }
    }
}

impl Router {
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Match `path` and apply its gate for `session`.
    pub fn resolve(&self, path: &str, session: Option<&Session>) -> Navigation {
        let Some((route, params)) = self.find(path) else {
            return Navigation::Render(RouteMatch {
                view: View::NotFound,
                params: BTreeMap::new(),
            });
        };

        let signed_in = session.is_some_and(Session::is_authenticated);
        let admin = signed_in && session.is_some_and(Session::is_admin);

        let redirect = match route.gate {
            Gate::Public => None,
            Gate::GuestOnly if signed_in => Some(HOME_PATH),
            Gate::GuestOnly => None,
            Gate::Protected | Gate::AdminOnly if !signed_in => Some(LOGIN_PATH),
            Gate::AdminOnly if !admin => Some(HOME_PATH),
            Gate::Protected | Gate::AdminOnly => None,
        };

        match redirect {
            Some(target) => {
                tracing::debug!(path, target, "Route gate redirect");
                Navigation::Redirect(target)
            }
            None => Navigation::Render(RouteMatch {
                view: route.view,
                params,
            }),
        }
    }

    fn find(&self, path: &str) -> Option<(&Route, BTreeMap<String, String>)> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.routes.iter().find_map(|route| {
            let pattern: Vec<&str> = route.pattern.split('/').filter(|s| !s.is_empty()).collect();
            if pattern.len() != segments.len() {
                return None;
            }
            let mut params = BTreeMap::new();
            for (expected, actual) in pattern.iter().zip(&segments) {
                match expected.strip_prefix(':') {
                    Some(name) => {
                        params.insert(name.to_string(), (*actual).to_string());
                    }
                    None if expected == actual => {}
                    None => return None,
                }
            }
            Some((route, params))
        })
    }
}
