// crates/laptop-auth/src/policy.rs
//
// Per-method access policy and the authorization decision.
//
// Decision table for `AccessPolicy::authorize`:
//   no entry for the method          -> PermissionDenied
//   Access::Public                   -> allowed, token ignored
//   Access::Roles, no token          -> MissingToken
//   Access::Roles, token fails check -> InvalidToken / Expired
//   Access::Roles, role not in set   -> PermissionDenied (an empty set admits nobody)
//   Access::Roles, role in set       -> allowed with the verified claims

use std::collections::{HashMap, HashSet};

use crate::error::AuthError;
use crate::token::{TokenManager, UserClaims};

/// Full gRPC method paths exposed by the service.
pub mod methods {
    pub const CREATE_LAPTOP: &str = "/laptop.v1.LaptopService/CreateLaptop";
    pub const SEARCH_LAPTOP: &str = "/laptop.v1.LaptopService/SearchLaptop";
    pub const UPLOAD_IMAGE: &str = "/laptop.v1.LaptopService/UploadImage";
    pub const RATE_LAPTOP: &str = "/laptop.v1.LaptopService/RateLaptop";
    pub const LOGIN: &str = "/laptop.v1.AuthService/Login";
}

/// Who may call a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Anyone, with or without a token.
    Public,
    /// Only callers whose verified role is in the set.
    Roles(HashSet<String>),
}

/// Mapping from full method path to its access rule.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    methods: HashMap<String, Access>,
}

impl AccessPolicy {
    /// An empty policy: every method is denied until listed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The policy the daemon runs with.
    pub fn laptop_service_defaults() -> Self {
        Self::new()
            .allow_public(methods::LOGIN)
            .allow_public(methods::SEARCH_LAPTOP)
            .allow_roles(methods::CREATE_LAPTOP, ["admin"])
            .allow_roles(methods::RATE_LAPTOP, ["admin", "role1"])
            .allow_roles(methods::UPLOAD_IMAGE, Vec::<String>::new())
    }

    /// Make `method` callable by anyone.
    pub fn allow_public(mut self, method: impl Into<String>) -> Self {
        self.methods.insert(method.into(), Access::Public);
        self
    }

    /// Restrict `method` to `roles`. An empty iterator locks the method for everyone.
    pub fn allow_roles<I, R>(mut self, method: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let roles = roles.into_iter().map(Into::into).collect();
        self.methods.insert(method.into(), Access::Roles(roles));
        self
    }

    pub fn access(&self, method: &str) -> Option<&Access> {
        self.methods.get(method)
    }

    /// Decide whether a call to `method` carrying `access_token` may proceed.
    ///
    /// Returns the verified claims for restricted methods and `None` for
    /// public ones.
    pub fn authorize(
        &self,
        tokens: &TokenManager,
        method: &str,
        access_token: Option<&str>,
    ) -> Result<Option<UserClaims>, AuthError> {
        let roles = match self.methods.get(method) {
            None => return Err(AuthError::PermissionDenied(method.to_string())),
            Some(Access::Public) => return Ok(None),
            Some(Access::Roles(roles)) => roles,
        };

        let access_token = match access_token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthError::MissingToken),
        };

        let claims = tokens.verify(access_token)?;

        if roles.contains(&claims.role) {
            Ok(Some(claims))
        } else {
            Err(AuthError::PermissionDenied(method.to_string()))
        }
    }
}
