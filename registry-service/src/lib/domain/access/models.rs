use crate::domain::identity::models::Role;

/// One entry of a route's accepted-roles set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    /// Any authenticated identity, with or without a role.
    All,
    Role(Role),
}

impl From<Role> for RequiredRole {
    fn from(role: Role) -> Self {
        RequiredRole::Role(role)
    }
}

/// Authorization requirement attached to a route at registration time.
///
/// Read by the guard chain, never mutated by it. The default is "authenticated,
/// no role restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAccess {
    required_roles: Vec<RequiredRole>,
    public: bool,
}

impl RouteAccess {
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// Exempt from authentication. Role requirements are not consulted.
    pub fn public() -> Self {
        Self {
            required_roles: Vec::new(),
            public: true,
        }
    }

    /// Restrict to the given roles. Order is kept, duplicates are dropped.
    pub fn roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RequiredRole>,
    {
        let mut required_roles: Vec<RequiredRole> = Vec::new();
        for role in roles {
            let role = role.into();
            if !required_roles.contains(&role) {
                required_roles.push(role);
            }
        }

        Self {
            required_roles,
            public: false,
        }
    }

    pub fn any_role() -> Self {
        Self::roles([RequiredRole::All])
    }

    pub fn is_public(&self) -> bool {
        self.public
    }

    pub fn required_roles(&self) -> &[RequiredRole] {
        &self.required_roles
    }
}
