//! Directive declarations.
//!
//! [`AuthDirective`] is an annotation placed on a field or object type.
//! [`DirectiveDefinition`] describes a directive for the schema's SDL.

use std::fmt;

use crate::security::config::DirectiveConfig;
use crate::security::gate::Requirement;

pub const IS_AUTHENTICATED: &str = "isAuthenticated";
pub const HAS_ROLE: &str = "hasRole";
pub const HAS_SCOPE: &str = "hasScope";

/// An authorization directive attached to a field or object type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthDirective {
    /// `@isAuthenticated`
    IsAuthenticated,
    /// `@hasRole(roles: [...])`
    HasRole { roles: Vec<String> },
    /// `@hasScope(scopes: [...])`; `None` means the configured default.
    HasScope { scopes: Option<Vec<String>> },
}

impl AuthDirective {
    pub fn is_authenticated() -> Self {
        AuthDirective::IsAuthenticated
    }

    pub fn has_role(roles: &[&str]) -> Self {
        AuthDirective::HasRole {
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn has_scope(scopes: &[&str]) -> Self {
        AuthDirective::HasScope {
            scopes: Some(scopes.iter().map(|s| s.to_string()).collect()),
        }
    }

    /// `@hasScope` without arguments.
    pub fn has_default_scope() -> Self {
        AuthDirective::HasScope { scopes: None }
    }

    /// Directive name as written in the schema.
    pub fn name(&self) -> &'static str {
        match self {
            AuthDirective::IsAuthenticated => IS_AUTHENTICATED,
            AuthDirective::HasRole { .. } => HAS_ROLE,
            AuthDirective::HasScope { .. } => HAS_SCOPE,
        }
    }

    /// Requirement enforced by the directive.
    pub fn requirement(&self, config: &DirectiveConfig) -> Requirement {
        match self {
            AuthDirective::IsAuthenticated => Requirement::Authenticated,
            AuthDirective::HasRole { roles } => Requirement::Roles(roles.clone()),
            AuthDirective::HasScope { scopes: Some(scopes) } => Requirement::Scopes(scopes.clone()),
            AuthDirective::HasScope { scopes: None } => {
                Requirement::Scopes(config.get_default_scopes().to_vec())
            }
        }
    }
}

impl fmt::Display for AuthDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthDirective::IsAuthenticated => write!(f, "@{}", IS_AUTHENTICATED),
            AuthDirective::HasRole { roles } => {
                write!(f, "@{}(roles: {})", HAS_ROLE, string_list(roles))
            }
            AuthDirective::HasScope { scopes: Some(scopes) } => {
                write!(f, "@{}(scopes: {})", HAS_SCOPE, string_list(scopes))
            }
            AuthDirective::HasScope { scopes: None } => write!(f, "@{}", HAS_SCOPE),
        }
    }
}

/// Schema location a directive may be placed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectiveLocation {
    FieldDefinition,
    Object,
}

impl fmt::Display for DirectiveLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectiveLocation::FieldDefinition => write!(f, "FIELD_DEFINITION"),
            DirectiveLocation::Object => write!(f, "OBJECT"),
        }
    }
}

/// Argument of a directive definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveArgument {
    pub name: String,
    pub ty: String,
    pub default_value: Option<Vec<String>>,
}

/// Declaration of a directive: name, arguments and locations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectiveDefinition {
    pub name: String,
    pub arguments: Vec<DirectiveArgument>,
    pub locations: Vec<DirectiveLocation>,
}

impl DirectiveDefinition {
    /// Renders the definition as SDL.
    pub fn sdl(&self) -> String {
        let mut sdl = format!("directive @{}", self.name);
        if !self.arguments.is_empty() {
            let args: Vec<String> = self
                .arguments
                .iter()
                .map(|arg| match &arg.default_value {
                    Some(default) => format!("{}: {} = {}", arg.name, arg.ty, string_list(default)),
                    None => format!("{}: {}", arg.name, arg.ty),
                })
                .collect();
            sdl.push_str(&format!("({})", args.join(", ")));
        }
        let locations: Vec<String> = self.locations.iter().map(|l| l.to_string()).collect();
        sdl.push_str(&format!(" on {}", locations.join(" | ")));
        sdl
    }
}

/// Definitions of the three authorization directives.
pub fn auth_directive_definitions(config: &DirectiveConfig) -> Vec<DirectiveDefinition> {
    let locations = vec![DirectiveLocation::FieldDefinition, DirectiveLocation::Object];
    vec![
        DirectiveDefinition {
            name: IS_AUTHENTICATED.to_string(),
            arguments: Vec::new(),
            locations: locations.clone(),
        },
        DirectiveDefinition {
            name: HAS_ROLE.to_string(),
            arguments: vec![DirectiveArgument {
                name: "roles".to_string(),
                ty: "[String]".to_string(),
                default_value: None,
            }],
            locations: locations.clone(),
        },
        DirectiveDefinition {
            name: HAS_SCOPE.to_string(),
            arguments: vec![DirectiveArgument {
                name: "scopes".to_string(),
                ty: "[String]".to_string(),
                default_value: Some(config.get_default_scopes().to_vec()),
            }],
            locations,
        },
    ]
}

/// SDL declaring the three authorization directives.
pub fn auth_directive_sdl(config: &DirectiveConfig) -> String {
    auth_directive_definitions(config)
        .iter()
        .map(DirectiveDefinition::sdl)
        .collect::<Vec<_>>()
        .join("\n")
}

fn string_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", quoted.join(", "))
}
