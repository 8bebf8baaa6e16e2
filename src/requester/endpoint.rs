use anyhow::{Result, anyhow};
use std::str::FromStr;

/// Identifies a server resource as a route segment plus a controller segment.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Endpoint {
    pub route: String,
    pub controller: String,
}

impl Endpoint {
    pub fn new(route: impl Into<String>, controller: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            controller: controller.into(),
        }
    }

    /// `route/controller`, relative to the configured base URL.
    pub fn path(&self) -> String {
        format!("{}/{}", self.route, self.controller)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.route, self.controller)
    }
}

impl FromStr for Endpoint {
    type Err = anyhow::Error;

    /// Splits on the first `/`; the controller may itself contain slashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((route, controller)) if !route.is_empty() && !controller.is_empty() => {
                Ok(Endpoint::new(route, controller))
            }
            _ => Err(anyhow!(
                "Invalid endpoint format. Expected 'route/controller'."
            )),
        }
    }
}
