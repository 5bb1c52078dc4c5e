/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Deployment descriptor parsing and validation.
//!
//! The hosting platform reads `render.yaml` at the repository root to start the
//! web service, the worker and the managed database. This module checks that the
//! file still wires the processes the way the code expects:
//!
//! - exactly one `web` and one `worker` service, each with a start command
//! - both receive `ALPHA_VANTAGE_API_KEY` and `DATABASE_URL`
//! - `DATABASE_URL` comes from the same declared database in both
//! - the web service receives a platform-generated `SESSION_SECRET`

use crate::config::{ENV_ALPHA_VANTAGE_API_KEY, ENV_DATABASE_URL, ENV_SESSION_SECRET};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Variables both processes must receive.
pub const SHARED_ENV_VARS: &[&str] = &[ENV_ALPHA_VANTAGE_API_KEY, ENV_DATABASE_URL];

#[derive(Debug, Clone, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub databases: Vec<DatabaseSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Web,
    Worker,
    #[serde(other)]
    Other,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Web => write!(f, "web"),
            ServiceKind::Worker => write!(f, "worker"),
            ServiceKind::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub name: String,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub build_command: Option<String>,
    #[serde(default)]
    pub start_command: Option<String>,
    #[serde(default)]
    pub env_vars: Vec<EnvVar>,
}

impl Service {
    pub fn env_var(&self, key: &str) -> Option<&EnvVar> {
        self.env_vars.iter().find(|v| v.key == key)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    /// `false` means the value is entered manually on the platform.
    #[serde(default)]
    pub sync: Option<bool>,
    #[serde(default)]
    pub generate_value: Option<bool>,
    #[serde(default)]
    pub from_database: Option<FromDatabase>,
}

impl EnvVar {
    fn source_count(&self) -> usize {
        [
            self.value.is_some(),
            self.sync == Some(false),
            self.generate_value == Some(true),
            self.from_database.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FromDatabase {
    pub name: String,
    pub property: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSpec {
    pub name: String,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// A single rule the descriptor breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    ServiceCount { kind: ServiceKind, found: usize },
    MissingStartCommand { service: String },
    MissingEnvVar { service: String, key: String },
    AmbiguousEnvVarSource { service: String, key: String },
    DatabaseUrlNotFromDatabase { service: String },
    UnknownDatabase { service: String, database: String },
    DatabaseMismatch { web: String, worker: String },
    SessionSecretNotGenerated { service: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ServiceCount { kind, found } => {
                write!(f, "expected exactly one {} service, found {}", kind, found)
            }
            Violation::MissingStartCommand { service } => {
                write!(f, "service '{}' has no startCommand", service)
            }
            Violation::MissingEnvVar { service, key } => {
                write!(f, "service '{}' does not receive {}", service, key)
            }
            Violation::AmbiguousEnvVarSource { service, key } => write!(
                f,
                "service '{}' must declare exactly one source for {}",
                service, key
            ),
            Violation::DatabaseUrlNotFromDatabase { service } => write!(
                f,
                "service '{}' must take {} from a managed database",
                service, ENV_DATABASE_URL
            ),
            Violation::UnknownDatabase { service, database } => write!(
                f,
                "service '{}' references undeclared database '{}'",
                service, database
            ),
            Violation::DatabaseMismatch { web, worker } => write!(
                f,
                "web uses database '{}' but worker uses '{}'",
                web, worker
            ),
            Violation::SessionSecretNotGenerated { service } => write!(
                f,
                "service '{}' must receive a generated {}",
                service, ENV_SESSION_SECRET
            ),
        }
    }
}

#[derive(Debug)]
pub enum DescriptorError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(Vec<Violation>),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorError::Io(e) => write!(f, "Failed to read descriptor: {}", e),
            DescriptorError::Parse(e) => write!(f, "Failed to parse descriptor: {}", e),
            DescriptorError::Invalid(violations) => {
                let lines: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                write!(f, "Invalid descriptor: {}", lines.join("; "))
            }
        }
    }
}

impl std::error::Error for DescriptorError {}

impl From<std::io::Error> for DescriptorError {
    fn from(e: std::io::Error) -> Self {
        DescriptorError::Io(e)
    }
}

impl From<serde_yaml::Error> for DescriptorError {
    fn from(e: serde_yaml::Error) -> Self {
        DescriptorError::Parse(e)
    }
}

impl Descriptor {
    pub fn from_yaml(content: &str) -> Result<Self, DescriptorError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DescriptorError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Services of the given kind, in declaration order.
    pub fn services_of(&self, kind: ServiceKind) -> Vec<&Service> {
        self.services.iter().filter(|s| s.kind == kind).collect()
    }

    /// The single service of the given kind, if there is exactly one.
    pub fn service(&self, kind: ServiceKind) -> Option<&Service> {
        match self.services_of(kind).as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Database the service takes `DATABASE_URL` from.
    pub fn database_for<'a>(&self, service: &'a Service) -> Option<&'a str> {
        service
            .env_var(ENV_DATABASE_URL)
            .and_then(|v| v.from_database.as_ref())
            .map(|db| db.name.as_str())
    }

    /// Collects every rule the descriptor breaks.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        for kind in [ServiceKind::Web, ServiceKind::Worker] {
            let found = self.services_of(kind).len();
            if found != 1 {
                violations.push(Violation::ServiceCount { kind, found });
            }
        }

        for service in &self.services {
            if service
                .start_command
                .as_deref()
                .map_or(true, |c| c.trim().is_empty())
            {
                violations.push(Violation::MissingStartCommand {
                    service: service.name.clone(),
                });
            }

            for var in &service.env_vars {
                if var.source_count() != 1 {
                    violations.push(Violation::AmbiguousEnvVarSource {
                        service: service.name.clone(),
                        key: var.key.clone(),
                    });
                }
                if let Some(db) = &var.from_database {
                    if !self.databases.iter().any(|d| d.name == db.name) {
                        violations.push(Violation::UnknownDatabase {
                            service: service.name.clone(),
                            database: db.name.clone(),
                        });
                    }
                }
            }

            if service.kind == ServiceKind::Other {
                continue;
            }

            for key in SHARED_ENV_VARS {
                if service.env_var(key).is_none() {
                    violations.push(Violation::MissingEnvVar {
                        service: service.name.clone(),
                        key: key.to_string(),
                    });
                }
            }

            if service.env_var(ENV_DATABASE_URL).is_some() && self.database_for(service).is_none()
            {
                violations.push(Violation::DatabaseUrlNotFromDatabase {
                    service: service.name.clone(),
                });
            }
        }

        if let Some(web) = self.service(ServiceKind::Web) {
            match web.env_var(ENV_SESSION_SECRET) {
                None => violations.push(Violation::MissingEnvVar {
                    service: web.name.clone(),
                    key: ENV_SESSION_SECRET.to_string(),
                }),
                Some(var) if var.generate_value != Some(true) => {
                    violations.push(Violation::SessionSecretNotGenerated {
                        service: web.name.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        if let (Some(web), Some(worker)) = (
            self.service(ServiceKind::Web),
            self.service(ServiceKind::Worker),
        ) {
            if let (Some(web_db), Some(worker_db)) =
                (self.database_for(web), self.database_for(worker))
            {
                if web_db != worker_db {
                    violations.push(Violation::DatabaseMismatch {
                        web: web_db.to_string(),
                        worker: worker_db.to_string(),
                    });
                }
            }
        }

        violations
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DescriptorError::Invalid(violations))
        }
    }
}
