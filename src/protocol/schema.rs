//! Protocol description (`protocol.json`).

use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// Domains and commands a protocol offers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProtocolSchema {
    #[serde(default)]
    pub domains: Vec<DomainSchema>,
}

/// One protocol domain.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainSchema {
    pub domain: String,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub commands: Vec<CommandSchema>,
}

/// One command of a domain.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandSchema {
    pub name: String,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProtocolSchema {
    /// Parse a protocol description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a protocol description from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Look up a domain by name.
    pub fn domain(&self, name: &str) -> Option<&DomainSchema> {
        self.domains.iter().find(|d| d.domain == name)
    }

    /// Whether `method` (`Domain.command`) names a stable command.
    pub fn is_callable(&self, method: &str) -> bool {
        let Some((domain, command)) = method.split_once('.') else {
            return false;
        };
        self.domain(domain)
            .and_then(|d| d.commands.iter().find(|c| c.name == command))
            .is_some_and(|c| !c.experimental)
    }

    /// Fully qualified names of every stable command.
    pub fn methods(&self) -> impl Iterator<Item = String> + '_ {
        self.domains.iter().flat_map(|d| {
            d.commands
                .iter()
                .filter(|c| !c.experimental)
                .map(move |c| format!("{}.{}", d.domain, c.name))
        })
    }
}
