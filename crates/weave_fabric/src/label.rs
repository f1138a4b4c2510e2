//! Hierarchical names of logical-graph vertices.
//!
//! A label is a path of component ids from the outermost module down to the
//! tile that owns the vertex, followed by the vertex kind and local id. Labels
//! print as `0.3/mp2`: component 0 of the top module, its component 3, master
//! port 2 of that tile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use weave_common::{ComponentId, EndpointId, PhyId, PortId};

/// A vertex kind and local id within one tile.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    /// The tile's router.
    Router,
    /// A local endpoint (core, memory bank, ...).
    Endpoint(EndpointId),
    /// A master port.
    Master(PortId),
    /// A slave port.
    Slave(PortId),
    /// A PHY.
    Phy(PhyId),
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Router => write!(f, "r"),
            Terminal::Endpoint(id) => write!(f, "ep{id}"),
            Terminal::Master(id) => write!(f, "mp{id}"),
            Terminal::Slave(id) => write!(f, "sp{id}"),
            Terminal::Phy(id) => write!(f, "p{id}"),
        }
    }
}

impl FromStr for Terminal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "r" {
            return Ok(Terminal::Router);
        }
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| format!("terminal '{s}' has no id"))?;
        let (kind, id) = s.split_at(split);
        let id: u32 = id.parse().map_err(|_| format!("invalid terminal id in '{s}'"))?;
        match kind {
            "ep" => Ok(Terminal::Endpoint(EndpointId::from_raw(id))),
            "mp" => Ok(Terminal::Master(PortId::from_raw(id))),
            "sp" => Ok(Terminal::Slave(PortId::from_raw(id))),
            "p" => Ok(Terminal::Phy(PhyId::from_raw(id))),
            _ => Err(format!("unknown terminal kind '{kind}'")),
        }
    }
}

/// The globally unique name of a logical-graph vertex.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label {
    /// Component ids from the outermost module inwards.
    pub path: Vec<ComponentId>,
    /// The vertex within the innermost tile.
    pub terminal: Terminal,
}

impl Label {
    /// A label local to a tile.
    pub fn local(terminal: Terminal) -> Self {
        Self {
            path: Vec::new(),
            terminal,
        }
    }

    /// The label as seen from a parent module that placed its owner as `component`.
    pub fn prefixed(&self, component: ComponentId) -> Label {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.push(component);
        path.extend_from_slice(&self.path);
        Label {
            path,
            terminal: self.terminal,
        }
    }

    /// Returns `true` for master-port labels.
    pub fn is_master(&self) -> bool {
        matches!(self.terminal, Terminal::Master(_))
    }

    /// Returns `true` for slave-port labels.
    pub fn is_slave(&self) -> bool {
        matches!(self.terminal, Terminal::Slave(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{id}")?;
        }
        if !self.path.is_empty() {
            write!(f, "/")?;
        }
        write!(f, "{}", self.terminal)
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, terminal) = match s.rsplit_once('/') {
            Some((path, terminal)) => (Some(path), terminal),
            None => (None, s),
        };
        let path = match path {
            Some(path) => path
                .split('.')
                .map(|part| {
                    part.parse::<u32>()
                        .map(ComponentId::from_raw)
                        .map_err(|_| format!("invalid component id '{part}' in label '{s}'"))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        Ok(Label {
            path,
            terminal: terminal.parse()?,
        })
    }
}

impl TryFrom<String> for Label {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(value: Label) -> Self {
        value.to_string()
    }
}
