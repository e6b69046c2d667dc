use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub version: Option<i64>,
}

impl Metadata {
    pub fn new(name: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            version: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub objects: Vec<T>,
    #[serde(default)]
    pub next_page: String,
}

impl<T> ListResponse<T> {
    pub fn has_next_page(&self) -> bool {
        !self.next_page.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
}

/// A hypervisor host, as reported by its node agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub metadata: Metadata,
    pub cpu_count: usize,
    /// MHz
    pub cpu_freq: u64,
    /// KiB
    pub memory: u64,
}

impl Node {
    pub fn memory_display(&self) -> String {
        let gib = self.memory as f64 / (1024.0 * 1024.0);
        format!("{:.1} GiB", gib)
    }

    pub fn cpu_display(&self) -> String {
        format!("{} x {} MHz", self.cpu_count, self.cpu_freq)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vm {
    pub metadata: Metadata,
    pub spec: VmSpec,
    #[serde(default)]
    pub status: VmStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmSpec {
    pub vpc: String,
    pub cpus: u8,
    pub memory: usize,
    pub cloud_init: Option<String>,
    pub powered_on: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VmStatus {
    pub node: Option<String>,
    pub state: VmState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VmState {
    #[default]
    Uncreated,
    PoweredOff,
    PoweredOn,
}

impl VmState {
    pub fn label(&self) -> &'static str {
        match self {
            VmState::Uncreated => "Uncreated",
            VmState::PoweredOff => "Powered off",
            VmState::PoweredOn => "Running",
        }
    }
}

impl Vm {
    /// Where the VM is scheduled, or "unscheduled"
    pub fn node_display(&self) -> &str {
        self.status.node.as_deref().unwrap_or("unscheduled")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vpc {
    pub metadata: Metadata,
    pub spec: VpcSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpcSpec {
    /// CIDR, e.g. `10.10.0.0/24`
    pub subnet: String,
    pub multicast_ip: Option<Ipv4Addr>,
    pub vni: Option<u16>,
}
