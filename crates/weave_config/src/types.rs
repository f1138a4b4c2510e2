//! Configuration types deserialized from `weave.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weave_common::Frequency;

/// The top-level project configuration parsed from `weave.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata and the descriptor store location.
    pub project: ProjectMeta,
    /// Default fabric context used when a command does not override it.
    #[serde(default)]
    pub context: Option<FabricContext>,
    /// Technology node parameters keyed by name.
    #[serde(default)]
    pub technologies: BTreeMap<String, TechnologyParams>,
    /// Transport protocol parameters keyed by name.
    #[serde(default)]
    pub protocols: BTreeMap<String, ProtocolParams>,
    /// Heterogeneous router cost knobs.
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Core project metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// Descriptor store directory, relative to the project directory.
    #[serde(default = "default_store")]
    pub store: String,
}

fn default_store() -> String {
    "components".to_string()
}

/// The physical context a tile or module is embedded for.
///
/// Persisted with every embedded tile and module so that descriptors can be
/// reloaded without guessing which technology they were sized for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FabricContext {
    /// Technology node name, a key of `[technologies]`.
    pub technology: String,
    /// Transport protocol name, a key of `[protocols]`.
    pub protocol: String,
    /// Data bus width in bits.
    pub bandwidth: u32,
    /// Target clock frequency.
    pub frequency: Frequency,
}

/// Parameters of a technology node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyParams {
    /// Silicon area of one gate equivalent, in mm².
    pub mm2_per_ge: f64,
    /// Pitch of one vertical wire, in mm.
    pub mm_per_vertical_wire: f64,
    /// Pitch of one horizontal wire, in mm.
    pub mm_per_horizontal_wire: f64,
    /// Wire delay, in seconds per mm.
    pub s_per_mm: f64,
    /// Logic power density, in W/mm².
    pub w_per_mm2_logic: f64,
    /// Wiring power density, in W/mm².
    pub w_per_mm2_wire: f64,
}

/// Parameters of a transport protocol.
///
/// Wire counts and router/PHY areas are linear in the bus width:
///
/// * wires per connection = `wires_fixed + wires_per_bit * bandwidth`, rounded up
/// * mux(n) = `mux_ge_per_input_bit * n * bandwidth`
/// * demux(n) = `demux_ge_per_output_bit * n * bandwidth`
/// * router(s inputs, m outputs) = `router_base_ge + m * mux(s) + s * demux(m)`
/// * PHY = `phy_base_ge + phy_ge_per_bit * bandwidth`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Control wires independent of the bus width.
    #[serde(default)]
    pub wires_fixed: u32,
    /// Wires per data bit (2.0 for a request/response pair, for instance).
    pub wires_per_bit: f64,
    /// Multiplexer area per input per data bit, in GE.
    #[serde(default)]
    pub mux_ge_per_input_bit: f64,
    /// Demultiplexer area per output per data bit, in GE.
    #[serde(default)]
    pub demux_ge_per_output_bit: f64,
    /// Fixed router overhead, in GE.
    #[serde(default)]
    pub router_base_ge: f64,
    /// Fixed PHY overhead, in GE.
    #[serde(default)]
    pub phy_base_ge: f64,
    /// PHY area per data bit, in GE.
    #[serde(default)]
    pub phy_ge_per_bit: f64,
}

impl ProtocolParams {
    /// Number of physical wires one connection needs at `bandwidth` bits.
    pub fn wires_per_connection(&self, bandwidth: u32) -> u32 {
        let wires = f64::from(self.wires_fixed) + self.wires_per_bit * f64::from(bandwidth);
        wires.ceil().max(0.0) as u32
    }

    /// Area of an `inputs` x `outputs` router, in GE.
    pub fn router_area_ge(&self, inputs: u32, outputs: u32, bandwidth: u32) -> f64 {
        let bw = f64::from(bandwidth);
        let (s, m) = (f64::from(inputs), f64::from(outputs));
        let mux = self.mux_ge_per_input_bit * s * bw;
        let demux = self.demux_ge_per_output_bit * m * bw;
        self.router_base_ge + m * mux + s * demux
    }

    /// Area of one PHY, in GE.
    pub fn phy_area_ge(&self, bandwidth: u32) -> f64 {
        self.phy_base_ge + self.phy_ge_per_bit * f64::from(bandwidth)
    }
}

/// Cost knobs of the heterogeneous (maze) router.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoutingConfig {
    /// Distance added for every change of direction.
    #[serde(default = "default_corner_penalty")]
    pub corner_penalty: u64,
    /// Columns the search may stray beyond the source/destination box.
    #[serde(default = "default_detour_h")]
    pub detour_h: usize,
    /// Rows the search may stray beyond the source/destination box.
    #[serde(default = "default_detour_v")]
    pub detour_v: usize,
}

fn default_corner_penalty() -> u64 {
    5
}

fn default_detour_h() -> usize {
    50
}

fn default_detour_v() -> usize {
    10
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            corner_penalty: default_corner_penalty(),
            detour_h: default_detour_h(),
            detour_v: default_detour_v(),
        }
    }
}
