//! Physical size, delay, and power of one unit cell.
//!
//! A unit cell is as wide as one connection's worth of vertical wires and as
//! tall as one connection's worth of horizontal wires, so every routing
//! channel cell carries exactly one connection per axis.

use serde::{Deserialize, Serialize};
use weave_config::ResolvedContext;

/// Derived properties of a unit cell in a given fabric context.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitCellModel {
    /// Wires per connection.
    pub wires: u32,
    /// Cell width in mm.
    pub width_mm: f64,
    /// Cell height in mm.
    pub height_mm: f64,
    /// Cell area in mm².
    pub area_mm2: f64,
    /// Delay of crossing one cell horizontally, in clock cycles.
    pub delay_h: f64,
    /// Delay of crossing one cell vertically, in clock cycles.
    pub delay_v: f64,
    /// Power of one logic cell, in W.
    pub logic_power_w: f64,
    /// Power of one fully wired cell, in W.
    pub wire_power_w: f64,
}

impl UnitCellModel {
    /// Computes the unit cell for a resolved context.
    pub fn new(ctx: &ResolvedContext) -> Self {
        let tech = &ctx.technology;
        let wires = ctx.protocol.wires_per_connection(ctx.context.bandwidth);
        let width_mm = tech.mm_per_vertical_wire * f64::from(wires);
        let height_mm = tech.mm_per_horizontal_wire * f64::from(wires);
        let area_mm2 = width_mm * height_mm;
        let frequency = ctx.context.frequency;
        Self {
            wires,
            width_mm,
            height_mm,
            area_mm2,
            delay_h: frequency.cycles(tech.s_per_mm * width_mm),
            delay_v: frequency.cycles(tech.s_per_mm * height_mm),
            logic_power_w: tech.w_per_mm2_logic * area_mm2,
            wire_power_w: tech.w_per_mm2_wire * area_mm2,
        }
    }
}
