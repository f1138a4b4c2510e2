//! Area and power rollups.

use crate::grid::CellCensus;
use crate::unit::UnitCellModel;
use serde::{Deserialize, Serialize};

/// Area and power of a tile or module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaPower {
    /// Area of the whole grid, in mm².
    pub total_area_mm2: f64,
    /// Area of logic, port, and PHY cells, in mm².
    pub logic_area_mm2: f64,
    /// Area of cells carrying wires, in mm².
    pub wire_area_mm2: f64,
    /// Area of unused cells, in mm².
    pub empty_area_mm2: f64,
    /// Power of the logic cells, in W.
    pub logic_power_w: f64,
    /// Power of the wiring, in W.
    pub wire_power_w: f64,
}

impl AreaPower {
    /// Rollup of a single tile: every cell is logic.
    pub fn tile(rows: usize, cols: usize, unit: &UnitCellModel) -> Self {
        let cells = (rows * cols) as f64;
        Self {
            total_area_mm2: cells * unit.area_mm2,
            logic_area_mm2: cells * unit.area_mm2,
            wire_area_mm2: 0.0,
            empty_area_mm2: 0.0,
            logic_power_w: cells * unit.logic_power_w,
            wire_power_w: 0.0,
        }
    }

    /// Rollup of a composed grid.
    ///
    /// A cell carrying one wire on each axis draws one unit of wire power, so
    /// wire power is half the summed wire counts.
    pub fn module(census: &CellCensus, unit: &UnitCellModel) -> Self {
        let cells = census.logic + census.wire + census.empty;
        let wires = (census.h_wires + census.v_wires) as f64;
        Self {
            total_area_mm2: cells as f64 * unit.area_mm2,
            logic_area_mm2: census.logic as f64 * unit.area_mm2,
            wire_area_mm2: census.wire as f64 * unit.area_mm2,
            empty_area_mm2: census.empty as f64 * unit.area_mm2,
            logic_power_w: census.logic as f64 * unit.logic_power_w,
            wire_power_w: 0.5 * wires * unit.wire_power_w,
        }
    }

    /// Logic plus wire power.
    pub fn total_power_w(&self) -> f64 {
        self.logic_power_w + self.wire_power_w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::fixtures;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn tile_rollup() {
        let unit = UnitCellModel::new(&fixtures::context());
        let ap = AreaPower::tile(10, 10, &unit);
        assert!(close(ap.total_area_mm2, 0.01));
        assert!(close(ap.logic_power_w, 100.0 * unit.logic_power_w));
        assert_eq!(ap.wire_power_w, 0.0);
    }

    #[test]
    fn module_rollup() {
        let unit = UnitCellModel::new(&fixtures::context());
        let census = CellCensus {
            logic: 200,
            wire: 10,
            empty: 30,
            h_wires: 8,
            v_wires: 4,
        };
        let ap = AreaPower::module(&census, &unit);
        assert!(close(ap.total_area_mm2, 240.0 * unit.area_mm2));
        assert!(close(ap.wire_area_mm2, 10.0 * unit.area_mm2));
        assert!(close(ap.wire_power_w, 6.0 * unit.wire_power_w));
        assert!(close(ap.total_power_w(), 200.0 * unit.logic_power_w + 6.0 * unit.wire_power_w));
    }
}
