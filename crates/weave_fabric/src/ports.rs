//! Port and PHY tables with label/location lookups in both directions.

use crate::label::Label;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use weave_common::{ComponentId, Coord, Mirror};

/// Signal direction of a PHY relative to the chip.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhyDirection {
    /// Traffic enters the chip through this PHY.
    In,
    /// Traffic leaves the chip through this PHY.
    Out,
}

/// A placed port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortEntry {
    /// Global label of the port.
    pub label: Label,
    /// Cell holding the port marker.
    pub location: Coord,
}

/// A placed PHY.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhyEntry {
    /// Global label of the PHY.
    pub label: Label,
    /// Cell holding the PHY marker.
    pub location: Coord,
    /// Direction of traffic.
    pub direction: PhyDirection,
}

/// Ordered master ports, slave ports, and PHYs of a layout.
///
/// Entries keep insertion order; two hash maps answer label-to-location and
/// location-to-label queries and are rebuilt by every transform.
#[derive(Clone, Debug, Default)]
pub struct PortTable {
    masters: Vec<PortEntry>,
    slaves: Vec<PortEntry>,
    phys: Vec<PhyEntry>,
    locations: HashMap<Label, Coord>,
    labels: HashMap<Coord, Label>,
}

impl PortTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&mut self, label: &Label, location: Coord) {
        self.locations.insert(label.clone(), location);
        self.labels.insert(location, label.clone());
    }

    /// Appends a master port.
    pub fn push_master(&mut self, label: Label, location: Coord) {
        self.index(&label, location);
        self.masters.push(PortEntry { label, location });
    }

    /// Appends a slave port.
    pub fn push_slave(&mut self, label: Label, location: Coord) {
        self.index(&label, location);
        self.slaves.push(PortEntry { label, location });
    }

    /// Appends a PHY.
    pub fn push_phy(&mut self, label: Label, location: Coord, direction: PhyDirection) {
        self.index(&label, location);
        self.phys.push(PhyEntry {
            label,
            location,
            direction,
        });
    }

    /// Master ports in order.
    pub fn masters(&self) -> &[PortEntry] {
        &self.masters
    }

    /// Slave ports in order.
    pub fn slaves(&self) -> &[PortEntry] {
        &self.slaves
    }

    /// PHYs in order.
    pub fn phys(&self) -> &[PhyEntry] {
        &self.phys
    }

    /// Cell of the port or PHY named `label`.
    pub fn location_of(&self, label: &Label) -> Option<Coord> {
        self.locations.get(label).copied()
    }

    /// Label of the port or PHY at `location`.
    pub fn label_at(&self, location: Coord) -> Option<&Label> {
        self.labels.get(&location)
    }

    /// Total number of ports and PHYs.
    pub fn len(&self) -> usize {
        self.masters.len() + self.slaves.len() + self.phys.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies every entry of `child` into this table, prefixing labels with
    /// `component` and shifting locations by `origin`.
    pub fn absorb(&mut self, child: &PortTable, component: ComponentId, origin: Coord) {
        for p in &child.masters {
            self.push_master(p.label.prefixed(component), p.location.offset(origin));
        }
        for p in &child.slaves {
            self.push_slave(p.label.prefixed(component), p.location.offset(origin));
        }
        for p in &child.phys {
            self.push_phy(
                p.label.prefixed(component),
                p.location.offset(origin),
                p.direction,
            );
        }
    }

    /// Returns a copy with every location reflected inside a `rows` x `cols` grid.
    pub fn mirrored(&self, rows: usize, cols: usize, mirror: Mirror) -> PortTable {
        let mut out = PortTable::new();
        for p in &self.masters {
            out.push_master(p.label.clone(), p.location.mirrored(rows, cols, mirror));
        }
        for p in &self.slaves {
            out.push_slave(p.label.clone(), p.location.mirrored(rows, cols, mirror));
        }
        for p in &self.phys {
            out.push_phy(
                p.label.clone(),
                p.location.mirrored(rows, cols, mirror),
                p.direction,
            );
        }
        out
    }
}

impl PartialEq for PortTable {
    fn eq(&self, other: &Self) -> bool {
        self.masters == other.masters && self.slaves == other.slaves && self.phys == other.phys
    }
}

impl Eq for PortTable {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Terminal;
    use weave_common::{PhyId, PortId};

    fn table() -> PortTable {
        let mut t = PortTable::new();
        t.push_master(Label::local(Terminal::Master(PortId::from_raw(0))), Coord::new(4, 1));
        t.push_slave(Label::local(Terminal::Slave(PortId::from_raw(0))), Coord::new(0, 2));
        t.push_phy(
            Label::local(Terminal::Phy(PhyId::from_raw(0))),
            Coord::new(2, 2),
            PhyDirection::In,
        );
        t
    }

    #[test]
    fn lookups_are_consistent() {
        let t = table();
        assert_eq!(t.len(), 3);
        for entry in t.masters().iter().chain(t.slaves()) {
            assert_eq!(t.location_of(&entry.label), Some(entry.location));
            assert_eq!(t.label_at(entry.location), Some(&entry.label));
        }
        assert_eq!(t.label_at(Coord::new(1, 1)), None);
    }

    #[test]
    fn absorb_prefixes_and_offsets() {
        let mut parent = PortTable::new();
        parent.absorb(&table(), ComponentId::from_raw(2), Coord::new(10, 20));
        let label: Label = "2/mp0".parse().unwrap();
        assert_eq!(parent.location_of(&label), Some(Coord::new(14, 21)));
        assert_eq!(parent.phys()[0].location, Coord::new(12, 22));
    }

    #[test]
    fn mirror_twice_restores() {
        let t = table();
        let m = t.mirrored(5, 5, Mirror::X);
        assert_eq!(m.masters()[0].location, Coord::new(0, 1));
        assert_eq!(m.label_at(Coord::new(0, 1)), Some(&t.masters()[0].label));
        assert_eq!(m.mirrored(5, 5, Mirror::X), t);
    }

    #[test]
    fn equality_compares_ordered_entries() {
        assert_eq!(table(), table());
        let mut reordered = PortTable::new();
        reordered.push_master(Label::local(Terminal::Master(PortId::from_raw(1))), Coord::new(4, 3));
        reordered.push_master(Label::local(Terminal::Master(PortId::from_raw(0))), Coord::new(4, 1));
        let mut ordered = PortTable::new();
        ordered.push_master(Label::local(Terminal::Master(PortId::from_raw(0))), Coord::new(4, 1));
        ordered.push_master(Label::local(Terminal::Master(PortId::from_raw(1))), Coord::new(4, 3));
        assert_eq!(ordered.location_of(&reordered.masters()[0].label), Some(Coord::new(4, 3)));
        assert_ne!(ordered, reordered);
    }
}
