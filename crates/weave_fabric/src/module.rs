//! Hierarchical composition of tiles and modules.
//!
//! A [`ModuleBuilder`] collects placed components and wire paths; `build`
//! merges component grids, prefixes labels, draws every wire, and merges the
//! logical graphs. Components own their (possibly mirrored) copy of the block
//! they place.

use crate::descriptor::{ComponentDescriptor, ComponentKind, ModuleDescriptor};
use crate::graph::LogicalGraph;
use crate::grid::Grid;
use crate::layout::Layout;
use crate::path::WirePath;
use crate::ports::PortTable;
use crate::stats::AreaPower;
use crate::tile::Tile;
use crate::unit::UnitCellModel;
use weave_common::{ComponentId, Coord, Mirror, WeaveError, WeaveResult};
use weave_config::FabricContext;

/// What a component places: a tile or a module.
#[derive(Clone, Debug)]
pub enum Block {
    /// An embedded tile.
    Tile(Tile),
    /// A composed module.
    Module(Module),
}

impl Block {
    /// Name of the tile or module.
    pub fn name(&self) -> &str {
        match self {
            Block::Tile(t) => t.name(),
            Block::Module(m) => m.name(),
        }
    }

    /// Tile or module.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Block::Tile(_) => ComponentKind::Tile,
            Block::Module(_) => ComponentKind::Module,
        }
    }

    /// Physical view.
    pub fn layout(&self) -> &Layout {
        match self {
            Block::Tile(t) => t.layout(),
            Block::Module(m) => m.layout(),
        }
    }

    /// Logical view.
    pub fn graph(&self) -> &LogicalGraph {
        match self {
            Block::Tile(t) => t.graph(),
            Block::Module(m) => m.graph(),
        }
    }

    /// Context the block was built for.
    pub fn context(&self) -> &FabricContext {
        match self {
            Block::Tile(t) => t.context(),
            Block::Module(m) => m.context(),
        }
    }

    /// Unit cell of the block's context.
    pub fn unit(&self) -> &UnitCellModel {
        match self {
            Block::Tile(t) => t.unit(),
            Block::Module(m) => m.unit(),
        }
    }

    /// Height in cells.
    pub fn rows(&self) -> usize {
        self.layout().rows()
    }

    /// Width in cells.
    pub fn cols(&self) -> usize {
        self.layout().cols()
    }

    /// A reflected copy.
    pub fn mirrored(&self, mirror: Mirror) -> Block {
        match self {
            Block::Tile(t) => Block::Tile(t.mirrored(mirror)),
            Block::Module(m) => Block::Module(m.mirrored(mirror)),
        }
    }
}

impl From<Tile> for Block {
    fn from(tile: Tile) -> Self {
        Block::Tile(tile)
    }
}

impl From<Module> for Block {
    fn from(module: Module) -> Self {
        Block::Module(module)
    }
}

/// A block placed at a grid offset with a fixed orientation.
#[derive(Clone, Debug)]
pub struct Component {
    origin: Coord,
    mirror: Mirror,
    block: Block,
}

impl Component {
    /// Places `block` at `origin`, reflecting it first.
    pub fn place(block: impl Into<Block>, origin: Coord, mirror: Mirror) -> Self {
        let block = block.into();
        let block = if mirror.is_identity() {
            block
        } else {
            block.mirrored(mirror)
        };
        Self {
            origin,
            mirror,
            block,
        }
    }

    /// South-west corner in the parent grid.
    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Orientation relative to the block as stored.
    pub fn mirror(&self) -> Mirror {
        self.mirror
    }

    /// The placed (already reflected) block.
    pub fn block(&self) -> &Block {
        &self.block
    }

    fn mirrored(&self, rows: usize, cols: usize, mirror: Mirror) -> Component {
        let row = if mirror.x {
            rows - self.origin.row - self.block.rows()
        } else {
            self.origin.row
        };
        let col = if mirror.y {
            cols - self.origin.col - self.block.cols()
        } else {
            self.origin.col
        };
        Component {
            origin: Coord::new(row, col),
            mirror: self.mirror.then(mirror),
            block: self.block.mirrored(mirror),
        }
    }
}

/// A composed module. Immutable once built.
#[derive(Clone, Debug)]
pub struct Module {
    name: String,
    context: FabricContext,
    unit: UnitCellModel,
    components: Vec<Component>,
    connections: Vec<WirePath>,
    layout: Layout,
    graph: LogicalGraph,
    stats: AreaPower,
    collisions: u64,
}

impl Module {
    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Context shared by all components.
    pub fn context(&self) -> &FabricContext {
        &self.context
    }

    /// Unit cell of the module's context.
    pub fn unit(&self) -> &UnitCellModel {
        &self.unit
    }

    /// Height in cells.
    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    /// Width in cells.
    pub fn cols(&self) -> usize {
        self.layout.cols()
    }

    /// Placed components in id order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// This module's own connections (sub-module wiring excluded).
    pub fn connections(&self) -> &[WirePath] {
        &self.connections
    }

    /// Merged grid, ports, tile frames, and every wire path.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Merged logical graph.
    pub fn graph(&self) -> &LogicalGraph {
        &self.graph
    }

    /// Area and power.
    pub fn stats(&self) -> &AreaPower {
        &self.stats
    }

    /// Wire collisions recorded while drawing every path, nested ones included.
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// A reflected copy. Labels, graph, and statistics are unchanged.
    pub fn mirrored(&self, mirror: Mirror) -> Module {
        if mirror.is_identity() {
            return self.clone();
        }
        let (rows, cols) = (self.rows(), self.cols());
        Module {
            components: self
                .components
                .iter()
                .map(|c| c.mirrored(rows, cols, mirror))
                .collect(),
            connections: self
                .connections
                .iter()
                .map(|p| p.mirrored(rows, cols, mirror))
                .collect(),
            layout: self.layout.mirrored(mirror),
            ..self.clone()
        }
    }

    /// The persisted form of this module.
    pub fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor {
            name: self.name.clone(),
            context: self.context.clone(),
            n_rows: self.rows(),
            n_cols: self.cols(),
            components: self
                .components
                .iter()
                .enumerate()
                .map(|(i, c)| ComponentDescriptor {
                    id: ComponentId::from_raw(i as u32),
                    kind: c.block.kind(),
                    name: c.block.name().to_string(),
                    location: c.origin,
                    xmirror: c.mirror.x,
                    ymirror: c.mirror.y,
                })
                .collect(),
            connections: self.connections.clone(),
        }
    }
}

/// Merged component grids before this module's own wiring is drawn.
#[derive(Clone, Debug)]
pub struct Floorplan {
    /// Component markers, inherited wires, ports, and frames.
    pub layout: Layout,
    /// Collisions among inherited wires.
    pub collisions: u64,
}

/// Collects components and connections, then builds a [`Module`].
#[derive(Clone, Debug)]
pub struct ModuleBuilder {
    name: String,
    rows: usize,
    cols: usize,
    components: Vec<Component>,
    connections: Vec<WirePath>,
}

impl ModuleBuilder {
    /// Starts a `rows` x `cols` module.
    pub fn new(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            components: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a component and returns its id.
    pub fn add_component(&mut self, component: Component) -> ComponentId {
        self.components.push(component);
        ComponentId::from_raw((self.components.len() - 1) as u32)
    }

    /// Adds a connection from a master port to a slave port.
    pub fn connect(&mut self, path: WirePath) {
        self.connections.push(path);
    }

    /// Components added so far.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    fn shared_context(&self) -> WeaveResult<(&FabricContext, &UnitCellModel)> {
        let first = self.components.first().ok_or_else(|| {
            WeaveError::spec(self.name.as_str(), "module has no components")
        })?;
        let context = first.block.context();
        if let Some(other) = self.components.iter().find(|c| c.block.context() != context) {
            return Err(WeaveError::spec(
                self.name.as_str(),
                format!(
                    "component '{}' was built for a different context than '{}'",
                    other.block.name(),
                    first.block.name()
                ),
            ));
        }
        Ok((context, first.block.unit()))
    }

    /// Merges component grids and ports and draws inherited wiring.
    pub fn floorplan(&self) -> WeaveResult<Floorplan> {
        let name = self.name.as_str();
        let mut grid = Grid::new(self.rows, self.cols);
        let mut ports = PortTable::new();
        let mut frames = Vec::new();
        for (i, c) in self.components.iter().enumerate() {
            let id = ComponentId::from_raw(i as u32);
            let child = c.block.layout();
            grid.paste(&child.grid, c.origin, name)?;
            ports.absorb(&child.ports, id, c.origin);
            frames.extend(child.frames.iter().map(|f| f.translated(c.origin)));
        }
        let mut paths = Vec::new();
        let mut collisions = 0;
        for c in &self.components {
            for path in &c.block.layout().paths {
                let path = path.translated(c.origin);
                collisions += grid.occupy(&path, name)?;
                paths.push(path);
            }
        }
        Ok(Floorplan {
            layout: Layout {
                grid,
                ports,
                frames,
                paths,
            },
            collisions,
        })
    }

    /// Builds the module.
    pub fn build(self) -> WeaveResult<Module> {
        let (context, unit) = self.shared_context()?;
        let (context, unit) = (context.clone(), *unit);
        let Floorplan {
            mut layout,
            mut collisions,
        } = self.floorplan()?;
        let name = self.name.as_str();

        let mut graph = LogicalGraph::new();
        for (i, c) in self.components.iter().enumerate() {
            graph.absorb(c.block.graph(), ComponentId::from_raw(i as u32));
        }

        for path in &self.connections {
            path.validate(name)?;
            let (Some(src), Some(dst)) = (path.source(), path.destination()) else {
                continue;
            };
            let master = layout
                .ports
                .label_at(src)
                .filter(|l| l.is_master())
                .cloned()
                .ok_or_else(|| WeaveError::spec(name, format!("connection starts at {src}, not at a master port")))?;
            let slave = layout
                .ports
                .label_at(dst)
                .filter(|l| l.is_slave())
                .cloned()
                .ok_or_else(|| WeaveError::spec(name, format!("connection ends at {dst}, not at a slave port")))?;
            collisions += layout.grid.occupy(path, name)?;
            graph.add_edge(&master, &slave, path.delay(unit.delay_h, unit.delay_v))?;
            layout.paths.push(path.clone());
        }

        let stats = AreaPower::module(&layout.grid.census(), &unit);
        Ok(Module {
            name: self.name,
            context,
            unit,
            components: self.components,
            connections: self.connections,
            layout,
            graph,
            stats,
            collisions,
        })
    }
}
