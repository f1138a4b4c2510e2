//! Rebuilding tiles and modules from stored descriptors.

use std::path::{Path, PathBuf};
use weave_common::{Mirror, WeaveError};
use weave_config::{load_config, resolve_context, ConfigError, FabricContext, ProjectConfig, ResolvedContext};
use weave_fabric::{
    embed_descriptor, Block, Component, ComponentKind, Module, ModuleBuilder, ModuleDescriptor, Tile,
};

use crate::error::StoreError;
use crate::store::DescriptorStore;

/// A project's descriptor store paired with its configuration.
///
/// Descriptors only name their technology and protocol, so every load
/// resolves the stored context against the project's parameter tables.
#[derive(Debug, Clone)]
pub struct Library {
    store: DescriptorStore,
    config: ProjectConfig,
}

impl Library {
    /// Creates a library over an existing store.
    pub fn new(store: DescriptorStore, config: ProjectConfig) -> Self {
        Self { store, config }
    }

    /// Loads `weave.toml` from `project_dir` and opens its store.
    pub fn open(project_dir: &Path) -> Result<Self, StoreError> {
        let config = load_config(project_dir)?;
        let store = DescriptorStore::new(&project_dir.join(&config.project.store));
        Ok(Self::new(store, config))
    }

    /// The underlying store.
    pub fn store(&self) -> &DescriptorStore {
        &self.store
    }

    /// The project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Resolves `context` against the project's parameter tables.
    pub fn resolve(&self, context: &FabricContext) -> Result<ResolvedContext, StoreError> {
        Ok(resolve_context(&self.config, context)?)
    }

    /// Resolves the project's default context.
    pub fn default_context(&self) -> Result<ResolvedContext, StoreError> {
        let context = self
            .config
            .context
            .as_ref()
            .ok_or_else(|| ConfigError::MissingField("context".to_string()))?;
        self.resolve(context)
    }

    /// Embeds the stored raw tile `name` in `ctx`, saves the embedded
    /// descriptor, and returns the tile.
    pub fn embed(&self, name: &str, ctx: &ResolvedContext) -> Result<(Tile, PathBuf), StoreError> {
        let raw = self.store.load_raw_tile(name)?;
        let desc = embed_descriptor(&raw, ctx)?;
        let path = self.store.save_tile(&desc)?;
        Ok((Tile::from_descriptor(&desc, ctx)?, path))
    }

    /// Loads an embedded tile.
    pub fn tile(&self, name: &str) -> Result<Tile, StoreError> {
        let desc = self.store.load_tile(name)?;
        let ctx = self.resolve(&desc.context)?;
        Ok(Tile::from_descriptor(&desc, &ctx)?)
    }

    /// Loads a module, building every sub-module it places.
    pub fn module(&self, name: &str) -> Result<Module, StoreError> {
        self.build_module(name, &mut Vec::new())
    }

    /// Loads a tile or a module.
    pub fn block(&self, kind: ComponentKind, name: &str) -> Result<Block, StoreError> {
        match kind {
            ComponentKind::Tile => Ok(self.tile(name)?.into()),
            ComponentKind::Module => Ok(self.module(name)?.into()),
        }
    }

    /// Saves a built module's descriptor.
    pub fn save_module(&self, module: &Module) -> Result<PathBuf, StoreError> {
        self.store.save_module(&module.descriptor())
    }

    fn build_module(&self, name: &str, stack: &mut Vec<String>) -> Result<Module, StoreError> {
        if stack.iter().any(|n| n == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(StoreError::Cycle { chain });
        }
        let desc = self.store.load_module(name)?;
        self.resolve(&desc.context)?;
        check_components(&desc)?;

        stack.push(name.to_string());
        let mut builder = ModuleBuilder::new(desc.name.clone(), desc.n_rows, desc.n_cols);
        let mut components = desc.components.iter().collect::<Vec<_>>();
        components.sort_by_key(|c| c.id);
        for c in components {
            let block: Block = match c.kind {
                ComponentKind::Tile => self.tile(&c.name)?.into(),
                ComponentKind::Module => self.build_module(&c.name, stack)?.into(),
            };
            let mirror = Mirror::new(c.xmirror, c.ymirror);
            builder.add_component(Component::place(block, c.location, mirror));
        }
        stack.pop();

        for path in &desc.connections {
            builder.connect(path.clone());
        }
        let module = builder.build()?;
        if *module.context() != desc.context {
            return Err(WeaveError::spec(
                name,
                "stored context differs from the context of its components",
            )
            .into());
        }
        Ok(module)
    }
}

fn check_components(desc: &ModuleDescriptor) -> Result<(), WeaveError> {
    let mut ids = desc.components.iter().map(|c| c.id.as_raw()).collect::<Vec<_>>();
    ids.sort_unstable();
    if ids.iter().enumerate().any(|(i, id)| *id as usize != i) {
        return Err(WeaveError::spec(
            &desc.name,
            format!("component ids must be contiguous from 0, found {ids:?}"),
        ));
    }
    Ok(())
}
