//! The top-level elaborated design: every module definition found across the
//! input file set, keyed both by [`ModuleId`] and by name.

use std::collections::HashMap;
use xmre_common::Ident;

use crate::arena::Arena;
use crate::ids::ModuleId;
use crate::module::ModuleDefinition;

/// The elaborated design produced by the Elaboration Facade (C1): every
/// module definition discovered across the input files, with direct child
/// instances resolved to their defining [`ModuleId`] where possible.
#[derive(Debug, Clone, Default)]
pub struct Design {
    /// All module definitions, in discovery order.
    pub modules: Arena<ModuleId, ModuleDefinition>,
    /// Name-based lookup into `modules`.
    by_name: HashMap<Ident, ModuleId>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self {
            modules: Arena::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registers a module definition, indexing it by name.
    ///
    /// The `id` field of the given definition is overwritten with the
    /// freshly allocated [`ModuleId`] before insertion, so callers may pass
    /// a placeholder. Returns the allocated ID. If a module with the same
    /// name was already registered, the new one still gets a fresh ID but
    /// `by_name` is overwritten to point at the latest definition (duplicate
    /// module names are a frontend/user error this facade does not police).
    pub fn insert(&mut self, def: ModuleDefinition) -> ModuleId {
        let name = def.name;
        let id = self.modules.alloc(def);
        self.modules.get_mut(id).id = id;
        self.by_name.insert(name, id);
        id
    }

    /// Looks up a module definition by name.
    pub fn get_by_name(&self, name: Ident) -> Option<ModuleId> {
        self.by_name.get(&name).copied()
    }

    /// Iterates over all module definitions in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleId, &ModuleDefinition)> {
        self.modules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleDefinition;
    use xmre_common::Interner;
    use xmre_source::Span;

    fn dummy_module(name: Ident) -> ModuleDefinition {
        ModuleDefinition {
            id: ModuleId::from_raw(0),
            name,
            file: xmre_source::FileId::DUMMY,
            item_index: 0,
            ports: Vec::new(),
            signals: Vec::new(),
            instances: Vec::new(),
            span: Span::DUMMY,
        }
    }

    #[test]
    fn insert_and_lookup() {
        let interner = Interner::new();
        let mut design = Design::new();
        let top = interner.get_or_intern("top");
        let id = design.insert(dummy_module(top));
        assert_eq!(design.get_by_name(top), Some(id));
    }

    #[test]
    fn unknown_name_is_none() {
        let interner = Interner::new();
        let design = Design::new();
        let missing = interner.get_or_intern("missing");
        assert_eq!(design.get_by_name(missing), None);
    }
}
