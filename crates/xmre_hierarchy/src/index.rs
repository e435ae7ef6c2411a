//! The Hierarchy Index (C2): a single pre-order traversal of the elaborated
//! instance tree, producing the immutable maps every later stage queries
//! instead of re-walking the design themselves.

use std::collections::{HashMap, HashSet};

use xmre_common::{Ident, Interner};
use xmre_ir::Design;

use crate::errors::HierarchyError;

/// Immutable index over an elaborated [`Design`]'s instance tree.
///
/// Built once via [`HierarchyIndex::build`] and read-only thereafter.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    instance_map: HashMap<(Ident, Ident), Ident>,
    instance_paths: HashMap<Ident, Vec<Vec<Ident>>>,
    definitions: HashSet<Ident>,
    instantiated: HashSet<Ident>,
    top_modules: Vec<Ident>,
}

impl HierarchyIndex {
    /// Builds the index from an elaborated design via a single pre-order
    /// traversal starting at each top module (a definition that is never
    /// instantiated by another definition in the design).
    ///
    /// A module that (directly or transitively) instantiates itself is
    /// walked only up to the point of re-entry: the instance map and
    /// instance paths below the repeated module are not expanded again,
    /// since doing so would never terminate. This can only happen on
    /// malformed input — legal SystemVerilog hierarchies are acyclic.
    pub fn build(design: &Design) -> Self {
        let definitions: HashSet<Ident> = design.iter().map(|(_, m)| m.name).collect();
        let mut instantiated: HashSet<Ident> = HashSet::new();
        let mut instance_map: HashMap<(Ident, Ident), Ident> = HashMap::new();

        for (_, m) in design.iter() {
            for inst in &m.instances {
                instantiated.insert(inst.module_name);
                instance_map.insert((m.name, inst.instance_name), inst.module_name);
            }
        }

        let top_modules: Vec<Ident> = design
            .iter()
            .map(|(_, m)| m.name)
            .filter(|name| !instantiated.contains(name))
            .collect();

        let mut instance_paths: HashMap<Ident, Vec<Vec<Ident>>> = HashMap::new();
        for &top in &top_modules {
            let mut stack = Vec::new();
            let mut on_stack = HashSet::new();
            walk(design, top, &mut stack, &mut on_stack, &mut instance_paths);
        }

        Self {
            instance_map,
            instance_paths,
            definitions,
            instantiated,
            top_modules,
        }
    }

    /// Looks up the definition instantiated as `instanceName` within
    /// `parent`.
    pub fn child_of(
        &self,
        parent: Ident,
        instance_name: Ident,
        interner: &Interner,
    ) -> Result<Ident, HierarchyError> {
        self.instance_map
            .get(&(parent, instance_name))
            .copied()
            .ok_or_else(|| HierarchyError::UnknownChildInstance {
                parent: interner.resolve(parent).to_string(),
                instance: interner.resolve(instance_name).to_string(),
            })
    }

    /// Returns every instance path (from some root) at which `module` is
    /// instantiated. Empty if `module` is never instantiated anywhere.
    pub fn paths_to(&self, module: Ident) -> &[Vec<Ident>] {
        self.instance_paths
            .get(&module)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All module definitions known to the design.
    pub fn definitions(&self) -> &HashSet<Ident> {
        &self.definitions
    }

    /// Module definitions that appear as a child instance somewhere in the
    /// design.
    pub fn instantiated(&self) -> &HashSet<Ident> {
        &self.instantiated
    }

    /// Definitions never instantiated by anything else in the design, in
    /// declaration order.
    pub fn top_modules(&self) -> &[Ident] {
        &self.top_modules
    }
}

fn walk(
    design: &Design,
    module_name: Ident,
    stack: &mut Vec<Ident>,
    on_stack: &mut HashSet<Ident>,
    paths: &mut HashMap<Ident, Vec<Vec<Ident>>>,
) {
    paths.entry(module_name).or_default().push(stack.clone());

    if !on_stack.insert(module_name) {
        return;
    }

    if let Some(id) = design.get_by_name(module_name) {
        let def = design.modules.get(id);
        for inst in &def.instances {
            stack.push(inst.instance_name);
            walk(design, inst.module_name, stack, on_stack, paths);
            stack.pop();
        }
    }

    on_stack.remove(&module_name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmre_ir::{DeclKind, Instance, ModuleDefinition, ModuleId, Port, PortDirection};
    use xmre_source::{FileId, Span};

    fn module(interner: &Interner, name: &str, instances: Vec<(&str, &str)>) -> ModuleDefinition {
        ModuleDefinition {
            id: ModuleId::from_raw(0),
            name: interner.get_or_intern(name),
            file: FileId::DUMMY,
            item_index: 0,
            ports: vec![Port {
                name: interner.get_or_intern("clk"),
                direction: PortDirection::Input,
                width: 1,
                kind: DeclKind::Net,
                span: Span::DUMMY,
            }],
            signals: Vec::new(),
            instances: instances
                .into_iter()
                .map(|(inst_name, mod_name)| Instance {
                    instance_name: interner.get_or_intern(inst_name),
                    module_name: interner.get_or_intern(mod_name),
                    module: None,
                    span: Span::DUMMY,
                })
                .collect(),
            span: Span::DUMMY,
        }
    }

    #[test]
    fn single_top_no_instances() {
        let interner = Interner::new();
        let mut design = Design::new();
        design.insert(module(&interner, "leaf", vec![]));
        let index = HierarchyIndex::build(&design);
        let leaf = interner.get_or_intern("leaf");
        assert_eq!(index.top_modules(), &[leaf]);
        assert!(index.instantiated().is_empty());
    }

    #[test]
    fn three_level_hierarchy() {
        let interner = Interner::new();
        let mut design = Design::new();
        design.insert(module(&interner, "leaf", vec![]));
        design.insert(module(&interner, "mid", vec![("u_leaf", "leaf")]));
        design.insert(module(&interner, "top", vec![("u_mid", "mid")]));
        let index = HierarchyIndex::build(&design);

        let top = interner.get_or_intern("top");
        let mid = interner.get_or_intern("mid");
        let leaf = interner.get_or_intern("leaf");
        let u_mid = interner.get_or_intern("u_mid");
        let u_leaf = interner.get_or_intern("u_leaf");

        assert_eq!(index.top_modules(), &[top]);
        assert_eq!(index.child_of(top, u_mid, &interner).unwrap(), mid);
        assert_eq!(index.paths_to(mid), &[vec![u_mid]]);
        assert_eq!(index.paths_to(leaf), &[vec![u_mid, u_leaf]]);
    }

    #[test]
    fn shared_submodule_has_multiple_paths() {
        let interner = Interner::new();
        let mut design = Design::new();
        design.insert(module(&interner, "leaf", vec![]));
        design.insert(module(
            &interner,
            "top",
            vec![("u_a", "leaf"), ("u_b", "leaf")],
        ));
        let index = HierarchyIndex::build(&design);

        let leaf = interner.get_or_intern("leaf");
        let u_a = interner.get_or_intern("u_a");
        let u_b = interner.get_or_intern("u_b");
        let mut paths = index.paths_to(leaf).to_vec();
        paths.sort();
        let mut expected = vec![vec![u_a], vec![u_b]];
        expected.sort();
        assert_eq!(paths, expected);
    }

    #[test]
    fn unknown_child_instance_errors() {
        let interner = Interner::new();
        let mut design = Design::new();
        design.insert(module(&interner, "top", vec![]));
        let index = HierarchyIndex::build(&design);
        let top = interner.get_or_intern("top");
        let bogus = interner.get_or_intern("bogus");
        let err = index.child_of(top, bogus, &interner).unwrap_err();
        assert!(matches!(err, HierarchyError::UnknownChildInstance { .. }));
    }

    #[test]
    fn self_instantiating_module_does_not_infinite_loop() {
        let interner = Interner::new();
        let mut design = Design::new();
        design.insert(module(&interner, "rec", vec![("u_self", "rec")]));
        let index = HierarchyIndex::build(&design);
        let rec = interner.get_or_intern("rec");
        // `rec` instantiates itself, so it's "instantiated" and has no top.
        assert!(index.top_modules().is_empty());
        assert!(index.instantiated().contains(&rec));
    }
}
