//! Pass 2: appends new `.portName(localSignal)` connections to every
//! instantiation site a `ChangeSet` names, after every module's own port
//! additions have already been decided by Pass 1.
//!
//! Runs strictly after Pass 1 across every file, never interleaved with
//! it: an instance's connection list can only be grown correctly once the
//! full set of new ports on every module is already fixed.

use std::collections::HashMap;

use xmre_common::{Ident, Interner};
use xmre_ir::Design;
use xmre_plan::ChangeSet;
use xmre_source::{FileId, SourceDb};
use xmre_sv::ast::{ModuleItem, SvItem, SvSourceFile};

use crate::edit::Edit;

/// Builds every Pass 2 edit for every instantiation site in `design`,
/// keyed by the file each edit applies to.
pub fn build_pass2_edits(
    design: &Design,
    files: &[(FileId, SvSourceFile)],
    _source_db: &SourceDb,
    interner: &Interner,
    change_set: &ChangeSet,
) -> HashMap<FileId, Vec<Edit>> {
    let mut by_site: HashMap<(Ident, Ident), Vec<&xmre_plan::ConnectionChange>> = HashMap::new();
    for change in &change_set.connection_changes {
        by_site
            .entry((change.parent_module, change.instance_name))
            .or_default()
            .push(change);
    }

    let mut edits: HashMap<FileId, Vec<Edit>> = HashMap::new();
    if by_site.is_empty() {
        return edits;
    }

    for (_, module) in design.iter() {
        let Some((_, file)) = files.iter().find(|(id, _)| *id == module.file) else {
            continue;
        };
        let Some(SvItem::Module(decl)) = file.items.get(module.item_index) else {
            continue;
        };

        for item in &decl.items {
            let ModuleItem::Instantiation(inst) = item else {
                continue;
            };
            for instance in &inst.instances {
                let Some(changes) = by_site.get(&(module.name, instance.name)) else {
                    continue;
                };

                let had_connections = !instance.connections.is_empty();
                let text: String = changes
                    .iter()
                    .map(|c| {
                        format!(
                            ", .{}({})",
                            interner.resolve(c.port_name),
                            interner.resolve(c.local_signal),
                        )
                    })
                    .collect();
                let text = if had_connections {
                    text
                } else {
                    text.strip_prefix(", ").unwrap_or(&text).to_string()
                };

                // `Instance::span` ends exactly at the connection list's
                // closing `)`.
                let insert_at = instance.span.end.saturating_sub(1);
                edits.entry(module.file).or_default().push(Edit::insert(insert_at, text));
            }
        }
    }

    edits
}
