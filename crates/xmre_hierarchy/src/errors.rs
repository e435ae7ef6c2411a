//! Error kinds raised while querying a built [`crate::HierarchyIndex`].

/// Failure querying the hierarchy index.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HierarchyError {
    /// `childOf(parent, instanceName)` was asked for an instance name that
    /// does not appear under the given parent module.
    #[error("module `{parent}` has no instance named `{instance}`")]
    UnknownChildInstance {
        /// The parent module that was queried.
        parent: String,
        /// The instance name that was not found.
        instance: String,
    },
}
