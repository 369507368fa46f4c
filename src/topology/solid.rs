use super::shell::ShellId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// A bounded volume enclosed by an outer shell and optional void shells.
#[derive(Debug, Clone)]
pub struct SolidData {
    pub outer_shell: ShellId,
    pub inner_shells: Vec<ShellId>,
}

impl SolidData {
    /// Returns all shells, outer first.
    pub fn shells(&self) -> impl Iterator<Item = ShellId> + '_ {
        std::iter::once(self.outer_shell).chain(self.inner_shells.iter().copied())
    }
}
