use rustc_hash::FxHashMap;

use crate::error::{Result, TopologyError};
use crate::topology::{EdgeId, FaceId, ShellData, ShellId, TopologyStore};

/// Creates a shell from faces that share edges by key.
pub struct MakeShell {
    faces: Vec<FaceId>,
}

impl MakeShell {
    /// Creates a new `MakeShell` operation.
    #[must_use]
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces }
    }

    /// Executes the operation, creating the shell in the topology store.
    ///
    /// The shell is closed when every edge is used exactly twice across the
    /// face boundaries (a seam edge counts twice within its own face).
    ///
    /// # Errors
    ///
    /// Returns an error if there are no faces or a face or wire is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<ShellId> {
        if self.faces.is_empty() {
            return Err(TopologyError::InvalidTopology("shell has no faces".into()).into());
        }

        let mut uses: FxHashMap<EdgeId, usize> = FxHashMap::default();
        for f in &self.faces {
            let face = store.face(*f)?;
            for w in std::iter::once(&face.outer_wire).chain(&face.inner_wires) {
                for oe in &store.wire(*w)?.edges {
                    *uses.entry(oe.edge).or_insert(0) += 1;
                }
            }
        }
        let is_closed = uses.values().all(|n| *n == 2);

        Ok(store.add_shell(ShellData {
            faces: self.faces.clone(),
            is_closed,
        }))
    }
}
