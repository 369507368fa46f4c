use super::face::FaceId;

slotmap::new_key_type! {
    /// Unique identifier for a shell in the topology store.
    pub struct ShellId;
}

/// A connected set of faces. Faces sharing an edge reference the same
/// [`super::EdgeId`].
#[derive(Debug, Clone)]
pub struct ShellData {
    pub faces: Vec<FaceId>,
    /// Whether this shell is closed (watertight).
    pub is_closed: bool,
}
