/// Configuration options supplied when loading a [`super::Graph`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadOptions {
    /// Reject GFA record types the loader does not use instead of skipping them.
    pub strict: bool,
    /// Create missing edges between consecutive path steps instead of failing.
    pub infer_path_edges: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict: false,
            infer_path_edges: true,
        }
    }
}

impl LoadOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables strict record checking.
    pub fn strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }

    /// Enables or disables edge inference along paths.
    pub fn infer_path_edges(mut self, enabled: bool) -> Self {
        self.infer_path_edges = enabled;
        self
    }
}
