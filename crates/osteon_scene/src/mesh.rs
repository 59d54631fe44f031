use osteon_core::BoundingBox;

/// CPU-side mesh record.
///
/// Only the data the core consumes is kept here: a name and the mesh-local
/// bounding box. Vertex/index buffers belong to the render collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Mesh {
    pub name: String,
    /// Mesh-local bounds; `None` until some primitive contributed bounds.
    pub bounds: Option<BoundingBox>,
}

impl Mesh {
    #[must_use]
    pub fn new(name: &str, bounds: Option<BoundingBox>) -> Self {
        Self {
            name: name.to_string(),
            bounds,
        }
    }

    /// Mesh whose bounds are the union of its primitives' bounds.
    pub fn from_primitive_bounds(
        name: &str,
        primitives: impl IntoIterator<Item = BoundingBox>,
    ) -> Self {
        let bounds = primitives
            .into_iter()
            .reduce(|acc, bbox| acc.union(&bbox));
        Self::new(name, bounds)
    }
}
