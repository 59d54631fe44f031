use glam::{Affine3A, Mat3, Vec3, Vec3A};

/// Axis-aligned bounding box.
///
/// A box only exists once some geometry contributed to it; "no bounds yet" is
/// expressed as `Option<BoundingBox>` by the owners of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |bbox, p| Self {
            min: bbox.min.min(p),
            max: bbox.max.max(p),
        }))
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Whether `other` lies entirely inside this box, with `epsilon` slack.
    #[must_use]
    pub fn contains(&self, other: &BoundingBox, epsilon: f32) -> bool {
        let slack = Vec3::splat(epsilon);
        (self.min - slack).cmple(other.min).all() && (self.max + slack).cmpge(other.max).all()
    }

    /// World-space box of this local box under `matrix`.
    ///
    /// Uses axis projection: each basis column of the linear part is scaled
    /// by the local min and max extent along its axis, and the component-wise
    /// min/max of the two products is accumulated onto the translation. The
    /// result fully contains the transformed box without visiting its corners.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let origin = matrix.translation;
        let mut min = origin;
        let mut max = origin;

        let axes = [
            (matrix.matrix3.x_axis, self.min.x, self.max.x),
            (matrix.matrix3.y_axis, self.min.y, self.max.y),
            (matrix.matrix3.z_axis, self.min.z, self.max.z),
        ];

        for (axis, lo, hi) in axes {
            let v0: Vec3A = axis * lo;
            let v1: Vec3A = axis * hi;
            min += v0.min(v1);
            max += v0.max(v1);
        }

        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Matrix mapping the unit cube `[0, 1]^3` onto this box.
    #[must_use]
    pub fn unit_cube_transform(&self) -> Affine3A {
        Affine3A::from_mat3_translation(Mat3::from_diagonal(self.size()), self.min)
    }
}
