//! geometry.rs
//! The geometric gate variants: rectangle, polygon, polytope, ellipsoid.
//! Each exposes a pure point-membership test over coordinates already
//! extracted along the gate's dimensions.

use crate::error::EngineError;
use crate::resolver::ParameterReference;

/// Tolerance for the polygon boundary test. Boundary points count as inside.
const BOUNDARY_EPS: f64 = 1e-9;

fn invalid(gate_id: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidGateDescription {
        gate_id: gate_id.to_string(),
        message: message.into(),
    }
}

/// An axis-aligned region: one half-open `[min, max)` range per dimension.
#[derive(Debug, Clone)]
pub struct RectangleGate {
    id: String,
    dimensions: Vec<ParameterReference>,
    ranges: Vec<(f64, f64)>,
}

impl RectangleGate {
    /// `bounds` pairs each dimension with its `[min, max)` range.
    pub fn new(
        id: impl Into<String>,
        bounds: Vec<(ParameterReference, f64, f64)>,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        if bounds.is_empty() {
            return Err(invalid(&id, "rectangle gate requires at least one dimension"));
        }
        let mut dimensions = Vec::with_capacity(bounds.len());
        let mut ranges = Vec::with_capacity(bounds.len());
        for (dimension, min, max) in bounds {
            if !(min < max) {
                return Err(invalid(
                    &id,
                    format!("empty range [{min}, {max}) on dimension '{dimension}'"),
                ));
            }
            dimensions.push(dimension);
            ranges.push((min, max));
        }
        Ok(Self { id, dimensions, ranges })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimensions(&self) -> &[ParameterReference] {
        &self.dimensions
    }

    /// Inside iff every coordinate falls in its range: min inclusive, max
    /// exclusive.
    pub fn contains(&self, point: &[f64]) -> bool {
        point
            .iter()
            .zip(&self.ranges)
            .all(|(&v, &(min, max))| v >= min && v < max)
    }
}

/// A closed 2D polygon over exactly two dimensions. The boundary counts as
/// inside; the ring may be convex or non-convex.
#[derive(Debug, Clone)]
pub struct PolygonGate {
    id: String,
    dimensions: Vec<ParameterReference>,
    vertices: Vec<(f64, f64)>,
}

impl PolygonGate {
    pub fn new(
        id: impl Into<String>,
        dimensions: [ParameterReference; 2],
        vertices: Vec<(f64, f64)>,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        if vertices.len() < 3 {
            return Err(invalid(
                &id,
                format!("polygon gate requires at least 3 vertices, got {}", vertices.len()),
            ));
        }
        Ok(Self { id, dimensions: dimensions.into(), vertices })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimensions(&self) -> &[ParameterReference] {
        &self.dimensions
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        point_in_ring(point[0], point[1], &self.vertices)
    }
}

/// Ray-crossing point-in-polygon with an explicit on-boundary check first,
/// so boundary points count as inside regardless of crossing parity.
fn point_in_ring(x: f64, y: f64, ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];

        let cross = (xj - xi) * (y - yi) - (yj - yi) * (x - xi);
        let within_bbox = (x - xi) * (x - xj) <= BOUNDARY_EPS && (y - yi) * (y - yj) <= BOUNDARY_EPS;
        if cross.abs() <= BOUNDARY_EPS && within_bbox {
            return true;
        }

        if (yi > y) != (yj > y) {
            let x_cross = xi + (y - yi) * (xj - xi) / (yj - yi);
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// A convex region of arbitrary dimension, defined by a list of points over
/// a shared dimension set.
///
/// With two dimensions the listed points are treated as a polygon ring. For
/// any other dimensionality each point defines one half-space: the
/// hyperplane through the point whose normal faces the centroid of all
/// listed points. A point is inside iff it satisfies every inequality
/// (boundary included).
#[derive(Debug, Clone)]
pub struct PolytopeGate {
    id: String,
    dimensions: Vec<ParameterReference>,
    points: Vec<Vec<f64>>,
    centroid: Vec<f64>,
}

impl PolytopeGate {
    pub fn new(
        id: impl Into<String>,
        dimensions: Vec<ParameterReference>,
        points: Vec<Vec<f64>>,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        if dimensions.is_empty() {
            return Err(invalid(&id, "polytope gate requires at least one dimension"));
        }
        if points.is_empty() {
            return Err(invalid(&id, "polytope gate requires at least one point"));
        }
        let d = dimensions.len();
        if let Some(bad) = points.iter().find(|p| p.len() != d) {
            return Err(invalid(
                &id,
                format!("point {bad:?} has {} coordinates, expected {d}", bad.len()),
            ));
        }
        if d == 2 && points.len() < 3 {
            return Err(invalid(
                &id,
                format!("2D polytope gate requires at least 3 points, got {}", points.len()),
            ));
        }

        let mut centroid = vec![0.0; d];
        for point in &points {
            for (c, v) in centroid.iter_mut().zip(point) {
                *c += v;
            }
        }
        for c in &mut centroid {
            *c /= points.len() as f64;
        }

        Ok(Self { id, dimensions, points, centroid })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimensions(&self) -> &[ParameterReference] {
        &self.dimensions
    }

    pub fn contains(&self, point: &[f64]) -> bool {
        if self.dimensions.len() == 2 {
            let ring: Vec<(f64, f64)> = self.points.iter().map(|p| (p[0], p[1])).collect();
            return point_in_ring(point[0], point[1], &ring);
        }
        // Half-space per listed point: (x - p) . (centroid - p) >= 0.
        self.points.iter().all(|p| {
            let dot: f64 = point
                .iter()
                .zip(p)
                .zip(&self.centroid)
                .map(|((&x, &pi), &ci)| (x - pi) * (ci - pi))
                .sum();
            dot >= 0.0
        })
    }
}

/// A generalized-distance region: a focus point and a distance threshold,
/// optionally evaluated through a non-orthonormal frame matrix.
#[derive(Debug, Clone)]
pub struct EllipsoidGate {
    id: String,
    dimensions: Vec<ParameterReference>,
    focus: Vec<f64>,
    distance: f64,
    /// Row-major linear map applied to the offset from the focus before the
    /// Euclidean norm. `None` means the identity frame.
    frame: Option<Vec<Vec<f64>>>,
}

impl EllipsoidGate {
    pub fn new(
        id: impl Into<String>,
        dimensions: Vec<ParameterReference>,
        focus: Vec<f64>,
        distance: f64,
        frame: Option<Vec<Vec<f64>>>,
    ) -> Result<Self, EngineError> {
        let id = id.into();
        let d = dimensions.len();
        if d == 0 {
            return Err(invalid(&id, "ellipsoid gate requires at least one dimension"));
        }
        if focus.len() != d {
            return Err(invalid(
                &id,
                format!("focus has {} coordinates, expected {d}", focus.len()),
            ));
        }
        if !(distance >= 0.0) {
            return Err(invalid(&id, format!("distance must be non-negative, got {distance}")));
        }
        if let Some(rows) = &frame {
            if rows.len() != d || rows.iter().any(|r| r.len() != d) {
                return Err(invalid(&id, format!("frame must be a {d}x{d} matrix")));
            }
        }
        Ok(Self { id, dimensions, focus, distance, frame })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dimensions(&self) -> &[ParameterReference] {
        &self.dimensions
    }

    /// Inside iff the generalized distance from the focus is <= the
    /// threshold.
    pub fn contains(&self, point: &[f64]) -> bool {
        let offset: Vec<f64> = point.iter().zip(&self.focus).map(|(&x, &f)| x - f).collect();
        let squared: f64 = match &self.frame {
            None => offset.iter().map(|v| v * v).sum(),
            Some(rows) => rows
                .iter()
                .map(|row| {
                    let component: f64 = row.iter().zip(&offset).map(|(&m, &v)| m * v).sum();
                    component * component
                })
                .sum(),
        };
        squared.sqrt() <= self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dims2() -> [ParameterReference; 2] {
        ["fsc".into(), "ssc".into()]
    }

    #[rstest]
    #[case(9.999, false)]
    #[case(10.0, true)]
    #[case(15.0, true)]
    #[case(19.999, true)]
    #[case(20.0, false)]
    fn test_rectangle_half_open_range(#[case] value: f64, #[case] inside: bool) {
        let gate = RectangleGate::new("r", vec![("fsc".into(), 10.0, 20.0)]).unwrap();
        assert_eq!(gate.contains(&[value]), inside);
    }

    #[test]
    fn test_rectangle_rejects_empty_range_and_no_dimensions() {
        assert!(matches!(
            RectangleGate::new("r", vec![("fsc".into(), 20.0, 10.0)]),
            Err(EngineError::InvalidGateDescription { .. })
        ));
        assert!(matches!(
            RectangleGate::new("r", vec![("fsc".into(), 10.0, 10.0)]),
            Err(EngineError::InvalidGateDescription { .. })
        ));
        assert!(RectangleGate::new("r", vec![]).is_err());
    }

    #[test]
    fn test_rectangle_all_dimensions_must_hold() {
        let gate = RectangleGate::new(
            "r",
            vec![("fsc".into(), 0.0, 10.0), ("ssc".into(), 0.0, 10.0)],
        )
        .unwrap();
        assert!(gate.contains(&[5.0, 5.0]));
        assert!(!gate.contains(&[5.0, 15.0]));
    }

    #[rstest]
    #[case(5.0, 5.0, true)] // interior
    #[case(0.0, 0.0, true)] // vertex
    #[case(5.0, 0.0, true)] // edge midpoint
    #[case(10.0, 5.0, true)] // right edge
    #[case(10.001, 5.0, false)]
    #[case(-1.0, 5.0, false)]
    fn test_polygon_boundary_counts_as_inside(
        #[case] x: f64,
        #[case] y: f64,
        #[case] inside: bool,
    ) {
        let square = PolygonGate::new(
            "p",
            dims2(),
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        )
        .unwrap();
        assert_eq!(square.contains(&[x, y]), inside);
    }

    #[test]
    fn test_polygon_non_convex() {
        // A pentagon with a notch dipping down to (5, 3): points above the
        // notch are outside even though they sit inside the bounding box.
        let notched = PolygonGate::new(
            "p",
            dims2(),
            vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 3.0), (0.0, 10.0)],
        )
        .unwrap();
        assert!(notched.contains(&[5.0, 1.0]));
        assert!(!notched.contains(&[5.0, 8.0]));
    }

    #[test]
    fn test_polygon_requires_three_vertices() {
        assert!(PolygonGate::new("p", dims2(), vec![(0.0, 0.0), (1.0, 1.0)]).is_err());
    }

    #[test]
    fn test_polytope_2d_uses_winding_rule() {
        let gate = PolytopeGate::new(
            "t",
            vec!["fsc".into(), "ssc".into()],
            vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 4.0], vec![0.0, 4.0]],
        )
        .unwrap();
        assert!(gate.contains(&[2.0, 2.0]));
        assert!(gate.contains(&[0.0, 2.0]));
        assert!(!gate.contains(&[5.0, 2.0]));
    }

    #[test]
    fn test_polytope_3d_half_spaces() {
        // Six unit-axis points, centroid at the origin: each point's
        // half-space caps one coordinate at +/-1, so the region is the
        // unit cube.
        let gate = PolytopeGate::new(
            "t",
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![1.0, 0.0, 0.0],
                vec![-1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, -1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![0.0, 0.0, -1.0],
            ],
        )
        .unwrap();
        assert!(gate.contains(&[0.0, 0.0, 0.0]));
        assert!(gate.contains(&[0.5, 0.0, 0.0]));
        // A defining point lies on its own hyperplane: boundary is inside.
        assert!(gate.contains(&[1.0, 0.0, 0.0]));
        assert!(!gate.contains(&[2.0, 0.0, 0.0]));
    }

    #[test]
    fn test_polytope_rejects_mismatched_points() {
        assert!(PolytopeGate::new(
            "t",
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![1.0, 0.0]],
        )
        .is_err());
    }

    #[test]
    fn test_ellipsoid_identity_frame() {
        let gate = EllipsoidGate::new(
            "e",
            vec!["fsc".into(), "ssc".into()],
            vec![10.0, 10.0],
            5.0,
            None,
        )
        .unwrap();
        assert!(gate.contains(&[10.0, 10.0]));
        assert!(gate.contains(&[13.0, 14.0])); // distance exactly 5
        assert!(!gate.contains(&[10.0, 15.1]));
    }

    #[test]
    fn test_ellipsoid_scaling_frame() {
        // Frame halves the first axis: points at offset (8, 0) map to
        // distance 4, while the identity frame would reject them.
        let gate = EllipsoidGate::new(
            "e",
            vec!["fsc".into(), "ssc".into()],
            vec![0.0, 0.0],
            5.0,
            Some(vec![vec![0.5, 0.0], vec![0.0, 1.0]]),
        )
        .unwrap();
        assert!(gate.contains(&[8.0, 0.0]));
        assert!(!gate.contains(&[0.0, 8.0]));
    }

    #[test]
    fn test_ellipsoid_rejects_bad_descriptor() {
        assert!(EllipsoidGate::new("e", vec!["fsc".into()], vec![0.0, 0.0], 1.0, None).is_err());
        assert!(EllipsoidGate::new("e", vec!["fsc".into()], vec![0.0], -1.0, None).is_err());
        assert!(EllipsoidGate::new(
            "e",
            vec!["fsc".into()],
            vec![0.0],
            1.0,
            Some(vec![vec![1.0, 0.0]]),
        )
        .is_err());
    }
}
