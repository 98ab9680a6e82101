//! Line and polygon geometries as drawn on a source map.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bounds::BoundingBox;
use super::point::Point2;

/// Reasons a geometry cannot take part in length or bounds computations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{kind} needs at least {required} vertices, got {actual}")]
    TooFewVertices {
        kind: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("non-finite coordinate at vertex {index}")]
    NonFinite { index: usize },

    #[error("{0} has no parts")]
    Empty(&'static str),
}

/// Planar geometry of a mapped structure.
///
/// Polygon rings may be given open or closed; the closing edge is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    LineString(Vec<Point2>),
    Polygon(Vec<Point2>),
    MultiLineString(Vec<Vec<Point2>>),
    MultiPolygon(Vec<Vec<Point2>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Total planar length: polyline length for lines, perimeter for polygons,
    /// summed over parts.
    pub fn length(&self) -> f64 {
        match self {
            Geometry::LineString(pts) => polyline_length(pts),
            Geometry::Polygon(ring) => ring_perimeter(ring),
            Geometry::MultiLineString(parts) => parts.iter().map(|p| polyline_length(p)).sum(),
            Geometry::MultiPolygon(parts) => parts.iter().map(|r| ring_perimeter(r)).sum(),
            Geometry::GeometryCollection(parts) => parts.iter().map(Geometry::length).sum(),
        }
    }

    /// Bounding box over every vertex of every part.
    pub fn bounds(&self) -> BoundingBox {
        let mut bb = BoundingBox::void();
        self.for_each_vertex(&mut |p| bb.update(*p));
        bb
    }

    /// Number of parts once flattened (1 for single geometries).
    pub fn part_count(&self) -> usize {
        match self {
            Geometry::LineString(_) | Geometry::Polygon(_) => 1,
            Geometry::MultiLineString(parts) | Geometry::MultiPolygon(parts) => parts.len(),
            Geometry::GeometryCollection(parts) => parts.iter().map(Geometry::part_count).sum(),
        }
    }

    /// Checks vertex counts and coordinate finiteness.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Geometry::LineString(pts) => check_part("LineString", pts, 2),
            Geometry::Polygon(ring) => check_part("Polygon", ring, 3),
            Geometry::MultiLineString(parts) => {
                if parts.is_empty() {
                    return Err(GeometryError::Empty("MultiLineString"));
                }
                parts.iter().try_for_each(|p| check_part("LineString", p, 2))
            }
            Geometry::MultiPolygon(parts) => {
                if parts.is_empty() {
                    return Err(GeometryError::Empty("MultiPolygon"));
                }
                parts.iter().try_for_each(|r| check_part("Polygon", r, 3))
            }
            Geometry::GeometryCollection(parts) => {
                if parts.is_empty() {
                    return Err(GeometryError::Empty("GeometryCollection"));
                }
                parts.iter().try_for_each(Geometry::validate)
            }
        }
    }

    /// Merges fragments into a single multi-part geometry.
    ///
    /// Homogeneous line input yields a `MultiLineString`, homogeneous polygon
    /// input a `MultiPolygon`; mixed input a flat `GeometryCollection`.
    /// A single fragment is returned unchanged. Parts are concatenated, not
    /// noded, so the dissolved length is the sum of fragment lengths.
    pub fn dissolve<'a, I>(fragments: I) -> Option<Geometry>
    where
        I: IntoIterator<Item = &'a Geometry>,
    {
        let mut flat: Vec<Geometry> = Vec::new();
        for fragment in fragments {
            fragment.flatten_into(&mut flat);
        }

        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => {
                if flat.iter().all(|g| matches!(g, Geometry::LineString(_))) {
                    Some(Geometry::MultiLineString(
                        flat.into_iter().filter_map(Geometry::into_ring).collect(),
                    ))
                } else if flat.iter().all(|g| matches!(g, Geometry::Polygon(_))) {
                    Some(Geometry::MultiPolygon(
                        flat.into_iter().filter_map(Geometry::into_ring).collect(),
                    ))
                } else {
                    Some(Geometry::GeometryCollection(flat))
                }
            }
        }
    }

    fn flatten_into(&self, out: &mut Vec<Geometry>) {
        match self {
            Geometry::LineString(_) | Geometry::Polygon(_) => out.push(self.clone()),
            Geometry::MultiLineString(parts) => {
                out.extend(parts.iter().cloned().map(Geometry::LineString))
            }
            Geometry::MultiPolygon(parts) => out.extend(parts.iter().cloned().map(Geometry::Polygon)),
            Geometry::GeometryCollection(parts) => {
                for part in parts {
                    part.flatten_into(out);
                }
            }
        }
    }

    fn into_ring(self) -> Option<Vec<Point2>> {
        match self {
            Geometry::LineString(pts) | Geometry::Polygon(pts) => Some(pts),
            _ => None,
        }
    }

    fn for_each_vertex(&self, f: &mut dyn FnMut(&Point2)) {
        match self {
            Geometry::LineString(pts) | Geometry::Polygon(pts) => pts.iter().for_each(|p| f(p)),
            Geometry::MultiLineString(parts) | Geometry::MultiPolygon(parts) => {
                parts.iter().flatten().for_each(|p| f(p))
            }
            Geometry::GeometryCollection(parts) => {
                for part in parts {
                    part.for_each_vertex(f);
                }
            }
        }
    }
}

/// Sum of segment lengths along an open polyline.
pub fn polyline_length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Perimeter of a ring, adding the closing edge when the ring is open.
pub fn ring_perimeter(ring: &[Point2]) -> f64 {
    let open = polyline_length(ring);
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 2 && first != last => open + last.distance(first),
        _ => open,
    }
}

fn check_part(kind: &'static str, pts: &[Point2], required: usize) -> Result<(), GeometryError> {
    if pts.len() < required {
        return Err(GeometryError::TooFewVertices {
            kind,
            required,
            actual: pts.len(),
        });
    }
    if let Some(index) = pts.iter().position(|p| !p.is_finite()) {
        return Err(GeometryError::NonFinite { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(coords: &[(f64, f64)]) -> Geometry {
        Geometry::LineString(coords.iter().copied().map(Point2::from).collect())
    }

    #[test]
    fn line_length_sums_segments() {
        let g = line(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert!((g.length() - 11.0).abs() < 1e-12);
    }

    #[test]
    fn polygon_length_is_perimeter_open_or_closed() {
        let open = Geometry::Polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]);
        let mut closed_ring = match &open {
            Geometry::Polygon(r) => r.clone(),
            _ => unreachable!(),
        };
        closed_ring.push(Point2::new(0.0, 0.0));
        let closed = Geometry::Polygon(closed_ring);

        assert!((open.length() - 4.0).abs() < 1e-12);
        assert!((closed.length() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn dissolve_two_lines_makes_multilinestring() {
        let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = line(&[(2.0, 0.0), (3.0, 0.0)]);
        let merged = Geometry::dissolve([&a, &b]).unwrap();

        assert_eq!(merged.kind(), "MultiLineString");
        assert_eq!(merged.part_count(), 2);
        assert!((merged.length() - 2.0).abs() < 1e-12);
        assert!((merged.bounds().diagonal() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn dissolve_single_fragment_is_identity() {
        let a = line(&[(0.0, 0.0), (4.0, 3.0)]);
        assert_eq!(Geometry::dissolve([&a]), Some(a.clone()));
        assert_eq!(Geometry::dissolve(std::iter::empty()), None);
    }

    #[test]
    fn dissolve_mixed_flattens_into_collection() {
        let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = Geometry::MultiPolygon(vec![vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ]]);
        let merged = Geometry::dissolve([&a, &b]).unwrap();
        assert_eq!(merged.kind(), "GeometryCollection");
        assert_eq!(merged.part_count(), 2);
    }

    #[test]
    fn validate_rejects_degenerate_input() {
        assert_eq!(
            line(&[(0.0, 0.0)]).validate(),
            Err(GeometryError::TooFewVertices {
                kind: "LineString",
                required: 2,
                actual: 1
            })
        );
        assert_eq!(
            line(&[(0.0, 0.0), (f64::NAN, 1.0)]).validate(),
            Err(GeometryError::NonFinite { index: 1 })
        );
        assert_eq!(
            Geometry::MultiLineString(vec![]).validate(),
            Err(GeometryError::Empty("MultiLineString"))
        );
        assert!(line(&[(0.0, 0.0), (1.0, 1.0)]).validate().is_ok());
    }

    #[test]
    fn serde_uses_type_tag() {
        let g = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains(r#""type":"LineString""#));
        let back: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
