use geo::LineString;

use crate::{GeometryError, Segment, SegmentKey};

/// A segment whose geometry couldn't be split. It's left as is, and so are its neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedSegment {
    pub key: SegmentKey,
    pub error: GeometryError,
}

/// Cuts a polyline in two at the middle coordinate, counting points rather than distance. Both
/// halves share the middle coordinate. A line with exactly 2 points can't be cut, so it comes
/// back whole as the left half.
pub fn split_at_midpoint(
    line: &LineString<f64>,
) -> Result<(LineString<f64>, Option<LineString<f64>>), GeometryError> {
    let pts = &line.0;
    if pts.len() < 2 {
        return Err(GeometryError::TooFewPoints { points: pts.len() });
    }
    if pts.len() == 2 {
        return Ok((line.clone(), None));
    }
    let mid = pts.len() / 2;
    let left = LineString::new(pts[..=mid].to_vec());
    let right = LineString::new(pts[mid..].to_vec());
    Ok((left, Some(right)))
}

/// Bus stops and stop lines lend the halves of their own line to the segments before and after
/// them, so the road paths drawn around a stop reach all the way to it. The left half goes onto
/// the end of the previous segment, the right half onto the start of the next one. A lending
/// segment still receives the left half of a lender right after it, but never the right half of
/// one right before it.
///
/// All splits are computed from the original geometry first, then applied, so the result doesn't
/// depend on the order segments are visited in.
pub fn lend_to_neighbours(segments: &mut [Segment]) -> Vec<SkippedSegment> {
    let mut skipped = Vec::new();
    let mut lenders = vec![false; segments.len()];
    // (index of the receiving segment, coordinates, true if appended)
    let mut extensions = Vec::new();

    for (idx, segment) in segments.iter().enumerate() {
        if !segment.category.lends_geometry() {
            continue;
        }
        let (left, right) = match split_at_midpoint(&segment.geometry) {
            Ok(pair) => pair,
            Err(error) => {
                warn!("Skipping {} while splitting: {error}", segment.key);
                skipped.push(SkippedSegment {
                    key: segment.key.clone(),
                    error,
                });
                continue;
            }
        };
        lenders[idx] = true;

        if idx > 0 {
            extensions.push((idx - 1, left, true));
        }
        if let Some(right) = right {
            if idx + 1 < segments.len() {
                extensions.push((idx + 1, right, false));
            }
        }
    }

    for (idx, piece, append) in extensions {
        if !append && lenders[idx] {
            continue;
        }
        let geometry = &mut segments[idx].geometry.0;
        if append {
            geometry.extend(piece.0);
        } else {
            let mut pts = piece.0;
            pts.append(geometry);
            *geometry = pts;
        }
    }

    skipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pts: &[(f64, f64)]) -> LineString<f64> {
        LineString::from(pts.to_vec())
    }

    fn segment(key: &str, pts: &[(f64, f64)]) -> Segment {
        Segment::new(SegmentKey::new(key), line(pts))
    }

    #[test]
    fn test_split_reconstructs_original() {
        for n in 3..10 {
            let pts: Vec<(f64, f64)> = (0..n).map(|i| (i as f64, (i * i) as f64)).collect();
            let original = line(&pts);
            let (left, right) = split_at_midpoint(&original).unwrap();
            let right = right.unwrap();
            assert!(!left.0.is_empty() && !right.0.is_empty());
            // They share the middle coordinate
            assert_eq!(left.0.last(), right.0.first());

            let mut joined = left.0.clone();
            joined.extend(right.0.into_iter().skip(1));
            assert_eq!(joined, original.0);
        }
    }

    #[test]
    fn test_split_two_points() {
        let original = line(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(split_at_midpoint(&original), Ok((original.clone(), None)));
    }

    #[test]
    fn test_split_too_few_points() {
        assert_eq!(
            split_at_midpoint(&line(&[(0.0, 0.0)])),
            Err(GeometryError::TooFewPoints { points: 1 })
        );
        assert_eq!(
            split_at_midpoint(&line(&[])),
            Err(GeometryError::TooFewPoints { points: 0 })
        );
    }

    #[test]
    fn test_lend_to_neighbours() {
        let mut segments = vec![
            segment("road_path_1", &[(0.0, 0.0), (1.0, 0.0)]),
            segment("haltestelle_x", &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]),
            segment("road_path_2", &[(3.0, 0.0), (4.0, 0.0)]),
        ];
        let stop_before = segments[1].clone();
        assert!(lend_to_neighbours(&mut segments).is_empty());

        assert_eq!(
            segments[0].geometry,
            line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
        );
        assert_eq!(
            segments[2].geometry,
            line(&[(2.0, 0.0), (3.0, 0.0), (3.0, 0.0), (4.0, 0.0)])
        );
        // The stop keeps its own line
        assert_eq!(segments[1], stop_before);
    }

    #[test]
    fn test_two_point_stop_only_extends_previous() {
        let mut segments = vec![
            segment("road_path_1", &[(0.0, 0.0), (1.0, 0.0)]),
            segment("stop_lines_3", &[(1.0, 0.0), (2.0, 0.0)]),
            segment("road_path_2", &[(2.0, 0.0), (3.0, 0.0)]),
        ];
        lend_to_neighbours(&mut segments);
        assert_eq!(
            segments[0].geometry,
            line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
        );
        assert_eq!(segments[2].geometry, line(&[(2.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_invalid_geometry_is_skipped() {
        let mut segments = vec![
            segment("road_path_1", &[(0.0, 0.0), (1.0, 0.0)]),
            segment("haltestelle_broken", &[(1.0, 0.0)]),
            segment("road_path_2", &[(2.0, 0.0), (3.0, 0.0)]),
        ];
        let before = segments.clone();
        let skipped = lend_to_neighbours(&mut segments);
        assert_eq!(
            skipped,
            vec![SkippedSegment {
                key: SegmentKey::new("haltestelle_broken"),
                error: GeometryError::TooFewPoints { points: 1 },
            }]
        );
        assert_eq!(segments, before);
    }

    #[test]
    fn test_adjacent_lenders_only_extend_backwards() {
        let mut segments = vec![
            segment("stop_lines_1", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
            segment("haltestelle_y", &[(2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]),
        ];
        let stop_before = segments[1].clone();
        lend_to_neighbours(&mut segments);
        // The stop line gets the bus stop's left half appended
        assert_eq!(
            segments[0].geometry,
            line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 0.0), (3.0, 0.0)])
        );
        // but the bus stop doesn't get the stop line's right half prepended
        assert_eq!(segments[1], stop_before);
    }

    #[test]
    fn test_two_point_stop_line_extends_previous_stop() {
        let mut segments = vec![
            segment("haltestelle_z", &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]),
            segment("stop_lines_2", &[(3.0, 0.0), (4.0, 0.0)]),
        ];
        lend_to_neighbours(&mut segments);
        assert_eq!(
            segments[0].geometry,
            line(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (3.0, 0.0), (4.0, 0.0)])
        );
        assert_eq!(segments[1].geometry, line(&[(3.0, 0.0), (4.0, 0.0)]));
    }

    #[test]
    fn test_first_and_last_have_no_outer_neighbour() {
        let mut segments = vec![segment(
            "haltestelle_alone",
            &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
        )];
        let before = segments.clone();
        assert!(lend_to_neighbours(&mut segments).is_empty());
        assert_eq!(segments, before);
    }
}
