use thiserror::Error;

/// Problems with a single polyline. Splitting recovers from these by skipping the segment;
/// drawing a stop line indicator doesn't.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("polyline has {points} points, at least 2 are needed")]
    TooFewPoints { points: usize },
    #[error("direction at the midpoint has zero length")]
    DegenerateTangent,
}
