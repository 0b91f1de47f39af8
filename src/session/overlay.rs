//! Starting point and route overlay.
//!
//! No routing happens here. The route geometry comes from an external
//! directions provider and is only held for rendering.
//!
//! ```text
//! NoStart -> HasStart -> HasStartAndRoute -> HasStart (new selection)
//!    ^                                          |
//!    +------------------ clear -----------------+
//! ```

use crate::domain::Coordinate;

/// Error type for route attachment
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error("route geometry is empty")]
    Empty,
    #[error("no starting point to route from")]
    NoStartingPoint,
}

/// Observable state of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    NoStart,
    HasStart,
    HasStartAndRoute,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOverlay {
    start: Option<Coordinate>,
    route: Option<Vec<Coordinate>>,
}

impl RouteOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> OverlayState {
        match (&self.start, &self.route) {
            (None, _) => OverlayState::NoStart,
            (Some(_), None) => OverlayState::HasStart,
            (Some(_), Some(_)) => OverlayState::HasStartAndRoute,
        }
    }

    /// Pin a new starting point, replacing the old one.
    ///
    /// A route drawn from the previous starting point no longer applies and
    /// is removed.
    pub fn set_starting_point(&mut self, coordinate: Coordinate) {
        if self.start.replace(coordinate).is_some() {
            log::debug!("Replaced starting point");
        }
        self.route = None;
    }

    /// Remove the starting point and any route attached to it
    pub fn clear_starting_point(&mut self) {
        self.start = None;
        self.route = None;
    }

    /// A new listing was selected; the previous route is stale
    pub fn begin_selection(&mut self) {
        self.route = None;
    }

    /// Store the latest route geometry, replacing any earlier one
    pub fn attach_route(&mut self, points: Vec<Coordinate>) -> Result<(), RouteError> {
        if self.start.is_none() {
            return Err(RouteError::NoStartingPoint);
        }
        if points.is_empty() {
            return Err(RouteError::Empty);
        }
        log::debug!("Attached route with {} points", points.len());
        self.route = Some(points);
        Ok(())
    }

    pub fn starting_point(&self) -> Option<Coordinate> {
        self.start
    }

    pub fn route_line(&self) -> Option<&[Coordinate]> {
        self.route.as_deref()
    }
}
