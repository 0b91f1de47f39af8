//! Single-owner search session.
//!
//! Holds everything the map controller used to keep in shared fields:
//! drawing mode, the displayed search, the starting point and route overlay,
//! the theme, outstanding lookups and display timers. The owner drives it
//! with `&mut self` calls and polls `tick` from its event loop.

use std::time::{Duration, Instant};

use super::overlay::RouteOverlay;
use super::request::{RequestKind, RequestTicket, RequestTracker};
use super::timer::Deadline;
use crate::domain::{Coordinate, Polygon, Theme};
use crate::geometry::InvalidPolygonError;
use crate::query::{ListingAnnotation, QueryResult, query};
use crate::store::FeatureStore;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("no search drawing is in progress")]
    NotDrawing,
    #[error("invalid search polygon: {0}")]
    InvalidPolygon(#[from] InvalidPolygonError),
    #[error("no listing at position {0} in the current search")]
    NoSuchListing(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingMode {
    #[default]
    Idle,
    Drawing,
}

/// Timing policies of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// How long a completed drawing stays in drawing mode before dismissal
    pub dismiss_delay: Duration,
    /// Pause between confirming a route and showing it
    pub route_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            dismiss_delay: Duration::from_secs(1),
            route_delay: Duration::from_secs(2),
        }
    }
}

/// Results of a completed drawing, as currently rendered
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedSearch {
    pub result: QueryResult,
    pub annotations: Vec<ListingAnnotation>,
}

/// Reverse-geocode lookup the caller should perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeRequest {
    pub ticket: RequestTicket,
    pub at: Coordinate,
}

/// Directions lookup the caller should perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsRequest {
    pub ticket: RequestTicket,
    pub from: Coordinate,
    pub to: Coordinate,
}

/// External lookups triggered by selecting a listing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub geocode: GeocodeRequest,
    pub directions: Option<DirectionsRequest>,
}

/// Something a `tick` changed that the renderer should pick up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    DrawingDismissed,
    RouteShown,
}

#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    settings: SessionSettings,
    mode: DrawingMode,
    theme: Theme,
    search: Option<DisplayedSearch>,
    overlay: RouteOverlay,
    requests: RequestTracker,
    pending_route: Option<Vec<Coordinate>>,
    dismiss_timer: Deadline,
    route_timer: Deadline,
}

impl SearchSession {
    pub fn new(settings: SessionSettings, theme: Theme) -> Self {
        Self {
            settings,
            theme,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn search(&self) -> Option<&DisplayedSearch> {
        self.search.as_ref()
    }

    pub fn overlay(&self) -> &RouteOverlay {
        &self.overlay
    }

    pub fn requests(&self) -> &RequestTracker {
        &self.requests
    }

    /// Enter drawing mode. The map stops taking gestures until dismissed.
    pub fn start_search(&mut self) {
        self.mode = DrawingMode::Drawing;
        self.dismiss_timer.cancel();
    }

    pub fn cancel_search(&mut self) {
        self.mode = DrawingMode::Idle;
        self.dismiss_timer.cancel();
    }

    /// Run the containment query for a finished gesture.
    ///
    /// The new result replaces the previous search's annotations; the
    /// starting point and route are left alone. Drawing mode is dismissed
    /// after the configured delay. A rejected polygon keeps drawing mode
    /// active so the user can try again.
    pub fn complete_drawing(
        &mut self,
        points: Vec<Coordinate>,
        store: &FeatureStore,
        now: Instant,
    ) -> Result<&DisplayedSearch, SessionError> {
        if self.mode != DrawingMode::Drawing {
            return Err(SessionError::NotDrawing);
        }

        let polygon = Polygon::new(points);
        let result = query(&polygon, store)?;
        log::info!("Search matched {} listings", result.len());

        // Lookups for the old annotations have nothing left to update
        self.requests.cancel(RequestKind::ReverseGeocode);
        let annotations = result.annotations();
        self.dismiss_timer.schedule(now, self.settings.dismiss_delay);

        Ok(&*self.search.insert(DisplayedSearch {
            result,
            annotations,
        }))
    }

    /// Long press: pin a new starting point
    pub fn long_press(&mut self, coordinate: Coordinate) {
        self.overlay.set_starting_point(coordinate);
        self.pending_route = None;
        self.route_timer.cancel();
        self.requests.cancel(RequestKind::Directions);
    }

    /// Two-finger long press: remove every annotation and leave drawing mode
    pub fn double_gesture_clear(&mut self) {
        self.search = None;
        self.overlay.clear_starting_point();
        self.pending_route = None;
        self.requests.cancel_all();
        self.dismiss_timer.cancel();
        self.route_timer.cancel();
        self.mode = DrawingMode::Idle;
    }

    /// Select a listing marker by its position in the current search.
    ///
    /// Always asks for a street address. With a starting point pinned, it
    /// also drops the previous route and asks for directions. A new request
    /// supersedes any outstanding one of the same kind.
    pub fn select_listing(&mut self, position: usize) -> Result<Selection, SessionError> {
        let at = self
            .search
            .as_ref()
            .and_then(|s| s.annotations.get(position))
            .map(|a| a.coordinate)
            .ok_or(SessionError::NoSuchListing(position))?;

        let geocode = GeocodeRequest {
            ticket: self.requests.issue(RequestKind::ReverseGeocode, position),
            at,
        };

        let directions = match self.overlay.starting_point() {
            Some(from) => {
                self.overlay.begin_selection();
                self.pending_route = None;
                self.route_timer.cancel();
                Some(DirectionsRequest {
                    ticket: self.requests.issue(RequestKind::Directions, position),
                    from,
                    to: at,
                })
            }
            None => None,
        };

        Ok(Selection {
            geocode,
            directions,
        })
    }

    /// Apply a reverse-geocode answer. Stale tickets and failed lookups
    /// change nothing. Returns whether the listing title was updated.
    pub fn reverse_geocode_completed(
        &mut self,
        ticket: &RequestTicket,
        placemark: Option<&str>,
    ) -> bool {
        if ticket.kind != RequestKind::ReverseGeocode || !self.requests.complete(ticket) {
            return false;
        }
        let Some(address) = placemark.and_then(street_address) else {
            log::debug!("Reverse geocode for listing {} found nothing", ticket.listing);
            return false;
        };

        match self
            .search
            .as_mut()
            .and_then(|s| s.annotations.get_mut(ticket.listing))
        {
            Some(annotation) => {
                annotation.title = address.to_string();
                true
            }
            None => false,
        }
    }

    /// Apply a directions answer. Returns whether a route is now pending.
    pub fn directions_completed(
        &mut self,
        ticket: &RequestTicket,
        route: Option<Vec<Coordinate>>,
    ) -> bool {
        if ticket.kind != RequestKind::Directions || !self.requests.complete(ticket) {
            return false;
        }
        match route {
            Some(points) if !points.is_empty() => {
                self.pending_route = Some(points);
                true
            }
            _ => {
                log::warn!("No route found to listing {}", ticket.listing);
                self.pending_route = None;
                false
            }
        }
    }

    /// Confirm routing to the selected listing. The route appears after the
    /// configured delay. Returns false without a starting point.
    pub fn confirm_route(&mut self, now: Instant) -> bool {
        if self.overlay.starting_point().is_none() {
            return false;
        }
        self.overlay.begin_selection();
        self.route_timer.schedule(now, self.settings.route_delay);
        true
    }

    /// Fire any display timers that are due
    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if self.dismiss_timer.poll(now) {
            self.mode = DrawingMode::Idle;
            events.push(SessionEvent::DrawingDismissed);
        }

        if self.route_timer.poll(now) {
            match self.pending_route.clone() {
                Some(points) => match self.overlay.attach_route(points) {
                    Ok(()) => events.push(SessionEvent::RouteShown),
                    Err(e) => log::warn!("Could not show route: {}", e),
                },
                None => log::warn!("Route confirmed but no directions arrived"),
            }
        }

        events
    }

    /// Switch map style. Disabled while drawing, like the toolbar button.
    pub fn toggle_theme(&mut self) -> bool {
        if self.mode == DrawingMode::Drawing {
            return false;
        }
        self.theme = self.theme.toggled();
        true
    }
}

/// First comma-separated component of a placemark name
pub fn street_address(placemark: &str) -> Option<&str> {
    let street = placemark.split(',').next()?.trim();
    (!street.is_empty()).then_some(street)
}
