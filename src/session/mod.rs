pub mod controller;
pub mod overlay;
pub mod request;
pub mod timer;

pub use controller::{
    DirectionsRequest, DisplayedSearch, DrawingMode, GeocodeRequest, SearchSession, Selection,
    SessionError, SessionEvent, SessionSettings, street_address,
};
pub use overlay::{OverlayState, RouteError, RouteOverlay};
pub use request::{RequestKind, RequestTicket, RequestTracker};
pub use timer::Deadline;
