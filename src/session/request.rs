//! At-most-one-in-flight tracking for external lookups.
//!
//! Each kind of request has a generation counter. Issuing a request bumps the
//! counter and hands out a ticket; a completion is only accepted while its
//! ticket is still the latest one issued. Older tickets are cancelled
//! silently.

/// External lookups the session can have outstanding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    ReverseGeocode,
    Directions,
}

/// Handle for one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: RequestKind,
    generation: u64,
    /// Listing the request was issued for
    pub listing: usize,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u64,
    in_flight: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    geocode: Slot,
    directions: Slot,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: RequestKind) -> &mut Slot {
        match kind {
            RequestKind::ReverseGeocode => &mut self.geocode,
            RequestKind::Directions => &mut self.directions,
        }
    }

    /// Issue a new request, superseding any outstanding one of the same kind
    pub fn issue(&mut self, kind: RequestKind, listing: usize) -> RequestTicket {
        let slot = self.slot(kind);
        if slot.in_flight {
            log::debug!("Cancelling outstanding {:?} request", kind);
        }
        slot.generation += 1;
        slot.in_flight = true;
        RequestTicket {
            kind,
            generation: slot.generation,
            listing,
        }
    }

    /// Accept a completion. Returns false for superseded or cancelled tickets.
    pub fn complete(&mut self, ticket: &RequestTicket) -> bool {
        let slot = self.slot(ticket.kind);
        if slot.in_flight && slot.generation == ticket.generation {
            slot.in_flight = false;
            true
        } else {
            log::debug!("Ignoring stale {:?} completion", ticket.kind);
            false
        }
    }

    pub fn cancel(&mut self, kind: RequestKind) {
        self.slot(kind).in_flight = false;
    }

    pub fn cancel_all(&mut self) {
        self.cancel(RequestKind::ReverseGeocode);
        self.cancel(RequestKind::Directions);
    }

    pub fn is_in_flight(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::ReverseGeocode => self.geocode.in_flight,
            RequestKind::Directions => self.directions.in_flight,
        }
    }
}
