//! crates/controlpet_core/src/gate.rs
//!
//! The authorization gate every protected screen consults before rendering.
//! Pure: the session store owns resolution, this module only decides.

use crate::domain::{Role, Session};

/// Where the session resolution currently stands.
///
/// `Pending → {Authenticated, Anonymous}`, terminal on first resolution;
/// re-enters `Pending` only through an explicit new resolution attempt.
#[derive(Debug, Clone)]
pub enum SessionResolution {
    Pending,
    Authenticated(Session),
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    Login,
    Dashboard,
}

/// The only three things a protected screen may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Resolution in flight: render a loading state, never protected content.
    Pending,
    Allowed,
    Redirect(RedirectTarget),
}

/// Checks the resolved session against a required role set. An empty set
/// means "any authenticated role". A role mismatch is not an error, just a
/// redirect to a page the user does have rights to.
pub fn decide(resolution: &SessionResolution, required: &[Role]) -> GateDecision {
    match resolution {
        SessionResolution::Pending => GateDecision::Pending,
        SessionResolution::Anonymous => GateDecision::Redirect(RedirectTarget::Login),
        SessionResolution::Authenticated(session) => {
            if required.is_empty() || required.contains(&session.role) {
                GateDecision::Allowed
            } else {
                GateDecision::Redirect(RedirectTarget::Dashboard)
            }
        }
    }
}
