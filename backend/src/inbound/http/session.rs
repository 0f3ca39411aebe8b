//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Thin wrapper around Actix cookie sessions so handlers only deal with
//! domain-friendly operations: persisting the authenticated staff member,
//! requiring one, and clearing the session on logout.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::staff::{Staff, StaffId};

pub(crate) const STAFF_ID_KEY: &str = "staff_id";
pub(crate) const STAFF_ROLE_KEY: &str = "staff_role";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated staff member in the session cookie.
    pub fn persist_staff(&self, staff: &Staff) -> Result<(), Error> {
        self.0
            .insert(STAFF_ID_KEY, staff.id.to_string())
            .and_then(|()| self.0.insert(STAFF_ROLE_KEY, staff.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current staff id from the session, if present.
    pub fn staff_id(&self) -> Result<Option<StaffId>, Error> {
        let raw = self
            .0
            .get::<String>(STAFF_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match Uuid::parse_str(&raw) {
                Ok(id) => Ok(Some(StaffId::from_uuid(id))),
                Err(error) => {
                    tracing::warn!(%error, "invalid staff id in session cookie");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated staff id or return `401 Unauthorized`.
    pub fn require_staff(&self) -> Result<StaffId, Error> {
        self.staff_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session entry (logout).
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
