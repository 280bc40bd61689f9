use std::fmt;

use crate::error::BookingError;

/// Result of every public core operation.
///
/// Validation failures never get this far; they are rejected by the HTTP layer
/// before a service is called. Everything else is one of these kinds, and no
/// operation returns an `Err` or lets a collaborator fault escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation produced a value.
    Done(T),
    /// Business-level absence of the requested entity.
    NotFound,
    /// Valid no-op: nothing was produced and nothing went wrong.
    Empty,
    /// A collaborator failed. Carries the fault's message text.
    Fault(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Done,
    NotFound,
    Empty,
    Fault,
}

impl<T> Outcome<T> {
    pub fn fault(err: impl fmt::Display) -> Self {
        Outcome::Fault(err.to_string())
    }

    /// Fold a lookup result: `Some` is done, `None` is not found, `Err` is a fault.
    pub fn from_lookup(result: Result<Option<T>, BookingError>) -> Self {
        match result {
            Ok(Some(value)) => Outcome::Done(value),
            Ok(None) => Outcome::NotFound,
            Err(err) => Outcome::fault(err),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Done(_) => OutcomeKind::Done,
            Outcome::NotFound => OutcomeKind::NotFound,
            Outcome::Empty => OutcomeKind::Empty,
            Outcome::Fault(_) => OutcomeKind::Fault,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Done(value) => Outcome::Done(f(value)),
            Outcome::NotFound => Outcome::NotFound,
            Outcome::Empty => Outcome::Empty,
            Outcome::Fault(message) => Outcome::Fault(message),
        }
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            _ => None,
        }
    }
}
