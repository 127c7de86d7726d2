//! Error types for the solver entry points.

use std::fmt;

/// Why an instance was rejected before any algorithm ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadInputKind {
    /// The location list is empty.
    EmptyLocations,
    /// The vehicle list is empty.
    EmptyVehicles,
    /// No location carries the depot flag.
    MissingDepot,
    /// More than one location carries the depot flag.
    MultipleDepots,
    /// More than 100 locations.
    TooManyLocations(usize),
    /// More than 20 vehicle types.
    TooManyVehicleTypes(usize),
    /// A location has a non-finite latitude or longitude.
    NonFiniteCoordinate {
        /// Offending location id.
        location: String,
    },
    /// A location has a negative demand.
    NegativeDemand {
        /// Offending location id.
        location: String,
    },
    /// A vehicle type has zero capacity or zero count.
    InvalidVehicle {
        /// Offending vehicle type id.
        vehicle: String,
    },
    /// Unknown algorithm tag passed to single mode.
    UnknownAlgorithm(String),
}

impl fmt::Display for BadInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BadInputKind::EmptyLocations => write!(f, "location list is empty"),
            BadInputKind::EmptyVehicles => write!(f, "vehicle list is empty"),
            BadInputKind::MissingDepot => write!(f, "no location is marked as depot"),
            BadInputKind::MultipleDepots => write!(f, "more than one location is marked as depot"),
            BadInputKind::TooManyLocations(n) => {
                write!(f, "too many locations: {n} (limit 100)")
            }
            BadInputKind::TooManyVehicleTypes(n) => {
                write!(f, "too many vehicle types: {n} (limit 20)")
            }
            BadInputKind::NonFiniteCoordinate { location } => {
                write!(f, "location '{location}' has non-finite coordinates")
            }
            BadInputKind::NegativeDemand { location } => {
                write!(f, "location '{location}' has negative demand")
            }
            BadInputKind::InvalidVehicle { vehicle } => {
                write!(f, "vehicle type '{vehicle}' must have positive capacity and count")
            }
            BadInputKind::UnknownAlgorithm(tag) => write!(f, "unknown algorithm tag '{tag}'"),
        }
    }
}

/// Error returned by [`solve`](crate::solve).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The instance failed validation; no algorithm was attempted.
    BadInput(BadInputKind),
    /// A single-mode algorithm failed.
    Algorithm {
        /// Tag of the failing algorithm.
        algorithm: &'static str,
        /// Failure description.
        message: String,
    },
    /// The cancellation token fired before any result was produced.
    Cancelled,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::BadInput(kind) => write!(f, "bad input: {kind}"),
            SolveError::Algorithm { algorithm, message } => {
                write!(f, "algorithm '{algorithm}' failed: {message}")
            }
            SolveError::Cancelled => write!(f, "solve cancelled"),
        }
    }
}

impl std::error::Error for SolveError {}
