//! Static error catalog: one entry per public error kind.
//!
//! Presentation layers map a [`CarBookingError`](crate::contract::error::CarBookingError)
//! to an HTTP-equivalent status and a stable machine code through [`ErrDef`].

/// Static error definition from catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
}

pub const CAR_NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Car Not Found",
    code: "CAR_BOOKING_CAR_NOT_FOUND",
};

pub const INVALID_INTERVAL: ErrDef = ErrDef {
    status: 400,
    title: "Invalid Rental Interval",
    code: "CAR_BOOKING_INVALID_INTERVAL",
};

pub const UNAVAILABLE: ErrDef = ErrDef {
    status: 409,
    title: "Car Unavailable",
    code: "CAR_BOOKING_UNAVAILABLE",
};

pub const INVALID_TRANSITION: ErrDef = ErrDef {
    status: 409,
    title: "Invalid Status Transition",
    code: "CAR_BOOKING_INVALID_TRANSITION",
};

pub const RESERVATION_NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    title: "Reservation Not Found",
    code: "CAR_BOOKING_RESERVATION_NOT_FOUND",
};

pub const PERSISTENCE_FAILED: ErrDef = ErrDef {
    status: 500,
    title: "Persistence Failed",
    code: "CAR_BOOKING_PERSISTENCE_FAILED",
};
