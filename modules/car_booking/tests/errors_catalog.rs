//! Mapping of domain errors onto the public error contract and catalog.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use car_booking::contract::error::CarBookingError;
use car_booking::contract::model::ReservationStatus;
use car_booking::domain::error::DomainError;
use car_booking::errors;

#[test]
fn every_domain_error_keeps_its_kind() {
    let id = Uuid::new_v4();
    let start = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();

    let cases = vec![
        (DomainError::car_not_found(id), errors::CAR_NOT_FOUND),
        (
            DomainError::invalid_interval(start, start, "end must be after start"),
            errors::INVALID_INTERVAL,
        ),
        (DomainError::unavailable(id), errors::UNAVAILABLE),
        (
            DomainError::invalid_transition(
                id,
                ReservationStatus::Cancelled,
                ReservationStatus::Confirmed,
            ),
            errors::INVALID_TRANSITION,
        ),
        (DomainError::reservation_not_found(id), errors::RESERVATION_NOT_FOUND),
        (DomainError::persistence("db gone"), errors::PERSISTENCE_FAILED),
    ];

    for (domain, expected) in cases {
        let public: CarBookingError = domain.into();
        assert_eq!(public.def(), &expected);
        assert_eq!(public.status(), expected.status);
        assert_eq!(public.code(), expected.code);
    }
}

#[test]
fn catalog_statuses_and_codes() {
    assert_eq!(errors::CAR_NOT_FOUND.status, 404);
    assert_eq!(errors::INVALID_INTERVAL.status, 400);
    assert_eq!(errors::UNAVAILABLE.status, 409);
    assert_eq!(errors::INVALID_TRANSITION.status, 409);
    assert_eq!(errors::RESERVATION_NOT_FOUND.status, 404);
    assert_eq!(errors::PERSISTENCE_FAILED.status, 500);

    let codes = [
        errors::CAR_NOT_FOUND.code,
        errors::INVALID_INTERVAL.code,
        errors::UNAVAILABLE.code,
        errors::INVALID_TRANSITION.code,
        errors::RESERVATION_NOT_FOUND.code,
        errors::PERSISTENCE_FAILED.code,
    ];
    let mut unique = codes.to_vec();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), codes.len(), "codes must be distinct");
    assert!(codes.iter().all(|c| c.starts_with("CAR_BOOKING_")));
}

#[test]
fn interval_message_names_bounds_and_reason() {
    let start = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let public: CarBookingError =
        DomainError::invalid_interval(start, end, "end must be after start").into();

    let msg = public.to_string();
    assert!(msg.contains("2024-06-05"));
    assert!(msg.contains("end must be after start"));
}

#[test]
fn transition_error_reports_both_states() {
    let id = Uuid::new_v4();
    let public: CarBookingError = DomainError::invalid_transition(
        id,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
    )
    .into();

    assert_eq!(
        public,
        CarBookingError::InvalidTransition {
            id,
            from: ReservationStatus::Completed,
            to: ReservationStatus::Cancelled,
        }
    );
    assert_eq!(
        public.to_string(),
        format!("Reservation {id} cannot move from completed to cancelled")
    );
}

#[test]
fn persistence_details_stay_internal() {
    let public: CarBookingError = DomainError::persistence("UNIQUE constraint failed").into();
    assert_eq!(public, CarBookingError::PersistenceFailed);
    assert!(!public.to_string().contains("UNIQUE"));
}
