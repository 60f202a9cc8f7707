use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use uuid::Uuid;

use car_booking::config::CarBookingConfig;
use car_booking::contract::{CarBookingApi, CarBookingError, Money, NewCar, NewReservation};
use car_booking::domain::events::ReservationDomainEvent;
use car_booking::domain::ports::EventPublisher;
use car_booking::domain::service::BookingAdmission;
use car_booking::gateways::local::CarBookingLocalClient;
use car_booking::infra::storage::migrations::Migrator;
use car_booking::infra::storage::sea_orm_repo::{SeaOrmCarCatalog, SeaOrmReservationStore};
use runtime::{AppConfig, CliArgs};

mod dto;

use dto::{CarDto, ErrorDto, ReservationDto, ReservationListDto, StatsDto};

/// Exit code for requests refused by the booking core (as opposed to failures).
const EXIT_REJECTED: u8 = 2;

/// Rental CLI - car booking admission and pricing
#[derive(Parser)]
#[command(name = "rental-cli")]
#[command(about = "Rental CLI - car booking admission and pricing")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration and print it
    Check,
    /// Register a car in the catalog
    AddCar {
        #[arg(long)]
        name: String,
        /// Price per day, e.g. 49.90
        #[arg(long, value_parser = parse_money)]
        daily_rate: Money,
    },
    /// Request a booking
    Book {
        #[arg(long)]
        car: Uuid,
        #[arg(long)]
        user: Uuid,
        /// YYYY-MM-DD (midnight UTC) or RFC 3339
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        /// Exclusive end, same formats as --start
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel a reservation, optionally only if it belongs to --user
    Cancel {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// Confirm a pending reservation
    Confirm {
        #[arg(long)]
        id: Uuid,
    },
    /// Complete a confirmed reservation
    Complete {
        #[arg(long)]
        id: Uuid,
    },
    /// Replace reservation notes; omit --text to clear them
    Notes {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        text: Option<String>,
        /// Only edit if the reservation belongs to this user
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// Show one reservation
    Show {
        #[arg(long)]
        id: Uuid,
    },
    /// List a user's reservations, newest first
    List {
        #[arg(long)]
        user: Uuid,
    },
    /// Print reservation statistics
    Stats,
}

fn parse_money(s: &str) -> Result<Money, String> {
    s.parse::<Money>().map_err(|e| e.to_string())
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| format!("invalid date '{s}'"));
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected YYYY-MM-DD or RFC 3339, got '{s}': {e}"))
}

/// Forwards domain events to the log.
struct LogPublisher;

impl EventPublisher<ReservationDomainEvent> for LogPublisher {
    fn publish(&self, event: &ReservationDomainEvent) {
        match event {
            ReservationDomainEvent::Created { id, car_id, .. } => {
                tracing::info!(reservation_id = %id, car_id = %car_id, "reservation created");
            }
            ReservationDomainEvent::StatusChanged { id, from, to, .. } => {
                tracing::info!(reservation_id = %id, %from, %to, "reservation status changed");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, &config.home_dir());
    tracing::info!("rental-cli starting");

    if let Commands::Check = cli.command {
        check_config(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let api = build_client(&config).await?;
    match execute(api.as_ref(), cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => match err.downcast_ref::<CarBookingError>() {
            Some(refused) => {
                tracing::debug!(error = %refused, "request refused");
                eprintln!("{}", serde_json::to_string_pretty(&ErrorDto::from(refused))?);
                Ok(ExitCode::from(EXIT_REJECTED))
            }
            None => Err(err),
        },
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    // Surfaces module config errors without touching the database.
    let _: CarBookingConfig = config.module_config("car_booking")?;
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

/// Connect storage, apply migrations and wire the booking service.
async fn build_client(config: &AppConfig) -> Result<Arc<dyn CarBookingApi>> {
    let db_config = config
        .database
        .as_ref()
        .ok_or_else(|| anyhow!("No database configured; set `database.url` or pass --mock"))?;
    let db = runtime::db::connect(db_config, &config.home_dir()).await?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run car_booking migrations")?;

    let booking_config: CarBookingConfig = config.module_config("car_booking")?;
    let service = BookingAdmission::new(
        Arc::new(SeaOrmCarCatalog::new(db.clone())),
        Arc::new(SeaOrmReservationStore::new(db)),
        Arc::new(LogPublisher),
        booking_config.into(),
    );
    Ok(Arc::new(CarBookingLocalClient::new(Arc::new(service))))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn execute(api: &dyn CarBookingApi, command: Commands) -> Result<()> {
    match command {
        Commands::Check => Ok(()),
        Commands::AddCar { name, daily_rate } => {
            let car = api.register_car(NewCar { name, daily_rate }).await?;
            print_json(&CarDto::from(car))
        }
        Commands::Book {
            car,
            user,
            start,
            end,
            notes,
        } => {
            let reservation = api
                .try_book(NewReservation {
                    car_id: car,
                    user_id: user,
                    start,
                    end,
                    notes,
                })
                .await?;
            print_json(&ReservationDto::from(reservation))
        }
        Commands::Cancel { id, user } => {
            let reservation = match user {
                Some(user_id) => api.cancel_for_user(id, user_id).await?,
                None => api.cancel(id).await?,
            };
            print_json(&ReservationDto::from(reservation))
        }
        Commands::Confirm { id } => {
            let reservation = api
                .transition(id, car_booking::contract::ReservationStatus::Confirmed)
                .await?;
            print_json(&ReservationDto::from(reservation))
        }
        Commands::Complete { id } => {
            let reservation = api
                .transition(id, car_booking::contract::ReservationStatus::Completed)
                .await?;
            print_json(&ReservationDto::from(reservation))
        }
        Commands::Notes { id, text, user } => {
            let reservation = match user {
                Some(user_id) => api.update_notes_for_user(id, user_id, text).await?,
                None => api.update_notes(id, text).await?,
            };
            print_json(&ReservationDto::from(reservation))
        }
        Commands::Show { id } => {
            let reservation = api.get_reservation(id).await?;
            print_json(&ReservationDto::from(reservation))
        }
        Commands::List { user } => {
            let items = api.list_user_reservations(user).await?;
            print_json(&ReservationListDto::from(items))
        }
        Commands::Stats => {
            let reservations = api.count_reservations().await?;
            print_json(&StatsDto { reservations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dates_parse_as_midnight_utc() {
        assert_eq!(
            parse_instant("2024-06-01").unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn rfc3339_is_normalized_to_utc() {
        assert_eq!(
            parse_instant("2024-06-01T12:30:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap()
        );
        assert!(parse_instant("June 1st").is_err());
        assert!(parse_instant("2024-02-30").is_err());
    }

    #[test]
    fn money_argument_rejects_sub_cent_amounts() {
        assert_eq!(parse_money("49.90").unwrap().cents(), 4990);
        assert!(parse_money("1.005").is_err());
        assert!(parse_money("-3").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
