//! SeaORM-backed implementations of the catalog and reservation ports.
//!
//! Both structs are generic over `C: ConnectionTrait`, so they can be built
//! with a `DatabaseConnection` **or** a transactional connection.
//!
//! `create` enforces exclusion at write time: the insert is one
//! `INSERT ... SELECT ... WHERE NOT EXISTS (overlapping active row)` statement,
//! so two writers racing for the same dates cannot both land, even from
//! different processes. Zero affected rows is reported as
//! [`StoreError::Conflict`].

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Statement, Value,
};
use uuid::Uuid;

use crate::contract::model::{Car, Reservation, ReservationStatus};
use crate::domain::repo::{CarCatalog, ReservationStore, StoreError};
use crate::infra::storage::entity::{car, reservation};
use crate::infra::storage::mapper::{car_from_entity, car_to_active, reservation_from_entity};

/// SeaORM car catalog.
pub struct SeaOrmCarCatalog<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCarCatalog<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> CarCatalog for SeaOrmCarCatalog<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Car>> {
        let found = car::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("car find_by_id failed")?;
        found.map(car_from_entity).transpose()
    }

    async fn insert(&self, c: Car) -> anyhow::Result<()> {
        let _ = car_to_active(&c)
            .insert(&self.conn)
            .await
            .context("car insert failed")?;
        Ok(())
    }
}

/// SeaORM reservation store.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmReservationStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmReservationStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn active_statuses() -> [&'static str; 2] {
    ReservationStatus::ACTIVE.map(ReservationStatus::as_str)
}

/// Positional placeholder `n` (1-based) in the backend's dialect.
fn placeholder(backend: DbBackend, n: usize) -> String {
    match backend {
        DbBackend::Postgres => format!("${n}"),
        _ => "?".to_string(),
    }
}

fn exclusive_insert_statement(backend: DbBackend, r: &Reservation) -> Statement {
    let p = |n| placeholder(backend, n);
    let [pending, confirmed] = active_statuses();
    let sql = format!(
        "INSERT INTO reservations \
         (id, car_id, user_id, start_at, end_at, total_price_cents, status, notes, created_at, updated_at) \
         SELECT {}, {}, {}, {}, {}, {}, {}, {}, {}, {} \
         WHERE NOT EXISTS (\
         SELECT 1 FROM reservations \
         WHERE car_id = {} AND status IN ('{pending}', '{confirmed}') \
         AND start_at < {} AND end_at > {})",
        p(1),
        p(2),
        p(3),
        p(4),
        p(5),
        p(6),
        p(7),
        p(8),
        p(9),
        p(10),
        p(11),
        p(12),
        p(13),
    );
    let values: Vec<Value> = vec![
        r.id.into(),
        r.car_id.into(),
        r.user_id.into(),
        r.interval.start().into(),
        r.interval.end().into(),
        r.total_price.cents().into(),
        r.status.as_str().into(),
        r.notes.clone().into(),
        r.created_at.into(),
        r.updated_at.into(),
        r.car_id.into(),
        r.interval.end().into(),
        r.interval.start().into(),
    ];
    Statement::from_sql_and_values(backend, sql, values)
}

impl<C> SeaOrmReservationStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn load(&self, id: Uuid) -> anyhow::Result<Option<Reservation>> {
        let found = reservation::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("reservation find_by_id failed")?;
        found.map(reservation_from_entity).transpose()
    }
}

#[async_trait::async_trait]
impl<C> ReservationStore for SeaOrmReservationStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_active_by_car_id(&self, car_id: Uuid) -> Result<Vec<Reservation>, StoreError> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::CarId.eq(car_id))
            .filter(reservation::Column::Status.is_in(active_statuses()))
            .order_by_asc(reservation::Column::StartAt)
            .all(&self.conn)
            .await
            .context("find_active_by_car_id failed")?;
        let items = rows
            .into_iter()
            .map(reservation_from_entity)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(items)
    }

    async fn create(&self, r: Reservation) -> Result<(), StoreError> {
        let stmt = exclusive_insert_statement(self.conn.get_database_backend(), &r);
        let res = self
            .conn
            .execute(stmt)
            .await
            .context("reservation insert failed")?;
        if res.rows_affected() == 0 {
            return Err(StoreError::Conflict { car_id: r.car_id });
        }
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: ReservationStatus,
        next: ReservationStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StoreError> {
        let res = reservation::Entity::update_many()
            .col_expr(reservation::Column::Status, Expr::value(next.as_str()))
            .col_expr(reservation::Column::UpdatedAt, Expr::value(at))
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(expected.as_str()))
            .exec(&self.conn)
            .await
            .context("status update failed")?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Ok(self.load(id).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        Ok(self.load(id).await?)
    }

    async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StoreError> {
        let res = reservation::Entity::update_many()
            .col_expr(reservation::Column::Notes, Expr::value(notes))
            .col_expr(reservation::Column::UpdatedAt, Expr::value(at))
            .filter(reservation::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("notes update failed")?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        Ok(self.load(id).await?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Reservation>, StoreError> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::UserId.eq(user_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("list_by_user failed")?;
        let items = rows
            .into_iter()
            .map(reservation_from_entity)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(items)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let n = reservation::Entity::find()
            .count(&self.conn)
            .await
            .context("count failed")?;
        Ok(n)
    }
}
