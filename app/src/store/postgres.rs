use super::{ReportStore, Repository};
use crate::error::DBError;
use crate::models::{
    self, apiary as apiary_model, hive as hive_model, reading as reading_model,
    report as report_model, sensor as sensor_model, user as user_model,
};
use abejanet_core::{
    Apiary, ApiaryPatch, CascadeReport, DateRange, Hive, HiveDependencies, HivePatch, NewApiary,
    NewHive, NewReading, NewSensor, NewUser, Reading, ReportFilter, Role, Sensor, SensorFilter,
    SensorPatch, User, UserPatch,
};
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::{debug, error};

/// Postgres-backed store. Owns a handle of the shared pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl std::fmt::Debug for PgStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore").finish()
    }
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

/// Commits a staged cascade, or rolls it back explicitly on any error.
async fn finish<T>(tx: Transaction<'_, Postgres>, staged: Result<T, DBError>) -> Result<T, DBError> {
    match staged {
        Ok(report) => {
            tx.commit().await?;
            Ok(report)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!("Rollback failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}

async fn cascade_hive(
    conn: &mut PgConnection,
    hive_id: i32,
) -> Result<Option<CascadeReport>, DBError> {
    if !hive_model::lock(&mut *conn, hive_id).await? {
        return Ok(None);
    }
    let readings = hive_model::delete_readings(&mut *conn, hive_id).await?;
    let sensors = hive_model::delete_sensors(&mut *conn, hive_id).await?;
    let hives = hive_model::delete(&mut *conn, hive_id).await?;
    debug!(readings, sensors, hives, "Hive cascade staged");
    Ok(Some(CascadeReport {
        readings,
        sensors,
        hives,
    }))
}

async fn cascade_sensor(
    conn: &mut PgConnection,
    sensor_id: i32,
) -> Result<Option<CascadeReport>, DBError> {
    if !sensor_model::lock(&mut *conn, sensor_id).await? {
        return Ok(None);
    }
    let readings = sensor_model::delete_readings(&mut *conn, sensor_id).await?;
    let sensors = sensor_model::delete(&mut *conn, sensor_id).await?;
    Ok(Some(CascadeReport {
        readings,
        sensors,
        hives: 0,
    }))
}

fn into_all<D, T: From<D>>(rows: Vec<D>) -> Vec<T> {
    rows.into_iter().map(T::from).collect()
}

#[async_trait]
impl Repository for PgStore {
    async fn ping(&self) -> Result<(), DBError> {
        models::check_schema(&self.pool).await
    }

    async fn list_apiaries(&self, search: Option<&str>) -> Result<Vec<Apiary>, DBError> {
        Ok(into_all(apiary_model::read(&self.pool, search).await?))
    }

    async fn get_apiary(&self, apiary_id: i32) -> Result<Option<Apiary>, DBError> {
        Ok(apiary_model::get(&self.pool, apiary_id).await?.map(Apiary::from))
    }

    async fn apiary_exists(&self, apiary_id: i32) -> Result<bool, DBError> {
        apiary_model::exists(&self.pool, apiary_id).await
    }

    async fn insert_apiary(&self, apiary: &NewApiary) -> Result<Apiary, DBError> {
        Ok(apiary_model::insert(&self.pool, apiary).await?.into())
    }

    async fn update_apiary(
        &self,
        apiary_id: i32,
        patch: &ApiaryPatch,
    ) -> Result<Option<Apiary>, DBError> {
        Ok(apiary_model::update(&self.pool, apiary_id, patch)
            .await?
            .map(Apiary::from))
    }

    async fn count_apiary_hives(&self, apiary_id: i32) -> Result<i64, DBError> {
        apiary_model::count_hives(&self.pool, apiary_id).await
    }

    async fn delete_apiary(&self, apiary_id: i32) -> Result<u64, DBError> {
        apiary_model::delete_unreferenced(&self.pool, apiary_id).await
    }

    async fn list_hives(&self) -> Result<Vec<Hive>, DBError> {
        Ok(into_all(hive_model::read(&self.pool).await?))
    }

    async fn get_hive(&self, hive_id: i32) -> Result<Option<Hive>, DBError> {
        Ok(hive_model::get(&self.pool, hive_id).await?.map(Hive::from))
    }

    async fn hive_exists(&self, hive_id: i32) -> Result<bool, DBError> {
        hive_model::exists(&self.pool, hive_id).await
    }

    async fn insert_hive(&self, hive: &NewHive) -> Result<Hive, DBError> {
        Ok(hive_model::insert(&self.pool, hive).await?.into())
    }

    async fn update_hive(&self, hive_id: i32, patch: &HivePatch) -> Result<Option<Hive>, DBError> {
        Ok(hive_model::update(&self.pool, hive_id, patch)
            .await?
            .map(Hive::from))
    }

    async fn hive_dependencies(&self, hive_id: i32) -> Result<HiveDependencies, DBError> {
        hive_model::dependencies(&self.pool, hive_id).await
    }

    async fn delete_hive(&self, hive_id: i32) -> Result<u64, DBError> {
        hive_model::delete_unreferenced(&self.pool, hive_id).await
    }

    async fn delete_hive_cascade(&self, hive_id: i32) -> Result<Option<CascadeReport>, DBError> {
        let mut tx = self.pool.begin().await?;
        let staged = cascade_hive(&mut tx, hive_id).await;
        finish(tx, staged).await
    }

    async fn list_sensors(&self, filter: &SensorFilter) -> Result<Vec<Sensor>, DBError> {
        Ok(into_all(sensor_model::read(&self.pool, filter).await?))
    }

    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>, DBError> {
        Ok(sensor_model::get(&self.pool, sensor_id)
            .await?
            .map(Sensor::from))
    }

    async fn sensor_exists(&self, sensor_id: i32) -> Result<bool, DBError> {
        sensor_model::exists(&self.pool, sensor_id).await
    }

    async fn insert_sensor(&self, sensor: &NewSensor) -> Result<Sensor, DBError> {
        Ok(sensor_model::insert(&self.pool, sensor).await?.into())
    }

    async fn update_sensor(
        &self,
        sensor_id: i32,
        patch: &SensorPatch,
    ) -> Result<Option<Sensor>, DBError> {
        Ok(sensor_model::update(&self.pool, sensor_id, patch)
            .await?
            .map(Sensor::from))
    }

    async fn count_sensor_readings(&self, sensor_id: i32) -> Result<i64, DBError> {
        sensor_model::count_readings(&self.pool, sensor_id).await
    }

    async fn delete_sensor(&self, sensor_id: i32) -> Result<u64, DBError> {
        sensor_model::delete_unreferenced(&self.pool, sensor_id).await
    }

    async fn delete_sensor_cascade(
        &self,
        sensor_id: i32,
    ) -> Result<Option<CascadeReport>, DBError> {
        let mut tx = self.pool.begin().await?;
        let staged = cascade_sensor(&mut tx, sensor_id).await;
        finish(tx, staged).await
    }

    async fn insert_reading(&self, reading: &NewReading) -> Result<Reading, DBError> {
        Ok(reading_model::insert(&self.pool, reading).await?.into())
    }

    async fn latest_hive_readings(&self, hive_id: i32, limit: i64) -> Result<Vec<Reading>, DBError> {
        Ok(into_all(
            reading_model::latest_for_hive(&self.pool, hive_id, limit).await?,
        ))
    }

    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, DBError> {
        Ok(into_all(user_model::read(&self.pool, email).await?))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DBError> {
        Ok(user_model::get_by_email(&self.pool, email)
            .await?
            .map(User::from))
    }

    async fn active_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, Option<String>)>, DBError> {
        Ok(user_model::active_credentials(&self.pool, email)
            .await?
            .map(|dao| (User::from(dao.user), dao.contrasena)))
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, DBError> {
        Ok(user_model::insert(&self.pool, user).await?.into())
    }

    async fn update_user(&self, user_id: i32, patch: &UserPatch) -> Result<Option<User>, DBError> {
        Ok(user_model::update(&self.pool, user_id, patch)
            .await?
            .map(User::from))
    }

    async fn delete_user(&self, user_id: i32) -> Result<u64, DBError> {
        user_model::delete(&self.pool, user_id).await
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DBError> {
        Ok(into_all(user_model::read_roles(&self.pool).await?))
    }

    async fn role_exists(&self, role_id: i32) -> Result<bool, DBError> {
        user_model::role_exists(&self.pool, role_id).await
    }
}

#[async_trait]
impl ReportStore for PgStore {
    async fn apiary_options(&self) -> Result<Vec<report_model::ApiaryOption>, DBError> {
        report_model::apiary_options(&self.pool).await
    }

    async fn hive_options(&self) -> Result<Vec<report_model::HiveOption>, DBError> {
        report_model::hive_options(&self.pool).await
    }

    async fn summary(&self, filter: &ReportFilter) -> Result<report_model::Summary, DBError> {
        report_model::summary(&self.pool, filter).await
    }

    async fn weight_series(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<report_model::WeightPoint>, DBError> {
        report_model::weight_series(&self.pool, filter).await
    }

    async fn climate_series(
        &self,
        filter: &ReportFilter,
    ) -> Result<Vec<report_model::ClimatePoint>, DBError> {
        report_model::climate_series(&self.pool, filter).await
    }

    async fn user_summary(&self) -> Result<report_model::UserSummary, DBError> {
        report_model::user_summary(&self.pool).await
    }

    async fn user_growth(&self, range: &DateRange) -> Result<Vec<report_model::MonthCount>, DBError> {
        report_model::user_growth(&self.pool, range).await
    }

    async fn user_listing(&self) -> Result<Vec<report_model::UserListing>, DBError> {
        report_model::user_listing(&self.pool).await
    }

    async fn hive_summary(&self) -> Result<report_model::HiveSummary, DBError> {
        report_model::hive_summary(&self.pool).await
    }

    async fn hives_per_apiary(&self) -> Result<Vec<report_model::ApiaryHiveCount>, DBError> {
        report_model::hives_per_apiary(&self.pool).await
    }

    async fn admin_summary(&self) -> Result<report_model::AdminSummary, DBError> {
        report_model::admin_summary(&self.pool).await
    }

    async fn top_activity(
        &self,
        range: &DateRange,
    ) -> Result<Vec<report_model::ApiaryActivity>, DBError> {
        report_model::top_activity(&self.pool, range).await
    }
}
