//! Storage seams of the service.
//!
//! [`Repository`] covers every entity read and write, including the
//! transactional cascades of the deletion protocol. [`ReportStore`] covers
//! the read-only aggregates. Production wires both to [`PgStore`]; service
//! and REST tests drive an in-memory repository.

use crate::error::DBError;
use crate::models::report::{
    AdminSummary, ApiaryActivity, ApiaryHiveCount, ApiaryOption, ClimatePoint, HiveOption,
    HiveSummary, MonthCount, Summary, UserListing, UserSummary, WeightPoint,
};
use abejanet_core::{
    Apiary, ApiaryPatch, CascadeReport, DateRange, Hive, HiveDependencies, HivePatch, NewApiary,
    NewHive, NewReading, NewSensor, NewUser, Reading, ReportFilter, Role, Sensor, SensorFilter,
    SensorPatch, User, UserPatch,
};
use async_trait::async_trait;

mod postgres;
pub use postgres::PgStore;

#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait Repository: Send + Sync {
    async fn ping(&self) -> Result<(), DBError>;

    async fn list_apiaries(&self, search: Option<&str>) -> Result<Vec<Apiary>, DBError>;
    async fn get_apiary(&self, apiary_id: i32) -> Result<Option<Apiary>, DBError>;
    async fn apiary_exists(&self, apiary_id: i32) -> Result<bool, DBError>;
    async fn insert_apiary(&self, apiary: &NewApiary) -> Result<Apiary, DBError>;
    async fn update_apiary(
        &self,
        apiary_id: i32,
        patch: &ApiaryPatch,
    ) -> Result<Option<Apiary>, DBError>;
    async fn count_apiary_hives(&self, apiary_id: i32) -> Result<i64, DBError>;
    /// Deletes the apiary only while no hive references it.
    async fn delete_apiary(&self, apiary_id: i32) -> Result<u64, DBError>;

    async fn list_hives(&self) -> Result<Vec<Hive>, DBError>;
    async fn get_hive(&self, hive_id: i32) -> Result<Option<Hive>, DBError>;
    async fn hive_exists(&self, hive_id: i32) -> Result<bool, DBError>;
    async fn insert_hive(&self, hive: &NewHive) -> Result<Hive, DBError>;
    async fn update_hive(&self, hive_id: i32, patch: &HivePatch) -> Result<Option<Hive>, DBError>;
    async fn hive_dependencies(&self, hive_id: i32) -> Result<HiveDependencies, DBError>;
    /// Deletes the hive only while no sensor is mounted on it.
    async fn delete_hive(&self, hive_id: i32) -> Result<u64, DBError>;
    /// Readings, sensors and the hive in one transaction. `None` if the hive
    /// no longer exists.
    async fn delete_hive_cascade(&self, hive_id: i32) -> Result<Option<CascadeReport>, DBError>;

    async fn list_sensors(&self, filter: &SensorFilter) -> Result<Vec<Sensor>, DBError>;
    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>, DBError>;
    async fn sensor_exists(&self, sensor_id: i32) -> Result<bool, DBError>;
    async fn insert_sensor(&self, sensor: &NewSensor) -> Result<Sensor, DBError>;
    async fn update_sensor(
        &self,
        sensor_id: i32,
        patch: &SensorPatch,
    ) -> Result<Option<Sensor>, DBError>;
    async fn count_sensor_readings(&self, sensor_id: i32) -> Result<i64, DBError>;
    /// Deletes the sensor only while it has no readings.
    async fn delete_sensor(&self, sensor_id: i32) -> Result<u64, DBError>;
    /// Readings and the sensor in one transaction.
    async fn delete_sensor_cascade(&self, sensor_id: i32)
        -> Result<Option<CascadeReport>, DBError>;

    async fn insert_reading(&self, reading: &NewReading) -> Result<Reading, DBError>;
    async fn latest_hive_readings(&self, hive_id: i32, limit: i64) -> Result<Vec<Reading>, DBError>;

    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, DBError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DBError>;
    /// An active user and the stored password.
    async fn active_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, Option<String>)>, DBError>;
    async fn insert_user(&self, user: &NewUser) -> Result<User, DBError>;
    async fn update_user(&self, user_id: i32, patch: &UserPatch) -> Result<Option<User>, DBError>;
    async fn delete_user(&self, user_id: i32) -> Result<u64, DBError>;
    async fn list_roles(&self) -> Result<Vec<Role>, DBError>;
    async fn role_exists(&self, role_id: i32) -> Result<bool, DBError>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn apiary_options(&self) -> Result<Vec<ApiaryOption>, DBError>;
    async fn hive_options(&self) -> Result<Vec<HiveOption>, DBError>;
    async fn summary(&self, filter: &ReportFilter) -> Result<Summary, DBError>;
    async fn weight_series(&self, filter: &ReportFilter) -> Result<Vec<WeightPoint>, DBError>;
    async fn climate_series(&self, filter: &ReportFilter) -> Result<Vec<ClimatePoint>, DBError>;
    async fn user_summary(&self) -> Result<UserSummary, DBError>;
    async fn user_growth(&self, range: &DateRange) -> Result<Vec<MonthCount>, DBError>;
    async fn user_listing(&self) -> Result<Vec<UserListing>, DBError>;
    async fn hive_summary(&self) -> Result<HiveSummary, DBError>;
    async fn hives_per_apiary(&self) -> Result<Vec<ApiaryHiveCount>, DBError>;
    async fn admin_summary(&self) -> Result<AdminSummary, DBError>;
    async fn top_activity(&self, range: &DateRange) -> Result<Vec<ApiaryActivity>, DBError>;
}
