//! Deletion protocol for hives, apiaries and sensors.
//!
//! A plain delete is refused with a 409 while dependents exist. The storage
//! statement itself is guarded, so a dependent attached between the count and
//! the delete makes the delete remove nothing; the count is then taken again
//! and the conflict reported. A forced delete removes the dependents and the
//! row in one transaction.

use super::apiary::apiary_not_found;
use super::hive::hive_not_found;
use super::sensor::sensor_not_found;
use super::FarmService;
use crate::error::{DBError, FarmError};
use abejanet_core::{ApiaryDependencies, Deletion, HiveDependencies, SensorDependencies};
use serde_json::json;
use tracing::{error, info, warn};

pub const HIVE_BLOCKED: &str = "No se puede eliminar: la colmena tiene dependencias";
pub const HIVE_BLOCKED_HINT: &str =
    "Usa ?force=1 para eliminar en cascada (lecturas, sensores y colmena).";
pub const APIARY_BLOCKED: &str = "No se puede eliminar: el apiario tiene colmenas";
pub const APIARY_BLOCKED_HINT: &str = "Reasigna o elimina primero las colmenas del apiario.";
pub const SENSOR_BLOCKED: &str = "No se puede eliminar: el sensor tiene lecturas";
pub const SENSOR_BLOCKED_HINT: &str = "Usa ?force=1 para eliminar el sensor junto con sus lecturas.";

fn hive_blocked(deps: HiveDependencies) -> FarmError {
    FarmError::Conflict {
        message: HIVE_BLOCKED.to_owned(),
        details: Some(json!({ "sensores": deps.sensores, "lecturas": deps.lecturas })),
        hint: Some(HIVE_BLOCKED_HINT.to_owned()),
    }
}

fn apiary_blocked(deps: ApiaryDependencies) -> FarmError {
    FarmError::Conflict {
        message: APIARY_BLOCKED.to_owned(),
        details: Some(json!({ "colmenas": deps.colmenas })),
        hint: Some(APIARY_BLOCKED_HINT.to_owned()),
    }
}

fn sensor_blocked(deps: SensorDependencies) -> FarmError {
    FarmError::Conflict {
        message: SENSOR_BLOCKED.to_owned(),
        details: Some(json!({ "lecturas": deps.lecturas })),
        hint: Some(SENSOR_BLOCKED_HINT.to_owned()),
    }
}

/// Rows removed by a guarded delete. A tripped RESTRICT key removed nothing.
fn guarded(result: Result<u64, DBError>) -> Result<u64, FarmError> {
    match result {
        Ok(deleted) => Ok(deleted),
        Err(DBError::ForeignKeyViolation(constraint)) => {
            warn!(constraint = %constraint, "Guarded delete hit a foreign key");
            Ok(0)
        }
        Err(err) => Err(err.into()),
    }
}

fn cascade_failed(err: DBError) -> FarmError {
    error!("Cascade rolled back: {}", err);
    FarmError::Internal(err)
}

impl FarmService {
    #[tracing::instrument(skip(self))]
    pub async fn delete_hive(&self, hive_id: i32, force: bool) -> Result<Deletion, FarmError> {
        if !self.repo.hive_exists(hive_id).await? {
            return Err(hive_not_found());
        }

        if force {
            let report = self
                .repo
                .delete_hive_cascade(hive_id)
                .await
                .map_err(cascade_failed)?
                .ok_or_else(hive_not_found)?;
            info!(
                readings = report.readings,
                sensors = report.sensors,
                "Hive deleted with its dependents"
            );
            return Ok(Deletion::forced(hive_id, report.hives));
        }

        let deps = self.repo.hive_dependencies(hive_id).await?;
        if !deps.is_empty() {
            return Err(hive_blocked(deps));
        }

        let deleted = guarded(self.repo.delete_hive(hive_id).await)?;
        if deleted == 0 {
            let deps = self.repo.hive_dependencies(hive_id).await?;
            if !deps.is_empty() {
                warn!(sensors = deps.sensores, "Sensor attached during delete");
                return Err(hive_blocked(deps));
            }
        }
        info!(deleted, "Hive deleted");
        Ok(Deletion::plain(hive_id, deleted))
    }

    /// Apiaries have no forced mode; hives must be moved or deleted first.
    #[tracing::instrument(skip(self))]
    pub async fn delete_apiary(&self, apiary_id: i32) -> Result<Deletion, FarmError> {
        if !self.repo.apiary_exists(apiary_id).await? {
            return Err(apiary_not_found());
        }

        let count = |colmenas| ApiaryDependencies { colmenas };
        let deps = count(self.repo.count_apiary_hives(apiary_id).await?);
        if !deps.is_empty() {
            return Err(apiary_blocked(deps));
        }

        let deleted = guarded(self.repo.delete_apiary(apiary_id).await)?;
        if deleted == 0 {
            let deps = count(self.repo.count_apiary_hives(apiary_id).await?);
            if !deps.is_empty() {
                warn!(hives = deps.colmenas, "Hive created during delete");
                return Err(apiary_blocked(deps));
            }
        }
        info!(deleted, "Apiary deleted");
        Ok(Deletion::plain(apiary_id, deleted))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_sensor(&self, sensor_id: i32, force: bool) -> Result<Deletion, FarmError> {
        if !self.repo.sensor_exists(sensor_id).await? {
            return Err(sensor_not_found());
        }

        if force {
            let report = self
                .repo
                .delete_sensor_cascade(sensor_id)
                .await
                .map_err(cascade_failed)?
                .ok_or_else(sensor_not_found)?;
            info!(readings = report.readings, "Sensor deleted with its readings");
            return Ok(Deletion::forced(sensor_id, report.sensors));
        }

        let count = |lecturas| SensorDependencies { lecturas };
        let deps = count(self.repo.count_sensor_readings(sensor_id).await?);
        if !deps.is_empty() {
            return Err(sensor_blocked(deps));
        }

        let deleted = guarded(self.repo.delete_sensor(sensor_id).await)?;
        if deleted == 0 {
            let deps = count(self.repo.count_sensor_readings(sensor_id).await?);
            if !deps.is_empty() {
                warn!(readings = deps.lecturas, "Reading stored during delete");
                return Err(sensor_blocked(deps));
            }
        }
        info!(deleted, "Sensor deleted");
        Ok(Deletion::plain(sensor_id, deleted))
    }
}
