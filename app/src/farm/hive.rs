use super::{write_error, FarmService};
use crate::error::FarmError;
use abejanet_core::{
    Hive, HiveDetail, HiveMessage, HiveUpdateMessage, SensorFilter, HIVE_DETAIL_READINGS,
};
use tracing::{info, warn};

pub const HIVE_NOT_FOUND: &str = "Colmena no encontrada";
pub const HIVE_NAME_TAKEN: &str = "El nombre de la colmena ya está en uso";
pub const UNKNOWN_APIARY: &str = "apiario_id inválido (no existe)";

pub(super) fn hive_not_found() -> FarmError {
    FarmError::NotFound(HIVE_NOT_FOUND.to_owned())
}

impl FarmService {
    /// All hives with their apiary name, newest first.
    pub async fn list_hives(&self) -> Result<Vec<Hive>, FarmError> {
        Ok(self.repo.list_hives().await?)
    }

    pub async fn get_hive(&self, hive_id: i32) -> Result<Hive, FarmError> {
        self.repo.get_hive(hive_id).await?.ok_or_else(hive_not_found)
    }

    /// The hive, its sensors and its most recent readings.
    pub async fn hive_detail(&self, hive_id: i32) -> Result<HiveDetail, FarmError> {
        let hive = self.get_hive(hive_id).await?;
        let sensors = self.repo.list_sensors(&SensorFilter::hive(hive_id)).await?;
        let readings = self
            .repo
            .latest_hive_readings(hive_id, HIVE_DETAIL_READINGS)
            .await?;
        Ok(HiveDetail {
            hive,
            sensors,
            readings,
        })
    }

    pub async fn create_hive(&self, msg: HiveMessage) -> Result<Hive, FarmError> {
        let hive = msg.validate()?;
        if !self.repo.apiary_exists(hive.apiary_id).await? {
            warn!(apiary_id = hive.apiary_id, "Hive references unknown apiary");
            return Err(FarmError::BadReference(UNKNOWN_APIARY.to_owned()));
        }
        let created = self
            .repo
            .insert_hive(&hive)
            .await
            .map_err(|err| write_error(err, HIVE_NAME_TAKEN, UNKNOWN_APIARY))?;
        info!(hive_id = created.id, apiary_id = created.apiary_id, "Created hive");
        Ok(created)
    }

    pub async fn update_hive(&self, hive_id: i32, msg: HiveUpdateMessage) -> Result<Hive, FarmError> {
        let patch = msg.validate()?;
        if !self.repo.hive_exists(hive_id).await? {
            return Err(hive_not_found());
        }
        if let Some(apiary_id) = patch.apiary_id {
            if !self.repo.apiary_exists(apiary_id).await? {
                return Err(FarmError::BadReference(UNKNOWN_APIARY.to_owned()));
            }
        }
        self.repo
            .update_hive(hive_id, &patch)
            .await
            .map_err(|err| write_error(err, HIVE_NAME_TAKEN, UNKNOWN_APIARY))?
            .ok_or_else(hive_not_found)
    }
}
