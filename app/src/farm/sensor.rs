use super::{write_error, FarmService};
use crate::error::FarmError;
use abejanet_core::{Sensor, SensorMessage, SensorQuery, SensorUpdateMessage};
use tracing::info;

pub const SENSOR_NOT_FOUND: &str = "Sensor no encontrado";
pub const MAC_TAKEN: &str = "La dirección MAC ya está registrada";
pub const UNKNOWN_HIVE: &str = "colmena_id inválido (no existe)";

pub(super) fn sensor_not_found() -> FarmError {
    FarmError::NotFound(SENSOR_NOT_FOUND.to_owned())
}

impl FarmService {
    pub async fn list_sensors(&self, query: SensorQuery) -> Result<Vec<Sensor>, FarmError> {
        let filter = query.validate()?;
        Ok(self.repo.list_sensors(&filter).await?)
    }

    pub async fn get_sensor(&self, sensor_id: i32) -> Result<Sensor, FarmError> {
        self.repo
            .get_sensor(sensor_id)
            .await?
            .ok_or_else(sensor_not_found)
    }

    async fn check_hive_reference(&self, hive_id: Option<i32>) -> Result<(), FarmError> {
        match hive_id {
            Some(hive_id) if !self.repo.hive_exists(hive_id).await? => {
                Err(FarmError::BadReference(UNKNOWN_HIVE.to_owned()))
            }
            _ => Ok(()),
        }
    }

    pub async fn create_sensor(&self, msg: SensorMessage) -> Result<Sensor, FarmError> {
        let sensor = msg.validate()?;
        self.check_hive_reference(sensor.hive_id).await?;
        let created = self
            .repo
            .insert_sensor(&sensor)
            .await
            .map_err(|err| write_error(err, MAC_TAKEN, UNKNOWN_HIVE))?;
        info!(sensor_id = created.id, state = %created.state, "Created sensor");
        Ok(created)
    }

    pub async fn update_sensor(
        &self,
        sensor_id: i32,
        msg: SensorUpdateMessage,
    ) -> Result<Sensor, FarmError> {
        let patch = msg.validate()?;
        if !self.repo.sensor_exists(sensor_id).await? {
            return Err(sensor_not_found());
        }
        self.check_hive_reference(patch.hive_id.flatten()).await?;
        self.repo
            .update_sensor(sensor_id, &patch)
            .await
            .map_err(|err| write_error(err, MAC_TAKEN, UNKNOWN_HIVE))?
            .ok_or_else(sensor_not_found)
    }
}
