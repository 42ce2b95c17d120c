use super::sensor::sensor_not_found;
use super::FarmService;
use crate::error::{DBError, FarmError};
use abejanet_core::{ReadingCreated, ReadingMessage};
use tracing::debug;

impl FarmService {
    /// Stores one device reading and stamps the sensor's last-reading time.
    pub async fn record_reading(&self, msg: ReadingMessage) -> Result<ReadingCreated, FarmError> {
        let reading = msg.validate()?;
        if !self.repo.sensor_exists(reading.sensor_id).await? {
            return Err(sensor_not_found());
        }
        let reading = match self.repo.insert_reading(&reading).await {
            Ok(reading) => reading,
            // sensor removed after the existence check
            Err(DBError::ForeignKeyViolation(_)) => return Err(sensor_not_found()),
            Err(err) => return Err(err.into()),
        };
        debug!(sensor_id = reading.sensor_id, reading_id = reading.id, "Stored reading");
        Ok(ReadingCreated {
            message: "Lectura registrada".to_owned(),
            reading,
        })
    }
}
