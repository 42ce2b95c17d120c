use super::{write_error, FarmService};
use crate::error::FarmError;
use abejanet_core::{Apiary, ApiaryMessage, ApiaryUpdateMessage};
use tracing::info;

pub const APIARY_NOT_FOUND: &str = "Apiario no encontrado";
pub const APIARY_NAME_TAKEN: &str = "El nombre del apiario ya está en uso";

pub(super) fn apiary_not_found() -> FarmError {
    FarmError::NotFound(APIARY_NOT_FOUND.to_owned())
}

impl FarmService {
    /// Apiaries ordered by name, optionally narrowed to names containing `search`.
    pub async fn list_apiaries(&self, search: Option<String>) -> Result<Vec<Apiary>, FarmError> {
        let search = search
            .map(|q| q.trim().to_owned())
            .filter(|q| !q.is_empty());
        Ok(self.repo.list_apiaries(search.as_deref()).await?)
    }

    pub async fn get_apiary(&self, apiary_id: i32) -> Result<Apiary, FarmError> {
        self.repo
            .get_apiary(apiary_id)
            .await?
            .ok_or_else(apiary_not_found)
    }

    pub async fn create_apiary(&self, msg: ApiaryMessage) -> Result<Apiary, FarmError> {
        let apiary = msg.validate()?;
        let created = self
            .repo
            .insert_apiary(&apiary)
            .await
            .map_err(|err| write_error(err, APIARY_NAME_TAKEN, APIARY_NOT_FOUND))?;
        info!(apiary_id = created.id, "Created apiary {}", created.name);
        Ok(created)
    }

    pub async fn update_apiary(
        &self,
        apiary_id: i32,
        msg: ApiaryUpdateMessage,
    ) -> Result<Apiary, FarmError> {
        let patch = msg.validate()?;
        self.repo
            .update_apiary(apiary_id, &patch)
            .await
            .map_err(|err| write_error(err, APIARY_NAME_TAKEN, APIARY_NOT_FOUND))?
            .ok_or_else(apiary_not_found)
    }
}
