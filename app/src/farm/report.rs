use super::FarmService;
use crate::error::FarmError;
use crate::models::report::{
    AdminSummary, ApiaryActivity, ApiaryHiveCount, ApiaryOption, ClimatePoint, HiveOption,
    HiveSummary, MonthCount, Summary, UserListing, UserSummary, WeightPoint,
};
use abejanet_core::ReportQuery;

// Ranged reports validate the query before touching the store.
impl FarmService {
    pub async fn report_apiaries(&self) -> Result<Vec<ApiaryOption>, FarmError> {
        Ok(self.reports.apiary_options().await?)
    }

    pub async fn report_hives(&self) -> Result<Vec<HiveOption>, FarmError> {
        Ok(self.reports.hive_options().await?)
    }

    pub async fn report_summary(&self, query: ReportQuery) -> Result<Summary, FarmError> {
        let filter = query.validate()?;
        Ok(self.reports.summary(&filter).await?)
    }

    pub async fn report_weight(&self, query: ReportQuery) -> Result<Vec<WeightPoint>, FarmError> {
        let filter = query.validate()?;
        Ok(self.reports.weight_series(&filter).await?)
    }

    pub async fn report_climate(&self, query: ReportQuery) -> Result<Vec<ClimatePoint>, FarmError> {
        let filter = query.validate()?;
        Ok(self.reports.climate_series(&filter).await?)
    }

    pub async fn report_user_summary(&self) -> Result<UserSummary, FarmError> {
        Ok(self.reports.user_summary().await?)
    }

    pub async fn report_user_growth(&self, query: ReportQuery) -> Result<Vec<MonthCount>, FarmError> {
        let range = query.range()?;
        Ok(self.reports.user_growth(&range).await?)
    }

    pub async fn report_user_listing(&self) -> Result<Vec<UserListing>, FarmError> {
        Ok(self.reports.user_listing().await?)
    }

    pub async fn report_hive_summary(&self) -> Result<HiveSummary, FarmError> {
        Ok(self.reports.hive_summary().await?)
    }

    pub async fn report_hives_per_apiary(&self) -> Result<Vec<ApiaryHiveCount>, FarmError> {
        Ok(self.reports.hives_per_apiary().await?)
    }

    pub async fn report_admin_summary(&self) -> Result<AdminSummary, FarmError> {
        Ok(self.reports.admin_summary().await?)
    }

    pub async fn report_top_activity(
        &self,
        query: ReportQuery,
    ) -> Result<Vec<ApiaryActivity>, FarmError> {
        let range = query.range()?;
        Ok(self.reports.top_activity(&range).await?)
    }
}
