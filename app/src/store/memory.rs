//! In-memory [`Repository`] used by service and REST tests.
//!
//! Mirrors the constraints of the Postgres schema: unique names, unique MAC
//! addresses and e-mails, and RESTRICT foreign keys. Cascades run on a staged
//! copy of the tables that only replaces the live tables on commit, so an
//! injected failure behaves like a rollback.

use super::{ReportStore, Repository};
use crate::error::DBError;
use crate::models::report::{
    AdminSummary, ApiaryActivity, ApiaryHiveCount, ApiaryOption, ClimatePoint, HiveOption,
    HiveSummary, MonthCount, RoleCount, Summary, UserListing, UserSummary, WeightPoint,
};
use abejanet_core::{
    Apiary, ApiaryPatch, CascadeReport, DateRange, Hive, HiveDependencies, HivePatch, NewApiary,
    NewHive, NewReading, NewSensor, NewUser, Reading, ReportFilter, Role, Sensor, SensorFilter,
    SensorPatch, User, UserPatch,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Step of a cascade at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    Readings,
    Sensors,
    Hive,
    Commit,
}

type Hook = Box<dyn FnOnce(&mut Tables) + Send>;

#[derive(Debug, Clone)]
struct HiveRow {
    apiary_id: i32,
    name: String,
    description: Option<String>,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct UserRow {
    user: User,
    password: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Tables {
    next_id: i32,
    apiaries: BTreeMap<i32, Apiary>,
    hives: BTreeMap<i32, HiveRow>,
    sensors: BTreeMap<i32, Sensor>,
    readings: BTreeMap<i32, Reading>,
    roles: BTreeMap<i32, Role>,
    users: BTreeMap<i32, UserRow>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn hive(&self, hive_id: i32) -> Option<Hive> {
        let row = self.hives.get(&hive_id)?;
        let apiary = self.apiaries.get(&row.apiary_id)?;
        Some(Hive {
            id: hive_id,
            apiary_id: row.apiary_id,
            apiary_name: apiary.name.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            created_at: row.created_at,
        })
    }

    fn user(&self, row: &UserRow) -> User {
        let mut user = row.user.clone();
        user.nombre_rol = user
            .rol_id
            .and_then(|id| self.roles.get(&id))
            .map(|role| role.nombre.clone());
        user
    }

    fn sensor_ids_of(&self, hive_id: i32) -> Vec<i32> {
        self.sensors
            .values()
            .filter(|s| s.hive_id == Some(hive_id))
            .map(|s| s.id)
            .collect()
    }

    fn readings_of(&self, sensor_ids: &[i32]) -> Vec<i32> {
        self.readings
            .values()
            .filter(|r| sensor_ids.contains(&r.sensor_id))
            .map(|r| r.id)
            .collect()
    }

    /// Attaches a sensor to a hive, bypassing the service.
    pub fn attach_sensor(&mut self, hive_id: i32, kind: &str) -> i32 {
        let id = self.next_id();
        self.sensors.insert(
            id,
            Sensor {
                id,
                hive_id: Some(hive_id),
                kind: kind.to_owned(),
                mac_address: None,
                state: abejanet_core::SensorState::Active,
                installed_on: None,
                last_reading_at: None,
            },
        );
        id
    }
}

fn unique(constraint: &str) -> DBError {
    DBError::UniqueViolation(constraint.to_owned())
}

fn foreign_key(constraint: &str) -> DBError {
    DBError::ForeignKeyViolation(constraint.to_owned())
}

pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
    fail_cascade_at: Mutex<Option<CascadeStep>>,
    before_guarded_delete: Mutex<Option<Hook>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl MemoryStore {
    /// An empty store with the two seeded roles.
    pub fn new() -> Self {
        let mut tables = Tables::default();
        for name in ["administrador", "apicultor"] {
            let id = tables.next_id();
            tables.roles.insert(
                id,
                Role {
                    id,
                    nombre: name.to_owned(),
                },
            );
        }
        MemoryStore {
            tables: Mutex::new(tables),
            offline: AtomicBool::new(false),
            fail_cascade_at: Mutex::new(None),
            before_guarded_delete: Mutex::new(None),
        }
    }

    /// Every following call fails like a closed pool.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// The next cascade fails at `step`.
    pub fn fail_cascade_at(&self, step: CascadeStep) {
        *self.fail_cascade_at.lock() = Some(step);
    }

    /// Runs `hook` on the tables right before the next guarded delete.
    pub fn before_guarded_delete<F>(&self, hook: F)
    where
        F: FnOnce(&mut Tables) + Send + 'static,
    {
        *self.before_guarded_delete.lock() = Some(Box::new(hook));
    }

    /// Row counts of apiaries, hives, sensors and readings.
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        let tables = self.tables.lock();
        (
            tables.apiaries.len(),
            tables.hives.len(),
            tables.sensors.len(),
            tables.readings.len(),
        )
    }

    fn check(&self) -> Result<(), DBError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DBError::SQLError(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn run_hook(&self, tables: &mut Tables) {
        if let Some(hook) = self.before_guarded_delete.lock().take() {
            hook(tables);
        }
    }

    fn injected(&self, step: CascadeStep) -> Result<(), DBError> {
        let mut fail_at = self.fail_cascade_at.lock();
        if *fail_at == Some(step) {
            *fail_at = None;
            return Err(DBError::SQLError(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn validate_sensor(
        tables: &Tables,
        sensor_id: Option<i32>,
        hive_id: Option<i32>,
        mac: Option<&String>,
    ) -> Result<(), DBError> {
        if let Some(hive_id) = hive_id {
            if !tables.hives.contains_key(&hive_id) {
                return Err(foreign_key("sensores_colmena_id_fkey"));
            }
        }
        if let Some(mac) = mac {
            if tables
                .sensors
                .values()
                .any(|s| Some(s.id) != sensor_id && s.mac_address.as_ref() == Some(mac))
            {
                return Err(unique("sensores_mac_address_key"));
            }
        }
        Ok(())
    }

    fn validate_user(
        tables: &Tables,
        user_id: Option<i32>,
        email: &str,
        role_id: Option<i32>,
    ) -> Result<(), DBError> {
        if tables
            .users
            .values()
            .any(|u| Some(u.user.id) != user_id && u.user.correo_electronico == email)
        {
            return Err(unique("usuarios_correo_electronico_key"));
        }
        if let Some(role_id) = role_id {
            if !tables.roles.contains_key(&role_id) {
                return Err(foreign_key("usuarios_rol_id_fkey"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryStore {
    async fn ping(&self) -> Result<(), DBError> {
        self.check()
    }

    async fn list_apiaries(&self, search: Option<&str>) -> Result<Vec<Apiary>, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        let needle = search.map(str::to_lowercase);
        let mut apiaries: Vec<Apiary> = tables
            .apiaries
            .values()
            .filter(|a| match &needle {
                Some(needle) => a.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        apiaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(apiaries)
    }

    async fn get_apiary(&self, apiary_id: i32) -> Result<Option<Apiary>, DBError> {
        self.check()?;
        Ok(self.tables.lock().apiaries.get(&apiary_id).cloned())
    }

    async fn apiary_exists(&self, apiary_id: i32) -> Result<bool, DBError> {
        self.check()?;
        Ok(self.tables.lock().apiaries.contains_key(&apiary_id))
    }

    async fn insert_apiary(&self, apiary: &NewApiary) -> Result<Apiary, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        if tables.apiaries.values().any(|a| a.name == apiary.name) {
            return Err(unique("apiarios_nombre_key"));
        }
        let id = tables.next_id();
        let row = Apiary {
            id,
            name: apiary.name.clone(),
            location: apiary.location.clone(),
            description: apiary.description.clone(),
            created_at: Utc::now(),
        };
        tables.apiaries.insert(id, row.clone());
        Ok(row)
    }

    async fn update_apiary(
        &self,
        apiary_id: i32,
        patch: &ApiaryPatch,
    ) -> Result<Option<Apiary>, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        if let Some(name) = &patch.name {
            if tables
                .apiaries
                .values()
                .any(|a| a.id != apiary_id && &a.name == name)
            {
                return Err(unique("apiarios_nombre_key"));
            }
        }
        let Some(row) = tables.apiaries.get_mut(&apiary_id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(location) = &patch.location {
            row.location = location.clone();
        }
        if let Some(description) = &patch.description {
            row.description = description.clone();
        }
        Ok(Some(row.clone()))
    }

    async fn count_apiary_hives(&self, apiary_id: i32) -> Result<i64, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables
            .hives
            .values()
            .filter(|h| h.apiary_id == apiary_id)
            .count() as i64)
    }

    async fn delete_apiary(&self, apiary_id: i32) -> Result<u64, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        self.run_hook(&mut tables);
        if tables.hives.values().any(|h| h.apiary_id == apiary_id) {
            return Ok(0);
        }
        Ok(tables.apiaries.remove(&apiary_id).map_or(0, |_| 1))
    }

    async fn list_hives(&self) -> Result<Vec<Hive>, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables
            .hives
            .keys()
            .rev()
            .filter_map(|id| tables.hive(*id))
            .collect())
    }

    async fn get_hive(&self, hive_id: i32) -> Result<Option<Hive>, DBError> {
        self.check()?;
        Ok(self.tables.lock().hive(hive_id))
    }

    async fn hive_exists(&self, hive_id: i32) -> Result<bool, DBError> {
        self.check()?;
        Ok(self.tables.lock().hives.contains_key(&hive_id))
    }

    async fn insert_hive(&self, hive: &NewHive) -> Result<Hive, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        if !tables.apiaries.contains_key(&hive.apiary_id) {
            return Err(foreign_key("colmenas_apiario_id_fkey"));
        }
        if tables.hives.values().any(|h| h.name == hive.name) {
            return Err(unique("colmenas_nombre_key"));
        }
        let id = tables.next_id();
        tables.hives.insert(
            id,
            HiveRow {
                apiary_id: hive.apiary_id,
                name: hive.name.clone(),
                description: hive.description.clone(),
                created_at: Utc::now(),
            },
        );
        tables
            .hive(id)
            .ok_or(DBError::SQLError(sqlx::Error::RowNotFound))
    }

    async fn update_hive(&self, hive_id: i32, patch: &HivePatch) -> Result<Option<Hive>, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        if let Some(apiary_id) = patch.apiary_id {
            if !tables.apiaries.contains_key(&apiary_id) {
                return Err(foreign_key("colmenas_apiario_id_fkey"));
            }
        }
        if let Some(name) = &patch.name {
            if tables
                .hives
                .iter()
                .any(|(id, h)| *id != hive_id && &h.name == name)
            {
                return Err(unique("colmenas_nombre_key"));
            }
        }
        let Some(row) = tables.hives.get_mut(&hive_id) else {
            return Ok(None);
        };
        if let Some(apiary_id) = patch.apiary_id {
            row.apiary_id = apiary_id;
        }
        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(description) = &patch.description {
            row.description = description.clone();
        }
        Ok(tables.hive(hive_id))
    }

    async fn hive_dependencies(&self, hive_id: i32) -> Result<HiveDependencies, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        let sensors = tables.sensor_ids_of(hive_id);
        Ok(HiveDependencies {
            sensores: sensors.len() as i64,
            lecturas: tables.readings_of(&sensors).len() as i64,
        })
    }

    async fn delete_hive(&self, hive_id: i32) -> Result<u64, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        self.run_hook(&mut tables);
        if !tables.sensor_ids_of(hive_id).is_empty() {
            return Ok(0);
        }
        Ok(tables.hives.remove(&hive_id).map_or(0, |_| 1))
    }

    async fn delete_hive_cascade(&self, hive_id: i32) -> Result<Option<CascadeReport>, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        if !tables.hives.contains_key(&hive_id) {
            return Ok(None);
        }
        let mut staged = tables.clone();
        let sensors = staged.sensor_ids_of(hive_id);

        self.injected(CascadeStep::Readings)?;
        let readings = staged.readings_of(&sensors);
        for id in &readings {
            staged.readings.remove(id);
        }
        self.injected(CascadeStep::Sensors)?;
        for id in &sensors {
            staged.sensors.remove(id);
        }
        self.injected(CascadeStep::Hive)?;
        let hives = staged.hives.remove(&hive_id).map_or(0, |_| 1);
        self.injected(CascadeStep::Commit)?;

        *tables = staged;
        Ok(Some(CascadeReport {
            readings: readings.len() as u64,
            sensors: sensors.len() as u64,
            hives,
        }))
    }

    async fn list_sensors(&self, filter: &SensorFilter) -> Result<Vec<Sensor>, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        let mac = filter.mac.as_ref().map(|m| m.to_lowercase());
        Ok(tables
            .sensors
            .values()
            .filter(|s| filter.hive_id.map_or(true, |id| s.hive_id == Some(id)))
            .filter(|s| match &mac {
                Some(mac) => s
                    .mac_address
                    .as_ref()
                    .map_or(false, |m| m.to_lowercase().contains(mac.as_str())),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_sensor(&self, sensor_id: i32) -> Result<Option<Sensor>, DBError> {
        self.check()?;
        Ok(self.tables.lock().sensors.get(&sensor_id).cloned())
    }

    async fn sensor_exists(&self, sensor_id: i32) -> Result<bool, DBError> {
        self.check()?;
        Ok(self.tables.lock().sensors.contains_key(&sensor_id))
    }

    async fn insert_sensor(&self, sensor: &NewSensor) -> Result<Sensor, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        MemoryStore::validate_sensor(&tables, None, sensor.hive_id, sensor.mac_address.as_ref())?;
        let id = tables.next_id();
        let row = Sensor {
            id,
            hive_id: sensor.hive_id,
            kind: sensor.kind.clone(),
            mac_address: sensor.mac_address.clone(),
            state: sensor.state,
            installed_on: sensor.installed_on,
            last_reading_at: None,
        };
        tables.sensors.insert(id, row.clone());
        Ok(row)
    }

    async fn update_sensor(
        &self,
        sensor_id: i32,
        patch: &SensorPatch,
    ) -> Result<Option<Sensor>, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        MemoryStore::validate_sensor(
            &tables,
            Some(sensor_id),
            patch.hive_id.flatten(),
            patch.mac_address.as_ref().and_then(|m| m.as_ref()),
        )?;
        let Some(row) = tables.sensors.get_mut(&sensor_id) else {
            return Ok(None);
        };
        if let Some(hive_id) = patch.hive_id {
            row.hive_id = hive_id;
        }
        if let Some(kind) = &patch.kind {
            row.kind = kind.clone();
        }
        if let Some(mac) = &patch.mac_address {
            row.mac_address = mac.clone();
        }
        if let Some(state) = patch.state {
            row.state = state;
        }
        if let Some(installed_on) = patch.installed_on {
            row.installed_on = installed_on;
        }
        Ok(Some(row.clone()))
    }

    async fn count_sensor_readings(&self, sensor_id: i32) -> Result<i64, DBError> {
        self.check()?;
        Ok(self.tables.lock().readings_of(&[sensor_id]).len() as i64)
    }

    async fn delete_sensor(&self, sensor_id: i32) -> Result<u64, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        self.run_hook(&mut tables);
        if !tables.readings_of(&[sensor_id]).is_empty() {
            return Ok(0);
        }
        Ok(tables.sensors.remove(&sensor_id).map_or(0, |_| 1))
    }

    async fn delete_sensor_cascade(
        &self,
        sensor_id: i32,
    ) -> Result<Option<CascadeReport>, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        if !tables.sensors.contains_key(&sensor_id) {
            return Ok(None);
        }
        let mut staged = tables.clone();

        self.injected(CascadeStep::Readings)?;
        let readings = staged.readings_of(&[sensor_id]);
        for id in &readings {
            staged.readings.remove(id);
        }
        self.injected(CascadeStep::Sensors)?;
        let sensors = staged.sensors.remove(&sensor_id).map_or(0, |_| 1);
        self.injected(CascadeStep::Commit)?;

        *tables = staged;
        Ok(Some(CascadeReport {
            readings: readings.len() as u64,
            sensors,
            hives: 0,
        }))
    }

    async fn insert_reading(&self, reading: &NewReading) -> Result<Reading, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        if !tables.sensors.contains_key(&reading.sensor_id) {
            return Err(foreign_key("lecturas_ambientales_sensor_id_fkey"));
        }
        let id = tables.next_id();
        let row = Reading {
            id,
            sensor_id: reading.sensor_id,
            temperature: reading.temperature,
            humidity: reading.humidity,
            weight: reading.weight,
            sound: reading.sound,
            rain: reading.rain,
            recorded_at: Utc::now(),
        };
        if let Some(sensor) = tables.sensors.get_mut(&reading.sensor_id) {
            sensor.last_reading_at = Some(row.recorded_at);
        }
        tables.readings.insert(id, row.clone());
        Ok(row)
    }

    async fn latest_hive_readings(&self, hive_id: i32, limit: i64) -> Result<Vec<Reading>, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        let sensors = tables.sensor_ids_of(hive_id);
        let mut readings: Vec<Reading> = tables
            .readings
            .values()
            .filter(|r| sensors.contains(&r.sensor_id))
            .cloned()
            .collect();
        readings.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        readings.truncate(limit.max(0) as usize);
        Ok(readings)
    }

    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        let needle = email.map(str::to_lowercase);
        Ok(tables
            .users
            .values()
            .filter(|u| match &needle {
                Some(needle) => u.user.correo_electronico.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .map(|u| tables.user(u))
            .collect())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables
            .users
            .values()
            .find(|u| u.user.correo_electronico == email)
            .map(|u| tables.user(u)))
    }

    async fn active_credentials(
        &self,
        email: &str,
    ) -> Result<Option<(User, Option<String>)>, DBError> {
        self.check()?;
        let tables = self.tables.lock();
        Ok(tables
            .users
            .values()
            .find(|u| u.user.correo_electronico == email && u.user.esta_activo)
            .map(|u| (tables.user(u), u.password.clone())))
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        MemoryStore::validate_user(&tables, None, &user.email, user.role_id)?;
        let id = tables.next_id();
        let row = UserRow {
            user: User {
                id,
                nombre: user.first_name.clone(),
                apellido_paterno: user.last_name.clone(),
                apellido_materno: user.second_last_name.clone(),
                correo_electronico: user.email.clone(),
                push_token: user.push_token.clone(),
                rol_id: user.role_id,
                nombre_rol: None,
                esta_activo: user.active,
                fecha_creacion: Utc::now(),
            },
            password: user.password.clone(),
        };
        let created = tables.user(&row);
        tables.users.insert(id, row);
        Ok(created)
    }

    async fn update_user(&self, user_id: i32, patch: &UserPatch) -> Result<Option<User>, DBError> {
        self.check()?;
        let mut tables = self.tables.lock();
        let Some(current) = tables.users.get(&user_id).cloned() else {
            return Ok(None);
        };
        let email = patch
            .email
            .clone()
            .unwrap_or_else(|| current.user.correo_electronico.clone());
        MemoryStore::validate_user(&tables, Some(user_id), &email, patch.role_id.flatten())?;

        let mut row = current;
        if let Some(value) = &patch.first_name {
            row.user.nombre = value.clone();
        }
        if let Some(value) = &patch.last_name {
            row.user.apellido_paterno = value.clone();
        }
        if let Some(value) = &patch.second_last_name {
            row.user.apellido_materno = value.clone();
        }
        row.user.correo_electronico = email;
        if let Some(value) = &patch.password {
            row.password = value.clone();
        }
        if let Some(value) = &patch.push_token {
            row.user.push_token = value.clone();
        }
        if let Some(value) = patch.role_id {
            row.user.rol_id = value;
        }
        if let Some(value) = patch.active {
            row.user.esta_activo = value;
        }
        let updated = tables.user(&row);
        tables.users.insert(user_id, row);
        Ok(Some(updated))
    }

    async fn delete_user(&self, user_id: i32) -> Result<u64, DBError> {
        self.check()?;
        Ok(self.tables.lock().users.remove(&user_id).map_or(0, |_| 1))
    }

    async fn list_roles(&self) -> Result<Vec<Role>, DBError> {
        self.check()?;
        Ok(self.tables.lock().roles.values().cloned().collect())
    }

    async fn role_exists(&self, role_id: i32) -> Result<bool, DBError> {
        self.check()?;
        Ok(self.tables.lock().roles.contains_key(&role_id))
    }
}

/// Fixed report data, enough to exercise the report routes.
#[derive(Debug, Default)]
pub struct StubReports;

#[async_trait]
impl ReportStore for StubReports {
    async fn apiary_options(&self) -> Result<Vec<ApiaryOption>, DBError> {
        Ok(vec![ApiaryOption {
            id: 1,
            nombre: "Norte".to_owned(),
        }])
    }

    async fn hive_options(&self) -> Result<Vec<HiveOption>, DBError> {
        Ok(vec![HiveOption {
            id: 2,
            apiario_id: 1,
            nombre: "Norte-1".to_owned(),
        }])
    }

    async fn summary(&self, filter: &ReportFilter) -> Result<Summary, DBError> {
        Ok(Summary {
            activas: filter.hive_id.map_or(3, |_| 1),
            prom_peso: 41.5,
            variacion7d: 12.5,
            alertas: 1,
        })
    }

    async fn weight_series(&self, _filter: &ReportFilter) -> Result<Vec<WeightPoint>, DBError> {
        Ok(vec![WeightPoint {
            fecha: "2024-03-01 10:00".to_owned(),
            colmena: "Norte-1".to_owned(),
            peso: Some(41.5),
        }])
    }

    async fn climate_series(&self, _filter: &ReportFilter) -> Result<Vec<ClimatePoint>, DBError> {
        Ok(vec![ClimatePoint {
            fecha: "2024-03-01 10:00".to_owned(),
            temperatura: 34.5,
            humedad: Some(60.0),
        }])
    }

    async fn user_summary(&self) -> Result<UserSummary, DBError> {
        Ok(UserSummary {
            total: 2,
            activos: 1,
            inactivos: 1,
            por_rol: vec![RoleCount {
                rol: "apicultor".to_owned(),
                cantidad: 2,
            }],
        })
    }

    async fn user_growth(&self, _range: &DateRange) -> Result<Vec<MonthCount>, DBError> {
        Ok(vec![MonthCount {
            mes: "2024-03".to_owned(),
            altas: 2,
        }])
    }

    async fn user_listing(&self) -> Result<Vec<UserListing>, DBError> {
        Ok(Vec::new())
    }

    async fn hive_summary(&self) -> Result<HiveSummary, DBError> {
        Ok(HiveSummary {
            total: 3,
            con_sensor: 2,
            sin_sensor: 1,
            activas_7d: 1,
        })
    }

    async fn hives_per_apiary(&self) -> Result<Vec<ApiaryHiveCount>, DBError> {
        Ok(vec![ApiaryHiveCount {
            apiario: "Norte".to_owned(),
            colmenas: 3,
        }])
    }

    async fn admin_summary(&self) -> Result<AdminSummary, DBError> {
        Ok(AdminSummary {
            apiarios: 1,
            colmenas: 3,
            sensores: 2,
            lecturas_7d: 10,
        })
    }

    async fn top_activity(&self, _range: &DateRange) -> Result<Vec<ApiaryActivity>, DBError> {
        Ok(vec![ApiaryActivity {
            apiario: "Norte".to_owned(),
            lecturas: 10,
        }])
    }
}
