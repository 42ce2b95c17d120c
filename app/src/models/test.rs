//! Tests against a live Postgres, run with `cargo test -- --ignored` and
//! `DATABASE_URL` pointing at a scratch database.

use super::*;
use crate::store::{PgStore, Repository};
use abejanet_core::{
    ApiaryPatch, DateRange, HivePatch, NewApiary, NewHive, NewReading, NewSensor, ReportFilter,
    SensorFilter, SensorState,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;

async fn connect() -> PgPool {
    let config = Config::from_env().unwrap();
    let conn = establish_db_connection(&config).await.unwrap();
    run_migrations(&conn).await.unwrap();
    conn
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

async fn new_hive(conn: &PgPool) -> (i32, i32) {
    let apiary = apiary::insert(
        conn,
        &NewApiary {
            name: unique("Norte"),
            location: None,
            description: None,
        },
    )
    .await
    .unwrap();
    let hive = hive::insert(
        conn,
        &NewHive {
            apiary_id: apiary.id,
            name: unique("Norte-1"),
            description: None,
        },
    )
    .await
    .unwrap();
    (apiary.id, hive.id)
}

async fn new_sensor(conn: &PgPool, hive_id: i32) -> i32 {
    sensor::insert(
        conn,
        &NewSensor {
            hive_id: Some(hive_id),
            kind: "peso".to_owned(),
            mac_address: None,
            state: SensorState::Active,
            installed_on: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_reading(conn: &PgPool, sensor_id: i32) -> i32 {
    reading::insert(
        conn,
        &NewReading {
            sensor_id,
            temperature: 34.5,
            humidity: Some(60.0),
            weight: Some(41.5),
            sound: None,
            rain: Some(false),
        },
    )
    .await
    .unwrap()
    .id
}

#[test]
fn test_contains_pattern_escapes_wildcards() {
    assert_eq!("%norte%", contains_pattern("norte"));
    assert_eq!("%\\%%", contains_pattern("%"));
    assert_eq!("%a\\_b%", contains_pattern("a_b"));
    assert_eq!("%c:\\\\x%", contains_pattern("c:\\x"));
}

#[tokio::test]
#[ignore]
async fn test_db_connection() {
    let conn = connect().await;
    check_schema(&conn).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn crud_apiaries() {
    let conn = connect().await;
    let name = unique("Sur");

    // create
    let created = apiary::insert(
        &conn,
        &NewApiary {
            name: name.clone(),
            location: Some("Ladera".to_owned()),
            description: None,
        },
    )
    .await
    .unwrap();

    // read
    let found = apiary::read(&conn, Some(&name.to_uppercase())).await.unwrap();
    assert_eq!(1, found.len());
    let wildcard = name.replace('-', "_");
    assert!(apiary::read(&conn, Some(&wildcard)).await.unwrap().is_empty());

    // update
    let patch = ApiaryPatch {
        name: None,
        location: Some(None),
        description: Some(Some("Valle".to_owned())),
    };
    let updated = apiary::update(&conn, created.id, &patch).await.unwrap().unwrap();
    assert_eq!(None, updated.ubicacion);
    assert_eq!(Some("Valle".to_owned()), updated.descripcion);

    // duplicate
    let duplicate = apiary::insert(
        &conn,
        &NewApiary {
            name,
            location: None,
            description: None,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(DBError::UniqueViolation(_))));

    // delete
    assert_eq!(1, apiary::delete_unreferenced(&conn, created.id).await.unwrap());
    assert!(!apiary::exists(&conn, created.id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn crud_hives() {
    let conn = connect().await;
    let (apiary_id, hive_id) = new_hive(&conn).await;

    // read
    let hive = hive::get(&conn, hive_id).await.unwrap().unwrap();
    assert_eq!(apiary_id, hive.apiario_id);
    assert!(hive::read(&conn).await.unwrap().iter().any(|h| h.id == hive_id));

    // update
    let patch = HivePatch {
        apiary_id: None,
        name: None,
        description: Some(Some("Reina nueva".to_owned())),
    };
    let updated = hive::update(&conn, hive_id, &patch).await.unwrap().unwrap();
    assert_eq!(hive.apiario, updated.apiario);

    // dangling reference
    let orphan = hive::insert(
        &conn,
        &NewHive {
            apiary_id: -1,
            name: unique("Huérfana"),
            description: None,
        },
    )
    .await;
    assert!(matches!(orphan, Err(DBError::ForeignKeyViolation(_))));

    // guarded delete
    assert_eq!(1, apiary::count_hives(&conn, apiary_id).await.unwrap());
    assert_eq!(0, apiary::delete_unreferenced(&conn, apiary_id).await.unwrap());
    assert_eq!(1, hive::delete_unreferenced(&conn, hive_id).await.unwrap());
    assert_eq!(1, apiary::delete_unreferenced(&conn, apiary_id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn guarded_hive_delete_keeps_dependents() {
    let conn = connect().await;
    let (_, hive_id) = new_hive(&conn).await;
    let sensor_id = new_sensor(&conn, hive_id).await;
    new_reading(&conn, sensor_id).await;

    let deps = hive::dependencies(&conn, hive_id).await.unwrap();
    assert_eq!(1, deps.sensores);
    assert_eq!(1, deps.lecturas);

    assert_eq!(0, hive::delete_unreferenced(&conn, hive_id).await.unwrap());
    assert!(hive::exists(&conn, hive_id).await.unwrap());

    let store = PgStore::new(conn.clone());
    let report = store.delete_hive_cascade(hive_id).await.unwrap().unwrap();
    assert_eq!(1, report.readings);
    assert_eq!(1, report.sensors);
    assert_eq!(1, report.hives);
    assert!(!sensor::exists(&conn, sensor_id).await.unwrap());
    assert_eq!(None, store.delete_hive_cascade(hive_id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn reading_stamps_sensor() {
    let conn = connect().await;
    let (_, hive_id) = new_hive(&conn).await;
    let sensor_id = new_sensor(&conn, hive_id).await;

    new_reading(&conn, sensor_id).await;

    let sensor = sensor::get(&conn, sensor_id).await.unwrap().unwrap();
    assert!(sensor.ultima_lectura.is_some());
    let sensors = sensor::read(&conn, &SensorFilter::hive(hive_id)).await.unwrap();
    assert_eq!(1, sensors.len());
    let latest = reading::latest_for_hive(&conn, hive_id, 20).await.unwrap();
    assert_eq!(1, latest.len());
    assert_eq!(1, sensor::count_readings(&conn, sensor_id).await.unwrap());

    let store = PgStore::new(conn.clone());
    let report = store.delete_sensor_cascade(sensor_id).await.unwrap().unwrap();
    assert_eq!(1, report.readings);
    assert_eq!(1, hive::delete_unreferenced(&conn, hive_id).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn reports_cover_the_range() {
    let conn = connect().await;
    let (apiary_id, hive_id) = new_hive(&conn).await;
    let sensor_id = new_sensor(&conn, hive_id).await;
    new_reading(&conn, sensor_id).await;

    let today = Utc::now().date_naive();
    let filter = ReportFilter {
        range: DateRange::days(today - Duration::days(30), today).unwrap(),
        apiary_id: Some(apiary_id),
        hive_id: None,
    };

    let summary = report::summary(&conn, &filter).await.unwrap();
    assert_eq!(1, summary.activas);
    assert_eq!(41.5, summary.prom_peso);
    assert_eq!(0, summary.alertas);
    assert_eq!(1, report::weight_series(&conn, &filter).await.unwrap().len());
    assert_eq!(1, report::climate_series(&conn, &filter).await.unwrap().len());
    assert!(!report::top_activity(&conn, &filter.range).await.unwrap().is_empty());

    let store = PgStore::new(conn.clone());
    store.delete_hive_cascade(hive_id).await.unwrap();
}
