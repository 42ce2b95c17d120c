use super::CountRecord;
use crate::error::DBError;
use abejanet_core::{NewUser, Role, User, UserPatch};
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

const USER_COLUMNS: &str = r#"u.id, u.nombre, u.apellido_paterno, u.apellido_materno,
    u.correo_electronico, u.push_token, u.rol_id, r.nombre AS nombre_rol,
    u.esta_activo, u.fecha_creacion"#;

#[derive(sqlx::FromRow, Debug)]
pub struct UserDao {
    pub(crate) id: i32,
    pub(crate) nombre: Option<String>,
    pub(crate) apellido_paterno: Option<String>,
    pub(crate) apellido_materno: Option<String>,
    pub(crate) correo_electronico: String,
    pub(crate) push_token: Option<String>,
    pub(crate) rol_id: Option<i32>,
    pub(crate) nombre_rol: Option<String>,
    pub(crate) esta_activo: bool,
    pub(crate) fecha_creacion: DateTime<Utc>,
}

impl From<UserDao> for User {
    fn from(val: UserDao) -> Self {
        User {
            id: val.id,
            nombre: val.nombre,
            apellido_paterno: val.apellido_paterno,
            apellido_materno: val.apellido_materno,
            correo_electronico: val.correo_electronico,
            push_token: val.push_token,
            rol_id: val.rol_id,
            nombre_rol: val.nombre_rol,
            esta_activo: val.esta_activo,
            fecha_creacion: val.fecha_creacion,
        }
    }
}

/// A user together with the stored password, only used by the login check.
#[derive(sqlx::FromRow, Debug)]
pub struct CredentialDao {
    #[sqlx(flatten)]
    pub(crate) user: UserDao,
    pub(crate) contrasena: Option<String>,
}

#[derive(sqlx::FromRow, Debug)]
pub struct RoleDao {
    pub(crate) id: i32,
    pub(crate) nombre: String,
}

impl From<RoleDao> for Role {
    fn from(val: RoleDao) -> Self {
        Role {
            id: val.id,
            nombre: val.nombre,
        }
    }
}

/// READ users with their role name, optionally filtered by an e-mail fragment
pub async fn read(conn: &sqlx::PgPool, email: Option<&str>) -> Result<Vec<UserDao>, DBError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT ");
    builder.push(USER_COLUMNS);
    builder.push(" FROM usuarios u LEFT JOIN roles r ON r.id = u.rol_id WHERE 1 = 1");
    if let Some(email) = email {
        builder.push(" AND u.correo_electronico ILIKE ");
        builder.push_bind(super::contains_pattern(email));
        builder.push(" ESCAPE '\\'");
    }
    builder.push(" ORDER BY u.id ASC");

    Ok(builder.build_query_as::<UserDao>().fetch_all(conn).await?)
}

pub async fn get_by_email(conn: &sqlx::PgPool, email: &str) -> Result<Option<UserDao>, DBError> {
    let stmt = format!(
        "SELECT {} FROM usuarios u LEFT JOIN roles r ON r.id = u.rol_id WHERE u.correo_electronico = $1",
        USER_COLUMNS
    );
    Ok(sqlx::query_as::<_, UserDao>(&stmt)
        .bind(email)
        .fetch_optional(conn)
        .await?)
}

/// Credentials of an active user
pub async fn active_credentials(
    conn: &sqlx::PgPool,
    email: &str,
) -> Result<Option<CredentialDao>, DBError> {
    let stmt = format!(
        r#"SELECT {}, u.contrasena FROM usuarios u LEFT JOIN roles r ON r.id = u.rol_id
            WHERE u.correo_electronico = $1 AND u.esta_activo = true"#,
        USER_COLUMNS
    );
    Ok(sqlx::query_as::<_, CredentialDao>(&stmt)
        .bind(email)
        .fetch_optional(conn)
        .await?)
}

pub async fn insert(conn: &sqlx::PgPool, user: &NewUser) -> Result<UserDao, DBError> {
    Ok(sql_stmnt!(
        UserDao,
        r#"WITH u AS (
                INSERT INTO usuarios
                    (nombre, apellido_paterno, apellido_materno, correo_electronico,
                     contrasena, push_token, rol_id, esta_activo)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *
            )
            SELECT u.id, u.nombre, u.apellido_paterno, u.apellido_materno,
                u.correo_electronico, u.push_token, u.rol_id, r.nombre AS nombre_rol,
                u.esta_activo, u.fecha_creacion
            FROM u LEFT JOIN roles r ON r.id = u.rol_id"#,
        &user.first_name,
        &user.last_name,
        &user.second_last_name,
        &user.email,
        &user.password,
        &user.push_token,
        user.role_id,
        user.active
    )
    .fetch_one(conn)
    .await?)
}

/// UPDATE only the columns present in the patch
pub async fn update(
    conn: &sqlx::PgPool,
    user_id: i32,
    patch: &UserPatch,
) -> Result<Option<UserDao>, DBError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("WITH u AS (UPDATE usuarios SET ");
    let mut columns = builder.separated(", ");
    if let Some(value) = &patch.first_name {
        columns.push("nombre = ");
        columns.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.last_name {
        columns.push("apellido_paterno = ");
        columns.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.second_last_name {
        columns.push("apellido_materno = ");
        columns.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.email {
        columns.push("correo_electronico = ");
        columns.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.password {
        columns.push("contrasena = ");
        columns.push_bind_unseparated(value.clone());
    }
    if let Some(value) = &patch.push_token {
        columns.push("push_token = ");
        columns.push_bind_unseparated(value.clone());
    }
    if let Some(value) = patch.role_id {
        columns.push("rol_id = ");
        columns.push_bind_unseparated(value);
    }
    if let Some(value) = patch.active {
        columns.push("esta_activo = ");
        columns.push_bind_unseparated(value);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING *) SELECT ");
    builder.push(USER_COLUMNS);
    builder.push(" FROM u LEFT JOIN roles r ON r.id = u.rol_id");

    Ok(builder
        .build_query_as::<UserDao>()
        .fetch_optional(conn)
        .await?)
}

pub async fn delete(conn: &sqlx::PgPool, user_id: i32) -> Result<u64, DBError> {
    let result = sql_stmnt!("DELETE FROM usuarios WHERE id = $1", user_id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

pub async fn read_roles(conn: &sqlx::PgPool) -> Result<Vec<RoleDao>, DBError> {
    Ok(sql_stmnt!(RoleDao, "SELECT id, nombre FROM roles ORDER BY id ASC")
        .fetch_all(conn)
        .await?)
}

pub async fn role_exists(conn: &sqlx::PgPool, role_id: i32) -> Result<bool, DBError> {
    let count = sql_stmnt!(
        CountRecord,
        "SELECT count(*) as count FROM roles WHERE id = $1",
        role_id
    )
    .fetch_one(conn)
    .await?;
    Ok(count.count() > 0)
}
