use sqlx::SqliteConnection;

use super::models::{Blanket, Horse, HorseWithBlankets};

/// List all horses, ordered by id.
pub async fn list_horses(conn: &mut SqliteConnection) -> Result<Vec<Horse>, sqlx::Error> {
    sqlx::query_as::<_, Horse>("SELECT id, name FROM horses ORDER BY id")
        .fetch_all(&mut *conn)
        .await
}

/// Get a single horse by id.
pub async fn get_horse(conn: &mut SqliteConnection, id: i64) -> Result<Option<Horse>, sqlx::Error> {
    sqlx::query_as::<_, Horse>("SELECT id, name FROM horses WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Get all blankets for a horse, ordered by id.
///
/// The ordering is what makes first-match blanket selection stable.
pub async fn list_blankets_for_horse(
    conn: &mut SqliteConnection,
    horse_id: i64,
) -> Result<Vec<Blanket>, sqlx::Error> {
    sqlx::query_as::<_, Blanket>(
        "SELECT id, horse_id, name, min_temp, max_temp
         FROM blankets
         WHERE horse_id = ?
         ORDER BY id",
    )
    .bind(horse_id)
    .fetch_all(&mut *conn)
    .await
}

/// List every horse with its blankets, both ordered by id.
pub async fn list_horses_with_blankets(
    conn: &mut SqliteConnection,
) -> Result<Vec<HorseWithBlankets>, sqlx::Error> {
    let horses = list_horses(conn).await?;
    let mut result = Vec::with_capacity(horses.len());
    for horse in horses {
        let blankets = list_blankets_for_horse(conn, horse.id).await?;
        result.push(HorseWithBlankets { horse, blankets });
    }
    Ok(result)
}

pub async fn insert_horse(conn: &mut SqliteConnection, name: &str) -> Result<Horse, sqlx::Error> {
    sqlx::query_as::<_, Horse>("INSERT INTO horses (name) VALUES (?) RETURNING id, name")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}

/// Delete a horse and its blankets. Returns false if the horse did not exist.
///
/// Blankets are removed explicitly so the cascade does not depend on the
/// connection having foreign keys enabled. Callers should run this inside a
/// transaction.
pub async fn delete_horse(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM blankets WHERE horse_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    let result = sqlx::query("DELETE FROM horses WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Parameters for inserting a new blanket.
pub struct InsertBlanketParams<'a> {
    pub horse_id: i64,
    pub name: &'a str,
    pub min_temp: i32,
    pub max_temp: i32,
}

pub async fn insert_blanket(
    conn: &mut SqliteConnection,
    params: InsertBlanketParams<'_>,
) -> Result<Blanket, sqlx::Error> {
    sqlx::query_as::<_, Blanket>(
        "INSERT INTO blankets (horse_id, name, min_temp, max_temp)
         VALUES (?, ?, ?, ?)
         RETURNING id, horse_id, name, min_temp, max_temp",
    )
    .bind(params.horse_id)
    .bind(params.name)
    .bind(params.min_temp)
    .bind(params.max_temp)
    .fetch_one(&mut *conn)
    .await
}

/// The configured home address, if one has been set.
pub async fn get_address(conn: &mut SqliteConnection) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT address FROM home_address LIMIT 1")
        .fetch_optional(&mut *conn)
        .await
}

/// Replace the configured home address. Callers should run this inside a
/// transaction so readers never observe the table empty.
pub async fn set_address(conn: &mut SqliteConnection, address: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM home_address")
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO home_address (address) VALUES (?)")
        .bind(address)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
