use crate::models::{EntryRow, FavoriteRow, UserRow};
use crate::Database;
use anyhow::Result;
use holocron_types::models::FavoriteTarget;
use rusqlite::Connection;

const FAVORITE_SELECT: &str = "SELECT f.id, f.user_id, f.character_id, c.name, f.planet_id, p.name
     FROM favorites f
     LEFT JOIN characters c ON f.character_id = c.id
     LEFT JOIN planets p ON f.planet_id = p.id";

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password_hash) VALUES (?1, ?2, ?3)",
                (username, email, password_hash),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, username, email, password_hash FROM users ORDER BY id")?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Id of any other user already holding this username or email. `exclude`
    /// skips the user being updated so self-collisions don't count.
    pub fn find_user_conflict(
        &self,
        username: &str,
        email: &str,
        exclude: Option<i64>,
    ) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id FROM users
                 WHERE (username = ?1 OR email = ?2) AND (?3 IS NULL OR id <> ?3)",
                rusqlite::params![username, email, exclude],
                |row| row.get(0),
            )
            .optional()
        })
    }

    /// A NULL password hash keeps the stored one.
    pub fn update_user(
        &self,
        id: i64,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users
                 SET username = ?1, email = ?2,
                     password_hash = COALESCE(?3, password_hash)
                 WHERE id = ?4",
                rusqlite::params![username, email, password_hash, id],
            )?;
            Ok(())
        })
    }

    pub fn delete_user(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    // -- Characters --

    pub fn create_character(&self, name: &str, description: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| insert_entry(conn, "characters", name, description))
    }

    pub fn get_character(&self, id: i64) -> Result<Option<EntryRow>> {
        self.with_conn(|conn| query_entry_by_id(conn, "characters", id))
    }

    pub fn list_characters(&self) -> Result<Vec<EntryRow>> {
        self.with_conn(|conn| query_entries(conn, "characters"))
    }

    pub fn update_character(&self, id: i64, name: &str, description: Option<&str>) -> Result<()> {
        self.with_conn(|conn| update_entry(conn, "characters", id, name, description))
    }

    pub fn delete_character(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| delete_entry(conn, "characters", id))
    }

    // -- Planets --

    pub fn create_planet(&self, name: &str, description: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| insert_entry(conn, "planets", name, description))
    }

    pub fn get_planet(&self, id: i64) -> Result<Option<EntryRow>> {
        self.with_conn(|conn| query_entry_by_id(conn, "planets", id))
    }

    pub fn list_planets(&self) -> Result<Vec<EntryRow>> {
        self.with_conn(|conn| query_entries(conn, "planets"))
    }

    pub fn update_planet(&self, id: i64, name: &str, description: Option<&str>) -> Result<()> {
        self.with_conn(|conn| update_entry(conn, "planets", id, name, description))
    }

    pub fn delete_planet(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| delete_entry(conn, "planets", id))
    }

    // -- Favorites --

    pub fn create_favorite(&self, user_id: i64, target: &FavoriteTarget) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO favorites (user_id, character_id, planet_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, target.character_id(), target.planet_id()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_favorite(&self, id: i64) -> Result<Option<FavoriteRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE f.id = ?1", FAVORITE_SELECT);
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_row([id], favorite_from_row).optional()
        })
    }

    pub fn favorites_for_user(&self, user_id: i64) -> Result<Vec<FavoriteRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE f.user_id = ?1 ORDER BY f.id", FAVORITE_SELECT);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], favorite_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Batch-fetch favorites for a set of user ids (embedding favorites in
    /// user listings without a query per user).
    pub fn favorites_for_users(&self, user_ids: &[i64]) -> Result<Vec<FavoriteRow>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=user_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "{} WHERE f.user_id IN ({}) ORDER BY f.id",
                FAVORITE_SELECT,
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = user_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), favorite_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Delete a favorite scoped to its owner. Returns false when no such
    /// favorite belongs to the user.
    pub fn delete_favorite(&self, user_id: i64, favorite_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "DELETE FROM favorites WHERE id = ?1 AND user_id = ?2",
                [favorite_id, user_id],
            )?;
            Ok(affected > 0)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, email, password_hash FROM users WHERE id = ?1")?;

    let row = stmt.query_row([id], user_from_row).optional()?;

    Ok(row)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
    })
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<EntryRow, rusqlite::Error> {
    Ok(EntryRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn favorite_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<FavoriteRow, rusqlite::Error> {
    Ok(FavoriteRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        character_id: row.get(2)?,
        character_name: row.get(3)?,
        planet_id: row.get(4)?,
        planet_name: row.get(5)?,
    })
}

// Characters and planets share one table shape; `table` is always a literal
// from the wrappers above, never caller input.

fn insert_entry(conn: &Connection, table: &str, name: &str, description: Option<&str>) -> Result<i64> {
    conn.execute(
        &format!("INSERT INTO {} (name, description) VALUES (?1, ?2)", table),
        rusqlite::params![name, description],
    )?;
    Ok(conn.last_insert_rowid())
}

fn query_entry_by_id(conn: &Connection, table: &str, id: i64) -> Result<Option<EntryRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, description FROM {} WHERE id = ?1",
        table
    ))?;

    let row = stmt.query_row([id], entry_from_row).optional()?;

    Ok(row)
}

fn query_entries(conn: &Connection, table: &str) -> Result<Vec<EntryRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, description FROM {} ORDER BY id",
        table
    ))?;
    let rows = stmt
        .query_map([], entry_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn update_entry(
    conn: &Connection,
    table: &str,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<()> {
    conn.execute(
        &format!(
            "UPDATE {} SET name = ?1, description = ?2 WHERE id = ?3",
            table
        ),
        rusqlite::params![name, description, id],
    )?;
    Ok(())
}

fn delete_entry(conn: &Connection, table: &str, id: i64) -> Result<()> {
    conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
    Ok(())
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
