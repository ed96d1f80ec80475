//! Repository implementations cho SQLite
//!
//! Các hàm chỉ chạy một câu lệnh nhận bất kỳ `Executor` nào (pool hoặc connection
//! trong transaction). Các hàm chạy nhiều câu lệnh nhận `&mut SqliteConnection`
//! để có thể tham gia vào một unit of work.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::{DateTime, NaiveDate, Utc};
use discobase_core::{ArchiveSnapshot, Artist, CatalogEntry, EntryDetails, NewTransaction, TrxKind};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::str::FromStr;

// ============================================================================
// Lookup Repository
// ============================================================================

/// Repository cho các bảng tra cứu (countries, genres, labels, record_formats, artists)
pub struct LookupRepo;

impl LookupRepo {
    async fn get_or_create(
        conn: &mut SqliteConnection,
        table: &str,
        column: &str,
        value: &str,
    ) -> PersistenceResult<i64> {
        let insert = format!("INSERT OR IGNORE INTO {} ({}) VALUES (?)", table, column);
        sqlx::query(&insert).bind(value).execute(&mut *conn).await?;

        let select = format!("SELECT id FROM {} WHERE {} = ?", table, column);
        let row: (i64,) = sqlx::query_as(&select)
            .bind(value)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row.0)
    }

    /// Lấy hoặc tạo genre
    pub async fn genre_id(conn: &mut SqliteConnection, name: &str) -> PersistenceResult<i64> {
        Self::get_or_create(conn, "genres", "genre_name", name).await
    }

    /// Lấy hoặc tạo record format
    pub async fn format_id(conn: &mut SqliteConnection, name: &str) -> PersistenceResult<i64> {
        Self::get_or_create(conn, "record_formats", "format_name", name).await
    }

    /// Lấy hoặc tạo label
    pub async fn label_id(conn: &mut SqliteConnection, name: &str) -> PersistenceResult<i64> {
        Self::get_or_create(conn, "labels", "label_name", name).await
    }

    /// Lấy hoặc tạo country
    pub async fn country_id(conn: &mut SqliteConnection, name: &str) -> PersistenceResult<i64> {
        Self::get_or_create(conn, "countries", "country_name", name).await
    }

    /// Lấy hoặc tạo artist, unique theo (name, country)
    pub async fn artist_id(conn: &mut SqliteConnection, artist: &Artist) -> PersistenceResult<i64> {
        let country_id = Self::country_id(conn, &artist.country).await?;

        sqlx::query("INSERT OR IGNORE INTO artists (artist_name, country_id) VALUES (?, ?)")
            .bind(&artist.name)
            .bind(country_id)
            .execute(&mut *conn)
            .await?;

        let row: (i64,) =
            sqlx::query_as("SELECT id FROM artists WHERE artist_name = ? AND country_id = ?")
                .bind(&artist.name)
                .bind(country_id)
                .fetch_one(&mut *conn)
                .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Entry Repository
// ============================================================================

const SELECT_RECORD: &str = r#"
    SELECT r.id, r.title, r.year, f.format_name AS record_format, r.color, r.remarks,
           g.genre_name AS genre, r.purchase_date, r.price, r.is_digitized, r.credit_value,
           r.rating, r.review, r.discogs_id, r.created_at, r.updated_at
    FROM records r
    JOIN record_formats f ON f.id = r.record_format_id
    JOIN genres g ON g.id = r.genre_id
"#;

/// Repository cho records table và các bảng many-to-many
pub struct EntryRepo;

impl EntryRepo {
    /// Thêm record mới (chưa có relations), trả về ID
    pub async fn insert(
        conn: &mut SqliteConnection,
        details: &EntryDetails,
        now: DateTime<Utc>,
    ) -> PersistenceResult<i64> {
        let format_id = LookupRepo::format_id(conn, &details.record_format).await?;
        let genre_id = LookupRepo::genre_id(conn, &details.genre).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO records (title, year, record_format_id, color, remarks, genre_id,
                                 purchase_date, price, is_digitized, credit_value, rating,
                                 review, discogs_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&details.title)
        .bind(details.year)
        .bind(format_id)
        .bind(&details.color)
        .bind(&details.remarks)
        .bind(genre_id)
        .bind(details.purchase_date)
        .bind(details.price.to_string())
        .bind(details.is_digitized)
        .bind(details.credit_cost.value())
        .bind(details.rating.value())
        .bind(&details.review)
        .bind(details.discogs_id)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            PersistenceError::from_unique(
                e,
                &format!(
                    "record '{}' ({}, {}) already exists",
                    details.title, details.year, details.genre
                ),
            )
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Thay thế toàn bộ artists của record (giữ thứ tự)
    pub async fn set_artists(
        conn: &mut SqliteConnection,
        record_id: i64,
        artists: &[Artist],
    ) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM record_artists WHERE record_id = ?")
            .bind(record_id)
            .execute(&mut *conn)
            .await?;

        for (position, artist) in artists.iter().enumerate() {
            let artist_id = LookupRepo::artist_id(conn, artist).await?;
            sqlx::query(
                "INSERT OR IGNORE INTO record_artists (record_id, artist_id, position) VALUES (?, ?, ?)",
            )
            .bind(record_id)
            .bind(artist_id)
            .bind(position as i64)
            .execute(&mut *conn)
            .await?;
        }

        Self::touch(&mut *conn, record_id, Utc::now()).await
    }

    /// Thay thế toàn bộ labels của record (giữ thứ tự)
    pub async fn set_labels(
        conn: &mut SqliteConnection,
        record_id: i64,
        labels: &[String],
    ) -> PersistenceResult<()> {
        sqlx::query("DELETE FROM record_labels WHERE record_id = ?")
            .bind(record_id)
            .execute(&mut *conn)
            .await?;

        for (position, label) in labels.iter().enumerate() {
            let label_id = LookupRepo::label_id(conn, label).await?;
            sqlx::query(
                "INSERT OR IGNORE INTO record_labels (record_id, label_id, position) VALUES (?, ?, ?)",
            )
            .bind(record_id)
            .bind(label_id)
            .bind(position as i64)
            .execute(&mut *conn)
            .await?;
        }

        Self::touch(&mut *conn, record_id, Utc::now()).await
    }

    async fn touch<'e, E>(executor: E, record_id: i64, now: DateTime<Utc>) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query("UPDATE records SET updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(record_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Lấy record kèm artists và labels
    pub async fn get_by_id(conn: &mut SqliteConnection, id: i64) -> PersistenceResult<CatalogEntry> {
        let sql = format!("{} WHERE r.id = ?", SELECT_RECORD);
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Record", id))?;

        Self::with_relations(conn, row).await
    }

    /// Lấy tất cả records, sắp xếp theo ID
    pub async fn get_all(conn: &mut SqliteConnection) -> PersistenceResult<Vec<CatalogEntry>> {
        let sql = format!("{} ORDER BY r.id", SELECT_RECORD);
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .fetch_all(&mut *conn)
            .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(Self::with_relations(conn, row).await?);
        }
        Ok(entries)
    }

    async fn with_relations(
        conn: &mut SqliteConnection,
        row: RecordRow,
    ) -> PersistenceResult<CatalogEntry> {
        let artists = sqlx::query_as::<_, ArtistRow>(
            r#"
            SELECT a.artist_name, c.country_name
            FROM record_artists ra
            JOIN artists a ON a.id = ra.artist_id
            JOIN countries c ON c.id = a.country_id
            WHERE ra.record_id = ?
            ORDER BY ra.position
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(Artist::from)
        .collect();

        let labels = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT l.label_name
            FROM record_labels rl
            JOIN labels l ON l.id = rl.label_id
            WHERE rl.record_id = ?
            ORDER BY rl.position
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .map(|(name,)| name)
        .collect();

        row.into_entry(artists, labels)
    }

    /// Cập nhật các trường scalar (không ảnh hưởng ledger)
    pub async fn update_details(
        conn: &mut SqliteConnection,
        id: i64,
        details: &EntryDetails,
    ) -> PersistenceResult<()> {
        let format_id = LookupRepo::format_id(conn, &details.record_format).await?;
        let genre_id = LookupRepo::genre_id(conn, &details.genre).await?;

        let result = sqlx::query(
            r#"
            UPDATE records SET title = ?, year = ?, record_format_id = ?, color = ?, remarks = ?,
                               genre_id = ?, purchase_date = ?, price = ?, is_digitized = ?,
                               credit_value = ?, rating = ?, review = ?, discogs_id = ?,
                               updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&details.title)
        .bind(details.year)
        .bind(format_id)
        .bind(&details.color)
        .bind(&details.remarks)
        .bind(genre_id)
        .bind(details.purchase_date)
        .bind(details.price.to_string())
        .bind(details.is_digitized)
        .bind(details.credit_cost.value())
        .bind(details.rating.value())
        .bind(&details.review)
        .bind(details.discogs_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| PersistenceError::from_unique(e, &format!("record '{}'", details.title)))?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Record", id));
        }
        Ok(())
    }

    /// Xóa record. Transactions tham chiếu đến record sẽ có record_id = NULL.
    pub async fn delete<'e, E>(executor: E, id: i64) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Record", id));
        }
        Ok(())
    }

    /// ID của record kế tiếp (theo ID)
    pub async fn next_id<'e, E>(executor: E, id: i64) -> PersistenceResult<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM records WHERE id > ? ORDER BY id LIMIT 1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(row.map(|r| r.0))
    }

    /// ID của record trước đó (theo ID)
    pub async fn previous_id<'e, E>(executor: E, id: i64) -> PersistenceResult<Option<i64>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM records WHERE id < ? ORDER BY id DESC LIMIT 1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(row.map(|r| r.0))
    }

    /// Đếm records
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Transaction Repository
// ============================================================================

/// Bộ lọc khi liệt kê transactions
#[derive(Debug, Clone, Default)]
pub struct TrxFilter {
    /// Từ ngày (inclusive)
    pub from: Option<NaiveDate>,
    /// Đến ngày (inclusive)
    pub to: Option<NaiveDate>,
    pub kind: Option<TrxKind>,
    /// Mới nhất trước
    pub descending: bool,
}

impl TrxFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    pub fn to(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    pub fn kind(mut self, kind: TrxKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }
}

/// Repository cho transactions table.
///
/// Không có update/delete - ngoại trừ `update_label` cho trường denormalized.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Ghi transaction với balance đã được tính sẵn
    pub async fn insert<'e, E>(
        executor: E,
        trx: &NewTransaction,
        balance: i64,
        now: DateTime<Utc>,
    ) -> PersistenceResult<TransactionRow>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (trx_date, trx_type, trx_value, credit_saldo, record_id,
                                      record_string, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(trx.date)
        .bind(trx.kind.as_str())
        .bind(trx.delta)
        .bind(balance)
        .bind(trx.entry_ref)
        .bind(&trx.entry_label)
        .bind(now)
        .bind(now)
        .execute(executor)
        .await?;

        Ok(TransactionRow {
            id: result.last_insert_rowid(),
            trx_date: trx.date,
            trx_type: trx.kind.as_str().to_string(),
            trx_value: trx.delta,
            credit_saldo: balance,
            record_id: trx.entry_ref,
            record_string: trx.entry_label.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Transaction có ID lớn nhất
    pub async fn latest<'e, E>(executor: E) -> PersistenceResult<Option<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Transaction mới nhất (theo ID) của một loại
    pub async fn latest_of_kind<'e, E>(
        executor: E,
        kind: TrxKind,
    ) -> PersistenceResult<Option<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE trx_type = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(kind.as_str())
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Tất cả transactions theo thứ tự insert
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>("SELECT * FROM transactions ORDER BY id")
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    /// Lấy transactions theo filter, sắp xếp theo (trx_date, id)
    pub async fn list<'e, E>(executor: E, filter: &TrxFilter) -> PersistenceResult<Vec<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM transactions WHERE 1 = 1");
        if let Some(from) = filter.from {
            qb.push(" AND trx_date >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            qb.push(" AND trx_date <= ").push_bind(to);
        }
        if let Some(kind) = filter.kind {
            qb.push(" AND trx_type = ").push_bind(kind.as_str());
        }
        if filter.descending {
            qb.push(" ORDER BY trx_date DESC, id DESC");
        } else {
            qb.push(" ORDER BY trx_date ASC, id ASC");
        }

        let rows = qb
            .build_query_as::<TransactionRow>()
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    /// Purchase transaction mới nhất tham chiếu đến record
    pub async fn purchase_for_entry<'e, E>(
        executor: E,
        record_id: i64,
    ) -> PersistenceResult<Option<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions WHERE trx_type = 'Purchase' AND record_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(record_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Cập nhật record_string (trường duy nhất được phép sửa)
    pub async fn update_label<'e, E>(executor: E, id: i64, label: &str) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result =
            sqlx::query("UPDATE transactions SET record_string = ?, updated_at = ? WHERE id = ?")
                .bind(label)
                .bind(Utc::now())
                .bind(id)
                .execute(executor)
                .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Transaction", id));
        }
        Ok(())
    }

    /// Đếm transactions
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Archive Repository
// ============================================================================

/// Repository cho archive_snapshots table (chỉ insert và đọc)
pub struct ArchiveRepo;

impl ArchiveRepo {
    /// Lưu snapshot, trả về ID
    pub async fn insert<'e, E>(executor: E, snapshot: &ArchiveSnapshot) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO archive_snapshots (legacy_id, title, year, record_format, color, remarks,
                                           genre, artists, labels, purchase_date, price, rating,
                                           review, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(snapshot.legacy_id)
        .bind(&snapshot.title)
        .bind(snapshot.year)
        .bind(&snapshot.record_format)
        .bind(&snapshot.color)
        .bind(&snapshot.remarks)
        .bind(&snapshot.genre)
        .bind(&snapshot.artists)
        .bind(&snapshot.labels)
        .bind(snapshot.purchase_date)
        .bind(snapshot.price.to_string())
        .bind(snapshot.rating)
        .bind(&snapshot.review)
        .bind(snapshot.created_at)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Lấy tất cả snapshots theo thứ tự insert
    pub async fn get_all<'e, E>(executor: E) -> PersistenceResult<Vec<ArchiveSnapshot>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, ArchiveRow>("SELECT * FROM archive_snapshots ORDER BY id")
            .fetch_all(executor)
            .await?
            .into_iter()
            .map(ArchiveSnapshot::try_from)
            .collect()
    }

    /// Lấy snapshot theo ID của record gốc
    pub async fn get_by_legacy_id<'e, E>(
        executor: E,
        legacy_id: i64,
    ) -> PersistenceResult<Option<ArchiveSnapshot>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, ArchiveRow>(
            "SELECT * FROM archive_snapshots WHERE legacy_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(legacy_id)
        .fetch_optional(executor)
        .await?
        .map(ArchiveSnapshot::try_from)
        .transpose()
    }

    /// Đếm snapshots
    pub async fn count<'e, E>(executor: E) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM archive_snapshots")
            .fetch_one(executor)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Khởi tạo database connection pool.
///
/// Pool chỉ có một connection: SQLite chỉ có một writer, và `sqlite::memory:`
/// chỉ tồn tại trong connection đã tạo ra nó.
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Chạy migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Tạo database mới với schema
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn memory_pool() -> SqlitePool {
        init_database("sqlite::memory:").await.unwrap()
    }

    fn details(title: &str) -> EntryDetails {
        EntryDetails::new(title, 2022, NaiveDate::from_ymd_opt(1999, 1, 1).unwrap(), dec!(20))
            .with_genre("Metal of Death")
    }

    #[tokio::test]
    async fn test_lookup_get_or_create_is_idempotent() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let a = LookupRepo::genre_id(&mut conn, "Jazz").await.unwrap();
        let b = LookupRepo::genre_id(&mut conn, "Jazz").await.unwrap();
        let c = LookupRepo::genre_id(&mut conn, "Blues").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let artist = Artist::new("Raphmadon", "Switzerland");
        let x = LookupRepo::artist_id(&mut conn, &artist).await.unwrap();
        let y = LookupRepo::artist_id(&mut conn, &artist).await.unwrap();
        assert_eq!(x, y);
    }

    #[tokio::test]
    async fn test_country_code_is_optional() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let id = LookupRepo::country_id(&mut conn, "Switzerland").await.unwrap();
        let (code,): (Option<String>,) =
            sqlx::query_as("SELECT country_code FROM countries WHERE id = ?")
                .bind(id)
                .fetch_one(&mut *conn)
                .await
                .unwrap();
        assert_eq!(code, None);

        sqlx::query("UPDATE countries SET country_code = 'CH' WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await
            .unwrap();
        assert_eq!(LookupRepo::country_id(&mut conn, "Switzerland").await.unwrap(), id);
    }

    #[tokio::test]
    async fn test_entry_round_trip_with_relations() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let id = EntryRepo::insert(&mut conn, &details("Album of Blood"), Utc::now())
            .await
            .unwrap();
        EntryRepo::set_artists(
            &mut conn,
            id,
            &[
                Artist::new("Raphmadon", "Switzerland"),
                Artist::new("Gorgor", "Norway"),
            ],
        )
        .await
        .unwrap();
        EntryRepo::set_labels(&mut conn, id, &["Capsized Duck Records".to_string()])
            .await
            .unwrap();

        let entry = EntryRepo::get_by_id(&mut conn, id).await.unwrap();
        assert_eq!(entry.title(), "Album of Blood");
        assert_eq!(entry.details.genre, "Metal of Death");
        assert_eq!(entry.details.price, dec!(20));
        assert_eq!(entry.artists_str(), "Raphmadon / Gorgor");
        assert_eq!(entry.labels, vec!["Capsized Duck Records".to_string()]);
    }

    #[tokio::test]
    async fn test_entry_unique_title_year_genre() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        EntryRepo::insert(&mut conn, &details("Same"), Utc::now())
            .await
            .unwrap();
        let err = EntryRepo::insert(&mut conn, &details("Same"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_entry_navigation() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let a = EntryRepo::insert(&mut conn, &details("A"), Utc::now()).await.unwrap();
        let b = EntryRepo::insert(&mut conn, &details("B"), Utc::now()).await.unwrap();

        assert_eq!(EntryRepo::next_id(&mut *conn, a).await.unwrap(), Some(b));
        assert_eq!(EntryRepo::previous_id(&mut *conn, b).await.unwrap(), Some(a));
        assert_eq!(EntryRepo::previous_id(&mut *conn, a).await.unwrap(), None);
        assert_eq!(EntryRepo::count(&mut *conn).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_entry_nulls_transaction_reference() {
        let pool = memory_pool().await;
        let mut conn = pool.acquire().await.unwrap();

        let id = EntryRepo::insert(&mut conn, &details("Gone"), Utc::now())
            .await
            .unwrap();
        let date = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        let row = TransactionRepo::insert(&mut *conn, &NewTransaction::purchase(date, 1, id), -1, Utc::now())
            .await
            .unwrap();

        EntryRepo::delete(&mut *conn, id).await.unwrap();

        let all = TransactionRepo::get_all(&mut *conn).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, row.id);
        assert_eq!(all[0].record_id, None);

        let err = EntryRepo::delete(&mut *conn, id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_transaction_list_filter() {
        let pool = memory_pool().await;
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();

        TransactionRepo::insert(&pool, &NewTransaction::addition(d(10), 1), 1, Utc::now())
            .await
            .unwrap();
        TransactionRepo::insert(&pool, &NewTransaction::initial_load(d(1), 5), 6, Utc::now())
            .await
            .unwrap();
        TransactionRepo::insert(&pool, &NewTransaction::addition(d(20), 1), 7, Utc::now())
            .await
            .unwrap();

        let by_date = TransactionRepo::list(&pool, &TrxFilter::new()).await.unwrap();
        let dates: Vec<_> = by_date.iter().map(|r| r.trx_date).collect();
        assert_eq!(dates, vec![d(1), d(10), d(20)]);

        let additions = TransactionRepo::list(&pool, &TrxFilter::new().kind(TrxKind::Addition).descending())
            .await
            .unwrap();
        assert_eq!(additions.len(), 2);
        assert_eq!(additions[0].trx_date, d(20));

        let ranged = TransactionRepo::list(&pool, &TrxFilter::new().from(d(5)).to(d(15)))
            .await
            .unwrap();
        assert_eq!(ranged.len(), 1);

        let latest = TransactionRepo::latest(&pool).await.unwrap().unwrap();
        assert_eq!(latest.credit_saldo, 7);
        let latest_load = TransactionRepo::latest_of_kind(&pool, TrxKind::InitialLoad)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest_load.trx_value, 5);
    }

    #[tokio::test]
    async fn test_archive_insert_and_read() {
        let pool = memory_pool().await;
        let entry = CatalogEntry {
            id: 3,
            details: details("Album of Blood"),
            artists: vec![Artist::new("Raphmadon", "Switzerland")],
            labels: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        ArchiveRepo::insert(&pool, &ArchiveSnapshot::snapshot(&entry))
            .await
            .unwrap();

        let snapshot = ArchiveRepo::get_by_legacy_id(&pool, 3).await.unwrap().unwrap();
        assert_eq!(snapshot.title, "Album of Blood");
        assert_eq!(snapshot.artists, "Raphmadon");
        assert_eq!(ArchiveRepo::count(&pool).await.unwrap(), 1);
        assert!(ArchiveRepo::get_by_legacy_id(&pool, 99).await.unwrap().is_none());
    }
}
