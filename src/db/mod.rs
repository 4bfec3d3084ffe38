//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all application data. Every table is a
//! flat record collection keyed by an application-generated UUID string; the
//! per-record location list is a JSON text column.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            nama TEXT NOT NULL,
            role TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS opd (
            id TEXT PRIMARY KEY,
            nama TEXT NOT NULL,
            kode TEXT,
            alamat TEXT,
            jumlah_personil INTEGER NOT NULL DEFAULT 0,
            kategori TEXT NOT NULL DEFAULT 'OPD',
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS partisipasi (
            id TEXT PRIMARY KEY,
            email TEXT,
            nama_lengkap TEXT NOT NULL,
            nip TEXT,
            opd_id TEXT NOT NULL,
            alamat TEXT,
            nomor_whatsapp TEXT,
            jumlah_pohon INTEGER NOT NULL DEFAULT 0,
            jenis_pohon TEXT NOT NULL DEFAULT '',
            sumber_bibit TEXT,
            lokasi_tanam TEXT,
            titik_lokasi TEXT,
            bukti_url TEXT,
            lokasi_list TEXT,
            status TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id TEXT PRIMARY KEY,
            logo_url TEXT,
            hero_title TEXT NOT NULL,
            hero_subtitle TEXT NOT NULL,
            hero_image_url TEXT,
            tentang_title TEXT,
            tentang_content TEXT,
            tentang_visi TEXT,
            tentang_misi TEXT,
            berita_popup_interval INTEGER NOT NULL DEFAULT 5
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gallery (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            image_url TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS edukasi (
            id TEXT PRIMARY KEY,
            judul TEXT NOT NULL,
            konten TEXT NOT NULL,
            gambar_url TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agenda (
            id TEXT PRIMARY KEY,
            nama_kegiatan TEXT NOT NULL,
            hari TEXT NOT NULL,
            tanggal TEXT NOT NULL,
            lokasi_kecamatan TEXT NOT NULL,
            lokasi_desa TEXT NOT NULL,
            deskripsi TEXT,
            status TEXT NOT NULL DEFAULT 'upcoming',
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS berita (
            id TEXT PRIMARY KEY,
            judul TEXT NOT NULL,
            deskripsi_singkat TEXT NOT NULL,
            link_berita TEXT,
            isi_berita TEXT,
            gambar_url TEXT,
            gambar_type TEXT NOT NULL DEFAULT 'link',
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kontak_whatsapp (
            nomor_whatsapp TEXT NOT NULL,
            pesan_default TEXT,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_partisipasi_opd_id ON partisipasi(opd_id);
        CREATE INDEX IF NOT EXISTS idx_partisipasi_nama ON partisipasi(nama_lengkap);
        CREATE INDEX IF NOT EXISTS idx_opd_nama ON opd(nama);
        CREATE INDEX IF NOT EXISTS idx_agenda_status ON agenda(status);
        CREATE INDEX IF NOT EXISTS idx_agenda_tanggal ON agenda(tanggal);
        CREATE INDEX IF NOT EXISTS idx_berita_is_active ON berita(is_active);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
