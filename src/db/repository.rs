//! Database repository for CRUD operations.
//!
//! Every write generates the record id and timestamp here; partial updates
//! follow a read-merge-write pattern where unset request fields keep the
//! stored value.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    mirror_first, Agenda, Berita, CreateAgendaRequest, CreateBeritaRequest, CreateEdukasiRequest,
    CreateGalleryRequest, CreateOpdRequest, CreatePartisipasiRequest, Edukasi, GalleryItem,
    KontakWhatsapp, LokasiTanam, Opd, Partisipasi, Settings, UpdateAgendaRequest,
    UpdateBeritaRequest, UpdateEdukasiRequest, UpdateOpdRequest, UpdatePartisipasiRequest,
    UpdateSettingsRequest, User,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Find a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password, nama, role, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Find a user by id.
    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password, nama, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create a new user with an already-hashed password.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        nama: &str,
        role: &str,
    ) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, email, password, nama, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .bind(nama)
        .bind(role)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            email: email.to_string(),
            password: password_hash.to_string(),
            nama: nama.to_string(),
            role: role.to_string(),
            created_at: now,
        })
    }

    // ==================== OPD OPERATIONS ====================

    /// List all organizational units.
    pub async fn list_opd(&self) -> Result<Vec<Opd>, AppError> {
        let rows = sqlx::query(
            "SELECT id, nama, kode, alamat, jumlah_personil, kategori, created_at FROM opd ORDER BY nama",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(opd_from_row).collect())
    }

    /// Get an organizational unit by id.
    pub async fn get_opd(&self, id: &str) -> Result<Option<Opd>, AppError> {
        let row = sqlx::query(
            "SELECT id, nama, kode, alamat, jumlah_personil, kategori, created_at FROM opd WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(opd_from_row))
    }

    /// Find an organizational unit by its (nama, kategori) pair.
    pub async fn find_opd_by_nama_kategori(
        &self,
        nama: &str,
        kategori: &str,
    ) -> Result<Option<Opd>, AppError> {
        let row = sqlx::query(
            "SELECT id, nama, kode, alamat, jumlah_personil, kategori, created_at FROM opd WHERE nama = ? AND kategori = ?",
        )
        .bind(nama)
        .bind(kategori)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(opd_from_row))
    }

    /// Create a new organizational unit.
    pub async fn create_opd(&self, request: &CreateOpdRequest) -> Result<Opd, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let jumlah_personil = request.jumlah_personil.unwrap_or(0);
        let kategori = request.kategori.clone().unwrap_or_else(|| "OPD".to_string());

        sqlx::query(
            "INSERT INTO opd (id, nama, kode, alamat, jumlah_personil, kategori, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.nama)
        .bind(&request.kode)
        .bind(&request.alamat)
        .bind(jumlah_personil)
        .bind(&kategori)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Opd {
            id,
            nama: request.nama.clone(),
            kode: request.kode.clone(),
            alamat: request.alamat.clone(),
            jumlah_personil,
            kategori,
            created_at: now,
        })
    }

    /// Update an organizational unit; unset fields keep their stored value.
    pub async fn update_opd(&self, id: &str, request: &UpdateOpdRequest) -> Result<Opd, AppError> {
        let existing = self
            .get_opd(id)
            .await?
            .ok_or_else(|| AppError::NotFound("OPD not found".to_string()))?;

        let nama = request.nama.clone().unwrap_or(existing.nama);
        let kode = request.kode.clone().or(existing.kode);
        let alamat = request.alamat.clone().or(existing.alamat);
        let jumlah_personil = request.jumlah_personil.unwrap_or(existing.jumlah_personil);
        let kategori = request.kategori.clone().unwrap_or(existing.kategori);

        sqlx::query(
            "UPDATE opd SET nama = ?, kode = ?, alamat = ?, jumlah_personil = ?, kategori = ? WHERE id = ?",
        )
        .bind(&nama)
        .bind(&kode)
        .bind(&alamat)
        .bind(jumlah_personil)
        .bind(&kategori)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Opd {
            id: id.to_string(),
            nama,
            kode,
            alamat,
            jumlah_personil,
            kategori,
            created_at: existing.created_at,
        })
    }

    /// Delete an organizational unit.
    pub async fn delete_opd(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM opd WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("OPD not found".to_string()));
        }
        Ok(())
    }

    // ==================== PARTISIPASI OPERATIONS ====================

    /// List all participation records.
    pub async fn list_partisipasi(&self) -> Result<Vec<Partisipasi>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, email, nama_lengkap, nip, opd_id, alamat, nomor_whatsapp,
                      jumlah_pohon, jenis_pohon, sumber_bibit, lokasi_tanam, titik_lokasi,
                      bukti_url, lokasi_list, status, created_at
               FROM partisipasi ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(partisipasi_from_row).collect())
    }

    /// Get a participation record by id.
    pub async fn get_partisipasi(&self, id: &str) -> Result<Option<Partisipasi>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, email, nama_lengkap, nip, opd_id, alamat, nomor_whatsapp,
                      jumlah_pohon, jenis_pohon, sumber_bibit, lokasi_tanam, titik_lokasi,
                      bukti_url, lokasi_list, status, created_at
               FROM partisipasi WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(partisipasi_from_row))
    }

    /// Insert a fully-assembled participation record.
    pub async fn insert_partisipasi(&self, record: &Partisipasi) -> Result<(), AppError> {
        let lokasi_json = serde_json::to_string(&record.lokasi_list).unwrap_or_default();

        sqlx::query(
            r#"INSERT INTO partisipasi (
                id, email, nama_lengkap, nip, opd_id, alamat, nomor_whatsapp,
                jumlah_pohon, jenis_pohon, sumber_bibit, lokasi_tanam, titik_lokasi,
                bukti_url, lokasi_list, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.nama_lengkap)
        .bind(&record.nip)
        .bind(&record.opd_id)
        .bind(&record.alamat)
        .bind(&record.nomor_whatsapp)
        .bind(record.jumlah_pohon)
        .bind(&record.jenis_pohon)
        .bind(&record.sumber_bibit)
        .bind(&record.lokasi_tanam)
        .bind(&record.titik_lokasi)
        .bind(&record.bukti_url)
        .bind(&lokasi_json)
        .bind(&record.status)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Create a participation record from a submission. The location list is
    /// normalized and its first element mirrored into the legacy fields.
    pub async fn create_partisipasi(
        &self,
        request: &CreatePartisipasiRequest,
    ) -> Result<Partisipasi, AppError> {
        let lokasi_list = request.resolve_lokasi();
        let (lokasi_tanam, titik_lokasi, bukti_url) = mirror_first(&lokasi_list);

        let record = Partisipasi {
            id: uuid::Uuid::new_v4().to_string(),
            email: request.email.clone().filter(|e| !e.is_empty()),
            nama_lengkap: request.nama_lengkap.clone(),
            nip: request.nip.clone(),
            opd_id: request.opd_id.clone(),
            opd_nama: None,
            alamat: request.alamat.clone(),
            nomor_whatsapp: request.nomor_whatsapp.clone(),
            jumlah_pohon: request.jumlah_pohon,
            jenis_pohon: request.jenis_pohon.clone(),
            sumber_bibit: Some(request.sumber_bibit.clone()),
            lokasi_tanam,
            titik_lokasi,
            bukti_url,
            lokasi_list,
            status: Some("pending".to_string()),
            created_at: Utc::now().to_rfc3339(),
        };

        self.insert_partisipasi(&record).await?;
        Ok(record)
    }

    /// Update a participation record; unset fields keep their stored value.
    /// A supplied `lokasi_list` recomputes the legacy single-location mirror.
    pub async fn update_partisipasi(
        &self,
        id: &str,
        request: &UpdatePartisipasiRequest,
    ) -> Result<Partisipasi, AppError> {
        let existing = self
            .get_partisipasi(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Participation record not found".to_string()))?;

        let lokasi_list = request
            .lokasi_list
            .clone()
            .unwrap_or_else(|| existing.lokasi_list.clone());

        // The legacy triple is a projection of the list; when the list changes
        // it wins over any individually supplied legacy field.
        let (lokasi_tanam, titik_lokasi, bukti_url) = if request.lokasi_list.is_some() {
            mirror_first(&lokasi_list)
        } else {
            (
                request.lokasi_tanam.clone().or(existing.lokasi_tanam),
                request.titik_lokasi.clone().or(existing.titik_lokasi),
                request.bukti_url.clone().or(existing.bukti_url),
            )
        };

        let updated = Partisipasi {
            id: id.to_string(),
            email: request.email.clone().or(existing.email),
            nama_lengkap: request.nama_lengkap.clone().unwrap_or(existing.nama_lengkap),
            nip: request.nip.clone().or(existing.nip),
            opd_id: request.opd_id.clone().unwrap_or(existing.opd_id),
            opd_nama: None,
            alamat: request.alamat.clone().or(existing.alamat),
            nomor_whatsapp: request.nomor_whatsapp.clone().or(existing.nomor_whatsapp),
            jumlah_pohon: request.jumlah_pohon.unwrap_or(existing.jumlah_pohon),
            jenis_pohon: request.jenis_pohon.clone().unwrap_or(existing.jenis_pohon),
            sumber_bibit: request.sumber_bibit.clone().or(existing.sumber_bibit),
            lokasi_tanam,
            titik_lokasi,
            bukti_url,
            lokasi_list,
            status: request.status.clone().or(existing.status),
            created_at: existing.created_at,
        };

        let lokasi_json = serde_json::to_string(&updated.lokasi_list).unwrap_or_default();

        sqlx::query(
            r#"UPDATE partisipasi SET
                email = ?, nama_lengkap = ?, nip = ?, opd_id = ?, alamat = ?,
                nomor_whatsapp = ?, jumlah_pohon = ?, jenis_pohon = ?, sumber_bibit = ?,
                lokasi_tanam = ?, titik_lokasi = ?, bukti_url = ?, lokasi_list = ?, status = ?
            WHERE id = ?"#,
        )
        .bind(&updated.email)
        .bind(&updated.nama_lengkap)
        .bind(&updated.nip)
        .bind(&updated.opd_id)
        .bind(&updated.alamat)
        .bind(&updated.nomor_whatsapp)
        .bind(updated.jumlah_pohon)
        .bind(&updated.jenis_pohon)
        .bind(&updated.sumber_bibit)
        .bind(&updated.lokasi_tanam)
        .bind(&updated.titik_lokasi)
        .bind(&updated.bukti_url)
        .bind(&lokasi_json)
        .bind(&updated.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Apply a duplicate merge to the primary record: new tree total, the
    /// concatenated location list, and the recomputed legacy mirror.
    pub async fn apply_merge(
        &self,
        id: &str,
        jumlah_pohon: i64,
        lokasi_list: &[LokasiTanam],
    ) -> Result<(), AppError> {
        let (lokasi_tanam, titik_lokasi, bukti_url) = mirror_first(lokasi_list);
        let lokasi_json = serde_json::to_string(lokasi_list).unwrap_or_default();

        sqlx::query(
            r#"UPDATE partisipasi SET
                jumlah_pohon = ?, lokasi_list = ?, lokasi_tanam = ?, titik_lokasi = ?, bukti_url = ?
            WHERE id = ?"#,
        )
        .bind(jumlah_pohon)
        .bind(&lokasi_json)
        .bind(&lokasi_tanam)
        .bind(&titik_lokasi)
        .bind(&bukti_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a participation record.
    pub async fn delete_partisipasi(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM partisipasi WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Participation record not found".to_string(),
            ));
        }
        Ok(())
    }

    /// Delete a participation record if it exists; returns whether a row was
    /// removed. Used by bulk cleanup, where missing ids are not an error.
    pub async fn delete_partisipasi_if_exists(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM partisipasi WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== SETTINGS OPERATIONS ====================

    /// Get the settings singleton, if it exists.
    pub async fn get_settings(&self) -> Result<Option<Settings>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, logo_url, hero_title, hero_subtitle, hero_image_url,
                      tentang_title, tentang_content, tentang_visi, tentang_misi,
                      berita_popup_interval
               FROM settings LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(settings_from_row))
    }

    /// Get the settings singleton, creating it with program defaults on first
    /// read. The insert is guarded so concurrent first reads cannot create a
    /// second row.
    pub async fn ensure_settings(&self) -> Result<Settings, AppError> {
        if let Some(settings) = self.get_settings().await? {
            return Ok(settings);
        }

        let defaults = Settings::with_defaults(uuid::Uuid::new_v4().to_string());
        sqlx::query(
            r#"INSERT INTO settings (
                id, logo_url, hero_title, hero_subtitle, hero_image_url,
                tentang_title, tentang_content, tentang_visi, tentang_misi,
                berita_popup_interval
            )
            SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM settings)"#,
        )
        .bind(&defaults.id)
        .bind(&defaults.logo_url)
        .bind(&defaults.hero_title)
        .bind(&defaults.hero_subtitle)
        .bind(&defaults.hero_image_url)
        .bind(&defaults.tentang_title)
        .bind(&defaults.tentang_content)
        .bind(&defaults.tentang_visi)
        .bind(&defaults.tentang_misi)
        .bind(defaults.berita_popup_interval)
        .execute(&self.pool)
        .await?;

        self.get_settings()
            .await?
            .ok_or_else(|| AppError::Internal("Settings singleton missing after insert".to_string()))
    }

    /// Update the settings singleton; unset fields keep their stored value.
    /// Creates the singleton from the overlay plus defaults when absent.
    pub async fn update_settings(
        &self,
        request: &UpdateSettingsRequest,
    ) -> Result<Settings, AppError> {
        let existing = self.ensure_settings().await?;

        let updated = Settings {
            id: existing.id.clone(),
            logo_url: request.logo_url.clone().or(existing.logo_url),
            hero_title: request.hero_title.clone().unwrap_or(existing.hero_title),
            hero_subtitle: request
                .hero_subtitle
                .clone()
                .unwrap_or(existing.hero_subtitle),
            hero_image_url: request.hero_image_url.clone().or(existing.hero_image_url),
            tentang_title: request.tentang_title.clone().or(existing.tentang_title),
            tentang_content: request.tentang_content.clone().or(existing.tentang_content),
            tentang_visi: request.tentang_visi.clone().or(existing.tentang_visi),
            tentang_misi: request.tentang_misi.clone().or(existing.tentang_misi),
            berita_popup_interval: request
                .berita_popup_interval
                .unwrap_or(existing.berita_popup_interval),
        };

        sqlx::query(
            r#"UPDATE settings SET
                logo_url = ?, hero_title = ?, hero_subtitle = ?, hero_image_url = ?,
                tentang_title = ?, tentang_content = ?, tentang_visi = ?, tentang_misi = ?,
                berita_popup_interval = ?
            WHERE id = ?"#,
        )
        .bind(&updated.logo_url)
        .bind(&updated.hero_title)
        .bind(&updated.hero_subtitle)
        .bind(&updated.hero_image_url)
        .bind(&updated.tentang_title)
        .bind(&updated.tentang_content)
        .bind(&updated.tentang_visi)
        .bind(&updated.tentang_misi)
        .bind(updated.berita_popup_interval)
        .bind(&updated.id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Store the uploaded logo on the settings singleton.
    pub async fn set_logo(&self, logo_url: &str) -> Result<(), AppError> {
        let settings = self.ensure_settings().await?;

        sqlx::query("UPDATE settings SET logo_url = ? WHERE id = ?")
            .bind(logo_url)
            .bind(&settings.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ==================== GALLERY OPERATIONS ====================

    /// List all gallery items.
    pub async fn list_gallery(&self) -> Result<Vec<GalleryItem>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, image_url, description, created_at FROM gallery ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(gallery_from_row).collect())
    }

    /// Create a new gallery item.
    pub async fn create_gallery(
        &self,
        request: &CreateGalleryRequest,
    ) -> Result<GalleryItem, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO gallery (id, title, image_url, description, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.title)
        .bind(&request.image_url)
        .bind(&request.description)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(GalleryItem {
            id,
            title: request.title.clone(),
            image_url: request.image_url.clone(),
            description: request.description.clone(),
            created_at: now,
        })
    }

    /// Delete a gallery item.
    pub async fn delete_gallery(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM gallery WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Gallery item not found".to_string()));
        }
        Ok(())
    }

    // ==================== EDUKASI OPERATIONS ====================

    /// List all educational posts.
    pub async fn list_edukasi(&self) -> Result<Vec<Edukasi>, AppError> {
        let rows = sqlx::query(
            "SELECT id, judul, konten, gambar_url, created_at FROM edukasi ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(edukasi_from_row).collect())
    }

    /// Create a new educational post.
    pub async fn create_edukasi(
        &self,
        request: &CreateEdukasiRequest,
    ) -> Result<Edukasi, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO edukasi (id, judul, konten, gambar_url, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.judul)
        .bind(&request.konten)
        .bind(&request.gambar_url)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Edukasi {
            id,
            judul: request.judul.clone(),
            konten: request.konten.clone(),
            gambar_url: request.gambar_url.clone(),
            created_at: now,
        })
    }

    /// Update an educational post; unset fields keep their stored value.
    pub async fn update_edukasi(
        &self,
        id: &str,
        request: &UpdateEdukasiRequest,
    ) -> Result<Edukasi, AppError> {
        let existing = self
            .get_edukasi(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Educational post not found".to_string()))?;

        let judul = request.judul.clone().unwrap_or(existing.judul);
        let konten = request.konten.clone().unwrap_or(existing.konten);
        let gambar_url = request.gambar_url.clone().or(existing.gambar_url);

        sqlx::query("UPDATE edukasi SET judul = ?, konten = ?, gambar_url = ? WHERE id = ?")
            .bind(&judul)
            .bind(&konten)
            .bind(&gambar_url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Edukasi {
            id: id.to_string(),
            judul,
            konten,
            gambar_url,
            created_at: existing.created_at,
        })
    }

    async fn get_edukasi(&self, id: &str) -> Result<Option<Edukasi>, AppError> {
        let row =
            sqlx::query("SELECT id, judul, konten, gambar_url, created_at FROM edukasi WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.as_ref().map(edukasi_from_row))
    }

    /// Delete an educational post.
    pub async fn delete_edukasi(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM edukasi WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Educational post not found".to_string()));
        }
        Ok(())
    }

    // ==================== AGENDA OPERATIONS ====================

    /// List all agenda items ordered by date.
    pub async fn list_agenda(&self) -> Result<Vec<Agenda>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, nama_kegiatan, hari, tanggal, lokasi_kecamatan, lokasi_desa,
                      deskripsi, status, created_at
               FROM agenda ORDER BY tanggal"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(agenda_from_row).collect())
    }

    /// List upcoming or ongoing agenda items (first ten, by date).
    pub async fn list_upcoming_agenda(&self) -> Result<Vec<Agenda>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, nama_kegiatan, hari, tanggal, lokasi_kecamatan, lokasi_desa,
                      deskripsi, status, created_at
               FROM agenda WHERE status IN ('upcoming', 'ongoing')
               ORDER BY tanggal LIMIT 10"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(agenda_from_row).collect())
    }

    /// Create a new agenda item with status `upcoming`.
    pub async fn create_agenda(&self, request: &CreateAgendaRequest) -> Result<Agenda, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO agenda (
                id, nama_kegiatan, hari, tanggal, lokasi_kecamatan, lokasi_desa,
                deskripsi, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 'upcoming', ?)"#,
        )
        .bind(&id)
        .bind(&request.nama_kegiatan)
        .bind(&request.hari)
        .bind(&request.tanggal)
        .bind(&request.lokasi_kecamatan)
        .bind(&request.lokasi_desa)
        .bind(&request.deskripsi)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Agenda {
            id,
            nama_kegiatan: request.nama_kegiatan.clone(),
            hari: request.hari.clone(),
            tanggal: request.tanggal.clone(),
            lokasi_kecamatan: request.lokasi_kecamatan.clone(),
            lokasi_desa: request.lokasi_desa.clone(),
            deskripsi: request.deskripsi.clone(),
            status: "upcoming".to_string(),
            created_at: now,
        })
    }

    /// Update an agenda item; unset fields keep their stored value.
    pub async fn update_agenda(
        &self,
        id: &str,
        request: &UpdateAgendaRequest,
    ) -> Result<Agenda, AppError> {
        let existing = self
            .get_agenda(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Agenda item not found".to_string()))?;

        let updated = Agenda {
            id: id.to_string(),
            nama_kegiatan: request
                .nama_kegiatan
                .clone()
                .unwrap_or(existing.nama_kegiatan),
            hari: request.hari.clone().unwrap_or(existing.hari),
            tanggal: request.tanggal.clone().unwrap_or(existing.tanggal),
            lokasi_kecamatan: request
                .lokasi_kecamatan
                .clone()
                .unwrap_or(existing.lokasi_kecamatan),
            lokasi_desa: request.lokasi_desa.clone().unwrap_or(existing.lokasi_desa),
            deskripsi: request.deskripsi.clone().or(existing.deskripsi),
            status: request.status.clone().unwrap_or(existing.status),
            created_at: existing.created_at,
        };

        sqlx::query(
            r#"UPDATE agenda SET
                nama_kegiatan = ?, hari = ?, tanggal = ?, lokasi_kecamatan = ?,
                lokasi_desa = ?, deskripsi = ?, status = ?
            WHERE id = ?"#,
        )
        .bind(&updated.nama_kegiatan)
        .bind(&updated.hari)
        .bind(&updated.tanggal)
        .bind(&updated.lokasi_kecamatan)
        .bind(&updated.lokasi_desa)
        .bind(&updated.deskripsi)
        .bind(&updated.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn get_agenda(&self, id: &str) -> Result<Option<Agenda>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, nama_kegiatan, hari, tanggal, lokasi_kecamatan, lokasi_desa,
                      deskripsi, status, created_at
               FROM agenda WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(agenda_from_row))
    }

    /// Delete an agenda item.
    pub async fn delete_agenda(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agenda WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Agenda item not found".to_string()));
        }
        Ok(())
    }

    // ==================== BERITA OPERATIONS ====================

    /// List all news entries, newest first.
    pub async fn list_berita(&self) -> Result<Vec<Berita>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, judul, deskripsi_singkat, link_berita, isi_berita, gambar_url,
                      gambar_type, is_active, created_at
               FROM berita ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(berita_from_row).collect())
    }

    /// List active news entries for the public popup (first ten, newest
    /// first).
    pub async fn list_active_berita(&self) -> Result<Vec<Berita>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, judul, deskripsi_singkat, link_berita, isi_berita, gambar_url,
                      gambar_type, is_active, created_at
               FROM berita WHERE is_active = 1 ORDER BY created_at DESC LIMIT 10"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(berita_from_row).collect())
    }

    /// Get a news entry by id.
    pub async fn get_berita(&self, id: &str) -> Result<Option<Berita>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, judul, deskripsi_singkat, link_berita, isi_berita, gambar_url,
                      gambar_type, is_active, created_at
               FROM berita WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(berita_from_row))
    }

    /// Create a news entry; new entries are active.
    pub async fn create_berita(&self, request: &CreateBeritaRequest) -> Result<Berita, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let gambar_type = request
            .gambar_type
            .clone()
            .unwrap_or_else(|| "link".to_string());

        sqlx::query(
            r#"INSERT INTO berita (
                id, judul, deskripsi_singkat, link_berita, isi_berita, gambar_url,
                gambar_type, is_active, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 1, ?)"#,
        )
        .bind(&id)
        .bind(&request.judul)
        .bind(&request.deskripsi_singkat)
        .bind(&request.link_berita)
        .bind(&request.isi_berita)
        .bind(&request.gambar_url)
        .bind(&gambar_type)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Berita {
            id,
            judul: request.judul.clone(),
            deskripsi_singkat: request.deskripsi_singkat.clone(),
            link_berita: Some(request.link_berita.clone()),
            isi_berita: request.isi_berita.clone(),
            gambar_url: request.gambar_url.clone(),
            gambar_type,
            is_active: true,
            created_at: now,
        })
    }

    /// Update a news entry; unset fields keep their stored value.
    pub async fn update_berita(
        &self,
        id: &str,
        request: &UpdateBeritaRequest,
    ) -> Result<Berita, AppError> {
        let existing = self
            .get_berita(id)
            .await?
            .ok_or_else(|| AppError::NotFound("News entry not found".to_string()))?;

        let updated = Berita {
            id: id.to_string(),
            judul: request.judul.clone().unwrap_or(existing.judul),
            deskripsi_singkat: request
                .deskripsi_singkat
                .clone()
                .unwrap_or(existing.deskripsi_singkat),
            link_berita: request.link_berita.clone().or(existing.link_berita),
            isi_berita: request.isi_berita.clone().or(existing.isi_berita),
            gambar_url: request.gambar_url.clone().or(existing.gambar_url),
            gambar_type: request.gambar_type.clone().unwrap_or(existing.gambar_type),
            is_active: request.is_active.unwrap_or(existing.is_active),
            created_at: existing.created_at,
        };

        sqlx::query(
            r#"UPDATE berita SET
                judul = ?, deskripsi_singkat = ?, link_berita = ?, isi_berita = ?,
                gambar_url = ?, gambar_type = ?, is_active = ?
            WHERE id = ?"#,
        )
        .bind(&updated.judul)
        .bind(&updated.deskripsi_singkat)
        .bind(&updated.link_berita)
        .bind(&updated.isi_berita)
        .bind(&updated.gambar_url)
        .bind(&updated.gambar_type)
        .bind(updated.is_active as i32)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a news entry.
    pub async fn delete_berita(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM berita WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("News entry not found".to_string()));
        }
        Ok(())
    }

    // ==================== KONTAK OPERATIONS ====================

    /// Get the stored WhatsApp contact, if any.
    pub async fn get_kontak(&self) -> Result<Option<KontakWhatsapp>, AppError> {
        let row = sqlx::query(
            "SELECT nomor_whatsapp, pesan_default, updated_at FROM kontak_whatsapp LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| KontakWhatsapp {
            nomor_whatsapp: row.get("nomor_whatsapp"),
            pesan_default: row.get("pesan_default"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Replace the WhatsApp contact: only one number is ever stored.
    pub async fn save_kontak(
        &self,
        nomor_whatsapp: &str,
        pesan_default: &str,
    ) -> Result<KontakWhatsapp, AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("DELETE FROM kontak_whatsapp")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "INSERT INTO kontak_whatsapp (nomor_whatsapp, pesan_default, updated_at) VALUES (?, ?, ?)",
        )
        .bind(nomor_whatsapp)
        .bind(pesan_default)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(KontakWhatsapp {
            nomor_whatsapp: Some(nomor_whatsapp.to_string()),
            pesan_default: Some(pesan_default.to_string()),
            updated_at: Some(now),
        })
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password: row.get("password"),
        nama: row.get("nama"),
        role: row.get("role"),
        created_at: row.get("created_at"),
    }
}

fn opd_from_row(row: &sqlx::sqlite::SqliteRow) -> Opd {
    Opd {
        id: row.get("id"),
        nama: row.get("nama"),
        kode: row.get("kode"),
        alamat: row.get("alamat"),
        jumlah_personil: row.get("jumlah_personil"),
        kategori: row.get("kategori"),
        created_at: row.get("created_at"),
    }
}

fn partisipasi_from_row(row: &sqlx::sqlite::SqliteRow) -> Partisipasi {
    let lokasi_str: Option<String> = row.get("lokasi_list");
    Partisipasi {
        id: row.get("id"),
        email: row.get("email"),
        nama_lengkap: row.get("nama_lengkap"),
        nip: row.get("nip"),
        opd_id: row.get("opd_id"),
        opd_nama: None,
        alamat: row.get("alamat"),
        nomor_whatsapp: row.get("nomor_whatsapp"),
        jumlah_pohon: row.get("jumlah_pohon"),
        jenis_pohon: row.get("jenis_pohon"),
        sumber_bibit: row.get("sumber_bibit"),
        lokasi_tanam: row.get("lokasi_tanam"),
        titik_lokasi: row.get("titik_lokasi"),
        bukti_url: row.get("bukti_url"),
        lokasi_list: lokasi_str.map(|s| parse_json_list(&s)).unwrap_or_default(),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

fn settings_from_row(row: &sqlx::sqlite::SqliteRow) -> Settings {
    Settings {
        id: row.get("id"),
        logo_url: row.get("logo_url"),
        hero_title: row.get("hero_title"),
        hero_subtitle: row.get("hero_subtitle"),
        hero_image_url: row.get("hero_image_url"),
        tentang_title: row.get("tentang_title"),
        tentang_content: row.get("tentang_content"),
        tentang_visi: row.get("tentang_visi"),
        tentang_misi: row.get("tentang_misi"),
        berita_popup_interval: row.get("berita_popup_interval"),
    }
}

fn gallery_from_row(row: &sqlx::sqlite::SqliteRow) -> GalleryItem {
    GalleryItem {
        id: row.get("id"),
        title: row.get("title"),
        image_url: row.get("image_url"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

fn edukasi_from_row(row: &sqlx::sqlite::SqliteRow) -> Edukasi {
    Edukasi {
        id: row.get("id"),
        judul: row.get("judul"),
        konten: row.get("konten"),
        gambar_url: row.get("gambar_url"),
        created_at: row.get("created_at"),
    }
}

fn agenda_from_row(row: &sqlx::sqlite::SqliteRow) -> Agenda {
    Agenda {
        id: row.get("id"),
        nama_kegiatan: row.get("nama_kegiatan"),
        hari: row.get("hari"),
        tanggal: row.get("tanggal"),
        lokasi_kecamatan: row.get("lokasi_kecamatan"),
        lokasi_desa: row.get("lokasi_desa"),
        deskripsi: row.get("deskripsi"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

fn berita_from_row(row: &sqlx::sqlite::SqliteRow) -> Berita {
    let is_active: i32 = row.get("is_active");
    Berita {
        id: row.get("id"),
        judul: row.get("judul"),
        deskripsi_singkat: row.get("deskripsi_singkat"),
        link_berita: row.get("link_berita"),
        isi_berita: row.get("isi_berita"),
        gambar_url: row.get("gambar_url"),
        gambar_type: row.get("gambar_type"),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
    }
}

fn parse_json_list(s: &str) -> Vec<LokasiTanam> {
    serde_json::from_str(s).unwrap_or_default()
}
