//! Aggregation engine: program statistics, per-OPD progress, and duplicate
//! grouping.
//!
//! Everything here is a pure function over rows the caller already fetched;
//! nothing is cached or persisted. Breakdowns carry a secondary name sort so
//! output is deterministic.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Opd, Partisipasi};

/// Trees target per person: one person plants ten trees.
const POHON_PER_PERSONIL: i64 = 10;

// ==================== STATS ====================

/// Per-OPD tree and participant totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpdStat {
    pub opd_id: String,
    pub opd_nama: String,
    pub jumlah_pohon: i64,
    pub jumlah_partisipan: i64,
}

/// Per-species tree totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JenisPohonStat {
    pub jenis: String,
    pub jumlah: i64,
}

/// Per-planting-location totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LokasiStat {
    pub lokasi: String,
    pub jumlah_pohon: i64,
    pub jumlah_partisipan: i64,
}

/// Aggregate program statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_pohon: i64,
    pub total_partisipan: i64,
    pub total_opd: i64,
    pub total_lokasi: i64,
    pub opd_stats: Vec<OpdStat>,
    pub jenis_pohon_stats: Vec<JenisPohonStat>,
    pub lokasi_stats: Vec<LokasiStat>,
}

/// Compute program statistics in a single pass over all participation
/// records.
///
/// A record with N locations contributes `jumlah_pohon / N` (integer
/// division) trees to each location; the participant counts at most once per
/// distinct location, while `total_lokasi` counts every non-blank entry.
pub fn compute_stats(partisipasi: &[Partisipasi], opd_list: &[Opd]) -> StatsResponse {
    let total_partisipan = partisipasi.len() as i64;
    let total_pohon: i64 = partisipasi.iter().map(|p| p.jumlah_pohon).sum();

    let opd_names: HashMap<&str, &str> = opd_list
        .iter()
        .map(|o| (o.id.as_str(), o.nama.as_str()))
        .collect();

    // Per-OPD totals
    let mut per_opd: HashMap<&str, (i64, i64)> = HashMap::new();
    for p in partisipasi {
        let entry = per_opd.entry(p.opd_id.as_str()).or_default();
        entry.0 += p.jumlah_pohon;
        entry.1 += 1;
    }

    // Per-species totals
    let mut per_jenis: HashMap<&str, i64> = HashMap::new();
    for p in partisipasi {
        *per_jenis.entry(p.jenis_pohon.as_str()).or_default() += p.jumlah_pohon;
    }

    // Per-location totals. A participant listing the same location twice is
    // still one participant there; their trees split evenly across entries.
    let mut per_lokasi: HashMap<String, (i64, i64)> = HashMap::new();
    let mut lokasi_partisipan: HashMap<String, HashSet<&str>> = HashMap::new();
    let mut total_lokasi = 0i64;

    for p in partisipasi {
        if !p.lokasi_list.is_empty() {
            let pohon_per_lokasi = p.jumlah_pohon / p.lokasi_list.len() as i64;
            for loc in &p.lokasi_list {
                if loc.lokasi_tanam.trim().is_empty() {
                    continue;
                }
                tally_lokasi(
                    &mut per_lokasi,
                    &mut lokasi_partisipan,
                    &loc.lokasi_tanam,
                    pohon_per_lokasi,
                    &p.id,
                );
                total_lokasi += 1;
            }
        } else if let Some(lokasi) = p.lokasi_tanam.as_deref() {
            if !lokasi.trim().is_empty() {
                tally_lokasi(
                    &mut per_lokasi,
                    &mut lokasi_partisipan,
                    lokasi,
                    p.jumlah_pohon,
                    &p.id,
                );
                total_lokasi += 1;
            }
        }
    }

    let mut opd_stats: Vec<OpdStat> = per_opd
        .into_iter()
        .map(|(opd_id, (jumlah_pohon, jumlah_partisipan))| OpdStat {
            opd_id: opd_id.to_string(),
            opd_nama: opd_names.get(opd_id).unwrap_or(&"Unknown").to_string(),
            jumlah_pohon,
            jumlah_partisipan,
        })
        .collect();
    opd_stats.sort_by(|a, b| {
        b.jumlah_pohon
            .cmp(&a.jumlah_pohon)
            .then_with(|| a.opd_nama.cmp(&b.opd_nama))
    });

    let mut jenis_pohon_stats: Vec<JenisPohonStat> = per_jenis
        .into_iter()
        .map(|(jenis, jumlah)| JenisPohonStat {
            jenis: jenis.to_string(),
            jumlah,
        })
        .collect();
    jenis_pohon_stats.sort_by(|a, b| b.jumlah.cmp(&a.jumlah).then_with(|| a.jenis.cmp(&b.jenis)));

    let mut lokasi_stats: Vec<LokasiStat> = per_lokasi
        .into_iter()
        .map(|(lokasi, (jumlah_pohon, jumlah_partisipan))| LokasiStat {
            lokasi,
            jumlah_pohon,
            jumlah_partisipan,
        })
        .collect();
    lokasi_stats.sort_by(|a, b| {
        b.jumlah_pohon
            .cmp(&a.jumlah_pohon)
            .then_with(|| a.lokasi.cmp(&b.lokasi))
    });

    StatsResponse {
        total_pohon,
        total_partisipan,
        total_opd: opd_list.len() as i64,
        total_lokasi,
        opd_stats,
        jenis_pohon_stats,
        lokasi_stats,
    }
}

fn tally_lokasi<'a>(
    per_lokasi: &mut HashMap<String, (i64, i64)>,
    lokasi_partisipan: &mut HashMap<String, HashSet<&'a str>>,
    lokasi: &str,
    pohon: i64,
    partisipan_id: &'a str,
) {
    let entry = per_lokasi.entry(lokasi.to_string()).or_default();
    entry.0 += pohon;
    let seen = lokasi_partisipan.entry(lokasi.to_string()).or_default();
    if seen.insert(partisipan_id) {
        entry.1 += 1;
    }
}

// ==================== PROGRESS ====================

/// Progress of one OPD against its personnel-derived target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpdProgress {
    pub opd_id: String,
    pub opd_nama: String,
    pub kategori: String,
    pub jumlah_personil: i64,
    pub target_pohon: i64,
    pub pohon_tertanam: i64,
    pub progress_persen: f64,
}

/// Grand totals across all OPDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_personil: i64,
    pub total_target: i64,
    pub total_tertanam: i64,
    pub overall_progress: f64,
}

/// Per-OPD progress plus the program-wide summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub progress_list: Vec<OpdProgress>,
    pub summary: ProgressSummary,
}

/// Compute per-OPD progress: target is ten trees per person; the percentage
/// is rounded to one decimal and capped at 100 (0 when the target is 0).
pub fn compute_progress(partisipasi: &[Partisipasi], opd_list: &[Opd]) -> ProgressResponse {
    let mut planted_per_opd: HashMap<&str, i64> = HashMap::new();
    for p in partisipasi {
        *planted_per_opd.entry(p.opd_id.as_str()).or_default() += p.jumlah_pohon;
    }

    let mut progress_list = Vec::with_capacity(opd_list.len());
    let mut total_target = 0i64;
    let mut total_tertanam = 0i64;

    for opd in opd_list {
        let target = opd.jumlah_personil * POHON_PER_PERSONIL;
        let planted = planted_per_opd.get(opd.id.as_str()).copied().unwrap_or(0);
        let progress_persen = capped_percentage(planted, target);

        total_target += target;
        total_tertanam += planted;

        progress_list.push(OpdProgress {
            opd_id: opd.id.clone(),
            opd_nama: opd.nama.clone(),
            kategori: opd.kategori.clone(),
            jumlah_personil: opd.jumlah_personil,
            target_pohon: target,
            pohon_tertanam: planted,
            progress_persen,
        });
    }

    progress_list.sort_by(|a, b| {
        b.progress_persen
            .partial_cmp(&a.progress_persen)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.opd_nama.cmp(&b.opd_nama))
    });

    let total_personil: i64 = opd_list.iter().map(|o| o.jumlah_personil).sum();
    let overall_progress = capped_percentage(total_tertanam, total_target);

    ProgressResponse {
        progress_list,
        summary: ProgressSummary {
            total_personil,
            total_target,
            total_tertanam,
            overall_progress,
        },
    }
}

/// `planted / target` as a percentage rounded to one decimal, capped at 100;
/// 0 when the target is 0.
fn capped_percentage(planted: i64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    let pct = (planted as f64 / target as f64 * 1000.0).round() / 10.0;
    pct.min(100.0)
}

// ==================== DUPLICATE DETECTION ====================

/// Field a duplicate scan groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    NamaLengkap,
    Nip,
    NomorWhatsapp,
}

impl DuplicateField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nama_lengkap" => Some(DuplicateField::NamaLengkap),
            "nip" => Some(DuplicateField::Nip),
            "nomor_whatsapp" => Some(DuplicateField::NomorWhatsapp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::NamaLengkap => "nama_lengkap",
            DuplicateField::Nip => "nip",
            DuplicateField::NomorWhatsapp => "nomor_whatsapp",
        }
    }

    /// The field's value on a record; `None` when absent or empty.
    fn value_of<'a>(&self, p: &'a Partisipasi) -> Option<&'a str> {
        let value = match self {
            DuplicateField::NamaLengkap => Some(p.nama_lengkap.as_str()),
            DuplicateField::Nip => p.nip.as_deref(),
            DuplicateField::NomorWhatsapp => p.nomor_whatsapp.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// One record inside a duplicate group, enriched with its OPD name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMember {
    pub id: String,
    pub nama_lengkap: String,
    pub nip: Option<String>,
    pub nomor_whatsapp: Option<String>,
    pub opd_id: String,
    pub opd_nama: String,
    pub jumlah_pohon: i64,
    pub jenis_pohon: String,
    pub created_at: String,
}

/// Records sharing the same value of the grouping field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub key_field: String,
    pub key_value: String,
    pub count: i64,
    pub participant_ids: Vec<String>,
    pub participants: Vec<DuplicateMember>,
}

/// Group participation records by `field`, optionally restricted to one OPD.
/// Records with an absent or empty field value are excluded; only groups with
/// more than one member are returned, largest first.
pub fn group_duplicates(
    partisipasi: &[Partisipasi],
    field: DuplicateField,
    opd_filter: Option<&str>,
    opd_list: &[Opd],
) -> Vec<DuplicateGroup> {
    let opd_names: HashMap<&str, &str> = opd_list
        .iter()
        .map(|o| (o.id.as_str(), o.nama.as_str()))
        .collect();

    let mut groups: HashMap<&str, Vec<&Partisipasi>> = HashMap::new();
    for p in partisipasi {
        if let Some(opd_id) = opd_filter {
            if p.opd_id != opd_id {
                continue;
            }
        }
        if let Some(value) = field.value_of(p) {
            groups.entry(value).or_default().push(p);
        }
    }

    let mut result: Vec<DuplicateGroup> = groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(key_value, members)| DuplicateGroup {
            key_field: field.as_str().to_string(),
            key_value: key_value.to_string(),
            count: members.len() as i64,
            participant_ids: members.iter().map(|p| p.id.clone()).collect(),
            participants: members
                .iter()
                .map(|p| DuplicateMember {
                    id: p.id.clone(),
                    nama_lengkap: p.nama_lengkap.clone(),
                    nip: p.nip.clone(),
                    nomor_whatsapp: p.nomor_whatsapp.clone(),
                    opd_id: p.opd_id.clone(),
                    opd_nama: opd_names
                        .get(p.opd_id.as_str())
                        .unwrap_or(&"Unknown")
                        .to_string(),
                    jumlah_pohon: p.jumlah_pohon,
                    jenis_pohon: p.jenis_pohon.clone(),
                    created_at: p.created_at.clone(),
                })
                .collect(),
        })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key_value.cmp(&b.key_value)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LokasiTanam;

    fn opd(id: &str, nama: &str, personil: i64) -> Opd {
        Opd {
            id: id.to_string(),
            nama: nama.to_string(),
            kode: None,
            alamat: None,
            jumlah_personil: personil,
            kategori: "OPD".to_string(),
            created_at: "2025-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn record(id: &str, opd_id: &str, nama: &str, pohon: i64, jenis: &str) -> Partisipasi {
        Partisipasi {
            id: id.to_string(),
            email: None,
            nama_lengkap: nama.to_string(),
            nip: None,
            opd_id: opd_id.to_string(),
            opd_nama: None,
            alamat: None,
            nomor_whatsapp: None,
            jumlah_pohon: pohon,
            jenis_pohon: jenis.to_string(),
            sumber_bibit: None,
            lokasi_tanam: None,
            titik_lokasi: None,
            bukti_url: None,
            lokasi_list: Vec::new(),
            status: Some("pending".to_string()),
            created_at: "2025-01-02T00:00:00+00:00".to_string(),
        }
    }

    fn loc(nama: &str) -> LokasiTanam {
        LokasiTanam {
            lokasi_tanam: nama.to_string(),
            titik_lokasi: None,
            bukti_url: None,
        }
    }

    #[test]
    fn test_stats_totals_match_opd_breakdown() {
        let opds = vec![opd("a", "Dinas A", 5), opd("b", "Dinas B", 3)];
        let records = vec![
            record("p1", "a", "Budi", 30, "Mahoni"),
            record("p2", "a", "Siti", 20, "Trembesi"),
            record("p3", "b", "Andi", 15, "Mahoni"),
        ];

        let stats = compute_stats(&records, &opds);
        assert_eq!(stats.total_pohon, 65);
        assert_eq!(stats.total_partisipan, 3);
        assert_eq!(stats.total_opd, 2);

        let pohon_sum: i64 = stats.opd_stats.iter().map(|s| s.jumlah_pohon).sum();
        let partisipan_sum: i64 = stats.opd_stats.iter().map(|s| s.jumlah_partisipan).sum();
        assert_eq!(pohon_sum, stats.total_pohon);
        assert_eq!(partisipan_sum, stats.total_partisipan);

        // Sorted by tree count descending
        assert_eq!(stats.opd_stats[0].opd_nama, "Dinas A");
        assert_eq!(stats.opd_stats[0].jumlah_pohon, 50);
    }

    #[test]
    fn test_stats_splits_trees_across_locations() {
        let opds = vec![opd("a", "Dinas A", 5)];
        let mut p = record("p1", "a", "Budi", 10, "Mahoni");
        p.lokasi_list = vec![loc("Kebun desa"), loc("Pekarangan"), loc("Halaman kantor")];

        let stats = compute_stats(&[p], &opds);
        assert_eq!(stats.total_lokasi, 3);
        // 10 trees over 3 locations: integer division
        for lokasi in &stats.lokasi_stats {
            assert_eq!(lokasi.jumlah_pohon, 3);
            assert_eq!(lokasi.jumlah_partisipan, 1);
        }
    }

    #[test]
    fn test_stats_counts_participant_once_per_location() {
        let opds = vec![opd("a", "Dinas A", 5)];
        let mut p = record("p1", "a", "Budi", 10, "Mahoni");
        p.lokasi_list = vec![loc("Kebun desa"), loc("Kebun desa")];

        let stats = compute_stats(&[p], &opds);
        assert_eq!(stats.lokasi_stats.len(), 1);
        let kebun = &stats.lokasi_stats[0];
        // Trees accumulate per entry, the participant only once.
        assert_eq!(kebun.jumlah_pohon, 10);
        assert_eq!(kebun.jumlah_partisipan, 1);
        assert_eq!(stats.total_lokasi, 2);
    }

    #[test]
    fn test_stats_falls_back_to_legacy_location() {
        let opds = vec![opd("a", "Dinas A", 5)];
        let mut p = record("p1", "a", "Budi", 12, "Mahoni");
        p.lokasi_tanam = Some("Halaman kantor".to_string());

        let stats = compute_stats(&[p], &opds);
        assert_eq!(stats.lokasi_stats.len(), 1);
        assert_eq!(stats.lokasi_stats[0].lokasi, "Halaman kantor");
        assert_eq!(stats.lokasi_stats[0].jumlah_pohon, 12);
    }

    #[test]
    fn test_stats_skips_blank_locations() {
        let opds = vec![opd("a", "Dinas A", 5)];
        let mut p = record("p1", "a", "Budi", 10, "Mahoni");
        p.lokasi_list = vec![loc(""), loc("Kebun desa")];

        let stats = compute_stats(&[p], &opds);
        assert_eq!(stats.lokasi_stats.len(), 1);
        assert_eq!(stats.total_lokasi, 1);
    }

    #[test]
    fn test_progress_scenario() {
        // personnel 10 -> target 100; 30 + 45 planted -> 75.0%
        let opds = vec![opd("a", "Dinas A", 10)];
        let records = vec![
            record("p1", "a", "Budi", 30, "Mahoni"),
            record("p2", "a", "Siti", 45, "Trembesi"),
        ];

        let progress = compute_progress(&records, &opds);
        let entry = &progress.progress_list[0];
        assert_eq!(entry.target_pohon, 100);
        assert_eq!(entry.pohon_tertanam, 75);
        assert_eq!(entry.progress_persen, 75.0);
        assert_eq!(progress.summary.total_target, 100);
        assert_eq!(progress.summary.total_tertanam, 75);
        assert_eq!(progress.summary.overall_progress, 75.0);
    }

    #[test]
    fn test_progress_caps_at_100() {
        let opds = vec![opd("a", "Dinas A", 1)];
        let records = vec![record("p1", "a", "Budi", 45, "Mahoni")];

        let progress = compute_progress(&records, &opds);
        assert_eq!(progress.progress_list[0].progress_persen, 100.0);
        assert_eq!(progress.summary.overall_progress, 100.0);
    }

    #[test]
    fn test_progress_zero_target() {
        let opds = vec![opd("a", "Dinas A", 0)];
        let records = vec![record("p1", "a", "Budi", 5, "Mahoni")];

        let progress = compute_progress(&records, &opds);
        assert_eq!(progress.progress_list[0].progress_persen, 0.0);
        assert_eq!(progress.summary.overall_progress, 0.0);
    }

    #[test]
    fn test_progress_rounds_to_one_decimal() {
        // 37 of 120 = 30.8333... -> 30.8
        let opds = vec![opd("a", "Dinas A", 12)];
        let records = vec![record("p1", "a", "Budi", 37, "Mahoni")];

        let progress = compute_progress(&records, &opds);
        assert_eq!(progress.progress_list[0].progress_persen, 30.8);
    }

    #[test]
    fn test_progress_sorted_descending() {
        let opds = vec![opd("a", "Dinas A", 10), opd("b", "Dinas B", 10)];
        let records = vec![
            record("p1", "a", "Budi", 20, "Mahoni"),
            record("p2", "b", "Siti", 80, "Mahoni"),
        ];

        let progress = compute_progress(&records, &opds);
        assert_eq!(progress.progress_list[0].opd_nama, "Dinas B");
        assert_eq!(progress.progress_list[1].opd_nama, "Dinas A");
    }

    #[test]
    fn test_duplicates_by_name() {
        let opds = vec![opd("a", "Dinas A", 5)];
        let records = vec![
            record("p1", "a", "Budi", 10, "Mahoni"),
            record("p2", "a", "Budi", 5, "Trembesi"),
            record("p3", "a", "Siti", 7, "Mahoni"),
        ];

        let groups = group_duplicates(&records, DuplicateField::NamaLengkap, None, &opds);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key_value, "Budi");
        assert_eq!(groups[0].count, 2);
        assert!(groups[0].participant_ids.contains(&"p1".to_string()));
        assert!(groups[0].participant_ids.contains(&"p2".to_string()));
        assert_eq!(groups[0].participants[0].opd_nama, "Dinas A");
    }

    #[test]
    fn test_duplicates_exclude_empty_values() {
        let opds = vec![opd("a", "Dinas A", 5)];
        let mut p1 = record("p1", "a", "Budi", 10, "Mahoni");
        let mut p2 = record("p2", "a", "Siti", 5, "Mahoni");
        p1.nip = Some(String::new());
        p2.nip = Some(String::new());

        let groups = group_duplicates(&[p1, p2], DuplicateField::Nip, None, &opds);
        assert!(groups.is_empty(), "empty values must not form a group");
    }

    #[test]
    fn test_duplicates_opd_filter() {
        let opds = vec![opd("a", "Dinas A", 5), opd("b", "Dinas B", 5)];
        let records = vec![
            record("p1", "a", "Budi", 10, "Mahoni"),
            record("p2", "b", "Budi", 5, "Mahoni"),
        ];

        let groups = group_duplicates(&records, DuplicateField::NamaLengkap, Some("a"), &opds);
        assert!(groups.is_empty(), "records in other OPDs must not count");

        let groups = group_duplicates(&records, DuplicateField::NamaLengkap, None, &opds);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_duplicates_sorted_by_group_size() {
        let opds = vec![opd("a", "Dinas A", 5)];
        let records = vec![
            record("p1", "a", "Budi", 1, "Mahoni"),
            record("p2", "a", "Budi", 1, "Mahoni"),
            record("p3", "a", "Siti", 1, "Mahoni"),
            record("p4", "a", "Siti", 1, "Mahoni"),
            record("p5", "a", "Siti", 1, "Mahoni"),
        ];

        let groups = group_duplicates(&records, DuplicateField::NamaLengkap, None, &opds);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key_value, "Siti");
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[1].key_value, "Budi");
    }
}
