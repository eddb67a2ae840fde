//! Content-addressed cache store (spec §4.5).
//!
//! A published translation is addressed by a 128-bit fingerprint derived
//! from `(source_uri, track_id, target_lang)`. Two files are written side
//! by side under the cache root: `<fp>.<ext>` (the generated subtitle
//! document) and `<fp>.json` (metadata: creation time, TTL, source
//! format). Publication is atomic (write to a temp file, then rename) and
//! eviction runs in two phases -- expired entries first, then
//! least-recently-used -- grounded on the teacher's
//! `hls-vod-lib/src/cache.rs` `SegmentCache::evict_if_needed`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::{LitesubError, Result};

/// A cache fingerprint: the hex-encoded MD5 digest of the fingerprint key
/// (spec §4.5: "MD5 is acceptable; this is a content-addressing key, not
/// a security boundary").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn compute(source_uri: &str, track_id: usize, target_lang: &str) -> Self {
        let mut hasher = Md5::new();
        hasher.update(source_uri.as_bytes());
        hasher.update([0u8]);
        hasher.update(track_id.to_string().as_bytes());
        hasher.update([0u8]);
        hasher.update(target_lang.as_bytes());
        let digest = hasher.finalize();
        Fingerprint(hex_encode(&digest))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Sidecar metadata stored next to a cached subtitle document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub created_at_unix: u64,
    pub ttl_secs: u64,
    pub format_extension: String,
    pub last_accessed_unix: u64,
}

impl CacheMetadata {
    fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at_unix) > self.ttl_secs
    }
}

/// A filesystem-backed cache store under `root`.
pub struct CacheStore {
    root: PathBuf,
    default_ttl_secs: u64,
    max_entries: usize,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>, default_ttl_secs: u64, max_entries: usize) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root, default_ttl_secs, max_entries })
    }

    fn doc_path(&self, fp: &Fingerprint, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{extension}", fp.0))
    }

    fn meta_path(&self, fp: &Fingerprint) -> PathBuf {
        self.root.join(format!("{}.json", fp.0))
    }

    /// Look up a cached, non-expired document. Returns `None` on a miss or
    /// an expired entry (the caller proceeds to the Miss path; expired
    /// entries are swept lazily on the next [`Self::evict`] call rather
    /// than on every lookup).
    pub fn lookup(&self, fp: &Fingerprint) -> Result<Option<String>> {
        Ok(self.lookup_with_extension(fp)?.map(|(contents, _)| contents))
    }

    /// Like [`Self::lookup`] but also returns the format extension the
    /// document was published under, since a cache hit bypasses extraction
    /// entirely and the orchestrator otherwise has no way to know it.
    pub fn lookup_with_extension(&self, fp: &Fingerprint) -> Result<Option<(String, String)>> {
        let meta_path = self.meta_path(fp);
        let Ok(meta_raw) = fs::read_to_string(&meta_path) else {
            return Ok(None);
        };
        let mut meta: CacheMetadata = serde_json::from_str(&meta_raw)?;
        let now = unix_now();
        if meta.is_expired(now) {
            return Ok(None);
        }
        let doc_path = self.doc_path(fp, &meta.format_extension);
        let Ok(contents) = fs::read_to_string(&doc_path) else {
            return Ok(None);
        };
        meta.last_accessed_unix = now;
        fs::write(&meta_path, serde_json::to_string(&meta)?)?;
        Ok(Some((contents, meta.format_extension)))
    }

    /// Publish a document atomically: write to a temp file in the same
    /// directory, then rename over the final path so a concurrent reader
    /// never observes a partially written file.
    pub fn put(&self, fp: &Fingerprint, extension: &str, contents: &str, ttl_secs: Option<u64>) -> Result<()> {
        let now = unix_now();
        let meta = CacheMetadata {
            created_at_unix: now,
            ttl_secs: ttl_secs.unwrap_or(self.default_ttl_secs),
            format_extension: extension.to_string(),
            last_accessed_unix: now,
        };

        atomic_write(&self.doc_path(fp, extension), contents.as_bytes())?;
        atomic_write(&self.meta_path(fp), serde_json::to_string(&meta)?.as_bytes())?;

        self.evict()?;
        Ok(())
    }

    /// Two-phase eviction: drop every expired entry, then if the store
    /// still exceeds `max_entries`, drop least-recently-accessed entries
    /// until it doesn't.
    pub fn evict(&self) -> Result<()> {
        let now = unix_now();
        let mut live: Vec<(Fingerprint, CacheMetadata)> = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            let Ok(raw) = fs::read_to_string(&path) else { continue };
            let Ok(meta) = serde_json::from_str::<CacheMetadata>(&raw) else { continue };
            let fp = Fingerprint(stem.to_string());
            if meta.is_expired(now) {
                let _ = fs::remove_file(self.doc_path(&fp, &meta.format_extension));
                let _ = fs::remove_file(&path);
                continue;
            }
            live.push((fp, meta));
        }

        if live.len() > self.max_entries {
            live.sort_by_key(|(_, m)| m.last_accessed_unix);
            let overflow = live.len() - self.max_entries;
            for (fp, meta) in live.into_iter().take(overflow) {
                let _ = fs::remove_file(self.doc_path(&fp, &meta.format_extension));
                let _ = fs::remove_file(self.meta_path(&fp));
            }
        }

        Ok(())
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|e| e.to_str()).unwrap_or("")
    ));
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        LitesubError::Io(e)
    })?;
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}
