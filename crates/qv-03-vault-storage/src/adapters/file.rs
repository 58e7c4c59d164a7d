use super::{apply_batch, scan_prefix};
use crate::domain::KVStoreError;
use crate::ports::{BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File-backed key-value store.
///
/// Keeps the whole map in memory and rewrites the file on every write:
/// the new image goes to a temp file, is synced, then renamed over the old
/// one. A crash mid-write leaves either the old or the new image.
///
/// File format: `[key_len:u32 LE][key][value_len:u32 LE][value]...`
#[derive(Debug)]
pub struct FileBackedKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
    path: PathBuf,
}

impl FileBackedKVStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    ///
    /// A truncated or malformed file is reported as corruption rather than
    /// silently discarded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::read(&path) {
            Ok(bytes) => {
                let data = Self::decode(&bytes)?;
                info!(
                    "[qv-03] Loaded {} entries from {} ({} bytes)",
                    data.len(),
                    path.display(),
                    bytes.len()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[qv-03] No existing store file at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(KVStoreError::Io {
                    message: format!("{}: {}", path.display(), e),
                })
            }
        };

        Ok(Self { data, path })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the store holds nothing.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn decode(bytes: &[u8]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KVStoreError> {
        let mut data = BTreeMap::new();
        let mut cursor = 0;

        while cursor < bytes.len() {
            let key = read_chunk(bytes, &mut cursor)?;
            let value = read_chunk(bytes, &mut cursor)?;
            data.insert(key, value);
        }

        Ok(data)
    }

    fn encode(data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Result<Vec<u8>, KVStoreError> {
        let mut bytes = Vec::new();
        for (key, value) in data {
            write_chunk(&mut bytes, key)?;
            write_chunk(&mut bytes, value)?;
        }
        Ok(bytes)
    }

    fn save(&self, data: &BTreeMap<Vec<u8>, Vec<u8>>) -> Result<(), KVStoreError> {
        let io = |e: std::io::Error| KVStoreError::Io {
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io)?;
            }
        }

        let bytes = Self::encode(data)?;
        let temp_path = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path).map_err(io)?;
        file.write_all(&bytes).map_err(io)?;
        file.sync_all().map_err(io)?;
        std::fs::rename(&temp_path, &self.path).map_err(io)?;

        debug!(
            "[qv-03] Persisted {} entries to {}",
            data.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Apply `operations` to a copy, persist it, then swap it in.
    fn commit(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut next = self.data.clone();
        apply_batch(&mut next, operations);
        self.save(&next)?;
        self.data = next;
        Ok(())
    }
}

fn read_chunk(bytes: &[u8], cursor: &mut usize) -> Result<Vec<u8>, KVStoreError> {
    let corrupt = |what: &str, at: usize| KVStoreError::Corruption {
        message: format!("truncated {} at byte {}", what, at),
    };

    let len_end = cursor.checked_add(4).ok_or_else(|| corrupt("length", *cursor))?;
    let len_bytes: [u8; 4] = bytes
        .get(*cursor..len_end)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| corrupt("length", *cursor))?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let end = len_end
        .checked_add(len)
        .ok_or_else(|| corrupt("entry", len_end))?;
    let chunk = bytes
        .get(len_end..end)
        .ok_or_else(|| corrupt("entry", len_end))?
        .to_vec();
    *cursor = end;
    Ok(chunk)
}

fn write_chunk(out: &mut Vec<u8>, chunk: &[u8]) -> Result<(), KVStoreError> {
    let len = u32::try_from(chunk.len()).map_err(|_| KVStoreError::Io {
        message: format!("entry of {} bytes exceeds the 4 GiB limit", chunk.len()),
    })?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(chunk);
    Ok(())
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::put(key, value)])
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.commit(vec![BatchOperation::delete(key)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        self.commit(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(scan_prefix(&self.data, prefix))
    }

    fn blocks_on_write(&self) -> bool {
        true
    }
}
