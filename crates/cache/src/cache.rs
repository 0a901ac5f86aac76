//! The validity-aware direct cache.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use veritrie_core::UInt256;

use crate::error::{CacheResult, Fallback};
use crate::metrics::CacheMetrics;
use crate::record::CacheRecord;
use crate::state::StateMap;
use crate::store::{Store, StoreWriter};
use crate::validator::CacheValidator;

/// Outcome of probing the disk cache for one key.
enum CachedLookup {
    /// A trustworthy answer: the cached value, or a confirmed absence.
    Hit(Option<Vec<u8>>),
    /// No usable record; fall through to the authoritative structure.
    Miss,
}

/// Write-through cache that persists trie-derived values flat on disk.
///
/// Every persisted record carries the block it originated from and is only
/// served once that block has been confirmed to still be canonical, so a
/// reorg can never make the cache return stale data as current. Keys that
/// have been written, deleted or read through a miss are tracked as dirty:
/// they bypass the disk cache entirely until [`commit_to`](Self::commit_to)
/// re-persists them under this instance's context block.
///
/// A `DirectCache` has a single logical owner: every mutating operation takes
/// `&mut self`, and sharing one instance across threads requires external
/// locking around reads, writes and commits alike.
pub struct DirectCache {
    data: Box<dyn StateMap>,
    db: Box<dyn Store>,
    key_prefix: Vec<u8>,
    block_number: u64,
    block_hash: UInt256,
    validator: Arc<dyn CacheValidator>,
    exhaustive: bool,
    dirty: HashSet<Vec<u8>>,
    metrics: Arc<CacheMetrics>,
}

impl DirectCache {
    /// Creates a cache reading as of block `(block_number, block_hash)`.
    ///
    /// With `exhaustive` set, the disk cache is declared complete for this
    /// instance's key space: a missing record counts as a confirmed absence
    /// and the state map is never consulted for it. Only enable this when
    /// every key has actually been persisted, e.g. after a full import.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data: Box<dyn StateMap>,
        db: Box<dyn Store>,
        key_prefix: Vec<u8>,
        block_number: u64,
        block_hash: UInt256,
        validator: Arc<dyn CacheValidator>,
        exhaustive: bool,
        metrics: Arc<CacheMetrics>,
    ) -> Self {
        Self {
            data,
            db,
            key_prefix,
            block_number,
            block_hash,
            validator,
            exhaustive,
            dirty: HashSet::new(),
            metrics,
        }
    }

    /// Block height this instance reads as of.
    pub fn block_number(&self) -> u64 {
        self.block_number
    }

    /// Hash of the context block.
    pub fn block_hash(&self) -> &UInt256 {
        &self.block_hash
    }

    /// Counters shared with this instance.
    pub fn metrics(&self) -> &Arc<CacheMetrics> {
        &self.metrics
    }

    /// Checks whether `key` is currently marked dirty.
    pub fn is_dirty(&self, key: &[u8]) -> bool {
        self.dirty.contains(key)
    }

    /// Number of keys awaiting re-persistence at the next commit.
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    fn make_key(&self, key: &[u8]) -> Vec<u8> {
        make_cache_key(&self.key_prefix, key)
    }

    /// Reads a logical key, swallowing errors.
    ///
    /// Convenience wrapper around [`try_get`](Self::try_get): failures are
    /// logged and reported as an absent value. Callers that need to
    /// distinguish "absent" from "failed" must use the fallible variant.
    pub fn get(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                log::error!("unhandled cache read error: {err}");
                None
            }
        }
    }

    /// Reads a logical key.
    ///
    /// Dirty keys are read straight from the authoritative structure; the
    /// disk cache is not consulted and no hit or miss is counted for them.
    /// Clean keys are probed on disk first and served from there when the
    /// record's origin block is still canonical. Anything else falls through
    /// to the authoritative structure and marks the key dirty, so it will be
    /// re-persisted at the next commit.
    pub fn try_get(&mut self, key: &[u8]) -> CacheResult<Option<Vec<u8>>> {
        let start = Instant::now();

        let was_dirty = self.dirty.contains(key);

        // Use the underlying structure for dirty keys
        if !was_dirty {
            let cache_key = self.make_key(key);
            if let CachedLookup::Hit(value) = self.read_cached(&cache_key)? {
                self.metrics.record_hit(start.elapsed());
                return Ok(value);
            }
        }

        let value = self.data.try_get(key)?;

        // Flag the key as dirty so it gets written at commit time
        self.dirty.insert(key.to_vec());

        // Don't count fetches of dirty data as cache misses
        if !was_dirty {
            self.metrics.record_miss(start.elapsed());
        }

        Ok(value)
    }

    fn read_cached(&self, cache_key: &[u8]) -> CacheResult<CachedLookup> {
        let encoded = match self.db.get(cache_key)? {
            Some(encoded) if !encoded.is_empty() => encoded,
            _ => {
                // With an exhaustive cache a missing record is itself the
                // answer: the key does not exist.
                return Ok(if self.exhaustive {
                    CachedLookup::Hit(None)
                } else {
                    CachedLookup::Miss
                });
            }
        };

        let record = match CacheRecord::from_bytes(&encoded) {
            Ok(record) => record,
            Err(err) => match err.read_fallback() {
                Some(Fallback::Miss) => {
                    log::error!(
                        "can't decode cached record at {}: {}",
                        hex::encode(cache_key),
                        err
                    );
                    return Ok(CachedLookup::Miss);
                }
                _ => return Err(err),
            },
        };

        // A record minted at the context block itself is never trusted:
        // same-height reads must see the live structure, hence the strict
        // comparison.
        let canonical = self.block_number > 0
            && record.origin_number < self.block_number
            && self
                .validator
                .is_canonical(record.origin_number, &record.origin_hash);

        if canonical {
            Ok(CachedLookup::Hit(record.value))
        } else {
            Ok(CachedLookup::Miss)
        }
    }

    /// Writes a logical key, swallowing errors.
    pub fn update(&mut self, key: &[u8], value: Vec<u8>) {
        if let Err(err) = self.try_update(key, value) {
            log::error!("unhandled cache update error: {err}");
        }
    }

    /// Writes a logical key through to the authoritative structure.
    ///
    /// The disk cache is never written here, only at commit. The key is
    /// marked dirty before the forwarded write, so even a failed write forces
    /// future reads back to the authoritative structure.
    pub fn try_update(&mut self, key: &[u8], value: Vec<u8>) -> CacheResult<()> {
        self.dirty.insert(key.to_vec());
        self.data.try_update(key, value)
    }

    /// Deletes a logical key, swallowing errors.
    pub fn delete(&mut self, key: &[u8]) {
        if let Err(err) = self.try_delete(key) {
            log::error!("unhandled cache delete error: {err}");
        }
    }

    /// Deletes a logical key through to the authoritative structure.
    ///
    /// Dirty-marking is unconditional, as for [`try_update`](Self::try_update).
    pub fn try_delete(&mut self, key: &[u8]) -> CacheResult<()> {
        self.dirty.insert(key.to_vec());
        self.data.try_delete(key)
    }

    /// Re-persists every dirty key and commits the authoritative structure.
    ///
    /// Each dirty key is re-read from the structure and written to `writer`
    /// as a [`CacheRecord`] stamped with this instance's context block. A
    /// missing state node is recorded as an absence; any other re-read error
    /// aborts the whole commit with the dirty set left intact for retry.
    /// Records already written by an aborted attempt are not rolled back:
    /// they carry their own provenance and will be re-validated on the next
    /// read rather than trusted blindly. On success the dirty set is cleared
    /// and the structure's own commit supplies the returned root.
    ///
    /// There is no atomicity across the record writes and the structure's
    /// root commit; a crash in between is tolerated for the same reason
    /// aborted attempts are.
    pub fn commit_to(&mut self, writer: &mut dyn StoreWriter) -> CacheResult<UInt256> {
        let keys: Vec<Vec<u8>> = self.dirty.iter().cloned().collect();
        for key in keys {
            let value = match self.data.try_get(&key) {
                Ok(value) => value,
                Err(err) => match err.commit_fallback() {
                    Some(Fallback::Absent) => None,
                    _ => return Err(err),
                },
            };
            self.put_cached(writer, &key, value)?;
        }
        self.dirty.clear();
        self.data.commit_to(writer)
    }

    fn put_cached(
        &self,
        writer: &mut dyn StoreWriter,
        key: &[u8],
        value: Option<Vec<u8>>,
    ) -> CacheResult<()> {
        write_direct_record(
            &self.key_prefix,
            key,
            value,
            self.block_number,
            &self.block_hash,
            writer,
            &self.metrics,
        )
    }

    /// Iterates the authoritative structure's current key/value pairs.
    ///
    /// Known limitation: with an exhaustive cache this could iterate the disk
    /// records instead of the structure, but correctness does not depend on
    /// that and the passthrough is kept.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_> {
        self.data.iter()
    }
}

pub(crate) fn make_cache_key(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    let mut cache_key = Vec::with_capacity(prefix.len() + key.len());
    cache_key.extend_from_slice(prefix);
    cache_key.extend_from_slice(key);
    cache_key
}

/// Persists a value directly into the store along with block metadata to
/// validate its relevancy, exactly as [`DirectCache::commit_to`] does.
///
/// Meant for code that circumvents the cache and its dirty-tracking, namely
/// fast sync and database upgrades. No validity judgment happens here; that
/// stays the caller's responsibility.
pub fn write_direct_record(
    prefix: &[u8],
    key: &[u8],
    value: Option<Vec<u8>>,
    number: u64,
    hash: &UInt256,
    writer: &mut dyn StoreWriter,
    metrics: &CacheMetrics,
) -> CacheResult<()> {
    metrics.record_write();
    let encoded = CacheRecord::new(value, number, *hash).to_bytes()?;
    writer.put(&make_cache_key(prefix, key), encoded)
}

/// Reads the raw record bytes stored for `prefix ++ key`, if any.
///
/// The counterpart of [`write_direct_record`] for callers that bypass the
/// cache. Decoding is left to the caller via [`CacheRecord::from_bytes`], so
/// decode errors surface there instead of being downgraded to a miss.
pub fn read_direct_record(
    prefix: &[u8],
    key: &[u8],
    db: &dyn Store,
    metrics: &CacheMetrics,
) -> CacheResult<Option<Vec<u8>>> {
    let start = Instant::now();
    let result = db.get(&make_cache_key(prefix, key));
    metrics.record_hit(start.elapsed());
    result
}
