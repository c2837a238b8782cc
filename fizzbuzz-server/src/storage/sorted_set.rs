//! Embedded sorted set implementation
//!
//! Provides Redis-compatible sorted sets with dual data structure:
//! - HashMap for O(1) member-to-score lookups
//! - BTreeMap for O(log n) range queries and ranking
//!
//! Backs the frequency ranking when no external Redis is configured.

use super::{BackendResult, RankedSetBackend};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use tracing::debug;

const SHARD_COUNT: usize = 16;

/// Wrapper for f64 that provides total ordering
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        // Handle NaN by treating it as less than everything
        match (self.0.is_nan(), other.0.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal),
        }
    }
}

/// A member-score pair in a sorted set
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

impl From<ScoredMember> for (String, f64) {
    fn from(scored: ScoredMember) -> Self {
        (scored.member, scored.score)
    }
}

/// A sorted set with dual data structure
#[derive(Debug, Default)]
pub struct SortedSetValue {
    /// Member -> Score mapping (O(1) lookup)
    scores: HashMap<String, OrderedFloat>,
    /// (Score, Member) sorted index (O(log n) range queries)
    sorted: BTreeMap<(OrderedFloat, String), ()>,
}

impl SortedSetValue {
    /// Create a new empty sorted set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get score of a member
    pub fn zscore(&self, member: &str) -> Option<f64> {
        self.scores.get(member).map(|s| s.get())
    }

    /// Get cardinality (count of members)
    pub fn zcard(&self) -> usize {
        self.scores.len()
    }

    /// Increment score of member
    /// Returns new score
    pub fn zincrby(&mut self, member: &str, increment: f64) -> f64 {
        let old = self.scores.get(member).copied();
        let new_score = old.map(|s| s.get()).unwrap_or(0.0) + increment;

        if let Some(old) = old {
            self.sorted.remove(&(old, member.to_string()));
        }

        let ordered = OrderedFloat::new(new_score);
        self.scores.insert(member.to_string(), ordered);
        self.sorted.insert((ordered, member.to_string()), ());

        new_score
    }

    /// Get reverse range by rank (0-based, inclusive, negative indices count from the end)
    pub fn zrevrange(&self, start: i64, stop: i64) -> Vec<ScoredMember> {
        let len = self.scores.len() as i64;
        if len == 0 {
            return Vec::new();
        }

        // Convert negative indices
        let start = if start < 0 { len + start } else { start };
        let stop = if stop < 0 { len + stop } else { stop };

        // Clamp to valid range
        let start = start.max(0) as usize;
        let stop = (stop + 1).min(len).max(0) as usize;

        if start >= stop {
            return Vec::new();
        }

        self.sorted
            .keys()
            .rev()
            .skip(start)
            .take(stop - start)
            .map(|(score, member)| ScoredMember {
                member: member.clone(),
                score: score.get(),
            })
            .collect()
    }

    /// Members with `min <= score <= max`, ascending by score then member
    pub fn zrangebyscore(
        &self,
        min: f64,
        max: f64,
        offset: usize,
        count: Option<usize>,
    ) -> Vec<ScoredMember> {
        let max_key = OrderedFloat::new(max);

        self.sorted
            .range((OrderedFloat::new(min), String::new())..)
            .map(|(key, _)| key)
            .take_while(|(score, _)| *score <= max_key)
            .skip(offset)
            .take(count.unwrap_or(usize::MAX))
            .map(|(score, member)| ScoredMember {
                member: member.clone(),
                score: score.get(),
            })
            .collect()
    }
}

/// Sorted Set store with sharding by set name
pub struct SortedSetStore {
    shards: Vec<RwLock<HashMap<String, SortedSetValue>>>,
}

impl SortedSetStore {
    /// Create a new sorted set store
    pub fn new() -> Self {
        Self {
            shards: (0..SHARD_COUNT)
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
        }
    }

    /// Get shard for key
    fn shard(&self, key: &str) -> &RwLock<HashMap<String, SortedSetValue>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() % SHARD_COUNT as u64) as usize]
    }

    /// Get score of member
    pub fn zscore(&self, key: &str, member: &str) -> Option<f64> {
        let map = self.shard(key).read();
        map.get(key).and_then(|zset| zset.zscore(member))
    }

    /// Get cardinality
    pub fn zcard(&self, key: &str) -> usize {
        let map = self.shard(key).read();
        map.get(key).map(|zset| zset.zcard()).unwrap_or(0)
    }

    /// Increment score under the shard write lock
    pub fn zincrby(&self, key: &str, member: &str, increment: f64) -> f64 {
        let mut map = self.shard(key).write();
        let zset = map.entry(key.to_string()).or_default();
        zset.zincrby(member, increment)
    }

    /// Get reverse range by rank
    pub fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Vec<ScoredMember> {
        let map = self.shard(key).read();
        map.get(key)
            .map(|zset| zset.zrevrange(start, stop))
            .unwrap_or_default()
    }

    /// Get range by score
    pub fn zrangebyscore(
        &self,
        key: &str,
        min: f64,
        max: f64,
        offset: usize,
        count: Option<usize>,
    ) -> Vec<ScoredMember> {
        let map = self.shard(key).read();
        map.get(key)
            .map(|zset| zset.zrangebyscore(min, max, offset, count))
            .unwrap_or_default()
    }

    /// Delete a sorted set
    pub fn delete(&self, key: &str) -> bool {
        let mut map = self.shard(key).write();
        map.remove(key).is_some()
    }
}

impl Default for SortedSetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RankedSetBackend for SortedSetStore {
    async fn zincrby(&self, set: &str, increment: f64, member: &str) -> BackendResult<f64> {
        debug!("ZINCRBY set={}, member={}, increment={}", set, member, increment);
        Ok(SortedSetStore::zincrby(self, set, member, increment))
    }

    async fn zrevrange_withscores(
        &self,
        set: &str,
        start: isize,
        stop: isize,
    ) -> BackendResult<Vec<(String, f64)>> {
        debug!("ZREVRANGE set={}, start={}, stop={}", set, start, stop);
        Ok(SortedSetStore::zrevrange(self, set, start as i64, stop as i64)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn zrangebyscore_withscores(
        &self,
        set: &str,
        min: f64,
        max: f64,
        offset: isize,
        count: isize,
    ) -> BackendResult<Vec<(String, f64)>> {
        debug!("ZRANGEBYSCORE set={}, min={}, max={}", set, min, max);
        // Negative count means no limit, as in Redis
        let count = usize::try_from(count).ok();
        let offset = usize::try_from(offset).unwrap_or(0);
        Ok(
            SortedSetStore::zrangebyscore(self, set, min, max, offset, count)
                .into_iter()
                .map(Into::into)
                .collect(),
        )
    }

    async fn del(&self, set: &str) -> BackendResult<bool> {
        debug!("DEL set={}", set);
        Ok(self.delete(set))
    }
}
