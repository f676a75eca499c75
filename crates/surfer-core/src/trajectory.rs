//! The ordered result of a run, with hashing and binary snapshots.
//!
//! Snapshots are `bitcode` payloads behind a versioned header, so a stored
//! trajectory can be recognised and rejected before its steps are trusted.

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;
use crate::step::{Step, VectorQuantity};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a trajectory snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x5F5F_0001;

/// Snapshot layout version. Bump whenever `Step` changes shape.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A trajectory could not be encoded.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("failed to encode trajectory: {0}")]
    Encode(String),
}

/// A byte buffer is not a trajectory snapshot this build can read.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("not a trajectory snapshot (magic 0x{0:08X})")]
    InvalidMagic(u32),
    #[error("snapshot version {0} is no longer readable (current is {FORMAT_VERSION})")]
    UnsupportedVersion(u32),
    #[error("snapshot version {0} is newer than {FORMAT_VERSION}")]
    FutureVersion(u32),
    #[error("header claims {expected} steps, payload has {actual}")]
    StepCount { expected: u64, actual: u64 },
    #[error("failed to decode trajectory: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header stored in front of every trajectory snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    pub step_count: u64,
}

impl SnapshotHeader {
    /// Header for a payload of `step_count` steps.
    pub fn new(step_count: u64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            step_count,
        }
    }

    /// Check the magic number and version. The step count is checked
    /// against the payload once it is decoded.
    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        match self.version.cmp(&FORMAT_VERSION) {
            std::cmp::Ordering::Less => Err(DeserializeError::UnsupportedVersion(self.version)),
            std::cmp::Ordering::Greater => Err(DeserializeError::FutureVersion(self.version)),
            std::cmp::Ordering::Equal => Ok(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TrajectorySnapshot {
    header: SnapshotHeader,
    steps: Vec<Step>,
}

// ---------------------------------------------------------------------------
// StateHash
// ---------------------------------------------------------------------------

/// FNV-1a (64-bit) accumulator for comparing runs. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write(&v.to_le_bytes());
    }

    /// Feeds the bit pattern, so `0.0` and `-0.0` hash differently.
    pub fn write_f64(&mut self, v: f64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn write_quantity(&mut self, q: &Quantity) {
        self.write_f64(q.value());
        self.write(q.unit().symbol().as_bytes());
    }

    pub fn write_vector(&mut self, v: &VectorQuantity) {
        self.write_quantity(&v.magnitude);
        self.write_quantity(&v.direction);
    }

    /// Feed every field of a step, in declaration order.
    pub fn write_step(&mut self, step: &Step) {
        self.write_u64(step.step);
        self.write_i64(step.date.timestamp_millis());
        self.write_f64(step.location.lat);
        self.write_f64(step.location.lng);
        self.write_quantity(&step.solar_power);
        self.write_quantity(&step.solar_voltage);
        self.write_quantity(&step.battery_voltage);
        self.write_vector(&step.sea_current);
        match &step.drag {
            Some(drag) => {
                self.write(&[1]);
                self.write_quantity(drag);
            }
            None => self.write(&[0]),
        }
        self.write_quantity(&step.thrust);
        self.write_vector(&step.velocity);
        self.write(&[step.storm as u8]);
        self.write_quantity(&step.distance_from_start);
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Trajectory
// ---------------------------------------------------------------------------

/// Steps 1..=N of a run, in order. Step 0 is implicit and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    steps: Vec<Step>,
}

impl Trajectory {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn first(&self) -> Option<&Step> {
        self.steps.first()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Give up the steps without copying.
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }

    /// Number of steps in which the storm event fired.
    pub fn storm_count(&self) -> usize {
        self.steps.iter().filter(|s| s.storm).count()
    }

    /// Hash every step in order. Identical runs hash identically.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.steps.len() as u64);
        for step in &self.steps {
            h.write_step(step);
        }
        h.finish()
    }

    /// Encode the trajectory as a versioned binary snapshot.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, SerializeError> {
        let snapshot = TrajectorySnapshot {
            header: SnapshotHeader::new(self.steps.len() as u64),
            steps: self.steps.clone(),
        };
        bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Decode a snapshot, validating its header before trusting the steps.
    pub fn from_snapshot(data: &[u8]) -> Result<Self, DeserializeError> {
        let snapshot: TrajectorySnapshot =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        snapshot.header.validate()?;
        let actual = snapshot.steps.len() as u64;
        if snapshot.header.step_count != actual {
            return Err(DeserializeError::StepCount {
                expected: snapshot.header.step_count,
                actual,
            });
        }
        Ok(Self {
            steps: snapshot.steps,
        })
    }
}

impl From<Vec<Step>> for Trajectory {
    fn from(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for Trajectory {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use chrono::{TimeZone, Utc};

    fn two_steps() -> Trajectory {
        let config =
            SimConfig::starting_at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let mut first = Step::origin(&config);
        first.step = 1;
        let mut second = first.clone();
        second.step = 2;
        second.storm = true;
        Trajectory::from(vec![first, second])
    }

    fn encode_raw(header: SnapshotHeader, steps: Vec<Step>) -> Vec<u8> {
        bitcode::serialize(&TrajectorySnapshot { header, steps }).unwrap()
    }

    #[test]
    fn state_hash_deterministic() {
        let mut h1 = StateHash::new();
        h1.write_u64(42);
        h1.write_f64(1.5);
        let mut h2 = StateHash::new();
        h2.write_u64(42);
        h2.write_f64(1.5);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn state_hash_order_matters() {
        let mut h1 = StateHash::new();
        h1.write_u64(1);
        h1.write_u64(2);
        let mut h2 = StateHash::new();
        h2.write_u64(2);
        h2.write_u64(1);
        assert_ne!(h1.finish(), h2.finish());
    }

    #[test]
    fn trajectory_hash_sees_every_field() {
        let a = two_steps();
        let mut steps = a.clone().into_steps();
        steps[1].storm = false;
        let b = Trajectory::from(steps);
        assert_eq!(a.state_hash(), two_steps().state_hash());
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn snapshot_round_trip() {
        let trajectory = two_steps();
        let bytes = trajectory.to_snapshot().unwrap();
        let restored = Trajectory::from_snapshot(&bytes).unwrap();
        assert_eq!(restored, trajectory);
        assert_eq!(restored.storm_count(), 1);
    }

    #[test]
    fn snapshot_rejects_bad_magic() {
        let mut header = SnapshotHeader::new(0);
        header.magic = 0xDEAD_BEEF;
        let bytes = encode_raw(header, Vec::new());
        let err = Trajectory::from_snapshot(&bytes).unwrap_err();
        assert!(matches!(err, DeserializeError::InvalidMagic(0xDEAD_BEEF)));
    }

    #[test]
    fn snapshot_rejects_future_version() {
        let mut header = SnapshotHeader::new(0);
        header.version = FORMAT_VERSION + 1;
        let bytes = encode_raw(header, Vec::new());
        let err = Trajectory::from_snapshot(&bytes).unwrap_err();
        assert!(matches!(err, DeserializeError::FutureVersion(_)));
    }

    #[test]
    fn snapshot_rejects_step_count_mismatch() {
        let bytes = encode_raw(SnapshotHeader::new(5), two_steps().into_steps());
        let err = Trajectory::from_snapshot(&bytes).unwrap_err();
        assert!(matches!(
            err,
            DeserializeError::StepCount {
                expected: 5,
                actual: 2
            }
        ));
    }

    #[test]
    fn garbage_fails_to_decode() {
        let err = Trajectory::from_snapshot(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, DeserializeError::Decode(_)));
    }
}
