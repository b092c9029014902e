//! Storage usage aggregation.
//!
//! Pure functions deriving dashboard metrics from user and file records.
//! All byte arithmetic is 64-bit; sums are order-independent. Nothing here
//! touches the network or the store, so both the API handlers and the
//! dashboard client reuse the same code paths.

use serde::{Deserialize, Serialize};

use crate::models::file::StoredFile;
use crate::models::user::{User, UserResponse};

/// Bytes in the 20 GiB starter plan, priced at 20 € — display metric only.
const PLAN_BYTES: f64 = 21_474_836_480.0;
const PLAN_PRICE_EUR: f64 = 20.0;

/// Derived storage usage for a single account. Computed fresh per request,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Sum of all file sizes, in bytes.
    pub used_storage: u64,
    /// Quota minus usage; negative when the account is over quota.
    pub available_storage: i64,
}

/// Fleet-wide metrics for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetMetrics {
    /// Total purchased storage across all users, in bytes.
    pub total_bought: u64,
    /// Total bytes consumed across all users' files.
    pub total_used: u64,
    pub total_files: u64,
    pub user_count: u64,
}

impl FleetMetrics {
    pub const ZERO: FleetMetrics = FleetMetrics {
        total_bought: 0,
        total_used: 0,
        total_files: 0,
        user_count: 0,
    };
}

/// Anything with a storage quota and a file collection. Implemented for
/// both the store-side record and the API DTO so the aggregation runs
/// unchanged on either side of the wire.
pub trait StorageAccount {
    fn quota(&self) -> u64;
    fn files(&self) -> &[StoredFile];
}

impl StorageAccount for User {
    fn quota(&self) -> u64 {
        self.total_user_storage
    }
    fn files(&self) -> &[StoredFile] {
        &self.files
    }
}

impl StorageAccount for UserResponse {
    fn quota(&self) -> u64 {
        self.total_user_storage
    }
    fn files(&self) -> &[StoredFile] {
        &self.files
    }
}

/// Compute one account's usage. Empty file list yields zero usage and the
/// full quota available.
pub fn compute_usage<A: StorageAccount>(account: &A) -> StorageUsage {
    let used_storage: u64 = account.files().iter().map(|f| f.size).sum();
    // Widen before subtracting so quotas beyond i64 range cannot wrap.
    let available = account.quota() as i128 - used_storage as i128;
    StorageUsage {
        used_storage,
        available_storage: available.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
    }
}

/// Aggregate metrics over the whole fleet. An empty fleet is all zeros,
/// not an error.
pub fn aggregate_fleet<A: StorageAccount>(accounts: &[A]) -> FleetMetrics {
    let mut metrics = FleetMetrics::ZERO;
    for account in accounts {
        metrics.total_bought += account.quota();
        metrics.total_used += account.files().iter().map(|f| f.size).sum::<u64>();
        metrics.total_files += account.files().len() as u64;
        metrics.user_count += 1;
    }
    metrics
}

/// Revenue estimate shown on the admin dashboard. Display-only: floating
/// point is acceptable here and nowhere else in the aggregation.
pub fn revenue_estimate(total_bought: u64) -> f64 {
    total_bought as f64 / PLAN_BYTES * PLAN_PRICE_EUR
}
