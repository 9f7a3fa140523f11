// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// API group of the template custom resources
pub const GROUP: &str = "genesis-mining.com";

/// API version of the template custom resources
pub const VERSION: &str = "v1beta1";

/// Finalizer placed on template resources so deletion can remove the mirrors first
pub const FINALIZER: &str = "genesis-mining.com/cluster-mirror";

/// Kubernetes annotation keys used by the operator
pub mod annotations {
    /// JSON of the last template declaration that was mirrored
    pub const LAST_APPLIED: &str = "genesis-mining.com/last-applied";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Retry policy for the namespace-created handler
pub mod namespace_retry {
    pub const ATTEMPTS: u32 = 5;
    pub const INITIAL_DELAY_SECS: u64 = 2;
    pub const MAX_DELAY_SECS: u64 = 60;
}
