//! Decoder Configuration
//!
//! Knobs for where to look for the entry point, how strictly to treat its
//! checksums, and how many records per type the decoded table keeps.

// =============================================================================
// CONSTANTS
// =============================================================================

/// Start of the legacy BIOS window searched for the entry point
pub const LEGACY_SCAN_BASE: u32 = 0x000F_0000;

/// Length of the legacy BIOS window (64 KiB)
pub const LEGACY_SCAN_LENGTH: u32 = 0x0001_0000;

/// Step that tries every offset in the window
pub const BYTE_ALIGNMENT: usize = 1;

/// Paragraph boundary named by DSP0134; firmware does not always honour it
pub const PARAGRAPH_ALIGNMENT: usize = 16;

// =============================================================================
// POLICIES
// =============================================================================

/// What to do when an entry point checksum does not sum to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Do not check
    Ignore,
    /// Log a warning and carry on
    #[default]
    Warn,
    /// Fail the decode with [`DmiError::ChecksumMismatch`](crate::DmiError::ChecksumMismatch)
    Reject,
}

/// How many decoded records the table keeps for one type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Keep every record, in table order
    #[default]
    All,
    /// Keep the first record seen
    First,
    /// Keep the last record seen (last-write-wins)
    Last,
}

// =============================================================================
// DECODER CONFIG
// =============================================================================

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Physical address of the window scanned for the anchor
    pub scan_base: u32,
    /// Length of the scanned window
    pub scan_length: u32,
    /// Step between candidate anchor offsets (1 scans every byte)
    pub anchor_alignment: usize,
    /// Checksum handling
    pub checksum_policy: ChecksumPolicy,
    /// Per-type retention
    pub retention: Retention,
}

impl DecoderConfig {
    /// Create default configuration
    pub const fn new() -> Self {
        Self {
            scan_base: LEGACY_SCAN_BASE,
            scan_length: LEGACY_SCAN_LENGTH,
            anchor_alignment: BYTE_ALIGNMENT,
            checksum_policy: ChecksumPolicy::Warn,
            retention: Retention::All,
        }
    }

    /// Scan a different window for the entry point
    pub const fn with_scan_window(mut self, base: u32, length: u32) -> Self {
        self.scan_base = base;
        self.scan_length = length;
        self
    }

    /// Change the anchor alignment; zero is treated as one
    pub const fn with_anchor_alignment(mut self, alignment: usize) -> Self {
        self.anchor_alignment = if alignment == 0 { 1 } else { alignment };
        self
    }

    /// Change the checksum policy
    pub const fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum_policy = policy;
        self
    }

    /// Change the retention policy
    pub const fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Legacy behaviour: one value per type, last record wins
    pub const fn legacy() -> Self {
        Self::new().with_retention(Retention::Last)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.scan_base, 0xF0000);
        assert_eq!(config.scan_length, 0x10000);
        assert_eq!(config.anchor_alignment, BYTE_ALIGNMENT);
        assert_eq!(config.checksum_policy, ChecksumPolicy::Warn);
        assert_eq!(config.retention, Retention::All);
    }

    #[test]
    fn test_builders() {
        let config = DecoderConfig::new()
            .with_scan_window(0x1000, 0x200)
            .with_anchor_alignment(PARAGRAPH_ALIGNMENT)
            .with_checksum_policy(ChecksumPolicy::Reject);
        assert_eq!(config.scan_base, 0x1000);
        assert_eq!(config.scan_length, 0x200);
        assert_eq!(config.anchor_alignment, 16);
        assert_eq!(config.with_anchor_alignment(0).anchor_alignment, 1);
        assert_eq!(config.checksum_policy, ChecksumPolicy::Reject);
        assert_eq!(DecoderConfig::legacy().retention, Retention::Last);
    }
}
