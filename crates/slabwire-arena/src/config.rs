//! Arena configuration parameters.

use slabwire_core::SizeClass;

use crate::error::ConfigError;

/// Block geometry of a single size class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassConfig {
    /// Bytes per block.
    pub block_capacity: usize,
    /// Number of blocks pre-allocated for the class.
    pub block_count: usize,
}

impl ClassConfig {
    /// Create a class configuration.
    pub const fn new(block_capacity: usize, block_count: usize) -> Self {
        Self {
            block_capacity,
            block_count,
        }
    }

    /// Total bytes of backing storage for the class.
    pub fn region_bytes(&self) -> usize {
        self.block_capacity.saturating_mul(self.block_count)
    }
}

/// Configuration for the three size classes of an [`Arena`](crate::Arena).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Geometry of the small class. Every message starts here.
    pub small: ClassConfig,
    /// Geometry of the medium class.
    pub medium: ClassConfig,
    /// Geometry of the large class; its capacity bounds message size.
    pub large: ClassConfig,
}

impl ArenaConfig {
    /// Default small class: 1024 blocks of 4KB (4MB).
    pub const DEFAULT_SMALL: ClassConfig = ClassConfig::new(4 * 1024, 1024);

    /// Default medium class: 128 blocks of 128KB (16MB).
    pub const DEFAULT_MEDIUM: ClassConfig = ClassConfig::new(128 * 1024, 128);

    /// Default large class: 16 blocks of 1MB (16MB).
    pub const DEFAULT_LARGE: ClassConfig = ClassConfig::new(1024 * 1024, 16);

    /// Create a config from explicit class geometries.
    pub fn new(small: ClassConfig, medium: ClassConfig, large: ClassConfig) -> Self {
        Self {
            small,
            medium,
            large,
        }
    }

    /// Geometry of the given class.
    pub fn class(&self, class: SizeClass) -> ClassConfig {
        match class {
            SizeClass::Small => self.small,
            SizeClass::Medium => self.medium,
            SizeClass::Large => self.large,
        }
    }

    /// Largest message the arena can hold.
    pub fn max_message_len(&self) -> usize {
        self.large.block_capacity
    }

    /// Total backing storage across all classes, in bytes.
    pub fn total_bytes(&self) -> usize {
        SizeClass::ALL
            .iter()
            .map(|&c| self.class(c).region_bytes())
            .sum()
    }

    /// Check every class invariant the arena relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for class in SizeClass::ALL {
            let cfg = self.class(class);
            if cfg.block_capacity == 0 {
                return Err(ConfigError::ZeroCapacity { class });
            }
            if cfg.block_count == 0 {
                return Err(ConfigError::ZeroBlocks { class });
            }
            // Offsets are u32; the last block's start must be representable.
            let fits = cfg
                .block_capacity
                .checked_mul(cfg.block_count)
                .is_some_and(|bytes| bytes as u64 <= u64::from(u32::MAX) + 1);
            if !fits {
                return Err(ConfigError::RegionTooLarge { class });
            }
            if let Some(upper) = class.next() {
                if self.class(upper).block_capacity <= cfg.block_capacity {
                    return Err(ConfigError::NotIncreasing {
                        lower: class,
                        upper,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SMALL,
            Self::DEFAULT_MEDIUM,
            Self::DEFAULT_LARGE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let config = ArenaConfig::default();
        assert_eq!(config.small, ClassConfig::new(4096, 1024));
        assert_eq!(config.medium, ClassConfig::new(131_072, 128));
        assert_eq!(config.large, ClassConfig::new(1_048_576, 16));
        assert_eq!(config.max_message_len(), 1_048_576);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_total_is_36mb() {
        assert_eq!(ArenaConfig::default().total_bytes(), 36 * 1024 * 1024);
    }

    #[test]
    fn zero_capacity_rejected() {
        let mut config = ArenaConfig::default();
        config.medium.block_capacity = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity {
                class: SizeClass::Medium
            })
        );
    }

    #[test]
    fn zero_blocks_rejected() {
        let mut config = ArenaConfig::default();
        config.large.block_count = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroBlocks {
                class: SizeClass::Large
            })
        );
    }

    #[test]
    fn capacities_must_increase() {
        let config = ArenaConfig::new(
            ClassConfig::new(64, 4),
            ClassConfig::new(64, 4),
            ClassConfig::new(256, 2),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotIncreasing {
                lower: SizeClass::Small,
                upper: SizeClass::Medium,
            })
        );
    }

    #[test]
    fn oversized_region_rejected() {
        let config = ArenaConfig::new(
            ClassConfig::new(64, 4),
            ClassConfig::new(128, 4),
            ClassConfig::new(1 << 20, 1 << 13),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::RegionTooLarge {
                class: SizeClass::Large
            })
        );
    }
}
