//! Identity binding configuration.

use serde::{Deserialize, Serialize};

use crate::error::{IdentityError, Result};

/// Version of the identity binding scheme implemented by this crate.
pub const IDENTITY_BINDING_VERSION: &str = "1.0.0";

/// Per-instance settings for [`crate::IdentityBinding`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityBindingConfig {
    /// Reject memories that arrive without a signature.
    pub require_signatures: bool,
    /// Maximum signature age in hours; 0 disables expiry.
    pub signature_expiry_hours: u64,
    /// Whether the session APIs are usable.
    pub enable_cross_session: bool,
    /// Successful in-session verifications needed for trust. At least 1.
    pub trust_threshold: u32,
}

impl Default for IdentityBindingConfig {
    fn default() -> Self {
        Self {
            require_signatures: true,
            signature_expiry_hours: 0,
            enable_cross_session: true,
            trust_threshold: 3,
        }
    }
}

impl IdentityBindingConfig {
    pub fn with_require_signatures(mut self, require: bool) -> Self {
        self.require_signatures = require;
        self
    }

    pub fn with_signature_expiry_hours(mut self, hours: u64) -> Self {
        self.signature_expiry_hours = hours;
        self
    }

    pub fn with_cross_session(mut self, enabled: bool) -> Self {
        self.enable_cross_session = enabled;
        self
    }

    pub fn with_trust_threshold(mut self, threshold: u32) -> Self {
        self.trust_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.trust_threshold == 0 {
            return Err(IdentityError::InvalidConfig(
                "trustThreshold must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| IdentityError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
