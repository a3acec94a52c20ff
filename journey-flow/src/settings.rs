use std::time::Duration;

use crate::pricing::PremiumBasis;

/// Knobs injected into the screens when the journey graph is built
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JourneySettings {
    /// Simulated wait before an OTP is accepted
    pub otp_delay: Duration,
    /// Simulated wait while the customer link is dispatched
    pub link_send_delay: Duration,
    pub premium_basis: PremiumBasis,
}

impl Default for JourneySettings {
    fn default() -> Self {
        Self {
            otp_delay: Duration::from_millis(1500),
            link_send_delay: Duration::from_millis(2000),
            premium_basis: PremiumBasis::CatalogFlat,
        }
    }
}

impl JourneySettings {
    /// Settings without artificial delays, for tests and batch runs
    pub fn instant() -> Self {
        Self {
            otp_delay: Duration::ZERO,
            link_send_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
