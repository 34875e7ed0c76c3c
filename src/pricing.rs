//! Warehouse credit and cost estimation
//!
//! Credits are derived from bytes scanned: one credit per `gb_per_credit`
//! gigabytes, where a gigabyte is `bytes_per_gb` bytes.

use serde::{Deserialize, Serialize};

/// Warehouse edition, selecting the per-credit price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Standard,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditionPricing {
    pub cost_per_credit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub standard: EditionPricing,
    pub enterprise: EditionPricing,
    pub bytes_per_gb: f64,
    pub gb_per_credit: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard: EditionPricing {
                cost_per_credit: 2.0,
            },
            enterprise: EditionPricing {
                cost_per_credit: 3.0,
            },
            bytes_per_gb: 1024.0 * 1024.0 * 1024.0,
            gb_per_credit: 10.0,
        }
    }
}

impl PricingConfig {
    pub fn cost_per_credit(&self, edition: Edition) -> f64 {
        match edition {
            Edition::Standard => self.standard.cost_per_credit,
            Edition::Enterprise => self.enterprise.cost_per_credit,
        }
    }

    /// Credits consumed for `bytes_scanned`, rounded to 4 decimals
    ///
    /// # Example
    /// ```
    /// use modeldiff::pricing::PricingConfig;
    ///
    /// let pricing = PricingConfig::default();
    /// assert_eq!(pricing.calculate_credits(1_099_511_627_776), 102.4); // 1 TiB
    /// ```
    pub fn calculate_credits(&self, bytes_scanned: u64) -> f64 {
        let bytes_per_credit = self.bytes_per_gb * self.gb_per_credit;
        if bytes_per_credit <= 0.0 {
            return 0.0;
        }
        round_to(bytes_scanned as f64 / bytes_per_credit, 4)
    }

    /// Estimated USD cost for `credits`, rounded to cents
    pub fn calculate_cost(&self, credits: f64, edition: Edition) -> f64 {
        round_to(credits * self.cost_per_credit(edition), 2)
    }
}

/// Round to `decimals` places, ties to even
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
