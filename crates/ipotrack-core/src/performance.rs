//! Debut-to-now performance arithmetic.

use crate::adapters::round2;
use crate::domain::{CurrentValue, PerformanceResult};
use crate::error::CoreError;

/// Compute absolute and percentage change from the IPO opening price to the
/// current value, both rounded to two decimals.
///
/// A sentinel label (delisted, merged, unknown) passes through with both
/// changes absent. A non-positive opening price is a data defect upstream
/// of this function and fails loudly rather than producing a division
/// artifact.
pub fn compute_performance(
    ipo_open_price: f64,
    current: CurrentValue,
) -> Result<PerformanceResult, CoreError> {
    if !ipo_open_price.is_finite() || ipo_open_price <= 0.0 {
        return Err(CoreError::NonPositiveOpenPrice {
            value: ipo_open_price,
        });
    }

    let (price_change, percent_change) = match current {
        CurrentValue::Price(price) => {
            let change = price - ipo_open_price;
            (
                Some(round2(change)),
                Some(round2(change / ipo_open_price * 100.0)),
            )
        }
        CurrentValue::Label(_) => (None, None),
    };

    Ok(PerformanceResult {
        ipo_open_price,
        current,
        price_change,
        percent_change,
    })
}
