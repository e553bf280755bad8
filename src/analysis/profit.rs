//! Fee and profit model for reselling on the marketplace.
//!
//! The fee schedule is a fixed business rule, not configuration: Vinted takes
//! 5% commission plus a 0.70 EUR fixed fee per sale, and a 4.99 EUR shipping
//! surcharge applies on the buying side when the deal does not ship free.

/// Marketplace commission on the resale price.
pub const COMMISSION_RATE: f64 = 0.05;

/// Fixed marketplace fee per sale, in EUR.
pub const SALE_FIXED_FEE: f64 = 0.70;

/// Shipping surcharge added to the purchase when the deal is not free-shipping.
pub const SHIPPING_SURCHARGE: f64 = 4.99;

/// Profit metrics for one deal against the average resale price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitEstimate {
    /// Deal price as listed
    pub purchase_price: f64,
    /// Deal price plus the shipping surcharge if applicable
    pub purchase_price_with_shipping: f64,
    /// Gross spread before fees and shipping
    pub potential_profit: f64,
    /// What the seller pockets from one average-priced sale after fees
    pub seller_net_receipt: f64,
    /// Net profit: receipt minus the shipping-inclusive purchase price;
    /// negative values are a valid outcome, not an error
    pub estimated_net_profit: f64,
    /// ROI in percent; None when the purchase price is zero
    pub profit_percentage: Option<f64>,
}

/// Computes the profit metrics for a source price against the average
/// resale price of the eligible sample.
pub fn estimate(source_price: f64, free_shipping: bool, average_selling_price: f64) -> ProfitEstimate {
    let surcharge = if free_shipping { 0.0 } else { SHIPPING_SURCHARGE };
    let purchase_price_with_shipping = source_price + surcharge;

    let seller_net_receipt = average_selling_price * (1.0 - COMMISSION_RATE) - SALE_FIXED_FEE;
    let estimated_net_profit = seller_net_receipt - purchase_price_with_shipping;

    let profit_percentage = if purchase_price_with_shipping > 0.0 {
        Some(100.0 * estimated_net_profit / purchase_price_with_shipping)
    } else {
        None
    };

    ProfitEstimate {
        purchase_price: source_price,
        purchase_price_with_shipping,
        potential_profit: average_selling_price - source_price,
        seller_net_receipt,
        estimated_net_profit,
        profit_percentage,
    }
}
