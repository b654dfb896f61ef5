use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanPrice {
    #[serde(default)]
    pub sales: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipPlan {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: PlanPrice,
    #[serde(default)]
    pub validity_in_months: Option<u32>,
    #[serde(default)]
    pub discount_percentage: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MembershipsResponse {
    #[serde(default)]
    pub memberships: Vec<MembershipPlan>,
}

/// Sale-price tiers: (sale price, validity in months, discount %).
/// Unmatched prices keep whatever the provider supplied.
const PRICE_TIERS: &[(f64, u32, u32)] = &[
    (15000.0, 6, 35),
    (25000.0, 12, 50),
    (35000.0, 18, 50),
    (50000.0, 24, 50),
    (65000.0, 36, 50),
    (100000.0, 42, 50),
];

pub fn apply_price_tier(plan: &mut MembershipPlan) {
    if let Some(&(_, validity, discount)) = PRICE_TIERS.iter().find(|(price, _, _)| *price == plan.price.sales) {
        plan.validity_in_months = Some(validity);
        plan.discount_percentage = Some(discount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_price(sales: f64) -> MembershipPlan {
        MembershipPlan {
            id: "m-1".to_string(),
            name: "Membership".to_string(),
            price: PlanPrice { sales },
            validity_in_months: Some(3),
            discount_percentage: Some(10),
        }
    }

    #[test]
    fn test_mapped_price_overrides_provider_values() {
        let mut plan = plan_with_price(25000.0);
        apply_price_tier(&mut plan);
        assert_eq!(plan.validity_in_months, Some(12));
        assert_eq!(plan.discount_percentage, Some(50));
    }

    #[test]
    fn test_lowest_tier_has_its_own_discount() {
        let mut plan = plan_with_price(15000.0);
        apply_price_tier(&mut plan);
        assert_eq!(plan.validity_in_months, Some(6));
        assert_eq!(plan.discount_percentage, Some(35));
    }

    #[test]
    fn test_unmapped_price_passes_provider_values_through() {
        let mut plan = plan_with_price(42000.0);
        apply_price_tier(&mut plan);
        assert_eq!(plan.validity_in_months, Some(3));
        assert_eq!(plan.discount_percentage, Some(10));
    }
}
