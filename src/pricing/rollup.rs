//! Budget roll-up aggregator
//!
//! Folds priced lines and indirect-cost rules into the budget totals, and
//! partitions lines into category or section groups for display. Every
//! function here is pure: same inputs, same outputs, bit for bit.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ApuError, ApuResult};
use crate::models::numeric::checked_sum;
use crate::models::{IndirectCostRule, LineItem, ResourceCategory, Section, SectionId};

/// The roll-up result of a set of lines and indirect costs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAggregate {
    /// Sum of all line totals
    pub direct_total: Decimal,

    /// Sum of all indirect cost amounts
    pub indirect_total: Decimal,

    /// Direct plus indirect
    pub grand_total: Decimal,

    /// Indirect cost rules with their amounts filled in
    pub indirect_costs: Vec<IndirectCostRule>,
}

/// Compute the budget totals
///
/// Rule amounts are recomputed from the direct total, overwriting whatever
/// amount the input rules carried.
pub fn compute_aggregate(lines: &[LineItem], rules: &[IndirectCostRule]) -> BudgetAggregate {
    let direct_total = direct_total(lines);

    let indirect_costs: Vec<IndirectCostRule> = rules
        .iter()
        .map(|rule| IndirectCostRule {
            amount: rule.amount_for(direct_total),
            ..rule.clone()
        })
        .collect();

    let indirect_total = checked_sum(indirect_costs.iter().map(|r| r.amount));
    let grand_total = direct_total
        .checked_add(indirect_total)
        .unwrap_or(Decimal::ZERO);

    BudgetAggregate {
        direct_total,
        indirect_total,
        grand_total,
        indirect_costs,
    }
}

/// Sum of line totals
pub fn direct_total(lines: &[LineItem]) -> Decimal {
    checked_sum(lines.iter().map(LineItem::total))
}

/// Lines of one resource category
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    pub category: ResourceCategory,
    pub items: Vec<&'a LineItem>,
    pub subtotal: Decimal,
}

/// Lines of one budget section
#[derive(Debug, Clone)]
pub struct SectionGroup<'a> {
    pub section: &'a Section,
    pub items: Vec<&'a LineItem>,
    pub subtotal: Decimal,
}

/// Partition lines by resource category
///
/// Groups follow the fixed category order (materials, equipment, labor,
/// transport); categories without lines are left out. Within a group the
/// input order is kept.
pub fn group_by_category(lines: &[LineItem]) -> Vec<CategoryGroup<'_>> {
    ResourceCategory::all()
        .iter()
        .filter_map(|&category| {
            let items: Vec<&LineItem> = lines.iter().filter(|l| l.category() == category).collect();
            if items.is_empty() {
                return None;
            }
            let subtotal = checked_sum(items.iter().map(|l| l.total()));
            Some(CategoryGroup {
                category,
                items,
                subtotal,
            })
        })
        .collect()
}

/// Partition lines by section
///
/// Groups follow ascending section `order` (ties keep the slice order) and
/// every section gets a group, even when empty. Lines without a section
/// belong to the default section. A line pointing at a section absent from
/// `sections` is rejected rather than reassigned.
pub fn group_by_section<'a>(
    lines: &'a [LineItem],
    sections: &'a [Section],
) -> ApuResult<Vec<SectionGroup<'a>>> {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| s.order);

    let mut buckets: HashMap<SectionId, Vec<&LineItem>> =
        ordered.iter().map(|s| (s.id, Vec::new())).collect();

    for line in lines {
        let section_id = line.section_id.unwrap_or_else(SectionId::default_section);
        match buckets.get_mut(&section_id) {
            Some(bucket) => bucket.push(line),
            None => return Err(ApuError::MissingTargetSection(section_id.to_string())),
        }
    }

    Ok(ordered
        .into_iter()
        .map(|section| {
            let items = buckets.remove(&section.id).unwrap_or_default();
            let subtotal = checked_sum(items.iter().map(|l| l.total()));
            SectionGroup {
                section,
                items,
                subtotal,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, DefaultIndirectCost, DEFAULT_SECTION_NAME};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scenario_lines() -> Vec<LineItem> {
        let mut brick = LineItem::from_catalog(&CatalogItem::new(
            1,
            "Brick",
            "u",
            d("1000"),
            ResourceCategory::Materials,
        ))
        .with_quantity(d("2"));
        brick.set_waste_percentage(d("10"));

        let mut mason = LineItem::from_catalog(&CatalogItem::new(
            2,
            "Mason",
            "day",
            d("500"),
            ResourceCategory::Labor,
        ))
        .with_quantity(d("4"));
        mason.set_performance(d("2"));

        let truck = LineItem::from_catalog(&CatalogItem::new(
            3,
            "Truck",
            "trip",
            d("3000"),
            ResourceCategory::Transport,
        ));

        vec![brick, mason, truck]
    }

    fn default_rules() -> Vec<IndirectCostRule> {
        DefaultIndirectCost::all().iter().map(|r| r.to_rule()).collect()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let lines = scenario_lines();
        assert_eq!(lines[0].total(), d("2200"));
        assert_eq!(lines[1].total(), d("1000"));
        assert_eq!(lines[2].total(), d("3000"));

        let aggregate = compute_aggregate(&lines, &default_rules());
        assert_eq!(aggregate.direct_total, d("6200"));
        assert_eq!(aggregate.indirect_costs[0].amount, d("620"));
        assert_eq!(aggregate.indirect_costs[1].amount, d("310"));
        assert_eq!(aggregate.indirect_costs[2].amount, d("930"));
        assert_eq!(aggregate.indirect_total, d("1860"));
        assert_eq!(aggregate.grand_total, d("8060"));
    }

    #[test]
    fn test_empty_aggregate_is_zero() {
        let aggregate = compute_aggregate(&[], &default_rules());
        assert_eq!(aggregate.direct_total, Decimal::ZERO);
        assert_eq!(aggregate.indirect_total, Decimal::ZERO);
        assert_eq!(aggregate.grand_total, Decimal::ZERO);

        let aggregate = compute_aggregate(&[], &[]);
        assert_eq!(aggregate, BudgetAggregate::default());
    }

    #[test]
    fn test_direct_total_ignores_order() {
        let lines = scenario_lines();
        let mut reversed = lines.clone();
        reversed.reverse();
        let mut rotated = lines.clone();
        rotated.rotate_left(1);

        let expected = direct_total(&lines);
        assert_eq!(direct_total(&reversed), expected);
        assert_eq!(direct_total(&rotated), expected);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let lines = scenario_lines();
        let rules = default_rules();

        let first = compute_aggregate(&lines, &rules);
        let second = compute_aggregate(&lines, &rules);
        assert_eq!(first, second);

        // feeding computed rules back in does not compound
        let third = compute_aggregate(&lines, &first.indirect_costs);
        assert_eq!(first, third);
    }

    #[test]
    fn test_stale_rule_amounts_are_overwritten() {
        let mut rule = IndirectCostRule::new("profit", "Profit", d("15"));
        rule.amount = d("999999");
        let aggregate = compute_aggregate(&scenario_lines(), &[rule]);
        assert_eq!(aggregate.indirect_costs[0].amount, d("930"));
    }

    #[test]
    fn test_group_by_category_partitions() {
        let mut lines = scenario_lines();
        let mut sand = LineItem::from_catalog(&CatalogItem::new(
            4,
            "Sand",
            "m3",
            d("45"),
            ResourceCategory::Materials,
        ))
        .with_quantity(d("3"));
        sand.set_waste_percentage(d("5"));
        lines.push(sand);

        let groups = group_by_category(&lines);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].category, ResourceCategory::Materials);
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[0].items[0].name, "Brick");
        assert_eq!(groups[0].subtotal, d("2200") + d("141.75"));

        let count: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(count, lines.len());

        let subtotal_sum: Decimal = groups.iter().map(|g| g.subtotal).sum();
        assert_eq!(subtotal_sum, direct_total(&lines));
    }

    #[test]
    fn test_group_by_section_orders_and_partitions() {
        let default = Section::default_section(DEFAULT_SECTION_NAME);
        let finishes = Section::new("Finishes", 2);
        let structure = Section::new("Structure", 1);
        let sections = vec![default.clone(), finishes.clone(), structure.clone()];

        let mut lines = scenario_lines();
        lines[0].section_id = Some(structure.id);
        lines[1].section_id = Some(finishes.id);
        // lines[2] has no section and lands in the default one

        let groups = group_by_section(&lines, &sections).unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.section.name.as_str()).collect();
        assert_eq!(names, vec!["Preliminares", "Structure", "Finishes"]);

        assert_eq!(groups[0].subtotal, d("3000"));
        assert_eq!(groups[1].subtotal, d("2200"));
        assert_eq!(groups[2].subtotal, d("1000"));

        let count: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(count, lines.len());
        let subtotal_sum: Decimal = groups.iter().map(|g| g.subtotal).sum();
        assert_eq!(subtotal_sum, compute_aggregate(&lines, &[]).direct_total);
    }

    #[test]
    fn test_group_by_section_keeps_empty_sections() {
        let sections = vec![
            Section::default_section(DEFAULT_SECTION_NAME),
            Section::new("Empty", 1),
        ];
        let groups = group_by_section(&[], &sections).unwrap();
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.items.is_empty() && g.subtotal.is_zero()));
    }

    #[test]
    fn test_group_by_section_rejects_unknown_section() {
        let sections = vec![Section::default_section(DEFAULT_SECTION_NAME)];
        let mut lines = scenario_lines();
        lines[0].section_id = Some(SectionId::new());

        let result = group_by_section(&lines, &sections);
        assert!(matches!(result, Err(ApuError::MissingTargetSection(_))));
    }

    #[test]
    fn test_aggregate_boundary_shape() {
        let aggregate = compute_aggregate(&scenario_lines(), &default_rules());
        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(json["directTotal"], 6200.0);
        assert_eq!(json["indirectTotal"], 1860.0);
        assert_eq!(json["grandTotal"], 8060.0);
        assert_eq!(json["indirectCosts"][0]["id"], "administration");
        assert_eq!(json["indirectCosts"][0]["amount"], 620.0);
    }
}
