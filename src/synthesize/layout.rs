//! Deterministic grid layout

use crate::schema::dependency_ordering::{dependency_depths, TableInfo};
use crate::schema::{Position, Table};
use std::collections::HashMap;

const ORIGIN: i32 = 50;
const LAYER_SPACING: i32 = 320;
const ROW_SPACING: i32 = 240;

/// Place tables in columns by foreign key depth: referenced tables on the
/// left, dependents to their right. Within a column, declaration order runs
/// top to bottom.
pub(crate) fn assign_positions(tables: &mut [Table]) {
    let infos = TableInfo::from_tables(tables);
    let depths = dependency_depths(&infos);
    let mut rows: HashMap<usize, i32> = HashMap::new();

    for table in tables.iter_mut() {
        let depth = depths.get(&table.name).copied().unwrap_or(0);
        let row = rows.entry(depth).or_insert(0);
        table.position = Position {
            x: ORIGIN + depth as i32 * LAYER_SPACING,
            y: ORIGIN + *row * ROW_SPACING,
        };
        *row += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnReference};

    #[test]
    fn test_layers_follow_dependencies() {
        let customer = Table::new("customer");
        let product = Table::new("product");
        let mut order = Table::new("order");
        order.add_column(Column::foreign_key(
            "customer_id",
            "INTEGER",
            ColumnReference::cascade("customer", "id"),
        ));
        let mut tables = vec![order, customer, product];
        assign_positions(&mut tables);

        assert_eq!(tables[0].position, Position { x: 370, y: 50 });
        assert_eq!(tables[1].position, Position { x: 50, y: 50 });
        assert_eq!(tables[2].position, Position { x: 50, y: 290 });
    }
}
