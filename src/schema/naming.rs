//! Identifier normalization for tables, columns and constraints

/// Lower-case snake identifier split on word boundaries.
///
/// `OrderItem` → `order_item`, `HTTPRequest` → `http_request`,
/// `"phone number"` → `phone_number`. A leading digit is escaped with `_`.
pub fn snake_identifier(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !out.is_empty() && !out.ends_with('_') {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || (prev.is_uppercase() && next_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    let trimmed = out.trim_end_matches('_');
    match trimmed.chars().next() {
        None => "_".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{}", trimmed),
        Some(_) => trimmed.to_string(),
    }
}

/// Table name for an entity
pub fn table_name(entity: &str) -> String {
    snake_identifier(entity)
}

/// Column name for an attribute
pub fn column_name(attribute: &str) -> String {
    snake_identifier(attribute)
}

/// Foreign key column pointing at `table`
pub fn foreign_key_column(table: &str) -> String {
    format!("{}_id", table)
}

pub fn junction_table_name(source: &str, target: &str) -> String {
    format!("{}_{}", source, target)
}

/// Constraint name in the `fk_<table>_<column>` form
pub fn constraint_name(table: &str, column: &str) -> String {
    format!(
        "fk_{}_{}",
        sanitize_constraint_name(table),
        sanitize_constraint_name(column)
    )
}

fn sanitize_constraint_name(name: &str) -> String {
    name.replace(['-', '.', ' '], "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_identifier() {
        assert_eq!(snake_identifier("OrderItem"), "order_item");
        assert_eq!(snake_identifier("Customer"), "customer");
        assert_eq!(snake_identifier("HTTPRequest"), "http_request");
        assert_eq!(snake_identifier("phone number"), "phone_number");
        assert_eq!(snake_identifier("already_snake"), "already_snake");
        assert_eq!(snake_identifier("Order  Line--Item"), "order_line_item");
    }

    #[test]
    fn test_leading_digit_escaped() {
        assert_eq!(snake_identifier("3DModel"), "_3d_model");
        assert_eq!(snake_identifier("2fa"), "_2fa");
    }

    #[test]
    fn test_empty_identifier() {
        assert_eq!(snake_identifier(""), "_");
        assert_eq!(snake_identifier("--"), "_");
    }

    #[test]
    fn test_constraint_name() {
        assert_eq!(constraint_name("order", "customer_id"), "fk_order_customer_id");
        assert_eq!(constraint_name("chart-of-accounts", "Bank.Id"), "fk_chart_of_accounts_bank_id");
    }
}
