//! Integration tests for missing-table name suggestions.
//!
//! The ranking is intentionally cheap and deterministic: leading-character
//! overlap ahead of substring containment, shorter names breaking ties,
//! capped at three.

use pg_mcp_server::db::schema::suggest_table_names;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// A transposed table name still finds its neighbors, ranked ahead of
/// anything that merely contains the text.
#[test]
fn test_typo_finds_prefix_neighbors() {
    let existing = names(&["users", "user_roles", "products"]);
    let suggestions = suggest_table_names("usres", &existing);

    assert_eq!(suggestions, vec!["users", "user_roles"]);
}

/// Suggestions never exceed three entries, even with many candidates.
#[test]
fn test_suggestions_capped_at_three() {
    let existing = names(&[
        "user_roles",
        "user_sessions",
        "user_tokens",
        "user_events",
        "users",
    ]);
    let suggestions = suggest_table_names("usrs", &existing);

    assert_eq!(suggestions.len(), 3);
    // Shorter candidate wins the tiebreak within the same rank
    assert_eq!(suggestions[0], "users");
}

/// Candidates that neither line up at the front nor contain the requested
/// name are not suggested at all.
#[test]
fn test_unrelated_names_excluded() {
    let existing = names(&["products", "invoices", "payments"]);
    let suggestions = suggest_table_names("usres", &existing);

    assert!(suggestions.is_empty());
}

/// A substring match is still offered when nothing shares a prefix.
#[test]
fn test_substring_fallback() {
    let existing = names(&["archived_orders"]);
    let suggestions = suggest_table_names("orders", &existing);

    assert_eq!(suggestions, vec!["archived_orders"]);
}

/// Prefix matches always outrank substring matches.
#[test]
fn test_prefix_outranks_substring() {
    let existing = names(&["archived_orders", "orders_2024"]);
    let suggestions = suggest_table_names("orders", &existing);

    assert_eq!(suggestions[0], "orders_2024");
    assert_eq!(suggestions[1], "archived_orders");
}

/// Matching is case-insensitive but suggestions keep original casing.
#[test]
fn test_case_insensitive_matching() {
    let existing = names(&["Users"]);
    let suggestions = suggest_table_names("usres", &existing);

    assert_eq!(suggestions, vec!["Users"]);
}

/// An empty candidate set yields an empty suggestion list.
#[test]
fn test_no_candidates() {
    let suggestions = suggest_table_names("usres", &[]);
    assert!(suggestions.is_empty());
}
