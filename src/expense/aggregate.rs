//! Running totals and per-category summaries over expense listings.

use std::cmp::Ordering;
use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use super::store::Expense;

/// The arithmetic sum of the amounts in `expenses`. Zero for an empty slice.
pub fn sum_amounts(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Group `expenses` by category and sum the amounts per group.
///
/// Category names are trimmed and title-cased before grouping, so "food" and
/// "Food " collapse into one bucket labelled "Food". The result is sorted by
/// total descending. Ties keep the order in which the categories were first
/// seen.
pub fn category_totals(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    let mut index_by_category: HashMap<String, usize> = HashMap::new();

    for expense in expenses {
        let label = title_case(expense.category.trim());

        match index_by_category.get(&label) {
            Some(&index) => totals[index].1 += expense.amount,
            None => {
                index_by_category.insert(label.clone(), totals.len());
                totals.push((label, expense.amount));
            }
        }
    }

    // Stable sort, so equal totals keep their first-seen order.
    totals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    totals
}

/// Upper-case the first letter of each word and lower-case the rest.
fn title_case(text: &str) -> String {
    text.split_word_bounds()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod aggregate_tests {
    use time::macros::date;

    use crate::{expense::store::Expense, user::UserID};

    use super::{category_totals, sum_amounts, title_case};

    fn expense_with(category: &str, amount: f64) -> Expense {
        Expense {
            id: 1,
            user_id: UserID::new(1),
            date: date!(2024 - 05 - 12),
            amount,
            category: category.to_owned(),
            description: None,
        }
    }

    #[test]
    fn sum_of_no_expenses_is_zero() {
        assert_eq!(sum_amounts(&[]), 0.0);
    }

    #[test]
    fn sum_includes_negative_amounts() {
        let expenses = [expense_with("Food", 10.0), expense_with("Food", -3.0)];

        assert_eq!(sum_amounts(&expenses), 7.0);
    }

    #[test]
    fn category_totals_collapse_case_and_whitespace_variants() {
        let expenses = [
            expense_with("food", 5.0),
            expense_with("Food ", 3.0),
            expense_with("Travel", 1.0),
        ];

        let totals = category_totals(&expenses);

        assert_eq!(
            totals,
            vec![("Food".to_owned(), 8.0), ("Travel".to_owned(), 1.0)]
        );
    }

    #[test]
    fn category_totals_sorted_descending_with_first_seen_tie_break() {
        let expenses = [
            expense_with("Rent", 5.0),
            expense_with("Travel", 5.0),
            expense_with("Food", 20.0),
        ];

        let totals = category_totals(&expenses);

        assert_eq!(
            totals,
            vec![
                ("Food".to_owned(), 20.0),
                ("Rent".to_owned(), 5.0),
                ("Travel".to_owned(), 5.0),
            ]
        );
    }

    #[test]
    fn title_case_handles_multiple_words() {
        assert_eq!(title_case("eating out"), "Eating Out");
        assert_eq!(title_case("GROCERIES"), "Groceries");
    }
}
