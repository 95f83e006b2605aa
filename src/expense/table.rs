//! Shared markup for rendering a list of expenses as a table.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        format_currency,
    },
};

use super::store::Expense;

/// A table of expenses, newest first.
///
/// When `show_actions` is set, each row gets a delete button that posts to
/// the delete endpoint.
pub(super) fn expense_table(expenses: &[Expense], show_actions: bool) -> Markup {
    html! {
        table class=(TABLE_STYLE) {
            thead class=(TABLE_HEADER_STYLE) {
                tr {
                    th class=(TABLE_CELL_STYLE) { "Date" }
                    th class=(TABLE_CELL_STYLE) { "Category" }
                    th class=(TABLE_CELL_STYLE) { "Description" }
                    th class=(TABLE_CELL_STYLE) { "Amount" }
                    @if show_actions {
                        th class=(TABLE_CELL_STYLE) { "" }
                    }
                }
            }

            tbody {
                @if expenses.is_empty() {
                    tr class=(TABLE_ROW_STYLE) {
                        td
                            class=(TABLE_CELL_STYLE)
                            colspan=(if show_actions { "5" } else { "4" })
                            data-empty-state="true"
                        {
                            "No expenses to show."
                        }
                    }
                }

                @for expense in expenses {
                    tr class=(TABLE_ROW_STYLE) data-expense-row="true" {
                        td class=(TABLE_CELL_STYLE) { (expense.date) }
                        td class=(TABLE_CELL_STYLE) { (expense.category) }
                        td class=(TABLE_CELL_STYLE) {
                            (expense.description.as_deref().unwrap_or(""))
                        }
                        td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                        @if show_actions {
                            td class=(TABLE_CELL_STYLE) {
                                button
                                    hx-post=(format_endpoint(endpoints::DELETE_EXPENSE, expense.id))
                                    class=(BUTTON_DELETE_STYLE)
                                {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
