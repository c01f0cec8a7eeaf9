//! Summary cards and the date range selector shown above the chart.

use maud::{Markup, html};

use crate::{
    aggregation::{DateRangeKey, Totals},
    html::format_currency,
};

/// Renders the total income, total expenses and net balance cards.
pub(crate) fn totals_cards(totals: &Totals) -> Markup {
    let net = totals.net();
    let net_style = if net >= 0.0 {
        "text-green-600 dark:text-green-500"
    } else {
        "text-red-600 dark:text-red-500"
    };

    html! {
        section id="totals" class="grid grid-cols-1 md:grid-cols-3 gap-4 w-full mb-4"
        {
            (card("Total Income", totals.income, "text-green-600 dark:text-green-500"))
            (card("Total Expenses", totals.expense, "text-red-600 dark:text-red-500"))
            (card("Net Balance", net, net_style))
        }
    }
}

fn card(title: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class={ "text-2xl font-bold " (amount_style) } data-amount=(amount)
            {
                (format_currency(amount))
            }
        }
    }
}

/// Renders a link per date range preset, highlighting `current`.
///
/// Each link points at `page_url` with the preset in the `range` query parameter.
pub(crate) fn range_selector(page_url: &str, current: DateRangeKey) -> Markup {
    html! {
        nav id="range-selector" aria-label="Date range" class="flex flex-wrap gap-2 mb-4"
        {
            @for key in DateRangeKey::ALL_KEYS {
                @let is_current = key == current;
                a
                    href={ (page_url) "?range=" (key.as_str()) }
                    title=(key.label())
                    aria-current=[is_current.then_some("page")]
                    class=(if is_current {
                        "px-3 py-1 rounded text-sm font-semibold bg-blue-600 text-white"
                    } else {
                        "px-3 py-1 rounded text-sm font-semibold text-gray-700 bg-gray-100
                        hover:bg-gray-200 dark:bg-gray-700 dark:text-gray-200"
                    })
                {
                    (key.as_str())
                }
            }
        }
    }
}
