use maud::{DOCTYPE, Markup, html};

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

/// The symbol shown in front of every amount of money.
pub const CURRENCY_SYMBOL: &str = "¥";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-cyan-600 \
    disabled:bg-gray-500 disabled:cursor-not-allowed hover:enabled:bg-cyan-700 \
    text-white font-bold rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "px-8 py-3 text-white font-bold \
    bg-gray-600 hover:bg-gray-700 rounded";

pub const BUTTON_SUCCESS_STYLE: &str = "px-8 py-3 text-white font-bold \
    bg-green-600 hover:bg-green-700 rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-400 dark:hover:text-red-300 font-semibold bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-cyan-600 focus:border-cyan-600 \
    focus:dark:border-cyan-500 focus:dark:ring-cyan-500";
pub const FORM_ERROR_STYLE: &str = "text-red-600 dark:text-red-400 text-sm";

// Card styles
pub const CARD_STYLE: &str = "p-6 rounded-xl shadow-lg bg-white border \
    border-gray-200 dark:bg-gray-800 dark:border-gray-700";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The max number of graphemes of a member's name to show on a selection button.
pub const MAX_NAME_GRAPHEMES: usize = 16;

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Reimbursement Tracker" }

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/dist/response-targets.js" {}

                script src="/static/app.js" defer {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-cyan-600 dark:text-cyan-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-cyan-600
                            hover:bg-cyan-800 focus:ring-4 focus:outline-hidden
                            focus:ring-cyan-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-cyan-900 my-4"
                    {
                        "Back to Homepage"
                    }
                }
            }
        }
    );

    base(title, &content)
}

/// Page heading with a subtitle, shared by the home and tracker views.
pub fn page_header(title: &str, subtitle: &str) -> Markup {
    html!(
        header class="text-center mb-10"
        {
            h1
                class="text-4xl md:text-5xl font-extrabold text-transparent
                    bg-clip-text bg-gradient-to-r from-cyan-400 to-blue-600"
            {
                (title)
            }

            p class="text-gray-500 dark:text-gray-400 mt-2" { (subtitle) }
        }
    )
}

/// Format an amount of money, e.g. "¥1,234.50".
///
/// The amount is rounded to the nearest cent.
pub fn format_currency(number: f64) -> String {
    if !number.is_finite() {
        return format!("{CURRENCY_SYMBOL}{number}");
    }

    let cents = (number * 100.0).round();
    let rounded = if cents.is_finite() {
        cents / 100.0
    } else {
        number
    };

    if rounded == 0.0 {
        // Also catches -0.0 and amounts that round away to nothing.
        return format!("{CURRENCY_SYMBOL}0.00");
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    let abs = rounded.abs();

    let mut digits = if abs < NUMFMT_LIMIT {
        static FMT: OnceLock<Formatter> = OnceLock::new();

        let fmt = FMT.get_or_init(|| {
            Formatter::new()
                .separator(',')
                .expect("comma should be a valid numfmt separator")
                .precision(Precision::Decimals(2))
        });

        fmt.fmt_string(abs)
    } else {
        group_thousands(&format!("{abs:.2}"))
    };

    // numfmt omits trailing zeros, so we must add them ourselves.
    // For example, "12.30" is rendered as "12.3" so we append "0".
    match digits.rfind('.') {
        Some(point) => {
            let decimals = digits.len() - point - 1;
            for _ in decimals..2 {
                digits.push('0');
            }
        }
        None => digits.push_str(".00"),
    }

    format!("{sign}{CURRENCY_SYMBOL}{digits}")
}

/// numfmt switches to scientific notation from twelve integer digits.
const NUMFMT_LIMIT: f64 = 1e12;

/// Insert commas between groups of three integer digits in a plain decimal
/// string such as "1234567.50".
fn group_thousands(plain: &str) -> String {
    let (integer, fraction) = plain.split_at(plain.find('.').unwrap_or(plain.len()));
    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3);

    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    grouped.push_str(fraction);
    grouped
}

/// Shorten `name` to [MAX_NAME_GRAPHEMES] graphemes.
///
/// Returns the text to display and, if the name was shortened, the full name
/// for use in a tooltip.
pub fn truncate_name(name: &str) -> (String, Option<&str>) {
    let name_length = name.graphemes(true).count();

    if name_length <= MAX_NAME_GRAPHEMES {
        (name.to_owned(), None)
    } else {
        let truncated: String = name.graphemes(true).take(MAX_NAME_GRAPHEMES - 3).collect();
        let truncated = truncated + "...";
        (truncated, Some(name))
    }
}


#[cfg(test)]
mod truncate_name_tests {
    use super::{MAX_NAME_GRAPHEMES, truncate_name};

    #[test]
    fn short_names_are_unchanged() {
        assert_eq!(truncate_name("何奥雄"), ("何奥雄".to_owned(), None));
    }

    #[test]
    fn long_names_are_truncated_by_grapheme() {
        let name = "荣".repeat(MAX_NAME_GRAPHEMES + 1);

        let (display, full) = truncate_name(&name);

        assert_eq!(display, format!("{}...", "荣".repeat(MAX_NAME_GRAPHEMES - 3)));
        assert_eq!(full, Some(name.as_str()));
    }
}
