//! Named query templates
//!
//! A `--!text2sql <key>` line whose remainder is exactly one of these keys is
//! replaced by the canonical question text before it reaches the model.

/// A canonical natural-language question addressable by a short key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTemplate {
    /// Lookup key typed after the directive
    pub key: &'static str,

    /// Short human readable title
    pub title: &'static str,

    /// Question handed to the model
    pub description: &'static str,
}

const TPCH_Q1: &str = "\
List return flag, line status,
totals of extended price, discounted extended price,
discounted extended price plus tax, average quantity,
average extended price and average discount for all orders
whose ship date is between 90 days before 1998-12-01 and
1998-12-01.  Group result by return flag and line status,
sorted by return flag and line status in ascending order.";

const TPCH_Q3: &str = "\
Retrieve the 10 unshipped orders with the highest value.
List order key, revenue (sum of extended price times one minus discount),
order date and ship priority for orders placed before 1995-03-15
by customers in the BUILDING market segment whose line items
ship after 1995-03-15.  Sort by revenue in descending order,
then by order date in ascending order.";

const TPCH_Q6: &str = "\
Compute the total revenue increase, the sum of extended price times
discount, that would have resulted from eliminating discounts
between 0.05 and 0.07 on line items shipped during 1994
with a quantity of less than 24.";

static TEMPLATES: &[QueryTemplate] = &[
    QueryTemplate {
        key: "tpch-q1",
        title: "Pricing summary report",
        description: TPCH_Q1,
    },
    QueryTemplate {
        key: "tpch-q3",
        title: "Shipping priority",
        description: TPCH_Q3,
    },
    QueryTemplate {
        key: "tpch-q6",
        title: "Forecasting revenue change",
        description: TPCH_Q6,
    },
];

/// All known templates in a stable order
pub fn templates() -> &'static [QueryTemplate] {
    TEMPLATES
}

/// Resolve a template key to its question text
///
/// Surrounding whitespace is ignored; the match itself is exact.
pub fn lookup_template(key: &str) -> Option<&'static str> {
    let key = key.trim();
    TEMPLATES
        .iter()
        .find(|t| t.key == key)
        .map(|t| t.description)
}
