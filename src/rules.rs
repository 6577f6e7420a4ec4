//! Keyword tables for each cascade stage
//!
//! Order matters everywhere in this file: within a table the first rule whose
//! keywords hit wins, even if a later rule would match too. Keywords are
//! lower-case and matched as substrings.

/// Where a matched rule draws candidates from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// All listed pools, concatenated in order
    Concat(&'static [&'static str]),
    /// The first listed pool that is non-empty (dedicated pool, then a related one)
    FirstNonEmpty(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub target: Target,
    /// Keep only artifacts whose insight mentions one of these
    pub insight_filter: Option<&'static [&'static str]>,
}

impl Rule {
    const fn pool(name: &'static str, keywords: &'static [&'static str], pools: &'static [&'static str]) -> Self {
        Rule {
            name,
            keywords,
            target: Target::Concat(pools),
            insight_filter: None,
        }
    }

    const fn fallback(
        name: &'static str,
        keywords: &'static [&'static str],
        pools: &'static [&'static str],
    ) -> Self {
        Rule {
            name,
            keywords,
            target: Target::FirstNonEmpty(pools),
            insight_filter: None,
        }
    }

    const fn filtered(
        name: &'static str,
        keywords: &'static [&'static str],
        pools: &'static [&'static str],
        insight_filter: &'static [&'static str],
    ) -> Self {
        Rule {
            name,
            keywords,
            target: Target::Concat(pools),
            insight_filter: Some(insight_filter),
        }
    }

    /// Substring hit on already lower-cased text
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
    }
}

/// First rule (in table order) that any of `texts` hits
pub fn first_match<'r, S: AsRef<str>>(rules: &'r [Rule], texts: &[S]) -> Option<&'r Rule> {
    rules
        .iter()
        .find(|rule| texts.iter().any(|t| rule.matches(t.as_ref())))
}

const CLOUD_POOLS: &[&str] = &["aws", "azure", "gcp", "multicloud"];
const COST_WORDS: &[&str] = &["cost", "spend", "saving"];

pub const INDUSTRY_RULES: &[Rule] = &[
    Rule::pool("manufacturing", &["manufactur", "factory", "production"], &["manufacturing"]),
    Rule::pool("healthcare", &["health", "medical", "hospital"], &["healthcare"]),
    Rule::pool("finance", &["financ", "bank", "insurance"], &["finance"]),
    Rule::pool("retail", &["retail", "ecommerce", "e-commerce", "shop"], &["retail"]),
    // keyword "it" also hits utility/university/security, so those land here
    Rule::pool("technology", &["tech", "software", "it"], &["technology"]),
    Rule::fallback("energy", &["energy", "utility", "power"], &["energy", "manufacturing"]),
    Rule::fallback("education", &["education", "school", "university"], &["education", "technology"]),
];

pub const CLOUD_RULES: &[Rule] = &[
    Rule::pool("aws", &["aws", "amazon"], &["aws"]),
    Rule::pool("azure", &["azure", "microsoft"], &["azure"]),
    Rule::pool("gcp", &["gcp", "google"], &["gcp"]),
    Rule::pool("multicloud", &["multi", "hybrid"], &["multicloud"]),
    Rule::pool("other-cloud", &["ibm", "oracle", "alibaba"], &["multicloud"]),
];

pub const TECHNOLOGY_RULES: &[Rule] = &[
    Rule::pool("salesforce", &["salesforce"], &["salesforce"]),
    Rule::pool("crm", &["crm", "hubspot"], &["crm"]),
    Rule::pool("marketing", &["marketing"], &["marketing"]),
    Rule::pool("sales", &["sales", "revenue"], &["sales"]),
    Rule::pool("ai", &["ai", "ml", "machine learning"], &["ai"]),
    Rule::pool("cloud", &["cloud"], CLOUD_POOLS),
    Rule::pool("security", &["security", "compliance"], &["security"]),
];

pub const PAIN_RULES: &[Rule] = &[
    Rule::pool("security", &["security", "breach", "compliance"], &["security"]),
    Rule::filtered("cost", &["cost", "expense", "budget"], &["area", "column"], COST_WORDS),
    Rule::filtered(
        "efficiency",
        &["efficien", "productiv", "time"],
        &["bar", "line"],
        &["efficien", "productiv", "time", "hour", "faster"],
    ),
    Rule::filtered(
        "growth",
        &["growth", "revenue", "sales"],
        &["line", "area", "column"],
        &["growth", "revenue", "increase"],
    ),
];

pub const TOPIC_RULES: &[Rule] = &[
    Rule::pool("security", &["security"], &["security"]),
    Rule::pool("cloud", &["cloud"], CLOUD_POOLS),
    Rule::pool("growth", &["growth", "trend", "adoption"], &["line", "area"]),
    Rule::pool("comparison", &["compar", "versus", "vs"], &["bar", "column", "radar"]),
    Rule::pool("distribution", &["distribution", "breakdown", "share"], &["pie", "donut", "treemap"]),
    Rule::filtered(
        "roi",
        &["roi", "return", "investment"],
        &["column", "waterfall"],
        &["roi", "return", "payback"],
    ),
    Rule::filtered("cost", &["cost", "saving", "budget"], &["area", "column", "waterfall"], COST_WORDS),
    Rule::filtered(
        "customer",
        &["customer", "retention", "churn"],
        &["line", "bar"],
        &["customer", "retention", "churn"],
    ),
    Rule::filtered(
        "performance",
        &["performance", "kpi"],
        &["radar", "bar", "gauge"],
        &["performance", "kpi", "score"],
    ),
];

/// Company-name tokens that hint at an industry
pub const COMPANY_RULES: &[Rule] = &[
    Rule::pool("technology", &["tech", "soft", "data", "ai"], &["technology"]),
    Rule::pool("healthcare", &["health", "care", "med", "pharma"], &["healthcare"]),
    Rule::pool("finance", &["bank", "financial", "invest", "capital"], &["finance"]),
    Rule::pool("retail", &["retail", "shop", "store", "mart"], &["retail"]),
    Rule::pool("manufacturing", &["factory", "manufact", "product", "industrial"], &["manufacturing"]),
];

/// Used when a company name is present but hints at nothing
pub const COMPANY_FALLBACK_POOLS: &[&str] = &["bar", "column", "line", "pie"];
