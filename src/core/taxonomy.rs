//! Category and tag vocabularies with their trigger keywords.
//!
//! The built-in taxonomy lives in two ordered static tables. Declaration
//! order is significant: matched categories and tags are always reported in
//! table order, never in the order the triggers occur in the text.
//!
//! Triggers are lowercase substrings. Matching is a plain substring test on
//! the lowercased conversation, so triggers are chosen to be specific
//! enough not to fire inside unrelated words.
//!
//! # Example
//!
//! ```rust
//! use chatcat::core::taxonomy::Taxonomy;
//!
//! let taxonomy = Taxonomy::builtin();
//! let hits = taxonomy.match_categories("moving files around our google drive archive");
//! assert_eq!(hits, vec!["Google Drive", "Project Management"]);
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{ChatcatError, Result};

/// Label assigned when no category trigger matches.
pub const FALLBACK_CATEGORY: &str = "General";

/// Separator used for categories in the CSV `category` column.
pub const CATEGORY_SEPARATOR: char = '|';

/// Separator used for tags in the CSV `tags` column.
pub const TAG_SEPARATOR: char = ',';

/// Built-in categories, in output order.
pub const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "AI Bot Configurations",
        &["system prompt", "custom gpt", "chatbot", "bot persona", "assistant config", "custom instructions"],
    ),
    (
        "Ad Copy Frameworks",
        &["ad copy", "facebook ad", "meta ads", "google ads", "ad creative", "ad angle"],
    ),
    (
        "Business Strategy",
        &["business strategy", "business plan", "go-to-market", "competitive analysis", "positioning", "roadmap"],
    ),
    (
        "Client Management",
        &["client onboarding", "client call", "client feedback", "retainer", "scope of work", "client management"],
    ),
    (
        "Content Strategy",
        &["content strategy", "content calendar", "content pillar", "editorial calendar", "content plan"],
    ),
    (
        "Copywriting - Emails",
        &["email sequence", "subject line", "email campaign", "autoresponder", "welcome sequence"],
    ),
    ("Copywriting - Landing Page", &["landing page", "opt-in page", "squeeze page"]),
    ("Copywriting - Sales Page", &["sales page", "sales letter", "order form", "long-form sales"]),
    ("Copywriting - Website", &["website copy", "homepage", "about page", "web copy"]),
    ("Copywriting - Funnels", &["funnel", "upsell", "downsell", "tripwire", "order bump"]),
    (
        "Copywriting Frameworks",
        &["copywriting framework", "aida", "problem-agitate", "before-after-bridge", "pastor framework"],
    ),
    (
        "Customer Research",
        &["customer research", "customer avatar", "voice of customer", "customer interview", "survey responses", "pain points"],
    ),
    (
        "Email & Newsletters",
        &["newsletter", "mailchimp", "convertkit", "klaviyo", "beehiiv", "email list"],
    ),
    (
        "Finance",
        &["invoice", "budget", "cash flow", "bookkeeping", "tax return", "pricing model", "revenue"],
    ),
    (
        "GEO SEO Frameworks",
        &["geo seo", "seo framework", "generative engine optimization", "keyword research", "backlink", "serp"],
    ),
    (
        "Google Drive",
        &["google drive", "gdrive", "google docs", "google sheets", "shared drive"],
    ),
    (
        "HR",
        &["hiring", "job description", "onboarding checklist", "employee", "payroll", "performance review"],
    ),
    (
        "Health - Therapy",
        &["therapy", "therapist", "trauma", "anxiety", "mental health", "coping"],
    ),
    (
        "Idea Research & New Projects",
        &["business idea", "side project", "new project", "brainstorm", "product idea", "validate the idea"],
    ),
    (
        "Job - AI Consultant",
        &["ai consulting", "ai consultant", "ai strategy", "ai advisor", "ai implementation"],
    ),
    (
        "Job - Copywriting",
        &["copywriting job", "copywriter role", "cover letter", "writing sample", "portfolio", "job application"],
    ),
    ("Job - UX Writing", &["ux writing", "ux writer", "microcopy", "ui copy"]),
    (
        "Legal",
        &["contract", "terms of service", "privacy policy", "non-disclosure", "trademark", "copyright", "liability"],
    ),
    (
        "Market Research",
        &["market research", "market size", "competitor", "industry trends"],
    ),
    (
        "Marketing",
        &["marketing plan", "marketing campaign", "brand awareness", "social media", "launch plan", "growth marketing"],
    ),
    (
        "Miscellaneous AI Research",
        &["llm", "language model", "machine learning", "fine-tuning", "embedding", "neural network"],
    ),
    (
        "Project Management",
        &["project management", "asset management", "archive", "milestone", "kanban", "task list", "workflow"],
    ),
    ("Project – AI Valentina", &["valentina"]),
    ("Project – Copy Accelerator (CA)", &["copy accelerator"]),
    ("Project – Emma Brand", &["emma brand", "emma's brand"]),
    ("Project – GEO SEO AI", &["geo seo ai"]),
    (
        "Project – Get The Receipts (GTR)",
        &["get the receipts", "gtr", "quiz funnel", "archetype quiz"],
    ),
    ("Project – PaleoHacks / David Sinick", &["paleohacks", "david sinick", "paleo"]),
    ("Project – Pauline Longdon", &["pauline longdon", "pauline"]),
    ("Project – TNT Media", &["tnt media", "tom clayson", "media buying"]),
    (
        "Prompt Engineering",
        &["prompt engineering", "few-shot", "zero-shot", "chain of thought", "prompt template", "meta prompt"],
    ),
    (
        "Training & Resources",
        &["training module", "online course", "course outline", "curriculum", "lesson plan", "workshop", "tutorial"],
    ),
    ("VSL Frameworks", &["vsl", "video sales letter"]),
    (
        "Voice & Tone Systems",
        &["brand voice", "tone of voice", "voice and tone", "voice & tone", "style guide"],
    ),
];

/// Built-in tag vocabulary, in output order.
pub const BUILTIN_TAGS: &[(&str, &[&str])] = &[
    // Tools
    ("Claude", &["claude"]),
    ("ChatGPT", &["chatgpt", "gpt-4", "gpt-3"]),
    ("n8n", &["n8n"]),
    ("Zapier", &["zapier"]),
    ("Airtable", &["airtable"]),
    ("Notion", &["notion page", "notion database", "notion workspace", "in notion"]),
    ("Figma", &["figma"]),
    ("Canva", &["canva design", "canva template", "in canva"]),
    ("Google Drive", &["google drive", "gdrive"]),
    ("Make.com", &["make.com", "make scenario"]),
    // Techniques
    ("AIDA", &["aida"]),
    ("PAS", &["problem-agitate-solve", "problem agitate solution", "pas framework"]),
    ("Storytelling", &["storytelling", "story arc"]),
    ("Urgency", &["urgency"]),
    ("Scarcity", &["scarcity"]),
    ("Social Proof", &["social proof", "testimonial"]),
    ("Authority", &["authority"]),
    ("Reciprocity", &["reciprocity"]),
    // Deliverables
    ("Email Sequence", &["email sequence"]),
    ("Landing Page", &["landing page"]),
    ("Sales Page", &["sales page"]),
    ("VSL Script", &["vsl script", "video sales letter"]),
    ("Ad Copy", &["ad copy"]),
    ("Headline", &["headline"]),
    ("Lead Magnet", &["lead magnet"]),
    ("Webinar", &["webinar"]),
    ("Funnel", &["funnel"]),
    ("Template", &["template"]),
    ("Framework", &["framework"]),
    ("SOP", &["standard operating procedure", "sop document"]),
    // Projects
    ("GTR", &["gtr", "get the receipts"]),
    ("TNT", &["tnt media"]),
    ("PaleoHacks", &["paleohacks"]),
    ("Valentina", &["valentina"]),
    ("Emma Brand", &["emma brand"]),
    // Work types
    ("Research", &["research"]),
    ("Strategy", &["strategy"]),
    ("Copywriting", &["copywriting", "copywriter"]),
    ("Automation", &["automation", "automate"]),
    ("Analysis", &["analysis", "analyze", "analyse"]),
    ("Optimization", &["optimization", "optimize", "optimise"]),
    ("Testing", &["a/b test", "split test", "testing"]),
    ("Organization", &["organiz", "organis"]),
];

/// One label and the keywords that assign it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub label: String,
    pub triggers: Vec<String>,
}

impl TaxonomyEntry {
    pub fn new<I, S>(label: impl Into<String>, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if any trigger occurs in the lowercased `haystack`.
    pub fn matches(&self, haystack: &str) -> bool {
        self.triggers.iter().any(|t| haystack.contains(t.as_str()))
    }
}

/// Immutable category and tag tables.
///
/// Construct with [`Taxonomy::builtin`], [`Taxonomy::new`] or one of the JSON
/// loaders; all of them hand out validated, lowercase-triggered tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Taxonomy {
    categories: Vec<TaxonomyEntry>,
    tags: Vec<TaxonomyEntry>,
}

#[derive(Deserialize)]
struct RawTaxonomy {
    categories: Vec<TaxonomyEntry>,
    #[serde(default)]
    tags: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// Returns the built-in taxonomy, materialised on first use.
    pub fn builtin() -> &'static Taxonomy {
        static BUILTIN: OnceLock<Taxonomy> = OnceLock::new();
        BUILTIN.get_or_init(|| Taxonomy {
            categories: from_table(BUILTIN_CATEGORIES),
            tags: from_table(BUILTIN_TAGS),
        })
    }

    /// Builds a taxonomy from entries, normalising and validating them.
    pub fn new(categories: Vec<TaxonomyEntry>, tags: Vec<TaxonomyEntry>) -> Result<Self> {
        let taxonomy = Self {
            categories: normalise(categories),
            tags: normalise(tags),
        };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    /// Parses a taxonomy document:
    ///
    /// ```json
    /// {
    ///   "categories": [{"label": "Finance", "triggers": ["invoice", "budget"]}],
    ///   "tags": [{"label": "Research", "triggers": ["research"]}]
    /// }
    /// ```
    ///
    /// `tags` may be omitted.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawTaxonomy =
            serde_json::from_str(content).map_err(|e| ChatcatError::taxonomy_parse(e, None))?;
        Self::new(raw.categories, raw.tags)
    }

    /// Reads a taxonomy document from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let raw: RawTaxonomy = serde_json::from_str(&content)
            .map_err(|e| ChatcatError::taxonomy_parse(e, Some(path.to_path_buf())))?;
        Self::new(raw.categories, raw.tags)
    }

    pub fn categories(&self) -> &[TaxonomyEntry] {
        &self.categories
    }

    pub fn tags(&self) -> &[TaxonomyEntry] {
        &self.tags
    }

    /// Category labels whose triggers occur in `haystack`, in table order.
    ///
    /// `haystack` must already be lowercase.
    pub fn match_categories(&self, haystack: &str) -> Vec<&str> {
        matching_labels(&self.categories, haystack)
    }

    /// Tag labels whose triggers occur in `haystack`, in table order.
    ///
    /// `haystack` must already be lowercase.
    pub fn match_tags(&self, haystack: &str) -> Vec<&str> {
        matching_labels(&self.tags, haystack)
    }

    fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(ChatcatError::invalid_taxonomy("at least one category is required"));
        }
        check_entries("category", &self.categories, CATEGORY_SEPARATOR)?;
        check_entries("tag", &self.tags, TAG_SEPARATOR)
    }
}

fn from_table(table: &[(&str, &[&str])]) -> Vec<TaxonomyEntry> {
    table
        .iter()
        .map(|(label, triggers)| TaxonomyEntry::new(*label, triggers.iter().copied()))
        .collect()
}

fn normalise(entries: Vec<TaxonomyEntry>) -> Vec<TaxonomyEntry> {
    entries
        .into_iter()
        .map(|entry| TaxonomyEntry {
            label: entry.label.trim().to_string(),
            triggers: entry
                .triggers
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        })
        .collect()
}

fn check_entries(kind: &str, entries: &[TaxonomyEntry], separator: char) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.label.is_empty() {
            return Err(ChatcatError::invalid_taxonomy(format!("{kind} with an empty label")));
        }
        if entry.label.contains(separator) {
            return Err(ChatcatError::invalid_taxonomy(format!(
                "{kind} '{}' contains the separator '{separator}'",
                entry.label
            )));
        }
        if !seen.insert(entry.label.as_str()) {
            return Err(ChatcatError::invalid_taxonomy(format!(
                "duplicate {kind} '{}'",
                entry.label
            )));
        }
        if entry.triggers.is_empty() {
            return Err(ChatcatError::invalid_taxonomy(format!(
                "{kind} '{}' has no triggers",
                entry.label
            )));
        }
    }
    Ok(())
}

fn matching_labels<'a>(entries: &'a [TaxonomyEntry], haystack: &str) -> Vec<&'a str> {
    let mut labels: Vec<&str> = Vec::new();
    for entry in entries.iter().filter(|e| e.matches(haystack)) {
        if !labels.contains(&entry.label.as_str()) {
            labels.push(&entry.label);
        }
    }
    labels
}
