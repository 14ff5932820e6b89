//! Sample tools inserted when the directory starts out empty.

use crate::models::{CreateToolRequest, ToolStatus};

struct SampleTool {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    logo: &'static str,
    slug: &'static str,
    featured: bool,
    upvotes: i64,
    pricing: &'static str,
}

const SAMPLES: &[SampleTool] = &[
    SampleTool {
        title: "Nebula Copy",
        description: "AI-native copy hub with brand voice memory and instant briefs.",
        category: "Copywriting",
        tags: &["copy", "marketing", "voice"],
        logo: "🪐",
        slug: "nebula",
        featured: true,
        upvotes: 1280,
        pricing: "Freemium",
    },
    SampleTool {
        title: "PixelCrafter",
        description: "Image generation with layered edits, masks, and live prompts.",
        category: "Image Gen",
        tags: &["vision", "editing"],
        logo: "🎨",
        slug: "pixelcrafter",
        featured: false,
        upvotes: 987,
        pricing: "Paid",
    },
    SampleTool {
        title: "CodeFuse",
        description: "Pair-programming AI with repo-aware context and inline tests.",
        category: "Coding",
        tags: &["developer", "tests"],
        logo: "⚡",
        slug: "codefuse",
        featured: false,
        upvotes: 1542,
        pricing: "Free",
    },
    SampleTool {
        title: "SynthVoice",
        description: "Ultra-realistic multilingual voiceover with sentiment control.",
        category: "Audio",
        tags: &["voice", "multilingual"],
        logo: "🔊",
        slug: "synthvoice",
        featured: false,
        upvotes: 803,
        pricing: "Paid",
    },
    SampleTool {
        title: "InsightOps",
        description: "LLM dashboards for metrics, anomalies, and alert summaries.",
        category: "Analytics",
        tags: &["ops", "monitoring"],
        logo: "📊",
        slug: "insightops",
        featured: false,
        upvotes: 1120,
        pricing: "Freemium",
    },
    SampleTool {
        title: "PromptBoard",
        description: "Team prompt versioning, evals, and rollout guards in one UI.",
        category: "Productivity",
        tags: &["prompts", "governance"],
        logo: "🧭",
        slug: "promptboard",
        featured: false,
        upvotes: 640,
        pricing: "Free",
    },
];

/// The bootstrap catalogue, in insertion order.
pub fn sample_tools() -> Vec<CreateToolRequest> {
    SAMPLES
        .iter()
        .map(|s| CreateToolRequest {
            title: s.title.to_string(),
            description: s.description.to_string(),
            category: s.category.to_string(),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            url: format!("https://example.com/{}", s.slug),
            logo: s.logo.to_string(),
            featured: s.featured,
            upvotes: Some(s.upvotes),
            status: Some(ToolStatus::Online),
            pricing: Some(s.pricing.to_string()),
        })
        .collect()
}
