//! Read-only search tools over the aggregated news archive.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use fieldnote_provider::ToolDef;
use fieldnote_schema::{
    dod_categories, Article, DOD_AUDIT_CATEGORIES, DOD_BUDGET_CATEGORIES, DOD_POLICY_CATEGORIES,
};
use fieldnote_store::JournalStore;

use crate::tool::{limit_arg, opt_str_arg, ToolExecutor};

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 10;

pub struct SearchTechArticlesTool {
    store: JournalStore,
}

impl SearchTechArticlesTool {
    pub fn new(store: JournalStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ToolExecutor for SearchTechArticlesTool {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "search_tech_articles".into(),
            description: "Search the aggregated tech-news feed. Matches the query as a \
                          case-insensitive substring of title, summary, or source; newest first."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text search over title/summary/source"
                    },
                    "category": {
                        "type": "string",
                        "description": "Exact category filter, e.g. 'ai-ml' or 'software'"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Max results, 1-10 (default 5)"
                    }
                }
            }),
        }
    }

    async fn execute(&self, input: serde_json::Value) -> Result<serde_json::Value> {
        let query = opt_str_arg(&input, "query");
        let category = opt_str_arg(&input, "category");
        let limit = limit_arg(&input, DEFAULT_LIMIT, MAX_LIMIT);

        let articles = self.store.search_articles(query, category, limit).await?;
        Ok(article_listing(&articles))
    }
}

pub struct SearchDodNewsTool {
    store: JournalStore,
}

impl SearchDodNewsTool {
    pub fn new(store: JournalStore) -> Self {
        Self { store }
    }
}

/// Maps the tool's `type` filter onto the archive's category labels.
fn categories_for(news_type: &str) -> Vec<String> {
    let labels: Vec<&str> = match news_type {
        "audit" => DOD_AUDIT_CATEGORIES.to_vec(),
        "budget" => DOD_BUDGET_CATEGORIES.to_vec(),
        "policy" => DOD_POLICY_CATEGORIES.to_vec(),
        _ => dod_categories(),
    };
    labels.into_iter().map(str::to_string).collect()
}

#[async_trait]
impl ToolExecutor for SearchDodNewsTool {
    fn definition(&self) -> ToolDef {
        ToolDef {
            name: "search_dod_news".into(),
            description: "Search defense financial-management news (audits, budgets, policy). \
                          Optional topic substring filter over title and summary; newest first."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "Topic keyword, e.g. 'FIAR' or 'working capital fund'"
                    },
                    "type": {
                        "type": "string",
                        "enum": ["audit", "budget", "policy", "all"],
                        "description": "News slice to search (default all)"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Max results, 1-10 (default 5)"
                    }
                }
            }),
        }
    }

    async fn execute(&self, input: serde_json::Value) -> Result<serde_json::Value> {
        let topic = opt_str_arg(&input, "topic");
        let news_type = opt_str_arg(&input, "type").unwrap_or_else(|| "all".to_string());
        let limit = limit_arg(&input, DEFAULT_LIMIT, MAX_LIMIT);

        let articles = self
            .store
            .search_news(topic, categories_for(&news_type), limit)
            .await?;
        Ok(article_listing(&articles))
    }
}

fn article_listing(articles: &[Article]) -> serde_json::Value {
    json!({
        "count": articles.len(),
        "articles": articles
            .iter()
            .map(|a| json!({
                "title": a.title,
                "summary": a.summary,
                "source": a.source,
                "category": a.category,
                "url": a.url,
                "published_at": a.published_at.to_rfc3339(),
            }))
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fieldnote_schema::NewArticle;

    async fn seeded_store() -> JournalStore {
        let store = JournalStore::open_in_memory().unwrap();
        let seed = [
            ("FIAR audit milestones", "audit", 1),
            ("IG report on property systems", "ig-report", 2),
            ("FY26 appropriations markup", "appropriations", 3),
            ("Acquisition reform roundup", "acquisition", 4),
            ("New LLM inference engine", "ai-ml", 1),
            ("Rust web framework shootout", "software", 2),
        ];
        for (title, category, hours) in seed {
            store
                .insert_article(NewArticle {
                    title: title.into(),
                    summary: format!("{title} in depth"),
                    source: "Wire".into(),
                    category: category.into(),
                    url: String::new(),
                    published_at: Some(Utc::now() - Duration::hours(hours)),
                })
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn tech_search_clamps_oversized_limit() {
        let store = seeded_store().await;
        let tool = SearchTechArticlesTool::new(store);
        let out = tool.execute(serde_json::json!({"limit": 100})).await.unwrap();
        // Never more than 10 even when the caller asks for 100.
        assert!(out["count"].as_u64().unwrap() <= 10);
    }

    #[tokio::test]
    async fn tech_search_filters_by_query_and_category() {
        let store = seeded_store().await;
        let tool = SearchTechArticlesTool::new(store);

        let out = tool
            .execute(serde_json::json!({"query": "rust"}))
            .await
            .unwrap();
        assert_eq!(out["count"], 1);
        assert_eq!(out["articles"][0]["title"], "Rust web framework shootout");

        let out = tool
            .execute(serde_json::json!({"category": "ai-ml"}))
            .await
            .unwrap();
        assert_eq!(out["count"], 1);
    }

    #[tokio::test]
    async fn dod_type_filter_selects_category_slice() {
        let store = seeded_store().await;
        let tool = SearchDodNewsTool::new(store);

        let out = tool
            .execute(serde_json::json!({"type": "audit"}))
            .await
            .unwrap();
        assert_eq!(out["count"], 2);

        let out = tool
            .execute(serde_json::json!({"type": "budget"}))
            .await
            .unwrap();
        assert_eq!(out["count"], 1);
        assert_eq!(out["articles"][0]["category"], "appropriations");
    }

    #[tokio::test]
    async fn dod_default_type_searches_all_defense_slices() {
        let store = seeded_store().await;
        let tool = SearchDodNewsTool::new(store);
        let out = tool.execute(serde_json::json!({})).await.unwrap();
        // Four defense articles seeded; tech ones excluded.
        assert_eq!(out["count"], 4);
    }

    #[tokio::test]
    async fn dod_topic_narrows_results() {
        let store = seeded_store().await;
        let tool = SearchDodNewsTool::new(store);
        let out = tool
            .execute(serde_json::json!({"topic": "FIAR", "type": "audit"}))
            .await
            .unwrap();
        assert_eq!(out["count"], 1);
        assert_eq!(out["articles"][0]["title"], "FIAR audit milestones");
    }

    #[test]
    fn unknown_type_falls_back_to_all() {
        assert_eq!(categories_for("whatever").len(), 6);
        assert_eq!(categories_for("audit"), vec!["audit", "ig-report"]);
    }
}
