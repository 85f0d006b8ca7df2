use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::{Value, json};

use super::store::{TableQuery, TableStore};
use super::tables;
use crate::error::PortfolioError;

/// In-memory tables with the same query semantics as the hosted store.
///
/// Tables can be marked as failing to simulate an unreachable store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Vec<Value>>,
    failing: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>, rows: Vec<Value>) -> Self {
        self.tables.insert(table.into(), rows);
        self
    }

    /// Every select against `table` fails.
    pub fn failing(mut self, table: impl Into<String>) -> Self {
        self.failing.insert(table.into());
        self
    }

    /// Static placeholder content for local development. Not authoritative.
    pub fn fixture() -> Self {
        const TS: &str = "2024-01-01T00:00:00Z";
        let project_tags: Vec<Value> = [
            ("1", ["Next.js", "TypeScript", "Tailwind CSS", "React"]),
            ("2", ["React", "Node.js", "MongoDB", "Stripe"]),
        ]
        .into_iter()
        .flat_map(|(project_id, tags)| {
            tags.into_iter()
                .map(move |tag| json!({ "project_id": project_id, "tag": tag }))
        })
        .collect();
        let skills: Vec<Value> = [
            "JavaScript",
            "TypeScript",
            "React",
            "Next.js",
            "Node.js",
            "Python",
            "PostgreSQL",
            "AWS",
        ]
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            json!({ "id": (i + 1).to_string(), "name": name, "order_index": i + 1, "created_at": TS })
        })
        .collect();

        Self::new()
            .with_table(
                tables::PROFILE,
                vec![json!({
                    "id": "1",
                    "name": "Your Name",
                    "title": "Full Stack Developer",
                    "bio": "Crafting beautiful, scalable web applications with modern technologies and best practices.",
                    "email": "your.email@example.com",
                    "github_url": "https://github.com/yourusername",
                    "linkedin_url": "https://linkedin.com/in/yourusername",
                    "available_for_work": true,
                    "created_at": TS,
                    "updated_at": TS,
                })],
            )
            .with_table(
                tables::PROJECTS,
                vec![
                    json!({
                        "id": "1",
                        "title": "Portfolio Website",
                        "description": "A modern, responsive portfolio website built with Next.js, TypeScript, and Tailwind CSS.",
                        "link": "https://github.com/yourusername/portfolio",
                        "order_index": 1,
                        "created_at": TS,
                        "updated_at": TS,
                    }),
                    json!({
                        "id": "2",
                        "title": "E-commerce Platform",
                        "description": "A full-stack e-commerce platform with user authentication, payment processing, and admin dashboard.",
                        "link": "https://github.com/yourusername/ecommerce",
                        "order_index": 2,
                        "created_at": TS,
                        "updated_at": TS,
                    }),
                ],
            )
            .with_table(tables::PROJECT_TAGS, project_tags)
            .with_table(
                tables::EXPERIENCE,
                vec![
                    json!({
                        "id": "1",
                        "role": "Senior Full Stack Developer",
                        "company": "Tech Company",
                        "period": "2022 - Present",
                        "description": "Led development of scalable web applications using React, Node.js, and cloud technologies.",
                        "order_index": 1,
                        "created_at": TS,
                        "updated_at": TS,
                    }),
                    json!({
                        "id": "2",
                        "role": "Frontend Developer",
                        "company": "Startup Inc",
                        "period": "2020 - 2022",
                        "description": "Developed responsive user interfaces and collaborated with design teams to create engaging user experiences.",
                        "order_index": 2,
                        "created_at": TS,
                        "updated_at": TS,
                    }),
                ],
            )
            .with_table(tables::SKILLS, skills)
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, query: &TableQuery) -> Result<Vec<Value>, PortfolioError> {
        if self.failing.contains(&query.table) {
            return Err(PortfolioError::StoreUnavailable(query.table.clone()));
        }
        let mut rows = self.tables.get(&query.table).cloned().unwrap_or_default();
        if let Some(column) = query.order_by.as_deref() {
            rows.sort_by(|a, b| compare_column(a.get(column), b.get(column)));
        }
        if query.single {
            rows.truncate(1);
        }
        Ok(rows)
    }
}

/// Ascending, missing or null values last.
fn compare_column(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
