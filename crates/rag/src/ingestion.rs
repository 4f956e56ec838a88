//! Knowledge base ingestion
//!
//! Splits incoming texts between partitions by script, normalizes the
//! fallback-script texts and stores them. Question/answer sheets are read
//! from CSV with a header row.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use query_router_config::IngestionConfig;
use query_router_core::{Language, Metadata};
use query_router_text_processing::TextNormalizer;

use crate::{KnowledgeBaseRouter, Partition, RagError};

/// Documents stored per partition by one ingestion call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub primary: usize,
    pub fallback: usize,
}

impl IngestionReport {
    pub fn total(&self) -> usize {
        self.primary + self.fallback
    }
}

/// Result of storing a single text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreOutcome {
    pub status: String,
    pub stored: usize,
    /// Table / collection the text went to
    pub partition: String,
}

/// Document counts per language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    pub english: u64,
    pub arabic: u64,
    pub total: u64,
}

/// Writes texts into the knowledge base
#[derive(Debug, Clone)]
pub struct KnowledgeIngestor {
    router: Arc<KnowledgeBaseRouter>,
    normalizer: TextNormalizer,
    columns: IngestionConfig,
}

impl KnowledgeIngestor {
    pub fn new(router: Arc<KnowledgeBaseRouter>, columns: IngestionConfig) -> Self {
        Self {
            router,
            normalizer: TextNormalizer::default(),
            columns,
        }
    }

    pub fn router(&self) -> &Arc<KnowledgeBaseRouter> {
        &self.router
    }

    /// Partition a text belongs to, by script
    fn partition_for_text(&self, text: &str) -> &Partition {
        let fallback = self.router.fallback();
        if fallback.language().script().appears_in(text) {
            fallback
        } else {
            self.router.primary()
        }
    }

    fn prepare(&self, text: &str, partition: &Partition) -> String {
        self.normalizer.normalize(text, partition.language())
    }

    /// Store texts, each in the partition matching its script
    ///
    /// `metadatas` aligns by index; missing entries become empty maps.
    pub async fn add_texts(&self, texts: &[String], metadatas: &[Metadata]) -> Result<IngestionReport, RagError> {
        let primary_id = self.router.primary().id().to_string();

        let mut primary = (Vec::new(), Vec::new());
        let mut fallback = (Vec::new(), Vec::new());

        for (i, text) in texts.iter().enumerate() {
            let partition = self.partition_for_text(text);
            let metadata = metadatas.get(i).cloned().unwrap_or_default();
            let bucket = if partition.id() == primary_id {
                &mut primary
            } else {
                &mut fallback
            };
            bucket.0.push(self.prepare(text, partition));
            bucket.1.push(metadata);
        }

        let mut report = IngestionReport::default();
        if !primary.0.is_empty() {
            report.primary = self.store(self.router.primary(), &primary.0, &primary.1).await?;
        }
        if !fallback.0.is_empty() {
            report.fallback = self.store(self.router.fallback(), &fallback.0, &fallback.1).await?;
        }

        tracing::info!(
            primary = report.primary,
            fallback = report.fallback,
            "Ingested texts"
        );
        Ok(report)
    }

    /// Store one text in the partition matching its script
    pub async fn store_one(&self, text: &str, metadata: Metadata) -> Result<StoreOutcome, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Ingestion("Text is empty".to_string()));
        }

        let partition = self.partition_for_text(text);
        let prepared = self.prepare(text, partition);
        let stored = self.store(partition, &[prepared], &[metadata]).await?;

        Ok(StoreOutcome {
            status: "ok".to_string(),
            stored,
            partition: partition.id().to_string(),
        })
    }

    async fn store(&self, partition: &Partition, texts: &[String], metadatas: &[Metadata]) -> Result<usize, RagError> {
        partition
            .store()
            .add_texts(texts, metadatas)
            .await
            .map_err(|e| RagError::Ingestion(format!("{}: {}", partition.id(), e)))
    }

    /// `Q: {question}\nA: {answer}`, or `None` when every cell is blank
    fn row_to_text(&self, row: &HashMap<String, String>) -> Option<String> {
        if row.values().all(|cell| cell.trim().is_empty()) {
            return None;
        }

        let question = row.get(&self.columns.question_column).map(String::as_str).unwrap_or("");
        let answer = row.get(&self.columns.answer_column).map(String::as_str).unwrap_or("");
        Some(format!("Q: {}\nA: {}", question.trim(), answer.trim()))
    }

    /// Turn question/answer rows into document texts
    pub fn rows_to_texts(&self, rows: &[HashMap<String, String>]) -> Vec<String> {
        rows.iter().filter_map(|row| self.row_to_text(row)).collect()
    }

    /// Load a question/answer CSV into the partition for `language`
    ///
    /// # Returns
    /// Number of documents stored
    pub async fn load_csv(&self, path: &Path, language: Language) -> Result<usize, RagError> {
        let partition = self.router.route(language);
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Short rows are allowed; missing trailing columns read as empty
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut texts = Vec::new();
        let mut metadatas = Vec::new();

        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let row: HashMap<String, String> = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();

            if let Some(text) = self.row_to_text(&row) {
                let mut metadata = Metadata::new();
                metadata.insert("source".to_string(), source.clone().into());
                metadata.insert("row".to_string(), (i + 1).into());

                texts.push(self.prepare(&text, partition));
                metadatas.push(metadata);
            }
        }

        if texts.is_empty() {
            tracing::warn!(file = %path.display(), "No rows to ingest");
            return Ok(0);
        }

        let stored = self.store(partition, &texts, &metadatas).await?;
        tracing::info!(
            file = %path.display(),
            partition = %partition.id(),
            documents = stored,
            "Loaded question/answer sheet"
        );
        Ok(stored)
    }

    /// Documents in the partition for `language`; 0 on store error
    pub async fn count(&self, language: Language) -> u64 {
        let partition = self.router.route(language);
        match partition.store().count().await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(partition = %partition.id(), error = %e, "Failed to count documents");
                0
            },
        }
    }

    /// Remove every document from the partition for `language`
    pub async fn clear(&self, language: Language) -> Result<u64, RagError> {
        let partition = self.router.route(language);
        let removed = partition
            .store()
            .clear()
            .await
            .map_err(|e| RagError::VectorStore(format!("{}: {}", partition.id(), e)))?;

        tracing::info!(partition = %partition.id(), removed, "Cleared partition");
        Ok(removed)
    }

    pub async fn total_counts(&self) -> PartitionCounts {
        let english = self.count(Language::English).await;
        let arabic = self.count(Language::Arabic).await;
        PartitionCounts {
            english,
            arabic,
            total: english + arabic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HashEmbedder, InMemoryPartitionStore};
    use query_router_config::RoutingPolicy;
    use query_router_core::PartitionStore;
    use std::io::Write;

    struct Fixture {
        ingestor: KnowledgeIngestor,
        primary: Arc<InMemoryPartitionStore>,
        fallback: Arc<InMemoryPartitionStore>,
    }

    fn fixture() -> Fixture {
        let embedder = Arc::new(HashEmbedder::new(64));
        let primary = Arc::new(InMemoryPartitionStore::new("documents", embedder.clone()));
        let fallback = Arc::new(InMemoryPartitionStore::new("arabic_documents", embedder));
        let router =
            KnowledgeBaseRouter::from_policy(&RoutingPolicy::default(), primary.clone(), fallback.clone())
                .unwrap();
        Fixture {
            ingestor: KnowledgeIngestor::new(Arc::new(router), IngestionConfig::default()),
            primary,
            fallback,
        }
    }

    fn row(question: &str, answer: &str) -> HashMap<String, String> {
        HashMap::from([
            ("Question".to_string(), question.to_string()),
            ("Answer".to_string(), answer.to_string()),
        ])
    }

    #[tokio::test]
    async fn test_add_texts_splits_by_script() {
        let f = fixture();
        let texts = vec![
            "Q: How to add a product?\nA: Go to Catalogue.".to_string(),
            "س: كيف أضيف منتجاً؟\nج: اذهب إلى الكتالوج.".to_string(),
            "Q: Reset password\nA: Use Settings.".to_string(),
        ];

        let report = f.ingestor.add_texts(&texts, &[]).await.unwrap();

        assert_eq!(report, IngestionReport { primary: 2, fallback: 1 });
        assert_eq!(report.total(), 3);
        assert_eq!(f.primary.count().await.unwrap(), 2);
        assert_eq!(f.fallback.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_fallback_texts_are_normalized() {
        let f = fixture();
        f.ingestor.add_texts(&["أضِف منتجاً".to_string()], &[]).await.unwrap();

        let hits = f.fallback.similarity_search("", 1).await.unwrap();
        assert_eq!(hits[0].content, "ءضف منتجا");
    }

    #[tokio::test]
    async fn test_metadata_aligns_by_index() {
        let f = fixture();
        let mut meta = Metadata::new();
        meta.insert("source".to_string(), serde_json::json!("manual"));

        f.ingestor
            .add_texts(&["first".to_string(), "second".to_string()], &[meta.clone()])
            .await
            .unwrap();

        let hits = f.primary.similarity_search("first", 2).await.unwrap();
        let first = hits.iter().find(|h| h.content == "first").unwrap();
        let second = hits.iter().find(|h| h.content == "second").unwrap();
        assert_eq!(first.metadata, meta);
        assert!(second.metadata.is_empty());
    }

    #[tokio::test]
    async fn test_store_one() {
        let f = fixture();
        let outcome = f.ingestor.store_one("مرحبا بكم", Metadata::new()).await.unwrap();
        assert_eq!(
            outcome,
            StoreOutcome {
                status: "ok".to_string(),
                stored: 1,
                partition: "arabic_documents".to_string(),
            }
        );

        let outcome = f.ingestor.store_one("Opening hours", Metadata::new()).await.unwrap();
        assert_eq!(outcome.partition, "documents");

        assert!(f.ingestor.store_one("   ", Metadata::new()).await.is_err());
    }

    #[test]
    fn test_rows_to_texts() {
        let f = fixture();
        let mut partial = HashMap::new();
        partial.insert("Question".to_string(), "Only a question".to_string());

        let rows = vec![
            row("How to create a purchase order?", "Go to Orders > New."),
            row("  ", ""),
            partial,
        ];

        assert_eq!(
            f.ingestor.rows_to_texts(&rows),
            vec![
                "Q: How to create a purchase order?\nA: Go to Orders > New.".to_string(),
                "Q: Only a question\nA: ".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_load_csv() {
        let f = fixture();
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Question,Answer").unwrap();
        writeln!(file, "How to create a purchase order?,Go to Orders > New.").unwrap();
        writeln!(file, ",").unwrap();
        writeln!(file, "\"How to print, quickly?\",Use the printer icon.").unwrap();
        file.flush().unwrap();

        let stored = f.ingestor.load_csv(file.path(), Language::English).await.unwrap();
        assert_eq!(stored, 2);
        assert_eq!(f.primary.count().await.unwrap(), 2);
        assert_eq!(f.fallback.count().await.unwrap(), 0);

        let hits = f.primary.similarity_search("print quickly", 1).await.unwrap();
        assert_eq!(hits[0].content, "Q: How to print, quickly?\nA: Use the printer icon.");
        assert_eq!(hits[0].metadata.get("row"), Some(&serde_json::json!(3)));
    }

    #[tokio::test]
    async fn test_load_csv_with_short_rows() {
        let f = fixture();
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Question,Answer,Video").unwrap();
        writeln!(file, "How to add stock?,Open Inventory > Adjust.,https://example.com/v1").unwrap();
        writeln!(file, "How to close the shift?").unwrap();
        file.flush().unwrap();

        let stored = f.ingestor.load_csv(file.path(), Language::English).await.unwrap();
        assert_eq!(stored, 2);

        let hits = f.primary.similarity_search("close the shift", 2).await.unwrap();
        assert!(hits
            .iter()
            .any(|hit| hit.content == "Q: How to close the shift?\nA: "));
    }

    #[tokio::test]
    async fn test_load_csv_into_fallback_partition() {
        let f = fixture();
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Question,Answer").unwrap();
        writeln!(file, "كيف أضيف منتج؟,اذهب إلى الكتالوج").unwrap();
        file.flush().unwrap();

        let stored = f.ingestor.load_csv(file.path(), Language::Arabic).await.unwrap();
        assert_eq!(stored, 1);

        let hits = f.fallback.similarity_search("", 1).await.unwrap();
        assert_eq!(hits[0].content, "Q: كيف ءضيف منتج؟\nA: اذهب ءلى الكتالوج");
    }

    #[tokio::test]
    async fn test_load_missing_csv_fails() {
        let f = fixture();
        let result = f.ingestor.load_csv(Path::new("/nonexistent/faq.csv"), Language::English).await;
        assert!(matches!(result, Err(RagError::Ingestion(_))));
    }

    #[tokio::test]
    async fn test_clear_only_touches_one_partition() {
        let f = fixture();
        f.ingestor
            .add_texts(&["one".to_string(), "اثنان".to_string()], &[])
            .await
            .unwrap();

        assert_eq!(f.ingestor.clear(Language::English).await.unwrap(), 1);
        assert_eq!(f.ingestor.count(Language::English).await, 0);
        assert_eq!(f.ingestor.count(Language::Arabic).await, 1);
    }

    #[tokio::test]
    async fn test_total_counts() {
        let f = fixture();
        f.ingestor
            .add_texts(&["one".to_string(), "اثنان".to_string(), "three".to_string()], &[])
            .await
            .unwrap();

        assert_eq!(
            f.ingestor.total_counts().await,
            PartitionCounts {
                english: 2,
                arabic: 1,
                total: 3,
            }
        );
    }
}
