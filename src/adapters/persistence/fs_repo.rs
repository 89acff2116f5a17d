//! Implements DocumentRepoPort. Saves documents as JSON Lines (JSONL) per kind.
//! One file per kind: data/documents/{kind}.jsonl. Append-only writes.
//! Newest-first reads use reverse block scanning from EOF for O(k) performance.

use crate::domain::{DocumentKind, DomainError, GeneratedDocument};
use crate::ports::DocumentRepoPort;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info};

/// Block size for reverse reads. Tune for disk/SSD; 4KB is a reasonable default.
const REVERSE_READ_BLOCK: u64 = 4096;

/// File-system document store. One JSONL file per document kind.
pub struct FsRepo {
    base_dir: PathBuf,
}

impl FsRepo {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn kind_path(&self, kind: DocumentKind) -> PathBuf {
        let name = match kind {
            DocumentKind::Cotizacion => "cotizaciones",
            DocumentKind::Proyecto => "proyectos",
            DocumentKind::Informe => "informes",
        };
        self.base_dir.join(format!("{}.jsonl", name))
    }

    /// Kind encoded in the id prefix (`COT-`, `PRY-`, `INF-`).
    fn kind_of(id: &str) -> Option<DocumentKind> {
        let prefix = id.split('-').next()?;
        DocumentKind::ALL.into_iter().find(|k| k.prefix() == prefix)
    }

    /// Reads up to `max_lines` lines from the end of the file (newest first) by scanning
    /// backwards in fixed-size blocks. O(k) in the number of lines read; does not scan the whole file.
    async fn read_lines_reverse(path: &Path, max_lines: usize) -> Result<Vec<String>, DomainError> {
        let mut f = match fs::File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(DomainError::Repo(e.to_string())),
        };
        let len = f
            .metadata()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?
            .len();
        if len == 0 {
            return Ok(vec![]);
        }

        let mut lines: Vec<String> = Vec::with_capacity(max_lines.min(1024));
        let mut pending: Vec<u8> = Vec::new();
        let mut pos = len;

        while lines.len() < max_lines && pos > 0 {
            let read_start = pos.saturating_sub(REVERSE_READ_BLOCK);
            let to_read = (pos - read_start) as usize;

            f.seek(SeekFrom::Start(read_start))
                .await
                .map_err(|e| DomainError::Repo(e.to_string()))?;
            let mut block = vec![0u8; to_read];
            f.read_exact(&mut block)
                .await
                .map_err(|e| DomainError::Repo(e.to_string()))?;
            pos = read_start;

            // File order: block (just read, nearer BOF) then pending (nearer EOF)
            let mut buf = block;
            buf.append(&mut pending);

            while lines.len() < max_lines {
                if let Some(last_nl) = buf.iter().rposition(|&b| b == b'\n') {
                    let line_bytes = buf.split_off(last_nl + 1);
                    buf.pop(); // drop the \n
                    if !line_bytes.is_empty() {
                        lines.push(String::from_utf8_lossy(&line_bytes).into_owned());
                    }
                } else {
                    break;
                }
            }
            pending = buf;
        }

        if lines.len() < max_lines && !pending.is_empty() {
            lines.push(String::from_utf8_lossy(&pending).into_owned());
        }

        Ok(lines)
    }

    async fn read_kind(
        &self,
        kind: DocumentKind,
        limit: usize,
    ) -> Result<Vec<GeneratedDocument>, DomainError> {
        let lines = Self::read_lines_reverse(&self.kind_path(kind), limit).await?;
        let mut out = Vec::with_capacity(lines.len());
        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<GeneratedDocument>(trimmed) {
                Ok(doc) => out.push(doc),
                Err(e) => debug!(error = %e, "skipping unreadable document line"),
            }
        }
        Ok(out)
    }
}

#[async_trait::async_trait]
impl DocumentRepoPort for FsRepo {
    /// Appends the document as one JSON object per line. Does not read the existing file.
    async fn save(&self, document: &GeneratedDocument) -> Result<(), DomainError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let path = self.kind_path(document.kind());
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        let mut line =
            serde_json::to_string(document).map_err(|e| DomainError::Repo(e.to_string()))?;
        line.push('\n');
        f.write_all(line.as_bytes())
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        f.flush()
            .await
            .map_err(|e| DomainError::Repo(e.to_string()))?;
        info!(
            path = %path.display(),
            id = document.id(),
            "saved document to disk (JSONL)"
        );
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<GeneratedDocument>, DomainError> {
        let Some(kind) = Self::kind_of(id) else {
            return Ok(None);
        };
        let docs = self.read_kind(kind, usize::MAX).await?;
        Ok(docs.into_iter().find(|d| d.id() == id))
    }

    async fn list(
        &self,
        kind: Option<DocumentKind>,
        limit: usize,
    ) -> Result<Vec<GeneratedDocument>, DomainError> {
        if limit == 0 {
            return Ok(vec![]);
        }
        let kinds: Vec<DocumentKind> = match kind {
            Some(k) => vec![k],
            None => DocumentKind::ALL.to_vec(),
        };
        let mut out = Vec::new();
        for k in kinds {
            out.extend(self.read_kind(k, limit).await?);
        }
        // Stable sort keeps file order (newest first) for equal timestamps.
        out.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        out.truncate(limit);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentHeader, PiliBrain};

    fn doc(brain: &PiliBrain, kind: DocumentKind, id: &str, created_at: i64) -> GeneratedDocument {
        brain
            .generate(
                kind,
                "oficina de 120 m2, empresa Grupo Norte",
                DocumentHeader {
                    id: id.to_string(),
                    created_at,
                },
            )
            .document
    }

    #[tokio::test]
    async fn saves_and_reads_back_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsRepo::new(dir.path());
        let brain = PiliBrain::default();

        for n in 1..=3 {
            let id = format!("COT-2025-{:04}", n);
            repo.save(&doc(&brain, DocumentKind::Cotizacion, &id, 100 + n))
                .await
                .unwrap();
        }

        let listed = repo.list(Some(DocumentKind::Cotizacion), 2).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["COT-2025-0003", "COT-2025-0002"]);

        let found = repo.get("COT-2025-0001").await.unwrap().unwrap();
        assert_eq!(found, doc(&brain, DocumentKind::Cotizacion, "COT-2025-0001", 101));
    }

    #[tokio::test]
    async fn list_merges_kinds_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsRepo::new(dir.path());
        let brain = PiliBrain::default();

        repo.save(&doc(&brain, DocumentKind::Cotizacion, "COT-2025-0001", 10))
            .await
            .unwrap();
        repo.save(&doc(&brain, DocumentKind::Informe, "INF-2025-0001", 30))
            .await
            .unwrap();
        repo.save(&doc(&brain, DocumentKind::Proyecto, "PRY-2025-0001", 20))
            .await
            .unwrap();

        let listed = repo.list(None, 10).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["INF-2025-0001", "PRY-2025-0001", "COT-2025-0001"]);
    }

    #[tokio::test]
    async fn missing_files_and_unknown_ids() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FsRepo::new(dir.path().join("nothing-here"));
        assert!(repo.list(None, 5).await.unwrap().is_empty());
        assert!(repo.get("COT-2025-0001").await.unwrap().is_none());
        assert!(repo.get("XYZ").await.unwrap().is_none());
    }
}
