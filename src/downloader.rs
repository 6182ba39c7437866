use crate::crawlers::fetcher::HttpFetcher;
use crate::error::CrawlError;
use crate::results::{DownloadOutcome, DownloadedFile, PdfReference};
use crate::utils::file_name_for;
use futures_util::StreamExt;
use reqwest::Response;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Settings shared by every download worker
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub output_dir: PathBuf,
    pub max_downloads: usize,
    pub queue_capacity: usize,
    pub verify_pdf: bool,
}

/// Streams one PDF into the output directory, overwriting any existing file
pub async fn download(
    fetcher: &HttpFetcher,
    reference: &PdfReference,
    output_dir: &Path,
    verify_pdf: bool,
) -> Result<DownloadedFile, CrawlError> {
    let file_name = file_name_for(reference);

    let response = match fetcher.fetch_stream(&reference.url).await {
        Ok(response) => response,
        Err(e) => {
            ::log::error!("Error downloading PDF {}: {}", file_name, e);
            return Err(e);
        }
    };

    let path = output_dir.join(&file_name);
    match write_body(response, &path, &reference.url, verify_pdf).await {
        Ok(bytes) => {
            ::log::info!("Downloaded PDF: {}", file_name);
            Ok(DownloadedFile {
                url: reference.url.clone(),
                path,
                bytes,
            })
        }
        Err(e) => {
            match &e {
                CrawlError::NotPdf { .. } => {
                    ::log::error!("Rejected {}: body is not a PDF document", file_name)
                }
                CrawlError::Http { .. } => {
                    ::log::error!("Error downloading PDF {}: {}", file_name, e)
                }
                _ => ::log::error!("Error writing file {}: {}", path.display(), e),
            }
            Err(e)
        }
    }
}

/// Writes the body chunk by chunk; a failed write leaves the partial file behind
async fn write_body(
    response: Response,
    path: &Path,
    url: &str,
    verify_pdf: bool,
) -> Result<u64, CrawlError> {
    let mut file = File::create(path)
        .await
        .map_err(|e| CrawlError::io(path, e))?;
    let mut stream = response.bytes_stream();
    let mut header: Vec<u8> = Vec::with_capacity(PDF_MAGIC.len());
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CrawlError::http(url, e))?;

        if verify_pdf && header.len() < PDF_MAGIC.len() {
            let wanted = (PDF_MAGIC.len() - header.len()).min(chunk.len());
            header.extend_from_slice(&chunk[..wanted]);
            if !PDF_MAGIC.starts_with(&header) {
                return reject_non_pdf(file, path, url).await;
            }
        }

        file.write_all(&chunk)
            .await
            .map_err(|e| CrawlError::io(path, e))?;
        written += chunk.len() as u64;
    }

    if verify_pdf && header.len() < PDF_MAGIC.len() {
        return reject_non_pdf(file, path, url).await;
    }

    file.flush().await.map_err(|e| CrawlError::io(path, e))?;
    Ok(written)
}

async fn reject_non_pdf(file: File, path: &Path, url: &str) -> Result<u64, CrawlError> {
    drop(file);
    if let Err(e) = tokio::fs::remove_file(path).await {
        ::log::warn!("Failed to remove rejected file {}: {}", path.display(), e);
    }
    Err(CrawlError::NotPdf {
        url: url.to_string(),
    })
}

/// One lock per output file name, so two workers never write the same file
#[derive(Debug, Default)]
struct FileLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileLocks {
    async fn lock_for(&self, file_name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        Arc::clone(locks.entry(file_name.to_string()).or_default())
    }
}

/// Fixed set of download workers fed by a bounded queue.
///
/// `submit` waits while the queue is full. `finish` closes the queue and
/// waits for every queued download to settle. Downloads sharing a file name
/// run one after another, so the file always holds one complete body.
pub struct DownloadPool {
    queue: mpsc::Sender<PdfReference>,
    workers: Vec<JoinHandle<Vec<DownloadOutcome>>>,
}

impl DownloadPool {
    /// Spawn `options.max_downloads` workers on the current runtime
    pub fn spawn(fetcher: Arc<HttpFetcher>, options: DownloadOptions) -> Self {
        let (queue, rx) = mpsc::channel::<PdfReference>(options.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let options = Arc::new(options);
        let file_locks = Arc::new(FileLocks::default());

        let workers = (0..options.max_downloads.max(1))
            .map(|worker_id| {
                let fetcher = Arc::clone(&fetcher);
                let rx = Arc::clone(&rx);
                let options = Arc::clone(&options);
                let file_locks = Arc::clone(&file_locks);
                ::log::trace!("Spawning download worker {}", worker_id);
                tokio::spawn(async move {
                    worker_loop(worker_id, fetcher, rx, options, file_locks).await
                })
            })
            .collect();

        Self { queue, workers }
    }

    /// Queue a reference for download
    pub async fn submit(&self, reference: PdfReference) -> Result<(), CrawlError> {
        ::log::debug!("Queuing download: {}", reference.url);
        self.queue
            .send(reference)
            .await
            .map_err(|_| CrawlError::QueueClosed)
    }

    /// Close the queue and wait for all workers
    pub async fn finish(self) -> Vec<DownloadOutcome> {
        drop(self.queue);

        let mut outcomes = Vec::new();
        for handle in self.workers {
            match handle.await {
                Ok(worker_outcomes) => outcomes.extend(worker_outcomes),
                Err(e) => ::log::error!("Download worker terminated abnormally: {}", e),
            }
        }
        outcomes
    }
}

async fn worker_loop(
    worker_id: usize,
    fetcher: Arc<HttpFetcher>,
    rx: Arc<Mutex<mpsc::Receiver<PdfReference>>>,
    options: Arc<DownloadOptions>,
    file_locks: Arc<FileLocks>,
) -> Vec<DownloadOutcome> {
    let mut outcomes = Vec::new();

    loop {
        let next = { rx.lock().await.recv().await };
        let Some(reference) = next else {
            break;
        };

        let file_lock = file_locks.lock_for(&file_name_for(&reference)).await;
        let _writing = file_lock.lock().await;

        ::log::trace!("Worker {} downloading {}", worker_id, reference.url);
        let outcome = match download(&fetcher, &reference, &options.output_dir, options.verify_pdf)
            .await
        {
            Ok(file) => DownloadOutcome::Saved(file),
            Err(e) => DownloadOutcome::Failed {
                url: reference.url.clone(),
                file_name: file_name_for(&reference),
                error: e.to_string(),
            },
        };
        outcomes.push(outcome);
    }

    ::log::debug!(
        "Download worker {} done after {} downloads",
        worker_id,
        outcomes.len()
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TlsPolicy;
    use crate::test_logger;
    use log::Level;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PDF_BODY: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\n%%EOF\n";

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&TlsPolicy::default(), None, None).unwrap()
    }

    async fn serve(server: &MockServer, route: &str, status: u16, body: &[u8]) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_bytes(body.to_vec()))
            .mount(server)
            .await;
    }

    fn reference(server: &MockServer, route: &str, name: &str) -> PdfReference {
        PdfReference {
            url: format!("{}{}", server.uri(), route),
            display_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_download_writes_named_file() {
        let server = MockServer::start().await;
        serve(&server, "/direktori/download_file/abc/pdf/doc1", 200, PDF_BODY).await;
        let dir = tempfile::tempdir().unwrap();

        let r = reference(&server, "/direktori/download_file/abc/pdf/doc1", "2023_Pid.B_1");
        let file = download(&fetcher(), &r, dir.path(), true).await.unwrap();

        assert_eq!(file.path, dir.path().join("2023_Pid.B_1"));
        assert_eq!(file.bytes, PDF_BODY.len() as u64);
        assert_eq!(std::fs::read(&file.path).unwrap(), PDF_BODY);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let server = MockServer::start().await;
        serve(&server, "/doc", 200, PDF_BODY).await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc"), b"stale contents that are longer").unwrap();

        let r = reference(&server, "/doc", "doc");
        download(&fetcher(), &r, dir.path(), false).await.unwrap();
        download(&fetcher(), &r, dir.path(), false).await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("doc")).unwrap(), PDF_BODY);
    }

    #[tokio::test]
    async fn test_verify_rejects_non_pdf_and_removes_file() {
        let server = MockServer::start().await;
        serve(&server, "/login", 200, b"<html>please log in</html>").await;
        serve(&server, "/tiny", 200, b"%PD").await;
        let dir = tempfile::tempdir().unwrap();

        let r = reference(&server, "/login", "login");
        let result = download(&fetcher(), &r, dir.path(), true).await;
        assert!(matches!(result, Err(CrawlError::NotPdf { .. })));
        assert!(!dir.path().join("login").exists());

        let r = reference(&server, "/tiny", "tiny");
        let result = download(&fetcher(), &r, dir.path(), true).await;
        assert!(matches!(result, Err(CrawlError::NotPdf { .. })));
        assert!(!dir.path().join("tiny").exists());

        // Without verification the body is written as-is
        let r = reference(&server, "/login", "login");
        assert!(download(&fetcher(), &r, dir.path(), false).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejection_is_logged_apart_from_write_errors() {
        test_logger::init();

        let server = MockServer::start().await;
        serve(&server, "/login", 200, b"<html>please log in</html>").await;
        let dir = tempfile::tempdir().unwrap();

        let r = reference(&server, "/login", "login");
        let result = download(&fetcher(), &r, dir.path(), true).await;
        assert!(matches!(result, Err(CrawlError::NotPdf { .. })));

        let errors = test_logger::messages()
            .into_iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message)
            .collect::<Vec<_>>();
        assert_eq!(errors, vec!["Rejected login: body is not a PDF document".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_request_is_logged_as_download_error() {
        test_logger::init();

        let server = MockServer::start().await;
        serve(&server, "/gone", 404, b"").await;
        let dir = tempfile::tempdir().unwrap();

        let r = reference(&server, "/gone", "gone");
        assert!(download(&fetcher(), &r, dir.path(), false).await.is_err());

        let errors = test_logger::messages()
            .into_iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message)
            .collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error downloading PDF gone"));
    }

    #[tokio::test]
    async fn test_same_file_name_downloads_do_not_interleave() {
        let server = MockServer::start().await;
        let long_body = [PDF_BODY, &[b'x'; 64 * 1024][..]].concat();
        Mock::given(method("GET"))
            .and(path("/long"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(long_body.clone()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/short"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(PDF_BODY.to_vec())
                    .set_delay(Duration::from_millis(20)),
            )
            .mount(&server)
            .await;
        let dir = tempfile::tempdir().unwrap();

        let pool = DownloadPool::spawn(
            Arc::new(fetcher()),
            DownloadOptions {
                output_dir: dir.path().to_path_buf(),
                max_downloads: 2,
                queue_capacity: 4,
                verify_pdf: false,
            },
        );
        pool.submit(reference(&server, "/long", "Putusan 1")).await.unwrap();
        pool.submit(reference(&server, "/short", "Putusan 1")).await.unwrap();
        let outcomes = pool.finish().await;

        assert!(outcomes.iter().all(DownloadOutcome::is_saved));
        let written = std::fs::read(dir.path().join("Putusan 1")).unwrap();
        assert!(written == long_body || written == PDF_BODY);
    }

    #[tokio::test]
    async fn test_missing_output_dir_is_a_write_error() {
        let server = MockServer::start().await;
        serve(&server, "/doc", 200, PDF_BODY).await;
        let dir = tempfile::tempdir().unwrap();

        let r = reference(&server, "/doc", "doc");
        let result = download(&fetcher(), &r, &dir.path().join("absent"), false).await;
        assert!(matches!(result, Err(CrawlError::Io { .. })));
    }

    #[tokio::test]
    async fn test_pool_waits_for_every_download() {
        let server = MockServer::start().await;
        serve(&server, "/a", 200, PDF_BODY).await;
        serve(&server, "/b", 200, PDF_BODY).await;
        serve(&server, "/c", 200, PDF_BODY).await;
        serve(&server, "/gone", 404, b"").await;
        let dir = tempfile::tempdir().unwrap();

        let pool = DownloadPool::spawn(
            Arc::new(fetcher()),
            DownloadOptions {
                output_dir: dir.path().to_path_buf(),
                max_downloads: 2,
                queue_capacity: 1,
                verify_pdf: false,
            },
        );
        for name in ["a", "b", "c", "gone"] {
            pool.submit(reference(&server, &format!("/{name}"), name))
                .await
                .unwrap();
        }
        let outcomes = pool.finish().await;

        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes.iter().filter(|o| o.is_saved()).count(), 3);
        for name in ["a", "b", "c"] {
            assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), PDF_BODY);
        }
        assert!(outcomes.iter().any(|o| matches!(
            o,
            DownloadOutcome::Failed { file_name, .. } if file_name == "gone"
        )));
    }
}
