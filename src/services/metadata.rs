//! 页面元数据抓取
//!
//! 跳转前抓取目标页面的 OpenGraph 信息并写入访问事件。
//! ureq 是阻塞客户端，请求在 `spawn_blocking` 中执行。

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use ureq::Agent;

use crate::config::MetadataConfig;
use crate::errors::{Result, ShortleakError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: Option<String>,
    pub url: Option<String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageMetadata>;
}

/// 按配置构造抓取器，关闭时返回空实现
pub fn build_fetcher(config: &MetadataConfig) -> Result<Arc<dyn MetadataFetcher>> {
    if config.enabled {
        Ok(Arc::new(HttpMetadataFetcher::new(config)?))
    } else {
        warn!("Metadata fetching disabled, visit events will carry empty ogData");
        Ok(Arc::new(DisabledMetadataFetcher))
    }
}

/// 从 HTML 中提取元数据
pub struct MetaParser {
    meta_tag: Regex,
    attribute: Regex,
    title: Regex,
}

impl MetaParser {
    pub fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            meta_tag: Regex::new(r"(?is)<meta\b[^>]*>")?,
            attribute: Regex::new(
                r#"(?is)\b([a-z:_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
            )?,
            title: Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>")?,
        })
    }

    /// og:* 优先，缺失时回退到 `<title>` 和 `<meta name="description">`
    pub fn parse(&self, html: &str) -> PageMetadata {
        let mut meta = PageMetadata::default();
        let mut fallback_description = None;

        for tag in self.meta_tag.find_iter(html) {
            let mut key = None;
            let mut content = None;
            for cap in self.attribute.captures_iter(tag.as_str()) {
                let name = cap[1].to_ascii_lowercase();
                let value = cap
                    .get(2)
                    .or_else(|| cap.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                match name.as_str() {
                    "property" | "name" if key.is_none() => key = Some(value.to_ascii_lowercase()),
                    "content" => content = Some(decode_entities(value.trim())),
                    _ => {}
                }
            }

            let (Some(key), Some(content)) = (key, content) else {
                continue;
            };
            if content.is_empty() {
                continue;
            }

            let slot = match key.as_str() {
                "og:title" => &mut meta.title,
                "og:description" => &mut meta.description,
                "og:image" => &mut meta.image,
                "og:site_name" => &mut meta.site_name,
                "og:url" => &mut meta.url,
                "description" => &mut fallback_description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(content);
            }
        }

        if meta.title.is_none() {
            meta.title = self
                .title
                .captures(html)
                .map(|cap| decode_entities(cap[1].trim()))
                .filter(|t| !t.is_empty());
        }
        if meta.description.is_none() {
            meta.description = fallback_description;
        }

        meta
    }
}

fn decode_entities(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

pub struct HttpMetadataFetcher {
    agent: Agent,
    parser: Arc<MetaParser>,
    max_body_bytes: u64,
}

impl HttpMetadataFetcher {
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .http_status_as_error(false)
            .build()
            .into();
        let parser = MetaParser::new()
            .map_err(|e| ShortleakError::metadata_fetch(format!("invalid meta pattern: {}", e)))?;

        Ok(Self {
            agent,
            parser: Arc::new(parser),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// 只读取前 `max_body_bytes` 字节；状态码与编码都不影响解析
    fn fetch_sync(agent: &Agent, url: &str, max_body_bytes: u64) -> Result<String> {
        let mut resp = agent
            .get(url)
            .call()
            .map_err(|e| ShortleakError::metadata_fetch(format!("GET {} failed: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            debug!("{} answered {}, parsing body anyway", url, status);
        }

        let mut buf = Vec::new();
        resp.body_mut()
            .as_reader()
            .take(max_body_bytes)
            .read_to_end(&mut buf)
            .map_err(|e| {
                ShortleakError::metadata_fetch(format!("reading {} failed: {}", url, e))
            })?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[async_trait]
impl MetadataFetcher for HttpMetadataFetcher {
    async fn fetch(&self, url: &str) -> Result<PageMetadata> {
        let agent = self.agent.clone();
        let parser = Arc::clone(&self.parser);
        let max_body_bytes = self.max_body_bytes;
        let target = url.to_string();

        let meta = tokio::task::spawn_blocking(move || {
            let html = Self::fetch_sync(&agent, &target, max_body_bytes)?;
            trace!("Fetched {} bytes from {}", html.len(), target);
            Ok::<_, ShortleakError>(parser.parse(&html))
        })
        .await
        .map_err(|e| ShortleakError::metadata_fetch(format!("fetch task failed: {}", e)))??;

        debug!("Metadata for {}: title={:?}", url, meta.title);
        Ok(meta)
    }
}

/// 不发起任何请求
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMetadataFetcher;

#[async_trait]
impl MetadataFetcher for DisabledMetadataFetcher {
    async fn fetch(&self, _url: &str) -> Result<PageMetadata> {
        Ok(PageMetadata::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> MetaParser {
        MetaParser::new().unwrap()
    }

    #[test]
    fn test_parse_open_graph() {
        let html = r#"
            <html><head>
            <title>Fallback</title>
            <meta property="og:title" content="Rust &amp; Friends">
            <meta content="A page about crabs" property="og:description" />
            <meta property='og:image' content='https://example.com/crab.png'>
            <meta property="og:site_name" content="Example">
            <meta property="og:url" content="https://example.com/">
            </head></html>
        "#;
        let meta = parser().parse(html);
        assert_eq!(meta.title.as_deref(), Some("Rust & Friends"));
        assert_eq!(meta.description.as_deref(), Some("A page about crabs"));
        assert_eq!(
            meta.image.as_deref(),
            Some("https://example.com/crab.png")
        );
        assert_eq!(meta.site_name.as_deref(), Some("Example"));
        assert_eq!(meta.url.as_deref(), Some("https://example.com/"));
    }

    #[test]
    fn test_parse_fallbacks() {
        let html = r#"<HEAD><TITLE> Plain page </TITLE>
            <meta name="Description" content="Described"></HEAD>"#;
        let meta = parser().parse(html);
        assert_eq!(meta.title.as_deref(), Some("Plain page"));
        assert_eq!(meta.description.as_deref(), Some("Described"));
        assert!(meta.image.is_none());
    }

    #[test]
    fn test_parse_empty_document() {
        let meta = parser().parse("not html at all");
        assert!(meta.is_empty());
    }

    #[test]
    fn test_first_value_wins() {
        let html = r#"<meta property="og:title" content="First">
                      <meta property="og:title" content="Second">"#;
        assert_eq!(parser().parse(html).title.as_deref(), Some("First"));
    }

    #[tokio::test]
    async fn test_disabled_fetcher_returns_empty() {
        let meta = DisabledMetadataFetcher
            .fetch("https://example.com")
            .await
            .unwrap();
        assert!(meta.is_empty());
    }

    /// 本地单次 HTTP 服务，返回固定响应后关闭连接
    fn serve_once(response: Vec<u8>) -> String {
        use std::io::Write;
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut req = [0u8; 4096];
                let _ = stream.read(&mut req);
                let _ = stream.write_all(&response);
                let _ = stream.flush();
            }
        });
        format!("http://{}/", addr)
    }

    fn http_response(status: &str, body: &[u8]) -> Vec<u8> {
        let mut resp = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            body.len()
        )
        .into_bytes();
        resp.extend_from_slice(body);
        resp
    }

    fn local_fetcher(max_body_bytes: u64) -> HttpMetadataFetcher {
        HttpMetadataFetcher::new(&MetadataConfig {
            enabled: true,
            timeout_secs: 5,
            max_body_bytes,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_oversized_page_is_truncated() {
        let mut body = b"<html><head><title>Big page</title></head><body>".to_vec();
        body.extend(std::iter::repeat_n(b'x', 4096));
        body.extend_from_slice(b"</body></html>");
        let url = serve_once(http_response("200 OK", &body));

        let meta = local_fetcher(1024).fetch(&url).await.unwrap();
        assert_eq!(meta.title.as_deref(), Some("Big page"));
    }

    #[tokio::test]
    async fn test_non_utf8_page_is_decoded_lossily() {
        let url = serve_once(http_response("200 OK", b"<title>Caf\xe9</title>"));

        let meta = local_fetcher(1024).fetch(&url).await.unwrap();
        assert_eq!(meta.title.as_deref(), Some("Caf\u{FFFD}"));
    }

    #[tokio::test]
    async fn test_error_status_page_is_still_parsed() {
        let url = serve_once(http_response(
            "404 Not Found",
            b"<title>Not Found</title><meta property=\"og:site_name\" content=\"Example\">",
        ));

        let meta = local_fetcher(1024).fetch(&url).await.unwrap();
        assert_eq!(meta.title.as_deref(), Some("Not Found"));
        assert_eq!(meta.site_name.as_deref(), Some("Example"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let fetcher = HttpMetadataFetcher::new(&MetadataConfig {
            enabled: true,
            timeout_secs: 1,
            max_body_bytes: 1024,
        })
        .unwrap();
        let err = fetcher.fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert!(matches!(err, ShortleakError::MetadataFetch(_)));
    }
}
