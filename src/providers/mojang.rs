// ============================================================================
// CapsFix - Mojang 数据源
// ============================================================================
//
// 文件: src/providers/mojang.rs
// 职责: 通过 HTTP 获取版本清单与原版语言文件
// 边界:
//   - ✅ 启动器版本清单请求
//   - ✅ 语言文件镜像请求（URL 模板）
//   - ✅ 404 视为不存在
//   - ❌ 不应包含缓存逻辑
//   - ❌ 不应包含重试策略
//
// ============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::core::error::SourceError;
use crate::models::config::NetworkConfig;
use crate::models::language::LanguageFileData;
use crate::models::version::VersionManifest;
use crate::providers::{LanguageFileSource, VersionManifestSource};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 启动器清单与语言文件镜像客户端
#[derive(Debug, Clone)]
pub struct MojangClient {
    client: Client,
    manifest_url: String,
    assets_url: String,
}

impl MojangClient {
    pub fn new(network: &NetworkConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(network.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, network))
    }

    pub fn with_client(client: Client, network: &NetworkConfig) -> Self {
        Self {
            client,
            manifest_url: network.manifest_url.clone(),
            assets_url: network.assets_url.clone(),
        }
    }

    /// 展开语言文件 URL 模板中的 `{version}` 与 `{language}`
    pub fn language_file_url(&self, version: &str, language: &str) -> String {
        expand_assets_url(&self.assets_url, version, language)
    }

    /// GET 请求并返回响应文本；404 返回 `None`
    async fn get_text(&self, url: &str) -> Result<Option<String>, SourceError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.text().await?)),
            status => Err(SourceError::UnexpectedResponse {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

pub fn expand_assets_url(template: &str, version: &str, language: &str) -> String {
    template
        .replace("{version}", version)
        .replace("{language}", language)
}

#[async_trait]
impl VersionManifestSource for MojangClient {
    async fn fetch_manifest(&self) -> Result<VersionManifest, SourceError> {
        let body = self
            .get_text(&self.manifest_url)
            .await?
            .ok_or_else(|| SourceError::NotFound(self.manifest_url.clone()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LanguageFileSource for MojangClient {
    async fn language_file(
        &self,
        version: &str,
        language: &str,
    ) -> Result<Option<LanguageFileData>, SourceError> {
        let url = self.language_file_url(version, language);
        match self.get_text(&url).await? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => {
                tracing::debug!(version, language, "language file not found");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_url_template_is_expanded() {
        let client = MojangClient::with_client(Client::new(), &NetworkConfig::default());
        let url = client.language_file_url("1.19.4", "en_gb");
        assert!(url.contains("/1.19.4/"), "{url}");
        assert!(url.ends_with("/en_gb.json"), "{url}");
    }

    #[test]
    fn custom_template() {
        assert_eq!(
            expand_assets_url("http://mirror/{language}@{version}", "23w12a", "en_us"),
            "http://mirror/en_us@23w12a"
        );
    }

    #[test]
    fn manifest_wire_format_parses() {
        let body = r#"{
            "latest": {"release": "1.19.4", "snapshot": "23w12a"},
            "versions": [
                {"id": "23w12a", "type": "snapshot", "url": "x", "releaseTime": "2023-03-22T12:56:18+00:00"},
                {"id": "1.19.4", "type": "release", "url": "y", "releaseTime": "2023-03-14T12:56:18+00:00"}
            ]
        }"#;
        let manifest: VersionManifest = serde_json::from_str(body).unwrap();
        assert_eq!(manifest.latest.snapshot, "23w12a");
        assert!(manifest.versions[1].is_release());
    }
}
