// ============================================================================
// CapsFix - Mojira 漏洞追踪客户端
// ============================================================================
//
// 文件: src/providers/mojira.rs
// 职责: 通过 Jira REST API 查询漏洞报告
// 边界:
//   - ✅ 工单查询（跟随重定向得到规范键）
//   - ✅ 解决结果 / 状态 / 版本字段解析
//   - ✅ Mojira 版本名称转换为版本 ID
//   - ❌ 不应包含修复规则校验逻辑
//
// ============================================================================

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::core::error::SourceError;
use crate::models::bug::{BugReport, Resolution, Status};
use crate::models::config::NetworkConfig;
use crate::models::version::VersionId;
use crate::providers::BugTracker;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const ISSUE_FIELDS: &str = "resolution,status,fixVersions,versions";

/// Mojira 客户端
#[derive(Debug, Clone)]
pub struct MojiraClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    key: String,
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueFields {
    #[serde(default)]
    resolution: Option<NamedField>,
    #[serde(default)]
    status: Option<NamedField>,
    #[serde(default)]
    fix_versions: Vec<NamedField>,
    #[serde(default)]
    versions: Vec<NamedField>,
}

#[derive(Debug, Deserialize)]
struct NamedField {
    #[serde(default)]
    id: Option<String>,
    name: String,
}

impl MojiraClient {
    pub fn new(network: &NetworkConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(network.user_agent.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: network.bug_tracker_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn issue_url(&self, key: &str) -> String {
        format!(
            "{}/rest/api/2/issue/{}?fields={}",
            self.base_url, key, ISSUE_FIELDS
        )
    }
}

#[async_trait]
impl BugTracker for MojiraClient {
    async fn lookup(&self, key: &str) -> Result<Option<BugReport>, SourceError> {
        let url = self.issue_url(key);
        tracing::debug!(bug = key, url = %url, "GET");
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                Ok(Some(parse_issue(&body)?))
            }
            status => Err(SourceError::UnexpectedResponse {
                url,
                status: status.as_u16(),
            }),
        }
    }
}

/// 解析 issue 响应
fn parse_issue(body: &str) -> Result<BugReport, SourceError> {
    let issue: IssueResponse = serde_json::from_str(body)?;
    let fields = issue.fields;

    let resolution = fields
        .resolution
        .and_then(|field| field.id)
        .and_then(|id| id.parse::<u32>().ok())
        .and_then(Resolution::from_id);
    let status = fields
        .status
        .map(|field| Status::from_name(&field.name))
        .unwrap_or_default();

    Ok(BugReport {
        key: issue.key,
        resolution,
        status,
        fix_versions: convert_versions(&fields.fix_versions),
        affects_versions: convert_versions(&fields.versions),
    })
}

fn convert_versions(fields: &[NamedField]) -> Vec<VersionId> {
    fields
        .iter()
        .filter_map(|field| version_id_from_name(&field.name))
        .collect()
}

/// 将 Mojira 版本名称转换为版本 ID
///
/// - `Minecraft 1.19.3` → `1.19.3`
/// - `1.19.3 Pre-release 1` → `1.19.3-pre1`
/// - `1.20 Release Candidate 2` → `1.20-rc2`
/// - `Future Version - 1.20+` 不对应任何版本
pub fn version_id_from_name(name: &str) -> Option<VersionId> {
    let name = name.trim();
    let name = name.strip_prefix("Minecraft ").unwrap_or(name).trim();

    if name.is_empty() || name.starts_with("Future Version") {
        return None;
    }

    for (label, suffix) in [(" Pre-release ", "-pre"), (" Release Candidate ", "-rc")] {
        if let Some((base, number)) = name.split_once(label) {
            return Some(format!("{}{}{}", base.trim(), suffix, number.trim()));
        }
    }

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_names() {
        assert_eq!(version_id_from_name("1.19.3").as_deref(), Some("1.19.3"));
        assert_eq!(version_id_from_name("Minecraft 1.19.3").as_deref(), Some("1.19.3"));
        assert_eq!(
            version_id_from_name("1.19.3 Pre-release 1").as_deref(),
            Some("1.19.3-pre1")
        );
        assert_eq!(
            version_id_from_name("1.20 Release Candidate 2").as_deref(),
            Some("1.20-rc2")
        );
        assert_eq!(version_id_from_name("23w12a").as_deref(), Some("23w12a"));
        assert_eq!(version_id_from_name("Future Version - 1.20+"), None);
    }

    #[test]
    fn issue_response_is_parsed() {
        let body = r#"{
            "key": "MC-226454",
            "fields": {
                "resolution": {"id": "1", "name": "Fixed"},
                "status": {"id": "5", "name": "Resolved"},
                "fixVersions": [{"id": "1", "name": "1.19.3 Pre-release 1"}],
                "versions": [{"id": "2", "name": "21w17a"}, {"id": "3", "name": "Future Version - 1.20+"}]
            }
        }"#;
        let report = parse_issue(body).unwrap();
        assert_eq!(report.key, "MC-226454");
        assert_eq!(report.resolution, Some(Resolution::Fixed));
        assert_eq!(report.status, Status::Resolved);
        assert_eq!(report.fix_versions, vec!["1.19.3-pre1"]);
        assert_eq!(report.affects_versions, vec!["21w17a"]);
    }

    #[test]
    fn unresolved_issue() {
        let body = r#"{"key": "MC-1", "fields": {"resolution": null, "status": {"name": "Open"}}}"#;
        let report = parse_issue(body).unwrap();
        assert_eq!(report.resolution, None);
        assert_eq!(report.status, Status::Open);
        assert!(report.fix_versions.is_empty());
    }

    #[test]
    fn issue_url_uses_rest_api() {
        let client = MojiraClient::new(&NetworkConfig::default()).unwrap();
        assert_eq!(
            client.issue_url("MC-1"),
            "https://bugs.mojang.com/rest/api/2/issue/MC-1?fields=resolution,status,fixVersions,versions"
        );
    }
}
