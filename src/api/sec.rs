use super::FilingProvider;
use crate::models::{Company, Filing};
use crate::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio::time::Duration;

const SEC_DATA_BASE: &str = "https://data.sec.gov";
const SEC_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Connection settings for SEC EDGAR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecConfig {
    /// EDGAR rejects requests without a descriptive User-Agent ("Name email")
    pub user_agent: String,
    pub base_url: String,
    pub tickers_url: String,
    /// How many recent filings to report
    pub recent_limit: usize,
}

impl Default for SecConfig {
    fn default() -> Self {
        Self {
            user_agent: "sentiment-engine admin@example.com".to_string(),
            base_url: SEC_DATA_BASE.to_string(),
            tickers_url: SEC_TICKERS_URL.to_string(),
            recent_limit: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    cik_str: u64,
    ticker: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Clone)]
struct CompanyEntry {
    cik: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Submissions {
    filings: SubmissionFilings,
}

#[derive(Debug, Deserialize)]
struct SubmissionFilings {
    recent: RecentFilings,
}

/// EDGAR returns recent filings column-wise
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    #[serde(default)]
    form: Vec<String>,
    #[serde(default)]
    filing_date: Vec<String>,
    #[serde(default)]
    primary_doc_description: Vec<String>,
}

impl RecentFilings {
    fn into_filings(self) -> Vec<Filing> {
        let mut descriptions = self.primary_doc_description.into_iter();
        self.form
            .into_iter()
            .zip(self.filing_date)
            .map(|(form_type, filing_date)| Filing {
                form_type,
                filing_date,
                description: descriptions.next().unwrap_or_default(),
            })
            .collect()
    }
}

/// SEC EDGAR client
///
/// The ticker -> company table is downloaded once and shared by all clones.
/// A failed download is retried on the next lookup.
#[derive(Clone)]
pub struct SecClient {
    client: Client,
    config: SecConfig,
    companies: Arc<OnceCell<HashMap<String, CompanyEntry>>>,
}

impl SecClient {
    pub fn new(config: SecConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            companies: Arc::new(OnceCell::new()),
        })
    }

    /// Resolve a ticker to its CIK and registered company name
    pub async fn lookup_company(&self, ticker: &str) -> Result<Option<Company>> {
        let ticker = ticker.trim().to_uppercase();
        let companies = self.company_table().await?;

        Ok(companies.get(&ticker).map(|entry| Company {
            cik: format!("{:010}", entry.cik),
            name: entry.name.clone(),
            ticker,
        }))
    }

    /// Resolve a ticker to its zero-padded 10 digit CIK
    pub async fn lookup_cik(&self, ticker: &str) -> Result<Option<String>> {
        Ok(self.lookup_company(ticker).await?.map(|company| company.cik))
    }

    async fn company_table(&self) -> Result<&HashMap<String, CompanyEntry>> {
        self.companies
            .get_or_try_init(|| self.fetch_company_table())
            .await
    }

    async fn fetch_company_table(&self) -> Result<HashMap<String, CompanyEntry>> {
        let entries: HashMap<String, TickerEntry> = self
            .client
            .get(&self.config.tickers_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let companies: HashMap<String, CompanyEntry> = entries
            .into_values()
            .map(|entry| {
                (
                    entry.ticker.to_uppercase(),
                    CompanyEntry {
                        cik: entry.cik_str,
                        name: entry.title,
                    },
                )
            })
            .collect();

        tracing::info!("Loaded {} SEC ticker mappings", companies.len());
        Ok(companies)
    }

    /// Fetch recent filings for a ticker, newest first
    pub async fn fetch_company_filings(&self, ticker: &str) -> Result<Option<Vec<Filing>>> {
        let Some(cik) = self.lookup_cik(ticker).await? else {
            tracing::warn!("Could not find CIK for ticker {}", ticker);
            return Ok(None);
        };

        let url = format!("{}/submissions/CIK{}.json", self.config.base_url, cik);
        let submissions: Submissions = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let filings = submissions.filings.recent.into_filings();
        tracing::debug!(ticker = %ticker, cik = %cik, count = filings.len(), "Fetched SEC filings");

        Ok(Some(filings))
    }
}

#[async_trait]
impl FilingProvider for SecClient {
    async fn company_filings(&self, ticker: &str) -> Result<Option<Vec<Filing>>> {
        self.fetch_company_filings(ticker).await
    }

    async fn company_name(&self, ticker: &str) -> Result<Option<String>> {
        Ok(self
            .lookup_company(ticker)
            .await?
            .map(|company| company.name)
            .filter(|name| !name.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_filings_columns() {
        let json = r#"{
            "form": ["10-Q", "8-K"],
            "filingDate": ["2024-11-01", "2024-10-30"],
            "primaryDocDescription": ["Quarterly report"]
        }"#;
        let recent: RecentFilings = serde_json::from_str(json).unwrap();
        let filings = recent.into_filings();

        assert_eq!(filings.len(), 2);
        assert_eq!(filings[0].form_type, "10-Q");
        assert_eq!(filings[0].description, "Quarterly report");
        assert_eq!(filings[1].filing_date, "2024-10-30");
        assert_eq!(filings[1].description, "");
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let config = SecConfig {
            user_agent: "bad\nagent".to_string(),
            ..SecConfig::default()
        };
        assert!(SecClient::new(config).is_err());
    }

    #[tokio::test]
    #[ignore] // Ignore by default to avoid hitting the SEC in tests
    async fn test_lookup_cik_live() {
        let client = SecClient::new(SecConfig::default()).unwrap();
        let cik = client.lookup_cik("aapl").await.unwrap();
        assert_eq!(cik.as_deref(), Some("0000320193"));
    }
}
