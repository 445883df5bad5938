use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use std::sync::Arc;
use tracing::{error, info, warn};

const SINGLE_SYSTEM_PROMPT: &str = "You are an address verification expert. Given an address, verify and correct it to its proper format. Return only the corrected address without any additional text or explanation.";

const BATCH_SYSTEM_PROMPT: &str = "You are an address verification expert. Given a list of addresses, verify and correct each one to its proper format. Return each corrected address on a new line without any additional text or explanation.";

/// Returned when the single-address reply has no content
pub const UNABLE_TO_VERIFY: &str = "Unable to verify address";

/// Sends addresses to the completion endpoint. Stateless; one request per call.
pub struct AddressVerificationUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    single_config: LLMConfig,
    batch_config: LLMConfig,
}

impl AddressVerificationUseCase {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        single_config: LLMConfig,
        batch_config: LLMConfig,
    ) -> Self {
        Self {
            llm_client,
            single_config,
            batch_config,
        }
    }

    pub async fn verify_address(&self, address: &str) -> Result<String> {
        let user_prompt = format!("Verify and correct this address: {}", address);

        let content = self
            .llm_client
            .generate(&self.single_config, SINGLE_SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| {
                error!(error = %e, "Error verifying address");
                AppError::LLMError("Failed to verify address".to_string())
            })?;

        Ok(content
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNABLE_TO_VERIFY.to_string()))
    }

    /// One request for the whole list; the reply is split on `\n` as-is.
    ///
    /// Nothing checks that the reply has one line per input.
    pub async fn verify_address_batch(&self, addresses: &[String]) -> Result<Vec<String>> {
        let user_prompt = format!(
            "Verify and correct these addresses:\n{}",
            addresses.join("\n")
        );

        info!(count = addresses.len(), model = %self.batch_config.model, "Verifying address batch");

        let content = self
            .llm_client
            .generate(&self.batch_config, BATCH_SYSTEM_PROMPT, &user_prompt)
            .await
            .map_err(|e| {
                error!(error = %e, "Error verifying addresses");
                AppError::LLMError("Failed to verify addresses".to_string())
            })?;

        let verified = split_lines(content.as_deref());

        if verified.len() != addresses.len() {
            warn!(
                sent = addresses.len(),
                received = verified.len(),
                "Verified line count does not match input count"
            );
        }

        Ok(verified)
    }
}

/// No content gives no lines; empty content gives one empty line.
fn split_lines(content: Option<&str>) -> Vec<String> {
    content
        .map(|c| c.split('\n').map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted stand-in for the completion endpoint
    pub(crate) struct FakeLLMClient {
        reply: std::result::Result<Option<String>, String>,
        pub calls: Mutex<Vec<(LLMConfig, String, String)>>,
    }

    impl FakeLLMClient {
        pub(crate) fn replying(content: Option<&str>) -> Self {
            Self {
                reply: Ok(content.map(str::to_string)),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMClient for FakeLLMClient {
        async fn generate(
            &self,
            config: &LLMConfig,
            system: &str,
            user: &str,
        ) -> Result<Option<String>> {
            self.calls.lock().unwrap().push((
                config.clone(),
                system.to_string(),
                user.to_string(),
            ));
            match &self.reply {
                Ok(content) => Ok(content.clone()),
                Err(message) => Err(AppError::LLMError(message.clone())),
            }
        }
    }

    pub(crate) fn use_case(client: Arc<FakeLLMClient>) -> AddressVerificationUseCase {
        AddressVerificationUseCase::new(
            client,
            LLMConfig::default(),
            LLMConfig {
                model: "gpt-4".to_string(),
                max_tokens: Some(1000),
                ..LLMConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_verify_single_address() {
        let client = Arc::new(FakeLLMClient::replying(Some(
            "1 Main St, Springfield, IL 62704",
        )));
        let verified = use_case(client.clone())
            .verify_address("1 Main St, Springfield, IL")
            .await
            .unwrap();

        assert_eq!(verified, "1 Main St, Springfield, IL 62704");

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.model, "gpt-4o");
        assert_eq!(calls[0].0.max_tokens, Some(150));
        assert_eq!(calls[0].1, SINGLE_SYSTEM_PROMPT);
        assert_eq!(
            calls[0].2,
            "Verify and correct this address: 1 Main St, Springfield, IL"
        );
    }

    #[tokio::test]
    async fn test_single_fallback_when_no_content() {
        let client = Arc::new(FakeLLMClient::replying(None));
        let verified = use_case(client).verify_address("x").await.unwrap();
        assert_eq!(verified, UNABLE_TO_VERIFY);

        let client = Arc::new(FakeLLMClient::replying(Some("")));
        let verified = use_case(client).verify_address("x").await.unwrap();
        assert_eq!(verified, UNABLE_TO_VERIFY);
    }

    #[tokio::test]
    async fn test_single_failure_is_generic() {
        let client = Arc::new(FakeLLMClient::failing("401 Unauthorized"));
        let err = use_case(client).verify_address("x").await.unwrap_err();
        assert_eq!(err.to_string(), "LLM error: Failed to verify address");
    }

    #[tokio::test]
    async fn test_batch_prompt_and_split() {
        let client = Arc::new(FakeLLMClient::replying(Some("A1\nB1\nC1")));
        let addresses = vec!["A".to_string(), "B".to_string(), "C".to_string()];

        let verified = use_case(client.clone())
            .verify_address_batch(&addresses)
            .await
            .unwrap();
        assert_eq!(verified, vec!["A1", "B1", "C1"]);

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.model, "gpt-4");
        assert_eq!(calls[0].0.max_tokens, Some(1000));
        assert_eq!(calls[0].1, BATCH_SYSTEM_PROMPT);
        assert_eq!(calls[0].2, "Verify and correct these addresses:\nA\nB\nC");
    }

    #[tokio::test]
    async fn test_batch_keeps_blank_lines() {
        let client = Arc::new(FakeLLMClient::replying(Some("A1\n\nC1\n")));
        let verified = use_case(client)
            .verify_address_batch(&["A".to_string()])
            .await
            .unwrap();
        assert_eq!(verified, vec!["A1", "", "C1", ""]);
    }

    #[tokio::test]
    async fn test_batch_without_content_is_empty() {
        let client = Arc::new(FakeLLMClient::replying(None));
        let verified = use_case(client)
            .verify_address_batch(&["A".to_string()])
            .await
            .unwrap();
        assert!(verified.is_empty());
    }

    #[tokio::test]
    async fn test_batch_failure_is_generic() {
        let client = Arc::new(FakeLLMClient::failing("timeout"));
        let err = use_case(client)
            .verify_address_batch(&["A".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "LLM error: Failed to verify addresses");
    }
}
