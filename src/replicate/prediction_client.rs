use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::{
    config::ReplicateConfig,
    error::{EditorError, Result},
    models::{CreatePredictionRequest, Prediction, PredictionStatus},
};

/// Deferred generation: create a prediction job, then poll its status at a
/// fixed interval until it settles. Independent of the single-shot run mode.
#[derive(Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    api_base: String,
    api_token: Option<String>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl PredictionClient {
    pub(crate) fn new(http: reqwest::Client, config: &ReplicateConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.clone(),
            api_token: config.api_token.clone(),
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
        }
    }

    fn token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .ok_or_else(|| EditorError::Configuration("Replicate API token not configured".into()))
    }

    pub async fn create(&self, version: &str, input: Value) -> Result<Prediction> {
        let token = self.token()?;
        let body = CreatePredictionRequest {
            version: version.to_string(),
            input,
        };

        let response = self
            .http
            .post(format!("{}/predictions", self.api_base))
            .header("Authorization", format!("Token {}", token))
            .json(&body)
            .send()
            .await
            .map_err(|e| EditorError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|payload| {
                    payload
                        .get("detail")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "failed to create prediction".to_string());
            log::error!("Prediction create failed ({}): {}", status, detail);
            return Err(EditorError::Generation(detail));
        }

        let prediction: Prediction = response
            .json()
            .await
            .map_err(|e| EditorError::Generation(format!("unreadable prediction: {}", e)))?;
        log::info!("Created prediction {}", prediction.id);
        Ok(prediction)
    }

    pub async fn get(&self, id: &str) -> Result<Prediction> {
        let token = self.token()?;
        let response = self
            .http
            .get(format!("{}/predictions/{}", self.api_base, id))
            .header("Authorization", format!("Token {}", token))
            .send()
            .await
            .map_err(|e| EditorError::Generation(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| EditorError::Generation(format!("unreadable prediction: {}", e)))
    }

    /// Poll an already-created prediction to a terminal state and return its
    /// output field.
    pub async fn wait(&self, prediction: Prediction) -> Result<Value> {
        let id = prediction.id.clone();
        poll_until_settled(
            prediction,
            || self.get(&id),
            self.poll_interval,
            self.poll_timeout,
        )
        .await
    }

    pub async fn create_and_wait(&self, version: &str, input: Value) -> Result<Value> {
        let prediction = self.create(version, input).await?;
        self.wait(prediction).await
    }
}

/// The polling state machine: starting/processing are re-polled after each
/// interval, succeeded yields the output, failed yields the job's reported
/// error. The wait is deadline-bounded so a stuck upstream job cannot pin a
/// request slot forever.
pub(crate) async fn poll_until_settled<F, Fut>(
    initial: Prediction,
    mut fetch: F,
    interval: Duration,
    timeout: Duration,
) -> Result<Value>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Prediction>>,
{
    let deadline = Instant::now() + timeout;
    let mut current = initial;

    loop {
        if current.status.is_terminal() {
            return match current.status {
                PredictionStatus::Succeeded => current.output.ok_or(EditorError::EmptyOutput),
                _ => Err(EditorError::Generation(
                    current
                        .error
                        .unwrap_or_else(|| "Prediction failed".to_string()),
                )),
            };
        }

        if Instant::now() >= deadline {
            log::error!("Prediction {} did not settle before deadline", current.id);
            return Err(EditorError::Generation(format!(
                "prediction {} timed out after {:.1}s",
                current.id,
                timeout.as_secs_f64()
            )));
        }

        tokio::time::sleep(interval).await;
        current = fetch().await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn prediction(status: PredictionStatus, output: Option<Value>, error: Option<&str>) -> Prediction {
        Prediction {
            id: "pred-1".to_string(),
            status,
            output,
            error: error.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_two_polls_then_succeeded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let fetch = move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 2 {
                    Ok(prediction(PredictionStatus::Processing, None, None))
                } else {
                    Ok(prediction(PredictionStatus::Succeeded, Some(json!("X")), None))
                }
            }
        };

        let output = poll_until_settled(
            prediction(PredictionStatus::Processing, None, None),
            fetch,
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(output, json!("X"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_prediction_surfaces_reported_error() {
        let err = poll_until_settled(
            prediction(PredictionStatus::Failed, None, Some("CUDA out of memory")),
            || async { panic!("terminal state must not be re-polled") },
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

        match err {
            EditorError::Generation(detail) => assert_eq!(detail, "CUDA out of memory"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stuck_job_hits_deadline() {
        let err = poll_until_settled(
            prediction(PredictionStatus::Starting, None, None),
            || async { Ok(prediction(PredictionStatus::Processing, None, None)) },
            Duration::from_millis(1),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EditorError::Generation(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_succeeded_without_output_is_empty_output() {
        let err = poll_until_settled(
            prediction(PredictionStatus::Succeeded, None, None),
            || async { panic!("terminal state must not be re-polled") },
            Duration::from_millis(1),
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, EditorError::EmptyOutput));
    }
}
