//! Replicate predictions API client for image generation and interpolation.
//!
//! Wraps the two generative models the pipeline depends on: Flux Schnell for
//! keyframe stills and FILM for motion interpolation between them. Prediction
//! requests are spaced by the configured cooldown to respect the service's
//! rate limit.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};

const DEFAULT_BASE_URL: &str = "https://api.replicate.com";

/// Text-to-image model used for keyframe stills.
const IMAGE_MODEL: &str = "black-forest-labs/flux-schnell";

/// Frame interpolation model (FILM).
const INTERPOLATION_MODEL: &str = "google-research/frame-interpolation";

/// Interpolation recursion depth requested from FILM.
const TIMES_TO_INTERPOLATE: u32 = 4;

/// Keyframes are generated at a fixed 16:9 aspect ratio.
const ASPECT_RATIO: &str = "16:9";

/// Overall budget for waiting on a single prediction.
const POLL_BUDGET: Duration = Duration::from_secs(600);

/// Generative media boundary: realize prompts and keyframe pairs as local
/// media files.
#[async_trait]
pub trait MediaService: Send + Sync {
    /// Generate a still image for `prompt` and write it to `dest`.
    async fn generate_image(&self, prompt: &str, dest: &Path) -> PipelineResult<()>;

    /// Synthesize the interior motion frames between two stills.
    ///
    /// Returns the decoded frame files (inside `scratch`) in display order.
    /// The endpoints themselves are never included.
    async fn interpolate(
        &self,
        first: &Path,
        second: &Path,
        scratch: &Path,
    ) -> PipelineResult<Vec<PathBuf>>;
}

/// Replicate API client.
pub struct ReplicateClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    limiter: DefaultDirectRateLimiter,
    poll_interval: Duration,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    latest_version: Option<VersionInfo>,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: serde_json::Value,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ReplicateClient {
    /// Create a client whose prediction requests are spaced by at least
    /// `cooldown`.
    pub fn new(token: impl Into<String>, cooldown: Duration) -> PipelineResult<Self> {
        let quota = Quota::with_period(cooldown)
            .ok_or_else(|| PipelineError::config("request cooldown must be non-zero"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            limiter: RateLimiter::direct(quota),
            poll_interval: Duration::from_secs(2),
        })
    }

    /// Override the API base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Shorten the status poll interval (used by tests).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Resolve a model's latest published version id.
    async fn resolve_version(&self, model: &str) -> PipelineResult<String> {
        let response = self
            .client
            .get(format!("{}/v1/models/{model}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let info: ModelInfo = Self::parse_response(response).await?;
        info.latest_version
            .map(|v| v.id)
            .ok_or_else(|| {
                PipelineError::media_service(format!("model {model} has no published version"))
            })
    }

    /// Create a prediction and wait for it to reach a terminal state.
    async fn run_prediction(
        &self,
        model: &str,
        input: serde_json::Value,
    ) -> PipelineResult<Prediction> {
        let version = self.resolve_version(model).await?;

        // space prediction requests to respect the service's rate limit
        self.limiter.until_ready().await;

        let body = serde_json::json!({ "version": version, "input": input });
        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let mut prediction: Prediction = Self::parse_response(response).await?;

        let deadline = tokio::time::Instant::now() + POLL_BUDGET;
        while matches!(prediction.status.as_str(), "starting" | "processing") {
            if tokio::time::Instant::now() >= deadline {
                return Err(PipelineError::media_service(format!(
                    "prediction {} timed out",
                    prediction.id
                )));
            }
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .client
                .get(format!("{}/v1/predictions/{}", self.base_url, prediction.id))
                .bearer_auth(&self.token)
                .send()
                .await?;
            prediction = Self::parse_response(response).await?;
            debug!(
                prediction_id = %prediction.id,
                status = %prediction.status,
                "prediction status",
            );
        }

        if prediction.status != "succeeded" {
            let detail = prediction
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            return Err(PipelineError::media_service(format!(
                "prediction {} {}: {detail}",
                prediction.id, prediction.status
            )));
        }
        Ok(prediction)
    }

    /// First URL in a prediction output (a bare string or a list of strings).
    fn first_output_url(prediction: &Prediction) -> PipelineResult<String> {
        match &prediction.output {
            serde_json::Value::String(url) => Ok(url.clone()),
            serde_json::Value::Array(items) => items
                .first()
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .ok_or_else(|| PipelineError::media_service("prediction returned no output")),
            _ => Err(PipelineError::media_service("prediction returned no output")),
        }
    }

    /// Download a result URL to `dest`, creating parent folders as needed.
    async fn download(&self, url: &str, dest: &Path) -> PipelineResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }

    /// Read a still image as a base64 data URI for upload.
    async fn data_uri(path: &Path) -> PipelineResult<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(bytes)))
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> PipelineResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PipelineError::media_service(format!(
                "API returned {status}: {body}"
            )));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MediaService for ReplicateClient {
    async fn generate_image(&self, prompt: &str, dest: &Path) -> PipelineResult<()> {
        let input = serde_json::json!({
            "prompt": prompt,
            "aspect_ratio": ASPECT_RATIO,
            "output_format": "png",
            "output_quality": 90,
            "num_outputs": 1,
            "go_fast": true,
        });
        let prediction = self.run_prediction(IMAGE_MODEL, input).await?;
        let url = Self::first_output_url(&prediction)?;
        self.download(&url, dest).await
    }

    async fn interpolate(
        &self,
        first: &Path,
        second: &Path,
        scratch: &Path,
    ) -> PipelineResult<Vec<PathBuf>> {
        let input = serde_json::json!({
            "frame1": Self::data_uri(first).await?,
            "frame2": Self::data_uri(second).await?,
            "times_to_interpolate": TIMES_TO_INTERPOLATE,
        });
        let prediction = self.run_prediction(INTERPOLATION_MODEL, input).await?;
        let url = Self::first_output_url(&prediction)?;

        let clip = scratch.join("transition.mp4");
        self.download(&url, &clip).await?;
        let frames = vidgen_media::extract_clip_frames(&clip, &scratch.join("frames")).await?;

        // the clip is scratch data; a failed delete must not fail the pair
        if let Err(e) = tokio::fs::remove_file(&clip).await {
            warn!("could not remove transition clip {}: {e}", clip.display());
        }
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prediction(status: &str, output: serde_json::Value) -> serde_json::Value {
        serde_json::json!({ "id": "pred-1", "status": status, "output": output })
    }

    async fn mock_version(server: &MockServer, model: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/models/{model}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latest_version": {"id": "version-abc"}
            })))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> ReplicateClient {
        ReplicateClient::new("test-token", Duration::from_millis(1))
            .unwrap()
            .with_base_url(server.uri())
            .with_poll_interval(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn generate_image_downloads_first_output() {
        let server = MockServer::start().await;
        mock_version(&server, IMAGE_MODEL).await;

        let image_url = format!("{}/files/image.png", server.uri());
        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(prediction("succeeded", serde_json::json!([image_url]))),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/image.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("keyframes").join("shot1_key1.png");
        client(&server)
            .generate_image("a castle at dawn", &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn run_prediction_polls_until_terminal() {
        let server = MockServer::start().await;
        mock_version(&server, IMAGE_MODEL).await;

        let image_url = format!("{}/files/image.png", server.uri());
        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(prediction("processing", serde_json::Value::Null)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/predictions/pred-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(prediction("processing", serde_json::Value::Null)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/predictions/pred-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(prediction("succeeded", serde_json::json!([image_url]))),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/files/image.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.png");
        client(&server).generate_image("prompt", &dest).await.unwrap();
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn failed_prediction_is_a_media_service_error() {
        let server = MockServer::start().await;
        mock_version(&server, IMAGE_MODEL).await;

        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "pred-1",
                "status": "failed",
                "error": "out of credit"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let result = client(&server)
            .generate_image("prompt", &dir.path().join("out.png"))
            .await;
        assert!(matches!(result, Err(PipelineError::MediaService(_))));
    }

    #[tokio::test]
    async fn empty_output_is_a_media_service_error() {
        let server = MockServer::start().await;
        mock_version(&server, IMAGE_MODEL).await;

        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(prediction("succeeded", serde_json::json!([]))),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let result = client(&server)
            .generate_image("prompt", &dir.path().join("out.png"))
            .await;
        assert!(matches!(result, Err(PipelineError::MediaService(_))));
    }
}
